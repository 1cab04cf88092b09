use std::sync::Arc;

use axum::extract::FromRef;
use tracing::{info, instrument};
use uuid::Uuid;

use super::{dto::UpdateProfileRequest, repo::UserRepo, repo_types::User};
use crate::{
    error::{AppError, AppResult},
    state::AppState,
};

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepo>,
}

impl FromRef<AppState> for UserService {
    fn from_ref(state: &AppState) -> Self {
        Self::new(state.users.clone())
    }
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepo>) -> Self {
        Self { users }
    }

    #[instrument(skip(self))]
    pub async fn profile(&self, user_id: Uuid) -> AppResult<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("user not found"))
    }

    #[instrument(skip(self, req))]
    pub async fn update_profile(&self, user_id: Uuid, req: UpdateProfileRequest) -> AppResult<User> {
        let mut user = self.profile(user_id).await?;
        apply_profile_update(&mut user, req)?;
        let user = self.users.update_profile(&user).await?;
        info!(user_id = %user.id, "profile updated");
        Ok(user)
    }
}

fn apply_profile_update(user: &mut User, req: UpdateProfileRequest) -> AppResult<()> {
    if let Some(nickname) = req.nickname {
        let nickname = nickname.trim();
        if nickname.is_empty() {
            return Err(AppError::validation("nickname must not be empty"));
        }
        user.nickname = nickname.to_string();
    }
    if let Some(gender) = req.gender {
        if !(0..=2).contains(&gender) {
            return Err(AppError::validation("gender must be 0 (unknown), 1 (male) or 2 (female)"));
        }
        user.gender = gender;
    }
    if let Some(age) = req.age {
        if age <= 0 {
            return Err(AppError::validation("age must be positive"));
        }
        user.age = age;
    }
    if let Some(height) = req.height {
        if height <= 0.0 {
            return Err(AppError::validation("height must be positive"));
        }
        user.height = height;
    }
    if let Some(weight) = req.weight {
        if weight <= 0.0 {
            return Err(AppError::validation("weight must be positive"));
        }
        user.weight = weight;
    }
    if let Some(level) = req.activity_level {
        if !(1..=5).contains(&level) {
            return Err(AppError::validation("activity_level must be between 1 and 5"));
        }
        user.activity_level = level;
    }
    Ok(())
}
