use std::sync::Arc;

use axum::extract::FromRef;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use super::{
    dto::{LoginRequest, LoginResponse, RegisterRequest},
    jwt::JwtKeys,
    password::{check_strength, hash_password, verify_password},
};
use crate::{
    error::{AppError, AppResult},
    state::AppState,
    users::{
        repo::UserRepo,
        repo_types::{NewUser, User},
    },
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepo>,
    keys: JwtKeys,
}

impl FromRef<AppState> for AuthService {
    fn from_ref(state: &AppState) -> Self {
        Self::new(state.users.clone(), JwtKeys::from_ref(state))
    }
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepo>, keys: JwtKeys) -> Self {
        Self { users, keys }
    }

    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn register(&self, req: RegisterRequest) -> AppResult<User> {
        let email = req.email.trim().to_lowercase();
        let nickname = req.nickname.trim().to_string();

        if !is_valid_email(&email) {
            warn!("invalid email");
            return Err(AppError::validation("invalid email"));
        }
        check_strength(&req.password)?;
        if nickname.is_empty() {
            return Err(AppError::validation("nickname is required"));
        }

        if self.users.find_by_email(&email).await?.is_some() {
            warn!("email already registered");
            return Err(AppError::conflict("email already registered"));
        }

        let password_hash = hash_password(&req.password)?;
        let user = self
            .users
            .create(NewUser {
                email,
                password_hash,
                nickname,
            })
            .await?
            // lost a race against a concurrent registration
            .ok_or_else(|| AppError::conflict("email already registered"))?;

        info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn login(&self, req: LoginRequest) -> AppResult<LoginResponse> {
        let email = req.email.trim().to_lowercase();
        let invalid = || AppError::Unauthenticated("invalid email or password".into());

        let Some(user) = self.users.find_by_email(&email).await? else {
            warn!("login unknown email");
            return Err(invalid());
        };

        if !verify_password(&req.password, &user.password_hash) {
            warn!(user_id = %user.id, "login invalid password");
            return Err(invalid());
        }

        let token = self.keys.sign(&user)?;
        info!(user_id = %user.id, "user logged in");
        Ok(LoginResponse { user, token })
    }
}
