use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{NewUser, User};

#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    /// Inserts a user; `None` when the email is already taken.
    async fn create(&self, new_user: NewUser) -> anyhow::Result<Option<User>>;
    /// Persists nickname and biometrics, returning the stored row.
    async fn update_profile(&self, user: &User) -> anyhow::Result<User>;
}

#[derive(Clone)]
pub struct PgUserRepo {
    db: PgPool,
}

impl PgUserRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepo for PgUserRepo {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, nickname, gender, age, height, weight,
                   activity_level, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find user by id")?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, nickname, gender, age, height, weight,
                   activity_level, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await
        .context("find user by email")?;
        Ok(user)
    }

    async fn create(&self, new_user: NewUser) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, nickname)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO NOTHING
            RETURNING id, email, password_hash, nickname, gender, age, height, weight,
                      activity_level, created_at, updated_at
            "#,
        )
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(&new_user.nickname)
        .fetch_optional(&self.db)
        .await
        .context("insert user")?;
        Ok(user)
    }

    async fn update_profile(&self, user: &User) -> anyhow::Result<User> {
        let updated = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
               SET nickname = $2, gender = $3, age = $4, height = $5, weight = $6,
                   activity_level = $7, updated_at = now()
             WHERE id = $1
            RETURNING id, email, password_hash, nickname, gender, age, height, weight,
                      activity_level, created_at, updated_at
            "#,
        )
        .bind(user.id)
        .bind(&user.nickname)
        .bind(user.gender)
        .bind(user.age)
        .bind(user.height)
        .bind(user.weight)
        .bind(user.activity_level)
        .fetch_one(&self.db)
        .await
        .context("update user profile")?;
        Ok(updated)
    }
}
