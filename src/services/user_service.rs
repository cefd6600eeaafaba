use sqlx::PgPool;
use tracing::info;

use crate::error::{Error, Result};
use crate::models::user::User;
use crate::utils::{crypto, jwt};

#[derive(Clone)]
pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the account and signs a token so the client is logged in
    /// right away.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<(User, String)> {
        let existing = sqlx::query_scalar::<_, i64>("SELECT id FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(Error::Conflict(
                "User with this email already exists".to_string(),
            ));
        }

        let password_hash = crypto::hash_password(password)?;
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (name, email, password_hash) VALUES ($1, $2, $3)
             RETURNING id, name, email, password_hash, created_at",
        )
        .bind(name)
        .bind(email)
        .bind(&password_hash)
        .fetch_one(&self.pool)
        .await?;

        let token = jwt::sign_token(user.id, &user.email)?;
        info!("Registered new user {}", user.id);
        Ok((user, token))
    }

    /// A missing account and a wrong password produce the same error so the
    /// response does not reveal which emails are registered.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String)> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::Unauthorized("Invalid email or password".to_string()))?;

        if !crypto::verify_password(password, &user.password_hash)? {
            return Err(Error::Unauthorized("Invalid email or password".to_string()));
        }

        let token = jwt::sign_token(user.id, &user.email)?;
        Ok((user, token))
    }

    pub async fn profile(&self, user_id: i64) -> Result<User> {
        sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, created_at FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("User not found".to_string()))
    }
}
