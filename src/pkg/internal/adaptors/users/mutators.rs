use chrono::{DateTime, Utc};
use sqlx::PgConnection;
use uuid::Uuid;

use crate::{
    pkg::internal::adaptors::users::spec::{NewUser, USER_COLUMNS, UserEntry},
    prelude::Result,
};

pub struct UserMutator<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> UserMutator<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        UserMutator { pool }
    }

    /// Inserts the user, or refreshes name, password and code of an existing
    /// unverified user with the same email. Returns `None` when the email
    /// belongs to a verified account.
    pub async fn upsert_unverified(&mut self, user: NewUser<'_>) -> Result<Option<UserEntry>> {
        let row = sqlx::query_as::<_, UserEntry>(&format!(
            r#"
            INSERT INTO users (id, name, email, password_hash, role,
                verification_token, verification_token_expires_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (email) DO UPDATE
            SET name = EXCLUDED.name,
                password_hash = EXCLUDED.password_hash,
                verification_token = EXCLUDED.verification_token,
                verification_token_expires_at = EXCLUDED.verification_token_expires_at,
                updated_at = now()
            WHERE users.is_verified = FALSE
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(user.name)
        .bind(user.email)
        .bind(user.password_hash)
        .bind(user.role)
        .bind(user.code)
        .bind(user.code_expires_at)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn set_verification_code(
        &mut self,
        id: Uuid,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE users
             SET verification_token = $2, verification_token_expires_at = $3, updated_at = now()
             WHERE id = $1",
        )
        .bind(id)
        .bind(code)
        .bind(expires_at)
        .execute(&mut *self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn mark_verified(&mut self, id: Uuid) -> Result<Option<UserEntry>> {
        let row = sqlx::query_as::<_, UserEntry>(&format!(
            "UPDATE users
             SET is_verified = TRUE,
                 verification_token = NULL,
                 verification_token_expires_at = NULL,
                 updated_at = now()
             WHERE id = $1
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn set_reset_token(
        &mut self,
        id: Uuid,
        digest: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            "UPDATE users
             SET reset_password_token = $2, reset_password_token_expires_at = $3, updated_at = now()
             WHERE id = $1",
        )
        .bind(id)
        .bind(digest)
        .bind(expires_at)
        .execute(&mut *self.pool)
        .await?;
        Ok(())
    }

    /// Swaps the password only while `digest` is still a live reset token,
    /// clearing it in the same statement so a token can be spent once.
    pub async fn consume_reset_token(
        &mut self,
        digest: &str,
        password_hash: &str,
    ) -> Result<Option<UserEntry>> {
        let row = sqlx::query_as::<_, UserEntry>(&format!(
            "UPDATE users
             SET password_hash = $2,
                 reset_password_token = NULL,
                 reset_password_token_expires_at = NULL,
                 updated_at = now()
             WHERE reset_password_token = $1
             AND reset_password_token_expires_at > now()
             RETURNING {USER_COLUMNS}"
        ))
        .bind(digest)
        .bind(password_hash)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }
}
