use sqlx::PgConnection;
use uuid::Uuid;

use crate::{
    pkg::internal::adaptors::users::spec::{USER_COLUMNS, UserEntry},
    prelude::Result,
};

pub struct UserSelector<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> UserSelector<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        UserSelector { pool }
    }

    pub async fn get_by_id(&mut self, id: Uuid) -> Result<Option<UserEntry>> {
        let row = sqlx::query_as::<_, UserEntry>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn get_by_email(&mut self, email: &str) -> Result<Option<UserEntry>> {
        let row = sqlx::query_as::<_, UserEntry>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn get_by_verification_code(
        &mut self,
        id: Uuid,
        code: &str,
    ) -> Result<Option<UserEntry>> {
        let row = sqlx::query_as::<_, UserEntry>(&format!(
            "SELECT {USER_COLUMNS} FROM users
             WHERE id = $1
             AND verification_token = $2
             AND verification_token_expires_at > now()"
        ))
        .bind(id)
        .bind(code)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn get_by_reset_digest(&mut self, digest: &str) -> Result<Option<UserEntry>> {
        let row = sqlx::query_as::<_, UserEntry>(&format!(
            "SELECT {USER_COLUMNS} FROM users
             WHERE reset_password_token = $1
             AND reset_password_token_expires_at > now()"
        ))
        .bind(digest)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }
}
