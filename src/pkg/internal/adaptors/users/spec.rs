use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::pkg::internal::auth::Role;

pub const USER_COLUMNS: &str = "id, name, email, password_hash, role, is_verified, \
    verification_token, verification_token_expires_at, \
    reset_password_token, reset_password_token_expires_at, created_at, updated_at";

#[derive(Debug, Clone, FromRow)]
pub struct UserEntry {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub is_verified: bool,
    pub verification_token: Option<String>,
    pub verification_token_expires_at: Option<DateTime<Utc>>,
    pub reset_password_token: Option<String>,
    pub reset_password_token_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields written by a signup, whether it creates the row or refreshes an
/// unverified one.
pub struct NewUser<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: Role,
    pub code: &'a str,
    pub code_expires_at: DateTime<Utc>,
}
