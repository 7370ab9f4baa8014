use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{conf::settings, pkg::internal::auth::Role, prelude::Result};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    pub sub: Uuid,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

pub fn generate_token(user_id: Uuid, role: Role) -> Result<String> {
    sign(user_id, role, settings.jwt_expiry(), &settings.jwt_secret)
}

pub fn verify_token(token: &str) -> Result<Claims> {
    check(token, &settings.jwt_secret)
}

fn sign(user_id: Uuid, role: Role, ttl: chrono::Duration, secret: &str) -> Result<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id,
        role,
        iat: now.timestamp(),
        exp: (now + ttl).timestamp(),
    };
    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?)
}

fn check(token: &str, secret: &str) -> Result<Claims> {
    Ok(decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)?)
}
