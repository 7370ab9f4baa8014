use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;
use validator::Validate;

use crate::{
    conf::settings,
    pkg::{
        internal::auth::{LoginOutcome, Role, User, normalize_email},
        server::{
            extract::{ApiJson, ApiPath},
            middlewares::authn::AUTH_COOKIE,
            state::AppState,
        },
    },
    prelude::{AppError, Result},
    token::generate_token,
};

#[derive(Deserialize, Validate)]
pub struct SignupInput {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: String,
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    pub role: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdInput {
    pub user_id: Option<Uuid>,
}

/// Verification codes arrive either as a string or a bare number.
#[derive(Deserialize)]
#[serde(untagged)]
pub enum CodeValue {
    Text(String),
    Number(u64),
}

impl CodeValue {
    fn into_code(self) -> String {
        match self {
            CodeValue::Text(code) => code.trim().to_string(),
            CodeValue::Number(code) => code.to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyInput {
    pub user_id: Option<Uuid>,
    pub code: Option<CodeValue>,
}

#[derive(Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct ForgotPasswordInput {
    pub email: Option<String>,
}

#[derive(Deserialize, Validate)]
pub struct ResetPasswordInput {
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(settings.secure_cookies)
        .max_age(time::Duration::days(settings.jwt_expiry_days))
        .build()
}

fn missing_details() -> AppError {
    AppError::bad_request("Missing Details")
}

pub async fn signup(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<SignupInput>,
) -> Result<Json<Value>> {
    let role: Role = input.role.parse()?;
    let email = normalize_email(&input.email);
    role.check_email(&email, &settings.institute_domain, &settings.institute_name)?;
    input.validate()?;

    let user_id = User::signup(&state, input.name.trim(), &email, &input.password, role).await?;
    Ok(Json(json!({ "success": true, "userId": user_id })))
}

pub async fn send_code_again(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<UserIdInput>,
) -> Result<Json<Value>> {
    let user_id = input.user_id.ok_or_else(missing_details)?;
    User::resend_code(&state, user_id).await?;
    Ok(Json(
        json!({ "success": true, "message": "New verification code sent" }),
    ))
}

pub async fn verify_email(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(input): ApiJson<VerifyInput>,
) -> Result<(StatusCode, CookieJar, Json<Value>)> {
    let (Some(user_id), Some(code)) = (input.user_id, input.code) else {
        return Err(missing_details());
    };
    let user = User::verify_email(&state, user_id, &code.into_code()).await?;
    let token = generate_token(user.id, user.role)?;
    Ok((
        StatusCode::CREATED,
        jar.add(session_cookie(token.clone())),
        Json(json!({
            "success": true,
            "message": "Email verified successfully",
            "userData": user,
            "token": token,
        })),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(input): ApiJson<LoginInput>,
) -> Result<Response> {
    let email = normalize_email(&input.email);
    match User::login(&state, &email, &input.password).await? {
        LoginOutcome::Unverified(user_id) => Ok((
            StatusCode::BAD_REQUEST,
            Json(json!({
                "success": false,
                "userId": user_id,
                "message": "Email is not verified",
            })),
        )
            .into_response()),
        LoginOutcome::Authenticated(user) => {
            let token = generate_token(user.id, user.role)?;
            tracing::info!("{} logged in", &user.email);
            Ok((
                jar.add(session_cookie(token.clone())),
                Json(json!({ "success": true, "userData": user, "token": token })),
            )
                .into_response())
        }
    }
}

pub async fn logout(jar: CookieJar) -> (CookieJar, Json<Value>) {
    let expired = Cookie::build((AUTH_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .max_age(time::Duration::ZERO)
        .build();
    (
        jar.add(expired),
        Json(json!({ "success": true, "message": "Logged out successfully" })),
    )
}

pub async fn forgot_password(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<ForgotPasswordInput>,
) -> Result<Json<Value>> {
    let email = input
        .email
        .map(|e| normalize_email(&e))
        .filter(|e| !e.is_empty())
        .ok_or_else(missing_details)?;
    User::request_password_reset(&state, &email).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Password reset link sent to your email",
    })))
}

pub async fn reset_password(
    State(state): State<AppState>,
    ApiPath(token): ApiPath<String>,
    ApiJson(input): ApiJson<ResetPasswordInput>,
) -> Result<Json<Value>> {
    if token.trim().is_empty() {
        return Err(missing_details());
    }
    input.validate()?;
    User::reset_password(&state, token.trim(), &input.password).await?;
    Ok(Json(
        json!({ "success": true, "message": "Password reset successful" }),
    ))
}

pub async fn me(Extension(user): Extension<Arc<User>>) -> Json<Value> {
    Json(json!({ "success": true, "userData": &*user }))
}
