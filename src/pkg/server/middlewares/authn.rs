use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;

use crate::{
    pkg::{internal::auth::User, server::state::AppState},
    prelude::{AppError, Result},
    token::verify_token,
};

pub const AUTH_COOKIE: &str = "jwt";

/// Session token from the `jwt` cookie, falling back to a bearer header.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(AUTH_COOKIE).filter(|c| !c.value().is_empty()) {
        return Some(cookie.value().to_string());
    }
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

pub async fn authenticate(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let Some(token) = session_token(&headers) else {
        tracing::warn!("token missing, authentication denied");
        return Err(AppError::Unauthorized(
            "Unauthorized - no token provided".into(),
        ));
    };
    let claims = verify_token(&token).map_err(|e| {
        tracing::warn!("rejected token: {}", e);
        AppError::Unauthorized("Unauthorized - invalid token".into())
    })?;
    let user = User::load_verified(&state, claims.sub).await?;
    request.extensions_mut().insert(Arc::new(user));
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn prefers_cookie_over_bearer_header() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer from-header"));
        assert_eq!(session_token(&headers).as_deref(), Some("from-header"));

        headers.insert("cookie", HeaderValue::from_static("theme=dark; jwt=from-cookie"));
        assert_eq!(session_token(&headers).as_deref(), Some("from-cookie"));
    }

    #[test]
    fn empty_values_count_as_missing() {
        let mut headers = HeaderMap::new();
        headers.insert("cookie", HeaderValue::from_static("jwt="));
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(session_token(&headers), None);
        assert_eq!(session_token(&HeaderMap::new()), None);
    }
}
