use std::time::Duration;

use axum::http::{HeaderValue, Method, header};
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::{Router, routing::delete};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{alumni, auth, jobs, probes, saved};
use super::middlewares::authn;
use super::state::AppState;
use crate::{conf::settings, prelude::Result};

pub async fn build_routes() -> Result<Router> {
    let state = AppState::new().await?;
    Ok(routes(state))
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/auth/me", get(auth::me))
        .route("/api/jobs", get(jobs::list).post(jobs::create))
        .route(
            "/api/jobs/{id}",
            get(jobs::retrieve).put(jobs::update).delete(jobs::delete),
        )
        .route("/api/jobs/{id}/upvote", post(jobs::upvote))
        .route("/api/jobs/{id}/downvote", post(jobs::downvote))
        .route("/api/saved-jobs", get(saved::list).post(saved::save))
        .route("/api/saved-jobs/{job_id}", delete(saved::unsave))
        .route("/api/alumni", get(alumni::list).post(alumni::create))
        .route("/api/alumni/search", get(alumni::search))
        .route(
            "/api/alumni/{id}",
            get(alumni::retrieve)
                .put(alumni::update)
                .delete(alumni::delete),
        )
        .layer(from_fn_with_state(state.clone(), authn::authenticate))
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/send-code", post(auth::send_code_again))
        .route("/api/auth/verify-email", post(auth::verify_email))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/forgot-password", post(auth::forgot_password))
        .route("/api/auth/reset-password/{token}", post(auth::reset_password))
        .route("/healthz", get(probes::healthz))
        .route("/livez", get(probes::livez))
        .layer(cors())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors() -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(60 * 60));
    match HeaderValue::from_str(&settings.frontend_url) {
        Ok(origin) => layer.allow_origin(origin),
        Err(e) => {
            tracing::warn!("invalid frontend url {}: {}", &settings.frontend_url, e);
            layer
        }
    }
}
