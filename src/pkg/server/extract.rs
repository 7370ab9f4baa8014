use axum::extract::{FromRequest, FromRequestParts};

use crate::prelude::AppError;

/// `axum::Json` whose rejections answer with the portal's JSON error body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// `axum::extract::Path`, same treatment; a malformed id is a JSON 400.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);
