use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;
use validator::Validate;

use crate::{
    pkg::{
        internal::{
            adaptors::alumni::{
                mutators::AlumniMutator, selectors::AlumniSelector, spec::AlumniFields,
            },
            alumni::AlumniFilter,
            auth::{Role, User},
        },
        server::{
            extract::{ApiJson, ApiPath},
            state::AppState,
        },
    },
    prelude::{AppError, Result},
};

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub query: Option<String>,
}

fn alumni_not_found() -> AppError {
    AppError::not_found("Alumni not found")
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Value>> {
    let mut conn = state.db_pool.acquire().await?;
    let alumni = AlumniSelector::new(&mut conn).get_all().await?;
    Ok(Json(json!({ "alumni": alumni })))
}

pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Value>> {
    let filter = AlumniFilter::parse(
        params.kind.as_deref().unwrap_or("company"),
        params.query.as_deref().unwrap_or_default(),
    )?;
    tracing::debug!("alumni search: {:?}", &filter);
    let mut conn = state.db_pool.acquire().await?;
    let alumni = AlumniSelector::new(&mut conn).search(&filter).await?;
    Ok(Json(json!({ "alumni": alumni })))
}

pub async fn retrieve(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Value>> {
    let mut conn = state.db_pool.acquire().await?;
    let alumni = AlumniSelector::new(&mut conn)
        .get_by_id(id)
        .await?
        .ok_or_else(alumni_not_found)?;
    Ok(Json(json!({ "alumni": alumni })))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<User>>,
    ApiJson(input): ApiJson<AlumniFields>,
) -> Result<(StatusCode, Json<Value>)> {
    user.require_role(&[Role::Admin])?;
    input.validate()?;
    let mut conn = state.db_pool.acquire().await?;
    let alumni = AlumniMutator::new(&mut conn).create(input).await?;
    tracing::info!("{} added alumni {}", &user.email, alumni.id);
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Alumni added successfully", "alumni": alumni })),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<User>>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(input): ApiJson<AlumniFields>,
) -> Result<Json<Value>> {
    user.require_role(&[Role::Admin])?;
    input.validate()?;
    let mut conn = state.db_pool.acquire().await?;
    let alumni = if input.is_empty() {
        AlumniSelector::new(&mut conn).get_by_id(id).await?
    } else {
        AlumniMutator::new(&mut conn).update(id, input).await?
    }
    .ok_or_else(alumni_not_found)?;
    Ok(Json(
        json!({ "message": "Alumni updated successfully", "alumni": alumni }),
    ))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<User>>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Value>> {
    user.require_role(&[Role::Admin])?;
    let mut conn = state.db_pool.acquire().await?;
    if !AlumniMutator::new(&mut conn).delete(id).await? {
        return Err(alumni_not_found());
    }
    tracing::info!("{} deleted alumni {}", &user.email, id);
    Ok(Json(json!({ "message": "Alumni deleted successfully" })))
}
