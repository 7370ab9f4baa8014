use std::sync::Arc;

use axum::{Extension, Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::{
    pkg::{
        internal::{
            adaptors::{
                jobs::selectors::JobSelector,
                saved::{mutators::SavedJobMutator, selectors::SavedJobSelector},
            },
            auth::User,
        },
        server::{
            extract::{ApiJson, ApiPath},
            state::AppState,
        },
    },
    prelude::{AppError, Result},
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveJobInput {
    pub job_id: Option<Uuid>,
}

fn job_not_found() -> AppError {
    AppError::not_found("Job not found.")
}

pub async fn save(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<User>>,
    ApiJson(input): ApiJson<SaveJobInput>,
) -> Result<Json<Value>> {
    let job_id = input
        .job_id
        .ok_or_else(|| AppError::bad_request("Missing Details"))?;
    let mut conn = state.db_pool.acquire().await?;
    if !JobSelector::new(&mut conn).exists(job_id).await? {
        return Err(job_not_found());
    }
    let message = if SavedJobMutator::new(&mut conn).save(user.id, job_id).await? {
        tracing::debug!("{} saved job {}", &user.email, job_id);
        "Job saved."
    } else {
        "Already saved."
    };
    Ok(Json(json!({ "message": message })))
}

pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<User>>,
) -> Result<Json<Value>> {
    let mut conn = state.db_pool.acquire().await?;
    let saved = SavedJobSelector::new(&mut conn).get_for_user(user.id).await?;
    Ok(Json(json!({ "savedJobs": saved })))
}

pub async fn unsave(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<User>>,
    ApiPath(job_id): ApiPath<Uuid>,
) -> Result<Json<Value>> {
    let mut conn = state.db_pool.acquire().await?;
    if !JobSelector::new(&mut conn).exists(job_id).await? {
        return Err(job_not_found());
    }
    if !SavedJobMutator::new(&mut conn).unsave(user.id, job_id).await? {
        return Err(AppError::not_found("Job is not saved."));
    }
    let remaining = SavedJobSelector::new(&mut conn)
        .get_job_ids_for_user(user.id)
        .await?;
    Ok(Json(json!({
        "message": "Job unsaved successfully.",
        "savedJobs": remaining,
    })))
}
