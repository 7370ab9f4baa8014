use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
};
use serde_json::{Value, json};
use uuid::Uuid;
use validator::Validate;

use crate::{
    pkg::{
        internal::{
            adaptors::jobs::{
                mutators::JobMutator,
                selectors::JobSelector,
                spec::{JobPatch, NewJob},
            },
            auth::{Role, User},
            votes::{UserVote, VoteDirection, VoteLedger},
        },
        server::{
            extract::{ApiJson, ApiPath},
            state::{AppState, GetTxn},
        },
    },
    prelude::{AppError, Result},
};

const JOB_EDITORS: &[Role] = &[Role::Admin, Role::Recruiter];

fn job_not_found() -> AppError {
    AppError::not_found("Job posting not found")
}

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<User>>,
    ApiJson(input): ApiJson<NewJob>,
) -> Result<(StatusCode, Json<Value>)> {
    user.require_role(JOB_EDITORS)?;
    input.validate()?;
    let mut conn = state.db_pool.acquire().await?;
    let job = JobMutator::new(&mut conn).create(input, user.id).await?;
    tracing::info!("{} posted job {} at {}", &user.email, job.id, &job.company);
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Job posting created successfully", "job": job })),
    ))
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Value>> {
    let mut conn = state.db_pool.acquire().await?;
    let jobs = JobSelector::new(&mut conn).get_all().await?;
    Ok(Json(
        json!({ "message": "Job postings retrieved successfully", "jobs": jobs }),
    ))
}

pub async fn retrieve(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Value>> {
    let mut conn = state.db_pool.acquire().await?;
    let job = JobSelector::new(&mut conn)
        .get_by_id(id)
        .await?
        .ok_or_else(job_not_found)?;
    Ok(Json(json!({ "job": job })))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<User>>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(input): ApiJson<JobPatch>,
) -> Result<Json<Value>> {
    user.require_role(JOB_EDITORS)?;
    input.validate()?;
    let mut conn = state.db_pool.acquire().await?;
    let job = if input.is_empty() {
        JobSelector::new(&mut conn).get_by_id(id).await?
    } else {
        JobMutator::new(&mut conn).update(id, input).await?
    }
    .ok_or_else(job_not_found)?;
    tracing::info!("{} updated job {}", &user.email, id);
    Ok(Json(
        json!({ "message": "Job posting updated successfully", "job": job }),
    ))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<User>>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Value>> {
    user.require_role(JOB_EDITORS)?;
    let mut conn = state.db_pool.acquire().await?;
    let job = JobMutator::new(&mut conn)
        .delete(id)
        .await?
        .ok_or_else(job_not_found)?;
    tracing::info!("{} deleted job {}", &user.email, id);
    Ok(Json(
        json!({ "message": "Job posting deleted successfully", "job": job }),
    ))
}

pub async fn upvote(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<User>>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Value>> {
    vote(&state, &user, id, VoteDirection::Up).await
}

pub async fn downvote(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<User>>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Value>> {
    vote(&state, &user, id, VoteDirection::Down).await
}

async fn vote(
    state: &AppState,
    user: &User,
    id: Uuid,
    direction: VoteDirection,
) -> Result<Json<Value>> {
    let mut tx = state.db_pool.begin_txn().await?;
    let job = JobSelector::new(&mut tx)
        .lock_by_id(id)
        .await?
        .ok_or_else(job_not_found)?;
    let mut ledger = VoteLedger::from(&job);
    let delta = ledger.cast(user.id, direction)?;
    let job = JobMutator::new(&mut tx).record_votes(id, &ledger).await?;
    tx.commit().await?;
    tracing::debug!("{} voted {:?} on job {} ({:+})", &user.email, direction, id, delta);

    let message = match direction {
        VoteDirection::Up => "Relevance score upvoted successfully",
        VoteDirection::Down => "Relevance score downvoted successfully",
    };
    Ok(Json(json!({
        "message": message,
        "job": job,
        "userVote": UserVote::from(direction),
    })))
}

#[cfg(test)]
mod tests {
    use sqlx::PgPool;

    use super::*;
    use crate::pkg::server::fixtures::{posted_job, state, verified_user};

    async fn score_after(
        state: &AppState,
        user: &User,
        id: Uuid,
        direction: VoteDirection,
    ) -> Result<i64> {
        let Json(body) = vote(state, user, id, direction).await?;
        Ok(body["job"]["relevanceScore"].as_i64().unwrap_or_default())
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn votes_are_recorded_against_the_row(pool: PgPool) -> Result<()> {
        let state = state(pool);
        let recruiter = verified_user(&state, "hr@acme.com", Role::Recruiter).await?;
        let student = verified_user(&state, "ravi@iitbhilai.ac.in", Role::Student).await?;
        let job = posted_job(&state, &recruiter).await?;

        assert_eq!(score_after(&state, &student, job.id, VoteDirection::Up).await?, 1);
        assert_eq!(score_after(&state, &student, job.id, VoteDirection::Down).await?, -1);
        let err = vote(&state, &student, job.id, VoteDirection::Down)
            .await
            .err()
            .map(|e| e.to_string());
        assert_eq!(err.as_deref(), Some("Already downvoted"));

        let mut conn = state.db_pool.acquire().await?;
        let stored = JobSelector::new(&mut conn)
            .get_by_id(job.id)
            .await?
            .expect("job row");
        assert_eq!(stored.relevance_score, -1);
        assert!(stored.upvoted_by.is_empty());
        assert_eq!(stored.downvoted_by, vec![student.id]);
        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn concurrent_votes_are_not_lost(pool: PgPool) -> Result<()> {
        let state = state(pool);
        let recruiter = verified_user(&state, "hr@acme.com", Role::Recruiter).await?;
        let a = verified_user(&state, "a@iitbhilai.ac.in", Role::Student).await?;
        let b = verified_user(&state, "b@iitbhilai.ac.in", Role::Student).await?;
        let job = posted_job(&state, &recruiter).await?;

        let (first, second) = tokio::join!(
            vote(&state, &a, job.id, VoteDirection::Up),
            vote(&state, &b, job.id, VoteDirection::Up)
        );
        first?;
        second?;

        let mut conn = state.db_pool.acquire().await?;
        let stored = JobSelector::new(&mut conn)
            .get_by_id(job.id)
            .await?
            .expect("job row");
        assert_eq!(stored.relevance_score, 2);
        assert_eq!(stored.upvoted_by.len(), 2);
        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn votes_on_missing_jobs_are_not_found(pool: PgPool) -> Result<()> {
        let state = state(pool);
        let student = verified_user(&state, "ravi@iitbhilai.ac.in", Role::Student).await?;
        let err = vote(&state, &student, Uuid::new_v4(), VoteDirection::Up)
            .await
            .err();
        assert!(matches!(err, Some(AppError::NotFound(_))));
        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn empty_patch_returns_the_job_unchanged(pool: PgPool) -> Result<()> {
        let state = state(pool);
        let recruiter = verified_user(&state, "hr@acme.com", Role::Recruiter).await?;
        let job = posted_job(&state, &recruiter).await?;

        let Json(body) = update(
            State(state),
            Extension(recruiter),
            ApiPath(job.id),
            ApiJson(JobPatch::default()),
        )
        .await?;
        assert_eq!(body["job"]["Company"], json!("Acme"));
        assert_eq!(body["job"]["updatedAt"], json!(job.updated_at));
        Ok(())
    }
}
