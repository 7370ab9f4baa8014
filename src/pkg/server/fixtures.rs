//! Rows and state for tests that run against a migrated database.

use std::sync::Arc;

use sqlx::PgPool;

use super::state::AppState;
use crate::{
    pkg::internal::{
        adaptors::{
            jobs::{
                mutators::JobMutator,
                spec::{JobEntry, NewJob},
            },
            users::selectors::UserSelector,
        },
        auth::{Role, User},
    },
    prelude::Result,
};

pub fn state(pool: PgPool) -> AppState {
    AppState {
        db_pool: Arc::new(pool),
    }
}

/// The code most recently mailed to an unverified user.
pub async fn pending_code(state: &AppState, user_id: uuid::Uuid) -> Result<String> {
    let mut conn = state.db_pool.acquire().await?;
    let user = UserSelector::new(&mut conn)
        .get_by_id(user_id)
        .await?
        .expect("user row");
    Ok(user.verification_token.expect("pending verification code"))
}

pub async fn verified_user(state: &AppState, email: &str, role: Role) -> Result<Arc<User>> {
    let id = User::signup(state, "Test User", email, "secret123", role).await?;
    let code = pending_code(state, id).await?;
    Ok(Arc::new(User::verify_email(state, id, &code).await?))
}

pub async fn posted_job(state: &AppState, author: &User) -> Result<JobEntry> {
    let mut conn = state.db_pool.acquire().await?;
    JobMutator::new(&mut conn)
        .create(
            NewJob {
                job_title: "SDE Intern".into(),
                job_description: "Backend services".into(),
                company: "Acme".into(),
                required_skills: vec!["rust".into()],
                job_type: "Internship".into(),
                batch: "2026".into(),
                deadline: None,
                application_link: None,
                expiry: None,
            },
            author.id,
        )
        .await
}
