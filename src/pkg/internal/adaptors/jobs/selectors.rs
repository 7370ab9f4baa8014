use sqlx::PgConnection;
use uuid::Uuid;

use crate::{
    pkg::internal::adaptors::jobs::spec::{JOB_COLUMNS, JobEntry},
    prelude::Result,
};

pub struct JobSelector<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> JobSelector<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        JobSelector { pool }
    }

    pub async fn get_by_id(&mut self, id: Uuid) -> Result<Option<JobEntry>> {
        let row = sqlx::query_as::<_, JobEntry>(&format!(
            "SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }

    /// Same as [`get_by_id`](Self::get_by_id) but holds a row lock until the
    /// surrounding transaction ends.
    pub async fn lock_by_id(&mut self, id: Uuid) -> Result<Option<JobEntry>> {
        let row = sqlx::query_as::<_, JobEntry>(&format!(
            "SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn exists(&mut self, id: Uuid) -> Result<bool> {
        let found: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM jobs WHERE id = $1)")
            .bind(id)
            .fetch_one(&mut *self.pool)
            .await?;
        Ok(found)
    }

    pub async fn get_all(&mut self) -> Result<Vec<JobEntry>> {
        let rows = sqlx::query_as::<_, JobEntry>(&format!(
            "SELECT {JOB_COLUMNS} FROM jobs ORDER BY relevance_score DESC, created_at DESC"
        ))
        .fetch_all(&mut *self.pool)
        .await?;
        Ok(rows)
    }
}
