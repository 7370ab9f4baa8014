use sqlx::PgConnection;
use uuid::Uuid;

use crate::prelude::Result;

pub struct SavedJobMutator<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> SavedJobMutator<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        SavedJobMutator { pool }
    }

    /// Returns `false` when the job was already saved by the user.
    pub async fn save(&mut self, user_id: Uuid, job_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            "INSERT INTO saved_jobs (id, user_id, job_id) VALUES ($1, $2, $3)
             ON CONFLICT (user_id, job_id) DO NOTHING",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(job_id)
        .execute(&mut *self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn unsave(&mut self, user_id: Uuid, job_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM saved_jobs WHERE user_id = $1 AND job_id = $2")
            .bind(user_id)
            .bind(job_id)
            .execute(&mut *self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
