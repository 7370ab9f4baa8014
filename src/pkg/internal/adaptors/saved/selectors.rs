use sqlx::PgConnection;
use uuid::Uuid;

use crate::{pkg::internal::adaptors::saved::spec::SavedJobEntry, prelude::Result};

pub struct SavedJobSelector<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> SavedJobSelector<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        SavedJobSelector { pool }
    }

    pub async fn get_for_user(&mut self, user_id: Uuid) -> Result<Vec<SavedJobEntry>> {
        let rows = sqlx::query_as::<_, SavedJobEntry>(
            r#"
            SELECT s.id AS saved_id, s.created_at AS saved_at,
                j.id, j.job_title, j.job_description, j.company, j.required_skills, j.job_type,
                j.batch, j.deadline, j.application_link, j.expiry, j.author, j.relevance_score,
                j.upvoted_by, j.downvoted_by, j.created_at, j.updated_at
            FROM saved_jobs s
            JOIN jobs j ON j.id = s.job_id
            WHERE s.user_id = $1
            ORDER BY s.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn get_job_ids_for_user(&mut self, user_id: Uuid) -> Result<Vec<Uuid>> {
        let ids = sqlx::query_scalar(
            "SELECT job_id FROM saved_jobs WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&mut *self.pool)
        .await?;
        Ok(ids)
    }
}
