use sqlx::{PgConnection, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    pkg::internal::{
        adaptors::jobs::spec::{JOB_COLUMNS, JobEntry, JobPatch, NewJob},
        votes::VoteLedger,
    },
    prelude::Result,
};

pub struct JobMutator<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> JobMutator<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        JobMutator { pool }
    }

    pub async fn create(&mut self, job: NewJob, author: Uuid) -> Result<JobEntry> {
        let row = sqlx::query_as::<_, JobEntry>(&format!(
            r#"
            INSERT INTO jobs (id, job_title, job_description, company, required_skills, job_type,
                batch, deadline, application_link, expiry, author)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&job.job_title)
        .bind(&job.job_description)
        .bind(&job.company)
        .bind(&job.required_skills)
        .bind(&job.job_type)
        .bind(&job.batch)
        .bind(job.deadline)
        .bind(&job.application_link)
        .bind(job.expiry)
        .bind(author)
        .fetch_one(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn update(&mut self, id: Uuid, job: JobPatch) -> Result<Option<JobEntry>> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE jobs SET updated_at = now()");
        if let Some(title) = job.job_title {
            qb.push(", job_title = ").push_bind(title);
        }
        if let Some(description) = job.job_description {
            qb.push(", job_description = ").push_bind(description);
        }
        if let Some(company) = job.company {
            qb.push(", company = ").push_bind(company);
        }
        if let Some(skills) = job.required_skills {
            qb.push(", required_skills = ").push_bind(skills);
        }
        if let Some(job_type) = job.job_type {
            qb.push(", job_type = ").push_bind(job_type);
        }
        if let Some(batch) = job.batch {
            qb.push(", batch = ").push_bind(batch);
        }
        if let Some(deadline) = job.deadline {
            qb.push(", deadline = ").push_bind(deadline);
        }
        if let Some(link) = job.application_link {
            qb.push(", application_link = ").push_bind(link);
        }
        if let Some(expiry) = job.expiry {
            qb.push(", expiry = ").push_bind(expiry);
        }
        qb.push(" WHERE id = ")
            .push_bind(id)
            .push(" RETURNING ")
            .push(JOB_COLUMNS);

        let row = qb
            .build_query_as::<JobEntry>()
            .fetch_optional(&mut *self.pool)
            .await?;
        Ok(row)
    }

    pub async fn record_votes(&mut self, id: Uuid, ledger: &VoteLedger) -> Result<JobEntry> {
        let row = sqlx::query_as::<_, JobEntry>(&format!(
            r#"
            UPDATE jobs
            SET upvoted_by = $2, downvoted_by = $3, relevance_score = $4, updated_at = now()
            WHERE id = $1
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&ledger.upvoted_by)
        .bind(&ledger.downvoted_by)
        .bind(ledger.relevance_score)
        .fetch_one(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn delete(&mut self, id: Uuid) -> Result<Option<JobEntry>> {
        let row = sqlx::query_as::<_, JobEntry>(&format!(
            "DELETE FROM jobs WHERE id = $1 RETURNING {JOB_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }
}
