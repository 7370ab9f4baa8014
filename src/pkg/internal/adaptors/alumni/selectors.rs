use sqlx::{PgConnection, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    pkg::internal::{
        adaptors::alumni::spec::{ALUMNI_COLUMNS, AlumniEntry},
        alumni::{AlumniFilter, BatchQuery},
    },
    prelude::Result,
};

pub struct AlumniSelector<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> AlumniSelector<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        AlumniSelector { pool }
    }

    pub async fn get_by_id(&mut self, id: Uuid) -> Result<Option<AlumniEntry>> {
        let row = sqlx::query_as::<_, AlumniEntry>(&format!(
            "SELECT {ALUMNI_COLUMNS} FROM alumni WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn get_all(&mut self) -> Result<Vec<AlumniEntry>> {
        let rows = sqlx::query_as::<_, AlumniEntry>(&format!(
            "SELECT {ALUMNI_COLUMNS} FROM alumni ORDER BY name"
        ))
        .fetch_all(&mut *self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn search(&mut self, filter: &AlumniFilter) -> Result<Vec<AlumniEntry>> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {ALUMNI_COLUMNS} FROM alumni WHERE "
        ));
        match filter {
            AlumniFilter::Contains { column, pattern } => {
                qb.push(*column).push(" ILIKE ").push_bind(pattern.as_str());
            }
            AlumniFilter::JobId(job_id) => {
                qb.push("job_id = ").push_bind(job_id.as_str());
            }
            AlumniFilter::Batch(BatchQuery::Year(year)) => {
                let year = year.to_string();
                qb.push("(batch = ")
                    .push_bind(year.clone())
                    .push(" OR batch LIKE ")
                    .push_bind(format!("{year}-%"))
                    .push(" OR batch LIKE ")
                    .push_bind(format!("%-{year}"))
                    .push(")");
            }
            AlumniFilter::Batch(BatchQuery::Range(start, end)) => {
                qb.push("batch = ").push_bind(format!("{start}-{end}"));
            }
        }
        qb.push(" ORDER BY name");

        let rows = qb
            .build_query_as::<AlumniEntry>()
            .fetch_all(&mut *self.pool)
            .await?;
        Ok(rows)
    }
}
