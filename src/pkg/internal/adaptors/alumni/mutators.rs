use sqlx::{PgConnection, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    pkg::internal::adaptors::alumni::spec::{ALUMNI_COLUMNS, AlumniEntry, AlumniFields},
    prelude::{AppError, Result},
};

pub struct AlumniMutator<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> AlumniMutator<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        AlumniMutator { pool }
    }

    pub async fn create(&mut self, alumni: AlumniFields) -> Result<AlumniEntry> {
        let name = alumni
            .name
            .ok_or_else(|| AppError::bad_request("Name is required"))?;
        let row = sqlx::query_as::<_, AlumniEntry>(&format!(
            r#"
            INSERT INTO alumni (id, name, email, mobile_number, company, job_role, job_id,
                batch, institute_id, linkedin)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {ALUMNI_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(alumni.email)
        .bind(alumni.mobile_number)
        .bind(alumni.company)
        .bind(alumni.job_role)
        .bind(alumni.job_id)
        .bind(alumni.batch)
        .bind(alumni.institute_id)
        .bind(alumni.linkedin)
        .fetch_one(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn update(&mut self, id: Uuid, alumni: AlumniFields) -> Result<Option<AlumniEntry>> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE alumni SET updated_at = now()");
        let columns = [
            ("name", alumni.name),
            ("email", alumni.email),
            ("mobile_number", alumni.mobile_number),
            ("company", alumni.company),
            ("job_role", alumni.job_role),
            ("job_id", alumni.job_id),
            ("batch", alumni.batch),
            ("institute_id", alumni.institute_id),
            ("linkedin", alumni.linkedin),
        ];
        for (column, value) in columns {
            if let Some(value) = value {
                qb.push(", ").push(column).push(" = ").push_bind(value);
            }
        }
        qb.push(" WHERE id = ")
            .push_bind(id)
            .push(" RETURNING ")
            .push(ALUMNI_COLUMNS);

        let row = qb
            .build_query_as::<AlumniEntry>()
            .fetch_optional(&mut *self.pool)
            .await?;
        Ok(row)
    }

    pub async fn delete(&mut self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM alumni WHERE id = $1")
            .bind(id)
            .execute(&mut *self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
