use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::pkg::internal::adaptors::jobs::spec::JobEntry;

#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SavedJobEntry {
    #[sqlx(rename = "saved_id")]
    pub id: Uuid,
    pub saved_at: DateTime<Utc>,
    #[sqlx(flatten)]
    pub job: JobEntry,
}
