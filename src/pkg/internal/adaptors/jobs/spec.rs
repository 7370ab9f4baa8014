use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

pub const JOB_COLUMNS: &str = "id, job_title, job_description, company, required_skills, job_type, \
    batch, deadline, application_link, expiry, author, relevance_score, upvoted_by, downvoted_by, \
    created_at, updated_at";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JobEntry {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub job_title: String,
    pub job_description: String,
    #[serde(rename = "Company", alias = "company")]
    pub company: String,
    pub required_skills: Vec<String>,
    #[serde(rename = "Type", alias = "jobType")]
    pub job_type: String,
    pub batch: String,
    #[serde(rename = "Deadline", alias = "deadline")]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(rename = "ApplicationLink", alias = "applicationLink")]
    pub application_link: Option<String>,
    #[serde(rename = "Expiry", alias = "expiry")]
    pub expiry: Option<DateTime<Utc>>,
    pub author: Option<Uuid>,
    pub relevance_score: i32,
    pub upvoted_by: Vec<Uuid>,
    pub downvoted_by: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    #[validate(length(min = 1, message = "Job title cannot be empty"))]
    pub job_title: String,
    #[validate(length(min = 1, message = "Job description cannot be empty"))]
    pub job_description: String,
    #[validate(length(min = 1, message = "Company cannot be empty"))]
    #[serde(rename = "Company", alias = "company")]
    pub company: String,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[validate(length(min = 1, message = "Job type cannot be empty"))]
    #[serde(rename = "Type", alias = "jobType")]
    pub job_type: String,
    #[serde(default)]
    pub batch: String,
    #[serde(rename = "Deadline", alias = "deadline")]
    pub deadline: Option<DateTime<Utc>>,
    #[validate(url(message = "Invalid application link"))]
    #[serde(rename = "ApplicationLink", alias = "applicationLink")]
    pub application_link: Option<String>,
    #[serde(rename = "Expiry", alias = "expiry")]
    pub expiry: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct JobPatch {
    #[validate(length(min = 1, message = "Job title cannot be empty"))]
    pub job_title: Option<String>,
    #[validate(length(min = 1, message = "Job description cannot be empty"))]
    pub job_description: Option<String>,
    #[validate(length(min = 1, message = "Company cannot be empty"))]
    #[serde(rename = "Company", alias = "company")]
    pub company: Option<String>,
    pub required_skills: Option<Vec<String>>,
    #[validate(length(min = 1, message = "Job type cannot be empty"))]
    #[serde(rename = "Type", alias = "jobType")]
    pub job_type: Option<String>,
    pub batch: Option<String>,
    #[serde(rename = "Deadline", alias = "deadline")]
    pub deadline: Option<DateTime<Utc>>,
    #[validate(url(message = "Invalid application link"))]
    #[serde(rename = "ApplicationLink", alias = "applicationLink")]
    pub application_link: Option<String>,
    #[serde(rename = "Expiry", alias = "expiry")]
    pub expiry: Option<DateTime<Utc>>,
}

impl JobPatch {
    pub fn is_empty(&self) -> bool {
        self.job_title.is_none()
            && self.job_description.is_none()
            && self.company.is_none()
            && self.required_skills.is_none()
            && self.job_type.is_none()
            && self.batch.is_none()
            && self.deadline.is_none()
            && self.application_link.is_none()
            && self.expiry.is_none()
    }
}
