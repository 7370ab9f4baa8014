use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

pub const ALUMNI_COLUMNS: &str = "id, name, email, mobile_number, company, job_role, job_id, \
    batch, institute_id, linkedin, created_at, updated_at";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AlumniEntry {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "Email", alias = "email")]
    pub email: Option<String>,
    #[serde(rename = "MobileNumber", alias = "mobileNumber")]
    pub mobile_number: Option<String>,
    pub company: Option<String>,
    pub job_role: Option<String>,
    pub job_id: Option<String>,
    pub batch: Option<String>,
    #[serde(rename = "InstituteId", alias = "instituteId")]
    pub institute_id: Option<String>,
    pub linkedin: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AlumniFields {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    #[serde(rename = "Email", alias = "email")]
    pub email: Option<String>,
    #[serde(rename = "MobileNumber", alias = "mobileNumber")]
    pub mobile_number: Option<String>,
    pub company: Option<String>,
    pub job_role: Option<String>,
    pub job_id: Option<String>,
    pub batch: Option<String>,
    #[serde(rename = "InstituteId", alias = "instituteId")]
    pub institute_id: Option<String>,
    #[validate(url(message = "Invalid LinkedIn url"))]
    pub linkedin: Option<String>,
}

impl AlumniFields {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.mobile_number.is_none()
            && self.company.is_none()
            && self.job_role.is_none()
            && self.job_id.is_none()
            && self.batch.is_none()
            && self.institute_id.is_none()
            && self.linkedin.is_none()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn fields_accept_frontend_and_camel_case_keys() {
        let fields: AlumniFields = serde_json::from_value(json!({
            "name": "Meera",
            "Email": "meera@acme.com",
            "MobileNumber": "9876543210",
            "instituteId": "12040510",
            "jobRole": "SDE II"
        }))
        .expect("alumni payload");
        assert_eq!(fields.email.as_deref(), Some("meera@acme.com"));
        assert_eq!(fields.mobile_number.as_deref(), Some("9876543210"));
        assert_eq!(fields.institute_id.as_deref(), Some("12040510"));
        assert!(fields.validate().is_ok());
        assert!(!fields.is_empty());
        assert!(AlumniFields::default().is_empty());
    }

    #[test]
    fn entry_serializes_with_frontend_keys() {
        let now = Utc::now();
        let alumni = AlumniEntry {
            id: Uuid::new_v4(),
            name: "Meera".into(),
            email: Some("meera@acme.com".into()),
            mobile_number: Some("9876543210".into()),
            company: Some("Acme".into()),
            job_role: None,
            job_id: None,
            batch: Some("2018-2022".into()),
            institute_id: Some("12040510".into()),
            linkedin: None,
            created_at: now,
            updated_at: now,
        };
        let value = serde_json::to_value(&alumni).expect("serializable alumni");
        assert_eq!(value["_id"], json!(alumni.id));
        assert_eq!(value["Email"], "meera@acme.com");
        assert_eq!(value["MobileNumber"], "9876543210");
        assert_eq!(value["InstituteId"], "12040510");
        assert_eq!(value["company"], "Acme");
    }
}
