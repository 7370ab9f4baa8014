use std::str::FromStr;

use crate::prelude::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Company,
    JobRole,
    JobId,
    Batch,
    Name,
}

impl FromStr for SearchField {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "company" => Ok(SearchField::Company),
            "jobRole" => Ok(SearchField::JobRole),
            "jobId" => Ok(SearchField::JobId),
            "batch" => Ok(SearchField::Batch),
            "name" => Ok(SearchField::Name),
            other => Err(AppError::bad_request(format!(
                "Invalid search type '{other}'. Must be one of company, jobRole, jobId, batch, name"
            ))),
        }
    }
}

/// A graduation cohort as typed into the search box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchQuery {
    Year(u16),
    Range(u16, u16),
}

impl FromStr for BatchQuery {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || AppError::bad_request("Batch must look like 2022 or 2022-2026");
        let year = |part: &str| -> Result<u16> {
            let part = part.trim();
            if part.len() != 4 || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            part.parse::<u16>().map_err(|_| invalid())
        };
        match s.split_once('-') {
            None => Ok(BatchQuery::Year(year(s)?)),
            Some((start, end)) => {
                let (start, end) = (year(start)?, year(end)?);
                if start > end {
                    return Err(invalid());
                }
                Ok(BatchQuery::Range(start, end))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlumniFilter {
    /// Case-insensitive substring match on a text column.
    Contains {
        column: &'static str,
        pattern: String,
    },
    JobId(String),
    Batch(BatchQuery),
}

impl AlumniFilter {
    pub fn parse(kind: &str, value: &str) -> Result<Self> {
        let field: SearchField = kind.parse()?;
        let value = value.trim();
        if value.is_empty() {
            return Err(AppError::bad_request("Search value is required"));
        }
        let filter = match field {
            SearchField::Company => AlumniFilter::contains("company", value),
            SearchField::JobRole => AlumniFilter::contains("job_role", value),
            SearchField::Name => AlumniFilter::contains("name", value),
            SearchField::JobId => AlumniFilter::JobId(value.to_string()),
            SearchField::Batch => AlumniFilter::Batch(value.parse()?),
        };
        Ok(filter)
    }

    fn contains(column: &'static str, value: &str) -> Self {
        AlumniFilter::Contains {
            column,
            pattern: format!("%{}%", escape_like(value)),
        }
    }
}

/// Escapes `%`, `_` and `\` so user input matches literally under `LIKE`.
pub fn escape_like(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_text_searches_into_escaped_patterns() -> Result<()> {
        assert_eq!(
            AlumniFilter::parse("company", "  Google ")?,
            AlumniFilter::Contains {
                column: "company",
                pattern: "%Google%".into()
            }
        );
        assert_eq!(
            AlumniFilter::parse("jobRole", "50%_off")?,
            AlumniFilter::Contains {
                column: "job_role",
                pattern: r"%50\%\_off%".into()
            }
        );
        assert_eq!(
            AlumniFilter::parse("jobId", "JD-1042")?,
            AlumniFilter::JobId("JD-1042".into())
        );
        Ok(())
    }

    #[test]
    fn parses_batch_years_and_ranges() -> Result<()> {
        assert_eq!(
            AlumniFilter::parse("batch", "2022")?,
            AlumniFilter::Batch(BatchQuery::Year(2022))
        );
        assert_eq!(
            AlumniFilter::parse("batch", "2022-2026")?,
            AlumniFilter::Batch(BatchQuery::Range(2022, 2026))
        );
        assert!(AlumniFilter::parse("batch", "22").is_err());
        assert!(AlumniFilter::parse("batch", "2026-2022").is_err());
        assert!(AlumniFilter::parse("batch", "twenty").is_err());
        assert!(AlumniFilter::parse("batch", "+202").is_err());
        assert!(AlumniFilter::parse("batch", "2022-+202").is_err());
        Ok(())
    }

    #[test]
    fn rejects_unknown_fields_and_blank_values() {
        let err = AlumniFilter::parse("salary", "100").unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        let err = AlumniFilter::parse("name", "   ").unwrap_err();
        assert_eq!(err.to_string(), "Search value is required");
    }

    #[test]
    fn escape_like_leaves_plain_text_alone() {
        assert_eq!(escape_like("Software Engineer"), "Software Engineer");
        assert_eq!(escape_like(r"a\b"), r"a\\b");
    }
}
