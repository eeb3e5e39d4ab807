use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use entity::bug::BugStatus;
use serde::{Deserialize, Serialize};

use crate::types::error::AppError;

pub const BUG_TITLE_MAX_LEN: usize = 200;

/// Text fields of the multipart bug form, as they arrive.
#[derive(Debug, Default, Clone)]
pub struct RBugForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub start_date: Option<String>,
    pub due_date: Option<String>,
    pub estimated_hours: Option<String>,
}

/// A validated bug submission.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBug {
    pub title: String,
    pub description: String,
    pub status: BugStatus,
    pub start_date: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
    pub estimated_hours: Option<i32>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RBugUpdate {
    pub status: BugStatus,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct BugCreateRes {
    pub bug: entity::bug::Model,
    pub bugs_remaining: i32,
}

impl RBugForm {
    pub fn set(&mut self, name: &str, value: String) {
        let slot = match name {
            "title" => &mut self.title,
            "description" => &mut self.description,
            "status" => &mut self.status,
            "start_date" => &mut self.start_date,
            "due_date" => &mut self.due_date,
            "estimated_hours" => &mut self.estimated_hours,
            _ => return,
        };
        *slot = Some(value);
    }

    pub fn validate(self) -> Result<NewBug, AppError> {
        let title = self.title.as_deref().map(str::trim).unwrap_or_default();
        if title.is_empty() || title.chars().count() > BUG_TITLE_MAX_LEN {
            return Err(AppError::Validation(format!(
                "title must be 1 to {BUG_TITLE_MAX_LEN} characters"
            )));
        }

        let status = match non_blank(self.status.as_deref()) {
            None => BugStatus::Open,
            Some(s) => parse_status(s)?,
        };

        let start_date = non_blank(self.start_date.as_deref())
            .map(|s| parse_datetime("start_date", s))
            .transpose()?;
        let due_date = non_blank(self.due_date.as_deref())
            .map(|s| parse_datetime("due_date", s))
            .transpose()?;
        if let (Some(start), Some(due)) = (start_date, due_date) {
            if due < start {
                return Err(AppError::Validation("due_date is before start_date".to_string()));
            }
        }

        let estimated_hours = match non_blank(self.estimated_hours.as_deref()) {
            None => None,
            Some(s) => match s.parse::<i32>() {
                Ok(h) if h >= 0 => Some(h),
                _ => {
                    return Err(AppError::Validation(
                        "estimated_hours must be a non-negative integer".to_string(),
                    ))
                }
            },
        };

        Ok(NewBug {
            title: title.to_string(),
            description: self.description.unwrap_or_default(),
            status,
            start_date,
            due_date,
            estimated_hours,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

pub fn parse_status(value: &str) -> Result<BugStatus, AppError> {
    match value {
        "Open" | "open" => Ok(BugStatus::Open),
        "Closed" | "closed" => Ok(BugStatus::Closed),
        other => Err(AppError::Validation(format!("unknown status {other:?}"))),
    }
}

/// Accepts RFC 3339, HTML `datetime-local` (`2025-10-01T09:30`) or a bare date.
pub fn parse_datetime(field: &str, value: &str) -> Result<DateTime<Utc>, AppError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, fmt) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(naive.and_utc());
        }
    }
    Err(AppError::Validation(format!("{field} is not a valid date")))
}
