use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

use super::report::ReportStatus;

/// Status vocabulary of the legacy incident subsystem. Independent from the
/// public report workflow; the two are bridged by a one-way display-label
/// translation only and are never merged at the data level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum IncidentStatus {
    Pending,
    UnderReview,
    Resolved,
    Closed,
}

impl IncidentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncidentStatus::Pending => "pending",
            IncidentStatus::UnderReview => "under_review",
            IncidentStatus::Resolved => "resolved",
            IncidentStatus::Closed => "closed",
        }
    }

    /// Closed-out incidents get a resolution timestamp.
    pub fn is_final(&self) -> bool {
        matches!(self, IncidentStatus::Resolved | IncidentStatus::Closed)
    }

    /// One-way translation into the public report vocabulary, used purely
    /// for display. There is deliberately no inverse.
    pub fn as_public_label(&self) -> ReportStatus {
        ReportStatus::from_db_label(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum IncidentSeverity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum IncidentType {
    NearMiss,
    Injury,
    PropertyDamage,
    UnsafeCondition,
    UnsafeBehavior,
    Other,
}

/// One legacy incident report, joined with reporter/reviewer names for
/// display.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct IncidentReport {
    pub id: i64,
    pub user_id: i64,
    pub incident_type: IncidentType,
    pub title: String,
    pub description: String,
    pub location: String,
    pub incident_date: NaiveDate,
    pub severity: IncidentSeverity,
    pub status: IncidentStatus,
    pub reviewed_by: Option<i64>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub resolution_notes: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    // Joined display fields; absent on RETURNING rows.
    #[sqlx(default)]
    pub reporter_name: Option<String>,
    #[sqlx(default)]
    pub reporter_email: Option<String>,
    #[sqlx(default)]
    pub reviewer_name: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct IncidentComment {
    pub id: i64,
    pub incident_report_id: i64,
    pub user_id: i64,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    #[sqlx(default)]
    pub commenter_name: Option<String>,
}

/// Incident submission before validation. Like report submissions, fields
/// are optional so missing ones aggregate into one 400 instead of a
/// deserialization reject.
#[derive(Debug, Deserialize)]
pub struct NewIncident {
    pub incident_type: Option<IncidentType>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub incident_date: Option<NaiveDate>,
    pub severity: Option<IncidentSeverity>,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Validation failed: {0}")]
pub struct IncidentValidationError(String);

#[derive(Debug)]
pub struct ValidatedIncident {
    pub incident_type: IncidentType,
    pub title: String,
    pub description: String,
    pub location: String,
    pub incident_date: NaiveDate,
    pub severity: Option<IncidentSeverity>,
}

impl NewIncident {
    pub fn validate(self) -> Result<ValidatedIncident, IncidentValidationError> {
        let mut problems = Vec::new();
        if self.incident_type.is_none() {
            problems.push("Incident type is required");
        }
        if self.title.as_deref().map_or(true, str::is_empty) {
            problems.push("Title is required");
        }
        if self.description.as_deref().map_or(true, str::is_empty) {
            problems.push("Description is required");
        }
        if self.location.as_deref().map_or(true, str::is_empty) {
            problems.push("Location is required");
        }
        if self.incident_date.is_none() {
            problems.push("Incident date is required");
        }

        match (
            self.incident_type,
            self.title,
            self.description,
            self.location,
            self.incident_date,
        ) {
            (Some(incident_type), Some(title), Some(description), Some(location), Some(date))
                if problems.is_empty() =>
            {
                Ok(ValidatedIncident {
                    incident_type,
                    title,
                    description,
                    location,
                    incident_date: date,
                    severity: self.severity,
                })
            }
            _ => Err(IncidentValidationError(problems.join(", "))),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateIncidentStatus {
    pub status: IncidentStatus,
    pub resolution_notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewIncidentComment {
    #[validate(length(min = 1, message = "Comment is required"))]
    pub comment: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_labels_translate_to_public_vocabulary() {
        assert_eq!(
            IncidentStatus::Pending.as_public_label(),
            ReportStatus::BelumDicek
        );
        assert_eq!(
            IncidentStatus::UnderReview.as_public_label(),
            ReportStatus::DalamPenangan
        );
        assert_eq!(IncidentStatus::Resolved.as_public_label(), ReportStatus::Aman);
        assert_eq!(IncidentStatus::Closed.as_public_label(), ReportStatus::Aman);
    }

    fn submission() -> NewIncident {
        NewIncident {
            incident_type: Some(IncidentType::NearMiss),
            title: Some("Hampir terjatuh".to_string()),
            description: Some("Tangga tanpa pegangan".to_string()),
            location: Some("Lantai 3".to_string()),
            incident_date: NaiveDate::from_ymd_opt(2025, 2, 10),
            severity: None,
        }
    }

    #[test]
    fn valid_submission_passes() {
        let validated = submission().validate().unwrap();
        assert_eq!(validated.incident_type, IncidentType::NearMiss);
        assert!(validated.severity.is_none());
    }

    #[test]
    fn missing_title_answers_with_a_message_not_a_reject() {
        let mut new = submission();
        new.title = None;
        assert_eq!(
            new.validate().unwrap_err().to_string(),
            "Validation failed: Title is required"
        );
    }

    #[test]
    fn missing_fields_aggregate_into_one_message() {
        let mut new = submission();
        new.incident_type = None;
        new.location = Some(String::new());
        new.incident_date = None;
        assert_eq!(
            new.validate().unwrap_err().to_string(),
            "Validation failed: Incident type is required, Location is required, \
             Incident date is required"
        );
    }

    #[test]
    fn only_resolved_and_closed_are_final() {
        assert!(IncidentStatus::Resolved.is_final());
        assert!(IncidentStatus::Closed.is_final());
        assert!(!IncidentStatus::Pending.is_final());
        assert!(!IncidentStatus::UnderReview.is_final());
    }
}
