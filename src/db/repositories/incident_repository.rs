use sqlx::PgPool;

use crate::db::models::{
    IncidentComment, IncidentReport, IncidentSeverity, IncidentStatus, IncidentType,
    ValidatedIncident,
};
use crate::db::{with_retry, DatabaseError};

/// Base column list for incident_reports (unjoined).
const INCIDENT_COLUMNS: &str = "id, user_id, incident_type, title, description, location, \
    incident_date, severity, status, reviewed_by, reviewed_at, resolution_notes, resolved_at, \
    created_at, updated_at";

/// Joined select used by list/detail: reporter and reviewer names come from
/// the users table.
const INCIDENT_JOINED_SELECT: &str = "SELECT
        ir.id, ir.user_id, ir.incident_type, ir.title, ir.description, ir.location,
        ir.incident_date, ir.severity, ir.status, ir.reviewed_by, ir.reviewed_at,
        ir.resolution_notes, ir.resolved_at, ir.created_at, ir.updated_at,
        u.full_name AS reporter_name,
        u.email AS reporter_email,
        r.full_name AS reviewer_name
     FROM incident_reports ir
     LEFT JOIN users u ON ir.user_id = u.id
     LEFT JOIN users r ON ir.reviewed_by = r.id";

/// Filters for the paginated incident listing. `user_id` scopes the list to
/// one reporter (applied for non-reviewer roles).
#[derive(Debug, Default)]
pub struct IncidentFilter {
    pub user_id: Option<i64>,
    pub status: Option<IncidentStatus>,
    pub severity: Option<IncidentSeverity>,
    pub incident_type: Option<IncidentType>,
}

impl IncidentFilter {
    /// WHERE clause with `$n` placeholders matching [`Self::bind`] order.
    fn where_clause(&self, prefix: &str) -> String {
        let mut conditions = Vec::new();
        let mut idx = 1;
        if self.user_id.is_some() {
            conditions.push(format!("{prefix}user_id = ${idx}"));
            idx += 1;
        }
        if self.status.is_some() {
            conditions.push(format!("{prefix}status = ${idx}"));
            idx += 1;
        }
        if self.severity.is_some() {
            conditions.push(format!("{prefix}severity = ${idx}"));
            idx += 1;
        }
        if self.incident_type.is_some() {
            conditions.push(format!("{prefix}incident_type = ${idx}"));
        }
        if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        }
    }

    /// Number of placeholders consumed by the filter.
    fn bind_count(&self) -> usize {
        [
            self.user_id.is_some(),
            self.status.is_some(),
            self.severity.is_some(),
            self.incident_type.is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count()
    }

    fn bind<'q, O>(
        &'q self,
        mut query: sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
    ) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
        if let Some(user_id) = self.user_id {
            query = query.bind(user_id);
        }
        if let Some(status) = self.status {
            query = query.bind(status);
        }
        if let Some(severity) = self.severity {
            query = query.bind(severity);
        }
        if let Some(incident_type) = self.incident_type {
            query = query.bind(incident_type);
        }
        query
    }

    fn bind_scalar<'q, O>(
        &'q self,
        mut query: sqlx::query::QueryScalar<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
    ) -> sqlx::query::QueryScalar<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
        if let Some(user_id) = self.user_id {
            query = query.bind(user_id);
        }
        if let Some(status) = self.status {
            query = query.bind(status);
        }
        if let Some(severity) = self.severity {
            query = query.bind(severity);
        }
        if let Some(incident_type) = self.incident_type {
            query = query.bind(incident_type);
        }
        query
    }
}

pub struct IncidentRepository;

impl IncidentRepository {
    /// Total number of incidents matching the filter (for the pagination
    /// envelope).
    pub async fn count(pool: &PgPool, filter: &IncidentFilter) -> Result<i64, DatabaseError> {
        let query = format!(
            "SELECT COUNT(*) FROM incident_reports{}",
            filter.where_clause("")
        );
        let total = with_retry(|| {
            filter
                .bind_scalar(sqlx::query_scalar::<_, i64>(&query))
                .fetch_one(pool)
        })
        .await?;
        Ok(total)
    }

    /// One page of incidents matching the filter, newest first.
    pub async fn list(
        pool: &PgPool,
        filter: &IncidentFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<IncidentReport>, DatabaseError> {
        let base = filter.bind_count();
        let query = format!(
            "{INCIDENT_JOINED_SELECT}{}
             ORDER BY ir.created_at DESC
             LIMIT ${} OFFSET ${}",
            filter.where_clause("ir."),
            base + 1,
            base + 2,
        );
        let incidents = with_retry(|| {
            filter
                .bind(sqlx::query_as::<_, IncidentReport>(&query))
                .bind(limit)
                .bind(offset)
                .fetch_all(pool)
        })
        .await?;
        Ok(incidents)
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: i64,
    ) -> Result<Option<IncidentReport>, DatabaseError> {
        let query = format!("{INCIDENT_JOINED_SELECT} WHERE ir.id = $1");
        let incident = with_retry(|| {
            sqlx::query_as::<_, IncidentReport>(&query)
                .bind(id)
                .fetch_optional(pool)
        })
        .await?;
        Ok(incident)
    }

    pub async fn create(
        pool: &PgPool,
        user_id: i64,
        incident: &ValidatedIncident,
    ) -> Result<IncidentReport, DatabaseError> {
        let query = format!(
            "INSERT INTO incident_reports
                (user_id, incident_type, title, description, location, incident_date, severity)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {INCIDENT_COLUMNS}"
        );
        let severity = incident.severity.unwrap_or(IncidentSeverity::Low);
        let created = with_retry(|| {
            sqlx::query_as::<_, IncidentReport>(&query)
                .bind(user_id)
                .bind(incident.incident_type)
                .bind(&incident.title)
                .bind(&incident.description)
                .bind(&incident.location)
                .bind(incident.incident_date)
                .bind(severity)
                .fetch_one(pool)
        })
        .await?;
        Ok(created)
    }

    /// Set the review status. Records the reviewer and review time, and
    /// stamps `resolved_at` when the incident reaches a final status. No
    /// transition is illegal.
    pub async fn update_status(
        pool: &PgPool,
        id: i64,
        status: IncidentStatus,
        resolution_notes: Option<&str>,
        reviewer_id: i64,
    ) -> Result<Option<IncidentReport>, DatabaseError> {
        let query = format!(
            "UPDATE incident_reports
             SET status = $1,
                 reviewed_by = $2,
                 reviewed_at = NOW(),
                 resolution_notes = COALESCE($3, resolution_notes),
                 resolved_at = CASE WHEN $4 THEN NOW() ELSE resolved_at END,
                 updated_at = NOW()
             WHERE id = $5
             RETURNING {INCIDENT_COLUMNS}"
        );
        let updated = with_retry(|| {
            sqlx::query_as::<_, IncidentReport>(&query)
                .bind(status)
                .bind(reviewer_id)
                .bind(resolution_notes)
                .bind(status.is_final())
                .bind(id)
                .fetch_optional(pool)
        })
        .await?;
        Ok(updated)
    }

    pub async fn list_comments(
        pool: &PgPool,
        incident_id: i64,
    ) -> Result<Vec<IncidentComment>, DatabaseError> {
        let comments = with_retry(|| {
            sqlx::query_as::<_, IncidentComment>(
                "SELECT ic.id, ic.incident_report_id, ic.user_id, ic.comment, ic.created_at,
                        u.full_name AS commenter_name
                 FROM incident_comments ic
                 LEFT JOIN users u ON ic.user_id = u.id
                 WHERE ic.incident_report_id = $1
                 ORDER BY ic.created_at ASC",
            )
            .bind(incident_id)
            .fetch_all(pool)
        })
        .await?;
        Ok(comments)
    }

    pub async fn add_comment(
        pool: &PgPool,
        incident_id: i64,
        user_id: i64,
        comment: &str,
    ) -> Result<IncidentComment, DatabaseError> {
        let created = with_retry(|| {
            sqlx::query_as::<_, IncidentComment>(
                "INSERT INTO incident_comments (incident_report_id, user_id, comment)
                 VALUES ($1, $2, $3)
                 RETURNING id, incident_report_id, user_id, comment, created_at",
            )
            .bind(incident_id)
            .bind(user_id)
            .bind(comment)
            .fetch_one(pool)
        })
        .await?;
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn where_clause_numbers_placeholders_in_bind_order() {
        let filter = IncidentFilter {
            user_id: Some(7),
            status: Some(IncidentStatus::Pending),
            severity: None,
            incident_type: Some(IncidentType::Injury),
        };
        assert_eq!(
            filter.where_clause("ir."),
            " WHERE ir.user_id = $1 AND ir.status = $2 AND ir.incident_type = $3"
        );
        assert_eq!(filter.bind_count(), 3);
    }

    #[test]
    fn empty_filter_has_no_where_clause() {
        let filter = IncidentFilter::default();
        assert_eq!(filter.where_clause(""), "");
        assert_eq!(filter.bind_count(), 0);
    }
}
