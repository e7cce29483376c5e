use sqlx::PgPool;

use crate::db::models::{Report, ReportStatus, ValidatedReport};
use crate::db::{with_retry, DatabaseError};

/// Column list for reports queries.
const REPORT_COLUMNS: &str = "id, title, description, location, incident_date, severity, \
    status, jenis_insiden, image, created_at, updated_at";

pub struct ReportRepository;

impl ReportRepository {
    /// Insert a new report. The initial status is always `belum_dicek`;
    /// severity has already been resolved by validation.
    pub async fn create(pool: &PgPool, report: &ValidatedReport) -> Result<Report, DatabaseError> {
        let query = format!(
            "INSERT INTO reports
                (title, description, location, incident_date, severity, jenis_insiden, image, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {REPORT_COLUMNS}"
        );
        let created = with_retry(|| {
            sqlx::query_as::<_, Report>(&query)
                .bind(&report.title)
                .bind(&report.description)
                .bind(&report.location)
                .bind(report.incident_date)
                .bind(report.severity.as_str())
                .bind(&report.jenis_insiden)
                .bind(&report.image)
                .bind(ReportStatus::BelumDicek.as_str())
                .fetch_one(pool)
        })
        .await?;
        Ok(created)
    }

    /// All reports, newest first. The public path does not paginate.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Report>, DatabaseError> {
        let query = format!("SELECT {REPORT_COLUMNS} FROM reports ORDER BY created_at DESC");
        let reports = with_retry(|| sqlx::query_as::<_, Report>(&query).fetch_all(pool)).await?;
        Ok(reports)
    }

    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Report>, DatabaseError> {
        let query = format!("SELECT {REPORT_COLUMNS} FROM reports WHERE id = $1");
        let report = with_retry(|| {
            sqlx::query_as::<_, Report>(&query)
                .bind(id)
                .fetch_optional(pool)
        })
        .await?;
        Ok(report)
    }

    /// Set the status of a report. Any of the four values is legal from any
    /// current value; `updated_at` is refreshed. Returns `None` when the id
    /// does not exist.
    pub async fn update_status(
        pool: &PgPool,
        id: i64,
        status: ReportStatus,
    ) -> Result<Option<Report>, DatabaseError> {
        let query = format!(
            "UPDATE reports
             SET status = $1, updated_at = NOW()
             WHERE id = $2
             RETURNING {REPORT_COLUMNS}"
        );
        let report = with_retry(|| {
            sqlx::query_as::<_, Report>(&query)
                .bind(status.as_str())
                .bind(id)
                .fetch_optional(pool)
        })
        .await?;
        Ok(report)
    }

    /// Hard delete. Returns whether a row was removed.
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, DatabaseError> {
        let result = with_retry(|| {
            sqlx::query("DELETE FROM reports WHERE id = $1")
                .bind(id)
                .execute(pool)
        })
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
