use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Workflow status of a public incident report.
///
/// The ordering is advisory only: any update may set any of the four values,
/// including re-setting the current one. `Aman` is conventionally final but
/// stays mutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    BelumDicek,
    BelumDitangani,
    DalamPenangan,
    Aman,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::BelumDicek => "belum_dicek",
            ReportStatus::BelumDitangani => "belum_ditangani",
            ReportStatus::DalamPenangan => "dalam_penangan",
            ReportStatus::Aman => "aman",
        }
    }

    /// Map a client-supplied status to the persisted vocabulary. Anything
    /// outside the four public labels falls back to `belum_dicek`, so the
    /// column never holds an unknown value.
    pub fn from_client(label: &str) -> Self {
        match label {
            "belum_dicek" => ReportStatus::BelumDicek,
            "belum_ditangani" => ReportStatus::BelumDitangani,
            "dalam_penangan" => ReportStatus::DalamPenangan,
            "aman" => ReportStatus::Aman,
            _ => ReportStatus::BelumDicek,
        }
    }

    /// Map a stored status label to the public vocabulary. Rows written by
    /// the legacy incident subsystem carry its labels; the bridge is one-way
    /// (legacy to public) and unknown labels degrade to `belum_dicek`.
    pub fn from_db_label(label: &str) -> Self {
        match label {
            "belum_dicek" => ReportStatus::BelumDicek,
            "belum_ditangani" => ReportStatus::BelumDitangani,
            "dalam_penangan" => ReportStatus::DalamPenangan,
            "aman" => ReportStatus::Aman,
            "pending" => ReportStatus::BelumDicek,
            "under_review" => ReportStatus::DalamPenangan,
            "resolved" => ReportStatus::Aman,
            "closed" => ReportStatus::Aman,
            _ => ReportStatus::BelumDicek,
        }
    }
}

/// Severity of a public incident report: ringan (light) < sedang (medium)
/// < berat (heavy).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Ringan,
    Sedang,
    Berat,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Ringan => "ringan",
            Severity::Sedang => "sedang",
            Severity::Berat => "berat",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        match label.to_lowercase().as_str() {
            "ringan" => Some(Severity::Ringan),
            "sedang" => Some(Severity::Sedang),
            "berat" => Some(Severity::Berat),
            _ => None,
        }
    }

    /// Numeric rank used for severity sorting: ringan=1, sedang=2, berat=3.
    pub fn rank(&self) -> i32 {
        match self {
            Severity::Ringan => 1,
            Severity::Sedang => 2,
            Severity::Berat => 3,
        }
    }
}

/// Infer severity from the report title. Case-insensitive substring checks
/// in fixed order; the first match wins, so "berat" takes precedence when a
/// title contains both "berat" and "ringan".
pub fn infer_severity(title: &str) -> Severity {
    let title = title.to_lowercase();
    if title.contains("berat") {
        Severity::Berat
    } else if title.contains("ringan") {
        Severity::Ringan
    } else if title.contains("kecelakaan") || title.contains("tunggal") {
        Severity::Sedang
    } else {
        Severity::Ringan
    }
}

/// Resolve the severity of a new report. An explicitly supplied value that
/// names one of the three severities is used verbatim; anything else (absent
/// or unknown) falls back to title inference.
pub fn resolve_severity(explicit: Option<&str>, title: &str) -> Severity {
    explicit
        .and_then(Severity::parse)
        .unwrap_or_else(|| infer_severity(title))
}

/// Severity rank for list sorting. Derived from the stored severity when it
/// names a known value; otherwise re-derived from a keyword scan over title
/// and description. The fallback here is `sedang`, not the creation-time
/// default of `ringan`.
pub fn sort_rank(severity: &str, title: &str, description: &str) -> i32 {
    if let Some(known) = Severity::parse(severity) {
        return known.rank();
    }
    let haystack = format!("{} {}", title, description).to_lowercase();
    if haystack.contains("berat") {
        Severity::Berat.rank()
    } else if haystack.contains("ringan") {
        Severity::Ringan.rank()
    } else {
        Severity::Sedang.rank()
    }
}

/// Validation failures for report submissions. Each variant carries the
/// exact message surfaced to the caller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReportValidationError {
    #[error("Title, description, location, and date are required")]
    MissingFields,

    #[error("Invalid date format")]
    InvalidDateFormat,

    #[error("Image too large. Maximum size is 10MB.")]
    ImageTooLarge,
}

/// Parse an incident date supplied as `DD/MM/YYYY` or ISO `YYYY-MM-DD`.
pub fn parse_incident_date(raw: &str) -> Result<NaiveDate, ReportValidationError> {
    let iso = if raw.contains('/') {
        let mut parts = raw.splitn(3, '/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(day), Some(month), Some(year)) => format!("{}-{}-{}", year, month, day),
            _ => return Err(ReportValidationError::InvalidDateFormat),
        }
    } else {
        raw.to_string()
    };
    NaiveDate::parse_from_str(&iso, "%Y-%m-%d")
        .map_err(|_| ReportValidationError::InvalidDateFormat)
}

/// One stored incident report. `status` and `severity` are kept as raw
/// column text; the typed vocabulary is applied when building responses.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Report {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub location: String,
    pub incident_date: NaiveDate,
    pub severity: String,
    pub status: String,
    pub jenis_insiden: Option<String>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public report submission, before validation. All fields optional so that
/// missing ones are aggregated into a single error instead of a serde reject.
#[derive(Debug, Deserialize)]
pub struct NewReport {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    /// Clients send this as `date`; either DD/MM/YYYY or ISO YYYY-MM-DD.
    #[serde(alias = "date")]
    pub incident_date: Option<String>,
    pub severity: Option<String>,
    pub jenis_insiden: Option<String>,
    pub image: Option<String>,
}

/// A fully validated report submission, ready to insert.
#[derive(Debug)]
pub struct ValidatedReport {
    pub title: String,
    pub description: String,
    pub location: String,
    pub incident_date: NaiveDate,
    pub severity: Severity,
    pub jenis_insiden: Option<String>,
    pub image: Option<String>,
}

impl NewReport {
    /// Boundary validation: required fields, date format, severity
    /// resolution, and the encoded-image cap. Runs before any datastore
    /// call so a rejected submission leaves no partial writes.
    pub fn validate(self, max_image_chars: usize) -> Result<ValidatedReport, ReportValidationError> {
        let (title, description, location, incident_date) = match (
            self.title,
            self.description,
            self.location,
            self.incident_date,
        ) {
            (Some(t), Some(d), Some(l), Some(i))
                if !t.is_empty() && !d.is_empty() && !l.is_empty() && !i.is_empty() =>
            {
                (t, d, l, i)
            }
            _ => return Err(ReportValidationError::MissingFields),
        };

        let incident_date = parse_incident_date(&incident_date)?;
        let severity = resolve_severity(self.severity.as_deref(), &title);

        if let Some(ref image) = self.image {
            if image.len() > max_image_chars {
                return Err(ReportValidationError::ImageTooLarge);
            }
        }

        Ok(ValidatedReport {
            title,
            description,
            location,
            incident_date,
            severity,
            jenis_insiden: self.jenis_insiden,
            image: self.image,
        })
    }
}

/// Status update payload for `PUT /reports/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateReportStatus {
    pub status: String,
}

/// Decorated report returned to consumers: mapped status, display date, and
/// a self-describing image data-URI.
#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub id: i64,
    pub title: String,
    pub date: String,
    pub description: String,
    pub location: String,
    pub jenis_insiden: Option<String>,
    pub severity: String,
    pub status: ReportStatus,
    pub image: Option<String>,
    /// Raw stored status label, kept for consumers that write updates back.
    pub status_db: String,
}

impl ReportResponse {
    pub fn from_report(report: Report) -> Self {
        Self {
            id: report.id,
            title: report.title,
            date: display_date(report.incident_date),
            description: report.description,
            location: report.location,
            jenis_insiden: report.jenis_insiden,
            severity: report.severity.clone(),
            status: ReportStatus::from_db_label(&report.status),
            image: report.image.map(|img| image_data_uri(&img)),
            status_db: report.status,
        }
    }
}

/// Format an incident date for display, e.g. "15 January 2025".
pub fn display_date(date: NaiveDate) -> String {
    date.format("%d %B %Y").to_string()
}

/// Decorate a stored image payload with a data-URI prefix. The source MIME
/// type is not tracked, so bare base64 is assumed to be JPEG.
pub fn image_data_uri(stored: &str) -> String {
    if stored.starts_with("data:image") {
        stored.to_string()
    } else {
        format!("data:image/jpeg;base64,{}", stored)
    }
}
