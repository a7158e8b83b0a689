//! Translation jobs: the domain model and the lifecycle manager.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::job_repo::JobRow;
use crate::db::DatabaseError;
use crate::language::Language;

pub mod manager;
pub mod status;

pub use manager::JobLifecycleManager;
pub use status::JobStatus;

pub(crate) fn parse_timestamp(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|e| {
            log::warn!("parse_timestamp: failed to parse '{}': {}", s, e);
            Utc::now()
        })
}

pub(crate) fn format_timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

/// A single request to translate one uploaded media file into one
/// target language.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationJob {
    /// Unique job identifier.
    pub id: String,
    /// Owning account. Set at creation, never re-pointed.
    pub account_id: String,
    /// Filename as uploaded by the client.
    pub original_filename: String,
    /// Opaque handle into media storage.
    pub file_handle: String,
    /// Target language. `None` exactly while status is `uploaded`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_language: Option<Language>,
    /// Current lifecycle status.
    pub status: JobStatus,
    /// Id assigned by the external provider on submission.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_job_id: Option<String>,
    /// Failure reason (if failed).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// When the job was created.
    pub created_at: DateTime<Utc>,
    /// When the job was last updated.
    pub updated_at: DateTime<Utc>,
    /// When the job reached a terminal state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl TranslationJob {
    /// Builds a domain job from a database row.
    ///
    /// Status and language come from closed sets; a row outside them is
    /// reported as corrupt rather than silently coerced.
    pub fn from_job_row(row: &JobRow) -> Result<Self, DatabaseError> {
        let status = JobStatus::parse(&row.status).ok_or_else(|| DatabaseError::CorruptRow {
            table: "jobs",
            id: row.id.clone(),
            reason: format!("unknown status '{}'", row.status),
        })?;

        let target_language = match row.target_language.as_deref() {
            Some(code) => Some(Language::parse(code).ok_or_else(|| DatabaseError::CorruptRow {
                table: "jobs",
                id: row.id.clone(),
                reason: format!("unknown target language '{}'", code),
            })?),
            None => None,
        };

        Ok(Self {
            id: row.id.clone(),
            account_id: row.account_id.clone(),
            original_filename: row.original_filename.clone(),
            file_handle: row.file_handle.clone(),
            target_language,
            status,
            provider_job_id: row.provider_job_id.clone(),
            error: row.error.clone(),
            created_at: parse_timestamp(&row.created_at),
            updated_at: parse_timestamp(&row.updated_at),
            completed_at: row.completed_at.as_deref().map(parse_timestamp),
        })
    }

    /// Returns true if this job is finished (completed or failed).
    pub fn is_finished(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Query parameters for job listing.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobQueryParams {
    pub status: Option<String>,
    pub account_id: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// Response for job listing with pagination.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobListPage {
    pub jobs: Vec<TranslationJob>,
    pub total: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
}
