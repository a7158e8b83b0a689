//! Job lifecycle manager.
//!
//! The only component with business logic: it validates and applies status
//! transitions, owns the provider submission, and guarantees at most one
//! successful submission per job. Every transition goes through the job
//! repo's conditional updates. Under concurrent callers, the affected-row
//! count decides who wins, and the loser observes the job's actual status.

use std::sync::Arc;

use chrono::Utc;
use log::{info, warn};

use super::{format_timestamp, JobListPage, JobQueryParams, JobStatus, TranslationJob};
use crate::db::job_repo::{self, JobFilter, JobRow};
use crate::db::{account_repo, Database};
use crate::error::LifecycleError;
use crate::language::Language;
use crate::provider::{ProviderOutcome, TranslationProvider};

pub struct JobLifecycleManager {
    db: Database,
    provider: Arc<dyn TranslationProvider>,
}

impl JobLifecycleManager {
    pub fn new(db: Database, provider: Arc<dyn TranslationProvider>) -> Self {
        Self { db, provider }
    }

    /// The provider this manager submits to.
    pub fn provider(&self) -> &Arc<dyn TranslationProvider> {
        &self.provider
    }

    /// Registers a successfully stored upload as a new job in `uploaded`.
    ///
    /// No provider call happens here; translation starts only on an
    /// explicit request.
    pub fn register_upload(
        &self,
        account_id: &str,
        file_handle: &str,
        original_filename: &str,
    ) -> Result<TranslationJob, LifecycleError> {
        let account = account_repo::find_by_id(&self.db, account_id)?;
        if account.is_none() {
            return Err(LifecycleError::AccountNotFound(account_id.to_string()));
        }

        let now = format_timestamp(Utc::now());
        let row = JobRow {
            id: uuid::Uuid::new_v4().to_string(),
            account_id: account_id.to_string(),
            original_filename: original_filename.to_string(),
            file_handle: file_handle.to_string(),
            target_language: None,
            status: JobStatus::Uploaded.as_str().to_string(),
            provider_job_id: None,
            error: None,
            created_at: now.clone(),
            updated_at: now,
            completed_at: None,
        };
        job_repo::insert(&self.db, &row)?;

        info!(
            "Registered upload '{}' as job {} for account {}",
            original_filename, row.id, account_id
        );
        Ok(TranslationJob::from_job_row(&row)?)
    }

    /// Requests translation of an uploaded job into `language_code`.
    ///
    /// Wins the `uploaded → processing` transition atomically, then submits
    /// to the provider. A concurrent caller on the same job loses the
    /// conditional update and gets `InvalidTransition` with the observed
    /// status and never reaches the provider. If the submission itself
    /// fails, the job moves to `failed` (never back to `uploaded`) and the
    /// error carries the job's final state.
    pub async fn request_translation(
        &self,
        job_id: &str,
        language_code: &str,
    ) -> Result<TranslationJob, LifecycleError> {
        let row = job_repo::find_by_id(&self.db, job_id)?
            .ok_or_else(|| LifecycleError::JobNotFound(job_id.to_string()))?;

        let language = Language::parse(language_code)
            .ok_or_else(|| LifecycleError::UnsupportedLanguage(language_code.to_string()))?;

        let now = format_timestamp(Utc::now());
        let won = job_repo::begin_translation(&self.db, job_id, language.code(), &now)?;
        if !won {
            // Someone else holds or held the transition; report what we see.
            let current = self.load(job_id)?;
            return Err(LifecycleError::InvalidTransition {
                job_id: job_id.to_string(),
                current: current.status,
                expected: JobStatus::Uploaded,
            });
        }

        info!("Job {} -> processing (target language {})", job_id, language);

        match self.provider.submit(&row.file_handle, language).await {
            Ok(provider_job_id) => {
                let now = format_timestamp(Utc::now());
                job_repo::set_provider_job_id(&self.db, job_id, &provider_job_id, &now)?;
                self.load(job_id)
            }
            Err(e) => {
                // The translation attempt is spent: the job ends `failed`,
                // not back in `uploaded`.
                warn!("Provider submission failed for job {}: {}", job_id, e);
                let now = format_timestamp(Utc::now());
                job_repo::finish(
                    &self.db,
                    job_id,
                    JobStatus::Failed.as_str(),
                    Some(&e.to_string()),
                    &now,
                    &now,
                )?;
                let job = self.load(job_id)?;
                Err(LifecycleError::ProviderSubmissionFailed {
                    job: Box::new(job),
                    source: e,
                })
            }
        }
    }

    /// Applies the outcome the provider reported for a processing job.
    ///
    /// Duplicate deliveries on an already-terminal job are accepted
    /// idempotently: the second delivery changes nothing and returns the
    /// job as it stands.
    pub fn apply_provider_outcome(
        &self,
        job_id: &str,
        outcome: ProviderOutcome,
    ) -> Result<TranslationJob, LifecycleError> {
        job_repo::find_by_id(&self.db, job_id)?
            .ok_or_else(|| LifecycleError::JobNotFound(job_id.to_string()))?;

        let (status, error) = match &outcome {
            ProviderOutcome::Completed => (JobStatus::Completed, None),
            ProviderOutcome::Failed { reason } => (JobStatus::Failed, Some(reason.as_str())),
        };

        let now = format_timestamp(Utc::now());
        let won = job_repo::finish(&self.db, job_id, status.as_str(), error, &now, &now)?;

        let job = self.load(job_id)?;
        if won {
            info!("Job {} -> {} (provider outcome)", job_id, status);
            return Ok(job);
        }

        if job.status.is_terminal() {
            // At-least-once delivery from the provider; nothing to re-mutate.
            info!(
                "Duplicate outcome for job {} ignored (already {})",
                job_id, job.status
            );
            return Ok(job);
        }

        // Still `uploaded`: an outcome arrived for a job never submitted.
        Err(LifecycleError::InvalidTransition {
            job_id: job_id.to_string(),
            current: job.status,
            expected: JobStatus::Processing,
        })
    }

    /// Pure read, used for polling.
    pub fn get_job(&self, job_id: &str) -> Result<TranslationJob, LifecycleError> {
        self.load(job_id)
    }

    /// Lists jobs with optional status/account filters and pagination.
    pub fn list_jobs(&self, params: &JobQueryParams) -> Result<JobListPage, LifecycleError> {
        let filter = JobFilter {
            status: params.status.clone(),
            account_id: params.account_id.clone(),
            limit: params.limit,
            offset: params.offset,
        };
        let (rows, total) = job_repo::query(&self.db, &filter)?;
        let jobs = rows
            .iter()
            .map(TranslationJob::from_job_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(JobListPage {
            jobs,
            total,
            limit: params.limit,
            offset: params.offset,
        })
    }

    fn load(&self, job_id: &str) -> Result<TranslationJob, LifecycleError> {
        let row = job_repo::find_by_id(&self.db, job_id)?
            .ok_or_else(|| LifecycleError::JobNotFound(job_id.to_string()))?;
        Ok(TranslationJob::from_job_row(&row)?)
    }
}
