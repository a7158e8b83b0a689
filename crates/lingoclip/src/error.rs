use std::path::PathBuf;
use thiserror::Error;

use crate::job::{JobStatus, TranslationJob};
use crate::provider::ProviderError;

#[derive(Error, Debug)]
pub enum LingoclipError {
    #[error("Account error: {0}")]
    Account(#[from] AccountError),

    #[error("Lifecycle error: {0}")]
    Lifecycle(#[from] LifecycleError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Database error: {0}")]
    Database(#[from] crate::db::DatabaseError),
}

/// Errors from the account store.
#[derive(Error, Debug)]
pub enum AccountError {
    #[error("An account with contact '{0}' already exists")]
    DuplicateContact(String),

    #[error("Account '{0}' not found")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] crate::db::DatabaseError),
}

/// Errors from the job lifecycle manager. Each variant is a precondition
/// failure or a collaborator failure; none leaves a partial mutation behind.
#[derive(Error, Debug)]
pub enum LifecycleError {
    #[error("Account '{0}' not found")]
    AccountNotFound(String),

    #[error("Job '{0}' not found")]
    JobNotFound(String),

    /// The requested edge is not in the transition table. Carries the
    /// job's actual status so callers can resynchronize.
    #[error("Job '{job_id}' is '{current}', expected '{expected}'")]
    InvalidTransition {
        job_id: String,
        current: JobStatus,
        expected: JobStatus,
    },

    #[error("Unsupported target language '{0}'")]
    UnsupportedLanguage(String),

    /// Provider submission failed after the job had already moved to
    /// `processing`; the job ends `failed` and is carried here so the
    /// caller still sees its final state.
    #[error("Provider submission failed for job '{}': {source}", job.id)]
    ProviderSubmissionFailed {
        job: Box<TranslationJob>,
        #[source]
        source: ProviderError,
    },

    #[error("Database error: {0}")]
    Database(#[from] crate::db::DatabaseError),
}

/// Errors from media storage.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to create directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Too many name conflicts storing '{0}'")]
    TooManyConflicts(String),

    #[error("Empty filename")]
    EmptyFilename,
}

pub type Result<T> = std::result::Result<T, LingoclipError>;
