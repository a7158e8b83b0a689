pub mod account;
pub mod db;
pub mod error;
pub mod job;
pub mod language;
pub mod provider;
pub mod storage;

pub use account::{Account, AccountStore};
pub use error::{AccountError, LifecycleError, LingoclipError, Result, StorageError};
pub use job::{JobLifecycleManager, JobListPage, JobQueryParams, JobStatus, TranslationJob};
pub use language::{Language, SUPPORTED_LANGUAGES};
pub use provider::{
    HeyGenProvider, ProviderError, ProviderOutcome, StubProvider, TranslationProvider,
};
pub use storage::MediaStorage;
