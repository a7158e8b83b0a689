//! Provider adapter boundary.
//!
//! The lifecycle manager talks to the external translation service through
//! the [`TranslationProvider`] trait: one synchronous `submit` call during
//! a translate request, and an outcome reported back later through
//! `JobLifecycleManager::apply_provider_outcome`. Retry/backoff policy
//! toward the real service belongs to the implementation; the core treats
//! any error from `submit` as final for that attempt.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::language::Language;

pub mod heygen;
pub mod stub;

pub use heygen::HeyGenProvider;
pub use stub::StubProvider;

/// Errors from a provider submission attempt.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Provider API key not configured")]
    NotConfigured,

    #[error("Provider request failed: {0}")]
    Request(String),

    #[error("Provider rejected submission (status {status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("Provider response missing field '{0}'")]
    MalformedResponse(&'static str),
}

/// The result the external provider reports for a submitted job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum ProviderOutcome {
    Completed,
    Failed { reason: String },
}

/// The external translation service, as seen by the lifecycle manager.
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    /// Submits a stored file for translation. Returns the provider-assigned
    /// job id on acceptance.
    async fn submit(
        &self,
        file_handle: &str,
        target_language: Language,
    ) -> Result<String, ProviderError>;

    /// Implementation name, for logs and the status endpoint.
    fn name(&self) -> &'static str;

    /// Whether this adapter is backed by a real configured service.
    fn is_configured(&self) -> bool {
        true
    }
}
