//! Stand-in translation provider (no external service).
//!
//! Used when no API key is configured, and as the test double for the
//! lifecycle manager: it counts submissions and can be constructed to
//! fail every submit call.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use log::info;

use super::{ProviderError, TranslationProvider};
use crate::language::Language;

/// In-process provider that accepts every submission (or rejects every one,
/// when built with [`StubProvider::failing`]).
#[derive(Debug, Default)]
pub struct StubProvider {
    submissions: AtomicUsize,
    failure: Option<String>,
}

impl StubProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// A stub that rejects every submission with the given reason.
    pub fn failing(reason: &str) -> Self {
        Self {
            submissions: AtomicUsize::new(0),
            failure: Some(reason.to_string()),
        }
    }

    /// Number of `submit` calls received, including rejected ones.
    pub fn submission_count(&self) -> usize {
        self.submissions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TranslationProvider for StubProvider {
    async fn submit(
        &self,
        _file_handle: &str,
        target_language: Language,
    ) -> Result<String, ProviderError> {
        self.submissions.fetch_add(1, Ordering::SeqCst);

        if let Some(reason) = &self.failure {
            return Err(ProviderError::Request(reason.clone()));
        }

        let provider_job_id = format!("stub-{}", uuid::Uuid::new_v4());
        info!(
            "Stub provider accepted submission ({}): {}",
            target_language, provider_job_id
        );
        Ok(provider_job_id)
    }

    fn name(&self) -> &'static str {
        "stub"
    }

    fn is_configured(&self) -> bool {
        false
    }
}
