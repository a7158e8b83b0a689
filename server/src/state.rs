//! Shared application state for the HTTP handlers.

use std::sync::Arc;

use lingoclip::db::Database;
use lingoclip::{AccountStore, JobLifecycleManager, MediaStorage, TranslationProvider};

/// Everything a handler needs. Cloning is cheap (inner `Arc`s).
#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountStore,
    pub manager: Arc<JobLifecycleManager>,
    pub storage: Arc<MediaStorage>,
}

impl AppState {
    pub fn new(
        db: Database,
        provider: Arc<dyn TranslationProvider>,
        storage: MediaStorage,
    ) -> Self {
        Self {
            accounts: AccountStore::new(db.clone()),
            manager: Arc::new(JobLifecycleManager::new(db, provider)),
            storage: Arc::new(storage),
        }
    }
}
