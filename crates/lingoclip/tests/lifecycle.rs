//! End-to-end lifecycle tests over the public API: account registration,
//! upload, translate request, provider outcome, polling.

use std::sync::Arc;

use lingoclip::db::Database;
use lingoclip::{
    AccountStore, JobLifecycleManager, JobQueryParams, JobStatus, Language, LifecycleError,
    MediaStorage, ProviderOutcome, StubProvider,
};

struct Harness {
    accounts: AccountStore,
    manager: Arc<JobLifecycleManager>,
    stub: Arc<StubProvider>,
}

fn harness() -> Harness {
    let db = Database::open_in_memory().expect("open in-memory DB");
    let stub = Arc::new(StubProvider::new());
    Harness {
        accounts: AccountStore::new(db.clone()),
        manager: Arc::new(JobLifecycleManager::new(db, stub.clone())),
        stub,
    }
}

#[tokio::test]
async fn full_lifecycle_from_upload_to_completion() {
    let h = harness();
    let dir = tempfile::tempdir().unwrap();
    let storage = MediaStorage::new(dir.path());

    let account = h.accounts.create_account("a1@example.com").unwrap();

    let handle = storage.store(b"fake video bytes", "clip.mp4").unwrap();
    let job = h
        .manager
        .register_upload(&account.id, &handle.to_string_lossy(), "clip.mp4")
        .unwrap();
    assert_eq!(job.status, JobStatus::Uploaded);
    assert!(job.target_language.is_none());

    let job = h.manager.request_translation(&job.id, "es").await.unwrap();
    assert_eq!(job.status, JobStatus::Processing);
    assert_eq!(job.target_language, Some(Language::Spanish));
    assert_eq!(h.stub.submission_count(), 1);

    let job = h
        .manager
        .apply_provider_outcome(&job.id, ProviderOutcome::Completed)
        .unwrap();
    assert_eq!(job.status, JobStatus::Completed);

    // Polling still sees the terminal job; it is never deleted.
    let polled = h.manager.get_job(&job.id).unwrap();
    assert_eq!(polled.status, JobStatus::Completed);
    assert_eq!(polled.target_language, Some(Language::Spanish));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_translate_requests_have_exactly_one_winner() {
    let h = harness();
    let account = h.accounts.create_account("race@example.com").unwrap();
    let job = h
        .manager
        .register_upload(&account.id, "/uploads/race.mp4", "race.mp4")
        .unwrap();

    let m1 = h.manager.clone();
    let m2 = h.manager.clone();
    let id1 = job.id.clone();
    let id2 = job.id.clone();

    let (r1, r2) = tokio::join!(
        tokio::spawn(async move { m1.request_translation(&id1, "es").await }),
        tokio::spawn(async move { m2.request_translation(&id2, "fr").await }),
    );
    let r1 = r1.unwrap();
    let r2 = r2.unwrap();

    let winners = [&r1, &r2].iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1, "exactly one concurrent request must win");

    let loser = if r1.is_err() { r1 } else { r2 };
    assert!(matches!(
        loser.unwrap_err(),
        LifecycleError::InvalidTransition { .. }
    ));

    // One submission total, and the winner's language stuck.
    assert_eq!(h.stub.submission_count(), 1);
    let job = h.manager.get_job(&job.id).unwrap();
    assert_eq!(job.status, JobStatus::Processing);
    assert!(job.target_language.is_some());
}

#[tokio::test]
async fn listing_reflects_ownership_and_status() {
    let h = harness();
    let a1 = h.accounts.create_account("one@example.com").unwrap();
    let a2 = h.accounts.create_account("two@example.com").unwrap();

    let j1 = h
        .manager
        .register_upload(&a1.id, "/uploads/a.mp4", "a.mp4")
        .unwrap();
    h.manager
        .register_upload(&a2.id, "/uploads/b.mp4", "b.mp4")
        .unwrap();
    h.manager.request_translation(&j1.id, "de").await.unwrap();

    let mine = h
        .manager
        .list_jobs(&JobQueryParams {
            account_id: Some(a1.id.clone()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(mine.total, 1);
    assert_eq!(mine.jobs[0].id, j1.id);

    let processing = h
        .manager
        .list_jobs(&JobQueryParams {
            status: Some("processing".to_string()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(processing.total, 1);
}
