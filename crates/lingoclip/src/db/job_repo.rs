//! Job repository: CRUD and conditional status updates for the `jobs` table.
//!
//! Status transitions are never blind overwrites: `begin_translation` and
//! `finish` are conditional UPDATEs (`WHERE status = ...`) whose affected-row
//! count decides races between concurrent callers.

use rusqlite::{params, Row};

use super::{Database, DatabaseError};

/// A raw job row from the database.
#[derive(Debug, Clone)]
pub struct JobRow {
    pub id: String,
    pub account_id: String,
    pub original_filename: String,
    pub file_handle: String,
    pub target_language: Option<String>,
    pub status: String,
    pub provider_job_id: Option<String>,
    pub error: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub completed_at: Option<String>,
}

impl JobRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            account_id: row.get("account_id")?,
            original_filename: row.get("original_filename")?,
            file_handle: row.get("file_handle")?,
            target_language: row.get("target_language")?,
            status: row.get("status")?,
            provider_job_id: row.get("provider_job_id")?,
            error: row.get("error")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
            completed_at: row.get("completed_at")?,
        })
    }
}

/// Query filter parameters for job listing.
#[derive(Debug, Default, Clone)]
pub struct JobFilter {
    pub status: Option<String>,
    pub account_id: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// Inserts a new job row.
pub fn insert(db: &Database, job: &JobRow) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO jobs (id, account_id, original_filename, file_handle, target_language,
             status, provider_job_id, error, created_at, updated_at, completed_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                job.id,
                job.account_id,
                job.original_filename,
                job.file_handle,
                job.target_language,
                job.status,
                job.provider_job_id,
                job.error,
                job.created_at,
                job.updated_at,
                job.completed_at,
            ],
        )?;
        Ok(())
    })
}

/// Finds a job by its ID.
pub fn find_by_id(db: &Database, id: &str) -> Result<Option<JobRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT * FROM jobs WHERE id = ?1")?;
        let mut rows = stmt.query_map(params![id], JobRow::from_row)?;
        match rows.next() {
            Some(Ok(row)) => Ok(Some(row)),
            Some(Err(e)) => Err(DatabaseError::Sqlite(e)),
            None => Ok(None),
        }
    })
}

/// Queries jobs with filters, returning (rows, total_count).
pub fn query(db: &Database, filter: &JobFilter) -> Result<(Vec<JobRow>, u64), DatabaseError> {
    db.with_conn(|conn| {
        let mut conditions = Vec::new();
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(ref status) = filter.status {
            conditions.push(format!("status = ?{}", param_values.len() + 1));
            param_values.push(Box::new(status.clone()));
        }
        if let Some(ref account_id) = filter.account_id {
            conditions.push(format!("account_id = ?{}", param_values.len() + 1));
            param_values.push(Box::new(account_id.clone()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        // Count total matching rows.
        let count_sql = format!("SELECT COUNT(*) FROM jobs {}", where_clause);
        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();
        let total: u64 = conn.query_row(&count_sql, params_ref.as_slice(), |r| r.get(0))?;

        // Fetch paginated results.
        let limit = filter.limit.unwrap_or(100) as i64;
        let offset = filter.offset.unwrap_or(0) as i64;
        param_values.push(Box::new(limit));
        param_values.push(Box::new(offset));
        let query_sql = format!(
            "SELECT * FROM jobs {} ORDER BY created_at DESC LIMIT ?{} OFFSET ?{}",
            where_clause,
            param_values.len() - 1,
            param_values.len()
        );

        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();
        let mut stmt = conn.prepare(&query_sql)?;
        let rows: Vec<JobRow> = stmt
            .query_map(params_ref.as_slice(), JobRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok((rows, total))
    })
}

/// Counts jobs with the given status.
pub fn count_by_status(db: &Database, status: &str) -> Result<u64, DatabaseError> {
    db.with_conn(|conn| {
        let count: u64 = conn.query_row(
            "SELECT COUNT(*) FROM jobs WHERE status = ?1",
            params![status],
            |r| r.get(0),
        )?;
        Ok(count)
    })
}

/// Attempts the `uploaded` → `processing` transition, setting the target
/// language in the same statement. Returns `true` if this caller won the
/// transition, `false` if the job was not in `uploaded` (or does not exist).
pub fn begin_translation(
    db: &Database,
    id: &str,
    target_language: &str,
    updated_at: &str,
) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let affected = conn.execute(
            "UPDATE jobs SET status = 'processing', target_language = ?2, updated_at = ?3
             WHERE id = ?1 AND status = 'uploaded'",
            params![id, target_language, updated_at],
        )?;
        Ok(affected == 1)
    })
}

/// Records the provider-assigned job id after a successful submission.
pub fn set_provider_job_id(
    db: &Database,
    id: &str,
    provider_job_id: &str,
    updated_at: &str,
) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "UPDATE jobs SET provider_job_id = ?2, updated_at = ?3 WHERE id = ?1",
            params![id, provider_job_id, updated_at],
        )?;
        Ok(())
    })
}

/// Attempts the `processing` → terminal transition. Returns `true` if this
/// caller won the transition, `false` if the job was not in `processing`.
pub fn finish(
    db: &Database,
    id: &str,
    status: &str,
    error: Option<&str>,
    completed_at: &str,
    updated_at: &str,
) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let affected = conn.execute(
            "UPDATE jobs SET status = ?2, error = ?3, completed_at = ?4, updated_at = ?5
             WHERE id = ?1 AND status = 'processing'",
            params![id, status, error, completed_at, updated_at],
        )?;
        Ok(affected == 1)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::account_repo::{self, AccountRow};

    fn test_db() -> Database {
        let db = Database::open_in_memory().expect("Failed to create test database");
        account_repo::insert(
            &db,
            &AccountRow {
                id: "a1".to_string(),
                contact: "a@example.com".to_string(),
                created_at: "2026-01-01T00:00:00Z".to_string(),
            },
        )
        .unwrap();
        db
    }

    fn sample_job(id: &str) -> JobRow {
        JobRow {
            id: id.to_string(),
            account_id: "a1".to_string(),
            original_filename: "clip.mp4".to_string(),
            file_handle: "/uploads/clip.mp4".to_string(),
            target_language: None,
            status: "uploaded".to_string(),
            provider_job_id: None,
            error: None,
            created_at: "2026-01-01T00:00:00Z".to_string(),
            updated_at: "2026-01-01T00:00:00Z".to_string(),
            completed_at: None,
        }
    }

    #[test]
    fn test_insert_and_find() {
        let db = test_db();
        insert(&db, &sample_job("j1")).unwrap();

        let found = find_by_id(&db, "j1").unwrap().unwrap();
        assert_eq!(found.original_filename, "clip.mp4");
        assert_eq!(found.status, "uploaded");
        assert!(found.target_language.is_none());
    }

    #[test]
    fn test_find_nonexistent() {
        let db = test_db();
        assert!(find_by_id(&db, "missing").unwrap().is_none());
    }

    #[test]
    fn test_begin_translation_wins_from_uploaded() {
        let db = test_db();
        insert(&db, &sample_job("j1")).unwrap();

        let won = begin_translation(&db, "j1", "es", "2026-01-01T01:00:00Z").unwrap();
        assert!(won);

        let row = find_by_id(&db, "j1").unwrap().unwrap();
        assert_eq!(row.status, "processing");
        assert_eq!(row.target_language.as_deref(), Some("es"));
    }

    #[test]
    fn test_begin_translation_loses_when_not_uploaded() {
        let db = test_db();
        insert(&db, &sample_job("j1")).unwrap();
        assert!(begin_translation(&db, "j1", "es", "2026-01-01T01:00:00Z").unwrap());

        // Second attempt observes `processing` and must not overwrite the language.
        let won = begin_translation(&db, "j1", "fr", "2026-01-01T01:00:01Z").unwrap();
        assert!(!won);

        let row = find_by_id(&db, "j1").unwrap().unwrap();
        assert_eq!(row.target_language.as_deref(), Some("es"));
    }

    #[test]
    fn test_begin_translation_on_missing_job() {
        let db = test_db();
        let won = begin_translation(&db, "missing", "es", "2026-01-01T01:00:00Z").unwrap();
        assert!(!won);
    }

    #[test]
    fn test_finish_from_processing() {
        let db = test_db();
        insert(&db, &sample_job("j1")).unwrap();
        assert!(begin_translation(&db, "j1", "es", "2026-01-01T01:00:00Z").unwrap());

        let won = finish(
            &db,
            "j1",
            "completed",
            None,
            "2026-01-01T02:00:00Z",
            "2026-01-01T02:00:00Z",
        )
        .unwrap();
        assert!(won);

        let row = find_by_id(&db, "j1").unwrap().unwrap();
        assert_eq!(row.status, "completed");
        assert!(row.completed_at.is_some());
    }

    #[test]
    fn test_finish_is_conditional_on_processing() {
        let db = test_db();
        insert(&db, &sample_job("j1")).unwrap();

        // Still `uploaded`, so the terminal transition must not apply.
        let won = finish(
            &db,
            "j1",
            "failed",
            Some("boom"),
            "2026-01-01T02:00:00Z",
            "2026-01-01T02:00:00Z",
        )
        .unwrap();
        assert!(!won);
        assert_eq!(find_by_id(&db, "j1").unwrap().unwrap().status, "uploaded");
    }

    #[test]
    fn test_finish_duplicate_delivery_is_no_op() {
        let db = test_db();
        insert(&db, &sample_job("j1")).unwrap();
        assert!(begin_translation(&db, "j1", "es", "2026-01-01T01:00:00Z").unwrap());
        assert!(finish(
            &db,
            "j1",
            "completed",
            None,
            "2026-01-01T02:00:00Z",
            "2026-01-01T02:00:00Z"
        )
        .unwrap());

        // Redelivery loses the conditional update and changes nothing.
        let won = finish(
            &db,
            "j1",
            "failed",
            Some("late"),
            "2026-01-01T03:00:00Z",
            "2026-01-01T03:00:00Z",
        )
        .unwrap();
        assert!(!won);

        let row = find_by_id(&db, "j1").unwrap().unwrap();
        assert_eq!(row.status, "completed");
        assert!(row.error.is_none());
    }

    #[test]
    fn test_set_provider_job_id() {
        let db = test_db();
        insert(&db, &sample_job("j1")).unwrap();

        set_provider_job_id(&db, "j1", "hg-123", "2026-01-01T01:00:00Z").unwrap();
        let row = find_by_id(&db, "j1").unwrap().unwrap();
        assert_eq!(row.provider_job_id.as_deref(), Some("hg-123"));
    }

    #[test]
    fn test_query_with_status_filter() {
        let db = test_db();
        insert(&db, &sample_job("q1")).unwrap();
        let mut done = sample_job("q2");
        done.status = "completed".to_string();
        insert(&db, &done).unwrap();

        let (rows, total) = query(
            &db,
            &JobFilter {
                status: Some("completed".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(total, 1);
        assert_eq!(rows[0].id, "q2");
    }

    #[test]
    fn test_query_with_account_filter() {
        let db = test_db();
        account_repo::insert(
            &db,
            &AccountRow {
                id: "a2".to_string(),
                contact: "b@example.com".to_string(),
                created_at: "2026-01-01T00:00:00Z".to_string(),
            },
        )
        .unwrap();

        insert(&db, &sample_job("q1")).unwrap();
        let mut other = sample_job("q2");
        other.account_id = "a2".to_string();
        insert(&db, &other).unwrap();

        let (rows, total) = query(
            &db,
            &JobFilter {
                account_id: Some("a2".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(total, 1);
        assert_eq!(rows[0].id, "q2");
    }

    #[test]
    fn test_query_pagination() {
        let db = test_db();
        for i in 0..10 {
            let mut job = sample_job(&format!("p{}", i));
            job.created_at = format!("2026-01-{:02}T00:00:00Z", i + 1);
            insert(&db, &job).unwrap();
        }

        let (rows, total) = query(
            &db,
            &JobFilter {
                limit: Some(3),
                offset: Some(0),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(total, 10);
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn test_count_by_status() {
        let db = test_db();
        insert(&db, &sample_job("c1")).unwrap();
        insert(&db, &sample_job("c2")).unwrap();
        let mut failed = sample_job("c3");
        failed.status = "failed".to_string();
        insert(&db, &failed).unwrap();

        assert_eq!(count_by_status(&db, "uploaded").unwrap(), 2);
        assert_eq!(count_by_status(&db, "failed").unwrap(), 1);
        assert_eq!(count_by_status(&db, "completed").unwrap(), 0);
    }
}
