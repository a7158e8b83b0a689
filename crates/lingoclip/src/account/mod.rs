//! Account store.
//!
//! Simple key-value bookkeeping over the `accounts` table: create with a
//! unique contact identifier, look up by id, list. The lifecycle manager
//! only reads accounts; nothing here ever mutates a job.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::account_repo::{self, AccountRow};
use crate::db::{Database, DatabaseError};
use crate::error::AccountError;
use crate::job::{format_timestamp, parse_timestamp};

/// A registered account. Immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Unique account identifier.
    pub id: String,
    /// Unique contact identifier (e.g. email).
    pub contact: String,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

impl Account {
    fn from_row(row: &AccountRow) -> Self {
        Self {
            id: row.id.clone(),
            contact: row.contact.clone(),
            created_at: parse_timestamp(&row.created_at),
        }
    }
}

/// Returns true for a SQLite UNIQUE-constraint violation.
fn is_unique_violation(err: &DatabaseError) -> bool {
    matches!(
        err,
        DatabaseError::Sqlite(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

#[derive(Clone)]
pub struct AccountStore {
    db: Database,
}

impl AccountStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Creates an account for `contact`. Fails with `DuplicateContact` if
    /// one already exists; the UNIQUE constraint backs the check, so two
    /// concurrent creates for the same contact cannot both succeed.
    pub fn create_account(&self, contact: &str) -> Result<Account, AccountError> {
        let row = AccountRow {
            id: uuid::Uuid::new_v4().to_string(),
            contact: contact.to_string(),
            created_at: format_timestamp(Utc::now()),
        };

        match account_repo::insert(&self.db, &row) {
            Ok(()) => {
                log::info!("Created account {} for contact '{}'", row.id, contact);
                Ok(Account::from_row(&row))
            }
            Err(e) if is_unique_violation(&e) => {
                Err(AccountError::DuplicateContact(contact.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Looks up an account by id.
    pub fn get_account(&self, id: &str) -> Result<Account, AccountError> {
        let row = account_repo::find_by_id(&self.db, id)?
            .ok_or_else(|| AccountError::NotFound(id.to_string()))?;
        Ok(Account::from_row(&row))
    }

    /// Lists all accounts, oldest first.
    pub fn list_accounts(&self) -> Result<Vec<Account>, AccountError> {
        let rows = account_repo::list_all(&self.db)?;
        Ok(rows.iter().map(Account::from_row).collect())
    }
}
