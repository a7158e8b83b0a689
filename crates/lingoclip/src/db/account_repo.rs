//! Account repository: CRUD operations for the `accounts` table.

use rusqlite::{params, Row};

use super::{Database, DatabaseError};

/// A raw account row from the database.
#[derive(Debug, Clone)]
pub struct AccountRow {
    pub id: String,
    pub contact: String,
    pub created_at: String,
}

impl AccountRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            contact: row.get("contact")?,
            created_at: row.get("created_at")?,
        })
    }
}

/// Inserts a new account row. Fails on a duplicate contact (UNIQUE constraint).
pub fn insert(db: &Database, account: &AccountRow) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO accounts (id, contact, created_at) VALUES (?1, ?2, ?3)",
            params![account.id, account.contact, account.created_at],
        )?;
        Ok(())
    })
}

/// Finds an account by its ID.
pub fn find_by_id(db: &Database, id: &str) -> Result<Option<AccountRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT * FROM accounts WHERE id = ?1")?;
        let mut rows = stmt.query_map(params![id], AccountRow::from_row)?;
        match rows.next() {
            Some(Ok(row)) => Ok(Some(row)),
            Some(Err(e)) => Err(DatabaseError::Sqlite(e)),
            None => Ok(None),
        }
    })
}

/// Finds an account by its contact identifier.
pub fn find_by_contact(db: &Database, contact: &str) -> Result<Option<AccountRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT * FROM accounts WHERE contact = ?1")?;
        let mut rows = stmt.query_map(params![contact], AccountRow::from_row)?;
        match rows.next() {
            Some(Ok(row)) => Ok(Some(row)),
            Some(Err(e)) => Err(DatabaseError::Sqlite(e)),
            None => Ok(None),
        }
    })
}

/// Lists all accounts, oldest first.
pub fn list_all(db: &Database) -> Result<Vec<AccountRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT * FROM accounts ORDER BY created_at ASC")?;
        let rows: Vec<AccountRow> = stmt
            .query_map([], AccountRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}
