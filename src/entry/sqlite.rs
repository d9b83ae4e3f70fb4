//! Implements a SQLite backed entry store.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{
    Connection, OptionalExtension, Row, params, params_from_iter,
    types::{Type, Value},
};
use rust_decimal::Decimal;

use crate::{
    Error,
    entry::{Entry, EntryId, EntryQuery, EntryStore, NewEntry, SortOrder},
    timestamp::{from_unix_millis, now, to_unix_millis},
    user::UserID,
};

const ENTRY_COLUMNS: &str =
    "id, user_id, date, description, category, type, amount, created_at, updated_at";

/// Stores entries in a SQLite database.
///
/// Entries reference the user table, so the database must be set up with
/// [crate::initialize_db] first.
#[derive(Debug, Clone)]
pub struct SQLiteEntryStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteEntryStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|error| {
            tracing::error!("Could not acquire database lock: {error}");
            Error::DatabaseLockError
        })
    }
}

impl EntryStore for SQLiteEntryStore {
    /// Insert a new entry in a single statement.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::DatabaseLockError] if the connection lock is poisoned,
    /// - or [Error::SqlError] if there is some SQL error, e.g. `owner_id` is
    ///   not a registered user.
    fn insert(&self, owner_id: UserID, entry: NewEntry) -> Result<Entry, Error> {
        let timestamp = to_unix_millis(now());
        let connection = self.lock()?;

        let entry = connection
            .prepare(&format!(
                "INSERT INTO entry (user_id, date, description, category, type, amount, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
                 RETURNING {ENTRY_COLUMNS}"
            ))?
            .query_row(
                params![
                    owner_id.as_i64(),
                    to_unix_millis(entry.date),
                    entry.description,
                    entry.category,
                    entry.entry_type,
                    entry.amount.to_string(),
                    timestamp,
                ],
                map_entry_row,
            )?;

        Ok(entry)
    }

    fn find_one(&self, owner_id: UserID, id: EntryId) -> Result<Option<Entry>, Error> {
        let connection = self.lock()?;

        select_entry(&connection, owner_id, id)
    }

    /// Query for entries in the database.
    ///
    /// Entries with equal dates are returned in the order they were inserted.
    ///
    /// # Errors
    /// This function will return a [Error::SqlError] there is a SQL error.
    fn find_many(&self, query: &EntryQuery) -> Result<Vec<Entry>, Error> {
        let filter = &query.filter;
        let mut where_clause_parts = vec!["user_id = ?1".to_owned()];
        let mut query_parameters = vec![Value::Integer(filter.owner_id.as_i64())];

        if let Some(start_date) = filter.start_date {
            query_parameters.push(Value::Integer(to_unix_millis(start_date)));
            where_clause_parts.push(format!("date >= ?{}", query_parameters.len()));
        }

        if let Some(end_date) = filter.end_date {
            query_parameters.push(Value::Integer(to_unix_millis(end_date)));
            where_clause_parts.push(format!("date <= ?{}", query_parameters.len()));
        }

        if let Some(category) = filter.category {
            query_parameters.push(Value::Text(category.as_str().to_owned()));
            where_clause_parts.push(format!("category = ?{}", query_parameters.len()));
        }

        if let Some(entry_type) = filter.entry_type {
            query_parameters.push(Value::Text(entry_type.as_str().to_owned()));
            where_clause_parts.push(format!("type = ?{}", query_parameters.len()));
        }

        let mut query_string = format!(
            "SELECT {ENTRY_COLUMNS} FROM entry WHERE {}",
            where_clause_parts.join(" AND ")
        );

        match query.sort_date {
            Some(SortOrder::Ascending) => query_string.push_str(" ORDER BY date ASC, id ASC"),
            Some(SortOrder::Descending) => query_string.push_str(" ORDER BY date DESC, id ASC"),
            None => {}
        }

        let connection = self.lock()?;
        let mut statement = connection.prepare(&query_string)?;

        statement
            .query_map(params_from_iter(query_parameters.iter()), map_entry_row)?
            .map(|maybe_entry| maybe_entry.map_err(Error::from))
            .collect()
    }

    /// Read, update and write back an entry inside one SQL transaction.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::DatabaseLockError] if the connection lock is poisoned,
    /// - or [Error::SqlError] if there is some SQL error.
    fn find_one_and_update<F>(
        &self,
        owner_id: UserID,
        id: EntryId,
        update: F,
    ) -> Result<Option<Entry>, Error>
    where
        F: FnOnce(&Entry) -> NewEntry,
    {
        let connection = self.lock()?;
        let transaction = connection.unchecked_transaction()?;

        let current = match select_entry(&transaction, owner_id, id)? {
            Some(entry) => entry,
            None => return Ok(None),
        };
        let updated = update(&current);

        let entry = transaction
            .prepare(&format!(
                "UPDATE entry
                 SET date = ?1, description = ?2, category = ?3, type = ?4, amount = ?5, updated_at = ?6
                 WHERE id = ?7 AND user_id = ?8
                 RETURNING {ENTRY_COLUMNS}"
            ))?
            .query_row(
                params![
                    to_unix_millis(updated.date),
                    updated.description,
                    updated.category,
                    updated.entry_type,
                    updated.amount.to_string(),
                    to_unix_millis(now()),
                    id.as_i64(),
                    owner_id.as_i64(),
                ],
                map_entry_row,
            )?;

        transaction.commit()?;

        Ok(Some(entry))
    }

    fn find_one_and_delete(&self, owner_id: UserID, id: EntryId) -> Result<Option<Entry>, Error> {
        let connection = self.lock()?;

        connection
            .prepare(&format!(
                "DELETE FROM entry WHERE id = ?1 AND user_id = ?2 RETURNING {ENTRY_COLUMNS}"
            ))?
            .query_row(params![id.as_i64(), owner_id.as_i64()], map_entry_row)
            .optional()
            .map_err(Error::from)
    }

    fn is_connected(&self) -> bool {
        match self.lock() {
            Ok(connection) => connection
                .query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
                .is_ok(),
            Err(_) => false,
        }
    }
}

fn select_entry(
    connection: &Connection,
    owner_id: UserID,
    id: EntryId,
) -> Result<Option<Entry>, Error> {
    connection
        .prepare(&format!(
            "SELECT {ENTRY_COLUMNS} FROM entry WHERE id = ?1 AND user_id = ?2"
        ))?
        .query_row(params![id.as_i64(), owner_id.as_i64()], map_entry_row)
        .optional()
        .map_err(Error::from)
}

/// Create the entry table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_entry_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS entry (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                date INTEGER NOT NULL,
                description TEXT NOT NULL,
                category TEXT NOT NULL,
                type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
                amount TEXT NOT NULL CHECK (CAST(amount AS REAL) != 0),
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_entry_user_date ON entry(user_id, date DESC);",
        (),
    )?;
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_entry_user_type ON entry(user_id, type);",
        (),
    )?;
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_entry_user_category ON entry(user_id, category);",
        (),
    )?;

    Ok(())
}

/// Map a database row selected with the entry columns to an [Entry].
fn map_entry_row(row: &Row) -> Result<Entry, rusqlite::Error> {
    let id = EntryId::new(row.get(0)?);
    let owner_id = UserID::new(row.get(1)?);
    let date = get_timestamp(row, 2)?;
    let description = row.get(3)?;
    let category = row.get(4)?;
    let entry_type = row.get(5)?;
    let amount = get_amount(row, 6)?;
    let created_at = get_timestamp(row, 7)?;
    let updated_at = get_timestamp(row, 8)?;

    Ok(Entry {
        id,
        owner_id,
        date,
        description,
        category,
        entry_type,
        amount,
        created_at,
        updated_at,
    })
}

/// Read an amount stored as decimal text.
fn get_amount(row: &Row, index: usize) -> Result<Decimal, rusqlite::Error> {
    let text: String = row.get(index)?;

    text.parse().map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(error))
    })
}

fn get_timestamp(row: &Row, index: usize) -> Result<time::OffsetDateTime, rusqlite::Error> {
    let millis: i64 = row.get(index)?;

    from_unix_millis(millis).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(index, Type::Integer, Box::new(error))
    })
}
