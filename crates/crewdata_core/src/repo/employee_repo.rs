//! Employee store contract and SQLite implementation.
//!
//! # Responsibility
//! - Bulk-write raw (possibly dirty) records and read the batch back.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - The store accepts every raw value the injector can produce; no
//!   validation happens on the write path.
//! - `fetch_all` returns records ordered by identifier so downstream
//!   processing is deterministic.

use crate::db::DbError;
use crate::model::employee::{EmployeeId, RawEmployeeRecord};
use chrono::NaiveDate;
use log::info;
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const EMPLOYEE_SELECT_SQL: &str = "SELECT
    employee_id,
    name,
    department,
    position,
    start_date,
    salary
FROM employees";

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence error for the employee store.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted employee data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Gateway contract for the employee batch store.
pub trait EmployeeRepository {
    /// Writes the whole batch atomically, replacing nothing.
    fn bulk_insert(&self, records: &[RawEmployeeRecord]) -> RepoResult<usize>;
    /// Reads every persisted record back, ordered by identifier.
    fn fetch_all(&self) -> RepoResult<Vec<RawEmployeeRecord>>;
    /// Number of persisted records.
    fn count(&self) -> RepoResult<usize>;
}

/// SQLite-backed employee store.
pub struct SqliteEmployeeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEmployeeRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl EmployeeRepository for SqliteEmployeeRepository<'_> {
    fn bulk_insert(&self, records: &[RawEmployeeRecord]) -> RepoResult<usize> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO employees (
                    employee_id,
                    name,
                    department,
                    position,
                    start_date,
                    salary
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            )?;
            for record in records {
                stmt.execute(params![
                    record.id,
                    record.name.as_deref(),
                    record.department.as_deref(),
                    record.position.as_deref(),
                    record.start_date.map(|date| date.to_string()),
                    record.salary,
                ])?;
            }
        }
        tx.commit()?;

        info!(
            "event=bulk_insert module=repo status=ok rows={}",
            records.len()
        );
        Ok(records.len())
    }

    fn fetch_all(&self) -> RepoResult<Vec<RawEmployeeRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EMPLOYEE_SELECT_SQL} ORDER BY employee_id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut records = Vec::new();

        while let Some(row) = rows.next()? {
            records.push(parse_employee_row(row)?);
        }

        Ok(records)
    }

    fn count(&self) -> RepoResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM employees;", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

fn parse_employee_row(row: &Row<'_>) -> RepoResult<RawEmployeeRecord> {
    let id: EmployeeId = row.get("employee_id")?;

    let start_date = match row.get::<_, Option<String>>("start_date")? {
        Some(text) => Some(parse_stored_date(id, &text)?),
        None => None,
    };

    Ok(RawEmployeeRecord {
        id,
        name: row.get("name")?,
        department: row.get("department")?,
        position: row.get("position")?,
        start_date,
        salary: row.get("salary")?,
    })
}

fn parse_stored_date(id: EmployeeId, text: &str) -> RepoResult<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|_| {
        RepoError::InvalidData(format!(
            "employee {id}: unparseable start_date `{text}` in employees.start_date"
        ))
    })
}
