// src/db.rs

use crate::error::{LogsiftError, Result};
use crate::models::{Log, NewLog, DATE_FORMAT};
use crate::query::{Predicate, QuerySpec, Sort};
use chrono::NaiveDateTime;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS logs (
    id INTEGER PRIMARY KEY,
    date TEXT NOT NULL DEFAULT (datetime('now', 'localtime')),
    content TEXT NOT NULL,
    file_path TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_logs_date ON logs (date);
";

const SELECT_LOG: &str = "SELECT id, date, content, file_path FROM logs";

/// SQLite-backed log store.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Opens (creating if needed) the database at `path` and ensures the schema.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Store { conn })
    }

    /// Writes one log in its own transaction and returns the assigned id.
    pub fn insert(&self, log: &NewLog) -> Result<i64> {
        let tx = self.conn.unchecked_transaction()?;
        match log.date {
            Some(date) => tx.execute(
                "INSERT INTO logs (date, content, file_path) VALUES (?1, ?2, ?3)",
                params![format_date(&date), log.content, log.file_path],
            )?,
            None => tx.execute(
                "INSERT INTO logs (content, file_path) VALUES (?1, ?2)",
                params![log.content, log.file_path],
            )?,
        };
        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(id)
    }

    pub fn get(&self, id: i64) -> Result<Log> {
        self.conn
            .query_row(&format!("{} WHERE id = ?", SELECT_LOG), [id], map_log)
            .optional()?
            .ok_or(LogsiftError::LogNotFound(id))
    }

    /// Runs a storage-agnostic query spec as one SQL statement.
    pub fn query(&self, spec: &QuerySpec) -> Result<Vec<Log>> {
        let mut sql = String::from(SELECT_LOG);
        let mut clauses: Vec<&str> = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        for predicate in &spec.predicates {
            match predicate {
                Predicate::DateAtLeast(date) => {
                    clauses.push("date >= ?");
                    params.push(Box::new(format_date(date)));
                }
                Predicate::DateAtMost(date) => {
                    clauses.push("date <= ?");
                    params.push(Box::new(format_date(date)));
                }
                Predicate::ContentContains(keyword) => {
                    // instr() is case-sensitive, LIKE is not
                    clauses.push("instr(content, ?) > 0");
                    params.push(Box::new(keyword.clone()));
                }
            }
        }

        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }

        match spec.sort {
            Some(Sort::DateDescending) => sql.push_str(" ORDER BY date DESC"),
            Some(Sort::DateAscending) => sql.push_str(" ORDER BY date ASC"),
            None => {}
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let logs = stmt
            .query_map(
                rusqlite::params_from_iter(params.iter().map(|b| b.as_ref())),
                map_log,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(logs)
    }

    /// Administrative removal; returns the number of rows deleted.
    pub fn delete_logs_by_id(&self, ids: &[i64]) -> Result<usize> {
        if ids.is_empty() {
            return Ok(0);
        }

        let placeholders = vec!["?"; ids.len()].join(",");
        let query = format!("DELETE FROM logs WHERE id IN ({})", placeholders);

        let mut stmt = self.conn.prepare(&query)?;
        let count = stmt.execute(rusqlite::params_from_iter(ids))?;
        Ok(count)
    }
}

fn format_date(date: &NaiveDateTime) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn map_log(row: &Row<'_>) -> rusqlite::Result<Log> {
    let raw_date: String = row.get(1)?;
    let date = NaiveDateTime::parse_from_str(&raw_date, DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e)))?;
    Ok(Log {
        id: row.get(0)?,
        date,
        content: row.get(2)?,
        file_path: row.get(3)?,
    })
}
