//! DuckDB connection wrapper with scoped sessions and query execution.
//!
//! A [`Connection`] owns the root database handle. Every catalog operation
//! acquires its own [`Session`] (a cloned connection to the same database),
//! so concurrent callers never share a statement or transaction, and the
//! session is released when it goes out of scope.

use crate::config;
use crate::error::{CatalogError, Result};
use crate::models::Card;
use crate::sql_builder::SqlParam;
use duckdb::{types::ValueRef, Connection as DuckDbConnection};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

const CREATE_CARDS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS cards (
    id BIGINT PRIMARY KEY,
    name VARCHAR NOT NULL,
    name_pt VARCHAR NOT NULL,
    name_fr VARCHAR NOT NULL,
    "type" VARCHAR NOT NULL,
    description VARCHAR NOT NULL,
    description_pt VARCHAR NOT NULL,
    description_fr VARCHAR NOT NULL,
    image VARCHAR NOT NULL DEFAULT '',
    "attribute" VARCHAR NOT NULL DEFAULT '',
    race VARCHAR NOT NULL DEFAULT '',
    archetype VARCHAR NOT NULL DEFAULT '',
    price DOUBLE NOT NULL DEFAULT 0,
    atk INTEGER NOT NULL DEFAULT 0,
    def INTEGER NOT NULL DEFAULT 0,
    "level" INTEGER NOT NULL DEFAULT 0
)"#;

const CREATE_PORTFOLIO_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS portfolios (
    id UUID PRIMARY KEY,
    name VARCHAR NOT NULL,
    description VARCHAR NOT NULL DEFAULT '',
    cover VARCHAR NOT NULL DEFAULT '',
    created_at TIMESTAMP NOT NULL DEFAULT current_timestamp,
    updated_at TIMESTAMP NOT NULL DEFAULT current_timestamp
);
CREATE TABLE IF NOT EXISTS portfolio_cards (
    portfolio_id UUID NOT NULL,
    card_id BIGINT NOT NULL,
    PRIMARY KEY (portfolio_id, card_id)
)"#;

/// Owns the root DuckDB handle for a catalog database.
///
/// The root handle is never used for queries directly; it only hands out
/// [`Session`]s.
pub struct Connection {
    root: Mutex<DuckDbConnection>,
    location: Option<PathBuf>,
}

impl Connection {
    /// Open (or create) a file-backed database at `path`.
    ///
    /// Missing parent directories are created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let conn = DuckDbConnection::open(path)?;
        debug!(path = %path.display(), "opened catalog database");
        Ok(Self {
            root: Mutex::new(conn),
            location: Some(path.to_path_buf()),
        })
    }

    /// Open an in-memory database. Data is lost when the connection drops.
    pub fn open_in_memory() -> Result<Self> {
        let conn = DuckDbConnection::open_in_memory()?;
        Ok(Self {
            root: Mutex::new(conn),
            location: None,
        })
    }

    /// Path of the database file, or `None` for an in-memory database.
    pub fn location(&self) -> Option<&Path> {
        self.location.as_deref()
    }

    /// Acquire a session on the same database.
    ///
    /// The root lock is held only while cloning the handle.
    pub fn session(&self) -> Result<Session> {
        let root = self
            .root
            .lock()
            .map_err(|e| CatalogError::LockPoisoned(e.to_string()))?;
        let conn = root.try_clone()?;
        Ok(Session {
            conn,
            in_transaction: false,
        })
    }

    /// Create the `cards`, `portfolios` and `portfolio_cards` tables if they
    /// do not exist yet.
    ///
    /// `portfolio_cards` declares no foreign keys: references are checked and
    /// removed by [`PortfolioQuery`](crate::queries::PortfolioQuery), since
    /// DuckDB has no cascading deletes and refuses to replace referenced rows.
    pub fn create_schema(&self) -> Result<()> {
        let session = self.session()?;
        session.execute_batch(CREATE_CARDS_TABLE)?;
        session.execute_batch(CREATE_PORTFOLIO_TABLES)
    }
}

/// A scoped handle for one catalog operation.
///
/// If a transaction opened with [`begin`](Session::begin) is still open when
/// the session drops, it is rolled back.
pub struct Session {
    conn: DuckDbConnection,
    in_transaction: bool,
}

impl Session {
    /// Start a transaction so subsequent reads share one snapshot.
    pub fn begin(&mut self) -> Result<()> {
        self.conn.execute_batch("BEGIN TRANSACTION")?;
        self.in_transaction = true;
        Ok(())
    }

    /// Commit the open transaction, or roll it back when `commit` is false.
    pub fn finish(&mut self, commit: bool) -> Result<()> {
        if !self.in_transaction {
            return Ok(());
        }
        self.in_transaction = false;
        self.conn
            .execute_batch(if commit { "COMMIT" } else { "ROLLBACK" })?;
        Ok(())
    }

    /// Execute one or more statements without parameters.
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    /// Execute a single parameterized statement and return the affected row count.
    pub fn execute_statement(&self, sql: &str, params: &[SqlParam]) -> Result<usize> {
        let param_values: Vec<&dyn duckdb::ToSql> = params
            .iter()
            .map(|p| p as &dyn duckdb::ToSql)
            .collect();
        Ok(self.conn.execute(sql, param_values.as_slice())?)
    }

    /// Execute SQL and return results as a `Vec` of `HashMap`s.
    ///
    /// Each row is represented as a `HashMap<String, serde_json::Value>`.
    /// Automatically converts DuckDB types to `serde_json::Value`.
    pub fn execute(
        &self,
        sql: &str,
        params: &[SqlParam],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        debug!(sql, params = params.len(), "execute");
        let mut stmt = self.conn.prepare(sql)?;

        let param_values: Vec<&dyn duckdb::ToSql> = params
            .iter()
            .map(|p| p as &dyn duckdb::ToSql)
            .collect();

        let mut rows = stmt.query(param_values.as_slice())?;

        // Column metadata is only available once the query has executed.
        let column_names: Vec<String> = match rows.as_ref() {
            Some(s) => s.column_names().into_iter().map(|s| s.to_string()).collect(),
            None => Vec::new(),
        };

        let mut out: Vec<HashMap<String, serde_json::Value>> = Vec::new();

        while let Some(row) = rows.next()? {
            let mut map = HashMap::with_capacity(column_names.len());
            for (i, col_name) in column_names.iter().enumerate() {
                let value = convert_value_ref(row.get_ref(i)?);
                map.insert(col_name.clone(), value);
            }
            out.push(map);
        }

        Ok(out)
    }

    /// Execute SQL and deserialize each row into type `T`.
    pub fn execute_into<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: &[SqlParam],
    ) -> Result<Vec<T>> {
        let rows = self.execute(sql, params)?;
        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            let value = serde_json::Value::Object(
                row.into_iter().collect::<serde_json::Map<String, serde_json::Value>>(),
            );
            let item: T = serde_json::from_value(value)?;
            results.push(item);
        }
        Ok(results)
    }

    /// Execute SQL and return the first column of the first row.
    ///
    /// Returns `None` if the result set is empty.
    pub fn execute_scalar(
        &self,
        sql: &str,
        params: &[SqlParam],
    ) -> Result<Option<serde_json::Value>> {
        debug!(sql, params = params.len(), "execute_scalar");
        let mut stmt = self.conn.prepare(sql)?;
        let param_values: Vec<&dyn duckdb::ToSql> = params
            .iter()
            .map(|p| p as &dyn duckdb::ToSql)
            .collect();

        let mut rows = stmt.query(param_values.as_slice())?;

        if let Some(row) = rows.next()? {
            let value = convert_value_ref(row.get_ref(0)?);
            Ok(Some(value))
        } else {
            Ok(None)
        }
    }

    /// Insert a card, replacing any existing row with the same id.
    pub fn upsert_card(&self, card: &Card) -> Result<()> {
        let placeholders = vec!["?"; config::CARD_COLUMNS.len()].join(", ");
        let sql = format!(
            "INSERT OR REPLACE INTO {} ({}) VALUES ({})",
            config::CARDS_TABLE,
            config::CARD_COLUMNS.join(", "),
            placeholders
        );
        let params = [
            SqlParam::Int(card.id),
            SqlParam::from(card.name.as_str()),
            SqlParam::from(card.name_pt.as_str()),
            SqlParam::from(card.name_fr.as_str()),
            SqlParam::from(card.card_type.as_str()),
            SqlParam::from(card.description.as_str()),
            SqlParam::from(card.description_pt.as_str()),
            SqlParam::from(card.description_fr.as_str()),
            SqlParam::Text(card.image_csv()),
            SqlParam::from(card.attribute.as_str()),
            SqlParam::from(card.race.as_str()),
            SqlParam::from(card.archetype.as_str()),
            SqlParam::Float(card.price),
            SqlParam::Int(card.atk),
            SqlParam::Int(card.def),
            SqlParam::Int(card.level),
        ];
        self.execute_statement(&sql, &params)?;
        Ok(())
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.in_transaction {
            let _ = self.conn.execute_batch("ROLLBACK");
        }
    }
}

/// Convert a DuckDB `ValueRef` to a `serde_json::Value`.
fn convert_value_ref(val: ValueRef<'_>) -> serde_json::Value {
    match val {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Boolean(b) => serde_json::Value::Bool(b),
        ValueRef::TinyInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::SmallInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::Int(n) => serde_json::Value::Number(n.into()),
        ValueRef::BigInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::UTinyInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::USmallInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::UInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::UBigInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::HugeInt(n) => {
            // HugeInt may not fit in i64; fall back to a string
            if let Ok(i) = i64::try_from(n) {
                serde_json::Value::Number(i.into())
            } else {
                serde_json::Value::String(n.to_string())
            }
        }
        ValueRef::Float(f) => serde_json::Number::from_f64(f as f64)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Double(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Text(bytes) => {
            serde_json::Value::String(String::from_utf8_lossy(bytes).to_string())
        }
        _ => serde_json::Value::Null,
    }
}
