//! SQL builder with parameterized query construction.
//!
//! All user-supplied values go through DuckDB's parameter binding (`?` placeholders),
//! never through string interpolation. Builder methods return `&mut Self` for chaining.
//!
//! # Example
//!
//! ```rust
//! use exodia_catalog::SqlBuilder;
//! let (sql, params) = SqlBuilder::new("cards")
//!     .where_eq("atk", 3000_i64)
//!     .where_like("race", "%dragon%")
//!     .order_by(&["id ASC"])
//!     .limit(10)
//!     .build();
//! ```

use std::fmt;

use duckdb::types::{ToSqlOutput, Value, ValueRef};
use duckdb::ToSql;

/// Escape character used by every LIKE pattern this crate generates.
pub const LIKE_ESCAPE: char = '\\';

// ---------------------------------------------------------------------------
// SqlParam
// ---------------------------------------------------------------------------

/// A typed value bound to a `?` placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Int(i64),
    Float(f64),
    Text(String),
}

impl ToSql for SqlParam {
    fn to_sql(&self) -> duckdb::Result<ToSqlOutput<'_>> {
        Ok(match self {
            SqlParam::Int(n) => ToSqlOutput::Owned(Value::BigInt(*n)),
            SqlParam::Float(f) => ToSqlOutput::Owned(Value::Double(*f)),
            SqlParam::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
        })
    }
}

impl fmt::Display for SqlParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlParam::Int(n) => write!(f, "{}", n),
            SqlParam::Float(x) => write!(f, "{}", x),
            SqlParam::Text(s) => write!(f, "'{}'", s),
        }
    }
}

impl From<i64> for SqlParam {
    fn from(n: i64) -> Self {
        SqlParam::Int(n)
    }
}

impl From<f64> for SqlParam {
    fn from(x: f64) -> Self {
        SqlParam::Float(x)
    }
}

impl From<&str> for SqlParam {
    fn from(s: &str) -> Self {
        SqlParam::Text(s.to_string())
    }
}

impl From<String> for SqlParam {
    fn from(s: String) -> Self {
        SqlParam::Text(s)
    }
}

/// Wrap `needle` as a LIKE pattern matching any value that contains it.
///
/// `%`, `_` and the escape character itself are escaped, so the needle is
/// matched literally.
pub fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if ch == '%' || ch == '_' || ch == LIKE_ESCAPE {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

// ---------------------------------------------------------------------------
// SqlBuilder
// ---------------------------------------------------------------------------

/// Builds parameterized SQL queries safely.
///
/// All user-supplied values go through DuckDB's parameter binding (`?` placeholders),
/// never through string interpolation. Methods return `&mut Self` for chaining.
#[derive(Debug, Clone)]
pub struct SqlBuilder {
    select_cols: Vec<String>,
    from_table: String,
    where_clauses: Vec<String>,
    params: Vec<SqlParam>,
    order_by_cols: Vec<String>,
    limit_val: Option<usize>,
    offset_val: Option<usize>,
}

impl SqlBuilder {
    /// Create a builder targeting the given table, view or subquery.
    pub fn new(table: &str) -> Self {
        Self {
            select_cols: vec!["*".to_string()],
            from_table: table.to_string(),
            where_clauses: Vec::new(),
            params: Vec::new(),
            order_by_cols: Vec::new(),
            limit_val: None,
            offset_val: None,
        }
    }

    /// Set the columns to select (replaces the default `*`).
    pub fn select(&mut self, cols: &[&str]) -> &mut Self {
        self.select_cols = cols.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Add a WHERE condition with `?` placeholders for each param.
    ///
    /// Parameters are appended in order.
    pub fn where_clause(&mut self, condition: &str, params: &[SqlParam]) -> &mut Self {
        self.where_clauses.push(condition.to_string());
        self.params.extend(params.iter().cloned());
        self
    }

    /// Add an equality condition: `{column} = ?`.
    pub fn where_eq(&mut self, column: &str, value: impl Into<SqlParam>) -> &mut Self {
        self.where_clauses.push(format!("{} = ?", column));
        self.params.push(value.into());
        self
    }

    /// Add an inequality condition: `{column} <> ?`.
    pub fn where_ne(&mut self, column: &str, value: impl Into<SqlParam>) -> &mut Self {
        self.where_clauses.push(format!("{} <> ?", column));
        self.params.push(value.into());
        self
    }

    /// Add a case-insensitive LIKE condition.
    ///
    /// Generates: `LOWER({column}) LIKE LOWER(?) ESCAPE '\'`
    pub fn where_like(&mut self, column: &str, pattern: &str) -> &mut Self {
        self.where_clauses.push(format!(
            "LOWER({}) LIKE LOWER(?) ESCAPE '{}'",
            column, LIKE_ESCAPE
        ));
        self.params.push(SqlParam::Text(pattern.to_string()));
        self
    }

    /// Add OR-combined conditions.
    ///
    /// Each condition is a `(sql_fragment, param_value)` tuple where the fragment
    /// uses `?` as a placeholder.
    ///
    /// # Example
    ///
    /// ```rust
    /// use exodia_catalog::{SqlBuilder, SqlParam};
    /// let mut builder = SqlBuilder::new("cards");
    /// builder.where_or(&[("atk = ?", SqlParam::Int(3000)), ("def = ?", SqlParam::Int(2500))]);
    /// // -> WHERE (atk = ? OR def = ?)
    /// ```
    pub fn where_or(&mut self, conditions: &[(&str, SqlParam)]) -> &mut Self {
        if conditions.is_empty() {
            return self;
        }
        let mut or_parts = Vec::with_capacity(conditions.len());
        for (cond, param) in conditions {
            or_parts.push(cond.to_string());
            self.params.push(param.clone());
        }
        self.where_clauses
            .push(format!("({})", or_parts.join(" OR ")));
        self
    }

    /// Add ORDER BY clauses (e.g. `"id ASC"`, `"random()"`).
    pub fn order_by(&mut self, clauses: &[&str]) -> &mut Self {
        self.order_by_cols
            .extend(clauses.iter().map(|c| c.to_string()));
        self
    }

    /// Set the maximum number of rows to return.
    pub fn limit(&mut self, n: usize) -> &mut Self {
        self.limit_val = Some(n);
        self
    }

    /// Set the number of rows to skip before returning results.
    pub fn offset(&mut self, n: usize) -> &mut Self {
        self.offset_val = Some(n);
        self
    }

    fn where_sql(&self) -> Option<String> {
        if self.where_clauses.is_empty() {
            None
        } else {
            Some(format!("WHERE {}", self.where_clauses.join(" AND ")))
        }
    }

    /// Build the final SQL string and parameter list.
    ///
    /// Returns a tuple of `(sql_string, params_list)` ready for execution.
    pub fn build(&self) -> (String, Vec<SqlParam>) {
        let cols = self.select_cols.join(", ");
        let mut parts = vec![
            format!("SELECT {}", cols),
            format!("FROM {}", self.from_table),
        ];

        if let Some(w) = self.where_sql() {
            parts.push(w);
        }

        if !self.order_by_cols.is_empty() {
            parts.push(format!("ORDER BY {}", self.order_by_cols.join(", ")));
        }

        if let Some(n) = self.limit_val {
            parts.push(format!("LIMIT {}", n));
        }

        if let Some(n) = self.offset_val {
            parts.push(format!("OFFSET {}", n));
        }

        (parts.join("\n"), self.params.clone())
    }

    /// Build a `COUNT(*)` over the same FROM and WHERE clauses.
    ///
    /// Selected columns, ordering, LIMIT and OFFSET are ignored, so the count
    /// always covers every row the predicates match.
    pub fn build_count(&self) -> (String, Vec<SqlParam>) {
        let mut parts = vec![
            "SELECT COUNT(*) AS total".to_string(),
            format!("FROM {}", self.from_table),
        ];

        if let Some(w) = self.where_sql() {
            parts.push(w);
        }

        (parts.join("\n"), self.params.clone())
    }
}
