//! Filtered card queries: a total count plus one page of matching cards.

use tracing::debug;

use crate::config;
use crate::connection::Connection;
use crate::error::Result;
use crate::filter::CardFilter;
use crate::models::{Card, CardResultPage};
use crate::predicate::{self, CompiledQuery};
use crate::sql_builder::{SqlBuilder, SqlParam};

// ---------------------------------------------------------------------------
// PageOrder
// ---------------------------------------------------------------------------

/// Row order applied before windowing a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageOrder {
    /// Order by primary key, so `offset`/`limit` windows are stable across calls.
    #[default]
    ById,
    /// Whatever order the store yields. Pages may overlap or skip rows.
    Unordered,
}

impl PageOrder {
    /// Parse `"id"` or `"unordered"` (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "id" | "by_id" => Some(PageOrder::ById),
            "unordered" | "none" => Some(PageOrder::Unordered),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// CardQuery
// ---------------------------------------------------------------------------

/// Query interface for the `cards` table.
pub struct CardQuery<'a> {
    conn: &'a Connection,
    order: PageOrder,
    snapshot: bool,
}

impl<'a> CardQuery<'a> {
    /// Create a new `CardQuery` bound to the given connection.
    ///
    /// Pages are ordered by id and count/fetch run without a shared snapshot.
    pub fn new(conn: &'a Connection) -> Self {
        Self {
            conn,
            order: PageOrder::default(),
            snapshot: false,
        }
    }

    /// Set the row order used for windowing.
    pub fn order(mut self, order: PageOrder) -> Self {
        self.order = order;
        self
    }

    /// Run the count and the page fetch inside one transaction.
    ///
    /// Without this, a write landing between the two reads can make `total`
    /// disagree with `cards`.
    pub fn snapshot(mut self, snapshot: bool) -> Self {
        self.snapshot = snapshot;
        self
    }

    // -- Filtered search ---------------------------------------------------

    /// Normalize, compile and execute `filter`.
    pub fn query(&self, filter: &CardFilter) -> Result<CardResultPage> {
        let canonical = filter.normalize();
        let compiled = predicate::compile(&canonical)?;
        self.execute(&compiled)
    }

    /// Build the `(count, page)` statements for a compiled query.
    ///
    /// Both share the same WHERE clause and parameters; only the page
    /// statement is ordered and windowed.
    pub fn statements(
        &self,
        compiled: &CompiledQuery,
    ) -> ((String, Vec<SqlParam>), (String, Vec<SqlParam>)) {
        let mut qb = SqlBuilder::new(config::CARDS_TABLE);
        qb.select(config::CARD_COLUMNS);
        compiled.apply(&mut qb);

        let count = qb.build_count();

        if self.order == PageOrder::ById {
            qb.order_by(&["id ASC"]);
        }
        qb.limit(compiled.limit).offset(compiled.offset);

        (count, qb.build())
    }

    /// Execute a compiled query: count every match, then fetch one window.
    pub fn execute(&self, compiled: &CompiledQuery) -> Result<CardResultPage> {
        let ((count_sql, count_params), (page_sql, page_params)) = self.statements(compiled);

        let mut session = self.conn.session()?;
        if self.snapshot {
            session.begin()?;
        }

        let result = (|| -> Result<CardResultPage> {
            let total = session
                .execute_scalar(&count_sql, &count_params)?
                .and_then(|v| v.as_i64())
                .unwrap_or(0);
            let cards: Vec<Card> = session.execute_into(&page_sql, &page_params)?;
            Ok(CardResultPage { total, cards })
        })();

        let finished = session.finish(result.is_ok());
        let page = result?;
        finished?;

        debug!(
            predicates = compiled.predicates.len(),
            limit = compiled.limit,
            offset = compiled.offset,
            total = page.total,
            returned = page.cards.len(),
            "card query"
        );
        Ok(page)
    }

    // -- Single card lookup ------------------------------------------------

    /// Retrieve a single card by its id.
    pub fn get_by_id(&self, id: i64) -> Result<Option<Card>> {
        let (sql, params) = SqlBuilder::new(config::CARDS_TABLE)
            .select(config::CARD_COLUMNS)
            .where_eq("id", id)
            .limit(1)
            .build();

        let cards: Vec<Card> = self.conn.session()?.execute_into(&sql, &params)?;
        Ok(cards.into_iter().next())
    }

    // -- Count -------------------------------------------------------------

    /// Count every card in the catalog.
    pub fn count(&self) -> Result<i64> {
        let (sql, params) = SqlBuilder::new(config::CARDS_TABLE).build_count();
        let cnt = self
            .conn
            .session()?
            .execute_scalar(&sql, &params)?
            .and_then(|v| v.as_i64())
            .unwrap_or(0);
        Ok(cnt)
    }
}
