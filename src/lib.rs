//! Card catalog engine for Yu-Gi-Oh! card data.
//!
//! Turns sparse card filters into parameterized DuckDB queries that return a
//! total match count plus one page of cards, and draws random cards with
//! Bernoulli sampling. Card data is loaded from the YGOPRODeck card lists by
//! the [`import`] module.
//!
//! # Quick start
//!
//! ```no_run
//! use exodia_catalog::{CardCatalog, CardFilter};
//!
//! let catalog = CardCatalog::builder().build().unwrap();
//!
//! // Filtered search
//! let page = catalog
//!     .query_cards(&CardFilter {
//!         name: Some("Dragon".to_string()),
//!         atk: Some(3000),
//!         ..Default::default()
//!     })
//!     .unwrap();
//! println!("{} matches, showing {}", page.total, page.cards.len());
//!
//! // Three random cards
//! let cards = catalog.random_cards(3).unwrap();
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod config;
pub mod connection;
pub mod error;
pub mod filter;
pub mod import;
pub mod models;
pub mod predicate;
pub mod queries;
pub mod sql_builder;

#[cfg(feature = "async")]
pub use async_client::AsyncCardCatalog;
pub use connection::{Connection, Session};
pub use error::{CatalogError, Result};
pub use filter::{CanonicalFilter, CardFilter, FieldKind, FilterField, FilterValue};
pub use import::{ImportSummary, Importer};
pub use models::{Card, CardResultPage, Portfolio};
pub use predicate::{compile, CompiledQuery, Predicate};
pub use queries::{CardQuery, PageOrder, PortfolioQuery, RandomSampler};
pub use sql_builder::{SqlBuilder, SqlParam};

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ---------------------------------------------------------------------------
// CardCatalogBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`CardCatalog`].
///
/// Use [`CardCatalog::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](CardCatalogBuilder::build).
#[derive(Debug, Clone)]
pub struct CardCatalogBuilder {
    database: Option<PathBuf>,
    in_memory: bool,
    sample_percent: f64,
    seed: Option<u64>,
    page_order: PageOrder,
    snapshot_reads: bool,
    timeout: Duration,
}

impl Default for CardCatalogBuilder {
    fn default() -> Self {
        Self {
            database: None,
            in_memory: false,
            sample_percent: config::DEFAULT_SAMPLE_PERCENT,
            seed: None,
            page_order: PageOrder::default(),
            snapshot_reads: false,
            timeout: config::DEFAULT_TIMEOUT,
        }
    }
}

impl CardCatalogBuilder {
    /// Start from the defaults, then apply overrides from the environment.
    ///
    /// Reads `EXODIA_DATABASE` (database file path), `EXODIA_SAMPLE_PERCENT`
    /// and `EXODIA_PAGE_ORDER` (`id` or `unordered`). Unset variables keep
    /// their defaults; malformed values are rejected.
    pub fn from_env() -> Result<Self> {
        let mut builder = Self::default();

        if let Ok(path) = env::var(config::ENV_DATABASE) {
            if !path.trim().is_empty() {
                builder = builder.database(path.trim());
            }
        }

        if let Ok(raw) = env::var(config::ENV_SAMPLE_PERCENT) {
            let percent: f64 = raw.trim().parse().map_err(|_| {
                CatalogError::InvalidArgument(format!(
                    "{} must be a number, got '{}'",
                    config::ENV_SAMPLE_PERCENT,
                    raw
                ))
            })?;
            builder = builder.sample_percent(percent);
        }

        if let Ok(raw) = env::var(config::ENV_PAGE_ORDER) {
            let order = PageOrder::parse(&raw).ok_or_else(|| {
                CatalogError::InvalidArgument(format!(
                    "{} must be 'id' or 'unordered', got '{}'",
                    config::ENV_PAGE_ORDER,
                    raw
                ))
            })?;
            builder = builder.page_order(order);
        }

        Ok(builder)
    }

    /// Use the database file at `path`.
    ///
    /// If neither this nor [`in_memory`](Self::in_memory) is set, the
    /// platform data directory is used (e.g.
    /// `~/.local/share/exodia-catalog/cards.duckdb` on Linux).
    pub fn database<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.database = Some(path.as_ref().to_path_buf());
        self.in_memory = false;
        self
    }

    /// Keep the catalog in memory only.
    pub fn in_memory(mut self) -> Self {
        self.in_memory = true;
        self.database = None;
        self
    }

    /// Bernoulli inclusion percentage for random sampling. Defaults to 1.
    pub fn sample_percent(mut self, percent: f64) -> Self {
        self.sample_percent = percent;
        self
    }

    /// Seed the random sampler for reproducible output.
    ///
    /// The seed drives both DuckDB's row sample and the shuffle, so repeated
    /// draws over unchanged data return the same cards (DuckDB only repeats a
    /// seeded sample when the scan is single-threaded).
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Row order used when windowing query pages. Defaults to [`PageOrder::ById`].
    pub fn page_order(mut self, order: PageOrder) -> Self {
        self.page_order = order;
        self
    }

    /// Run each query's count and page fetch in one transaction. Defaults to `false`.
    pub fn snapshot_reads(mut self, snapshot: bool) -> Self {
        self.snapshot_reads = snapshot;
        self
    }

    /// HTTP request timeout used by imports. Defaults to 120 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Open the database and make sure the catalog tables exist.
    pub fn build(self) -> Result<CardCatalog> {
        queries::random::validate_percent(self.sample_percent)?;

        let conn = if self.in_memory {
            Connection::open_in_memory()?
        } else {
            let path = self.database.unwrap_or_else(config::default_database_path);
            Connection::open(path)?
        };
        conn.create_schema()?;

        Ok(CardCatalog {
            conn,
            sample_percent: self.sample_percent,
            seed: self.seed,
            page_order: self.page_order,
            snapshot_reads: self.snapshot_reads,
            timeout: self.timeout,
        })
    }
}

// ---------------------------------------------------------------------------
// CardCatalog
// ---------------------------------------------------------------------------

/// The main entry point: filtered card queries and random sampling.
///
/// Holds only the database handle and its configuration; every call acquires
/// its own session, so a catalog can be shared across threads.
///
/// Created via [`CardCatalog::builder()`].
pub struct CardCatalog {
    conn: Connection,
    sample_percent: f64,
    seed: Option<u64>,
    page_order: PageOrder,
    snapshot_reads: bool,
    timeout: Duration,
}

impl CardCatalog {
    /// Create a new builder for configuring the catalog.
    pub fn builder() -> CardCatalogBuilder {
        CardCatalogBuilder::default()
    }

    // -- Query accessors ---------------------------------------------------

    /// Access the card query interface, configured from the builder.
    pub fn cards(&self) -> CardQuery<'_> {
        CardQuery::new(&self.conn)
            .order(self.page_order)
            .snapshot(self.snapshot_reads)
    }

    /// Access the random sampler, configured from the builder.
    pub fn sampler(&self) -> RandomSampler<'_> {
        // The percentage was validated by the builder.
        RandomSampler::configured(&self.conn, self.sample_percent, self.seed)
    }

    /// Access portfolio management.
    pub fn portfolios(&self) -> PortfolioQuery<'_> {
        PortfolioQuery::new(&self.conn)
    }

    /// Access the bulk importer.
    pub fn importer(&self) -> Importer<'_> {
        Importer::new(&self.conn, self.timeout)
    }

    // -- Engine operations -------------------------------------------------

    /// Return the total number of cards matching `filter` and one page of them.
    ///
    /// `limit` defaults to 10 and `offset` to 0.
    pub fn query_cards(&self, filter: &CardFilter) -> Result<CardResultPage> {
        self.cards().query(filter)
    }

    /// Return at most `size` random cards (`size <= 0` is treated as 1).
    pub fn random_cards(&self, size: i64) -> Result<Vec<Card>> {
        self.sampler().sample(size)
    }

    /// Count every card in the catalog.
    pub fn count(&self) -> Result<i64> {
        self.cards().count()
    }

    /// Look up one card by id.
    pub fn get_by_id(&self, id: i64) -> Result<Option<Card>> {
        self.cards().get_by_id(id)
    }

    /// Create a portfolio. See [`PortfolioQuery::add`].
    pub fn add_portfolio(&self, name: &str, description: &str, cover: &str) -> Result<Portfolio> {
        self.portfolios().add(name, description, cover)
    }

    /// Fetch the YGOPRODeck card lists and load them into the catalog.
    pub fn import(&self) -> Result<ImportSummary> {
        self.importer().import_all()
    }

    /// Return a reference to the underlying [`Connection`] for advanced usage.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for CardCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let location = match self.conn.location() {
            Some(path) => path.display().to_string(),
            None => ":memory:".to_string(),
        };
        write!(
            f,
            "CardCatalog(database={}, page_order={:?}, snapshot_reads={}, sample_percent={})",
            location, self.page_order, self.snapshot_reads, self.sample_percent
        )
    }
}
