//! Random card sampling.
//!
//! Rows are drawn with Bernoulli sampling, so only a small fraction of the
//! table is ever materialized. Untranslated rows still carrying the import
//! placeholders are skipped, then the sample is shuffled and cut to size.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::debug;

use crate::config;
use crate::connection::Connection;
use crate::error::{CatalogError, Result};
use crate::models::Card;
use crate::sql_builder::{SqlBuilder, SqlParam};

/// Draws approximately uniform random cards from the catalog.
pub struct RandomSampler<'a> {
    conn: &'a Connection,
    percent: f64,
    seed: Option<u64>,
}

impl<'a> RandomSampler<'a> {
    /// Create a sampler using the default inclusion percentage.
    pub fn new(conn: &'a Connection) -> Self {
        Self {
            conn,
            percent: config::DEFAULT_SAMPLE_PERCENT,
            seed: None,
        }
    }

    pub(crate) fn configured(conn: &'a Connection, percent: f64, seed: Option<u64>) -> Self {
        Self {
            conn,
            percent,
            seed,
        }
    }

    /// Set the Bernoulli inclusion probability, in percent (`0 < p <= 100`).
    pub fn percent(mut self, percent: f64) -> Result<Self> {
        validate_percent(percent)?;
        self.percent = percent;
        Ok(self)
    }

    /// Seed both the row sample and the shuffle applied to it.
    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// The SQL for one sampling pass.
    ///
    /// A seeded sampler uses DuckDB's repeatable sample form, so the same row
    /// subset is drawn on every call. DuckDB only guarantees that when the
    /// scan runs on a single thread.
    pub fn statement(&self) -> (String, Vec<SqlParam>) {
        let method = match self.seed {
            Some(seed) => format!("bernoulli, {}", sample_seed(seed)),
            None => "bernoulli".to_string(),
        };
        let source = format!(
            "(SELECT * FROM {} USING SAMPLE {} PERCENT ({})) AS sampled",
            config::CARDS_TABLE,
            self.percent,
            method
        );
        SqlBuilder::new(&source)
            .select(config::CARD_COLUMNS)
            .where_ne("name_pt", config::PLACEHOLDER_NAME_PT)
            .where_ne("name_fr", config::PLACEHOLDER_NAME_FR)
            .build()
    }

    /// Return at most `size` random cards.
    ///
    /// A `size` of zero or less is treated as 1. Fewer cards than requested
    /// come back when the sample is small; that is not an error.
    pub fn sample(&self, size: i64) -> Result<Vec<Card>> {
        let size = effective_size(size);
        let (sql, params) = self.statement();

        let mut cards: Vec<Card> = self.conn.session()?.execute_into(&sql, &params)?;
        let sampled = cards.len();

        // Fixed input order, so a seeded shuffle is reproducible.
        cards.sort_by_key(|c| c.id);
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        cards.shuffle(&mut rng);
        cards.truncate(size);

        debug!(
            requested = size,
            sampled,
            returned = cards.len(),
            percent = self.percent,
            "random sample"
        );
        Ok(cards)
    }
}

// Kept inside the non-negative INTEGER range the sample clause accepts.
fn sample_seed(seed: u64) -> u64 {
    seed & 0x7FFF_FFFF
}

/// Clamp a requested sample size to at least one card.
pub fn effective_size(size: i64) -> usize {
    if size <= 0 {
        config::DEFAULT_SAMPLE_SIZE
    } else {
        usize::try_from(size).unwrap_or(usize::MAX)
    }
}

pub(crate) fn validate_percent(percent: f64) -> Result<()> {
    if percent.is_finite() && percent > 0.0 && percent <= 100.0 {
        Ok(())
    } else {
        Err(CatalogError::InvalidArgument(format!(
            "sample percent must be in (0, 100], got {}",
            percent
        )))
    }
}
