//! Async wrapper around [`CardCatalog`] for use in async runtimes (Tokio, etc.).
//!
//! Runs all catalog operations on a blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the async event loop free.
//! Dropping a returned future does not stop a query that has already started.
//!
//! # Example
//!
//! ```no_run
//! use exodia_catalog::{AsyncCardCatalog, CardCatalog, CardFilter};
//!
//! #[tokio::main]
//! async fn main() {
//!     let catalog = AsyncCardCatalog::open(CardCatalog::builder()).await.unwrap();
//!
//!     let page = catalog.query_cards(CardFilter::default()).await.unwrap();
//!     let random = catalog.random_cards(5).await.unwrap();
//! }
//! ```

use std::sync::Arc;

use crate::error::{CatalogError, Result};
use crate::filter::CardFilter;
use crate::models::{Card, CardResultPage};
use crate::{CardCatalog, CardCatalogBuilder};

/// Async wrapper around [`CardCatalog`].
///
/// The catalog is shared behind an [`Arc`]; each call runs on its own
/// blocking thread with its own database session.
#[derive(Clone)]
pub struct AsyncCardCatalog {
    inner: Arc<CardCatalog>,
}

impl AsyncCardCatalog {
    /// Wrap an already-built catalog.
    pub fn new(catalog: CardCatalog) -> Self {
        Self {
            inner: Arc::new(catalog),
        }
    }

    /// Build a catalog on the blocking thread pool and wrap it.
    pub async fn open(builder: CardCatalogBuilder) -> Result<Self> {
        let catalog = tokio::task::spawn_blocking(move || builder.build())
            .await
            .map_err(|e| CatalogError::InvalidArgument(format!("Task join error: {e}")))??;
        Ok(Self::new(catalog))
    }

    /// Run a sync catalog operation on the blocking thread pool.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use exodia_catalog::{AsyncCardCatalog, CardCatalog};
    /// # async fn example() -> exodia_catalog::Result<()> {
    /// # let catalog = AsyncCardCatalog::open(CardCatalog::builder()).await?;
    /// let total = catalog.run(|c| c.count()).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&CardCatalog) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let catalog = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || f(&catalog))
            .await
            .map_err(|e| CatalogError::InvalidArgument(format!("Task join error: {e}")))?
    }

    /// Filtered card query. See [`CardCatalog::query_cards`].
    pub async fn query_cards(&self, filter: CardFilter) -> Result<CardResultPage> {
        self.run(move |c| c.query_cards(&filter)).await
    }

    /// Random sample. See [`CardCatalog::random_cards`].
    pub async fn random_cards(&self, size: i64) -> Result<Vec<Card>> {
        self.run(move |c| c.random_cards(size)).await
    }

    /// Borrow the wrapped sync catalog.
    pub fn inner(&self) -> &CardCatalog {
        &self.inner
    }
}
