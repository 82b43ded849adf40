//! Query modules for the card catalog.
//!
//! Each module provides a query struct that borrows from a
//! [`Connection`](crate::connection::Connection), acquires a session per call
//! and returns typed model results.

pub mod cards;
pub mod portfolios;
pub mod random;

pub use cards::{CardQuery, PageOrder};
pub use portfolios::PortfolioQuery;
pub use random::RandomSampler;
