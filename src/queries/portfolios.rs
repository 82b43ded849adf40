//! Portfolios: named collections of catalog cards.
//!
//! Membership lives in `portfolio_cards`. Both ends of a link are checked on
//! insert, and deleting a portfolio removes its links in the same transaction.

use tracing::{debug, info};

use crate::config;
use crate::connection::{Connection, Session};
use crate::error::{CatalogError, Result};
use crate::models::{Card, Portfolio};
use crate::sql_builder::{SqlBuilder, SqlParam};

const PORTFOLIO_COLUMNS: &[&str] = &[
    "CAST(id AS VARCHAR) AS id",
    "name",
    "description",
    "cover",
    "CAST(created_at AS VARCHAR) AS created_at",
    "CAST(updated_at AS VARCHAR) AS updated_at",
];

/// Query interface for the `portfolios` and `portfolio_cards` tables.
pub struct PortfolioQuery<'a> {
    conn: &'a Connection,
}

impl<'a> PortfolioQuery<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Create a portfolio and return it. `name` must not be blank.
    pub fn add(&self, name: &str, description: &str, cover: &str) -> Result<Portfolio> {
        if name.trim().is_empty() {
            return Err(CatalogError::InvalidArgument(
                "portfolio name must not be empty".into(),
            ));
        }

        let session = self.conn.session()?;
        let id = session
            .execute_scalar("SELECT CAST(gen_random_uuid() AS VARCHAR)", &[])?
            .and_then(|v| v.as_str().map(str::to_string))
            .ok_or_else(|| CatalogError::InvalidArgument("could not generate portfolio id".into()))?;

        session.execute_statement(
            "INSERT INTO portfolios (id, name, description, cover) VALUES (CAST(? AS UUID), ?, ?, ?)",
            &[
                SqlParam::from(id.as_str()),
                SqlParam::from(name),
                SqlParam::from(description),
                SqlParam::from(cover),
            ],
        )?;
        info!(id = %id, name, "portfolio created");

        fetch_portfolio(&session, &id)?
            .ok_or_else(|| CatalogError::NotFound(format!("portfolio {}", id)))
    }

    /// Look up one portfolio by id.
    pub fn get(&self, id: &str) -> Result<Option<Portfolio>> {
        fetch_portfolio(&self.conn.session()?, id)
    }

    /// Every portfolio, oldest first.
    pub fn list(&self) -> Result<Vec<Portfolio>> {
        let (sql, params) = SqlBuilder::new("portfolios")
            .select(PORTFOLIO_COLUMNS)
            .order_by(&["portfolios.created_at ASC", "name ASC"])
            .build();
        self.conn.session()?.execute_into(&sql, &params)
    }

    /// Add a card to a portfolio.
    ///
    /// Returns `false` when the card was already in it. Fails with
    /// [`CatalogError::NotFound`] when either the portfolio or the card is
    /// missing.
    pub fn add_card(&self, portfolio_id: &str, card_id: i64) -> Result<bool> {
        let mut session = self.conn.session()?;
        session.begin()?;

        let result = (|| -> Result<bool> {
            require_portfolio(&session, portfolio_id)?;
            let card = session.execute_scalar(
                "SELECT id FROM cards WHERE id = ?",
                &[SqlParam::Int(card_id)],
            )?;
            if card.is_none() {
                return Err(CatalogError::NotFound(format!("card {}", card_id)));
            }

            let inserted = session.execute_statement(
                "INSERT OR IGNORE INTO portfolio_cards (portfolio_id, card_id) VALUES (CAST(? AS UUID), ?)",
                &[SqlParam::from(portfolio_id), SqlParam::Int(card_id)],
            )?;
            if inserted > 0 {
                touch(&session, portfolio_id)?;
            }
            Ok(inserted > 0)
        })();

        let finished = session.finish(result.is_ok());
        let added = result?;
        finished?;
        debug!(portfolio_id, card_id, added, "portfolio add_card");
        Ok(added)
    }

    /// Remove a card from a portfolio. Returns `false` when it was not there.
    pub fn remove_card(&self, portfolio_id: &str, card_id: i64) -> Result<bool> {
        let mut session = self.conn.session()?;
        session.begin()?;

        let result = (|| -> Result<bool> {
            let removed = session.execute_statement(
                "DELETE FROM portfolio_cards WHERE portfolio_id = CAST(? AS UUID) AND card_id = ?",
                &[SqlParam::from(portfolio_id), SqlParam::Int(card_id)],
            )?;
            if removed > 0 {
                touch(&session, portfolio_id)?;
            }
            Ok(removed > 0)
        })();

        let finished = session.finish(result.is_ok());
        let removed = result?;
        finished?;
        Ok(removed)
    }

    /// Cards in a portfolio, ordered by id.
    pub fn cards(&self, portfolio_id: &str) -> Result<Vec<Card>> {
        let (sql, params) = SqlBuilder::new(config::CARDS_TABLE)
            .select(config::CARD_COLUMNS)
            .where_clause(
                "id IN (SELECT card_id FROM portfolio_cards WHERE portfolio_id = CAST(? AS UUID))",
                &[SqlParam::from(portfolio_id)],
            )
            .order_by(&["id ASC"])
            .build();
        self.conn.session()?.execute_into(&sql, &params)
    }

    /// Delete a portfolio together with its card links.
    ///
    /// Returns `false` when no portfolio has that id.
    pub fn delete(&self, portfolio_id: &str) -> Result<bool> {
        let mut session = self.conn.session()?;
        session.begin()?;

        let result = (|| -> Result<bool> {
            let id = [SqlParam::from(portfolio_id)];
            session.execute_statement(
                "DELETE FROM portfolio_cards WHERE portfolio_id = CAST(? AS UUID)",
                &id,
            )?;
            let deleted = session
                .execute_statement("DELETE FROM portfolios WHERE id = CAST(? AS UUID)", &id)?;
            Ok(deleted > 0)
        })();

        let finished = session.finish(result.is_ok());
        let deleted = result?;
        finished?;
        info!(portfolio_id, deleted, "portfolio delete");
        Ok(deleted)
    }
}

fn fetch_portfolio(session: &Session, id: &str) -> Result<Option<Portfolio>> {
    let (sql, params) = SqlBuilder::new("portfolios")
        .select(PORTFOLIO_COLUMNS)
        .where_clause("id = CAST(? AS UUID)", &[SqlParam::from(id)])
        .limit(1)
        .build();
    let rows: Vec<Portfolio> = session.execute_into(&sql, &params)?;
    Ok(rows.into_iter().next())
}

fn require_portfolio(session: &Session, id: &str) -> Result<()> {
    match fetch_portfolio(session, id)? {
        Some(_) => Ok(()),
        None => Err(CatalogError::NotFound(format!("portfolio {}", id))),
    }
}

fn touch(session: &Session, id: &str) -> Result<()> {
    session.execute_statement(
        "UPDATE portfolios SET updated_at = current_timestamp WHERE id = CAST(? AS UUID)",
        &[SqlParam::from(id)],
    )?;
    Ok(())
}
