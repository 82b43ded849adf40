//! Bulk import of card data from the YGOPRODeck card list.
//!
//! The default-locale list is inserted first with translation placeholders in
//! every localized column; each translated list then fills in its own name
//! and description columns. Rows a translation never reaches keep the
//! placeholders, which the random sampler uses to skip them.

pub mod client;
pub mod payload;

use std::collections::BTreeMap;
use std::time::Duration;

use tracing::info;

use crate::config;
use crate::connection::{Connection, Session};
use crate::error::{CatalogError, Result};
use crate::sql_builder::SqlParam;

pub use client::{parse_payload, Fetcher};
pub use payload::{CardImage, CardInfo, CardInfoResponse, CardPrice};

/// Counts reported by an import run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Rows inserted or replaced from the default-locale list.
    pub inserted: usize,
    /// Rows updated per translation language.
    pub translated: BTreeMap<String, usize>,
}

/// Name and description columns filled by a translated card list.
pub fn translation_columns(language: &str) -> Option<(&'static str, &'static str)> {
    match language {
        "pt" => Some(("name_pt", "description_pt")),
        "fr" => Some(("name_fr", "description_fr")),
        _ => None,
    }
}

/// Loads card lists into the catalog.
pub struct Importer<'a> {
    conn: &'a Connection,
    timeout: Duration,
}

impl<'a> Importer<'a> {
    pub fn new(conn: &'a Connection, timeout: Duration) -> Self {
        Self { conn, timeout }
    }

    /// Fetch the default and every translated card list, then load them.
    pub fn import_all(&self) -> Result<ImportSummary> {
        let fetcher = Fetcher::new(self.timeout)?;

        let base: CardInfoResponse = fetcher.fetch_json(&config::cardinfo_url(None))?;
        let mut translations = Vec::with_capacity(config::TRANSLATED_LANGUAGES.len());
        for lang in config::TRANSLATED_LANGUAGES {
            let list: CardInfoResponse = fetcher.fetch_json(&config::cardinfo_url(Some(lang)))?;
            translations.push((lang, list));
        }

        let borrowed: Vec<(&str, &CardInfoResponse)> =
            translations.iter().map(|(l, r)| (*l, r)).collect();
        self.load(&base, &borrowed)
    }

    /// Load an already-fetched default list plus `(language, list)` translations.
    ///
    /// Runs in a single transaction; on failure nothing is written.
    pub fn load(
        &self,
        base: &CardInfoResponse,
        translations: &[(&str, &CardInfoResponse)],
    ) -> Result<ImportSummary> {
        let mut session = self.conn.session()?;
        session.begin()?;

        let result = (|| -> Result<ImportSummary> {
            let mut summary = ImportSummary::default();

            for info in &base.data {
                session.upsert_card(&info.to_card())?;
                summary.inserted += 1;
            }

            for (lang, list) in translations {
                let updated = apply_translation(&session, lang, list)?;
                summary.translated.insert(lang.to_string(), updated);
            }

            Ok(summary)
        })();

        let finished = session.finish(result.is_ok());
        let summary = result?;
        finished?;

        info!(
            inserted = summary.inserted,
            translated = ?summary.translated,
            "card import finished"
        );
        Ok(summary)
    }
}

/// Write one language's names and descriptions onto matching rows.
///
/// A translated entry matches the row with the same id, or the row whose
/// default-locale name equals the entry's English name.
fn apply_translation(session: &Session, language: &str, list: &CardInfoResponse) -> Result<usize> {
    let (name_col, desc_col) = translation_columns(language).ok_or_else(|| {
        CatalogError::InvalidArgument(format!("unsupported translation language: {}", language))
    })?;
    let sql = format!(
        "UPDATE {} SET {} = ?, {} = ? WHERE id = ? OR name = ?",
        config::CARDS_TABLE,
        name_col,
        desc_col
    );

    let mut updated = 0;
    for info in &list.data {
        let params = [
            SqlParam::from(info.name.as_str()),
            SqlParam::from(info.desc.as_str()),
            SqlParam::Int(info.id),
            SqlParam::from(info.name_en.as_deref().unwrap_or_default()),
        ];
        updated += session.execute_statement(&sql, &params)?;
    }
    Ok(updated)
}
