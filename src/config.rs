use std::path::PathBuf;
use std::time::Duration;

pub const CARDINFO_URL: &str = "https://db.ygoprodeck.com/api/v7/cardinfo.php";

/// Languages fetched in addition to the default (English) card list.
pub const TRANSLATED_LANGUAGES: [&str; 2] = ["pt", "fr"];

pub const CARDS_TABLE: &str = "cards";

/// Columns selected for every card read. `image` is stored comma-joined.
pub const CARD_COLUMNS: &[&str] = &[
    "id",
    "name",
    "name_pt",
    "name_fr",
    "\"type\"",
    "description",
    "description_pt",
    "description_fr",
    "image",
    "\"attribute\"",
    "race",
    "archetype",
    "price",
    "atk",
    "def",
    "\"level\"",
];

/// Columns searched by a name filter: the default locale and both translations.
pub const NAME_COLUMNS: [&str; 3] = ["name", "name_pt", "name_fr"];

// Values written by the importer before a translation has been applied.
pub const PLACEHOLDER_NAME_PT: &str = "name_pt";
pub const PLACEHOLDER_NAME_FR: &str = "name_fr";
pub const PLACEHOLDER_DESC_PT: &str = "desc_pt";
pub const PLACEHOLDER_DESC_FR: &str = "desc_fr";

pub const DEFAULT_LIMIT: usize = 10;
pub const DEFAULT_OFFSET: usize = 0;
pub const DEFAULT_SAMPLE_SIZE: usize = 1;

/// Bernoulli inclusion probability (in percent) used by random sampling.
pub const DEFAULT_SAMPLE_PERCENT: f64 = 1.0;

pub const FETCH_ATTEMPTS: u32 = 3;
pub const FETCH_RETRY_DELAY: Duration = Duration::from_secs(3);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

// Environment overrides read by `CardCatalogBuilder::from_env`.
pub const ENV_DATABASE: &str = "EXODIA_DATABASE";
pub const ENV_SAMPLE_PERCENT: &str = "EXODIA_SAMPLE_PERCENT";
pub const ENV_PAGE_ORDER: &str = "EXODIA_PAGE_ORDER";

/// URL of the card list for `language`, or the English list for `None`.
pub fn cardinfo_url(language: Option<&str>) -> String {
    match language {
        Some(lang) => format!("{}?language={}", CARDINFO_URL, lang),
        None => CARDINFO_URL.to_string(),
    }
}

pub fn default_database_path() -> PathBuf {
    if let Some(data) = dirs::data_dir() {
        data.join("exodia-catalog").join("cards.duckdb")
    } else {
        PathBuf::from(".exodia-catalog/cards.duckdb")
    }
}
