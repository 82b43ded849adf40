use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Portfolio: A named, user-curated collection of cards
// ---------------------------------------------------------------------------

/// A portfolio row. `id` is a UUID; timestamps are DuckDB `TIMESTAMP`s
/// rendered as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Portfolio {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cover: String,
    pub created_at: String,
    pub updated_at: String,
}
