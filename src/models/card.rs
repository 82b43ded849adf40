use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// Card: One row of the `cards` table
// ---------------------------------------------------------------------------

/// A catalog card with its default-locale and translated text.
///
/// `name_pt`/`name_fr` and the matching descriptions hold the import
/// placeholders (`"name_pt"`, `"desc_pt"`, ...) until a translation is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub name_pt: String,
    #[serde(default)]
    pub name_fr: String,
    #[serde(rename = "type")]
    pub card_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub description_pt: String,
    #[serde(default)]
    pub description_fr: String,
    /// Image ids in upstream order. Stored comma-joined in the database.
    #[serde(rename = "image", default, deserialize_with = "image_ids")]
    pub images: Vec<i64>,
    #[serde(default)]
    pub attribute: String,
    #[serde(default)]
    pub race: String,
    #[serde(default)]
    pub archetype: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub atk: i64,
    #[serde(default)]
    pub def: i64,
    #[serde(default)]
    pub level: i64,
}

impl Card {
    /// Join image ids into the comma-separated form stored in the `image` column.
    pub fn image_csv(&self) -> String {
        self.images
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// True when both translated names have been populated by an import.
    pub fn is_translated(&self) -> bool {
        self.name_pt != crate::config::PLACEHOLDER_NAME_PT
            && self.name_fr != crate::config::PLACEHOLDER_NAME_FR
    }
}

/// Accept either the stored comma-joined string or a JSON array of ids.
fn image_ids<'de, D>(deserializer: D) -> Result<Vec<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Images {
        List(Vec<i64>),
        Csv(String),
        Missing(()),
    }

    match Images::deserialize(deserializer)? {
        Images::List(ids) => Ok(ids),
        Images::Missing(()) => Ok(Vec::new()),
        Images::Csv(s) => s
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| part.parse::<i64>().map_err(serde::de::Error::custom))
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// CardResultPage: Total match count plus one window of cards
// ---------------------------------------------------------------------------

/// Result of a filtered card query.
///
/// `total` counts every matching row regardless of `limit`/`offset`; `cards`
/// holds the requested window only.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CardResultPage {
    pub total: i64,
    pub cards: Vec<Card>,
}
