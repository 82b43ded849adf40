use serde::{Deserialize, Serialize};

use crate::config;
use crate::models::Card;

// ---------------------------------------------------------------------------
// CardInfoResponse: Body of a YGOPRODeck `cardinfo.php` request
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardInfoResponse {
    #[serde(default)]
    pub data: Vec<CardInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardInfo {
    pub id: i64,
    pub name: String,
    /// English name, present on translated card lists.
    pub name_en: Option<String>,
    #[serde(rename = "type", default)]
    pub card_type: String,
    #[serde(default)]
    pub desc: String,
    pub atk: Option<i64>,
    pub def: Option<i64>,
    pub level: Option<i64>,
    pub race: Option<String>,
    pub attribute: Option<String>,
    pub archetype: Option<String>,
    #[serde(default)]
    pub card_images: Vec<CardImage>,
    #[serde(default)]
    pub card_prices: Vec<CardPrice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardImage {
    pub id: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardPrice {
    pub tcgplayer_price: Option<String>,
}

impl CardInfo {
    /// TCGplayer price from the first price entry, or 0 when missing or unparseable.
    pub fn price(&self) -> f64 {
        self.card_prices
            .first()
            .and_then(|p| p.tcgplayer_price.as_deref())
            .and_then(|s| s.trim().parse::<f64>().ok())
            .unwrap_or(0.0)
    }

    /// Convert a default-locale entry into a catalog row with translation placeholders.
    pub fn to_card(&self) -> Card {
        Card {
            id: self.id,
            name: self.name.clone(),
            name_pt: config::PLACEHOLDER_NAME_PT.to_string(),
            name_fr: config::PLACEHOLDER_NAME_FR.to_string(),
            card_type: self.card_type.clone(),
            description: self.desc.clone(),
            description_pt: config::PLACEHOLDER_DESC_PT.to_string(),
            description_fr: config::PLACEHOLDER_DESC_FR.to_string(),
            images: self.card_images.iter().map(|i| i.id).collect(),
            attribute: self.attribute.clone().unwrap_or_default(),
            race: self.race.clone().unwrap_or_default(),
            archetype: self.archetype.clone().unwrap_or_default(),
            price: self.price(),
            atk: self.atk.unwrap_or(0),
            def: self.def.unwrap_or(0),
            level: self.level.unwrap_or(0),
        }
    }
}
