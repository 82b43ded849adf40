//! Shared test fixtures for the card catalog integration tests.
//!
//! Provides `sample_catalog()` which builds an in-memory catalog populated
//! with a handful of cards. Sampling is set to 100% and seeded so random
//! draws are deterministic.

#![allow(dead_code)]

use exodia_catalog::{Card, CardCatalog, Connection};

pub const SAMPLE_SEED: u64 = 7;

/// Id of the one sample card still carrying the translation placeholders.
pub const UNTRANSLATED_ID: i64 = 5;

/// Build an in-memory catalog loaded with [`sample_cards`].
pub fn sample_catalog() -> CardCatalog {
    let catalog = CardCatalog::builder()
        .in_memory()
        .sample_percent(100.0)
        .seed(SAMPLE_SEED)
        .build()
        .unwrap();
    insert_cards(catalog.connection(), &sample_cards());
    catalog
}

pub fn insert_cards(conn: &Connection, cards: &[Card]) {
    let session = conn.session().unwrap();
    for card in cards {
        session.upsert_card(card).unwrap();
    }
}

/// Seven cards: five monsters of varied stats, one spell with zero stats and
/// one untranslated monster (id 5).
pub fn sample_cards() -> Vec<Card> {
    let rows = vec![
        serde_json::json!({
            "id": 1,
            "name": "Blue-Eyes White Dragon",
            "name_pt": "Dragão Branco de Olhos Azuis",
            "name_fr": "Dragon Blanc aux Yeux Bleus",
            "type": "Normal Monster",
            "description": "This legendary dragon is a powerful engine of destruction.",
            "description_pt": "Este dragão lendário é uma poderosa máquina de destruição.",
            "description_fr": "Ce dragon légendaire est une puissante machine de destruction.",
            "image": [89631139, 89631140],
            "attribute": "LIGHT",
            "race": "Dragon",
            "archetype": "Blue-Eyes",
            "price": 1.25,
            "atk": 3000,
            "def": 2500,
            "level": 8
        }),
        serde_json::json!({
            "id": 2,
            "name": "Dark Magician",
            "name_pt": "Mago Negro",
            "name_fr": "Magicien Sombre",
            "type": "Normal Monster",
            "description": "The ultimate wizard in terms of attack and defense.",
            "description_pt": "O mago supremo em termos de ataque e defesa.",
            "description_fr": "Le magicien ultime en termes d'attaque et de défense.",
            "image": [46986414],
            "attribute": "DARK",
            "race": "Spellcaster",
            "archetype": "Dark Magician",
            "price": 0.5,
            "atk": 2500,
            "def": 2100,
            "level": 7
        }),
        serde_json::json!({
            "id": 3,
            "name": "Pot of Greed",
            "name_pt": "Pote da Ganância",
            "name_fr": "Pot de Cupidité",
            "type": "Spell Card",
            "description": "Draw 2 cards.",
            "description_pt": "Compre 2 cards.",
            "description_fr": "Piochez 2 cartes.",
            "image": [55144522],
            "race": "Normal",
            "price": 0.3
        }),
        serde_json::json!({
            "id": 4,
            "name": "Exodia the Forbidden One",
            "name_pt": "Exodia, o Proibido",
            "name_fr": "Exodia l'Interdit",
            "type": "Effect Monster",
            "description": "If you have this card in your hand, you win the Duel.",
            "description_pt": "Se você tiver este card na sua mão, você vence o Duelo.",
            "description_fr": "Si vous avez cette carte en main, vous gagnez le Duel.",
            "image": [33396948],
            "attribute": "DARK",
            "race": "Spellcaster",
            "archetype": "Exodia",
            "price": 2.0,
            "atk": 1000,
            "def": 1000,
            "level": 3
        }),
        serde_json::json!({
            "id": 5,
            "name": "Red-Eyes Black Dragon",
            "name_pt": "name_pt",
            "name_fr": "name_fr",
            "type": "Normal Monster",
            "description": "A ferocious dragon with a deadly attack.",
            "description_pt": "desc_pt",
            "description_fr": "desc_fr",
            "image": [74677422],
            "attribute": "DARK",
            "race": "Dragon",
            "archetype": "Red-Eyes",
            "price": 0.75,
            "atk": 2400,
            "def": 2000,
            "level": 7
        }),
        serde_json::json!({
            "id": 6,
            "name": "Kuriboh",
            "name_pt": "Kuriboh",
            "name_fr": "Kuriboh",
            "type": "Effect Monster",
            "description": "Discard this card; you take no battle damage from that battle.",
            "description_pt": "Descarte este card; você não recebe dano de batalha.",
            "description_fr": "Défaussez cette carte ; vous ne subissez aucun dommage de combat.",
            "image": [40640057],
            "attribute": "DARK",
            "race": "Fiend",
            "archetype": "Kuriboh",
            "price": 0.2,
            "atk": 300,
            "def": 200,
            "level": 1
        }),
        serde_json::json!({
            "id": 7,
            "name": "Mystical Elf",
            "name_pt": "Elfa Mística",
            "name_fr": "Elfe Mystique",
            "type": "Normal Monster",
            "description": "A delicate elf that lacks offense, but has a terrific defense.",
            "description_pt": "Uma elfa delicada que não tem ataque, mas tem uma defesa incrível.",
            "description_fr": "Une elfe délicate qui manque d'attaque mais a une défense formidable.",
            "image": [15025844],
            "attribute": "LIGHT",
            "race": "Spellcaster",
            "price": 0.1,
            "atk": 800,
            "def": 2000,
            "level": 4
        }),
    ];

    rows.into_iter()
        .map(|row| serde_json::from_value(row).unwrap())
        .collect()
}

pub fn ids(cards: &[Card]) -> Vec<i64> {
    cards.iter().map(|c| c.id).collect()
}
