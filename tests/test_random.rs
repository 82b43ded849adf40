//! Random sampling: size clamping, placeholder exclusion and seeding.

mod common;

use common::{ids, sample_catalog, UNTRANSLATED_ID};
use exodia_catalog::queries::random::effective_size;
use exodia_catalog::{CardCatalog, CatalogError, Connection, RandomSampler, SqlParam};

#[test]
fn non_positive_size_returns_one_card() {
    let catalog = sample_catalog();
    assert_eq!(catalog.random_cards(0).unwrap().len(), 1);
    assert_eq!(catalog.random_cards(-4).unwrap().len(), 1);
}

#[test]
fn returns_at_most_size() {
    let catalog = sample_catalog();
    assert_eq!(catalog.random_cards(3).unwrap().len(), 3);
}

#[test]
fn oversized_request_returns_every_translated_card() {
    let catalog = sample_catalog();
    let mut got = ids(&catalog.random_cards(100).unwrap());
    got.sort();
    assert_eq!(got, vec![1, 2, 3, 4, 6, 7]);
}

#[test]
fn untranslated_cards_are_never_drawn() {
    let catalog = sample_catalog();
    for _ in 0..10 {
        let cards = catalog.random_cards(6).unwrap();
        assert!(cards.iter().all(|c| c.id != UNTRANSLATED_ID));
        assert!(cards.iter().all(|c| c.is_translated()));
    }
}

#[test]
fn no_duplicates_in_one_draw() {
    let catalog = sample_catalog();
    let mut got = ids(&catalog.random_cards(6).unwrap());
    got.sort();
    got.dedup();
    assert_eq!(got.len(), 6);
}

#[test]
fn seeded_draws_repeat() {
    let catalog = sample_catalog();
    let first = ids(&catalog.random_cards(4).unwrap());
    let second = ids(&catalog.random_cards(4).unwrap());
    assert_eq!(first, second);
}

#[test]
fn empty_catalog_returns_empty_sample() {
    let catalog = CardCatalog::builder()
        .in_memory()
        .sample_percent(100.0)
        .build()
        .unwrap();
    assert!(catalog.random_cards(5).unwrap().is_empty());
}

#[test]
fn effective_size_clamps() {
    assert_eq!(effective_size(-3), 1);
    assert_eq!(effective_size(0), 1);
    assert_eq!(effective_size(5), 5);
}

#[test]
fn statement_samples_and_excludes_placeholders() {
    let conn = Connection::open_in_memory().unwrap();
    let (sql, params) = RandomSampler::new(&conn).statement();

    assert!(sql.contains("FROM (SELECT * FROM cards USING SAMPLE 1 PERCENT (bernoulli)) AS sampled"));
    assert!(sql.contains("WHERE name_pt <> ? AND name_fr <> ?"));
    assert_eq!(params, vec![SqlParam::from("name_pt"), SqlParam::from("name_fr")]);
}

#[test]
fn percent_out_of_range_is_rejected() {
    let conn = Connection::open_in_memory().unwrap();
    assert!(matches!(
        RandomSampler::new(&conn).percent(0.0),
        Err(CatalogError::InvalidArgument(_))
    ));
    assert!(matches!(
        RandomSampler::new(&conn).percent(100.5),
        Err(CatalogError::InvalidArgument(_))
    ));
    assert!(RandomSampler::new(&conn).percent(25.0).is_ok());

    let built = CardCatalog::builder().in_memory().sample_percent(-1.0).build();
    assert!(matches!(built, Err(CatalogError::InvalidArgument(_))));
}

#[test]
fn seeded_statement_uses_repeatable_sample() {
    let conn = Connection::open_in_memory().unwrap();
    let (sql, _) = RandomSampler::new(&conn)
        .percent(50.0)
        .unwrap()
        .seed(Some(7))
        .statement();
    assert!(sql.contains("USING SAMPLE 50 PERCENT (bernoulli, 7)"));
}

#[test]
fn seeded_partial_sample_repeats() {
    let catalog = CardCatalog::builder()
        .in_memory()
        .sample_percent(50.0)
        .seed(common::SAMPLE_SEED)
        .build()
        .unwrap();
    common::insert_cards(catalog.connection(), &common::sample_cards());
    catalog
        .connection()
        .session()
        .unwrap()
        .execute_batch("SET threads TO 1")
        .unwrap();

    let first = ids(&catalog.random_cards(10).unwrap());
    for _ in 0..5 {
        assert_eq!(ids(&catalog.random_cards(10).unwrap()), first);
    }
    assert!(first.iter().all(|id| *id != UNTRANSLATED_ID));
}
