//! Filter normalization, request binding and predicate compilation.

use exodia_catalog::{
    compile, CanonicalFilter, CardFilter, CatalogError, FieldKind, FilterField, FilterValue,
    Predicate,
};

// ---------------------------------------------------------------------------
// normalize
// ---------------------------------------------------------------------------

#[test]
fn empty_filter_normalizes_to_default_window() {
    let canonical = CardFilter::default().normalize();
    assert_eq!(canonical.len(), 2);
    assert_eq!(canonical.get(FilterField::Limit), Some(&FilterValue::Integer(10)));
    assert_eq!(canonical.get(FilterField::Offset), Some(&FilterValue::Integer(0)));
}

#[test]
fn empty_text_is_dropped() {
    let filter = CardFilter {
        name: Some(String::new()),
        race: Some("Dragon".into()),
        ..Default::default()
    };
    let canonical = filter.normalize();
    assert!(!canonical.contains(FilterField::Name));
    assert_eq!(
        canonical.get(FilterField::Race),
        Some(&FilterValue::Text("Dragon".into()))
    );
}

#[test]
fn zero_stats_are_kept() {
    let filter = CardFilter {
        atk: Some(0),
        def: Some(0),
        ..Default::default()
    };
    let canonical = filter.normalize();
    assert_eq!(canonical.get(FilterField::Atk), Some(&FilterValue::Integer(0)));
    assert_eq!(canonical.get(FilterField::Def), Some(&FilterValue::Integer(0)));
    assert!(!canonical.contains(FilterField::Level));
}

#[test]
fn zero_limit_becomes_default() {
    let filter = CardFilter {
        limit: Some(0),
        offset: Some(30),
        ..Default::default()
    };
    let canonical = filter.normalize();
    assert_eq!(canonical.get(FilterField::Limit), Some(&FilterValue::Integer(10)));
    assert_eq!(canonical.get(FilterField::Offset), Some(&FilterValue::Integer(30)));
}

#[test]
fn canonical_entries_follow_field_order() {
    let filter = CardFilter {
        def: Some(2000),
        name: Some("Elf".into()),
        attribute: Some("LIGHT".into()),
        ..Default::default()
    };
    let fields: Vec<FilterField> = filter.normalize().iter().map(|(f, _)| f).collect();
    assert_eq!(
        fields,
        vec![
            FilterField::Name,
            FilterField::Attribute,
            FilterField::Def,
            FilterField::Limit,
            FilterField::Offset,
        ]
    );
}

// ---------------------------------------------------------------------------
// from_pairs / serde binding
// ---------------------------------------------------------------------------

#[test]
fn from_pairs_binds_known_keys() {
    let filter = CardFilter::from_pairs([
        ("name", "Dragon"),
        ("cardType", "Spell"),
        ("atk", "0"),
        ("race", ""),
        ("unknown", "ignored"),
        ("limit", "5"),
    ])
    .unwrap();

    assert_eq!(filter.name.as_deref(), Some("Dragon"));
    assert_eq!(filter.card_type.as_deref(), Some("Spell"));
    assert_eq!(filter.atk, Some(0));
    assert_eq!(filter.race, None);
    assert_eq!(filter.limit, Some(5));
    assert_eq!(filter.offset, None);
}

#[test]
fn from_pairs_rejects_non_integer_stat() {
    let err = CardFilter::from_pairs([("atk", "lots")]).unwrap_err();
    match err {
        CatalogError::Translation { field, .. } => assert_eq!(field, "atk"),
        other => panic!("expected translation error, got {other:?}"),
    }
}

#[test]
fn from_pairs_rejects_negative_limit() {
    let err = CardFilter::from_pairs([("limit", "-1")]).unwrap_err();
    assert!(matches!(err, CatalogError::Translation { ref field, .. } if field == "limit"));
}

#[test]
fn filter_deserializes_type_and_alias() {
    let a: CardFilter = serde_json::from_str(r#"{"type": "Spell Card", "atk": 0}"#).unwrap();
    let b: CardFilter = serde_json::from_str(r#"{"cardType": "Spell Card", "atk": 0}"#).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.card_type.as_deref(), Some("Spell Card"));
    assert_eq!(a.atk, Some(0));
    assert_eq!(a.limit, None);
}

#[test]
fn field_keys_and_kinds() {
    assert_eq!(FilterField::from_key("type"), Some(FilterField::CardType));
    assert_eq!(FilterField::from_key("cardType"), Some(FilterField::CardType));
    assert_eq!(FilterField::from_key("price"), None);
    assert_eq!(FilterField::Name.kind(), FieldKind::MultiLocaleSubstring);
    assert_eq!(FilterField::Race.kind(), FieldKind::TextSubstring);
    assert_eq!(FilterField::Level.kind(), FieldKind::NumericEquality);
    assert_eq!(FilterField::Offset.kind(), FieldKind::Pagination);
}

// ---------------------------------------------------------------------------
// compile
// ---------------------------------------------------------------------------

#[test]
fn compile_emits_one_predicate_per_active_field() {
    let filter = CardFilter {
        name: Some("Dragon".into()),
        card_type: Some("monster".into()),
        atk: Some(3000),
        limit: Some(3),
        offset: Some(6),
        ..Default::default()
    };
    let compiled = compile(&filter.normalize()).unwrap();

    assert_eq!(compiled.limit, 3);
    assert_eq!(compiled.offset, 6);
    assert_eq!(
        compiled.predicates,
        vec![
            Predicate::MultiLocaleSubstring {
                columns: vec!["name", "name_pt", "name_fr"],
                value: "Dragon".into(),
            },
            Predicate::Substring {
                field: FilterField::CardType,
                value: "monster".into(),
            },
            Predicate::Equality {
                field: FilterField::Atk,
                value: 3000,
            },
        ]
    );
}

#[test]
fn compile_without_pagination_uses_defaults() {
    let compiled = compile(&CanonicalFilter::default()).unwrap();
    assert!(compiled.predicates.is_empty());
    assert_eq!(compiled.limit, 10);
    assert_eq!(compiled.offset, 0);
}

#[test]
fn compile_rejects_kind_mismatch() {
    let mut canonical = CanonicalFilter::default();
    canonical.insert(FilterField::Atk, FilterValue::Text("high".into()));

    let err = compile(&canonical).unwrap_err();
    assert!(matches!(err, CatalogError::Translation { ref field, .. } if field == "atk"));
}

#[test]
fn compile_rejects_integer_name() {
    let mut canonical = CanonicalFilter::default();
    canonical.insert(FilterField::Name, FilterValue::Integer(1));

    let err = compile(&canonical).unwrap_err();
    assert!(matches!(err, CatalogError::Translation { ref field, .. } if field == "name"));
}

#[test]
fn compile_rejects_negative_offset() {
    let mut canonical = CanonicalFilter::default();
    canonical.insert(FilterField::Offset, FilterValue::Integer(-1));

    let err = compile(&canonical).unwrap_err();
    assert!(matches!(err, CatalogError::Translation { ref field, .. } if field == "offset"));
}

#[test]
fn from_pairs_keeps_text_as_given() {
    let filter = CardFilter::from_pairs([
        ("name", " Dark "),
        ("race", "   "),
        ("level", " 7 "),
    ])
    .unwrap();

    assert_eq!(filter.name.as_deref(), Some(" Dark "));
    assert_eq!(filter.race, None);
    assert_eq!(filter.level, Some(7));

    let direct = CardFilter {
        name: Some(" Dark ".into()),
        level: Some(7),
        ..Default::default()
    };
    assert_eq!(filter.normalize(), direct.normalize());
}
