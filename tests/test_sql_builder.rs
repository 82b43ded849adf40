//! Unit tests for the SqlBuilder query construction.

use exodia_catalog::sql_builder::contains_pattern;
use exodia_catalog::{SqlBuilder, SqlParam};

// ---------------------------------------------------------------------------
// Basic construction
// ---------------------------------------------------------------------------

#[test]
fn new_creates_select_star_from_table() {
    let (sql, params) = SqlBuilder::new("cards").build();
    assert_eq!(sql, "SELECT *\nFROM cards");
    assert!(params.is_empty());
}

#[test]
fn select_replaces_default_star() {
    let (sql, _) = SqlBuilder::new("cards").select(&["id", "name"]).build();
    assert!(sql.starts_with("SELECT id, name\n"));
}

// ---------------------------------------------------------------------------
// WHERE conditions
// ---------------------------------------------------------------------------

#[test]
fn where_eq_binds_typed_param() {
    let (sql, params) = SqlBuilder::new("cards").where_eq("atk", 3000_i64).build();
    assert!(sql.contains("WHERE atk = ?"));
    assert_eq!(params, vec![SqlParam::Int(3000)]);
}

#[test]
fn where_ne_adds_inequality() {
    let (sql, params) = SqlBuilder::new("cards")
        .where_ne("name_pt", "name_pt")
        .build();
    assert!(sql.contains("WHERE name_pt <> ?"));
    assert_eq!(params, vec![SqlParam::from("name_pt")]);
}

#[test]
fn where_like_adds_case_insensitive_like_with_escape() {
    let (sql, params) = SqlBuilder::new("cards")
        .where_like("race", "%dragon%")
        .build();
    assert!(sql.contains("LOWER(race) LIKE LOWER(?) ESCAPE '\\'"));
    assert_eq!(params, vec![SqlParam::from("%dragon%")]);
}

#[test]
fn where_or_wraps_conditions_in_parens() {
    let (sql, params) = SqlBuilder::new("cards")
        .where_or(&[
            ("name LIKE ?", SqlParam::from("%a%")),
            ("name_pt LIKE ?", SqlParam::from("%a%")),
        ])
        .build();
    assert!(sql.contains("WHERE (name LIKE ? OR name_pt LIKE ?)"));
    assert_eq!(params.len(), 2);
}

#[test]
fn where_or_empty_is_noop() {
    let (sql, params) = SqlBuilder::new("cards").where_or(&[]).build();
    assert!(!sql.contains("WHERE"));
    assert!(params.is_empty());
}

#[test]
fn multiple_where_clauses_joined_with_and() {
    let (sql, params) = SqlBuilder::new("cards")
        .where_eq("level", 7_i64)
        .where_like("\"attribute\"", "%dark%")
        .build();
    assert!(sql.contains("WHERE level = ? AND LOWER(\"attribute\") LIKE LOWER(?)"));
    assert_eq!(params, vec![SqlParam::Int(7), SqlParam::from("%dark%")]);
}

#[test]
fn where_clause_appends_params_in_order() {
    let (sql, params) = SqlBuilder::new("cards")
        .where_clause("atk BETWEEN ? AND ?", &[SqlParam::Int(1000), SqlParam::Int(2000)])
        .build();
    assert!(sql.contains("WHERE atk BETWEEN ? AND ?"));
    assert_eq!(params, vec![SqlParam::Int(1000), SqlParam::Int(2000)]);
}

// ---------------------------------------------------------------------------
// ORDER BY / LIMIT / OFFSET
// ---------------------------------------------------------------------------

#[test]
fn order_limit_offset_are_emitted_in_order() {
    let (sql, _) = SqlBuilder::new("cards")
        .order_by(&["id ASC"])
        .limit(10)
        .offset(20)
        .build();
    assert_eq!(sql, "SELECT *\nFROM cards\nORDER BY id ASC\nLIMIT 10\nOFFSET 20");
}

// ---------------------------------------------------------------------------
// build_count
// ---------------------------------------------------------------------------

#[test]
fn build_count_ignores_window_and_order() {
    let mut qb = SqlBuilder::new("cards");
    qb.select(&["id"])
        .where_eq("atk", 0_i64)
        .order_by(&["id ASC"])
        .limit(5)
        .offset(5);

    let (sql, params) = qb.build_count();
    assert_eq!(sql, "SELECT COUNT(*) AS total\nFROM cards\nWHERE atk = ?");
    assert_eq!(params, vec![SqlParam::Int(0)]);
}

// ---------------------------------------------------------------------------
// contains_pattern
// ---------------------------------------------------------------------------

#[test]
fn contains_pattern_wraps_needle() {
    assert_eq!(contains_pattern("Dragon"), "%Dragon%");
}

#[test]
fn contains_pattern_escapes_wildcards() {
    assert_eq!(contains_pattern("100%"), "%100\\%%");
    assert_eq!(contains_pattern("a_b"), "%a\\_b%");
    assert_eq!(contains_pattern("x\\y"), "%x\\\\y%");
}

#[test]
fn sql_param_display() {
    assert_eq!(SqlParam::Int(3).to_string(), "3");
    assert_eq!(SqlParam::from("Spell").to_string(), "'Spell'");
}
