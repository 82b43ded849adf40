//! Card filters: the raw request shape and its canonical, default-applied form.
//!
//! [`CardFilter`] is what a caller (or the request-binding layer via
//! [`CardFilter::from_pairs`]) supplies. [`CardFilter::normalize`] turns it
//! into a [`CanonicalFilter`] holding only the fields that were actually
//! requested, each tagged with its declared [`FieldKind`], plus pagination
//! with defaults applied.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config;
use crate::error::{CatalogError, Result};

// ---------------------------------------------------------------------------
// FilterField / FieldKind
// ---------------------------------------------------------------------------

/// How a field is matched once compiled into a predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Exact integer match on a single column.
    NumericEquality,
    /// Case-insensitive substring match on a single column.
    TextSubstring,
    /// Case-sensitive substring match across all locale name columns.
    MultiLocaleSubstring,
    /// Window parameter; never compiled into a predicate.
    Pagination,
}

/// Every field a card filter understands.
///
/// Declaration order is the order in which predicates are compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterField {
    Name,
    CardType,
    Attribute,
    Archetype,
    Race,
    Level,
    Atk,
    Def,
    Limit,
    Offset,
}

impl FilterField {
    pub const ALL: [FilterField; 10] = [
        FilterField::Name,
        FilterField::CardType,
        FilterField::Attribute,
        FilterField::Archetype,
        FilterField::Race,
        FilterField::Level,
        FilterField::Atk,
        FilterField::Def,
        FilterField::Limit,
        FilterField::Offset,
    ];

    /// The declared kind of this field.
    pub fn kind(self) -> FieldKind {
        match self {
            FilterField::Name => FieldKind::MultiLocaleSubstring,
            FilterField::CardType
            | FilterField::Attribute
            | FilterField::Archetype
            | FilterField::Race => FieldKind::TextSubstring,
            FilterField::Level | FilterField::Atk | FilterField::Def => FieldKind::NumericEquality,
            FilterField::Limit | FilterField::Offset => FieldKind::Pagination,
        }
    }

    /// Wire name as used in request parameters.
    pub fn as_str(self) -> &'static str {
        match self {
            FilterField::Name => "name",
            FilterField::CardType => "type",
            FilterField::Attribute => "attribute",
            FilterField::Archetype => "archetype",
            FilterField::Race => "race",
            FilterField::Level => "level",
            FilterField::Atk => "atk",
            FilterField::Def => "def",
            FilterField::Limit => "limit",
            FilterField::Offset => "offset",
        }
    }

    /// Column this field filters on, quoted where needed.
    ///
    /// `Name` maps to the default-locale column; the compiler expands it to
    /// every locale.
    pub fn column(self) -> &'static str {
        match self {
            FilterField::Name => "name",
            FilterField::CardType => "\"type\"",
            FilterField::Attribute => "\"attribute\"",
            FilterField::Archetype => "archetype",
            FilterField::Race => "race",
            FilterField::Level => "\"level\"",
            FilterField::Atk => "atk",
            FilterField::Def => "def",
            FilterField::Limit => "limit",
            FilterField::Offset => "offset",
        }
    }

    /// Resolve a request key. `cardType` is accepted as an alias of `type`.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "cardType" => Some(FilterField::CardType),
            other => FilterField::ALL.into_iter().find(|f| f.as_str() == other),
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// FilterValue
// ---------------------------------------------------------------------------

/// A type-tagged filter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Integer(i64),
    Text(String),
}

impl FilterValue {
    pub(crate) fn type_name(&self) -> &'static str {
        match self {
            FilterValue::Integer(_) => "integer",
            FilterValue::Text(_) => "text",
        }
    }
}

// ---------------------------------------------------------------------------
// CardFilter
// ---------------------------------------------------------------------------

/// Filter criteria for a card query.
///
/// Every field is optional; `None` means "not requested". Stat fields set to
/// `Some(0)` filter for zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardFilter {
    pub name: Option<String>,
    #[serde(rename = "type", alias = "cardType")]
    pub card_type: Option<String>,
    pub attribute: Option<String>,
    pub archetype: Option<String>,
    pub race: Option<String>,
    pub level: Option<i64>,
    pub atk: Option<i64>,
    pub def: Option<i64>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl CardFilter {
    /// Bind raw key/value pairs, as decoded from a query string.
    ///
    /// Unknown keys are ignored and blank values are treated as absent. Text
    /// values are kept as given, surrounding whitespace included; numbers may
    /// be padded. A value that does not parse as the field's type is a
    /// translation error.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut filter = CardFilter::default();

        for (key, value) in pairs {
            let Some(field) = FilterField::from_key(key.as_ref()) else {
                continue;
            };
            let raw = value.as_ref();
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                continue;
            }

            match field {
                FilterField::Name => filter.name = Some(raw.to_string()),
                FilterField::CardType => filter.card_type = Some(raw.to_string()),
                FilterField::Attribute => filter.attribute = Some(raw.to_string()),
                FilterField::Archetype => filter.archetype = Some(raw.to_string()),
                FilterField::Race => filter.race = Some(raw.to_string()),
                FilterField::Level => filter.level = Some(parse_integer(field, trimmed)?),
                FilterField::Atk => filter.atk = Some(parse_integer(field, trimmed)?),
                FilterField::Def => filter.def = Some(parse_integer(field, trimmed)?),
                FilterField::Limit => filter.limit = Some(parse_count(field, trimmed)?),
                FilterField::Offset => filter.offset = Some(parse_count(field, trimmed)?),
            }
        }

        Ok(filter)
    }

    /// Produce the canonical form of this filter.
    ///
    /// Empty text values are dropped. A missing or zero `limit` becomes 10 and
    /// a missing `offset` becomes 0. Never fails.
    pub fn normalize(&self) -> CanonicalFilter {
        let mut canonical = CanonicalFilter::default();

        let text_fields = [
            (FilterField::Name, &self.name),
            (FilterField::CardType, &self.card_type),
            (FilterField::Attribute, &self.attribute),
            (FilterField::Archetype, &self.archetype),
            (FilterField::Race, &self.race),
        ];
        for (field, value) in text_fields {
            if let Some(v) = value.as_deref().filter(|v| !v.is_empty()) {
                canonical.insert(field, FilterValue::Text(v.to_string()));
            }
        }

        let stat_fields = [
            (FilterField::Level, self.level),
            (FilterField::Atk, self.atk),
            (FilterField::Def, self.def),
        ];
        for (field, value) in stat_fields {
            if let Some(v) = value {
                canonical.insert(field, FilterValue::Integer(v));
            }
        }

        let limit = match self.limit {
            Some(n) if n > 0 => n,
            _ => config::DEFAULT_LIMIT,
        };
        let offset = self.offset.unwrap_or(config::DEFAULT_OFFSET);
        canonical.insert(FilterField::Limit, FilterValue::Integer(count_to_i64(limit)));
        canonical.insert(FilterField::Offset, FilterValue::Integer(count_to_i64(offset)));

        canonical
    }
}

fn count_to_i64(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

fn parse_integer(field: FilterField, raw: &str) -> Result<i64> {
    raw.parse::<i64>().map_err(|_| {
        CatalogError::translation(field.as_str(), format!("expected an integer, got '{}'", raw))
    })
}

fn parse_count(field: FilterField, raw: &str) -> Result<usize> {
    raw.parse::<usize>().map_err(|_| {
        CatalogError::translation(
            field.as_str(),
            format!("expected a non-negative integer, got '{}'", raw),
        )
    })
}

// ---------------------------------------------------------------------------
// CanonicalFilter
// ---------------------------------------------------------------------------

/// The normalized filter: active fields only, each with a typed value.
///
/// Produced by [`CardFilter::normalize`], which guarantees `limit` and
/// `offset` are present. Entries iterate in [`FilterField`] order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalFilter {
    entries: BTreeMap<FilterField, FilterValue>,
}

impl CanonicalFilter {
    /// Set (or replace) the value for `field`.
    pub fn insert(&mut self, field: FilterField, value: FilterValue) -> &mut Self {
        self.entries.insert(field, value);
        self
    }

    pub fn get(&self, field: FilterField) -> Option<&FilterValue> {
        self.entries.get(&field)
    }

    pub fn contains(&self, field: FilterField) -> bool {
        self.entries.contains_key(&field)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FilterField, &FilterValue)> {
        self.entries.iter().map(|(f, v)| (*f, v))
    }
}
