//! Predicate compilation: canonical filter entries to storage predicates.

use crate::config;
use crate::error::{CatalogError, Result};
use crate::filter::{CanonicalFilter, FieldKind, FilterField, FilterValue};
use crate::sql_builder::{contains_pattern, SqlBuilder, SqlParam, LIKE_ESCAPE};

/// A single filter condition over the `cards` table.
///
/// Distinct predicates are combined with AND.
///
/// Name matching is case-sensitive while every other text match ignores
/// case. Callers relying on either behavior should not assume the other.
///
/// Name matching also covers the translated name columns, which hold the
/// import placeholders (`name_pt`, `name_fr`) until a translation lands. A
/// name filter that is a substring of a placeholder, such as `"name"` or
/// `"pt"`, therefore matches every untranslated card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `field = value`
    Equality { field: FilterField, value: i64 },
    /// `LOWER(field)` contains `LOWER(value)`
    Substring { field: FilterField, value: String },
    /// Any of `columns` contains `value`, case-sensitive, OR-combined.
    MultiLocaleSubstring {
        columns: Vec<&'static str>,
        value: String,
    },
}

impl Predicate {
    /// Append this predicate to a builder as one WHERE condition.
    pub fn apply(&self, qb: &mut SqlBuilder) {
        match self {
            Predicate::Equality { field, value } => {
                qb.where_eq(field.column(), *value);
            }
            Predicate::Substring { field, value } => {
                qb.where_like(field.column(), &contains_pattern(value));
            }
            Predicate::MultiLocaleSubstring { columns, value } => {
                let pattern = contains_pattern(value);
                let conditions: Vec<String> = columns
                    .iter()
                    .map(|c| format!("{} LIKE ? ESCAPE '{}'", c, LIKE_ESCAPE))
                    .collect();
                let pairs: Vec<(&str, SqlParam)> = conditions
                    .iter()
                    .map(|c| (c.as_str(), SqlParam::Text(pattern.clone())))
                    .collect();
                qb.where_or(&pairs);
            }
        }
    }
}

/// Output of [`compile`]: predicates in field order plus the page window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledQuery {
    pub predicates: Vec<Predicate>,
    pub limit: usize,
    pub offset: usize,
}

impl CompiledQuery {
    /// Add every predicate to `qb` (pagination is left to the caller).
    pub fn apply(&self, qb: &mut SqlBuilder) {
        for predicate in &self.predicates {
            predicate.apply(qb);
        }
    }
}

/// Compile a canonical filter into predicates and pagination.
///
/// Fails with [`CatalogError::Translation`] when a value's type does not
/// match its field's kind. Missing pagination entries fall back to the
/// defaults.
pub fn compile(filter: &CanonicalFilter) -> Result<CompiledQuery> {
    let mut predicates = Vec::new();
    let mut limit = config::DEFAULT_LIMIT;
    let mut offset = config::DEFAULT_OFFSET;

    for (field, value) in filter.iter() {
        match (field.kind(), value) {
            (FieldKind::MultiLocaleSubstring, FilterValue::Text(text)) => {
                predicates.push(Predicate::MultiLocaleSubstring {
                    columns: config::NAME_COLUMNS.to_vec(),
                    value: text.clone(),
                });
            }
            (FieldKind::TextSubstring, FilterValue::Text(text)) => {
                predicates.push(Predicate::Substring {
                    field,
                    value: text.clone(),
                });
            }
            (FieldKind::NumericEquality, FilterValue::Integer(n)) => {
                predicates.push(Predicate::Equality { field, value: *n });
            }
            (FieldKind::Pagination, FilterValue::Integer(n)) => {
                let n = usize::try_from(*n).map_err(|_| {
                    CatalogError::translation(
                        field.as_str(),
                        format!("expected a non-negative integer, got {}", n),
                    )
                })?;
                if field == FilterField::Limit {
                    limit = if n == 0 { config::DEFAULT_LIMIT } else { n };
                } else {
                    offset = n;
                }
            }
            (kind, value) => {
                return Err(CatalogError::translation(
                    field.as_str(),
                    format!("{:?} field cannot take {} value", kind, value.type_name()),
                ));
            }
        }
    }

    Ok(CompiledQuery {
        predicates,
        limit,
        offset,
    })
}
