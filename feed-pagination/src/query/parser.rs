//! Filter DSL parser
//!
//! Turns `where__<field>[__<operator>]=<value>` and `order__<field>=ASC|DESC`
//! query keys into typed predicates and an ordering. Keys without one of the
//! two prefixes are not filters and are skipped.
//!
//! # Example
//!
//! ```rust
//! use feed_pagination::query::{FilterCondition, FilterParser, OrderDirection, QueryParams};
//!
//! let params = QueryParams::parse("where__title__i_like=rust&order__createdAt=DESC&take=5");
//! let parsed = FilterParser::new().parse(params.iter())?;
//!
//! assert_eq!(parsed.predicates, vec![FilterCondition::i_like("title", "%rust%")]);
//! assert_eq!(parsed.ordering, vec![("createdAt".to_string(), OrderDirection::Descending)]);
//! # Ok::<(), feed_pagination::error::Error>(())
//! ```

use std::collections::HashSet;

use crate::error::{Error, Result};

use super::operator::{root_of, FilterCondition, FilterOperator, OrderDirection};

/// Prefix of filter keys
pub const WHERE_PREFIX: &str = "where__";

/// Prefix of ordering keys
pub const ORDER_PREFIX: &str = "order__";

const SEPARATOR: &str = "__";

/// Predicates and ordering collected from one request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedFilters {
    /// At most one predicate per field; a later key for the same field replaces
    /// the earlier one
    pub predicates: Vec<FilterCondition>,
    /// Sort fields in the order they were first sent; a later key for the same
    /// field replaces the direction but keeps the position
    pub ordering: Vec<(String, OrderDirection)>,
}

/// Parser for the `where__`/`order__` key convention
///
/// Fields registered with [`FilterParser::protect`] cannot be filtered by the
/// client: matching `where__` keys are fully validated, then dropped. A key
/// spelling the protected path itself with `__` (`where__post__id` for
/// `post.id`) is dropped without an operator lookup.
#[derive(Debug, Clone, Default)]
pub struct FilterParser {
    protected: HashSet<String>,
    protected_paths: HashSet<String>,
}

impl FilterParser {
    /// Create a parser with no protected fields
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Protect a field (or the relation a dotted path starts with)
    #[must_use]
    pub fn protect(mut self, field: &str) -> Self {
        self.protected.insert(root_of(field).to_string());
        self.protected_paths.insert(field.to_string());
        self
    }

    /// Parse every filter and ordering key in `params`
    pub fn parse<'a, I>(&self, params: I) -> Result<ParsedFilters>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut parsed = ParsedFilters::default();

        for (key, value) in params {
            if let Some(rest) = key.strip_prefix(WHERE_PREFIX) {
                let (field, token) = split_key(key, rest)?;

                if token.is_some_and(|token| self.spells_protected_path(field, token)) {
                    tracing::debug!(key, "Ignoring filter on protected field");
                    continue;
                }

                let condition = match token.and_then(FilterOperator::from_token) {
                    Some(FilterOperator::ILike) => {
                        FilterCondition::from_token(key, field, token, &format!("%{}%", value))?
                    }
                    _ => FilterCondition::from_token(key, field, token, value)?,
                };

                if self.protected.contains(condition.root_field()) {
                    tracing::debug!(key, "Ignoring filter on protected field");
                    continue;
                }
                upsert_predicate(&mut parsed.predicates, condition);
            } else if let Some(rest) = key.strip_prefix(ORDER_PREFIX) {
                let field = match split_key(key, rest)? {
                    (field, None) => field,
                    (_, Some(_)) => {
                        return Err(Error::MalformedFilterKey {
                            key: key.to_string(),
                        })
                    }
                };
                let direction =
                    OrderDirection::from_token(value).ok_or_else(|| Error::InvalidSortDirection {
                        key: key.to_string(),
                        value: value.to_string(),
                    })?;
                upsert_ordering(&mut parsed.ordering, field, direction);
            } else {
                tracing::trace!(key, "Skipping non-filter parameter");
            }
        }

        Ok(parsed)
    }

    /// Whether `<field>__<segment>` is a protected dotted path written with `__`
    fn spells_protected_path(&self, field: &str, segment: &str) -> bool {
        self.protected_paths.contains(&format!("{}.{}", field, segment))
    }
}

/// Split the part of a key after its prefix into `(field, operator)`
fn split_key<'k>(key: &str, rest: &'k str) -> Result<(&'k str, Option<&'k str>)> {
    let segments: Vec<&str> = rest.split(SEPARATOR).collect();

    match segments.as_slice() {
        [field] if !field.is_empty() => Ok((field, None)),
        [field, operator] if !field.is_empty() && !operator.is_empty() => {
            Ok((field, Some(operator)))
        }
        _ => Err(Error::MalformedFilterKey {
            key: key.to_string(),
        }),
    }
}

fn upsert_predicate(predicates: &mut Vec<FilterCondition>, condition: FilterCondition) {
    match predicates.iter_mut().find(|p| p.field == condition.field) {
        Some(existing) => *existing = condition,
        None => predicates.push(condition),
    }
}

fn upsert_ordering(ordering: &mut Vec<(String, OrderDirection)>, field: &str, direction: OrderDirection) {
    match ordering.iter_mut().find(|(f, _)| f == field) {
        Some(existing) => existing.1 = direction,
        None => ordering.push((field.to_string(), direction)),
    }
}
