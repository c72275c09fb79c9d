//! Query composition
//!
//! Merges the caller's base predicates, the parsed filter DSL and the request's
//! paging parameters into one [`QuerySpec`] a repository can execute.

use crate::error::{Error, Result};
use crate::repository::Pageable;

use super::operator::{FilterCondition, OrderDirection};
use super::parser::FilterParser;
use super::request::PaginationRequest;

/// Field the keyset bounds apply to
pub const CURSOR_FIELD: &str = "id";

/// Normalized query handed to a repository
///
/// Predicates are ANDed. Ordering entries are applied in sequence, the first
/// being the primary sort key and the rest tie-breakers.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySpec {
    /// Conditions every returned row must satisfy
    pub predicates: Vec<FilterCondition>,
    /// Sort fields in priority order
    pub ordering: Vec<(String, OrderDirection)>,
    /// Maximum number of rows
    pub limit: u64,
    /// Rows to skip (offset mode only)
    pub offset: Option<u64>,
}

impl QuerySpec {
    /// The primary sort key and its direction
    pub fn primary_order(&self) -> Option<(&str, OrderDirection)> {
        self.ordering
            .first()
            .map(|(field, direction)| (field.as_str(), *direction))
    }
}

/// Builds a [`QuerySpec`] from a request and the caller's base predicates
///
/// Base predicates are always applied and cannot be overridden: any `where__`
/// key on the same field (or the same relation, for dotted paths) is dropped.
///
/// ```rust
/// use feed_pagination::prelude::*;
///
/// struct Comment;
///
/// impl Pageable for Comment {
///     const ENTITY: &'static str = "Comment";
///     const SORT_KEYS: &'static [&'static str] = &["createdAt", "id"];
///
///     fn cursor_id(&self) -> FilterValue {
///         FilterValue::Integer(0)
///     }
/// }
///
/// let base = [FilterCondition::eq("post.id", 5_i64)];
/// let request = PaginationRequest::from_params(QueryParams::parse("where__post__id=999&take=3"))?;
/// let spec = QueryComposer::new(&base).compose::<Comment>(&request)?;
///
/// assert_eq!(spec.predicates, base.to_vec());
/// assert_eq!(spec.limit, 3);
/// # Ok::<(), feed_pagination::error::Error>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct QueryComposer<'a> {
    base: &'a [FilterCondition],
}

impl<'a> QueryComposer<'a> {
    /// Create a composer with the given base predicates
    pub fn new(base: &'a [FilterCondition]) -> Self {
        Self { base }
    }

    /// Compose the query for entity `T`
    ///
    /// Fails with [`Error::InvalidSortKey`] if any sort field is not listed in
    /// [`Pageable::SORT_KEYS`], before anything is fetched.
    pub fn compose<T: Pageable>(&self, request: &PaginationRequest) -> Result<QuerySpec> {
        let parser = self
            .base
            .iter()
            .fold(FilterParser::new(), |parser, condition| {
                parser.protect(&condition.field)
            });
        let parsed = parser.parse(request.forwarded_params())?;

        let mut ordering = parsed.ordering;
        if ordering.is_empty() {
            ordering.push((T::PRIMARY_SORT_KEY.to_string(), OrderDirection::Ascending));
        }
        if let Some((field, _)) = ordering
            .iter()
            .find(|(field, _)| !T::SORT_KEYS.contains(&field.as_str()))
        {
            return Err(Error::InvalidSortKey {
                entity: T::ENTITY,
                field: field.clone(),
            });
        }

        let mut predicates = self.base.to_vec();
        predicates.extend(parsed.predicates);

        let offset = match request.page {
            Some(page) => Some(request.take.saturating_mul(page - 1)),
            None => {
                match (&request.boundary_more_than, &request.boundary_less_than) {
                    (Some(after), _) => {
                        predicates.push(FilterCondition::more_than(CURSOR_FIELD, after.clone()))
                    }
                    (None, Some(before)) => {
                        predicates.push(FilterCondition::less_than(CURSOR_FIELD, before.clone()))
                    }
                    (None, None) => {}
                }
                None
            }
        };

        let spec = QuerySpec {
            predicates,
            ordering,
            limit: request.take,
            offset,
        };
        tracing::trace!(
            entity = T::ENTITY,
            predicates = spec.predicates.len(),
            ordering = spec.ordering.len(),
            limit = spec.limit,
            offset = ?spec.offset,
            "Composed query"
        );
        Ok(spec)
    }
}
