//! In-process repository
//!
//! [`InMemoryRepository`] evaluates a [`QuerySpec`] against a `Vec` of
//! entities. It backs the test suite and small services that keep their data
//! in memory.

use std::cmp::Ordering;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::query::{FilterCondition, FilterOperator, FilterValue, OrderDirection, QuerySpec};

use super::error::{RepositoryError, RepositoryOperation};
use super::traits::{FieldAccess, PaginationRepository, RepositoryResult};

/// Repository over an in-memory list of entities
///
/// Cloning is cheap and clones share the same rows.
///
/// ```rust
/// use feed_pagination::prelude::*;
///
/// #[derive(Clone)]
/// struct Tag(String);
///
/// impl FieldAccess for Tag {
///     fn field_value(&self, field: &str) -> Option<FilterValue> {
///         (field == "name").then(|| FilterValue::from(self.0.as_str()))
///     }
/// }
///
/// # #[tokio::main]
/// # async fn main() {
/// let repo = InMemoryRepository::new(vec![Tag("rust".into()), Tag("go".into())]);
/// let spec = QuerySpec {
///     predicates: vec![FilterCondition::like("name", "r%")],
///     ordering: vec![],
///     limit: 10,
///     offset: None,
/// };
/// let rows = repo.find_many(&spec).await.unwrap();
/// assert_eq!(rows.len(), 1);
/// # }
/// ```
#[derive(Debug)]
pub struct InMemoryRepository<T> {
    rows: Arc<RwLock<Vec<T>>>,
    failure: Arc<RwLock<Option<RepositoryError>>>,
}

impl<T> Clone for InMemoryRepository<T> {
    fn clone(&self) -> Self {
        Self {
            rows: Arc::clone(&self.rows),
            failure: Arc::clone(&self.failure),
        }
    }
}

impl<T> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T> InMemoryRepository<T> {
    /// Create a repository holding `rows` in insertion order
    pub fn new(rows: Vec<T>) -> Self {
        Self {
            rows: Arc::new(RwLock::new(rows)),
            failure: Arc::new(RwLock::new(None)),
        }
    }

    /// Append a row
    pub async fn insert(&self, row: T) {
        self.rows.write().await.push(row);
    }

    /// Number of stored rows
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    /// Whether no rows are stored
    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    /// Make every following fetch fail with `error` (pass `None` to recover)
    ///
    /// The error's operation is set to the fetch that observes it.
    pub async fn set_failure(&self, error: Option<RepositoryError>) {
        *self.failure.write().await = error;
    }

    async fn check_failure(&self, operation: RepositoryOperation) -> RepositoryResult<()> {
        match self.failure.read().await.as_ref() {
            Some(error) => Err(error.clone().with_operation(operation)),
            None => Ok(()),
        }
    }
}

impl<T> InMemoryRepository<T>
where
    T: FieldAccess + Clone,
{
    /// Rows matching every predicate, sorted by the spec's ordering
    async fn select(&self, spec: &QuerySpec) -> Vec<T> {
        let rows = self.rows.read().await;
        let mut matched: Vec<T> = rows
            .iter()
            .filter(|row| spec.predicates.iter().all(|c| matches(*row, c)))
            .cloned()
            .collect();
        matched.sort_by(|a, b| compare_rows(a, b, &spec.ordering));
        matched
    }
}

impl<T> PaginationRepository<T> for InMemoryRepository<T>
where
    T: FieldAccess + Clone + Send + Sync,
{
    async fn find_many(&self, spec: &QuerySpec) -> RepositoryResult<Vec<T>> {
        self.check_failure(RepositoryOperation::FindMany).await?;
        let matched = self.select(spec).await;
        Ok(window(matched, spec))
    }

    async fn find_many_with_count(&self, spec: &QuerySpec) -> RepositoryResult<(Vec<T>, u64)> {
        self.check_failure(RepositoryOperation::FindManyWithCount)
            .await?;
        let matched = self.select(spec).await;
        let total = matched.len() as u64;
        Ok((window(matched, spec), total))
    }
}

fn window<T>(rows: Vec<T>, spec: &QuerySpec) -> Vec<T> {
    let skip = usize::try_from(spec.offset.unwrap_or(0)).unwrap_or(usize::MAX);
    let take = usize::try_from(spec.limit).unwrap_or(usize::MAX);
    rows.into_iter().skip(skip).take(take).collect()
}

fn matches<T: FieldAccess>(row: &T, condition: &FilterCondition) -> bool {
    let Some(actual) = row.field_value(&condition.field) else {
        return false;
    };
    let compare = |expected: &FilterValue| actual.compare(&as_field_type(&actual, expected));

    match condition.operator {
        FilterOperator::Equal => compare(&condition.value) == Some(Ordering::Equal),
        FilterOperator::MoreThan => compare(&condition.value) == Some(Ordering::Greater),
        FilterOperator::LessThan => compare(&condition.value) == Some(Ordering::Less),
        FilterOperator::Like => like(&actual.to_string(), &condition.value.to_string()),
        FilterOperator::ILike => like(
            &actual.to_string().to_lowercase(),
            &condition.value.to_string().to_lowercase(),
        ),
        FilterOperator::Between => match &condition.value {
            FilterValue::Range(lo, hi) => {
                matches!(compare(lo.as_ref()), Some(Ordering::Greater | Ordering::Equal))
                    && matches!(compare(hi.as_ref()), Some(Ordering::Less | Ordering::Equal))
            }
            _ => false,
        },
    }
}

/// Filter values are coerced from query text; a string field compares
/// against that text. Numbers never match non-numeric text.
fn as_field_type(actual: &FilterValue, expected: &FilterValue) -> FilterValue {
    match (actual, expected) {
        (
            FilterValue::String(_),
            FilterValue::Integer(_) | FilterValue::Float(_) | FilterValue::Boolean(_),
        ) => FilterValue::String(expected.to_string()),
        _ => expected.clone(),
    }
}

fn compare_rows<T: FieldAccess>(a: &T, b: &T, ordering: &[(String, OrderDirection)]) -> Ordering {
    for (field, direction) in ordering {
        let ord = match (a.field_value(field), b.field_value(field)) {
            (Some(x), Some(y)) => x.compare(&y).unwrap_or(Ordering::Equal),
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        let ord = match direction {
            OrderDirection::Ascending => ord,
            OrderDirection::Descending => ord.reverse(),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

/// SQL `LIKE` matching: `%` is any run of characters, `_` exactly one
fn like(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();

    let (mut t, mut p) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        match pattern.get(p) {
            Some('%') => {
                backtrack = Some((p, t));
                p += 1;
            }
            Some(&c) if c == '_' || c == text[t] => {
                t += 1;
                p += 1;
            }
            _ => match backtrack {
                Some((star, start)) => {
                    p = star + 1;
                    t = start + 1;
                    backtrack = Some((star, start + 1));
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|&c| c == '%')
}
