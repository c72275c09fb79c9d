//! The operator table and the typed predicates it produces
//!
//! A `where__<field>__<operator>` key names an operator token; the table
//! turns that token and the raw query-string value into a [`FilterCondition`].
//!
//! | token       | condition                                  |
//! |-------------|--------------------------------------------|
//! | `equal`     | `field = value` (used when no token given) |
//! | `more_than` | `field > value`                            |
//! | `less_than` | `field < value`                            |
//! | `like`      | case-sensitive pattern match, verbatim     |
//! | `i_like`    | case-insensitive pattern match             |
//! | `between`   | `lo <= field <= hi` from `lo,hi`           |
//!
//! # Example
//!
//! ```rust
//! use feed_pagination::query::{FilterCondition, FilterOperator, FilterValue};
//!
//! let condition = FilterCondition::from_token("where__likes__more_than", "likes", Some("more_than"), "10")?;
//! assert_eq!(condition.operator, FilterOperator::MoreThan);
//! assert_eq!(condition.value, FilterValue::Integer(10));
//! # Ok::<(), feed_pagination::error::Error>(())
//! ```

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};

/// Direction for ordering results
///
/// On the wire the direction is spelled exactly `ASC` or `DESC`.
///
/// ```rust
/// use feed_pagination::query::OrderDirection;
///
/// assert_eq!(OrderDirection::from_token("DESC"), Some(OrderDirection::Descending));
/// assert_eq!(OrderDirection::from_token("desc"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum OrderDirection {
    /// Sort in ascending order (oldest first for timestamps)
    #[default]
    #[serde(rename = "ASC")]
    Ascending,
    /// Sort in descending order (newest first for timestamps)
    #[serde(rename = "DESC")]
    Descending,
}

impl OrderDirection {
    /// Parse a wire token; only `ASC` and `DESC` are accepted
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "ASC" => Some(Self::Ascending),
            "DESC" => Some(Self::Descending),
            _ => None,
        }
    }

    /// The wire token for this direction
    #[must_use]
    pub const fn as_token(&self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

/// Comparison operators understood by the filter DSL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterOperator {
    /// Equal to (`equal`, the default)
    Equal,
    /// Strictly greater than (`more_than`)
    MoreThan,
    /// Strictly less than (`less_than`)
    LessThan,
    /// Case-sensitive pattern match (`like`)
    Like,
    /// Case-insensitive pattern match (`i_like`)
    ILike,
    /// Inclusive range (`between`)
    Between,
}

impl FilterOperator {
    /// Look up an operator by its wire token
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "equal" => Some(Self::Equal),
            "more_than" => Some(Self::MoreThan),
            "less_than" => Some(Self::LessThan),
            "like" => Some(Self::Like),
            "i_like" => Some(Self::ILike),
            "between" => Some(Self::Between),
            _ => None,
        }
    }

    /// The wire token for this operator
    #[must_use]
    pub const fn as_token(&self) -> &'static str {
        match self {
            Self::Equal => "equal",
            Self::MoreThan => "more_than",
            Self::LessThan => "less_than",
            Self::Like => "like",
            Self::ILike => "i_like",
            Self::Between => "between",
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

/// A value a filter compares against
///
/// Query-string values arrive as text and are coerced with
/// [`FilterValue::coerce`]; pattern operators keep the text as-is.
///
/// ```rust
/// use feed_pagination::query::FilterValue;
///
/// assert_eq!(FilterValue::coerce("42"), FilterValue::Integer(42));
/// assert_eq!(FilterValue::coerce("true"), FilterValue::Boolean(true));
/// assert_eq!(FilterValue::coerce("hello"), FilterValue::String("hello".into()));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// String value
    String(String),
    /// 64-bit integer value
    Integer(i64),
    /// 64-bit floating point value
    Float(f64),
    /// Boolean value
    Boolean(bool),
    /// Inclusive bounds for `between`
    Range(Box<FilterValue>, Box<FilterValue>),
}

impl FilterValue {
    /// Coerce a raw query-string value into the narrowest scalar it parses as
    pub fn coerce(raw: &str) -> Self {
        match raw {
            "true" => return Self::Boolean(true),
            "false" => return Self::Boolean(false),
            _ => {}
        }
        if let Ok(n) = raw.parse::<i64>() {
            return Self::Integer(n);
        }
        if let Ok(n) = raw.parse::<f64>() {
            if n.is_finite() {
                return Self::Float(n);
            }
        }
        Self::String(raw.to_string())
    }

    /// Compare two scalar values
    ///
    /// Numbers compare numerically across integer and float, strings and
    /// booleans compare within their own type. Any other pairing, and any
    /// range, is not comparable.
    pub fn compare(&self, other: &FilterValue) -> Option<Ordering> {
        use FilterValue::*;

        match (self, other) {
            (Range(..), _) | (_, Range(..)) => None,
            (Integer(a), Integer(b)) => Some(a.cmp(b)),
            (Integer(a), Float(b)) => (*a as f64).partial_cmp(b),
            (Float(a), Integer(b)) => a.partial_cmp(&(*b as f64)),
            (Float(a), Float(b)) => a.partial_cmp(b),
            (String(a), String(b)) => Some(a.cmp(b)),
            (Boolean(a), Boolean(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Integer(n) => write!(f, "{}", n),
            Self::Float(n) => write!(f, "{}", n),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::Range(lo, hi) => write!(f, "{},{}", lo, hi),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for FilterValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<i32> for FilterValue {
    fn from(n: i32) -> Self {
        Self::Integer(i64::from(n))
    }
}

impl From<f64> for FilterValue {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

/// A single predicate on one field
///
/// Fields may be dotted paths (`post.id`) when a condition reaches into a
/// relation; [`FilterCondition::root_field`] gives the relation name.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCondition {
    /// The field name to filter on
    pub field: String,
    /// The comparison operator
    pub operator: FilterOperator,
    /// The value to compare against
    pub value: FilterValue,
}

impl FilterCondition {
    /// Create a new filter condition
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: FilterValue) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
        }
    }

    /// Create an equality filter (field = value)
    ///
    /// ```rust
    /// use feed_pagination::query::FilterCondition;
    ///
    /// // Scope a comment listing to one post
    /// let base = FilterCondition::eq("post.id", 5_i64);
    /// assert_eq!(base.root_field(), "post");
    /// ```
    pub fn eq(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOperator::Equal, value.into())
    }

    /// Create a greater-than filter (field > value)
    pub fn more_than(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOperator::MoreThan, value.into())
    }

    /// Create a less-than filter (field < value)
    pub fn less_than(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOperator::LessThan, value.into())
    }

    /// Create a case-sensitive LIKE filter; the pattern is used verbatim
    pub fn like(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::new(field, FilterOperator::Like, FilterValue::String(pattern.into()))
    }

    /// Create a case-insensitive LIKE filter; the pattern is used verbatim
    pub fn i_like(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::new(field, FilterOperator::ILike, FilterValue::String(pattern.into()))
    }

    /// Create an inclusive range filter (lo <= field <= hi)
    pub fn between(
        field: impl Into<String>,
        lo: impl Into<FilterValue>,
        hi: impl Into<FilterValue>,
    ) -> Self {
        Self::new(
            field,
            FilterOperator::Between,
            FilterValue::Range(Box::new(lo.into()), Box::new(hi.into())),
        )
    }

    /// Dispatch an operator token to its constructor
    ///
    /// `key` is the full query key and is only used to name the culprit in
    /// errors. A missing token means `equal`. The value is passed through as
    /// given: wrapping `i_like` patterns in `%` is the parser's job.
    pub fn from_token(key: &str, field: &str, token: Option<&str>, raw: &str) -> Result<Self> {
        let operator = match token {
            None => FilterOperator::Equal,
            Some(token) => {
                FilterOperator::from_token(token).ok_or_else(|| Error::InvalidFilterOperator {
                    key: key.to_string(),
                    operator: token.to_string(),
                })?
            }
        };

        let condition = match operator {
            FilterOperator::Equal => Self::eq(field, FilterValue::coerce(raw)),
            FilterOperator::MoreThan => Self::more_than(field, FilterValue::coerce(raw)),
            FilterOperator::LessThan => Self::less_than(field, FilterValue::coerce(raw)),
            FilterOperator::Like => Self::like(field, raw),
            FilterOperator::ILike => Self::i_like(field, raw),
            FilterOperator::Between => {
                let bounds: Vec<&str> = raw.split(',').collect();
                match bounds.as_slice() {
                    [lo, hi] => Self::between(field, FilterValue::coerce(lo), FilterValue::coerce(hi)),
                    _ => {
                        return Err(Error::InvalidFilterValue {
                            key: key.to_string(),
                            reason: format!(
                                "between expects two comma-separated values, got '{}'",
                                raw
                            ),
                        })
                    }
                }
            }
        };

        Ok(condition)
    }

    /// The first segment of a dotted field path
    pub fn root_field(&self) -> &str {
        root_of(&self.field)
    }
}

/// The first segment of a dotted field path
pub(crate) fn root_of(field: &str) -> &str {
    field.split('.').next().unwrap_or(field)
}
