//! Ordered query-string parameters
//!
//! Filter keys are only meaningful together with their position: ordering
//! keys are tie-breakers in the order they were sent, and continuation links
//! repeat the request's keys as they arrived. [`QueryParams`] keeps the raw
//! `(key, value)` pairs in arrival order.
//!
//! # Example
//!
//! ```rust
//! use feed_pagination::query::QueryParams;
//!
//! let params = QueryParams::parse("take=2&order__createdAt=DESC&where__title__i_like=rust");
//! assert_eq!(params.get("take"), Some("2"));
//! assert_eq!(params.len(), 3);
//! ```

use serde::{Deserialize, Serialize};

/// Ordered list of decoded query-string pairs
///
/// Deserializes from a URL-encoded query, so it can be used directly with
/// axum's `Query` extractor:
///
/// ```rust,ignore
/// async fn list_posts(Query(params): Query<QueryParams>) -> Result<Paginated<Post>> {
///     // ...
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    /// Create an empty parameter list
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a raw (percent-encoded) query string, with or without a leading `?`
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect()
    }

    /// Append a pair, keeping any existing pair with the same key
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(key, value);
        self
    }

    /// Append a pair, keeping any existing pair with the same key
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push((key.into(), value.into()));
    }

    /// The value of the last pair with this key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate over pairs in arrival order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of pairs
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no pairs
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
