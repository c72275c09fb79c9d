//! Pagination request extracted from query parameters
//!
//! `page`, `take` and the two reserved keyset bounds are pulled out of the
//! incoming pairs; everything else stays in the parameter list for the filter
//! parser and for continuation links.
//!
//! # Example
//!
//! ```rust
//! use feed_pagination::query::{FilterValue, PaginationRequest, QueryParams};
//!
//! let params = QueryParams::parse("take=10&where__id__more_than=42&order__createdAt=ASC");
//! let request = PaginationRequest::from_params(params)?;
//!
//! assert!(!request.is_offset());
//! assert_eq!(request.take, 10);
//! assert_eq!(request.boundary_more_than, Some(FilterValue::Integer(42)));
//! # Ok::<(), feed_pagination::error::Error>(())
//! ```

use crate::config::PaginationConfig;
use crate::error::{Error, Result};

use super::operator::FilterValue;
use super::params::QueryParams;

/// Page size used when the request carries no `take`
pub const DEFAULT_TAKE: u64 = 20;

/// Query key selecting offset mode
pub const PAGE_KEY: &str = "page";

/// Query key for the page size
pub const TAKE_KEY: &str = "take";

/// Reserved keyset bound: rows after the anchor
pub const BOUNDARY_MORE_THAN: &str = "where__id__more_than";

/// Reserved keyset bound: rows before the anchor
pub const BOUNDARY_LESS_THAN: &str = "where__id__less_than";

/// One pagination request
///
/// The presence of `page` selects offset mode; the keyset bounds are then
/// ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct PaginationRequest {
    /// 1-indexed page number (offset mode)
    pub page: Option<u64>,
    /// Rows per page
    pub take: u64,
    /// `where__id__more_than`
    pub boundary_more_than: Option<FilterValue>,
    /// `where__id__less_than`
    pub boundary_less_than: Option<FilterValue>,
    params: QueryParams,
}

impl PaginationRequest {
    /// Build a request with the default page size and no upper bound
    pub fn from_params(params: QueryParams) -> Result<Self> {
        Self::from_params_with(params, &PaginationConfig::default())
    }

    /// Build a request using the configured default and maximum page size
    pub fn from_params_with(params: QueryParams, config: &PaginationConfig) -> Result<Self> {
        let page = match params.get(PAGE_KEY) {
            None | Some("") => None,
            Some(raw) => Some(parse_page(raw)?),
        };

        let take = match params.get(TAKE_KEY) {
            None | Some("") => config.default_take,
            Some(raw) => parse_take(raw)?,
        };
        let take = match config.max_take {
            Some(max) if take > max => {
                tracing::debug!(take, max_take = max, "Clamping take to configured maximum");
                max
            }
            _ => take,
        };

        Ok(Self {
            page,
            take,
            boundary_more_than: boundary(&params, BOUNDARY_MORE_THAN),
            boundary_less_than: boundary(&params, BOUNDARY_LESS_THAN),
            params,
        })
    }

    /// Whether this request selects offset pagination
    pub fn is_offset(&self) -> bool {
        self.page.is_some()
    }

    /// All incoming pairs, in arrival order
    pub fn params(&self) -> &QueryParams {
        &self.params
    }

    /// Incoming pairs without the reserved keyset bounds
    ///
    /// This is what the filter parser sees and what continuation links repeat.
    pub fn forwarded_params(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().filter(|(key, _)| !is_boundary_key(key))
    }
}

/// Whether `key` is one of the reserved keyset bounds
pub fn is_boundary_key(key: &str) -> bool {
    key == BOUNDARY_MORE_THAN || key == BOUNDARY_LESS_THAN
}

fn parse_page(raw: &str) -> Result<u64> {
    match raw.parse::<u64>() {
        Ok(page) if page >= 1 => Ok(page),
        _ => Err(Error::InvalidPageValue(raw.to_string())),
    }
}

fn parse_take(raw: &str) -> Result<u64> {
    match raw.parse::<u64>() {
        Ok(take) if take >= 1 => Ok(take),
        _ => Err(Error::InvalidTakeValue(raw.to_string())),
    }
}

fn boundary(params: &QueryParams, key: &str) -> Option<FilterValue> {
    params
        .get(key)
        .filter(|raw| !raw.is_empty())
        .map(FilterValue::coerce)
}
