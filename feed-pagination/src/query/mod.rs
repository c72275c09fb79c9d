//! Query-string filter DSL and query composition
//!
//! Incoming parameters flow through this module in order:
//!
//! 1. [`QueryParams`] keeps the decoded pairs in arrival order
//! 2. [`PaginationRequest`] extracts `page`, `take` and the keyset bounds
//! 3. [`FilterParser`] turns `where__`/`order__` keys into typed fragments
//! 4. [`QueryComposer`] merges them with base predicates into a [`QuerySpec`]

mod composer;
mod operator;
mod params;
mod parser;
mod request;

pub use composer::{QueryComposer, QuerySpec, CURSOR_FIELD};
pub use operator::{FilterCondition, FilterOperator, FilterValue, OrderDirection};
pub use params::QueryParams;
pub use parser::{FilterParser, ParsedFilters, ORDER_PREFIX, WHERE_PREFIX};
pub use request::{
    is_boundary_key, PaginationRequest, BOUNDARY_LESS_THAN, BOUNDARY_MORE_THAN, DEFAULT_TAKE,
    PAGE_KEY, TAKE_KEY,
};
