//! # Router Module
//!
//! Serves the stored mock definitions as live HTTP endpoints.
//!
//! ## Matching
//!
//! A request matches a definition when the methods are equal and the request
//! path matches the definition's path pattern, where a `{name}` or `:name`
//! segment stands for any single non-empty segment:
//!
//! ```text
//! GET /api/user         → list definition        (paginated)
//! GET /api/user/42      → detail definition      (verbatim)
//! PUT /api/user/42      → update definition      (verbatim)
//! GET /api/unknown      → 404 "endpoint not found"
//! ```
//!
//! ## Pagination
//!
//! For list definitions, `data.<entity>_list` is sliced to
//! `[(page-1)*pageSize, page*pageSize)` with `page = 1` and `pageSize = 10` by
//! default. `total` is returned as stored.

mod core;
mod pagination;

pub use core::{MockRouter, RouteMatch};
pub use pagination::{Pagination, DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
