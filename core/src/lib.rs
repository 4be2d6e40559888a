//! Synchronous API client core for the todo service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The caller executes the
//! actual HTTP round-trip, so the core stays deterministic and testable.
//!
//! # Design
//! - `TodoClient` is stateless and holds only `base_url`.
//! - Each endpoint is split into `build_*` (produces a request) and
//!   `parse_*` (consumes a response), making the I/O boundary explicit.
//! - `ListQuery` carries the listing filters, sort, and page; only the
//!   parameters that are set reach the query string.
//! - Wire types are defined independently from the server crate.

pub mod client;
pub mod error;
pub mod http;
pub mod types;

pub use client::TodoClient;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use types::{ListQuery, SortDirection, SortField, Todo, TodoInput, TodoMetrics, TodoPage};
