//! HTTP API layer for servihub-reports.
//!
//! This crate provides the REST API:
//!
//! - **Endpoints**: report lifecycle and user provisioning routes
//! - **Extractors**: authenticated-user extraction
//! - **Middleware**: bearer-token authentication
//! - **Response**: the data/error envelope
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
