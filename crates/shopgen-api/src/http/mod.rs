//! HTTP/REST API layer for shopgen.
//!
//! Axum-based REST API at `/api/v1/` with an envelope response format and
//! CORS support. Authentication and rate limiting sit in front of this
//! service.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod response;
pub mod router;
