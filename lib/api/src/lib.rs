//! # bookrec API
//!
//! JSON over HTTP with CORS open to all origins:
//!
//! - `GET /books` - every catalog title, in order
//! - `GET /search?query=..` - up to 15 case-insensitive substring matches
//! - `POST /recommend` - `{"title": ..}` to `{"titles": [..]}` or `{"error": ..}`
//! - `GET /metadata?title=..` - cover and detail-page links, null when unknown
//! - `GET /health` - catalog size and stored similarity count

pub mod metadata;
pub mod rest;

pub use metadata::{BookLinks, MetadataClient, MetadataConfig};
pub use rest::{configure, ApiConfig, RecommendRequest, RecommendResponse, RestApi, NOT_FOUND_MESSAGE};
