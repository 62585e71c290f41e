//! # bookrec
//!
//! A small book recommendation service: catalog listing, title search and
//! "similar books" lookups over a precomputed sparse similarity matrix.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! bookrec --data-dir ./data --http-port 8000
//! ```
//!
//! `./data` must contain `books.json` (titles in catalog order) and
//! `similarity.bin` (the CSR similarity matrix, one row per title).
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use bookrec::prelude::*;
//! use std::sync::Arc;
//!
//! let data = DataStore::new("./data").load().unwrap();
//! let recommender = Recommender::new(Arc::new(data.catalog), Arc::new(data.matrix)).unwrap();
//!
//! match recommender.recommend("Dune", 10).unwrap() {
//!     Recommendation::Found { books, .. } => {
//!         for book in books {
//!             println!("{} ({:.3})", book.title, book.score);
//!         }
//!     }
//!     Recommendation::NotFound => println!("no such title"),
//! }
//! ```
//!
//! ## Crate Structure
//!
//! - `bookrec-core` - Catalog and sparse similarity matrix
//! - `bookrec-similarity` - Top-N ranking and title-based recommendation
//! - `bookrec-storage` - Artifact loading (JSON/bincode, gzip, checksums)
//! - `bookrec-api` - REST API and cover metadata client

// Re-export core types
pub use bookrec_core::{Catalog, CatalogEntry, Error, Result, SimilarityMatrix, SEARCH_LIMIT};

// Re-export similarity
pub use bookrec_similarity::{
    Recommendation, Recommender, ScoredBook, SelfExclusion, DEFAULT_TOP_N,
};

// Re-export storage
pub use bookrec_storage::{ArtifactDescription, DataStore, LoadedData};

// Re-export API
pub use bookrec_api::{ApiConfig, BookLinks, MetadataClient, MetadataConfig, RestApi};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Catalog, CatalogEntry, Error, Result, SimilarityMatrix,
        Recommendation, Recommender, ScoredBook, SelfExclusion,
        DataStore, LoadedData,
        ApiConfig, MetadataClient, MetadataConfig, RestApi,
    };
}
