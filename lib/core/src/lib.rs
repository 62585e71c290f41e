//! # bookrec Core
//!
//! Core data structures for the bookrec recommendation service.
//!
//! - [`Catalog`] - Ordered book titles with case-insensitive lookup and substring search
//! - [`SimilarityMatrix`] - Square sparse (CSR) matrix of precomputed similarity scores
//!
//! Both are built once at startup and never mutated, so they can be shared
//! across request handlers behind an `Arc` without locking.
//!
//! ## Example
//!
//! ```rust
//! use bookrec_core::{Catalog, SimilarityMatrix};
//!
//! let catalog = Catalog::new(vec!["Dune".to_string(), "Foundation".to_string()]);
//! assert_eq!(catalog.lookup("dune"), Some(0));
//! assert_eq!(catalog.search("found"), vec!["Foundation"]);
//!
//! let matrix = SimilarityMatrix::from_dense(&[
//!     vec![1.0, 0.4],
//!     vec![0.4, 1.0],
//! ]).unwrap();
//! assert_eq!(matrix.row_dense(0).unwrap(), vec![1.0, 0.4]);
//! ```

pub mod catalog;
pub mod error;
pub mod matrix;

pub use catalog::{Catalog, CatalogEntry, SEARCH_LIMIT};
pub use error::{Error, Result};
pub use matrix::{CsrParts, SimilarityMatrix};
