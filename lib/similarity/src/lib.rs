//! # bookrec Similarity
//!
//! Top-N ranking over precomputed similarity rows, and the recommender
//! that turns a free-text title into a list of similar books.
//!
//! ## Example
//!
//! ```rust
//! use bookrec_core::{Catalog, SimilarityMatrix};
//! use bookrec_similarity::{Recommender, Recommendation};
//! use std::sync::Arc;
//!
//! let catalog = Catalog::new(vec![
//!     "Dune".to_string(),
//!     "Foundation".to_string(),
//!     "Neuromancer".to_string(),
//! ]);
//! let matrix = SimilarityMatrix::from_dense(&[
//!     vec![1.0, 0.7, 0.2],
//!     vec![0.7, 1.0, 0.4],
//!     vec![0.2, 0.4, 1.0],
//! ]).unwrap();
//!
//! let recommender = Recommender::new(Arc::new(catalog), Arc::new(matrix)).unwrap();
//! let rec = recommender.recommend("dune", 2).unwrap();
//! assert_eq!(rec.titles(), vec!["Foundation", "Neuromancer"]);
//! assert_eq!(recommender.recommend("Unknown", 2).unwrap(), Recommendation::NotFound);
//! ```
//!
//! ## Flow
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Title     │────>│   Catalog   │────>│  Position   │
//! │  (query)    │     │  (lookup)   │     │             │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                                                │
//!                      ┌─────────────┐           │
//!                      │   Matrix    │<──────────┘
//!                      │   (row)     │
//!                      └─────────────┘
//!                             │
//!                      ┌─────────────┐
//!                      │   Top-N     │
//!                      │  (titles)   │
//!                      └─────────────┘
//! ```

pub mod rank;
pub mod recommender;

pub use rank::{rank_similar, top_n, Ranked, SelfExclusion, DEFAULT_TOP_N};
pub use recommender::{Recommendation, Recommender, ScoredBook};
