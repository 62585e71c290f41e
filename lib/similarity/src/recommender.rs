//! Title-based recommendation resolution
//!
//! Resolves a free-text title against the catalog, ranks the matching
//! row of the similarity matrix and maps the winners back to titles.

use crate::rank::{rank_similar, SelfExclusion, DEFAULT_TOP_N};
use bookrec_core::{Catalog, CatalogEntry, Error, Result, SimilarityMatrix};
use serde::Serialize;
use std::sync::Arc;

/// A recommended book with its similarity to the query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredBook {
    pub position: usize,
    pub title: String,
    pub score: f32,
}

/// Outcome of a recommendation request
#[derive(Debug, Clone, PartialEq)]
pub enum Recommendation {
    /// No catalog title matched the query
    NotFound,
    /// The query resolved; `books` may still be empty
    Found {
        query: CatalogEntry,
        books: Vec<ScoredBook>,
    },
}

impl Recommendation {
    pub fn is_found(&self) -> bool {
        matches!(self, Recommendation::Found { .. })
    }

    /// Recommended titles, empty for `NotFound`
    pub fn titles(&self) -> Vec<String> {
        match self {
            Recommendation::NotFound => Vec::new(),
            Recommendation::Found { books, .. } => {
                books.iter().map(|b| b.title.clone()).collect()
            }
        }
    }
}

/// Read-only recommendation engine over a catalog and its similarity matrix
#[derive(Debug, Clone)]
pub struct Recommender {
    catalog: Arc<Catalog>,
    matrix: Arc<SimilarityMatrix>,
    policy: SelfExclusion,
}

impl Recommender {
    /// Pair a catalog with its matrix. Both must cover the same positions.
    pub fn new(catalog: Arc<Catalog>, matrix: Arc<SimilarityMatrix>) -> Result<Self> {
        if catalog.len() != matrix.dim() {
            return Err(Error::DimensionMismatch {
                catalog: catalog.len(),
                matrix: matrix.dim(),
            });
        }
        Ok(Self {
            catalog,
            matrix,
            policy: SelfExclusion::default(),
        })
    }

    pub fn with_policy(mut self, policy: SelfExclusion) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> SelfExclusion {
        self.policy
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn matrix(&self) -> &SimilarityMatrix {
        &self.matrix
    }

    /// Catalog position of the first title equal to `title`, ignoring case
    pub fn resolve(&self, title: &str) -> Option<usize> {
        self.catalog.lookup(title)
    }

    /// Up to `n` books most similar to the book at `position`
    pub fn similar_to(&self, position: usize, n: usize) -> Result<Vec<ScoredBook>> {
        let ranked = rank_similar(&self.matrix, position, n, self.policy)?;

        Ok(ranked
            .into_iter()
            .filter_map(|r| {
                self.catalog.title(r.position).map(|title| ScoredBook {
                    position: r.position,
                    title: title.to_string(),
                    score: r.score,
                })
            })
            .collect())
    }

    /// Resolve `title` and return up to `n` similar books
    pub fn recommend(&self, title: &str, n: usize) -> Result<Recommendation> {
        let Some(position) = self.resolve(title) else {
            tracing::debug!(title, "no catalog match");
            return Ok(Recommendation::NotFound);
        };

        let books = self.similar_to(position, n)?;
        tracing::debug!(title, position, count = books.len(), "resolved recommendation");

        Ok(Recommendation::Found {
            query: CatalogEntry {
                position,
                title: self.catalog.titles()[position].clone(),
            },
            books,
        })
    }

    /// [`Recommender::recommend`] with [`DEFAULT_TOP_N`]
    pub fn recommend_default(&self, title: &str) -> Result<Recommendation> {
        self.recommend(title, DEFAULT_TOP_N)
    }
}
