//! Top-N ranking over a single similarity row
//!
//! Candidates are ordered by descending score; equal scores keep
//! ascending catalog position so results are reproducible.

use bookrec_core::{Result, SimilarityMatrix};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Default number of recommendations
pub const DEFAULT_TOP_N: usize = 10;

/// How the queried item is kept out of its own recommendations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelfExclusion {
    /// Remove the queried position from the candidates before truncating
    #[default]
    ExcludeQuery,
    /// Rank every position and drop rank 0 unconditionally.
    ///
    /// Only correct when the diagonal is the unique row maximum; if another
    /// item outscores the query, the query itself shows up in the results.
    DropFirst,
}

/// A ranked candidate: catalog position and its similarity to the query
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ranked {
    pub position: usize,
    pub score: f32,
}

#[inline]
fn by_score_desc(a: &Ranked, b: &Ranked) -> Ordering {
    OrderedFloat(b.score)
        .cmp(&OrderedFloat(a.score))
        .then_with(|| a.position.cmp(&b.position))
}

/// Pick the `n` best entries of a dense score vector, skipping `exclude`
///
/// # Arguments
/// * `scores` - one score per catalog position
/// * `n` - how many candidates to keep
/// * `exclude` - position to leave out, if any
///
/// # Returns
/// At most `n` candidates sorted by descending score, ties by ascending position
pub fn top_n(scores: &[f32], n: usize, exclude: Option<usize>) -> Vec<Ranked> {
    if n == 0 {
        return Vec::new();
    }

    let mut candidates: Vec<Ranked> = scores
        .iter()
        .enumerate()
        .filter(|(position, _)| Some(*position) != exclude)
        .map(|(position, &score)| Ranked { position, score })
        .collect();

    // The comparator is a total order, so partial selection stays deterministic
    if candidates.len() > n {
        candidates.select_nth_unstable_by(n - 1, by_score_desc);
        candidates.truncate(n);
    }
    candidates.sort_unstable_by(by_score_desc);
    candidates
}

/// Rank row `position` of `matrix` and return up to `n` other items
pub fn rank_similar(
    matrix: &SimilarityMatrix,
    position: usize,
    n: usize,
    policy: SelfExclusion,
) -> Result<Vec<Ranked>> {
    let row = matrix.row_dense(position)?;

    let ranked = match policy {
        SelfExclusion::ExcludeQuery => top_n(&row, n, Some(position)),
        SelfExclusion::DropFirst => {
            let mut ranked = top_n(&row, n.saturating_add(1), None);
            if !ranked.is_empty() {
                ranked.remove(0);
            }
            ranked
        }
    };

    Ok(ranked)
}
