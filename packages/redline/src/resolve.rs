//! # Replacement Resolver
//!
//! Pairs original paragraphs with revised lines inside one replace block.
//! Paragraphs left unpaired become deletions, lines left unpaired become
//! insertions.
//!
//! Two strategies are available:
//! - **Greedy**: original paragraphs in ascending order each take the most
//!   similar unused line. Ties keep the earliest line.
//! - **Optimal**: one global assignment maximizing the summed similarity of
//!   accepted pairs (Hungarian algorithm).
//!
//! Both accept a pair only when its similarity is strictly above the
//! threshold.

use crate::config::MatchStrategy;
use crate::matcher::SequenceMatcher;
use pathfinding::kuhn_munkres::kuhn_munkres;
use pathfinding::matrix::Matrix;
use std::ops::Range;

/// Similarity scale used for the integer assignment weights
const WEIGHT_SCALE: f64 = 1_000_000.0;

/// An original paragraph paired with a revised line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match {
    pub original: usize,
    pub revised: usize,
    pub score: f64,
}

/// Pairing decided for one replace block; indices are absolute
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedBlock {
    pub original: Range<usize>,
    pub revised: Range<usize>,
    /// Sorted by original index
    pub matches: Vec<Match>,
}

impl ResolvedBlock {
    pub fn match_for_original(&self, index: usize) -> Option<&Match> {
        self.matches.iter().find(|m| m.original == index)
    }

    pub fn match_for_revised(&self, index: usize) -> Option<&Match> {
        self.matches.iter().find(|m| m.revised == index)
    }

    /// Original indices that will be deleted
    pub fn unmatched_original(&self) -> Vec<usize> {
        self.original
            .clone()
            .filter(|i| self.match_for_original(*i).is_none())
            .collect()
    }

    /// Revised indices that will be inserted
    pub fn unmatched_revised(&self) -> Vec<usize> {
        self.revised
            .clone()
            .filter(|j| self.match_for_revised(*j).is_none())
            .collect()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ReplacementResolver {
    threshold: f64,
    strategy: MatchStrategy,
}

impl ReplacementResolver {
    pub fn new(threshold: f64, strategy: MatchStrategy) -> Self {
        Self { threshold, strategy }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Resolve `original_keys[original]` against `revised_keys[revised]`
    pub fn resolve(
        &self,
        original_keys: &[String],
        revised_keys: &[String],
        original: Range<usize>,
        revised: Range<usize>,
    ) -> ResolvedBlock {
        let scores = score_block(
            &original_keys[original.clone()],
            &revised_keys[revised.clone()],
        );

        let pairs = match self.strategy {
            MatchStrategy::Greedy => self.greedy(&scores),
            MatchStrategy::Optimal => self.optimal(&scores),
        };

        let mut matches: Vec<Match> = pairs
            .into_iter()
            .map(|(i, j)| Match {
                original: original.start + i,
                revised: revised.start + j,
                score: scores[i][j],
            })
            .collect();
        matches.sort_by_key(|m| m.original);

        for m in &matches {
            tracing::debug!(
                "Paired paragraph {} with line {} (similarity {:.3})",
                m.original,
                m.revised,
                m.score
            );
        }

        ResolvedBlock {
            original,
            revised,
            matches,
        }
    }

    fn greedy(&self, scores: &[Vec<f64>]) -> Vec<(usize, usize)> {
        let width = scores.first().map_or(0, Vec::len);
        let mut used = vec![false; width];
        let mut pairs = Vec::new();

        for (i, row) in scores.iter().enumerate() {
            let mut best: Option<usize> = None;
            let mut best_score = 0.0;
            for (j, &score) in row.iter().enumerate() {
                if !used[j] && score > best_score {
                    best = Some(j);
                    best_score = score;
                }
            }

            if let Some(j) = best {
                if best_score > self.threshold {
                    used[j] = true;
                    pairs.push((i, j));
                }
            }
        }

        pairs
    }

    fn optimal(&self, scores: &[Vec<f64>]) -> Vec<(usize, usize)> {
        let rows = scores.len();
        let cols = scores.first().map_or(0, Vec::len);
        if rows == 0 || cols == 0 {
            return Vec::new();
        }

        // Square matrix; padding rows and columns weigh nothing
        let size = rows.max(cols);
        let mut weights = Matrix::new(size, size, 0i64);
        for (i, row) in scores.iter().enumerate() {
            for (j, &score) in row.iter().enumerate() {
                if score > self.threshold {
                    weights[(i, j)] = (score * WEIGHT_SCALE).round() as i64;
                }
            }
        }

        let (_, assignment) = kuhn_munkres(&weights);

        assignment
            .into_iter()
            .enumerate()
            .filter(|&(i, j)| i < rows && j < cols && scores[i][j] > self.threshold)
            .collect()
    }
}

/// Similarity of every original key against every revised key
fn score_block(original: &[String], revised: &[String]) -> Vec<Vec<f64>> {
    let revised_chars: Vec<Vec<char>> = revised.iter().map(|r| r.chars().collect()).collect();

    original
        .iter()
        .map(|o| {
            let o: Vec<char> = o.chars().collect();
            revised_chars
                .iter()
                .map(|r| SequenceMatcher::new(&o, r).ratio())
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::keys;

    fn greedy() -> ReplacementResolver {
        ReplacementResolver::new(0.35, MatchStrategy::Greedy)
    }

    fn pairs(block: &ResolvedBlock) -> Vec<(usize, usize)> {
        block.matches.iter().map(|m| (m.original, m.revised)).collect()
    }

    #[test]
    fn test_two_paragraphs_one_line() {
        let original = keys(&[
            "3. Reserved.",
            "4. The Lender may assign its rights under this Agreement.",
        ]);
        let revised = keys(&["4. The Lender may assign its rights under this Agreement to any affiliate."]);

        let block = greedy().resolve(&original, &revised, 0..2, 0..1);

        assert_eq!(pairs(&block), vec![(1, 0)]);
        assert_eq!(block.unmatched_original(), vec![0]);
        assert!(block.unmatched_revised().is_empty());
        assert!(block.matches[0].score > 0.85);
    }

    #[test]
    fn test_score_at_threshold_is_not_matched() {
        let original = keys(&["abcdefghijklmnopqrst"]);
        let revised = keys(&["abcdefgUVWXYZ0123456"]);

        let block = greedy().resolve(&original, &revised, 0..1, 0..1);
        assert!(block.matches.is_empty());

        let looser = ReplacementResolver::new(0.349, MatchStrategy::Greedy);
        assert_eq!(pairs(&looser.resolve(&original, &revised, 0..1, 0..1)), vec![(0, 0)]);
    }

    #[test]
    fn test_score_just_below_threshold_is_not_matched() {
        // 14 matched chars over 41 total
        let original = keys(&["abcdefghijklmnopqrstu"]);
        let revised = keys(&["abcdefgUVWXYZ0123456"]);
        let block = greedy().resolve(&original, &revised, 0..1, 0..1);
        assert!(block.matches.is_empty());
    }

    #[test]
    fn test_unrelated_block_falls_back_to_delete_and_insert() {
        let original = keys(&["Alpha clause.", "Beta clause."]);
        let revised = keys(&["zzzz", "qqqq", "wwww"]);

        let block = greedy().resolve(&original, &revised, 0..2, 0..3);
        assert!(block.matches.is_empty());
        assert_eq!(block.unmatched_original(), vec![0, 1]);
        assert_eq!(block.unmatched_revised(), vec![0, 1, 2]);
    }

    #[test]
    fn test_offsets_are_absolute() {
        let original = keys(&["same", "The fee is due.", "same"]);
        let revised = keys(&["same", "The fees are due.", "same"]);

        let block = greedy().resolve(&original, &revised, 1..2, 1..2);
        assert_eq!(pairs(&block), vec![(1, 1)]);
    }

    #[test]
    fn test_greedy_and_optimal_can_disagree() {
        // The first paragraph is closest to the line the second one needs
        let original = keys(&["abcdefgx", "zzzzefgh"]);
        let revised = keys(&["abcdefyy", "abcdefgh"]);

        let greedy = greedy().resolve(&original, &revised, 0..2, 0..2);
        let optimal = ReplacementResolver::new(0.35, MatchStrategy::Optimal)
            .resolve(&original, &revised, 0..2, 0..2);

        assert_eq!(pairs(&greedy), vec![(0, 1)]);
        assert_eq!(pairs(&optimal), vec![(0, 0), (1, 1)]);
    }

    #[test]
    fn test_each_index_used_once() {
        let original = keys(&["Payment due.", "Payment due.", "Payment due."]);
        let revised = keys(&["Payment due!", "Payment due?"]);

        for strategy in [MatchStrategy::Greedy, MatchStrategy::Optimal] {
            let block = ReplacementResolver::new(0.35, strategy).resolve(&original, &revised, 0..3, 0..2);
            let mut seen_original: Vec<usize> = block.matches.iter().map(|m| m.original).collect();
            let mut seen_revised: Vec<usize> = block.matches.iter().map(|m| m.revised).collect();
            seen_original.dedup();
            seen_revised.sort();
            seen_revised.dedup();
            assert_eq!(seen_original.len(), block.matches.len());
            assert_eq!(seen_revised.len(), block.matches.len());
            assert_eq!(block.matches.len(), 2);
        }
    }
}
