//! Best-candidate selection against the catalog.

use std::collections::BTreeSet;

use rapidfuzz::distance::indel;
use tracing::debug;

use crate::catalog::{Catalog, EpisodeRecord};

/// Added when both the normalized title and the year match exactly.
pub const YEAR_MATCH_BONUS: u32 = 50;

/// A best score must be strictly above this to count as a match.
pub const MATCH_THRESHOLD: u32 = 90;

/// Similarity between two titles as a percentage in `0..=100`.
pub trait SimilarityScorer {
    fn score(&self, a: &str, b: &str) -> u32;
}

impl<F> SimilarityScorer for F
where
    F: Fn(&str, &str) -> u32,
{
    fn score(&self, a: &str, b: &str) -> u32 {
        self(a, b)
    }
}

/// Token-set ratio: word order and repeated words do not matter, and a title
/// whose words are a subset of the other's still scores high.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenSetRatio;

impl SimilarityScorer for TokenSetRatio {
    fn score(&self, a: &str, b: &str) -> u32 {
        token_set_ratio(a, b)
    }
}

pub fn token_set_ratio(a: &str, b: &str) -> u32 {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();

    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0;
    }

    let intersection = join(tokens_a.intersection(&tokens_b));
    let only_a = join(tokens_a.difference(&tokens_b));
    let only_b = join(tokens_b.difference(&tokens_a));

    let combined_a = format!("{intersection} {only_a}").trim().to_string();
    let combined_b = format!("{intersection} {only_b}").trim().to_string();

    let best = ratio(&intersection, &combined_a)
        .max(ratio(&intersection, &combined_b))
        .max(ratio(&combined_a, &combined_b));

    (best * 100.0).round() as u32
}

fn join<'a, 'b: 'a>(tokens: impl Iterator<Item = &'a &'b str>) -> String {
    tokens.copied().collect::<Vec<_>>().join(" ")
}

fn ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    indel::normalized_similarity(a.chars(), b.chars())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult<'a> {
    Matched(&'a EpisodeRecord),
    NoMatch,
}

impl<'a> MatchResult<'a> {
    pub fn episode(self) -> Option<&'a EpisodeRecord> {
        match self {
            MatchResult::Matched(episode) => Some(episode),
            MatchResult::NoMatch => None,
        }
    }
}

/// Scan the whole catalog and pick the highest-scoring episode.
///
/// Ties keep the earlier record. An exact title and year match gets
/// [`YEAR_MATCH_BONUS`] on top of the fuzzy score, and the winner must score
/// above [`MATCH_THRESHOLD`].
pub fn find_best_match<'a, S>(
    candidate_title: &str,
    candidate_year: &str,
    catalog: &'a Catalog,
    scorer: &S,
) -> MatchResult<'a>
where
    S: SimilarityScorer + ?Sized,
{
    let mut best_match = None;
    let mut highest_score = 0;

    for episode in catalog {
        let mut score = scorer.score(candidate_title, &episode.normalized_title);
        if episode.normalized_title == candidate_title && episode.year == candidate_year {
            score = score.saturating_add(YEAR_MATCH_BONUS);
        }

        if score > highest_score {
            highest_score = score;
            best_match = Some(episode);
        }
    }

    match best_match {
        Some(episode) if highest_score > MATCH_THRESHOLD => {
            debug!(
                "'{}' ({}) matched {} '{}' with score {}",
                candidate_title, candidate_year, episode.code, episode.original_title, highest_score
            );
            MatchResult::Matched(episode)
        }
        _ => {
            debug!(
                "'{}' ({}) best score {} is below threshold",
                candidate_title, candidate_year, highest_score
            );
            MatchResult::NoMatch
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(entries: &[(&str, &str, &str)]) -> Catalog {
        Catalog::from_records(
            entries
                .iter()
                .map(|(code, title, date)| EpisodeRecord::new(code, title, date)),
        )
    }

    #[test]
    fn test_token_set_ratio_identical() {
        assert_eq!(token_set_ratio("puss n toots", "puss n toots"), 100);
    }

    #[test]
    fn test_token_set_ratio_order_insensitive() {
        assert_eq!(token_set_ratio("toots n puss", "puss n toots"), 100);
    }

    #[test]
    fn test_token_set_ratio_subset() {
        assert_eq!(token_set_ratio("mouse trouble", "the mouse trouble"), 100);
    }

    #[test]
    fn test_token_set_ratio_typo_stays_high() {
        let score = token_set_ratio("the yankee doodle mouse", "the yankee dodle mouse");
        assert!(score > 90, "score was {score}");
        assert!(score < 100);
    }

    #[test]
    fn test_token_set_ratio_unrelated_is_low() {
        assert!(token_set_ratio("puss n toots", "heavenly puss") < 90);
    }

    #[test]
    fn test_token_set_ratio_empty() {
        assert_eq!(token_set_ratio("", "puss n toots"), 0);
        assert_eq!(token_set_ratio("", ""), 0);
    }

    #[test]
    fn test_token_set_ratio_symmetric() {
        let pairs = [
            ("the yankee doodle mouse", "yankee doodle"),
            ("puss n toots", "puss gets the boot"),
            ("solid serenade", "salt water tabby"),
        ];
        for (a, b) in pairs {
            assert_eq!(token_set_ratio(a, b), token_set_ratio(b, a));
        }
    }

    #[test]
    fn test_empty_catalog_never_matches() {
        let empty = Catalog::default();
        assert_eq!(
            find_best_match("puss n toots", "1942", &empty, &TokenSetRatio),
            MatchResult::NoMatch
        );
        let perfect = |_: &str, _: &str| -> u32 { 100 };
        assert_eq!(find_best_match("", "", &empty, &perfect), MatchResult::NoMatch);
    }

    #[test]
    fn test_puss_n_toots_matches() {
        let catalog = catalog(&[
            ("S01E01", "Puss Gets the Boot", "February 10, 1940"),
            ("S01E05", "Puss 'n' Toots", "May 30, 1942"),
        ]);
        let result = find_best_match("puss n toots", "1942", &catalog, &TokenSetRatio);
        assert_eq!(result.episode().map(|e| e.code.as_str()), Some("S01E05"));
    }

    #[test]
    fn test_year_bonus_breaks_shared_title() {
        let catalog = catalog(&[
            ("S01E10", "Fraidy Cat", "January 17, 1942"),
            ("S05E02", "Fraidy Cat", "1975"),
        ]);
        let result = find_best_match("fraidy cat", "1975", &catalog, &TokenSetRatio);
        assert_eq!(result.episode().map(|e| e.code.as_str()), Some("S05E02"));

        let result = find_best_match("fraidy cat", "1942", &catalog, &TokenSetRatio);
        assert_eq!(result.episode().map(|e| e.code.as_str()), Some("S01E10"));
    }

    #[test]
    fn test_exact_match_beats_perfect_fuzzy_competitor() {
        // The first record scores a fuzzy 100 but is not an exact title match.
        let catalog = catalog(&[
            ("S01E01", "The Mouse Trouble", "1944"),
            ("S01E02", "Mouse Trouble", "1944"),
        ]);
        let result = find_best_match("mouse trouble", "1944", &catalog, &TokenSetRatio);
        assert_eq!(result.episode().map(|e| e.code.as_str()), Some("S01E02"));
    }

    #[test]
    fn test_threshold_is_strict() {
        let catalog = catalog(&[("S01E01", "Puss Gets the Boot", "1940")]);

        let at_threshold = |_: &str, _: &str| -> u32 { 90 };
        assert_eq!(
            find_best_match("anything", "1940", &catalog, &at_threshold),
            MatchResult::NoMatch
        );

        let above_threshold = |_: &str, _: &str| -> u32 { 91 };
        assert_eq!(
            find_best_match("anything", "1940", &catalog, &above_threshold)
                .episode()
                .map(|e| e.code.as_str()),
            Some("S01E01")
        );
    }

    #[test]
    fn test_first_seen_wins_on_tie() {
        let catalog = catalog(&[
            ("S01E01", "Puss Gets the Boot", "1940"),
            ("S01E02", "The Midnight Snack", "1941"),
            ("S01E03", "The Night Before Christmas", "1941"),
        ]);
        let flat = |_: &str, _: &str| -> u32 { 95 };
        let result = find_best_match("whatever", "1941", &catalog, &flat);
        assert_eq!(result.episode().map(|e| e.code.as_str()), Some("S01E01"));
    }

    #[test]
    fn test_later_strictly_higher_score_wins() {
        let catalog = catalog(&[
            ("S01E01", "Puss Gets the Boot", "1940"),
            ("S01E02", "The Midnight Snack", "1941"),
        ]);
        let prefers_snack = |_: &str, b: &str| -> u32 { if b.contains("snack") { 96 } else { 95 } };
        let result = find_best_match("whatever", "1941", &catalog, &prefers_snack);
        assert_eq!(result.episode().map(|e| e.code.as_str()), Some("S01E02"));
    }

    #[test]
    fn test_bonus_requires_exact_year_string() {
        let catalog = catalog(&[("S01E01", "Puss Gets the Boot", "1940")]);
        let low = |_: &str, _: &str| -> u32 { 60 };
        // 60 + 50 clears the threshold only when the year matches too.
        assert!(matches!(
            find_best_match("puss gets the boot", "1940", &catalog, &low),
            MatchResult::Matched(_)
        ));
        assert_eq!(
            find_best_match("puss gets the boot", "1941", &catalog, &low),
            MatchResult::NoMatch
        );
    }

    #[test]
    fn test_out_of_range_score_does_not_overflow() {
        let catalog = catalog(&[("S01E01", "Puss Gets the Boot", "1940")]);
        let huge = |_: &str, _: &str| -> u32 { u32::MAX };
        assert!(matches!(
            find_best_match("puss gets the boot", "1940", &catalog, &huge),
            MatchResult::Matched(_)
        ));
    }
}
