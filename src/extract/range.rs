//! Marker-based token range extraction.
//!
//! Given a tokenized transcript and two user-supplied markers, produce the
//! contiguous token subsequence from the resolved start position through the
//! resolved end position, inclusive. Each marker resolves under an explicit
//! match policy rather than an implicit scan order.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which occurrence of a marker wins when it appears more than once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MatchPolicy {
    /// Resolve to the earliest occurrence
    First,
    /// Resolve to the latest occurrence (default, matches historical behavior)
    #[default]
    Last,
}

impl std::fmt::Display for MatchPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchPolicy::First => write!(f, "first"),
            MatchPolicy::Last => write!(f, "last"),
        }
    }
}

/// Errors from range extraction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    /// The end marker never occurs in the transcript, so the range has no
    /// right boundary.
    #[error("end marker \"{0}\" not found in transcript")]
    EndMarkerNotFound(String),
}

/// Split a transcript into whitespace-delimited tokens, discarding empty
/// substrings. An empty or whitespace-only transcript yields an empty
/// sequence.
pub fn tokenize(transcript: &str) -> Vec<String> {
    transcript.split_whitespace().map(str::to_string).collect()
}

/// Find the index of `marker` in `tokens` under the given match policy.
pub fn find_marker(tokens: &[String], marker: &str, policy: MatchPolicy) -> Option<usize> {
    match policy {
        MatchPolicy::First => tokens.iter().position(|t| t == marker),
        MatchPolicy::Last => tokens.iter().rposition(|t| t == marker),
    }
}

/// Extract the contiguous token range from `start_token` through `end_token`,
/// both inclusive.
///
/// A missing end marker is an error: there is no right boundary to slice to.
/// A missing start marker yields an empty range, as does a start position that
/// resolves after the end position.
pub fn extract_range<'a>(
    tokens: &'a [String],
    start_token: &str,
    end_token: &str,
    start_policy: MatchPolicy,
    end_policy: MatchPolicy,
) -> Result<&'a [String], ExtractError> {
    let end = find_marker(tokens, end_token, end_policy).ok_or_else(|| ExtractError::EndMarkerNotFound(end_token.to_string()))?;

    match find_marker(tokens, start_token, start_policy) {
        Some(start) if start <= end => Ok(&tokens[start..=end]),
        _ => Ok(&[]),
    }
}

/// Concatenate tokens into a single string with no delimiter. Empty input
/// yields an empty string.
pub fn join_phrase(tokens: &[String]) -> String {
    tokens.concat()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_tokenize_discards_empty_substrings() {
        assert_eq!(tokenize("  the   cat \t sat\n"), toks(&["the", "cat", "sat"]));
    }

    #[test]
    fn test_tokenize_empty_and_whitespace_only() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \t\n  ").is_empty());
    }

    #[test]
    fn test_tokenize_idempotent_on_normalized_input() {
        let tokens = tokenize("a quick brown fox");
        let rejoined = tokens.join(" ");
        assert_eq!(tokenize(&rejoined), tokens);
    }

    #[test]
    fn test_find_marker_policies() {
        let tokens = toks(&["a", "x", "a", "y"]);
        assert_eq!(find_marker(&tokens, "a", MatchPolicy::First), Some(0));
        assert_eq!(find_marker(&tokens, "a", MatchPolicy::Last), Some(2));
        assert_eq!(find_marker(&tokens, "z", MatchPolicy::Last), None);
    }

    #[test]
    fn test_extract_range_basic() {
        let tokens = toks(&["the", "cat", "sat", "on", "the", "mat"]);
        let range = extract_range(&tokens, "cat", "the", MatchPolicy::Last, MatchPolicy::Last).unwrap();
        assert_eq!(range, toks(&["cat", "sat", "on", "the"]));
    }

    #[test]
    fn test_extract_range_repeated_start_marker_last_wins() {
        let tokens = toks(&["a", "x", "a", "y", "b"]);
        let range = extract_range(&tokens, "a", "b", MatchPolicy::Last, MatchPolicy::Last).unwrap();
        assert_eq!(range, toks(&["a", "y", "b"]));
    }

    #[test]
    fn test_extract_range_first_match_policy() {
        let tokens = toks(&["a", "x", "a", "y", "b"]);
        let range = extract_range(&tokens, "a", "b", MatchPolicy::First, MatchPolicy::Last).unwrap();
        assert_eq!(range, toks(&["a", "x", "a", "y", "b"]));
    }

    #[test]
    fn test_extract_range_start_marker_absent_is_empty() {
        let tokens = toks(&["the", "cat", "sat"]);
        let range = extract_range(&tokens, "dog", "sat", MatchPolicy::Last, MatchPolicy::Last).unwrap();
        assert!(range.is_empty());
    }

    #[test]
    fn test_extract_range_end_marker_absent_is_error() {
        let tokens = toks(&["the", "cat", "sat"]);
        let err = extract_range(&tokens, "cat", "dog", MatchPolicy::Last, MatchPolicy::Last).unwrap_err();
        assert_eq!(err, ExtractError::EndMarkerNotFound("dog".to_string()));
    }

    #[test]
    fn test_extract_range_start_after_end_is_empty() {
        let tokens = toks(&["b", "x", "a"]);
        let range = extract_range(&tokens, "a", "b", MatchPolicy::Last, MatchPolicy::Last).unwrap();
        assert!(range.is_empty());
    }

    #[test]
    fn test_extract_range_single_token_start_equals_end() {
        let tokens = toks(&["x", "word", "y"]);
        let range = extract_range(&tokens, "word", "word", MatchPolicy::Last, MatchPolicy::Last).unwrap();
        assert_eq!(range, toks(&["word"]));
    }

    #[test]
    fn test_join_phrase() {
        assert_eq!(join_phrase(&toks(&["ab", "cd"])), "abcd");
        assert_eq!(join_phrase(&[]), "");
    }
}
