//! Transcript tokenization and marker-based range extraction.
//!
//! This is the core of the program: everything else delegates to external
//! speech services.

mod range;

pub use range::{ExtractError, MatchPolicy, extract_range, find_marker, join_phrase, tokenize};
