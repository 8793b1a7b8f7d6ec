//! Structured filtering over stored entries
//!
//! A [`FilterSet`] is a conjunction of optional predicates. The engine
//! evaluates it over an owned snapshot and returns matches newest first.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::entry::AnalyzedEntry;
use crate::error::{AnalyzerError, Result};

/// Filter engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Enable parallel predicate evaluation
    pub parallel: bool,
    /// Snapshot size above which evaluation goes parallel
    pub chunk_size: usize,
    /// Number of threads (0 = auto)
    pub num_threads: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            chunk_size: 1000,
            num_threads: 0, // Auto-detect
        }
    }
}

/// Optional predicates, combined by logical AND
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_palindrome: Option<bool>,
    /// Inclusive lower bound on length
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    /// Inclusive upper bound on length
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_count: Option<usize>,
    /// Matched case-insensitively against the frequency map
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contains_character: Option<char>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_palindrome(mut self, is_palindrome: bool) -> Self {
        self.is_palindrome = Some(is_palindrome);
        self
    }

    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = Some(min_length);
        self
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn with_word_count(mut self, word_count: usize) -> Self {
        self.word_count = Some(word_count);
        self
    }

    pub fn with_character(mut self, c: char) -> Self {
        self.contains_character = Some(c);
        self
    }

    /// True when no predicate is set
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Check if an entry satisfies every present predicate
    pub fn matches(&self, entry: &AnalyzedEntry) -> bool {
        let props = &entry.properties;

        if let Some(is_palindrome) = self.is_palindrome {
            if props.is_palindrome != is_palindrome {
                return false;
            }
        }

        if let Some(min_length) = self.min_length {
            if props.length < min_length {
                return false;
            }
        }

        if let Some(max_length) = self.max_length {
            if props.length > max_length {
                return false;
            }
        }

        if let Some(word_count) = self.word_count {
            if props.word_count != word_count {
                return false;
            }
        }

        if let Some(c) = self.contains_character {
            // Fold the same way the frequency map was built
            if !c.to_lowercase().all(|f| props.character_frequency.contains(f)) {
                return false;
            }
        }

        true
    }
}

impl std::fmt::Display for FilterSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts = Vec::new();

        if let Some(v) = self.is_palindrome {
            parts.push(format!("is_palindrome: {}", v));
        }
        if let Some(v) = self.min_length {
            parts.push(format!("min_length: {}", v));
        }
        if let Some(v) = self.max_length {
            parts.push(format!("max_length: {}", v));
        }
        if let Some(v) = self.word_count {
            parts.push(format!("word_count: {}", v));
        }
        if let Some(v) = self.contains_character {
            parts.push(format!("contains_character: '{}'", v));
        }

        if parts.is_empty() {
            write!(f, "all strings")
        } else {
            write!(f, "{}", parts.join(", "))
        }
    }
}

/// Raw filter parameters as they arrive from a query string
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterParams {
    pub is_palindrome: Option<bool>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub word_count: Option<usize>,
    pub contains_character: Option<String>,
}

impl TryFrom<FilterParams> for FilterSet {
    type Error = AnalyzerError;

    fn try_from(params: FilterParams) -> Result<Self> {
        let contains_character = match params.contains_character {
            None => None,
            Some(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(c),
                    _ => {
                        return Err(AnalyzerError::InvalidInput(
                            "contains_character must be a single character".into(),
                        ))
                    }
                }
            }
        };

        Ok(Self {
            is_palindrome: params.is_palindrome,
            min_length: params.min_length,
            max_length: params.max_length,
            word_count: params.word_count,
            contains_character,
        })
    }
}

/// Evaluates filter sets over entry snapshots
pub struct FilterEngine {
    config: FilterConfig,
}

impl FilterEngine {
    /// Create a new filter engine
    pub fn new(config: FilterConfig) -> Self {
        // Configure thread pool if specified
        if config.parallel && config.num_threads > 0 {
            rayon::ThreadPoolBuilder::new()
                .num_threads(config.num_threads)
                .build_global()
                .ok();
        }

        Self { config }
    }

    /// Create with default configuration
    pub fn with_defaults() -> Self {
        Self::new(FilterConfig::default())
    }

    /// Keep matching entries, ordered newest first
    ///
    /// Entries with equal `created_at` keep their relative input order.
    pub fn filter(&self, entries: Vec<AnalyzedEntry>, filters: &FilterSet) -> Vec<AnalyzedEntry> {
        let mut matched: Vec<AnalyzedEntry> =
            if self.config.parallel && entries.len() > self.config.chunk_size {
                entries
                    .into_par_iter()
                    .filter(|e| filters.matches(e))
                    .collect()
            } else {
                entries.into_iter().filter(|e| filters.matches(e)).collect()
            };

        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn entries(values: &[&str]) -> Vec<AnalyzedEntry> {
        let base = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, v)| AnalyzedEntry::new(*v).with_created_at(base + Duration::seconds(i as i64)))
            .collect()
    }

    fn values(entries: &[AnalyzedEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.original_value.as_str()).collect()
    }

    #[test]
    fn test_palindrome_filter() {
        let engine = FilterEngine::with_defaults();
        let result = engine.filter(
            entries(&["madam", "hello"]),
            &FilterSet::new().with_palindrome(true),
        );
        assert_eq!(values(&result), vec!["madam"]);
    }

    #[test]
    fn test_contains_character_is_case_insensitive() {
        let engine = FilterEngine::with_defaults();
        let all = entries(&["Zebra", "apple", "fizz"]);

        let lower = engine.filter(all.clone(), &FilterSet::new().with_character('z'));
        assert_eq!(values(&lower), vec!["fizz", "Zebra"]);

        let upper = engine.filter(all, &FilterSet::new().with_character('Z'));
        assert_eq!(values(&upper), vec!["fizz", "Zebra"]);
    }

    #[test]
    fn test_length_bounds_are_inclusive() {
        let engine = FilterEngine::with_defaults();
        let all = entries(&["ab", "abc", "abcd", "abcde"]);

        let result = engine.filter(all, &FilterSet::new().with_min_length(3).with_max_length(4));
        assert_eq!(values(&result), vec!["abcd", "abc"]);
    }

    #[test]
    fn test_inverted_bounds_yield_empty_result() {
        let engine = FilterEngine::with_defaults();
        let result = engine.filter(
            entries(&["short", "a much longer string"]),
            &FilterSet::new().with_min_length(10).with_max_length(5),
        );
        assert!(result.is_empty());
    }

    #[test]
    fn test_conjunction() {
        let engine = FilterEngine::with_defaults();
        let all = entries(&["level", "noon", "race car", "a"]);

        let result = engine.filter(
            all,
            &FilterSet::new().with_palindrome(true).with_word_count(1).with_min_length(4),
        );
        assert_eq!(values(&result), vec!["noon", "level"]);
    }

    #[test]
    fn test_empty_filter_returns_all_newest_first() {
        let engine = FilterEngine::with_defaults();
        let result = engine.filter(entries(&["first", "second", "third"]), &FilterSet::new());
        assert_eq!(values(&result), vec!["third", "second", "first"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let engine = FilterEngine::with_defaults();
        let at = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let all: Vec<_> = ["x", "y", "z"]
            .iter()
            .map(|v| AnalyzedEntry::new(*v).with_created_at(at))
            .collect();

        let result = engine.filter(all, &FilterSet::new());
        assert_eq!(values(&result), vec!["x", "y", "z"]);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let values: Vec<String> = (0..200).map(|i| format!("entry {} {}", i, "z".repeat(i % 3))).collect();
        let refs: Vec<&str> = values.iter().map(String::as_str).collect();
        let all = entries(&refs);
        let filters = FilterSet::new().with_character('z').with_word_count(3);

        let parallel = FilterEngine::new(FilterConfig {
            parallel: true,
            chunk_size: 10,
            num_threads: 0,
        });
        let sequential = FilterEngine::new(FilterConfig {
            parallel: false,
            ..Default::default()
        });

        let a = parallel.filter(all.clone(), &filters);
        let b = sequential.filter(all, &filters);
        assert_eq!(a.len(), b.len());
        assert!(a.iter().zip(&b).all(|(x, y)| x.id == y.id));
    }

    #[test]
    fn test_params_validation() {
        let ok = FilterSet::try_from(FilterParams {
            contains_character: Some("é".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(ok.contains_character, Some('é'));

        for bad in ["", "ab"] {
            let err = FilterSet::try_from(FilterParams {
                contains_character: Some(bad.into()),
                ..Default::default()
            })
            .unwrap_err();
            assert!(err.is_invalid_input());
        }
    }

    #[test]
    fn test_filter_set_serializes_only_present_fields() {
        let json = serde_json::to_value(FilterSet::new().with_word_count(1).with_palindrome(true)).unwrap();
        assert_eq!(json, serde_json::json!({"is_palindrome": true, "word_count": 1}));
        assert_eq!(FilterSet::new().to_string(), "all strings");
    }
}
