//! Natural-language query translation
//!
//! Recognizes a small fixed vocabulary of phrasings and maps them onto a
//! [`FilterSet`]. Each rule is a named pattern with a builder that
//! contributes fields to the accumulating filter set; a query may trigger
//! several rules. Anything outside the vocabulary is rejected.

use regex::{Captures, Regex};
use serde::Serialize;

use crate::error::{AnalyzerError, Result};
use crate::filter::FilterSet;

/// A translated query together with the text it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterpretedQuery {
    /// The query as submitted
    pub original: String,
    /// Filters the query resolved to
    pub parsed_filters: FilterSet,
}

type RuleFn = fn(&Captures<'_>, &mut FilterSet) -> Result<()>;

struct TranslatorRule {
    name: &'static str,
    pattern: Regex,
    apply: RuleFn,
}

/// Rule-based translator from free text to filter sets
pub struct QueryTranslator {
    rules: Vec<TranslatorRule>,
}

impl QueryTranslator {
    /// Compile the built-in rule set
    pub fn new() -> Result<Self> {
        let specs: [(&'static str, &str, RuleFn); 8] = [
            (
                "word_count",
                r"\b(single|one|two|three)[\s-]words?\b",
                apply_word_count,
            ),
            (
                "non_palindrome",
                r"\b(?:non[\s-]?|not\s+)palindrom",
                apply_non_palindrome,
            ),
            ("palindrome", r"palindrom", apply_palindrome),
            ("longer_than", r"\blonger\s+than\s+([0-9]+)", apply_longer_than),
            ("shorter_than", r"\bshorter\s+than\s+([0-9]+)", apply_shorter_than),
            ("letter", r#"\bletter\s+['"]?(\p{L})\b"#, apply_letter),
            (
                "containing",
                r#"\bcontain(?:s|ing)?\s+(?:the\s+)?(?:character\s+)?(?:['"](\p{L})['"]|(\p{L})\s*[.?!]?\s*$)"#,
                apply_containing,
            ),
            ("first_vowel", r"\bfirst\s+vowel\b", apply_first_vowel),
        ];

        let rules = specs
            .into_iter()
            .map(|(name, pattern, apply)| {
                let pattern = Regex::new(pattern).map_err(|e| {
                    AnalyzerError::Config(format!("Invalid pattern for rule '{}': {}", name, e))
                })?;
                Ok(TranslatorRule {
                    name,
                    pattern,
                    apply,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { rules })
    }

    /// Names of the rules, in evaluation order
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name).collect()
    }

    /// Translate a query into a filter set
    pub fn translate(&self, query: &str) -> Result<InterpretedQuery> {
        let normalized = query.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(AnalyzerError::UnparsableQuery("query is empty".into()));
        }

        let mut filters = FilterSet::new();
        let mut matched = false;

        for rule in &self.rules {
            if let Some(caps) = rule.pattern.captures(&normalized) {
                tracing::trace!(rule = rule.name, "translator rule matched");
                (rule.apply)(&caps, &mut filters)?;
                matched = true;
            }
        }

        if !matched {
            return Err(AnalyzerError::UnparsableQuery(query.to_string()));
        }

        if let (Some(min), Some(max)) = (filters.min_length, filters.max_length) {
            if min > max {
                return Err(AnalyzerError::ConflictingFilters(format!(
                    "min_length {} is greater than max_length {}",
                    min, max
                )));
            }
        }

        Ok(InterpretedQuery {
            original: query.to_string(),
            parsed_filters: filters,
        })
    }
}

fn parse_count(caps: &Captures<'_>) -> Result<usize> {
    caps[1]
        .parse()
        .map_err(|_| AnalyzerError::UnparsableQuery(format!("length '{}' is out of range", &caps[1])))
}

fn first_char(s: &str) -> Option<char> {
    s.chars().next()
}

fn apply_word_count(caps: &Captures<'_>, filters: &mut FilterSet) -> Result<()> {
    let count = match &caps[1] {
        "single" | "one" => 1,
        "two" => 2,
        _ => 3,
    };
    filters.word_count = Some(count);
    Ok(())
}

fn apply_non_palindrome(_: &Captures<'_>, filters: &mut FilterSet) -> Result<()> {
    filters.is_palindrome = Some(false);
    Ok(())
}

fn apply_palindrome(_: &Captures<'_>, filters: &mut FilterSet) -> Result<()> {
    filters.is_palindrome.get_or_insert(true);
    Ok(())
}

fn apply_longer_than(caps: &Captures<'_>, filters: &mut FilterSet) -> Result<()> {
    let n = parse_count(caps)?;
    let min = n
        .checked_add(1)
        .ok_or_else(|| AnalyzerError::UnparsableQuery(format!("length '{}' is out of range", n)))?;
    filters.min_length = Some(min);
    Ok(())
}

fn apply_shorter_than(caps: &Captures<'_>, filters: &mut FilterSet) -> Result<()> {
    let n = parse_count(caps)?;
    let max = n.checked_sub(1).ok_or_else(|| {
        AnalyzerError::ConflictingFilters("no string is shorter than 0 characters".into())
    })?;
    filters.max_length = Some(max);
    Ok(())
}

fn apply_letter(caps: &Captures<'_>, filters: &mut FilterSet) -> Result<()> {
    filters.contains_character = first_char(&caps[1]);
    Ok(())
}

fn apply_containing(caps: &Captures<'_>, filters: &mut FilterSet) -> Result<()> {
    if filters.contains_character.is_none() {
        filters.contains_character = caps
            .get(1)
            .or_else(|| caps.get(2))
            .and_then(|m| first_char(m.as_str()));
    }
    Ok(())
}

fn apply_first_vowel(_: &Captures<'_>, filters: &mut FilterSet) -> Result<()> {
    filters.contains_character.get_or_insert('a');
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translate(query: &str) -> Result<FilterSet> {
        QueryTranslator::new()
            .unwrap()
            .translate(query)
            .map(|q| q.parsed_filters)
    }

    #[test]
    fn test_single_word_palindromic() {
        let interpreted = QueryTranslator::new()
            .unwrap()
            .translate("all single word palindromic strings")
            .unwrap();
        assert_eq!(interpreted.original, "all single word palindromic strings");
        assert_eq!(
            interpreted.parsed_filters,
            FilterSet::new().with_word_count(1).with_palindrome(true)
        );
    }

    #[test]
    fn test_longer_than() {
        assert_eq!(
            translate("strings longer than 10 characters").unwrap(),
            FilterSet::new().with_min_length(11)
        );
    }

    #[test]
    fn test_shorter_than() {
        assert_eq!(
            translate("Strings SHORTER than 5").unwrap(),
            FilterSet::new().with_max_length(4)
        );
    }

    #[test]
    fn test_word_count_variants() {
        assert_eq!(translate("two-word strings").unwrap().word_count, Some(2));
        assert_eq!(translate("three words please").unwrap().word_count, Some(3));
        assert_eq!(translate("one word").unwrap().word_count, Some(1));
    }

    #[test]
    fn test_non_palindromic() {
        assert_eq!(
            translate("non-palindromic strings").unwrap().is_palindrome,
            Some(false)
        );
        assert_eq!(
            translate("strings that are not palindromic").unwrap().is_palindrome,
            Some(false)
        );
        assert_eq!(
            translate("palindromes only").unwrap().is_palindrome,
            Some(true)
        );
    }

    #[test]
    fn test_letter_rule() {
        assert_eq!(
            translate("strings containing the letter Z").unwrap(),
            FilterSet::new().with_character('z')
        );
        assert_eq!(
            translate("words with letter 'q' in them").unwrap().contains_character,
            Some('q')
        );
    }

    #[test]
    fn test_containing_rule() {
        assert_eq!(
            translate("strings containing z").unwrap().contains_character,
            Some('z')
        );
        assert_eq!(
            translate("contains the character \"x\" and is palindromic").unwrap(),
            FilterSet::new().with_palindrome(true).with_character('x')
        );
    }

    #[test]
    fn test_first_vowel() {
        assert_eq!(
            translate("palindromic strings that contain the first vowel").unwrap(),
            FilterSet::new().with_palindrome(true).with_character('a')
        );
        // An explicit letter wins over the heuristic
        assert_eq!(
            translate("first vowel or the letter e").unwrap().contains_character,
            Some('e')
        );
    }

    #[test]
    fn test_unparsable() {
        assert!(matches!(
            translate("xyzzy nonsense"),
            Err(AnalyzerError::UnparsableQuery(_))
        ));
        assert!(matches!(translate("   "), Err(AnalyzerError::UnparsableQuery(_))));
        assert!(matches!(
            translate("longer than 99999999999999999999999999"),
            Err(AnalyzerError::UnparsableQuery(_))
        ));
    }

    #[test]
    fn test_non_ascii_digits_are_not_lengths() {
        match translate("longer than \u{0661}\u{0660}") {
            Err(AnalyzerError::UnparsableQuery(msg)) => assert!(!msg.contains("out of range")),
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(
            translate("shorter than \u{0661}\u{0660} palindromic").unwrap(),
            FilterSet::new().with_palindrome(true)
        );
    }

    #[test]
    fn test_conflicting_bounds() {
        assert!(matches!(
            translate("longer than 10 and shorter than 5"),
            Err(AnalyzerError::ConflictingFilters(_))
        ));
        assert!(matches!(
            translate("shorter than 0 characters"),
            Err(AnalyzerError::ConflictingFilters(_))
        ));
        assert_eq!(
            translate("longer than 3 and shorter than 5").unwrap(),
            FilterSet::new().with_min_length(4).with_max_length(4)
        );
    }

    #[test]
    fn test_rule_order() {
        let translator = QueryTranslator::new().unwrap();
        assert_eq!(translator.rule_names().first(), Some(&"word_count"));
        assert_eq!(translator.rule_names().last(), Some(&"first_vowel"));
    }
}
