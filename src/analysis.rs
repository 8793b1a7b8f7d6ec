//! Deterministic structural analysis of text
//!
//! Every property is derived from the submitted text alone. Palindrome
//! detection, unique-character counting and the frequency histogram all work
//! on the case-folded text; `length` counts the original characters.

use std::collections::HashMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use sha2::{Digest, Sha256};

/// Case-fold text the same way for every folded property and filter
pub fn fold(text: &str) -> String {
    text.to_lowercase()
}

/// Lowercase hex SHA-256 of the original (unfolded) text
pub fn content_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Character histogram preserving first-occurrence order
///
/// Serializes as a JSON object whose keys are one-character strings,
/// emitted in the order each character first appeared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterFrequency {
    counts: Vec<(char, usize)>,
    /// Position of each character in `counts`
    index: HashMap<char, usize>,
}

impl CharacterFrequency {
    /// Build the histogram of an already folded string
    pub fn from_folded(folded: &str) -> Self {
        let mut counts: Vec<(char, usize)> = Vec::new();
        let mut index: HashMap<char, usize> = HashMap::new();
        for c in folded.chars() {
            match index.get(&c) {
                Some(&pos) => counts[pos].1 += 1,
                None => {
                    index.insert(c, counts.len());
                    counts.push((c, 1));
                }
            }
        }
        Self { counts, index }
    }

    /// Occurrence count of a folded character
    pub fn get(&self, c: char) -> Option<usize> {
        self.index.get(&c).map(|&pos| self.counts[pos].1)
    }

    /// Whether a folded character occurs at all
    pub fn contains(&self, c: char) -> bool {
        self.index.contains_key(&c)
    }

    /// Number of distinct characters
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl Serialize for CharacterFrequency {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.counts.len()))?;
        let mut buf = [0u8; 4];
        for (c, n) in &self.counts {
            map.serialize_entry(&*c.encode_utf8(&mut buf), n)?;
        }
        map.end()
    }
}

/// Structural facts computed from a string
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Properties {
    /// Number of characters in the original text
    pub length: usize,
    /// Folded text reads the same backward
    pub is_palindrome: bool,
    /// Distinct folded characters
    pub unique_characters: usize,
    /// Whitespace-delimited tokens
    pub word_count: usize,
    /// Same value as the entry id
    #[serde(rename = "sha256_hash")]
    pub content_hash: String,
    /// Folded character histogram
    #[serde(rename = "character_frequency_map")]
    pub character_frequency: CharacterFrequency,
}

/// Analyze a string. Total for every input, including the empty string.
pub fn analyze(text: &str) -> Properties {
    let folded = fold(text);

    let is_palindrome = folded.chars().eq(folded.chars().rev());
    let character_frequency = CharacterFrequency::from_folded(&folded);

    Properties {
        length: text.chars().count(),
        is_palindrome,
        unique_characters: character_frequency.len(),
        word_count: text.split_whitespace().count(),
        content_hash: content_hash(text),
        character_frequency,
    }
}
