//! Exact substring matchers: brute force, Knuth-Morris-Pratt and Boyer-Moore.
//!
//! All matchers fold case once: the pattern when the matcher is built, the text
//! once per call. Offsets are byte offsets into the folded text and every
//! matcher reports overlapping occurrences.
use crate::error::TechfindError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Matching strategy selected by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Algorithm {
    BruteForce,
    Kmp,
    #[default]
    BoyerMoore,
    Fuzzy,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [
        Algorithm::BruteForce,
        Algorithm::Kmp,
        Algorithm::BoyerMoore,
        Algorithm::Fuzzy,
    ];

    /// The exact matcher behind this strategy, `None` for fuzzy scoring.
    pub fn matcher_kind(self) -> Option<MatcherKind> {
        match self {
            Algorithm::BruteForce => Some(MatcherKind::BruteForce),
            Algorithm::Kmp => Some(MatcherKind::Kmp),
            Algorithm::BoyerMoore => Some(MatcherKind::BoyerMoore),
            Algorithm::Fuzzy => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::BruteForce => "brute_force",
            Algorithm::Kmp => "kmp",
            Algorithm::BoyerMoore => "boyer_moore",
            Algorithm::Fuzzy => "fuzzy",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = TechfindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Algorithm::ALL
            .into_iter()
            .find(|a| a.as_str() == wanted)
            .ok_or_else(|| TechfindError::UnknownAlgorithm(s.to_string()))
    }
}

impl TryFrom<String> for Algorithm {
    type Error = TechfindError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Algorithm> for String {
    fn from(algorithm: Algorithm) -> Self {
        algorithm.as_str().to_string()
    }
}

/// The closed set of exact matchers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatcherKind {
    BruteForce,
    Kmp,
    BoyerMoore,
}

impl MatcherKind {
    pub const ALL: [MatcherKind; 3] = [
        MatcherKind::BruteForce,
        MatcherKind::Kmp,
        MatcherKind::BoyerMoore,
    ];
}

/// Common contract of the exact matchers.
pub trait PatternMatcher {
    /// All occurrence offsets in text that is already lower case.
    fn find_all_folded(&self, text: &str) -> Vec<usize>;

    /// Whether the pattern occurs in text that is already lower case.
    fn is_match_folded(&self, text: &str) -> bool {
        !self.find_all_folded(text).is_empty()
    }

    fn find_all(&self, text: &str) -> Vec<usize> {
        self.find_all_folded(&text.to_lowercase())
    }

    fn is_match(&self, text: &str) -> bool {
        self.is_match_folded(&text.to_lowercase())
    }

    fn name(&self) -> &'static str;
}

/// An empty pattern occurs at every position, including the end of the text.
fn every_position(text: &[u8]) -> Vec<usize> {
    (0..=text.len()).collect()
}

/// Naive matcher, compares the pattern at every start position.
#[derive(Debug, Clone)]
pub struct BruteForce {
    pattern: Vec<u8>,
}

impl BruteForce {
    pub fn new(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_lowercase().into_bytes(),
        }
    }

    fn scan(&self, text: &[u8], first_only: bool) -> Vec<usize> {
        let pattern_len = self.pattern.len();
        let mut matches = Vec::new();

        if pattern_len == 0 {
            return every_position(text);
        }
        if text.len() < pattern_len {
            return matches;
        }

        for start in 0..=text.len() - pattern_len {
            let mut j = 0;
            while j < pattern_len && text[start + j] == self.pattern[j] {
                j += 1;
            }
            if j == pattern_len {
                matches.push(start);
                if first_only {
                    break;
                }
            }
        }

        matches
    }
}

impl PatternMatcher for BruteForce {
    fn find_all_folded(&self, text: &str) -> Vec<usize> {
        self.scan(text.as_bytes(), false)
    }

    fn is_match_folded(&self, text: &str) -> bool {
        !self.scan(text.as_bytes(), true).is_empty()
    }

    fn name(&self) -> &'static str {
        "Brute Force"
    }
}

/// Knuth-Morris-Pratt matcher.
#[derive(Debug, Clone)]
pub struct Kmp {
    pattern: Vec<u8>,
    failure: Vec<usize>,
}

impl Kmp {
    pub fn new(pattern: &str) -> Self {
        let pattern = pattern.to_lowercase().into_bytes();
        let failure = Self::build_failure_table(&pattern);
        Self { pattern, failure }
    }

    /// Length of the longest proper prefix that is also a suffix, per position.
    pub fn build_failure_table(pattern: &[u8]) -> Vec<usize> {
        let mut lps = vec![0; pattern.len()];
        let mut length = 0;
        let mut i = 1;

        while i < pattern.len() {
            if pattern[i] == pattern[length] {
                length += 1;
                lps[i] = length;
                i += 1;
            } else if length > 0 {
                length = lps[length - 1];
            } else {
                lps[i] = 0;
                i += 1;
            }
        }

        lps
    }

    fn scan(&self, text: &[u8], first_only: bool) -> Vec<usize> {
        let pattern_len = self.pattern.len();
        let mut matches = Vec::new();

        if pattern_len == 0 {
            return every_position(text);
        }
        if text.len() < pattern_len {
            return matches;
        }

        let mut j = 0;
        for (i, &byte) in text.iter().enumerate() {
            while j > 0 && byte != self.pattern[j] {
                j = self.failure[j - 1];
            }
            if byte == self.pattern[j] {
                j += 1;
            }
            if j == pattern_len {
                matches.push(i + 1 - pattern_len);
                if first_only {
                    break;
                }
                j = self.failure[j - 1];
            }
        }

        matches
    }
}

impl PatternMatcher for Kmp {
    fn find_all_folded(&self, text: &str) -> Vec<usize> {
        self.scan(text.as_bytes(), false)
    }

    fn is_match_folded(&self, text: &str) -> bool {
        !self.scan(text.as_bytes(), true).is_empty()
    }

    fn name(&self) -> &'static str {
        "Knuth-Morris-Pratt"
    }
}

/// Boyer-Moore string search algorithm with bad-character and good-suffix rules
#[derive(Debug, Clone)]
pub struct BoyerMoore {
    pattern: Vec<u8>,
    bad_char_table: HashMap<u8, usize>,
    good_suffix_table: Vec<usize>,
}

impl BoyerMoore {
    pub fn new(pattern: &str) -> Self {
        let pattern_bytes = pattern.to_lowercase().into_bytes();
        let bad_char_table = Self::build_bad_char_table(&pattern_bytes);
        let good_suffix_table = Self::build_good_suffix_table(&pattern_bytes);

        Self {
            pattern: pattern_bytes,
            bad_char_table,
            good_suffix_table,
        }
    }

    /// Last occurrence index of every byte in the pattern
    fn build_bad_char_table(pattern: &[u8]) -> HashMap<u8, usize> {
        let mut table = HashMap::new();

        for (i, &byte) in pattern.iter().enumerate() {
            table.insert(byte, i);
        }

        table
    }

    /// Good-suffix shifts indexed by `j + 1`, where `j` is the mismatch position.
    ///
    /// `border[i]` holds the start of the widest border of the suffix
    /// `pattern[i..]`. The first pass fills shifts for suffixes that reoccur
    /// inside the pattern; the second fills the rest from the widest border of
    /// the whole pattern, which degrades to the full pattern length when no
    /// prefix matches a suffix.
    fn build_good_suffix_table(pattern: &[u8]) -> Vec<usize> {
        let pattern_len = pattern.len();
        let mut shift = vec![0; pattern_len + 1];
        let mut border = vec![0; pattern_len + 1];

        let mut i = pattern_len;
        let mut j = pattern_len + 1;
        border[i] = j;
        while i > 0 {
            while j <= pattern_len && pattern[i - 1] != pattern[j - 1] {
                if shift[j] == 0 {
                    shift[j] = j - i;
                }
                j = border[j];
            }
            i -= 1;
            j -= 1;
            border[i] = j;
        }

        let mut j = border[0];
        for i in 0..=pattern_len {
            if shift[i] == 0 {
                shift[i] = j;
            }
            if i == j {
                j = border[j];
            }
        }

        shift
    }

    fn scan(&self, text: &[u8], first_only: bool) -> Vec<usize> {
        let pattern_len = self.pattern.len();
        let text_len = text.len();
        let mut matches = Vec::new();

        if pattern_len == 0 {
            return every_position(text);
        }
        if text_len < pattern_len {
            return matches;
        }

        let mut anchor = 0;
        while anchor <= text_len - pattern_len {
            // j counts unmatched pattern bytes, comparing right to left
            let mut j = pattern_len;
            while j > 0 && self.pattern[j - 1] == text[anchor + j - 1] {
                j -= 1;
            }

            if j == 0 {
                matches.push(anchor);
                if first_only {
                    break;
                }
                anchor += 1;
                continue;
            }

            let mismatch = j - 1;
            let bad_char_shift = match self.bad_char_table.get(&text[anchor + mismatch]) {
                Some(&last) if last < mismatch => mismatch - last,
                Some(_) => 1,
                None => mismatch + 1,
            };
            let good_suffix_shift = self.good_suffix_table[j];

            anchor += bad_char_shift.max(good_suffix_shift).max(1);
        }

        matches
    }
}

impl PatternMatcher for BoyerMoore {
    fn find_all_folded(&self, text: &str) -> Vec<usize> {
        self.scan(text.as_bytes(), false)
    }

    fn is_match_folded(&self, text: &str) -> bool {
        !self.scan(text.as_bytes(), true).is_empty()
    }

    fn name(&self) -> &'static str {
        "Boyer-Moore"
    }
}

/// One compiled exact matcher, dispatched without boxing.
#[derive(Debug, Clone)]
pub enum Matcher {
    BruteForce(BruteForce),
    Kmp(Kmp),
    BoyerMoore(BoyerMoore),
}

impl Matcher {
    pub fn new(kind: MatcherKind, pattern: &str) -> Self {
        match kind {
            MatcherKind::BruteForce => Matcher::BruteForce(BruteForce::new(pattern)),
            MatcherKind::Kmp => Matcher::Kmp(Kmp::new(pattern)),
            MatcherKind::BoyerMoore => Matcher::BoyerMoore(BoyerMoore::new(pattern)),
        }
    }

    pub fn kind(&self) -> MatcherKind {
        match self {
            Matcher::BruteForce(_) => MatcherKind::BruteForce,
            Matcher::Kmp(_) => MatcherKind::Kmp,
            Matcher::BoyerMoore(_) => MatcherKind::BoyerMoore,
        }
    }
}

impl PatternMatcher for Matcher {
    fn find_all_folded(&self, text: &str) -> Vec<usize> {
        match self {
            Matcher::BruteForce(m) => m.find_all_folded(text),
            Matcher::Kmp(m) => m.find_all_folded(text),
            Matcher::BoyerMoore(m) => m.find_all_folded(text),
        }
    }

    fn is_match_folded(&self, text: &str) -> bool {
        match self {
            Matcher::BruteForce(m) => m.is_match_folded(text),
            Matcher::Kmp(m) => m.is_match_folded(text),
            Matcher::BoyerMoore(m) => m.is_match_folded(text),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Matcher::BruteForce(m) => m.name(),
            Matcher::Kmp(m) => m.name(),
            Matcher::BoyerMoore(m) => m.name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all(pattern: &str, text: &str) -> Vec<Vec<usize>> {
        MatcherKind::ALL
            .iter()
            .map(|&kind| Matcher::new(kind, pattern).find_all(text))
            .collect()
    }

    #[test]
    fn failure_table_matches_textbook_values() {
        assert_eq!(Kmp::build_failure_table(b"aabaaab"), vec![0, 1, 0, 1, 2, 2, 3]);
        assert_eq!(Kmp::build_failure_table(b"abcd"), vec![0, 0, 0, 0]);
        assert_eq!(Kmp::build_failure_table(b"aaaa"), vec![0, 1, 2, 3]);
    }

    #[test]
    fn good_suffix_table_for_periodic_pattern() {
        // "abab": matched suffix "b" reoccurs at distance 2, whole-pattern border is "ab"
        assert_eq!(BoyerMoore::build_good_suffix_table(b"abab"), vec![2, 2, 2, 4, 1]);
    }

    #[test]
    fn overlapping_occurrences_are_reported() {
        for offsets in all("aa", "aaaa") {
            assert_eq!(offsets, vec![0, 1, 2]);
        }
        for offsets in all("abab", "abababab") {
            assert_eq!(offsets, vec![0, 2, 4]);
        }
    }

    #[test]
    fn matching_ignores_case() {
        for offsets in all("SQL", "Blind sql and SQL") {
            assert_eq!(offsets, vec![6, 14]);
        }
    }

    #[test]
    fn empty_pattern_matches_everywhere() {
        for offsets in all("", "abc") {
            assert_eq!(offsets, vec![0, 1, 2, 3]);
        }
        for offsets in all("", "") {
            assert_eq!(offsets, vec![0]);
        }
    }

    #[test]
    fn boundaries() {
        for offsets in all("longer than text", "short") {
            assert!(offsets.is_empty());
        }
        for offsets in all("exact", "exact") {
            assert_eq!(offsets, vec![0]);
        }
    }

    #[test]
    fn multibyte_text_reports_byte_offsets() {
        for offsets in all("über", "grün über") {
            assert_eq!(offsets, vec![6]);
        }
    }

    #[test]
    fn is_match_agrees_with_find_all() {
        for kind in MatcherKind::ALL {
            let m = Matcher::new(kind, "inject");
            assert!(m.is_match("SQL Injection"));
            assert!(!m.is_match("Cross-site scripting"));
            assert_eq!(m.kind(), kind);
        }
    }

    #[test]
    fn algorithm_names_parse_strictly() {
        assert_eq!("boyer_moore".parse::<Algorithm>().unwrap(), Algorithm::BoyerMoore);
        assert_eq!(" KMP ".parse::<Algorithm>().unwrap(), Algorithm::Kmp);
        assert_eq!("fuzzy".parse::<Algorithm>().unwrap(), Algorithm::Fuzzy);
        assert!(matches!(
            "rabin_karp".parse::<Algorithm>(),
            Err(TechfindError::UnknownAlgorithm(name)) if name == "rabin_karp"
        ));
        assert_eq!(Algorithm::default(), Algorithm::BoyerMoore);
        assert_eq!(Algorithm::Fuzzy.matcher_kind(), None);
    }
}
