//! Approximate matching scores in the 0-100 range
use std::collections::BTreeSet;

/// Scores texts against one query. The query is folded and tokenized once.
#[derive(Debug, Clone)]
pub struct FuzzyScorer {
    query: Vec<char>,
    tokens: BTreeSet<String>,
}

impl FuzzyScorer {
    pub fn new(query: &str) -> Self {
        Self {
            query: query.to_lowercase().chars().collect(),
            tokens: tokenize(query),
        }
    }

    /// Best of partial ratio and token-set ratio.
    pub fn score(&self, text: &str) -> u8 {
        self.partial_ratio(text).max(self.token_set_ratio(text))
    }

    /// Best similarity between the shorter string and any equally long window
    /// of the longer one.
    pub fn partial_ratio(&self, text: &str) -> u8 {
        let text: Vec<char> = text.to_lowercase().chars().collect();
        if self.query.is_empty() || text.is_empty() {
            return 0;
        }

        let (shorter, longer) = if self.query.len() <= text.len() {
            (self.query.as_slice(), text.as_slice())
        } else {
            (text.as_slice(), self.query.as_slice())
        };

        let mut best = 0.0_f64;
        for window in longer.windows(shorter.len()) {
            if window == shorter {
                return 100;
            }
            best = best.max(ratio(shorter, window));
        }

        to_score(best)
    }

    /// Order-independent comparison of the deduplicated word sets.
    pub fn token_set_ratio(&self, text: &str) -> u8 {
        let other = tokenize(text);
        if self.tokens.is_empty() || other.is_empty() {
            return 0;
        }

        let common = join(self.tokens.intersection(&other));
        let query_rest = join(self.tokens.difference(&other));
        let text_rest = join(other.difference(&self.tokens));

        let combined_query = concat(&common, &query_rest);
        let combined_text = concat(&common, &text_rest);

        let common: Vec<char> = common.chars().collect();
        let combined_query: Vec<char> = combined_query.chars().collect();
        let combined_text: Vec<char> = combined_text.chars().collect();

        let best = ratio(&common, &combined_query)
            .max(ratio(&common, &combined_text))
            .max(ratio(&combined_query, &combined_text));

        to_score(best)
    }
}

/// Indel similarity: `2 * LCS / (len_a + len_b)`, in `[0, 1]`.
pub fn ratio(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 0.0;
    }
    (2 * lcs_len(a, b)) as f64 / total as f64
}

/// Length of the longest common subsequence, two-row table.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut previous = vec![0; b.len() + 1];
    let mut current = vec![0; b.len() + 1];

    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            current[j + 1] = if ca == cb {
                previous[j] + 1
            } else {
                previous[j + 1].max(current[j])
            };
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

/// Lowercase, turn every non-alphanumeric character into a separator, dedupe.
fn tokenize(text: &str) -> BTreeSet<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    cleaned.split_whitespace().map(str::to_string).collect()
}

fn join<'a>(tokens: impl Iterator<Item = &'a String>) -> String {
    tokens.map(String::as_str).collect::<Vec<_>>().join(" ")
}

fn concat(head: &str, tail: &str) -> String {
    format!("{head} {tail}").trim().to_string()
}

fn to_score(similarity: f64) -> u8 {
    (similarity * 100.0).round().clamp(0.0, 100.0) as u8
}

/// One-off score of `query` against `text`.
pub fn similarity(query: &str, text: &str) -> u8 {
    FuzzyScorer::new(query).score(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn lcs_and_ratio() {
        assert_eq!(lcs_len(&chars("abcde"), &chars("ace")), 3);
        assert_eq!(ratio(&chars("abc"), &chars("abc")), 1.0);
        assert_eq!(ratio(&chars("abc"), &chars("xyz")), 0.0);
        assert_eq!(ratio(&[], &[]), 0.0);
    }

    #[test]
    fn verbatim_substring_scores_full_marks() {
        let scorer = FuzzyScorer::new("SQL");
        assert_eq!(scorer.partial_ratio("Blind SQL Injection"), 100);
    }

    #[test]
    fn single_typo_still_scores_high() {
        let scorer = FuzzyScorer::new("sql injecton");
        assert!(scorer.partial_ratio("SQL Injection") >= 90);
        assert!(scorer.score("SQL Injection") >= 90);
    }

    #[test]
    fn word_order_does_not_matter_for_token_set() {
        let scorer = FuzzyScorer::new("injection sql");
        assert_eq!(scorer.token_set_ratio("SQL Injection"), 100);
        assert_eq!(scorer.token_set_ratio("sql, injection!"), 100);
    }

    #[test]
    fn query_words_contained_in_longer_text_score_full() {
        let scorer = FuzzyScorer::new("query database");
        assert_eq!(
            scorer.token_set_ratio("Attacker alters the database query"),
            100
        );
    }

    #[test]
    fn unrelated_text_scores_low() {
        assert!(similarity("kerberoasting", "Cross-site scripting in forms") < 60);
    }

    #[test]
    fn empty_sides_score_zero() {
        assert_eq!(similarity("", "anything"), 0);
        assert_eq!(similarity("anything", ""), 0);
        assert_eq!(FuzzyScorer::new("!!").token_set_ratio("words"), 0);
    }

    #[test]
    fn score_is_case_insensitive() {
        assert_eq!(similarity("PHISHING", "phishing email"), similarity("phishing", "PHISHING EMAIL"));
    }
}
