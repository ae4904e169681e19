//! Denylist matching against message content.
//!
//! Terms are compiled once into case-insensitive literal patterns; matched
//! spans are masked with `*` in the output while the surrounding text is
//! preserved byte-for-byte.

use regex::{Regex, RegexBuilder};

/// A compiled set of denylist terms.
pub struct ContentFilter {
    patterns: Vec<Regex>,
}

/// The result of running the filter over one piece of text.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOutcome {
    /// Text with every matched span replaced by `*` per character.
    pub filtered: String,
    /// Whether any term matched.
    pub matched: bool,
    /// Every matched occurrence, in the casing found in the text, ordered
    /// by denylist position then match position.
    pub terms_found: Vec<String>,
}

impl ContentFilter {
    /// Compile a denylist. Terms are matched as literals (no wildcard or
    /// regex syntax), case-insensitively, including inside larger words.
    /// Empty terms are skipped.
    pub fn new(terms: &[String]) -> Self {
        let patterns = terms
            .iter()
            .map(|term| term.trim())
            .filter(|term| !term.is_empty())
            .filter_map(|term| {
                RegexBuilder::new(&regex::escape(term))
                    .case_insensitive(true)
                    .build()
                    .map_err(|err| {
                        tracing::warn!(term, error = %err, "skipping unmatchable denylist term");
                        err
                    })
                    .ok()
            })
            .collect();

        Self { patterns }
    }

    /// Number of compiled terms.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Scan `text` for every denylist term and mask the union of matched
    /// spans. Overlapping matches from different terms mask the same region
    /// once, so the result does not depend on denylist order.
    pub fn apply(&self, text: &str) -> FilterOutcome {
        if text.is_empty() || self.patterns.is_empty() {
            return FilterOutcome {
                filtered: text.to_string(),
                matched: false,
                terms_found: Vec::new(),
            };
        }

        let mut spans: Vec<(usize, usize)> = Vec::new();
        let mut terms_found = Vec::new();

        for pattern in &self.patterns {
            for found in pattern.find_iter(text) {
                spans.push((found.start(), found.end()));
                terms_found.push(found.as_str().to_string());
            }
        }

        if spans.is_empty() {
            return FilterOutcome {
                filtered: text.to_string(),
                matched: false,
                terms_found,
            };
        }

        let filtered = text
            .char_indices()
            .map(|(index, c)| {
                if spans
                    .iter()
                    .any(|&(start, end)| index >= start && index < end)
                {
                    '*'
                } else {
                    c
                }
            })
            .collect();

        FilterOutcome {
            filtered,
            matched: true,
            terms_found,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(terms: &[&str]) -> ContentFilter {
        let owned: Vec<String> = terms.iter().map(|t| t.to_string()).collect();
        ContentFilter::new(&owned)
    }

    #[test]
    fn test_masks_single_term() {
        let outcome = filter(&["badword1"]).apply("this is badword1 here");
        assert_eq!(outcome.filtered, "this is ******** here");
        assert!(outcome.matched);
        assert_eq!(outcome.terms_found, vec!["badword1".to_string()]);
    }

    #[test]
    fn test_case_insensitive_match_preserves_found_casing() {
        let outcome = filter(&["badword1"]).apply("say BadWord1 twice: badword1");
        assert_eq!(outcome.filtered, "say ******** twice: ********");
        assert_eq!(
            outcome.terms_found,
            vec!["BadWord1".to_string(), "badword1".to_string()]
        );
    }

    #[test]
    fn test_matches_inside_larger_words() {
        let outcome = filter(&["bad"]).apply("badge");
        assert_eq!(outcome.filtered, "***ge");
        assert!(outcome.matched);
    }

    #[test]
    fn test_multiple_terms_multiple_occurrences() {
        let outcome = filter(&["offensive", "inappropriate"])
            .apply("offensive and inappropriate and offensive");
        assert_eq!(outcome.filtered, "********* and ************* and *********");
        assert_eq!(outcome.terms_found.len(), 3);
    }

    #[test]
    fn test_no_match_returns_text_unchanged() {
        let outcome = filter(&["badword1"]).apply("a perfectly fine sentence");
        assert_eq!(outcome.filtered, "a perfectly fine sentence");
        assert!(!outcome.matched);
        assert!(outcome.terms_found.is_empty());
    }

    #[test]
    fn test_empty_denylist_and_empty_text() {
        let empty = filter(&[]);
        assert!(empty.is_empty());
        let outcome = empty.apply("anything");
        assert_eq!(outcome.filtered, "anything");
        assert!(!outcome.matched);

        let outcome = filter(&["bad"]).apply("");
        assert_eq!(outcome.filtered, "");
        assert!(!outcome.matched);
    }

    #[test]
    fn test_blank_terms_skipped() {
        let f = filter(&["bad", "", "   "]);
        assert_eq!(f.len(), 1);
    }

    #[test]
    fn test_overlapping_terms_mask_union() {
        let outcome = filter(&["abcd", "cdef"]).apply("abcdef");
        assert_eq!(outcome.filtered, "******");

        // The mask is span-union, so denylist order cannot change it.
        let reversed = filter(&["cdef", "abcd"]).apply("abcdef");
        assert_eq!(reversed.filtered, "******");
    }

    #[test]
    fn test_filtering_is_idempotent() {
        let f = filter(&["badword1"]);
        let once = f.apply("this is badword1 here");
        let twice = f.apply(&once.filtered);
        assert_eq!(twice.filtered, once.filtered);
        assert!(!twice.matched);
    }

    #[test]
    fn test_mask_length_counts_characters_not_bytes() {
        let outcome = filter(&["naïve"]).apply("a naïve take");
        assert_eq!(outcome.filtered, "a ***** take");
    }

    #[test]
    fn test_literal_matching_escapes_regex_syntax() {
        let outcome = filter(&["a.b"]).apply("a.b axb");
        assert_eq!(outcome.filtered, "*** axb");
    }
}
