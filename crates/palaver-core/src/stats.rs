//! Content statistics: character length and word count.

/// Statistics derived from one piece of message content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageStats {
    /// Length in Unicode scalar values, not bytes.
    pub length: usize,
    /// Number of maximal runs of word characters (alphanumerics and `_`).
    pub word_count: usize,
}

/// Compute statistics over `content` in a single pass.
///
/// A word is a maximal run of characters that are alphanumeric or an
/// underscore; everything else (punctuation, whitespace, mask characters)
/// separates words without counting as one.
pub fn message_stats(content: &str) -> MessageStats {
    let mut length = 0;
    let mut word_count = 0;
    let mut in_word = false;

    for c in content.chars() {
        length += 1;
        let is_word = c.is_alphanumeric() || c == '_';
        if is_word && !in_word {
            word_count += 1;
        }
        in_word = is_word;
    }

    MessageStats { length, word_count }
}
