//! Lexical emphasis detection for caption words.

/// Words that are always emphasized, compared lowercase.
const EMPHASIS_WORDS: &[&str] = &[
    "important",
    "crucial",
    "key",
    "essential",
    "critical",
    "amazing",
    "incredible",
    "wow",
    "never",
    "always",
    "must",
    "should",
    "need",
    "required",
];

/// Decide whether a caption word should be rendered as emphasized.
///
/// Rules are checked in order and the first match wins:
/// shouted words (more than two characters, already uppercase),
/// exclamations or questions, then the fixed emphasis vocabulary.
/// Tokens without letters (e.g. `"123"`) count as uppercase.
pub fn detect_keyword(word: &str) -> bool {
    if word.chars().count() > 2 && word == word.to_uppercase() {
        return true;
    }

    if word.contains(['!', '?']) {
        return true;
    }

    let lower = word.to_lowercase();
    EMPHASIS_WORDS.contains(&lower.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_shouted_words() {
        assert!(detect_keyword("NEVER"));
        assert!(detect_keyword("STOP"));
        assert!(detect_keyword("WOW."));
        assert!(!detect_keyword("Hi"));
        assert!(!detect_keyword("OK"));
    }

    #[test]
    fn detects_punctuation() {
        assert!(detect_keyword("What?"));
        assert!(detect_keyword("go!"));
        assert!(detect_keyword("?"));
    }

    #[test]
    fn detects_vocabulary_case_insensitively() {
        assert!(detect_keyword("important"));
        assert!(detect_keyword("Crucial"));
        assert!(detect_keyword("key"));
        assert!(!detect_keyword("keys"));
    }

    #[test]
    fn plain_words_are_not_keywords() {
        assert!(!detect_keyword("the"));
        assert!(!detect_keyword("hello"));
        assert!(!detect_keyword(""));
    }
}
