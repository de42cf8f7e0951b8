//! Key Pattern Module
//!
//! Glob matching for key enumeration. Supports `*` (any run of characters,
//! including empty) and `?` (exactly one character). Matching operates on
//! characters, not bytes, so multi-byte keys behave as expected.

// == Glob Pattern ==
/// A compiled glob pattern for filtering keys.
#[derive(Debug, Clone)]
pub struct GlobPattern {
    chars: Vec<char>,
}

impl GlobPattern {
    /// Compiles a pattern string.
    pub fn new(pattern: &str) -> Self {
        Self {
            chars: pattern.chars().collect(),
        }
    }

    /// Tests whether the full text matches the pattern.
    pub fn matches(&self, text: &str) -> bool {
        let text: Vec<char> = text.chars().collect();
        matches_recursive(&self.chars, &text)
    }
}

fn matches_recursive(pattern: &[char], text: &[char]) -> bool {
    match pattern.first() {
        None => text.is_empty(),
        Some('*') => {
            // Zero or more characters
            (0..=text.len()).any(|i| matches_recursive(&pattern[1..], &text[i..]))
        }
        Some('?') => {
            // Exactly one character
            !text.is_empty() && matches_recursive(&pattern[1..], &text[1..])
        }
        Some(&literal) => {
            text.first() == Some(&literal) && matches_recursive(&pattern[1..], &text[1..])
        }
    }
}
