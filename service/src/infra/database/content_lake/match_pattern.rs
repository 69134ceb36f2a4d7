//! [`MatchPattern`] definition.

use derive_more::Display;

/// Pattern for the query language's `match` operator, built from a
/// user-supplied search term.
///
/// Wildcard characters in the term are stripped before each word gets its
/// own trailing `*`, so the user's input can only ever widen to prefix
/// matching, never to an arbitrary pattern.
#[derive(Clone, Debug, Display, Eq, PartialEq)]
pub struct MatchPattern(String);

impl MatchPattern {
    /// Creates a new [`MatchPattern`] out of the given `input`.
    #[must_use]
    pub fn new(input: &str) -> Self {
        let mut pattern = String::with_capacity(input.len() + 8);
        for word in input.split_ascii_whitespace() {
            let word = word.replace(['*', '?'], "");
            if word.is_empty() {
                continue;
            }
            if !pattern.is_empty() {
                pattern.push(' ');
            }
            pattern.push_str(&word);
            pattern.push('*');
        }
        Self(pattern)
    }
}

#[cfg(test)]
mod spec {
    use super::MatchPattern;

    #[test]
    fn words_become_prefix_patterns() {
        assert_eq!(
            MatchPattern::new("sunrise stable").to_string(),
            "sunrise* stable*",
        );
    }

    #[test]
    fn wildcards_are_stripped() {
        assert_eq!(MatchPattern::new("sta*ble??").to_string(), "stable*");
        assert_eq!(MatchPattern::new("***").to_string(), "");
    }
}
