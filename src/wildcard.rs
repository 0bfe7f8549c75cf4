//! A standalone shell-style wildcard matcher (`*` and `?` only), kept free
//! of any globbing crate dependency since real shell-glob libraries differ
//! on character classes and case folding in ways this format has no
//! opinion about.

/// Matches `name` against `pattern`, where `*` matches any run of zero or
/// more characters, `?` matches exactly one character, and every other
/// character matches literally. Case-sensitive.
pub(crate) fn matches_wildcard(pattern: &str, name: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let name: Vec<char> = name.chars().collect();
    matches(&pattern, &name)
}

fn matches(pattern: &[char], name: &[char]) -> bool {
    match pattern.first() {
        None => name.is_empty(),
        Some('*') => {
            matches(&pattern[1..], name)
                || (!name.is_empty() && matches(pattern, &name[1..]))
        }
        Some('?') => !name.is_empty() && matches(&pattern[1..], &name[1..]),
        Some(c) => name.first() == Some(c) && matches(&pattern[1..], &name[1..]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_match() {
        assert!(matches_wildcard("test.txt", "test.txt"));
        assert!(!matches_wildcard("test.txt", "test.tx"));
    }

    #[test]
    fn star_matches_any_run() {
        assert!(matches_wildcard("*.txt", "test.txt"));
        assert!(matches_wildcard("*.txt", ".txt"));
        assert!(!matches_wildcard("*.txt", "test.dat"));
    }

    #[test]
    fn question_matches_one_char() {
        assert!(matches_wildcard("te?t.txt", "test.txt"));
        assert!(matches_wildcard("te?t.txt", "teet.txt"));
        assert!(!matches_wildcard("te?t.txt", "teeet.txt"));
    }

    #[test]
    fn case_sensitive() {
        assert!(!matches_wildcard("TEST.TXT", "test.txt"));
    }

    #[test]
    fn combined_wildcards() {
        assert!(matches_wildcard("*.c", "hello.c"));
        assert!(matches_wildcard("h?llo.c", "hello.c"));
        assert!(!matches_wildcard("h?llo.c", "hllo.c"));
    }
}
