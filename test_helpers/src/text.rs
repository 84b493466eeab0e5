//! Text helpers for inspecting generated code.

/// Counts non-overlapping occurrences of `needle` in `haystack`.
#[must_use]
pub fn count_occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    haystack.matches(needle).count()
}

/// Returns the text between the first `start` marker and the next `end`
/// marker after it, or `None` if either is missing.
#[must_use]
pub fn between<'a>(text: &'a str, start: &str, end: &str) -> Option<&'a str> {
    let (_, after) = text.split_once(start)?;
    let (inner, _) = after.split_once(end)?;
    Some(inner)
}

/// Collects the trimmed, non-empty lines of `text`.
#[must_use]
pub fn trimmed_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{between, count_occurrences, trimmed_lines};

    #[test]
    fn counts_non_overlapping_matches() {
        assert_eq!(count_occurrences("aaaa", "aa"), 2);
        assert_eq!(count_occurrences("abc", ""), 0);
    }

    #[test]
    fn between_slices_first_section() {
        assert_eq!(between("x [a] [b]", "[", "]"), Some("a"));
        assert_eq!(between("x", "[", "]"), None);
    }

    #[test]
    fn trimmed_lines_skip_blanks() {
        assert_eq!(trimmed_lines("  a\n\n b  \n"), vec!["a", "b"]);
    }
}
