//! Unified line diffs between two line sequences.

use similar::{DiffTag, TextDiff};

/// LCS-based unified diff over two terminator-carrying line sequences.
///
/// Returns one record per output line (`---`/`+++` labels, `@@` hunk
/// headers, three context lines). Empty when the sequences are identical,
/// which callers render as "no differences".
pub fn unified_diff(
    label_a: &str,
    lines_a: &[String],
    label_b: &str,
    lines_b: &[String],
) -> Vec<String> {
    let text_a = lines_a.concat();
    let text_b = lines_b.concat();
    let diff = TextDiff::from_lines(text_a.as_str(), text_b.as_str());

    if diff.ops().iter().all(|op| op.tag() == DiffTag::Equal) {
        return Vec::new();
    }

    let unified = diff
        .unified_diff()
        .context_radius(3)
        .header(label_a, label_b)
        .to_string();

    unified.lines().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_identical_sequences() {
        let a = lines(&["one\n", "two\n"]);
        assert!(unified_diff("a", &a, "b", &a).is_empty());
    }

    #[test]
    fn test_both_empty() {
        assert!(unified_diff("a", &[], "b", &[]).is_empty());
    }

    #[test]
    fn test_single_line_change() {
        let a = lines(&["one\n", "two\n", "three\n"]);
        let b = lines(&["one\n", "2\n", "three\n"]);
        let records = unified_diff("old", &a, "new", &b);

        assert_eq!(records[0], "--- old");
        assert_eq!(records[1], "+++ new");
        assert!(records[2].starts_with("@@"));
        assert!(records.contains(&"-two".to_string()));
        assert!(records.contains(&"+2".to_string()));
        assert!(records.contains(&" one".to_string()));
    }

    #[test]
    fn test_addition_only() {
        let a = lines(&["one\n"]);
        let b = lines(&["one\n", "two\n"]);
        let records = unified_diff("old", &a, "new", &b);
        assert!(records.contains(&"+two".to_string()));
        assert!(!records.iter().any(|r| r.starts_with('-') && !r.starts_with("---")));
    }
}
