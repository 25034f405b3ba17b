//! Branch name to issue key heuristic.

/// Derive a Jira issue key from a Git branch name.
///
/// Splits on `-` and rejoins the first two segments. This is a heuristic,
/// not a validated parser: names with fewer than two segments degrade
/// silently to whatever segments exist (`"main"` stays `"main"`).
pub fn issue_key_from_branch(name: &str) -> String {
    name.split('-').take(2).collect::<Vec<_>>().join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_branch_name() {
        assert_eq!(issue_key_from_branch("PROJ-123-fix-login"), "PROJ-123");
    }

    #[test]
    fn test_exactly_two_segments() {
        assert_eq!(issue_key_from_branch("PROJ-123"), "PROJ-123");
    }

    #[test]
    fn test_single_segment_degrades() {
        assert_eq!(issue_key_from_branch("main"), "main");
    }

    #[test]
    fn test_empty_branch_name() {
        assert_eq!(issue_key_from_branch(""), "");
    }

    #[test]
    fn test_leading_hyphen() {
        assert_eq!(issue_key_from_branch("-123-fix"), "-123");
    }
}
