//! Static Jira CLI command construction.

/// Build the Jira CLI command that updates an issue's description.
///
/// Pure string formatting. The description is not escaped for shell
/// metacharacters or embedded quotes; the shell runner executes the result
/// verbatim.
pub fn build_description_update_command(issue_key: &str, new_description: &str) -> String {
    format!("jira issue edit {issue_key} -b'{new_description}' --no-input")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_command_format() {
        assert_eq!(
            build_description_update_command("PROJ-1", "new text"),
            "jira issue edit PROJ-1 -b'new text' --no-input"
        );
    }

    #[test]
    fn test_description_is_not_escaped() {
        // Embedded quotes pass through untouched; escaping is deliberately
        // left to nobody.
        assert_eq!(
            build_description_update_command("PROJ-2", "it's done"),
            "jira issue edit PROJ-2 -b'it's done' --no-input"
        );
    }
}
