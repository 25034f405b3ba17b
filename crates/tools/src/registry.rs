//! Tool declarations and the agent's system prompt.

use branchsync_core::ToolSpec;

/// Fixed system instruction for every exchange.
pub const SYSTEM_PROMPT: &str = "You are an agent that keeps Git and Jira in sync. \
    Do not add or delete anything, only update. Only output the final result.";

/// The tools exposed to the model, registered once at startup.
pub fn tool_specs() -> Vec<ToolSpec> {
    vec![
        ToolSpec {
            name: "run_command_in_directory".into(),
            description: "Run a command in a directory and return the stdout and stderr".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "directory": {"type": "string", "description": "Working directory for the command"},
                    "command": {"type": "string", "description": "Shell command to run"}
                },
                "required": ["directory", "command"]
            }),
        },
        ToolSpec {
            name: "get_issue_from_git_branch".into(),
            description: "Get the issue number from a git branch name".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "branch_name": {"type": "string", "description": "Git branch name"}
                },
                "required": ["branch_name"]
            }),
        },
        ToolSpec {
            name: "jira_cli_commands".into(),
            description: "List example Jira CLI commands scraped from its README".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {}
            }),
        },
        ToolSpec {
            name: "get_project_directory".into(),
            description: "Get the project directory".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {}
            }),
        },
        ToolSpec {
            name: "get_jira_cli_update_description_command".into(),
            description: "Build the Jira CLI command that updates an issue description".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "issue_key": {"type": "string", "description": "Jira issue key"},
                    "new_description": {"type": "string", "description": "New description text"}
                },
                "required": ["issue_key", "new_description"]
            }),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use branchsync_core::controller::parse_action;

    #[test]
    fn test_five_tools_registered() {
        assert_eq!(tool_specs().len(), 5);
    }

    #[test]
    fn test_every_spec_name_parses() {
        // Each registered tool name must be reachable through the closed
        // action mapping, with a minimal valid input.
        let inputs = serde_json::json!({
            "directory": ".",
            "command": "true",
            "branch_name": "PROJ-1-x",
            "issue_key": "PROJ-1",
            "new_description": "text"
        });

        for spec in tool_specs() {
            assert!(
                parse_action(&spec.name, &inputs).is_ok(),
                "tool {} did not parse",
                spec.name
            );
        }
    }
}
