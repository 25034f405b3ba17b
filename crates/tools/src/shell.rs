//! Shell command execution.

use std::path::Path;

use tokio::process::Command;
use tracing::debug;

use crate::Error;

/// Run a command through the shell in the given working directory and
/// return `(stdout, stderr)`.
///
/// A non-zero exit status is not an error; both streams are returned
/// regardless, and there is no timeout. The command string goes through
/// `sh -c` uninterpreted and unsanitized - it is model-supplied input, so
/// this is a trust boundary: anything the shell can do, the model can
/// request.
pub async fn run_in_directory(
    directory: impl AsRef<Path>,
    command: &str,
) -> Result<(String, String), Error> {
    debug!(directory = %directory.as_ref().display(), command = %command, "Running shell command");

    let output = Command::new("sh")
        .arg("-c")
        .arg(command)
        .current_dir(directory)
        .output()
        .await?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    Ok((stdout, stderr))
}
