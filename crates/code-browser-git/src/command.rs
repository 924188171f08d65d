//! Spawning git.

use anyhow::{Context, Result};
use log::debug;
use tokio::process::Command;

/// Run `git -C <repo_root> <args>` and return its stdout.
///
/// A non-zero exit status becomes an error carrying git's stderr.
pub(crate) async fn run_git(binary: &str, repo_root: &str, args: &[&str]) -> Result<Vec<u8>> {
    debug!("Running {} -C {} {}", binary, repo_root, args.join(" "));

    let output = Command::new(binary)
        .arg("-C")
        .arg(repo_root)
        .args(args)
        .env("GIT_TERMINAL_PROMPT", "0")
        .kill_on_drop(true)
        .output()
        .await
        .with_context(|| format!("Failed to run {} in '{}'", binary, repo_root))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!(
            "git {} failed: {}",
            args.first().copied().unwrap_or_default(),
            stderr.trim()
        );
    }

    Ok(output.stdout)
}

/// Split NUL-terminated (`-z`) output into paths.
pub(crate) fn split_nul(stdout: &[u8]) -> Vec<String> {
    stdout
        .split(|b| *b == 0)
        .filter(|p| !p.is_empty())
        .map(|p| String::from_utf8_lossy(p).into_owned())
        .collect()
}
