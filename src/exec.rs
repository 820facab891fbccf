//! External command execution, used to look up PowerShell automatic variables.
use anyhow::{Context, Result, bail};
use std::process::Command;

/// Run `program` and return its trimmed standard output.
///
/// # Errors
///
/// Returns an error if the program cannot be spawned or exits unsuccessfully.
pub fn run(program: &str, args: &[&str]) -> Result<String> {
    let output = Command::new(program)
        .args(args)
        .output()
        .with_context(|| format!("failed to execute: {program}"))?;
    if !output.status.success() {
        bail!(
            "{program} failed (exit {}): {}",
            output.status.code().unwrap_or(-1),
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Ask PowerShell for the value of an automatic variable such as `PROFILE`.
///
/// Returns `None` when PowerShell is unavailable, fails, or prints nothing.
#[must_use]
pub fn powershell_variable(name: &str) -> Option<String> {
    let expr = format!("${name}");
    let value = run("powershell", &["-NoProfile", "-NonInteractive", "-Command", &expr]).ok()?;
    (!value.is_empty()).then_some(value)
}
