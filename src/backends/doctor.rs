//! Doctor - version report of vcsgrep and the utilities it drives

use anyhow::Result;
use std::io::Write;
use std::process::Command;

use crate::core::vocabulary::REPORTED_UTILITIES;

/// Version status of one external utility
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UtilityStatus {
    pub name: String,
    /// First line of `<name> --version`, if it ran successfully
    pub version: Option<String>,
}

impl UtilityStatus {
    pub fn probe(name: &str) -> Self {
        Self {
            name: name.to_string(),
            version: first_version_line(name),
        }
    }

    pub fn to_line(&self) -> String {
        match &self.version {
            Some(line) => line.clone(),
            None => format!("{}: not found or broken (or BSD/macOS version?)", self.name),
        }
    }
}

fn first_version_line(util: &str) -> Option<String> {
    let output = Command::new(util).arg("--version").output().ok()?;
    if !output.status.success() {
        return None;
    }

    // some utilities print their version on stderr
    let text = if output.stdout.is_empty() {
        String::from_utf8_lossy(&output.stderr).into_owned()
    } else {
        String::from_utf8_lossy(&output.stdout).into_owned()
    };
    text.lines().next().map(|l| l.to_string())
}

/// Check all utilities
pub fn check_utilities() -> Vec<UtilityStatus> {
    REPORTED_UTILITIES
        .iter()
        .map(|name| UtilityStatus::probe(name))
        .collect()
}

/// Print the version report
pub fn run_version(out: &mut impl Write) -> Result<()> {
    writeln!(out, "vcsgrep {}", env!("CARGO_PKG_VERSION"))?;
    for status in check_utilities() {
        writeln!(out, "{}", status.to_line())?;
    }
    Ok(())
}
