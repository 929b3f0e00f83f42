//! Pipeline assembly and execution
//!
//! lister | xargs grep [| xargs editor], rendered as one `sh` command line so it
//! can be shown verbatim with `--show`.

use anyhow::{Context, Result};
use std::process::{Command, ExitCode, Stdio};
use thiserror::Error;
use tracing::debug;

use crate::backends::lister::Flavor;
use crate::core::args::ParsedArguments;
use crate::core::glob::MalformedGlob;
use crate::core::vocabulary::EDITORS_NEEDING_STDIN;

const GREP: &str = "grep --binary-files=without-match -H";

/// Reasons a pipeline can't be assembled
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    MalformedGlob(#[from] MalformedGlob),

    #[error("--rev is not implemented for {0}")]
    RevisionsUnsupported(&'static str),

    #[error("argument can't be passed through the shell: {0:?}")]
    Unquotable(String),
}

/// Shell-quote a single argument, POSIX single-quote style.
pub fn quote(arg: &str) -> Result<String, PipelineError> {
    // a NUL byte can't be part of an argv entry
    if arg.contains('\0') {
        return Err(PipelineError::Unquotable(arg.to_string()));
    }
    Ok(shell_words::quote(arg).into_owned())
}

/// Shell-quote every argument, each preceded by `flag`.
pub fn quote_each<S: AsRef<str>>(flag: &str, args: &[S]) -> Result<Vec<String>, PipelineError> {
    args.iter()
        .map(|a| quote(a.as_ref()).map(|q| format!("{} {}", flag, q)))
        .collect()
}

fn quote_all<S: AsRef<str>>(args: &[S]) -> Result<String, PipelineError> {
    Ok(args
        .iter()
        .map(|a| quote(a.as_ref()))
        .collect::<Result<Vec<_>, _>>()?
        .join(" "))
}

/// The assembled search, ready to show or run
#[derive(Debug, Clone)]
pub struct Pipeline {
    /// lister and grep stages
    search: String,
    editor: Option<String>,
}

impl Pipeline {
    pub fn build(flavor: Flavor, args: &ParsedArguments) -> Result<Self, PipelineError> {
        let mut grep_args = args.matcher_args().to_vec();
        if args.editor().is_some() {
            grep_args.extend(["-l".to_string(), "--null".to_string()]);
        } else {
            grep_args.push(args.color_arg().to_string());
        }

        let search = format!(
            "{} | xargs -0 {} {} --",
            flavor.list_command(args)?,
            GREP,
            quote_all(&grep_args)?
        );

        Ok(Self {
            search,
            editor: args.editor().map(str::to_string),
        })
    }

    /// Full command line, editor stage included.
    pub fn command_line(&self) -> Result<String, PipelineError> {
        match &self.editor {
            Some(editor) => Ok(format!(
                "{} | xargs --no-run-if-empty -0 {}",
                self.search,
                quote(editor)?
            )),
            None => Ok(self.search.clone()),
        }
    }

    /// Run the pipeline, returning the exit status of the last stage.
    pub fn run(&self) -> Result<ExitCode> {
        match self.editor.as_deref() {
            Some(editor) if EDITORS_NEEDING_STDIN.contains(&editor) => {
                self.run_with_terminal_editor(editor)
            }
            _ => {
                let cmd = self.command_line()?;
                debug!(%cmd, "running pipeline");
                let status = Command::new("sh")
                    .arg("-c")
                    .arg(&cmd)
                    .status()
                    .context("failed to spawn sh")?;
                Ok(ExitCode::from(exit_status(status.code())))
            }
        }
    }

    /// The editor keeps the terminal as stdin, so files are collected first and
    /// handed over as arguments.
    fn run_with_terminal_editor(&self, editor: &str) -> Result<ExitCode> {
        debug!(cmd = %self.search, "collecting files for editor");
        let output = Command::new("sh")
            .arg("-c")
            .arg(&self.search)
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()
            .context("failed to spawn sh")?;

        let files = split_nul(&output.stdout);
        if files.is_empty() {
            return Ok(ExitCode::SUCCESS);
        }

        debug!(editor, count = files.len(), "launching editor");
        let status = Command::new(editor)
            .args(&files)
            .status()
            .with_context(|| format!("failed to launch {}", editor))?;
        Ok(ExitCode::from(exit_status(status.code())))
    }
}

/// NUL-terminated file names, as printed by `grep -l --null`.
fn split_nul(bytes: &[u8]) -> Vec<String> {
    bytes
        .split(|&b| b == 0)
        .filter(|name| !name.is_empty())
        .map(|name| String::from_utf8_lossy(name).into_owned())
        .collect()
}

fn exit_status(code: Option<i32>) -> u8 {
    match code {
        Some(code) => u8::try_from(code).unwrap_or(1),
        // killed by a signal
        None => 1,
    }
}
