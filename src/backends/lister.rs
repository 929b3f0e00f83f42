//! Version-control file listers
//!
//! Builds the first stage of the pipeline: a NUL-separated list of tracked,
//! non-symlink files, already narrowed by the include/exclude globs.

use std::path::Path;
use std::str::FromStr;

use tracing::debug;

use crate::backends::pipeline::{quote, quote_each, PipelineError};
use crate::core::args::ParsedArguments;
use crate::core::glob::compile_all;

/// Keeps regular files from `hg files --verbose` (symlinks have an `l` flag).
const HG_SYMLINK_FILTER: &str = r"s/^.........[0-9] [^l] \(.*\)/\1/p";

/// Keeps regular files from `git ls-files --stage` (drops symlinks, submodules).
const GIT_REGULAR_FILE_FILTER: &str = r"s/^100... .*\t\(.*\)/\1/p";

/// Which version control system the working copy belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
    Hg,
    Git,
}

impl FromStr for Flavor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hg" | "hgg" | "mercurial" => Ok(Flavor::Hg),
            "git" | "ggit" => Ok(Flavor::Git),
            _ => Err(format!("Unknown version control system: {}", s)),
        }
    }
}

impl Flavor {
    /// Detect the flavor from the name the program was invoked as.
    pub fn from_program(program: &str) -> Option<Self> {
        let name = Path::new(program)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(program);

        if name.ends_with("hgg") {
            Some(Flavor::Hg)
        } else if name.ends_with("ggit") || contains_word(program, "ggit") {
            Some(Flavor::Git)
        } else {
            None
        }
    }

    /// Program name used in messages and usage text
    pub fn prog(&self) -> &'static str {
        match self {
            Flavor::Hg => "hgg",
            Flavor::Git => "ggit",
        }
    }

    /// Human-readable name of the version control system
    pub fn vcs_name(&self) -> &'static str {
        match self {
            Flavor::Hg => "Mercurial",
            Flavor::Git => "Git",
        }
    }

    /// Shell command listing the files to grep, NUL-separated.
    pub fn list_command(&self, args: &ParsedArguments) -> Result<String, PipelineError> {
        match self {
            Flavor::Hg => hg_list_command(args),
            Flavor::Git => git_list_command(args),
        }
    }
}

/// `word` occurs in `s` delimited by non-word characters.
fn contains_word(s: &str, word: &str) -> bool {
    let is_word_char = |c: char| c.is_alphanumeric() || c == '_';
    s.match_indices(word).any(|(idx, _)| {
        let before = s[..idx].chars().next_back();
        let after = s[idx + word.len()..].chars().next();
        !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
    })
}

/// Mercurial filters natively with `-I`/`-X`, so globs are passed as-is.
fn hg_list_command(args: &ParsedArguments) -> Result<String, PipelineError> {
    let mut parts = vec!["HGPLAIN=1 hg".to_string()];

    if args.revisions().is_empty() {
        parts.push("files --print0".to_string());
    } else {
        // only files changed since / between the given revisions
        parts.push("status --print0 --no-status -X 'set:symlink()'".to_string());
    }
    parts.extend(quote_each("-I", args.include_globs())?);
    parts.extend(quote_each("-X", args.exclude_globs())?);

    if args.revisions().is_empty() {
        parts.push("--verbose | sed --null-data -n -e".to_string());
        parts.push(quote(HG_SYMLINK_FILTER)?);
    } else {
        parts.extend(quote_each("--rev", args.revisions())?);
    }

    Ok(parts.join(" "))
}

/// Git can't filter `ls-files` by extended globs, so they become `grep -z` stages.
fn git_list_command(args: &ParsedArguments) -> Result<String, PipelineError> {
    if !args.revisions().is_empty() {
        return Err(PipelineError::RevisionsUnsupported(Flavor::Git.vcs_name()));
    }

    let mut cmd = format!(
        "git ls-files --stage -z | sed --null-data -n -e {}",
        quote(GIT_REGULAR_FILE_FILTER)?
    );

    if !args.include_globs().is_empty() {
        cmd.push_str(&glob_filter_stage(args.include_globs())?);
    }
    if !args.exclude_globs().is_empty() {
        cmd.push_str(&glob_filter_stage(args.exclude_globs())?);
        cmd.push_str(" -v");
    }

    Ok(cmd)
}

fn glob_filter_stage(globs: &[String]) -> Result<String, PipelineError> {
    let patterns = compile_all(globs)?;
    debug!(?globs, ?patterns, "compiled path globs");
    Ok(format!(" | grep -EzZ {}", quote_each("-e", &patterns)?.join(" ")))
}
