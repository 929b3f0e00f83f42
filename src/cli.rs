//! CLI module - Entry point definitions and dispatch

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::ffi::OsString;
use std::io;
use std::process::ExitCode;
use tracing::debug;

use crate::backends::doctor::run_version;
use crate::backends::lister::Flavor;
use crate::backends::pipeline::Pipeline;
use crate::core::args::classify;
use crate::core::vocabulary::EDITOR_FLAGS;

/// vcsgrep - quick grepping of files tracked by Mercurial and Git.
///
/// clap only sees the program name and leading `--vcs` options. Everything
/// after them is classified by vcsgrep itself, `--` included, so clap's own
/// help and version flags are disabled.
#[derive(Parser, Debug)]
#[command(name = "vcsgrep", disable_help_flag = true, disable_version_flag = true)]
pub struct Cli {
    /// Version control system of the working copy (hg/git).
    #[arg(
        long,
        env = "VCSGREP_VCS",
        value_name = "VCS",
        hide = true,
        long_help = "Version control system of the working copy (hg or git).\n\n\
If omitted, it's derived from the program name: \"hgg\" for Mercurial and\n\
\"ggit\" for Git."
    )]
    pub vcs: Option<Flavor>,

    /// grep options, grep patterns, file patterns and vcsgrep options, verbatim.
    #[arg(skip)]
    pub args: Vec<String>,
}

const VCS_FLAG: &str = "--vcs";

impl Cli {
    /// Parse the process arguments, exiting on a bad `--vcs` value.
    pub fn from_argv<I, T>(argv: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_from_argv(argv).unwrap_or_else(|err| err.exit())
    }

    pub fn try_from_argv<I, T>(argv: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let argv: Vec<String> = argv
            .into_iter()
            .map(|arg| arg.into().to_string_lossy().into_owned())
            .collect();
        let (head, rest) = split_vcs_options(argv);

        let mut cli = Self::try_parse_from(head)?;
        cli.args = rest;
        Ok(cli)
    }
}

/// Split argv into the program name plus leading `--vcs` options, and the rest.
fn split_vcs_options(argv: Vec<String>) -> (Vec<String>, Vec<String>) {
    let mut iter = argv.into_iter().peekable();
    let mut head: Vec<String> = iter.next().into_iter().collect();

    loop {
        match iter.peek().map(String::as_str) {
            Some(VCS_FLAG) => {
                head.extend(iter.next());
                head.extend(iter.next());
            }
            Some(arg) if arg.starts_with("--vcs=") => head.extend(iter.next()),
            _ => break,
        }
    }

    (head, iter.collect())
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<ExitCode> {
    let program = std::env::args_os()
        .next()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| "vcsgrep".to_string());

    let Some(flavor) = cli.vcs.or_else(|| Flavor::from_program(&program)) else {
        bail!("{}: must be invoked as \"hgg\" or \"ggit\"", program);
    };

    dispatch(flavor, &cli.args).with_context(|| flavor.prog().to_string())
}

fn dispatch(flavor: Flavor, args: &[String]) -> Result<ExitCode> {
    let parsed = classify(args);
    debug!(?parsed, "classified arguments");

    if parsed.explain() {
        println!("{}", parsed.render_explain());
        return Ok(ExitCode::SUCCESS);
    }

    if parsed.version() {
        run_version(&mut io::stdout().lock())?;
        return Ok(ExitCode::SUCCESS);
    }

    if parsed.help() || args.is_empty() || (args.len() == 1 && args[0] == "-h") {
        eprint!("{}", usage(flavor));
        return Ok(ExitCode::FAILURE);
    }

    let pipeline = Pipeline::build(flavor, &parsed)?;
    if parsed.show() {
        println!("{}", pipeline.command_line()?);
        return Ok(ExitCode::SUCCESS);
    }

    pipeline.run()
}

/// Usage text, printed on stderr by `--help`
pub fn usage(flavor: Flavor) -> String {
    let prog = flavor.prog();
    let mut text = format!(
        r#"usage: {prog} [--show] [{editors_pipe}] [GREP-OPTIONS] GREP-PATTERN... [FILE-PATTERN]...
Searches for GREP-PATTERN across tracked files (filtered by FILE-PATTERNs,
if any) in the {vcs} working directory. Skips binary files and symlinks,
and defaults to "grep -E" (extended regexp) mode.

Example: {prog} -i "hello" .h .cpp src/

For help on GREP-OPTIONS and GREP-PATTERN, see "man grep". FILE-PATTERNS
use extended glob syntax (** and {{}} supported), or plain file extensions.
Plain file extensions (e.g. '.py') limit permitted file extensions; using
these turn all other file patterns into directory patterns (and implicitly
adds e.g. '/**.py'). Use -X FILE-PATTERN to leave files out.

Use --show to see the grep command instead of executing it. Use one of
{editors_comma} to open matching files in editor. Use --explain
to explain how exactly the {prog} arguments were parsed.
"#,
        prog = prog,
        editors_pipe = EDITOR_FLAGS.join("|"),
        editors_comma = EDITOR_FLAGS.join(", "),
        vcs = flavor.vcs_name(),
    );

    if flavor == Flavor::Hg {
        text.push_str(
            "\nUse -r REV to grep only files changed since REV, or -r R1 -r R2 to grep\n\
             only files changed between revisions R1 and R2.\n",
        );
    }

    text
}
