//! vcsgrep - quick grepping of files tracked by Mercurial and Git
//!
//! Install by symlinking the binary as "hgg" and/or "ggit", then run e.g.
//! `ggit FOO .cpp` to grep for FOO in all .cpp files tracked by Git.
//!
//! vcsgrep:
//! - Classifies its arguments into grep flags, patterns and file patterns
//! - Translates extended globs into path regexes where the VCS can't filter
//! - Runs (or shows) the resulting `lister | xargs grep` pipeline
//!
//! Requires GNU grep, GNU sed and GNU xargs.

use std::process::ExitCode;

mod backends;
mod cli;
mod core;

fn main() -> ExitCode {
    // Check for unsupported platforms
    #[cfg(windows)]
    {
        eprintln!("Error: Windows is not supported. Please use WSL (not guaranteed to work).");
        return ExitCode::FAILURE;
    }

    core::logging::init();

    let cli = cli::Cli::from_argv(std::env::args_os());
    match cli::run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}
