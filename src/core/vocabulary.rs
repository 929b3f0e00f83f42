//! Tool and matcher vocabulary
//!
//! Everything the classifier needs to know about the flags of vcsgrep itself and
//! about the shape of grep's short flags.

/// Editor selection flags. The editor name is the flag without its dashes.
pub const EDITOR_FLAGS: &[&str] = &["--vim", "--gvim"];

/// Editors that need the terminal on stdin, so they can't be fed by `xargs`.
pub const EDITORS_NEEDING_STDIN: &[&str] = &["vim"];

/// Boolean switches handled by vcsgrep itself.
pub const TOOL_SWITCHES: &[&str] = &["--explain", "--help", "--show", "--version"];

/// Followed by a glob of files to leave out.
pub const EXCLUDE_FLAG: &str = "-X";

/// Passed through to grep unless an editor consumes grep's output.
pub const COLOR_FLAG: &str = "--color";

pub const REV_LONG_FLAG: &str = "--rev";
pub const REV_SHORT_FLAG: &str = "-r";

/// Extended regexps instead of grep's basic ones.
pub const DEFAULT_MATCHER_FLAG: &str = "-E";

/// grep flags selecting the matcher; any of them overrides the default.
pub const MATCHER_SELECT_LETTERS: &str = "EFGP";

/// With `-e` or `-f` there is no implicit (unflagged) pattern argument.
pub const SUPPRESS_IMPLICIT_PATTERN_LETTERS: &str = "ef";

/// grep flags followed by an argument, either embedded (`-C3`) or separate (`-C 3`).
pub const LETTERS_WITH_ARGUMENT: &str = "efmABCdD";

pub const VERSION_LETTER: char = 'V';

/// Utilities listed by `--version`.
pub const REPORTED_UTILITIES: &[&str] = &["grep", "sed", "xargs", "hg", "git"];
