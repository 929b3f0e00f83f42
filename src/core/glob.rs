//! Glob to regex translation
//!
//! Approximate translation of a Mercurial-like extended glob into a regex suitable
//! for `grep -E` over a list of paths. Supported syntax: `*`, `?`, `**`, `**/`,
//! bracket expressions and (nested) brace alternation.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use thiserror::Error;

/// Meta sequences of the glob dialect; everything between them is literal text.
static META_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*/?|[*?,{}]|\[[^\]]+\]").expect("Invalid META_RE regex"));

/// Which way the braces of a glob are unbalanced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BraceReason {
    UnclosedBrace,
    UnexpectedClosingBrace,
}

/// A glob whose braces don't balance
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid glob pattern ({reason}): {glob}")]
pub struct MalformedGlob {
    pub glob: String,
    pub reason: BraceReason,
}

impl fmt::Display for BraceReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BraceReason::UnclosedBrace => write!(f, "unclosed \"}}\""),
            BraceReason::UnexpectedClosingBrace => write!(f, "unexpected \"}}\""),
        }
    }
}

impl MalformedGlob {
    fn new(glob: &str, reason: BraceReason) -> Self {
        Self {
            glob: glob.to_string(),
            reason,
        }
    }
}

/// Compile a glob into an anchored regex.
///
/// The result matches a path that starts with the glob, either fully or up to a
/// `/`, so directory globs select everything below them. An empty result means
/// "no filtering".
pub fn compile(glob: &str) -> Result<String, MalformedGlob> {
    let normalized = strip_dot_segments(glob);
    if normalized.is_empty() {
        return Ok(String::new());
    }

    let mut depth = 0usize;
    let mut out = String::from("^");
    let mut last = 0;

    for meta in META_RE.find_iter(&normalized) {
        push_escaped(&mut out, &normalized[last..meta.start()]);
        last = meta.end();

        match meta.as_str() {
            "?" => out.push('.'),
            "*" => out.push_str("[^/]*"),
            "**" | "**/" => out.push_str(".*"),
            "{" => {
                out.push('(');
                depth += 1;
            }
            "," if depth == 0 => out.push(','),
            "," => out.push('|'),
            "}" => {
                if depth == 0 {
                    return Err(MalformedGlob::new(
                        glob,
                        BraceReason::UnexpectedClosingBrace,
                    ));
                }
                out.push(')');
                depth -= 1;
            }
            // bracket expression, already a valid character class
            class => out.push_str(class),
        }
    }
    push_escaped(&mut out, &normalized[last..]);

    if depth > 0 {
        return Err(MalformedGlob::new(glob, BraceReason::UnclosedBrace));
    }

    out.push_str("(/|$)");
    Ok(out)
}

/// Compile every glob, stopping at the first malformed one.
pub fn compile_all<S: AsRef<str>>(globs: &[S]) -> Result<Vec<String>, MalformedGlob> {
    globs.iter().map(|g| compile(g.as_ref())).collect()
}

/// Drop `.` path segments: `.`, `./foo/./bar` and `a/./b` are no-ops as paths.
fn strip_dot_segments(glob: &str) -> String {
    let mut out = String::with_capacity(glob.len());
    let mut rest = glob;

    // `rest` always starts at a segment boundary
    loop {
        if rest == "." {
            break;
        }
        if let Some(after) = rest.strip_prefix("./") {
            rest = after;
            continue;
        }
        match rest.find('/') {
            Some(idx) => {
                out.push_str(&rest[..=idx]);
                rest = &rest[idx + 1..];
            }
            None => {
                out.push_str(rest);
                break;
            }
        }
    }

    out
}

/// Escape every ASCII character that isn't alphanumeric or `_`.
fn push_escaped(out: &mut String, literal: &str) {
    for c in literal.chars() {
        if c.is_ascii() && !c.is_ascii_alphanumeric() && c != '_' {
            out.push('\\');
        }
        out.push(c);
    }
}
