//! Argument classification
//!
//! A single left-to-right pass decides, per token, whether it belongs to grep
//! (flags and patterns), to the file lister (include/exclude globs, revisions) or
//! to vcsgrep itself (editor, switches).

use serde::Serialize;
use serde_json::Value;

use crate::core::vocabulary::{
    COLOR_FLAG, DEFAULT_MATCHER_FLAG, EDITOR_FLAGS, EXCLUDE_FLAG, LETTERS_WITH_ARGUMENT,
    MATCHER_SELECT_LETTERS, REV_LONG_FLAG, REV_SHORT_FLAG, SUPPRESS_IMPLICIT_PATTERN_LETTERS,
    TOOL_SWITCHES, VERSION_LETTER,
};

/// The classified argument vector
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedArguments {
    explain: bool,
    help: bool,
    show: bool,
    version: bool,

    include_globs: Vec<String>,
    exclude_globs: Vec<String>,
    matcher_args: Vec<String>,
    editor: Option<String>,
    color_arg: String,
    revisions: Vec<String>,
}

impl Default for ParsedArguments {
    fn default() -> Self {
        Self {
            explain: false,
            help: false,
            show: false,
            version: false,
            include_globs: Vec::new(),
            exclude_globs: Vec::new(),
            matcher_args: Vec::new(),
            editor: None,
            color_arg: COLOR_FLAG.to_string(),
            revisions: Vec::new(),
        }
    }
}

impl ParsedArguments {
    pub fn explain(&self) -> bool {
        self.explain
    }

    pub fn help(&self) -> bool {
        self.help
    }

    pub fn show(&self) -> bool {
        self.show
    }

    pub fn version(&self) -> bool {
        self.version
    }

    pub fn include_globs(&self) -> &[String] {
        &self.include_globs
    }

    pub fn exclude_globs(&self) -> &[String] {
        &self.exclude_globs
    }

    /// Flags and patterns for grep, default matcher flag included.
    pub fn matcher_args(&self) -> &[String] {
        &self.matcher_args
    }

    pub fn editor(&self) -> Option<&str> {
        self.editor.as_deref()
    }

    pub fn color_arg(&self) -> &str {
        &self.color_arg
    }

    pub fn revisions(&self) -> &[String] {
        &self.revisions
    }

    /// Render the set fields as sorted `name: value` lines.
    pub fn render_explain(&self) -> String {
        let value = serde_json::to_value(self).unwrap_or(Value::Null);
        let Value::Object(fields) = value else {
            return String::new();
        };

        let mut lines: Vec<(String, String)> = fields
            .into_iter()
            .filter(|(_, v)| is_set(v))
            .map(|(k, v)| (k, v.to_string()))
            .collect();
        lines.sort();

        lines
            .iter()
            .map(|(k, v)| format!("{}: {}", k, v))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn is_set(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
        Value::Number(_) => true,
    }
}

/// Where the next token goes when the previous one asked for an argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    MatcherArg,
    Revision,
    ExcludeGlob,
}

/// Pass state; consumed by `finish`.
struct Classifier {
    parsed: ParsedArguments,
    extension_globs: Vec<String>,
    pending: Option<Pending>,
    awaiting_implicit_pattern: bool,
    matcher_selected: bool,
}

impl Classifier {
    fn new() -> Self {
        Self {
            parsed: ParsedArguments::default(),
            extension_globs: Vec::new(),
            pending: None,
            awaiting_implicit_pattern: true,
            matcher_selected: false,
        }
    }

    fn feed(&mut self, arg: &str) {
        if let Some(pending) = self.pending.take() {
            let target = match pending {
                Pending::MatcherArg => &mut self.parsed.matcher_args,
                Pending::Revision => &mut self.parsed.revisions,
                Pending::ExcludeGlob => &mut self.parsed.exclude_globs,
            };
            target.push(arg.to_string());
        } else if EDITOR_FLAGS.contains(&arg) {
            self.parsed.editor = Some(arg.trim_start_matches('-').to_string());
        } else if TOOL_SWITCHES.contains(&arg) {
            self.set_switch(arg);
        } else if arg == EXCLUDE_FLAG {
            self.pending = Some(Pending::ExcludeGlob);
        } else if arg == COLOR_FLAG || arg.starts_with("--color=") {
            self.parsed.color_arg = arg.to_string();
        } else if arg == REV_LONG_FLAG || arg == REV_SHORT_FLAG {
            self.pending = Some(Pending::Revision);
        } else if let Some(rev) = arg.strip_prefix(REV_SHORT_FLAG) {
            self.parsed.revisions.push(rev.to_string());
        } else if arg.len() >= 2 && arg.starts_with('-') {
            self.parsed.matcher_args.push(arg.to_string());
            self.inspect_matcher_flag(arg);
        } else if self.awaiting_implicit_pattern {
            self.awaiting_implicit_pattern = false;
            self.parsed.matcher_args.push(arg.to_string());
        } else if arg.starts_with('.') && !arg.contains('/') {
            self.extension_globs.push(arg.to_string());
        } else {
            self.parsed.include_globs.push(arg.to_string());
        }
    }

    fn set_switch(&mut self, arg: &str) {
        match arg {
            "--explain" => self.parsed.explain = true,
            "--help" => self.parsed.help = true,
            "--show" => self.parsed.show = true,
            "--version" => self.parsed.version = true,
            _ => {}
        }
    }

    /// Look inside a grep flag that was already forwarded. Only short flag
    /// clusters are inspected; long flags pass through uninterpreted.
    fn inspect_matcher_flag(&mut self, arg: &str) {
        let Some(cluster) = arg.strip_prefix('-') else {
            return;
        };
        if cluster.starts_with('-') {
            return;
        }

        let mut letters = cluster.chars().peekable();
        while let Some(letter) = letters.next() {
            if letter == VERSION_LETTER {
                self.parsed.version = true;
                continue;
            }
            if SUPPRESS_IMPLICIT_PATTERN_LETTERS.contains(letter) {
                self.awaiting_implicit_pattern = false;
            } else if MATCHER_SELECT_LETTERS.contains(letter) {
                self.matcher_selected = true;
            }

            if LETTERS_WITH_ARGUMENT.contains(letter) {
                // separate (`-C 3`) rather than embedded (`-C3`)
                if letters.peek().is_none() {
                    self.pending = Some(Pending::MatcherArg);
                }
                break;
            }
        }
    }

    fn finish(mut self) -> ParsedArguments {
        if !self.extension_globs.is_empty() {
            let ext = format!("**{{{}}}", self.extension_globs.join(","));
            if self.parsed.include_globs.is_empty() {
                self.parsed.include_globs.push(ext);
            } else {
                for glob in &mut self.parsed.include_globs {
                    *glob = format!("{}/{}", glob.trim_end_matches('/'), ext);
                }
            }
        }

        if !self.matcher_selected {
            self.parsed
                .matcher_args
                .insert(0, DEFAULT_MATCHER_FLAG.to_string());
        }

        self.parsed
    }
}

/// Classify the argument vector (program name excluded). Never fails; anything
/// that isn't recognized ends up with grep or as a file pattern.
pub fn classify<I, S>(args: I) -> ParsedArguments
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut classifier = Classifier::new();
    for arg in args {
        classifier.feed(arg.as_ref());
    }
    classifier.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_single_pattern() {
        let parsed = classify(["hello"]);
        assert_eq!(parsed.matcher_args(), strings(&["-E", "hello"]));
        assert!(parsed.include_globs().is_empty());
        assert!(parsed.exclude_globs().is_empty());
        assert!(parsed.revisions().is_empty());
        assert_eq!(parsed.editor(), None);
        assert_eq!(parsed.color_arg(), "--color");
        assert!(!parsed.explain() && !parsed.help() && !parsed.show() && !parsed.version());
    }

    #[test]
    fn test_color_override() {
        assert_eq!(classify(["hello", "--color"]).color_arg(), "--color");
        let parsed = classify(["hello", "--color=always"]);
        assert_eq!(parsed.color_arg(), "--color=always");
        assert_eq!(parsed.matcher_args(), strings(&["-E", "hello"]));
    }

    #[test]
    fn test_explicit_matcher_mode() {
        let parsed = classify(["hello", "-G"]);
        assert_eq!(parsed.matcher_args(), strings(&["hello", "-G"]));

        let parsed = classify(["-iP", "hello"]);
        assert_eq!(parsed.matcher_args(), strings(&["-iP", "hello"]));
    }

    #[test]
    fn test_show_and_editor() {
        let parsed = classify(["--show", "hello", "--gvim"]);
        assert!(parsed.show());
        assert_eq!(parsed.editor(), Some("gvim"));
        assert_eq!(parsed.matcher_args(), strings(&["-E", "hello"]));
    }

    #[test]
    fn test_tool_switches() {
        let parsed = classify(["--explain", "--help", "--version", "x"]);
        assert!(parsed.explain());
        assert!(parsed.help());
        assert!(parsed.version());
        assert!(!parsed.show());
    }

    #[test]
    fn test_extension_shorthands() {
        let parsed = classify(["pat", ".h", ".cpp"]);
        assert_eq!(parsed.matcher_args(), strings(&["-E", "pat"]));
        assert_eq!(parsed.include_globs(), strings(&["**{.h,.cpp}"]));
    }

    #[test]
    fn test_extension_shorthand_restricts_directories() {
        let parsed = classify(["pat", ".cpp", "src", "docs/"]);
        assert_eq!(
            parsed.include_globs(),
            strings(&["src/**{.cpp}", "docs/**{.cpp}"])
        );
    }

    #[test]
    fn test_dot_pattern_is_implicit_pattern() {
        let parsed = classify([".pattern", "glob1", ".extglob", "*.glob2", "*/glob3"]);
        assert_eq!(parsed.matcher_args(), strings(&["-E", ".pattern"]));
        assert_eq!(
            parsed.include_globs(),
            strings(&[
                "glob1/**{.extglob}",
                "*.glob2/**{.extglob}",
                "*/glob3/**{.extglob}",
            ])
        );
    }

    #[test]
    fn test_embedded_flag_argument() {
        let parsed = classify(["-Ffpattern-file"]);
        assert_eq!(parsed.matcher_args(), strings(&["-Ffpattern-file"]));
        assert!(parsed.include_globs().is_empty());
    }

    #[test]
    fn test_separate_flag_argument() {
        let parsed = classify(["-Ff", "pattern-file"]);
        assert_eq!(parsed.matcher_args(), strings(&["-Ff", "pattern-file"]));
        assert!(parsed.include_globs().is_empty());
    }

    #[test]
    fn test_context_flag_argument() {
        let parsed = classify(["-C", "3", "hello", "src"]);
        assert_eq!(parsed.matcher_args(), strings(&["-E", "-C", "3", "hello"]));
        assert_eq!(parsed.include_globs(), strings(&["src"]));

        let parsed = classify(["-C3", "hello", "src"]);
        assert_eq!(parsed.matcher_args(), strings(&["-E", "-C3", "hello"]));
        assert_eq!(parsed.include_globs(), strings(&["src"]));
    }

    #[test]
    fn test_flag_argument_may_start_with_dash() {
        let parsed = classify(["-e", "-foo", "src"]);
        assert_eq!(parsed.matcher_args(), strings(&["-E", "-e", "-foo"]));
        assert_eq!(parsed.include_globs(), strings(&["src"]));
    }

    #[test]
    fn test_explicit_patterns_suppress_implicit_pattern() {
        let parsed = classify(["-e", "pat1", "-e", "pat2", "path"]);
        assert_eq!(
            parsed.matcher_args(),
            strings(&["-E", "-e", "pat1", "-e", "pat2"])
        );
        assert_eq!(parsed.include_globs(), strings(&["path"]));
    }

    #[test]
    fn test_separate_revisions() {
        let parsed = classify(["-r", "R1", "-r", "R2", "hello"]);
        assert_eq!(parsed.revisions(), strings(&["R1", "R2"]));
        assert_eq!(parsed.matcher_args(), strings(&["-E", "hello"]));

        let parsed = classify(["--rev", "ae279a85a0ad", "-r", ".", "hello"]);
        assert_eq!(parsed.revisions(), strings(&["ae279a85a0ad", "."]));
    }

    #[test]
    fn test_attached_revisions() {
        let parsed = classify(["-rae279a85a0ad", "-r.", "hello"]);
        assert_eq!(parsed.revisions(), strings(&["ae279a85a0ad", "."]));
        assert_eq!(parsed.matcher_args(), strings(&["-E", "hello"]));
    }

    #[test]
    fn test_exclude_globs() {
        let parsed = classify(["hello", "-X", "vendor", "-X", "*.min.js", "src"]);
        assert_eq!(parsed.exclude_globs(), strings(&["vendor", "*.min.js"]));
        assert_eq!(parsed.include_globs(), strings(&["src"]));
    }

    #[test]
    fn test_trailing_flag_without_argument_is_dropped() {
        let parsed = classify(["hello", "-X"]);
        assert!(parsed.exclude_globs().is_empty());
        assert_eq!(parsed.matcher_args(), strings(&["-E", "hello"]));
    }

    #[test]
    fn test_version_letter_in_cluster() {
        let parsed = classify(["hello", "-GV"]);
        assert_eq!(parsed.matcher_args(), strings(&["hello", "-GV"]));
        assert!(parsed.version());
    }

    #[test]
    fn test_long_matcher_flags_pass_through() {
        let parsed = classify(["--ignore-case", "hello", "--fixed-strings"]);
        assert_eq!(
            parsed.matcher_args(),
            strings(&["-E", "--ignore-case", "hello", "--fixed-strings"])
        );
    }

    #[test]
    fn test_lone_dash_is_not_a_flag() {
        let parsed = classify(["hello", "-"]);
        assert_eq!(parsed.include_globs(), strings(&["-"]));
    }

    #[test]
    fn test_every_token_lands_once() {
        let args = [
            "-i", "-A", "2", "needle", "-X", "tests", "-r", "tip", "--vim", "--show", "src",
            "lib/", "-rdefault",
        ];
        let parsed = classify(args);

        // `-X tests` and `-r tip` are represented by their values alone
        let paired = 2;
        let switches = 1;
        let distributed = parsed.matcher_args().len() - 1
            + parsed.include_globs().len()
            + parsed.exclude_globs().len()
            + parsed.revisions().len()
            + usize::from(parsed.editor().is_some());
        assert_eq!(distributed, args.len() - paired - switches);
        assert_eq!(parsed.revisions(), strings(&["tip", "default"]));
    }

    #[test]
    fn test_explain_rendering() {
        let parsed = classify(["--show", "hello", "--gvim"]);
        assert_eq!(
            parsed.render_explain(),
            "color_arg: \"--color\"\neditor: \"gvim\"\nmatcher_args: [\"-E\",\"hello\"]\nshow: true"
        );
    }

    #[test]
    fn test_explain_rendering_is_sorted() {
        let parsed = classify(["-r", "R1", "pat", ".rs", "-X", "target"]);
        let rendered = parsed.render_explain();
        let names: Vec<&str> = rendered
            .lines()
            .map(|l| l.split(':').next().unwrap())
            .collect();
        assert_eq!(
            names,
            vec![
                "color_arg",
                "exclude_globs",
                "include_globs",
                "matcher_args",
                "revisions"
            ]
        );
    }
}
