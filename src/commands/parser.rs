//! Command parser
//!
//! Turns a token sequence into a [`Command`]. The grammar is total: every
//! token sequence, including the empty one, parses.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::tokenizer::tokenize;

/// A parsed command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Command {
    /// Lower-cased command name; empty for a blank line
    pub name: String,
    /// Positional arguments in order
    pub args: Vec<String>,
    /// Boolean flags (`-ab`, `--verbose`)
    pub flags: BTreeSet<String>,
    /// Valued options (`--key=value`, `--key value`)
    pub opts: BTreeMap<String, String>,
}

impl Command {
    /// Tokenize and parse a raw line
    pub fn parse_line(line: &str) -> Self {
        parse_command(&tokenize(line))
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.contains(flag)
    }

    pub fn opt(&self, key: &str) -> Option<&str> {
        self.opts.get(key).map(String::as_str)
    }

    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }

    /// Positional arguments joined with single spaces
    pub fn joined_args(&self) -> String {
        self.args.join(" ")
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for flag in &self.flags {
            write!(f, " --{}", flag)?;
        }
        for (key, value) in &self.opts {
            write!(f, " --{}={}", key, value)?;
        }
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Parse a token sequence into a command
pub fn parse_command<S: AsRef<str>>(tokens: &[S]) -> Command {
    let mut cmd = Command::default();
    let Some((first, rest)) = tokens.split_first() else {
        return cmd;
    };
    cmd.name = first.as_ref().to_lowercase();

    let mut i = 0;
    while i < rest.len() {
        let token = rest[i].as_ref();
        if let Some(long) = token.strip_prefix("--") {
            if let Some((key, value)) = long.split_once('=') {
                cmd.opts.insert(key.to_string(), value.to_string());
            } else {
                match rest.get(i + 1).map(|next| next.as_ref()) {
                    Some(next) if !next.starts_with('-') => {
                        cmd.opts.insert(long.to_string(), next.to_string());
                        i += 1;
                    }
                    _ => {
                        cmd.flags.insert(long.to_string());
                    }
                }
            }
        } else if token.len() > 1 && token.starts_with('-') {
            for flag in token.chars().skip(1) {
                cmd.flags.insert(flag.to_string());
            }
        } else {
            cmd.args.push(token.to_string());
        }
        i += 1;
    }
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_flags_and_options() {
        let cmd = parse_command(&["cmd", "-ab", "--x=1", "--y", "2", "pos"]);
        assert_eq!(cmd.name, "cmd");
        assert_eq!(cmd.args, vec!["pos"]);
        assert_eq!(cmd.flags, set(&["a", "b"]));
        assert_eq!(cmd.opt("x"), Some("1"));
        assert_eq!(cmd.opt("y"), Some("2"));
        assert_eq!(cmd.opts.len(), 2);
    }

    #[test]
    fn test_name_is_case_folded() {
        let cmd = parse_command(&["ECHO", "Keep"]);
        assert_eq!(cmd.name, "echo");
        assert_eq!(cmd.args, vec!["Keep"]);
    }

    #[test]
    fn test_long_flag_before_dash_or_end() {
        let cmd = parse_command(&["cmd", "--verbose", "-q", "--dry-run"]);
        assert_eq!(cmd.flags, set(&["verbose", "q", "dry-run"]));
        assert!(cmd.opts.is_empty());
    }

    #[test]
    fn test_equals_splits_once() {
        let cmd = parse_command(&["cmd", "--expr=a=b"]);
        assert_eq!(cmd.opt("expr"), Some("a=b"));
    }

    #[test]
    fn test_lone_dash_is_an_argument() {
        let cmd = parse_command(&["cat", "-"]);
        assert_eq!(cmd.args, vec!["-"]);
        assert!(cmd.flags.is_empty());
    }

    #[test]
    fn test_empty_input() {
        let cmd = parse_command::<&str>(&[]);
        assert!(cmd.is_empty());
        assert!(cmd.args.is_empty() && cmd.flags.is_empty() && cmd.opts.is_empty());
        assert_eq!(Command::parse_line("   "), Command::default());
    }

    #[test]
    fn test_parse_line_with_quotes() {
        let cmd = Command::parse_line(r#"Echo "hello there" --to bob -n"#);
        assert_eq!(cmd.name, "echo");
        assert_eq!(cmd.args, vec!["hello there"]);
        assert_eq!(cmd.opt("to"), Some("bob"));
        assert!(cmd.has_flag("n"));
        assert_eq!(cmd.joined_args(), "hello there");
    }

    #[test]
    fn test_display() {
        let cmd = Command::parse_line("cmd -a --k=v pos");
        assert_eq!(cmd.to_string(), "cmd --a --k=v pos");
    }
}
