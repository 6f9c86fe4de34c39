//! Command-line tokenizer
//!
//! One left-to-right pass with three pieces of state: an escape flag, a
//! quote flag and the token being built.
//!
//! - `\` takes the next character literally and is itself dropped.
//! - `"` and `'` flip the same quote flag and are dropped. The two quote
//!   characters are interchangeable, so `"a b'` is one quoted span.
//! - Unquoted whitespace ends the current token. Empty tokens are never
//!   emitted, so `""` on its own produces nothing.

/// Split a command line into tokens
pub fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut escaped = false;

    for ch in line.chars() {
        if escaped {
            current.push(ch);
            escaped = false;
        } else if ch == '\\' {
            escaped = true;
        } else if ch == '"' || ch == '\'' {
            quoted = !quoted;
        } else if !quoted && ch.is_whitespace() {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
        } else {
            current.push(ch);
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_simple() {
        assert_eq!(tokenize("echo hello world"), vec!["echo", "hello", "world"]);
        assert_eq!(tokenize("  echo   spaced\tout  "), vec!["echo", "spaced", "out"]);
    }

    #[test]
    fn test_tokenize_quotes() {
        assert_eq!(tokenize(r#"echo "a b" c"#), vec!["echo", "a b", "c"]);
        assert_eq!(tokenize("echo 'single quoted'"), vec!["echo", "single quoted"]);
        assert_eq!(tokenize(r#"echo pre"mid dle"post"#), vec!["echo", "premid dlepost"]);
    }

    #[test]
    fn test_tokenize_mismatched_quotes_share_one_flag() {
        assert_eq!(tokenize(r#"echo "a b' c"#), vec!["echo", "a b", "c"]);
        assert_eq!(tokenize(r#"echo "it's" fine"#), vec!["echo", "its fine"]);
    }

    #[test]
    fn test_tokenize_escapes() {
        assert_eq!(tokenize(r"echo a\ b"), vec!["echo", "a b"]);
        assert_eq!(tokenize(r#"echo \"quoted\""#), vec!["echo", "\"quoted\""]);
        assert_eq!(tokenize(r"echo back\\slash"), vec!["echo", r"back\slash"]);
        assert_eq!(tokenize(r"echo trailing\"), vec!["echo", "trailing"]);
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("    ").is_empty());
        assert!(tokenize(r#""""#).is_empty());
    }

    #[test]
    fn test_tokenize_unterminated_quote_runs_to_end() {
        assert_eq!(tokenize(r#"echo "open ended"#), vec!["echo", "open ended"]);
    }
}
