//! Built-in commands
//!
//! Small text utilities registered on every new session. Numeric arguments
//! use the leading integer of the argument; a missing, unparsable or zero
//! value falls back to the command's default.

use std::sync::OnceLock;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Local;
use rand::Rng;
use regex::Regex;

use super::calc;
use super::parser::Command;
use super::registry::CommandRegistry;
use crate::error::CommandError;

const MAX_REPEAT: i64 = 50;
const MAX_SIDES: i64 = 100;
const MAX_DICE: i64 = 10;

/// Register every built-in command, in listing order
pub fn register_builtins(registry: &mut CommandRegistry) {
    registry.register("help", "List commands", "help [cmd]", |cmd, inv| {
        Ok(inv.registry().help(cmd.arg(0)))
    });

    registry.register("echo", "Repeats the given text", "echo <text>", |cmd, _| {
        Ok(cmd.joined_args())
    });

    registry.register("reverse", "Reverses the input text", "reverse <text>", |cmd, _| {
        Ok(cmd.joined_args().chars().rev().collect())
    });

    registry.register("upper", "Converts text to uppercase", "upper <text>", |cmd, _| {
        Ok(cmd.joined_args().to_uppercase())
    });

    registry.register("lower", "Converts text to lowercase", "lower <text>", |cmd, _| {
        Ok(cmd.joined_args().to_lowercase())
    });

    registry.register("wc", "Counts words and characters", "wc <text>", |cmd, _| {
        Ok(word_count(&cmd.joined_args()))
    });

    registry.register("rand", "Generates random number", "rand [min] [max]", |cmd, _| {
        let min = int_arg(cmd, 0, 1);
        let max = int_arg(cmd, 1, 100);
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        Ok(rand::thread_rng().gen_range(lo..=hi).to_string())
    });

    registry.register("calc", "Basic calculator", "calc <expression>", |cmd, _| {
        Ok(calculate(&cmd.joined_args()))
    });

    registry.register("repeat", "Repeats text N times", "repeat <count> <text>", |cmd, _| {
        let count = int_arg(cmd, 0, 1);
        if count > MAX_REPEAT {
            return Ok(format!("Too many repetitions (max {})", MAX_REPEAT));
        }
        if count < 0 {
            return Err(CommandError::InvalidArgument("Invalid array length".to_string()));
        }
        let text = cmd.args.iter().skip(1).cloned().collect::<Vec<_>>().join(" ");
        Ok(vec![text; count as usize].join(" "))
    });

    registry.register("date", "Shows current date and time", "date", |_, _| {
        Ok(Local::now().format("%-m/%-d/%Y, %-I:%M:%S %p").to_string())
    });

    registry.register("flip", "Flips a coin", "flip", |_, _| {
        let side = if rand::thread_rng().gen_bool(0.5) { "Heads" } else { "Tails" };
        Ok(side.to_string())
    });

    registry.register("roll", "Rolls dice", "roll [sides] [count]", |cmd, _| {
        let sides = int_arg(cmd, 0, 6);
        let count = int_arg(cmd, 1, 1);
        if sides > MAX_SIDES || count > MAX_DICE {
            return Ok(format!("Limits: max {} sides, {} dice", MAX_SIDES, MAX_DICE));
        }
        if sides < 1 || count < 1 {
            return Err(CommandError::InvalidArgument(
                "sides and count must be positive".to_string(),
            ));
        }
        let mut rng = rand::thread_rng();
        let rolls: Vec<i64> = (0..count).map(|_| rng.gen_range(1..=sides)).collect();
        Ok(format_rolls(&rolls))
    });

    registry.register("caesar", "Caesar cipher encoding", "caesar <shift> <text>", |cmd, _| {
        let shift = int_arg(cmd, 0, 13);
        let text = cmd.args.iter().skip(1).cloned().collect::<Vec<_>>().join(" ");
        Ok(caesar(&text, shift))
    });

    registry.register("b64", "Base64 encode text", "b64 <text>", |cmd, _| {
        Ok(STANDARD.encode(cmd.joined_args()))
    });

    registry.register("last", "Shows last command result", "last", |_, inv| {
        Ok(match inv.last() {
            "" => "No previous result".to_string(),
            last => last.to_string(),
        })
    });

    registry.register("clear", "Clears the terminal and last results", "clear", |_, inv| {
        inv.request_clear();
        Ok(String::new())
    });

    registry.register("history", "Lists previous commands", "history [pattern]", |cmd, inv| {
        Ok(inv.history().summary(cmd.arg(0)))
    });
}

/// Leading integer of `s`: optional sign then digits, after leading whitespace
pub fn leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

fn int_arg(cmd: &Command, index: usize, default: i64) -> i64 {
    cmd.arg(index)
        .and_then(leading_int)
        .filter(|value| *value != 0)
        .unwrap_or(default)
}

fn word_count(text: &str) -> String {
    let words = text.split_whitespace().count();
    format!("Words: {}, Characters: {}", words, text.chars().count())
}

fn math_chars() -> &'static Regex {
    static MATH_CHARS: OnceLock<Regex> = OnceLock::new();
    MATH_CHARS.get_or_init(|| Regex::new(r"^[0-9+\-*/().\s]*$").expect("literal pattern"))
}

fn calculate(expr: &str) -> String {
    if !math_chars().is_match(expr) {
        return "Only basic math allowed (+, -, *, /, parentheses)".to_string();
    }
    match calc::evaluate(expr) {
        Ok(value) => calc::format_number(value),
        Err(_) => "Invalid expression".to_string(),
    }
}

fn format_rolls(rolls: &[i64]) -> String {
    match rolls {
        [single] => single.to_string(),
        _ => {
            let list = rolls.iter().map(i64::to_string).collect::<Vec<_>>().join(", ");
            format!("Rolls: {} (Sum: {})", list, rolls.iter().sum::<i64>())
        }
    }
}

fn caesar(text: &str, shift: i64) -> String {
    let shift = shift.rem_euclid(26) as u8;
    text.chars()
        .map(|ch| {
            let base = match ch {
                'a'..='z' => b'a',
                'A'..='Z' => b'A',
                _ => return ch,
            };
            ((ch as u8 - base + shift) % 26 + base) as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::history::CommandHistory;

    fn run(line: &str) -> String {
        let mut registry = CommandRegistry::new();
        register_builtins(&mut registry);
        registry.dispatch(line, &CommandHistory::new()).output
    }

    /// Negative numbers never reach handlers through the parser (`-2` is a
    /// flag), so build the command by hand
    fn run_args(name: &str, args: &[&str]) -> String {
        let mut registry = CommandRegistry::new();
        register_builtins(&mut registry);
        let cmd = Command {
            name: name.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
            ..Command::default()
        };
        registry.execute(&cmd, &CommandHistory::new()).output
    }

    #[test]
    fn test_leading_int() {
        assert_eq!(leading_int("42"), Some(42));
        assert_eq!(leading_int("  -7px"), Some(-7));
        assert_eq!(leading_int("+3"), Some(3));
        assert_eq!(leading_int("abc"), None);
        assert_eq!(leading_int(""), None);
    }

    #[test]
    fn test_text_commands() {
        assert_eq!(run("echo hello   world"), "hello world");
        assert_eq!(run("reverse abc def"), "fed cba");
        assert_eq!(run("upper shout it"), "SHOUT IT");
        assert_eq!(run("lower QUIET"), "quiet");
        assert_eq!(run("wc the quick fox"), "Words: 3, Characters: 13");
        assert_eq!(run("wc"), "Words: 0, Characters: 0");
        assert_eq!(word_count(" a\tb\n c "), "Words: 3, Characters: 8");
    }

    #[test]
    fn test_calc() {
        assert_eq!(run("calc 2 + 3 * 4"), "14");
        assert_eq!(run("calc (1+2)/4"), "0.75");
        assert_eq!(run("calc 2 ^ 3"), "Only basic math allowed (+, -, *, /, parentheses)");
        assert_eq!(run("calc 2 +"), "Invalid expression");
        assert_eq!(run("calc 1000000000000000000000"), "1e+21");
    }

    #[test]
    fn test_calc_deep_nesting_is_rejected() {
        let line = format!("calc {}1", "(".repeat(200_000));
        assert_eq!(run(&line), "Invalid expression");
        assert_eq!(calculate("((2))"), "2");
    }

    #[test]
    fn test_repeat() {
        assert_eq!(run("repeat 3 ab"), "ab ab ab");
        assert_eq!(run("repeat x ab"), "ab");
        assert_eq!(run("repeat 51 ab"), "Too many repetitions (max 50)");
        assert_eq!(run("repeat -2 ab"), "");
        assert_eq!(run_args("repeat", &["-2", "ab"]), "ERR: Invalid array length");
    }

    #[test]
    fn test_roll_and_rand_ranges() {
        for _ in 0..20 {
            let value: i64 = run("roll 4").parse().unwrap();
            assert!((1..=4).contains(&value));

            let value: i64 = run("rand 5 7").parse().unwrap();
            assert!((5..=7).contains(&value));
        }
        assert!(run("roll 6 3").starts_with("Rolls: "));
        assert_eq!(run("roll 101"), "Limits: max 100 sides, 10 dice");
        assert!(run_args("roll", &["-3"]).starts_with("ERR: "));
    }

    #[test]
    fn test_format_rolls() {
        assert_eq!(format_rolls(&[5]), "5");
        assert_eq!(format_rolls(&[1, 2, 3]), "Rolls: 1, 2, 3 (Sum: 6)");
    }

    #[test]
    fn test_flip() {
        let side = run("flip");
        assert!(side == "Heads" || side == "Tails");
    }

    #[test]
    fn test_caesar_and_b64() {
        assert_eq!(run("caesar 3 abc XYZ"), "def ABC");
        assert_eq!(run("caesar x Hello"), "Uryyb");
        assert_eq!(caesar("abc", -1), "zab");
        assert_eq!(run("b64 hello"), "aGVsbG8=");
    }

    #[test]
    fn test_date_shape() {
        let date = run("date");
        assert!(date.contains(", "));
        assert!(date.ends_with("AM") || date.ends_with("PM"));
    }

    #[test]
    fn test_last_and_clear() {
        let mut registry = CommandRegistry::new();
        register_builtins(&mut registry);
        let history = CommandHistory::new();

        assert_eq!(registry.dispatch("last", &history).output, "No previous result");
        registry.dispatch("echo kept", &history);
        assert_eq!(registry.dispatch("last", &history).output, "kept");

        let cleared = registry.dispatch("clear", &history);
        assert!(cleared.clear);
        assert_eq!(cleared.output, "");
    }

    #[test]
    fn test_help_lists_in_registration_order() {
        let help = run("help");
        let names: Vec<&str> = help.lines().map(|l| l.split(" - ").next().unwrap()).collect();
        assert_eq!(names[..3], ["help", "echo", "reverse"]);
        assert_eq!(names.last(), Some(&"history"));
        assert_eq!(run("help calc"), "Cmd: calc\nBasic calculator\ncalc <expression>");
        assert_eq!(run("help nothing"), "Not found.");
    }

    #[test]
    fn test_history_command() {
        let mut registry = CommandRegistry::new();
        register_builtins(&mut registry);
        let mut history = CommandHistory::new();
        history.push("echo one");
        history.push("calc 1+1");

        assert_eq!(registry.dispatch("history", &history).output, " 1. calc 1+1\n 2. echo one");
        assert_eq!(registry.dispatch("history echo", &history).output, " 1. echo one");
    }
}
