//! Command registry and dispatcher
//!
//! Handlers are plain functions from a parsed [`Command`] to text. The
//! dispatcher isolates them: an `Err` or a panic inside a handler becomes an
//! `ERR: ` line and the session carries on. Every dispatch, successful or
//! not, overwrites the last-result value.

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, warn};

use super::parser::Command;
use crate::console::history::CommandHistory;
use crate::error::CommandError;

/// Prefix of every handler failure result
pub const ERROR_PREFIX: &str = "ERR: ";

/// Handler signature
pub type Handler = Box<dyn Fn(&Command, &mut Invocation<'_>) -> Result<String, CommandError>>;

/// A registered command
pub struct CommandEntry {
    pub name: String,
    pub description: String,
    pub usage: String,
    handler: Handler,
}

impl std::fmt::Debug for CommandEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandEntry")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("usage", &self.usage)
            .finish_non_exhaustive()
    }
}

/// Read access to the session for a running handler
pub struct Invocation<'a> {
    registry: &'a CommandRegistry,
    history: &'a CommandHistory,
    clear_requested: bool,
}

impl<'a> Invocation<'a> {
    pub fn registry(&self) -> &CommandRegistry {
        self.registry
    }

    pub fn history(&self) -> &CommandHistory {
        self.history
    }

    /// Result of the previous dispatch
    pub fn last(&self) -> &str {
        self.registry.last_result()
    }

    /// Ask the session to wipe the buffer once this command returns
    pub fn request_clear(&mut self) {
        self.clear_requested = true;
    }
}

/// Outcome of dispatching one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub output: String,
    pub clear: bool,
}

/// Commands keyed by lower-cased name, in registration order
#[derive(Debug, Default)]
pub struct CommandRegistry {
    entries: HashMap<String, CommandEntry>,
    order: Vec<String>,
    last: String,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command, replacing any previous one with the same name
    ///
    /// A replaced command keeps its place in the listing order.
    pub fn register<F>(&mut self, name: &str, description: &str, usage: &str, handler: F)
    where
        F: Fn(&Command, &mut Invocation<'_>) -> Result<String, CommandError> + 'static,
    {
        let key = name.to_lowercase();
        if !self.entries.contains_key(&key) {
            self.order.push(key.clone());
        } else {
            debug!(name = %key, "replacing command");
        }
        self.entries.insert(
            key.clone(),
            CommandEntry {
                name: key,
                description: description.to_string(),
                usage: usage.to_string(),
                handler: Box::new(handler),
            },
        );
    }

    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        self.entries.get(&name.to_lowercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Entries in registration order
    pub fn iter(&self) -> impl Iterator<Item = &CommandEntry> {
        self.order.iter().filter_map(|name| self.entries.get(name))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Result of the most recent dispatch
    pub fn last_result(&self) -> &str {
        &self.last
    }

    pub fn clear_last_result(&mut self) {
        self.last.clear();
    }

    /// `help` text: the whole listing, or one command's details
    pub fn help(&self, name: Option<&str>) -> String {
        match name {
            Some(name) => match self.get(name) {
                Some(entry) => format!("Cmd: {}\n{}\n{}", entry.name, entry.description, entry.usage),
                None => "Not found.".to_string(),
            },
            None => self
                .iter()
                .map(|entry| format!("{} - {}", entry.name, entry.description))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    /// Tokenize, parse and run one input line
    pub fn dispatch(&mut self, line: &str, history: &CommandHistory) -> Dispatch {
        let command = Command::parse_line(line);
        self.execute(&command, history)
    }

    /// Run an already parsed command
    pub fn execute(&mut self, command: &Command, history: &CommandHistory) -> Dispatch {
        let (output, clear) = if command.is_empty() {
            (String::new(), false)
        } else if let Some(entry) = self.entries.get(&command.name) {
            let mut invocation = Invocation {
                registry: self,
                history,
                clear_requested: false,
            };
            debug!(command = %command, "dispatching");
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| (entry.handler)(command, &mut invocation)));
            let output = match outcome {
                Ok(Ok(text)) => text,
                Ok(Err(err)) => {
                    warn!(name = %command.name, error = %err, "command failed");
                    format!("{}{}", ERROR_PREFIX, err)
                }
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    warn!(name = %command.name, %message, "command panicked");
                    format!("{}{}", ERROR_PREFIX, message)
                }
            };
            (output, invocation.clear_requested)
        } else {
            debug!(name = %command.name, "unknown command");
            (format!("Unknown: '{}'", command.name), false)
        };

        self.last = output.clone();
        Dispatch { output, clear }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "command panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn echo_registry() -> CommandRegistry {
        let mut registry = CommandRegistry::new();
        registry.register("echo", "Repeats the given text", "echo <text>", |cmd, _| {
            Ok(cmd.joined_args())
        });
        registry
    }

    #[test]
    fn test_dispatch_runs_handler_and_sets_last() {
        let mut registry = echo_registry();
        let history = CommandHistory::new();

        let result = registry.dispatch("echo hi there", &history);
        assert_eq!(result.output, "hi there");
        assert!(!result.clear);
        assert_eq!(registry.last_result(), "hi there");
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let mut registry = CommandRegistry::new();
        registry.register("Shout", "", "", |_, _| Ok("HEY".to_string()));
        let history = CommandHistory::new();

        assert!(registry.contains("shout"));
        assert_eq!(registry.dispatch("SHOUT", &history).output, "HEY");
    }

    #[test]
    fn test_unknown_command() {
        let mut registry = echo_registry();
        let history = CommandHistory::new();
        assert_eq!(registry.dispatch("nope 1 2", &history).output, "Unknown: 'nope'");
        assert_eq!(registry.last_result(), "Unknown: 'nope'");
    }

    #[test]
    fn test_empty_line_overwrites_last() {
        let mut registry = echo_registry();
        let history = CommandHistory::new();
        registry.dispatch("echo x", &history);

        let result = registry.dispatch("   ", &history);
        assert_eq!(result.output, "");
        assert_eq!(registry.last_result(), "");
    }

    #[test]
    fn test_handler_error_is_isolated() {
        let mut registry = echo_registry();
        registry.register("boom", "Always fails", "boom", |_, _| {
            Err(CommandError::Failed("kaboom".to_string()))
        });
        let history = CommandHistory::new();

        let result = registry.dispatch("boom", &history);
        assert!(result.output.starts_with(ERROR_PREFIX));
        assert_eq!(result.output, "ERR: kaboom");
        assert_eq!(registry.dispatch("echo still here", &history).output, "still here");
    }

    #[test]
    fn test_handler_panic_is_isolated() {
        let mut registry = echo_registry();
        registry.register("panic", "", "", |_, _| panic!("handler exploded"));
        let history = CommandHistory::new();

        let result = registry.dispatch("panic", &history);
        assert_eq!(result.output, "ERR: handler exploded");
        assert_eq!(registry.last_result(), "ERR: handler exploded");
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.dispatch("echo ok", &history).output, "ok");
    }

    #[test]
    fn test_reregistering_overwrites_in_place() {
        let mut registry = echo_registry();
        registry.register("upper", "Uppercase", "upper <text>", |cmd, _| Ok(cmd.joined_args().to_uppercase()));
        registry.register("ECHO", "Echo twice", "echo <text>", |cmd, _| {
            Ok(format!("{0} {0}", cmd.joined_args()))
        });
        let history = CommandHistory::new();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.dispatch("echo a", &history).output, "a a");
        assert_eq!(registry.help(None), "echo - Echo twice\nupper - Uppercase");
    }

    #[test]
    fn test_help_for_one_command() {
        let registry = echo_registry();
        assert_eq!(
            registry.help(Some("Echo")),
            "Cmd: echo\nRepeats the given text\necho <text>"
        );
        assert_eq!(registry.help(Some("missing")), "Not found.");
    }

    #[test]
    fn test_invocation_sees_previous_result_and_can_clear() {
        let mut registry = echo_registry();
        registry.register("last", "", "", |_, inv| Ok(inv.last().to_string()));
        registry.register("wipe", "", "", |_, inv| {
            inv.request_clear();
            Ok(String::new())
        });
        let history = CommandHistory::new();

        registry.dispatch("echo remembered", &history);
        assert_eq!(registry.dispatch("last", &history).output, "remembered");
        assert!(registry.dispatch("wipe", &history).clear);
    }
}
