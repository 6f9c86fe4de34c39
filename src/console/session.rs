//! Console session
//!
//! Owns the whole state of one console: the cell buffer, the cursor, the
//! command history and the command registry (which also holds the last
//! result). Independent sessions share nothing.
//!
//! Control flow for a key press: the session resolves the target through the
//! cursor controller, mutates the buffer, and on Enter hands the input line
//! to the registry and appends the result plus a fresh prompt.

use tracing::{debug, info};

use super::buffer::CellBuffer;
use super::cell::Tag;
use super::cursor::{CursorController, RenderSurface};
use super::history::CommandHistory;
use super::prompt::Identity;
use crate::commands::builtins::register_builtins;
use crate::commands::registry::CommandRegistry;

/// Editing input understood by the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleKey {
    Char(char),
    Enter,
    Backspace,
    Delete,
    HistoryOlder,
    HistoryNewer,
    ToggleBold,
}

/// A message injected as if typed by someone else
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    pub message: String,
    pub sender: String,
    pub path: String,
}

impl IncomingMessage {
    pub fn new(message: impl Into<String>, sender: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            sender: sender.into(),
            path: path.into(),
        }
    }
}

impl Default for IncomingMessage {
    fn default() -> Self {
        Self::new("[no message]", "anonymous", "/")
    }
}

/// Record of one submitted line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// The trimmed input line
    pub line: String,
    /// The command's result text
    pub output: String,
}

/// One interactive console
#[derive(Debug)]
pub struct ConsoleSession {
    identity: Identity,
    buffer: CellBuffer,
    cursor: CursorController,
    history: CommandHistory,
    registry: CommandRegistry,
}

impl ConsoleSession {
    /// Create a session with the built-in commands
    pub fn new(identity: Identity) -> Self {
        let mut registry = CommandRegistry::new();
        register_builtins(&mut registry);
        Self::with_registry(identity, registry)
    }

    /// Create a session around an existing registry
    pub fn with_registry(identity: Identity, registry: CommandRegistry) -> Self {
        let buffer = CellBuffer::with_prompt(&identity.prompt());
        let cursor = CursorController::new(buffer.input_boundary());
        Self {
            identity,
            buffer,
            cursor,
            history: CommandHistory::new(),
            registry,
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn buffer(&self) -> &CellBuffer {
        &self.buffer
    }

    pub fn cursor(&self) -> usize {
        self.cursor.position()
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut CommandRegistry {
        &mut self.registry
    }

    pub fn last_result(&self) -> &str {
        self.registry.last_result()
    }

    /// The live input line
    pub fn input(&self) -> String {
        self.buffer.input_text()
    }

    /// Handle one editing key
    ///
    /// Returns the submission when the key was Enter.
    pub fn handle_key(&mut self, key: ConsoleKey, surface: &mut dyn RenderSurface) -> Option<Submission> {
        match key {
            ConsoleKey::Char('\n') | ConsoleKey::Enter => return Some(self.submit(surface)),
            ConsoleKey::Char(ch) => self.type_char(ch, surface),
            ConsoleKey::Backspace => self.cursor.backspace(&mut self.buffer, surface),
            ConsoleKey::Delete => self.cursor.delete(&mut self.buffer, surface),
            ConsoleKey::HistoryOlder => self.history_older(surface),
            ConsoleKey::HistoryNewer => self.history_newer(surface),
            ConsoleKey::ToggleBold => self.cursor.toggle_bold(&mut self.buffer, surface),
        }
        None
    }

    /// Insert a character at the cursor
    pub fn type_char(&mut self, ch: char, surface: &mut dyn RenderSurface) {
        self.cursor.insert_char(&mut self.buffer, surface, ch);
    }

    /// Type a whole string, one cell per character
    pub fn type_str(&mut self, text: &str, surface: &mut dyn RenderSurface) {
        for ch in text.chars() {
            self.type_char(ch, surface);
        }
    }

    /// Move the cursor (clamped to the input region)
    pub fn move_cursor(&mut self, index: usize, surface: &mut dyn RenderSurface) {
        self.cursor.move_cursor(&self.buffer, surface, index);
    }

    /// Submit the input line
    ///
    /// The line break is typed at the end of the input, the trimmed line is
    /// recorded and dispatched, and the result followed by a new prompt is
    /// appended. The input boundary always ends up after the new prompt.
    pub fn submit(&mut self, surface: &mut dyn RenderSurface) -> Submission {
        let end = self.buffer.len();
        self.cursor.move_cursor(&self.buffer, surface, end);
        self.cursor.insert_char(&mut self.buffer, surface, '\n');

        let line = self.buffer.input_text().trim().to_string();
        self.history.push(&line);

        let dispatch = self.registry.dispatch(&line, &self.history);
        info!(line = %line, "command submitted");

        if dispatch.clear {
            self.clear(surface);
        } else {
            if !dispatch.output.is_empty() {
                self.buffer
                    .append_segment(&format!("{}\n", dispatch.output), Tag::Output.into());
            }
            self.buffer.append_prompt(&self.identity.prompt());
            let end = self.buffer.len();
            self.cursor.move_cursor(&self.buffer, surface, end);
        }

        Submission {
            line,
            output: dispatch.output,
        }
    }

    /// Wipe the buffer down to a single prompt and forget the last result
    ///
    /// The command history is kept.
    pub fn clear(&mut self, surface: &mut dyn RenderSurface) {
        self.buffer.reset(&self.identity.prompt());
        self.registry.clear_last_result();
        let end = self.buffer.len();
        self.cursor.move_cursor(&self.buffer, surface, end);
    }

    /// Show the previous history entry in place of the input
    pub fn history_older(&mut self, surface: &mut dyn RenderSurface) {
        if let Some(text) = self.history.older().map(str::to_string) {
            debug!(position = ?self.history.position(), "history older");
            self.replace_input(&text, surface);
        }
    }

    /// Show the next history entry, or an empty line past the newest
    pub fn history_newer(&mut self, surface: &mut dyn RenderSurface) {
        if let Some(text) = self.history.newer().map(str::to_string) {
            debug!(position = ?self.history.position(), "history newer");
            self.replace_input(&text, surface);
        }
    }

    /// Replace the whole input line and put the cursor at its end
    pub fn replace_input(&mut self, text: &str, surface: &mut dyn RenderSurface) {
        self.buffer.truncate_input();
        self.buffer.append_segment(text, Default::default());
        let end = self.buffer.len();
        self.cursor.move_cursor(&self.buffer, surface, end);
    }

    /// Show a message from someone else above the current prompt
    ///
    /// The input line is untouched; the cursor shifts with it.
    pub fn receive_message(&mut self, incoming: &IncomingMessage, surface: &mut dyn RenderSurface) {
        let prompt = self.identity.sender_prompt(&incoming.sender, &incoming.path);
        let mut inserted = self.buffer.insert_before_prompt(&prompt, Tag::Prompt.into());
        inserted += self
            .buffer
            .insert_before_prompt(&format!("{}\n", incoming.message), Default::default());
        debug!(sender = %incoming.sender, inserted, "incoming message");

        self.cursor.shift(inserted);
        let cursor = self.cursor.position();
        self.cursor.move_cursor(&self.buffer, surface, cursor);
    }
}

impl Default for ConsoleSession {
    fn default() -> Self {
        Self::new(Identity::default())
    }
}
