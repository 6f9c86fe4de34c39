//! cellshell - an editable terminal console with a pluggable command registry
//!
//! The console keeps everything it has shown in one buffer of tagged cells.
//! Cells before the input boundary are history and never change; cells after
//! it are the live input line. Submitting the line runs it through the
//! command registry and appends the result followed by a fresh prompt.
//!
//! # Quick Start
//!
//! ```rust
//! use cellshell::console::{ConsoleSession, Headless, Identity};
//!
//! let mut session = ConsoleSession::new(Identity::default());
//! let mut surface = Headless::default();
//!
//! session.type_str("upper hello", &mut surface);
//! let submission = session.submit(&mut surface);
//! assert_eq!(submission.output, "HELLO");
//! ```
//!
//! # Modules
//!
//! 1. **console** - Cell buffer, cursor, history and the session
//! 2. **commands** - Tokenizer, parser, registry and built-in commands
//! 3. **cli** - Terminal front end and configuration
//! 4. **error** - Error types

pub mod cli;
pub mod commands;
pub mod console;
pub mod error;

// Re-export commonly used types for convenience
pub use commands::{Command, CommandRegistry};
pub use console::{CellBuffer, ConsoleSession, Identity, IncomingMessage};
pub use error::{CommandError, ConfigError, ConsoleError, Result};
