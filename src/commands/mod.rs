//! Command Processing Module
//!
//! Turns a submitted line into text: tokenize, parse into a [`Command`],
//! look the name up in the [`CommandRegistry`] and run the handler.

pub mod tokenizer;
pub mod parser;
pub mod registry;
pub mod calc;
pub mod builtins;

pub use builtins::register_builtins;
pub use parser::{parse_command, Command};
pub use registry::{CommandEntry, CommandRegistry, Dispatch, Invocation, ERROR_PREFIX};
pub use tokenizer::tokenize;
