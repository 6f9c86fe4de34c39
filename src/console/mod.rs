//! Console Core Module
//!
//! The editable console: a tagged cell buffer split into committed history and
//! a live input line, the cursor controller that edits it, command history
//! navigation, and the session tying them to the command registry.
//!
//! ## Module Structure
//!
//! - `cell` - Characters with their formatting tags
//! - `buffer` - Cell buffer and input boundary
//! - `cursor` - Cursor, selection targets and the `RenderSurface` seam
//! - `history` - Submitted-line log with up/down browsing
//! - `prompt` - Prompt rendering from the user identity
//! - `session` - One console session

pub mod cell;
pub mod buffer;
pub mod cursor;
pub mod history;
pub mod prompt;
pub mod session;

pub use buffer::CellBuffer;
pub use cell::{Cell, Tag, TagSet};
pub use cursor::{CursorController, Headless, RenderSurface, Target};
pub use history::{Browse, CommandHistory};
pub use prompt::{render_prompt, Identity};
pub use session::{ConsoleKey, ConsoleSession, IncomingMessage, Submission};
