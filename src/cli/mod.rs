//! CLI Terminal Interface Module
//!
//! Puts a console session on a real terminal: crossterm for raw input and
//! mouse events, ratatui for drawing the cell buffer.
//!
//! ## Module Structure
//!
//! - `config` - Configuration and theme management
//! - `input` - Terminal event mapping
//! - `render` - Buffer layout, hit testing and styled rendering
//! - `prompter` - Main console prompter orchestration

pub mod config;
pub mod input;
pub mod render;
pub mod prompter;

// Re-export main types for convenience
pub use config::ConsoleConfig;
pub use input::{map_event, CaretMove, InputAction};
pub use prompter::ConsolePrompter;
pub use render::{Palette, ScreenLayout, TerminalSurface};
