//! Terminal input mapping
//!
//! Translates crossterm events into console actions. Anything the console
//! has no use for maps to [`InputAction::Ignore`].

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::console::session::ConsoleKey;

/// Caret movement inside the input line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaretMove {
    Left,
    Right,
    Home,
    End,
}

/// What the front end should do with one terminal event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// An editing key for the session
    Key(ConsoleKey),
    /// Move the caret
    Caret(CaretMove),
    /// Left button pressed at a screen position
    Press { column: u16, row: u16 },
    /// Left button dragged to a screen position
    Drag { column: u16, row: u16 },
    /// Redraw at the new size
    Resize,
    /// Leave the front end
    Quit,
    Ignore,
}

/// Map any terminal event
pub fn map_event(event: Event) -> InputAction {
    match event {
        Event::Key(key) => map_key(key),
        Event::Mouse(mouse) => map_mouse(mouse),
        Event::Resize(..) => InputAction::Resize,
        _ => InputAction::Ignore,
    }
}

/// Map a key event
pub fn map_key(key: KeyEvent) -> InputAction {
    if key.kind == KeyEventKind::Release {
        return InputAction::Ignore;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('d') => InputAction::Quit,
            KeyCode::Char('b') => InputAction::Key(ConsoleKey::ToggleBold),
            KeyCode::Char('a') => InputAction::Caret(CaretMove::Home),
            KeyCode::Char('e') => InputAction::Caret(CaretMove::End),
            _ => InputAction::Ignore,
        };
    }

    match key.code {
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::ALT) => {
            InputAction::Key(ConsoleKey::Char(ch))
        }
        KeyCode::Enter => InputAction::Key(ConsoleKey::Enter),
        KeyCode::Backspace => InputAction::Key(ConsoleKey::Backspace),
        KeyCode::Delete => InputAction::Key(ConsoleKey::Delete),
        KeyCode::Up => InputAction::Key(ConsoleKey::HistoryOlder),
        KeyCode::Down => InputAction::Key(ConsoleKey::HistoryNewer),
        KeyCode::Left => InputAction::Caret(CaretMove::Left),
        KeyCode::Right => InputAction::Caret(CaretMove::Right),
        KeyCode::Home => InputAction::Caret(CaretMove::Home),
        KeyCode::End => InputAction::Caret(CaretMove::End),
        _ => InputAction::Ignore,
    }
}

/// Map a mouse event; only the left button matters
pub fn map_mouse(mouse: MouseEvent) -> InputAction {
    let (column, row) = (mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => InputAction::Press { column, row },
        MouseEventKind::Drag(MouseButton::Left) => InputAction::Drag { column, row },
        _ => InputAction::Ignore,
    }
}
