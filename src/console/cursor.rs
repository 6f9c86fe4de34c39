//! Cursor and selection handling
//!
//! The renderer owns the visible caret and whatever selection the user made
//! with it; the controller only sees that selection through [`RenderSurface`]
//! and turns it into buffer indices. Every edit is clamped to the input
//! boundary: anything reaching into history is dropped and the cursor stays
//! where it was.

use tracing::debug;

use super::buffer::CellBuffer;
use super::cell::{Tag, TagSet};

/// What the renderer exposes to the controller
pub trait RenderSurface {
    /// The selected cells as an inclusive index pair
    ///
    /// `None` when the selection is collapsed or does not map onto the buffer.
    fn selection(&self) -> Option<(usize, usize)>;

    /// Show the caret before the cell at `index` and collapse any selection
    fn place_caret(&mut self, index: usize);
}

/// A surface with no selection, for headless use
#[derive(Debug, Clone, Copy, Default)]
pub struct Headless {
    caret: usize,
}

impl Headless {
    pub fn caret(&self) -> usize {
        self.caret
    }
}

impl RenderSurface for Headless {
    fn selection(&self) -> Option<(usize, usize)> {
        None
    }

    fn place_caret(&mut self, index: usize) {
        self.caret = index;
    }
}

/// Where an operation applies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// The single cell at this index
    Point(usize),
    /// Every cell between the two indices, inclusive, in either order
    Range(usize, usize),
}

impl Target {
    pub fn lowest(&self) -> usize {
        match *self {
            Target::Point(i) => i,
            Target::Range(i, j) => i.min(j),
        }
    }

    pub fn highest(&self) -> usize {
        match *self {
            Target::Point(i) => i,
            Target::Range(i, j) => i.max(j),
        }
    }
}

/// Logical cursor over a [`CellBuffer`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CursorController {
    cursor: usize,
}

impl CursorController {
    pub fn new(cursor: usize) -> Self {
        Self { cursor }
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Map the surface selection to a target
    pub fn resolve_selection(&self, surface: &dyn RenderSurface) -> Target {
        match surface.selection() {
            Some((i, j)) => Target::Range(i, j),
            None => Target::Point(self.cursor),
        }
    }

    /// Run `op` on every cell of `target`, highest index first
    ///
    /// Nothing happens when the target starts below the input boundary; the
    /// unchanged cursor is returned. Otherwise the returned position is the
    /// lowest targeted index. Cells past the end are skipped.
    pub fn apply_to_selection<F>(&self, buffer: &mut CellBuffer, target: Target, mut op: F) -> usize
    where
        F: FnMut(&mut CellBuffer, usize),
    {
        let (lo, hi) = (target.lowest(), target.highest());
        if lo < buffer.input_boundary() {
            debug!(lo, boundary = buffer.input_boundary(), "selection reaches into history");
            return self.cursor;
        }
        for k in (lo..=hi).rev() {
            if k < buffer.len() {
                op(buffer, k);
            }
        }
        lo
    }

    /// Move the cursor, clamped to `[boundary, len]`, and show it
    pub fn move_cursor(&mut self, buffer: &CellBuffer, surface: &mut dyn RenderSurface, index: usize) {
        self.cursor = index.clamp(buffer.input_boundary(), buffer.len());
        surface.place_caret(self.cursor);
    }

    /// Keep the cursor valid after the buffer changed underneath it
    pub fn clamp(&mut self, buffer: &CellBuffer) {
        self.cursor = self.cursor.clamp(buffer.input_boundary(), buffer.len());
    }

    /// Shift the cursor by `delta` cells without clamping
    pub fn shift(&mut self, delta: usize) {
        self.cursor += delta;
    }

    /// Type a character at the cursor
    pub fn insert_char(&mut self, buffer: &mut CellBuffer, surface: &mut dyn RenderSurface, ch: char) {
        self.clamp(buffer);
        if buffer.insert_at(self.cursor, ch, TagSet::EMPTY) {
            self.move_cursor(buffer, surface, self.cursor + 1);
        }
    }

    /// Backspace: remove the selection, or the cell before the cursor
    pub fn backspace(&mut self, buffer: &mut CellBuffer, surface: &mut dyn RenderSurface) {
        match self.resolve_selection(surface) {
            target @ Target::Range(..) => self.remove_target(buffer, surface, target),
            Target::Point(cursor) => {
                if cursor > buffer.input_boundary() && cursor <= buffer.len() {
                    let target = Target::Point(cursor - 1);
                    self.remove_target(buffer, surface, target);
                }
            }
        }
    }

    /// Delete: remove the selection, or the cell at the cursor
    pub fn delete(&mut self, buffer: &mut CellBuffer, surface: &mut dyn RenderSurface) {
        match self.resolve_selection(surface) {
            target @ Target::Range(..) => self.remove_target(buffer, surface, target),
            target @ Target::Point(cursor) => {
                if cursor < buffer.len() {
                    self.remove_target(buffer, surface, target);
                }
            }
        }
    }

    /// Toggle bold on the selection, or on the cell at the cursor
    ///
    /// The cursor does not move.
    pub fn toggle_bold(&mut self, buffer: &mut CellBuffer, surface: &dyn RenderSurface) {
        let target = self.resolve_selection(surface);
        self.apply_to_selection(buffer, target, |buffer, k| {
            buffer.format_range(k, k, Tag::Bold);
        });
    }

    fn remove_target(&mut self, buffer: &mut CellBuffer, surface: &mut dyn RenderSurface, target: Target) {
        if target.lowest() < buffer.input_boundary() {
            debug!(?target, "delete rejected");
            return;
        }
        let cursor = self.apply_to_selection(buffer, target, |buffer, k| {
            buffer.remove_range(k, k);
        });
        self.move_cursor(buffer, surface, cursor);
    }
}
