//! Buffer rendering
//!
//! The whole buffer is laid out from scratch every frame: cells flow left to
//! right, a `'\n'` cell ends its row and rows wrap at the terminal width.
//! The layout maps cell indices to screen positions and back, so the mouse
//! can place the caret and select cells.

use std::ops::Range;

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use super::config::ConsoleConfig;
use crate::console::buffer::CellBuffer;
use crate::console::cell::{Cell, Tag};
use crate::console::cursor::RenderSurface;

/// The selection and caret as the terminal shows them
///
/// A selection runs from the anchor (where the button went down) to the
/// focus (where it is now) and covers the cells in between.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TerminalSurface {
    caret: usize,
    anchor: Option<usize>,
    focus: usize,
}

impl TerminalSurface {
    pub fn caret(&self) -> usize {
        self.caret
    }

    /// Start a selection at `index`
    pub fn begin_selection(&mut self, index: usize) {
        self.anchor = Some(index);
        self.focus = index;
    }

    /// Move the selection focus to `index`
    pub fn extend_selection(&mut self, index: usize) {
        if self.anchor.is_some() {
            self.focus = index;
        }
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selection()
            .is_some_and(|(lo, hi)| (lo..=hi).contains(&index))
    }
}

impl RenderSurface for TerminalSurface {
    fn selection(&self) -> Option<(usize, usize)> {
        let anchor = self.anchor?;
        if anchor == self.focus {
            return None;
        }
        let (lo, hi) = (anchor.min(self.focus), anchor.max(self.focus));
        Some((lo, hi - 1))
    }

    fn place_caret(&mut self, index: usize) {
        self.caret = index;
        self.anchor = None;
        self.focus = index;
    }
}

/// Colours for each kind of cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub text: Color,
    pub prompt: Color,
    pub output: Color,
}

impl Palette {
    pub fn from_config(config: &ConsoleConfig) -> Self {
        Self {
            text: config.get_text_color(),
            prompt: config.get_prompt_color(),
            output: config.get_output_color(),
        }
    }

    /// Style of one cell
    pub fn style(&self, cell: &Cell, selected: bool) -> Style {
        let mut style = if cell.has(Tag::Prompt) {
            Style::default().fg(self.prompt).add_modifier(Modifier::BOLD)
        } else if cell.has(Tag::Output) {
            Style::default().fg(self.output)
        } else {
            Style::default().fg(self.text)
        };
        if cell.has(Tag::Bold) {
            style = style.add_modifier(Modifier::BOLD);
        }
        if selected {
            style = style.add_modifier(Modifier::REVERSED);
        }
        style
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::from_config(&ConsoleConfig::default())
    }
}

/// Screen layout of a buffer at a given width
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScreenLayout {
    /// Cell index range of each row, including a terminating `'\n'`
    rows: Vec<Range<usize>>,
    /// (row, column) of every cell
    positions: Vec<(usize, usize)>,
    /// (row, column) just past the last cell
    end: (usize, usize),
}

impl ScreenLayout {
    pub fn new(buffer: &CellBuffer, width: usize) -> Self {
        let width = width.max(1);
        let mut rows = Vec::new();
        let mut positions = Vec::with_capacity(buffer.len());
        let mut start = 0;
        let mut col = 0;

        for (i, cell) in buffer.cells().iter().enumerate() {
            if col == width {
                rows.push(start..i);
                start = i;
                col = 0;
            }
            positions.push((rows.len(), col));
            if cell.ch() == '\n' {
                rows.push(start..i + 1);
                start = i + 1;
                col = 0;
            } else {
                col += 1;
            }
        }
        if col == width {
            rows.push(start..buffer.len());
            start = buffer.len();
            col = 0;
        }
        rows.push(start..buffer.len());
        let end = (rows.len() - 1, col);

        Self { rows, positions, end }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, row: usize) -> Option<Range<usize>> {
        self.rows.get(row).cloned()
    }

    /// (row, column) of the caret placed before cell `index`
    pub fn position_of(&self, index: usize) -> (usize, usize) {
        self.positions.get(index).copied().unwrap_or(self.end)
    }

    /// Cell index for a click at (row, column)
    ///
    /// Clicks right of a row's text land after its last visible cell; clicks
    /// below the last row land at the end of the buffer.
    pub fn index_at(&self, buffer: &CellBuffer, row: usize, col: usize) -> usize {
        let Some(range) = self.rows.get(row) else {
            return buffer.len();
        };
        let mut visible = range.len();
        if visible > 0 && buffer.get(range.end - 1).is_some_and(|c| c.ch() == '\n') {
            visible -= 1;
        }
        range.start + col.min(visible)
    }

    /// First row shown when `height` rows fit, keeping the newest rows
    pub fn scroll_for(&self, height: usize) -> usize {
        self.rows.len().saturating_sub(height.max(1))
    }
}

/// Styled lines for the rows `[first, first + height)`
pub fn render_lines(
    buffer: &CellBuffer,
    layout: &ScreenLayout,
    surface: &TerminalSurface,
    palette: &Palette,
    first: usize,
    height: usize,
) -> Vec<Line<'static>> {
    (first..layout.row_count().min(first + height))
        .filter_map(|row| layout.row(row))
        .map(|range| {
            let mut spans: Vec<Span<'static>> = Vec::new();
            let mut run = String::new();
            let mut run_style = Style::default();

            for index in range {
                let Some(cell) = buffer.get(index) else { continue };
                if cell.ch() == '\n' {
                    continue;
                }
                let style = palette.style(cell, surface.is_selected(index));
                if style != run_style && !run.is_empty() {
                    spans.push(Span::styled(std::mem::take(&mut run), run_style));
                }
                run_style = style;
                run.push(cell.ch());
            }
            if !run.is_empty() {
                spans.push(Span::styled(run, run_style));
            }
            Line::from(spans)
        })
        .collect()
}
