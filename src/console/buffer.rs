//! Console buffer
//!
//! An ordered sequence of tagged cells holding both the committed history
//! (everything before the input boundary) and the live input line (from the
//! boundary to the end). The boundary is the end of the most recently
//! appended prompt and only ever moves forward, except when the whole buffer
//! is reset.
//!
//! Every mutating operation checks the boundary the same way: anything that
//! would touch a cell below it is rejected as a no-op.

use tracing::debug;

use super::cell::{Cell, Tag, TagSet};

/// Cell-addressed console buffer with an input boundary
#[derive(Debug, Clone, Default)]
pub struct CellBuffer {
    cells: Vec<Cell>,
    /// Text of the most recent prompt
    prompt: String,
    /// Index of the first cell of the most recent prompt
    prompt_start: usize,
    /// First editable index
    boundary: usize,
}

impl CellBuffer {
    /// Create a buffer holding a single rendered prompt
    pub fn with_prompt(prompt: &str) -> Self {
        let mut buffer = Self::default();
        buffer.append_prompt(prompt);
        buffer
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn get(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    /// First index at which edits are permitted
    pub fn input_boundary(&self) -> usize {
        self.boundary
    }

    /// Index of the first cell of the most recent prompt
    pub fn prompt_start(&self) -> usize {
        self.prompt_start
    }

    /// Text of the most recent prompt
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Insert one tagged cell at `index`
    ///
    /// Returns false without touching the buffer when `index` lies in history
    /// or past the end.
    pub fn insert_at(&mut self, index: usize, ch: char, tags: TagSet) -> bool {
        if index < self.boundary || index > self.cells.len() {
            debug!(index, boundary = self.boundary, "insert rejected");
            return false;
        }
        self.cells.insert(index, Cell::tagged(ch, tags));
        true
    }

    /// Remove the cells `[min(i, j), max(i, j)]`
    ///
    /// `i == j` removes the single cell at `i`. Indices past the end are
    /// ignored. Returns false when the range starts in history.
    pub fn remove_range(&mut self, i: usize, j: usize) -> bool {
        let (lo, hi) = (i.min(j), i.max(j));
        if lo < self.boundary {
            debug!(lo, boundary = self.boundary, "remove rejected");
            return false;
        }
        if lo >= self.cells.len() {
            return true;
        }
        let hi = hi.min(self.cells.len() - 1);
        self.cells.drain(lo..=hi);
        true
    }

    /// Toggle `tag` on every cell in `[min(i, j), max(i, j)]`
    ///
    /// Returns false when the range starts in history.
    pub fn format_range(&mut self, i: usize, j: usize, tag: Tag) -> bool {
        let (lo, hi) = (i.min(j), i.max(j));
        if lo < self.boundary {
            debug!(lo, boundary = self.boundary, %tag, "format rejected");
            return false;
        }
        for cell in self.cells.iter_mut().skip(lo).take(hi - lo + 1) {
            cell.toggle(tag);
        }
        true
    }

    /// Append a run of cells after the current content
    ///
    /// A segment tagged `Prompt` becomes the new most recent prompt and moves
    /// the input boundary to its end.
    pub fn append_segment(&mut self, text: &str, tags: TagSet) {
        let start = self.cells.len();
        self.cells.extend(text.chars().map(|ch| Cell::tagged(ch, tags)));
        if tags.contains(Tag::Prompt) {
            self.prompt = text.to_string();
            self.prompt_start = start;
            self.boundary = self.cells.len();
        }
    }

    /// Append a rendered prompt
    pub fn append_prompt(&mut self, prompt: &str) {
        self.append_segment(prompt, Tag::Prompt.into());
    }

    /// Insert a run of cells right before the most recent prompt
    ///
    /// The prompt and the input boundary shift forward by the inserted length,
    /// which is returned.
    pub fn insert_before_prompt(&mut self, text: &str, tags: TagSet) -> usize {
        let at = self.prompt_start;
        let run: Vec<Cell> = text.chars().map(|ch| Cell::tagged(ch, tags)).collect();
        let inserted = run.len();
        self.cells.splice(at..at, run);
        self.prompt_start += inserted;
        self.boundary += inserted;
        inserted
    }

    /// Concatenate the characters from `index` to the end
    pub fn extract_from(&self, index: usize) -> String {
        self.cells.iter().skip(index).map(Cell::ch).collect()
    }

    /// The live input line
    pub fn input_text(&self) -> String {
        self.extract_from(self.boundary)
    }

    /// The full rendered text
    pub fn text(&self) -> String {
        self.extract_from(0)
    }

    /// Remove every cell from the input boundary to the end
    pub fn truncate_input(&mut self) {
        self.cells.truncate(self.boundary);
    }

    /// Position of the last occurrence of the current prompt text
    ///
    /// This is a plain substring search over the rendered characters; typed
    /// input that reproduces the prompt text will be found too. The boundary
    /// itself never relies on it.
    pub fn find_last_prompt_index(&self) -> Option<usize> {
        let needle: Vec<char> = self.prompt.chars().collect();
        if needle.is_empty() || needle.len() > self.cells.len() {
            return None;
        }
        (0..=self.cells.len() - needle.len()).rev().find(|&start| {
            self.cells[start..start + needle.len()]
                .iter()
                .zip(&needle)
                .all(|(cell, ch)| cell.ch() == *ch)
        })
    }

    /// Drop everything and render a single fresh prompt
    pub fn reset(&mut self, prompt: &str) {
        self.cells.clear();
        self.prompt_start = 0;
        self.boundary = 0;
        self.append_prompt(prompt);
    }
}
