//! Command History Module
//!
//! Append-only log of submitted input lines with up/down navigation.
//! The log is independent of the rendered buffer: clearing the screen keeps it.

/// Navigation position within the history log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Browse {
    /// Editing the live line, not browsing
    #[default]
    Live,
    /// Showing the entry at this index
    At(usize),
}

/// Command history with navigation state
#[derive(Debug, Clone, Default)]
pub struct CommandHistory {
    entries: Vec<String>,
    position: Browse,
}

impl CommandHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a submitted line
    ///
    /// Blank lines are ignored. The stored text is trimmed. Navigation always
    /// returns to the live line. Returns whether the line was recorded.
    pub fn push(&mut self, line: &str) -> bool {
        self.position = Browse::Live;
        let line = line.trim();
        if line.is_empty() {
            return false;
        }
        self.entries.push(line.to_string());
        true
    }

    /// Step to an older entry (up arrow)
    ///
    /// Starts from the newest entry when not browsing and stays on the oldest
    /// entry once reached. `None` means there is nothing to navigate.
    pub fn older(&mut self) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        let idx = match self.position {
            Browse::Live => self.entries.len() - 1,
            Browse::At(idx) => idx.saturating_sub(1),
        };
        self.position = Browse::At(idx);
        Some(&self.entries[idx])
    }

    /// Step to a newer entry (down arrow)
    ///
    /// Moving past the newest entry leaves browsing and yields an empty line.
    /// `None` means nothing changes: the log is empty or we are not browsing.
    pub fn newer(&mut self) -> Option<&str> {
        match self.position {
            Browse::Live => None,
            Browse::At(idx) if idx + 1 < self.entries.len() => {
                self.position = Browse::At(idx + 1);
                Some(&self.entries[idx + 1])
            }
            Browse::At(_) => {
                self.position = Browse::Live;
                Some("")
            }
        }
    }

    pub fn position(&self) -> Browse {
        self.position
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn last(&self) -> Option<&str> {
        self.entries.last().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries containing `pattern` (case-insensitive), most recent first
    pub fn search(&self, pattern: &str) -> Vec<&str> {
        let pattern = pattern.to_lowercase();
        self.entries
            .iter()
            .rev()
            .filter(|entry| entry.to_lowercase().contains(&pattern))
            .map(String::as_str)
            .collect()
    }

    /// Numbered listing for display, most recent first
    pub fn summary(&self, pattern: Option<&str>) -> String {
        let entries: Vec<&str> = match pattern {
            Some(pattern) => self.search(pattern),
            None => self.entries.iter().rev().map(String::as_str).collect(),
        };

        if entries.is_empty() {
            return match pattern {
                Some(pattern) => format!("No commands matching '{}'.", pattern),
                None => "No commands in history yet.".to_string(),
            };
        }

        entries
            .iter()
            .enumerate()
            .map(|(i, entry)| format!("{:2}. {}", i + 1, entry))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
