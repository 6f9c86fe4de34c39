//! Console cell representation
//!
//! Each cell holds exactly one character plus the role/format tags the
//! renderer uses to style it. Cells have no identity of their own; a cell is
//! addressed by its position in the buffer.

use std::fmt;

/// Role and format tags a cell can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Part of a rendered prompt
    Prompt,
    /// Bold text, toggled by the user
    Bold,
    /// Text produced by a command
    Output,
}

impl Tag {
    fn bit(self) -> u8 {
        match self {
            Tag::Prompt => 1 << 0,
            Tag::Bold => 1 << 1,
            Tag::Output => 1 << 2,
        }
    }

    /// Every tag, in display order
    pub fn all() -> [Tag; 3] {
        [Tag::Prompt, Tag::Bold, Tag::Output]
    }

    pub fn name(self) -> &'static str {
        match self {
            Tag::Prompt => "prompt",
            Tag::Bold => "bold",
            Tag::Output => "output",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A small set of tags stored as bits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct TagSet(u8);

impl TagSet {
    pub const EMPTY: TagSet = TagSet(0);

    pub fn new() -> Self {
        Self::EMPTY
    }

    pub fn with(mut self, tag: Tag) -> Self {
        self.insert(tag);
        self
    }

    pub fn contains(&self, tag: Tag) -> bool {
        self.0 & tag.bit() != 0
    }

    pub fn insert(&mut self, tag: Tag) {
        self.0 |= tag.bit();
    }

    pub fn remove(&mut self, tag: Tag) {
        self.0 &= !tag.bit();
    }

    pub fn toggle(&mut self, tag: Tag) {
        self.0 ^= tag.bit();
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Tag> + '_ {
        Tag::all().into_iter().filter(move |tag| self.contains(*tag))
    }
}

impl From<Tag> for TagSet {
    fn from(tag: Tag) -> Self {
        TagSet::EMPTY.with(tag)
    }
}

/// A single character cell of the console buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    ch: char,
    tags: TagSet,
}

impl Cell {
    /// Create an untagged cell
    pub fn new(ch: char) -> Self {
        Self {
            ch,
            tags: TagSet::EMPTY,
        }
    }

    /// Create a cell carrying the given tags
    pub fn tagged(ch: char, tags: TagSet) -> Self {
        Self { ch, tags }
    }

    pub fn ch(&self) -> char {
        self.ch
    }

    pub fn tags(&self) -> TagSet {
        self.tags
    }

    pub fn has(&self, tag: Tag) -> bool {
        self.tags.contains(tag)
    }

    /// Flip a tag on this cell
    pub fn toggle(&mut self, tag: Tag) {
        self.tags.toggle(tag);
    }
}
