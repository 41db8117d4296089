//! Help block extraction.
//!
//! A help block starts after a `help` line and runs for as long as lines
//! stay indented at least as deep as its first text line. That first line
//! fixes the indentation which is then stripped from every captured line.

use crate::lines::indent_of;

/// What a help block is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpOwner {
    /// Captured text goes to the current symbol.
    Symbol,
    /// Tracked for indentation only; choices are not symbols.
    Choice,
}

/// Result of feeding one line to a [`HelpBlock`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HelpLine {
    /// A line of help text with the block indentation removed.
    Text(String),
    /// Blank line before the first text line.
    Skip,
    /// The line is not part of the block; the caller must dispatch it.
    End,
}

/// State of an open help block.
#[derive(Debug, Clone)]
pub struct HelpBlock {
    owner: HelpOwner,
    indent: Option<usize>,
}

impl HelpBlock {
    /// A block whose indentation is not yet known.
    #[must_use]
    pub fn new(owner: HelpOwner) -> Self {
        Self {
            owner,
            indent: None,
        }
    }

    /// Where captured lines go.
    #[must_use]
    pub fn owner(&self) -> HelpOwner {
        self.owner
    }

    /// Classifies a tab-expanded, right-trimmed line.
    pub fn feed(&mut self, line: &str) -> HelpLine {
        if line.is_empty() {
            return match self.indent {
                Some(_) => HelpLine::Text(String::new()),
                None => HelpLine::Skip,
            };
        }

        let depth = indent_of(line);
        match self.indent {
            None if depth == 0 => HelpLine::End,
            None => {
                self.indent = Some(depth);
                HelpLine::Text(line[depth..].to_string())
            }
            Some(indent) if depth < indent => HelpLine::End,
            Some(indent) => HelpLine::Text(line[indent..].to_string()),
        }
    }
}

/// Removes trailing blank entries from captured help text.
pub fn trim_trailing_blanks(help: &mut Vec<String>) {
    while help.last().is_some_and(String::is_empty) {
        help.pop();
    }
}
