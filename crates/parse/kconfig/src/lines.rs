//! Physical to logical line reassembly.
//!
//! Kconfig and Makefile syntax both allow a trailing `\` to continue a
//! statement on the next line. [`LogicalLines`] joins such lines, strips
//! trailing whitespace and expands tabs so that later stages can measure
//! indentation in plain columns.

use std::io::{self, BufRead};

/// Tab stop width used when expanding tabs.
pub const TAB_WIDTH: usize = 8;

/// A reassembled line together with the physical line it started on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalLine {
    /// 1-based physical line number of the first joined line.
    pub number: usize,
    /// Line text with continuations joined and tabs expanded.
    pub text: String,
}

/// Lazy iterator of logical lines over raw physical lines.
pub struct LogicalLines<I> {
    inner: I,
    physical: usize,
    pending: Option<(usize, String)>,
}

impl<I> LogicalLines<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    /// Wraps an iterator of physical lines (without line terminators).
    pub fn new(inner: I) -> Self {
        Self {
            inner,
            physical: 0,
            pending: None,
        }
    }
}

impl<I> Iterator for LogicalLines<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    type Item = io::Result<LogicalLine>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let raw = match self.inner.next() {
                Some(Ok(raw)) => raw,
                Some(Err(e)) => return Some(Err(e)),
                // A dangling continuation at end of input is kept as-is.
                None => {
                    return self.pending.take().map(|(number, text)| {
                        Ok(LogicalLine {
                            number,
                            text: expand_tabs(&text),
                        })
                    });
                }
            };
            self.physical += 1;

            let line = raw.trim_end();
            let (number, joined) = match self.pending.take() {
                Some((number, prev)) if prev.is_empty() => (number, line.to_string()),
                Some((number, prev)) => {
                    let joined = format!("{prev} {}", line.trim_start());
                    (number, joined.trim_end().to_string())
                }
                None => (self.physical, line.to_string()),
            };

            if let Some(body) = joined.strip_suffix('\\') {
                self.pending = Some((number, body.trim_end().to_string()));
                continue;
            }

            return Some(Ok(LogicalLine {
                number,
                text: expand_tabs(&joined),
            }));
        }
    }
}

/// Returns logical lines read lazily from `reader`.
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected; kernel
/// trees occasionally carry Latin-1 author names in help text.
pub fn logical_lines<R: BufRead>(reader: R) -> LogicalLines<impl Iterator<Item = io::Result<String>>> {
    LogicalLines::new(
        reader
            .split(b'\n')
            .map(|chunk| chunk.map(|bytes| String::from_utf8_lossy(&bytes).into_owned())),
    )
}

/// Expands tabs to [`TAB_WIDTH`]-column tab stops.
#[must_use]
pub fn expand_tabs(line: &str) -> String {
    if !line.contains('\t') {
        return line.to_string();
    }
    let mut out = String::with_capacity(line.len() + TAB_WIDTH);
    let mut col = 0usize;
    for ch in line.chars() {
        if ch == '\t' {
            let pad = TAB_WIDTH - col % TAB_WIDTH;
            out.extend(std::iter::repeat_n(' ', pad));
            col += pad;
        } else {
            out.push(ch);
            col += 1;
        }
    }
    out
}

/// Number of leading space columns in an already tab-expanded line.
#[must_use]
pub fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}
