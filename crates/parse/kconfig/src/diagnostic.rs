//! Non-fatal findings recorded while parsing.

use std::fmt;

use serde::Serialize;

/// How serious a [`Diagnostic`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Expected for constructs outside the indexed subset.
    Debug,
    /// Malformed input that was skipped over.
    Warning,
}

/// What a [`Diagnostic`] is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A line that matched no directive.
    Ignored,
    /// A property line with no open symbol, menu or choice to receive it.
    NoOpenDeclaration,
    /// A `source` line with leading whitespace.
    IndentedSource,
    /// `endif`, `endmenu` or `endchoice` with nothing to close.
    Unbalanced,
    /// Scopes still open when parsing finished.
    Unclosed,
    /// An `osource` / `orsource` target that does not exist.
    MissingOptionalSource,
}

/// A non-fatal finding tied to a source location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// How serious the finding is.
    pub severity: Severity,
    /// What the finding is about.
    pub kind: DiagnosticKind,
    /// File identifier as recorded in the symbol table.
    pub file: String,
    /// Physical line number, when the finding belongs to a line.
    pub line: Option<usize>,
    /// Human-readable description.
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Debug => "debug",
            Severity::Warning => "warning",
        };
        match self.line {
            Some(line) => write!(f, "{level}: {}:{line}: {}", self.file, self.message),
            None => write!(f, "{level}: {}: {}", self.file, self.message),
        }
    }
}
