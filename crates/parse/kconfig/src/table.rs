//! Symbol table construction.
//!
//! [`TableBuilder`] owns the symbols while parsing is in progress and tracks
//! the "current symbol": the most recent `config` whose property lines are
//! still being read. Every append is a no-op while no symbol is current.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::context::ContextStack;
use crate::diagnostic::Diagnostic;
use crate::help::trim_trailing_blanks;
use crate::symbol::{DefaultEntry, DefaultKind, Symbol, TypeEntry, TypeKind};

/// Mutable symbol map used during a parse.
#[derive(Debug, Default)]
pub struct TableBuilder {
    symbols: BTreeMap<String, Symbol>,
    current: Option<String>,
}

impl TableBuilder {
    /// An empty builder with no current symbol.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a declaration of `name` in `file` and makes it current.
    ///
    /// The first declaration creates the symbol with a snapshot of `scopes`;
    /// later ones only append to `declaring_files`.
    pub fn declare(&mut self, name: &str, file: &str, scopes: &ContextStack) {
        self.symbols
            .entry(name.to_string())
            .or_insert_with(|| Symbol::new(name, scopes.snapshot()))
            .declaring_files
            .push(file.to_string());
        self.current = Some(name.to_string());
    }

    /// Ends the current symbol's scope.
    pub fn close(&mut self) {
        self.current = None;
    }

    /// Name of the current symbol.
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Number of symbols declared so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// `true` before the first declaration.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Looks up a symbol declared so far.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    fn with_current(&mut self, f: impl FnOnce(&mut Symbol)) -> bool {
        let Some(name) = self.current.as_deref() else {
            return false;
        };
        match self.symbols.get_mut(name) {
            Some(symbol) => {
                f(symbol);
                true
            }
            None => false,
        }
    }

    /// Flags the current symbol as declared by `menuconfig`.
    pub fn mark_menuconfig(&mut self) -> bool {
        self.with_current(|s| s.menuconfig = true)
    }

    /// Appends one de-indented help line. Returns `false` when no symbol is
    /// current; the other `append_*` methods behave the same way.
    pub fn append_help(&mut self, line: String) -> bool {
        self.with_current(|s| s.help.push(line))
    }

    /// Drops blank help lines captured at the end of a help block.
    pub fn trim_help(&mut self) -> bool {
        self.with_current(|s| trim_trailing_blanks(&mut s.help))
    }

    /// Appends a `depends on` expression.
    pub fn append_depends_on(&mut self, expr: &str) -> bool {
        self.with_current(|s| s.depends_on.push(expr.to_string()))
    }

    /// Appends a `select` expression.
    pub fn append_select(&mut self, expr: &str) -> bool {
        self.with_current(|s| s.select.push(expr.to_string()))
    }

    /// Appends a type line; `rest` is the verbatim text after the keyword.
    pub fn append_type(&mut self, kind: TypeKind, rest: Option<&str>) -> bool {
        self.with_current(|s| {
            s.type_entries.push(TypeEntry {
                kind,
                rest: rest.map(str::to_string),
            });
        })
    }

    /// Appends a `default` / `def_bool` / `def_tristate` line.
    pub fn append_default(&mut self, kind: DefaultKind, expr: &str) -> bool {
        self.with_current(|s| {
            s.default_entries.push(DefaultEntry {
                kind,
                expr: expr.to_string(),
            });
        })
    }

    /// Appends a `range` expression.
    pub fn append_range(&mut self, expr: &str) -> bool {
        self.with_current(|s| s.range.push(expr.to_string()))
    }

    /// Appends an `option` line.
    pub fn append_option(&mut self, expr: &str) -> bool {
        self.with_current(|s| s.option.push(expr.to_string()))
    }

    /// Appends an `imply` expression.
    pub fn append_imply(&mut self, expr: &str) -> bool {
        self.with_current(|s| s.imply.push(expr.to_string()))
    }

    /// Appends a `prompt` line verbatim.
    pub fn append_prompt(&mut self, text: &str) -> bool {
        self.with_current(|s| s.prompt.push(text.to_string()))
    }

    /// Freezes the builder into a read-only [`SymbolTable`].
    #[must_use]
    pub fn finish(self, files: Vec<String>, diagnostics: Vec<Diagnostic>) -> SymbolTable {
        SymbolTable {
            symbols: self.symbols,
            files,
            diagnostics,
        }
    }
}

/// The finished, read-only result of a parse.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SymbolTable {
    pub(crate) symbols: BTreeMap<String, Symbol>,
    files: Vec<String>,
    diagnostics: Vec<Diagnostic>,
}

impl SymbolTable {
    /// Number of symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// `true` if no symbol was declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Symbols in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.values()
    }

    /// Every Kconfig file parsed, in visit order.
    #[must_use]
    pub fn files(&self) -> &[String] {
        &self.files
    }

    /// Non-fatal findings, in the order they were encountered.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}
