//! Kconfig symbol indexer for kernel source trees.
//!
//! Parses a tree of Kconfig files into a [`SymbolTable`] recording, for
//! every `config` / `menuconfig` symbol, its help text, its `depends on`,
//! `select` and `imply` relations, its type and default lines, and the
//! if/menu/choice scopes it was declared under. Expressions are kept
//! verbatim; nothing is evaluated.
//!
//! [`BuildRules`] complements the table with the kbuild side: which objects
//! and modules a symbol enables and which symbol builds a given module.
//!
//! # Usage
//!
//! ```ignore
//! let options = ParseOptions::new("/usr/src/linux").arch("amd64");
//! let table = KconfigParser::new(options).parse("Kconfig")?;
//!
//! if let Some(net) = table.get("CONFIG_NET") {
//!     println!("NET depends on {:?}", net.depends_on);
//! }
//! for sym in table.search(RelationField::Select, &["CRC32"]) {
//!     println!("{} selects CRC32", sym.name);
//! }
//! ```

pub mod arch;
pub mod context;
pub mod diagnostic;
pub mod directive;
pub mod error;
pub mod help;
pub mod kbuild;
pub mod lines;
pub mod options;
pub mod parser;
pub mod query;
pub mod symbol;
pub mod table;

pub use arch::ArchTable;
pub use diagnostic::{Diagnostic, DiagnosticKind, Severity};
pub use error::{KconfigError, Result};
pub use kbuild::{BuildRule, BuildRules};
pub use options::ParseOptions;
pub use parser::KconfigParser;
pub use query::{SYMBOL_PREFIX, WordMatcher, strip_prefix};
pub use symbol::{
    ChoiceScope, DefaultEntry, DefaultKind, MenuScope, RelationField, ScopeSnapshot, Symbol, TypeEntry, TypeKind,
};
pub use table::{SymbolTable, TableBuilder};

/// Parses the Kconfig tree rooted at `root` with `options`.
///
/// # Errors
///
/// See [`KconfigParser::parse`].
pub fn parse(options: ParseOptions, root: &str) -> Result<SymbolTable> {
    KconfigParser::new(options).parse(root)
}
