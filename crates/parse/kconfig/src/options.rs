//! Parser configuration.

use std::path::{Path, PathBuf};

use crate::arch::ArchTable;

/// Settings for one parse of a Kconfig tree.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Kernel source root; `source` paths are resolved against it.
    pub source_root: PathBuf,
    /// Package architecture (`amd64`, `arm64`, ...) used for `$(SRCARCH)`.
    pub arch: String,
    /// Architecture name mapping.
    pub arch_table: ArchTable,
    /// Treat unbalanced `endif` / `endmenu` / `endchoice` as fatal.
    pub strict_balance: bool,
}

impl ParseOptions {
    /// Options for `source_root` with architecture `x86` and lenient
    /// balance checking.
    pub fn new(source_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            arch: "x86".to_string(),
            arch_table: ArchTable::default(),
            strict_balance: false,
        }
    }

    /// Sets the package architecture.
    #[must_use]
    pub fn arch(mut self, arch: impl Into<String>) -> Self {
        self.arch = arch.into();
        self
    }

    /// Replaces the architecture table.
    #[must_use]
    pub fn arch_table(mut self, table: ArchTable) -> Self {
        self.arch_table = table;
        self
    }

    /// Makes unbalanced scope closers fatal.
    #[must_use]
    pub fn strict_balance(mut self, strict: bool) -> Self {
        self.strict_balance = strict;
        self
    }

    /// Source root this parse resolves paths against.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.source_root
    }

    /// The `arch/` directory name for the configured architecture.
    #[must_use]
    pub fn srcarch(&self) -> &str {
        self.arch_table.srcarch(&self.arch)
    }
}
