//! Command-line interface definitions for ksym.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use ksym_kconfig::RelationField;

/// Kconfig symbol indexer for kernel source trees.
#[derive(Parser)]
#[command(name = "ksym", version, about)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Kernel source root (overrides `source` in ksym.toml).
    #[arg(long, short = 's', global = true)]
    pub source: Option<PathBuf>,

    /// Architecture name, e.g. `amd64` or `x86` (default: x86).
    #[arg(long, short = 'a', global = true)]
    pub arch: Option<String>,

    /// Root Kconfig file, relative to the source root (default: Kconfig).
    #[arg(long, global = true)]
    pub kconfig: Option<String>,

    /// Configuration file (default: ksym.toml in the current directory, if present).
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Treat unbalanced `endif`/`endmenu`/`endchoice` as errors.
    #[arg(long, global = true)]
    pub strict: bool,

    /// Print results as JSON.
    #[arg(long, global = true)]
    pub json: bool,

    /// Only print errors and results.
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Enable verbose output with parse diagnostics and timings.
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Parse the tree and write the whole symbol table as JSON.
    Dump(DumpArgs),
    /// Show one or more symbols.
    Show(ShowArgs),
    /// Find symbols whose relations mention any of the given names.
    Search(SearchArgs),
    /// List the kbuild artifacts a symbol enables.
    Objects(ObjectsArgs),
    /// Find the symbol that builds an object or module.
    SymbolOf(SymbolOfArgs),
    /// List warnings and other findings from parsing.
    Diagnostics,
}

/// Arguments for the `dump` subcommand.
#[derive(Parser)]
pub struct DumpArgs {
    /// Output file (default: stdout).
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `show` subcommand.
#[derive(Parser)]
pub struct ShowArgs {
    /// Symbol names, with or without the `CONFIG_` prefix.
    #[arg(required = true)]
    pub names: Vec<String>,
}

/// Arguments for the `search` subcommand.
#[derive(Parser)]
pub struct SearchArgs {
    /// Relation to search; repeat for several (default: all).
    #[arg(long, short = 'f', value_enum)]
    pub field: Vec<FieldArg>,

    /// Names or expressions to look for as whole words.
    #[arg(required = true)]
    pub values: Vec<String>,
}

/// Arguments for the `objects` subcommand.
#[derive(Parser)]
pub struct ObjectsArgs {
    /// Symbol name, with or without the `CONFIG_` prefix.
    pub name: String,
}

/// Arguments for the `symbol-of` subcommand.
#[derive(Parser)]
pub struct SymbolOfArgs {
    /// Object or module, e.g. `e1000`, `e1000.ko` or `drivers/net/dummy.o`.
    pub object: String,
}

/// Relation names accepted by `search --field`.
#[derive(Clone, Copy, ValueEnum)]
pub enum FieldArg {
    /// `depends on` lines.
    DependsOn,
    /// `select` lines.
    Select,
    /// `imply` lines.
    Imply,
}

impl From<FieldArg> for RelationField {
    fn from(arg: FieldArg) -> Self {
        match arg {
            FieldArg::DependsOn => RelationField::DependsOn,
            FieldArg::Select => RelationField::Select,
            FieldArg::Imply => RelationField::Imply,
        }
    }
}
