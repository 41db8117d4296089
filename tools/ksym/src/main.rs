//! Kconfig symbol indexer.
//!
//! Parses a kernel source tree's Kconfig files into a symbol table and
//! answers questions about it: what a symbol depends on, who selects it,
//! which modules it builds and which symbol builds a module.
//!
//! Pipeline: load settings → parse Kconfig tree (or scan kbuild files) →
//!           run query → print text or JSON.

mod cli;
mod config;
mod output;
mod verbose;

use std::io::Write;

use anyhow::{Context, Result, bail};
use clap::Parser;
use ksym_kconfig::{BuildRules, KconfigParser, RelationField, SymbolTable, strip_prefix};

use crate::config::Settings;
use crate::verbose::{PhaseTimer, Verbosity, status};

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    verbose::init(Verbosity::from_flags(cli.quiet, cli.verbose));
    let settings = Settings::load(&cli)?;
    let options = settings.parse_options();
    tracing::info!(
        source = %settings.source.display(),
        arch = %settings.arch,
        srcarch = options.srcarch(),
        root = %settings.kconfig,
        "settings loaded"
    );

    match cli.command {
        cli::Command::Dump(ref args) => cmd_dump(&settings, args),
        cli::Command::Show(ref args) => cmd_show(&cli, &settings, args),
        cli::Command::Search(ref args) => cmd_search(&cli, &settings, args),
        cli::Command::Objects(ref args) => cmd_objects(&cli, &settings, args),
        cli::Command::SymbolOf(ref args) => cmd_symbol_of(&cli, &settings, args),
        cli::Command::Diagnostics => cmd_diagnostics(&cli, &settings),
    }
}

// ===========================================================================
// Loading
// ===========================================================================

/// Parse the configured Kconfig tree.
fn load_table(settings: &Settings) -> Result<SymbolTable> {
    let _t = PhaseTimer::new("kconfig parse");
    let table = KconfigParser::new(settings.parse_options())
        .parse(&settings.kconfig)
        .with_context(|| format!("parsing {} under {}", settings.kconfig, settings.source.display()))?;
    tracing::info!(symbols = table.len(), files = table.files().len(), "parsed kconfig tree");
    Ok(table)
}

/// Scan the source tree for kbuild object rules.
fn load_rules(settings: &Settings) -> Result<BuildRules> {
    let _t = PhaseTimer::new("kbuild scan");
    let rules = BuildRules::scan(&settings.source)
        .with_context(|| format!("scanning build files under {}", settings.source.display()))?;
    tracing::info!(rules = rules.rules().len(), "scanned build files");
    Ok(rules)
}

/// Write `text` to stdout as-is.
fn emit(text: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(text.as_bytes()).context("writing to stdout")?;
    if !text.is_empty() && !text.ends_with('\n') {
        stdout.write_all(b"\n").context("writing to stdout")?;
    }
    Ok(())
}

// ===========================================================================
// Commands
// ===========================================================================

/// Write the whole table as JSON.
fn cmd_dump(settings: &Settings, args: &cli::DumpArgs) -> Result<()> {
    let table = load_table(settings)?;
    let json = output::to_json(&table)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, format!("{json}\n")).with_context(|| format!("writing {}", path.display()))?;
            status!("wrote {} symbols to {}", table.len(), path.display());
            Ok(())
        }
        None => emit(&json),
    }
}

fn cmd_show(cli: &cli::Cli, settings: &Settings, args: &cli::ShowArgs) -> Result<()> {
    let table = load_table(settings)?;
    let mut found = Vec::new();
    let mut missing = Vec::new();
    for name in &args.names {
        match table.get(name) {
            Some(symbol) => found.push(symbol),
            None => missing.push(name.as_str()),
        }
    }

    if cli.json {
        emit(&output::to_json(&found)?)?;
    } else {
        let blocks: Vec<String> = found.iter().map(|s| output::render_symbol(s)).collect();
        emit(&blocks.join("\n"))?;
    }

    if !missing.is_empty() {
        bail!("unknown symbol(s): {}", missing.join(", "));
    }
    Ok(())
}

fn cmd_search(cli: &cli::Cli, settings: &Settings, args: &cli::SearchArgs) -> Result<()> {
    let table = load_table(settings)?;
    let fields: Vec<RelationField> = if args.field.is_empty() {
        RelationField::ALL.to_vec()
    } else {
        args.field.iter().copied().map(RelationField::from).collect()
    };
    let values: Vec<&str> = args.values.iter().map(|v| strip_prefix(v)).collect();
    let hits = table.search_fields(&fields, &values);

    if cli.json {
        let names: Vec<&str> = hits.iter().map(|s| s.name.as_str()).collect();
        emit(&output::to_json(&names)?)
    } else {
        emit(&output::render_names(hits))
    }
}

fn cmd_objects(cli: &cli::Cli, settings: &Settings, args: &cli::ObjectsArgs) -> Result<()> {
    let rules = load_rules(settings)?;
    let targets = rules.symbol_to_artifacts(&args.name);
    if cli.json {
        emit(&output::to_json(&targets)?)
    } else {
        if targets.is_empty() {
            status!("no build rules mention {}", args.name);
        }
        emit(&targets.join("\n"))
    }
}

fn cmd_symbol_of(cli: &cli::Cli, settings: &Settings, args: &cli::SymbolOfArgs) -> Result<()> {
    let rules = load_rules(settings)?;
    let Some(symbol) = rules.artifact_to_symbol(&args.object) else {
        bail!("no build rule produces {}", args.object);
    };
    if cli.json {
        emit(&output::to_json(symbol)?)
    } else {
        emit(symbol)
    }
}

fn cmd_diagnostics(cli: &cli::Cli, settings: &Settings) -> Result<()> {
    let table = load_table(settings)?;
    if cli.json {
        return emit(&output::to_json(table.diagnostics())?);
    }
    let lines: Vec<String> = table.diagnostics().iter().map(ToString::to_string).collect();
    emit(&lines.join("\n"))
}
