//! Human-readable and JSON rendering of query results.

use std::fmt::Write as _;

use anyhow::{Context, Result};
use ksym_kconfig::Symbol;
use serde::Serialize;

/// Serialize `value` as pretty-printed JSON.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("serializing JSON output")
}

fn list(out: &mut String, label: &str, entries: &[String]) {
    for entry in entries {
        let _ = writeln!(out, "  {label:<12} {entry}");
    }
}

/// Render one symbol as an indented text block.
pub fn render_symbol(symbol: &Symbol) -> String {
    let mut out = String::new();
    if symbol.menuconfig {
        let _ = writeln!(out, "{} (menuconfig)", symbol.name);
    } else {
        let _ = writeln!(out, "{}", symbol.name);
    }
    let _ = writeln!(out, "  {:<12} {}", "declared in", symbol.declaring_files.join(", "));

    for entry in &symbol.type_entries {
        match &entry.rest {
            Some(rest) => {
                let _ = writeln!(out, "  {:<12} {} {rest}", "type", entry.kind);
            }
            None => {
                let _ = writeln!(out, "  {:<12} {}", "type", entry.kind);
            }
        }
    }
    list(&mut out, "prompt", &symbol.prompt);
    for entry in &symbol.default_entries {
        let _ = writeln!(out, "  {:<12} {}", entry.kind, entry.expr);
    }
    list(&mut out, "depends on", &symbol.depends_on);
    list(&mut out, "select", &symbol.select);
    list(&mut out, "imply", &symbol.imply);
    list(&mut out, "range", &symbol.range);
    list(&mut out, "option", &symbol.option);
    list(&mut out, "if", symbol.if_context());

    if !symbol.menu_context().is_empty() {
        let path: Vec<&str> = symbol.menu_context().iter().map(|m| m.title.as_str()).collect();
        let _ = writeln!(out, "  {:<12} {}", "menu", path.join(" > "));
    }
    for choice in symbol.choice_context() {
        let label = choice.name.as_deref().unwrap_or(&choice.prompt);
        let _ = writeln!(out, "  {:<12} {label}", "choice");
    }

    if !symbol.help.is_empty() {
        let _ = writeln!(out, "  help");
        for line in &symbol.help {
            if line.is_empty() {
                out.push('\n');
            } else {
                let _ = writeln!(out, "    {line}");
            }
        }
    }
    out
}

/// Render symbol names, one per line.
pub fn render_names<'a>(symbols: impl IntoIterator<Item = &'a Symbol>) -> String {
    symbols.into_iter().fold(String::new(), |mut out, symbol| {
        let _ = writeln!(out, "{}", symbol.name);
        out
    })
}
