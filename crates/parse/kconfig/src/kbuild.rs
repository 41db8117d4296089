//! Mapping between config symbols and kbuild artifacts.
//!
//! Scans `Makefile` and `Kbuild` files for conditional object rules of the
//! form `obj-$(CONFIG_FOO) += foo.o bar/` and answers which artifacts a
//! symbol enables and which symbol enables a given module.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{KconfigError, Result};
use crate::lines::logical_lines;
use crate::query::strip_prefix;

/// File names that carry kbuild rules.
pub const BUILD_FILE_NAMES: [&str; 2] = ["Makefile", "Kbuild"];

static OBJ_RULE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*obj-\$\(CONFIG_([A-Za-z0-9_]+)\)\s*(?::=|\+=|=)\s*(.*)$").unwrap());

/// One `obj-$(CONFIG_X)` rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildRule {
    /// Symbol name without the `CONFIG_` prefix.
    pub symbol: String,
    /// Directory of the rule file relative to the source root (`""` at the
    /// top level).
    pub dir: String,
    /// Artifacts as written: object files (`foo.o`) or subdirectories
    /// (`foo/`).
    pub artifacts: Vec<String>,
}

impl BuildRule {
    /// Source-root relative target paths, with objects mapped to modules.
    pub fn targets(&self) -> impl Iterator<Item = String> + '_ {
        self.artifacts.iter().map(|artifact| {
            let target = module_name(artifact);
            if self.dir.is_empty() {
                target
            } else {
                format!("{}/{target}", self.dir)
            }
        })
    }
}

/// Maps an object file to its loadable module name (`foo.o` to `foo.ko`).
#[must_use]
pub fn module_name(artifact: &str) -> String {
    match artifact.strip_suffix(".o") {
        Some(stem) => format!("{stem}.ko"),
        None => artifact.to_string(),
    }
}

/// All conditional object rules of a source tree, in scan order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildRules {
    rules: Vec<BuildRule>,
}

impl BuildRules {
    /// Walks `source_root` and collects rules from every build file.
    ///
    /// Directories are visited in name order so lookups that return the
    /// first match are deterministic.
    ///
    /// # Errors
    ///
    /// Fails if the tree cannot be walked or a build file cannot be read.
    pub fn scan(source_root: &Path) -> Result<Self> {
        let mut rules = Self::default();
        let mut files = 0usize;
        for entry in WalkDir::new(source_root).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let is_build_file = entry
                .file_name()
                .to_str()
                .is_some_and(|name| BUILD_FILE_NAMES.contains(&name));
            if !is_build_file {
                continue;
            }

            let path = entry.path();
            let dir = path
                .parent()
                .and_then(|p| p.strip_prefix(source_root).ok())
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_default();
            let file = File::open(path).map_err(|e| KconfigError::io(path, e))?;
            rules
                .add_file(&dir, BufReader::new(file))
                .map_err(|e| KconfigError::io(path, e))?;
            files += 1;
        }
        debug!(files, rules = rules.rules.len(), "scanned build files");
        Ok(rules)
    }

    /// Adds the rules found in one build file located in `dir`.
    ///
    /// # Errors
    ///
    /// Propagates read errors from `reader`.
    pub fn add_file<R: BufRead>(&mut self, dir: &str, reader: R) -> io::Result<()> {
        for line in logical_lines(reader) {
            let line = line?;
            let Some(caps) = OBJ_RULE.captures(&line.text) else {
                continue;
            };
            let artifacts: Vec<String> = caps[2]
                .split_whitespace()
                .take_while(|word| !word.starts_with('#'))
                .map(str::to_string)
                .collect();
            if artifacts.is_empty() {
                continue;
            }
            self.rules.push(BuildRule {
                symbol: caps[1].to_string(),
                dir: dir.to_string(),
                artifacts,
            });
        }
        Ok(())
    }

    /// All rules, in scan order.
    #[must_use]
    pub fn rules(&self) -> &[BuildRule] {
        &self.rules
    }

    /// Target paths built when `name` (with or without `CONFIG_`) is enabled.
    #[must_use]
    pub fn symbol_to_artifacts(&self, name: &str) -> Vec<String> {
        let name = strip_prefix(name);
        self.rules
            .iter()
            .filter(|rule| rule.symbol == name)
            .flat_map(|rule| rule.targets())
            .collect()
    }

    /// The first symbol whose rule builds `object`.
    ///
    /// `object` may carry a directory, a `.o` or `.ko` suffix, and use
    /// either `_` or `-` as separator; module names reported by the kernel
    /// always use `_` while object file names often use `-`.
    #[must_use]
    pub fn artifact_to_symbol(&self, object: &str) -> Option<&str> {
        let base = object.rsplit('/').next().unwrap_or(object);
        let stem = base
            .strip_suffix(".ko")
            .or_else(|| base.strip_suffix(".o"))
            .unwrap_or(base);
        let spellings = [stem.to_string(), stem.replace('_', "-"), stem.replace('-', "_")];

        self.rules
            .iter()
            .find(|rule| {
                rule.artifacts.iter().any(|artifact| {
                    artifact
                        .strip_suffix(".o")
                        .is_some_and(|obj| spellings.iter().any(|s| s == obj))
                })
            })
            .map(|rule| rule.symbol.as_str())
    }
}
