//! Tool configuration: `ksym.toml` merged with command-line flags.
//!
//! Every key is optional. Flags given on the command line win over the
//! file, and the file wins over built-in defaults.
//!
//! ```toml
//! source = "/usr/src/linux"
//! arch = "amd64"
//! kconfig = "Kconfig"
//! strict = false
//!
//! [arch-map]
//! riscv64 = "riscv"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ksym_kconfig::{ArchTable, ParseOptions};
use serde::Deserialize;

use crate::cli::Cli;

/// File looked up in the current directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "ksym.toml";

/// Contents of a `ksym.toml` file.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub source: Option<PathBuf>,
    pub arch: Option<String>,
    pub kconfig: Option<String>,
    pub strict: Option<bool>,
    /// Extra architecture to source-architecture entries.
    #[serde(default)]
    pub arch_map: BTreeMap<String, String>,
}

/// Read a config file from disk.
///
/// A missing file is only an error when it was named explicitly.
pub fn read_config_file(path: &Path, explicit: bool) -> Result<FileConfig> {
    if !explicit && !path.exists() {
        return Ok(FileConfig::default());
    }
    let content = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let config: FileConfig = toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
    Ok(config)
}

/// Fully resolved settings for one invocation.
#[derive(Debug)]
pub struct Settings {
    pub source: PathBuf,
    pub arch: String,
    pub kconfig: String,
    pub strict: bool,
    pub arch_table: ArchTable,
}

impl Settings {
    /// Merge command-line flags over `file`.
    pub fn merge(cli: &Cli, file: FileConfig) -> Self {
        let mut arch_table = ArchTable::default();
        for (arch, srcarch) in file.arch_map {
            arch_table.insert(arch, srcarch);
        }
        Self {
            source: cli.source.clone().or(file.source).unwrap_or_else(|| PathBuf::from(".")),
            arch: cli.arch.clone().or(file.arch).unwrap_or_else(|| "x86".to_string()),
            kconfig: cli.kconfig.clone().or(file.kconfig).unwrap_or_else(|| "Kconfig".to_string()),
            strict: cli.strict || file.strict.unwrap_or(false),
            arch_table,
        }
    }

    /// Load settings for `cli`, reading its config file if there is one.
    pub fn load(cli: &Cli) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => read_config_file(path, true)?,
            None => read_config_file(Path::new(DEFAULT_CONFIG_FILE), false)?,
        };
        Ok(Self::merge(cli, file))
    }

    /// Parser options for these settings.
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions::new(&self.source)
            .arch(&self.arch)
            .arch_table(self.arch_table.clone())
            .strict_balance(self.strict)
    }
}
