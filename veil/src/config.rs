//! Runtime configuration, merged from the optional config file and the
//! command line.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::Cli;

const CONFIG_FILE: &str = "veil.toml";

/// The on-disk half of the configuration, read from
/// `$XDG_CONFIG_HOME/veil/veil.toml` when present.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Path of a file holding rule text.
    pub rules_file: Option<PathBuf>,
    /// Inline rule text; takes precedence over `rules_file`.
    pub rules: Option<String>,
    /// Keep running and watch window events after the initial sweep.
    pub monitor: bool,
}

/// The resolved configuration the rest of the program runs on.
#[derive(Debug)]
pub struct Config {
    pub rules_text: String,
    pub monitor: bool,
}

impl veil_core::Config for Config {
    fn rules_text(&self) -> &str {
        &self.rules_text
    }
}

/// Resolves the configuration. Command-line flags win over the config
/// file, and inline rule text wins over a rules file.
pub fn load(cli: &Cli) -> Result<Config> {
    let file_config = match find_config_file() {
        Some(path) => parse_config_file(&path)?,
        None => FileConfig::default(),
    };

    let rules_text = resolve_rules_text(cli, &file_config)?;
    Ok(Config {
        rules_text,
        monitor: cli.monitor || file_config.monitor,
    })
}

fn find_config_file() -> Option<PathBuf> {
    let base = xdg::BaseDirectories::with_prefix("veil").ok()?;
    base.find_config_file(CONFIG_FILE)
}

fn parse_config_file(path: &Path) -> Result<FileConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("couldn't read config file {}", path.display()))?;
    toml::from_str(&contents)
        .with_context(|| format!("couldn't parse config file {}", path.display()))
}

fn resolve_rules_text(cli: &Cli, file_config: &FileConfig) -> Result<String> {
    if let Some(rule) = &cli.rule {
        return Ok(rule.clone());
    }
    if let Some(path) = &cli.rules_file {
        return read_rules_file(path);
    }
    if let Some(rule) = &file_config.rules {
        return Ok(rule.clone());
    }
    if let Some(path) = &file_config.rules_file {
        return read_rules_file(path);
    }
    bail!(
        "no rules configured; pass --rule or --file, or set `rules`/`rules_file` in {CONFIG_FILE}"
    );
}

fn read_rules_file(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .with_context(|| format!("couldn't read rules file {}", path.display()))
}
