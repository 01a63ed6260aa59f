// Author: kelexine (https://github.com/kelexine)
// config/mod.rs — Global configuration loader

use std::path::{Path, PathBuf};

use colored::Colorize;
use serde::Deserialize;

use crate::locator::DeclarationRules;

/// Represents the structure of the global `config.toml`.
#[derive(Deserialize, Default, Debug, Clone)]
pub struct GlobalConfig {
    /// Extra declaration markers for the locator (replaces the default list).
    pub type_markers: Option<Vec<String>>,
    pub output_dir: Option<PathBuf>,
    pub no_parallel: Option<bool>,
}

impl GlobalConfig {
    /// Attempt to load the global configuration, returning a default instance if it fails or missing.
    pub fn load() -> Self {
        match dirs::config_dir() {
            Some(mut path) => {
                path.push("fixmine");
                path.push("config.toml");
                Self::load_from(&path)
            }
            None => Self::default(),
        }
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!(
                        "{} Failed to parse {}: {}",
                        "[WARNING]".yellow(),
                        path.display(),
                        e
                    );
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!(
                    "{} Failed to read {}: {}",
                    "[WARNING]".yellow(),
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Locator rules: CLI markers win, then the config file, then the defaults.
    pub fn rules(&self, cli_markers: &[String]) -> DeclarationRules {
        if !cli_markers.is_empty() {
            DeclarationRules::new(cli_markers.iter().cloned())
        } else if let Some(ref markers) = self.type_markers {
            DeclarationRules::new(markers.iter().cloned())
        } else {
            DeclarationRules::default()
        }
    }
}
