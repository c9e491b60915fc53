// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier
// Modifications (c) 2026 Peter Carlton

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    aligner::AlignerKind,
    colors::{ColorError, Palettes},
    render::RenderOptions,
};

pub const CONFIG_DIR: &str = "seqviewer";
pub const CONFIG_FILE: &str = "config.json";
pub const LOCAL_CONFIG_FILE: &str = ".seqviewer.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("Malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub bin_dir: Option<PathBuf>,
    pub clustalw: Option<PathBuf>,
    pub muscle: Option<PathBuf>,
    // Also look for tools in $PATH
    pub search_path: bool,
    pub aligner: AlignerKind,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        ToolsConfig {
            bin_dir: None,
            clustalw: None,
            muscle: None,
            search_path: true,
            aligner: AlignerKind::default(),
        }
    }
}

/// Startup configuration. Every section is optional; missing keys take their default values.
///
/// ```json
/// {
///   "tools": { "bin_dir": "/opt/bio/bin", "aligner": "muscle" },
///   "display": { "chunk_width": 80, "mode": "diff", "palette": "Set3" },
///   "palettes": { "mine": ["#1b9e77", "#d95f02", "#7570b3"] }
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tools: ToolsConfig,
    pub display: RenderOptions,
    // User palettes, as lists of hex colours
    pub palettes: BTreeMap<String, Vec<String>>,
}

impl Config {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Config::from_json_str(&text)
    }

    /// Reads `explicit` if given, else the first config file found, else returns the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(p) => Some(p.to_path_buf()),
            None => find_config_file(),
        };
        match path {
            Some(p) => {
                info!("Reading configuration from {}", p.display());
                Config::from_file(&p)
            }
            None => {
                debug!("No configuration file, using defaults");
                Ok(Config::default())
            }
        }
    }

    pub fn palettes(&self) -> Result<Palettes, ColorError> {
        Palettes::with_user(&self.palettes)
    }
}

pub fn find_config_file() -> Option<PathBuf> {
    if let Ok(home) = std::env::var("HOME") {
        let path = PathBuf::from(home)
            .join(".config")
            .join(CONFIG_DIR)
            .join(CONFIG_FILE);
        if path.exists() {
            return Some(path);
        }
    }
    if let Ok(cwd) = std::env::current_dir() {
        let path = cwd.join(LOCAL_CONFIG_FILE);
        if path.exists() {
            return Some(path);
        }
    }
    None
}
