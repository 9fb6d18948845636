// LogLens - GPL-3.0-or-later
// This file is part of LogLens.
//
// Copyright (C) 2026 Daniel Freiermuth
//
// LogLens is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// LogLens is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with LogLens.  If not, see <https://www.gnu.org/licenses/>.

use crate::core::chunked::DEFAULT_PAGE_SIZE;
use crate::parser::permissions::{DEFAULT_MAX_LINE_GAP, DEFAULT_MAX_TIME_GAP_MS};
use crate::parser::system_info::DEFAULT_WINDOW;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Encoding the trading terminal writes its logs in
pub const DEFAULT_ENCODING: &str = "big5";

/// User configuration stored in the config directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// WHATWG label of the encoding used to decode log files
    pub encoding: String,
    /// Reject files containing byte sequences invalid in `encoding`
    /// instead of replacing them with U+FFFD
    pub strict_decoding: bool,
    /// Lines per page in the text view
    pub page_size: usize,
    /// Timestamped lines searched backwards from each system-info anchor
    pub system_info_window: usize,
    /// Permission group line distance (exclusive)
    pub permission_max_line_gap: usize,
    /// Permission group time distance in milliseconds (inclusive)
    pub permission_max_time_gap_ms: u32,
    /// Run the extraction passes on the rayon pool
    pub parallel: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            encoding: DEFAULT_ENCODING.to_string(),
            strict_decoding: false,
            page_size: DEFAULT_PAGE_SIZE,
            system_info_window: DEFAULT_WINDOW,
            permission_max_line_gap: DEFAULT_MAX_LINE_GAP,
            permission_max_time_gap_ms: DEFAULT_MAX_TIME_GAP_MS,
            parallel: true,
        }
    }
}

impl AnalyzerConfig {
    /// Get the path to the user config file
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|config_dir| config_dir.join("loglens").join("config.json"))
    }

    /// Load the user config, returning defaults if it is missing or unreadable
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            tracing::info!("No config directory available, using defaults");
            return Self::default();
        };
        if !path.exists() {
            tracing::info!("No config found at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring config {}: {e:#}", path.display());
                Self::default()
            }
        }
    }

    /// Load a config file from an explicit path
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        tracing::info!(
            "Loaded config from {} (encoding {}, page size {})",
            path.display(),
            config.encoding,
            config.page_size
        );
        Ok(config)
    }

    /// Save the config to the user config directory
    pub fn save(&self) -> anyhow::Result<()> {
        let path = Self::config_path().context("Could not determine config directory")?;
        self.save_to(&path)
    }

    /// Save the config to an explicit path, creating parent directories
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_take_defaults() {
        let config: AnalyzerConfig =
            serde_json::from_str(r#"{"page_size": 200}"#).expect("partial config parses");
        assert_eq!(config.page_size, 200);
        assert_eq!(config.encoding, "big5");
        assert_eq!(config.system_info_window, 50);
        assert_eq!(config.permission_max_line_gap, 10);
        assert_eq!(config.permission_max_time_gap_ms, 2000);
        assert!(config.parallel);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.json");
        let config = AnalyzerConfig {
            strict_decoding: true,
            page_size: 1000,
            ..AnalyzerConfig::default()
        };
        config.save_to(&path).expect("config saves");
        let loaded = AnalyzerConfig::load_from(&path).expect("config loads");
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_corrupt_config_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").expect("write");
        assert!(AnalyzerConfig::load_from(&path).is_err());
    }
}
