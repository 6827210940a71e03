//! User configuration of the scanner, persisted as a JSON document.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::GameScannerError;

const COMPONENT: &str = "Settings";

pub const DEFAULT_SCAN_DEPTH: usize = 3;
pub const DEFAULT_ICON_EXTRACTION_TIMEOUT_SECS: u64 = 15;

/// Settings consumed by the scanner and the host application
///
/// Every field falls back to its default when missing, so partial documents (e.g. written by an
/// older version) load without losing the values they do contain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Scan roots added by the user, on top of the built-in ones
    pub custom_game_paths: Vec<PathBuf>,
    /// How many directory levels below a root are read
    pub scan_depth: usize,
    /// Only used by the host application
    pub auto_scan: bool,
    /// Only used by the host application
    pub show_hidden_games: bool,
    /// Where extracted icons are written, see [`crate::icons::default_icon_cache_dir`] if unset
    pub icon_cache_dir: Option<PathBuf>,
    pub icon_extraction_timeout_secs: u64,
    /// Return extracted icons as `data:` URIs instead of file paths
    pub embed_extracted_icons: bool,
    /// Program and arguments of a custom icon extractor. `{exe}` and `{output}` are replaced by
    /// the path of the executable and of the image to write.
    pub icon_extractor_command: Option<Vec<String>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            custom_game_paths: Vec::new(),
            scan_depth: DEFAULT_SCAN_DEPTH,
            auto_scan: true,
            show_hidden_games: false,
            icon_cache_dir: None,
            icon_extraction_timeout_secs: DEFAULT_ICON_EXTRACTION_TIMEOUT_SECS,
            embed_extracted_icons: false,
            icon_extractor_command: None,
        }
    }
}

impl Settings {
    /// `<config dir>/lib_game_scanner/settings.json`
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(env::temp_dir)
            .join("lib_game_scanner")
            .join("settings.json")
    }

    /// Reads the settings at `path`. A missing or unreadable document gives the defaults.
    #[tracing::instrument(level = "trace")]
    pub fn load(path: &Path) -> Self {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                debug!("{COMPONENT} - Using defaults, could not read {path:?}: {e}");
                return Self::default();
            }
        };

        serde_json::from_str(&contents).unwrap_or_else(|e| {
            warn!("{COMPONENT} - Using defaults, could not parse {path:?}: {e}");
            Self::default()
        })
    }

    /// Writes the settings to `path` as pretty-printed JSON, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), GameScannerError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;

        debug!("{COMPONENT} - Saved to {path:?}");
        Ok(())
    }

    /// Returns `false` if the path was already present
    pub fn add_custom_game_path(&mut self, path: impl Into<PathBuf>) -> bool {
        let path = path.into();
        if self.custom_game_paths.contains(&path) {
            return false;
        }

        self.custom_game_paths.push(path);
        true
    }

    /// Returns `false` if the path was not present
    pub fn remove_custom_game_path(&mut self, path: &Path) -> bool {
        let len = self.custom_game_paths.len();
        self.custom_game_paths.retain(|p| p != path);
        self.custom_game_paths.len() != len
    }

    pub fn reset_to_defaults(&mut self) {
        *self = Self::default();
    }
}
