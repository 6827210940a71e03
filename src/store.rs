//! The persisted game library, a JSON array of [`Game`] records.

use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::{data::Game, error::GameScannerError};

const COMPONENT: &str = "Store";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameStore {
    path: PathBuf,
}

impl GameStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data dir>/lib_game_scanner/games.json`
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(env::temp_dir)
            .join("lib_game_scanner")
            .join("games.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every persisted game. Nothing has been persisted yet if the file does not exist.
    #[tracing::instrument(level = "trace")]
    pub fn load(&self) -> Result<Vec<Game>, GameScannerError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("{COMPONENT} - Nothing persisted yet at {:?}", self.path);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let games: Vec<Game> = serde_json::from_str(&contents)?;
        debug!("{COMPONENT} - Loaded {} games from {:?}", games.len(), self.path);

        Ok(games)
    }

    /// Replaces the persisted games, creating parent directories as needed
    pub fn save(&self, games: &[Game]) -> Result<(), GameScannerError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(games)?)?;

        debug!("{COMPONENT} - Saved {} games to {:?}", games.len(), self.path);
        Ok(())
    }
}

impl Default for GameStore {
    fn default() -> Self {
        Self::new(Self::default_path())
    }
}
