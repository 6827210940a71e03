//! [![License](https://img.shields.io/badge/License-AGPLv3-green.svg)](https://www.gnu.org/licenses/agpl-3.0)
//!
//! A Rust library for discovering games installed on the system by walking the directories
//! games are commonly installed to.
//!
//! # Description
//!
//! This is a Rust library intended to be used by programs which need a list of locally installed
//! games, such as a games launcher. Rather than reading any store's own catalog, it walks a list
//! of well-known install locations (Steam libraries, Epic Games, EA/Origin, GOG, Ubisoft, Riot,
//! Xbox and generic "Games" folders) plus any folders configured by the user, and decides which
//! executables found there are games. Every game found is enriched with the platform it was
//! installed through, how it should be launched, and an icon.
//!
//! Results can be merged with a previously saved library, so that anything the user set on a
//! game (favourite, hidden, play time, custom icon) survives a rescan.
//!
//! # Quick start
//!
//! Add the following to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! lib_game_scanner = "0.1"
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use lib_game_scanner::{get_scanner, settings::Settings, store::GameStore};
//!
//! let settings = Settings::load(&Settings::default_path());
//! let scanner = get_scanner(&settings);
//!
//! let store = GameStore::default();
//! let persisted = store.load().unwrap_or_default();
//!
//! let games = scanner.rescan(&persisted);
//! store.save(&games).ok();
//! ```
//!
//! # Detection
//!
//! - Directories are read up to [`settings::Settings::scan_depth`] levels below each root
//! - Only `.exe` files are considered, and infrastructure binaries (installers, updaters, crash
//!   reporters, launcher services and so on) are rejected, see [`classifier`]
//! - Icons are looked for next to the executable first, then extracted from the executable
//!   itself, see [`icons`]
//! - A scan never fails, unreadable directories are skipped

pub mod catalog;
pub mod classifier;
pub mod data;
pub mod error;
pub mod icons;
pub mod launch;
mod macros;
pub mod merge;
pub mod scanner;
pub mod settings;
pub mod store;
pub mod tags;
mod utils;

use std::sync::Arc;

use data::Game;
use icons::IconCache;
use scanner::Scanner;
use settings::Settings;

/// Primary entry point into the crate - get a [`Scanner`] configured from the given settings
pub fn get_scanner(settings: &Settings) -> Scanner {
    Scanner::from_settings(settings, Arc::new(IconCache::default()))
}

/// Scans the built-in locations with default settings
pub fn scan_for_games() -> Vec<Game> {
    get_scanner(&Settings::default()).scan()
}

#[cfg(test)]
pub(crate) mod test_utils {
    use std::path::PathBuf;

    /// Read-only tree of empty files laid out like real game installs
    pub fn get_mock_file_system_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("mock_file_system")
    }
}
