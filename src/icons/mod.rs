//! Icon resolution for discovered games.
//!
//! An [`IconResolver`] holds an ordered chain of [`IconStrategy`]s. Strategies are tried from
//! cheapest and most reliable to most expensive, the first one to produce an icon wins, and a
//! failing strategy simply hands over to the next one. When every strategy fails the game has no
//! icon, rendering a placeholder is left to whoever displays the game.
//!
//! The default chain is:
//!
//! 1. [`AdjacentFileStrategy`] - image files shipped next to the executable
//! 2. [`NativeExtractionStrategy`] - the icon embedded in the executable itself, rasterised by an
//!    external [`IconExtractor`]

mod adjacent;
mod native;

use std::{
    fmt::Debug,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

pub use adjacent::{
    ASSET_DIR_NAMES, AdjacentFileStrategy, ICON_FILE_NAMES, NameHints, find_icon_in_dir,
};
pub use native::{
    CommandExtractor, IconCache, IconExtractor, NativeExtractionStrategy, UnsupportedExtractor,
    default_extractor, default_icon_cache_dir, extracted_icon_file_name,
};
use tracing::{debug, trace};

use crate::{data::Icon, macros::logs::debug_fallback, settings::Settings};

const COMPONENT: &str = "Icons";

/// Everything a strategy may need to find the icon of one game
#[derive(Debug, Clone, Copy)]
pub struct IconRequest<'a> {
    pub path_executable: &'a Path,
    pub path_game_dir: &'a Path,
    pub game_name: &'a str,
}

/// A single attempt at producing an icon
pub trait IconStrategy: Send + Sync + Debug {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Returns `None` on any failure, failures are never fatal
    fn attempt(&self, request: &IconRequest) -> Option<Icon>;
}

#[derive(Debug)]
pub struct IconResolver {
    strategies: Vec<Box<dyn IconStrategy>>,
}

impl IconResolver {
    pub fn new(strategies: Vec<Box<dyn IconStrategy>>) -> Self {
        Self { strategies }
    }

    /// Only looks for image files shipped with the game, never starts an external process
    pub fn adjacent_only() -> Self {
        Self::new(vec![Box::new(AdjacentFileStrategy)])
    }

    /// The default chain, configured from the given settings. Extraction results are memoised in
    /// `cache`, which can be shared between resolvers to avoid repeating work across scans.
    pub fn from_settings(settings: &Settings, cache: Arc<IconCache>) -> Self {
        let timeout = Duration::from_secs(settings.icon_extraction_timeout_secs);

        let extractor: Box<dyn IconExtractor> = match settings
            .icon_extractor_command
            .as_deref()
            .and_then(|command_line| CommandExtractor::from_command_line(command_line, timeout))
        {
            Some(extractor) => Box::new(extractor),
            None => default_extractor(timeout),
        };

        let path_cache_dir: PathBuf = settings
            .icon_cache_dir
            .clone()
            .unwrap_or_else(default_icon_cache_dir);

        let native = NativeExtractionStrategy::new(extractor, path_cache_dir, cache)
            .with_embedded_output(settings.embed_extracted_icons);

        Self::new(vec![Box::new(AdjacentFileStrategy), Box::new(native)])
    }

    /// Runs the chain for one executable
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn resolve(&self, path_executable: &Path, game_name: &str) -> Option<Icon> {
        let path_game_dir = path_executable.parent().unwrap_or(Path::new(""));
        let request = IconRequest {
            path_executable,
            path_game_dir,
            game_name,
        };

        for strategy in &self.strategies {
            if let Some(icon) = strategy.attempt(&request) {
                trace!(
                    "{COMPONENT} - {} found icon for '{game_name}': {icon}",
                    strategy.name()
                );
                return Some(icon);
            }

            debug_fallback!(strategy.name(), path_executable);
        }

        debug!("{COMPONENT} - No icon found for '{game_name}'");
        None
    }
}
