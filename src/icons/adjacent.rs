use std::path::{Path, PathBuf};

use itertools::Itertools;
use tracing::trace;

use super::{COMPONENT, IconRequest, IconStrategy};
use crate::{
    data::Icon,
    utils::{
        IMAGE_EXTENSIONS, alphanumeric_lowercase, file_name_lowercase, has_image_extension,
        read_dir_sorted,
    },
};

/// Conventional names of icon files, tried after the executable's own name
pub const ICON_FILE_NAMES: [&str; 5] = ["icon", "logo", "app", "launcher", "game"];

/// Subdirectories which commonly hold a game's artwork, matched case-insensitively
pub const ASSET_DIR_NAMES: [&str; 8] = [
    "assets",
    "images",
    "icons",
    "resources",
    "data",
    "img",
    "graphics",
    "game",
];

/// Extra icon names for games whose artwork is commonly named after an abbreviation, keyed by the
/// alphanumeric, lower-cased game name
const GAME_NAME_ALIASES: [(&str, &[&str]); 1] =
    [("leagueoflegends", &["leagueoflegends", "lol"])];

/// File name fragments which make an image a likely icon
const PRIORITY_FRAGMENTS: [&str; 4] = ["icon", "logo", "game", "app"];

/// Looks for image files shipped next to the executable, then in its conventional asset folders
#[derive(Debug, Clone, Copy, Default)]
pub struct AdjacentFileStrategy;

impl IconStrategy for AdjacentFileStrategy {
    fn name(&self) -> &'static str {
        "adjacent file search"
    }

    fn attempt(&self, request: &IconRequest) -> Option<Icon> {
        let stem = request
            .path_executable
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_lowercase());

        let hints = NameHints::new(stem, request.game_name, request.path_game_dir);

        find_icon_in_dir(request.path_game_dir, &hints)
            .or_else(|| find_icon_in_asset_dirs(request.path_game_dir, &hints))
            .map(Icon::File)
    }
}

/// Names an icon file is expected to have for a given game
#[derive(Debug)]
pub struct NameHints {
    /// Lower-cased file stem of the executable
    stem: Option<String>,
    /// Alphanumeric-only, lower-cased game name
    game: String,
    /// Alphanumeric-only, lower-cased name of the game's directory
    dir: String,
    aliases: &'static [&'static str],
}

impl NameHints {
    pub fn new(stem: Option<String>, game_name: &str, path_game_dir: &Path) -> Self {
        let dir = path_game_dir
            .file_name()
            .map(|name| alphanumeric_lowercase(name.to_string_lossy()))
            .unwrap_or_default();

        let game = alphanumeric_lowercase(game_name);
        let aliases = GAME_NAME_ALIASES
            .iter()
            .find(|(name, _)| *name == game)
            .map_or(&[][..], |(_, aliases)| *aliases);

        Self {
            stem,
            game,
            dir,
            aliases,
        }
    }

    /// Exact file stems, in order of preference
    fn exact_names(&self) -> impl Iterator<Item = &str> {
        self.stem
            .as_deref()
            .into_iter()
            .chain(ICON_FILE_NAMES)
            .chain([self.game.as_str()])
            .chain(self.aliases.iter().copied())
            .chain([self.dir.as_str()])
            .filter(|name| !name.is_empty())
            .unique()
    }

    /// Fragments a file name may contain, in order of preference
    fn fragments(&self) -> impl Iterator<Item = &str> {
        PRIORITY_FRAGMENTS
            .into_iter()
            .chain([self.game.as_str(), self.dir.as_str()])
            .filter(|fragment| !fragment.is_empty())
    }
}

/// Picks the most likely icon among the image files directly inside `path_dir`
///
/// In order: an exact conventional name with any image extension, then any image whose name
/// contains a priority fragment, then the first image of any name.
pub fn find_icon_in_dir(path_dir: &Path, hints: &NameHints) -> Option<PathBuf> {
    let images: Vec<(String, PathBuf)> = read_dir_sorted(path_dir)
        .inspect_err(|e| trace!("{COMPONENT} - Could not read {path_dir:?}: {e}"))
        .ok()?
        .into_iter()
        .filter(|path| path.is_file() && has_image_extension(path))
        .map(|path| (file_name_lowercase(&path), path))
        .collect();

    if images.is_empty() {
        return None;
    }

    let find_named = |file_name: &str| {
        images
            .iter()
            .find(|(name, _)| name == file_name)
            .map(|(_, path)| path.clone())
    };

    let exact = hints.exact_names().find_map(|name| {
        IMAGE_EXTENSIONS
            .iter()
            .find_map(|ext| find_named(&format!("{name}.{ext}")))
    });
    if exact.is_some() {
        return exact;
    }

    let prioritised = hints.fragments().find_map(|fragment| {
        images
            .iter()
            .find(|(name, _)| name.contains(fragment))
            .map(|(_, path)| path.clone())
    });
    if prioritised.is_some() {
        return prioritised;
    }

    images.into_iter().next().map(|(_, path)| path)
}

/// Runs [`find_icon_in_dir`] on each conventional asset folder of the game directory, then on the
/// folders directly inside it
fn find_icon_in_asset_dirs(path_game_dir: &Path, hints: &NameHints) -> Option<PathBuf> {
    subdirectories(path_game_dir)
        .filter(|path| ASSET_DIR_NAMES.contains(&file_name_lowercase(path).as_str()))
        .find_map(|path_assets| {
            find_icon_in_dir(&path_assets, hints).or_else(|| {
                subdirectories(&path_assets).find_map(|path_nested| {
                    find_icon_in_dir(&path_nested, hints)
                })
            })
        })
}

fn subdirectories(path_dir: &Path) -> impl Iterator<Item = PathBuf> {
    read_dir_sorted(path_dir)
        .unwrap_or_default()
        .into_iter()
        .filter(|path| path.is_dir())
}
