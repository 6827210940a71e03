//! Depth-bounded traversal of the scan roots, turning accepted executables into [`Game`]s.

use std::{
    fmt::{self, Debug, Formatter},
    path::{Path, PathBuf},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use tracing::{debug, trace};
use walkdir::{DirEntry, WalkDir};

use crate::{
    catalog::get_user_scan_roots,
    classifier::{find_service_folder, is_game_executable},
    data::Game,
    icons::{IconCache, IconResolver},
    macros::logs::warn_no_games,
    merge::{dedupe, merge_with_persisted},
    settings::{DEFAULT_SCAN_DEPTH, Settings},
    tags::{get_launch_method, infer},
    utils::{clean_game_title, normalise_path},
};

const COMPONENT: &str = "Scanner";

/// Fragment of the path under which the publisher's launcher distribution lives
const PRUNED_PARENT_MARKER: &str = "epic games";
/// Directory name fragments which are never entered beneath [`PRUNED_PARENT_MARKER`]
const PRUNED_NAME_FRAGMENTS: [&str; 2] = ["launcher", "portal"];
/// Directory names which are never entered beneath [`PRUNED_PARENT_MARKER`]
const PRUNED_NAMES: [&str; 2] = ["prereqs", "tools"];

/// Number of hex characters kept from the path hash
const ID_LENGTH: usize = 16;

/// Stable identifier of the game at `path`, identical across scans and machines for the same
/// path string
pub fn game_id(path: &Path) -> String {
    let hash = blake3::hash(path.to_string_lossy().as_bytes());
    hash.to_hex().as_str()[..ID_LENGTH].to_owned()
}

/// Display name of the game at `path`
///
/// The parent directory's name is used when it is more descriptive than the file stem, i.e.
/// longer and not a generic `bin`/`game` folder. Otherwise the file stem is used.
pub fn get_game_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy())
        .unwrap_or_default();
    let parent = path
        .parent()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy())
        .unwrap_or_default();

    let parent_lowercase = parent.to_lowercase();
    let use_parent = parent.chars().count() > stem.chars().count()
        && !parent_lowercase.contains("bin")
        && !parent_lowercase.contains("game");

    clean_game_title(if use_parent { parent } else { stem })
}

/// Whether the walker should skip this directory and everything below it
fn is_pruned(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }

    let under_launcher_root = entry
        .path()
        .parent()
        .is_some_and(|parent| normalise_path(parent).contains(PRUNED_PARENT_MARKER));
    if !under_launcher_root {
        return false;
    }

    let name = entry.file_name().to_string_lossy().to_lowercase();
    let pruned = PRUNED_NAME_FRAGMENTS
        .iter()
        .any(|fragment| name.contains(fragment))
        || PRUNED_NAMES.contains(&name.as_str());

    if pruned {
        trace!("{COMPONENT} - Pruned {:?}", entry.path());
    }

    pruned
}

/// Scans a set of roots for installed games
///
/// Scanning never fails: unreadable directories, rejected files and failed icon lookups are
/// logged and skipped, so the result is always the best available.
pub struct Scanner {
    roots: Vec<PathBuf>,
    scan_depth: usize,
    icons: IconResolver,
    cancel_flag: Option<Arc<AtomicBool>>,
}

impl Debug for Scanner {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scanner")
            .field("roots", &self.roots)
            .field("scan_depth", &self.scan_depth)
            .field("cancellable", &self.cancel_flag.is_some())
            .finish_non_exhaustive()
    }
}

impl Scanner {
    pub fn new(roots: Vec<PathBuf>, scan_depth: usize, icons: IconResolver) -> Self {
        Self {
            roots,
            scan_depth,
            icons,
            cancel_flag: None,
        }
    }

    /// Scanner over the built-in roots and the user's custom ones, with the full icon chain.
    /// Extraction results are memoised in `cache`.
    pub fn from_settings(settings: &Settings, cache: Arc<IconCache>) -> Self {
        Self::new(
            get_user_scan_roots(&settings.custom_game_paths),
            settings.scan_depth,
            IconResolver::from_settings(settings, cache),
        )
    }

    /// Makes the scan stop as soon as `cancel_flag` is set, returning what was found so far
    pub fn with_cancel_flag(mut self, cancel_flag: Arc<AtomicBool>) -> Self {
        self.cancel_flag = Some(cancel_flag);
        self
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    pub fn scan_depth(&self) -> usize {
        self.scan_depth
    }

    fn is_cancelled(&self) -> bool {
        self.cancel_flag
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// Scans the configured roots
    pub fn scan(&self) -> Vec<Game> {
        self.scan_roots(&self.roots)
    }

    /// Scans the configured roots, carrying the user-owned fields of `persisted` over to the
    /// games found again. The result is what should be persisted next.
    pub fn rescan(&self, persisted: &[Game]) -> Vec<Game> {
        merge_with_persisted(self.scan(), persisted)
    }

    /// Scans the given roots instead of the configured ones
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn scan_roots(&self, roots: &[PathBuf]) -> Vec<Game> {
        let mut games = Vec::new();

        for path_root in roots {
            if self.is_cancelled() {
                break;
            }

            if !path_root.is_dir() {
                debug!("{COMPONENT} - Skipping root which is not a directory: {path_root:?}");
                continue;
            }

            self.scan_root(path_root, &mut games);
        }

        if self.is_cancelled() {
            debug!(
                "{COMPONENT} - Scan cancelled, returning {} games found so far",
                games.len()
            );
        }

        let games = dedupe(games);
        if games.is_empty() {
            warn_no_games!();
        }

        games
    }

    #[tracing::instrument(level = "trace", skip(self, games))]
    fn scan_root(&self, path_root: &Path, games: &mut Vec<Game>) {
        // Files sit one level below the deepest directory which is read
        let walker = WalkDir::new(path_root)
            .min_depth(1)
            .max_depth(self.scan_depth + 1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !is_pruned(entry));

        for entry in walker {
            if self.is_cancelled() {
                return;
            }

            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!("{COMPONENT} - Skipping unreadable path: {e}");
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let file_name = entry.file_name().to_string_lossy();
            if !is_game_executable(&file_name, entry.path()) {
                continue;
            }

            if let Some(game) = self.build_game(entry.path()) {
                games.push(game);
            }
        }
    }

    fn build_game(&self, path: &Path) -> Option<Game> {
        let directory = path.parent()?.to_path_buf();
        let name = get_game_name(path);

        let (tags, platform) = infer(&directory);
        let launch_method = get_launch_method(platform);
        let icon = self.icons.resolve(path, &name);

        // Second chance for anything the classifier let through from a service folder
        if let Some(segment) = find_service_folder(path) {
            debug!("{COMPONENT} - Discarding {path:?}, it is inside a '{segment}' folder");
            return None;
        }

        trace!("{COMPONENT} - Found '{name}' at {path:?}");

        Some(Game {
            id: game_id(path),
            name,
            path: path.to_path_buf(),
            directory,
            icon,
            custom_icon: None,
            last_played: None,
            play_time: 0,
            is_hidden: false,
            is_favorite: false,
            tags,
            platform,
            launch_method,
        })
    }
}

impl Default for Scanner {
    /// Built-in roots only, default depth, no external icon extraction
    fn default() -> Self {
        Self::new(
            get_user_scan_roots(&[]),
            DEFAULT_SCAN_DEPTH,
            IconResolver::adjacent_only(),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, io};

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;
    use test_case::test_case;

    use super::*;
    use crate::{
        data::{Icon, LaunchMethod, Platform},
        test_utils::get_mock_file_system_path,
    };

    fn tree(files: &[&str]) -> Result<TempDir, io::Error> {
        let dir = tempfile::tempdir()?;
        for file in files {
            let path = dir.path().join(file);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, b"")?;
        }

        Ok(dir)
    }

    fn scanner(scan_depth: usize) -> Scanner {
        Scanner::new(vec![], scan_depth, IconResolver::adjacent_only())
    }

    fn names(games: &[Game]) -> Vec<&str> {
        games.iter().map(|game| game.name.as_str()).collect()
    }

    #[test]
    fn test_game_id_is_stable() {
        let path = Path::new("/Games/Foo/Foo.exe");

        assert_eq!(game_id(path), game_id(path));
        assert_eq!(game_id(path).len(), ID_LENGTH);
        assert!(game_id(path).chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(game_id(path), game_id(Path::new("/Games/Foo/Bar.exe")));
    }

    #[test]
    fn test_game_id_long_common_prefix() {
        // Paths sharing a long prefix must still get distinct ids
        let a = Path::new("/mnt/a/really/long/shared/prefix/of/a/library/GameOne/GameOne.exe");
        let b = Path::new("/mnt/a/really/long/shared/prefix/of/a/library/GameTwo/GameTwo.exe");
        assert_ne!(game_id(a), game_id(b));
    }

    #[test_case("/Games/Foo/Foo.exe", "Foo"; "same length")]
    #[test_case("/Games/Hollow Knight/hk.exe", "Hollow Knight"; "descriptive parent")]
    #[test_case("/Games/Witcher 3/bin/x64/witcher3.exe", "Witcher3"; "short parent")]
    #[test_case("/Games/Foo/binaries_win64/SomeLongName.exe", "SomeLongName"; "bin parent")]
    #[test_case("/Games/Foo/GameFiles/Foo.exe", "Foo"; "game parent")]
    #[test_case("/Games/dark_souls-remastered/ds.exe", "Dark Souls Remastered"; "cleaned parent")]
    #[test_case("/Games/X/the_long_stem.exe", "The Long Stem"; "cleaned stem")]
    fn test_get_game_name(path: &str, expected: &str) {
        assert_eq!(get_game_name(Path::new(path)), expected);
    }

    #[test]
    fn test_depth_limit() -> Result<(), io::Error> {
        let dir = tree(&[
            "One/One.exe",
            "a/b/Three/Three.exe",
            "a/b/c/Four/Four.exe",
            "a/b/c/d/Five/Five.exe",
        ])?;
        let roots = [dir.path().to_path_buf()];

        assert_eq!(names(&scanner(3).scan_roots(&roots)), ["One", "Three"]);
        assert_eq!(names(&scanner(1).scan_roots(&roots)), ["One"]);
        assert!(scanner(0).scan_roots(&roots).is_empty());

        Ok(())
    }

    #[test]
    fn test_files_directly_in_root() -> Result<(), io::Error> {
        let dir = tree(&["Foo.exe", "setup.exe", "readme.txt"])?;
        let games = scanner(3).scan_roots(&[dir.path().to_path_buf()]);

        assert_eq!(games.len(), 1);
        assert_eq!(games[0].path, dir.path().join("Foo.exe"));
        assert_eq!(games[0].directory, dir.path());

        Ok(())
    }

    #[test]
    fn test_launcher_folders_are_pruned() -> Result<(), io::Error> {
        let dir = tree(&[
            "Epic Games/SomeTitle/SomeTitle.exe",
            "Epic Games/Launcher/Engine/Game.exe",
            "Epic Games/DirectXRedist/Other.exe",
            "Epic Games/Tools/Tool.exe",
            "Other/Launcher/Foo.exe",
        ])?;
        let games = scanner(3).scan_roots(&[dir.path().to_path_buf()]);

        // Only the listed folder names are pruned, anything else is left to the classifier
        assert_eq!(names(&games), ["DirectXRedist", "SomeTitle"]);
        assert!(games[0].path.ends_with("DirectXRedist/Other.exe"));

        Ok(())
    }

    #[test]
    fn test_is_pruned_only_beneath_marker() -> Result<(), io::Error> {
        let dir = tree(&[
            "epic games/portal/a.exe",
            "games/portal/b.exe",
            "epic games/prereqs/c.exe",
        ])?;

        let pruned: Vec<PathBuf> = WalkDir::new(dir.path())
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
            .filter(is_pruned)
            .filter_map(|entry| {
                let path = entry.path().strip_prefix(dir.path()).ok()?;
                Some(path.to_path_buf())
            })
            .collect();

        assert_eq!(
            pruned,
            [PathBuf::from("epic games/portal"), PathBuf::from("epic games/prereqs")]
        );

        Ok(())
    }

    #[test]
    fn test_enrichment() -> Result<(), io::Error> {
        let dir = tree(&["Epic Games/SomeTitle/SomeTitle.exe", "Epic Games/SomeTitle/logo.png"])?;
        let games = scanner(3).scan_roots(&[dir.path().to_path_buf()]);

        assert_eq!(games.len(), 1);
        let game = &games[0];
        let path_game = dir.path().join("Epic Games/SomeTitle");

        assert_eq!(game.id, game_id(&path_game.join("SomeTitle.exe")));
        assert_eq!(game.name, "SomeTitle");
        assert_eq!(game.tags, ["Epic Games"]);
        assert_eq!(game.platform, Platform::Epic);
        assert_eq!(game.launch_method, LaunchMethod::EpicLauncher);
        assert_eq!(game.icon, Some(Icon::File(path_game.join("logo.png"))));
        assert!(!game.is_favorite);
        assert_eq!(game.play_time, 0);

        Ok(())
    }

    #[test]
    fn test_missing_and_file_roots_are_skipped() -> Result<(), io::Error> {
        let dir = tree(&["Foo/Foo.exe", "file_root"])?;
        let roots = [
            dir.path().join("does_not_exist"),
            dir.path().join("file_root"),
            dir.path().to_path_buf(),
        ];

        assert_eq!(names(&scanner(3).scan_roots(&roots)), ["Foo"]);

        Ok(())
    }

    #[test]
    fn test_overlapping_roots_are_deduplicated() -> Result<(), io::Error> {
        let dir = tree(&["Foo/Foo.exe"])?;
        let root = dir.path().to_path_buf();

        let games = scanner(3).scan_roots(&[root.clone(), root]);
        assert_eq!(names(&games), ["Foo"]);

        Ok(())
    }

    #[test]
    fn test_cancelled_scan_returns_partial_result() -> Result<(), io::Error> {
        let dir = tree(&["Foo/Foo.exe"])?;
        let flag = Arc::new(AtomicBool::new(true));

        let scanner = scanner(3).with_cancel_flag(Arc::clone(&flag));
        assert!(scanner.scan_roots(&[dir.path().to_path_buf()]).is_empty());

        flag.store(false, Ordering::Relaxed);
        assert_eq!(names(&scanner.scan_roots(&[dir.path().to_path_buf()])), ["Foo"]);

        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_loop_does_not_stall() -> Result<(), io::Error> {
        let dir = tree(&["Foo/Foo.exe"])?;
        std::os::unix::fs::symlink(dir.path(), dir.path().join("Foo/loop"))?;

        let games = scanner(3).scan_roots(&[dir.path().to_path_buf()]);
        assert_eq!(names(&games), ["Foo"]);

        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_is_skipped() -> Result<(), io::Error> {
        let dir = tree(&["Foo/Foo.exe", "Zed/Zed.exe"])?;
        std::os::unix::fs::symlink(dir.path().join("missing"), dir.path().join("Broken"))?;

        let games = scanner(3).scan_roots(&[dir.path().to_path_buf()]);
        assert_eq!(names(&games), ["Foo", "Zed"]);

        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_directory_does_not_hide_siblings() -> Result<(), io::Error> {
        use std::os::unix::fs::PermissionsExt;

        let dir = tree(&["Foo/Foo.exe", "Locked/Hidden/Hidden.exe", "Zed/Zed.exe"])?;
        let path_locked = dir.path().join("Locked");
        fs::set_permissions(&path_locked, fs::Permissions::from_mode(0o000))?;

        let games = scanner(3).scan_roots(&[dir.path().to_path_buf()]);
        // Root ignores permission bits, so the locked folder can still be read there
        let locked_readable = fs::read_dir(&path_locked).is_ok();

        fs::set_permissions(&path_locked, fs::Permissions::from_mode(0o755))?;

        if locked_readable {
            assert_eq!(names(&games), ["Foo", "Hidden", "Zed"]);
        } else {
            assert_eq!(names(&games), ["Foo", "Zed"]);
        }

        Ok(())
    }

    #[test]
    fn test_mock_file_system() {
        let path_root = get_mock_file_system_path().join("Games");
        let games = scanner(3).scan_roots(&[path_root]);

        assert_eq!(
            names(&games),
            ["Foo", "Hollow Knight", "League Of Legends", "Witcher3"]
        );
    }
}
