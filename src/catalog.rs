//! Built-in list of directories games are commonly installed to.

use std::path::{Path, PathBuf};

use cfg_if::cfg_if;
use itertools::Itertools;
use tracing::{error, trace};

use crate::macros::logs::debug_path;

const COMPONENT: &str = "Catalog";

cfg_if! {
    if #[cfg(windows)] {
        /// Well-known install roots of the supported storefronts and generic games folders
        pub fn get_default_roots(path_home: &Path, _path_data: &Path) -> Vec<PathBuf> {
            let steam = [
                PathBuf::from(r"C:\Program Files (x86)\Steam\steamapps\common"),
                PathBuf::from(r"C:\Program Files\Steam\steamapps\common"),
                path_home.join(r"Steam\steamapps\common"),
                PathBuf::from(r"D:\Steam\steamapps\common"),
                PathBuf::from(r"E:\Steam\steamapps\common"),
                PathBuf::from(r"F:\Steam\steamapps\common"),
            ];

            let epic = [
                PathBuf::from(r"C:\Program Files\Epic Games"),
                PathBuf::from(r"C:\Program Files (x86)\Epic Games"),
                path_home.join("Epic Games"),
                PathBuf::from(r"D:\Epic Games"),
                PathBuf::from(r"E:\Epic Games"),
                PathBuf::from(r"F:\Epic Games"),
            ];

            let origin = [
                PathBuf::from(r"C:\Program Files\Origin Games"),
                PathBuf::from(r"C:\Program Files (x86)\Origin Games"),
                PathBuf::from(r"C:\Program Files\EA Games"),
                PathBuf::from(r"C:\Program Files (x86)\EA Games"),
                PathBuf::from(r"D:\Origin Games"),
                PathBuf::from(r"E:\Origin Games"),
            ];

            let gog = [
                PathBuf::from(r"C:\GOG Games"),
                PathBuf::from(r"C:\Program Files\GOG Galaxy\Games"),
                PathBuf::from(r"C:\Program Files (x86)\GOG Galaxy\Games"),
                PathBuf::from(r"D:\GOG Games"),
                PathBuf::from(r"E:\GOG Games"),
            ];

            let generic = [
                PathBuf::from(r"C:\Games"),
                PathBuf::from(r"D:\Games"),
                PathBuf::from(r"E:\Games"),
                PathBuf::from(r"F:\Games"),
                PathBuf::from(r"C:\Program Files\Games"),
                PathBuf::from(r"C:\Program Files (x86)\Games"),
                PathBuf::from(r"D:\Program Files\Games"),
                PathBuf::from(r"E:\Program Files\Games"),
                path_home.join("Games"),
                path_home.join(r"Documents\Games"),
                path_home.join(r"AppData\Local\Games"),
            ];

            // League of Legends, Xbox Game Pass
            let special = [PathBuf::from(r"C:\Riot Games"), PathBuf::from(r"C:\XboxGames")];

            steam
                .into_iter()
                .chain(epic)
                .chain(origin)
                .chain(gog)
                .chain(generic)
                .chain(special)
                .collect()
        }
    } else {
        /// Well-known install roots of Windows games on this system: Steam libraries (native and
        /// flatpak) and the generic games folder used by Heroic and Lutris
        pub fn get_default_roots(path_home: &Path, path_data: &Path) -> Vec<PathBuf> {
            vec![
                path_data.join("Steam/steamapps/common"),
                path_home.join(".steam/steam/steamapps/common"),
                path_home.join(".var/app/com.valvesoftware.Steam/data/Steam/steamapps/common"),
                path_home.join("Games"),
            ]
        }
    }
}

/// Built-in roots followed by the user's custom roots, without duplicates
pub fn get_scan_roots(path_home: &Path, path_data: &Path, custom: &[PathBuf]) -> Vec<PathBuf> {
    let roots: Vec<PathBuf> = get_default_roots(path_home, path_data)
        .into_iter()
        .chain(custom.iter().cloned())
        .unique()
        .collect();

    for path in &roots {
        debug_path!("scan root", path);
    }
    trace!("{COMPONENT} - {} scan roots", roots.len());

    roots
}

/// [`get_scan_roots`] for the current user
pub fn get_user_scan_roots(custom: &[PathBuf]) -> Vec<PathBuf> {
    let Some(path_home) = dirs::home_dir() else {
        error!("{COMPONENT} - No valid home directory found for the current user");
        return custom.to_vec();
    };
    let path_data = dirs::data_dir().unwrap_or_else(|| path_home.join(".local/share"));

    get_scan_roots(&path_home, &path_data, custom)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_custom_roots_are_appended_once() {
        let home = PathBuf::from("/home/user");
        let data = home.join(".local/share");
        let custom = vec![
            PathBuf::from("/mnt/library"),
            home.join("Games"),
            PathBuf::from("/mnt/library"),
        ];

        let defaults = get_default_roots(&home, &data);
        let roots = get_scan_roots(&home, &data, &custom);

        assert_eq!(&roots[..defaults.len()], &defaults[..]);
        assert_eq!(roots.last(), Some(&PathBuf::from("/mnt/library")));
        assert_eq!(
            roots.iter().filter(|p| **p == PathBuf::from("/mnt/library")).count(),
            1
        );
        assert!(roots.contains(&home.join("Games")));
        assert_eq!(roots.iter().unique().count(), roots.len());
    }

    #[test]
    fn test_default_roots_include_home_games_folder() {
        let home = PathBuf::from("/home/user");
        let roots = get_default_roots(&home, &home.join(".local/share"));

        assert!(roots.contains(&home.join("Games")));
    }
}
