//! Collapsing duplicate discoveries, and reconciling a fresh scan with the persisted library.

use std::collections::HashMap;

use itertools::Itertools;
use tracing::debug;

use crate::data::Game;

const COMPONENT: &str = "Merge";

/// Drops every game whose name and path were already seen, keeping the first occurrence
pub fn dedupe(games: Vec<Game>) -> Vec<Game> {
    let total = games.len();
    let unique: Vec<Game> = games
        .into_iter()
        .unique_by(|game| (game.name.clone(), game.path.clone()))
        .collect();

    if unique.len() != total {
        debug!(
            "{COMPONENT} - Dropped {} duplicate games",
            total - unique.len()
        );
    }

    unique
}

/// Copies the user-owned fields of previously persisted games onto the freshly scanned games
/// with the same id
///
/// The returned list replaces the persisted one: persisted games which were not found again
/// are not carried forward.
pub fn merge_with_persisted(mut fresh: Vec<Game>, persisted: &[Game]) -> Vec<Game> {
    let persisted_by_id: HashMap<&str, &Game> = persisted
        .iter()
        .map(|game| (game.id.as_str(), game))
        .collect();

    let mut matched = 0;
    for game in &mut fresh {
        if let Some(previous) = persisted_by_id.get(game.id.as_str()) {
            game.inherit_user_fields(previous);
            matched += 1;
        }
    }

    debug!(
        "{COMPONENT} - {matched} of {} games were already known, {} are gone",
        fresh.len(),
        persisted_by_id.len().saturating_sub(matched)
    );

    fresh
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        data::{Icon, LaunchMethod, Platform},
        scanner::game_id,
    };

    fn game(name: &str, path: &str) -> Game {
        let path = PathBuf::from(path);
        Game {
            id: game_id(&path),
            name: name.into(),
            directory: path.parent().map(Path::to_path_buf).unwrap_or_default(),
            path,
            icon: None,
            custom_icon: None,
            last_played: None,
            play_time: 0,
            is_hidden: false,
            is_favorite: false,
            tags: vec![],
            platform: Platform::Standalone,
            launch_method: LaunchMethod::Direct,
        }
    }

    #[test]
    fn test_dedupe() {
        let mut duplicate = game("Foo", "/Games/Foo/Foo.exe");
        duplicate.tags = vec!["Steam".into()];

        let games = vec![
            game("Foo", "/Games/Foo/Foo.exe"),
            game("Foo", "/Other/Foo/Foo.exe"),
            duplicate,
            game("Bar", "/Games/Foo/Foo.exe"),
        ];

        let deduped = dedupe(games);
        assert_eq!(
            deduped,
            [
                game("Foo", "/Games/Foo/Foo.exe"),
                game("Foo", "/Other/Foo/Foo.exe"),
                game("Bar", "/Games/Foo/Foo.exe"),
            ]
        );
    }

    #[test]
    fn test_merge_copies_user_fields_only() {
        let mut persisted = game("Old Name", "/Games/Foo/Foo.exe");
        persisted.is_favorite = true;
        persisted.is_hidden = true;
        persisted.play_time = 120;
        persisted.last_played = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).single();
        persisted.custom_icon = Some(Icon::File(PathBuf::from("/pictures/foo.png")));
        persisted.tags = vec!["Stale".into()];

        let mut fresh = game("Foo", "/Games/Foo/Foo.exe");
        fresh.icon = Some(Icon::File(PathBuf::from("/Games/Foo/icon.png")));

        let merged = merge_with_persisted(vec![fresh.clone()], &[persisted.clone()]);

        let mut expected = fresh;
        expected.is_favorite = true;
        expected.is_hidden = true;
        expected.play_time = 120;
        expected.last_played = persisted.last_played;
        expected.custom_icon = persisted.custom_icon;

        assert_eq!(merged, [expected]);
    }

    #[test]
    fn test_merge_drops_vanished_and_keeps_new() {
        let mut vanished = game("Gone", "/Games/Gone/Gone.exe");
        vanished.is_favorite = true;

        let merged = merge_with_persisted(vec![game("New", "/Games/New/New.exe")], &[vanished]);

        assert_eq!(merged, [game("New", "/Games/New/New.exe")]);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let fresh = vec![
            game("Foo", "/Games/Foo/Foo.exe"),
            game("Bar", "/Games/Bar/Bar.exe"),
        ];

        let first = merge_with_persisted(fresh.clone(), &[]);
        let second = merge_with_persisted(fresh, &first);

        assert_eq!(
            serde_json::to_string(&first).ok(),
            serde_json::to_string(&second).ok()
        );
    }
}
