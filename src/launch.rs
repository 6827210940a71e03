//! Starting a discovered game according to its [`LaunchMethod`].

use std::{
    fmt::{self, Display, Formatter},
    path::PathBuf,
    process::{Command, Stdio},
};

use tracing::{debug, error};

use crate::{
    data::{Game, LaunchMethod},
    error::GameScannerError,
    utils::{get_launch_command, some_if_file, spawn_detached},
};

const COMPONENT: &str = "Launch";

/// Where the clients which broker launches for some platforms are installed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherLocations {
    pub epic: PathBuf,
    pub origin: PathBuf,
}

impl Default for LauncherLocations {
    fn default() -> Self {
        Self {
            epic: PathBuf::from(
                r"C:\Program Files (x86)\Epic Games\Launcher\Portal\Binaries\Win32\EpicGamesLauncher.exe",
            ),
            origin: PathBuf::from(r"C:\Program Files (x86)\Origin\Origin.exe"),
        }
    }
}

/// What was (or would be) started for a game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// The executable itself
    Direct,
    /// The platform's client, which is expected to start the game
    ViaLauncher(LaunchMethod),
    /// The executable itself, because the platform's client is not installed
    DirectFallback(LaunchMethod),
}

impl Display for LaunchOutcome {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            LaunchOutcome::Direct => write!(f, "Game launched directly"),
            LaunchOutcome::ViaLauncher(LaunchMethod::OriginLauncher) => {
                write!(f, "Origin opened, launch the game from there")
            }
            LaunchOutcome::ViaLauncher(_) => write!(f, "Launched via Epic Games Launcher"),
            LaunchOutcome::DirectFallback(LaunchMethod::OriginLauncher) => {
                write!(f, "Launched directly (Origin not found)")
            }
            LaunchOutcome::DirectFallback(_) => {
                write!(f, "Launched directly (Epic Games Launcher not found)")
            }
        }
    }
}

fn direct_command(game: &Game) -> Command {
    let mut command = get_launch_command(&game.path, [], []);
    command.current_dir(&game.directory);
    command
}

/// The command which starts `game`, and what it amounts to
///
/// Launcher-brokered games fall back to starting the executable directly when the launcher is
/// not installed at the expected location.
pub fn build_launch_command(
    game: &Game,
    launchers: &LauncherLocations,
) -> (Command, LaunchOutcome) {
    let launcher = match game.launch_method {
        LaunchMethod::Direct => return (direct_command(game), LaunchOutcome::Direct),
        LaunchMethod::EpicLauncher => some_if_file(launchers.epic.clone())
            .map(|path| get_launch_command(path, ["-com.epicgames.launcher://"], [])),
        LaunchMethod::OriginLauncher => {
            some_if_file(launchers.origin.clone()).map(|path| get_launch_command(path, [], []))
        }
    };

    match launcher {
        Some(command) => (command, LaunchOutcome::ViaLauncher(game.launch_method)),
        None => {
            debug!(
                "{COMPONENT} - Launcher for {:?} not found, starting '{}' directly",
                game.launch_method, game.name
            );
            (
                direct_command(game),
                LaunchOutcome::DirectFallback(game.launch_method),
            )
        }
    }
}

/// Starts `game` in the background, without keeping its output. The process is reaped once it
/// exits.
#[tracing::instrument(level = "trace", skip(game), fields(game = %game.name))]
pub fn launch_game(
    game: &Game,
    launchers: &LauncherLocations,
) -> Result<LaunchOutcome, GameScannerError> {
    let (mut command, outcome) = build_launch_command(game, launchers);

    command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    let pid = spawn_detached(&mut command).map_err(|e| {
        error!("{COMPONENT} - Could not launch '{}': {e}", game.name);
        GameScannerError::Other(format!("could not launch {}: {e}", game.name))
    })?;

    debug!("{COMPONENT} - {outcome}: '{}' (pid {pid})", game.name);
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use std::{ffi::OsStr, fs, io, path::Path};

    use pretty_assertions::assert_eq;
    use test_case::test_case;

    use super::*;
    use crate::data::Platform;

    fn game(path: &Path, launch_method: LaunchMethod) -> Game {
        Game {
            id: "id".into(),
            name: "Foo".into(),
            path: path.to_path_buf(),
            directory: path.parent().map(Path::to_path_buf).unwrap_or_default(),
            icon: None,
            custom_icon: None,
            last_played: None,
            play_time: 0,
            is_hidden: false,
            is_favorite: false,
            tags: vec![],
            platform: Platform::Standalone,
            launch_method,
        }
    }

    fn missing_launchers() -> LauncherLocations {
        LauncherLocations {
            epic: PathBuf::from("/does/not/exist/EpicGamesLauncher.exe"),
            origin: PathBuf::from("/does/not/exist/Origin.exe"),
        }
    }

    #[test]
    fn test_direct_sets_working_directory() {
        let game = game(Path::new("/Games/Foo/Foo.exe"), LaunchMethod::Direct);
        let (command, outcome) = build_launch_command(&game, &missing_launchers());

        assert_eq!(outcome, LaunchOutcome::Direct);
        assert_eq!(command.get_program(), OsStr::new("/Games/Foo/Foo.exe"));
        assert_eq!(command.get_current_dir(), Some(Path::new("/Games/Foo")));
    }

    #[test_case(LaunchMethod::EpicLauncher)]
    #[test_case(LaunchMethod::OriginLauncher)]
    fn test_missing_launcher_falls_back_to_direct(launch_method: LaunchMethod) {
        let game = game(Path::new("/Games/Foo/Foo.exe"), launch_method);
        let (command, outcome) = build_launch_command(&game, &missing_launchers());

        assert_eq!(outcome, LaunchOutcome::DirectFallback(launch_method));
        assert_eq!(command.get_program(), OsStr::new("/Games/Foo/Foo.exe"));
        assert_eq!(command.get_current_dir(), Some(Path::new("/Games/Foo")));
    }

    #[test]
    fn test_installed_launcher_is_used() -> Result<(), io::Error> {
        let dir = tempfile::tempdir()?;
        let launchers = LauncherLocations {
            epic: dir.path().join("EpicGamesLauncher.exe"),
            origin: dir.path().join("Origin.exe"),
        };
        fs::write(&launchers.epic, b"")?;
        fs::write(&launchers.origin, b"")?;

        let epic_game = game(Path::new("/Games/Foo/Foo.exe"), LaunchMethod::EpicLauncher);
        let (command, outcome) = build_launch_command(&epic_game, &launchers);
        assert_eq!(outcome, LaunchOutcome::ViaLauncher(LaunchMethod::EpicLauncher));
        assert_eq!(command.get_program(), launchers.epic.as_os_str());
        assert_eq!(
            command.get_args().collect::<Vec<_>>(),
            [OsStr::new("-com.epicgames.launcher://")]
        );

        let origin_game = game(Path::new("/Games/Foo/Foo.exe"), LaunchMethod::OriginLauncher);
        let (command, outcome) = build_launch_command(&origin_game, &launchers);
        assert_eq!(outcome, LaunchOutcome::ViaLauncher(LaunchMethod::OriginLauncher));
        assert_eq!(command.get_program(), launchers.origin.as_os_str());
        assert_eq!(command.get_args().count(), 0);

        Ok(())
    }

    #[test]
    fn test_launch_failure_is_an_error() {
        let game = game(Path::new("/does/not/exist/Foo.exe"), LaunchMethod::Direct);
        assert!(launch_game(&game, &missing_launchers()).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_launch_direct() -> Result<(), GameScannerError> {
        let game = game(Path::new("/bin/true"), LaunchMethod::Direct);
        assert_eq!(launch_game(&game, &missing_launchers())?, LaunchOutcome::Direct);
        Ok(())
    }

    #[test]
    fn test_outcome_messages() {
        assert_eq!(LaunchOutcome::Direct.to_string(), "Game launched directly");
        assert_eq!(
            LaunchOutcome::DirectFallback(LaunchMethod::OriginLauncher).to_string(),
            "Launched directly (Origin not found)"
        );
    }
}
