//! Data types shared across the crate, and produced by a scan.

use std::{
    fmt::{self, Display, Formatter},
    path::PathBuf,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Data structure which defines all relevant data about any particular discovered game
///
/// Serializes to the JSON record consumed by the host application, with the fields in the
/// order `id, name, path, directory, icon, customIcon, lastPlayed, playTime, isHidden,
/// isFavorite, tags, platform, launchMethod`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    /// Stable identifier derived from `path`, see [`crate::scanner::game_id`]
    pub id: String,
    pub name: String,
    pub path: PathBuf,
    pub directory: PathBuf,
    pub icon: Option<Icon>,
    /// Icon chosen by the user, always preferred over `icon`
    pub custom_icon: Option<Icon>,
    pub last_played: Option<DateTime<Utc>>,
    /// Accumulated play time, in minutes
    #[serde(default)]
    pub play_time: u64,
    #[serde(default)]
    pub is_hidden: bool,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub platform: Platform,
    #[serde(default)]
    pub launch_method: LaunchMethod,
}

impl Game {
    /// The icon which should be displayed for this game
    pub fn effective_icon(&self) -> Option<&Icon> {
        self.custom_icon.as_ref().or(self.icon.as_ref())
    }

    /// Copies the fields only the user can change from a previously persisted record of the
    /// same game
    pub fn inherit_user_fields(&mut self, persisted: &Game) {
        self.custom_icon.clone_from(&persisted.custom_icon);
        self.last_played = persisted.last_played;
        self.play_time = persisted.play_time;
        self.is_hidden = persisted.is_hidden;
        self.is_favorite = persisted.is_favorite;
    }
}

/// Reference to a displayable icon
///
/// Serialized as a plain string: either a filesystem path, or a `data:` URI carrying the
/// encoded image.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Icon {
    File(PathBuf),
    Embedded(String),
}

impl Icon {
    pub fn as_path(&self) -> Option<&PathBuf> {
        match self {
            Icon::File(path) => Some(path),
            Icon::Embedded(_) => None,
        }
    }
}

impl From<String> for Icon {
    fn from(value: String) -> Self {
        if value.starts_with("data:") {
            Icon::Embedded(value)
        } else {
            Icon::File(PathBuf::from(value))
        }
    }
}

impl From<Icon> for String {
    fn from(icon: Icon) -> Self {
        match icon {
            Icon::File(path) => path.to_string_lossy().into_owned(),
            Icon::Embedded(uri) => uri,
        }
    }
}

impl Display for Icon {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Icon::File(path) => write!(f, "{}", path.display()),
            Icon::Embedded(uri) => write!(f, "<embedded image, {} bytes>", uri.len()),
        }
    }
}

/// Distribution ecosystem a game was installed through, inferred from its install path
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Steam,
    Epic,
    Origin,
    Gog,
    Ubisoft,
    Riot,
    Xbox,
    #[default]
    Standalone,
}

impl Platform {
    /// Label used as a tag for games detected under this platform, if any
    pub fn tag(self) -> Option<&'static str> {
        match self {
            Platform::Steam => Some("Steam"),
            Platform::Epic => Some("Epic Games"),
            Platform::Origin => Some("EA/Origin"),
            Platform::Gog => Some("GOG"),
            Platform::Ubisoft => Some("Ubisoft"),
            Platform::Riot => Some("Riot Games"),
            Platform::Xbox => Some("Xbox Game Pass"),
            Platform::Standalone => None,
        }
    }
}

impl Display for Platform {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.tag().unwrap_or("Standalone"))
    }
}

/// How a game should be started
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LaunchMethod {
    /// Spawn the executable itself
    #[default]
    Direct,
    /// Open the Epic Games Launcher, which brokers the launch
    EpicLauncher,
    /// Open the Origin client, which brokers the launch
    OriginLauncher,
}

impl LaunchMethod {
    pub fn is_via_launcher(self) -> bool {
        !matches!(self, LaunchMethod::Direct)
    }
}
