//! Inference of descriptive tags, platform and launch method from a game's install directory.

use std::path::Path;

use crate::{
    data::{LaunchMethod, Platform},
    utils::normalise_path,
};

/// Path fragments identifying each platform, in priority order. The first match decides the
/// platform, every match contributes a tag.
const PLATFORM_MARKERS: [(Platform, &[&str]); 7] = [
    (Platform::Steam, &["steam"]),
    (Platform::Epic, &["epic"]),
    (Platform::Origin, &["origin", "ea games"]),
    (Platform::Gog, &["gog"]),
    (Platform::Ubisoft, &["ubisoft", "uplay"]),
    (Platform::Riot, &["riot games"]),
    (Platform::Xbox, &["xboxgames"]),
];

/// Platforms recognised in the given directory, in priority order
fn matching_platforms(path_dir: &Path) -> impl Iterator<Item = Platform> {
    let path = normalise_path(path_dir);

    PLATFORM_MARKERS
        .into_iter()
        .filter(move |(_, markers)| markers.iter().any(|m| path.contains(m)))
        .map(|(platform, _)| platform)
}

/// Tags describing where the game was installed from, without duplicates
pub fn infer_tags(path_dir: &Path) -> Vec<String> {
    matching_platforms(path_dir)
        .filter_map(Platform::tag)
        .map(String::from)
        .collect()
}

/// Single platform a game belongs to, [`Platform::Standalone`] if nothing is recognised
pub fn infer_platform(path_dir: &Path) -> Platform {
    matching_platforms(path_dir).next().unwrap_or_default()
}

/// Tags and platform together
pub fn infer(path_dir: &Path) -> (Vec<String>, Platform) {
    (infer_tags(path_dir), infer_platform(path_dir))
}

/// Platforms whose client has to broker the launch are started through it, everything else is
/// executed directly
pub fn get_launch_method(platform: Platform) -> LaunchMethod {
    match platform {
        Platform::Epic => LaunchMethod::EpicLauncher,
        Platform::Origin => LaunchMethod::OriginLauncher,
        Platform::Steam
        | Platform::Gog
        | Platform::Ubisoft
        | Platform::Riot
        | Platform::Xbox
        | Platform::Standalone => LaunchMethod::Direct,
    }
}
