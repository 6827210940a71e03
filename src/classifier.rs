//! Decides which executables found during a scan are games.
//!
//! Anything with the executable extension which is not explicitly denied is accepted. Checks run
//! in this order:
//!
//! 1. Only `.exe` files are considered
//! 2. Publisher folders with a known canonical binary only accept that binary ([`CANONICAL_RULES`])
//! 3. File names containing an infrastructure keyword are rejected ([`EXCLUDED_KEYWORDS`])
//! 4. Files inside launcher/portal/prerequisite/redistributable folders are rejected
//! 5. Everything else is accepted

use std::path::Path;

use tracing::trace;

use crate::utils::normalise_path;

const COMPONENT: &str = "Classifier";

/// Extension of the executables which are considered, compared case-insensitively
pub const EXECUTABLE_EXTENSION: &str = "exe";

/// File name fragments of uninstallers, installers, updaters, configuration tools, crash
/// reporters and publisher service processes
pub const EXCLUDED_KEYWORDS: [&str; 28] = [
    // Generic tooling
    "unins",
    "setup",
    "install",
    "update",
    "patch",
    "config",
    "settings",
    "crash",
    "report",
    "log",
    "debug",
    // Epic Online Services
    "epiconlineserviceshost",
    "epiconlineservicesuihelper",
    "epiconlineservicesuserhelper",
    // Steam
    "steamservice",
    "steamwebhelper",
    "steamerrorhandler",
    // Riot
    "leagueclientuxrender",
    "riotclientelectron",
    "riotclientservices",
    "riotclientcrashhandler",
    "leagueclientux",
    "riot client",
    // Anti-cheat shims and launchers of specific titles
    "start_protected_game",
    "apexlauncher",
    // Redistributables
    "vcredist",
    "directx",
    "redist",
];

/// Path segments of folders which only hold launchers, installers and redistributables
pub const SERVICE_FOLDER_SEGMENTS: [&str; 4] = ["/launcher/", "/portal/", "/prereqs/", "/redist/"];

/// A publisher folder shipping several executables where only specific ones start the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanonicalRule {
    pub family: &'static str,
    /// Lower-cased, `/`-separated path fragment identifying the folder
    pub path_marker: &'static str,
    /// Lower-cased file names accepted within the folder, nothing is accepted if empty
    pub canonical: &'static [&'static str],
}

impl CanonicalRule {
    fn applies_to(&self, path_normalised: &str) -> bool {
        path_normalised.contains(self.path_marker)
    }

    fn accepts(&self, file_name_lowercase: &str) -> bool {
        self.canonical.contains(&file_name_lowercase)
    }
}

/// Publisher special cases, evaluated in order before any generic rule
pub const CANONICAL_RULES: [CanonicalRule; 3] = [
    CanonicalRule {
        family: "League of Legends",
        path_marker: "riot games/league of legends",
        canonical: &["leagueclient.exe"],
    },
    // The account client never hosts a game
    CanonicalRule {
        family: "Riot Client",
        path_marker: "riot games/riot client",
        canonical: &[],
    },
    CanonicalRule {
        family: "Apex Legends",
        path_marker: "apex legends",
        canonical: &["r5apex.exe", "r5apex_dx12.exe"],
    },
];

/// Why an executable was not accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    NotExecutable,
    NotCanonical(&'static str),
    ExcludedKeyword(&'static str),
    ServiceFolder(&'static str),
}

/// Outcome of classifying a single file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    Reject(Rejection),
}

impl Verdict {
    pub fn is_accepted(self) -> bool {
        self == Verdict::Accept
    }
}

/// Returns the service folder segment the path sits under, if any
pub fn find_service_folder(path: &Path) -> Option<&'static str> {
    let path_normalised = normalise_path(path);
    SERVICE_FOLDER_SEGMENTS
        .into_iter()
        .find(|segment| path_normalised.contains(segment))
}

/// Classifies the file with the given name, located at `path`
pub fn classify(file_name: &str, path: &Path) -> Verdict {
    let is_executable = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(EXECUTABLE_EXTENSION));
    if !is_executable {
        return Verdict::Reject(Rejection::NotExecutable);
    }

    let name = file_name.to_lowercase();
    let path_normalised = normalise_path(path);

    if let Some(rule) = CANONICAL_RULES
        .iter()
        .find(|rule| rule.applies_to(&path_normalised))
    {
        return if rule.accepts(&name) {
            Verdict::Accept
        } else {
            Verdict::Reject(Rejection::NotCanonical(rule.family))
        };
    }

    if let Some(keyword) = EXCLUDED_KEYWORDS.into_iter().find(|k| name.contains(k)) {
        return Verdict::Reject(Rejection::ExcludedKeyword(keyword));
    }

    if let Some(segment) = SERVICE_FOLDER_SEGMENTS
        .into_iter()
        .find(|segment| path_normalised.contains(segment))
    {
        return Verdict::Reject(Rejection::ServiceFolder(segment));
    }

    Verdict::Accept
}

/// Whether the file with the given name, located at `path`, should be listed as a game
pub fn is_game_executable(file_name: &str, path: &Path) -> bool {
    let verdict = classify(file_name, path);
    match verdict {
        Verdict::Accept => trace!("{COMPONENT} - Accepted: {path:?}"),
        Verdict::Reject(Rejection::NotExecutable) => {}
        Verdict::Reject(reason) => trace!("{COMPONENT} - Rejected ({reason:?}): {path:?}"),
    }

    verdict.is_accepted()
}
