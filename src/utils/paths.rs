use std::{
    ffi::OsStr,
    fs::read_dir,
    io,
    path::{Path, PathBuf},
};

/// Extensions of files which can be used as an icon
pub const IMAGE_EXTENSIONS: [&str; 6] = ["ico", "png", "jpg", "jpeg", "bmp", "webp"];

/// Returns an Option containing the given `PathBuf`, if the `PathBuf` points to an actual file
pub fn some_if_file(path: PathBuf) -> Option<PathBuf> {
    path.is_file().then_some(path)
}

/// Whether the path has one of the [`IMAGE_EXTENSIONS`], ignoring case
pub fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| IMAGE_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)))
}

/// Lower-cased file name of the given path, or an empty string if it has none
pub fn file_name_lowercase(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// Paths of all entries in a directory, sorted by file name so that anything picked from the
/// listing is the same from one run to the next
pub fn read_dir_sorted(path_dir: &Path) -> Result<Vec<PathBuf>, io::Error> {
    let mut paths: Vec<PathBuf> = read_dir(path_dir)?
        .flatten()
        .map(|entry| entry.path())
        .collect();
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(paths)
}
