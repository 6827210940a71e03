use std::{
    collections::HashMap,
    env,
    ffi::OsStr,
    fmt::Debug,
    fs, io,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, OnceLock, PoisonError},
    time::Duration,
};

use base64::{Engine as _, engine::general_purpose::STANDARD};
use cfg_if::cfg_if;
use tracing::{debug, trace};

use super::{COMPONENT, IconRequest, IconStrategy};
use crate::{
    data::Icon,
    error::IconExtractionError,
    scanner::game_id,
    utils::{get_launch_command, hide_console_window, run_with_timeout, sanitise_file_stem},
};

/// Capability of rasterising the icon embedded in an executable into an image file
pub trait IconExtractor: Send + Sync + Debug {
    /// Writes the icon of `path_executable` to `path_output`
    fn extract(&self, path_executable: &Path, path_output: &Path)
    -> Result<(), IconExtractionError>;

    /// Whether this extractor can ever succeed on the current system
    fn is_available(&self) -> bool {
        true
    }
}

/// Extractor for platforms without any icon extraction facility, always fails
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedExtractor;

impl IconExtractor for UnsupportedExtractor {
    fn extract(&self, _: &Path, _: &Path) -> Result<(), IconExtractionError> {
        Err(IconExtractionError::Unsupported)
    }

    fn is_available(&self) -> bool {
        false
    }
}

/// Extracts icons by running an external program
///
/// `{exe}` and `{output}` in the arguments and environment variable values are replaced by the
/// executable and output paths. Anything the program prints is only logged; success means a zero
/// exit status within the timeout.
#[derive(Debug, Clone)]
pub struct CommandExtractor {
    program: String,
    args: Vec<String>,
    env_vars: Vec<(String, String)>,
    timeout: Duration,
}

impl CommandExtractor {
    pub fn new(
        program: impl Into<String>,
        args: impl IntoIterator<Item = impl Into<String>>,
        timeout: Duration,
    ) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            env_vars: Vec::new(),
            timeout,
        }
    }

    /// Builds an extractor from a program followed by its arguments, `None` if empty
    pub fn from_command_line(command_line: &[String], timeout: Duration) -> Option<Self> {
        let (program, args) = command_line.split_first()?;
        Some(Self::new(program.as_str(), args.iter().map(String::as_str), timeout))
    }

    pub fn with_env_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.push((key.into(), value.into()));
        self
    }

    /// Windows PowerShell, using `System.Drawing` to save the associated icon as a PNG
    pub fn powershell(timeout: Duration) -> Self {
        const SCRIPT: &str = r#"
Add-Type -AssemblyName System.Drawing
try {
    $icon = [System.Drawing.Icon]::ExtractAssociatedIcon($env:LIB_GAME_SCANNER_ICON_SOURCE)
    if ($icon -eq $null) {
        exit 2
    }
    $bitmap = $icon.ToBitmap()
    $bitmap.Save($env:LIB_GAME_SCANNER_ICON_TARGET, [System.Drawing.Imaging.ImageFormat]::Png)
    $bitmap.Dispose()
    $icon.Dispose()
    if (-not (Test-Path -LiteralPath $env:LIB_GAME_SCANNER_ICON_TARGET)) {
        exit 3
    }
    exit 0
} catch {
    Write-Error $_.Exception.Message
    exit 1
}
"#;

        Self::new(
            "powershell",
            [
                "-NoProfile",
                "-NonInteractive",
                "-ExecutionPolicy",
                "Bypass",
                "-Command",
                SCRIPT.trim(),
            ],
            timeout,
        )
        .with_env_var("LIB_GAME_SCANNER_ICON_SOURCE", "{exe}")
        .with_env_var("LIB_GAME_SCANNER_ICON_TARGET", "{output}")
    }
}

fn substitute(template: &str, path_executable: &Path, path_output: &Path) -> String {
    template
        .replace("{exe}", &path_executable.to_string_lossy())
        .replace("{output}", &path_output.to_string_lossy())
}

impl IconExtractor for CommandExtractor {
    fn extract(
        &self,
        path_executable: &Path,
        path_output: &Path,
    ) -> Result<(), IconExtractionError> {
        let args: Vec<String> = self
            .args
            .iter()
            .map(|arg| substitute(arg, path_executable, path_output))
            .collect();
        let env_vars: Vec<(&str, String)> = self
            .env_vars
            .iter()
            .map(|(key, value)| (key.as_str(), substitute(value, path_executable, path_output)))
            .collect();

        let mut command = get_launch_command(
            &self.program,
            args.iter().map(String::as_str),
            env_vars
                .iter()
                .map(|(key, value)| (*key, OsStr::new(value.as_str()))),
        );
        hide_console_window(&mut command);

        let output = run_with_timeout(&mut command, self.timeout)
            .map_err(IconExtractionError::Spawn)?
            .ok_or(IconExtractionError::Timeout(self.timeout))?;

        trace!(
            "{COMPONENT} - {} output for {path_executable:?}: stdout={:?}, stderr={:?}",
            self.program,
            output.stdout.trim(),
            output.stderr.trim()
        );

        if !output.status.success() {
            return Err(IconExtractionError::Failed {
                status: output.status,
                stderr: output.stderr.trim().to_owned(),
            });
        }

        Ok(())
    }
}

cfg_if! {
    if #[cfg(windows)] {
        /// Extractor used when none is configured
        pub fn default_extractor(timeout: Duration) -> Box<dyn IconExtractor> {
            Box::new(CommandExtractor::powershell(timeout))
        }
    } else {
        /// Extractor used when none is configured
        pub fn default_extractor(_timeout: Duration) -> Box<dyn IconExtractor> {
            Box::new(UnsupportedExtractor)
        }
    }
}

/// Directory extracted icons are written to when none is configured
pub fn default_icon_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(env::temp_dir)
        .join("lib_game_scanner")
        .join("icons")
}

/// Memoised extraction outcomes, keyed by executable path
///
/// Each path is extracted at most once, even when several threads ask for it at the same time:
/// later callers wait for the first one and share its outcome. Failures are remembered too.
#[derive(Debug, Default)]
pub struct IconCache {
    entries: Mutex<HashMap<PathBuf, Arc<OnceLock<Option<Icon>>>>>,
}

impl IconCache {
    pub fn get_or_extract(
        &self,
        path_executable: &Path,
        extract: impl FnOnce() -> Option<Icon>,
    ) -> Option<Icon> {
        let cell = {
            let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(entries.entry(path_executable.to_path_buf()).or_default())
        };

        cell.get_or_init(extract).clone()
    }

    pub fn get(&self, path_executable: &Path) -> Option<Option<Icon>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.get(path_executable)?.get().cloned()
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Name of the file the icon of `path_executable` is extracted to. Unique per executable, since
/// different executables can share a game name.
pub fn extracted_icon_file_name(game_name: &str, path_executable: &Path) -> String {
    format!(
        "{}_{}.png",
        sanitise_file_stem(game_name),
        game_id(path_executable)
    )
}

/// Rasterises the icon embedded in the executable with an [`IconExtractor`], saving it in a
/// dedicated cache directory under the sanitised game name
#[derive(Debug)]
pub struct NativeExtractionStrategy {
    extractor: Box<dyn IconExtractor>,
    path_cache_dir: PathBuf,
    cache: Arc<IconCache>,
    embed_output: bool,
}

impl NativeExtractionStrategy {
    pub fn new(
        extractor: Box<dyn IconExtractor>,
        path_cache_dir: PathBuf,
        cache: Arc<IconCache>,
    ) -> Self {
        Self {
            extractor,
            path_cache_dir,
            cache,
            embed_output: false,
        }
    }

    /// Return extracted icons as `data:` URIs instead of paths into the cache directory
    pub fn with_embedded_output(mut self, embed_output: bool) -> Self {
        self.embed_output = embed_output;
        self
    }

    fn extract(&self, request: &IconRequest) -> Option<Icon> {
        if !request.path_executable.is_file() {
            debug!(
                "{COMPONENT} - Executable no longer exists: {:?}",
                request.path_executable
            );
            return None;
        }

        let path_output = self.path_cache_dir.join(extracted_icon_file_name(
            request.game_name,
            request.path_executable,
        ));

        self.try_extract(request.path_executable, &path_output)
            .inspect_err(|e| {
                debug!(
                    "{COMPONENT} - Could not extract icon from {:?}: {e}",
                    request.path_executable
                )
            })
            .ok()
    }

    fn try_extract(
        &self,
        path_executable: &Path,
        path_output: &Path,
    ) -> Result<Icon, IconExtractionError> {
        fs::create_dir_all(&self.path_cache_dir)?;

        // Never report a stale file from an earlier extraction as this one's result
        match fs::remove_file(path_output) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => return Err(e.into()),
            _ => {}
        }

        self.extractor.extract(path_executable, path_output)?;

        let is_empty = fs::metadata(path_output).map_or(true, |m| m.len() == 0);
        if is_empty {
            return Err(IconExtractionError::MissingOutput(path_output.to_path_buf()));
        }

        if self.embed_output {
            let bytes = fs::read(path_output)?;
            return Ok(Icon::Embedded(format!(
                "data:image/png;base64,{}",
                STANDARD.encode(bytes)
            )));
        }

        Ok(Icon::File(path_output.to_path_buf()))
    }
}

impl IconStrategy for NativeExtractionStrategy {
    fn name(&self) -> &'static str {
        "native icon extraction"
    }

    fn attempt(&self, request: &IconRequest) -> Option<Icon> {
        if !self.extractor.is_available() {
            return None;
        }

        self.cache
            .get_or_extract(request.path_executable, || self.extract(request))
    }
}
