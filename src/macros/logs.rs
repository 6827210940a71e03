// Each macro expects a `COMPONENT` constant naming the emitting part of the scan to be in scope

macro_rules! debug_path {
    ($description: expr, $path: ident) => {
        tracing::debug!(
            "{COMPONENT} - {} exists at {:?}: {}",
            $description,
            $path,
            $path.exists()
        );
    };
}
pub(crate) use debug_path;

macro_rules! debug_fallback {
    ($strategy: expr, $path: expr) => {
        tracing::debug!(
            "{COMPONENT} - {} found nothing for {:?}, falling back to the next strategy",
            $strategy,
            $path
        );
    };
}
pub(crate) use debug_fallback;

macro_rules! warn_no_games {
    () => {
        tracing::warn!("{COMPONENT} - No games found");
    };
}
pub(crate) use warn_no_games;
