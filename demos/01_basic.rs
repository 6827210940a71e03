use lib_game_scanner::{get_scanner, settings::Settings};
use tracing::debug;

fn main() {
    // Init tracing
    tracing_subscriber::fmt::init();

    debug!("Initialising scanner");
    let scanner = get_scanner(&Settings::default());

    dbg!(scanner.roots());
    dbg!(scanner.scan());
}
