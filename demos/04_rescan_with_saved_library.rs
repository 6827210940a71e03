use lib_game_scanner::{get_scanner, settings::Settings, store::GameStore};

// Scans, keeping anything set on games found in earlier runs, then saves the library for the
// next run
fn main() {
    let settings = Settings::load(&Settings::default_path());
    let store = GameStore::default();

    let persisted = match store.load() {
        Ok(games) => games,
        Err(e) => {
            eprintln!("Could not read {:?}, starting from scratch: {e}", store.path());
            Vec::new()
        }
    };

    let games = get_scanner(&settings).rescan(&persisted);
    let known = games
        .iter()
        .filter(|game| persisted.iter().any(|p| p.id == game.id))
        .count();

    println!(
        "{} games, {known} already known, {} new",
        games.len(),
        games.len() - known
    );

    if let Err(e) = store.save(&games) {
        eprintln!("Could not save to {:?}: {e}", store.path());
    }
}
