use lib_game_scanner::scan_for_games;

fn main() {
    // WARN: unreadable directories are skipped and will only be visible in the logs
    let games = scan_for_games();

    if games.is_empty() {
        println!("No games detected.")
    } else {
        println!("Detected games ({}):", games.len());

        for game in games {
            println!("\t- {} [{}] {}", game.name, game.platform, game.path.display());
        }
    }
}
