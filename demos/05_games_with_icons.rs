use lib_game_scanner::{get_scanner, settings::Settings};

fn main() {
    let games = get_scanner(&Settings::default()).scan();
    let with_icons: Vec<_> = games
        .iter()
        .filter(|g| g.effective_icon().is_some())
        .collect();

    if games.is_empty() {
        println!("No games detected.");
        return;
    }

    println!("Games with icons ({}/{}):", with_icons.len(), games.len());
    for game in with_icons {
        let Some(icon) = game.effective_icon() else {
            continue;
        };
        assert!(icon.as_path().is_none_or(|p| p.exists()));
        println!("  - {}", game.name);
        println!("    icon: {icon}");
    }
}
