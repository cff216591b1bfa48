//! Headless demo driver: runs one scripted match to completion.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use conquest_core::tile::Owner;
use conquest_match::registry::MatchRegistry;
use conquest_match::room::Room;
use conquest_match::scenario::MatchScenario;

#[derive(Parser)]
#[command(name = "conquest-match")]
#[command(about = "Headless match driver for the conquest engine")]
struct Cli {
    /// Number of scripted players.
    #[arg(long, default_value_t = 2)]
    players: u8,

    /// Layout seed.
    #[arg(long, default_value_t = 12345)]
    seed: u64,

    /// Tick period in milliseconds.
    #[arg(long, default_value_t = 250)]
    tick_ms: u64,

    /// Stop after this many ticks even if the match is still running.
    #[arg(long, default_value_t = 2000)]
    max_ticks: u64,

    /// Optional RON scenario file overriding the flags above.
    #[arg(long)]
    scenario: Option<String>,
}

/// March each player's strongest tile rightward. Enough to make matches
/// resolve without a transport attached.
async fn enqueue_bot_moves(registry: &MatchRegistry, id: &str) {
    let Some(handle) = registry.handle(id).await else {
        return;
    };
    let mut handle = handle.lock().await;
    let game = &mut handle.game;
    #[allow(clippy::cast_possible_truncation)]
    let player_count = game.players().len() as u8;
    for player in 0..player_count {
        let strongest = game
            .tiles()
            .iter()
            .filter(|(_, tile)| tile.owner == Owner::Player(player) && tile.army > 1)
            .max_by_key(|&(index, tile)| (tile.army, index))
            .map(|(index, _)| index);
        if let Some(from) = strongest {
            let to = if from + 1 < game.area() { from + 1 } else { 0 };
            game.queue_move(player, from, to);
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let game = match &cli.scenario {
        Some(path) => match MatchScenario::load(path) {
            Ok(scenario) => {
                info!(name = %scenario.name, "loaded scenario");
                scenario.into_game()
            }
            Err(err) => {
                // Fall back to generation, the same way a malformed map
                // document would be handled.
                tracing::warn!(%err, "scenario unusable, generating instead");
                default_game(&cli)
            }
        },
        None => default_game(&cli),
    };

    let registry = Arc::new(MatchRegistry::new(8));
    registry.register("demo", game).await;

    let period = Duration::from_millis(cli.tick_ms);
    let mut interval = tokio::time::interval(period);
    for tick in 0..cli.max_ticks {
        interval.tick().await;
        enqueue_bot_moves(&registry, "demo").await;
        let remaining = registry.tick_all().await;
        if tick % 50 == 0 {
            if let Some(doc) = registry.snapshot("demo").await {
                info!(turn = doc.turn, tiles = doc.tiles.len(), "progress");
            }
        }
        if remaining == 0 {
            info!(ticks = tick + 1, "match finished and retired");
            return;
        }
    }
    info!(ticks = cli.max_ticks, "tick budget exhausted");
}

fn default_game(cli: &Cli) -> conquest_core::game::Game {
    let mut room = Room::open();
    let mut keys = Vec::new();
    for index in 0..cli.players {
        if let Some(key) = room.join(&format!("bot{index}")) {
            keys.push(key);
        }
    }
    room.layout = room.layout.with_seed(cli.seed);
    for key in &keys {
        room.set_force(key, true);
    }
    assert!(room.should_start());
    let (game, _mapping) = room.into_game();
    game
}
