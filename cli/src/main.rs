use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use engine::config::{Validate, load_config};
use engine::game::{GameState, SimulationSettings};
use engine::log;
use engine::logger;
use engine::session::{
    GameBroadcaster, GameOverSummary, SessionCommand, StateSnapshot, run_session,
};
use tokio::sync::Mutex;
use tokio::sync::mpsc;

const HEARTBEAT_TICKS: u64 = 50;

#[derive(Parser)]
#[command(name = "snake_sim")]
struct Args {
    /// Path to the YAML settings file; defaults apply when it is absent
    #[arg(long, default_value = "snake_sim.yaml")]
    config: PathBuf,

    /// Seed for the run; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Number of consecutive games to play
    #[arg(long, default_value_t = 1)]
    games: u32,

    /// Override the configured grid size
    #[arg(long)]
    grid_size: Option<usize>,

    /// Override the configured base update interval
    #[arg(long)]
    update_interval_ms: Option<u64>,

    #[arg(long)]
    use_log_prefix: bool,
}

struct LogBroadcaster;

impl GameBroadcaster for LogBroadcaster {
    async fn broadcast_state(&self, snapshot: StateSnapshot) {
        if snapshot.tick % HEARTBEAT_TICKS == 0 {
            log!(
                "Tick {}: length {}, score {}, level {}, interval {:?}",
                snapshot.tick,
                snapshot.snake_segments.len(),
                snapshot.score,
                snapshot.level,
                snapshot.update_interval
            );
        }
    }

    async fn broadcast_game_over(&self, summary: GameOverSummary) {
        log!(
            "Game over after {} ticks: score {}, level {}",
            summary.ticks,
            summary.score,
            summary.level
        );
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = if args.use_log_prefix {
        Some("SnakeSim".to_string())
    } else {
        None
    };
    logger::init_logger(prefix);

    let mut settings: SimulationSettings = load_config(&args.config)?;
    if let Some(grid_size) = args.grid_size {
        settings.grid_size = grid_size;
    }
    if let Some(interval_ms) = args.update_interval_ms {
        settings.base_update_interval_ms = interval_ms;
    }
    settings.validate()?;

    let seed = args.seed.unwrap_or_else(rand::random);
    log!(
        "Starting: grid {}x{}, base interval {}ms, seed {}",
        settings.grid_size,
        settings.grid_size,
        settings.base_update_interval_ms,
        seed
    );

    let state = Arc::new(Mutex::new(GameState::new(&settings, seed)));

    for game_index in 0..args.games {
        if game_index > 0 {
            state.lock().await.reset();
        }

        let (_command_tx, command_rx) = mpsc::unbounded_channel::<SessionCommand>();
        let summary = run_session(state.clone(), command_rx, LogBroadcaster, true).await;

        log!(
            "Game {}/{} finished: score {}, level {}, ticks {}",
            game_index + 1,
            args.games,
            summary.score,
            summary.level,
            summary.ticks
        );
    }

    Ok(())
}
