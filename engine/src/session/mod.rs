mod broadcaster;

pub use broadcaster::{GameBroadcaster, GameOverSummary, StateSnapshot};

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::Instant;

use crate::game::{BotController, Direction, GameState, TickEvent};
use crate::log;

/// Commands fed into a running session by the input side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionCommand {
    Turn(Direction),
    Restart,
    Stop,
}

/// Drives the simulation at the cadence the engine computes. The interval
/// is re-read after every tick because it shortens when the level rises.
/// The latest `Turn` received before a tick deadline wins.
pub async fn run_session<B: GameBroadcaster>(
    state: Arc<Mutex<GameState>>,
    mut commands: UnboundedReceiver<SessionCommand>,
    broadcaster: B,
    auto_pilot: bool,
) -> GameOverSummary {
    loop {
        let interval = state.lock().await.current_update_interval();
        let deadline = Instant::now() + interval;

        if wait_for_tick(&state, &mut commands, deadline).await {
            return build_summary(&state).await;
        }

        let snapshot = {
            let mut game = state.lock().await;
            if auto_pilot
                && let Some(direction) = BotController::calculate_move(&game)
            {
                game.set_direction(direction);
            }
            let events = game.advance();
            for event in &events {
                log_event(event);
            }
            build_snapshot(&game, events)
        };

        let game_over = snapshot.game_over;
        broadcaster.broadcast_state(snapshot).await;

        if game_over {
            break;
        }
    }

    let summary = build_summary(&state).await;
    broadcaster.broadcast_game_over(summary).await;
    summary
}

/// Sleeps until the tick deadline while draining input commands.
/// Returns true when the session should stop.
async fn wait_for_tick(
    state: &Arc<Mutex<GameState>>,
    commands: &mut UnboundedReceiver<SessionCommand>,
    deadline: Instant,
) -> bool {
    loop {
        tokio::select! {
            _ = tokio::time::sleep_until(deadline) => return false,
            command = commands.recv() => match command {
                Some(SessionCommand::Turn(direction)) => {
                    state.lock().await.set_direction(direction);
                }
                Some(SessionCommand::Restart) => {
                    state.lock().await.reset();
                }
                Some(SessionCommand::Stop) | None => return true,
            },
        }
    }
}

fn build_snapshot(game: &GameState, events: Vec<TickEvent>) -> StateSnapshot {
    StateSnapshot {
        tick: game.ticks(),
        snake_segments: game.snake_segments().collect(),
        food_position: game.food_position(),
        score: game.score(),
        level: game.level(),
        game_over: game.is_game_over(),
        update_interval: game.current_update_interval(),
        grid_size: game.grid_size(),
        events,
    }
}

async fn build_summary(state: &Arc<Mutex<GameState>>) -> GameOverSummary {
    let game = state.lock().await;
    GameOverSummary {
        score: game.score(),
        level: game.level(),
        ticks: game.ticks(),
        reason: game.end_reason(),
    }
}

fn log_event(event: &TickEvent) {
    match event {
        TickEvent::FoodEaten { position, score } => {
            log!(
                "Food eaten at ({}, {}). Score: {}",
                position.x,
                position.y,
                score
            );
        }
        TickEvent::LevelChanged { level } => {
            log!("Level {} reached", level);
        }
        TickEvent::GameEnded { reason } => {
            log!("Game ended: {:?}", reason);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;

    use tokio::sync::mpsc;

    use super::*;
    use crate::game::{GameEndReason, Point, SimulationSettings};

    #[derive(Clone, Default)]
    struct CollectingBroadcaster {
        snapshots: Arc<StdMutex<Vec<StateSnapshot>>>,
        summaries: Arc<StdMutex<Vec<GameOverSummary>>>,
    }

    impl GameBroadcaster for CollectingBroadcaster {
        async fn broadcast_state(&self, snapshot: StateSnapshot) {
            self.snapshots.lock().unwrap().push(snapshot);
        }

        async fn broadcast_game_over(&self, summary: GameOverSummary) {
            self.summaries.lock().unwrap().push(summary);
        }
    }

    fn fast_settings() -> SimulationSettings {
        SimulationSettings {
            grid_size: 10,
            base_update_interval_ms: 5,
            min_update_interval_ms: 1,
        }
    }

    #[tokio::test]
    async fn test_stop_command_ends_the_session() {
        let state = Arc::new(Mutex::new(GameState::new(&fast_settings(), 1)));
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let broadcaster = CollectingBroadcaster::default();

        command_tx.send(SessionCommand::Stop).unwrap();
        let summary = run_session(state, command_rx, broadcaster.clone(), false).await;

        assert_eq!(summary.score, 0);
        assert_eq!(summary.reason, None);
        assert!(broadcaster.summaries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_turn_commands_reach_the_engine_before_the_tick() {
        let state = Arc::new(Mutex::new(GameState::new(&fast_settings(), 1)));
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let broadcaster = CollectingBroadcaster::default();

        command_tx.send(SessionCommand::Turn(Direction::Up)).unwrap();
        command_tx.send(SessionCommand::Stop).unwrap();
        let _ = run_session(state.clone(), command_rx, broadcaster, false).await;

        assert_eq!(state.lock().await.requested_direction(), Direction::Up);
    }

    #[tokio::test]
    async fn test_snapshots_carry_increasing_ticks() {
        let state = Arc::new(Mutex::new(GameState::new(&fast_settings(), 1)));
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let broadcaster = CollectingBroadcaster::default();

        let handle = tokio::spawn(run_session(
            state,
            command_rx,
            broadcaster.clone(),
            true,
        ));

        loop {
            tokio::time::sleep(Duration::from_millis(10)).await;
            let seen = broadcaster.snapshots.lock().unwrap().len();
            if seen >= 3 {
                break;
            }
        }
        // The run may already be over on a slow machine, so the send can
        // race the session shutting down.
        let _ = command_tx.send(SessionCommand::Stop);
        let _ = handle.await.unwrap();

        let snapshots = broadcaster.snapshots.lock().unwrap();
        for pair in snapshots.windows(2) {
            assert!(pair[0].tick < pair[1].tick);
        }
    }

    #[tokio::test]
    async fn test_game_over_is_broadcast_with_a_summary() {
        let state = Arc::new(Mutex::new(GameState::new(&fast_settings(), 1)));
        {
            let mut game = state.lock().await;
            // One tick away from running into the body.
            game.debug_set_snake(
                &[
                    Point::new(5, 5),
                    Point::new(5, 6),
                    Point::new(6, 6),
                    Point::new(6, 5),
                    Point::new(7, 5),
                ],
                Direction::Down,
            );
            game.debug_set_food(Point::new(0, 0));
        }
        let (_command_tx, command_rx) = mpsc::unbounded_channel();
        let broadcaster = CollectingBroadcaster::default();

        let summary = run_session(state, command_rx, broadcaster.clone(), false).await;

        assert_eq!(summary.reason, Some(GameEndReason::SelfCollision));
        assert_eq!(summary.ticks, 1);

        let summaries = broadcaster.summaries.lock().unwrap();
        assert_eq!(summaries.as_slice(), &[summary]);

        let snapshots = broadcaster.snapshots.lock().unwrap();
        assert!(snapshots.last().unwrap().game_over);
    }

    #[tokio::test]
    async fn test_restart_command_starts_a_fresh_run() {
        let state = Arc::new(Mutex::new(GameState::new(&fast_settings(), 1)));
        {
            let mut game = state.lock().await;
            game.debug_set_score(7);
            game.debug_set_level(2);
        }
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let broadcaster = CollectingBroadcaster::default();

        command_tx.send(SessionCommand::Restart).unwrap();
        command_tx.send(SessionCommand::Stop).unwrap();
        let summary = run_session(state.clone(), command_rx, broadcaster, false).await;

        assert_eq!(summary.score, 0);
        assert_eq!(state.lock().await.level(), 1);
    }
}
