use std::time::Duration;

use crate::game::{GameEndReason, Point, TickEvent};

/// Everything a presentation layer needs to redraw after one tick.
#[derive(Clone, Debug)]
pub struct StateSnapshot {
    pub tick: u64,
    pub snake_segments: Vec<Point>,
    pub food_position: Point,
    pub score: u32,
    pub level: u32,
    pub game_over: bool,
    pub update_interval: Duration,
    pub grid_size: usize,
    pub events: Vec<TickEvent>,
}

/// Final tally of a run. `reason` is `None` when the session was stopped
/// from outside before the game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameOverSummary {
    pub score: u32,
    pub level: u32,
    pub ticks: u64,
    pub reason: Option<GameEndReason>,
}

/// Receives state after every tick and the summary once the run ends.
pub trait GameBroadcaster {
    async fn broadcast_state(&self, snapshot: StateSnapshot);
    async fn broadcast_game_over(&self, summary: GameOverSummary);
}
