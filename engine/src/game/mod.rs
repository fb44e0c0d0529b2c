mod bot_controller;
mod entity;
mod rng;
mod settings;
mod state;
mod types;

pub use bot_controller::BotController;
pub use entity::Snake;
pub use rng::SessionRng;
pub use settings::SimulationSettings;
pub use state::{GameState, TickEvent};
pub use types::{Direction, GameEndReason, Point};
