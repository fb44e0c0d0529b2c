use super::state::GameState;
use super::types::{Direction, Point};

/// Auto-pilot for unattended runs: picks the safe direction that closes
/// the toroidal distance to the food.
pub struct BotController;

impl BotController {
    /// Returns `None` when every non-reversing direction hits the body.
    pub fn calculate_move(state: &GameState) -> Option<Direction> {
        let head = state.snake_head();
        let food = state.food_position();
        let grid_size = state.grid_size();
        let committed = state.committed_direction();

        let mut candidates: Vec<(usize, Direction)> = [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ]
        .into_iter()
        .filter(|direction| !direction.is_opposite(&committed))
        .filter_map(|direction| {
            let next = Self::step(head, direction, grid_size);
            if state.snake_contains(next) && next != state.snake_tail() {
                return None;
            }
            Some((Self::toroidal_distance(next, food, grid_size), direction))
        })
        .collect();

        candidates.sort_by_key(|(distance, _)| *distance);
        candidates.first().map(|(_, direction)| *direction)
    }

    fn step(pos: Point, direction: Direction, grid_size: usize) -> Point {
        match direction {
            Direction::Up => Point::new(pos.x, GameState::wrapping_dec(pos.y, grid_size)),
            Direction::Down => Point::new(pos.x, GameState::wrapping_inc(pos.y, grid_size)),
            Direction::Left => Point::new(GameState::wrapping_dec(pos.x, grid_size), pos.y),
            Direction::Right => Point::new(GameState::wrapping_inc(pos.x, grid_size), pos.y),
        }
    }

    fn toroidal_distance(a: Point, b: Point, grid_size: usize) -> usize {
        let dx = a.x.abs_diff(b.x);
        let dy = a.y.abs_diff(b.y);
        dx.min(grid_size - dx) + dy.min(grid_size - dy)
    }
}
