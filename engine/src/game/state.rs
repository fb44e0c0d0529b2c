use std::time::Duration;

use super::entity::Snake;
use super::rng::SessionRng;
use super::settings::SimulationSettings;
use super::types::{Direction, GameEndReason, Point};

pub const INITIAL_DIRECTION: Direction = Direction::Right;

const SCORE_PER_LEVEL: u32 = 5;
const SPEEDUP_PER_LEVEL: f64 = 0.1;
const FOOD_SAMPLING_ATTEMPTS: u32 = 100;

/// What happened during a single tick, for consumers that react to changes
/// instead of re-reading the whole state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickEvent {
    FoodEaten { position: Point, score: u32 },
    LevelChanged { level: u32 },
    GameEnded { reason: GameEndReason },
}

/// The whole simulation: one snake on a toroidal grid, one food cell, a
/// score-driven speed curve. All mutation goes through `advance`,
/// `set_direction` and `reset`; everything else is a read.
#[derive(Clone, Debug)]
pub struct GameState {
    snake: Snake,
    food: Point,
    requested_direction: Direction,
    committed_direction: Direction,
    end_reason: Option<GameEndReason>,
    score: u32,
    level: u32,
    ticks: u64,
    grid_size: usize,
    base_update_interval: Duration,
    min_update_interval: Duration,
    rng: SessionRng,
}

impl GameState {
    pub fn new(settings: &SimulationSettings, seed: u64) -> Self {
        let mut rng = SessionRng::new(seed);
        let grid_size = settings.grid_size;
        let snake = Self::initial_snake(grid_size);
        let food = Self::draw_food(&mut rng, &snake, grid_size);

        Self {
            snake,
            food,
            requested_direction: INITIAL_DIRECTION,
            committed_direction: INITIAL_DIRECTION,
            end_reason: None,
            score: 0,
            level: 1,
            ticks: 0,
            grid_size,
            base_update_interval: settings.base_update_interval(),
            min_update_interval: settings.min_update_interval(),
            rng,
        }
    }

    /// Starts a fresh run: centered snake heading right, new food, zeroed
    /// score. The RNG keeps its stream, so consecutive runs stay
    /// reproducible from the session seed.
    pub fn reset(&mut self) {
        self.snake = Self::initial_snake(self.grid_size);
        self.food = Self::draw_food(&mut self.rng, &self.snake, self.grid_size);
        self.requested_direction = INITIAL_DIRECTION;
        self.committed_direction = INITIAL_DIRECTION;
        self.end_reason = None;
        self.score = 0;
        self.level = 1;
        self.ticks = 0;
    }

    fn initial_snake(grid_size: usize) -> Snake {
        let center = Point::new(grid_size / 2, grid_size / 2);
        Snake::new(center, INITIAL_DIRECTION, grid_size)
    }

    /// Records the latest direction intent. Reversals are not filtered
    /// here: the requested direction always reflects the newest input, and
    /// `advance` decides what actually applies.
    pub fn set_direction(&mut self, direction: Direction) {
        self.requested_direction = direction;
    }

    /// One simulation step. A finished game does not move.
    pub fn advance(&mut self) -> Vec<TickEvent> {
        if self.end_reason.is_some() {
            return Vec::new();
        }

        let mut events = Vec::new();
        self.ticks += 1;

        if !self.requested_direction.is_opposite(&self.committed_direction) {
            self.committed_direction = self.requested_direction;
        }

        let next_head = self.next_head_position();

        // The current tail vacates its cell this tick unless food is
        // eaten, so moving onto it is legal.
        if self.snake.contains(next_head) && next_head != self.snake.tail() {
            self.end_reason = Some(GameEndReason::SelfCollision);
            events.push(TickEvent::GameEnded {
                reason: GameEndReason::SelfCollision,
            });
            return events;
        }

        let ate_food = next_head == self.food;
        if !ate_food {
            // Tail first: the head may be entering the vacated cell.
            self.snake.pop_tail();
        }
        self.snake.push_head(next_head);

        if ate_food {
            self.score += 1;
            events.push(TickEvent::FoodEaten {
                position: next_head,
                score: self.score,
            });

            let level = self.score / SCORE_PER_LEVEL + 1;
            if level != self.level {
                self.level = level;
                events.push(TickEvent::LevelChanged { level });
            }

            if self.snake.len() == self.grid_size * self.grid_size {
                // No free cell remains for food.
                self.end_reason = Some(GameEndReason::GridFilled);
                events.push(TickEvent::GameEnded {
                    reason: GameEndReason::GridFilled,
                });
            } else {
                self.food = Self::draw_food(&mut self.rng, &self.snake, self.grid_size);
            }
        }

        events
    }

    fn next_head_position(&self) -> Point {
        let head = self.snake.head();
        match self.committed_direction {
            Direction::Up => Point::new(head.x, Self::wrapping_dec(head.y, self.grid_size)),
            Direction::Down => Point::new(head.x, Self::wrapping_inc(head.y, self.grid_size)),
            Direction::Left => Point::new(Self::wrapping_dec(head.x, self.grid_size), head.y),
            Direction::Right => Point::new(Self::wrapping_inc(head.x, self.grid_size), head.y),
        }
    }

    pub fn wrapping_inc(value: usize, max: usize) -> usize {
        if value + 1 >= max { 0 } else { value + 1 }
    }

    pub fn wrapping_dec(value: usize, max: usize) -> usize {
        if value == 0 { max - 1 } else { value - 1 }
    }

    /// Draws a food cell off the snake: uniform rejection sampling with a
    /// bounded number of attempts, then a uniform draw over the enumerated
    /// free cells once the grid is crowded. Callers guarantee at least one
    /// free cell exists.
    fn draw_food(rng: &mut SessionRng, snake: &Snake, grid_size: usize) -> Point {
        for _ in 0..FOOD_SAMPLING_ATTEMPTS {
            let pos = Point::new(
                rng.random_range(0..grid_size),
                rng.random_range(0..grid_size),
            );
            if !snake.contains(pos) {
                return pos;
            }
        }

        let free: Vec<Point> = (0..grid_size * grid_size)
            .map(|i| Point::new(i % grid_size, i / grid_size))
            .filter(|p| !snake.contains(*p))
            .collect();
        free[rng.random_range(0..free.len())]
    }

    pub fn snake_segments(&self) -> impl Iterator<Item = Point> + '_ {
        self.snake.segments()
    }

    pub fn snake_len(&self) -> usize {
        self.snake.len()
    }

    pub fn snake_head(&self) -> Point {
        self.snake.head()
    }

    pub fn snake_tail(&self) -> Point {
        self.snake.tail()
    }

    pub fn snake_contains(&self, pos: Point) -> bool {
        self.snake.contains(pos)
    }

    pub fn food_position(&self) -> Point {
        self.food
    }

    pub fn is_game_over(&self) -> bool {
        self.end_reason.is_some()
    }

    pub fn end_reason(&self) -> Option<GameEndReason> {
        self.end_reason
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    pub fn requested_direction(&self) -> Direction {
        self.requested_direction
    }

    pub fn committed_direction(&self) -> Direction {
        self.committed_direction
    }

    /// Current tick cadence: the base interval shortened by 10% per level
    /// above the first, floored at the configured minimum.
    pub fn current_update_interval(&self) -> Duration {
        let speedup = (f64::from(self.level - 1) * SPEEDUP_PER_LEVEL).min(1.0);
        let scaled = self.base_update_interval.mul_f64(1.0 - speedup);
        scaled.max(self.min_update_interval)
    }

    #[cfg(test)]
    pub(crate) fn debug_set_snake(&mut self, segments: &[Point], direction: Direction) {
        self.snake = Snake::from_segments(segments);
        self.requested_direction = direction;
        self.committed_direction = direction;
    }

    #[cfg(test)]
    pub(crate) fn debug_set_food(&mut self, pos: Point) {
        self.food = pos;
    }

    #[cfg(test)]
    pub(crate) fn debug_set_score(&mut self, score: u32) {
        self.score = score;
    }

    #[cfg(test)]
    pub(crate) fn debug_set_level(&mut self, level: u32) {
        self.level = level;
    }
}
