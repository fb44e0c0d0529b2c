use std::collections::{HashSet, VecDeque};

use super::types::{Direction, Point};

const INITIAL_LENGTH: usize = 3;

/// Body segments ordered head first, paired with a hash index for O(1)
/// occupancy checks. The two structures always describe the same cells.
#[derive(Clone, Debug)]
pub struct Snake {
    body: VecDeque<Point>,
    body_set: HashSet<Point>,
}

impl Snake {
    /// Builds the starting snake: head at `start_pos`, remaining segments
    /// extending away from `direction`, wrapped on the grid.
    pub fn new(start_pos: Point, direction: Direction, grid_size: usize) -> Self {
        let (dx, dy) = match direction {
            Direction::Up => (0i32, 1i32),
            Direction::Down => (0i32, -1i32),
            Direction::Left => (1i32, 0i32),
            Direction::Right => (-1i32, 0i32),
        };

        let size = grid_size as i32;
        let mut body = VecDeque::new();
        let mut body_set = HashSet::new();
        let mut segment = start_pos;
        for _ in 0..INITIAL_LENGTH {
            body.push_back(segment);
            body_set.insert(segment);
            segment = Point::new(
                ((segment.x as i32 + dx + size) % size) as usize,
                ((segment.y as i32 + dy + size) % size) as usize,
            );
        }

        Self { body, body_set }
    }

    pub fn head(&self) -> Point {
        *self
            .body
            .front()
            .expect("Snake body should never be empty")
    }

    pub fn tail(&self) -> Point {
        *self
            .body
            .back()
            .expect("Snake body should never be empty")
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn contains(&self, pos: Point) -> bool {
        self.body_set.contains(&pos)
    }

    pub fn segments(&self) -> impl Iterator<Item = Point> + '_ {
        self.body.iter().copied()
    }

    pub fn push_head(&mut self, pos: Point) {
        self.body.push_front(pos);
        self.body_set.insert(pos);
    }

    /// Callers moving the head into the vacated tail cell must pop the
    /// tail before pushing the head, or the occupancy index loses a cell.
    pub fn pop_tail(&mut self) {
        let tail = self
            .body
            .pop_back()
            .expect("Snake body should never be empty");
        self.body_set.remove(&tail);
    }

    #[cfg(test)]
    pub(crate) fn from_segments(segments: &[Point]) -> Self {
        Self {
            body: segments.iter().copied().collect(),
            body_set: segments.iter().copied().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_extends_away_from_heading() {
        let snake = Snake::new(Point::new(10, 10), Direction::Right, 20);
        let segments: Vec<Point> = snake.segments().collect();
        assert_eq!(
            segments,
            vec![Point::new(10, 10), Point::new(9, 10), Point::new(8, 10)]
        );
    }

    #[test]
    fn test_new_wraps_near_the_edge() {
        let snake = Snake::new(Point::new(0, 4), Direction::Right, 20);
        let segments: Vec<Point> = snake.segments().collect();
        assert_eq!(
            segments,
            vec![Point::new(0, 4), Point::new(19, 4), Point::new(18, 4)]
        );
    }

    #[test]
    fn test_push_and_pop_keep_the_index_in_sync() {
        let mut snake = Snake::new(Point::new(10, 10), Direction::Right, 20);

        snake.push_head(Point::new(11, 10));
        assert_eq!(snake.len(), 4);
        assert!(snake.contains(Point::new(11, 10)));

        snake.pop_tail();
        assert_eq!(snake.len(), 3);
        assert!(!snake.contains(Point::new(8, 10)));
        assert_eq!(snake.head(), Point::new(11, 10));
        assert_eq!(snake.tail(), Point::new(9, 10));
    }

    #[test]
    fn test_tail_cell_reuse_keeps_the_index_consistent() {
        // Head moves into the cell the tail is vacating on the same tick.
        let mut snake = Snake::from_segments(&[
            Point::new(5, 5),
            Point::new(6, 5),
            Point::new(6, 6),
            Point::new(5, 6),
        ]);

        let target = snake.tail();
        snake.pop_tail();
        snake.push_head(target);

        assert_eq!(snake.len(), 4);
        assert!(snake.contains(target));
        assert_eq!(snake.head(), Point::new(5, 6));
    }
}
