//! Stage: the board, the snake, the food and the score

use std::collections::VecDeque;

use rand::Rng;

use super::direction::Direction;
use super::food::Food;
use super::location::Coordinates;
use crate::config::BoardConfig;
use crate::protocol::StageSnapshot;

/// Complete simulation state at one instant
#[derive(Debug, Clone)]
pub struct Stage {
    board: BoardConfig,
    width_cells: i32,
    height_cells: i32,
    /// Snake body segments (head is front, tail is back)
    body: VecDeque<Coordinates>,
    food: Food,
    score: u32,
    /// Current heading, never `Continue`
    direction: Direction,
}

impl Stage {
    /// Fresh stage for the given board
    pub fn new<R: Rng + ?Sized>(board: BoardConfig, rng: &mut R) -> Self {
        let width_cells = board.width_cells();
        let height_cells = board.height_cells();

        Self {
            board,
            width_cells,
            height_cells,
            body: initial_body(board.snake_size),
            food: Food::random(rng, width_cells, height_cells),
            score: 0,
            direction: Direction::Right,
        }
    }

    /// Replace everything with a freshly initialized stage
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        *self = Stage::new(self.board, rng);
    }

    pub fn width_cells(&self) -> i32 {
        self.width_cells
    }

    pub fn height_cells(&self) -> i32 {
        self.height_cells
    }

    pub fn head(&self) -> Coordinates {
        // The body is never empty: it starts at snake_size >= 1 and only grows
        self.body.front().copied().unwrap_or_default()
    }

    pub fn body(&self) -> &VecDeque<Coordinates> {
        &self.body
    }

    pub fn food(&self) -> Coordinates {
        self.food.location
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Take a new heading. `Continue` keeps the current one.
    pub(super) fn turn(&mut self, direction: Direction) {
        if direction != Direction::Continue {
            self.direction = direction;
        }
    }

    /// Move without growing: the tail cell becomes the new head
    pub(super) fn advance_to(&mut self, head: Coordinates) {
        self.body.pop_back();
        self.body.push_front(head);
    }

    /// Eat: prepend the new head keeping the tail, score, and move the food
    pub(super) fn grow_to<R: Rng + ?Sized>(&mut self, head: Coordinates, rng: &mut R) {
        self.body.push_front(head);
        self.score += 1;
        self.food.respawn(rng, self.width_cells, self.height_cells);
    }

    #[cfg(test)]
    pub(crate) fn place_food(&mut self, location: Coordinates) {
        self.food = Food::at(location);
    }

    #[cfg(test)]
    pub(crate) fn set_body(&mut self, cells: &[(i32, i32)]) {
        self.body = cells.iter().map(|&(x, y)| Coordinates::new(x, y)).collect();
    }

    /// Convert to a snapshot for protocol messages
    pub fn to_snapshot(&self) -> StageSnapshot {
        StageSnapshot {
            width_cells: self.width_cells,
            height_cells: self.height_cells,
            cell_size: self.board.cell_size,
            snake: self.body.iter().copied().collect(),
            food: self.food.location,
            score: self.score,
            direction: self.direction,
        }
    }
}

/// `(0,0) .. (size-1,0)` heading right; the leftmost cell is the tail
fn initial_body(snake_size: usize) -> VecDeque<Coordinates> {
    (0..snake_size.max(1) as i32)
        .rev()
        .map(|x| Coordinates::new(x, 0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_new_stage() {
        let mut rng = StdRng::seed_from_u64(3);
        let board = BoardConfig {
            snake_size: 3,
            ..BoardConfig::default()
        };
        let stage = Stage::new(board, &mut rng);

        assert_eq!(stage.score(), 0);
        assert_eq!(stage.direction(), Direction::Right);
        assert_eq!(stage.body().len(), 3);
        assert_eq!(stage.head(), Coordinates::new(2, 0));
        assert_eq!(stage.body().back(), Some(&Coordinates::new(0, 0)));
        assert!(stage.food().is_within(18, 18));
    }

    #[test]
    fn test_turn_ignores_continue() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut stage = Stage::new(BoardConfig::default(), &mut rng);

        stage.turn(Direction::Down);
        assert_eq!(stage.direction(), Direction::Down);
        stage.turn(Direction::Continue);
        assert_eq!(stage.direction(), Direction::Down);
    }

    #[test]
    fn test_advance_keeps_length() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut stage = Stage::new(BoardConfig::default(), &mut rng);

        stage.advance_to(Coordinates::new(2, 0));
        assert_eq!(stage.body().len(), 2);
        assert_eq!(stage.head(), Coordinates::new(2, 0));
        assert_eq!(stage.body().back(), Some(&Coordinates::new(1, 0)));
    }

    #[test]
    fn test_grow_adds_segment_and_score() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut stage = Stage::new(BoardConfig::default(), &mut rng);

        stage.grow_to(Coordinates::new(2, 0), &mut rng);
        assert_eq!(stage.body().len(), 3);
        assert_eq!(stage.score(), 1);
        assert_eq!(stage.body().back(), Some(&Coordinates::new(0, 0)));
    }

    #[test]
    fn test_reset_restores_initial_layout() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut stage = Stage::new(BoardConfig::default(), &mut rng);
        stage.grow_to(Coordinates::new(2, 0), &mut rng);
        stage.turn(Direction::Down);

        stage.reset(&mut rng);
        assert_eq!(stage.score(), 0);
        assert_eq!(stage.direction(), Direction::Right);
        assert_eq!(
            stage.body().iter().copied().collect::<Vec<_>>(),
            vec![Coordinates::new(1, 0), Coordinates::new(0, 0)]
        );
    }

    #[test]
    fn test_snapshot() {
        let mut rng = StdRng::seed_from_u64(3);
        let stage = Stage::new(BoardConfig::default(), &mut rng);
        let snapshot = stage.to_snapshot();

        assert_eq!(snapshot.width_cells, 18);
        assert_eq!(snapshot.cell_size, 20);
        assert_eq!(snapshot.snake.len(), 2);
        assert_eq!(snapshot.food, stage.food());
    }
}
