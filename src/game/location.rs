//! Grid coordinates

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::direction::Direction;

/// A cell index on the game grid (not pixels)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinates {
    pub x: i32,
    pub y: i32,
}

impl Coordinates {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The cell one step away in `direction`. No wrapping: the result may
    /// lie outside the board.
    ///
    /// `direction` must be a real heading; resolve `Continue` first.
    pub fn adjacent(&self, direction: Direction) -> Coordinates {
        debug_assert_ne!(direction, Direction::Continue, "Continue has no heading");
        let (dx, dy) = direction.delta();
        Coordinates::new(self.x + dx, self.y + dy)
    }

    /// Whether the cell lies on a `width` x `height` board
    pub fn is_within(&self, width: i32, height: i32) -> bool {
        (0..width).contains(&self.x) && (0..height).contains(&self.y)
    }

    /// Uniformly random cell on a `width` x `height` board
    pub fn random<R: Rng + ?Sized>(rng: &mut R, width: i32, height: i32) -> Self {
        let x = rng.gen_range(0..width.max(1));
        let y = rng.gen_range(0..height.max(1));
        Coordinates::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_adjacent() {
        let loc = Coordinates::new(5, 5);

        assert_eq!(loc.adjacent(Direction::Up), Coordinates::new(5, 4));
        assert_eq!(loc.adjacent(Direction::Down), Coordinates::new(5, 6));
        assert_eq!(loc.adjacent(Direction::Left), Coordinates::new(4, 5));
        assert_eq!(loc.adjacent(Direction::Right), Coordinates::new(6, 5));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "Continue has no heading")]
    fn test_adjacent_rejects_continue() {
        Coordinates::new(5, 5).adjacent(Direction::Continue);
    }

    #[test]
    fn test_no_wrap_around() {
        let corner = Coordinates::new(0, 0);
        assert_eq!(corner.adjacent(Direction::Left), Coordinates::new(-1, 0));
        assert!(!corner.adjacent(Direction::Left).is_within(18, 18));
        assert!(!Coordinates::new(18, 3).is_within(18, 18));
        assert!(Coordinates::new(17, 17).is_within(18, 18));
    }

    #[test]
    fn test_random_stays_on_board() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let cell = Coordinates::random(&mut rng, 4, 3);
            assert!(cell.is_within(4, 3));
        }
    }
}
