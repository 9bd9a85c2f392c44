//! Collision detection logic

use std::collections::VecDeque;

use super::location::Coordinates;

/// What the candidate head ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    /// One cell past a board edge
    Wall,
    /// A body cell other than the current tail
    SelfBody,
}

impl Collision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collision::Wall => "wall",
            Collision::SelfBody => "self_collision",
        }
    }
}

/// Check a candidate head against the walls and the current body.
///
/// Cells equal to the current tail are skipped because the tail vacates this
/// step. Self collision is not reported on the first pass after a reset.
pub fn check_collision(
    candidate: Coordinates,
    body: &VecDeque<Coordinates>,
    width: i32,
    height: i32,
    initial_pass: bool,
) -> Option<Collision> {
    if !candidate.is_within(width, height) {
        return Some(Collision::Wall);
    }

    if initial_pass {
        return None;
    }

    let tail = body.back()?;

    let hits_body = body
        .iter()
        .filter(|cell| *cell != tail)
        .any(|cell| *cell == candidate);

    hits_body.then_some(Collision::SelfBody)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(cells: &[(i32, i32)]) -> VecDeque<Coordinates> {
        cells.iter().map(|&(x, y)| Coordinates::new(x, y)).collect()
    }

    #[test]
    fn test_no_collision() {
        let snake = body(&[(1, 0), (0, 0)]);
        assert_eq!(check_collision(Coordinates::new(2, 0), &snake, 18, 18, false), None);
    }

    #[test]
    fn test_wall_collisions() {
        let snake = body(&[(0, 0)]);
        for cell in [(-1, 0), (18, 0), (0, -1), (0, 18)] {
            let candidate = Coordinates::new(cell.0, cell.1);
            assert_eq!(
                check_collision(candidate, &snake, 18, 18, false),
                Some(Collision::Wall)
            );
        }
    }

    #[test]
    fn test_wall_checked_on_initial_pass() {
        let snake = body(&[(0, 0)]);
        assert_eq!(
            check_collision(Coordinates::new(-1, 0), &snake, 18, 18, true),
            Some(Collision::Wall)
        );
    }

    #[test]
    fn test_self_collision() {
        // Head at (1,1) turning back into the segment at (1,2)
        let snake = body(&[(1, 1), (1, 2), (2, 2), (2, 1)]);
        assert_eq!(
            check_collision(Coordinates::new(1, 2), &snake, 18, 18, false),
            Some(Collision::SelfBody)
        );
    }

    #[test]
    fn test_tail_cell_is_free() {
        // Moving into the cell the tail is about to leave
        let snake = body(&[(1, 1), (1, 2), (2, 2), (2, 1)]);
        assert_eq!(check_collision(Coordinates::new(2, 1), &snake, 18, 18, false), None);
    }

    #[test]
    fn test_initial_pass_skips_self_collision() {
        let snake = body(&[(2, 0), (1, 0), (0, 0)]);
        assert_eq!(check_collision(Coordinates::new(1, 0), &snake, 18, 18, true), None);
        assert_eq!(
            check_collision(Coordinates::new(1, 0), &snake, 18, 18, false),
            Some(Collision::SelfBody)
        );
    }
}
