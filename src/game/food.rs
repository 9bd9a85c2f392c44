//! Food placement

use rand::Rng;

use super::location::Coordinates;

/// The single food item on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Food {
    pub location: Coordinates,
}

impl Food {
    /// Food at a random cell. Snake occupancy is not consulted, so food may
    /// land underneath the body.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, width: i32, height: i32) -> Self {
        Self {
            location: Coordinates::random(rng, width, height),
        }
    }

    /// Create food at a specific location
    pub fn at(location: Coordinates) -> Self {
        Self { location }
    }

    /// Respawn food at a new random position
    pub fn respawn<R: Rng + ?Sized>(&mut self, rng: &mut R, width: i32, height: i32) {
        self.location = Coordinates::random(rng, width, height);
    }
}
