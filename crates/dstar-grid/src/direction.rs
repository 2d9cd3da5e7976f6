use std::f64::consts::SQRT_2;

use enumset::{EnumSet, EnumSetType};

/// The eight moves of an 8-connected grid. North is towards `y - 1`.
#[derive(EnumSetType, Debug, Hash)]
pub enum Direction {
    North,
    West,
    South,
    East,
    NorthWest,
    SouthWest,
    SouthEast,
    NorthEast,
}

impl Direction {
    /// Coordinate offset of a single step in this direction.
    pub fn offset(self) -> (i32, i32) {
        use Direction::*;
        match self {
            North => (0, -1),
            West => (-1, 0),
            South => (0, 1),
            East => (1, 0),
            NorthWest => (-1, -1),
            SouthWest => (-1, 1),
            SouthEast => (1, 1),
            NorthEast => (1, -1),
        }
    }

    pub fn is_diagonal(self) -> bool {
        Direction::diagonals().contains(self)
    }

    /// Euclidean length of a step: 1 orthogonally, √2 diagonally.
    pub fn cost(self) -> f64 {
        if self.is_diagonal() {
            SQRT_2
        } else {
            1.0
        }
    }

    pub fn diagonals() -> EnumSet<Direction> {
        use Direction::*;
        NorthWest | SouthWest | SouthEast | NorthEast
    }

    /// Direction of a single step from `from` to `to`, if they are 8-adjacent.
    pub fn between(from: (i32, i32), to: (i32, i32)) -> Option<Direction> {
        let delta = (to.0 - from.0, to.1 - from.1);
        EnumSet::<Direction>::all()
            .into_iter()
            .find(|dir| dir.offset() == delta)
    }
}

#[test]
fn steps_round_trip_through_offsets() {
    for dir in EnumSet::<Direction>::all() {
        let (dx, dy) = dir.offset();
        assert_eq!(Direction::between((3, 3), (3 + dx, 3 + dy)), Some(dir));
        assert_eq!(dir.cost() > 1.0, dx != 0 && dy != 0);
    }
    assert_eq!(Direction::between((0, 0), (2, 0)), None);
    assert_eq!(Direction::between((1, 1), (1, 1)), None);
}
