use crate::{Result, error::Error};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Grid position of a robot.
///
/// Coordinates are signed integers; the target of every session is the
/// origin `(0, 0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coords {
    pub x: i32,
    pub y: i32,
}

impl Coords {
    /// The navigation target.
    pub const ORIGIN: Coords = Coords { x: 0, y: 0 };

    #[must_use]
    pub fn new(x: i32, y: i32) -> Self {
        Coords { x, y }
    }

    /// Returns `true` if this position is the origin.
    #[inline]
    #[must_use]
    pub fn is_origin(&self) -> bool {
        *self == Coords::ORIGIN
    }

    /// The adjacent cell one step in the given direction.
    #[must_use]
    pub fn step(&self, heading: Heading) -> Coords {
        let (dx, dy) = heading.delta();
        Coords {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl fmt::Display for Coords {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Cardinal direction a robot is facing.
///
/// The discriminants form a clockwise ring so that rotation is modular
/// arithmetic on the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Heading {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

impl Heading {
    const RING: [Heading; 4] = [Heading::North, Heading::East, Heading::South, Heading::West];

    /// Heading after a 90° right turn.
    #[must_use]
    pub fn turned_right(self) -> Heading {
        Self::RING[(self as usize + 1) % 4]
    }

    /// Heading after a 90° left turn.
    #[must_use]
    pub fn turned_left(self) -> Heading {
        Self::RING[(self as usize + 3) % 4]
    }

    /// Coordinate delta of one forward move.
    #[must_use]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Heading::North => (0, 1),
            Heading::East => (1, 0),
            Heading::South => (0, -1),
            Heading::West => (-1, 0),
        }
    }

    /// Returns `true` for East/West.
    #[inline]
    #[must_use]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Heading::East | Heading::West)
    }

    /// Number of right turns needed to face `target` from `self` (0-3).
    #[must_use]
    pub fn right_turns_to(self, target: Heading) -> u8 {
        ((target as u8).wrapping_sub(self as u8)) % 4
    }

    /// Infer the heading from two positions reported around a forward move.
    ///
    /// Only the sign of the delta matters; the positions must differ in
    /// exactly one axis.
    ///
    /// # Errors
    /// Returns `Error::Syntax` if the positions are equal or differ in both
    /// axes, since no single move can produce such a delta.
    pub fn from_step(from: Coords, to: Coords) -> Result<Heading> {
        match ((to.x - from.x).signum(), (to.y - from.y).signum()) {
            (0, 1) => Ok(Heading::North),
            (0, -1) => Ok(Heading::South),
            (1, 0) => Ok(Heading::East),
            (-1, 0) => Ok(Heading::West),
            _ => Err(Error::syntax(format!(
                "cannot infer heading from {from} -> {to}"
            ))),
        }
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Heading::North => write!(f, "North"),
            Heading::East => write!(f, "East"),
            Heading::South => write!(f, "South"),
            Heading::West => write!(f, "West"),
        }
    }
}

/// One entry of the authentication key table.
///
/// The table index is the Key ID a robot selects during the handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPair {
    pub server_key: u16,
    pub client_key: u16,
}

impl KeyPair {
    #[must_use]
    pub fn new(server_key: u16, client_key: u16) -> Self {
        KeyPair {
            server_key,
            client_key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Heading::North, Heading::East)]
    #[case(Heading::East, Heading::South)]
    #[case(Heading::South, Heading::West)]
    #[case(Heading::West, Heading::North)]
    fn turned_right_cycles_clockwise(#[case] from: Heading, #[case] expected: Heading) {
        assert_eq!(from.turned_right(), expected);
        assert_eq!(expected.turned_left(), from);
    }

    #[rstest]
    #[case(Heading::North)]
    #[case(Heading::East)]
    #[case(Heading::South)]
    #[case(Heading::West)]
    fn four_turns_restore_heading(#[case] heading: Heading) {
        let mut h = heading;
        for _ in 0..4 {
            h = h.turned_right();
        }
        assert_eq!(h, heading);

        for _ in 0..4 {
            h = h.turned_left();
        }
        assert_eq!(h, heading);
    }

    #[rstest]
    #[case(Coords::new(0, 0), Coords::new(0, 1), Heading::North)]
    #[case(Coords::new(0, 0), Coords::new(0, -1), Heading::South)]
    #[case(Coords::new(0, 0), Coords::new(1, 0), Heading::East)]
    #[case(Coords::new(0, 0), Coords::new(-1, 0), Heading::West)]
    #[case(Coords::new(3, -7), Coords::new(2, -7), Heading::West)]
    fn heading_from_step(#[case] from: Coords, #[case] to: Coords, #[case] expected: Heading) {
        assert_eq!(Heading::from_step(from, to).unwrap(), expected);
    }

    #[rstest]
    #[case(Coords::new(0, 0), Coords::new(0, 0))]
    #[case(Coords::new(0, 0), Coords::new(1, 1))]
    #[case(Coords::new(2, 2), Coords::new(1, 3))]
    fn heading_from_impossible_step(#[case] from: Coords, #[case] to: Coords) {
        assert!(Heading::from_step(from, to).is_err());
    }

    #[test]
    fn step_follows_delta() {
        let c = Coords::new(2, -1);
        assert_eq!(c.step(Heading::North), Coords::new(2, 0));
        assert_eq!(c.step(Heading::South), Coords::new(2, -2));
        assert_eq!(c.step(Heading::East), Coords::new(3, -1));
        assert_eq!(c.step(Heading::West), Coords::new(1, -1));
    }

    #[rstest]
    #[case(Heading::North, Heading::North, 0)]
    #[case(Heading::North, Heading::East, 1)]
    #[case(Heading::North, Heading::South, 2)]
    #[case(Heading::North, Heading::West, 3)]
    #[case(Heading::West, Heading::South, 3)]
    fn right_turn_distance(#[case] from: Heading, #[case] to: Heading, #[case] expected: u8) {
        assert_eq!(from.right_turns_to(to), expected);
    }

    #[test]
    fn origin_detection() {
        assert!(Coords::ORIGIN.is_origin());
        assert!(!Coords::new(0, 1).is_origin());
        assert_eq!(format!("{}", Coords::new(-3, 5)), "(-3, 5)");
    }
}
