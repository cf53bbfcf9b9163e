//! Obstacle tags stored in the level grid.
//!
//! A grid cell is `Option<Obstacle>`: `None` is open space. Symbol mapping
//! lives here so tile semantics stay in one place.

use std::fmt;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Obstacle {
    Wall,
    Lava,
}

impl Obstacle {
    /// `'x'` is a wall, `'!'` is lava, everything else is open space.
    pub fn from_symbol(symbol: char) -> Option<Obstacle> {
        match symbol {
            'x' => Some(Obstacle::Wall),
            '!' => Some(Obstacle::Lava),
            _ => None,
        }
    }

    /// Does touching this obstacle kill the player?
    pub fn is_deadly(self) -> bool {
        matches!(self, Obstacle::Lava)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Obstacle::Wall => "wall",
            Obstacle::Lava => "lava",
        }
    }
}

impl fmt::Display for Obstacle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols() {
        assert_eq!(Obstacle::from_symbol('x'), Some(Obstacle::Wall));
        assert_eq!(Obstacle::from_symbol('!'), Some(Obstacle::Lava));
        assert_eq!(Obstacle::from_symbol(' '), None);
        assert_eq!(Obstacle::from_symbol('@'), None);
        assert_eq!(Obstacle::from_symbol('X'), None);
    }

    #[test]
    fn tags() {
        assert_eq!(Obstacle::Wall.to_string(), "wall");
        assert_eq!(Obstacle::Lava.to_string(), "lava");
        assert!(Obstacle::Lava.is_deadly());
        assert!(!Obstacle::Wall.is_deadly());
    }
}
