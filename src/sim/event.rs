//! Touch reports going into the level, and events coming out of a step.
//! The presentation layer consumes `LevelEvent`s for messages and logging.

use std::fmt;

use crate::domain::entity::ActorType;
use crate::domain::tile::Obstacle;

/// What the player touched: a terrain tag or another actor's type tag.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Touch {
    Obstacle(Obstacle),
    Actor(ActorType),
}

impl Touch {
    pub fn as_str(self) -> &'static str {
        match self {
            Touch::Obstacle(o) => o.as_str(),
            Touch::Actor(t) => t.as_str(),
        }
    }

    /// Lava and fireballs end the level as lost.
    pub fn is_deadly(self) -> bool {
        matches!(self, Touch::Obstacle(Obstacle::Lava) | Touch::Actor(ActorType::Fireball))
    }
}

impl From<Obstacle> for Touch {
    fn from(o: Obstacle) -> Self {
        Touch::Obstacle(o)
    }
}

impl From<ActorType> for Touch {
    fn from(t: ActorType) -> Self {
        Touch::Actor(t)
    }
}

impl fmt::Display for Touch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum LevelEvent {
    CoinCollected { x: f64, y: f64, remaining: usize },
    PlayerBurned,
    PlayerHit,
    LevelWon,
    LevelLost,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deadly_touches() {
        assert!(Touch::from(Obstacle::Lava).is_deadly());
        assert!(Touch::from(ActorType::Fireball).is_deadly());
        assert!(!Touch::from(Obstacle::Wall).is_deadly());
        assert!(!Touch::from(ActorType::Coin).is_deadly());
        assert!(!Touch::from(ActorType::Player).is_deadly());
    }

    #[test]
    fn tags() {
        assert_eq!(Touch::from(Obstacle::Wall).to_string(), "wall");
        assert_eq!(Touch::from(ActorType::Coin).to_string(), "coin");
    }
}
