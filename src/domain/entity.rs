//! Actors: Player, Coin, Fireball family, plus the bare base actor.
//!
//! One `Actor` struct carries the shared geometry; `ActorKind` is the closed
//! set of behaviours. Per-tick update rules are a `match` on the kind:
//!
//! | Kind      | act(time)                                   | on obstacle      |
//! |-----------|---------------------------------------------|------------------|
//! | Base      | nothing                                     | -                |
//! | Player    | nothing (driven by the game loop)           | -                |
//! | Coin      | bob around `start_pos` by `SPRING_DIST`     | never collides   |
//! | Fireball  | move to `pos + speed*time` if terrain clear | Reverse or Reset |

use std::f64::consts::TAU;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use rand::Rng;

use super::physics::Terrain;
use super::vector::Vector;
use crate::error::{EngineError, Result};

// ── Constants ──

pub const DEFAULT_SIZE: Vector = Vector::new(1.0, 1.0);

pub const PLAYER_OFFSET: Vector = Vector::new(0.0, -0.5);
pub const PLAYER_SIZE: Vector = Vector::new(0.8, 1.5);

pub const COIN_OFFSET: Vector = Vector::new(0.2, 0.1);
pub const COIN_SIZE: Vector = Vector::new(0.6, 0.6);
/// Phase units per unit of time.
pub const SPRING_SPEED: f64 = 8.0;
/// Bob amplitude.
pub const SPRING_DIST: f64 = 0.07;

pub const FIREBALL_SIZE: Vector = Vector::new(1.0, 1.0);

// ── Identity ──

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique actor identity. Clones of an actor share it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ActorId(u64);

impl ActorId {
    fn next() -> Self {
        ActorId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Public type tag. All fireball variants report `Fireball`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ActorType {
    Actor,
    Player,
    Coin,
    Fireball,
}

impl ActorType {
    pub fn as_str(self) -> &'static str {
        match self {
            ActorType::Actor => "actor",
            ActorType::Player => "player",
            ActorType::Coin => "coin",
            ActorType::Fireball => "fireball",
        }
    }
}

impl fmt::Display for ActorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a fireball does when its next position is blocked.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Rebound {
    /// Flip velocity; the next tick retries in the opposite direction.
    Reverse,
    /// Teleport back to the spawn point, keep velocity.
    Reset,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FireballKind {
    /// Caller-supplied velocity.
    Plain,
    Horizontal, // '='
    Vertical,   // '|'
    Rain,       // 'v'
}

impl FireballKind {
    pub fn initial_speed(self) -> Option<Vector> {
        match self {
            FireballKind::Plain => None,
            FireballKind::Horizontal => Some(Vector::new(2.0, 0.0)),
            FireballKind::Vertical => Some(Vector::new(0.0, 2.0)),
            FireballKind::Rain => Some(Vector::new(0.0, 3.0)),
        }
    }

    pub fn rebound(self) -> Rebound {
        match self {
            FireballKind::Rain => Rebound::Reset,
            _ => Rebound::Reverse,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum ActorKind {
    Base,
    Player,
    Coin { start_pos: Vector, spring: f64 },
    Fireball { kind: FireballKind, start_pos: Vector },
}

// ══════════════════════════════════════════════════════════════
// Actor
// ══════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct Actor {
    id: ActorId,
    pub pos: Vector,
    pub size: Vector,
    pub speed: Vector,
    pub kind: ActorKind,
}

impl Actor {
    /// Base actor. Fails if any vector has a non-finite component.
    pub fn new(pos: Vector, size: Vector, speed: Vector) -> Result<Self> {
        Self::with_kind(ActorKind::Base, pos, size, speed)
    }

    fn with_kind(kind: ActorKind, pos: Vector, size: Vector, speed: Vector) -> Result<Self> {
        for (name, v) in [("pos", pos), ("size", size), ("speed", speed)] {
            if !v.is_finite() {
                return Err(EngineError::InvalidArgument(format!(
                    "actor {name} must be a finite vector, got ({}, {})",
                    v.x, v.y
                )));
            }
        }
        Ok(Actor { id: ActorId::next(), pos, size, speed, kind })
    }

    /// Player whose feet rest at `pos`: the hitbox is lifted by half a tile.
    pub fn player(pos: Vector) -> Result<Self> {
        Self::with_kind(ActorKind::Player, pos.plus(PLAYER_OFFSET), PLAYER_SIZE, Vector::ZERO)
    }

    /// Coin anchored in the tile at `pos`, with a random bob phase.
    pub fn coin(pos: Vector) -> Result<Self> {
        let spring = rand::rng().random_range(0.0..TAU);
        Self::coin_with_phase(pos, spring)
    }

    pub fn coin_with_phase(pos: Vector, spring: f64) -> Result<Self> {
        if !spring.is_finite() {
            return Err(EngineError::InvalidArgument(format!("coin phase must be finite, got {spring}")));
        }
        let start_pos = pos.plus(COIN_OFFSET);
        Self::with_kind(ActorKind::Coin { start_pos, spring }, start_pos, COIN_SIZE, Vector::ZERO)
    }

    /// Fireball with a caller-chosen velocity that bounces off obstacles.
    pub fn fireball(pos: Vector, speed: Vector) -> Result<Self> {
        Self::fireball_of(FireballKind::Plain, pos, speed)
    }

    pub fn horizontal_fireball(pos: Vector) -> Result<Self> {
        Self::preset_fireball(FireballKind::Horizontal, pos)
    }

    pub fn vertical_fireball(pos: Vector) -> Result<Self> {
        Self::preset_fireball(FireballKind::Vertical, pos)
    }

    pub fn fire_rain(pos: Vector) -> Result<Self> {
        Self::preset_fireball(FireballKind::Rain, pos)
    }

    fn preset_fireball(kind: FireballKind, pos: Vector) -> Result<Self> {
        Self::fireball_of(kind, pos, kind.initial_speed().unwrap_or(Vector::ZERO))
    }

    fn fireball_of(kind: FireballKind, pos: Vector, speed: Vector) -> Result<Self> {
        Self::with_kind(ActorKind::Fireball { kind, start_pos: pos }, pos, FIREBALL_SIZE, speed)
    }

    // ── Accessors ──

    pub fn id(&self) -> ActorId {
        self.id
    }

    pub fn actor_type(&self) -> ActorType {
        match self.kind {
            ActorKind::Base => ActorType::Actor,
            ActorKind::Player => ActorType::Player,
            ActorKind::Coin { .. } => ActorType::Coin,
            ActorKind::Fireball { .. } => ActorType::Fireball,
        }
    }

    /// Spawn point for coins and fireballs.
    pub fn start_pos(&self) -> Option<Vector> {
        match self.kind {
            ActorKind::Coin { start_pos, .. } | ActorKind::Fireball { start_pos, .. } => Some(start_pos),
            _ => None,
        }
    }

    pub fn spring(&self) -> Option<f64> {
        match self.kind {
            ActorKind::Coin { spring, .. } => Some(spring),
            _ => None,
        }
    }

    #[inline]
    pub fn left(&self) -> f64 {
        self.pos.x
    }

    #[inline]
    pub fn top(&self) -> f64 {
        self.pos.y
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.pos.y + self.size.y
    }

    // ── Collision ──

    /// Strict axis-aligned overlap. Shared edges do not intersect, and an
    /// actor never intersects itself (or a clone of itself).
    pub fn is_intersect(&self, other: &Actor) -> bool {
        if other.id == self.id {
            return false;
        }
        other.left() < self.right()
            && other.top() < self.bottom()
            && other.right() > self.left()
            && other.bottom() > self.top()
    }

    // ── Motion ──

    pub fn next_position(&self, time: f64) -> Vector {
        self.pos.plus(self.speed.times(time))
    }

    /// Per-tick update.
    pub fn act<T: Terrain + ?Sized>(&mut self, time: f64, terrain: &T) {
        match self.kind {
            ActorKind::Base | ActorKind::Player => {}
            ActorKind::Coin { start_pos, spring } => {
                let spring = spring + SPRING_SPEED * time;
                self.kind = ActorKind::Coin { start_pos, spring };
                self.pos = start_pos.plus(Vector::new(0.0, SPRING_DIST * spring.sin()));
            }
            ActorKind::Fireball { .. } => {
                let next = self.next_position(time);
                match terrain.obstacle_at(next, self.size) {
                    Some(_) => self.handle_obstacle(),
                    None => self.pos = next,
                }
            }
        }
    }

    /// Fireball obstacle reaction. No-op for other kinds.
    pub fn handle_obstacle(&mut self) {
        if let ActorKind::Fireball { kind, start_pos } = self.kind {
            match kind.rebound() {
                Rebound::Reverse => {
                    self.speed = self.speed.times(-1.0);
                    log::debug!("{:?} fireball {:?} reversed to {:?}", kind, self.id, self.speed);
                }
                Rebound::Reset => {
                    self.pos = start_pos;
                    log::debug!("{:?} fireball {:?} reset to {:?}", kind, self.id, start_pos);
                }
            }
        }
    }
}

impl Default for Actor {
    fn default() -> Self {
        Actor {
            id: ActorId::next(),
            pos: Vector::ZERO,
            size: DEFAULT_SIZE,
            speed: Vector::ZERO,
            kind: ActorKind::Base,
        }
    }
}

/// Frame input for the player, sampled by the game loop.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Controls {
    pub left: bool,
    pub right: bool,
    pub up: bool,
}
