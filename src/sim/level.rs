//! Level: the tile grid, the live actor list and the win/loss latch.
//!
//! ## Status
//!
//!   `None` (running) → `Some(Won)` | `Some(Lost)`
//!
//! The first resolution wins; a set status never changes again. After it is
//! set the game loop counts `finish_delay` down and stops once
//! `is_finished()`.
//!
//! ## Actor order
//!
//! `actors` keeps parse order. `player` is the first player found at
//! construction, and `actor_at` returns the first match in list order.

use std::fmt;

use crate::domain::entity::{Actor, ActorId, ActorType};
use crate::domain::physics::{Grid, Terrain};
use crate::domain::tile::Obstacle;
use crate::domain::vector::Vector;
use super::event::Touch;

pub const FINISH_DELAY: f64 = 1.0;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Status {
    Won,
    Lost,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Won => "won",
            Status::Lost => "lost",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug)]
pub struct Level {
    grid: Grid,
    actors: Vec<Actor>,
    player: Option<ActorId>,
    status: Option<Status>,
    finish_delay: f64,
}

impl Level {
    pub fn new(grid: Vec<Vec<Option<Obstacle>>>, actors: Vec<Actor>) -> Self {
        let player = actors
            .iter()
            .find(|a| a.actor_type() == ActorType::Player)
            .map(Actor::id);
        Level {
            grid: Grid::new(grid),
            actors,
            player,
            status: None,
            finish_delay: FINISH_DELAY,
        }
    }

    // ── Accessors ──

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.iter().find(|a| a.id() == id)
    }

    /// The player captured at construction, if it is still in the level.
    pub fn player(&self) -> Option<&Actor> {
        self.player.and_then(|id| self.actor(id))
    }

    pub fn player_mut(&mut self) -> Option<&mut Actor> {
        let id = self.player?;
        self.actors.iter_mut().find(|a| a.id() == id)
    }

    pub fn status(&self) -> Option<Status> {
        self.status
    }

    pub fn finish_delay(&self) -> f64 {
        self.finish_delay
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_some() && self.finish_delay < 0.0
    }

    // ── Queries ──

    /// First actor (list order) overlapping `actor`. Never `actor` itself.
    pub fn actor_at(&self, actor: &Actor) -> Option<&Actor> {
        self.actors.iter().find(|a| a.is_intersect(actor))
    }

    pub fn obstacle_at(&self, at: Vector, size: Vector) -> Option<Obstacle> {
        self.grid.obstacle_at(at, size)
    }

    pub fn no_more_actors(&self, actor_type: ActorType) -> bool {
        !self.actors.iter().any(|a| a.actor_type() == actor_type)
    }

    pub fn count_of(&self, actor_type: ActorType) -> usize {
        self.actors.iter().filter(|a| a.actor_type() == actor_type).count()
    }

    // ── Mutation ──

    /// Remove `actor` (by identity). No-op if it is not in the level.
    pub fn remove_actor(&mut self, actor: &Actor) {
        if let Some(idx) = self.actors.iter().position(|a| a.id() == actor.id()) {
            self.actors.remove(idx);
        }
    }

    /// Resolve a touch reported by the game loop.
    ///
    /// Ignored once a status is latched. Lava and fireballs lose the level.
    /// A coin touch removes that coin and wins when none are left. Anything
    /// else (walls, plain actors) is ignored.
    pub fn player_touched(&mut self, touch: Touch, actor: Option<&Actor>) {
        if self.status.is_some() {
            return;
        }

        if touch.is_deadly() {
            self.set_status(Status::Lost, touch);
        }

        if touch == Touch::Actor(ActorType::Coin) {
            if let Some(coin) = actor.filter(|a| a.actor_type() == ActorType::Coin) {
                self.remove_actor(coin);
                log::debug!("coin {:?} collected", coin.id());
                if self.no_more_actors(ActorType::Coin) {
                    self.set_status(Status::Won, touch);
                }
            }
        }
    }

    fn set_status(&mut self, status: Status, cause: Touch) {
        log::info!("level {status} (touched {cause})");
        self.status = Some(status);
    }

    /// Count the post-resolution delay down. Only runs once a status is set.
    pub fn count_down(&mut self, step: f64) {
        if self.status.is_some() {
            self.finish_delay -= step;
        }
    }

    /// Advance every live actor by `time`, in list order.
    pub fn act_all(&mut self, time: f64) {
        let Level { grid, actors, .. } = self;
        for actor in actors.iter_mut() {
            actor.act(time, &*grid);
        }
    }
}

impl Terrain for Level {
    fn obstacle_at(&self, at: Vector, size: Vector) -> Option<Obstacle> {
        self.grid.obstacle_at(at, size)
    }
}
