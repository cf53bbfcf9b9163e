//! Ember Runner: a tile-based platformer engine.
//!
//! Levels are grids of walls and lava populated by actors (the player,
//! coins and fireballs). `sim::parser` builds a `Level` from row strings,
//! `sim::step::advance` moves it forward in time, and `ui` draws it to a
//! terminal.

pub mod config;
pub mod domain;
pub mod error;
pub mod sim;
pub mod ui;

pub use domain::entity::{Actor, ActorType, Controls};
pub use domain::tile::Obstacle;
pub use domain::vector::Vector;
pub use error::{EngineError, Result};
pub use sim::level::{Level, Status};
pub use sim::parser::LevelParser;
