//! Pure game model: vectors, terrain tiles, actors and collision geometry.

pub mod entity;
pub mod physics;
pub mod tile;
pub mod vector;
