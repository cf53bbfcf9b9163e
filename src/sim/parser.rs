//! Level parser: row strings → obstacle grid + actor list.
//!
//! ## Symbol legend (standard dictionary):
//!   'x' = Wall                   '!' = Lava
//!   '@' = Player                 'o' = Coin
//!   '=' = Horizontal fireball    '|' = Vertical fireball
//!   'v' = Fire rain              anything else = open space
//!
//! Grid and actors are read independently: an actor symbol leaves an empty
//! cell behind, and an obstacle symbol only spawns an actor if the dictionary
//! maps it.

use std::collections::HashMap;

use crate::domain::entity::Actor;
use crate::domain::tile::Obstacle;
use crate::domain::vector::Vector;
use crate::error::Result;
use super::level::Level;

/// Builds an actor at a grid position. A failed build is skipped.
pub type ActorFactory = Box<dyn Fn(Vector) -> Result<Actor>>;

pub type Dictionary = HashMap<char, ActorFactory>;

pub fn standard_dictionary() -> Dictionary {
    let mut dict: Dictionary = HashMap::new();
    dict.insert('@', Box::new(Actor::player));
    dict.insert('o', Box::new(Actor::coin));
    dict.insert('=', Box::new(Actor::horizontal_fireball));
    dict.insert('|', Box::new(Actor::vertical_fireball));
    dict.insert('v', Box::new(Actor::fire_rain));
    dict
}

#[derive(Default)]
pub struct LevelParser {
    dictionary: Option<Dictionary>,
}

impl LevelParser {
    pub fn new(dictionary: Dictionary) -> Self {
        LevelParser { dictionary: Some(dictionary) }
    }

    /// Parser with no actor dictionary: grids only.
    pub fn without_actors() -> Self {
        LevelParser { dictionary: None }
    }

    pub fn standard() -> Self {
        Self::new(standard_dictionary())
    }

    pub fn actor_from_symbol(&self, symbol: Option<char>) -> Option<&ActorFactory> {
        let symbol = symbol?;
        self.dictionary.as_ref()?.get(&symbol)
    }

    pub fn obstacle_from_symbol(&self, symbol: char) -> Option<Obstacle> {
        Obstacle::from_symbol(symbol)
    }

    /// One row of obstacle tags per input row. Rows keep their own length.
    pub fn create_grid<S: AsRef<str>>(&self, rows: &[S]) -> Vec<Vec<Option<Obstacle>>> {
        rows.iter()
            .map(|row| row.as_ref().chars().map(|c| self.obstacle_from_symbol(c)).collect())
            .collect()
    }

    pub fn create_actors<S: AsRef<str>>(&self, rows: &[S]) -> Vec<Actor> {
        if self.dictionary.is_none() {
            return vec![];
        }

        let mut actors = vec![];
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.as_ref().chars().enumerate() {
                let Some(factory) = self.actor_from_symbol(Some(ch)) else { continue };
                match factory(Vector::new(x as f64, y as f64)) {
                    Ok(actor) => actors.push(actor),
                    Err(e) => log::debug!("skipping '{ch}' at ({x}, {y}): {e}"),
                }
            }
        }
        actors
    }

    pub fn parse<S: AsRef<str>>(&self, rows: &[S]) -> Level {
        Level::new(self.create_grid(rows), self.create_actors(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::ActorType;
    use crate::error::EngineError;

    fn v(x: f64, y: f64) -> Vector {
        Vector::new(x, y)
    }

    #[test]
    fn actor_from_symbol_lookup() {
        let parser = LevelParser::standard();
        assert!(parser.actor_from_symbol(None).is_none());
        assert!(parser.actor_from_symbol(Some('#')).is_none());
        let factory = parser.actor_from_symbol(Some('@')).unwrap();
        let p = factory(v(1.0, 1.0)).unwrap();
        assert_eq!(p.actor_type(), ActorType::Player);

        assert!(LevelParser::without_actors().actor_from_symbol(Some('@')).is_none());
    }

    #[test]
    fn obstacle_symbols() {
        let parser = LevelParser::default();
        assert_eq!(parser.obstacle_from_symbol('x'), Some(Obstacle::Wall));
        assert_eq!(parser.obstacle_from_symbol('!'), Some(Obstacle::Lava));
        assert_eq!(parser.obstacle_from_symbol('o'), None);
        assert_eq!(parser.obstacle_from_symbol(' '), None);
    }

    #[test]
    fn ragged_grid_keeps_row_lengths() {
        let parser = LevelParser::default();
        let grid = parser.create_grid(&["x!", "", "  x"]);
        assert_eq!(grid, vec![
            vec![Some(Obstacle::Wall), Some(Obstacle::Lava)],
            vec![],
            vec![None, None, Some(Obstacle::Wall)],
        ]);
        assert!(parser.create_grid::<&str>(&[]).is_empty());
    }

    #[test]
    fn no_dictionary_no_actors() {
        let parser = LevelParser::without_actors();
        assert!(parser.create_actors(&["@o=|v"]).is_empty());
    }

    #[test]
    fn create_actors_in_row_major_order() {
        let parser = LevelParser::standard();
        let actors = parser.create_actors(&[
            " = ",
            "o |",
            "v@x",
        ]);
        let types: Vec<_> = actors.iter().map(Actor::actor_type).collect();
        assert_eq!(types, vec![
            ActorType::Fireball,
            ActorType::Coin,
            ActorType::Fireball,
            ActorType::Fireball,
            ActorType::Player,
        ]);
        assert_eq!(actors[0].pos, v(1.0, 0.0));
        assert_eq!(actors[0].speed, v(2.0, 0.0));
        assert_eq!(actors[2].speed, v(0.0, 2.0));
        assert_eq!(actors[3].speed, v(0.0, 3.0));
        assert_eq!(actors[4].pos, v(1.0, 1.5));
    }

    #[test]
    fn unmapped_and_failing_symbols_skipped() {
        let mut dict: Dictionary = HashMap::new();
        dict.insert('a', Box::new(|pos: Vector| Actor::new(pos, Vector::new(1.0, 1.0), Vector::ZERO)));
        dict.insert('b', Box::new(|_: Vector| Err(EngineError::InvalidArgument("nope".into()))));
        let parser = LevelParser::new(dict);
        let actors = parser.create_actors(&["ab?", "  a"]);
        assert_eq!(actors.len(), 2);
        assert_eq!(actors[0].pos, v(0.0, 0.0));
        assert_eq!(actors[1].pos, v(2.0, 1.0));
        assert!(actors.iter().all(|a| a.actor_type() == ActorType::Actor));
    }

    #[test]
    fn parse_player_and_wall() {
        let level = LevelParser::standard().parse(&["@ ", "  x"]);
        assert_eq!(level.height(), 2);
        assert_eq!(level.width(), 3);
        for (y, row) in level.grid().rows().iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                let expected = if (x, y) == (2, 1) { Some(Obstacle::Wall) } else { None };
                assert_eq!(*cell, expected, "cell ({x}, {y})");
            }
        }
        assert_eq!(level.actors().len(), 1);
        let player = level.player().unwrap();
        assert_eq!(player.actor_type(), ActorType::Player);
        // (0, 0) before the feet offset
        assert_eq!(player.pos, v(0.0, -0.5));
    }

    #[test]
    fn parse_accepts_owned_rows() {
        let rows: Vec<String> = vec!["xxx".into(), "o@ ".into(), "!!!".into()];
        let level = LevelParser::standard().parse(&rows);
        assert_eq!(level.actors().len(), 2);
        assert_eq!(level.grid().cell(1, 2), Some(Obstacle::Lava));
    }
}
