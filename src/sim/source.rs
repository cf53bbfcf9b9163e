//! Level sources.
//!
//! ## Sources (priority order):
//!   1. JSON file named by `general.levels_file` in config.toml
//!   2. Built-in embedded levels
//!
//! ## File format:
//!   ```json
//!   [
//!     ["     v", "  @ o ", "xxx!xx"],
//!     ["o   =  ", "@  xxx", "xxx!!!x"]
//!   ]
//!   ```
//!
//! A file is an array of levels; a level is an array of row strings using
//! the parser legend (see `sim::parser`). Rows may differ in length.

use std::path::Path;

use crate::error::{EngineError, Result};

/// Runtime level data (owned strings, loaded from file or embedded).
#[derive(Clone, Debug, PartialEq)]
pub struct LevelDef {
    pub name: String,
    pub rows: Vec<String>,
}

// ══════════════════════════════════════════════════════════════
// Public API
// ══════════════════════════════════════════════════════════════

/// Levels from `path` if given, otherwise the embedded set.
pub fn load_or_embedded(path: Option<&Path>) -> Result<Vec<LevelDef>> {
    match path {
        Some(p) => load_levels(p),
        None => Ok(embedded_levels()),
    }
}

/// Read a JSON level list.
pub fn load_levels(path: &Path) -> Result<Vec<LevelDef>> {
    let source_err = |e: Box<dyn std::error::Error + Send + Sync>| EngineError::LevelSource {
        path: path.to_path_buf(),
        source: e,
    };
    let text = std::fs::read_to_string(path).map_err(|e| source_err(e.into()))?;
    let levels = parse_levels(&text).map_err(|e| match e {
        EngineError::NoLevels => EngineError::NoLevels,
        other => source_err(other.into()),
    })?;
    log::info!("loaded {} levels from {}", levels.len(), path.display());
    Ok(levels)
}

/// Parse a JSON level list from text.
pub fn parse_levels(text: &str) -> Result<Vec<LevelDef>> {
    let raw: Vec<Vec<String>> = serde_json::from_str(text)
        .map_err(|e| EngineError::InvalidArgument(format!("level list: {e}")))?;
    if raw.is_empty() {
        return Err(EngineError::NoLevels);
    }
    Ok(raw.into_iter()
        .enumerate()
        .map(|(i, rows)| LevelDef { name: format!("Level {}", i + 1), rows })
        .collect())
}

/// Pick level `index`, or report how many exist.
pub fn select(levels: &[LevelDef], index: usize) -> Result<&LevelDef> {
    levels.get(index).ok_or(EngineError::LevelIndex { index, count: levels.len() })
}

// ══════════════════════════════════════════════════════════════
// Embedded fallback levels
// ══════════════════════════════════════════════════════════════

pub fn embedded_levels() -> Vec<LevelDef> {
    vec![
        make_embedded("Level 1 - First Steps", &[
            "                      ",
            "                      ",
            "                      ",
            "                      ",
            "          o           ",
            "         xxx     o    ",
            "  @                   ",
            "xxxxx        xxxxxxxxx",
            "    x!!!!!!!!x        ",
        ]),
        make_embedded("Level 2 - Hot Corridor", &[
            "     v                 ",
            "                       ",
            "                       ",
            "                       ",
            "                       ",
            "  |                    ",
            "  o                 o  ",
            "  x               = x  ",
            "  x          o o    x  ",
            "  x  @    xxxxx     x  ",
            "  xxxxx             x  ",
            "      x!!!!!!!!!!!!!x  ",
            "      xxxxxxxxxxxxxxx  ",
            "                       ",
        ]),
        make_embedded("Level 3 - Fire Rain", &[
            "        |           |  ",
            "                       ",
            "                       ",
            "                       ",
            "                       ",
            "                       ",
            "                       ",
            "                       ",
            "                       ",
            "     |                 ",
            "                       ",
            "  =      |             ",
            " @ |  o            o   ",
            "xxxxxxxxx!!!!!!!!!!!!!!",
            "                       ",
        ]),
        make_embedded("Level 4 - Stairway", &[
            "        v         v  ",
            "                     ",
            "       !o!           ",
            "                     ",
            "                     ",
            "                     ",
            "                     ",
            "      xxx            ",
            "                     ",
            "            o        ",
            "           xxx       ",
            "  @                  ",
            "xxx                  ",
            "                     ",
            "      xxx   xxx    o ",
            "                  xxx",
            "                     ",
            "                     ",
            "          xxxx       ",
            "                     ",
        ]),
    ]
}

fn make_embedded(name: &str, map: &[&str]) -> LevelDef {
    LevelDef {
        name: name.to_string(),
        rows: map.iter().map(|s| s.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::ActorType;
    use crate::sim::parser::LevelParser;

    #[test]
    fn embedded_levels_are_playable() {
        let parser = LevelParser::standard();
        for def in embedded_levels() {
            let level = parser.parse(&def.rows);
            assert!(level.player().is_some(), "{} has no player", def.name);
            assert!(!level.no_more_actors(ActorType::Coin), "{} has no coins", def.name);
            assert!(level.width() > 0 && level.height() > 0);
        }
    }

    #[test]
    fn parse_json_levels() {
        let levels = parse_levels(r#"[["@ o", "xxx"], [" @", "!!"]]"#).unwrap();
        assert_eq!(levels.len(), 2);
        assert_eq!(levels[0].name, "Level 1");
        assert_eq!(levels[1].rows, vec![" @".to_string(), "!!".to_string()]);
    }

    #[test]
    fn empty_list_rejected() {
        assert!(matches!(parse_levels("[]"), Err(EngineError::NoLevels)));
    }

    #[test]
    fn malformed_json_rejected() {
        assert!(matches!(parse_levels(r#"{"rows": 1}"#), Err(EngineError::InvalidArgument(_))));
        assert!(parse_levels(r#"[["ok", 5]]"#).is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let path = Path::new("/definitely/not/here/levels.json");
        match load_levels(path) {
            Err(EngineError::LevelSource { path: p, .. }) => assert_eq!(p, path),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn select_by_index() {
        let levels = embedded_levels();
        assert_eq!(select(&levels, 0).unwrap().name, levels[0].name);
        match select(&levels, 99) {
            Err(EngineError::LevelIndex { index, count }) => {
                assert_eq!(index, 99);
                assert_eq!(count, levels.len());
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn no_path_means_embedded() {
        assert_eq!(load_or_embedded(None).unwrap(), embedded_levels());
    }
}
