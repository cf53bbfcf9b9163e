/// Entry point and game loop.

use std::time::{Duration, Instant};

use ember_runner::config::GameConfig;
use ember_runner::sim::event::LevelEvent;
use ember_runner::sim::level::{Level, Status};
use ember_runner::sim::parser::LevelParser;
use ember_runner::sim::source::{self, LevelDef};
use ember_runner::sim::step;
use ember_runner::ui::input::{KeyTracker, KEYS_QUIT, KEYS_RESTART};
use ember_runner::ui::renderer::Renderer;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("ember-runner: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = GameConfig::load();

    let index = match std::env::args().nth(1) {
        Some(arg) => arg.parse::<usize>().map_err(|e| format!("bad level index {arg:?}: {e}"))?,
        None => 0,
    };
    let levels = source::load_or_embedded(config.levels_file.as_deref())?;
    let def = source::select(&levels, index)?;
    let parser = LevelParser::standard();

    let mut renderer = Renderer::new();
    let release_events = renderer.init()?;

    let result = game_loop(&mut renderer, &parser, def, &config, release_events);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    match result? {
        Some(Status::Won) => println!("{}: cleared!", def.name),
        Some(Status::Lost) => println!("{}: burned. Try again!", def.name),
        None => println!("{}: quit.", def.name),
    }
    Ok(())
}

/// Runs until the level finishes or the player quits. Returns the outcome.
fn game_loop(
    renderer: &mut Renderer,
    parser: &LevelParser,
    def: &LevelDef,
    config: &GameConfig,
    release_events: bool,
) -> Result<Option<Status>, Box<dyn std::error::Error>> {
    let mut kb = KeyTracker::new().with_release_events(release_events);
    let mut level = start_level(parser, def);
    let tick_rate = Duration::from_millis(config.speed.tick_rate_ms);
    let mut last_tick = Instant::now();

    loop {
        kb.drain_events()?;

        if kb.ctrl_c_pressed() || kb.any_pressed(KEYS_QUIT) {
            return Ok(None);
        }
        if kb.any_pressed(KEYS_RESTART) {
            level = start_level(parser, def);
            renderer.invalidate();
            last_tick = Instant::now();
        }

        if last_tick.elapsed() >= tick_rate {
            let elapsed = last_tick.elapsed().as_secs_f64();
            last_tick = Instant::now();

            let events = step::advance(&mut level, elapsed, kb.controls(), &config.physics);
            log_events(&events);
        }

        renderer.render(&level, &def.name)?;

        if level.is_finished() {
            return Ok(level.status());
        }
        std::thread::sleep(FRAME_SLEEP);
    }
}

fn start_level(parser: &LevelParser, def: &LevelDef) -> Level {
    let level = parser.parse(&def.rows);
    log::info!("{}: {}x{}, {} actors", def.name, level.width(), level.height(), level.actors().len());
    if level.player().is_none() {
        log::warn!("{} has no player", def.name);
    }
    level
}

fn log_events(events: &[LevelEvent]) {
    for event in events {
        match event {
            LevelEvent::CoinCollected { x, y, remaining } => {
                log::debug!("coin at ({x:.1}, {y:.1}), {remaining} left");
            }
            other => log::debug!("{other:?}"),
        }
    }
}
