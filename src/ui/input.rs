//! Keyboard tracker.
//!
//! Terminals report presses (and repeats) but usually not releases, so a key
//! counts as held until `HOLD_TIMEOUT` passes without a new press/repeat.
//! When the terminal does send Release events they end the hold at once.
//!
//! Held keys drive continuous controls (walk, jump); fresh presses drive
//! one-shot commands (restart, quit).

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{self, poll, Event, KeyCode, KeyEventKind, KeyModifiers};

use crate::domain::entity::Controls;

/// After this long without a Press/Repeat event, the key is released.
const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

pub const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
pub const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
pub const KEYS_JUMP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W'), KeyCode::Char(' ')];
pub const KEYS_RESTART: &[KeyCode] = &[KeyCode::Char('r'), KeyCode::Char('R')];
pub const KEYS_QUIT: &[KeyCode] = &[KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('Q')];

#[derive(Default)]
pub struct KeyTracker {
    /// Last Press/Repeat time per key.
    last_active: HashMap<KeyCode, Instant>,
    /// Keys that went from released to held during the last drain.
    fresh_presses: Vec<KeyCode>,
    ctrl_c: bool,
    honor_release: bool,
}

impl KeyTracker {
    pub fn new() -> Self {
        KeyTracker {
            last_active: HashMap::with_capacity(16),
            fresh_presses: Vec::with_capacity(8),
            ctrl_c: false,
            honor_release: false,
        }
    }

    /// Trust Release events (keyboard enhancement confirmed).
    pub fn with_release_events(mut self, on: bool) -> Self {
        self.honor_release = on;
        self
    }

    /// Drain pending terminal events without blocking. Call once per frame.
    pub fn drain_events(&mut self) -> std::io::Result<()> {
        self.fresh_presses.clear();
        self.ctrl_c = false;

        while poll(Duration::ZERO)? {
            let Event::Key(key) = event::read()? else { continue };

            if key.modifiers.contains(KeyModifiers::CONTROL)
                && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
            {
                self.ctrl_c = true;
            }

            match key.kind {
                KeyEventKind::Release if self.honor_release => {
                    self.last_active.remove(&key.code);
                }
                KeyEventKind::Release => {}
                _ => {
                    let now = Instant::now();
                    if !self.is_held_at(key.code, now) {
                        self.fresh_presses.push(key.code);
                    }
                    self.last_active.insert(key.code, now);
                }
            }
        }

        let now = Instant::now();
        self.last_active.retain(|_, t| now.duration_since(*t) < HOLD_TIMEOUT);
        Ok(())
    }

    pub fn any_held(&self, codes: &[KeyCode]) -> bool {
        let now = Instant::now();
        codes.iter().any(|c| self.is_held_at(*c, now))
    }

    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.fresh_presses.contains(c))
    }

    pub fn ctrl_c_pressed(&self) -> bool {
        self.ctrl_c
    }

    /// Player controls for this frame. A fresh press counts as held.
    pub fn controls(&self) -> Controls {
        let active = |keys: &[KeyCode]| self.any_held(keys) || self.any_pressed(keys);
        Controls {
            left: active(KEYS_LEFT),
            right: active(KEYS_RIGHT),
            up: active(KEYS_JUMP),
        }
    }

    fn is_held_at(&self, code: KeyCode, now: Instant) -> bool {
        self.last_active
            .get(&code)
            .is_some_and(|t| now.duration_since(*t) < HOLD_TIMEOUT)
    }

    #[cfg(test)]
    fn press(&mut self, code: KeyCode, at: Instant) {
        if !self.is_held_at(code, at) {
            self.fresh_presses.push(code);
        }
        self.last_active.insert(code, at);
    }
}
