//! The step function: advances a level by one frame of wall-clock time.
//!
//! Processing order per sub-step:
//!   1. Actor motion (coins bob, fireballs fly)
//!   2. Player horizontal move, then vertical move (gravity / jump)
//!   3. Player-vs-terrain touches reported as they happen
//!   4. Player-vs-actor touch (first overlapping actor)
//!
//! Once the level has a status the finish delay counts down by the full
//! frame time; actors keep moving until the caller sees `is_finished()`.
//!
//! Touch resolution never holds a borrow of the actor list: the touched
//! actor is copied out before `player_touched` may remove it.

use crate::config::PhysicsConfig;
use crate::domain::entity::{Actor, ActorType, Controls};
use crate::domain::vector::Vector;
use super::event::{LevelEvent, Touch};
use super::level::{Level, Status};

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn advance(level: &mut Level, time: f64, controls: Controls, physics: &PhysicsConfig) -> Vec<LevelEvent> {
    let mut events = Vec::new();
    if !(time.is_finite() && time > 0.0) {
        return events;
    }

    level.count_down(time);

    let max_step = if physics.max_step > 0.0 { physics.max_step } else { time };
    let mut remaining = time;
    while remaining > 0.0 {
        let dt = remaining.min(max_step);
        level.act_all(dt);
        move_player(level, dt, controls, physics, &mut events);
        resolve_actor_touch(level, &mut events);
        remaining -= dt;
    }

    events
}

// ══════════════════════════════════════════════════════════════
// Player motion
// ══════════════════════════════════════════════════════════════

fn move_player(level: &mut Level, dt: f64, controls: Controls, physics: &PhysicsConfig, events: &mut Vec<LevelEvent>) {
    let Some(mut player) = level.player().cloned() else { return };

    // ── Horizontal ──
    player.speed.x = 0.0;
    if controls.left { player.speed.x -= physics.player_x_speed; }
    if controls.right { player.speed.x += physics.player_x_speed; }

    let candidate = player.pos.plus(Vector::new(player.speed.x * dt, 0.0));
    match level.obstacle_at(candidate, player.size) {
        Some(obstacle) => report(level, obstacle.into(), None, events),
        None => player.pos = candidate,
    }

    // ── Vertical ──
    player.speed.y += dt * physics.gravity;
    let candidate = player.pos.plus(Vector::new(0.0, player.speed.y * dt));
    match level.obstacle_at(candidate, player.size) {
        Some(obstacle) => {
            report(level, obstacle.into(), None, events);
            // Landing (falling into something) is the only time a jump starts.
            player.speed.y = if controls.up && player.speed.y > 0.0 {
                -physics.jump_speed
            } else {
                0.0
            };
        }
        None => player.pos = candidate,
    }

    if let Some(slot) = level.player_mut() {
        slot.pos = player.pos;
        slot.speed = player.speed;
    }
}

// ══════════════════════════════════════════════════════════════
// Touch resolution
// ══════════════════════════════════════════════════════════════

fn resolve_actor_touch(level: &mut Level, events: &mut Vec<LevelEvent>) {
    let Some(player) = level.player() else { return };
    let Some(other) = level.actor_at(player).cloned() else { return };
    report(level, other.actor_type().into(), Some(&other), events);
}

/// Forward a touch to the level and translate what changed into events.
fn report(level: &mut Level, touch: Touch, actor: Option<&Actor>, events: &mut Vec<LevelEvent>) {
    let status_before = level.status();
    let present_before = actor.is_some_and(|a| level.actor(a.id()).is_some());

    level.player_touched(touch, actor);

    if let Some(coin) = actor {
        if present_before && level.actor(coin.id()).is_none() {
            events.push(LevelEvent::CoinCollected {
                x: coin.pos.x,
                y: coin.pos.y,
                remaining: level.count_of(ActorType::Coin),
            });
        }
    }

    if status_before.is_none() {
        match level.status() {
            Some(Status::Lost) => {
                events.push(match touch {
                    Touch::Actor(ActorType::Fireball) => LevelEvent::PlayerHit,
                    _ => LevelEvent::PlayerBurned,
                });
                events.push(LevelEvent::LevelLost);
            }
            Some(Status::Won) => events.push(LevelEvent::LevelWon),
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::parser::LevelParser;

    fn physics() -> PhysicsConfig {
        PhysicsConfig::default()
    }

    fn idle() -> Controls {
        Controls::default()
    }

    fn player_pos(level: &Level) -> Vector {
        level.player().unwrap().pos
    }

    #[test]
    fn zero_or_bad_time_is_noop() {
        let mut level = LevelParser::standard().parse(&["   ", " @ ", "xxx", "   "]);
        let before = player_pos(&level);
        assert!(advance(&mut level, 0.0, idle(), &physics()).is_empty());
        assert!(advance(&mut level, -1.0, idle(), &physics()).is_empty());
        assert!(advance(&mut level, f64::NAN, idle(), &physics()).is_empty());
        assert!(advance(&mut level, f64::INFINITY, idle(), &physics()).is_empty());
        assert_eq!(player_pos(&level), before);
    }

    #[test]
    fn player_rests_on_floor() {
        let mut level = LevelParser::standard().parse(&["   ", " @ ", "xxx", "   "]);
        for _ in 0..20 {
            advance(&mut level, 0.05, idle(), &physics());
        }
        let p = level.player().unwrap();
        // feet at row 2 top edge: pos.y + 1.5 == 2 within one fall step
        assert!(p.bottom() <= 2.0 && p.bottom() > 1.9, "bottom = {}", p.bottom());
        assert_eq!(level.status(), None);
    }

    #[test]
    fn walking_right_moves_player() {
        let mut level = LevelParser::standard().parse(&["      ", " @    ", "xxxxxx", "      "]);
        let x0 = player_pos(&level).x;
        let right = Controls { right: true, ..Controls::default() };
        advance(&mut level, 0.1, right, &physics());
        let x1 = player_pos(&level).x;
        assert!((x1 - (x0 + 0.7)).abs() < 1e-9, "x1 = {x1}");
    }

    #[test]
    fn wall_blocks_walking() {
        let mut level = LevelParser::standard().parse(&["x  ", "x@ ", "xxx", "   "]);
        let x0 = player_pos(&level).x;
        let left = Controls { left: true, ..Controls::default() };
        advance(&mut level, 0.05, left, &physics());
        // 1.0 - 0.35 would overlap the wall column: move refused
        assert_eq!(player_pos(&level).x, x0);
        assert_eq!(level.status(), None);
    }

    #[test]
    fn jump_only_from_ground() {
        let mut level = LevelParser::standard().parse(&["   ", "   ", "   ", " @ ", "xxx", "   "]);
        // settle
        for _ in 0..10 {
            advance(&mut level, 0.05, idle(), &physics());
        }
        let y0 = player_pos(&level).y;
        let up = Controls { up: true, ..Controls::default() };
        advance(&mut level, 0.05, up, &physics());
        advance(&mut level, 0.05, idle(), &physics());
        assert!(player_pos(&level).y < y0, "player should rise");
    }

    #[test]
    fn falling_off_the_level_loses() {
        let mut level = LevelParser::standard().parse(&["   ", " @ ", "   ", "   "]);
        let mut events = vec![];
        for _ in 0..40 {
            events.extend(advance(&mut level, 0.05, idle(), &physics()));
        }
        assert_eq!(level.status(), Some(Status::Lost));
        assert_eq!(events.iter().filter(|e| **e == LevelEvent::LevelLost).count(), 1);
        assert!(events.contains(&LevelEvent::PlayerBurned));
    }

    #[test]
    fn lava_below_loses() {
        let mut level = LevelParser::standard().parse(&["   ", " @ ", "!!!", "   "]);
        let events = advance(&mut level, 0.5, idle(), &physics());
        assert_eq!(level.status(), Some(Status::Lost));
        assert_eq!(events, vec![LevelEvent::PlayerBurned, LevelEvent::LevelLost]);
    }

    #[test]
    fn fireball_hit_loses() {
        // horizontal fireball one tile left of the player, flying right
        let mut level = LevelParser::standard().parse(&["     ", "=@   ", "xxxxx", "     "]);
        let events = advance(&mut level, 0.5, idle(), &physics());
        assert_eq!(level.status(), Some(Status::Lost));
        assert!(events.contains(&LevelEvent::PlayerHit));
    }

    #[test]
    fn collecting_only_coin_wins_and_finishes() {
        let mut level = LevelParser::standard().parse(&["   ", " @o", "xxx", "   "]);
        let right = Controls { right: true, ..Controls::default() };
        let mut events = vec![];
        for _ in 0..10 {
            events.extend(advance(&mut level, 0.05, right, &physics()));
        }
        assert_eq!(level.status(), Some(Status::Won));
        assert!(level.no_more_actors(ActorType::Coin));
        assert!(matches!(events[0], LevelEvent::CoinCollected { remaining: 0, .. }));
        assert_eq!(events.iter().filter(|e| **e == LevelEvent::LevelWon).count(), 1);

        assert!(!level.is_finished());
        for _ in 0..25 {
            advance(&mut level, 0.05, idle(), &physics());
        }
        assert!(level.is_finished());
    }

    #[test]
    fn large_frame_is_split_into_substeps() {
        // Fireball two tiles from a wall at speed 2. One 1.5s step would be
        // refused outright and leave it at x = 0; sub-steps walk it up to the
        // wall and part of the way back.
        let mut level = LevelParser::standard().parse(&["     ", "     ", "=  x ", "     ", "     "]);
        let id = level.actors()[0].id();
        advance(&mut level, 1.5, idle(), &physics());
        let after = level.actor(id).unwrap();
        assert!(after.pos.x > 0.5 && after.pos.x < 1.5, "x = {}", after.pos.x);
        assert_eq!(after.speed, Vector::new(-2.0, 0.0));
    }

    #[test]
    fn level_without_player_still_animates() {
        let mut level = LevelParser::standard().parse(&["=   ", "    ", "    "]);
        let id = level.actors()[0].id();
        let events = advance(&mut level, 0.25, idle(), &physics());
        assert!(events.is_empty());
        let pos = level.actor(id).unwrap().pos;
        assert!((pos.x - 0.5).abs() < 1e-9 && pos.y == 0.0, "pos = {pos:?}");
    }
}
