/// Kinematics: player gravity, the global speed model, and scrolling of
/// every entity pool.
///
/// Scrolling functions take a slice and return the surviving entities,
/// already moved.  An entity is dropped on the first tick its right edge
/// passes `x = 0`.

use crate::config::Tuning;
use crate::entities::{Collectible, GrassTuft, Obstacle, Particle, ParticleKind, Pebble, Player};

/// Vertical amplitude of the collectible bob.
const BOB_AMPLITUDE: f32 = 8.0;
const BOB_STEP: f32 = 0.15;
const GRASS_SWAY_STEP: f32 = 0.02;

// ── Player ────────────────────────────────────────────────────────────────────

/// Apply one tick of gravity.  Landing clamps the player onto the ground
/// and clears the airborne state.
pub fn integrate_player(player: &Player, gravity: f32, ground_y: f32) -> Player {
    let velocity_y = player.velocity_y + gravity;
    let y = player.y + velocity_y;
    let rest = player.rest_y(ground_y);
    if y >= rest {
        Player {
            y: rest,
            velocity_y: 0.0,
            jumping: false,
            grounded: true,
            ..player.clone()
        }
    } else {
        Player {
            y,
            velocity_y,
            ..player.clone()
        }
    }
}

/// Start a jump.  Returns `None` when the player is not on the ground.
pub fn launch(player: &Player, jump_power: f32) -> Option<Player> {
    if !player.grounded {
        return None;
    }
    Some(Player {
        velocity_y: jump_power,
        jumping: true,
        grounded: false,
        ..player.clone()
    })
}

// ── Speed ─────────────────────────────────────────────────────────────────────

/// `base + game_time * ramp`, clamped to `max_speed` when one is set.
pub fn speed_at(game_time: u64, tuning: &Tuning) -> f32 {
    let speed = tuning.base_speed + game_time as f32 * tuning.speed_ramp;
    match tuning.max_speed {
        Some(cap) => speed.min(cap),
        None => speed,
    }
}

// ── Foreground pools ──────────────────────────────────────────────────────────

pub fn advance_obstacles(obstacles: &[Obstacle], speed: f32) -> Vec<Obstacle> {
    obstacles
        .iter()
        .filter_map(|o| {
            let x = o.x - speed;
            if x + o.width < 0.0 {
                None
            } else {
                Some(Obstacle { x, ..o.clone() })
            }
        })
        .collect()
}

pub fn advance_collectibles(collectibles: &[Collectible], speed: f32) -> Vec<Collectible> {
    collectibles
        .iter()
        .filter_map(|c| {
            let x = c.x - speed;
            if x + c.width < 0.0 {
                return None;
            }
            let bob = c.bob + BOB_STEP;
            Some(Collectible {
                x,
                bob,
                y: c.base_y + bob.sin() * BOB_AMPLITUDE,
                ..c.clone()
            })
        })
        .collect()
}

pub fn advance_grass(grass: &[GrassTuft], speed: f32) -> Vec<GrassTuft> {
    grass
        .iter()
        .filter_map(|g| {
            let x = g.x - speed;
            if x + g.width < 0.0 {
                None
            } else {
                Some(GrassTuft {
                    x,
                    sway: g.sway + GRASS_SWAY_STEP,
                    ..g.clone()
                })
            }
        })
        .collect()
}

pub fn advance_pebbles(pebbles: &[Pebble], speed: f32) -> Vec<Pebble> {
    pebbles
        .iter()
        .filter_map(|p| {
            let x = p.x - speed;
            if x + p.size < 0.0 {
                None
            } else {
                Some(Pebble { x, ..p.clone() })
            }
        })
        .collect()
}

// ── Particles ─────────────────────────────────────────────────────────────────

/// Move every particle by its velocity, then apply its kind's gravity, drag
/// and phase step.  Particles whose life runs out are dropped.
pub fn advance_particles(particles: &[Particle]) -> Vec<Particle> {
    particles
        .iter()
        .filter_map(|p| {
            let mut next = p.clone();
            next.x += p.velocity_x;
            next.y += p.velocity_y;
            match p.kind {
                ParticleKind::Sparkle => {
                    next.velocity_y += 0.15;
                    next.velocity_x *= 0.98;
                    next.phase += 0.2;
                }
                ParticleKind::Orb => {
                    next.velocity_y += 0.1;
                    next.velocity_x *= 0.99;
                    next.phase += 0.15;
                }
                ParticleKind::Lightning => {
                    next.velocity_y += 0.25;
                    next.velocity_x += p.phase.sin() * 0.5;
                    next.phase += 0.3;
                }
            }
            next.life -= 1.0;
            (next.life > 0.0).then_some(next)
        })
        .collect()
}
