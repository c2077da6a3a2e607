/// Entity creation: catalog sampling, spawn-timer thresholds, and the
/// randomized attributes of every new entity.
///
/// Nothing here decides *whether* the game is running; `compute::tick`
/// only calls into the spawner while a run is in progress.

use std::f32::consts::TAU;

use rand::Rng;

use crate::config::Tuning;
use crate::entities::{
    Building, Cloud, CloudLayer, Collectible, Depth, EnergyKind, GrassTuft, Obstacle,
    ObstacleKind, Particle, ParticleKind, Pebble, Star, Viewport, COLLECTIBLE_SIZE,
};
use crate::lighting::generate_windows;

pub const BUILDING_COUNT: usize = 15;
pub const BUILDING_PALETTE_SIZE: u8 = 12;
pub const GRASS_SHADES: u8 = 3;
pub const PEBBLE_SHADES: u8 = 6;

// ── Catalog sampling ──────────────────────────────────────────────────────────

/// Obstacle kind for a catalog index.  Out-of-range indices clamp to the
/// last entry.
pub fn obstacle_kind_at(index: usize) -> ObstacleKind {
    let last = ObstacleKind::ALL.len() - 1;
    ObstacleKind::ALL[index.min(last)]
}

pub fn random_obstacle_kind(rng: &mut impl Rng) -> ObstacleKind {
    obstacle_kind_at(rng.gen_range(0..ObstacleKind::ALL.len()))
}

pub fn total_rarity() -> f32 {
    EnergyKind::ALL.iter().map(|k| k.rarity()).sum()
}

/// Walk the catalog subtracting each rarity from `draw` until the remainder
/// fits inside the current kind.  A draw past the end of the catalog falls
/// back to the first kind.
pub fn energy_kind_for_draw(draw: f32) -> EnergyKind {
    let mut remaining = draw;
    for kind in EnergyKind::ALL {
        if remaining <= kind.rarity() {
            return kind;
        }
        remaining -= kind.rarity();
    }
    EnergyKind::ALL[0]
}

pub fn random_energy_kind(rng: &mut impl Rng) -> EnergyKind {
    let draw = rng.gen::<f32>() * total_rarity();
    energy_kind_for_draw(draw)
}

// ── Timer thresholds ──────────────────────────────────────────────────────────

/// Ticks between obstacles: shrinks linearly with game time down to a floor.
pub fn obstacle_interval(game_time: u64, tuning: &Tuning) -> f32 {
    let interval = tuning.obstacle_interval_start - game_time as f32 * tuning.obstacle_interval_decay;
    interval.max(tuning.obstacle_interval_floor)
}

/// Threshold for a jittered timer, drawn from `[lo, hi)`.
pub fn jittered_interval((lo, hi): (f32, f32), rng: &mut impl Rng) -> f32 {
    if hi > lo {
        rng.gen_range(lo..hi)
    } else {
        lo
    }
}

// ── Gameplay entities ─────────────────────────────────────────────────────────

/// A box at the right edge of the viewport, resting on the ground.
pub fn spawn_obstacle(viewport: &Viewport, rng: &mut impl Rng) -> Obstacle {
    let kind = random_obstacle_kind(rng);
    let (width, height) = kind.size();
    Obstacle {
        x: viewport.width,
        y: viewport.ground_y() - height,
        width,
        height,
        kind,
        fragile: rng.gen::<f32>() > 0.7,
    }
}

/// An energy bolt at the right edge, 80–180 units above the ground.
pub fn spawn_collectible(viewport: &Viewport, rng: &mut impl Rng) -> Collectible {
    let kind = random_energy_kind(rng);
    let base_y = viewport.ground_y() - 80.0 - rng.gen::<f32>() * 100.0;
    Collectible {
        x: viewport.width,
        y: base_y,
        base_y,
        width: COLLECTIBLE_SIZE,
        height: COLLECTIBLE_SIZE,
        kind,
        bob: rng.gen::<f32>() * TAU,
    }
}

/// Particle burst for a collected bolt: 15–25 sparkles, orbs and bolts.
pub fn collect_burst(x: f32, y: f32, rng: &mut impl Rng) -> Vec<Particle> {
    let count = rng.gen_range(15..=25);
    (0..count).map(|_| burst_particle(x, y, rng)).collect()
}

fn burst_particle(x: f32, y: f32, rng: &mut impl Rng) -> Particle {
    let roll: f32 = rng.gen();
    let (kind, spread, vx, vy, life, size, shades) = if roll < 0.4 {
        let life = 45.0 + rng.gen::<f32>() * 15.0;
        let vy = -rng.gen::<f32>() * 6.0 - 2.0;
        (ParticleKind::Sparkle, 20.0, 8.0, vy, life, 2.0 + rng.gen::<f32>() * 2.0, 4)
    } else if roll < 0.7 {
        let life = 60.0 + rng.gen::<f32>() * 20.0;
        let vy = -rng.gen::<f32>() * 4.0 - 1.0;
        (ParticleKind::Orb, 15.0, 4.0, vy, life, 4.0 + rng.gen::<f32>() * 4.0, 3)
    } else {
        let life = 30.0 + rng.gen::<f32>() * 10.0;
        let vy = -rng.gen::<f32>() * 5.0 - 3.0;
        (ParticleKind::Lightning, 25.0, 10.0, vy, life, 1.0 + rng.gen::<f32>() * 3.0, 3)
    };
    let phase = match kind {
        ParticleKind::Lightning => rng.gen::<f32>() * 10.0,
        _ => rng.gen::<f32>() * TAU,
    };
    Particle {
        x: x + (rng.gen::<f32>() - 0.5) * spread,
        y: y + (rng.gen::<f32>() - 0.5) * spread,
        velocity_x: (rng.gen::<f32>() - 0.5) * vx,
        velocity_y: vy,
        life,
        max_life: life,
        size,
        kind,
        phase,
        shade: rng.gen_range(0..shades),
    }
}

pub fn spawn_grass(viewport: &Viewport, rng: &mut impl Rng) -> GrassTuft {
    GrassTuft {
        x: viewport.width,
        y: viewport.ground_y() - 5.0,
        width: 8.0 + rng.gen::<f32>() * 6.0,
        height: 8.0 + rng.gen::<f32>() * 10.0,
        blades: rng.gen_range(3..7),
        sway: rng.gen::<f32>() * TAU,
        shade: rng.gen_range(0..GRASS_SHADES),
    }
}

/// A pebble embedded 15–40 units below the ground surface.
pub fn spawn_pebble(viewport: &Viewport, rng: &mut impl Rng) -> Pebble {
    Pebble {
        x: viewport.width,
        y: viewport.ground_y() + 15.0 + rng.gen::<f32>() * 25.0,
        size: 3.0 + rng.gen::<f32>() * 6.0,
        shade: rng.gen_range(0..PEBBLE_SHADES),
        round: rng.gen_bool(0.5),
        opacity: 0.3 + rng.gen::<f32>() * 0.4,
    }
}

// ── Backdrop ──────────────────────────────────────────────────────────────────

/// Height, width and palette of a fresh building.
fn building_shape(rng: &mut impl Rng) -> (f32, f32, u8) {
    let height = 60.0 + rng.gen::<f32>() * 300.0;
    let width = 90.0 + rng.gen::<f32>() * 90.0;
    (height, width, rng.gen_range(0..BUILDING_PALETTE_SIZE))
}

/// The initial skyline, sorted back to front for drawing.
pub fn generate_buildings(viewport: &Viewport, light_level: f32, rng: &mut impl Rng) -> Vec<Building> {
    let mut buildings: Vec<Building> = (0..BUILDING_COUNT)
        .map(|i| {
            let (height, width, palette) = building_shape(rng);
            Building {
                x: i as f32 * 120.0 + rng.gen::<f32>() * 60.0,
                y: viewport.ground_y() - height,
                width,
                height,
                depth: Depth::for_height(height),
                palette,
                windows: generate_windows(width, height, light_level, rng),
            }
        })
        .collect();
    buildings.sort_by_key(|b| b.depth);
    buildings
}

/// Move a building that left the screen back to the right edge with a new
/// height, depth band, palette and window grid.
pub fn recycle_building(building: &mut Building, viewport: &Viewport, light_level: f32, rng: &mut impl Rng) {
    let (height, _, palette) = building_shape(rng);
    building.x = viewport.width + rng.gen::<f32>() * 100.0;
    building.height = height;
    building.y = viewport.ground_y() - height;
    building.depth = Depth::for_height(height);
    building.palette = palette;
    building.windows = generate_windows(building.width, height, light_level, rng);
}

struct CloudBand {
    layer: CloudLayer,
    count: usize,
    spacing: f32,
    jitter: f32,
    y: (f32, f32),
    size: (f32, f32),
    speed: (f32, f32),
    opacity: (f32, f32),
}

const CLOUD_BANDS: [CloudBand; 4] = [
    CloudBand { layer: CloudLayer::Back, count: 6, spacing: 200.0, jitter: 100.0, y: (20.0, 120.0), size: (75.0, 60.0), speed: (0.1, 0.15), opacity: (0.3, 0.25) },
    CloudBand { layer: CloudLayer::Mid, count: 8, spacing: 180.0, jitter: 90.0, y: (30.0, 140.0), size: (60.0, 75.0), speed: (0.2, 0.25), opacity: (0.5, 0.3) },
    CloudBand { layer: CloudLayer::Front, count: 5, spacing: 250.0, jitter: 125.0, y: (25.0, 100.0), size: (68.0, 83.0), speed: (0.3, 0.4), opacity: (0.6, 0.4) },
    CloudBand { layer: CloudLayer::Wispy, count: 10, spacing: 150.0, jitter: 75.0, y: (15.0, 160.0), size: (38.0, 53.0), speed: (0.15, 0.2), opacity: (0.2, 0.3) },
];

/// `base + U[0,1) * span`.
fn ranged((base, span): (f32, f32), rng: &mut impl Rng) -> f32 {
    base + rng.gen::<f32>() * span
}

pub fn generate_clouds(rng: &mut impl Rng) -> Vec<Cloud> {
    let mut clouds = Vec::new();
    for band in &CLOUD_BANDS {
        for i in 0..band.count {
            clouds.push(Cloud {
                x: i as f32 * band.spacing + rng.gen::<f32>() * band.jitter,
                y: ranged(band.y, rng),
                size: ranged(band.size, rng),
                speed: ranged(band.speed, rng),
                opacity: ranged(band.opacity, rng),
                layer: band.layer,
            });
        }
    }
    clouds
}

/// Respawn a cloud past the right edge.  Recycled clouds come back smaller
/// than the initial set.
pub fn recycle_cloud(cloud: &mut Cloud, viewport: &Viewport, rng: &mut impl Rng) {
    let (lead, y, size) = match cloud.layer {
        CloudLayer::Wispy => (200.0, (15.0, 160.0), (25.0, 35.0)),
        CloudLayer::Back => (300.0, (20.0, 120.0), (50.0, 40.0)),
        CloudLayer::Mid => (250.0, (30.0, 140.0), (40.0, 50.0)),
        CloudLayer::Front => (400.0, (25.0, 100.0), (45.0, 55.0)),
    };
    cloud.x = viewport.width + rng.gen::<f32>() * lead;
    cloud.y = ranged(y, rng);
    cloud.size = ranged(size, rng);
}

/// 40 faint stars across the upper 60% of the sky and 20 brighter ones
/// higher up, spread over twice the viewport width.
pub fn generate_stars(viewport: &Viewport, rng: &mut impl Rng) -> Vec<Star> {
    let faint = (0..40).map(|_| Star {
        x: rng.gen::<f32>() * viewport.width * 2.0,
        y: rng.gen::<f32>() * viewport.height * 0.6,
        size: 2.0 + rng.gen::<f32>() * 3.0,
        brightness: 0.3 + rng.gen::<f32>() * 0.7,
    });
    let mut stars: Vec<Star> = faint.collect();
    for _ in 0..20 {
        stars.push(Star {
            x: rng.gen::<f32>() * viewport.width * 2.0,
            y: rng.gen::<f32>() * viewport.height * 0.5,
            size: 2.0 + rng.gen::<f32>() * 3.0,
            brightness: 0.6 + rng.gen::<f32>() * 0.4,
        });
    }
    stars
}
