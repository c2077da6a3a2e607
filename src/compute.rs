/// Run lifecycle and the per-frame simulation step.
///
/// `init_state` builds the idle screen from a viewport and tuning.  The
/// other transitions read the current `GameState` and return the next one;
/// all randomness comes from the RNG the caller passes in.

use rand::Rng;

use crate::collision::overlaps;
use crate::config::Tuning;
use crate::entities::{Character, GameState, GameStatus, Player, SpawnTimers, Viewport};
use crate::lighting::{apply_light_level, light_level, reset_lights};
use crate::physics::{
    advance_collectibles, advance_grass, advance_obstacles, advance_particles, advance_pebbles,
    integrate_player, launch, speed_at,
};
use crate::spawn::{
    collect_burst, generate_buildings, generate_clouds, generate_stars, jittered_interval,
    obstacle_interval, recycle_building, recycle_cloud, spawn_collectible, spawn_grass,
    spawn_obstacle, spawn_pebble,
};

/// Parallax factors applied to each backdrop layer's own speed.
const BUILDING_PARALLAX: f32 = 0.5;
const CLOUD_PARALLAX: f32 = 0.3;
const GROUND_PARALLAX: f32 = 0.3;
const RUN_CYCLE_RATE: f32 = 0.2;

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the idle (leaderboard) state with a freshly generated, unlit
/// backdrop.
pub fn init_state(viewport: Viewport, tuning: Tuning, rng: &mut impl Rng) -> GameState {
    let ground_y = viewport.ground_y();
    GameState {
        player: Player::on_ground(ground_y),
        obstacles: Vec::new(),
        collectibles: Vec::new(),
        particles: Vec::new(),
        grass: Vec::new(),
        pebbles: Vec::new(),
        clouds: generate_clouds(rng),
        buildings: generate_buildings(&viewport, 0.0, rng),
        stars: generate_stars(&viewport, rng),
        timers: SpawnTimers::default(),
        score: 0,
        distance: 0.0,
        speed: speed_at(0, &tuning),
        game_time: 0,
        energy_collected: 0,
        city_light_level: 0.0,
        ground_offset: 0.0,
        status: GameStatus::Leaderboard,
        character: None,
        run_id: 0,
        viewport,
        tuning,
    }
}

// ── Input-driven state transitions (pure) ───────────────────────────────────

/// Reset every run field and enter `Playing` with the given character.
/// The backdrop is kept but all its windows go dark again.
pub fn start_run(state: &GameState, character: Option<Character>, rng: &mut impl Rng) -> GameState {
    let mut next = GameState {
        player: Player::on_ground(state.ground_y()),
        obstacles: Vec::new(),
        collectibles: Vec::new(),
        particles: Vec::new(),
        grass: Vec::new(),
        pebbles: Vec::new(),
        timers: SpawnTimers::default(),
        score: 0,
        distance: 0.0,
        speed: speed_at(0, &state.tuning),
        game_time: 0,
        energy_collected: 0,
        city_light_level: 0.0,
        ground_offset: 0.0,
        status: GameStatus::Playing,
        character,
        run_id: state.run_id + 1,
        ..state.clone()
    };
    reset_lights(&mut next.buildings, next.city_light_level, rng);
    log::info!(
        "run {} started as {}",
        next.run_id,
        character.map(Character::name).unwrap_or("nobody")
    );
    next
}

/// Jump, if the player is standing on the ground during a run.
pub fn jump(state: &GameState) -> GameState {
    if state.status != GameStatus::Playing {
        return state.clone();
    }
    match launch(&state.player, state.tuning.jump_power) {
        Some(player) => GameState {
            player,
            ..state.clone()
        },
        None => state.clone(),
    }
}

/// Adopt a new viewport.  Everything anchored to the ground moves with it,
/// and a grounded player (or one the new ground would bury) is put back on
/// the ground.
pub fn resize(state: &GameState, viewport: Viewport) -> GameState {
    let shift = viewport.ground_y() - state.ground_y();
    let mut next = GameState {
        viewport,
        ..state.clone()
    };

    for o in next.obstacles.iter_mut() {
        o.y += shift;
    }
    for c in next.collectibles.iter_mut() {
        c.base_y += shift;
        c.y += shift;
    }
    for g in next.grass.iter_mut() {
        g.y += shift;
    }
    for p in next.pebbles.iter_mut() {
        p.y += shift;
    }
    for b in next.buildings.iter_mut() {
        b.y = viewport.ground_y() - b.height;
    }

    let rest = next.player.rest_y(viewport.ground_y());
    if next.player.grounded || next.player.y > rest {
        next.player = Player {
            y: rest,
            velocity_y: 0.0,
            jumping: false,
            grounded: true,
            ..next.player
        };
    }
    next
}

// ── Per-frame tick (nearly pure — RNG is injected) ──────────────────────────

/// Advance the simulation by one frame.  All randomness comes through `rng`
/// so callers control determinism (useful for tests with a seeded RNG).
///
/// The backdrop animates in every state; everything else only moves while
/// a run is in progress.
pub fn tick(state: &GameState, rng: &mut impl Rng) -> GameState {
    let game_time = state.game_time + 1;
    let mut next = GameState {
        game_time,
        ..state.clone()
    };

    // ── 1. Backdrop ──────────────────────────────────────────────────────────
    advance_backdrop(&mut next, rng);

    if state.status != GameStatus::Playing {
        return next;
    }

    // ── 2. Run counters & speed ──────────────────────────────────────────────
    next.distance += state.speed * state.tuning.distance_factor;
    next.score += 1;
    next.speed = speed_at(game_time, &state.tuning);
    next.ground_offset += next.speed * GROUND_PARALLAX;
    for star in next.stars.iter_mut() {
        let wave = (game_time as f32 * 0.002 + star.x * 0.01).sin();
        star.brightness = 0.3 + 0.7 * (0.5 + 0.5 * wave);
    }

    // ── 3. Player ────────────────────────────────────────────────────────────
    next.player.run_cycle += next.speed * RUN_CYCLE_RATE;
    next.player = integrate_player(&next.player, state.tuning.gravity, next.ground_y());

    // ── 4. Spawners ──────────────────────────────────────────────────────────
    run_spawners(&mut next, rng);

    // ── 5. Obstacles: scroll, then the newest box touching the player ends the run
    next.obstacles = advance_obstacles(&next.obstacles, next.speed);
    let player_box = next.player.bounds();
    let margin = state.tuning.collision_margin;
    if next
        .obstacles
        .iter()
        .rev()
        .any(|o| overlaps(&player_box, &o.bounds(), margin))
    {
        next.status = GameStatus::GameOver;
        log::info!(
            "run {} over: score {} distance {}",
            next.run_id,
            next.score,
            next.distance.floor()
        );
        return next;
    }

    // ── 6. Collectibles ──────────────────────────────────────────────────────
    let (taken, kept): (Vec<_>, Vec<_>) = advance_collectibles(&next.collectibles, next.speed)
        .into_iter()
        .partition(|c| overlaps(&player_box, &c.bounds(), margin));
    next.collectibles = kept;
    for c in taken.iter().rev() {
        let points = c.kind.points();
        next.score += points;
        next.energy_collected += points;
        next.city_light_level = light_level(next.energy_collected, &state.tuning);
        apply_light_level(&mut next.buildings, next.city_light_level);
        let (cx, cy) = c.center();
        next.particles.extend(collect_burst(cx, cy, rng));
        log::debug!(
            "collected {:?} (+{}), energy {}, light {:.2}",
            c.kind,
            points,
            next.energy_collected,
            next.city_light_level
        );
    }

    // ── 7. Decorations ───────────────────────────────────────────────────────
    next.particles = advance_particles(&next.particles);
    next.grass = advance_grass(&next.grass, next.speed);
    next.pebbles = advance_pebbles(&next.pebbles, next.speed);

    next
}

/// Scroll buildings and clouds at their parallax speeds, recycling any that
/// left the screen.
fn advance_backdrop(next: &mut GameState, rng: &mut impl Rng) {
    let viewport = next.viewport;
    let light = next.city_light_level;
    for building in next.buildings.iter_mut() {
        building.x -= building.depth.speed() * BUILDING_PARALLAX;
        if building.x + building.width < 0.0 {
            recycle_building(building, &viewport, light, rng);
        }
    }
    for cloud in next.clouds.iter_mut() {
        cloud.x -= cloud.speed * CLOUD_PARALLAX;
        if cloud.x + cloud.size * 2.0 < 0.0 {
            recycle_cloud(cloud, &viewport, rng);
        }
    }
}

/// `true` with probability `chance`.  Out-of-range chances saturate.
fn roll(rng: &mut impl Rng, chance: f64) -> bool {
    rng.gen::<f64>() < chance
}

/// Bump every spawn timer and create whatever crossed its threshold.
fn run_spawners(next: &mut GameState, rng: &mut impl Rng) {
    let tuning = &next.tuning;
    let viewport = next.viewport;

    next.timers.obstacle += 1;
    if next.timers.obstacle as f32 > obstacle_interval(next.game_time, tuning) {
        next.obstacles.push(spawn_obstacle(&viewport, rng));
        next.timers.obstacle = 0;
    }

    next.timers.collectible += 1;
    if next.timers.collectible > tuning.collectible_interval {
        if roll(rng, tuning.collectible_chance) {
            next.collectibles.push(spawn_collectible(&viewport, rng));
        }
        next.timers.collectible = 0;
    }

    next.timers.grass += 1;
    if next.timers.grass as f32 > jittered_interval(tuning.grass_interval, rng) {
        if roll(rng, tuning.grass_chance) {
            next.grass.push(spawn_grass(&viewport, rng));
        }
        next.timers.grass = 0;
    }

    next.timers.pebble += 1;
    if next.timers.pebble as f32 > jittered_interval(tuning.pebble_interval, rng) {
        if roll(rng, tuning.pebble_chance) {
            next.pebbles.push(spawn_pebble(&viewport, rng));
        }
        next.timers.pebble = 0;
    }
}
