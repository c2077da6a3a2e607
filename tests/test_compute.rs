use energy_dash::compute::*;
use energy_dash::config::Tuning;
use energy_dash::entities::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn viewport() -> Viewport {
    Viewport::new(1280.0, 720.0)
}

fn playing_state(rng: &mut StdRng) -> GameState {
    let idle = init_state(viewport(), Tuning::default(), rng);
    start_run(&idle, Some(Character::Dave), rng)
}

fn box_on_player(state: &GameState) -> Obstacle {
    let (width, height) = ObstacleKind::TallBox.size();
    Obstacle {
        x: state.player.x + 10.0,
        y: state.ground_y() - height,
        width,
        height,
        kind: ObstacleKind::TallBox,
        fragile: false,
    }
}

// ── init_state ────────────────────────────────────────────────────────────────

#[test]
fn init_state_is_idle_with_a_dark_skyline() {
    let mut rng = seeded_rng();
    let s = init_state(viewport(), Tuning::default(), &mut rng);
    assert_eq!(s.status, GameStatus::Leaderboard);
    assert_eq!(s.score, 0);
    assert_eq!(s.game_time, 0);
    assert_eq!(s.speed, 6.5);
    assert!(s.obstacles.is_empty());
    assert!(s.collectibles.is_empty());
    assert_eq!(s.buildings.len(), 15);
    assert_eq!(s.clouds.len(), 29);
    assert_eq!(s.stars.len(), 60);
    assert!(s.buildings.iter().all(|b| b.windows.iter().all(|w| !w.lit)));
    assert!(s.buildings.windows(2).all(|pair| pair[0].depth <= pair[1].depth));
}

#[test]
fn init_state_puts_player_on_ground() {
    let mut rng = seeded_rng();
    let s = init_state(viewport(), Tuning::default(), &mut rng);
    assert_eq!(s.ground_y(), 620.0);
    assert_eq!(s.player.x, 100.0);
    assert_eq!(s.player.y, 620.0 - 105.0);
    assert!(s.player.grounded);
}

// ── start_run ─────────────────────────────────────────────────────────────────

#[test]
fn start_run_resets_every_run_field() {
    let mut rng = seeded_rng();
    let mut s = playing_state(&mut rng);
    for _ in 0..50 {
        s = tick(&s, &mut rng);
    }
    s.energy_collected = 120;
    s.city_light_level = 0.4;
    s.buildings[0].windows[0].lit = true;
    s.obstacles.push(box_on_player(&s));
    s.status = GameStatus::GameOver;

    let fresh = start_run(&s, Some(Character::Mel), &mut rng);
    assert_eq!(fresh.status, GameStatus::Playing);
    assert_eq!(fresh.score, 0);
    assert_eq!(fresh.distance, 0.0);
    assert_eq!(fresh.game_time, 0);
    assert_eq!(fresh.speed, 6.5);
    assert_eq!(fresh.energy_collected, 0);
    assert_eq!(fresh.city_light_level, 0.0);
    assert_eq!(fresh.timers, SpawnTimers::default());
    assert!(fresh.obstacles.is_empty());
    assert!(fresh.particles.is_empty());
    assert_eq!(fresh.character, Some(Character::Mel));
    assert_eq!(fresh.run_id, s.run_id + 1);
    assert!(fresh.buildings.iter().all(|b| b.windows.iter().all(|w| !w.lit)));
}

// ── jump ──────────────────────────────────────────────────────────────────────

#[test]
fn jump_sets_jump_power_when_grounded() {
    let mut rng = seeded_rng();
    let s = playing_state(&mut rng);
    let j = jump(&s);
    assert_eq!(j.player.velocity_y, -16.0);
    assert!(j.player.jumping);
    assert!(!j.player.grounded);
}

#[test]
fn jump_is_ignored_outside_play() {
    let mut rng = seeded_rng();
    let idle = init_state(viewport(), Tuning::default(), &mut rng);
    let j = jump(&idle);
    assert_eq!(j.player, idle.player);

    let mut over = playing_state(&mut rng);
    over.status = GameStatus::GameOver;
    assert_eq!(jump(&over).player, over.player);
}

#[test]
fn jump_is_ignored_while_airborne() {
    let mut rng = seeded_rng();
    let s = tick(&jump(&playing_state(&mut rng)), &mut rng);
    let velocity = s.player.velocity_y;
    let again = jump(&s);
    assert_eq!(again.player.velocity_y, velocity);
}

#[test]
fn jump_arc_lands_exactly_on_the_ground() {
    let mut rng = seeded_rng();
    let mut s = jump(&playing_state(&mut rng));
    let rest = s.player.rest_y(s.ground_y());
    let mut previous = s.player.velocity_y;
    let mut ticks = 0;
    while !s.player.grounded {
        s = tick(&s, &mut rng);
        ticks += 1;
        assert!(s.player.y <= rest);
        if !s.player.grounded {
            assert!((s.player.velocity_y - (previous + 0.7)).abs() < 1e-4);
            previous = s.player.velocity_y;
        }
        assert!(ticks < 100, "player never landed");
    }
    assert_eq!(s.player.y, rest);
    assert_eq!(s.player.velocity_y, 0.0);
    assert!(!s.player.jumping);
    // 16 / 0.7 ≈ 23 ticks up, about the same down
    assert!((44..=48).contains(&ticks), "airtime was {} ticks", ticks);
}

#[test]
fn player_never_sinks_below_the_ground() {
    let mut rng = seeded_rng();
    let mut s = playing_state(&mut rng);
    for i in 0..2000 {
        if i % 37 == 0 {
            s = jump(&s);
        }
        s = tick(&s, &mut rng);
        s.obstacles.clear();
        let rest = s.player.rest_y(s.ground_y());
        assert!(s.player.y <= rest, "tick {}: y {} below rest {}", i, s.player.y, rest);
        if s.player.grounded {
            assert_eq!(s.player.y, rest);
        }
    }
    assert_eq!(s.status, GameStatus::Playing);
}

// ── tick ──────────────────────────────────────────────────────────────────────

#[test]
fn survival_scores_one_point_per_tick() {
    let mut rng = seeded_rng();
    let mut s = playing_state(&mut rng);
    let mut expected_distance = 0.0f32;
    for _ in 0..80 {
        expected_distance += s.speed * 0.1;
        s = tick(&s, &mut rng);
    }
    assert!(s.obstacles.is_empty());
    assert!(s.collectibles.is_empty());
    assert_eq!(s.score, 80);
    assert!((s.distance - expected_distance).abs() < 1e-3);
    assert_eq!(s.status, GameStatus::Playing);
}

#[test]
fn speed_ramps_with_game_time() {
    let mut rng = seeded_rng();
    let mut s = playing_state(&mut rng);
    for _ in 0..10 {
        s = tick(&s, &mut rng);
    }
    assert!((s.speed - (6.5 + 10.0 * 0.001)).abs() < 1e-5);
    assert!((s.speed_multiplier() - s.speed / 6.5).abs() < 1e-6);
}

#[test]
fn first_obstacle_spawns_once_the_timer_passes_the_interval() {
    let mut rng = seeded_rng();
    let mut s = playing_state(&mut rng);
    while s.obstacles.is_empty() {
        s = tick(&s, &mut rng);
        assert!(s.game_time <= 90);
    }
    // 89 > 90 - 89 * 0.015, while 88 is still under the interval
    assert_eq!(s.game_time, 89);
    let o = &s.obstacles[0];
    assert!((o.x - (1280.0 - s.speed)).abs() < 1e-3);
    assert_eq!(o.y + o.height, s.ground_y());
    assert_eq!(s.timers.obstacle, 0);
}

#[test]
fn idle_screen_spawns_nothing_but_keeps_the_backdrop_moving() {
    let mut rng = seeded_rng();
    let idle = init_state(viewport(), Tuning::default(), &mut rng);
    let mut s = idle.clone();
    for _ in 0..500 {
        s = tick(&s, &mut rng);
    }
    assert!(s.obstacles.is_empty());
    assert!(s.collectibles.is_empty());
    assert!(s.grass.is_empty());
    assert!(s.pebbles.is_empty());
    assert_eq!(s.score, 0);
    assert_eq!(s.distance, 0.0);
    assert_eq!(s.timers, SpawnTimers::default());
    assert_ne!(s.buildings[0].x, idle.buildings[0].x);
    assert_ne!(s.clouds[0].x, idle.clouds[0].x);
}

#[test]
fn hitting_a_box_ends_the_run_and_freezes_progress() {
    let mut rng = seeded_rng();
    let mut s = playing_state(&mut rng);
    for _ in 0..20 {
        s = tick(&s, &mut rng);
    }
    s.obstacles.push(box_on_player(&s));
    let s = tick(&s, &mut rng);
    assert_eq!(s.status, GameStatus::GameOver);
    assert_eq!(s.score, 21);

    let mut later = s.clone();
    for _ in 0..30 {
        later = tick(&later, &mut rng);
    }
    assert_eq!(later.status, GameStatus::GameOver);
    assert_eq!(later.score, s.score);
    assert_eq!(later.distance, s.distance);
    assert_eq!(later.obstacles, s.obstacles);
    assert_eq!(later.player, s.player);
    assert_ne!(later.clouds[0].x, s.clouds[0].x);
}

#[test]
fn jumping_clears_a_box() {
    let mut rng = seeded_rng();
    let mut s = playing_state(&mut rng);
    // A small box far enough ahead to be under the player at the top of the jump.
    let (width, height) = ObstacleKind::SmallBox.size();
    s.obstacles.push(Obstacle {
        x: s.player.x + s.player.width + 23.0 * s.speed,
        y: s.ground_y() - height,
        width,
        height,
        kind: ObstacleKind::SmallBox,
        fragile: true,
    });
    s = jump(&s);
    for _ in 0..60 {
        s = tick(&s, &mut rng);
        assert_eq!(s.status, GameStatus::Playing);
    }
}

#[test]
fn collecting_energy_scores_and_lights_the_city() {
    let mut rng = seeded_rng();
    let mut s = playing_state(&mut rng);
    s.collectibles.push(Collectible {
        x: s.player.x,
        y: s.player.y + 10.0,
        base_y: s.player.y + 10.0,
        width: COLLECTIBLE_SIZE,
        height: COLLECTIBLE_SIZE,
        kind: EnergyKind::Gold,
        bob: 0.0,
    });
    let s = tick(&s, &mut rng);
    assert_eq!(s.status, GameStatus::Playing);
    assert!(s.collectibles.is_empty());
    assert_eq!(s.score, 1 + 100);
    assert_eq!(s.energy_collected, 100);
    assert!((s.city_light_level - 0.4).abs() < 1e-6);
    assert!(s.particles.len() >= 15);
    for b in s.buildings.iter().filter(|b| !b.windows.is_empty()) {
        assert!(b.lit_fraction() >= 0.4 - 1e-6);
    }
}

#[test]
fn missed_energy_scrolls_away() {
    let mut rng = seeded_rng();
    let mut s = playing_state(&mut rng);
    s.collectibles.push(Collectible {
        x: 300.0,
        y: 100.0,
        base_y: 100.0,
        width: COLLECTIBLE_SIZE,
        height: COLLECTIBLE_SIZE,
        kind: EnergyKind::White,
        bob: 0.0,
    });
    for _ in 0..60 {
        s = tick(&s, &mut rng);
    }
    assert!(s.collectibles.is_empty());
    assert_eq!(s.energy_collected, 0);
}

// ── resize ────────────────────────────────────────────────────────────────────

#[test]
fn resize_moves_the_ground_and_everything_on_it() {
    let mut rng = seeded_rng();
    let mut s = playing_state(&mut rng);
    s.obstacles.push(Obstacle {
        x: 900.0,
        y: s.ground_y() - 30.0,
        width: 35.0,
        height: 30.0,
        kind: ObstacleKind::SmallBox,
        fragile: false,
    });
    let r = resize(&s, Viewport::new(1000.0, 600.0));
    assert_eq!(r.ground_y(), 500.0);
    assert_eq!(r.player.y, 500.0 - 105.0);
    assert_eq!(r.obstacles[0].y, 470.0);
    assert!(r.buildings.iter().all(|b| (b.y + b.height - 500.0).abs() < 1e-3));
}

#[test]
fn resize_keeps_an_airborne_player_in_the_air() {
    let mut rng = seeded_rng();
    let mut s = jump(&playing_state(&mut rng));
    for _ in 0..5 {
        s = tick(&s, &mut rng);
    }
    let r = resize(&s, Viewport::new(1280.0, 800.0));
    assert_eq!(r.player.y, s.player.y);
    assert!(!r.player.grounded);
}
