use energy_dash::config::Tuning;
use energy_dash::entities::*;
use energy_dash::lighting::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn building(width: f32, height: f32, rng: &mut StdRng) -> Building {
    Building {
        x: 0.0,
        y: 0.0,
        width,
        height,
        depth: Depth::for_height(height),
        palette: 0,
        windows: generate_windows(width, height, 0.0, rng),
    }
}

#[test]
fn light_steps_every_twenty_five_energy() {
    let tuning = Tuning::default();
    assert_eq!(light_level(0, &tuning), 0.0);
    assert_eq!(light_level(24, &tuning), 0.0);
    assert!((light_level(25, &tuning) - 0.1).abs() < 1e-6);
    assert!((light_level(49, &tuning) - 0.1).abs() < 1e-6);
    assert!((light_level(250, &tuning) - 0.95).abs() < 1e-6);
    assert!((light_level(100_000, &tuning) - 0.95).abs() < 1e-6);
}

#[test]
fn light_never_decreases_as_energy_grows() {
    let tuning = Tuning::default();
    let mut previous = 0.0;
    for energy in (0..400).step_by(5) {
        let level = light_level(energy, &tuning);
        assert!(level >= previous);
        assert!(level <= 0.95);
        previous = level;
    }
}

#[test]
fn window_grid_skips_the_outer_row_and_column() {
    let mut rng = StdRng::seed_from_u64(3);
    // 5 rows x 5 cols, windows at 1..5 in each direction
    let windows = generate_windows(100.0, 125.0, 0.0, &mut rng);
    assert_eq!(windows.len(), 16);
    assert!(windows.iter().all(|w| !w.lit));
    assert_eq!(windows[0].x, 16.0);
    assert_eq!(windows[0].y, 21.0);

    let all_lit = generate_windows(100.0, 125.0, 1.0, &mut rng);
    assert!(all_lit.iter().all(|w| w.lit));
}

#[test]
fn apply_reaches_target_and_never_switches_off() {
    let mut rng = StdRng::seed_from_u64(4);
    let mut buildings: Vec<Building> = (0..5)
        .map(|i| building(90.0 + i as f32 * 20.0, 100.0 + i as f32 * 50.0, &mut rng))
        .collect();
    buildings[0].windows[0].lit = true;

    for target in [0.1, 0.3, 0.2, 0.6, 0.95] {
        let before: Vec<Vec<bool>> = buildings
            .iter()
            .map(|b| b.windows.iter().map(|w| w.lit).collect())
            .collect();
        apply_light_level(&mut buildings, target);
        for (b, was) in buildings.iter().zip(&before) {
            for (w, lit) in b.windows.iter().zip(was) {
                assert!(w.lit || !lit, "a window was switched off");
            }
        }
    }
    for b in &buildings {
        assert!(b.lit_fraction() >= 0.95 - 1e-6);
    }
}

#[test]
fn zero_target_changes_nothing() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut buildings = vec![building(120.0, 200.0, &mut rng)];
    let before = buildings.clone();
    apply_light_level(&mut buildings, 0.0);
    assert_eq!(buildings, before);
}

#[test]
fn reset_to_zero_goes_dark() {
    let mut rng = StdRng::seed_from_u64(6);
    let mut buildings = vec![building(150.0, 300.0, &mut rng), building(90.0, 60.0, &mut rng)];
    apply_light_level(&mut buildings, 0.9);
    assert!(buildings.iter().any(|b| b.lit_fraction() > 0.0));
    reset_lights(&mut buildings, 0.0, &mut rng);
    assert!(buildings.iter().all(|b| b.lit_fraction() == 0.0));
}
