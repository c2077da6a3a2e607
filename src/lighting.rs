/// City lighting: collected energy turns on building windows.
///
/// The light level is a step function of the energy collected in the
/// current run.  Windows only ever switch on during a run; a new run
/// re-rolls every window against the (reset) level, which leaves the
/// city dark.

use rand::Rng;

use crate::config::Tuning;
use crate::entities::{Building, Window};

/// Window grid pitch in world units.
const WINDOW_ROW_PITCH: f32 = 25.0;
const WINDOW_COL_PITCH: f32 = 20.0;

/// `min(max, floor(energy / step_energy) * step)`.
pub fn light_level(energy_collected: u32, tuning: &Tuning) -> f32 {
    let steps = energy_collected / tuning.energy_per_light_step.max(1);
    (steps as f32 * tuning.light_step).min(tuning.max_light_level)
}

/// Window layout for a building of the given size.  Each window is lit
/// with probability `light_level`.
pub fn generate_windows(width: f32, height: f32, light_level: f32, rng: &mut impl Rng) -> Vec<Window> {
    let rows = (height / WINDOW_ROW_PITCH).floor() as u32;
    let cols = (width / WINDOW_COL_PITCH).floor() as u32;
    let mut windows = Vec::new();
    for row in 1..rows {
        for col in 1..cols {
            windows.push(Window {
                x: col as f32 * (width / cols as f32) - 4.0,
                y: row as f32 * (height / rows as f32) - 4.0,
                lit: rng.gen::<f32>() < light_level,
            });
        }
    }
    windows
}

/// Switch on unlit windows until every building's lit fraction reaches
/// `target`.  Lit windows are never switched off.
pub fn apply_light_level(buildings: &mut [Building], target: f32) {
    if target <= 0.0 {
        return;
    }
    for building in buildings.iter_mut() {
        let total = building.windows.len();
        let current = building.lit_fraction();
        if current >= target {
            continue;
        }
        let to_light = ((target - current) * total as f32).ceil() as usize;
        building
            .windows
            .iter_mut()
            .filter(|w| !w.lit)
            .take(to_light)
            .for_each(|w| w.lit = true);
    }
}

/// Re-roll every window against `light_level`.
pub fn reset_lights(buildings: &mut [Building], light_level: f32, rng: &mut impl Rng) {
    for building in buildings.iter_mut() {
        for window in building.windows.iter_mut() {
            window.lit = rng.gen::<f32>() < light_level;
        }
    }
}
