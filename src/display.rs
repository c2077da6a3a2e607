/// Rendering layer — all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// session.  No game logic is performed; this module only translates world
/// coordinates into terminal cells.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use energy_dash::entities::{
    Building, Character, CloudLayer, Collectible, EnergyKind, GameState, GameStatus, Obstacle,
    ParticleKind,
};
use energy_dash::leaderboard::{ScoreStore, MAX_ENTRIES};
use energy_dash::session::Session;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_STAR: Color = Color::White;
const C_CLOUD: Color = Color::Grey;
const C_GROUND: Color = Color::Rgb { r: 0x8b, g: 0x45, b: 0x13 };
const C_GRASS_LINE: Color = Color::Rgb { r: 0x22, g: 0x8b, b: 0x22 };
const C_WINDOW_LIT: Color = Color::Rgb { r: 0xff, g: 0xe0, b: 0x66 };
const C_WINDOW_DARK: Color = Color::Rgb { r: 0x1a, g: 0x1a, b: 0x2e };
const C_BOX: Color = Color::Rgb { r: 0xde, g: 0xb8, b: 0x87 };
const C_FRAGILE: Color = Color::Red;
const C_HUD: Color = Color::Yellow;
const C_HINT: Color = Color::DarkGrey;

const BUILDING_COLORS: [(u8, u8, u8); 12] = [
    (0x2c, 0x3e, 0x50), (0x34, 0x49, 0x5e), (0x5d, 0x4e, 0x75), (0x4a, 0x67, 0x41),
    (0x8b, 0x73, 0x55), (0x6b, 0x70, 0x5c), (0x7f, 0x84, 0x71), (0x5a, 0x6a, 0x62),
    (0x4a, 0x55, 0x68), (0x2d, 0x37, 0x48), (0x55, 0x3c, 0x9a), (0x6f, 0x42, 0xc1),
];
const GRASS_COLORS: [Color; 3] = [
    Color::Rgb { r: 0x22, g: 0x8b, b: 0x22 },
    Color::Rgb { r: 0x32, g: 0xcd, b: 0x32 },
    Color::Rgb { r: 0x00, g: 0x64, b: 0x00 },
];
const PEBBLE_COLORS: [Color; 6] = [
    Color::Rgb { r: 0x5d, g: 0x2f, b: 0x0a },
    Color::Rgb { r: 0x4a, g: 0x25, b: 0x07 },
    Color::Rgb { r: 0x6b, g: 0x37, b: 0x10 },
    Color::Rgb { r: 0xa0, g: 0x52, b: 0x2d },
    Color::Rgb { r: 0xcd, g: 0x85, b: 0x3f },
    Color::Rgb { r: 0xde, g: 0xb8, b: 0x87 },
];

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb { r, g, b }
}

fn energy_color(kind: EnergyKind) -> Color {
    match kind {
        EnergyKind::White => Color::White,
        EnergyKind::Yellow => Color::Yellow,
        EnergyKind::Blue => Color::Rgb { r: 0x00, g: 0xbf, b: 0xff },
        EnergyKind::Gold => Color::Rgb { r: 0xff, g: 0xd7, b: 0x00 },
    }
}

fn particle_color(kind: ParticleKind, shade: u8) -> Color {
    let options: &[Color] = match kind {
        ParticleKind::Sparkle => &[Color::Rgb { r: 0xff, g: 0xd7, b: 0x00 }, Color::Yellow, Color::White, Color::Cyan],
        ParticleKind::Orb => &[Color::Yellow, Color::Rgb { r: 0xff, g: 0xd7, b: 0x00 }, Color::Rgb { r: 0xff, g: 0xff, b: 0x7f }],
        ParticleKind::Lightning => &[Color::Rgb { r: 0xff, g: 0xa5, b: 0x00 }, Color::Rgb { r: 0xff, g: 0x8c, b: 0x00 }, Color::Rgb { r: 0xff, g: 0xb3, b: 0x47 }],
    };
    options[(shade as usize).min(options.len() - 1)]
}

// ── World → cell mapping ──────────────────────────────────────────────────────

/// Maps world units onto the terminal grid.
struct Grid {
    cols: u16,
    rows: u16,
    sx: f32,
    sy: f32,
}

impl Grid {
    fn new(state: &GameState, cols: u16, rows: u16) -> Self {
        Grid {
            cols,
            rows,
            sx: cols as f32 / state.viewport.width.max(1.0),
            sy: rows as f32 / state.viewport.height.max(1.0),
        }
    }

    fn cell(&self, x: f32, y: f32) -> Option<(u16, u16)> {
        let cx = (x * self.sx).floor();
        let cy = (y * self.sy).floor();
        if cx < 0.0 || cy < 0.0 || cx >= self.cols as f32 || cy >= self.rows as f32 {
            return None;
        }
        Some((cx as u16, cy as u16))
    }

    /// Inclusive cell span covered by a world rectangle, clipped to the grid.
    fn span(&self, x: f32, y: f32, w: f32, h: f32) -> Option<(u16, u16, u16, u16)> {
        let x0 = (x * self.sx).floor().max(0.0);
        let y0 = (y * self.sy).floor().max(0.0);
        let x1 = ((x + w) * self.sx).ceil().min(self.cols as f32) - 1.0;
        let y1 = ((y + h) * self.sy).ceil().min(self.rows as f32) - 1.0;
        if x1 < x0 || y1 < y0 {
            return None;
        }
        Some((x0 as u16, y0 as u16, x1 as u16, y1 as u16))
    }
}

fn put<W: Write>(out: &mut W, grid: &Grid, x: f32, y: f32, glyph: &str, color: Color) -> std::io::Result<()> {
    if let Some((cx, cy)) = grid.cell(x, y) {
        out.queue(cursor::MoveTo(cx, cy))?;
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(glyph))?;
    }
    Ok(())
}

fn fill<W: Write>(
    out: &mut W,
    grid: &Grid,
    (x, y, w, h): (f32, f32, f32, f32),
    glyph: char,
    color: Color,
) -> std::io::Result<()> {
    let Some((x0, y0, x1, y1)) = grid.span(x, y, w, h) else {
        return Ok(());
    };
    let row: String = std::iter::repeat(glyph).take((x1 - x0 + 1) as usize).collect();
    out.queue(style::SetForegroundColor(color))?;
    for cy in y0..=y1 {
        out.queue(cursor::MoveTo(x0, cy))?;
        out.queue(Print(&row))?;
    }
    Ok(())
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.  `name_input` is the name typed so far on
/// the high-score screen.
pub fn render<W: Write, S: ScoreStore>(
    out: &mut W,
    session: &Session<S>,
    name_input: &str,
) -> std::io::Result<()> {
    let state = session.state();
    let (cols, rows) = terminal::size()?;
    let grid = Grid::new(state, cols, rows);

    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_sky(out, &grid, state)?;
    for building in &state.buildings {
        draw_building(out, &grid, building)?;
    }
    draw_ground(out, &grid, state)?;

    if state.status != GameStatus::Leaderboard {
        for obstacle in &state.obstacles {
            draw_obstacle(out, &grid, obstacle)?;
        }
        for collectible in &state.collectibles {
            draw_collectible(out, &grid, collectible)?;
        }
        for p in &state.particles {
            put(out, &grid, p.x, p.y, "*", particle_color(p.kind, p.shade))?;
        }
        if let Some(character) = state.character {
            draw_player(out, &grid, state, character)?;
        }
        draw_hud(out, session)?;
    }

    match state.status {
        GameStatus::Leaderboard => draw_leaderboard(out, session, cols, rows)?,
        GameStatus::GameOver => draw_game_over(out, session, name_input, cols, rows)?,
        GameStatus::Playing => {}
    }

    out.queue(style::ResetColor)?;
    out.flush()
}

// ── Backdrop ──────────────────────────────────────────────────────────────────

fn draw_sky<W: Write>(out: &mut W, grid: &Grid, state: &GameState) -> std::io::Result<()> {
    for star in &state.stars {
        let glyph = if star.brightness > 0.7 { "*" } else { "." };
        put(out, grid, star.x, star.y, glyph, C_STAR)?;
    }
    for cloud in &state.clouds {
        let glyph = match cloud.layer {
            CloudLayer::Wispy => "~",
            CloudLayer::Back => "~~",
            CloudLayer::Mid | CloudLayer::Front => "~~~",
        };
        put(out, grid, cloud.x, cloud.y, glyph, C_CLOUD)?;
    }
    Ok(())
}

fn draw_building<W: Write>(out: &mut W, grid: &Grid, b: &Building) -> std::io::Result<()> {
    let color = rgb(BUILDING_COLORS[b.palette as usize % BUILDING_COLORS.len()]);
    fill(out, grid, (b.x, b.y, b.width, b.height), '█', color)?;
    for w in &b.windows {
        let glyph_color = if w.lit { C_WINDOW_LIT } else { C_WINDOW_DARK };
        put(out, grid, b.x + w.x, b.y + w.y, "▪", glyph_color)?;
    }
    Ok(())
}

fn draw_ground<W: Write>(out: &mut W, grid: &Grid, state: &GameState) -> std::io::Result<()> {
    let ground_y = state.ground_y();
    fill(out, grid, (0.0, ground_y, state.viewport.width, state.viewport.height - ground_y), '░', C_GROUND)?;
    fill(out, grid, (0.0, ground_y, state.viewport.width, 1.0), '▀', C_GRASS_LINE)?;
    for p in &state.pebbles {
        let glyph = if p.round { "o" } else { "0" };
        put(out, grid, p.x, p.y, glyph, PEBBLE_COLORS[p.shade as usize % PEBBLE_COLORS.len()])?;
    }
    for g in &state.grass {
        put(out, grid, g.x, g.y, "\"", GRASS_COLORS[g.shade as usize % GRASS_COLORS.len()])?;
    }
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_obstacle<W: Write>(out: &mut W, grid: &Grid, o: &Obstacle) -> std::io::Result<()> {
    fill(out, grid, (o.x, o.y, o.width, o.height), '▓', C_BOX)?;
    if o.fragile {
        put(out, grid, o.x, o.y + o.height / 2.0, "!", C_FRAGILE)?;
    }
    Ok(())
}

fn draw_collectible<W: Write>(out: &mut W, grid: &Grid, c: &Collectible) -> std::io::Result<()> {
    let (cx, cy) = c.center();
    put(out, grid, cx, cy, "⚡", energy_color(c.kind))
}

fn draw_player<W: Write>(
    out: &mut W,
    grid: &Grid,
    state: &GameState,
    character: Character,
) -> std::io::Result<()> {
    let p = &state.player;
    fill(out, grid, (p.x, p.y, p.width, p.height * 0.8), '█', rgb(character.color()))?;
    // Legs alternate with the run cycle while on the ground.
    let legs = if !p.grounded {
        "/\\"
    } else if p.run_cycle.sin() > 0.0 {
        "/|"
    } else {
        "|\\"
    };
    put(out, grid, p.x + p.width * 0.25, p.y + p.height * 0.85, legs, rgb(character.color()))
}

// ── HUD ───────────────────────────────────────────────────────────────────────

fn draw_hud<W: Write, S: ScoreStore>(out: &mut W, session: &Session<S>) -> std::io::Result<()> {
    let hud = format!(
        " SCORE {:>6}   DISTANCE {:>5}m   SPEED {:.1}X   CITY ",
        session.score(),
        session.distance(),
        session.speed_multiplier(),
    );
    out.queue(cursor::MoveTo(0, 0))?;
    out.queue(style::SetForegroundColor(C_HUD))?;
    out.queue(Print(&hud))?;

    let max = session.state().tuning.max_light_level.max(f32::EPSILON);
    let filled = ((session.city_light_level() / max) * 10.0).round() as usize;
    let bar: String = (0..10).map(|i| if i < filled { '■' } else { '□' }).collect();
    out.queue(style::SetForegroundColor(C_WINDOW_LIT))?;
    out.queue(Print(bar))?;
    Ok(())
}

// ── Screens ───────────────────────────────────────────────────────────────────

fn centered<W: Write>(out: &mut W, cols: u16, row: u16, text: &str, color: Color) -> std::io::Result<()> {
    let col = (cols / 2).saturating_sub(text.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

fn draw_leaderboard<W: Write, S: ScoreStore>(
    out: &mut W,
    session: &Session<S>,
    cols: u16,
    rows: u16,
) -> std::io::Result<()> {
    let top = (rows / 2).saturating_sub(9);
    centered(out, cols, top, "⚡  ENERGY  DASH  ⚡", Color::Cyan)?;
    centered(out, cols, top + 1, "HIGH SCORES", Color::Yellow)?;

    let entries = session.leaderboard();
    for i in 0..MAX_ENTRIES {
        let line = match entries.get(i) {
            Some(e) => format!("{:>2}. {:<16} {:>8}", i + 1, e.name, e.score),
            None if entries.is_empty() && i < 3 => {
                let filler = ["NO SCORES YET", "BE THE FIRST", "TO PLAY!"][i];
                format!("{:>2}. {:<16} {:>8}", i + 1, filler, 0)
            }
            None => format!("{:>2}. {:<16} {:>8}", i + 1, "---", 0),
        };
        let color = if i < entries.len() { Color::White } else { C_HINT };
        centered(out, cols, top + 3 + i as u16, &line, color)?;
    }

    let row = top + 4 + MAX_ENTRIES as u16;
    let picked = session.character().map(Character::name).unwrap_or("none");
    centered(out, cols, row, &format!("Character: {}", picked), Color::Magenta)?;
    let picker: Vec<String> = Character::ALL
        .iter()
        .enumerate()
        .map(|(i, c)| format!("[{}] {} ({})", i + 1, c.name(), c.description()))
        .collect();
    centered(out, cols, row + 1, &format!("{}  [0] none", picker.join("  ")), C_HINT)?;
    centered(out, cols, row + 3, "SPACE / ↑ / CLICK : Start & Jump   Q : Quit", C_HINT)?;
    Ok(())
}

fn draw_game_over<W: Write, S: ScoreStore>(
    out: &mut W,
    session: &Session<S>,
    name_input: &str,
    cols: u16,
    rows: u16,
) -> std::io::Result<()> {
    let top = (rows / 2).saturating_sub(4);
    centered(out, cols, top, "╔════════════════════╗", Color::Red)?;
    centered(out, cols, top + 1, "║     GAME  OVER     ║", Color::Red)?;
    centered(out, cols, top + 2, "╚════════════════════╝", Color::Red)?;
    centered(out, cols, top + 3, &format!("Final Score: {}", session.score()), Color::Yellow)?;
    centered(out, cols, top + 4, &format!("Distance: {}m", session.distance()), Color::Yellow)?;

    if session.awaiting_name() {
        centered(out, cols, top + 6, "NEW HIGH SCORE!", Color::Magenta)?;
        centered(out, cols, top + 7, &format!("Name: {}_", name_input), Color::White)?;
        centered(out, cols, top + 8, "ENTER : Save   ESC : Quit", C_HINT)?;
    } else {
        centered(out, cols, top + 6, "R : Play Again   Q : Quit", C_HINT)?;
    }
    Ok(())
}
