mod display;

use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent, MouseEventKind,
    },
    terminal, ExecutableCommand,
};
use directories::ProjectDirs;
use rand::rngs::StdRng;
use rand::SeedableRng;

use energy_dash::compute::init_state;
use energy_dash::config::{load_settings, save_settings, Settings};
use energy_dash::entities::{Character, GameStatus, Viewport};
use energy_dash::leaderboard::JsonFileStore;
use energy_dash::session::{PlayerAction, Session};

/// World height in units; the width follows the terminal's aspect ratio.
const WORLD_HEIGHT: f32 = 720.0;
/// Terminal cells are roughly twice as tall as they are wide.
const CELL_ASPECT: f32 = 2.0;
const MAX_NAME_LEN: usize = 16;

#[derive(Parser, Debug)]
#[command(name = "energy_dash", about = "Endless runner: jump the boxes, collect energy, light up the city")]
struct Args {
    /// RNG seed for a reproducible session
    #[arg(long)]
    seed: Option<u64>,

    /// dave, mel, ash, charlie, or none
    #[arg(long)]
    character: Option<String>,

    /// frames per second
    #[arg(long)]
    fps: Option<u32>,

    /// settings file (JSON)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// score file (JSON)
    #[arg(long)]
    scores: Option<PathBuf>,
}

fn data_dir() -> PathBuf {
    ProjectDirs::from("com", "energy-dash", "EnergyDash")
        .map(|p| p.data_local_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

fn world_viewport(cols: u16, rows: u16) -> Viewport {
    let rows = rows.max(1) as f32;
    let width = WORLD_HEIGHT * cols as f32 / (rows * CELL_ASPECT);
    Viewport::new(width, WORLD_HEIGHT)
}

fn load_or_write_settings(path: &Path) -> Settings {
    if path.exists() {
        return load_settings(path);
    }
    let settings = Settings::default();
    if let Err(e) = save_settings(path, &settings) {
        log::warn!("could not write default settings: {:#}", e);
    }
    settings
}

// ── Input ─────────────────────────────────────────────────────────────────────

enum Flow {
    Continue,
    Quit,
}

/// Translate one terminal event into session actions.  Name entry on the
/// high-score screen takes every printable key.
fn handle_event(event: Event, session: &mut Session<JsonFileStore>, name: &mut String) -> Flow {
    match event {
        Event::Key(KeyEvent { code, kind, modifiers, .. }) => {
            if kind == KeyEventKind::Release {
                return Flow::Continue;
            }
            if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
                return Flow::Quit;
            }
            if session.awaiting_name() {
                match code {
                    KeyCode::Esc => return Flow::Quit,
                    KeyCode::Enter => {
                        if session.apply(PlayerAction::ConfirmSave(name.clone())) {
                            name.clear();
                        }
                    }
                    KeyCode::Backspace => {
                        name.pop();
                    }
                    KeyCode::Char(c) if !c.is_control() && name.chars().count() < MAX_NAME_LEN => {
                        name.push(c);
                    }
                    _ => {}
                }
                return Flow::Continue;
            }
            match code {
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Flow::Quit,
                KeyCode::Char(' ') | KeyCode::Up => {
                    session.apply(PlayerAction::Press);
                }
                KeyCode::Char('r') | KeyCode::Char('R') if session.status() == GameStatus::GameOver => {
                    session.apply(PlayerAction::Start);
                }
                KeyCode::Char('0') => {
                    session.apply(PlayerAction::SelectCharacter(None));
                }
                KeyCode::Char(c @ '1'..='4') => {
                    let index = c as usize - '1' as usize;
                    session.apply(PlayerAction::SelectCharacter(Some(Character::ALL[index])));
                }
                _ => {}
            }
        }
        Event::Mouse(MouseEvent { kind: MouseEventKind::Down(_), .. }) => {
            if !session.awaiting_name() {
                session.apply(PlayerAction::Press);
            }
        }
        Event::Resize(cols, rows) => session.resize(world_viewport(cols, rows)),
        _ => {}
    }
    Flow::Continue
}

// ── Frame loop ────────────────────────────────────────────────────────────────

/// One simulation step and one render per frame until the player quits.
fn game_loop<W: Write>(
    out: &mut W,
    session: &mut Session<JsonFileStore>,
    rx: &mpsc::Receiver<Event>,
    frame: Duration,
) -> Result<()> {
    let mut name = String::new();
    loop {
        let frame_start = Instant::now();

        // Drain pending input before the step so a jump lands on this tick.
        while let Ok(event) = rx.try_recv() {
            if let Flow::Quit = handle_event(event, session, &mut name) {
                session.finish();
                return Ok(());
            }
        }

        session.update(Instant::now());
        if session.status() != GameStatus::GameOver {
            name.clear();
        }

        display::render(out, session, &name)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame {
            thread::sleep(frame - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let dir = data_dir();
    let settings_path = args.settings.clone().unwrap_or_else(|| dir.join("settings.json"));
    let settings = load_or_write_settings(&settings_path);
    let scores_path = args.scores.clone().unwrap_or_else(|| dir.join("scores.json"));

    let seed = args.seed.or(settings.seed).unwrap_or_else(rand::random);
    log::info!("RNG seed: {}", seed);
    let character = args
        .character
        .as_deref()
        .or(settings.character.as_deref())
        .and_then(Character::from_name);
    let fps = args.fps.unwrap_or(settings.fps).max(1);
    let frame = Duration::from_secs_f64(1.0 / fps as f64);

    let (cols, rows) = terminal::size().context("querying terminal size")?;
    let mut rng = StdRng::seed_from_u64(seed);
    let state = init_state(world_viewport(cols, rows), settings.tuning.clone(), &mut rng);
    let store = JsonFileStore::new(&scores_path);
    let mut session = Session::new(state, rng, store, character);

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode().context("enabling raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Blocking reads happen on their own thread; the frame loop drains
    // the channel without waiting.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let result = game_loop(&mut out, &mut session, &rx, frame);

    // Always restore the terminal
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}
