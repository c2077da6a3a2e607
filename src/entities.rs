/// All game entity types — pure data, no logic.

use crate::collision::Rect;
use crate::config::Tuning;

/// Distance between the bottom of the viewport and the ground line.
pub const GROUND_DEPTH: f32 = 100.0;

/// Horizontal position the player runs at.
pub const PLAYER_X: f32 = 100.0;
pub const PLAYER_WIDTH: f32 = 75.0;
pub const PLAYER_HEIGHT: f32 = 105.0;

pub const COLLECTIBLE_SIZE: f32 = 70.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    /// Idle screen showing the top scores; doubles as the start menu.
    Leaderboard,
    Playing,
    GameOver,
}

// ── Characters ────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Character {
    Dave,
    Mel,
    Ash,
    CharlieAndRiley,
}

impl Character {
    pub const ALL: [Character; 4] = [
        Character::Dave,
        Character::Mel,
        Character::Ash,
        Character::CharlieAndRiley,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Character::Dave => "Dave",
            Character::Mel => "Mel",
            Character::Ash => "Ash",
            Character::CharlieAndRiley => "Charlie & Riley",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Character::Dave => "Big Softie",
            Character::Mel => "Coffee Lover",
            Character::Ash => "Tech Support",
            Character::CharlieAndRiley => "Double Trouble",
        }
    }

    /// Body colour as `(r, g, b)`.
    pub fn color(self) -> (u8, u8, u8) {
        match self {
            Character::Dave => (0x4a, 0x90, 0xe2),
            Character::Mel => (0x8b, 0x45, 0x13),
            Character::Ash => (0x32, 0xcd, 0x32),
            Character::CharlieAndRiley => (0xff, 0x69, 0xb4),
        }
    }

    /// Case-insensitive lookup by the first word of the name.
    pub fn from_name(name: &str) -> Option<Character> {
        let wanted = name.trim().to_ascii_lowercase();
        Character::ALL.into_iter().find(|c| {
            c.name()
                .split_whitespace()
                .next()
                .map(|first| first.to_ascii_lowercase() == wanted)
                .unwrap_or(false)
        })
    }
}

// ── Catalogs ──────────────────────────────────────────────────────────────────

/// Cardboard box sizes.  Every box sits on the ground.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObstacleKind {
    SmallBox,
    MediumBox,
    LargeBox,
    TallBox,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 4] = [
        ObstacleKind::SmallBox,
        ObstacleKind::MediumBox,
        ObstacleKind::LargeBox,
        ObstacleKind::TallBox,
    ];

    /// `(width, height)` in world units.
    pub fn size(self) -> (f32, f32) {
        match self {
            ObstacleKind::SmallBox => (35.0, 30.0),
            ObstacleKind::MediumBox => (45.0, 40.0),
            ObstacleKind::LargeBox => (55.0, 50.0),
            ObstacleKind::TallBox => (40.0, 60.0),
        }
    }

    pub fn points(self) -> u32 {
        match self {
            ObstacleKind::SmallBox => 5,
            ObstacleKind::MediumBox => 8,
            ObstacleKind::LargeBox => 12,
            ObstacleKind::TallBox => 10,
        }
    }
}

/// Energy bolt tiers, ascending value and descending rarity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnergyKind {
    White,
    Yellow,
    Blue,
    Gold,
}

impl EnergyKind {
    pub const ALL: [EnergyKind; 4] = [
        EnergyKind::White,
        EnergyKind::Yellow,
        EnergyKind::Blue,
        EnergyKind::Gold,
    ];

    pub fn points(self) -> u32 {
        match self {
            EnergyKind::White => 10,
            EnergyKind::Yellow => 25,
            EnergyKind::Blue => 50,
            EnergyKind::Gold => 100,
        }
    }

    /// Relative spawn weight.  The catalog's weights sum to 1.0.
    pub fn rarity(self) -> f32 {
        match self {
            EnergyKind::White => 0.4,
            EnergyKind::Yellow => 0.3,
            EnergyKind::Blue => 0.2,
            EnergyKind::Gold => 0.1,
        }
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub velocity_y: f32,
    pub jumping: bool,
    pub grounded: bool,
    /// Animation phase for the leg cycle; cosmetic only.
    pub run_cycle: f32,
}

impl Player {
    /// A player standing on the ground line.
    pub fn on_ground(ground_y: f32) -> Self {
        Player {
            x: PLAYER_X,
            y: ground_y - PLAYER_HEIGHT,
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            velocity_y: 0.0,
            jumping: false,
            grounded: true,
            run_cycle: 0.0,
        }
    }

    pub fn rest_y(&self, ground_y: f32) -> f32 {
        ground_y - self.height
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

// ── Gameplay entities ─────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Obstacle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub kind: ObstacleKind,
    /// Draw a "FRAGILE" label on the box.
    pub fragile: bool,
}

impl Obstacle {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// A floating energy bolt.
#[derive(Clone, Debug, PartialEq)]
pub struct Collectible {
    pub x: f32,
    /// Current height, `base_y` plus the bob offset.
    pub y: f32,
    pub base_y: f32,
    pub width: f32,
    pub height: f32,
    pub kind: EnergyKind,
    /// Phase of the sinusoidal bob, in radians.
    pub bob: f32,
}

impl Collectible {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

// ── Decorations ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParticleKind {
    /// Fast, small, twinkling.
    Sparkle,
    /// Slow, large, pulsing.
    Orb,
    /// Zig-zags sideways while it falls.
    Lightning,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub velocity_x: f32,
    pub velocity_y: f32,
    /// Remaining frames; the particle is dropped once this reaches zero.
    pub life: f32,
    pub max_life: f32,
    pub size: f32,
    pub kind: ParticleKind,
    /// Twinkle, pulse or zig-zag phase depending on `kind`.
    pub phase: f32,
    /// Index into the renderer's palette for this kind.
    pub shade: u8,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GrassTuft {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub blades: u8,
    pub sway: f32,
    pub shade: u8,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Pebble {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub shade: u8,
    pub round: bool,
    pub opacity: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CloudLayer {
    Back,
    Mid,
    Front,
    Wispy,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Cloud {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub speed: f32,
    pub opacity: f32,
    pub layer: CloudLayer,
}

/// Parallax band of a building, ordered back to front.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Depth {
    Background,
    Middle,
    Foreground,
}

impl Depth {
    /// Band for a building of the given height: taller buildings are closer.
    pub fn for_height(height: f32) -> Depth {
        if height < 150.0 {
            Depth::Background
        } else if height < 250.0 {
            Depth::Middle
        } else {
            Depth::Foreground
        }
    }

    pub fn speed(self) -> f32 {
        match self {
            Depth::Background => 0.2,
            Depth::Middle => 0.4,
            Depth::Foreground => 0.6,
        }
    }
}

/// A window, positioned relative to its building's top-left corner.
#[derive(Clone, Debug, PartialEq)]
pub struct Window {
    pub x: f32,
    pub y: f32,
    pub lit: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Building {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub depth: Depth,
    pub palette: u8,
    pub windows: Vec<Window>,
}

impl Building {
    pub fn lit_fraction(&self) -> f32 {
        if self.windows.is_empty() {
            return 0.0;
        }
        let lit = self.windows.iter().filter(|w| w.lit).count();
        lit as f32 / self.windows.len() as f32
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Star {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub brightness: f32,
}

// ── Timers & viewport ─────────────────────────────────────────────────────────

/// Per-kind spawn counters, in ticks since the last threshold crossing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpawnTimers {
    pub obstacle: u32,
    pub collectible: u32,
    pub grass: u32,
    pub pebble: u32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Viewport { width, height }
    }

    pub fn ground_y(&self) -> f32 {
        self.height - GROUND_DEPTH
    }
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire simulation state.  Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameState {
    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub collectibles: Vec<Collectible>,
    pub particles: Vec<Particle>,
    pub grass: Vec<GrassTuft>,
    pub pebbles: Vec<Pebble>,
    pub clouds: Vec<Cloud>,
    pub buildings: Vec<Building>,
    pub stars: Vec<Star>,
    pub timers: SpawnTimers,
    pub score: u32,
    pub distance: f32,
    pub speed: f32,
    /// Ticks since the current run started.  Keeps counting outside play.
    pub game_time: u64,
    pub energy_collected: u32,
    /// Fraction of building windows that should be lit, in `0..=max_light`.
    pub city_light_level: f32,
    /// Horizontal scroll of the ground texture.
    pub ground_offset: f32,
    pub status: GameStatus,
    /// `None` means no sprite is drawn for the player.
    pub character: Option<Character>,
    /// Incremented by every run start; ties deferred work to one run.
    pub run_id: u64,
    pub viewport: Viewport,
    pub tuning: Tuning,
}

impl GameState {
    pub fn ground_y(&self) -> f32 {
        self.viewport.ground_y()
    }

    /// Current speed relative to the starting speed, e.g. `1.3` for "1.3X".
    pub fn speed_multiplier(&self) -> f32 {
        self.speed / self.tuning.base_speed
    }
}
