/// The game-state machine: leaderboard → playing → game over → leaderboard.
///
/// A `Session` owns the simulation state, the RNG and the score store.
/// Front ends feed it `PlayerAction`s between frames and call `update` once
/// per frame; everything they draw comes from the query methods.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;

use crate::compute::{jump, resize, start_run, tick};
use crate::entities::{Character, GameState, GameStatus, Viewport};
use crate::leaderboard::{
    qualifies, ScoreEntry, ScoreStore, ANONYMOUS_NAME, DEFAULT_CHARACTER_LABEL,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlayerAction {
    /// Space, up arrow, tap or click: start from the leaderboard, jump in play.
    Press,
    /// Explicit "play" button.  Also accepted on the game-over screen.
    Start,
    SelectCharacter(Option<Character>),
    /// Submit the name for a qualifying score.
    ConfirmSave(String),
}

/// A finished run whose score entry has not been written yet.
#[derive(Clone, Debug)]
struct EndedRun {
    run_id: u64,
    score: u32,
    distance: u32,
    high_score: bool,
    /// Set for non-qualifying runs: when to save anonymously and leave.
    auto_save_at: Option<Instant>,
}

pub struct Session<S: ScoreStore> {
    state: GameState,
    rng: StdRng,
    store: S,
    character: Option<Character>,
    /// Jump requested since the last frame; applied before the next tick.
    jump_queued: bool,
    ended: Option<EndedRun>,
    /// High-score verdict of the most recent run, once it has ended.
    last_high_score: Option<bool>,
    leaderboard: Vec<ScoreEntry>,
}

impl<S: ScoreStore> Session<S> {
    pub fn new(state: GameState, rng: StdRng, store: S, character: Option<Character>) -> Self {
        let leaderboard = store.load();
        Session {
            state,
            rng,
            store,
            character,
            jump_queued: false,
            ended: None,
            last_high_score: None,
            leaderboard,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────────────

    /// Apply one input.  Returns `false` when the action has no meaning in
    /// the current state (and therefore changed nothing).
    pub fn apply(&mut self, action: PlayerAction) -> bool {
        match (action, self.state.status) {
            (PlayerAction::Press, GameStatus::Leaderboard) => {
                self.begin_run();
                true
            }
            (PlayerAction::Press, GameStatus::Playing) => {
                self.jump_queued = true;
                true
            }
            (PlayerAction::Press, GameStatus::GameOver) => false,
            (PlayerAction::Start, GameStatus::Playing) => false,
            (PlayerAction::Start, _) => {
                self.begin_run();
                true
            }
            (PlayerAction::SelectCharacter(_), GameStatus::Playing) => false,
            (PlayerAction::SelectCharacter(c), _) => {
                self.character = c;
                true
            }
            (PlayerAction::ConfirmSave(name), GameStatus::GameOver) => self.confirm_save(&name),
            (PlayerAction::ConfirmSave(_), _) => false,
        }
    }

    /// One frame: queued jump, one simulation step, then any due deferred
    /// transition.
    pub fn update(&mut self, now: Instant) {
        if std::mem::take(&mut self.jump_queued) {
            self.state = jump(&self.state);
        }
        let was_playing = self.state.status == GameStatus::Playing;
        self.state = tick(&self.state, &mut self.rng);
        if was_playing && self.state.status == GameStatus::GameOver {
            self.end_run(now);
        }
        self.poll(now);
    }

    /// Fire the deferred auto-save if it is due and still belongs to the
    /// current run.
    pub fn poll(&mut self, now: Instant) {
        let Some(ended) = &self.ended else {
            return;
        };
        let Some(due) = ended.auto_save_at else {
            return;
        };
        if now < due {
            return;
        }
        if ended.run_id != self.state.run_id || self.state.status != GameStatus::GameOver {
            log::debug!("dropping stale auto-save for run {}", ended.run_id);
            self.ended = None;
            return;
        }
        self.write_ended(ANONYMOUS_NAME, DEFAULT_CHARACTER_LABEL);
        self.show_leaderboard();
    }

    /// Write a finished run that is still waiting for a name or for its
    /// auto-save, as an anonymous entry.  Call before dropping the session.
    pub fn finish(&mut self) {
        if let Some(ended) = &self.ended {
            log::debug!("run {} saved anonymously on exit", ended.run_id);
        }
        self.write_ended(ANONYMOUS_NAME, DEFAULT_CHARACTER_LABEL);
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.state = resize(&self.state, viewport);
    }

    // ── Queries ──────────────────────────────────────────────────────────────

    /// Snapshot of every entity for this frame.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct access for scripted scenarios.
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn status(&self) -> GameStatus {
        self.state.status
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn distance(&self) -> u32 {
        self.state.distance.floor() as u32
    }

    pub fn speed_multiplier(&self) -> f32 {
        self.state.speed_multiplier()
    }

    pub fn city_light_level(&self) -> f32 {
        self.state.city_light_level
    }

    pub fn character(&self) -> Option<Character> {
        self.character
    }

    /// Whether the last finished run made the top ten.  `None` until the
    /// current run has ended.
    pub fn is_high_score(&self) -> Option<bool> {
        self.last_high_score
    }

    /// The game-over screen is waiting for a name.
    pub fn awaiting_name(&self) -> bool {
        self.state.status == GameStatus::GameOver
            && self.ended.as_ref().map(|e| e.high_score).unwrap_or(false)
    }

    /// When the pending auto-save will fire, if one is scheduled.
    pub fn auto_save_due(&self) -> Option<Instant> {
        self.ended.as_ref().and_then(|e| e.auto_save_at)
    }

    /// The list as read when the leaderboard was last shown.
    pub fn leaderboard(&self) -> &[ScoreEntry] {
        &self.leaderboard
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // ── Transitions ──────────────────────────────────────────────────────────

    fn begin_run(&mut self) {
        if let Some(ended) = &self.ended {
            log::debug!("run {} superseded before its entry was saved", ended.run_id);
            self.write_ended(ANONYMOUS_NAME, DEFAULT_CHARACTER_LABEL);
        }
        self.jump_queued = false;
        self.last_high_score = None;
        self.state = start_run(&self.state, self.character, &mut self.rng);
    }

    fn end_run(&mut self, now: Instant) {
        let score = self.state.score;
        let high_score = qualifies(&self.store.load(), score);
        let auto_save_at = if high_score {
            None
        } else {
            Some(now + Duration::from_millis(self.state.tuning.auto_save_delay_ms))
        };
        log::info!(
            "run {} ended with {} ({})",
            self.state.run_id,
            score,
            if high_score { "high score" } else { "no placing" }
        );
        self.last_high_score = Some(high_score);
        self.ended = Some(EndedRun {
            run_id: self.state.run_id,
            score,
            distance: self.state.distance.floor() as u32,
            high_score,
            auto_save_at,
        });
    }

    fn confirm_save(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || !self.awaiting_name() {
            return false;
        }
        let label = self
            .state
            .character
            .map(Character::name)
            .unwrap_or(DEFAULT_CHARACTER_LABEL);
        self.write_ended(name, label);
        self.show_leaderboard();
        true
    }

    /// Write the pending entry, if any.  A failed write is logged and the
    /// game carries on.
    fn write_ended(&mut self, name: &str, character: &str) {
        let Some(ended) = self.ended.take() else {
            return;
        };
        let entry = ScoreEntry::today(name, character, ended.score, ended.distance);
        match self.store.record(entry) {
            Ok(entries) => {
                log::info!("saved score {} for {}", ended.score, name);
                self.leaderboard = entries;
            }
            Err(e) => log::error!("failed to save score: {:#}", e),
        }
    }

    fn show_leaderboard(&mut self) {
        self.state.status = GameStatus::Leaderboard;
        self.leaderboard = self.store.load();
    }
}
