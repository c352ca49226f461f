use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::{
    ConfigError, PieceCollisionError,
    core::{board::Board, board::ClearedLines, piece::Piece, shape::PieceKind},
};

use super::{
    GameConfig, GameEvent, GameSeed, GameSnapshot, GameStats, InputAction, PieceBuffer,
    ScoreBreakdown, SpecialMode,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, derive_more::IsVariant)]
pub enum SessionState {
    /// Created, but [`GameSession::new_game`] has not been called yet.
    #[default]
    NotStarted,
    Running,
    Paused,
    GameOver,
}

/// One game of laserfall: board, falling piece, timers and statistics.
///
/// The session is driven from outside by two kinds of calls:
///
/// - [`Self::tick`] with the host time elapsed since the previous call
/// - [`Self::handle_input`] for player actions
///
/// Both return the [`GameEvent`]s they produced, in order. Time is logical:
/// the session clock only advances by whole steps of `tick_ms` while the
/// game is running, so pausing freezes every timer.
///
/// The random source is a type parameter so tests and replays can inject
/// their own generator. The default is a [`Pcg32`] seeded from a
/// [`GameSeed`].
///
/// # Example
///
/// ```
/// use laserfall_engine::{GameEvent, GameSession, InputAction};
///
/// let mut session = GameSession::new();
/// assert!(session.state().is_not_started());
///
/// let events = session.new_game();
/// assert_eq!(events, vec![GameEvent::GameStarted]);
/// assert!(session.current_piece().is_some());
///
/// let events = session.handle_input(InputAction::SoftDrop);
/// assert_eq!(events, vec![GameEvent::PieceMoved { gravity: false }]);
///
/// // Gravity pulls the piece down once per second at level 1.
/// let mut events = Vec::new();
/// for _ in 0..80 {
///     events.extend(session.tick(16.0));
/// }
/// assert!(events.contains(&GameEvent::PieceMoved { gravity: true }));
/// ```
#[derive(Debug, Clone)]
pub struct GameSession<R = Pcg32> {
    config: GameConfig,
    rng: R,
    seed: Option<GameSeed>,
    board: Board,
    current: Option<Piece>,
    buffer: PieceBuffer,
    stats: GameStats,
    special: SpecialMode,
    state: SessionState,
    clock_ms: u64,
    pending_ms: f64,
    drop_elapsed_ms: u64,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession<Pcg32> {
    /// Creates a session with the default rules and a random seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed for a reproducible game.
    #[must_use]
    pub fn with_seed(seed: GameSeed) -> Self {
        Self::build(GameConfig::default(), Pcg32::from_seed(seed.to_bytes()), Some(seed))
    }

    /// Creates a seeded session with custom rules.
    pub fn from_config(config: GameConfig, seed: GameSeed) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(
            config,
            Pcg32::from_seed(seed.to_bytes()),
            Some(seed),
        ))
    }
}

impl<R> GameSession<R>
where
    R: Rng,
{
    /// Creates a session with custom rules and an arbitrary random source.
    pub fn with_rng(config: GameConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, rng, None))
    }

    fn build(config: GameConfig, rng: R, seed: Option<GameSeed>) -> Self {
        Self {
            config,
            rng,
            seed,
            board: Board::EMPTY,
            current: None,
            buffer: PieceBuffer::new(),
            stats: GameStats::new(),
            special: SpecialMode::default(),
            state: SessionState::NotStarted,
            clock_ms: 0,
            pending_ms: 0.0,
            drop_elapsed_ms: 0,
        }
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Returns the seed the session was created from, if any.
    #[must_use]
    pub fn seed(&self) -> Option<GameSeed> {
        self.seed
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.state.is_paused()
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the falling piece. `None` before the first game and after game over.
    #[must_use]
    pub fn current_piece(&self) -> Option<&Piece> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn next_piece(&self) -> Option<PieceKind> {
        self.buffer.peek_next()
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn score(&self) -> u64 {
        self.stats.score()
    }

    #[must_use]
    pub fn level(&self) -> u32 {
        self.stats.level()
    }

    #[must_use]
    pub fn lines(&self) -> u64 {
        self.stats.total_cleared_lines()
    }

    #[must_use]
    pub fn combo(&self) -> u32 {
        self.stats.combo()
    }

    #[must_use]
    pub fn max_combo(&self) -> u32 {
        self.stats.max_combo()
    }

    #[must_use]
    pub fn pieces_placed(&self) -> u64 {
        self.stats.completed_pieces()
    }

    #[must_use]
    pub fn difficulty_multiplier(&self) -> f64 {
        self.stats.difficulty_multiplier(&self.config)
    }

    #[must_use]
    pub fn last_score(&self) -> Option<&ScoreBreakdown> {
        self.stats.last_score()
    }

    #[must_use]
    pub fn is_special_mode(&self) -> bool {
        self.special.is_active()
    }

    /// Whole seconds left in special mode, or `None` when it is not active.
    #[must_use]
    pub fn special_mode_remaining_secs(&self) -> Option<u64> {
        self.special
            .remaining_secs(self.config.special_mode_duration_ms)
    }

    /// Milliseconds of running time since the game started.
    #[must_use]
    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    #[must_use]
    pub fn base_drop_interval_ms(&self) -> u64 {
        self.config.base_drop_interval_ms(self.stats.level())
    }

    /// Returns the gravity interval after difficulty and special mode are applied.
    #[must_use]
    pub fn effective_drop_interval_ms(&self) -> f64 {
        self.config.effective_drop_interval_ms(
            self.base_drop_interval_ms(),
            self.difficulty_multiplier(),
            self.special.is_active(),
        )
    }

    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            state: self.state,
            seed: self.seed,
            board: self.board.clone(),
            current_piece: self.current,
            next_piece: self.next_piece(),
            score: self.score(),
            level: self.level(),
            lines: self.lines(),
            combo: self.combo(),
            max_combo: self.max_combo(),
            pieces_placed: self.pieces_placed(),
            difficulty_multiplier: self.difficulty_multiplier(),
            special_mode: self.is_special_mode(),
            special_mode_remaining_secs: self.special_mode_remaining_secs(),
            drop_interval_ms: self.effective_drop_interval_ms(),
            clock_ms: self.clock_ms,
            line_cleared_counter: *self.stats.line_cleared_counter(),
            last_score: self.stats.last_score().copied(),
        }
    }

    /// Resets everything and starts a fresh game, whatever the current state.
    ///
    /// The random source is not reseeded, so consecutive games differ.
    pub fn new_game(&mut self) -> Vec<GameEvent> {
        self.board = Board::EMPTY;
        self.current = None;
        self.buffer.clear();
        self.stats = GameStats::new();
        self.special = SpecialMode::default();
        self.clock_ms = 0;
        self.pending_ms = 0.0;
        self.drop_elapsed_ms = 0;
        self.state = SessionState::Running;
        log::info!("new game started");

        let mut events = vec![GameEvent::GameStarted];
        self.spawn_next(&mut events);
        events
    }

    /// Pauses a running game. No-op in any other state.
    pub fn pause(&mut self) -> Vec<GameEvent> {
        if !self.state.is_running() {
            return vec![];
        }
        self.state = SessionState::Paused;
        log::debug!("paused");
        vec![GameEvent::PausedToggled { paused: true }]
    }

    /// Resumes a paused game. No-op in any other state.
    pub fn resume(&mut self) -> Vec<GameEvent> {
        if !self.state.is_paused() {
            return vec![];
        }
        self.state = SessionState::Running;
        log::debug!("resumed");
        vec![GameEvent::PausedToggled { paused: false }]
    }

    pub fn toggle_pause(&mut self) -> Vec<GameEvent> {
        match self.state {
            SessionState::Running => self.pause(),
            SessionState::Paused => self.resume(),
            SessionState::NotStarted | SessionState::GameOver => vec![],
        }
    }

    /// Applies a player action to the falling piece.
    ///
    /// Ignored unless the game is running. A blocked horizontal move or
    /// rotation is a no-op; a blocked soft drop locks the piece.
    pub fn handle_input(&mut self, action: InputAction) -> Vec<GameEvent> {
        let mut events = vec![];
        if !self.state.is_running() {
            return events;
        }
        match action {
            InputAction::MoveLeft => {
                if self.try_move_left().is_ok() {
                    events.push(GameEvent::PieceMoved { gravity: false });
                }
            }
            InputAction::MoveRight => {
                if self.try_move_right().is_ok() {
                    events.push(GameEvent::PieceMoved { gravity: false });
                }
            }
            InputAction::SoftDrop => self.drop_or_lock(false, &mut events),
            InputAction::Rotate => {
                if self.try_rotate().is_ok() {
                    events.push(GameEvent::PieceRotated);
                }
            }
        }
        events
    }

    /// Advances the game by `delta_ms` of host time.
    ///
    /// Time is consumed in whole steps of `tick_ms`; the remainder carries
    /// over to the next call. A single call accepts at most
    /// `max_catch_up_ms`, so a host that stalls does not fast-forward the
    /// game. Negative or non-finite deltas are ignored.
    pub fn tick(&mut self, delta_ms: f64) -> Vec<GameEvent> {
        let mut events = vec![];
        if !delta_ms.is_finite() || delta_ms < 0.0 {
            log::warn!("ignoring invalid tick delta {delta_ms}");
            return events;
        }
        if !self.state.is_running() {
            return events;
        }

        let step_ms = self.config.tick_ms;
        #[expect(clippy::cast_precision_loss)]
        let (step, cap) = (step_ms as f64, self.config.max_catch_up_ms as f64);
        self.pending_ms += delta_ms.min(cap);
        while self.pending_ms >= step && self.state.is_running() {
            self.pending_ms -= step;
            self.step(step_ms, &mut events);
        }
        events
    }

    fn step(&mut self, step_ms: u64, events: &mut Vec<GameEvent>) {
        self.clock_ms += step_ms;

        if self.stats.is_combo_expired(self.clock_ms, &self.config) {
            self.stats.reset_combo();
            log::debug!("combo expired");
            events.push(GameEvent::ComboChanged { combo: 0 });
        }

        if self
            .special
            .advance(step_ms, self.config.special_mode_duration_ms)
        {
            log::info!("special mode ended");
            events.push(GameEvent::SpecialModeEnded);
        }

        self.drop_elapsed_ms += step_ms;
        #[expect(clippy::cast_precision_loss)]
        let drop_elapsed = self.drop_elapsed_ms as f64;
        if drop_elapsed >= self.effective_drop_interval_ms() {
            self.drop_elapsed_ms = 0;
            self.drop_or_lock(true, events);
        }
    }

    fn try_shift(&mut self, f: impl FnOnce(&Piece) -> Piece) -> Result<(), PieceCollisionError> {
        let piece = self.current.as_ref().map(f).ok_or(PieceCollisionError)?;
        if self.board.is_piece_colliding(&piece) {
            return Err(PieceCollisionError);
        }
        self.current = Some(piece);
        Ok(())
    }

    fn try_move_left(&mut self) -> Result<(), PieceCollisionError> {
        self.try_shift(Piece::left)
    }

    fn try_move_right(&mut self) -> Result<(), PieceCollisionError> {
        self.try_shift(Piece::right)
    }

    fn try_move_down(&mut self) -> Result<(), PieceCollisionError> {
        self.try_shift(Piece::down)
    }

    fn try_rotate(&mut self) -> Result<(), PieceCollisionError> {
        let piece = self
            .current
            .as_ref()
            .and_then(|piece| piece.rotated_within(&self.board))
            .ok_or(PieceCollisionError)?;
        self.current = Some(piece);
        Ok(())
    }

    fn drop_or_lock(&mut self, gravity: bool, events: &mut Vec<GameEvent>) {
        if self.try_move_down().is_ok() {
            events.push(GameEvent::PieceMoved { gravity });
            return;
        }
        self.lock_piece(events);
    }

    fn lock_piece(&mut self, events: &mut Vec<GameEvent>) {
        let Some(piece) = self.current.take() else {
            return;
        };
        let cleared = self.board.place(&piece);
        events.push(GameEvent::PieceLocked { kind: piece.kind() });

        if self.stats.record_placement(&self.config) {
            let multiplier = self.difficulty_multiplier();
            log::info!("difficulty increased to {multiplier:.1}x");
            events.push(GameEvent::DifficultyRaised { multiplier });
        }

        let placed = self.stats.completed_pieces();
        if placed % self.config.special_mode_period == 0
            && !self.special.is_active()
            && self.rng.random_bool(self.config.special_mode_chance)
        {
            self.special.activate();
            log::info!("special mode activated after {placed} pieces");
            events.push(GameEvent::SpecialModeStarted);
        }

        if cleared.is_empty() {
            self.stats.record_no_clear();
            if self.stats.reset_combo() {
                events.push(GameEvent::ComboChanged { combo: 0 });
            }
        } else {
            self.complete_clear(&cleared, events);
        }

        self.spawn_next(events);
    }

    fn complete_clear(&mut self, cleared: &ClearedLines, events: &mut Vec<GameEvent>) {
        let previous_combo = self.stats.combo();
        let combo = self.stats.register_clear(self.clock_ms, &self.config);
        if combo > 1 {
            log::debug!("combo x{combo}");
        }

        let breakdown = ScoreBreakdown::compute(
            cleared.count(),
            self.stats.level(),
            combo,
            self.difficulty_multiplier(),
            self.special.is_active(),
        );
        log::debug!(
            "cleared {} lines: base {} + combo {} + difficulty {} + special {} + tetris {} = {}",
            cleared.count(),
            breakdown.base,
            breakdown.combo_bonus,
            breakdown.difficulty_bonus,
            breakdown.special_bonus,
            breakdown.tetris_bonus,
            breakdown.total,
        );
        let level_up = self
            .stats
            .apply_clear(cleared.count(), breakdown, &self.config);

        events.push(GameEvent::LinesCleared {
            count: cleared.count(),
            rows: cleared.rows().to_vec(),
            points: breakdown.total,
        });
        if combo != previous_combo {
            events.push(GameEvent::ComboChanged { combo });
        }
        if level_up {
            let level = self.stats.level();
            log::info!(
                "level up: {level}, drop interval {} ms",
                self.base_drop_interval_ms()
            );
            events.push(GameEvent::LevelUp { level });
        }
    }

    fn spawn_next(&mut self, events: &mut Vec<GameEvent>) {
        let kind = self.buffer.pop_next(&mut self.rng);
        let piece = Piece::new(kind);
        if self.board.is_piece_colliding(&piece) {
            self.current = None;
            self.state = SessionState::GameOver;
            let final_score = self.stats.score();
            log::info!("game over, final score {final_score}");
            events.push(GameEvent::GameOver { final_score });
            return;
        }
        self.current = Some(piece);
    }
}

#[cfg(test)]
impl<R> GameSession<R> {
    pub(crate) fn set_board(&mut self, board: Board) {
        self.board = board;
    }

    pub(crate) fn set_current_piece(&mut self, piece: Piece) {
        self.current = Some(piece);
    }

    pub(crate) fn set_clock_ms(&mut self, clock_ms: u64) {
        self.clock_ms = clock_ms;
    }
}
