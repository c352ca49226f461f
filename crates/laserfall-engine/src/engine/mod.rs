//! Game rules and session state.
//!
//! This module builds the laserfall ruleset on top of the core board and
//! piece model:
//!
//! - [`GameSession`] - The state machine: piece lifecycle, timers, scoring
//! - [`GameConfig`] - Tunable constants (speed curve, combo timeout, special mode)
//! - [`GameStats`] - Score, level, combo and difficulty tracking
//! - [`ScoreBreakdown`] - Points of one clearing placement, by bonus
//! - [`SpecialMode`] - The temporary high-speed window
//! - [`GameEvent`] / [`InputAction`] - What comes out of and goes into a session
//! - [`GameSnapshot`] - Serializable view for renderers and reports
//! - [`PieceBuffer`] / [`GameSeed`] - Next-piece preview and reproducible randomness
//!
//! # Game Flow
//!
//! 1. [`GameSession::new_game`] spawns the first piece
//! 2. The host calls [`GameSession::tick`] with elapsed time; gravity moves
//!    the piece down once per drop interval
//! 3. Player actions go through [`GameSession::handle_input`]
//! 4. A blocked downward move locks the piece: placements are counted,
//!    difficulty and special mode are updated, full lines are cleared and
//!    scored, and the next piece spawns
//! 5. The game ends when a freshly spawned piece collides
//!
//! Every call returns the [`GameEvent`]s it produced, in order.

pub use self::{
    config::*, event::*, game_session::*, game_stats::*, piece_buffer::*, snapshot::*,
    special_mode::*,
};

mod config;
mod event;
mod game_session;
mod game_stats;
mod piece_buffer;
mod snapshot;
mod special_mode;
