use serde::Serialize;

use crate::{Board, GameSeed, Piece, PieceKind, ScoreBreakdown, SessionState};

/// Read-only copy of everything a renderer or report needs.
///
/// Taken with [`GameSession::snapshot`](crate::GameSession::snapshot). The
/// board serializes as one string per row, using `.` for empty cells and
/// the piece letter for locked ones.
#[derive(Debug, Clone, Serialize)]
pub struct GameSnapshot {
    pub state: SessionState,
    pub seed: Option<GameSeed>,
    pub board: Board,
    pub current_piece: Option<Piece>,
    pub next_piece: Option<PieceKind>,
    pub score: u64,
    pub level: u32,
    pub lines: u64,
    pub combo: u32,
    pub max_combo: u32,
    pub pieces_placed: u64,
    pub difficulty_multiplier: f64,
    pub special_mode: bool,
    pub special_mode_remaining_secs: Option<u64>,
    pub drop_interval_ms: f64,
    pub clock_ms: u64,
    pub line_cleared_counter: [u64; 5],
    pub last_score: Option<ScoreBreakdown>,
}
