use serde::{Deserialize, Serialize};

use crate::PieceKind;

/// Player commands accepted by [`GameSession::handle_input`](crate::GameSession::handle_input).
///
/// Actions parse from their names, case-insensitively:
///
/// ```
/// use laserfall_engine::InputAction;
///
/// assert_eq!("Rotate".parse::<InputAction>().ok(), Some(InputAction::Rotate));
/// assert_eq!("softdrop".parse::<InputAction>().ok(), Some(InputAction::SoftDrop));
/// assert!("HardDrop".parse::<InputAction>().is_err());
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::FromStr,
)]
pub enum InputAction {
    MoveLeft,
    MoveRight,
    SoftDrop,
    Rotate,
}

impl InputAction {
    pub const ALL: [InputAction; 4] = [
        InputAction::MoveLeft,
        InputAction::MoveRight,
        InputAction::SoftDrop,
        InputAction::Rotate,
    ];
}

/// Something observable that happened during a command or tick.
///
/// Every session operation returns the events it produced in order.
/// Renderers and audio hosts react to these instead of being called from
/// inside the game logic.
#[derive(Debug, Clone, PartialEq, Serialize, derive_more::IsVariant)]
#[serde(tag = "type")]
pub enum GameEvent {
    GameStarted,
    /// The falling piece moved by one cell; `gravity` is set for timed drops.
    PieceMoved {
        gravity: bool,
    },
    PieceRotated,
    PieceLocked {
        kind: PieceKind,
    },
    /// Rows removed by the last placement, as indices before removal in descending order.
    LinesCleared {
        count: usize,
        rows: Vec<usize>,
        points: u64,
    },
    LevelUp {
        level: u32,
    },
    ComboChanged {
        combo: u32,
    },
    DifficultyRaised {
        multiplier: f64,
    },
    SpecialModeStarted,
    SpecialModeEnded,
    PausedToggled {
        paused: bool,
    },
    GameOver {
        final_score: u64,
    },
}

impl GameEvent {
    /// Returns the variant name, as used for the `type` tag in JSON.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            GameEvent::GameStarted => "GameStarted",
            GameEvent::PieceMoved { .. } => "PieceMoved",
            GameEvent::PieceRotated => "PieceRotated",
            GameEvent::PieceLocked { .. } => "PieceLocked",
            GameEvent::LinesCleared { .. } => "LinesCleared",
            GameEvent::LevelUp { .. } => "LevelUp",
            GameEvent::ComboChanged { .. } => "ComboChanged",
            GameEvent::DifficultyRaised { .. } => "DifficultyRaised",
            GameEvent::SpecialModeStarted => "SpecialModeStarted",
            GameEvent::SpecialModeEnded => "SpecialModeEnded",
            GameEvent::PausedToggled { .. } => "PausedToggled",
            GameEvent::GameOver { .. } => "GameOver",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_actions() {
        for action in InputAction::ALL {
            assert_eq!(action.to_string().parse::<InputAction>().ok(), Some(action));
        }
        assert_eq!(
            "moveleft".parse::<InputAction>().ok(),
            Some(InputAction::MoveLeft)
        );
        assert!("".parse::<InputAction>().is_err());
        assert!("Jump".parse::<InputAction>().is_err());
    }

    #[test]
    fn test_event_json_is_tagged() {
        let json = serde_json::to_string(&GameEvent::LinesCleared {
            count: 2,
            rows: vec![19, 17],
            points: 200,
        })
        .unwrap();
        assert_eq!(
            json,
            r#"{"type":"LinesCleared","count":2,"rows":[19,17],"points":200}"#
        );
        let json = serde_json::to_string(&GameEvent::SpecialModeStarted).unwrap();
        assert_eq!(json, r#"{"type":"SpecialModeStarted"}"#);
        let json = serde_json::to_string(&GameEvent::PieceLocked { kind: PieceKind::T }).unwrap();
        assert_eq!(json, r#"{"type":"PieceLocked","kind":"T"}"#);
    }

    #[test]
    fn test_name_matches_json_tag() {
        let events = [
            GameEvent::PieceMoved { gravity: true },
            GameEvent::LevelUp { level: 3 },
            GameEvent::GameOver { final_score: 10 },
            GameEvent::PausedToggled { paused: false },
        ];
        for event in events {
            let value = serde_json::to_value(&event).unwrap();
            assert_eq!(value["type"], event.name());
        }
    }
}
