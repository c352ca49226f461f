use std::time::Duration;

use crossterm::event::{Event, KeyCode, KeyEventKind};
use laserfall_engine::{GameEvent, GameSession, InputAction, SessionState};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    style::{Color, Style},
    text::Text,
};

use crate::{
    tui::{App, LoopTiming},
    ui::widgets::SessionDisplay,
};

const FPS: f64 = 60.0;
const STATUS_DURATION: Duration = Duration::from_millis(1500);
const FLASH_DURATION: Duration = Duration::from_millis(150);

/// What a key press asks the app to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyCommand {
    Input(InputAction),
    TogglePause,
    NewGame,
    Quit,
}

fn key_command(code: KeyCode) -> Option<KeyCommand> {
    let command = match code {
        KeyCode::Left => KeyCommand::Input(InputAction::MoveLeft),
        KeyCode::Right => KeyCommand::Input(InputAction::MoveRight),
        KeyCode::Down => KeyCommand::Input(InputAction::SoftDrop),
        KeyCode::Up => KeyCommand::Input(InputAction::Rotate),
        KeyCode::Char(' ' | 'p') => KeyCommand::TogglePause,
        KeyCode::Char('n') | KeyCode::Enter => KeyCommand::NewGame,
        KeyCode::Char('q') | KeyCode::Esc => KeyCommand::Quit,
        _ => return None,
    };
    Some(command)
}

/// A message that stays on screen for a short while.
#[derive(Debug, Clone)]
struct Timed<T> {
    value: T,
    remaining: Duration,
}

impl<T> Timed<T> {
    fn new(value: T, duration: Duration) -> Self {
        Self {
            value,
            remaining: duration,
        }
    }

    /// Returns `false` once the timer has run out.
    fn advance(&mut self, elapsed: Duration) -> bool {
        self.remaining = self.remaining.saturating_sub(elapsed);
        !self.remaining.is_zero()
    }
}

#[derive(Debug)]
pub struct PlayApp {
    session: GameSession,
    status: Option<Timed<String>>,
    flash: Option<Timed<Vec<usize>>>,
    is_exiting: bool,
}

impl PlayApp {
    pub fn new(mut session: GameSession, start_immediately: bool) -> Self {
        let events = if start_immediately {
            session.new_game()
        } else {
            vec![]
        };
        let mut app = Self {
            session,
            status: None,
            flash: None,
            is_exiting: false,
        };
        app.react(&events);
        app
    }

    pub fn final_stats(&self) -> String {
        format!(
            "score: {}  level: {}  lines: {}  max combo: {}",
            self.session.score(),
            self.session.level(),
            self.session.lines(),
            self.session.max_combo()
        )
    }

    fn apply_key(&mut self, command: KeyCommand) {
        let events = match command {
            KeyCommand::Input(action) => self.session.handle_input(action),
            KeyCommand::TogglePause => self.session.toggle_pause(),
            KeyCommand::NewGame => self.session.new_game(),
            KeyCommand::Quit => {
                self.is_exiting = true;
                vec![]
            }
        };
        self.react(&events);
    }

    fn react(&mut self, events: &[GameEvent]) {
        for event in events {
            let status = match event {
                GameEvent::GameStarted => {
                    self.status = None;
                    self.flash = None;
                    None
                }
                GameEvent::LinesCleared { count: 4, rows, .. } => {
                    self.flash = Some(Timed::new(rows.clone(), FLASH_DURATION));
                    Some("TETRIS!".to_owned())
                }
                GameEvent::LinesCleared { rows, .. } => {
                    self.flash = Some(Timed::new(rows.clone(), FLASH_DURATION));
                    None
                }
                GameEvent::ComboChanged { combo } if *combo > 1 => Some(format!("COMBO {combo}x")),
                GameEvent::LevelUp { level } => Some(format!("LEVEL {level}")),
                GameEvent::DifficultyRaised { multiplier } => {
                    Some(format!("DIFFICULTY {multiplier:.1}"))
                }
                GameEvent::SpecialModeStarted => Some("LASER MODE!".to_owned()),
                GameEvent::SpecialModeEnded => Some("laser mode over".to_owned()),
                _ => None,
            };
            if let Some(status) = status {
                self.status = Some(Timed::new(status, STATUS_DURATION));
            }
        }
    }

    fn help_text(&self) -> &'static str {
        match self.session.state() {
            SessionState::Running => {
                "Controls: ← → (Move) | ↓ (Soft Drop) | ↑ (Rotate) | Space (Pause) | N (New Game) | Q (Quit)"
            }
            SessionState::Paused => "Controls: Space (Resume) | N (New Game) | Q (Quit)",
            SessionState::NotStarted | SessionState::GameOver => {
                "Controls: Enter (New Game) | Q (Quit)"
            }
        }
    }
}

impl App for PlayApp {
    fn timing(&self) -> LoopTiming {
        LoopTiming::fixed_rate(FPS)
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, event: &Event) {
        if let Some(event) = event.as_key_event()
            && event.kind == KeyEventKind::Press
            && let Some(command) = key_command(event.code)
        {
            self.apply_key(command);
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let flash_rows = self.flash.as_ref().map_or(&[][..], |flash| flash.value.as_slice());
        let session_display = SessionDisplay::new(&self.session).flash_rows(flash_rows);

        let (text, style) = match &self.status {
            Some(status) => (status.value.as_str(), Style::default().fg(Color::LightRed)),
            None => (self.help_text(), Style::default().fg(Color::DarkGray)),
        };
        let status_text = Text::from(text).style(style).centered();

        let [main_area, status_area] =
            Layout::vertical([Constraint::Length(25), Constraint::Length(1)])
                .areas::<2>(frame.area());
        frame.render_widget(session_display, main_area);
        frame.render_widget(status_text, status_area);
    }

    fn update(&mut self, elapsed: Duration) {
        if let Some(status) = &mut self.status
            && !status.advance(elapsed)
        {
            self.status = None;
        }
        if let Some(flash) = &mut self.flash
            && !flash.advance(elapsed)
        {
            self.flash = None;
        }

        let events = self.session.tick(elapsed.as_secs_f64() * 1000.0);
        self.react(&events);
    }
}
