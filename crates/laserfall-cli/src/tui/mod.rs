//! Minimal terminal runtime: an event loop plus the [`App`] trait it drives.

use std::time::Duration;

use crossterm::event::Event;
use ratatui::Frame;

use self::{event::TuiEvent, event_loop::EventLoop};

pub use self::event_loop::LoopTiming;

mod event;
mod event_loop;

/// An application driven by [`run`].
pub trait App {
    /// Tick and render timing, read once when the loop starts.
    fn timing(&self) -> LoopTiming;

    fn should_exit(&self) -> bool;

    /// Handles terminal events (key input, mouse, resize, etc.).
    fn handle_event(&mut self, event: &Event);

    fn draw(&self, frame: &mut Frame);

    /// Advances the application by the wall-clock time since the previous tick.
    fn update(&mut self, elapsed: Duration);
}

/// Takes over the terminal and runs `app` until it asks to exit.
///
/// The terminal is restored on return, including when an error is propagated.
pub fn run<A>(app: &mut A) -> anyhow::Result<()>
where
    A: App,
{
    let mut events = EventLoop::new(app.timing());
    ratatui::run(|terminal| {
        while !app.should_exit() {
            match events.next()? {
                TuiEvent::Tick(elapsed) => app.update(elapsed),
                TuiEvent::Render => {
                    terminal.draw(|f| app.draw(f))?;
                }
                TuiEvent::Crossterm(event) => app.handle_event(&event),
            }
        }
        Ok(())
    })
}
