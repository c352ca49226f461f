use std::time::{Duration, Instant};

use crossterm::event;

use crate::tui::event::TuiEvent;

/// Rendering trigger mode.
#[derive(Debug, Clone, Copy, Default)]
pub enum RenderMode {
    /// Render at fixed intervals.
    Interval(Duration),
    /// Render after state changes (tick or crossterm event).
    #[default]
    OnDirty,
}

impl RenderMode {
    fn as_interval(self) -> Option<Duration> {
        match self {
            RenderMode::Interval(interval) => Some(interval),
            RenderMode::OnDirty => None,
        }
    }
}

/// Timing of the tick and render events.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoopTiming {
    /// `None` disables tick events.
    pub tick_interval: Option<Duration>,
    pub render_mode: RenderMode,
}

impl LoopTiming {
    /// Ticks and renders `rate` times per second.
    #[must_use]
    pub fn fixed_rate(rate: f64) -> Self {
        let interval = Duration::from_secs_f64(1.0 / rate);
        Self {
            tick_interval: Some(interval),
            render_mode: RenderMode::Interval(interval),
        }
    }
}

/// Produces tick, render and terminal events in arrival order.
///
/// A tick reports the real time elapsed since the previous one, which may be
/// longer than the interval when the host falls behind.
#[derive(Debug)]
pub(super) struct EventLoop {
    timing: LoopTiming,
    last_tick: Instant,
    last_render: Instant,
    dirty: bool,
}

impl EventLoop {
    pub(super) fn new(timing: LoopTiming) -> Self {
        let now = Instant::now();
        Self {
            timing,
            last_tick: now,
            last_render: now,
            dirty: true, // Initial render is required on startup
        }
    }

    /// Returns the next event.
    ///
    /// Blocks until a tick/render time is reached or a crossterm event occurs.
    pub(super) fn next(&mut self) -> anyhow::Result<TuiEvent> {
        loop {
            let now = Instant::now();
            if let Some(elapsed) = self.tick_due(now) {
                self.last_tick = now;
                self.dirty = true;
                return Ok(TuiEvent::Tick(elapsed));
            }

            let do_render = match self.timing.render_mode {
                RenderMode::Interval(interval) => now.duration_since(self.last_render) >= interval,
                RenderMode::OnDirty => self.dirty,
            };
            if do_render {
                self.last_render = now;
                self.dirty = false;
                return Ok(TuiEvent::Render);
            }

            if let Some(timeout) = self.compute_timeout(now)
                && !event::poll(timeout)?
            {
                continue;
            }

            self.dirty = true;
            return Ok(event::read()?.into());
        }
    }

    fn tick_due(&self, now: Instant) -> Option<Duration> {
        let interval = self.timing.tick_interval?;
        let elapsed = now.duration_since(self.last_tick);
        (elapsed >= interval).then_some(elapsed)
    }

    fn compute_timeout(&self, now: Instant) -> Option<Duration> {
        let next_tick_at = self
            .timing
            .tick_interval
            .map(|interval| self.last_tick + interval);
        let next_render_at = self
            .timing
            .render_mode
            .as_interval()
            .map(|interval| self.last_render + interval);
        let next_timeout_at = [next_tick_at, next_render_at].into_iter().flatten().min()?;
        Some(next_timeout_at.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_timeout_without_intervals() {
        let events = EventLoop::new(LoopTiming::default());
        assert_eq!(events.compute_timeout(Instant::now()), None);
        assert_eq!(events.tick_due(Instant::now() + Duration::from_secs(1)), None);
    }

    #[test]
    fn test_tick_reports_elapsed_time() {
        let events = EventLoop::new(LoopTiming::fixed_rate(50.0));
        let start = events.last_tick;
        assert_eq!(events.tick_due(start + Duration::from_millis(10)), None);
        assert_eq!(
            events.tick_due(start + Duration::from_millis(45)),
            Some(Duration::from_millis(45))
        );
    }

    #[test]
    fn test_timeout_follows_nearest_interval() {
        let events = EventLoop::new(LoopTiming {
            tick_interval: Some(Duration::from_millis(16)),
            render_mode: RenderMode::Interval(Duration::from_secs(1)),
        });
        let timeout = events.compute_timeout(events.last_tick).unwrap();
        assert_eq!(timeout, Duration::from_millis(16));
    }

    #[test]
    fn test_fixed_rate() {
        let timing = LoopTiming::fixed_rate(50.0);
        assert_eq!(timing.tick_interval, Some(Duration::from_millis(20)));
    }
}
