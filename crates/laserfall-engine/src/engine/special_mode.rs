use serde::Serialize;

/// Timer of the temporary high-speed window.
///
/// While active, the effective drop interval is divided by
/// `special_speedup` and clears earn a 50 % bonus. Once started it runs for
/// exactly `special_mode_duration_ms` of session time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SpecialMode {
    elapsed_ms: Option<u64>,
}

impl SpecialMode {
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.elapsed_ms.is_some()
    }

    /// Time spent in the current window, or `None` when inactive.
    #[must_use]
    pub const fn elapsed_ms(&self) -> Option<u64> {
        self.elapsed_ms
    }

    /// Starts a window. Returns `false` if one is already running.
    pub fn activate(&mut self) -> bool {
        if self.is_active() {
            return false;
        }
        self.elapsed_ms = Some(0);
        true
    }

    /// Advances the timer by one step. Returns `true` when the window ends.
    pub fn advance(&mut self, step_ms: u64, duration_ms: u64) -> bool {
        let Some(elapsed) = &mut self.elapsed_ms else {
            return false;
        };
        *elapsed += step_ms;
        if *elapsed >= duration_ms {
            self.elapsed_ms = None;
            return true;
        }
        false
    }

    /// Whole seconds left as shown to the player: `duration_secs - floor(elapsed_secs)`.
    #[must_use]
    pub fn remaining_secs(&self, duration_ms: u64) -> Option<u64> {
        self.elapsed_ms
            .map(|elapsed| (duration_ms / 1000).saturating_sub(elapsed / 1000))
    }
}
