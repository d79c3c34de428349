//! Detection debouncer.
//!
//! Pure logic, no hardware dependencies. Consumes one instantaneous reading
//! per acquisition tick, produces a stable state. Fully testable on host.
//!
//! # Rules
//!
//! - A state is committed only after `NUM_SAMPLES_TO_REGISTER_CHANGE`
//!   consecutive readings agree on it
//! - A reading that differs from the current candidate restarts the run at 1
//! - Indeterminate readings neither count nor break the run
//! - `Invalid` is left on the first commit and only comes back via `reset()`

use crate::classifier::{Reading, Thresholds};
use crate::types::{FillDetectState, StripDetectState, NUM_SAMPLES_TO_REGISTER_CHANGE};

/// Run-length debouncer over contact / no-contact readings.
#[derive(Clone, Copy, Debug)]
pub struct Debouncer {
    /// Committed reading, `None` until the first commit.
    stable: Option<Reading>,
    /// Reading the current run agrees on.
    candidate: Option<Reading>,
    /// Length of the current run.
    run: u8,
    /// Run length that commits.
    window: u8,
}

impl Debouncer {
    /// Debouncer with the standard window.
    pub const fn new() -> Self {
        Self::with_window(NUM_SAMPLES_TO_REGISTER_CHANGE)
    }

    /// Debouncer committing after `window` agreeing readings (minimum 1).
    pub const fn with_window(window: u8) -> Self {
        Self {
            stable: None,
            candidate: None,
            run: 0,
            window: if window == 0 { 1 } else { window },
        }
    }

    /// Committed reading.
    #[inline]
    pub fn stable(&self) -> Option<Reading> {
        self.stable
    }

    /// Feed one reading (`None` = indeterminate).
    ///
    /// Returns the newly committed reading when the stable state changed.
    pub fn feed(&mut self, reading: Option<Reading>) -> Option<Reading> {
        let reading = reading?;

        if self.candidate == Some(reading) {
            self.run = self.run.saturating_add(1);
        } else {
            self.candidate = Some(reading);
            self.run = 1;
        }

        if self.run < self.window {
            return None;
        }

        self.run = 0;
        let changed = self.stable != Some(reading);
        self.stable = Some(reading);
        changed.then_some(reading)
    }

    /// Classify `volts` against `thresholds` and feed the result.
    #[inline]
    pub fn feed_volts(&mut self, volts: f32, thresholds: &Thresholds) -> Option<Reading> {
        self.feed(thresholds.classify(volts))
    }

    /// Back to the initial (unknown) state.
    pub fn reset(&mut self) {
        *self = Self::with_window(self.window);
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new()
    }
}

/// Debounced strip insertion detector.
#[derive(Clone, Copy, Debug, Default)]
pub struct StripDetector {
    debouncer: Debouncer,
}

impl StripDetector {
    pub const fn new() -> Self {
        Self { debouncer: Debouncer::new() }
    }

    /// Current strip state.
    pub fn state(&self) -> StripDetectState {
        match self.debouncer.stable() {
            None => StripDetectState::Invalid,
            Some(Reading::Contact) => StripDetectState::Inserted,
            Some(Reading::NoContact) => StripDetectState::NotInserted,
        }
    }

    /// Feed one strip-detect voltage. Returns the new state on a change.
    pub fn update(&mut self, volts: f32, thresholds: &Thresholds) -> Option<StripDetectState> {
        self.debouncer.feed_volts(volts, thresholds)?;
        Some(self.state())
    }

    pub fn reset(&mut self) {
        self.debouncer.reset();
    }
}

/// Debounced fill detector for one channel.
///
/// Fill is only meaningful with a strip present: [`strip_changed`]
/// forwards the strip state so the channel reads `NoStrip` while the port is
/// empty.
///
/// [`strip_changed`]: FillDetector::strip_changed
#[derive(Clone, Copy, Debug, Default)]
pub struct FillDetector {
    debouncer: Debouncer,
    no_strip: bool,
}

impl FillDetector {
    pub const fn new() -> Self {
        Self { debouncer: Debouncer::new(), no_strip: false }
    }

    /// Current fill state.
    pub fn state(&self) -> FillDetectState {
        if self.no_strip {
            return FillDetectState::NoStrip;
        }
        match self.debouncer.stable() {
            None => FillDetectState::Invalid,
            Some(Reading::Contact) => FillDetectState::Filled,
            Some(Reading::NoContact) => FillDetectState::NotFilled,
        }
    }

    /// Feed one fill-detect voltage. Returns the new state on a change.
    pub fn update(&mut self, volts: f32, thresholds: &Thresholds) -> Option<FillDetectState> {
        self.debouncer.feed_volts(volts, thresholds)?;
        self.no_strip = false;
        Some(self.state())
    }

    /// Apply a committed strip state. Returns the new fill state on a change.
    ///
    /// Removing the strip forces `NoStrip` and drops any partial run, so the
    /// next strip starts its fill debounce from scratch. Inserting a strip
    /// clears `NoStrip`: the channel reads `Invalid` until fill settles.
    pub fn strip_changed(&mut self, strip: StripDetectState) -> Option<FillDetectState> {
        let before = self.state();
        match strip {
            StripDetectState::NotInserted => {
                self.debouncer.reset();
                self.no_strip = true;
            }
            StripDetectState::Inserted => self.no_strip = false,
            StripDetectState::Invalid => {}
        }
        let after = self.state();
        (after != before).then_some(after)
    }

    pub fn reset(&mut self) {
        self.debouncer.reset();
        self.no_strip = false;
    }
}
