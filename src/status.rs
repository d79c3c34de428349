//! Published detection status.
//!
//! The acquisition loop is the only writer. UI / reporting tasks read
//! consistent snapshots without locking: every publish bumps a sequence
//! counter to an odd value, stores the states, then bumps it back to even.
//! Readers retry while the counter is odd or moved under them.
//!
//! # Usage
//!
//! ```ignore
//! static STATUS: DetectStatus = DetectStatus::new();
//!
//! // In the acquisition loop:
//! STATUS.publish(Some(StripDetectState::NotInserted), &[(Channel::Chan1, FillDetectState::NoStrip)]);
//!
//! // In a reporting task:
//! let snap = STATUS.snapshot();
//! if snap.strip == StripDetectState::Inserted { ... }
//! ```

use core::sync::atomic::{fence, AtomicU32, AtomicU8, Ordering};

use crate::types::{Channel, FillDetectState, StripDetectState, CHANNEL_COUNT};

/// Single-writer, multi-reader detection state.
pub struct DetectStatus {
    /// Even when stable, odd while a publish is in progress.
    sequence: AtomicU32,

    /// Strip state (raw `StripDetectState`).
    strip: AtomicU8,

    /// Fill state per channel (raw `FillDetectState`).
    fill: [AtomicU8; CHANNEL_COUNT],

    /// Committed transitions since boot (never cleared).
    transitions: AtomicU32,
}

impl DetectStatus {
    /// All states `Invalid`.
    pub const fn new() -> Self {
        const INVALID: AtomicU8 = AtomicU8::new(0);
        Self {
            sequence: AtomicU32::new(0),
            strip: AtomicU8::new(0),
            fill: [INVALID; CHANNEL_COUNT],
            transitions: AtomicU32::new(0),
        }
    }

    /// Publish one batch of committed states under a single sequence bump.
    ///
    /// A strip change and the fill changes it causes must go out together,
    /// so a reader never sees the new strip state next to stale fill states.
    pub fn publish(&self, strip: Option<StripDetectState>, fills: &[(Channel, FillDetectState)]) {
        if strip.is_none() && fills.is_empty() {
            return;
        }
        self.sequence.fetch_add(1, Ordering::AcqRel);
        if let Some(state) = strip {
            self.strip.store(state as u8, Ordering::Release);
        }
        for &(channel, state) in fills {
            self.fill[channel.index()].store(state as u8, Ordering::Release);
        }
        let count = u32::from(strip.is_some()) + fills.len() as u32;
        self.transitions.fetch_add(count, Ordering::Relaxed);
        self.sequence.fetch_add(1, Ordering::Release);
    }

    /// Publish a committed strip state.
    #[inline]
    pub fn publish_strip(&self, state: StripDetectState) {
        self.publish(Some(state), &[]);
    }

    /// Publish a committed fill state.
    #[inline]
    pub fn publish_fill(&self, channel: Channel, state: FillDetectState) {
        self.publish(None, &[(channel, state)]);
    }

    /// Strip state (may be newer than a concurrently taken snapshot).
    #[inline]
    pub fn strip(&self) -> StripDetectState {
        StripDetectState::from_u8(self.strip.load(Ordering::Acquire))
    }

    /// Fill state of one channel.
    #[inline]
    pub fn fill(&self, channel: Channel) -> FillDetectState {
        FillDetectState::from_u8(self.fill[channel.index()].load(Ordering::Acquire))
    }

    /// Committed transitions since boot.
    #[inline]
    pub fn transitions(&self) -> u32 {
        self.transitions.load(Ordering::Relaxed)
    }

    /// Consistent view of every state.
    pub fn snapshot(&self) -> DetectSnapshot {
        loop {
            let before = self.sequence.load(Ordering::Acquire);
            if before % 2 == 1 {
                core::hint::spin_loop();
                continue;
            }

            let strip = self.strip();
            let mut fill = [FillDetectState::Invalid; CHANNEL_COUNT];
            for channel in Channel::ALL {
                fill[channel.index()] = self.fill(channel);
            }
            let transitions = self.transitions();

            fence(Ordering::Acquire);
            if self.sequence.load(Ordering::Acquire) == before {
                return DetectSnapshot { strip, fill, transitions };
            }
        }
    }

    /// Back to `Invalid` everywhere (new test session).
    ///
    /// The transition count is preserved.
    pub fn reset(&self) {
        self.sequence.fetch_add(1, Ordering::AcqRel);
        self.strip.store(StripDetectState::Invalid as u8, Ordering::Release);
        for slot in &self.fill {
            slot.store(FillDetectState::Invalid as u8, Ordering::Release);
        }
        self.sequence.fetch_add(1, Ordering::Release);
    }
}

impl Default for DetectStatus {
    fn default() -> Self {
        Self::new()
    }
}

/// Detection state at a point in time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DetectSnapshot {
    pub strip: StripDetectState,
    pub fill: [FillDetectState; CHANNEL_COUNT],
    pub transitions: u32,
}

impl DetectSnapshot {
    /// Fill state of one channel.
    pub fn fill(&self, channel: Channel) -> FillDetectState {
        self.fill[channel.index()]
    }
}
