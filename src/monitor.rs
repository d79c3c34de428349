//! Strip monitor: the classification pipeline for one reader.
//!
//! ```text
//! raw counts ──▶ CalibrationStore ──▶ thresholds_for(sample type)
//!                  (counts → volts)            │
//!                                              ▼
//!                 DetectStatus ◀── commit ── Debouncer(s)
//! ```
//!
//! The acquisition loop calls [`StripMonitor::process`] once per contact
//! reading. Strip detect readings feed the strip debouncer; fill detect
//! readings feed the fill debouncer of every channel the pin maps to. Other
//! contacts belong to the measurement layer and are ignored here.

use crate::calibration::CalibrationStore;
use crate::classifier::thresholds_for;
use crate::config::SampleTypeSelection;
use crate::contact::{ChannelSet, ContactId, ContactMap};
use crate::debounce::{FillDetector, StripDetector};
use crate::error::EchemError;
use crate::logging::LogStream;
use crate::sample::{SampleType, SampleTypeMask};
use crate::status::DetectStatus;
use crate::types::{Channel, FillDetectState, StripDetectState, TestType, CHANNEL_COUNT};
use crate::{rt_debug, rt_info};

/// Stable states that changed while processing one reading.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DetectChanges {
    /// New strip state, if it changed.
    pub strip: Option<StripDetectState>,
    /// Channels whose fill state changed.
    pub fill: ChannelSet,
}

impl DetectChanges {
    pub fn is_empty(&self) -> bool {
        self.strip.is_none() && self.fill.is_empty()
    }
}

/// Strip and fill detection for one reader.
pub struct StripMonitor<'a> {
    contacts: &'a ContactMap,
    calibration: &'a CalibrationStore,
    status: &'a DetectStatus,
    log: &'a LogStream,
    sample_type: SampleType,
    selection_gen: Option<u16>,
    strip: StripDetector,
    fill: [FillDetector; CHANNEL_COUNT],
    /// Fill follows the strip only if the map has a strip detect pin.
    gated: bool,
}

impl<'a> StripMonitor<'a> {
    pub fn new(
        contacts: &'a ContactMap,
        calibration: &'a CalibrationStore,
        status: &'a DetectStatus,
        log: &'a LogStream,
        sample_type: SampleType,
    ) -> Self {
        Self {
            contacts,
            calibration,
            status,
            log,
            sample_type,
            selection_gen: None,
            strip: StripDetector::new(),
            fill: [FillDetector::new(); CHANNEL_COUNT],
            gated: contacts.strip_detect_contact().is_some(),
        }
    }

    /// Active sample type.
    #[inline]
    pub fn sample_type(&self) -> SampleType {
        self.sample_type
    }

    /// Change the sample type used for threshold selection.
    pub fn set_sample_type(&mut self, sample_type: SampleType) {
        self.sample_type = sample_type;
    }

    /// Change the sample type from a protocol bitfield.
    ///
    /// # Errors
    /// `AmbiguousSampleType` / `InvalidSampleType`; the active type is kept.
    pub fn set_sample_type_mask(&mut self, mask: SampleTypeMask) -> Result<SampleType, EchemError> {
        let sample_type = mask.single()?;
        self.sample_type = sample_type;
        Ok(sample_type)
    }

    /// Pick up a host-side selection if it changed since the last call.
    ///
    /// Returns the new sample type when it was applied.
    pub fn sync_sample_type(&mut self, now_us: i64, selection: &SampleTypeSelection) -> Option<SampleType> {
        let generation = selection.generation();
        if self.selection_gen == Some(generation) {
            return None;
        }
        self.selection_gen = Some(generation);
        let sample_type = selection.current();
        self.sample_type = sample_type;
        rt_info!(self.log, now_us, "sample type {:?}", sample_type);
        Some(sample_type)
    }

    #[inline]
    pub fn strip_state(&self) -> StripDetectState {
        self.strip.state()
    }

    #[inline]
    pub fn fill_state(&self, channel: Channel) -> FillDetectState {
        self.fill[channel.index()].state()
    }

    /// Dry until the channel's fill has been detected.
    pub fn test_type(&self, channel: Channel) -> TestType {
        TestType::for_fill(self.fill_state(channel))
    }

    /// Classify one raw ADC reading of `contact`.
    ///
    /// # Errors
    /// - `CalibrationNotLoaded` before calibration is set
    /// - `Config(UnknownContact)` for an id outside the map
    pub fn process(&mut self, now_us: i64, contact: ContactId, raw_counts: i32) -> Result<DetectChanges, EchemError> {
        let volts = self.calibration.to_volts(raw_counts)?;
        self.process_volts(now_us, contact, volts)
    }

    /// Classify one reading of `contact` already converted to volts.
    ///
    /// Everything committed by this reading is published in one batch.
    pub fn process_volts(&mut self, now_us: i64, contact: ContactId, volts: f32) -> Result<DetectChanges, EchemError> {
        let contacts = self.contacts;
        let pin = contacts.get(contact)?;
        let thresholds = thresholds_for(pin, self.sample_type);
        let mut strip = None;
        let mut fill = [None; CHANNEL_COUNT];

        if pin.is_strip_detect {
            if let Some(state) = self.strip.update(volts, &thresholds) {
                rt_info!(self.log, now_us, "strip {:?} ({}V)", state, volts);
                strip = Some(state);
                self.apply_strip(now_us, state, &mut fill);
            }
        }

        if pin.is_fill_detect && self.fill_enabled() {
            for channel in pin.channels.iter() {
                if let Some(state) = self.fill[channel.index()].update(volts, &thresholds) {
                    rt_info!(self.log, now_us, "{:?} fill {:?} ({}V)", channel, state, volts);
                    fill[channel.index()] = Some(state);
                }
            }
        }

        Ok(self.publish(strip, &fill))
    }

    /// Start a new test session: every state back to `Invalid`.
    pub fn reset(&mut self, now_us: i64) {
        self.strip.reset();
        for fill in &mut self.fill {
            fill.reset();
        }
        self.status.reset();
        rt_debug!(self.log, now_us, "detection reset");
    }

    fn fill_enabled(&self) -> bool {
        !self.gated || self.strip.state() == StripDetectState::Inserted
    }

    /// Push a committed strip state into every channel's fill state.
    fn apply_strip(&mut self, now_us: i64, strip: StripDetectState, fill: &mut [Option<FillDetectState>; CHANNEL_COUNT]) {
        for channel in Channel::ALL {
            if let Some(state) = self.fill[channel.index()].strip_changed(strip) {
                rt_debug!(self.log, now_us, "{:?} fill {:?}", channel, state);
                fill[channel.index()] = Some(state);
            }
        }
    }

    fn publish(&self, strip: Option<StripDetectState>, fill: &[Option<FillDetectState>; CHANNEL_COUNT]) -> DetectChanges {
        let mut batch = [(Channel::Chan1, FillDetectState::Invalid); CHANNEL_COUNT];
        let mut len = 0;
        let mut changed = ChannelSet::EMPTY;
        for channel in Channel::ALL {
            if let Some(state) = fill[channel.index()] {
                batch[len] = (channel, state);
                len += 1;
                changed = changed.with(channel);
            }
        }
        self.status.publish(strip, &batch[..len]);
        DetectChanges { strip, fill: changed }
    }
}
