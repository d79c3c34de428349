//! Module: config
//!
//! Purpose: Reader configuration: the contact map and calibration loaded
//! once at startup, plus the runtime sample type selection.
//!
//! Architecture:
//! - Persisted configuration is read by an external loader implementing
//!   [`ConfigSource`]; its storage format is not this crate's concern
//! - [`ReaderConfig::new`] validates everything before the loop starts
//! - [`strip15`]: factory layout of the 15-contact strip
//! - [`SAMPLE_TYPE`]: lock-free host → loop sample type handoff
//!
//! Safety: RT-safe. Runtime selection is atomics only, no locks.

pub mod strip15;

use core::sync::atomic::{AtomicU16, AtomicU8, Ordering};

use crate::calibration::Calibration;
use crate::contact::{Contact, ContactMap};
use crate::error::EchemError;
use crate::sample::{SampleType, SampleTypeMask};
use crate::types::Channel;

/// Validated reader configuration.
#[derive(Clone, Debug)]
pub struct ReaderConfig {
    pub contacts: ContactMap,
    pub calibration: Calibration,
    /// Sample type used until the host selects another one.
    pub default_sample_type: SampleType,
}

impl ReaderConfig {
    /// Validate and assemble a configuration.
    ///
    /// # Errors
    /// `Config` for an invalid contact map or calibration.
    pub fn new(
        contacts: &[Contact],
        calibration: Calibration,
        default_sample_type: SampleType,
    ) -> Result<Self, EchemError> {
        let contacts = match ContactMap::from_contacts(contacts) {
            Ok(map) => map,
            Err(e) => {
                log::error!("contact map rejected: {}", e);
                return Err(e.into());
            }
        };
        if let Err(e) = calibration.validate() {
            log::error!("calibration rejected: {}", e);
            return Err(e.into());
        }

        if contacts.strip_detect_contact().is_none() {
            log::warn!("no strip detect pin, fill detection runs ungated");
        }
        for channel in Channel::ALL {
            if !contacts.is_channel_mapped(channel) {
                log::debug!("{:?} has no contacts", channel);
            }
        }
        log::info!(
            "contact map loaded: {} contacts, default sample {:?}",
            contacts.len(),
            default_sample_type
        );

        Ok(Self { contacts, calibration, default_sample_type })
    }

    /// Load from an external source.
    pub fn load<S: ConfigSource + ?Sized>(source: &S) -> Result<Self, EchemError> {
        source.load()
    }
}

/// Producer of reader configuration (persisted settings, factory tables).
pub trait ConfigSource {
    /// Read and validate the configuration.
    fn load(&self) -> Result<ReaderConfig, EchemError>;
}

/// Runtime sample type selection.
///
/// The host writes a validated single-bit mask and bumps the generation;
/// the acquisition loop compares generations to notice a change.
pub struct SampleTypeSelection {
    mask: AtomicU8,
    generation: AtomicU16,
}

impl SampleTypeSelection {
    /// Selection starting at `initial`.
    pub const fn new(initial: SampleType) -> Self {
        Self {
            mask: AtomicU8::new(initial.bit()),
            generation: AtomicU16::new(0),
        }
    }

    /// Select a sample type.
    pub fn select(&self, sample_type: SampleType) {
        self.mask.store(sample_type.bit(), Ordering::Release);
        self.generation.fetch_add(1, Ordering::AcqRel);
    }

    /// Select from a protocol bitfield.
    ///
    /// # Errors
    /// `AmbiguousSampleType` / `InvalidSampleType`; the previous selection
    /// is kept.
    pub fn select_mask(&self, mask: SampleTypeMask) -> Result<SampleType, EchemError> {
        let sample_type = mask.single()?;
        self.select(sample_type);
        Ok(sample_type)
    }

    /// Currently selected sample type.
    pub fn current(&self) -> SampleType {
        // Only single-bit masks are ever stored.
        SampleTypeMask::from_bits(self.mask.load(Ordering::Acquire))
            .single()
            .unwrap_or_default()
    }

    /// Incremented on every selection.
    pub fn generation(&self) -> u16 {
        self.generation.load(Ordering::Acquire)
    }
}

impl Default for SampleTypeSelection {
    fn default() -> Self {
        Self::new(SampleType::FingerStick)
    }
}

/// Global sample type selection.
pub static SAMPLE_TYPE: SampleTypeSelection = SampleTypeSelection::new(SampleType::FingerStick);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_generation() {
        let sel = SampleTypeSelection::default();
        assert_eq!(sel.current(), SampleType::FingerStick);
        assert_eq!(sel.generation(), 0);

        sel.select(SampleType::Serum);
        assert_eq!(sel.current(), SampleType::Serum);
        assert_eq!(sel.generation(), 1);
    }

    #[test]
    fn test_ambiguous_mask_keeps_selection() {
        let sel = SampleTypeSelection::new(SampleType::Plasma);
        let result = sel.select_mask(SampleTypeMask::from_bits(0b00011));
        assert_eq!(result, Err(EchemError::AmbiguousSampleType(0b00011)));
        assert_eq!(sel.current(), SampleType::Plasma);
        assert_eq!(sel.generation(), 0);

        assert_eq!(
            sel.select_mask(SampleTypeMask::from_bits(SampleTypeMask::CONTROL)),
            Ok(SampleType::ControlSolution)
        );
        assert_eq!(sel.generation(), 1);
    }
}
