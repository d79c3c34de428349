//! Sample classifier: per-sample-type threshold selection.
//!
//! Each contact carries one (no-contact, contact) voltage pair per sample
//! type. This module picks the pair for the active sample type and turns a
//! single voltage into an instantaneous reading.
//!
//! ```text
//!   volts < contact_v       -> Contact
//!   volts > no_contact_v    -> NoContact
//!   anything in between     -> indeterminate (None)
//! ```

use crate::contact::Contact;
use crate::error::EchemError;
use crate::sample::{SampleType, SampleTypeMask};

/// Instantaneous classification of one voltage sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reading {
    /// Low impedance: strip seated / chamber filled.
    Contact,
    /// High impedance: no strip / chamber dry.
    NoContact,
}

/// Voltage bounds for one contact and sample type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Thresholds {
    /// Above this the contact is open.
    pub no_contact_v: f32,
    /// Below this the contact is made.
    pub contact_v: f32,
}

impl Thresholds {
    /// Classify a voltage. `None` means indeterminate, including NaN.
    #[inline]
    pub fn classify(&self, volts: f32) -> Option<Reading> {
        if volts < self.contact_v {
            Some(Reading::Contact)
        } else if volts > self.no_contact_v {
            Some(Reading::NoContact)
        } else {
            None
        }
    }
}

/// Threshold pair for `sample_type`.
#[inline]
pub fn thresholds_for(contact: &Contact, sample_type: SampleType) -> Thresholds {
    Thresholds {
        no_contact_v: contact.threshold_volts_no_contact[sample_type.index()],
        contact_v: contact.threshold_volts_contact[sample_type.index()],
    }
}

/// Threshold pair for a raw sample type index.
///
/// # Errors
/// `InvalidSampleType` if `index >= SAMPLE_TYPE_COUNT`.
pub fn thresholds_for_index(contact: &Contact, index: u8) -> Result<Thresholds, EchemError> {
    let sample_type = SampleType::from_index(index)?;
    Ok(thresholds_for(contact, sample_type))
}

/// Threshold pair for a sample type bitfield.
///
/// # Errors
/// `AmbiguousSampleType` unless exactly one bit is set;
/// `InvalidSampleType` if that bit is reserved.
pub fn thresholds_for_mask(contact: &Contact, mask: SampleTypeMask) -> Result<Thresholds, EchemError> {
    let sample_type = mask.single()?;
    Ok(thresholds_for(contact, sample_type))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_bounds_are_exclusive() {
        let t = Thresholds { no_contact_v: 1.8, contact_v: 0.3 };
        assert_eq!(t.classify(0.2), Some(Reading::Contact));
        assert_eq!(t.classify(0.3), None);
        assert_eq!(t.classify(1.0), None);
        assert_eq!(t.classify(1.8), None);
        assert_eq!(t.classify(2.0), Some(Reading::NoContact));
        assert_eq!(t.classify(f32::NAN), None);
    }
}
