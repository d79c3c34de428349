//! Factory layout of the 15-contact, 4-channel strip.
//!
//! ```text
//! contact  0      strip detect        all channels
//! contact  1      fill detect         all channels
//! contact  2..=13 A / B / C electrodes, three per channel
//! contact 14      shared D electrode  all channels
//! ```
//!
//! Thresholds are nominal values for a fresh meter; a calibrated unit
//! overrides them through its own [`ConfigSource`].

use crate::calibration::Calibration;
use crate::config::{ConfigSource, ReaderConfig};
use crate::contact::{ChannelSet, Contact, MAX_CONTACTS};
use crate::error::EchemError;
use crate::sample::{SampleType, SAMPLE_TYPE_COUNT};
use crate::types::{Channel, ChannelPos};

pub const STRIP_DETECT_CONTACT: u8 = 0;
pub const FILL_DETECT_CONTACT: u8 = 1;
pub const SHARED_CONTACT: u8 = 14;

/// Strip detect thresholds do not depend on the sample.
const STRIP_NO_CONTACT_V: f32 = 1.8;
const STRIP_CONTACT_V: f32 = 0.3;

/// Fill detect (no-contact, contact) per sample type, in index order.
/// Plasma, serum and control solution conduct better than whole blood.
const FILL_THRESHOLDS_V: [(f32, f32); SAMPLE_TYPE_COUNT] = [
    (1.6, 0.6), // finger stick
    (1.6, 0.6), // venous blood
    (1.4, 0.8), // plasma
    (1.4, 0.8), // serum
    (1.3, 0.9), // control solution
];

const ELECTRODE_NO_CONTACT_V: f32 = 1.8;
const ELECTRODE_CONTACT_V: f32 = 0.4;

/// Nominal analog front-end calibration.
pub const NOMINAL_CALIBRATION: Calibration = Calibration {
    qdac_reference_volts: 2.5,
    sd_adc_reference_volts: 1.82,
    potentiostat_transimpedance_ohms: 10_000.0,
};

/// The 15 contacts of the strip, ids in array order.
pub fn contacts() -> [Contact; MAX_CONTACTS] {
    let mut fill = Contact::fill_detect(ChannelSet::ALL, 1.6, 0.6);
    for sample_type in SampleType::ALL {
        let (no_contact, contact) = FILL_THRESHOLDS_V[sample_type.index()];
        fill = fill.with_thresholds(sample_type, no_contact, contact);
    }

    let shared = Contact::electrode(
        ChannelSet::ALL,
        ChannelPos::D,
        ELECTRODE_NO_CONTACT_V,
        ELECTRODE_CONTACT_V,
    );

    let mut out = [shared; MAX_CONTACTS];
    out[STRIP_DETECT_CONTACT as usize] =
        Contact::strip_detect(ChannelSet::ALL, STRIP_NO_CONTACT_V, STRIP_CONTACT_V);
    out[FILL_DETECT_CONTACT as usize] = fill;

    let roles = [ChannelPos::A, ChannelPos::B, ChannelPos::C];
    for channel in Channel::ALL {
        for (slot, position) in roles.into_iter().enumerate() {
            let id = 2 + channel.index() * roles.len() + slot;
            out[id] = Contact::electrode(
                ChannelSet::of(channel),
                position,
                ELECTRODE_NO_CONTACT_V,
                ELECTRODE_CONTACT_V,
            );
        }
    }
    out
}

/// Factory configuration source.
#[derive(Clone, Copy, Debug, Default)]
pub struct Strip15Layout {
    pub default_sample_type: SampleType,
}

impl ConfigSource for Strip15Layout {
    fn load(&self) -> Result<ReaderConfig, EchemError> {
        ReaderConfig::new(&contacts(), NOMINAL_CALIBRATION, self.default_sample_type)
    }
}
