//! Classification error types
//!
//! Every error here is a local validation failure: a configuration defect or
//! a bad argument from the caller. None of them is transient, so callers
//! should surface them instead of retrying.

use crate::sample::SampleType;
use crate::types::{Channel, ChannelPos};

/// Detail of a malformed or inconsistent configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// More contacts than a strip can carry.
    TooManyContacts { count: usize },
    /// Contact index outside the loaded map.
    UnknownContact { contact: u8 },
    /// Fill / strip detect pin configured with a channel position.
    DetectPinHasPosition { contact: u8 },
    /// Working electrode configured without a channel position.
    MissingPosition { contact: u8 },
    /// Contact threshold not strictly below the no-contact threshold,
    /// or either one not a finite number.
    ThresholdOrder { contact: u8, sample_type: SampleType },
    /// Two contacts claim the same position in the same channel.
    DuplicatePosition { channel: Channel, position: ChannelPos },
    /// Contact asked about a channel it is not mapped to.
    NotInChannel { contact: u8, channel: Channel },
    /// Raw position byte is neither 0..=11 nor the 255 sentinel.
    InvalidPosition { raw: u8 },
    /// Channel membership bits outside the available channels.
    InvalidChannelBits { bits: u8 },
    /// Reference voltages or transimpedance not positive and finite.
    InvalidCalibration,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match *self {
            Self::TooManyContacts { count } => write!(f, "{} contacts exceeds strip capacity", count),
            Self::UnknownContact { contact } => write!(f, "contact {} not in map", contact),
            Self::DetectPinHasPosition { contact } => {
                write!(f, "detect pin {} must not have a position", contact)
            }
            Self::MissingPosition { contact } => write!(f, "contact {} has no position", contact),
            Self::ThresholdOrder { contact, sample_type } => write!(
                f,
                "contact {} thresholds out of order for {:?}",
                contact, sample_type
            ),
            Self::DuplicatePosition { channel, position } => write!(
                f,
                "position {} used twice in {:?}",
                position.letter(),
                channel
            ),
            Self::NotInChannel { contact, channel } => {
                write!(f, "contact {} not mapped to {:?}", contact, channel)
            }
            Self::InvalidPosition { raw } => write!(f, "invalid position byte {}", raw),
            Self::InvalidChannelBits { bits } => write!(f, "invalid channel bits {:#04x}", bits),
            Self::InvalidCalibration => write!(f, "calibration values out of range"),
        }
    }
}

/// Error returned by the classification core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EchemError {
    /// E01: Malformed or inconsistent configuration
    Config(ConfigError),
    /// E02: Conversion requested before calibration was loaded
    CalibrationNotLoaded,
    /// E03: No contact maps to the requested channel
    UnmappedChannel(Channel),
    /// E04: Sample type index out of range
    InvalidSampleType(u8),
    /// E05: Sample type bitfield does not have exactly one bit set
    AmbiguousSampleType(u8),
}

impl EchemError {
    /// Get error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "E01",
            Self::CalibrationNotLoaded => "E02",
            Self::UnmappedChannel(_) => "E03",
            Self::InvalidSampleType(_) => "E04",
            Self::AmbiguousSampleType(_) => "E05",
        }
    }

    /// Get error message
    pub fn message(&self) -> &'static str {
        match self {
            Self::Config(_) => "configuration error",
            Self::CalibrationNotLoaded => "calibration not loaded",
            Self::UnmappedChannel(_) => "unmapped channel",
            Self::InvalidSampleType(_) => "invalid sample type",
            Self::AmbiguousSampleType(_) => "ambiguous sample type",
        }
    }
}

impl From<ConfigError> for EchemError {
    fn from(e: ConfigError) -> Self {
        EchemError::Config(e)
    }
}

impl core::fmt::Display for EchemError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())?;
        match self {
            Self::Config(detail) => write!(f, " ({})", detail),
            Self::UnmappedChannel(channel) => write!(f, " ({:?})", channel),
            Self::InvalidSampleType(raw) => write!(f, " ({})", raw),
            Self::AmbiguousSampleType(bits) => write!(f, " ({:#07b})", bits),
            Self::CalibrationNotLoaded => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_unique() {
        let errors = [
            EchemError::Config(ConfigError::InvalidCalibration),
            EchemError::CalibrationNotLoaded,
            EchemError::UnmappedChannel(Channel::Chan2),
            EchemError::InvalidSampleType(7),
            EchemError::AmbiguousSampleType(3),
        ];
        for (i, a) in errors.iter().enumerate() {
            for b in &errors[i + 1..] {
                assert_ne!(a.code(), b.code());
            }
        }
    }

    #[test]
    fn test_display_includes_detail() {
        let err = EchemError::from(ConfigError::DetectPinHasPosition { contact: 3 });
        let text = format!("{}", err);
        assert!(text.starts_with("E01: configuration error"));
        assert!(text.contains("detect pin 3"));

        let text = format!("{}", EchemError::AmbiguousSampleType(0b00011));
        assert_eq!(text, "E05: ambiguous sample type (0b00011)");
    }
}
