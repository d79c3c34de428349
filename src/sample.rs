//! Module: sample
//!
//! Purpose: Sample types reported for a test, in both of the forms the host
//! uses: a single enum value, or a bitfield with one bit per type.
//!
//! Architecture:
//! - `SampleType` indexes the per-contact threshold tables
//! - `SampleTypeMask` is the protocol bitfield (one byte)
//! - A mask may carry several bits for reporting ("any blood sample"),
//!   but only a single-bit mask converts to a `SampleType`
//!
//! Safety: Safe. No unsafe blocks. Copy types only.

use crate::error::EchemError;

/// Number of defined sample types (size of every threshold table).
pub const SAMPLE_TYPE_COUNT: usize = 5;

/// Kind of sample applied to the strip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum SampleType {
    /// Capillary blood from a finger stick.
    #[default]
    FingerStick = 0,
    /// Venous blood.
    VenousBlood = 1,
    /// Plasma, expected below 10% haematocrit.
    Plasma = 2,
    /// Serum.
    Serum = 3,
    /// Control solution (QC mode only).
    ControlSolution = 4,
}

impl SampleType {
    /// All sample types in index order.
    pub const ALL: [SampleType; SAMPLE_TYPE_COUNT] = [
        SampleType::FingerStick,
        SampleType::VenousBlood,
        SampleType::Plasma,
        SampleType::Serum,
        SampleType::ControlSolution,
    ];

    /// Convert a raw index into a sample type.
    ///
    /// # Errors
    /// `InvalidSampleType` if `index >= SAMPLE_TYPE_COUNT`.
    pub fn from_index(index: u8) -> Result<Self, EchemError> {
        Self::ALL
            .get(index as usize)
            .copied()
            .ok_or(EchemError::InvalidSampleType(index))
    }

    /// Threshold table index.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Bit for this type in a [`SampleTypeMask`].
    #[inline]
    pub const fn bit(self) -> u8 {
        1 << (self as u8)
    }

    /// True for whole-blood samples (finger stick or venous).
    pub const fn is_whole_blood(self) -> bool {
        matches!(self, SampleType::FingerStick | SampleType::VenousBlood)
    }
}

/// Sample type bitfield, as carried by the host protocol.
///
/// Bit layout:
/// - Bit 0: Finger stick
/// - Bit 1: Venous blood
/// - Bit 2: Plasma
/// - Bit 3: Serum
/// - Bit 4: Control solution
/// - Bits 5-7: Reserved
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct SampleTypeMask(u8);

impl SampleTypeMask {
    /// Finger stick bit (bit 0)
    pub const FINGER_STICK: u8 = 1 << 0;

    /// Venous blood bit (bit 1)
    pub const VENOUS_BLOOD: u8 = 1 << 1;

    /// Plasma bit (bit 2)
    pub const PLASMA: u8 = 1 << 2;

    /// Serum bit (bit 3)
    pub const SERUM: u8 = 1 << 3;

    /// Control solution bit (bit 4)
    pub const CONTROL: u8 = 1 << 4;

    /// No sample type set.
    pub const EMPTY: Self = Self(0);

    /// Every defined sample type.
    pub const ALL: Self = Self(
        Self::FINGER_STICK | Self::VENOUS_BLOOD | Self::PLASMA | Self::SERUM | Self::CONTROL,
    );

    /// Any blood-derived sample (reporting only).
    pub const ANY_BLOOD: Self =
        Self(Self::FINGER_STICK | Self::VENOUS_BLOOD | Self::PLASMA | Self::SERUM);

    /// Create a mask from raw bits (unvalidated).
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Get raw bits value
    pub const fn bits(&self) -> u8 {
        self.0
    }

    /// Check whether a sample type's bit is set.
    pub const fn contains(&self, sample_type: SampleType) -> bool {
        (self.0 & sample_type.bit()) != 0
    }

    /// Return a copy with the given type's bit set.
    pub const fn with(self, sample_type: SampleType) -> Self {
        Self(self.0 | sample_type.bit())
    }

    /// Check if no bits are set.
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Resolve the mask to the single sample type it selects.
    ///
    /// # Errors
    /// - `AmbiguousSampleType` unless exactly one bit is set
    /// - `InvalidSampleType` if that bit is a reserved one (bit 5+)
    pub fn single(&self) -> Result<SampleType, EchemError> {
        if self.0.count_ones() != 1 {
            return Err(EchemError::AmbiguousSampleType(self.0));
        }
        SampleType::from_index(self.0.trailing_zeros() as u8)
    }

    /// Iterate the defined sample types present in the mask.
    pub fn iter(self) -> impl Iterator<Item = SampleType> {
        SampleType::ALL.into_iter().filter(move |t| self.contains(*t))
    }
}

impl From<SampleType> for SampleTypeMask {
    fn from(sample_type: SampleType) -> Self {
        Self(sample_type.bit())
    }
}

// ============================================================================
// Tests
// ============================================================================
