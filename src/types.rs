//! Module: types
//!
//! Purpose: Closed-set types shared by every classification stage: operating
//! modes, strip channels, positions inside a channel, and the strip / fill
//! detection states.
//!
//! All enums are `#[repr(u8)]` with the same raw values the host protocol
//! uses, so they can be stored in atomics and received over the wire.
//!
//! Safety: Safe. No unsafe blocks. Copy types only.

/// Consecutive agreeing samples required before a detection state changes.
pub const NUM_SAMPLES_TO_REGISTER_CHANGE: u8 = 5;

/// Number of measurement channels on a 15-contact strip.
pub const CHANNEL_COUNT: usize = 4;

/// Number of named positions (A..L) inside a channel.
pub const CHANNEL_POS_COUNT: usize = 12;

/// Raw wire value meaning "no position" (fill / strip detect pins).
pub const CHANNEL_POS_NONE_RAW: u8 = 255;

/// Number of operating modes.
pub const MODE_COUNT: usize = 5;

// ============================================================================
// Operating mode
// ============================================================================

/// Switch-matrix operating mode selected by the test sequencer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Mode {
    /// Switches isolated and quiescent.
    Manual = 0,
    /// Potentiostat isolated, sense DAC routed to the strip.
    FluidDetect = 1,
    /// Potentiostat mode, channel and gain set via switches.
    Potentiostat = 2,
    /// Potentiostat self test.
    SelfTest = 3,
    /// Haematocrit measurement.
    Hct = 4,
}

impl Mode {
    /// All modes in raw-value order.
    pub const ALL: [Mode; MODE_COUNT] = [
        Mode::Manual,
        Mode::FluidDetect,
        Mode::Potentiostat,
        Mode::SelfTest,
        Mode::Hct,
    ];

    /// Convert from raw u8 value.
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }

    /// True for modes that drive the cell through the potentiostat.
    #[inline]
    pub fn is_measurement(self) -> bool {
        matches!(self, Mode::Potentiostat | Mode::SelfTest | Mode::Hct)
    }
}

// ============================================================================
// Channels
// ============================================================================

/// Electrically independent measurement path on the strip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Channel {
    Chan1 = 0,
    Chan2 = 1,
    Chan3 = 2,
    Chan4 = 3,
}

impl Channel {
    /// All channels in raw-value order.
    pub const ALL: [Channel; CHANNEL_COUNT] =
        [Channel::Chan1, Channel::Chan2, Channel::Chan3, Channel::Chan4];

    /// Convert from raw u8 value.
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }

    /// Zero-based array index.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Position of an electrode inside a channel.
///
/// A, B and C are the standard working / reference / counter positions.
/// D..L cover the case where every remaining contact of a 15-contact strip
/// maps to the same channel. "No position" is `Option::None`; the raw
/// sentinel only exists at the wire boundary (see [`ChannelPos::from_raw`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ChannelPos {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
    F = 5,
    G = 6,
    H = 7,
    I = 8,
    J = 9,
    K = 10,
    L = 11,
}

impl ChannelPos {
    pub const ALL: [ChannelPos; CHANNEL_POS_COUNT] = [
        ChannelPos::A,
        ChannelPos::B,
        ChannelPos::C,
        ChannelPos::D,
        ChannelPos::E,
        ChannelPos::F,
        ChannelPos::G,
        ChannelPos::H,
        ChannelPos::I,
        ChannelPos::J,
        ChannelPos::K,
        ChannelPos::L,
    ];

    /// Convert from raw u8 value (0..=11).
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }

    /// Decode a raw position byte where 255 means "no position".
    ///
    /// Returns `Err(raw)` for values that are neither a position nor the
    /// sentinel.
    pub fn from_raw(raw: u8) -> Result<Option<Self>, u8> {
        if raw == CHANNEL_POS_NONE_RAW {
            return Ok(None);
        }
        Self::from_u8(raw).map(Some).ok_or(raw)
    }

    /// Encode an optional position back to its raw byte.
    pub fn to_raw(pos: Option<Self>) -> u8 {
        pos.map_or(CHANNEL_POS_NONE_RAW, |p| p as u8)
    }

    /// Position letter, for logs and reports.
    pub fn letter(self) -> char {
        (b'A' + self as u8) as char
    }
}

// ============================================================================
// Test type
// ============================================================================

/// Whether a test runs on a dry strip or after sample fill.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum TestType {
    Dry = 0,
    Wet = 1,
}

impl TestType {
    /// Convert from raw u8 value.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(TestType::Dry),
            1 => Some(TestType::Wet),
            _ => None,
        }
    }

    /// A channel is wet once its fill has been detected.
    pub fn for_fill(state: FillDetectState) -> Self {
        if state == FillDetectState::Filled {
            TestType::Wet
        } else {
            TestType::Dry
        }
    }
}

// ============================================================================
// Detection states
// ============================================================================

/// Strip insertion state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum StripDetectState {
    /// Not yet known.
    #[default]
    Invalid = 0,
    /// No strip in the port.
    NotInserted = 1,
    /// Strip in the port.
    Inserted = 2,
}

impl StripDetectState {
    /// Convert from raw u8 value. Unknown values read as `Invalid`.
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => StripDetectState::NotInserted,
            2 => StripDetectState::Inserted,
            _ => StripDetectState::Invalid,
        }
    }
}

/// Channel fill state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum FillDetectState {
    /// Not yet known.
    #[default]
    Invalid = 0,
    /// No strip present, so it cannot be filled.
    NoStrip = 1,
    /// Strip present, no sample detected.
    NotFilled = 2,
    /// Sample fill detected.
    Filled = 3,
}

impl FillDetectState {
    /// Convert from raw u8 value. Unknown values read as `Invalid`.
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => FillDetectState::NoStrip,
            2 => FillDetectState::NotFilled,
            3 => FillDetectState::Filled,
            _ => FillDetectState::Invalid,
        }
    }
}
