//! Contact map: static per-electrode configuration.
//!
//! One [`Contact`] per physical strip pad. A contact may belong to several
//! channels but holds the same position in each of them. Fill and strip
//! detect pins have no position.
//!
//! The map is validated once when it is built and is read-only afterwards,
//! so it can be shared by reference between the acquisition loop and any
//! reporting code without locking.

use crate::error::{ConfigError, EchemError};
use crate::sample::{SampleType, SAMPLE_TYPE_COUNT};
use crate::types::{Channel, ChannelPos, CHANNEL_COUNT};

/// Maximum number of contacts on a strip.
pub const MAX_CONTACTS: usize = 15;

/// Index of a contact inside a [`ContactMap`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContactId(pub u8);

impl ContactId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Set of channels a contact is wired into (one bit per channel).
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ChannelSet(u8);

impl ChannelSet {
    const VALID: u8 = (1 << CHANNEL_COUNT) - 1;

    /// Member of no channel.
    pub const EMPTY: Self = Self(0);

    /// Member of every channel.
    pub const ALL: Self = Self(Self::VALID);

    /// Set containing one channel.
    pub const fn of(channel: Channel) -> Self {
        Self(1 << channel as u8)
    }

    /// Build from raw membership bits.
    ///
    /// # Errors
    /// `InvalidChannelBits` if a bit beyond the last channel is set.
    pub fn from_bits(bits: u8) -> Result<Self, ConfigError> {
        if bits & !Self::VALID != 0 {
            return Err(ConfigError::InvalidChannelBits { bits });
        }
        Ok(Self(bits))
    }

    /// Build from the boolean membership array used by persisted configs.
    pub fn from_flags(flags: [bool; CHANNEL_COUNT]) -> Self {
        let mut bits = 0u8;
        for (i, on) in flags.into_iter().enumerate() {
            if on {
                bits |= 1 << i;
            }
        }
        Self(bits)
    }

    pub const fn bits(&self) -> u8 {
        self.0
    }

    /// Return a copy with `channel` added.
    pub const fn with(self, channel: Channel) -> Self {
        Self(self.0 | (1 << channel as u8))
    }

    pub const fn contains(&self, channel: Channel) -> bool {
        (self.0 & (1 << channel as u8)) != 0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Channels in the set, ascending.
    pub fn iter(self) -> impl Iterator<Item = Channel> {
        Channel::ALL.into_iter().filter(move |c| self.contains(*c))
    }
}

/// Configuration of one strip electrode.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Contact {
    /// Channels this electrode is wired into.
    pub channels: ChannelSet,
    /// Role inside every channel it belongs to; `None` for detect pins.
    pub position: Option<ChannelPos>,
    /// Electrode is the fill detection pin.
    pub is_fill_detect: bool,
    /// Electrode is the strip detection pin.
    pub is_strip_detect: bool,
    /// No contact when the reading is above this (per sample type).
    pub threshold_volts_no_contact: [f32; SAMPLE_TYPE_COUNT],
    /// Contact when the reading is below this (per sample type).
    pub threshold_volts_contact: [f32; SAMPLE_TYPE_COUNT],
}

impl Contact {
    const UNUSED: Self = Self {
        channels: ChannelSet::EMPTY,
        position: None,
        is_fill_detect: false,
        is_strip_detect: false,
        threshold_volts_no_contact: [0.0; SAMPLE_TYPE_COUNT],
        threshold_volts_contact: [0.0; SAMPLE_TYPE_COUNT],
    };

    /// Working electrode at `position` in `channels`, with the same
    /// thresholds for every sample type.
    pub fn electrode(channels: ChannelSet, position: ChannelPos, no_contact_v: f32, contact_v: f32) -> Self {
        Self {
            channels,
            position: Some(position),
            is_fill_detect: false,
            is_strip_detect: false,
            threshold_volts_no_contact: [no_contact_v; SAMPLE_TYPE_COUNT],
            threshold_volts_contact: [contact_v; SAMPLE_TYPE_COUNT],
        }
    }

    /// Strip detect pin in `channels`.
    pub fn strip_detect(channels: ChannelSet, no_contact_v: f32, contact_v: f32) -> Self {
        Self {
            position: None,
            is_strip_detect: true,
            ..Self::electrode(channels, ChannelPos::A, no_contact_v, contact_v)
        }
    }

    /// Fill detect pin in `channels`.
    pub fn fill_detect(channels: ChannelSet, no_contact_v: f32, contact_v: f32) -> Self {
        Self {
            position: None,
            is_fill_detect: true,
            ..Self::electrode(channels, ChannelPos::A, no_contact_v, contact_v)
        }
    }

    /// Override the threshold pair for one sample type.
    pub fn with_thresholds(mut self, sample_type: SampleType, no_contact_v: f32, contact_v: f32) -> Self {
        self.threshold_volts_no_contact[sample_type.index()] = no_contact_v;
        self.threshold_volts_contact[sample_type.index()] = contact_v;
        self
    }

    /// True for fill or strip detect pins.
    #[inline]
    pub fn is_detect_pin(&self) -> bool {
        self.is_fill_detect || self.is_strip_detect
    }

    /// Check the per-contact invariants.
    ///
    /// - position is `None` exactly when the contact is a detect pin
    /// - for every sample type, `contact < no_contact` and both are finite
    pub fn validate(&self, id: ContactId) -> Result<(), ConfigError> {
        let contact = id.0;
        match (self.is_detect_pin(), self.position) {
            (true, Some(_)) => return Err(ConfigError::DetectPinHasPosition { contact }),
            (false, None) => return Err(ConfigError::MissingPosition { contact }),
            _ => {}
        }

        for sample_type in SampleType::ALL {
            let no_contact = self.threshold_volts_no_contact[sample_type.index()];
            let touching = self.threshold_volts_contact[sample_type.index()];
            let ordered = no_contact.is_finite() && touching.is_finite() && touching < no_contact;
            if !ordered {
                return Err(ConfigError::ThresholdOrder { contact, sample_type });
            }
        }
        Ok(())
    }
}

/// Role of a contact inside one channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContactRole {
    pub position: Option<ChannelPos>,
    pub is_fill_pin: bool,
    pub is_strip_pin: bool,
    /// Every channel the contact belongs to.
    pub channels: ChannelSet,
}

/// Validated, read-only set of strip contacts.
#[derive(Clone, Debug)]
pub struct ContactMap {
    contacts: [Contact; MAX_CONTACTS],
    len: u8,
}

impl ContactMap {
    /// Map with no contacts.
    pub const fn empty() -> Self {
        Self {
            contacts: [Contact::UNUSED; MAX_CONTACTS],
            len: 0,
        }
    }

    /// Build and validate a map. Contact ids are slice indices.
    ///
    /// # Errors
    /// `ConfigError` for the first violated invariant: too many contacts,
    /// a bad contact (see [`Contact::validate`]), or two contacts sharing a
    /// position in the same channel.
    pub fn from_contacts(contacts: &[Contact]) -> Result<Self, ConfigError> {
        if contacts.len() > MAX_CONTACTS {
            return Err(ConfigError::TooManyContacts { count: contacts.len() });
        }

        let mut map = Self::empty();
        for (i, contact) in contacts.iter().enumerate() {
            contact.validate(ContactId(i as u8))?;
            map.contacts[i] = *contact;
        }
        map.len = contacts.len() as u8;

        // One contact per position per channel.
        for channel in Channel::ALL {
            let mut seen = [false; crate::types::CHANNEL_POS_COUNT];
            for (_, contact) in map.members(channel) {
                if let Some(position) = contact.position {
                    if seen[position as usize] {
                        return Err(ConfigError::DuplicatePosition { channel, position });
                    }
                    seen[position as usize] = true;
                }
            }
        }

        Ok(map)
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Look up a contact.
    pub fn get(&self, id: ContactId) -> Result<&Contact, ConfigError> {
        self.as_slice()
            .get(id.index())
            .ok_or(ConfigError::UnknownContact { contact: id.0 })
    }

    pub fn as_slice(&self) -> &[Contact] {
        &self.contacts[..self.len as usize]
    }

    /// All contacts with their ids, in id order.
    pub fn iter(&self) -> impl Iterator<Item = (ContactId, &Contact)> {
        self.as_slice()
            .iter()
            .enumerate()
            .map(|(i, c)| (ContactId(i as u8), c))
    }

    /// Contacts wired into `channel`, in id order.
    pub fn members(&self, channel: Channel) -> impl Iterator<Item = (ContactId, &Contact)> {
        self.iter().filter(move |(_, c)| c.channels.contains(channel))
    }

    /// True if at least one contact maps to `channel`.
    pub fn is_channel_mapped(&self, channel: Channel) -> bool {
        self.members(channel).next().is_some()
    }

    /// The first contact flagged as strip detect pin.
    pub fn strip_detect_contact(&self) -> Option<ContactId> {
        self.iter().find(|(_, c)| c.is_strip_detect).map(|(id, _)| id)
    }

    /// Role of `id` inside `channel`.
    ///
    /// # Errors
    /// `ConfigError` if the contact is unknown or not a member of `channel`.
    pub fn resolve_role(&self, id: ContactId, channel: Channel) -> Result<ContactRole, EchemError> {
        let contact = self.get(id)?;
        if !contact.channels.contains(channel) {
            return Err(ConfigError::NotInChannel { contact: id.0, channel }.into());
        }
        Ok(ContactRole {
            position: contact.position,
            is_fill_pin: contact.is_fill_detect,
            is_strip_pin: contact.is_strip_detect,
            channels: contact.channels,
        })
    }
}

impl Default for ContactMap {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_set_bits() {
        let set = ChannelSet::of(Channel::Chan1).with(Channel::Chan3);
        assert_eq!(set.bits(), 0b0101);
        assert!(set.contains(Channel::Chan3));
        assert!(!set.contains(Channel::Chan2));
        assert_eq!(set.len(), 2);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Channel::Chan1, Channel::Chan3]);
    }

    #[test]
    fn test_channel_set_from_flags() {
        let set = ChannelSet::from_flags([false, true, false, true]);
        assert_eq!(set.bits(), 0b1010);
        assert_eq!(ChannelSet::from_bits(0b1_0000), Err(ConfigError::InvalidChannelBits { bits: 0x10 }));
        assert_eq!(ChannelSet::from_bits(0b1111), Ok(ChannelSet::ALL));
    }

    #[test]
    fn test_detect_pin_position_rejected() {
        let mut pin = Contact::fill_detect(ChannelSet::ALL, 1.8, 0.3);
        pin.position = Some(ChannelPos::B);
        assert_eq!(
            pin.validate(ContactId(4)),
            Err(ConfigError::DetectPinHasPosition { contact: 4 })
        );
    }

    #[test]
    fn test_threshold_nan_rejected() {
        let contact = Contact::electrode(ChannelSet::ALL, ChannelPos::A, 1.8, 0.3)
            .with_thresholds(SampleType::Serum, f32::NAN, 0.3);
        assert_eq!(
            contact.validate(ContactId(0)),
            Err(ConfigError::ThresholdOrder { contact: 0, sample_type: SampleType::Serum })
        );
    }
}
