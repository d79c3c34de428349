//! Channel resolver.
//!
//! For a channel and an operating mode, lists the electrodes the
//! measurement layer should drive, each with its role in the channel.
//!
//! | Mode | Active electrodes |
//! |------|-------------------|
//! | `Manual` | none (switches isolated) |
//! | `FluidDetect` | detect pins in the channel, contact order |
//! | `Potentiostat`, `SelfTest`, `Hct` | positioned electrodes, ascending A..L |

use crate::contact::{ContactId, ContactMap, MAX_CONTACTS};
use crate::error::EchemError;
use crate::types::{Channel, ChannelPos, Mode};

/// One electrode routed into a channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActiveElectrode {
    pub contact: ContactId,
    /// `None` for detect pins.
    pub position: Option<ChannelPos>,
}

/// Ordered, fixed-capacity list of active electrodes.
#[derive(Clone, Copy, Debug)]
pub struct ActiveElectrodes {
    items: [ActiveElectrode; MAX_CONTACTS],
    len: u8,
}

impl ActiveElectrodes {
    const fn new() -> Self {
        Self {
            items: [ActiveElectrode { contact: ContactId(0), position: None }; MAX_CONTACTS],
            len: 0,
        }
    }

    // Capacity equals MAX_CONTACTS, so a map can never overflow it.
    fn push(&mut self, item: ActiveElectrode) {
        if let Some(slot) = self.items.get_mut(self.len as usize) {
            *slot = item;
            self.len += 1;
        }
    }

    pub fn as_slice(&self) -> &[ActiveElectrode] {
        &self.items[..self.len as usize]
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> core::slice::Iter<'_, ActiveElectrode> {
        self.as_slice().iter()
    }

    /// Contact at `position`, if routed.
    pub fn at(&self, position: ChannelPos) -> Option<ContactId> {
        self.iter()
            .find(|e| e.position == Some(position))
            .map(|e| e.contact)
    }
}

impl PartialEq for ActiveElectrodes {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<'a> IntoIterator for &'a ActiveElectrodes {
    type Item = &'a ActiveElectrode;
    type IntoIter = core::slice::Iter<'a, ActiveElectrode>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Electrodes electrically active in `channel` under `mode`.
///
/// # Errors
/// `UnmappedChannel` if no contact maps to `channel` (not checked in
/// `Manual`, which is always empty).
pub fn active_electrodes_for(
    map: &ContactMap,
    channel: Channel,
    mode: Mode,
) -> Result<ActiveElectrodes, EchemError> {
    let mut active = ActiveElectrodes::new();

    if mode == Mode::Manual {
        return Ok(active);
    }
    if !map.is_channel_mapped(channel) {
        return Err(EchemError::UnmappedChannel(channel));
    }

    match mode {
        Mode::Manual => {}
        Mode::FluidDetect => {
            for (contact, _) in map.members(channel).filter(|(_, c)| c.is_detect_pin()) {
                active.push(ActiveElectrode { contact, position: None });
            }
        }
        Mode::Potentiostat | Mode::SelfTest | Mode::Hct => {
            let electrodes = map
                .members(channel)
                .filter(|(_, c)| !c.is_detect_pin())
                .filter_map(|(contact, c)| {
                    c.position.map(|p| ActiveElectrode { contact, position: Some(p) })
                });
            for electrode in electrodes {
                active.push(electrode);
            }
            let len = active.len();
            active.items[..len].sort_unstable_by_key(|e| e.position);
        }
    }

    Ok(active)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::{ChannelSet, Contact};

    #[test]
    fn test_at_lookup() {
        let chan = ChannelSet::of(Channel::Chan2);
        let map = ContactMap::from_contacts(&[
            Contact::electrode(chan, ChannelPos::C, 1.8, 0.3),
            Contact::electrode(chan, ChannelPos::A, 1.8, 0.3),
        ])
        .unwrap();

        let active = active_electrodes_for(&map, Channel::Chan2, Mode::SelfTest).unwrap();
        assert_eq!(active.at(ChannelPos::A), Some(ContactId(1)));
        assert_eq!(active.at(ChannelPos::C), Some(ContactId(0)));
        assert_eq!(active.at(ChannelPos::B), None);
    }
}
