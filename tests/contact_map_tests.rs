//! Contact map tests

use echem_strip_reader::config::strip15;
use echem_strip_reader::{
    Channel, ChannelPos, ChannelSet, ConfigError, Contact, ContactId, ContactMap, EchemError,
    SampleType,
};

fn chan(c: Channel) -> ChannelSet {
    ChannelSet::of(c)
}

#[test]
fn test_position_none_iff_detect_pin() {
    let map = ContactMap::from_contacts(&strip15::contacts()).unwrap();

    for (_, contact) in map.iter() {
        assert_eq!(
            contact.position.is_none(),
            contact.is_fill_detect || contact.is_strip_detect
        );
    }
}

#[test]
fn test_thresholds_ordered_for_every_sample_type() {
    let map = ContactMap::from_contacts(&strip15::contacts()).unwrap();

    for (_, contact) in map.iter() {
        for t in SampleType::ALL {
            assert!(
                contact.threshold_volts_contact[t.index()]
                    < contact.threshold_volts_no_contact[t.index()]
            );
        }
    }
}

#[test]
fn test_detect_pin_with_position_rejected() {
    let mut strip = Contact::strip_detect(chan(Channel::Chan1), 1.8, 0.3);
    strip.position = Some(ChannelPos::A);

    let result = ContactMap::from_contacts(&[strip]);
    assert_eq!(
        result.unwrap_err(),
        ConfigError::DetectPinHasPosition { contact: 0 }
    );
}

#[test]
fn test_electrode_without_position_rejected() {
    let mut electrode = Contact::electrode(chan(Channel::Chan1), ChannelPos::A, 1.8, 0.3);
    electrode.position = None;

    let result = ContactMap::from_contacts(&[
        Contact::strip_detect(chan(Channel::Chan1), 1.8, 0.3),
        electrode,
    ]);
    assert_eq!(result.unwrap_err(), ConfigError::MissingPosition { contact: 1 });
}

#[test]
fn test_inverted_thresholds_rejected() {
    let electrode = Contact::electrode(chan(Channel::Chan2), ChannelPos::B, 1.8, 0.3)
        .with_thresholds(SampleType::Plasma, 0.5, 0.5);

    let result = ContactMap::from_contacts(&[electrode]);
    assert_eq!(
        result.unwrap_err(),
        ConfigError::ThresholdOrder { contact: 0, sample_type: SampleType::Plasma }
    );
}

#[test]
fn test_duplicate_position_in_channel_rejected() {
    let shared = ChannelSet::of(Channel::Chan1).with(Channel::Chan2);
    let result = ContactMap::from_contacts(&[
        Contact::electrode(shared, ChannelPos::A, 1.8, 0.3),
        Contact::electrode(chan(Channel::Chan2), ChannelPos::A, 1.8, 0.3),
    ]);
    assert_eq!(
        result.unwrap_err(),
        ConfigError::DuplicatePosition { channel: Channel::Chan2, position: ChannelPos::A }
    );
}

#[test]
fn test_same_position_in_different_channels_allowed() {
    let map = ContactMap::from_contacts(&[
        Contact::electrode(chan(Channel::Chan1), ChannelPos::A, 1.8, 0.3),
        Contact::electrode(chan(Channel::Chan2), ChannelPos::A, 1.8, 0.3),
    ]);
    assert!(map.is_ok());
}

#[test]
fn test_too_many_contacts_rejected() {
    let contacts: Vec<Contact> = (0..16)
        .map(|_| Contact::fill_detect(ChannelSet::EMPTY, 1.8, 0.3))
        .collect();
    assert_eq!(
        ContactMap::from_contacts(&contacts).unwrap_err(),
        ConfigError::TooManyContacts { count: 16 }
    );
}

#[test]
fn test_resolve_role() {
    let map = ContactMap::from_contacts(&strip15::contacts()).unwrap();

    let fill = map
        .resolve_role(ContactId(strip15::FILL_DETECT_CONTACT), Channel::Chan3)
        .unwrap();
    assert!(fill.is_fill_pin);
    assert!(!fill.is_strip_pin);
    assert_eq!(fill.position, None);
    assert_eq!(fill.channels, ChannelSet::ALL);

    let shared = map
        .resolve_role(ContactId(strip15::SHARED_CONTACT), Channel::Chan4)
        .unwrap();
    assert_eq!(shared.position, Some(ChannelPos::D));
}

#[test]
fn test_resolve_role_not_member() {
    let map = ContactMap::from_contacts(&strip15::contacts()).unwrap();

    // Contact 2 is channel 1 position A only
    assert_eq!(
        map.resolve_role(ContactId(2), Channel::Chan2),
        Err(EchemError::Config(ConfigError::NotInChannel {
            contact: 2,
            channel: Channel::Chan2
        }))
    );
    assert_eq!(
        map.resolve_role(ContactId(15), Channel::Chan1),
        Err(EchemError::Config(ConfigError::UnknownContact { contact: 15 }))
    );
}

#[test]
fn test_factory_layout_shape() {
    let map = ContactMap::from_contacts(&strip15::contacts()).unwrap();

    assert_eq!(map.len(), 15);
    assert_eq!(
        map.strip_detect_contact(),
        Some(ContactId(strip15::STRIP_DETECT_CONTACT))
    );
    for channel in Channel::ALL {
        // strip + fill + A/B/C + shared D
        assert_eq!(map.members(channel).count(), 6);
    }
}
