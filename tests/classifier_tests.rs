//! Sample classifier tests

use echem_strip_reader::classifier::{thresholds_for, thresholds_for_index, thresholds_for_mask};
use echem_strip_reader::config::strip15;
use echem_strip_reader::{
    ChannelSet, Contact, EchemError, SampleType, SampleTypeMask, Thresholds,
};

fn per_type_contact() -> Contact {
    let mut contact = Contact::fill_detect(ChannelSet::ALL, 1.0, 0.5);
    for t in SampleType::ALL {
        let base = t as u8 as f32;
        contact = contact.with_thresholds(t, 2.0 + base, 0.5 + base);
    }
    contact
}

#[test]
fn test_direct_lookup() {
    let contact = per_type_contact();

    assert_eq!(
        thresholds_for(&contact, SampleType::Serum),
        Thresholds { no_contact_v: 5.0, contact_v: 3.5 }
    );
    assert_eq!(
        thresholds_for(&contact, SampleType::FingerStick),
        Thresholds { no_contact_v: 2.0, contact_v: 0.5 }
    );
}

#[test]
fn test_index_lookup_bounds() {
    let contact = per_type_contact();

    assert_eq!(
        thresholds_for_index(&contact, 4),
        Ok(thresholds_for(&contact, SampleType::ControlSolution))
    );
    assert_eq!(
        thresholds_for_index(&contact, 5),
        Err(EchemError::InvalidSampleType(5))
    );
    assert_eq!(
        thresholds_for_index(&contact, 255),
        Err(EchemError::InvalidSampleType(255))
    );
}

#[test]
fn test_two_bit_mask_is_ambiguous() {
    let contact = per_type_contact();

    assert_eq!(
        thresholds_for_mask(&contact, SampleTypeMask::from_bits(0b00011)),
        Err(EchemError::AmbiguousSampleType(0b00011))
    );
    assert_eq!(
        thresholds_for_mask(&contact, SampleTypeMask::EMPTY),
        Err(EchemError::AmbiguousSampleType(0))
    );
}

#[test]
fn test_mask_bit_position_maps_to_type() {
    let contact = per_type_contact();

    let cases = [
        (SampleTypeMask::FINGER_STICK, SampleType::FingerStick),
        (SampleTypeMask::VENOUS_BLOOD, SampleType::VenousBlood),
        (SampleTypeMask::PLASMA, SampleType::Plasma),
        (SampleTypeMask::SERUM, SampleType::Serum),
        (SampleTypeMask::CONTROL, SampleType::ControlSolution),
    ];
    for (bits, sample_type) in cases {
        assert_eq!(
            thresholds_for_mask(&contact, SampleTypeMask::from_bits(bits)),
            Ok(thresholds_for(&contact, sample_type))
        );
    }
}

#[test]
fn test_factory_fill_thresholds_vary_by_sample() {
    let contacts = strip15::contacts();
    let fill = &contacts[strip15::FILL_DETECT_CONTACT as usize];

    let blood = thresholds_for(fill, SampleType::FingerStick);
    let control = thresholds_for(fill, SampleType::ControlSolution);
    assert_ne!(blood, control);

    // 0.7 V is indeterminate for blood but filled for control solution
    assert_eq!(blood.classify(0.7), None);
    assert!(control.classify(0.7).is_some());
}
