//! Detection debouncer tests

use echem_strip_reader::debounce::{Debouncer, FillDetector, StripDetector};
use echem_strip_reader::{
    FillDetectState, Reading, StripDetectState, Thresholds, NUM_SAMPLES_TO_REGISTER_CHANGE,
};

const STRIP: Thresholds = Thresholds { no_contact_v: 1.8, contact_v: 0.3 };

fn settle_not_inserted() -> StripDetector {
    let mut strip = StripDetector::new();
    for _ in 0..NUM_SAMPLES_TO_REGISTER_CHANGE {
        strip.update(2.0, &STRIP);
    }
    assert_eq!(strip.state(), StripDetectState::NotInserted);
    strip
}

#[test]
fn test_window_is_five() {
    assert_eq!(NUM_SAMPLES_TO_REGISTER_CHANGE, 5);
}

#[test]
fn test_initial_state_invalid() {
    assert_eq!(StripDetector::new().state(), StripDetectState::Invalid);
    assert_eq!(FillDetector::new().state(), FillDetectState::Invalid);
    assert_eq!(Debouncer::new().stable(), None);
}

#[test]
fn test_four_contact_samples_do_not_flip() {
    let mut strip = settle_not_inserted();

    for _ in 0..4 {
        assert_eq!(strip.update(0.2, &STRIP), None);
    }
    assert_eq!(strip.state(), StripDetectState::NotInserted);
}

#[test]
fn test_fifth_contact_sample_flips() {
    let mut strip = settle_not_inserted();

    for _ in 0..4 {
        strip.update(0.2, &STRIP);
    }
    assert_eq!(strip.update(0.2, &STRIP), Some(StripDetectState::Inserted));
    assert_eq!(strip.state(), StripDetectState::Inserted);
}

#[test]
fn test_alternating_never_commits() {
    let mut strip = settle_not_inserted();

    for i in 0..100 {
        let volts = if i % 2 == 0 { 0.2 } else { 2.0 };
        assert_eq!(strip.update(volts, &STRIP), None);
    }
    assert_eq!(strip.state(), StripDetectState::NotInserted);

    let mut fresh = StripDetector::new();
    for i in 0..100 {
        let volts = if i % 2 == 0 { 0.2 } else { 2.0 };
        fresh.update(volts, &STRIP);
    }
    assert_eq!(fresh.state(), StripDetectState::Invalid);
}

#[test]
fn test_indeterminate_only_holds_state() {
    let mut strip = settle_not_inserted();

    for _ in 0..50 {
        assert_eq!(strip.update(1.0, &STRIP), None);
    }
    assert_eq!(strip.state(), StripDetectState::NotInserted);

    let mut fresh = StripDetector::new();
    for _ in 0..50 {
        fresh.update(1.0, &STRIP);
    }
    assert_eq!(fresh.state(), StripDetectState::Invalid);
}

#[test]
fn test_indeterminate_interleaved_in_run() {
    let mut strip = settle_not_inserted();

    // Contact, noise, contact... five contact readings in total
    let stream = [0.2, 1.0, 0.2, 0.2, 1.5, 0.2];
    for volts in stream {
        assert_eq!(strip.update(volts, &STRIP), None);
    }
    assert_eq!(strip.update(0.2, &STRIP), Some(StripDetectState::Inserted));
}

#[test]
fn test_interrupted_run_restarts_at_one() {
    let mut strip = settle_not_inserted();

    for _ in 0..4 {
        strip.update(0.2, &STRIP);
    }
    // One no-contact sample breaks the run
    strip.update(2.0, &STRIP);
    for _ in 0..4 {
        assert_eq!(strip.update(0.2, &STRIP), None);
    }
    assert_eq!(strip.update(0.2, &STRIP), Some(StripDetectState::Inserted));
}

#[test]
fn test_raw_debouncer_counts_candidates() {
    let mut d = Debouncer::new();

    d.feed(Some(Reading::Contact));
    d.feed(Some(Reading::NoContact));
    for _ in 0..3 {
        assert_eq!(d.feed(Some(Reading::NoContact)), None);
    }
    assert_eq!(d.feed(Some(Reading::NoContact)), Some(Reading::NoContact));
}

#[test]
fn test_fill_detector_states() {
    let thresholds = Thresholds { no_contact_v: 1.6, contact_v: 0.6 };
    let mut fill = FillDetector::new();

    for _ in 0..5 {
        fill.update(1.7, &thresholds);
    }
    assert_eq!(fill.state(), FillDetectState::NotFilled);

    for _ in 0..5 {
        fill.update(0.1, &thresholds);
    }
    assert_eq!(fill.state(), FillDetectState::Filled);

    assert_eq!(
        fill.strip_changed(StripDetectState::NotInserted),
        Some(FillDetectState::NoStrip)
    );

    fill.reset();
    assert_eq!(fill.state(), FillDetectState::Invalid);
}
