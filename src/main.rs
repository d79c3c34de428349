//! EchemStripReader - firmware entry point
//!
//! 1. Load the factory configuration and calibration
//! 2. Run the acquisition loop: read the detect pins, feed the monitor
//! 3. Drain the RT log streams between ticks
//!
//! On ESP-IDF the ADC read is an unwired hook: it yields no readings and the
//! loop logs a warning once. On the host the same loop runs against a
//! scripted strip (insert, then fill channel 1..4) and prints the log.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys as esp_idf_sys;

use echem_strip_reader::{
    config::strip15::{self, Strip15Layout},
    log_drain, logging::LogStream, ACQ_LOG_STREAM, HOST_LOG_STREAM, SAMPLE_TYPE,
    CalibrationStore, Channel, ContactId, DetectStatus, EchemError, Mode, ReaderConfig,
    StripMonitor,
};

static CALIBRATION: CalibrationStore = CalibrationStore::new();
static STATUS: DetectStatus = DetectStatus::new();

/// Detect pins polled every tick.
const DETECT_PINS: [ContactId; 2] = [
    ContactId(strip15::STRIP_DETECT_CONTACT),
    ContactId(strip15::FILL_DETECT_CONTACT),
];

fn main() {
    #[cfg(target_os = "espidf")]
    {
        esp_idf_sys::link_patches();
        esp_idf_svc::log::EspLogger::initialize_default();
    }

    println!("{}", env!("VERSION_STRING"));

    if let Err(e) = run() {
        println!("reader stopped: {}", e);
    }
}

fn run() -> Result<(), EchemError> {
    let config = ReaderConfig::load(&Strip15Layout::default())?;
    CALIBRATION.load(&config.calibration)?;
    SAMPLE_TYPE.select(config.default_sample_type);

    for channel in Channel::ALL {
        let active = echem_strip_reader::active_electrodes_for(&config.contacts, channel, Mode::Potentiostat)?;
        echem_strip_reader::rt_info!(
            HOST_LOG_STREAM,
            timestamp_us(),
            "{:?}: {} electrodes routed",
            channel,
            active.len()
        );
    }

    let mut monitor = StripMonitor::new(
        &config.contacts,
        &CALIBRATION,
        &STATUS,
        &ACQ_LOG_STREAM,
        config.default_sample_type,
    );

    let mut tick: u32 = 0;
    let mut adc_warned = false;
    while keep_running(tick) {
        let now_us = timestamp_us();
        monitor.sync_sample_type(now_us, &SAMPLE_TYPE);

        for pin in DETECT_PINS {
            poll_pin(&mut monitor, &ACQ_LOG_STREAM, now_us, pin, read_adc_counts(pin, tick), &mut adc_warned);
        }

        flush_logs();
        delay_until_next_tick();
        tick = tick.wrapping_add(1);
    }

    let snap = STATUS.snapshot();
    println!("final: strip {:?}, fill {:?}", snap.strip, snap.fill);
    Ok(())
}

/// Feed one pin reading to the monitor. A missing reading is skipped and
/// reported once.
fn poll_pin(
    monitor: &mut StripMonitor<'_>,
    log: &LogStream,
    now_us: i64,
    pin: ContactId,
    reading: Option<i32>,
    adc_warned: &mut bool,
) {
    let Some(counts) = reading else {
        if !*adc_warned {
            echem_strip_reader::rt_warn!(log, now_us, "{:?}: no ADC reading, detection idle", pin);
            *adc_warned = true;
        }
        return;
    };
    if let Err(e) = monitor.process(now_us, pin, counts) {
        echem_strip_reader::rt_error!(log, now_us, "{:?}: {}", pin, e);
    }
}

/// Writes drained log lines to stdout.
struct Stdout;

impl core::fmt::Write for Stdout {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        print!("{}", s);
        Ok(())
    }
}

fn flush_logs() {
    let mut out = Stdout;
    log_drain::drain_into(&HOST_LOG_STREAM, &mut out);
    log_drain::drain_into(&ACQ_LOG_STREAM, &mut out);
    let _ = log_drain::report_dropped(&ACQ_LOG_STREAM, &HOST_LOG_STREAM, &mut out);
}

// --- Platform hooks ---

#[cfg(target_os = "espidf")]
fn timestamp_us() -> i64 {
    unsafe { esp_idf_sys::esp_timer_get_time() }
}

#[cfg(target_os = "espidf")]
fn keep_running(_tick: u32) -> bool {
    true
}

#[cfg(target_os = "espidf")]
fn read_adc_counts(pin: ContactId, _tick: u32) -> Option<i32> {
    unimplemented_adc_hook(pin)
}

/// Sigma-delta front-end read. No driver is wired in, so every pin reports
/// no reading and the monitor is never fed a fabricated voltage.
#[cfg(target_os = "espidf")]
fn unimplemented_adc_hook(_pin: ContactId) -> Option<i32> {
    None
}

#[cfg(target_os = "espidf")]
fn delay_until_next_tick() {
    unsafe {
        esp_idf_sys::vTaskDelay(1);
    }
}

#[cfg(not(target_os = "espidf"))]
fn timestamp_us() -> i64 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static START: OnceLock<Instant> = OnceLock::new();
    START.get_or_init(Instant::now).elapsed().as_micros() as i64
}

#[cfg(not(target_os = "espidf"))]
const SCRIPT_TICKS: u32 = 40;

#[cfg(not(target_os = "espidf"))]
fn keep_running(tick: u32) -> bool {
    tick < SCRIPT_TICKS
}

/// Scripted strip: empty port, strip inserted at tick 10, sample at tick 25.
#[cfg(not(target_os = "espidf"))]
fn read_adc_counts(pin: ContactId, tick: u32) -> Option<i32> {
    // 1.82 V reference over 16 bits
    const OPEN: i32 = 65_000; // ~1.81 V
    const TOUCH: i32 = 3_600; // ~0.10 V

    let touching = match pin.0 {
        strip15::STRIP_DETECT_CONTACT => tick >= 10,
        strip15::FILL_DETECT_CONTACT => tick >= 25,
        _ => false,
    };
    Some(if touching { TOUCH } else { OPEN })
}

#[cfg(not(target_os = "espidf"))]
fn delay_until_next_tick() {
    std::thread::sleep(std::time::Duration::from_millis(1));
}
