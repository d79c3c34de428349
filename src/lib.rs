//! # EchemStripReader
//!
//! Contact, fill and channel classification core for an electrochemical
//! test-strip reader.
//!
//! ## Architecture
//!
//! ```text
//! ADC driver ──▶ StripMonitor ──▶ DetectStatus ──▶ UI / reporting
//!                 │  counts → volts (CalibrationStore)
//!                 │  thresholds per sample type (classifier)
//!                 └─ debounced strip / fill state (debounce)
//!
//! test sequencer ──▶ resolver::active_electrodes_for ──▶ measurement layer
//! ```
//!
//! - Contact map and calibration are validated once and read-only after
//! - The acquisition loop is the single writer of detection state
//! - No allocation, no blocking, no locks

#![cfg_attr(not(test), no_std)]

pub mod types;
pub mod error;
pub mod sample;
pub mod contact;
pub mod calibration;
pub mod classifier;
pub mod debounce;
pub mod resolver;
pub mod status;
pub mod monitor;
pub mod config;
pub mod logging;
pub mod log_drain;
mod log_globals;

pub use log_globals::{ACQ_LOG_STREAM, HOST_LOG_STREAM};

pub use types::{
    Channel, ChannelPos, FillDetectState, Mode, StripDetectState, TestType,
    NUM_SAMPLES_TO_REGISTER_CHANGE,
};
pub use error::{ConfigError, EchemError};
pub use sample::{SampleType, SampleTypeMask};
pub use contact::{ChannelSet, Contact, ContactId, ContactMap, ContactRole};
pub use calibration::{Calibration, CalibrationStore};
pub use classifier::{Reading, Thresholds};
pub use resolver::{active_electrodes_for, ActiveElectrode, ActiveElectrodes};
pub use status::{DetectSnapshot, DetectStatus};
pub use monitor::{DetectChanges, StripMonitor};
pub use config::{ConfigSource, ReaderConfig, SampleTypeSelection, SAMPLE_TYPE};
