//! Global log stream instances.
//!
//! One stream per side of the reader so acquisition logs are never crowded
//! out by host traffic.

use crate::logging::LogStream;

/// Acquisition-loop log stream.
///
/// Written by the sampling loop (strip / fill commits, rejected samples).
pub static ACQ_LOG_STREAM: LogStream = LogStream::new();

/// Host-side log stream.
///
/// Written by configuration and protocol handling (sample type changes).
pub static HOST_LOG_STREAM: LogStream = LogStream::new();
