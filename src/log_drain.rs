//! Log drain: moves entries from the RT log streams to a text sink.
//!
//! The sink is any `core::fmt::Write` (serial port wrapper on target,
//! stdout on host). Draining may block; it never runs on the acquisition
//! path.
//!
//! Output format:
//!
//! ```text
//! [    123456] INFO: strip Inserted
//! ```

use core::fmt::Write;

use crate::logging::{LogEntry, LogStream};

/// Write one entry as a line.
pub fn write_entry<W: Write>(out: &mut W, entry: &LogEntry) -> core::fmt::Result {
    writeln!(
        out,
        "[{:10}] {}: {}",
        entry.timestamp_us,
        entry.level.as_str(),
        entry.text()
    )
}

/// Drain every pending entry of `stream` into `out`.
///
/// Returns the number of entries written. Stops at the first sink error.
pub fn drain_into<W: Write, const N: usize>(stream: &LogStream<N>, out: &mut W) -> usize {
    let mut written = 0;
    while let Some(entry) = stream.drain() {
        if write_entry(out, &entry).is_err() {
            break;
        }
        written += 1;
    }
    written
}

/// Report and clear dropped-entry counters of the two streams.
///
/// Writes nothing when neither stream dropped anything.
pub fn report_dropped<W: Write, const N: usize>(
    acq: &LogStream<N>,
    host: &LogStream<N>,
    out: &mut W,
) -> core::fmt::Result {
    let acq_dropped = acq.dropped();
    let host_dropped = host.dropped();
    if acq_dropped == 0 && host_dropped == 0 {
        return Ok(());
    }
    acq.reset_dropped();
    host.reset_dropped();
    writeln!(out, "[WARN] Dropped: ACQ={}, HOST={}", acq_dropped, host_dropped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{LogLevel, MAX_MSG_LEN};

    #[test]
    fn test_format_entry() {
        let mut msg = [0u8; MAX_MSG_LEN];
        msg[..11].copy_from_slice(b"Hello world");
        let entry = LogEntry { timestamp_us: 1234567, level: LogLevel::Info, len: 11, msg };

        let mut out = String::new();
        write_entry(&mut out, &entry).unwrap();
        assert_eq!(out, "[   1234567] INFO: Hello world\n");
    }

    #[test]
    fn test_format_respects_len() {
        let mut msg = [0u8; MAX_MSG_LEN];
        msg[..10].copy_from_slice(b"TEST12345X");
        let entry = LogEntry { timestamp_us: 999, level: LogLevel::Error, len: 5, msg };

        let mut out = String::new();
        write_entry(&mut out, &entry).unwrap();
        assert!(out.contains("ERROR: TEST1"));
        assert!(!out.contains('X'));
    }

    #[test]
    fn test_drain_and_report() {
        let acq = LogStream::<2>::new();
        let host = LogStream::<2>::new();
        acq.push(1, LogLevel::Info, b"a");
        acq.push(2, LogLevel::Info, b"b");
        acq.push(3, LogLevel::Info, b"c");

        let mut out = String::new();
        assert_eq!(drain_into(&acq, &mut out), 2);
        assert_eq!(out.lines().count(), 2);

        out.clear();
        report_dropped(&acq, &host, &mut out).unwrap();
        assert_eq!(out, "[WARN] Dropped: ACQ=1, HOST=0\n");
        assert_eq!(acq.dropped(), 0);

        out.clear();
        report_dropped(&acq, &host, &mut out).unwrap();
        assert!(out.is_empty());
    }
}
