//! Address Trace Reader.
//!
//! This module reads recorded address traces. It accepts:
//! 1. **Addresses:** One per line, hexadecimal with a `0x` prefix or decimal.
//! 2. **Operation tags:** An optional leading token such as `R`, `W` or `I`,
//!    which is ignored; the cache models replacement only.
//! 3. **Comments:** Blank lines and anything after `#` are skipped.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::common::error::TraceError;

/// Reads every address of a trace.
///
/// # Errors
///
/// Returns `TraceError::Io` if the reader fails and `TraceError::Malformed`
/// (with the 1-based line number) for the first line that is not an address.
///
/// # Examples
///
/// ```
/// use duelsim_core::sim::trace::read_trace;
///
/// let trace = "# warmup\nR 0x40\nW 128\n\n0x1000 # store\n";
/// assert_eq!(read_trace(trace.as_bytes()).unwrap(), vec![0x40, 128, 0x1000]);
/// ```
pub fn read_trace<R: BufRead>(reader: R) -> Result<Vec<u64>, TraceError> {
    let mut addrs = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let body = line.split('#').next().unwrap_or_default().trim();
        if body.is_empty() {
            continue;
        }
        let addr = parse_line(body).ok_or_else(|| TraceError::Malformed {
            line: index + 1,
            text: line.trim().to_owned(),
        })?;
        addrs.push(addr);
    }
    tracing::debug!(addresses = addrs.len(), "trace loaded");
    Ok(addrs)
}

/// Reads a trace file from disk.
///
/// # Errors
///
/// See [`read_trace`]; opening the file can also fail with `TraceError::Io`.
pub fn read_trace_file(path: impl AsRef<Path>) -> Result<Vec<u64>, TraceError> {
    let file = File::open(path.as_ref())?;
    read_trace(BufReader::new(file))
}

fn parse_line(body: &str) -> Option<u64> {
    let mut tokens = body.split_whitespace();
    let first = tokens.next()?;
    let token = match tokens.next() {
        Some(addr) if first.chars().all(|c| c.is_ascii_alphabetic()) => addr,
        Some(_) => return None,
        None => first,
    };
    if tokens.next().is_some() {
        return None;
    }
    parse_addr(token)
}

fn parse_addr(token: &str) -> Option<u64> {
    match token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(&hex.replace('_', ""), 16).ok(),
        None => token.replace('_', "").parse().ok(),
    }
}
