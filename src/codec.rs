//! Field codecs for the intelino wire protocol.
//!
//! All multi-byte integers are big-endian. Readers are bounds-checked and
//! never read past the end of the frame.

use std::fmt::Write as _;

use crate::error::{Result, WireError};

// ---------------------------------------------------------------------------
// Read helpers
// ---------------------------------------------------------------------------

/// Read a single byte.
pub fn read_uint8(data: &[u8], offset: usize) -> Result<u8> {
    check_len(data, offset, 1, "UINT8")?;
    Ok(data[offset])
}

/// Read a single byte as a flag (any nonzero value is true).
pub fn read_bool(data: &[u8], offset: usize) -> Result<bool> {
    check_len(data, offset, 1, "BOOL")?;
    Ok(data[offset] != 0)
}

/// Read a big-endian unsigned 16-bit integer.
pub fn read_uint16(data: &[u8], offset: usize) -> Result<u16> {
    check_len(data, offset, 2, "UINT16")?;
    Ok(u16::from_be_bytes([data[offset], data[offset + 1]]))
}

/// Read a big-endian unsigned 32-bit integer.
pub fn read_uint32(data: &[u8], offset: usize) -> Result<u32> {
    check_len(data, offset, 4, "UINT32")?;
    Ok(u32::from_be_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ]))
}

/// Render `data[offset..]` as lowercase two-digit hex joined by `separator`.
///
/// An offset at or past the end yields an empty string.
pub fn hex_string(data: &[u8], offset: usize, separator: &str) -> String {
    let tail = data.get(offset..).unwrap_or_default();
    let mut out = String::with_capacity(tail.len() * (2 + separator.len()));
    for (i, b) in tail.iter().enumerate() {
        if i > 0 {
            out.push_str(separator);
        }
        // Writing to a String cannot fail.
        let _ = write!(out, "{b:02x}");
    }
    out
}

// ---------------------------------------------------------------------------
// Write helpers
// ---------------------------------------------------------------------------

/// Write a big-endian unsigned 16-bit integer.
pub fn write_uint16(buf: &mut Vec<u8>, val: u16) {
    buf.extend_from_slice(&val.to_be_bytes());
}

/// Build an outgoing command: `[opcode, argCount, args...]`.
///
/// Returns `None` if `args` does not fit the one-byte count field.
pub fn encode_command(opcode: u8, args: &[u8]) -> Option<Vec<u8>> {
    let count = u8::try_from(args.len()).ok()?;
    let mut buf = Vec::with_capacity(2 + args.len());
    buf.push(opcode);
    buf.push(count);
    buf.extend_from_slice(args);
    Some(buf)
}

// ---------------------------------------------------------------------------
// Internal
// ---------------------------------------------------------------------------

fn check_len(data: &[u8], offset: usize, need: usize, name: &'static str) -> Result<()> {
    if data.len() < offset + need {
        Err(WireError::payload_too_short(name, offset + need, data.len()))
    } else {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
