//! JPEG marker utilities.
//!
//! Small helpers for inspecting JPEG byte streams without decoding
//! them. The delivery pipeline truncates progressive JPEGs by byte
//! count, so nothing here parses scan contents; the probes only walk
//! the marker segments that precede the first scan.
//!
//! # Encoding detection
//!
//! A JPEG's scan structure is announced by its Start Of Frame marker:
//! `SOF0`/`SOF1` for sequential (baseline) scans, `SOF2` for
//! progressive scans. [`is_progressive_jpeg`] walks the segment chain
//! from SOI to the first SOF and reports which family it found.

// =============================================================================
// JPEG Markers
// =============================================================================

/// Start Of Image marker
pub const SOI: [u8; 2] = [0xFF, 0xD8];

/// End Of Image marker
pub const EOI: [u8; 2] = [0xFF, 0xD9];

/// Start Of Frame (baseline DCT) marker
pub const SOF0: [u8; 2] = [0xFF, 0xC0];

/// Start Of Frame (extended sequential DCT) marker
pub const SOF1: [u8; 2] = [0xFF, 0xC1];

/// Start Of Frame (progressive DCT) marker
pub const SOF2: [u8; 2] = [0xFF, 0xC2];

/// Start Of Scan marker
pub const SOS: [u8; 2] = [0xFF, 0xDA];

// =============================================================================
// JPEG Stream Analysis
// =============================================================================

/// Check whether data begins with a JPEG Start Of Image marker.
#[inline]
pub fn is_jpeg(data: &[u8]) -> bool {
    data.len() >= 2 && data[0..2] == SOI
}

/// Check whether JPEG data uses progressive scan encoding.
///
/// Walks the marker segments after SOI until a Start Of Frame marker is
/// found. Returns `true` for a progressive frame (`SOF2`), `false` for
/// sequential frames, non-JPEG data, or a stream whose frame marker
/// never appears before the first scan.
pub fn is_progressive_jpeg(data: &[u8]) -> bool {
    if !is_jpeg(data) {
        return false;
    }

    let mut pos = 2;
    while pos + 1 < data.len() {
        if data[pos] != 0xFF {
            pos += 1;
            continue;
        }

        let marker = [data[pos], data[pos + 1]];

        if marker == SOF2 {
            return true;
        }
        if marker == SOF0 || marker == SOF1 {
            return false;
        }
        // Reached the first scan without seeing a frame marker
        if marker == SOS {
            return false;
        }

        // Skip marker segment (marker + 2-byte length + payload);
        // fill bytes and standalone markers carry no length field
        if pos + 3 < data.len() && marker[1] != 0x00 && marker[1] != 0xD8 && marker[1] != 0xD9 {
            let length = u16::from_be_bytes([data[pos + 2], data[pos + 3]]) as usize;
            pos += 2 + length;
        } else {
            pos += 2;
        }
    }

    false
}

// =============================================================================
// Tests
// =============================================================================
