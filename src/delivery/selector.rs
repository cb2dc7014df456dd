//! Byte-prefix truncation.
//!
//! A progressive JPEG interleaves scans of increasing fidelity, so the
//! first `n` bytes of the file still render a coarse approximation of
//! the whole image. The selector exploits that: it keeps a configured
//! fraction of the byte sequence and drops the rest.
//!
//! The cut is a blunt prefix at `floor(len * factor)` bytes, exactly
//! the behavior this pipeline inherited; it does not search for a scan
//! boundary.

use bytes::Bytes;
use tracing::warn;

use crate::device::is_valid_scale;

/// Keep the leading `floor(len * factor)` bytes of an image.
///
/// The input is never mutated; the returned value is a zero-copy slice
/// of it. Factors outside `(0, 1]` (which a validated [`ScalePolicy`]
/// never produces) degrade to `1.0` for this call: the image is served
/// unmodified rather than failing the request.
///
/// [`ScalePolicy`]: crate::device::ScalePolicy
pub fn truncate_for_scale(bytes: &Bytes, factor: f64) -> Bytes {
    let factor = if is_valid_scale(factor) {
        factor
    } else {
        warn!(factor, "scale factor out of range, serving unmodified");
        1.0
    };

    let new_len = ((bytes.len() as f64) * factor).floor() as usize;
    bytes.slice(0..new_len)
}

// =============================================================================
// Tests
// =============================================================================
