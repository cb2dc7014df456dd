//! JPEG format handling.
//!
//! Everything that looks inside a JPEG byte stream lives here:
//!
//! - [`jpeg`]: marker constants and a progressive/baseline probe
//! - [`metadata`]: pixel dimensions and byte size of an image
//! - [`progressive`]: baseline → progressive re-encoding and the
//!   convert-then-delete file commit
//!
//! The rest of the crate treats images as opaque byte sequences.

pub mod jpeg;

mod metadata;
mod progressive;

pub use jpeg::{is_jpeg, is_progressive_jpeg};
pub use metadata::{extract, ImageMetadata};
pub use progressive::{ProgressiveConverter, DEFAULT_ENCODE_QUALITY};
