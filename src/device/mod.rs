//! Device classification layer.
//!
//! Incoming requests carry the display width of the requesting device.
//! This module buckets that width into a coarse device class and maps
//! each class to the fraction of image bytes it should receive.
//!
//! # Components
//!
//! - [`DeviceClass`]: the closed set of display-size buckets
//! - [`DeviceThresholds`]: configured width cut-offs between buckets
//! - [`ScalePolicy`]: byte-retention fraction per bucket
//!
//! Classification is a pure function of the width and the thresholds;
//! nothing here touches the catalog or the file system.

mod classify;
mod scale;

pub use classify::{
    DeviceClass, DeviceThresholds, DEFAULT_MOBILE_MAX_WIDTH, DEFAULT_TABLET_MAX_WIDTH,
};
pub use scale::{
    is_valid_scale, ScalePolicy, DEFAULT_DESKTOP_SCALE, DEFAULT_MOBILE_SCALE, DEFAULT_TABLET_SCALE,
};
