//! Display-width classification.
//!
//! Maps a reported display width (in pixels) to a [`DeviceClass`] using
//! two configured cut-offs: widths up to the mobile threshold are
//! `Mobile`, widths up to the tablet threshold are `Tablet`, everything
//! wider is `Desktop`.

use serde::Serialize;

use crate::error::{ConfigError, DeliveryError};

/// Default mobile cut-off in pixels.
pub const DEFAULT_MOBILE_MAX_WIDTH: u32 = 640;

/// Default tablet cut-off in pixels.
pub const DEFAULT_TABLET_MAX_WIDTH: u32 = 1280;

// =============================================================================
// Device Class
// =============================================================================

/// Coarse display-size bucket of a requesting device.
///
/// The set is closed and ordered by display width, so `Mobile < Tablet
/// < Desktop` holds and exhaustive `match`es cover every class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum DeviceClass {
    Mobile,
    Tablet,
    Desktop,
}

impl DeviceClass {
    /// Stable lowercase label, used in cache keys and log lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceClass::Mobile => "mobile",
            DeviceClass::Tablet => "tablet",
            DeviceClass::Desktop => "desktop",
        }
    }
}

impl std::fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Thresholds
// =============================================================================

/// Configured width cut-offs between device classes.
///
/// Invariant: `0 < mobile_max_width < tablet_max_width`. Construct via
/// [`DeviceThresholds::new`], which rejects anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceThresholds {
    mobile_max_width: u32,
    tablet_max_width: u32,
}

impl DeviceThresholds {
    /// Create thresholds, validating the ordering invariant.
    pub fn new(mobile_max_width: u32, tablet_max_width: u32) -> Result<Self, ConfigError> {
        if mobile_max_width == 0 || mobile_max_width >= tablet_max_width {
            return Err(ConfigError::InvalidThresholds {
                mobile: mobile_max_width,
                tablet: tablet_max_width,
            });
        }
        Ok(Self {
            mobile_max_width,
            tablet_max_width,
        })
    }

    /// The widest display still classified as mobile.
    pub fn mobile_max_width(&self) -> u32 {
        self.mobile_max_width
    }

    /// The widest display still classified as tablet.
    pub fn tablet_max_width(&self) -> u32 {
        self.tablet_max_width
    }

    /// Classify a display width.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::InvalidWidth`] when `width` is zero; a
    /// device cannot report a non-positive display width.
    pub fn classify(&self, width: u32) -> Result<DeviceClass, DeliveryError> {
        if width == 0 {
            return Err(DeliveryError::InvalidWidth { width });
        }

        let class = if width <= self.mobile_max_width {
            DeviceClass::Mobile
        } else if width <= self.tablet_max_width {
            DeviceClass::Tablet
        } else {
            DeviceClass::Desktop
        };

        Ok(class)
    }
}

impl Default for DeviceThresholds {
    fn default() -> Self {
        Self {
            mobile_max_width: DEFAULT_MOBILE_MAX_WIDTH,
            tablet_max_width: DEFAULT_TABLET_MAX_WIDTH,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
