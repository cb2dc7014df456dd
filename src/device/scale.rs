//! Per-class byte-retention scale factors.
//!
//! Each device class is assigned a factor in `(0, 1]` denoting the
//! fraction of the original progressive JPEG byte sequence a response
//! retains. Desktop conventionally stays at `1.0` (full image).

use tracing::warn;

use crate::error::ConfigError;

use super::classify::DeviceClass;

/// Default retention factor for mobile devices.
pub const DEFAULT_MOBILE_SCALE: f64 = 0.5;

/// Default retention factor for tablet devices.
pub const DEFAULT_TABLET_SCALE: f64 = 0.75;

/// Default retention factor for desktop devices.
pub const DEFAULT_DESKTOP_SCALE: f64 = 1.0;

/// Validate a retention factor.
///
/// Returns `true` when the factor lies in `(0, 1]`.
#[inline]
pub fn is_valid_scale(factor: f64) -> bool {
    factor > 0.0 && factor <= 1.0
}

// =============================================================================
// Scale Policy
// =============================================================================

/// Byte-retention factors, one per device class.
///
/// Invariant: every factor lies in `(0, 1]`. Construct via
/// [`ScalePolicy::new`] (rejecting), or [`ScalePolicy::sanitized`]
/// (replacing invalid entries with `1.0` so a bad configuration value
/// degrades to serving the full image rather than failing requests).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalePolicy {
    mobile: f64,
    tablet: f64,
    desktop: f64,
}

impl ScalePolicy {
    /// Create a policy, rejecting any factor outside `(0, 1]`.
    pub fn new(mobile: f64, tablet: f64, desktop: f64) -> Result<Self, ConfigError> {
        for (class, value) in [("mobile", mobile), ("tablet", tablet), ("desktop", desktop)] {
            if !is_valid_scale(value) {
                return Err(ConfigError::InvalidScale { class, value });
            }
        }
        Ok(Self {
            mobile,
            tablet,
            desktop,
        })
    }

    /// Create a policy, replacing each invalid factor with `1.0`.
    ///
    /// Every replacement is logged; the returned errors let callers
    /// report what was rejected without failing startup.
    pub fn sanitized(mobile: f64, tablet: f64, desktop: f64) -> (Self, Vec<ConfigError>) {
        let mut errors = Vec::new();
        let mut checked = |class: &'static str, value: f64| {
            if is_valid_scale(value) {
                value
            } else {
                warn!(class, value, "invalid scale factor, serving unmodified");
                errors.push(ConfigError::InvalidScale { class, value });
                1.0
            }
        };

        let policy = Self {
            mobile: checked("mobile", mobile),
            tablet: checked("tablet", tablet),
            desktop: checked("desktop", desktop),
        };
        (policy, errors)
    }

    /// The retention factor for a device class.
    pub fn factor_for(&self, class: DeviceClass) -> f64 {
        match class {
            DeviceClass::Mobile => self.mobile,
            DeviceClass::Tablet => self.tablet,
            DeviceClass::Desktop => self.desktop,
        }
    }
}

impl Default for ScalePolicy {
    fn default() -> Self {
        Self {
            mobile: DEFAULT_MOBILE_SCALE,
            tablet: DEFAULT_TABLET_SCALE,
            desktop: DEFAULT_DESKTOP_SCALE,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
