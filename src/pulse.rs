//! Angle clamping and the angle → pulse width mapping.

use crate::config::ServoConfig;

/// Lowest commandable angle.
pub const MIN_DEGREES: f32 = 0.0;

/// Highest commandable angle.
pub const MAX_DEGREES: f32 = 180.0;

/// Angle a new servo reports before anything has been written.
pub const CENTER_DEGREES: f32 = 90.0;

/// Clamp an angle to `0.0..=180.0`. NaN clamps to 0.
#[must_use]
pub fn clamp_degrees(degrees: f32) -> f32 {
    if degrees.is_nan() {
        MIN_DEGREES
    } else {
        degrees.clamp(MIN_DEGREES, MAX_DEGREES)
    }
}

/// Pulse width in whole microseconds for `degrees` on the default 500..=2500µs range.
///
/// The angle is clamped first, then mapped linearly and rounded half away from zero.
///
/// ```
/// use servo_blocks::pulse::angle_to_pulse;
///
/// assert_eq!(angle_to_pulse(0.0), 500);
/// assert_eq!(angle_to_pulse(90.0), 1_500);
/// assert_eq!(angle_to_pulse(180.0), 2_500);
/// assert_eq!(angle_to_pulse(-30.0), 500);
/// ```
#[must_use]
pub fn angle_to_pulse(degrees: f32) -> u16 {
    ServoConfig::DEFAULT.pulse_us(degrees)
}

impl ServoConfig {
    /// Pulse width in whole microseconds for `degrees` on this config's range.
    ///
    /// Monotonically non-decreasing in the clamped angle.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "the rounded pulse lies within min_us..=max_us"
    )]
    pub fn pulse_us(&self, degrees: f32) -> u16 {
        let fraction = clamp_degrees(degrees) / MAX_DEGREES;
        let span = f32::from(self.max_us().saturating_sub(self.min_us()));
        // roundf rounds half away from zero.
        libm::roundf(f32::from(self.min_us()) + fraction * span) as u16
    }
}
