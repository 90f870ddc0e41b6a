//! Pulse range and PWM period for a servo.
//!
//! See [`ServoConfig`].

use crate::{Error, Result};

/// Standard hobby servo PWM period (microseconds): 20 ms, i.e. 50 Hz.
pub const SERVO_PERIOD_US: u16 = 20_000;

/// Default minimum pulse width for hobby servos (microseconds).
pub const SERVO_MIN_US_DEFAULT: u16 = 500;

/// Default maximum pulse width for hobby servos (microseconds).
pub const SERVO_MAX_US_DEFAULT: u16 = 2_500;

/// Pulse range and PWM period shared by every servo in a [`ServoHub`](crate::hub::ServoHub).
///
/// 0° maps to `min_us`, 180° maps to `max_us`, and one pulse is emitted per `period_us`.
///
/// # Example
///
/// ```
/// use servo_blocks::config::ServoConfig;
///
/// // An SG90 that needs a narrower range than the default 500..=2500µs.
/// let config = ServoConfig::new(600, 2_400)?;
/// assert_eq!(config.pulse_us(90.0), 1_500);
/// # Ok::<(), servo_blocks::Error>(())
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ServoConfig {
    min_us: u16,
    max_us: u16,
    period_us: u16,
}

impl ServoConfig {
    /// 500..=2500µs over a 20 ms period.
    pub const DEFAULT: Self = Self {
        min_us: SERVO_MIN_US_DEFAULT,
        max_us: SERVO_MAX_US_DEFAULT,
        period_us: SERVO_PERIOD_US,
    };

    /// Create a config with a custom pulse range and the standard 20 ms period.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPulseRange`] unless `min_us < max_us < period`.
    pub const fn new(min_us: u16, max_us: u16) -> Result<Self> {
        Self::validated(min_us, max_us, SERVO_PERIOD_US)
    }

    /// Replace the PWM period.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPulseRange`] if the pulse range no longer fits.
    pub const fn with_period_us(self, period_us: u16) -> Result<Self> {
        Self::validated(self.min_us, self.max_us, period_us)
    }

    const fn validated(min_us: u16, max_us: u16, period_us: u16) -> Result<Self> {
        if min_us < max_us && max_us < period_us {
            Ok(Self {
                min_us,
                max_us,
                period_us,
            })
        } else {
            Err(Error::InvalidPulseRange {
                min_us,
                max_us,
                period_us,
            })
        }
    }

    /// Pulse width for 0 degrees.
    #[must_use]
    pub const fn min_us(&self) -> u16 {
        self.min_us
    }

    /// Pulse width for 180 degrees.
    #[must_use]
    pub const fn max_us(&self) -> u16 {
        self.max_us
    }

    /// PWM period.
    #[must_use]
    pub const fn period_us(&self) -> u16 {
        self.period_us
    }
}

impl Default for ServoConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
