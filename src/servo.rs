//! A device abstraction for one hobby positional servo (SG90 and friends).
//!
//! See [`ServoController`] for usage examples.

use embedded_hal::delay::DelayNs;
use embedded_hal_async::delay::DelayNs as AsyncDelayNs;

use crate::Result;
use crate::config::ServoConfig;
use crate::hub::PinId;
use crate::pulse::{CENTER_DEGREES, clamp_degrees};
use crate::pwm::ServoPwm;
use crate::stop::StopInput;
use crate::sweep::{Sweep, SweepOutcome};

/// A device abstraction for one servo on one PWM output.
///
/// Remembers the last commanded angle (there is no position feedback) and whether pulses
/// are being sent.
///
/// # Examples
/// ```rust
/// use servo_blocks::config::ServoConfig;
/// use servo_blocks::hub::PinId;
/// use servo_blocks::pwm::ServoPwm;
/// use servo_blocks::servo::ServoController;
///
/// # struct Pwm;
/// # impl ServoPwm for Pwm {
/// #     fn configure_period(&mut self, _: u16) -> servo_blocks::Result<()> { Ok(()) }
/// #     fn write_pulse(&mut self, _: u16) -> servo_blocks::Result<()> { Ok(()) }
/// #     fn disable(&mut self) -> servo_blocks::Result<()> { Ok(()) }
/// # }
/// let mut servo = ServoController::new(PinId(15), Pwm, ServoConfig::DEFAULT)?;
/// assert_eq!(servo.angle(), 90.0);
///
/// servo.set_angle(200.0)?; // clamped
/// assert_eq!(servo.angle(), 180.0);
/// assert_eq!(servo.pulse_us(), 2_500);
///
/// servo.stop()?; // relax, angle is kept
/// assert!(!servo.is_active());
/// assert_eq!(servo.angle(), 180.0);
///
/// servo.hold()?; // pulses again at 180°
/// # Ok::<(), servo_blocks::Error>(())
/// ```
pub struct ServoController<P> {
    pin: PinId,
    pwm: P,
    config: ServoConfig,
    degrees: f32,
    active: bool,
}

impl<P: ServoPwm> ServoController<P> {
    /// Configure the output's period and create the controller at 90°, inactive.
    ///
    /// No pulse is sent until the first angle is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot produce `config.period_us()`.
    pub fn new(pin: PinId, mut pwm: P, config: ServoConfig) -> Result<Self> {
        pwm.configure_period(config.period_us())?;
        info!(
            "servo {} period={}µs range={}..={}µs",
            pin,
            config.period_us(),
            config.min_us(),
            config.max_us()
        );
        Ok(Self {
            pin,
            pwm,
            config,
            degrees: CENTER_DEGREES,
            active: false,
        })
    }

    /// The pin this servo was connected on.
    #[must_use]
    pub const fn pin(&self) -> PinId {
        self.pin
    }

    /// Pulse range and period.
    #[must_use]
    pub const fn config(&self) -> &ServoConfig {
        &self.config
    }

    /// Last commanded angle, in degrees. Not a sensed position.
    #[must_use]
    pub const fn angle(&self) -> f32 {
        self.degrees
    }

    /// Whether pulses are being sent.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Pulse width for the last commanded angle.
    #[must_use]
    pub fn pulse_us(&self) -> u16 {
        self.config.pulse_us(self.degrees)
    }

    /// Move to `degrees`, clamped to `0.0..=180.0`.
    ///
    /// See the [struct-level example](Self) for usage.
    ///
    /// # Errors
    ///
    /// Returns an error if the PWM write fails.
    pub fn set_angle(&mut self, degrees: f32) -> Result<()> {
        self.degrees = clamp_degrees(degrees);
        let pulse_us = self.config.pulse_us(self.degrees);
        trace!("servo {} set_angle({}) -> {}µs", self.pin, self.degrees, pulse_us);
        self.pwm.write_pulse(pulse_us)?;
        self.active = true;
        Ok(())
    }

    /// Move to 90°.
    ///
    /// # Errors
    ///
    /// Returns an error if the PWM write fails.
    pub fn center(&mut self) -> Result<()> {
        self.set_angle(CENTER_DEGREES)
    }

    /// Resume pulses at the last commanded angle.
    ///
    /// See the [struct-level example](Self) for usage.
    ///
    /// # Errors
    ///
    /// Returns an error if the PWM write fails.
    pub fn hold(&mut self) -> Result<()> {
        self.set_angle(self.degrees)
    }

    /// Stop sending pulses so the servo relaxes and can move freely.
    ///
    /// The last commanded angle is kept.
    ///
    /// See the [struct-level example](Self) for usage.
    ///
    /// # Errors
    ///
    /// Returns an error if the PWM write fails.
    pub fn stop(&mut self) -> Result<()> {
        self.pwm.disable()?;
        self.active = false;
        debug!("servo {} stopped at {}°", self.pin, self.degrees);
        Ok(())
    }

    /// Run `sweep`, blocking on `delay` after each angle and polling `stop` once per step.
    ///
    /// Returns once all cycles ran or as soon as `stop` reports a request. A request seen
    /// after the final angle still reports [`SweepOutcome::Completed`].
    ///
    /// # Example
    ///
    /// ```rust
    /// # use servo_blocks::{hub::PinId, pwm::ServoPwm, config::ServoConfig};
    /// use servo_blocks::servo::ServoController;
    /// use servo_blocks::stop::NeverStop;
    /// use servo_blocks::sweep::{Sweep, SweepOutcome};
    /// # struct Pwm;
    /// # impl ServoPwm for Pwm {
    /// #     fn configure_period(&mut self, _: u16) -> servo_blocks::Result<()> { Ok(()) }
    /// #     fn write_pulse(&mut self, _: u16) -> servo_blocks::Result<()> { Ok(()) }
    /// #     fn disable(&mut self) -> servo_blocks::Result<()> { Ok(()) }
    /// # }
    /// # struct NoDelay;
    /// # impl embedded_hal::delay::DelayNs for NoDelay { fn delay_ns(&mut self, _: u32) {} }
    /// let mut servo = ServoController::new(PinId(15), Pwm, ServoConfig::DEFAULT)?;
    /// let outcome = servo.sweep(Sweep::new(0.0, 180.0, 10.0, 1), &mut NoDelay, NeverStop)?;
    /// assert_eq!(outcome, SweepOutcome::Completed { cycles: 1 });
    /// assert_eq!(servo.angle(), 180.0);
    /// # Ok::<(), servo_blocks::Error>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if a PWM write fails or the stop input cannot be read.
    pub fn sweep<D, S>(
        &mut self,
        mut sweep: Sweep,
        delay: &mut D,
        mut stop: S,
    ) -> Result<SweepOutcome>
    where
        D: DelayNs,
        S: StopInput,
    {
        let step_ms = step_delay_ms(&sweep);
        info!(
            "servo {} sweep {}°..{}° x{} step={}ms",
            self.pin,
            sweep.start_degrees(),
            sweep.end_degrees(),
            sweep.cycles(),
            step_ms
        );
        while let Some(degrees) = sweep.next() {
            self.set_angle(degrees)?;
            delay.delay_ms(step_ms);
            if stop.is_stop_requested()? && !sweep.is_finished() {
                return Ok(self.stopped(&sweep));
            }
        }
        Ok(SweepOutcome::Completed {
            cycles: sweep.cycles(),
        })
    }

    /// Async [`sweep`](Self::sweep): awaits `delay` between steps instead of blocking.
    ///
    /// # Errors
    ///
    /// Returns an error if a PWM write fails or the stop input cannot be read.
    pub async fn sweep_async<D, S>(
        &mut self,
        mut sweep: Sweep,
        delay: &mut D,
        mut stop: S,
    ) -> Result<SweepOutcome>
    where
        D: AsyncDelayNs,
        S: StopInput,
    {
        let step_ms = step_delay_ms(&sweep);
        info!(
            "servo {} sweep {}°..{}° x{} step={}ms",
            self.pin,
            sweep.start_degrees(),
            sweep.end_degrees(),
            sweep.cycles(),
            step_ms
        );
        while let Some(degrees) = sweep.next() {
            self.set_angle(degrees)?;
            delay.delay_ms(step_ms).await;
            if stop.is_stop_requested()? && !sweep.is_finished() {
                return Ok(self.stopped(&sweep));
            }
        }
        Ok(SweepOutcome::Completed {
            cycles: sweep.cycles(),
        })
    }

    fn stopped(&self, sweep: &Sweep) -> SweepOutcome {
        info!(
            "servo {} sweep stopped at {}° after {} cycles",
            self.pin,
            self.degrees,
            sweep.completed_cycles()
        );
        SweepOutcome::Stopped {
            completed_cycles: sweep.completed_cycles(),
        }
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "step delays are at most 100 ms"
)]
fn step_delay_ms(sweep: &Sweep) -> u32 {
    sweep.step_delay().as_millis() as u32
}
