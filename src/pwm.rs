//! The PWM output capability a servo drives, and where the channels come from.
//!
//! - [`ServoPwm`]: one PWM output wired to one servo.
//! - [`DutyCyclePwm`]: [`ServoPwm`] for any `embedded-hal` [`SetDutyCycle`] output.
//! - [`PwmSource`]: opens the [`ServoPwm`] for a pin the first time it is connected.
//! - [`ChannelBank`]: a [`PwmSource`] built from channels prepared at startup.

use embedded_hal::pwm::{Error as _, SetDutyCycle};
use heapless::Vec;

use crate::config::SERVO_PERIOD_US;
use crate::hub::PinId;
use crate::{Error, Result};

/// One PWM output wired to one servo. The pin is implied by the value.
pub trait ServoPwm {
    /// Set the signal period. Called once, when the servo is connected.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot produce the period.
    fn configure_period(&mut self, period_us: u16) -> Result<()>;

    /// Emit pulses of `pulse_us` microseconds, one per period.
    ///
    /// # Errors
    ///
    /// Returns an error if the output rejects the write.
    fn write_pulse(&mut self, pulse_us: u16) -> Result<()>;

    /// Stop emitting pulses so the servo relaxes.
    ///
    /// # Errors
    ///
    /// Returns an error if the output rejects the write.
    fn disable(&mut self) -> Result<()>;
}

impl<T: ServoPwm + ?Sized> ServoPwm for &mut T {
    fn configure_period(&mut self, period_us: u16) -> Result<()> {
        (**self).configure_period(period_us)
    }

    fn write_pulse(&mut self, pulse_us: u16) -> Result<()> {
        (**self).write_pulse(pulse_us)
    }

    fn disable(&mut self) -> Result<()> {
        (**self).disable()
    }
}

/// A [`ServoPwm`] over any `embedded-hal` [`SetDutyCycle`] output.
///
/// The HAL must already run the output at the servo period; this adapter only records the
/// period so it can turn pulse widths into duty fractions. Disabling drives the output fully
/// off.
pub struct DutyCyclePwm<P> {
    pwm: P,
    period_us: u16,
}

impl<P: SetDutyCycle> DutyCyclePwm<P> {
    /// Wrap a duty-cycle output, assuming the standard 20 ms period until configured.
    #[must_use]
    pub const fn new(pwm: P) -> Self {
        Self {
            pwm,
            period_us: SERVO_PERIOD_US,
        }
    }

    /// Period the duty fractions are computed against. The output itself is never
    /// reprogrammed.
    #[must_use]
    pub const fn period_us(&self) -> u16 {
        self.period_us
    }

    /// Give back the wrapped output.
    #[must_use]
    pub fn into_inner(self) -> P {
        self.pwm
    }
}

impl<P: SetDutyCycle> ServoPwm for DutyCyclePwm<P> {
    fn configure_period(&mut self, period_us: u16) -> Result<()> {
        if period_us == 0 {
            return Err(Error::UnsupportedPeriod(period_us));
        }
        self.period_us = period_us;
        debug!(
            "duty-cycle pwm: assuming a {}µs period (not applied to the output, max duty {})",
            period_us,
            self.pwm.max_duty_cycle()
        );
        Ok(())
    }

    fn write_pulse(&mut self, pulse_us: u16) -> Result<()> {
        self.pwm
            .set_duty_cycle_fraction(pulse_us.min(self.period_us), self.period_us)
            .map_err(|err| Error::Pwm(err.kind()))
    }

    fn disable(&mut self) -> Result<()> {
        self.pwm
            .set_duty_cycle_fully_off()
            .map_err(|err| Error::Pwm(err.kind()))
    }
}

/// Opens the [`ServoPwm`] for a pin. The hub calls [`open`](Self::open) at most once per pin.
pub trait PwmSource {
    /// The output type handed out for each pin.
    type Channel: ServoPwm;

    /// Open the output for `pin`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PinUnavailable`] if the pin has no PWM output.
    fn open(&mut self, pin: PinId) -> Result<Self::Channel>;
}

/// A [`PwmSource`] holding up to `N` channels prepared at startup, keyed by pin.
///
/// Each channel is handed out once.
///
/// # Example
///
/// ```
/// use servo_blocks::hub::PinId;
/// use servo_blocks::pwm::{ChannelBank, PwmSource, ServoPwm};
///
/// struct Dummy;
/// impl ServoPwm for Dummy {
///     fn configure_period(&mut self, _period_us: u16) -> servo_blocks::Result<()> { Ok(()) }
///     fn write_pulse(&mut self, _pulse_us: u16) -> servo_blocks::Result<()> { Ok(()) }
///     fn disable(&mut self) -> servo_blocks::Result<()> { Ok(()) }
/// }
///
/// let mut bank = ChannelBank::<Dummy, 2>::new().with(PinId(11), Dummy)?;
/// assert!(bank.open(PinId(11)).is_ok());
/// assert!(bank.open(PinId(11)).is_err());
/// # Ok::<(), servo_blocks::Error>(())
/// ```
pub struct ChannelBank<C, const N: usize> {
    channels: Vec<(PinId, C), N>,
}

impl<C: ServoPwm, const N: usize> ChannelBank<C, N> {
    /// Create an empty bank.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            channels: Vec::new(),
        }
    }

    /// Add the channel for `pin`, builder style.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BankFull`] if the bank already holds `N` channels.
    pub fn with(mut self, pin: PinId, channel: C) -> Result<Self> {
        self.insert(pin, channel)?;
        Ok(self)
    }

    /// Add the channel for `pin`. A later channel for the same pin replaces the earlier one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BankFull`] if the bank already holds `N` channels.
    pub fn insert(&mut self, pin: PinId, channel: C) -> Result<()> {
        if let Some(slot) = self.channels.iter_mut().find(|(slot_pin, _)| *slot_pin == pin) {
            slot.1 = channel;
            return Ok(());
        }
        self.channels
            .push((pin, channel))
            .map_err(|_| Error::BankFull)
    }

    /// Pins whose channels have not been opened yet.
    pub fn available_pins(&self) -> impl Iterator<Item = PinId> + '_ {
        self.channels.iter().map(|(pin, _)| *pin)
    }
}

impl<C: ServoPwm, const N: usize> Default for ChannelBank<C, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ServoPwm, const N: usize> PwmSource for ChannelBank<C, N> {
    type Channel = C;

    fn open(&mut self, pin: PinId) -> Result<C> {
        let index = self
            .channels
            .iter()
            .position(|(slot_pin, _)| *slot_pin == pin)
            .ok_or(Error::PinUnavailable(pin))?;
        let (_, channel) = self.channels.swap_remove(index);
        Ok(channel)
    }
}
