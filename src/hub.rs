//! The per-pin servo registry.
//!
//! A [`ServoHub`] owns every servo a program has connected, one per pin, for as long as the
//! hub lives. Block programs call [`connect`](ServoHub::connect) with a pin number and get a
//! [`ServoHandle`] back; connecting the same pin again returns the same handle.
//!
//! # Example
//!
//! ```
//! use servo_blocks::hub::{PinId, ServoHub};
//! use servo_blocks::pwm::{ChannelBank, ServoPwm};
//!
//! # struct Pwm;
//! # impl ServoPwm for Pwm {
//! #     fn configure_period(&mut self, _: u16) -> servo_blocks::Result<()> { Ok(()) }
//! #     fn write_pulse(&mut self, _: u16) -> servo_blocks::Result<()> { Ok(()) }
//! #     fn disable(&mut self) -> servo_blocks::Result<()> { Ok(()) }
//! # }
//! let bank = ChannelBank::<Pwm, 2>::new()
//!     .with(PinId(11), Pwm)?
//!     .with(PinId(12), Pwm)?;
//! let mut hub: ServoHub<_, 2> = ServoHub::new(bank);
//!
//! let arm = hub.connect(PinId(11))?;
//! assert_eq!(hub.connect(PinId(11))?, arm);
//!
//! hub.set_angle(arm, 45.0)?;
//! assert_eq!(hub.angle(arm)?, 45.0);
//! # Ok::<(), servo_blocks::Error>(())
//! ```

use derive_more::derive::Display;
use embedded_hal::delay::DelayNs;
use embedded_hal_async::delay::DelayNs as AsyncDelayNs;
use heapless::Vec;
use portable_atomic::{AtomicU32, Ordering};

use crate::config::ServoConfig;
use crate::pwm::PwmSource;
use crate::servo::ServoController;
use crate::stop::StopInput;
use crate::sweep::{Sweep, SweepOutcome};
use crate::{Error, Result};

/// A physical pin number, as block programs name it.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[display("GP{_0}")]
pub struct PinId(pub u8);

impl From<u8> for PinId {
    fn from(pin: u8) -> Self {
        Self(pin)
    }
}

/// Source of hub ids. Zero marks a hub that has not connected anything yet.
static NEXT_HUB_ID: AtomicU32 = AtomicU32::new(1);

/// Identifies one connected servo within the [`ServoHub`] that issued it.
///
/// Equal handles mean the same servo. Any other hub rejects the handle.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ServoHandle {
    hub: u32,
    index: usize,
    pin: PinId,
}

impl ServoHandle {
    /// The pin the servo was connected on.
    #[must_use]
    pub const fn pin(&self) -> PinId {
        self.pin
    }
}

/// Registry of up to `N` servos, created lazily, one per pin, never removed.
///
/// See the [module documentation](self) for usage.
pub struct ServoHub<S: PwmSource, const N: usize> {
    id: u32,
    source: S,
    config: ServoConfig,
    servos: Vec<ServoController<S::Channel>, N>,
}

impl<S: PwmSource, const N: usize> ServoHub<S, N> {
    /// Create an empty hub with the default 500..=2500µs / 20 ms config.
    #[must_use]
    pub const fn new(source: S) -> Self {
        Self::with_config(source, ServoConfig::DEFAULT)
    }

    /// Create an empty hub whose servos all use `config`.
    #[must_use]
    pub const fn with_config(source: S, config: ServoConfig) -> Self {
        Self {
            id: 0,
            source,
            config,
            servos: Vec::new(),
        }
    }

    /// Return the servo on `pin`, connecting it first if this is the first time.
    ///
    /// Connecting opens the pin's PWM output and sets its period; the servo starts at 90°
    /// without sending pulses.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RegistryFull`] if `N` servos are already connected,
    /// [`Error::PinUnavailable`] if the source has no output for the pin, or any error from
    /// configuring the period.
    pub fn connect(&mut self, pin: PinId) -> Result<ServoHandle> {
        if let Some(index) = self.servos.iter().position(|servo| servo.pin() == pin) {
            return Ok(self.handle(index, pin));
        }
        if self.servos.is_full() {
            return Err(Error::RegistryFull);
        }
        let channel = self.source.open(pin)?;
        let servo = ServoController::new(pin, channel, self.config)?;
        let index = self.servos.len();
        self.servos.push(servo).map_err(|_| Error::RegistryFull)?;
        if self.id == 0 {
            self.id = next_hub_id();
        }
        debug!("servo hub {}: connected {} as #{}", self.id, pin, index);
        Ok(self.handle(index, pin))
    }

    const fn handle(&self, index: usize, pin: PinId) -> ServoHandle {
        ServoHandle {
            hub: self.id,
            index,
            pin,
        }
    }

    /// The servo behind `handle`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownHandle`] if this hub did not issue `handle`.
    pub fn servo(&self, handle: ServoHandle) -> Result<&ServoController<S::Channel>> {
        self.servos
            .get(handle.index)
            .filter(|servo| handle.hub == self.id && servo.pin() == handle.pin)
            .ok_or(Error::UnknownHandle)
    }

    /// The servo behind `handle`, mutably.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownHandle`] if this hub did not issue `handle`.
    pub fn servo_mut(&mut self, handle: ServoHandle) -> Result<&mut ServoController<S::Channel>> {
        let id = self.id;
        self.servos
            .get_mut(handle.index)
            .filter(|servo| handle.hub == id && servo.pin() == handle.pin)
            .ok_or(Error::UnknownHandle)
    }

    /// Move the servo to `degrees`, clamped to `0.0..=180.0`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownHandle`] or an error from the PWM write.
    pub fn set_angle(&mut self, handle: ServoHandle, degrees: f32) -> Result<()> {
        self.servo_mut(handle)?.set_angle(degrees)
    }

    /// Last commanded angle of the servo.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownHandle`] if this hub did not issue `handle`.
    pub fn angle(&self, handle: ServoHandle) -> Result<f32> {
        Ok(self.servo(handle)?.angle())
    }

    /// Stop sending pulses to the servo. Its last commanded angle is kept.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownHandle`] or an error from the PWM write.
    pub fn stop(&mut self, handle: ServoHandle) -> Result<()> {
        self.servo_mut(handle)?.stop()
    }

    /// Blocking sweep; see [`ServoController::sweep`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownHandle`] or any error from the sweep.
    pub fn sweep<D, T>(
        &mut self,
        handle: ServoHandle,
        sweep: Sweep,
        delay: &mut D,
        stop: T,
    ) -> Result<SweepOutcome>
    where
        D: DelayNs,
        T: StopInput,
    {
        self.servo_mut(handle)?.sweep(sweep, delay, stop)
    }

    /// Async sweep; see [`ServoController::sweep_async`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownHandle`] or any error from the sweep.
    pub async fn sweep_async<D, T>(
        &mut self,
        handle: ServoHandle,
        sweep: Sweep,
        delay: &mut D,
        stop: T,
    ) -> Result<SweepOutcome>
    where
        D: AsyncDelayNs,
        T: StopInput,
    {
        self.servo_mut(handle)?
            .sweep_async(sweep, delay, stop)
            .await
    }

    /// Handles of every connected servo, in connection order.
    pub fn handles(&self) -> impl Iterator<Item = ServoHandle> + '_ {
        self.servos
            .iter()
            .enumerate()
            .map(|(index, servo)| self.handle(index, servo.pin()))
    }

    /// Number of connected servos.
    #[must_use]
    pub fn len(&self) -> usize {
        self.servos.len()
    }

    /// Whether no servo has been connected yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.servos.is_empty()
    }

    /// Config shared by every servo in the hub.
    #[must_use]
    pub const fn config(&self) -> &ServoConfig {
        &self.config
    }
}

/// Hands out a fresh nonzero hub id, skipping zero if the counter wraps.
fn next_hub_id() -> u32 {
    loop {
        let id = NEXT_HUB_ID.fetch_add(1, Ordering::Relaxed);
        if id != 0 {
            return id;
        }
    }
}
