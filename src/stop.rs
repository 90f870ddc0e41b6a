//! Cooperative stop requests, polled once per sweep step.
//!
//! See [`StopInput`] for the capability and [`StopButton`] / [`StopFlag`] for the sources
//! that come with the crate.

use embedded_hal::digital::{Error as _, InputPin};
use portable_atomic::{AtomicBool, Ordering};

use crate::{Error, Result};

/// Something a sweep polls to learn that it should end early.
pub trait StopInput {
    /// Whether a stop has been requested.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying input cannot be read.
    fn is_stop_requested(&mut self) -> Result<bool>;
}

impl<T: StopInput + ?Sized> StopInput for &mut T {
    fn is_stop_requested(&mut self) -> Result<bool> {
        (**self).is_stop_requested()
    }
}

/// A [`StopInput`] that never fires. The sweep runs all of its cycles.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct NeverStop;

impl StopInput for NeverStop {
    fn is_stop_requested(&mut self) -> Result<bool> {
        Ok(false)
    }
}

// ============================================================================
// StopButton
// ============================================================================

/// Describes how the button is physically wired.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PressedTo {
    /// Button connects pin to voltage (3.3V) when pressed.
    /// Needs a pull-down. Pin reads HIGH when pressed.
    ///
    /// Note: The original Pico 2 (RP2350) has a known silicon bug with pull-down resistors
    /// that can cause pins to stay HIGH after button release. Use `Ground` instead.
    Voltage,

    /// Button connects pin to ground (GND) when pressed.
    /// Needs a pull-up. Pin reads LOW when pressed.
    Ground,
}

/// A push button read as a [`StopInput`].
///
/// The level is sampled once per poll with no debouncing: a sweep step lasts at least
/// 10 ms, which is longer than typical contact bounce.
///
/// # Example
///
/// ```
/// use core::convert::Infallible;
/// use embedded_hal::digital::{ErrorType, InputPin};
/// use servo_blocks::stop::{PressedTo, StopButton, StopInput};
///
/// struct Held;
/// impl ErrorType for Held {
///     type Error = Infallible;
/// }
/// impl InputPin for Held {
///     fn is_high(&mut self) -> Result<bool, Infallible> { Ok(false) }
///     fn is_low(&mut self) -> Result<bool, Infallible> { Ok(true) }
/// }
///
/// let mut button = StopButton::new(Held, PressedTo::Ground);
/// assert!(button.is_stop_requested()?);
/// # Ok::<(), servo_blocks::Error>(())
/// ```
pub struct StopButton<P> {
    input: P,
    pressed_to: PressedTo,
}

impl<P: InputPin> StopButton<P> {
    /// Wrap an input pin. The pin's pull resistor must already match `pressed_to`.
    #[must_use]
    pub const fn new(input: P, pressed_to: PressedTo) -> Self {
        Self { input, pressed_to }
    }

    /// Returns whether the button is currently pressed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StopInput`] if the pin cannot be read.
    pub fn is_pressed(&mut self) -> Result<bool> {
        let level = match self.pressed_to {
            PressedTo::Voltage => self.input.is_high(),
            PressedTo::Ground => self.input.is_low(),
        };
        level.map_err(|err| Error::StopInput(err.kind()))
    }

    /// Give back the wrapped pin.
    #[must_use]
    pub fn into_inner(self) -> P {
        self.input
    }
}

impl<P: InputPin> StopInput for StopButton<P> {
    fn is_stop_requested(&mut self) -> Result<bool> {
        self.is_pressed()
    }
}

// ============================================================================
// StopFlag
// ============================================================================

/// A stop request raised from elsewhere: another task, an interrupt, a button watcher.
///
/// Lives in a `static` and is polled through a shared reference. The flag stays raised
/// until [`clear`](Self::clear) is called.
///
/// ```
/// use servo_blocks::stop::{StopFlag, StopInput};
///
/// static STOP: StopFlag = StopFlag::new();
///
/// STOP.request();
/// assert!((&STOP).is_stop_requested()?);
/// STOP.clear();
/// assert!(!(&STOP).is_stop_requested()?);
/// # Ok::<(), servo_blocks::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct StopFlag {
    requested: AtomicBool,
}

impl StopFlag {
    /// Create a lowered flag.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            requested: AtomicBool::new(false),
        }
    }

    /// Raise the flag.
    pub fn request(&self) {
        self.requested.store(true, Ordering::Release);
    }

    /// Lower the flag.
    pub fn clear(&self) {
        self.requested.store(false, Ordering::Release);
    }

    /// Whether the flag is raised.
    #[must_use]
    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::Acquire)
    }
}

impl StopInput for &StopFlag {
    fn is_stop_requested(&mut self) -> Result<bool> {
        Ok(self.is_requested())
    }
}
