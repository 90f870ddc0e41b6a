use derive_more::derive::{Display, Error};

use crate::hub::PinId;

/// A specialized `Result` where the error is this crate's `Error` type.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Define a unified error type for this crate.
///
/// Angles, speeds, and cycle counts never produce errors; they are clamped. Errors come from
/// the hardware collaborators or from the fixed capacity of the registry.
#[derive(Clone, Copy, Debug, Display, Error, PartialEq, Eq)]
pub enum Error {
    /// The PWM output rejected a write.
    #[display("PWM output failed: {_0:?}")]
    Pwm(#[error(not(source))] embedded_hal::pwm::ErrorKind),

    /// The stop input could not be read.
    #[display("Stop input read failed: {_0:?}")]
    StopInput(#[error(not(source))] embedded_hal::digital::ErrorKind),

    /// No PWM channel can be opened for this pin.
    #[display("No PWM channel available for pin {_0}")]
    PinUnavailable(#[error(not(source))] PinId),

    /// Every slot in the servo hub is taken.
    #[display("Servo hub is full")]
    RegistryFull,

    /// Every slot in the channel bank is taken.
    #[display("Channel bank is full")]
    BankFull,

    /// The handle was not issued by this hub.
    #[display("Unknown servo handle")]
    UnknownHandle,

    /// The pulse range is empty or does not fit inside the PWM period.
    #[display("Pulse range {min_us}..={max_us}µs does not fit a {period_us}µs period")]
    InvalidPulseRange {
        /// Pulse width for 0 degrees.
        min_us: u16,
        /// Pulse width for 180 degrees.
        max_us: u16,
        /// PWM period.
        period_us: u16,
    },

    /// The PWM output cannot produce this period.
    #[display("PWM period of {_0}µs is not supported")]
    UnsupportedPeriod(#[error(not(source))] u16),
}
