//! Pico 1 / Pico 2 outputs and inputs for the hub, on `embassy-rp`.
//!
//! - [`servo_pwm`]: a [`ServoPwm`] on a GPIO pin and its PWM slice, with the A/B channel
//!   inferred from the pin.
//! - [`stop_button`]: a [`StopButton`] on a GPIO pin with the matching pull resistor.
//!
//! Each servo needs its own [PWM slice](crate#glossary). Calculate which slice a pin uses:
//! `slice = (pin / 2) % 8`. For example, PIN_10 and PIN_11 both use PWM_SLICE5, so only one of
//! them can drive a servo.
//!
//! # Example
//!
//! ```rust,no_run
//! # #![no_std]
//! # #![no_main]
//! use servo_blocks::{Result, hub::{PinId, ServoHub}, pwm::ChannelBank, rp, stop::PressedTo};
//! # #[panic_handler]
//! # fn panic(_info: &core::panic::PanicInfo) -> ! { loop {} }
//!
//! fn example(p: embassy_rp::Peripherals) -> Result<()> {
//!     let bank = ChannelBank::<_, 1>::new().with(PinId(11), rp::servo_pwm(p.PIN_11, p.PWM_SLICE5))?;
//!     let mut hub: ServoHub<_, 1> = ServoHub::new(bank);
//!     let _stop_button = rp::stop_button(p.PIN_13, PressedTo::Ground);
//!
//!     let servo = hub.connect(PinId(11))?;
//!     hub.set_angle(servo, 45.0)
//! }
//! ```

use embassy_rp::clocks::clk_sys_freq;
use embassy_rp::gpio::{Input, Pull};
use embassy_rp::pwm::{Config, Pwm};
use embassy_rp::{Peri, PeripheralType};

use crate::pwm::ServoPwm;
use crate::stop::{PressedTo, StopButton};
use crate::{Error, Result};

/// A [`ServoPwm`] on one channel of an RP PWM slice, ticking once per microsecond.
pub struct RpServoPwm<'d> {
    pwm: Pwm<'d>,
    cfg: Config, // Store config to avoid recreating default (which resets divider)
    channel: PwmChannel,
}

#[derive(Debug, Clone, Copy)]
enum PwmChannel {
    A,
    B,
}

impl<'d> RpServoPwm<'d> {
    /// Wrap a slice whose output A drives the servo.
    #[must_use]
    pub fn new_output_a(pwm: Pwm<'d>) -> Self {
        Self::init(pwm, PwmChannel::A)
    }

    /// Wrap a slice whose output B drives the servo.
    #[must_use]
    pub fn new_output_b(pwm: Pwm<'d>) -> Self {
        Self::init(pwm, PwmChannel::B)
    }

    fn init(mut pwm: Pwm<'d>, channel: PwmChannel) -> Self {
        let mut cfg = Config::default();
        cfg.enable = false; // no pulses until the first angle
        pwm.set_config(&cfg);
        Self { pwm, cfg, channel }
    }
}

impl ServoPwm for RpServoPwm<'_> {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "divider is clamped to 1..=255"
    )]
    fn configure_period(&mut self, period_us: u16) -> Result<()> {
        // top = period - 1 ticks per frame, so a zero period cannot be expressed.
        let top = period_us
            .checked_sub(1)
            .ok_or(Error::UnsupportedPeriod(period_us))?;
        let clk = u64::from(clk_sys_freq()); // Hz
        // Aim for tick ≈ 1 µs: divider = clk_sys / 1_000_000
        let div_int = (clk / 1_000_000).clamp(1, 255) as u8;

        self.cfg.top = top;
        self.cfg.phase_correct = false; // edge-aligned => exact 1 µs steps
        self.cfg.divider = div_int.into();
        self.pwm.set_config(&self.cfg);

        info!("servo pwm clk={}Hz div={} top={}", clk, div_int, top);
        Ok(())
    }

    fn write_pulse(&mut self, pulse_us: u16) -> Result<()> {
        // One tick ≈ 1 µs, so compare = us. Reapply the whole config so the divider survives.
        let compare = pulse_us.min(self.cfg.top);
        match self.channel {
            PwmChannel::A => self.cfg.compare_a = compare,
            PwmChannel::B => self.cfg.compare_b = compare,
        }
        self.cfg.enable = true;
        self.pwm.set_config(&self.cfg);
        Ok(())
    }

    fn disable(&mut self) -> Result<()> {
        self.cfg.enable = false;
        self.pwm.set_config(&self.cfg);
        Ok(())
    }
}

/// Create a [`RpServoPwm`] on `pin`, using the slice and channel that pin is wired to.
///
/// See the [module documentation](self) for usage.
pub fn servo_pwm<'d, P, S>(pin: Peri<'d, P>, slice: Peri<'d, S>) -> RpServoPwm<'d>
where
    P: ServoPwmPin<S>,
    S: PeripheralType,
{
    let pwm = P::new_pwm(slice, pin);
    if P::IS_CHANNEL_A {
        RpServoPwm::new_output_a(pwm)
    } else {
        RpServoPwm::new_output_b(pwm)
    }
}

/// Create a [`StopButton`] on `pin`, with a pull-down for [`PressedTo::Voltage`] and a
/// pull-up for [`PressedTo::Ground`].
#[must_use]
pub fn stop_button<'d, P: embassy_rp::gpio::Pin>(
    pin: Peri<'d, P>,
    pressed_to: PressedTo,
) -> StopButton<Input<'d>> {
    let pull = match pressed_to {
        PressedTo::Voltage => Pull::Down,
        PressedTo::Ground => Pull::Up,
    };
    StopButton::new(Input::new(pin, pull), pressed_to)
}

/// A GPIO pin that can drive a servo from PWM slice `S`.
///
/// Implemented for every pin/slice pair the chip wires together.
pub trait ServoPwmPin<S: PeripheralType>: PeripheralType {
    /// Whether the pin is on the slice's A output.
    const IS_CHANNEL_A: bool;

    /// Open the slice with this pin as its output.
    fn new_pwm<'d>(slice: Peri<'d, S>, pin: Peri<'d, Self>) -> Pwm<'d>;
}

macro_rules! servo_pin_map {
    ($($pin:ident => $slice:ident $channel:ident),* $(,)?) => {
        $( servo_pin_map!(@one $pin, $slice, $channel); )*
    };
    (@one $pin:ident, $slice:ident, A) => {
        impl ServoPwmPin<embassy_rp::peripherals::$slice> for embassy_rp::peripherals::$pin {
            const IS_CHANNEL_A: bool = true;
            fn new_pwm<'d>(
                slice: Peri<'d, embassy_rp::peripherals::$slice>,
                pin: Peri<'d, Self>,
            ) -> Pwm<'d> {
                Pwm::new_output_a(slice, pin, Config::default())
            }
        }
    };
    (@one $pin:ident, $slice:ident, B) => {
        impl ServoPwmPin<embassy_rp::peripherals::$slice> for embassy_rp::peripherals::$pin {
            const IS_CHANNEL_A: bool = false;
            fn new_pwm<'d>(
                slice: Peri<'d, embassy_rp::peripherals::$slice>,
                pin: Peri<'d, Self>,
            ) -> Pwm<'d> {
                Pwm::new_output_b(slice, pin, Config::default())
            }
        }
    };
}

servo_pin_map! {
    PIN_0 => PWM_SLICE0 A, PIN_1 => PWM_SLICE0 B,
    PIN_2 => PWM_SLICE1 A, PIN_3 => PWM_SLICE1 B,
    PIN_4 => PWM_SLICE2 A, PIN_5 => PWM_SLICE2 B,
    PIN_6 => PWM_SLICE3 A, PIN_7 => PWM_SLICE3 B,
    PIN_8 => PWM_SLICE4 A, PIN_9 => PWM_SLICE4 B,
    PIN_10 => PWM_SLICE5 A, PIN_11 => PWM_SLICE5 B,
    PIN_12 => PWM_SLICE6 A, PIN_13 => PWM_SLICE6 B,
    PIN_14 => PWM_SLICE7 A, PIN_15 => PWM_SLICE7 B,
    PIN_16 => PWM_SLICE0 A, PIN_17 => PWM_SLICE0 B,
    PIN_18 => PWM_SLICE1 A, PIN_19 => PWM_SLICE1 B,
    PIN_20 => PWM_SLICE2 A, PIN_21 => PWM_SLICE2 B,
    PIN_22 => PWM_SLICE3 A, PIN_23 => PWM_SLICE3 B,
    PIN_24 => PWM_SLICE4 A, PIN_25 => PWM_SLICE4 B,
    PIN_26 => PWM_SLICE5 A, PIN_27 => PWM_SLICE5 B,
    PIN_28 => PWM_SLICE6 A, PIN_29 => PWM_SLICE6 B,
}

// RP2350B has 18 more GPIOs on slices 8..=11.
#[cfg(feature = "pico2")]
servo_pin_map! {
    PIN_30 => PWM_SLICE7 A, PIN_31 => PWM_SLICE7 B,
    PIN_32 => PWM_SLICE8 A, PIN_33 => PWM_SLICE8 B,
    PIN_34 => PWM_SLICE9 A, PIN_35 => PWM_SLICE9 B,
    PIN_36 => PWM_SLICE10 A, PIN_37 => PWM_SLICE10 B,
    PIN_38 => PWM_SLICE11 A, PIN_39 => PWM_SLICE11 B,
    PIN_40 => PWM_SLICE8 A, PIN_41 => PWM_SLICE8 B,
    PIN_42 => PWM_SLICE9 A, PIN_43 => PWM_SLICE9 B,
    PIN_44 => PWM_SLICE10 A, PIN_45 => PWM_SLICE10 B,
    PIN_46 => PWM_SLICE11 A, PIN_47 => PWM_SLICE11 B,
}
