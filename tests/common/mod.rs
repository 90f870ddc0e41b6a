//! Recording stand-ins for the hardware a servo talks to.
#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::cell::RefCell;
use std::rc::Rc;

use servo_blocks::Result;
use servo_blocks::hub::PinId;
use servo_blocks::pwm::{PwmSource, ServoPwm};
use servo_blocks::stop::StopInput;

/// One call made on a [`RecordingPwm`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PwmEvent {
    Period(u16),
    Pulse(u16),
    Disabled,
}

/// A [`ServoPwm`] that records every call. Clones share the log.
#[derive(Clone, Debug, Default)]
pub struct RecordingPwm {
    events: Rc<RefCell<Vec<PwmEvent>>>,
}

impl RecordingPwm {
    pub fn events(&self) -> Vec<PwmEvent> {
        self.events.borrow().clone()
    }

    pub fn pulses(&self) -> Vec<u16> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                PwmEvent::Pulse(pulse_us) => Some(*pulse_us),
                _ => None,
            })
            .collect()
    }
}

impl ServoPwm for RecordingPwm {
    fn configure_period(&mut self, period_us: u16) -> Result<()> {
        self.events.borrow_mut().push(PwmEvent::Period(period_us));
        Ok(())
    }

    fn write_pulse(&mut self, pulse_us: u16) -> Result<()> {
        self.events.borrow_mut().push(PwmEvent::Pulse(pulse_us));
        Ok(())
    }

    fn disable(&mut self) -> Result<()> {
        self.events.borrow_mut().push(PwmEvent::Disabled);
        Ok(())
    }
}

/// A [`PwmSource`] that opens a [`RecordingPwm`] for any pin and keeps a clone of each.
#[derive(Clone, Debug, Default)]
pub struct RecordingSource {
    opened: Rc<RefCell<Vec<(PinId, RecordingPwm)>>>,
}

impl RecordingSource {
    pub fn open_count(&self) -> usize {
        self.opened.borrow().len()
    }

    pub fn channel(&self, pin: PinId) -> RecordingPwm {
        self.opened
            .borrow()
            .iter()
            .find(|(opened_pin, _)| *opened_pin == pin)
            .map(|(_, channel)| channel.clone())
            .expect("pin was opened")
    }
}

impl PwmSource for RecordingSource {
    type Channel = RecordingPwm;

    fn open(&mut self, pin: PinId) -> Result<RecordingPwm> {
        let channel = RecordingPwm::default();
        self.opened.borrow_mut().push((pin, channel.clone()));
        Ok(channel)
    }
}

/// A delay that returns immediately and records the requested milliseconds.
#[derive(Debug, Default)]
pub struct RecordingDelay {
    pub pauses_ms: Vec<u32>,
}

impl embedded_hal::delay::DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.pauses_ms.push(ns / 1_000_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.pauses_ms.push(ms);
    }
}

impl embedded_hal_async::delay::DelayNs for RecordingDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.pauses_ms.push(ns / 1_000_000);
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.pauses_ms.push(ms);
    }
}

/// A stop input that fires on its `fire_on_poll`-th poll (1-based) and stays pressed.
#[derive(Debug)]
pub struct StopOnPoll {
    pub fire_on_poll: usize,
    pub polls: usize,
}

impl StopOnPoll {
    pub const fn new(fire_on_poll: usize) -> Self {
        Self {
            fire_on_poll,
            polls: 0,
        }
    }
}

impl StopInput for StopOnPoll {
    fn is_stop_requested(&mut self) -> Result<bool> {
        self.polls += 1;
        Ok(self.polls >= self.fire_on_poll)
    }
}
