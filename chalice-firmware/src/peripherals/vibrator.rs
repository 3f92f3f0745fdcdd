//! Control the vibration motor
//!
//! Pin P0.16 drives the motor inverted: high = off, low = on.

use embassy_nrf::{gpio::Output, peripherals::P0_16};
use embassy_time::Timer;

/// Pulse length in milliseconds
#[derive(Clone, Copy)]
pub enum PulseLength {
    /// 200ms pulse
    Short = 200,
    /// 400ms pulse
    #[allow(unused)]
    Long = 400,
}

pub struct Vibrator {
    pin_enable: Output<'static, P0_16>,
}

impl Vibrator {
    /// Configure vibrator on boot
    pub fn init(enable_pin: Output<'static, P0_16>) -> Self {
        Self {
            pin_enable: enable_pin,
        }
    }

    /// Pulse the motor, with an off gap of the same length between pulses.
    pub async fn pulse(&mut self, length: PulseLength, times: Option<u8>) {
        let count = times.unwrap_or(1);
        for _ in 0..count {
            self.pin_enable.set_low();
            Timer::after_millis(length as u64).await;
            self.pin_enable.set_high();
            Timer::after_millis(length as u64).await;
        }
    }
}
