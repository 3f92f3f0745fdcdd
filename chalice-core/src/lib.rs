//! Hardware-agnostic logic for the Chalice analog watchface
//!
//! This crate contains everything the watchface does that is independent of
//! the board it runs on:
//!
//! - Polar hand placement (fixed-point angles, straight-up zero)
//! - Color derivation (packed-hex decode, contrast, accent sampling)
//! - Clock snapshots and the day label
//! - The settings store synced from the companion app
//! - Bluetooth connectivity edge detection
//!
//! Rendering targets any [`embedded_graphics::draw_target::DrawTarget`]
//! with `Rgb565` pixels, so the firmware drives a real ST7789 panel while
//! the tests draw into a mock display on the host.

#![no_std]
#![deny(unsafe_code)]

pub mod clock;
pub mod color;
pub mod connectivity;
pub mod face;
pub mod settings;
pub mod trig;
