//! Display control module for the PineTime ST7789 panel

use chalice_core::{clock::ClockReading, face::Watchface};
use display_interface_spi::SPIInterface;
use embassy_nrf::{
    gpio::Output,
    peripherals::{P0_14, P0_18, P0_22, P0_23, P0_25, P0_26},
    spim::{self, Spim},
};
use embassy_time::Delay;
use mipidsi::{models::ST7789, Builder, Orientation};

pub const LCD_W: u16 = 240;
pub const LCD_H: u16 = 240;

pub struct BacklightPins<'a> {
    low: Output<'a, P0_14>,
    mid: Output<'a, P0_22>,
    high: Output<'a, P0_23>,
}

impl BacklightPins<'_> {
    /// Configure backlight pins on boot
    pub fn init(
        low: Output<'static, P0_14>,
        mid: Output<'static, P0_22>,
        high: Output<'static, P0_23>,
    ) -> Self {
        Self { low, mid, high }
    }

    /// Mid brightness, plenty for a watchface
    pub fn default_level(&mut self) {
        self.low.set_low();
        self.mid.set_low();
        self.high.set_high();
    }
}

pub struct Display<SPI>
where
    SPI: spim::Instance,
{
    lcd: mipidsi::Display<
        SPIInterface<Spim<'static, SPI>, Output<'static, P0_18>, Output<'static, P0_25>>,
        ST7789,
        Output<'static, P0_26>,
    >,
    /// Held so the pins keep their level
    #[allow(unused)]
    backlight: BacklightPins<'static>,
}

impl<SPI> Display<SPI>
where
    SPI: spim::Instance,
{
    /// Configure display settings on boot
    pub fn init(
        spim: Spim<'static, SPI>,
        cs_pin: Output<'static, P0_25>,
        dc_pin: Output<'static, P0_18>,
        rst_pin: Output<'static, P0_26>,
        mut backlight: BacklightPins<'static>,
    ) -> Self {
        let lcd = Builder::st7789(SPIInterface::new(spim, dc_pin, cs_pin))
            .with_display_size(LCD_W, LCD_H)
            .with_orientation(Orientation::Portrait(false))
            .init(&mut Delay, Some(rst_pin))
            .unwrap();
        backlight.default_level();
        Self { lcd, backlight }
    }

    /// Repaint whichever surfaces the face marked dirty.
    ///
    /// There is no layer compositor here, so a repaint of either surface
    /// repaints the face beneath the hands as well.
    pub fn repaint(&mut self, face: &mut Watchface, reading: &ClockReading) {
        let dirty = face.take_dirty();
        if dirty.background || dirty.hands {
            face.draw_background(&mut self.lcd).unwrap();
            face.draw_hands(&mut self.lcd, reading).unwrap();
        }
    }
}
