//! Watchface appearance and rendering.
//!
//! The appearance is derived wholesale from two persisted settings (face
//! color and hand style) every time the settings change; nothing in it is
//! updated piecemeal. Rendering itself is a fixed sequence of primitive
//! draws against any `Rgb565` draw target.

use embedded_graphics::{
    mono_font::{iso_8859_1, MonoFont},
    pixelcolor::{Rgb565, RgbColor},
    text::Alignment,
};

mod render;

pub use render::{DirtyFlags, Watchface, PHONE_MISSING_GLYPH};

/// Physical outline of the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayShape {
    Round,
    Rect,
}

/// Whether the panel renders full color or only black and white.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ColorSupport {
    Full,
    Monochrome,
}

/// Hand style selector, persisted under [`crate::settings::SettingsKey::Style`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HandStyle {
    #[default]
    Bold,
    Thin,
}

impl HandStyle {
    /// Decode the persisted selector. Anything unrecognized is the
    /// default bold style, so a corrupt slot cannot wedge the renderer.
    pub fn from_i32(value: i32) -> Self {
        match value {
            1 => HandStyle::Thin,
            _ => HandStyle::Bold,
        }
    }
}

/// Day label font; both styles use a bold face, only the size differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontChoice {
    LargeBold,
    SmallBold,
}

impl FontChoice {
    pub fn font(self) -> &'static MonoFont<'static> {
        match self {
            FontChoice::LargeBold => &iso_8859_1::FONT_9X15_BOLD,
            FontChoice::SmallBold => &iso_8859_1::FONT_7X13_BOLD,
        }
    }
}

/// Hand and border geometry, swapped as one block by a style change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandGeometry {
    /// Where the hour hand starts, from the center.
    pub inner_radius: i32,
    /// Where both hands end. Deliberately larger than the display radius
    /// so the hands run into the border and get clipped there.
    pub outer_radius: i32,
    pub hour_width: u32,
    pub minute_width: u32,
    pub border_width: u32,
}

impl HandGeometry {
    pub const BOLD: HandGeometry = HandGeometry {
        inner_radius: 50,
        outer_radius: 200,
        hour_width: 12,
        minute_width: 10,
        border_width: 12,
    };

    pub const THIN: HandGeometry = HandGeometry {
        inner_radius: 25,
        outer_radius: 200,
        hour_width: 5,
        minute_width: 3,
        border_width: 4,
    };
}

/// Everything the redraw routines read. Derived, never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppearanceState {
    pub face_color: Rgb565,
    pub accent_color: Rgb565,
    pub hand_color: Rgb565,
    pub day_text_color: Rgb565,
    pub glyph_color: Rgb565,
    pub geometry: HandGeometry,
    pub font: FontChoice,
    pub day_alignment: Alignment,
}

impl AppearanceState {
    /// Boot appearance: black face, bold geometry, white hands.
    pub fn boot(shape: DisplayShape) -> Self {
        Self {
            face_color: Rgb565::BLACK,
            accent_color: Rgb565::WHITE,
            hand_color: Rgb565::WHITE,
            day_text_color: Rgb565::BLACK,
            glyph_color: Rgb565::WHITE,
            geometry: HandGeometry::BOLD,
            font: FontChoice::LargeBold,
            day_alignment: day_alignment(shape, HandStyle::Bold),
        }
    }
}

/// Day label alignment. Round displays always center; rectangular
/// displays anchor by style.
pub(crate) fn day_alignment(shape: DisplayShape, style: HandStyle) -> Alignment {
    match (shape, style) {
        (DisplayShape::Round, _) => Alignment::Center,
        (DisplayShape::Rect, HandStyle::Bold) => Alignment::Left,
        (DisplayShape::Rect, HandStyle::Thin) => Alignment::Right,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_decoding_defaults_to_bold() {
        assert_eq!(HandStyle::from_i32(0), HandStyle::Bold);
        assert_eq!(HandStyle::from_i32(1), HandStyle::Thin);
        assert_eq!(HandStyle::from_i32(2), HandStyle::Bold);
        assert_eq!(HandStyle::from_i32(-1), HandStyle::Bold);
    }

    #[test]
    fn styles_differ_in_every_geometry_field() {
        let bold = HandGeometry::BOLD;
        let thin = HandGeometry::THIN;
        assert_ne!(bold.inner_radius, thin.inner_radius);
        assert_ne!(bold.hour_width, thin.hour_width);
        assert_ne!(bold.minute_width, thin.minute_width);
        assert_ne!(bold.border_width, thin.border_width);
    }

    #[test]
    fn round_displays_always_center_the_label() {
        assert_eq!(day_alignment(DisplayShape::Round, HandStyle::Bold), Alignment::Center);
        assert_eq!(day_alignment(DisplayShape::Round, HandStyle::Thin), Alignment::Center);
        assert_ne!(
            day_alignment(DisplayShape::Rect, HandStyle::Bold),
            day_alignment(DisplayShape::Rect, HandStyle::Thin)
        );
    }
}
