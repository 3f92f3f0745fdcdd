//! The two drawable surfaces of the face.
//!
//! The face owns a background surface (face fill plus the phone-missing
//! glyph) and a hands surface (hour hand, minute hand, border, day label).
//! Event handlers only mark surfaces dirty; all pixel work happens in the
//! draw calls the host compositor makes afterwards.

use embedded_graphics::{
    geometry::{Point, Size},
    mono_font::MonoTextStyle,
    pixelcolor::Rgb565,
    prelude::*,
    primitives::{Circle, Line, PrimitiveStyle, Rectangle},
    text::{Alignment, Text},
};
use rand_core::RngCore;

use super::{day_alignment, AppearanceState, ColorSupport, DisplayShape, FontChoice, HandGeometry, HandStyle};
use crate::{clock::ClockReading, color, trig};

/// Shown on the background surface while the phone is unreachable.
pub const PHONE_MISSING_GLYPH: &str = "\u{d7}";

/// Which surfaces need a repaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DirtyFlags {
    pub background: bool,
    pub hands: bool,
}

/// The face renderer.
pub struct Watchface {
    bounds: Rectangle,
    center: Point,
    shape: DisplayShape,
    color_support: ColorSupport,
    appearance: AppearanceState,
    connected: bool,
    dirty: DirtyFlags,
}

impl Watchface {
    pub fn new(size: Size, shape: DisplayShape, color_support: ColorSupport) -> Self {
        let bounds = Rectangle::new(Point::zero(), size);
        Self {
            bounds,
            center: bounds.center(),
            shape,
            color_support,
            appearance: AppearanceState::boot(shape),
            connected: false,
            dirty: DirtyFlags {
                background: true,
                hands: true,
            },
        }
    }

    pub fn appearance(&self) -> &AppearanceState {
        &self.appearance
    }

    pub fn dirty(&self) -> DirtyFlags {
        self.dirty
    }

    /// Consume the dirty flags, leaving both surfaces clean.
    pub fn take_dirty(&mut self) -> DirtyFlags {
        core::mem::take(&mut self.dirty)
    }

    /// Per-minute tick: only the hands surface changes.
    pub fn handle_tick(&mut self) {
        self.dirty.hands = true;
    }

    /// New connectivity state from the host; repaint the glyph.
    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
        self.dirty.background = true;
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Swap in the complete geometry block for `style`. Atomic: no redraw
    /// can observe a half-switched appearance.
    pub fn apply_style(&mut self, style: HandStyle) {
        let (geometry, font) = match style {
            HandStyle::Bold => (HandGeometry::BOLD, FontChoice::LargeBold),
            HandStyle::Thin => (HandGeometry::THIN, FontChoice::SmallBold),
        };
        self.appearance = AppearanceState {
            geometry,
            font,
            day_alignment: day_alignment(self.shape, style),
            ..self.appearance
        };
        self.dirty = DirtyFlags {
            background: true,
            hands: true,
        };
    }

    /// Recompute every color from the stored face color.
    pub fn apply_colors(&mut self, face_color: Rgb565, rng: &mut impl RngCore) {
        let accent_color = match self.color_support {
            ColorSupport::Full => color::pick_accent(face_color, rng),
            ColorSupport::Monochrome => color::legible_over(face_color),
        };
        self.appearance = AppearanceState {
            face_color,
            accent_color,
            hand_color: color::legible_over(face_color),
            day_text_color: color::legible_over(accent_color),
            glyph_color: color::legible_over(face_color),
            ..self.appearance
        };
        self.dirty = DirtyFlags {
            background: true,
            hands: true,
        };
    }

    /// Paint the background surface: face fill and the phone glyph.
    pub fn draw_background<D>(&mut self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let a = &self.appearance;
        self.bounds
            .into_styled(PrimitiveStyle::with_fill(a.face_color))
            .draw(target)?;

        if !self.connected {
            let style = MonoTextStyle::new(FontChoice::LargeBold.font(), a.glyph_color);
            Text::with_alignment(PHONE_MISSING_GLYPH, self.glyph_anchor(), style, Alignment::Center)
                .draw(target)?;
        }

        self.dirty.background = false;
        Ok(())
    }

    /// Paint the hands surface: hour hand, minute hand, border, day label.
    pub fn draw_hands<D>(&mut self, target: &mut D, reading: &ClockReading) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let a = self.appearance;
        let g = a.geometry;

        // Hour hand
        let theta = trig::hour_angle(reading.hour);
        Line::new(
            trig::point_of_polar(self.center, theta, g.inner_radius),
            trig::point_of_polar(self.center, theta, g.outer_radius),
        )
        .into_styled(PrimitiveStyle::with_stroke(a.hand_color, g.hour_width))
        .draw(target)?;

        // Minute hand, from the center
        let theta = trig::minute_angle(reading.minute);
        Line::new(
            self.center,
            trig::point_of_polar(self.center, theta, g.outer_radius),
        )
        .into_styled(PrimitiveStyle::with_stroke(a.accent_color, g.minute_width))
        .draw(target)?;

        self.draw_border(target)?;

        let style = MonoTextStyle::new(a.font.font(), a.day_text_color);
        Text::with_alignment(reading.day.as_str(), self.day_anchor(), style, a.day_alignment)
            .draw(target)?;

        self.dirty.hands = false;
        Ok(())
    }

    fn draw_border<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let a = &self.appearance;
        let width = a.geometry.border_width;

        match self.shape {
            DisplayShape::Round => {
                // A centered stroke of the full border width leaves the
                // annulus flush with the display edge.
                let diameter = self.bounds.size.width.min(self.bounds.size.height) - width;
                Circle::with_center(self.center, diameter)
                    .into_styled(PrimitiveStyle::with_stroke(a.accent_color, width))
                    .draw(target)?;
            }
            DisplayShape::Rect => {
                // Four strokes tracing the perimeter, each inset by half
                // the border width so the stroke fills out to the edge.
                let hbw = (width / 2) as i32;
                let left = self.bounds.top_left.x + hbw;
                let top = self.bounds.top_left.y + hbw;
                let right = self.bounds.top_left.x + self.bounds.size.width as i32 - hbw;
                let bottom = self.bounds.top_left.y + self.bounds.size.height as i32 - hbw;

                let corners = [
                    Point::new(left, top),
                    Point::new(right, top),
                    Point::new(right, bottom),
                    Point::new(left, bottom),
                ];
                for i in 0..4 {
                    Line::new(corners[i], corners[(i + 1) % 4])
                        .into_styled(PrimitiveStyle::with_stroke(a.accent_color, width))
                        .draw(target)?;
                }
            }
        }
        Ok(())
    }

    /// Day label anchor: near the top-right on rectangular displays,
    /// centered near the top on round ones.
    fn day_anchor(&self) -> Point {
        match self.shape {
            DisplayShape::Round => Point::new(self.center.x, self.bounds.size.height as i32 / 8),
            DisplayShape::Rect => {
                let margin = self.appearance.geometry.border_width as i32 + 4;
                let y = margin + 10;
                match self.appearance.day_alignment {
                    Alignment::Left => Point::new(margin, y),
                    Alignment::Center => Point::new(self.center.x, y),
                    Alignment::Right => {
                        Point::new(self.bounds.size.width as i32 - margin, y)
                    }
                }
            }
        }
    }

    /// Phone glyph anchor: left of center, vertically centered.
    fn glyph_anchor(&self) -> Point {
        Point::new(self.bounds.size.width as i32 / 4, self.center.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ClockReading;
    use chrono::NaiveDate;
    use embedded_graphics::mock_display::MockDisplay;
    use rand_xoshiro::rand_core::SeedableRng;
    use rand_xoshiro::Xoroshiro128StarStar;

    fn mock() -> MockDisplay<Rgb565> {
        let mut display = MockDisplay::new();
        display.set_allow_overdraw(true);
        display.set_allow_out_of_bounds_drawing(true);
        display
    }

    fn face() -> Watchface {
        // MockDisplay is 64x64.
        Watchface::new(Size::new(64, 64), DisplayShape::Rect, ColorSupport::Full)
    }

    fn reading() -> ClockReading {
        ClockReading::from_datetime(
            NaiveDate::from_ymd_opt(2026, 12, 25)
                .unwrap()
                .and_hms_opt(10, 15, 0)
                .unwrap(),
        )
    }

    #[test]
    fn style_switch_is_atomic() {
        let mut face = face();
        let before = *face.appearance();

        face.apply_style(HandStyle::Thin);
        let after = *face.appearance();

        // One call flips geometry, font and alignment together.
        assert_eq!(before.geometry, HandGeometry::BOLD);
        assert_eq!(after.geometry, HandGeometry::THIN);
        assert_ne!(before.font, after.font);
        assert_ne!(before.day_alignment, after.day_alignment);
        // Colors are untouched by a style change.
        assert_eq!(before.face_color, after.face_color);
        assert_eq!(before.accent_color, after.accent_color);
    }

    #[test]
    fn settings_events_dirty_both_surfaces() {
        let mut face = face();
        face.take_dirty();

        face.apply_style(HandStyle::Thin);
        assert_eq!(face.dirty(), DirtyFlags { background: true, hands: true });
        face.take_dirty();

        let mut rng = Xoroshiro128StarStar::seed_from_u64(1);
        face.apply_colors(color::from_hex(0x0000FF), &mut rng);
        assert_eq!(face.dirty(), DirtyFlags { background: true, hands: true });
    }

    #[test]
    fn tick_dirties_only_the_hands() {
        let mut face = face();
        face.take_dirty();
        face.handle_tick();
        assert_eq!(face.dirty(), DirtyFlags { background: false, hands: true });
    }

    #[test]
    fn connectivity_dirties_only_the_background() {
        let mut face = face();
        face.take_dirty();
        face.set_connected(true);
        assert_eq!(face.dirty(), DirtyFlags { background: true, hands: false });
    }

    #[test]
    fn draw_clears_the_dirty_flags() {
        let mut face = face();
        let mut display = mock();
        face.draw_background(&mut display).unwrap();
        face.draw_hands(&mut display, &reading()).unwrap();
        assert_eq!(face.dirty(), DirtyFlags::default());
    }

    #[test]
    fn glyph_appears_only_while_disconnected() {
        let mut face = face();
        face.set_connected(true);
        let mut connected = mock();
        face.draw_background(&mut connected).unwrap();

        face.set_connected(false);
        let mut disconnected = mock();
        face.draw_background(&mut disconnected).unwrap();

        assert!(connected != disconnected);
    }

    #[test]
    fn derived_colors_follow_the_face_color() {
        let mut face = face();
        let mut rng = Xoroshiro128StarStar::seed_from_u64(99);
        let face_color = color::from_hex(0x000000);
        face.apply_colors(face_color, &mut rng);

        let a = *face.appearance();
        assert_ne!(a.accent_color, a.face_color);
        assert_eq!(a.hand_color, color::legible_over(face_color));
        assert_eq!(a.glyph_color, color::legible_over(face_color));
        assert_eq!(a.day_text_color, color::legible_over(a.accent_color));
    }

    #[test]
    fn monochrome_panels_skip_the_random_accent() {
        let mut face = Watchface::new(Size::new(64, 64), DisplayShape::Rect, ColorSupport::Monochrome);
        let mut rng = Xoroshiro128StarStar::seed_from_u64(3);
        let face_color = color::from_hex(0x000000);
        face.apply_colors(face_color, &mut rng);
        assert_eq!(face.appearance().accent_color, color::legible_over(face_color));
    }

    #[test]
    fn round_faces_draw_too() {
        let mut face = Watchface::new(Size::new(64, 64), DisplayShape::Round, ColorSupport::Full);
        let mut display = mock();
        face.draw_background(&mut display).unwrap();
        face.draw_hands(&mut display, &reading()).unwrap();
    }
}
