//! Fixed-point polar geometry for hand placement.
//!
//! Angles use a 16-bit fixed-point unit where [`ANGLE_MAX`] is one full
//! turn. Angle 0 points straight up and angles increase clockwise, so the
//! watch hands sweep the way a clock reads.

use embedded_graphics::geometry::Point;

/// One full turn.
pub const ANGLE_MAX: i32 = 0x10000;

/// Angle of the hour hand.
///
/// Uses the truncated hour only; the hand does not creep with the minutes.
pub fn hour_angle(hour: u32) -> i32 {
    ANGLE_MAX * ((hour % 12) as i32) / 12
}

/// Angle of the minute hand.
pub fn minute_angle(minute: u32) -> i32 {
    ANGLE_MAX * (minute as i32) / 60
}

/// Point at polar radius `r` from `center`, at angle `theta`.
pub fn point_of_polar(center: Point, theta: i32, r: i32) -> Point {
    let rad = theta as f32 / ANGLE_MAX as f32 * core::f32::consts::TAU;
    Point::new(
        center.x + libm::roundf(libm::sinf(rad) * r as f32) as i32,
        center.y - libm::roundf(libm::cosf(rad) * r as f32) as i32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hour_angle_steps_are_thirty_degrees() {
        // 30 degrees is a twelfth of a turn.
        assert_eq!(hour_angle(0), 0);
        assert_eq!(hour_angle(3), ANGLE_MAX / 4);
        assert_eq!(hour_angle(6), ANGLE_MAX / 2);
        assert_eq!(hour_angle(9), 3 * ANGLE_MAX / 4);
    }

    #[test]
    fn hour_angle_wraps_at_twelve() {
        for hour in 0..12 {
            assert_eq!(hour_angle(hour), hour_angle(hour + 12));
        }
        assert_eq!(hour_angle(12), 0);
        assert_eq!(hour_angle(23), hour_angle(11));
    }

    #[test]
    fn minute_angle_steps_are_six_degrees() {
        assert_eq!(minute_angle(0), 0);
        assert_eq!(minute_angle(15), ANGLE_MAX / 4);
        assert_eq!(minute_angle(30), ANGLE_MAX / 2);
        assert_eq!(minute_angle(45), 3 * ANGLE_MAX / 4);
        for minute in 0..59 {
            assert!(minute_angle(minute) < minute_angle(minute + 1));
        }
    }

    #[test]
    fn polar_points_hit_the_cardinal_directions() {
        let center = Point::new(120, 120);
        let r = 100;
        assert_eq!(point_of_polar(center, 0, r), Point::new(120, 20));
        assert_eq!(point_of_polar(center, ANGLE_MAX / 4, r), Point::new(220, 120));
        assert_eq!(point_of_polar(center, ANGLE_MAX / 2, r), Point::new(120, 220));
        assert_eq!(point_of_polar(center, 3 * ANGLE_MAX / 4, r), Point::new(20, 120));
    }

    #[test]
    fn polar_zero_radius_stays_at_center() {
        let center = Point::new(72, 84);
        for theta in [0, 1234, ANGLE_MAX / 3, ANGLE_MAX - 1] {
            assert_eq!(point_of_polar(center, theta, 0), center);
        }
    }
}
