//! Clock snapshots for the redraw pass.

use chrono::{Datelike, NaiveDateTime, Timelike};
use core::fmt::Write;
use heapless::String;

/// Day label buffer, comfortably fits `"25 Dec"`.
pub const DAY_LABEL_LEN: usize = 8;

/// Transient snapshot of the wall clock, recomputed on every redraw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockReading {
    /// Hour of day, 0-23.
    pub hour: u32,
    /// Minute of hour, 0-59.
    pub minute: u32,
    /// Formatted day label, e.g. `"5 Jan"` or `"25 Dec"`.
    pub day: String<DAY_LABEL_LEN>,
}

impl ClockReading {
    pub fn from_datetime(time: NaiveDateTime) -> Self {
        Self {
            hour: time.hour(),
            minute: time.minute(),
            day: day_label(time),
        }
    }
}

fn month_abbrev(month0: u32) -> &'static str {
    match month0 {
        0 => "Jan",
        1 => "Feb",
        2 => "Mar",
        3 => "Apr",
        4 => "May",
        5 => "Jun",
        6 => "Jul",
        7 => "Aug",
        8 => "Sep",
        9 => "Oct",
        10 => "Nov",
        11 => "Dec",
        _ => "",
    }
}

/// Format `"%d %b"` and strip a single leading `'0'`.
pub fn day_label(time: NaiveDateTime) -> String<DAY_LABEL_LEN> {
    let mut label: String<DAY_LABEL_LEN> = String::new();
    let _ = write!(label, "{:02} {}", time.day(), month_abbrev(time.month0()));

    if label.starts_with('0') {
        let mut stripped: String<DAY_LABEL_LEN> = String::new();
        let _ = stripped.push_str(&label[1..]);
        return stripped;
    }
    label
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(year: i32, month: u32, day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(9, 41, 0)
            .unwrap()
    }

    #[test]
    fn day_label_strips_a_single_leading_zero() {
        assert_eq!(day_label(at(2026, 1, 5)).as_str(), "5 Jan");
        assert_eq!(day_label(at(2026, 12, 25)).as_str(), "25 Dec");
        // First char is '1', nothing to strip.
        assert_eq!(day_label(at(2026, 10, 10)).as_str(), "10 Oct");
    }

    #[test]
    fn day_label_covers_every_month() {
        let expected = [
            "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
        ];
        for (month0, abbrev) in expected.iter().enumerate() {
            let label = day_label(at(2026, month0 as u32 + 1, 14));
            assert_eq!(&label[3..], *abbrev);
            assert_eq!(&label[..3], "14 ");
        }
    }

    #[test]
    fn reading_snapshots_hour_and_minute() {
        let reading = ClockReading::from_datetime(at(2026, 8, 29));
        assert_eq!(reading.hour, 9);
        assert_eq!(reading.minute, 41);
        assert_eq!(reading.day.as_str(), "29 Aug");
    }
}
