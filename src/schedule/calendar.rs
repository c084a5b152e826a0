// Calendar helpers.
// Monday-based weekday numbers, "M.d" date text, and Chinese weekday labels.

use chrono::{Datelike, NaiveDate, TimeDelta};

const CN_WEEKDAYS: [&str; 7] = ["一", "二", "三", "四", "五", "六", "日"];

/// Weekday of `date` with Monday = 1 … Sunday = 7.
pub fn monday_based_weekday(date: NaiveDate) -> u32 {
    date.weekday().number_from_monday()
}

/// Date rendered as "M.d" without leading zeros or year.
pub fn date_text(date: NaiveDate) -> String {
    format!("{}.{}", date.month(), date.day())
}

/// Single Chinese numeral for a Monday-based weekday; out of range reads as Monday.
pub fn chinese_weekday(weekday: i64) -> &'static str {
    match weekday {
        1..=7 => CN_WEEKDAYS[(weekday - 1) as usize],
        _ => CN_WEEKDAYS[0],
    }
}

/// Short week label, e.g. "周三".
pub fn week_text(weekday: i64) -> String {
    format!("周{}", chinese_weekday(weekday))
}

/// `date` shifted by a signed number of calendar days.
pub fn shift_days(date: NaiveDate, offset: i32) -> NaiveDate {
    date.checked_add_signed(TimeDelta::days(i64::from(offset)))
        .unwrap_or(date)
}
