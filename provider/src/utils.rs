//! Utility date and time equations shared by the rules providers.

pub mod neri_schneider;

pub use neri_schneider::{epoch_days_from_gregorian_date, ymd_from_epoch_days};

pub const SECONDS_PER_MINUTE: i64 = 60;
pub const SECONDS_PER_HOUR: i64 = 3_600;
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Returns whether `year` is a leap year in the proleptic Gregorian calendar.
#[inline]
pub const fn is_leap(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Returns the number of days in the given month.
pub const fn iso_days_in_month(year: i32, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        _ if is_leap(year) => 29,
        _ => 28,
    }
}

/// Returns the number of days in the year before the first day of `month`.
pub const fn days_before_month(month: u8, is_leap: bool) -> u16 {
    let days = match month {
        1 => 0,
        2 => 31,
        3 => 59,
        4 => 90,
        5 => 120,
        6 => 151,
        7 => 181,
        8 => 212,
        9 => 243,
        10 => 273,
        11 => 304,
        _ => 334,
    };
    if is_leap && month > 2 {
        days + 1
    } else {
        days
    }
}

/// Returns the days since the Unix epoch of January 1st of `year`.
#[inline]
pub const fn epoch_days_for_year(year: i32) -> i64 {
    epoch_days_from_gregorian_date(year, 1, 1)
}

/// Returns the day of the week for days since the Unix epoch, with Sunday as 0.
#[inline]
pub const fn day_of_week(epoch_days: i64) -> u8 {
    // 1970-01-01 was a Thursday
    (epoch_days + 4).rem_euclid(7) as u8
}

/// Returns the gregorian year that the epoch seconds fall in.
#[inline]
pub const fn epoch_seconds_to_year(seconds: i64) -> i32 {
    ymd_from_epoch_days(seconds.div_euclid(SECONDS_PER_DAY)).0
}
