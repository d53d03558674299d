//! Gregorian Date Calculations
//!
//! This module contains the logic for Gregorian Date Calculations based
//! off Cassio Neri and Lorenz Schneider's paper, [Euclidean affine functions
//! and their application to calendar algorithms][eaf-calendar-algorithms].
//!
//! ## General Usage Note
//!
//! Unless specified, Rata Die refers to the computational rata die as referenced
//! in the paper, i.e. days counted from March 1st of year 0 of the shifted
//! calendar.
//!
//! ## Shift window
//!
//! The equations only hold for non-negative computational years, so dates
//! are moved forward by a whole number of 400 year cycles before computing.
//! We use the shift of 3670 cycles recommended by Cassio Neri, which places
//! the Unix epoch near the center of the supported range and comfortably
//! covers every year a zoneinfo transition can be expressed in.
//!
//! [eaf-calendar-algorithms]: https://onlinelibrary.wiley.com/doi/full/10.1002/spe.3172

pub const EPOCH_COMPUTATIONAL_RATA_DIE: i64 = 719_468;
pub const DAYS_IN_A_400Y_CYCLE: i64 = 146_097;

const SHIFT_CONSTANT: i64 = 3670;
const YEAR_SHIFT: i64 = 400 * SHIFT_CONSTANT;
const DAY_SHIFT: i64 = DAYS_IN_A_400Y_CYCLE * SHIFT_CONSTANT + EPOCH_COMPUTATIONAL_RATA_DIE;

/// Calculate the days since the Unix epoch for a gregorian date.
pub const fn epoch_days_from_gregorian_date(year: i32, month: u8, day: u8) -> i64 {
    let (comp_year, comp_month, comp_day, century) = rata_die_first_equations(year, month, day);
    let y_star = 1461 * comp_year / 4 - century + century / 4;
    let m_star = (979 * comp_month - 2919) / 32;
    y_star + m_star + comp_day - DAY_SHIFT
}

// Returns Y, M, D, C
const fn rata_die_first_equations(year: i32, month: u8, day: u8) -> (i64, i64, i64, i64) {
    let j = (month <= 2) as i64;
    let computational_year = year as i64 + YEAR_SHIFT - j;
    let computational_month = month as i64 + 12 * j;
    let computational_day = day as i64 - 1;
    (
        computational_year,
        computational_month,
        computational_day,
        computational_year / 100,
    )
}

/// Calculate the gregorian year, month, and day for days since the Unix epoch.
pub const fn ymd_from_epoch_days(epoch_days: i64) -> (i32, u8, u8) {
    let rata_die = epoch_days + DAY_SHIFT;

    // Century and day of century
    let n_one = 4 * rata_die + 3;
    let century = n_one / DAYS_IN_A_400Y_CYCLE;
    let day_of_century = n_one % DAYS_IN_A_400Y_CYCLE / 4;

    // Year of century and day of the computational year
    let n_two = 4 * day_of_century + 3;
    let year_of_century = n_two / 1461;
    let day_of_year = n_two % 1461 / 4;

    // Month and day of the computational year
    let n_three = 2141 * day_of_year + 197_913;
    let computational_month = n_three / 65_536;
    let computational_day = n_three % 65_536 / 2141;

    // Shift back from the March based computational calendar
    let j = (day_of_year >= 306) as i64;
    let year = 100 * century + year_of_century + j - YEAR_SHIFT;
    let month = computational_month - 12 * j;
    (year as i32, month as u8, computational_day as u8 + 1)
}
