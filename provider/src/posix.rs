//! Evaluation of the POSIX TZ string that closes a TZif file.

use tzif::data::posix::{PosixTzString, TransitionDate, TransitionDay};

use crate::provider::{UtcOffsetSeconds, ZoneOffset};
use crate::utils::{self, SECONDS_PER_DAY};

/// The recurring rule described by a POSIX TZ string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PosixRules {
    std: ZoneOffset,
    dst: Option<PosixDstRule>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PosixDstRule {
    offset: ZoneOffset,
    start: TransitionDate,
    end: TransitionDate,
}

/// The two DST boundaries of a single year, as epoch seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DstBoundsForYear {
    start: i64,
    end: i64,
}

impl From<&PosixTzString> for PosixRules {
    fn from(value: &PosixTzString) -> Self {
        // POSIX offsets are the seconds to add to local time to reach UTC.
        let std_utc_offset = UtcOffsetSeconds(-value.std_info.offset.0);
        let std = ZoneOffset {
            utc_offset: std_utc_offset,
            dst_offset: UtcOffsetSeconds(0),
            abbreviation: value.std_info.name.clone(),
        };
        let dst = value.dst_info.as_ref().map(|info| {
            let utc_offset = UtcOffsetSeconds(-info.variant_info.offset.0);
            PosixDstRule {
                offset: ZoneOffset {
                    utc_offset,
                    dst_offset: UtcOffsetSeconds(utc_offset.0 - std_utc_offset.0),
                    abbreviation: info.variant_info.name.clone(),
                },
                start: info.start_date,
                end: info.end_date,
            }
        });
        Self { std, dst }
    }
}

impl PosixRules {
    /// The standard-time offset of the rule.
    pub fn std_offset(&self) -> &ZoneOffset {
        &self.std
    }

    /// Returns the offset in effect at `epoch_seconds`.
    pub fn offset_at(&self, epoch_seconds: i64) -> &ZoneOffset {
        let Some(dst) = &self.dst else {
            return &self.std;
        };
        let year = utils::epoch_seconds_to_year(epoch_seconds + self.std.utc_offset.0);
        let bounds = self.bounds_for_year(dst, year);
        let in_dst = if bounds.start <= bounds.end {
            bounds.start <= epoch_seconds && epoch_seconds < bounds.end
        } else {
            // Southern hemisphere: DST spans the turn of the year.
            epoch_seconds < bounds.end || bounds.start <= epoch_seconds
        };
        if in_dst {
            &dst.offset
        } else {
            &self.std
        }
    }

    /// Returns the first rule transition strictly after `epoch_seconds`.
    pub fn next_transition(&self, epoch_seconds: i64) -> Option<i64> {
        let dst = self.dst.as_ref()?;
        let year = utils::epoch_seconds_to_year(epoch_seconds + self.std.utc_offset.0);
        (year - 1..=year + 1)
            .flat_map(|y| {
                let bounds = self.bounds_for_year(dst, y);
                [bounds.start, bounds.end]
            })
            .filter(|t| *t > epoch_seconds)
            .min()
    }

    fn bounds_for_year(&self, dst: &PosixDstRule, year: i32) -> DstBoundsForYear {
        DstBoundsForYear {
            // The start is given in standard time, the end in daylight time.
            start: transition_seconds_for_year(year, dst.start, self.std.utc_offset),
            end: transition_seconds_for_year(year, dst.end, dst.offset.utc_offset),
        }
    }
}

/// Returns the epoch seconds of `date` in `year`, where `date` is a wall
/// clock reading at `offset`.
fn transition_seconds_for_year(year: i32, date: TransitionDate, offset: UtcOffsetSeconds) -> i64 {
    let year_epoch_seconds = utils::epoch_days_for_year(year) * SECONDS_PER_DAY;
    let is_leap = utils::is_leap(year);

    // Zero-indexed day of the year.
    let days = match date.day {
        TransitionDay::NoLeap(day) if day > 59 => day - 1 + u16::from(is_leap),
        TransitionDay::NoLeap(day) => day.saturating_sub(1),
        TransitionDay::WithLeap(day) => day,
        TransitionDay::Mwd(month, week, weekday) => {
            let month = month.clamp(1, 12) as u8;
            let days_to_month = utils::days_before_month(month, is_leap);
            let days_in_month = u16::from(utils::iso_days_in_month(year, month));
            let epoch_days = utils::epoch_days_for_year(year) + i64::from(days_to_month);
            // Weekday of the first of the month.
            let first = u16::from(utils::day_of_week(epoch_days));

            // Zero-indexed day of the month.
            let mut day_of_month = (week - u16::from(first <= weekday)) * 7 + weekday - first;
            // Week 5 means the last such weekday of the month.
            if day_of_month >= days_in_month {
                day_of_month -= 7;
            }
            days_to_month + day_of_month
        }
    };

    year_epoch_seconds + i64::from(days) * SECONDS_PER_DAY + date.time.0 - offset.0
}

#[cfg(test)]
mod tests {
    use super::PosixRules;
    use crate::utils::{self, SECONDS_PER_DAY};

    fn rules(s: &str) -> PosixRules {
        PosixRules::from(&tzif::parse_posix_tz_string(s.as_bytes()).unwrap())
    }

    /// The local dates on which DST starts and ends in `year`.
    fn dst_dates(rules: &PosixRules, year: i32) -> [(i32, u8, u8); 2] {
        let local_date = |t: i64| {
            let offset = rules.offset_at(t - 1).utc_offset.0;
            utils::ymd_from_epoch_days((t + offset).div_euclid(SECONDS_PER_DAY))
        };
        let year_start = utils::epoch_days_for_year(year) * SECONDS_PER_DAY;
        let start = rules.next_transition(year_start - 1).unwrap();
        let end = rules.next_transition(start).unwrap();
        [local_date(start), local_date(end)]
    }

    #[test]
    fn northern_hemisphere() {
        let la = rules("PST8PDT,M3.2.0,M11.1.0");
        // 2024-01-01T00:00:00Z
        assert_eq!(la.next_transition(1_704_067_200), Some(1_710_064_800));
        assert_eq!(la.next_transition(1_710_064_800), Some(1_730_624_400));

        let before = la.offset_at(1_710_064_799);
        assert_eq!(before.utc_offset.0, -28_800);
        assert_eq!(before.dst_offset.0, 0);
        assert_eq!(before.abbreviation, "PST");

        let after = la.offset_at(1_710_064_800);
        assert_eq!(after.utc_offset.0, -25_200);
        assert_eq!(after.dst_offset.0, 3_600);
        assert_eq!(after.abbreviation, "PDT");

        assert_eq!(la.offset_at(1_730_624_400).abbreviation, "PST");
    }

    #[test]
    fn southern_hemisphere() {
        let sydney = rules("AEST-10AEDT,M10.1.0,M4.1.0/3");
        // 2024-01-01T00:00:00Z
        assert_eq!(sydney.offset_at(1_704_067_200).abbreviation, "AEDT");
        assert_eq!(sydney.next_transition(1_704_067_200), Some(1_712_419_200));
        assert_eq!(sydney.next_transition(1_712_419_200), Some(1_728_144_000));

        assert_eq!(sydney.offset_at(1_712_419_199).utc_offset.0, 39_600);
        assert_eq!(sydney.offset_at(1_712_419_200).utc_offset.0, 36_000);
        assert_eq!(sydney.offset_at(1_728_144_000).dst_offset.0, 3_600);
    }

    #[test]
    fn quoted_names_and_midnight_rules() {
        let santiago = rules("<-04>4<-03>,M9.1.6/24,M4.1.6/24");
        assert_eq!(santiago.std_offset().abbreviation, "-04");
        // 2029-09-01T00:00:00Z; the first Saturday of September is the 1st.
        let next = santiago.next_transition(1_882_915_200).unwrap();
        // 2029-09-02T04:00:00Z
        assert_eq!(next, 1_883_016_000);
        assert_eq!(santiago.offset_at(next).utc_offset.0, -10_800);
    }

    #[test]
    fn julian_days_skip_february_29th() {
        let julian = rules("AAA0BBB,J60/0,J300/0");
        assert_eq!(dst_dates(&julian, 2023), [(2023, 3, 1), (2023, 10, 27)]);
        assert_eq!(dst_dates(&julian, 2024), [(2024, 3, 1), (2024, 10, 27)]);
        assert_eq!(julian.offset_at(1_709_251_200).abbreviation, "BBB");
        assert_eq!(julian.offset_at(1_709_251_199).abbreviation, "AAA");
    }

    #[test]
    fn zero_based_days_count_february_29th() {
        let zero_based = rules("AAA0BBB,59/0,300/0");
        assert_eq!(dst_dates(&zero_based, 2023), [(2023, 3, 1), (2023, 10, 28)]);
        assert_eq!(dst_dates(&zero_based, 2024), [(2024, 2, 29), (2024, 10, 27)]);
        // 2024-02-29T00:00:00Z
        assert_eq!(zero_based.offset_at(1_709_164_800).dst_offset.0, 3_600);
    }

    #[test]
    fn without_dst() {
        let utc = rules("UTC0");
        assert_eq!(utc.next_transition(0), None);
        assert_eq!(utc.offset_at(0).utc_offset.0, 0);
    }
}
