//! The `ZoneRules` and `RulesProvider` traits.

use core::fmt;

use crate::utils::{self, SECONDS_PER_DAY, SECONDS_PER_HOUR, SECONDS_PER_MINUTE};
use crate::ProviderError;

pub type ProviderResult<T> = Result<T, ProviderError>;

/// `UtcOffsetSeconds` represents the amount of seconds we need to add to the UTC to reach the local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct UtcOffsetSeconds(pub i64);

impl fmt::Display for UtcOffsetSeconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { '-' } else { '+' };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{:02}:{:02}", abs / 3600, abs % 3600 / 60)?;
        if abs % 60 != 0 {
            write!(f, ":{:02}", abs % 60)?;
        }
        Ok(())
    }
}

/// A wall-clock reading in some zone, without any offset attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocalDateTime {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl LocalDateTime {
    /// Creates a new `LocalDateTime`, rejecting fields outside the ISO calendar.
    pub fn new(
        year: i32,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
    ) -> ProviderResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(ProviderError::Range("month must be in 1..=12"));
        }
        if day == 0 || day > utils::iso_days_in_month(year, month) {
            return Err(ProviderError::Range("day is not valid for the month"));
        }
        if hour > 23 || minute > 59 || second > 59 {
            return Err(ProviderError::Range("time fields are out of range"));
        }
        Ok(Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        })
    }

    /// Midnight at the start of the given day.
    pub fn midnight(year: i32, month: u8, day: u8) -> ProviderResult<Self> {
        Self::new(year, month, day, 0, 0, 0)
    }

    /// Decomposes seconds since 1970-01-01T00:00:00 of a local wall clock.
    pub fn from_local_seconds(local_seconds: i64) -> Self {
        let days = local_seconds.div_euclid(SECONDS_PER_DAY);
        let seconds_in_day = local_seconds.rem_euclid(SECONDS_PER_DAY);
        let (year, month, day) = utils::ymd_from_epoch_days(days);
        Self {
            year,
            month,
            day,
            hour: (seconds_in_day / SECONDS_PER_HOUR) as u8,
            minute: (seconds_in_day % SECONDS_PER_HOUR / SECONDS_PER_MINUTE) as u8,
            second: (seconds_in_day % SECONDS_PER_MINUTE) as u8,
        }
    }

    /// Returns the seconds since 1970-01-01T00:00:00 as if this wall clock were UTC.
    pub fn to_local_seconds(&self) -> i64 {
        let days = utils::epoch_days_from_gregorian_date(self.year, self.month, self.day);
        days * SECONDS_PER_DAY
            + i64::from(self.hour) * SECONDS_PER_HOUR
            + i64::from(self.minute) * SECONDS_PER_MINUTE
            + i64::from(self.second)
    }
}

impl fmt::Display for LocalDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

/// The observable state of a zone at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneOffset {
    /// The total offset from UTC, standard plus DST.
    pub utc_offset: UtcOffsetSeconds,
    /// The DST component of `utc_offset`; zero in standard time.
    pub dst_offset: UtcOffsetSeconds,
    /// A short display name for the offset, e.g. "PDT".
    pub abbreviation: String,
}

impl ZoneOffset {
    pub fn new(utc_offset: i64, dst_offset: i64, abbreviation: &str) -> Self {
        Self {
            utc_offset: UtcOffsetSeconds(utc_offset),
            dst_offset: UtcOffsetSeconds(dst_offset),
            abbreviation: abbreviation.to_owned(),
        }
    }

    /// Returns whether the observable offsets differ, ignoring the abbreviation.
    pub fn offsets_differ(&self, other: &Self) -> bool {
        self.utc_offset != other.utc_offset || self.dst_offset != other.dst_offset
    }
}

/// The offset history of one resolved zone.
///
/// Instants are seconds since the Unix epoch.
pub trait ZoneRules {
    /// Returns the offsets in effect at `epoch_seconds`.
    fn offset_at(&self, epoch_seconds: i64) -> ProviderResult<ZoneOffset>;

    /// Returns the first transition strictly after `epoch_seconds`.
    ///
    /// Implementations may report transitions that do not change any
    /// offset; callers are expected to filter them.
    fn next_transition(&self, epoch_seconds: i64) -> ProviderResult<Option<i64>>;

    /// Decomposes `epoch_seconds` into the wall-clock reading of this zone.
    fn to_local(&self, epoch_seconds: i64) -> ProviderResult<LocalDateTime> {
        let offset = self.offset_at(epoch_seconds)?;
        Ok(LocalDateTime::from_local_seconds(
            epoch_seconds + offset.utc_offset.0,
        ))
    }

    /// Composes a wall-clock reading into an instant.
    ///
    /// Ambiguous readings resolve to the earlier instant. Readings that fall
    /// into a gap are interpreted with the offset in effect before the gap,
    /// which moves them forward by the length of the gap.
    fn resolve_local(&self, local: LocalDateTime) -> ProviderResult<i64> {
        let local_seconds = local.to_local_seconds();
        // NOTE: assumes transitions are at least a day apart.
        let before = self.offset_at(local_seconds - SECONDS_PER_DAY)?.utc_offset;
        let after = self.offset_at(local_seconds + SECONDS_PER_DAY)?.utc_offset;

        let mut resolved: Option<i64> = None;
        for candidate in [before, after] {
            let epoch_seconds = local_seconds - candidate.0;
            if self.offset_at(epoch_seconds)?.utc_offset == candidate {
                resolved = Some(resolved.map_or(epoch_seconds, |r| r.min(epoch_seconds)));
            }
        }
        Ok(resolved.unwrap_or(local_seconds - before.0))
    }
}

/// A source of zone rules.
pub trait RulesProvider {
    type Rules: ZoneRules;

    /// Resolves a zone identifier, e.g. "America/Los_Angeles".
    fn resolve(&self, identifier: &str) -> ProviderResult<Self::Rules>;

    /// A short name for where the rules come from.
    fn source(&self) -> &str;

    /// The version of the time zone database, if known.
    fn tz_version(&self) -> Option<&str>;

    /// All identifiers this provider can resolve, sorted.
    fn available_identifiers(&self) -> ProviderResult<Vec<String>>;
}

impl<P: RulesProvider + ?Sized> RulesProvider for &P {
    type Rules = P::Rules;

    fn resolve(&self, identifier: &str) -> ProviderResult<Self::Rules> {
        (**self).resolve(identifier)
    }

    fn source(&self) -> &str {
        (**self).source()
    }

    fn tz_version(&self) -> Option<&str> {
        (**self).tz_version()
    }

    fn available_identifiers(&self) -> ProviderResult<Vec<String>> {
        (**self).available_identifiers()
    }
}

/// Rejects identifiers that could escape a zoneinfo directory.
pub(crate) fn check_identifier(identifier: &str) -> ProviderResult<()> {
    // Protect from path traversal attacks
    if identifier.is_empty() || identifier.starts_with('/') || identifier.contains('.') {
        return Err(ProviderError::IllformedIdentifier);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{LocalDateTime, UtcOffsetSeconds};

    #[test]
    fn local_seconds_round_trip() {
        let local = LocalDateTime::new(2000, 4, 2, 1, 59, 59).unwrap();
        assert_eq!(local.to_local_seconds(), 954_640_799);
        assert_eq!(LocalDateTime::from_local_seconds(954_640_799), local);

        let before_epoch = LocalDateTime::from_local_seconds(-1);
        assert_eq!(
            before_epoch,
            LocalDateTime::new(1969, 12, 31, 23, 59, 59).unwrap()
        );
    }

    #[test]
    fn rejects_invalid_fields() {
        assert!(LocalDateTime::new(2023, 2, 29, 0, 0, 0).is_err());
        assert!(LocalDateTime::new(2024, 13, 1, 0, 0, 0).is_err());
        assert!(LocalDateTime::new(2024, 1, 1, 24, 0, 0).is_err());
        assert!(LocalDateTime::midnight(2024, 2, 29).is_ok());
    }

    #[test]
    fn offset_display() {
        assert_eq!(UtcOffsetSeconds(-28_800).to_string(), "-08:00");
        assert_eq!(UtcOffsetSeconds(19_800).to_string(), "+05:30");
        assert_eq!(UtcOffsetSeconds(-1_172).to_string(), "-00:19:32");
    }
}
