//! Samples of a zone's observable state at one instant.

use serde::{Deserialize, Serialize};
use zonegen_provider::utils::{self, SECONDS_PER_DAY};
use zonegen_provider::{LocalDateTime, ProviderResult, ZoneOffset, ZoneRules};

/// What a [`Sample`] was taken for.
///
/// Serialized as the single-letter codes that dataset readers expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SampleKind {
    /// One second before a transition that changes the total offset.
    #[serde(rename = "A")]
    TransitionBefore,
    /// The instant of a transition that changes the total offset.
    #[serde(rename = "B")]
    TransitionAfter,
    /// One second before a transition that only changes the DST component.
    #[serde(rename = "a")]
    SilentTransitionBefore,
    /// The instant of a transition that only changes the DST component.
    #[serde(rename = "b")]
    SilentTransitionAfter,
    /// Local midnight on the 2nd of a month.
    #[serde(rename = "S")]
    MonthlySample,
    /// Local midnight on a later day, because the 2nd fell in a gap.
    #[serde(rename = "T")]
    MonthlySampleShifted,
}

impl SampleKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TransitionBefore => "A",
            Self::TransitionAfter => "B",
            Self::SilentTransitionBefore => "a",
            Self::SilentTransitionAfter => "b",
            Self::MonthlySample => "S",
            Self::MonthlySampleShifted => "T",
        }
    }

    /// Returns the before/after kinds for a transition.
    pub const fn transition_pair(total_offset_changed: bool) -> (Self, Self) {
        if total_offset_changed {
            (Self::TransitionBefore, Self::TransitionAfter)
        } else {
            (Self::SilentTransitionBefore, Self::SilentTransitionAfter)
        }
    }

    pub const fn is_silent_transition(self) -> bool {
        matches!(self, Self::SilentTransitionBefore | Self::SilentTransitionAfter)
    }
}

/// The observable state of a zone at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    /// Seconds from the dataset epoch; negative before it.
    pub epoch: i64,
    #[serde(rename = "total_offset")]
    pub utc_offset_seconds: i64,
    #[serde(rename = "dst_offset")]
    pub dst_offset_seconds: i64,
    #[serde(rename = "y")]
    pub year: i32,
    #[serde(rename = "M")]
    pub month: u8,
    #[serde(rename = "d")]
    pub day: u8,
    #[serde(rename = "h")]
    pub hour: u8,
    #[serde(rename = "m")]
    pub minute: u8,
    #[serde(rename = "s")]
    pub second: u8,
    /// Best effort; not validated against any authoritative list.
    #[serde(rename = "abbrev")]
    pub abbreviation: String,
    #[serde(rename = "type")]
    pub kind: SampleKind,
}

impl Sample {
    /// The zone-local wall clock of the sample.
    pub fn local(&self) -> LocalDateTime {
        LocalDateTime {
            year: self.year,
            month: self.month,
            day: self.day,
            hour: self.hour,
            minute: self.minute,
            second: self.second,
        }
    }
}

/// Builds [`Sample`]s with epoch counts relative to January 1st of a chosen year, UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleBuilder {
    /// Unix seconds of the dataset epoch.
    epoch_offset_seconds: i64,
}

impl SampleBuilder {
    pub fn new(epoch_year: i32) -> Self {
        Self {
            epoch_offset_seconds: utils::epoch_days_for_year(epoch_year) * SECONDS_PER_DAY,
        }
    }

    /// The Unix seconds of the dataset epoch.
    pub fn epoch_offset_seconds(&self) -> i64 {
        self.epoch_offset_seconds
    }

    /// Samples `rules` at `epoch_seconds`.
    pub fn build<R: ZoneRules + ?Sized>(
        &self,
        rules: &R,
        epoch_seconds: i64,
        kind: SampleKind,
    ) -> ProviderResult<Sample> {
        let offset = rules.offset_at(epoch_seconds)?;
        Ok(self.build_with_offset(epoch_seconds, &offset, kind))
    }

    /// Builds a sample from an offset already looked up for `epoch_seconds`.
    pub(crate) fn build_with_offset(
        &self,
        epoch_seconds: i64,
        offset: &ZoneOffset,
        kind: SampleKind,
    ) -> Sample {
        let local = LocalDateTime::from_local_seconds(epoch_seconds + offset.utc_offset.0);
        Sample {
            epoch: epoch_seconds - self.epoch_offset_seconds,
            utc_offset_seconds: offset.utc_offset.0,
            dst_offset_seconds: offset.dst_offset.0,
            year: local.year,
            month: local.month,
            day: local.day,
            hour: local.hour,
            minute: local.minute,
            second: local.second,
            abbreviation: offset.abbreviation.clone(),
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use zonegen_provider::{FixedRules, ZoneOffset};

    use super::{SampleBuilder, SampleKind};

    #[test]
    fn epoch_offsets() {
        assert_eq!(SampleBuilder::new(2050).epoch_offset_seconds(), 2_524_608_000);
        assert_eq!(SampleBuilder::new(1970).epoch_offset_seconds(), 0);
        assert_eq!(SampleBuilder::new(2000).epoch_offset_seconds(), 946_684_800);
    }

    #[test]
    fn builds_local_fields() {
        let rules = FixedRules::new(ZoneOffset::new(-28_800, 0, "PST"));
        let builder = SampleBuilder::new(2050);
        // 2000-01-02T08:00:00Z
        let sample = builder
            .build(&rules, 946_800_000, SampleKind::MonthlySample)
            .unwrap();
        assert_eq!(sample.epoch, 946_800_000 - 2_524_608_000);
        assert_eq!(sample.utc_offset_seconds, -28_800);
        assert_eq!(sample.dst_offset_seconds, 0);
        assert_eq!(
            (sample.year, sample.month, sample.day, sample.hour, sample.minute, sample.second),
            (2000, 1, 2, 0, 0, 0)
        );
        assert_eq!(sample.abbreviation, "PST");
    }

    #[test]
    fn serialized_field_names() {
        let rules = FixedRules::new(ZoneOffset::new(3_600, 3_600, "X"));
        let sample = SampleBuilder::new(1970)
            .build(&rules, 0, SampleKind::SilentTransitionAfter)
            .unwrap();
        let json = serde_json::to_string(&sample).unwrap();
        assert_eq!(
            json,
            r#"{"epoch":0,"total_offset":3600,"dst_offset":3600,"y":1970,"M":1,"d":1,"h":1,"m":0,"s":0,"abbrev":"X","type":"b"}"#
        );
    }

    #[test]
    fn kind_tags() {
        let kinds = [
            SampleKind::TransitionBefore,
            SampleKind::TransitionAfter,
            SampleKind::SilentTransitionBefore,
            SampleKind::SilentTransitionAfter,
            SampleKind::MonthlySample,
            SampleKind::MonthlySampleShifted,
        ];
        for kind in kinds {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
        assert_eq!(
            SampleKind::transition_pair(false),
            (SampleKind::SilentTransitionBefore, SampleKind::SilentTransitionAfter)
        );
        assert!(SampleKind::SilentTransitionAfter.is_silent_transition());
        assert!(!SampleKind::TransitionAfter.is_silent_transition());
    }
}
