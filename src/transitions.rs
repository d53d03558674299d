//! Scanning a zone's transitions.

use zonegen_provider::{LocalDateTime, ProviderResult, ZoneRules};

use crate::sample::{Sample, SampleBuilder, SampleKind};

/// Walks the transitions of a zone and samples each side of every one that
/// changes an observable offset.
#[derive(Debug, Clone, Copy)]
pub struct TransitionScanner<'a> {
    builder: &'a SampleBuilder,
}

impl<'a> TransitionScanner<'a> {
    pub fn new(builder: &'a SampleBuilder) -> Self {
        Self { builder }
    }

    /// Returns a before/after pair of samples for each transition after
    /// `start`, in chronological order.
    ///
    /// Scanning stops at the first transition whose wall clock before the
    /// transition falls in the local year of `until` or later, even when the
    /// transition itself is earlier than `until`.
    pub fn scan<R: ZoneRules + ?Sized>(
        &self,
        rules: &R,
        start: i64,
        until: i64,
    ) -> ProviderResult<Vec<Sample>> {
        let until_year = rules.to_local(until)?.year;

        let mut samples = Vec::new();
        let mut cursor = start;
        while let Some(current) = rules.next_transition(cursor)? {
            let before = current - 1;
            let before_offset = rules.offset_at(before)?;
            let current_offset = rules.offset_at(current)?;

            let date_time_before =
                LocalDateTime::from_local_seconds(current + before_offset.utc_offset.0);
            if date_time_before.year >= until_year {
                break;
            }
            cursor = current;

            if !before_offset.offsets_differ(&current_offset) {
                log::trace!("skipping transition at {current} with unchanged offsets");
                continue;
            }

            let (before_kind, after_kind) =
                SampleKind::transition_pair(before_offset.utc_offset != current_offset.utc_offset);
            samples.push(
                self.builder
                    .build_with_offset(before, &before_offset, before_kind),
            );
            samples.push(
                self.builder
                    .build_with_offset(current, &current_offset, after_kind),
            );
        }
        Ok(samples)
    }
}

#[cfg(test)]
mod tests {
    use zonegen_provider::{FixedRules, ZoneOffset};

    use super::TransitionScanner;
    use crate::sample::{SampleBuilder, SampleKind};

    // 2000-01-01T08:00:00Z and 2001-01-01T08:00:00Z, local midnight at -08:00.
    const START: i64 = 946_713_600;
    const UNTIL: i64 = 978_336_000;
    // 2000-04-02T10:00:00Z and 2000-10-29T09:00:00Z
    const SPRING: i64 = 954_669_600;
    const FALL: i64 = 972_810_000;

    fn pst() -> ZoneOffset {
        ZoneOffset::new(-28_800, 0, "PST")
    }

    fn pdt() -> ZoneOffset {
        ZoneOffset::new(-25_200, 3_600, "PDT")
    }

    fn kinds(samples: &[crate::Sample]) -> Vec<SampleKind> {
        samples.iter().map(|s| s.kind).collect()
    }

    #[test]
    fn hard_transitions() {
        let rules = FixedRules::new(pst())
            .with_transition(SPRING, pdt())
            .with_transition(FALL, pst());
        let builder = SampleBuilder::new(2050);
        let samples = TransitionScanner::new(&builder)
            .scan(&rules, START, UNTIL)
            .unwrap();

        assert_eq!(
            kinds(&samples),
            [
                SampleKind::TransitionBefore,
                SampleKind::TransitionAfter,
                SampleKind::TransitionBefore,
                SampleKind::TransitionAfter,
            ]
        );
        assert_eq!(samples[0].epoch, SPRING - 1 - 2_524_608_000);
        assert_eq!(samples[1].epoch, samples[0].epoch + 1);
        assert_eq!(samples[0].utc_offset_seconds, -28_800);
        assert_eq!(samples[1].utc_offset_seconds, -25_200);
        assert_eq!((samples[0].hour, samples[0].minute, samples[0].second), (1, 59, 59));
        assert_eq!(samples[1].hour, 3);
        assert_eq!(samples[3].epoch, FALL - 2_524_608_000);
        assert_eq!(samples[3].dst_offset_seconds, 0);
    }

    #[test]
    fn phantom_transitions_are_skipped() {
        let rules = FixedRules::new(pst())
            // Only the abbreviation changes.
            .with_transition(SPRING - 86_400, ZoneOffset::new(-28_800, 0, "LMT"))
            .with_transition(SPRING, pdt());
        let builder = SampleBuilder::new(2050);
        let samples = TransitionScanner::new(&builder)
            .scan(&rules, START, UNTIL)
            .unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[1].epoch, SPRING - 2_524_608_000);
    }

    #[test]
    fn silent_transitions() {
        // The standard offset drops by the DST amount as DST begins.
        let rules = FixedRules::new(ZoneOffset::new(3_600, 0, "CET"))
            .with_transition(SPRING, ZoneOffset::new(3_600, 3_600, "GMT"));
        let builder = SampleBuilder::new(2050);
        let samples = TransitionScanner::new(&builder)
            .scan(&rules, START, UNTIL)
            .unwrap();
        assert_eq!(
            kinds(&samples),
            [
                SampleKind::SilentTransitionBefore,
                SampleKind::SilentTransitionAfter
            ]
        );
        assert_eq!(samples[0].utc_offset_seconds, samples[1].utc_offset_seconds);
    }

    #[test]
    fn until_year_is_exclusive() {
        // 2001-01-01T07:30:00Z is 2000-12-31T23:30 local, before the until instant.
        let late = ZoneOffset::new(-25_200, 3_600, "PDT");
        let rules = FixedRules::new(pst())
            .with_transition(UNTIL - 1_800, late)
            // 2001-01-01T09:00:00Z is 2001-01-01T02:00 on the wall clock before it.
            .with_transition(UNTIL + 3_600, pst());
        let builder = SampleBuilder::new(2050);
        let samples = TransitionScanner::new(&builder)
            .scan(&rules, START, UNTIL + 7_200)
            .unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[1].epoch, UNTIL - 1_800 - 2_524_608_000);
    }

    #[test]
    fn no_transitions() {
        let rules = FixedRules::new(ZoneOffset::new(0, 0, "UTC"));
        let builder = SampleBuilder::new(2050);
        let samples = TransitionScanner::new(&builder)
            .scan(&rules, 0, UNTIL)
            .unwrap();
        assert!(samples.is_empty());
    }
}
