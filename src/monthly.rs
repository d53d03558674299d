//! One sample per calendar month.

use zonegen_provider::{LocalDateTime, ProviderResult, ZoneRules};

use crate::sample::{Sample, SampleBuilder, SampleKind};

// The 1st is never sampled. In some zones local midnight on January 1st of
// the first year lands before the epoch of a year-aligned reader, which then
// decodes it into the previous year.
const FIRST_SAMPLE_DAY: u8 = 2;
const LAST_SAMPLE_DAY: u8 = 28;

/// Samples local midnight once a month.
#[derive(Debug, Clone, Copy)]
pub struct MonthlySampler<'a> {
    builder: &'a SampleBuilder,
}

impl<'a> MonthlySampler<'a> {
    pub fn new(builder: &'a SampleBuilder) -> Self {
        Self { builder }
    }

    /// Returns one sample per month from the local year of `start` up to,
    /// but excluding, the local year of `until`.
    ///
    /// Months where no midnight between the 2nd and the 28th exists are left out.
    pub fn sample<R: ZoneRules + ?Sized>(
        &self,
        rules: &R,
        start: i64,
        until: i64,
    ) -> ProviderResult<Vec<Sample>> {
        let start_year = rules.to_local(start)?.year;
        let until_year = rules.to_local(until)?.year;

        let mut samples = Vec::new();
        for year in start_year..until_year {
            for month in 1..=12 {
                match self.sample_month(rules, year, month)? {
                    Some(sample) => samples.push(sample),
                    None => log::debug!("no valid midnight in {year:04}-{month:02}, skipping"),
                }
            }
        }
        Ok(samples)
    }

    /// Samples the first midnight of the month, from the 2nd on, that survives
    /// a round trip through the zone.
    fn sample_month<R: ZoneRules + ?Sized>(
        &self,
        rules: &R,
        year: i32,
        month: u8,
    ) -> ProviderResult<Option<Sample>> {
        for day in FIRST_SAMPLE_DAY..=LAST_SAMPLE_DAY {
            let midnight = LocalDateTime::midnight(year, month, day)?;
            let instant = rules.resolve_local(midnight)?;
            // A midnight in a gap resolves to a later wall clock.
            if rules.to_local(instant)? != midnight {
                continue;
            }
            let kind = if day == FIRST_SAMPLE_DAY {
                SampleKind::MonthlySample
            } else {
                SampleKind::MonthlySampleShifted
            };
            return self.builder.build(rules, instant, kind).map(Some);
        }
        Ok(None)
    }
}
