//! Comparing a dataset against a baseline.

use core::fmt;
use std::collections::BTreeSet;

use crate::dataset::Dataset;
use crate::sample::Sample;

/// Which list of a zone entry an item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Transitions,
    Samples,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Transitions => "transitions",
            Self::Samples => "samples",
        })
    }
}

/// One way an observed dataset disagrees with the expected one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Difference {
    /// A header year differs.
    Header {
        field: &'static str,
        observed: i32,
        expected: i32,
    },
    /// A zone is only in the expected dataset.
    MissingZone(String),
    /// A zone is only in the observed dataset.
    ExtraZone(String),
    /// A field of a paired item differs.
    Item {
        zone: String,
        section: Section,
        field: &'static str,
        observed_index: usize,
        expected_index: usize,
    },
    /// Items were left over on one side once the other ran out.
    ItemCount {
        zone: String,
        section: Section,
        observed: usize,
        expected: usize,
    },
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Header {
                field,
                observed,
                expected,
            } => write!(f, "{field} different: {observed} != {expected}"),
            Self::MissingZone(zone) => write!(f, "Missing zone compared to expected: {zone}"),
            Self::ExtraZone(zone) => write!(f, "Extra zone compared to expected: {zone}"),
            Self::Item {
                zone,
                section,
                field,
                observed_index,
                expected_index,
            } => write!(
                f,
                "{zone} {section} '{field}': obs[{observed_index}] != exp[{expected_index}]"
            ),
            Self::ItemCount {
                zone,
                section,
                observed,
                expected,
            } => write!(
                f,
                "{zone} {section}: {observed} items compared, {expected} expected"
            ),
        }
    }
}

/// The outcome of [`Dataset::diff`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffReport {
    /// Whether abbreviations were compared.
    pub checks_abbrev: bool,
    /// Whether DST offsets and silent transitions were compared.
    pub checks_dst: bool,
    pub differences: Vec<Difference>,
}

impl DiffReport {
    /// Returns true if nothing differed.
    pub fn is_match(&self) -> bool {
        self.differences.is_empty()
    }
}

impl Dataset {
    /// Compares `self`, the observed dataset, against `expected`.
    ///
    /// DST offsets are compared only when both datasets claim valid DST,
    /// and abbreviations only when both claim valid abbreviations. Without
    /// valid DST, expected silent transitions are skipped, since an
    /// implementation that ignores the DST component cannot see them.
    pub fn diff(&self, expected: &Dataset) -> DiffReport {
        let mut report = DiffReport {
            checks_abbrev: self.has_valid_abbrev && expected.has_valid_abbrev,
            checks_dst: self.has_valid_dst && expected.has_valid_dst,
            differences: Vec::new(),
        };
        if !report.checks_abbrev {
            log::info!("Disabling validation for abbrev");
        }
        if !report.checks_dst {
            log::info!("Disabling validation for DST offset");
        }

        for (field, observed, expected) in [
            ("start_year", self.start_year, expected.start_year),
            ("until_year", self.until_year, expected.until_year),
            ("epoch_year", self.epoch_year, expected.epoch_year),
        ] {
            if observed != expected {
                report.differences.push(Difference::Header {
                    field,
                    observed,
                    expected,
                });
            }
        }

        let observed_zones = self.test_data.keys().collect::<BTreeSet<_>>();
        let expected_zones = expected.test_data.keys().collect::<BTreeSet<_>>();
        report.differences.extend(
            expected_zones
                .difference(&observed_zones)
                .map(|zone| Difference::MissingZone((*zone).clone())),
        );
        report.differences.extend(
            observed_zones
                .difference(&expected_zones)
                .map(|zone| Difference::ExtraZone((*zone).clone())),
        );

        for (zone, observed) in &self.test_data {
            let Some(expected) = expected.test_data.get(zone) else {
                continue;
            };
            report.diff_items(
                zone,
                Section::Transitions,
                &observed.transitions,
                &expected.transitions,
            );
            report.diff_items(zone, Section::Samples, &observed.samples, &expected.samples);
        }
        report
    }
}

impl DiffReport {
    fn diff_items(&mut self, zone: &str, section: Section, observed: &[Sample], expected: &[Sample]) {
        let (mut io, mut ie) = (0, 0);
        while io < observed.len() && ie < expected.len() {
            let (obs, exp) = (&observed[io], &expected[ie]);
            if !self.checks_dst && exp.kind.is_silent_transition() {
                ie += 1;
                continue;
            }

            let fields = [
                ("epoch", obs.epoch == exp.epoch),
                ("total", obs.utc_offset_seconds == exp.utc_offset_seconds),
                (
                    "dst",
                    !self.checks_dst || obs.dst_offset_seconds == exp.dst_offset_seconds,
                ),
                ("y", obs.year == exp.year),
                ("M", obs.month == exp.month),
                ("d", obs.day == exp.day),
                ("h", obs.hour == exp.hour),
                ("m", obs.minute == exp.minute),
                ("s", obs.second == exp.second),
                (
                    "abbrev",
                    !self.checks_abbrev || obs.abbreviation == exp.abbreviation,
                ),
            ];
            for (field, _) in fields.into_iter().filter(|(_, same)| !same) {
                self.differences.push(Difference::Item {
                    zone: zone.to_owned(),
                    section,
                    field,
                    observed_index: io,
                    expected_index: ie,
                });
            }
            io += 1;
            ie += 1;
        }

        if !self.checks_dst {
            while ie < expected.len() && expected[ie].kind.is_silent_transition() {
                ie += 1;
            }
        }
        if io < observed.len() || ie < expected.len() {
            self.differences.push(Difference::ItemCount {
                zone: zone.to_owned(),
                section,
                observed: observed.len(),
                expected: expected.len(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::{Difference, Section};
    use crate::dataset::{Dataset, ZoneTestEntry};
    use crate::sample::{Sample, SampleKind};

    fn sample(epoch: i64, utc: i64, dst: i64, hour: u8, kind: SampleKind) -> Sample {
        Sample {
            epoch,
            utc_offset_seconds: utc,
            dst_offset_seconds: dst,
            year: 2000,
            month: 4,
            day: 2,
            hour,
            minute: 0,
            second: 0,
            abbreviation: String::from("PST"),
            kind,
        }
    }

    fn dataset(transitions: Vec<Sample>) -> Dataset {
        let samples = vec![sample(100, -28_800, 0, 0, SampleKind::MonthlySample)];
        Dataset {
            start_year: 2000,
            until_year: 2001,
            epoch_year: 2050,
            source: String::from("test"),
            version: String::from("0"),
            tz_version: String::from("unknown"),
            has_valid_abbrev: false,
            has_valid_dst: true,
            test_data: BTreeMap::from([(
                String::from("Test/Zone"),
                ZoneTestEntry {
                    transitions,
                    samples,
                },
            )]),
        }
    }

    fn silent_pair() -> [Sample; 2] {
        [
            sample(10, 7_200, 3_600, 1, SampleKind::SilentTransitionBefore),
            sample(11, 7_200, 0, 2, SampleKind::SilentTransitionAfter),
        ]
    }

    #[test]
    fn identical_datasets_match() {
        let data = dataset(silent_pair().to_vec());
        let report = data.diff(&data.clone());
        assert!(report.is_match());
        assert!(report.checks_dst);
        assert!(!report.checks_abbrev);
    }

    #[test]
    fn header_and_zone_differences() {
        let observed = dataset(Vec::new());
        let mut expected = observed.clone();
        expected.epoch_year = 2000;
        let entry = expected.test_data.remove("Test/Zone").unwrap();
        expected.test_data.insert(String::from("Test/Other"), entry);

        let report = observed.diff(&expected);
        assert_eq!(
            report.differences,
            [
                Difference::Header {
                    field: "epoch_year",
                    observed: 2050,
                    expected: 2000
                },
                Difference::MissingZone(String::from("Test/Other")),
                Difference::ExtraZone(String::from("Test/Zone")),
            ]
        );
        assert_eq!(
            report.differences[0].to_string(),
            "epoch_year different: 2050 != 2000"
        );
    }

    #[test]
    fn item_fields_are_reported_by_index() {
        let observed = dataset(silent_pair().to_vec());
        let mut expected = observed.clone();
        let exp = &mut expected.test_data.get_mut("Test/Zone").unwrap().transitions[1];
        exp.dst_offset_seconds = 1_800;
        exp.hour = 3;
        exp.abbreviation = String::from("XXX");

        let report = observed.diff(&expected);
        let item = |field| Difference::Item {
            zone: String::from("Test/Zone"),
            section: Section::Transitions,
            field,
            observed_index: 1,
            expected_index: 1,
        };
        assert_eq!(report.differences, [item("dst"), item("h")]);
        assert_eq!(
            report.differences[1].to_string(),
            "Test/Zone transitions 'h': obs[1] != exp[1]"
        );
    }

    #[test]
    fn untrusted_dst_skips_expected_silent_transitions() {
        let hard = [
            sample(20, -28_800, 0, 1, SampleKind::TransitionBefore),
            sample(21, -25_200, 3_600, 3, SampleKind::TransitionAfter),
        ];
        let mut observed = dataset(hard.to_vec());
        observed.has_valid_dst = false;
        let mut with_silent = silent_pair().to_vec();
        with_silent.extend(hard.iter().cloned());
        with_silent.extend(silent_pair());
        let expected = dataset(with_silent);

        let report = observed.diff(&expected);
        assert!(!report.checks_dst);
        assert!(report.is_match(), "{:?}", report.differences);

        observed.has_valid_dst = true;
        assert!(!observed.diff(&expected).is_match());
    }

    #[test]
    fn leftover_items_are_reported() {
        let observed = dataset(silent_pair()[..1].to_vec());
        let expected = dataset(silent_pair().to_vec());
        assert_eq!(
            observed.diff(&expected).differences,
            [Difference::ItemCount {
                zone: String::from("Test/Zone"),
                section: Section::Transitions,
                observed: 1,
                expected: 2,
            }]
        );
    }
}
