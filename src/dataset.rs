//! Assembling the dataset for a list of zones.

use std::collections::BTreeMap;
use std::io::Write;

use serde::{Deserialize, Serialize};
use zonegen_provider::{LocalDateTime, ProviderResult, RulesProvider, ZoneRules};

use crate::monthly::MonthlySampler;
use crate::sample::{Sample, SampleBuilder};
use crate::transitions::TransitionScanner;
use crate::{GeneratorError, GeneratorResult};

pub const DEFAULT_START_YEAR: i32 = 2000;
pub const DEFAULT_UNTIL_YEAR: i32 = 2100;
pub const DEFAULT_EPOCH_YEAR: i32 = 2050;

/// The year range and epoch of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorOptions {
    start_year: i32,
    until_year: i32,
    epoch_year: i32,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            start_year: DEFAULT_START_YEAR,
            until_year: DEFAULT_UNTIL_YEAR,
            epoch_year: DEFAULT_EPOCH_YEAR,
        }
    }
}

impl GeneratorOptions {
    /// Creates options for `[start_year, until_year)`, with epoch counts
    /// relative to January 1st of `epoch_year`, UTC.
    pub fn new(start_year: i32, until_year: i32, epoch_year: i32) -> GeneratorResult<Self> {
        if start_year >= until_year {
            return Err(GeneratorError::InvalidYearRange {
                start_year,
                until_year,
            });
        }
        Ok(Self {
            start_year,
            until_year,
            epoch_year,
        })
    }

    pub fn start_year(&self) -> i32 {
        self.start_year
    }

    pub fn until_year(&self) -> i32 {
        self.until_year
    }

    pub fn epoch_year(&self) -> i32 {
        self.epoch_year
    }
}

/// The samples for one zone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneTestEntry {
    /// Before/after pairs, chronological.
    pub transitions: Vec<Sample>,
    /// One per month, chronological.
    pub samples: Vec<Sample>,
}

/// The generated document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    pub start_year: i32,
    pub until_year: i32,
    pub epoch_year: i32,
    pub source: String,
    pub version: String,
    pub tz_version: String,
    /// Abbreviations are emitted but never validated.
    pub has_valid_abbrev: bool,
    pub has_valid_dst: bool,
    /// Entries keyed by zone identifier, sorted.
    pub test_data: BTreeMap<String, ZoneTestEntry>,
}

impl Dataset {
    /// Writes the dataset as pretty printed JSON with a trailing newline.
    pub fn write_json<W: Write>(&self, mut writer: W) -> GeneratorResult<()> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    pub fn to_json_string(&self) -> GeneratorResult<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    pub fn from_json_str(json: &str) -> GeneratorResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Builds a [`Dataset`] from the zones of a [`RulesProvider`].
#[derive(Debug)]
pub struct DatasetAssembler<P> {
    provider: P,
    options: GeneratorOptions,
    builder: SampleBuilder,
}

impl<P: RulesProvider> DatasetAssembler<P> {
    pub fn new(provider: P, options: GeneratorOptions) -> Self {
        Self {
            provider,
            options,
            builder: SampleBuilder::new(options.epoch_year),
        }
    }

    /// Generates entries for `zones`, in order.
    ///
    /// Zones that cannot be resolved, or whose rules fail while sampling,
    /// are logged and left out.
    pub fn assemble<I, S>(&self, zones: I) -> Dataset
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut test_data = BTreeMap::new();
        for (i, zone) in zones.into_iter().enumerate() {
            let zone = zone.as_ref();
            log::info!("[{i}] {zone}");
            let rules = match self.provider.resolve(zone) {
                Ok(rules) => rules,
                Err(err) if err.is_not_found() => {
                    log::warn!("Zone '{zone}' not found");
                    continue;
                }
                Err(err) => {
                    log::error!("Zone '{zone}' could not be loaded: {err}");
                    continue;
                }
            };
            match self.create_entry(&rules) {
                Ok(entry) => {
                    test_data.insert(zone.to_owned(), entry);
                }
                Err(err) => log::error!("Zone '{zone}' skipped: {err}"),
            }
        }

        Dataset {
            start_year: self.options.start_year,
            until_year: self.options.until_year,
            epoch_year: self.options.epoch_year,
            source: format!("zonegen/{}", self.provider.source()),
            version: env!("CARGO_PKG_VERSION").to_owned(),
            tz_version: self
                .provider
                .tz_version()
                .unwrap_or("unknown")
                .to_owned(),
            has_valid_abbrev: false,
            has_valid_dst: true,
            test_data,
        }
    }

    /// Generates the entry for one resolved zone.
    pub fn create_entry<R: ZoneRules + ?Sized>(&self, rules: &R) -> ProviderResult<ZoneTestEntry> {
        let start = rules.resolve_local(LocalDateTime::midnight(self.options.start_year, 1, 1)?)?;
        let until = rules.resolve_local(LocalDateTime::midnight(self.options.until_year, 1, 1)?)?;

        Ok(ZoneTestEntry {
            transitions: TransitionScanner::new(&self.builder).scan(rules, start, until)?,
            samples: MonthlySampler::new(&self.builder).sample(rules, start, until)?,
        })
    }
}
