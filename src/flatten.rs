//! The flat text rendering of a dataset.
//!
//! ```text
//! HEADER
//! start_year 2000
//! ...
//!
//! ZONE America/Los_Angeles
//! TRANSITIONS 4
//! # line       epoch    utc    dst    y  m  d  h  m  s  abbrev type
//!      0 -1569938401 -28800      0 2000  4  2  1 59 59     PST    A
//! ...
//! SAMPLES 12
//! ...
//! ```

use std::io::Write;

use crate::dataset::{Dataset, ZoneTestEntry};
use crate::sample::Sample;
use crate::GeneratorResult;

const ITEM_COLUMNS: &str = "# line       epoch    utc    dst    y  m  d  h  m  s  abbrev type";

impl Dataset {
    /// Writes the dataset in the flat, line oriented text format.
    ///
    /// Booleans are written as `True`/`False` and an empty abbreviation
    /// as `-`, which is what readers of the format expect.
    pub fn write_flat<W: Write>(&self, mut writer: W) -> GeneratorResult<()> {
        writeln!(writer, "HEADER")?;
        writeln!(writer, "start_year {}", self.start_year)?;
        writeln!(writer, "until_year {}", self.until_year)?;
        writeln!(writer, "epoch_year {}", self.epoch_year)?;
        writeln!(writer, "has_valid_abbrev {}", flat_bool(self.has_valid_abbrev))?;
        writeln!(writer, "has_valid_dst {}", flat_bool(self.has_valid_dst))?;
        writeln!(writer)?;

        for (zone, entry) in &self.test_data {
            write_zone(&mut writer, zone, entry)?;
        }
        writer.flush()?;
        Ok(())
    }
}

fn flat_bool(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

fn write_zone<W: Write>(writer: &mut W, zone: &str, entry: &ZoneTestEntry) -> GeneratorResult<()> {
    writeln!(writer, "ZONE {zone}")?;
    writeln!(writer, "TRANSITIONS {}", entry.transitions.len())?;
    write_items(writer, &entry.transitions)?;
    writeln!(writer, "SAMPLES {}", entry.samples.len())?;
    write_items(writer, &entry.samples)?;
    writeln!(writer)?;
    Ok(())
}

fn write_items<W: Write>(writer: &mut W, items: &[Sample]) -> GeneratorResult<()> {
    if !items.is_empty() {
        writeln!(writer, "{ITEM_COLUMNS}")?;
    }
    for (line, item) in items.iter().enumerate() {
        let abbrev = if item.abbreviation.is_empty() {
            "-"
        } else {
            item.abbreviation.as_str()
        };
        writeln!(
            writer,
            "{line:>6} {:11} {:6} {:6} {:4} {:2} {:2} {:2} {:2} {:2} {abbrev:>7} {:>4}",
            item.epoch,
            item.utc_offset_seconds,
            item.dst_offset_seconds,
            item.year,
            item.month,
            item.day,
            item.hour,
            item.minute,
            item.second,
            item.kind.as_str(),
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use zonegen_provider::{FixedProvider, FixedRules, ZoneOffset};

    use crate::{DatasetAssembler, GeneratorOptions};

    #[test]
    fn flat_layout() {
        // 2000-04-02T10:00:00Z
        let rules = FixedRules::new(ZoneOffset::new(-28_800, 0, "PST"))
            .with_transition(954_669_600, ZoneOffset::new(-25_200, 3_600, ""));
        let provider = FixedProvider::new()
            .with_zone("Test/Pacific", rules)
            .with_zone("Test/UTC", FixedRules::new(ZoneOffset::new(0, 0, "UTC")));
        let options = GeneratorOptions::new(2000, 2001, 2050).unwrap();
        let mut dataset = DatasetAssembler::new(provider, options).assemble(["Test/Pacific", "Test/UTC"]);
        dataset.test_data.get_mut("Test/Pacific").unwrap().samples.truncate(1);
        dataset.test_data.get_mut("Test/UTC").unwrap().samples.clear();

        let mut flat = Vec::new();
        dataset.write_flat(&mut flat).unwrap();
        let expected = "\
HEADER
start_year 2000
until_year 2001
epoch_year 2050
has_valid_abbrev False
has_valid_dst True

ZONE Test/Pacific
TRANSITIONS 2
# line       epoch    utc    dst    y  m  d  h  m  s  abbrev type
     0 -1569938401 -28800      0 2000  4  2  1 59 59     PST    A
     1 -1569938400 -25200   3600 2000  4  2  3  0  0       -    B
SAMPLES 1
# line       epoch    utc    dst    y  m  d  h  m  s  abbrev type
     0 -1577808000 -28800      0 2000  1  2  0  0  0     PST    S

ZONE Test/UTC
TRANSITIONS 0
SAMPLES 0

";
        assert_eq!(String::from_utf8(flat).unwrap(), expected);
    }
}
