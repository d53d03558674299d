//! Zone rules backed by [`TZif`][rfc8536] data.
//!
//! A TZif file holds a table of historical transitions, each switching to one
//! of a small set of local time types, followed by a POSIX TZ string footer
//! that describes the rule in effect after the last transition.
//!
//! TZif only records whether a local time type is daylight saving time, not
//! the size of the DST component, so the DST offset of each transition is
//! inferred from the standard-time type around it.
//!
//! [rfc8536]: https://datatracker.ietf.org/doc/html/rfc8536

use std::path::Path;

use combine::Parser;
use tzif::data::tzif::{DataBlock, TzifData};

use crate::posix::PosixRules;
use crate::provider::{ProviderResult, UtcOffsetSeconds, ZoneOffset, ZoneRules};
use crate::ProviderError;

/// Rules for a single zone, resolved from TZif data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tzif {
    /// Transition instants, ascending.
    transitions: Vec<i64>,
    /// The offset in effect from the transition at the same index on.
    offsets: Vec<ZoneOffset>,
    /// The offset in effect before the first transition.
    initial: ZoneOffset,
    footer: Option<PosixRules>,
}

#[derive(Debug, Clone, Copy)]
struct LocalType<'a> {
    utc_offset: i64,
    is_dst: bool,
    designation: Option<&'a str>,
}

impl Tzif {
    /// Parses TZif bytes.
    pub fn from_bytes(data: &[u8]) -> ProviderResult<Self> {
        let Ok((parse_result, _)) = tzif::parse::tzif::tzif().parse(data) else {
            return Err(ProviderError::Assert("Illformed Tzif data."));
        };
        Self::try_from(parse_result)
    }

    /// Reads and parses the TZif file at `path`.
    pub fn from_path(path: &Path) -> ProviderResult<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }
}

impl TryFrom<TzifData> for Tzif {
    type Error = ProviderError;

    fn try_from(value: TzifData) -> Result<Self, Self::Error> {
        let footer = value.footer.as_ref().map(PosixRules::from);
        // Version 1 files only carry the 32-bit block.
        let block: &DataBlock = value.data_block2.as_ref().unwrap_or(&value.data_block1);

        if block.transition_times.len() != block.transition_types.len() {
            return Err(ProviderError::Assert(
                "Transition times and types have different lengths.",
            ));
        }

        // Type 0 first, then one entry per transition.
        let sequence = core::iter::once(0)
            .chain(block.transition_types.iter().copied())
            .map(|index| local_type(block, index))
            .collect::<ProviderResult<Vec<_>>>()?;

        let footer_std = footer.as_ref().map(|f| f.std_offset().utc_offset.0);
        let mut offsets = sequence
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let dst_offset = if entry.is_dst {
                    standard_offset_near(&sequence, i)
                        .or(footer_std)
                        .map_or(0, |std| entry.utc_offset - std)
                } else {
                    0
                };
                let abbreviation = entry
                    .designation
                    .map(str::to_owned)
                    .or_else(|| footer.as_ref().map(|f| f.std_offset().abbreviation.clone()))
                    .unwrap_or_default();
                ZoneOffset {
                    utc_offset: UtcOffsetSeconds(entry.utc_offset),
                    dst_offset: UtcOffsetSeconds(dst_offset),
                    abbreviation,
                }
            })
            .collect::<Vec<_>>();

        let initial = offsets.remove(0);
        let transitions = block.transition_times.iter().map(|t| t.0).collect();

        Ok(Self {
            transitions,
            offsets,
            initial,
            footer,
        })
    }
}

fn local_type(block: &DataBlock, index: usize) -> ProviderResult<LocalType<'_>> {
    let record = block
        .local_time_type_records
        .get(index)
        .ok_or(ProviderError::Assert("Transition type index out of range."))?;
    Ok(LocalType {
        utc_offset: record.utoff.0,
        is_dst: record.is_dst,
        designation: block.time_zone_designation(record.idx),
    })
}

/// Finds the UTC offset of the standard-time entry nearest to `index`,
/// searching backwards first.
fn standard_offset_near(sequence: &[LocalType<'_>], index: usize) -> Option<i64> {
    let preceding = sequence[..index].iter().rev();
    let following = sequence[index + 1..].iter();
    preceding
        .filter(|t| !t.is_dst)
        .chain(following.filter(|t| !t.is_dst))
        .map(|t| t.utc_offset)
        .next()
}

impl ZoneRules for Tzif {
    fn offset_at(&self, epoch_seconds: i64) -> ProviderResult<ZoneOffset> {
        if self.transitions.is_empty() {
            // <https://datatracker.ietf.org/doc/html/rfc8536#section-3.2>
            // If there are no transitions, local time for all timestamps is specified by the TZ
            // string in the footer if present and nonempty; otherwise, it is
            // specified by time type 0.
            return Ok(match &self.footer {
                Some(footer) => footer.offset_at(epoch_seconds).clone(),
                None => self.initial.clone(),
            });
        }

        let idx = self.transitions.partition_point(|t| *t <= epoch_seconds);
        if idx == 0 {
            return Ok(self.initial.clone());
        }
        if idx == self.transitions.len() {
            if let Some(footer) = &self.footer {
                return Ok(footer.offset_at(epoch_seconds).clone());
            }
        }
        Ok(self.offsets[idx - 1].clone())
    }

    fn next_transition(&self, epoch_seconds: i64) -> ProviderResult<Option<i64>> {
        let idx = self.transitions.partition_point(|t| *t <= epoch_seconds);
        if let Some(next) = self.transitions.get(idx) {
            return Ok(Some(*next));
        }
        let after = self
            .transitions
            .last()
            .map_or(epoch_seconds, |last| epoch_seconds.max(*last));
        Ok(self
            .footer
            .as_ref()
            .and_then(|footer| footer.next_transition(after)))
    }
}
