//! `zonegen` generates reference datasets of time zone behavior.
//!
//! For each requested zone, the dataset holds a sample on either side of
//! every transition in a year range, plus one sample of local midnight per
//! month. The samples come from a [`RulesProvider`], and the document is
//! meant to validate an independent time zone implementation against it.
//!
#![cfg_attr(
    feature = "tzdb",
    doc = r#"
```rust
use zonegen::{DatasetAssembler, GeneratorOptions, SampleKind};
use zonegen::provider::CompiledTzdbProvider;

let options = GeneratorOptions::new(2000, 2001, 2050).unwrap();
let assembler = DatasetAssembler::new(CompiledTzdbProvider::new(), options);
let dataset = assembler.assemble(["America/Los_Angeles", "Fake/Zone"]);

let la = &dataset.test_data["America/Los_Angeles"];
assert_eq!(la.transitions.len(), 4);
assert_eq!(la.transitions[0].kind, SampleKind::TransitionBefore);
assert_eq!(la.samples.len(), 12);
assert!(!dataset.test_data.contains_key("Fake/Zone"));
```
"#
)]
//! A finished dataset can be compared against a baseline with
//! [`Dataset::diff`], or written in a compact text form with
//! [`Dataset::write_flat`].
//!
//! [`RulesProvider`]: zonegen_provider::RulesProvider
#![cfg_attr(not(test), forbid(clippy::unwrap_used))]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

mod dataset;
mod diff;
mod error;
mod flatten;
mod monthly;
mod sample;
mod transitions;
mod zones;

pub use zonegen_provider as provider;

pub use dataset::{
    Dataset, DatasetAssembler, GeneratorOptions, ZoneTestEntry, DEFAULT_EPOCH_YEAR,
    DEFAULT_START_YEAR, DEFAULT_UNTIL_YEAR,
};
pub use diff::{DiffReport, Difference, Section};
pub use error::{GeneratorError, GeneratorResult};
pub use monthly::MonthlySampler;
pub use sample::{Sample, SampleBuilder, SampleKind};
pub use transitions::TransitionScanner;
pub use zones::read_zones;
