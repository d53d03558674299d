//! Time zone rules providers for `zonegen`.
//!
//! This crate defines the [`RulesProvider`] and [`ZoneRules`] capability the
//! generator consumes, along with a few implementations:
//!
//! - [`CompiledTzdbProvider`]: the IANA database bundled by `jiff-tzdb`.
//! - [`FsTzdbProvider`]: TZif files in a zoneinfo directory.
//! - [`FixedProvider`]: hand-written schedules, mostly useful in tests.
//!
#![cfg_attr(
    feature = "tzif",
    doc = r#"
```rust
use zonegen_provider::{CompiledTzdbProvider, RulesProvider, ZoneRules};

let provider = CompiledTzdbProvider::new();
let rules = provider.resolve("America/Los_Angeles").unwrap();
// 2000-01-01T00:00:00Z
let spring_forward = rules.next_transition(946_684_800).unwrap();
assert_eq!(spring_forward, Some(954_669_600));
```
"#
)]
#![cfg_attr(not(test), forbid(clippy::unwrap_used))]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]

mod error;
mod fixed;
mod provider;

pub mod utils;

#[cfg(feature = "tzif")]
mod posix;
#[cfg(feature = "tzif")]
mod tzdb;
#[cfg(feature = "tzif")]
mod tzif;

pub use error::ProviderError;
pub use fixed::{FixedProvider, FixedRules};
pub use provider::{
    LocalDateTime, ProviderResult, RulesProvider, UtcOffsetSeconds, ZoneOffset, ZoneRules,
};

#[cfg(feature = "tzif")]
pub use posix::PosixRules;
#[cfg(feature = "tzif")]
pub use tzdb::{CompiledTzdbProvider, FsTzdbProvider, UNIX_ZONEINFO_DIR};
#[cfg(feature = "tzif")]
pub use self::tzif::Tzif;
