//! Synthetic zones with hand-written transition schedules.
//!
//! These make it possible to exercise consumers of [`ZoneRules`] against
//! exact, version-independent histories, including transitions that change
//! nothing observable.

use std::collections::BTreeMap;

use crate::provider::{check_identifier, ProviderResult, RulesProvider, ZoneOffset, ZoneRules};
use crate::ProviderError;

/// A zone defined by an explicit list of transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedRules {
    initial: ZoneOffset,
    /// Transition instants with the offset in effect from then on, ascending.
    transitions: Vec<(i64, ZoneOffset)>,
}

impl FixedRules {
    /// A zone that observes `initial` at every instant.
    pub fn new(initial: ZoneOffset) -> Self {
        Self {
            initial,
            transitions: Vec::new(),
        }
    }

    /// Adds a transition to `offset` at `epoch_seconds`.
    ///
    /// Transitions may be added in any order; a later call for the same
    /// instant replaces the earlier one.
    pub fn with_transition(mut self, epoch_seconds: i64, offset: ZoneOffset) -> Self {
        match self
            .transitions
            .binary_search_by_key(&epoch_seconds, |(t, _)| *t)
        {
            Ok(idx) => self.transitions[idx].1 = offset,
            Err(idx) => self.transitions.insert(idx, (epoch_seconds, offset)),
        }
        self
    }
}

impl ZoneRules for FixedRules {
    fn offset_at(&self, epoch_seconds: i64) -> ProviderResult<ZoneOffset> {
        let idx = self.transitions.partition_point(|(t, _)| *t <= epoch_seconds);
        Ok(match idx {
            0 => self.initial.clone(),
            _ => self.transitions[idx - 1].1.clone(),
        })
    }

    fn next_transition(&self, epoch_seconds: i64) -> ProviderResult<Option<i64>> {
        let idx = self.transitions.partition_point(|(t, _)| *t <= epoch_seconds);
        Ok(self.transitions.get(idx).map(|(t, _)| *t))
    }
}

/// A provider serving [`FixedRules`] registered by name.
#[derive(Debug, Clone, Default)]
pub struct FixedProvider {
    zones: BTreeMap<String, FixedRules>,
    tz_version: Option<String>,
}

impl FixedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `rules` under `identifier`.
    pub fn with_zone(mut self, identifier: &str, rules: FixedRules) -> Self {
        self.zones.insert(identifier.to_owned(), rules);
        self
    }

    /// Sets the database version reported by [`RulesProvider::tz_version`].
    pub fn with_tz_version(mut self, version: &str) -> Self {
        self.tz_version = Some(version.to_owned());
        self
    }
}

impl RulesProvider for FixedProvider {
    type Rules = FixedRules;

    fn resolve(&self, identifier: &str) -> ProviderResult<FixedRules> {
        check_identifier(identifier)?;
        self.zones
            .get(identifier)
            .cloned()
            .ok_or(ProviderError::UnknownIdentifier)
    }

    fn source(&self) -> &str {
        "fixed"
    }

    fn tz_version(&self) -> Option<&str> {
        self.tz_version.as_deref()
    }

    fn available_identifiers(&self) -> ProviderResult<Vec<String>> {
        Ok(self.zones.keys().cloned().collect())
    }
}
