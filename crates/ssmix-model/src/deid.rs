//! De-identification policy.
//!
//! The policy is consulted at three granularities: whole segments, specific
//! segment fields, and components of complex data types. Redaction happens
//! before decoding, so redacted values are never validated.

use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeidentificationPolicy {
    segments: BTreeSet<String>,
    fields: BTreeMap<String, BTreeSet<usize>>,
    components: BTreeMap<String, BTreeSet<usize>>,
}

impl DeidentificationPolicy {
    /// A policy that redacts nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The SS-MIX2 identity policy.
    ///
    /// Next-of-kin segments are dropped wholesale; patient account/SSN,
    /// disability and insurance identifiers are redacted per field; person
    /// names, addresses, phone numbers and licence data are redacted per
    /// component wherever those types occur.
    pub fn ssmix2() -> Self {
        let insurance: Vec<usize> = (3..=41).chain(43..=52).collect();
        Self::empty()
            .with_segment("NK1")
            .with_fields("PID", [18, 19])
            .with_fields("DB1", [3])
            .with_fields("IN1", insurance.iter().copied())
            .with_fields("ZI1", insurance)
            // XCN.2-9 names and XCN.16 name context
            .with_components("XCN", (1..=8).chain([15]))
            .with_components("XPN", 0..=5)
            // street, other designation, city, other geographic designation
            .with_components("XAD", [0, 1, 2, 7])
            .with_components("XTN", [0, 3, 5, 6, 11])
            .with_components("DLN", [0])
            .with_components("SAD", [0, 1, 2])
            .with_components("NDL", 0..=10)
    }

    pub fn with_segment(mut self, tag: impl Into<String>) -> Self {
        self.segments.insert(tag.into());
        self
    }

    /// Redact the given 1-based field sequences of `tag`.
    pub fn with_fields(
        mut self,
        tag: impl Into<String>,
        sequences: impl IntoIterator<Item = usize>,
    ) -> Self {
        self.fields.entry(tag.into()).or_default().extend(sequences);
        self
    }

    /// Redact the given 0-based component indices of `data_type`.
    pub fn with_components(
        mut self,
        data_type: impl Into<String>,
        indices: impl IntoIterator<Item = usize>,
    ) -> Self {
        self.components
            .entry(data_type.into())
            .or_default()
            .extend(indices);
        self
    }

    pub fn redacts_segment(&self, tag: &str) -> bool {
        self.segments.contains(tag)
    }

    pub fn redacts_field(&self, tag: &str, sequence: usize) -> bool {
        self.fields
            .get(tag)
            .is_some_and(|sequences| sequences.contains(&sequence))
    }

    pub fn redacts_component(&self, data_type: &str, index: usize) -> bool {
        self.components
            .get(data_type)
            .is_some_and(|indices| indices.contains(&index))
    }
}
