// Copyright 2026 Hypermesh Foundation. All rights reserved.
// ZSUSD Macro Model Simulation Suite - Step History

use serde::{Deserialize, Serialize};

use crate::types::StepRecord;

/// Append-only sequence of step records.
///
/// Components receive it by shared reference and may only look backwards:
/// the previous record and bounded trailing windows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimeSeries {
    records: Vec<StepRecord>,
}

impl TimeSeries {
    pub fn with_capacity(capacity: usize) -> Self {
        Self { records: Vec::with_capacity(capacity) }
    }

    pub fn push(&mut self, record: StepRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&StepRecord> {
        self.records.last()
    }

    pub fn get(&self, step: usize) -> Option<&StepRecord> {
        self.records.get(step)
    }

    #[cfg(test)]
    pub(crate) fn last_mut(&mut self) -> Option<&mut StepRecord> {
        self.records.last_mut()
    }

    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<StepRecord> {
        self.records
    }

    /// The most recent `window` records (fewer if history is shorter).
    pub fn trailing(&self, window: usize) -> &[StepRecord] {
        let start = self.records.len().saturating_sub(window);
        &self.records[start..]
    }

    /// Sum of `f` over the most recent `window` records.
    pub fn trailing_sum(&self, window: usize, f: impl Fn(&StepRecord) -> f64) -> f64 {
        self.trailing(window).iter().map(f).sum()
    }
}
