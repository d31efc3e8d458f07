//! Batch tabulation of angle invariants.
//!
//! Enumerates the angles `k / ((2^p − 1)·2^n)` with odd `k` below half the
//! denominator (preperiodic angles whose cycle has length dividing `p`, the
//! usual candidates for dendrite parameters) and records the string
//! invariants of each one. With the `serde` feature the records serialize
//! to the persisted JSON layout (`ks`, `ks_per`, `start_index_per`, `itin`,
//! `itin_per`, `rat_func`).

use std::collections::BTreeMap;

use crate::angle::{Angle, MAX_DENOMINATOR};
use crate::polynomial::PowerNotation;

/// Candidate fractions `(num, den)` for cycle length `period` and preperiod
/// exponents `1..max_preperiod`.
///
/// Denominators that would exceed the supported maximum are skipped with a
/// warning.
pub fn dendrite_candidates(period: u32, max_preperiod: u32) -> Vec<(i64, i64)> {
    let mut out = Vec::new();
    if !(1..61).contains(&period) {
        tracing::warn!(period, "cycle length out of range; no candidates");
        return out;
    }
    let cycle = (1i64 << period) - 1;
    for n in 1..max_preperiod {
        let den = match cycle.checked_mul(1i64 << n.min(62)) {
            Some(d) if d <= MAX_DENOMINATOR => d,
            _ => {
                tracing::warn!(period, preperiod = n, "denominator too large; stopping");
                break;
            }
        };
        out.extend((1..den / 2).step_by(2).map(|num| (num, den)));
    }
    out
}

/// String invariants of one angle.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AngleRecord {
    /// Kneading sequence.
    pub ks: String,
    /// Orbit period length.
    pub ks_per: usize,
    /// Index where the orbit's cycle starts.
    pub start_index_per: usize,
    /// Sign itinerary.
    pub itin: String,
    /// Itinerary period length.
    pub itin_per: usize,
    /// Factored numerator in `^` notation.
    pub rat_func: String,
}

impl AngleRecord {
    /// Tabulate `angle`.
    pub fn from_angle(angle: &Angle) -> Self {
        let period = angle.period();
        Self {
            ks: angle.kneading_sequence().to_string(),
            ks_per: period.length,
            start_index_per: period.start_index,
            itin: angle.itinerary().to_string(),
            itin_per: angle.itinerary_period_length(),
            rat_func: angle.polynomial().render(PowerNotation::Caret),
        }
    }
}

/// Records for every candidate, keyed by `"num/den"`.
pub fn survey(period: u32, max_preperiod: u32) -> BTreeMap<String, AngleRecord> {
    let mut records = BTreeMap::new();
    for (num, den) in dendrite_candidates(period, max_preperiod) {
        match Angle::from_fraction(num, den) {
            Ok(angle) => {
                records.insert(angle.to_string(), AngleRecord::from_angle(&angle));
            }
            Err(e) => tracing::warn!(num, den, error = %e, "candidate rejected"),
        }
    }
    tracing::debug!(period, max_preperiod, records = records.len(), "survey complete");
    records
}

/// Regroup records by orbit period length.
pub fn partition_by_period(
    records: &BTreeMap<String, AngleRecord>,
) -> BTreeMap<usize, BTreeMap<String, AngleRecord>> {
    let mut out: BTreeMap<usize, BTreeMap<String, AngleRecord>> = BTreeMap::new();
    for (key, record) in records {
        out.entry(record.ks_per)
            .or_default()
            .insert(key.clone(), record.clone());
    }
    out
}
