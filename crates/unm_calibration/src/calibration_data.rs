//! Ingested calibration data
//!
//! Gantree: L3_Calibration → CalibrationData
//!
//! Typed, validated per-qubit records in SI units. Built once by
//! [`CalibrationIngestor`](crate::CalibrationIngestor) and read-only afterwards.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use unm_core::{
    MissingCalibrationValue, PhysicalConsistencyWarning, QubitId, QubitPair, UnmResult,
};
use unm_noise::CoherenceProfile;

// ============================================================================
// Per-qubit Record
// ============================================================================

/// Calibration of one physical qubit
/// Gantree: CalibrationRecord // 큐비트 캘리브레이션
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationRecord {
    /// Qubit id
    pub qubit: QubitId,

    /// T1 in seconds
    /// Gantree: t1_s: f64 // T1 (초)
    pub t1_s: f64,

    /// T2 in seconds
    /// Gantree: t2_s: f64 // T2 (초)
    pub t2_s: f64,

    /// Single-qubit gate error probability
    pub single_qubit_error_rate: f64,

    /// Readout error probability
    pub measurement_error_rate: f64,

    /// Qubit frequency in GHz, when reported
    #[serde(default)]
    pub frequency_ghz: Option<f64>,
}

impl fmt::Display for CalibrationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Q{}: T1={:.1}us T2={:.1}us SQ={:.2e} RO={:.2e}",
            self.qubit,
            self.t1_s * 1e6,
            self.t2_s * 1e6,
            self.single_qubit_error_rate,
            self.measurement_error_rate
        )
    }
}

// ============================================================================
// Pairwise Rates
// ============================================================================

/// Two-qubit gate error rates keyed by unordered pair
/// Gantree: PairwiseErrorRates // 2Q 에러율 (대칭)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PairwiseErrorRates {
    rates: BTreeMap<QubitPair, f64>,
}

impl PairwiseErrorRates {
    /// Empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert unless the pair is already present
    ///
    /// Returns the authoritative rate for the pair afterwards.
    pub fn insert_first(&mut self, pair: QubitPair, rate: f64) -> f64 {
        *self.rates.entry(pair).or_insert(rate)
    }

    /// Builder-style [`PairwiseErrorRates::insert_first`]
    pub fn with(mut self, a: QubitId, b: QubitId, rate: f64) -> Self {
        self.insert_first(QubitPair::new(a, b), rate);
        self
    }

    /// Rate for `(a, b)`, same as for `(b, a)`
    pub fn get(&self, a: QubitId, b: QubitId) -> Option<f64> {
        self.rates.get(&QubitPair::new(a, b)).copied()
    }

    /// Rate for a canonical pair
    pub fn get_pair(&self, pair: &QubitPair) -> Option<f64> {
        self.rates.get(pair).copied()
    }

    /// Calibrated pairs in canonical order
    pub fn pairs(&self) -> Vec<QubitPair> {
        self.rates.keys().copied().collect()
    }

    /// `(pair, rate)` in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (QubitPair, f64)> + '_ {
        self.rates.iter().map(|(&pair, &rate)| (pair, rate))
    }

    /// Number of pairs
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Whether no pair is calibrated
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Mean rate over all pairs
    pub fn mean(&self) -> Option<f64> {
        mean(self.rates.values().copied())
    }
}

// ============================================================================
// Calibration Data
// ============================================================================

/// Result of calibration ingestion
/// Gantree: CalibrationData // 정제된 캘리브레이션
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationData {
    records: Vec<CalibrationRecord>,
    pairwise: PairwiseErrorRates,
    warnings: Vec<PhysicalConsistencyWarning>,
    substitutions: Vec<MissingCalibrationValue>,
}

impl CalibrationData {
    pub(crate) fn new(
        records: Vec<CalibrationRecord>,
        pairwise: PairwiseErrorRates,
        warnings: Vec<PhysicalConsistencyWarning>,
        substitutions: Vec<MissingCalibrationValue>,
    ) -> Self {
        Self {
            records,
            pairwise,
            warnings,
            substitutions,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Per-qubit records in source order
    pub fn records(&self) -> &[CalibrationRecord] {
        &self.records
    }

    /// Record of one qubit
    pub fn record(&self, qubit: QubitId) -> Option<&CalibrationRecord> {
        self.records.iter().find(|r| r.qubit == qubit)
    }

    /// Qubit ids in canonical (source) order
    /// Gantree: qubits(&self) -> Vec<QubitId> // 큐비트 순서
    pub fn qubits(&self) -> Vec<QubitId> {
        self.records.iter().map(|r| r.qubit).collect()
    }

    /// Number of qubits
    pub fn num_qubits(&self) -> usize {
        self.records.len()
    }

    /// T1 values (seconds) by qubit position
    pub fn t1s(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.t1_s).collect()
    }

    /// T2 values (seconds) by qubit position
    pub fn t2s(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.t2_s).collect()
    }

    /// Single-qubit error rate per qubit
    pub fn single_qubit_error_rates(&self) -> BTreeMap<QubitId, f64> {
        self.records
            .iter()
            .map(|r| (r.qubit, r.single_qubit_error_rate))
            .collect()
    }

    /// Readout error rate per qubit
    pub fn measurement_error_rates(&self) -> BTreeMap<QubitId, f64> {
        self.records
            .iter()
            .map(|r| (r.qubit, r.measurement_error_rate))
            .collect()
    }

    /// Two-qubit error rates
    pub fn pairwise(&self) -> &PairwiseErrorRates {
        &self.pairwise
    }

    /// T2 > 2·T1 findings
    pub fn warnings(&self) -> &[PhysicalConsistencyWarning] {
        &self.warnings
    }

    /// Values substituted for missing cells
    pub fn substitutions(&self) -> &[MissingCalibrationValue] {
        &self.substitutions
    }

    /// Whether every qubit passed the T2 <= 2·T1 check
    pub fn is_physically_consistent(&self) -> bool {
        self.warnings.is_empty()
    }

    // ========================================================================
    // Aggregates
    // ========================================================================

    /// Mean single-qubit error rate
    pub fn mean_single_qubit_error(&self) -> Option<f64> {
        mean(self.records.iter().map(|r| r.single_qubit_error_rate))
    }

    /// Mean two-qubit error rate over calibrated pairs
    pub fn mean_two_qubit_error(&self) -> Option<f64> {
        self.pairwise.mean()
    }

    /// Mean readout error rate
    pub fn mean_measurement_error(&self) -> Option<f64> {
        mean(self.records.iter().map(|r| r.measurement_error_rate))
    }

    // ========================================================================
    // Conversions
    // ========================================================================

    /// Coherence times in canonical qubit order
    /// Gantree: to_coherence_profile(&self) -> Result<CoherenceProfile> // T1/T2 변환
    pub fn to_coherence_profile(&self) -> UnmResult<CoherenceProfile> {
        CoherenceProfile::new(self.qubits(), self.t1s(), self.t2s())
    }
}

impl fmt::Display for CalibrationData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CalibrationData ({} qubits):", self.records.len())?;
        for record in &self.records {
            writeln!(f, "  {record}")?;
        }
        for (pair, rate) in self.pairwise.iter() {
            writeln!(f, "  {pair}: {rate:.2e}")?;
        }
        if self.warnings.is_empty() {
            write!(f, "  Decoherence times: all ok")
        } else {
            write!(f, "  {} decoherence warning(s)", self.warnings.len())
        }
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (count > 0).then(|| sum / count as f64)
}

// ============================================================================
// Tests
// ============================================================================
