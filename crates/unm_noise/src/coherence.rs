//! Per-qubit coherence times
//!
//! Gantree: L2_Noise → CoherenceProfile
//!
//! The qubit order stored here is the canonical iteration order for model
//! assembly; T1/T2 are indexed by qubit position, not by qubit id.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use unm_core::physics::T2_T1_RATIO_MAX;
use unm_core::{PhysicalConsistencyWarning, QubitId, UnmError, UnmResult};

/// Ordered qubits with their T1/T2 in seconds
/// Gantree: CoherenceProfile // 큐비트별 T1/T2
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoherenceProfile {
    qubits: Vec<QubitId>,
    t1_s: Vec<f64>,
    t2_s: Vec<f64>,
}

impl CoherenceProfile {
    /// Create a profile, checking that the three lists line up
    pub fn new(qubits: Vec<QubitId>, t1_s: Vec<f64>, t2_s: Vec<f64>) -> UnmResult<Self> {
        if t1_s.len() != qubits.len() {
            return Err(UnmError::dimension("T1 values", qubits.len(), t1_s.len()));
        }
        if t2_s.len() != qubits.len() {
            return Err(UnmError::dimension("T2 values", qubits.len(), t2_s.len()));
        }
        let mut seen = HashSet::with_capacity(qubits.len());
        if let Some(&dup) = qubits.iter().find(|&&q| !seen.insert(q)) {
            return Err(UnmError::DuplicateQubit(dup));
        }
        Ok(Self { qubits, t1_s, t2_s })
    }

    /// Qubits `0..n` sharing one T1/T2
    pub fn uniform(num_qubits: usize, t1_s: f64, t2_s: f64) -> Self {
        Self {
            qubits: (0..num_qubits).collect(),
            t1_s: vec![t1_s; num_qubits],
            t2_s: vec![t2_s; num_qubits],
        }
    }

    /// Qubit ids in canonical order
    pub fn qubits(&self) -> &[QubitId] {
        &self.qubits
    }

    /// Number of qubits
    pub fn num_qubits(&self) -> usize {
        self.qubits.len()
    }

    /// T1 values by qubit position
    pub fn t1s(&self) -> &[f64] {
        &self.t1_s
    }

    /// T2 values by qubit position
    pub fn t2s(&self) -> &[f64] {
        &self.t2_s
    }

    /// (T1, T2) of the qubit at `position`
    pub fn times_at(&self, position: usize) -> Option<(f64, f64)> {
        Some((*self.t1_s.get(position)?, *self.t2_s.get(position)?))
    }

    /// Position of `qubit` in the canonical order
    pub fn position_of(&self, qubit: QubitId) -> Option<usize> {
        self.qubits.iter().position(|&q| q == qubit)
    }

    /// Qubits violating T2 <= 2·T1
    /// Gantree: consistency_warnings(&self) -> Vec<Warning> // T2<=2*T1 검사
    pub fn consistency_warnings(&self) -> Vec<PhysicalConsistencyWarning> {
        self.qubits
            .iter()
            .zip(self.t1_s.iter().zip(&self.t2_s))
            .filter(|(_, (&t1, &t2))| t2 > T2_T1_RATIO_MAX * t1)
            .map(|(&qubit, (&t1_s, &t2_s))| PhysicalConsistencyWarning { qubit, t1_s, t2_s })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_dimensions() {
        assert!(CoherenceProfile::new(vec![0, 1], vec![1e-4, 1e-4], vec![1e-4, 1e-4]).is_ok());
        assert!(matches!(
            CoherenceProfile::new(vec![0, 1], vec![1e-4], vec![1e-4, 1e-4]),
            Err(UnmError::DimensionMismatch { expected: 2, found: 1, .. })
        ));
        assert!(matches!(
            CoherenceProfile::new(vec![3, 3], vec![1e-4; 2], vec![1e-4; 2]),
            Err(UnmError::DuplicateQubit(3))
        ));
    }

    #[test]
    fn test_positions_follow_given_order() {
        let profile =
            CoherenceProfile::new(vec![5, 2, 9], vec![1e-4, 2e-4, 3e-4], vec![1e-4; 3]).unwrap();
        assert_eq!(profile.position_of(2), Some(1));
        assert_eq!(profile.times_at(2), Some((3e-4, 1e-4)));
        assert_eq!(profile.position_of(7), None);
    }

    #[test]
    fn test_consistency_warnings() {
        let profile =
            CoherenceProfile::new(vec![0, 1], vec![50e-6, 100e-6], vec![150e-6, 80e-6]).unwrap();
        let warnings = profile.consistency_warnings();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].qubit, 0);
        assert!(CoherenceProfile::uniform(4, 1e-4, 1e-4)
            .consistency_warnings()
            .is_empty());
    }
}
