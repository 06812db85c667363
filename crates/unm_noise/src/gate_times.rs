//! Gate timing tables for UNM
//!
//! Gantree: L2_Noise → GateTimeTable
//!
//! Execution times (nanoseconds) used as the duration of the relaxation
//! channel attached to each gate. Single-qubit gates are timed per
//! (qubit, gate); each two-qubit gate has one shared time for every pair.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use unm_core::physics::{self, GATE_TIME_1Q_NS, GATE_TIME_2Q_NS};
use unm_core::{QubitId, QubitPair, UnmError, UnmResult};

/// Gate execution times in nanoseconds
/// Gantree: GateTimeTable // 게이트 시간
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateTimeTable {
    /// `single_qubit_ns[qubit_position][gate_index]`
    /// Gantree: single_qubit_ns: Vec<Vec<f64>> // 1Q 시간
    pub single_qubit_ns: Vec<Vec<f64>>,

    /// `two_qubit_ns[gate_index]`, shared by all pairs
    /// Gantree: two_qubit_ns: Vec<f64> // 2Q 시간
    pub two_qubit_ns: Vec<f64>,
}

impl GateTimeTable {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create from explicit tables
    pub fn new(single_qubit_ns: Vec<Vec<f64>>, two_qubit_ns: Vec<f64>) -> Self {
        Self {
            single_qubit_ns,
            two_qubit_ns,
        }
    }

    /// Same single-qubit times on every qubit
    pub fn uniform(num_qubits: usize, single_qubit_ns: &[f64], two_qubit_ns: &[f64]) -> Self {
        Self {
            single_qubit_ns: vec![single_qubit_ns.to_vec(); num_qubits],
            two_qubit_ns: two_qubit_ns.to_vec(),
        }
    }

    /// IBM-style defaults: every single-qubit gate 35 ns, every two-qubit gate 300 ns
    pub fn superconducting(num_qubits: usize, num_1q_gates: usize, num_2q_gates: usize) -> Self {
        Self::uniform(
            num_qubits,
            &vec![GATE_TIME_1Q_NS; num_1q_gates],
            &vec![GATE_TIME_2Q_NS; num_2q_gates],
        )
    }

    /// Aggregate device gate lengths into a table
    /// Gantree: from_gate_lengths(lengths,..) -> Result<Self> // 장치 시간 집계
    ///
    /// Single-qubit times are taken per (qubit, gate). A two-qubit gate's
    /// shared time is the mean over `pairs` (typically the calibrated pairs).
    /// A missing length is an error rather than a silent default.
    pub fn from_gate_lengths(
        lengths: &GateLengths,
        qubits: &[QubitId],
        single_qubit_gates: &[String],
        two_qubit_gates: &[String],
        pairs: &[QubitPair],
    ) -> UnmResult<Self> {
        let single_qubit_ns = qubits
            .iter()
            .map(|&q| {
                single_qubit_gates
                    .iter()
                    .map(|gate| {
                        lengths
                            .get(gate, &[q])
                            .map(physics::s_to_ns)
                            .ok_or_else(|| missing_length(gate, &[q]))
                    })
                    .collect::<UnmResult<Vec<f64>>>()
            })
            .collect::<UnmResult<Vec<Vec<f64>>>>()?;

        let two_qubit_ns = two_qubit_gates
            .iter()
            .map(|gate| lengths.mean_over_pairs(gate, pairs).map(physics::s_to_ns))
            .collect::<UnmResult<Vec<f64>>>()?;

        Ok(Self {
            single_qubit_ns,
            two_qubit_ns,
        })
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Check the table shape against the qubit and gate lists
    /// Gantree: validate(&self,nq,n1,n2) -> Result // 차원 검증
    pub fn validate(&self, num_qubits: usize, num_1q_gates: usize, num_2q_gates: usize) -> UnmResult<()> {
        if self.single_qubit_ns.len() != num_qubits {
            return Err(UnmError::dimension(
                "single-qubit gate times (qubits)",
                num_qubits,
                self.single_qubit_ns.len(),
            ));
        }
        if let Some(row) = self
            .single_qubit_ns
            .iter()
            .find(|row| row.len() != num_1q_gates)
        {
            return Err(UnmError::dimension(
                "single-qubit gate times (gates)",
                num_1q_gates,
                row.len(),
            ));
        }
        if self.two_qubit_ns.len() != num_2q_gates {
            return Err(UnmError::dimension(
                "two-qubit gate times (gates)",
                num_2q_gates,
                self.two_qubit_ns.len(),
            ));
        }

        let all_times = self.single_qubit_ns.iter().flatten().chain(&self.two_qubit_ns);
        for &t in all_times {
            if !t.is_finite() || t < 0.0 {
                return Err(UnmError::InvalidDuration(t));
            }
        }
        Ok(())
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Single-qubit gate time in nanoseconds
    pub fn single_qubit(&self, qubit_position: usize, gate_index: usize) -> Option<f64> {
        self.single_qubit_ns.get(qubit_position)?.get(gate_index).copied()
    }

    /// Two-qubit gate time in nanoseconds
    pub fn two_qubit(&self, gate_index: usize) -> Option<f64> {
        self.two_qubit_ns.get(gate_index).copied()
    }
}

impl fmt::Display for GateTimeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GateTimeTable({} qubits x {} 1Q gates, 2Q={:?}ns)",
            self.single_qubit_ns.len(),
            self.single_qubit_ns.first().map_or(0, Vec::len),
            self.two_qubit_ns
        )
    }
}

fn missing_length(gate: &str, qubits: &[QubitId]) -> UnmError {
    UnmError::ConfigError(format!("no gate length for '{gate}' on {qubits:?}"))
}

// ============================================================================
// Device Gate Lengths
// ============================================================================

/// Gate lengths in seconds as reported by a device properties source
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GateLengths {
    lengths: HashMap<String, HashMap<Vec<QubitId>, f64>>,
}

impl GateLengths {
    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the length of `gate` on `qubits`
    pub fn insert(&mut self, gate: &str, qubits: &[QubitId], seconds: f64) {
        self.lengths
            .entry(gate.to_string())
            .or_default()
            .insert(qubits.to_vec(), seconds);
    }

    /// Builder-style [`GateLengths::insert`]
    pub fn with(mut self, gate: &str, qubits: &[QubitId], seconds: f64) -> Self {
        self.insert(gate, qubits, seconds);
        self
    }

    /// Length of `gate` on exactly `qubits`
    pub fn get(&self, gate: &str, qubits: &[QubitId]) -> Option<f64> {
        self.lengths.get(gate)?.get(qubits).copied()
    }

    /// Mean length of a two-qubit gate over `pairs`, either orientation
    pub fn mean_over_pairs(&self, gate: &str, pairs: &[QubitPair]) -> UnmResult<f64> {
        if pairs.is_empty() {
            return Err(UnmError::ConfigError(format!(
                "cannot average '{gate}' over an empty pair list"
            )));
        }
        let total = pairs
            .iter()
            .map(|pair| {
                let forward = [pair.low(), pair.high()];
                let reverse = [pair.high(), pair.low()];
                self.get(gate, &forward)
                    .or_else(|| self.get(gate, &reverse))
                    .ok_or_else(|| missing_length(gate, &forward))
            })
            .sum::<UnmResult<f64>>()?;
        Ok(total / pairs.len() as f64)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn gates(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_uniform_table() {
        let table = GateTimeTable::uniform(3, &[35.0, 70.0], &[300.0]);
        assert!(table.validate(3, 2, 1).is_ok());
        assert_eq!(table.single_qubit(2, 1), Some(70.0));
        assert_eq!(table.two_qubit(0), Some(300.0));
        assert_eq!(table.two_qubit(1), None);
    }

    #[test]
    fn test_validate_qubit_dimension() {
        let table = GateTimeTable::superconducting(2, 1, 1);
        let err = table.validate(3, 1, 1).unwrap_err();
        assert!(matches!(
            err,
            UnmError::DimensionMismatch { expected: 3, found: 2, .. }
        ));
    }

    #[test]
    fn test_validate_gate_dimension() {
        let table = GateTimeTable::new(vec![vec![35.0], vec![35.0, 35.0]], vec![300.0]);
        assert!(matches!(
            table.validate(2, 1, 1),
            Err(UnmError::DimensionMismatch { expected: 1, found: 2, .. })
        ));

        let table = GateTimeTable::superconducting(2, 1, 2);
        assert!(matches!(
            table.validate(2, 1, 1),
            Err(UnmError::DimensionMismatch { expected: 1, found: 2, .. })
        ));
    }

    #[test]
    fn test_validate_negative_time() {
        let table = GateTimeTable::new(vec![vec![-1.0]], vec![]);
        assert!(matches!(
            table.validate(1, 1, 0),
            Err(UnmError::InvalidDuration(_))
        ));
    }

    #[test]
    fn test_from_gate_lengths() {
        let lengths = GateLengths::new()
            .with("sx", &[0], 35.5e-9)
            .with("sx", &[1], 36.0e-9)
            .with("cx", &[0, 1], 300e-9)
            .with("cx", &[2, 1], 400e-9)
            .with("sx", &[2], 35.0e-9);

        let table = GateTimeTable::from_gate_lengths(
            &lengths,
            &[0, 1, 2],
            &gates(&["sx"]),
            &gates(&["cx"]),
            &[QubitPair::new(0, 1), QubitPair::new(1, 2)],
        )
        .unwrap();

        assert!(table.validate(3, 1, 1).is_ok());
        assert_relative_eq!(table.single_qubit_ns[1][0], 36.0, epsilon = 1e-9);
        assert_relative_eq!(table.two_qubit_ns[0], 350.0, epsilon = 1e-9);
    }

    #[test]
    fn test_from_gate_lengths_missing() {
        let lengths = GateLengths::new().with("sx", &[0], 35e-9);
        let result = GateTimeTable::from_gate_lengths(
            &lengths,
            &[0, 1],
            &gates(&["sx"]),
            &[],
            &[],
        );
        assert!(result.is_err());
    }
}
