//! Noise model registry
//!
//! Gantree: L2_Noise → NoiseModel
//!
//! Maps instruction keys (label + ordered qubit tuple) to error channels and
//! tracks the declared basis gates. Simulation consumers only read from it;
//! the assembler is the one writer.

use crate::channel::ErrorChannel;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use unm_core::{instructions, QubitId, UnmError, UnmResult};

/// Instruction key: label plus ordered qubit tuple
pub type InstructionKey = (String, Vec<QubitId>);

/// Composite noise model for a simulated device
/// Gantree: NoiseModel // 통합 노이즈 모델
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoiseModel {
    /// Gates the model supports noise for
    basis_gates: BTreeSet<String>,

    /// Non-basis labels that may carry noise (e.g. state-preparation markers)
    marker_labels: BTreeSet<String>,

    /// Qubit-specific errors: label -> qubit tuple -> channel
    local_errors: BTreeMap<String, BTreeMap<Vec<QubitId>, ErrorChannel>>,

    /// Errors applied to an instruction on every qubit
    all_qubit_errors: BTreeMap<String, ErrorChannel>,
}

impl NoiseModel {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create an empty model with the given basis gates
    pub fn new<I, S>(basis_gates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut model = Self::default();
        model.declare_basis_gates(basis_gates);
        model
    }

    // ========================================================================
    // Declaration
    // ========================================================================

    /// Add labels to the basis-gate set (existing labels are kept)
    /// Gantree: declare_basis_gates(labels) // 기저 게이트 선언
    pub fn declare_basis_gates<I, S>(&mut self, labels: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.basis_gates.extend(labels.into_iter().map(Into::into));
    }

    /// Allow a non-basis marker label (such as `x_StatePreparation`) to carry noise
    pub fn declare_marker_label(&mut self, label: impl Into<String>) {
        self.marker_labels.insert(label.into());
    }

    /// Whether `label` may carry noise in this model
    pub fn is_known_instruction(&self, label: &str) -> bool {
        self.basis_gates.contains(label)
            || self.marker_labels.contains(label)
            || instructions::ALWAYS_KNOWN.contains(&label)
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Register `channel` for `label` on the ordered `qubits`
    /// Gantree: register_error(ch,label,qubits) -> Result // 국소 오류 등록
    ///
    /// A second registration for the same key replaces the first.
    pub fn register_error(
        &mut self,
        channel: ErrorChannel,
        label: &str,
        qubits: &[QubitId],
    ) -> UnmResult<()> {
        self.check_instruction(label)?;
        if channel.num_qubits() != qubits.len() {
            return Err(UnmError::ChannelQubitMismatch {
                expected: qubits.len(),
                found: channel.num_qubits(),
            });
        }

        self.local_errors
            .entry(label.to_string())
            .or_default()
            .insert(qubits.to_vec(), channel);
        Ok(())
    }

    /// Register `channel` for `label` on every qubit
    /// Gantree: register_error_all_qubits(ch,label) -> Result // 전체 큐비트 등록
    pub fn register_error_all_qubits(&mut self, channel: ErrorChannel, label: &str) -> UnmResult<()> {
        self.check_instruction(label)?;
        self.all_qubit_errors.insert(label.to_string(), channel);
        Ok(())
    }

    fn check_instruction(&self, label: &str) -> UnmResult<()> {
        if self.is_known_instruction(label) {
            Ok(())
        } else {
            Err(UnmError::UnknownInstruction {
                label: label.to_string(),
            })
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Declared basis gates, sorted
    pub fn basis_gates(&self) -> impl Iterator<Item = &str> {
        self.basis_gates.iter().map(String::as_str)
    }

    /// Whether `label` is a declared basis gate
    pub fn has_basis_gate(&self, label: &str) -> bool {
        self.basis_gates.contains(label)
    }

    /// Channel registered for `label` on exactly `qubits`
    pub fn local_error(&self, label: &str, qubits: &[QubitId]) -> Option<&ErrorChannel> {
        self.local_errors.get(label)?.get(qubits)
    }

    /// Channel registered for `label` on every qubit
    pub fn all_qubit_error(&self, label: &str) -> Option<&ErrorChannel> {
        self.all_qubit_errors.get(label)
    }

    /// Channel a simulator should apply after `label` on `qubits`
    ///
    /// A qubit-specific entry takes precedence over an all-qubit one.
    pub fn error_for(&self, label: &str, qubits: &[QubitId]) -> Option<&ErrorChannel> {
        self.local_error(label, qubits)
            .or_else(|| self.all_qubit_error(label))
    }

    /// All qubit-specific keys in deterministic order
    pub fn local_keys(&self) -> Vec<InstructionKey> {
        self.local_errors
            .iter()
            .flat_map(|(label, by_qubits)| {
                by_qubits
                    .keys()
                    .map(move |qubits| (label.clone(), qubits.clone()))
            })
            .collect()
    }

    /// Number of qubit-specific entries
    pub fn num_local_errors(&self) -> usize {
        self.local_errors.values().map(BTreeMap::len).sum()
    }

    /// Number of qubit-specific entries for one label
    pub fn num_local_errors_for(&self, label: &str) -> usize {
        self.local_errors.get(label).map_or(0, BTreeMap::len)
    }

    /// Number of all-qubit entries
    pub fn num_all_qubit_errors(&self) -> usize {
        self.all_qubit_errors.len()
    }

    /// Labels that carry any noise
    pub fn noisy_instructions(&self) -> BTreeSet<&str> {
        self.local_errors
            .keys()
            .chain(self.all_qubit_errors.keys())
            .map(String::as_str)
            .collect()
    }

    /// Qubits with at least one qubit-specific entry
    pub fn noisy_qubits(&self) -> BTreeSet<QubitId> {
        self.local_errors
            .values()
            .flat_map(|by_qubits| by_qubits.keys().flatten().copied())
            .collect()
    }

    /// Whether no noise is registered at all
    pub fn is_ideal(&self) -> bool {
        self.local_errors.is_empty() && self.all_qubit_errors.is_empty()
    }
}

impl fmt::Display for NoiseModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ideal() {
            return write!(f, "NoiseModel: Ideal");
        }
        writeln!(f, "NoiseModel:")?;
        writeln!(
            f,
            "  Basis gates: {:?}",
            self.basis_gates.iter().collect::<Vec<_>>()
        )?;
        writeln!(
            f,
            "  Instructions with noise: {:?}",
            self.noisy_instructions()
        )?;
        if !self.all_qubit_errors.is_empty() {
            writeln!(
                f,
                "  All-qubits errors: {:?}",
                self.all_qubit_errors.keys().collect::<Vec<_>>()
            )?;
        }
        write!(
            f,
            "  Qubits with noise: {:?} ({} local entries)",
            self.noisy_qubits(),
            self.num_local_errors()
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::ChannelFactory;

    fn flip(p: f64) -> ErrorChannel {
        ErrorChannel::pauli_mixture(&[("X", p), ("I", 1.0 - p)]).unwrap()
    }

    #[test]
    fn test_register_local_error() {
        let mut model = NoiseModel::new(["sx", "cx"]);
        model.register_error(flip(0.1), "sx", &[0]).unwrap();
        model
            .register_error(ChannelFactory::depolarizing(0.01, 2).unwrap(), "cx", &[0, 1])
            .unwrap();

        assert_eq!(model.num_local_errors(), 2);
        assert!(model.local_error("sx", &[0]).is_some());
        assert!(model.local_error("cx", &[1, 0]).is_none());
        assert_eq!(model.noisy_qubits().into_iter().collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn test_register_unknown_instruction() {
        let mut model = NoiseModel::new(["sx"]);
        let err = model.register_error(flip(0.1), "h", &[0]).unwrap_err();
        assert_eq!(err, UnmError::UnknownInstruction { label: "h".into() });
        assert!(model.is_ideal());
    }

    #[test]
    fn test_register_qubit_count_mismatch() {
        let mut model = NoiseModel::new(["cx"]);
        assert!(matches!(
            model.register_error(flip(0.1), "cx", &[0, 1]),
            Err(UnmError::ChannelQubitMismatch { expected: 2, found: 1 })
        ));
    }

    #[test]
    fn test_duplicate_registration_overwrites() {
        let mut model = NoiseModel::new(["sx"]);
        model.register_error(flip(0.1), "sx", &[0]).unwrap();
        model.register_error(flip(0.2), "sx", &[0]).unwrap();

        assert_eq!(model.num_local_errors(), 1);
        assert_eq!(model.local_error("sx", &[0]), Some(&flip(0.2)));
    }

    #[test]
    fn test_measure_is_always_known() {
        let mut model = NoiseModel::new(Vec::<String>::new());
        model.register_error_all_qubits(flip(0.02), "measure").unwrap();
        assert_eq!(model.num_all_qubit_errors(), 1);
        assert!(model.error_for("measure", &[5]).is_some());
    }

    #[test]
    fn test_marker_label() {
        let mut model = NoiseModel::new(["sx"]);
        assert!(model
            .register_error_all_qubits(flip(0.01), "x_StatePreparation")
            .is_err());

        model.declare_marker_label("x_StatePreparation");
        model
            .register_error_all_qubits(flip(0.01), "x_StatePreparation")
            .unwrap();
        assert!(!model.has_basis_gate("x_StatePreparation"));
    }

    #[test]
    fn test_local_overrides_all_qubit() {
        let mut model = NoiseModel::new(["sx"]);
        model.register_error_all_qubits(flip(0.1), "sx").unwrap();
        model.register_error(flip(0.3), "sx", &[2]).unwrap();

        assert_eq!(model.error_for("sx", &[2]), Some(&flip(0.3)));
        assert_eq!(model.error_for("sx", &[1]), Some(&flip(0.1)));
    }

    #[test]
    fn test_display() {
        let model = NoiseModel::new(["sx"]);
        assert_eq!(model.to_string(), "NoiseModel: Ideal");
    }
}
