//! Noise build configuration
//!
//! Gantree: L4_Engine → NoiseBuildConfig
//!
//! Everything the assembler needs besides per-qubit coherence times: gate
//! lists, depolarizing and SPAM probabilities, gate execution times and the
//! channel families to install.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use unm_calibration::CalibrationData;
use unm_core::{instructions, Probability, UnmError, UnmResult};
use unm_noise::GateTimeTable;

fn default_state_preparation_label() -> String {
    instructions::STATE_PREPARATION.to_string()
}

fn default_skip() -> f64 {
    instructions::SKIP_SENTINEL
}

fn default_true() -> bool {
    true
}

/// Configuration of one noise model build
/// Gantree: NoiseBuildConfig // 모델 생성 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseBuildConfig {
    // ========================================================================
    // Gates
    // ========================================================================
    /// Single-qubit gates that receive noise
    pub single_qubit_gates: Vec<String>,

    /// Two-qubit gates that receive noise
    pub two_qubit_gates: Vec<String>,

    /// Declared basis gates; the union of the gate lists when absent
    #[serde(default)]
    pub basis_gates: Option<Vec<String>>,

    // ========================================================================
    // Probabilities
    // ========================================================================
    /// Depolarizing probability of every single-qubit gate
    pub depolarizing_prob_1q: f64,

    /// Depolarizing probability of every two-qubit gate
    pub depolarizing_prob_2q: f64,

    /// State-preparation flip probability; negative skips the channel
    #[serde(default = "default_skip")]
    pub state_preparation_error_prob: f64,

    /// Readout flip probability; negative skips the channel
    #[serde(default = "default_skip")]
    pub measurement_error_prob: f64,

    /// Marker instruction placed after state preparation
    #[serde(default = "default_state_preparation_label")]
    pub state_preparation_label: String,

    // ========================================================================
    // Timing / Families
    // ========================================================================
    /// Gate execution times (ns), indexed by qubit position and gate index
    pub gate_times: GateTimeTable,

    /// Install depolarizing channels
    #[serde(default = "default_true")]
    pub depolarizing: bool,

    /// Install thermal relaxation/dephasing channels
    #[serde(default = "default_true")]
    pub relaxation: bool,
}

impl NoiseBuildConfig {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// IBM-style device: `sx`, `x` and `cx` at 35 ns / 300 ns
    /// Gantree: superconducting(nq) -> Self // 초전도 기본값
    pub fn superconducting(num_qubits: usize) -> Self {
        let single_qubit_gates = vec!["sx".to_string(), "x".to_string()];
        let two_qubit_gates = vec!["cx".to_string()];
        Self {
            gate_times: GateTimeTable::superconducting(
                num_qubits,
                single_qubit_gates.len(),
                two_qubit_gates.len(),
            ),
            single_qubit_gates,
            two_qubit_gates,
            basis_gates: None,
            depolarizing_prob_1q: 0.001,
            depolarizing_prob_2q: 0.01,
            state_preparation_error_prob: instructions::SKIP_SENTINEL,
            measurement_error_prob: instructions::SKIP_SENTINEL,
            state_preparation_label: default_state_preparation_label(),
            depolarizing: true,
            relaxation: true,
        }
    }

    /// Noiseless build: same gates, no channel installed
    pub fn ideal(num_qubits: usize) -> Self {
        Self {
            depolarizing_prob_1q: 0.0,
            depolarizing_prob_2q: 0.0,
            depolarizing: false,
            relaxation: false,
            ..Self::superconducting(num_qubits)
        }
    }

    /// Probabilities seeded from calibration means
    /// Gantree: from_calibration(data,1q,2q) -> Self // 평균 에러율 사용
    ///
    /// Depolarizing probabilities take the mean single- and two-qubit error
    /// rates (zero when nothing is calibrated), the measurement channel the
    /// mean readout error. Gate times use the 35 ns / 300 ns defaults.
    pub fn from_calibration(
        data: &CalibrationData,
        single_qubit_gates: &[&str],
        two_qubit_gates: &[&str],
    ) -> Self {
        Self {
            depolarizing_prob_1q: data.mean_single_qubit_error().unwrap_or(0.0),
            depolarizing_prob_2q: data.mean_two_qubit_error().unwrap_or(0.0),
            measurement_error_prob: data
                .mean_measurement_error()
                .unwrap_or(instructions::SKIP_SENTINEL),
            ..Self::superconducting(data.num_qubits())
        }
        .with_gates(single_qubit_gates, two_qubit_gates)
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// Parse from JSON text
    pub fn from_json_str(json: &str) -> UnmResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> UnmResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> UnmResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    // ========================================================================
    // Builder Methods
    // ========================================================================

    /// Replace the gate lists
    ///
    /// The gate-time table is reset to the 35 ns / 300 ns defaults for the
    /// new shape; call [`NoiseBuildConfig::with_gate_times`] afterwards to
    /// supply measured times.
    pub fn with_gates(mut self, single_qubit_gates: &[&str], two_qubit_gates: &[&str]) -> Self {
        self.single_qubit_gates = single_qubit_gates.iter().map(|s| s.to_string()).collect();
        self.two_qubit_gates = two_qubit_gates.iter().map(|s| s.to_string()).collect();
        self.gate_times = GateTimeTable::superconducting(
            self.gate_times.single_qubit_ns.len(),
            self.single_qubit_gates.len(),
            self.two_qubit_gates.len(),
        );
        self
    }

    /// Declare an explicit basis-gate set
    pub fn with_basis_gates(mut self, basis_gates: &[&str]) -> Self {
        self.basis_gates = Some(basis_gates.iter().map(|s| s.to_string()).collect());
        self
    }

    /// Set both depolarizing probabilities
    pub fn with_depolarizing_probs(mut self, p_1q: f64, p_2q: f64) -> Self {
        self.depolarizing_prob_1q = p_1q;
        self.depolarizing_prob_2q = p_2q;
        self
    }

    /// Set SPAM probabilities (negative skips)
    pub fn with_spam(mut self, state_preparation: f64, measurement: f64) -> Self {
        self.state_preparation_error_prob = state_preparation;
        self.measurement_error_prob = measurement;
        self
    }

    /// Set the state-preparation marker label
    pub fn with_state_preparation_label(mut self, label: &str) -> Self {
        self.state_preparation_label = label.to_string();
        self
    }

    /// Set gate execution times
    pub fn with_gate_times(mut self, gate_times: GateTimeTable) -> Self {
        self.gate_times = gate_times;
        self
    }

    /// Select channel families
    pub fn with_channels(mut self, depolarizing: bool, relaxation: bool) -> Self {
        self.depolarizing = depolarizing;
        self.relaxation = relaxation;
        self
    }

    // ========================================================================
    // Derived
    // ========================================================================

    /// Basis gates to declare on the model
    pub fn effective_basis_gates(&self) -> Vec<String> {
        match &self.basis_gates {
            Some(basis) => basis.clone(),
            None => self
                .single_qubit_gates
                .iter()
                .chain(&self.two_qubit_gates)
                .cloned()
                .collect(),
        }
    }

    /// Whether any SPAM channel will be installed
    pub fn has_spam(&self) -> bool {
        self.state_preparation_error_prob >= 0.0 || self.measurement_error_prob >= 0.0
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Validate probabilities and gate lists
    /// Gantree: validate(&self) -> Result // 설정 검증
    ///
    /// Gate-time dimensions are checked by the assembler, which knows the
    /// qubit count.
    pub fn validate(&self) -> UnmResult<()> {
        Probability::new(self.depolarizing_prob_1q)?;
        Probability::new(self.depolarizing_prob_2q)?;
        Probability::optional(self.state_preparation_error_prob)?;
        Probability::optional(self.measurement_error_prob)?;

        let mut seen = HashSet::new();
        for gate in self.single_qubit_gates.iter().chain(&self.two_qubit_gates) {
            if gate.is_empty() {
                return Err(UnmError::ConfigError("empty gate label".into()));
            }
            if !seen.insert(gate.as_str()) {
                return Err(UnmError::ConfigError(format!(
                    "gate '{gate}' listed more than once"
                )));
            }
        }

        if self.state_preparation_label.is_empty() {
            return Err(UnmError::ConfigError(
                "state preparation label must not be empty".into(),
            ));
        }
        if seen.contains(self.state_preparation_label.as_str()) {
            return Err(UnmError::ConfigError(format!(
                "state preparation label '{}' collides with a noisy gate",
                self.state_preparation_label
            )));
        }
        Ok(())
    }
}

impl fmt::Display for NoiseBuildConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "NoiseBuildConfig(1Q={:?} p={}, 2Q={:?} p={}, prep={}, meas={}, depol={}, relax={})",
            self.single_qubit_gates,
            self.depolarizing_prob_1q,
            self.two_qubit_gates,
            self.depolarizing_prob_2q,
            self.state_preparation_error_prob,
            self.measurement_error_prob,
            self.depolarizing,
            self.relaxation
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
