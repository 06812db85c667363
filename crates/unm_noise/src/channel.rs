//! Error channels
//!
//! Gantree: L1_Channel → ErrorChannel
//!
//! A completely positive, trace preserving map on one or two qubits in Kraus
//! form, ρ → Σ_k K_k ρ K_k†. Channels are immutable: [`ErrorChannel::compose`]
//! and [`ErrorChannel::expand`] always return new instances.
//!
//! Composition follows the operator convention: `a.compose(&b)` applies `b`
//! first and `a` second, so its Kraus set is `{A_i · B_j}`.

use crate::kraus::KrausOperator;
use num_complex::Complex64;
use std::fmt;
use unm_core::numerics::{CPTP_TOLERANCE, PROBABILITY_TOLERANCE};
use unm_core::{UnmError, UnmResult};

/// CPTP error channel in Kraus representation
/// Gantree: ErrorChannel // 오류 채널
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorChannel {
    kraus: Vec<KrausOperator>,
    num_qubits: usize,
}

impl ErrorChannel {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create from Kraus operators, checking shape and completeness
    pub fn from_kraus(kraus: Vec<KrausOperator>) -> UnmResult<Self> {
        let first = kraus
            .first()
            .ok_or_else(|| UnmError::dimension("Kraus operator count", 1, 0))?;
        let num_qubits = first.num_qubits();
        if let Some(bad) = kraus.iter().find(|k| k.num_qubits() != num_qubits) {
            return Err(UnmError::ChannelQubitMismatch {
                expected: num_qubits,
                found: bad.num_qubits(),
            });
        }

        let channel = Self { kraus, num_qubits };
        if !channel.is_cptp(CPTP_TOLERANCE) {
            return Err(UnmError::InvalidProbabilitySum(channel.trace_weight()));
        }
        Ok(channel)
    }

    /// Identity channel on `num_qubits` qubits
    pub fn identity(num_qubits: usize) -> Self {
        Self {
            kraus: vec![KrausOperator::identity(num_qubits)],
            num_qubits,
        }
    }

    /// Mixture of Pauli strings, e.g. `[("X", p), ("I", 1 - p)]`
    /// Gantree: pauli_mixture([(label,p)]) -> Result<Self> // 파울리 혼합
    ///
    /// All labels must have the same length. Probabilities must lie in [0, 1]
    /// and sum to one. Zero-weight terms are dropped.
    pub fn pauli_mixture(terms: &[(&str, f64)]) -> UnmResult<Self> {
        let (first_label, _) = terms
            .first()
            .ok_or_else(|| UnmError::dimension("Pauli mixture terms", 1, 0))?;
        let num_qubits = first_label.chars().count();

        let mut total = 0.0;
        let mut kraus = Vec::with_capacity(terms.len());
        for (label, probability) in terms {
            if label.chars().count() != num_qubits {
                return Err(UnmError::InvalidPauliLabel(label.to_string()));
            }
            if !(0.0..=1.0).contains(probability) {
                return Err(UnmError::InvalidProbability(*probability));
            }
            let pauli = KrausOperator::pauli_string(label)?;
            total += probability;
            if *probability > 0.0 {
                kraus.push(pauli.scale(probability.sqrt()));
            }
        }

        if (total - 1.0).abs() > PROBABILITY_TOLERANCE {
            return Err(UnmError::InvalidProbabilitySum(total));
        }
        Ok(Self { kraus, num_qubits })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Number of qubits the channel acts on
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Kraus operators
    pub fn kraus_operators(&self) -> &[KrausOperator] {
        &self.kraus
    }

    /// Number of Kraus operators
    pub fn num_kraus(&self) -> usize {
        self.kraus.len()
    }

    // ========================================================================
    // Algebra
    // ========================================================================

    /// Sequential composition: apply `other` first, then `self`
    /// Gantree: compose(&self,&other) -> Result<Self> // 순차 합성
    pub fn compose(&self, other: &ErrorChannel) -> UnmResult<ErrorChannel> {
        if self.num_qubits != other.num_qubits {
            return Err(UnmError::ChannelQubitMismatch {
                expected: self.num_qubits,
                found: other.num_qubits,
            });
        }

        let kraus = self
            .kraus
            .iter()
            .flat_map(|a| other.kraus.iter().map(move |b| a.matmul(b)))
            .filter(|k| !k.is_zero())
            .collect();
        Ok(ErrorChannel {
            kraus,
            num_qubits: self.num_qubits,
        })
    }

    /// Tensor combination on independent subsystems: `self` on the first
    /// qubit of the target tuple, `other` on the remaining ones
    /// Gantree: expand(&self,&other) -> Self // 텐서 확장
    pub fn expand(&self, other: &ErrorChannel) -> ErrorChannel {
        let kraus = self
            .kraus
            .iter()
            .flat_map(|a| other.kraus.iter().map(move |b| a.kron(b)))
            .collect();
        ErrorChannel {
            kraus,
            num_qubits: self.num_qubits + other.num_qubits,
        }
    }

    // ========================================================================
    // Diagnostics
    // ========================================================================

    /// Apply the channel to a row-major density matrix
    pub fn apply(&self, rho: &KrausOperator) -> UnmResult<KrausOperator> {
        if rho.num_qubits() != self.num_qubits {
            return Err(UnmError::ChannelQubitMismatch {
                expected: self.num_qubits,
                found: rho.num_qubits(),
            });
        }
        let zero = KrausOperator::identity(self.num_qubits).scale(0.0);
        Ok(self.kraus.iter().fold(zero, |acc, k| {
            acc.add(&k.matmul(rho).matmul(&k.adjoint()))
        }))
    }

    /// Superoperator Σ_k conj(K_k) ⊗ K_k (column-stacking convention)
    ///
    /// Unlike the Kraus set, this matrix is unique for a given map, so it is
    /// the right object to compare two channels with.
    pub fn superoperator(&self) -> KrausOperator {
        let dimension = 1 << (2 * self.num_qubits);
        let zero = KrausOperator::identity(2 * self.num_qubits).scale(0.0);
        let result = self
            .kraus
            .iter()
            .fold(zero, |acc, k| acc.add(&k.conj().kron(k)));
        debug_assert_eq!(result.dimension(), dimension);
        result
    }

    /// Whether Σ K† K = I within `tolerance`
    pub fn is_cptp(&self, tolerance: f64) -> bool {
        let identity = KrausOperator::identity(self.num_qubits);
        self.completeness().max_abs_diff(&identity) <= tolerance
    }

    /// Whether both channels describe the same map within `tolerance`
    pub fn approx_eq(&self, other: &ErrorChannel, tolerance: f64) -> bool {
        self.num_qubits == other.num_qubits
            && self.superoperator().max_abs_diff(&other.superoperator()) <= tolerance
    }

    /// Σ K† K
    fn completeness(&self) -> KrausOperator {
        let zero = KrausOperator::identity(self.num_qubits).scale(0.0);
        self.kraus
            .iter()
            .fold(zero, |acc, k| acc.add(&k.adjoint().matmul(k)))
    }

    /// Tr(Σ K† K) / d, equal to one for a trace preserving channel
    fn trace_weight(&self) -> f64 {
        let c = self.completeness();
        let d = c.dimension();
        let trace: Complex64 = (0..d).map(|i| c.get(i, i)).sum();
        trace.re / d as f64
    }
}

impl fmt::Display for ErrorChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ErrorChannel({}Q, {} Kraus ops)",
            self.num_qubits,
            self.kraus.len()
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ket0() -> KrausOperator {
        KrausOperator::real_2x2(1.0, 0.0, 0.0, 0.0)
    }

    #[test]
    fn test_pauli_mixture_bit_flip() {
        let channel = ErrorChannel::pauli_mixture(&[("X", 0.1), ("I", 0.9)]).unwrap();
        assert_eq!(channel.num_qubits(), 1);
        assert_eq!(channel.num_kraus(), 2);
        assert!(channel.is_cptp(1e-12));

        let rho = channel.apply(&ket0()).unwrap();
        assert_relative_eq!(rho.get(0, 0).re, 0.9, epsilon = 1e-12);
        assert_relative_eq!(rho.get(1, 1).re, 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_pauli_mixture_rejects_bad_input() {
        assert!(ErrorChannel::pauli_mixture(&[]).is_err());
        assert!(matches!(
            ErrorChannel::pauli_mixture(&[("X", 0.5), ("I", 0.4)]),
            Err(UnmError::InvalidProbabilitySum(_))
        ));
        assert!(matches!(
            ErrorChannel::pauli_mixture(&[("X", -0.5), ("I", 1.5)]),
            Err(UnmError::InvalidProbability(_))
        ));
        assert!(ErrorChannel::pauli_mixture(&[("XX", 0.5), ("I", 0.5)]).is_err());
    }

    #[test]
    fn test_pauli_mixture_drops_zero_terms() {
        let channel = ErrorChannel::pauli_mixture(&[("X", 0.0), ("I", 1.0)]).unwrap();
        assert_eq!(channel.num_kraus(), 1);
        assert!(channel.approx_eq(&ErrorChannel::identity(1), 1e-12));
    }

    #[test]
    fn test_compose_order() {
        // Bit flip then amplitude-style reset differs from reset then bit flip
        let flip = ErrorChannel::pauli_mixture(&[("X", 1.0)]).unwrap();
        let reset = ErrorChannel::from_kraus(vec![
            KrausOperator::real_2x2(1.0, 0.0, 0.0, 0.0),
            KrausOperator::real_2x2(0.0, 1.0, 0.0, 0.0),
        ])
        .unwrap();

        // reset.compose(flip): flip first, then reset -> always |0>
        let rho = reset.compose(&flip).unwrap().apply(&ket0()).unwrap();
        assert_relative_eq!(rho.get(0, 0).re, 1.0, epsilon = 1e-12);

        // flip.compose(reset): reset first, then flip -> always |1>
        let rho = flip.compose(&reset).unwrap().apply(&ket0()).unwrap();
        assert_relative_eq!(rho.get(1, 1).re, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_compose_qubit_mismatch() {
        let one = ErrorChannel::identity(1);
        let two = ErrorChannel::identity(2);
        assert!(matches!(
            one.compose(&two),
            Err(UnmError::ChannelQubitMismatch { expected: 1, found: 2 })
        ));
    }

    #[test]
    fn test_expand_acts_on_independent_qubits() {
        let flip = ErrorChannel::pauli_mixture(&[("X", 1.0)]).unwrap();
        let id = ErrorChannel::identity(1);
        let expanded = flip.expand(&id);
        assert_eq!(expanded.num_qubits(), 2);
        assert!(expanded.is_cptp(1e-12));

        // Flip on the first qubit only: |00> -> |10>
        let mut rho00 = vec![Complex64::new(0.0, 0.0); 16];
        rho00[0] = Complex64::new(1.0, 0.0);
        let rho = KrausOperator::new(rho00, 4).unwrap();
        let out = expanded.apply(&rho).unwrap();
        assert_relative_eq!(out.get(2, 2).re, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_from_kraus_rejects_non_cptp() {
        let half = KrausOperator::identity(1).scale(0.5);
        assert!(ErrorChannel::from_kraus(vec![half]).is_err());
        assert!(ErrorChannel::from_kraus(vec![]).is_err());
    }
}
