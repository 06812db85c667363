//! Channel factory
//!
//! Gantree: L2_Noise → ChannelFactory
//!
//! Builds the three channel families of the unified noise model:
//! depolarizing channels for gate imperfection, thermal relaxation/dephasing
//! channels for decoherence during a gate, and bit-flip SPAM channels.

use crate::channel::ErrorChannel;
use crate::kraus::KrausOperator;
use serde::{Deserialize, Serialize};
use std::fmt;
use unm_core::physics::T2_T1_RATIO_MAX;
use unm_core::{instructions, Probability, UnmError, UnmResult};

/// Stateless builder for error channels
/// Gantree: ChannelFactory // 채널 생성
#[derive(Debug, Clone, Copy, Default)]
pub struct ChannelFactory;

impl ChannelFactory {
    // ========================================================================
    // Depolarizing
    // ========================================================================

    /// Depolarizing channel ρ → (1-p)ρ + p·I/d on `arity` qubits
    /// Gantree: depolarizing(p,arity) -> Result<ErrorChannel> // 탈분극
    ///
    /// Realised as a Pauli mixture: identity with weight `1 - p(4^n - 1)/4^n`
    /// and every non-identity Pauli string with weight `p/4^n`.
    pub fn depolarizing(probability: f64, arity: usize) -> UnmResult<ErrorChannel> {
        let p = Probability::new(probability)?.value();
        if !(1..=2).contains(&arity) {
            return Err(UnmError::InvalidArity(arity));
        }

        let labels = pauli_labels(arity);
        let num_terms = labels.len() as f64;
        let terms: Vec<(&str, f64)> = labels
            .iter()
            .map(|label| {
                let weight = if label.chars().all(|c| c == 'I') {
                    1.0 - p * (num_terms - 1.0) / num_terms
                } else {
                    p / num_terms
                };
                (label.as_str(), weight)
            })
            .collect();

        ErrorChannel::pauli_mixture(&terms)
    }

    // ========================================================================
    // Thermal Relaxation / Dephasing
    // ========================================================================

    /// Single-qubit thermal relaxation/dephasing over `duration_s`
    /// Gantree: thermal_relaxation(t1,t2,t) -> Result<ErrorChannel> // T1/T2 감쇠
    ///
    /// All three arguments use the same unit (seconds in this crate). The
    /// channel damps |1⟩ → |0⟩ with probability `1 - exp(-t/T1)` and decays
    /// coherences by `exp(-t/T2)`; the dephasing beyond what amplitude damping
    /// already causes is a phase flip with probability `(1 - f)/2`,
    /// `f = exp(-t/T2 + t/(2·T1))`.
    ///
    /// Requires `T1 > 0`, `T2 > 0`, `T2 <= 2·T1` and a non-negative duration.
    /// Infinite coherence times are allowed and mean "no decay".
    pub fn thermal_relaxation(t1_s: f64, t2_s: f64, duration_s: f64) -> UnmResult<ErrorChannel> {
        if t1_s.is_nan() || t1_s <= 0.0 {
            return Err(UnmError::InvalidCoherenceTime {
                name: "T1",
                value: t1_s,
            });
        }
        if t2_s.is_nan() || t2_s <= 0.0 {
            return Err(UnmError::InvalidCoherenceTime {
                name: "T2",
                value: t2_s,
            });
        }
        if t2_s > T2_T1_RATIO_MAX * t1_s {
            return Err(UnmError::InvalidT2 { t1_s, t2_s });
        }
        if !duration_s.is_finite() || duration_s < 0.0 {
            return Err(UnmError::InvalidDuration(duration_s));
        }

        let gamma = 1.0 - (-duration_s / t1_s).exp();
        let dephasing = (-duration_s / t2_s + duration_s / (2.0 * t1_s)).exp();
        let p_z = ((1.0 - dephasing) / 2.0).clamp(0.0, 0.5);

        let damping_keep = KrausOperator::real_2x2(1.0, 0.0, 0.0, (1.0 - gamma).sqrt());
        let damping_decay = KrausOperator::real_2x2(0.0, gamma.sqrt(), 0.0, 0.0);
        let z = KrausOperator::pauli('Z').ok_or_else(|| UnmError::InvalidPauliLabel("Z".into()))?;

        // Z·K_decay == K_decay, so the phase flip only splits the keep branch
        let kraus: Vec<KrausOperator> = [
            damping_keep.scale((1.0 - p_z).sqrt()),
            z.matmul(&damping_keep).scale(p_z.sqrt()),
            damping_decay,
        ]
        .into_iter()
        .filter(|k| !k.is_zero())
        .collect();

        ErrorChannel::from_kraus(kraus)
    }

    /// Two-qubit relaxation channel for a gate of shared duration on `(a, b)`
    ///
    /// Built by expanding the two single-qubit channels, `a` on the first qubit.
    pub fn thermal_relaxation_pair(
        (t1_a, t2_a): (f64, f64),
        (t1_b, t2_b): (f64, f64),
        duration_s: f64,
    ) -> UnmResult<ErrorChannel> {
        let first = Self::thermal_relaxation(t1_a, t2_a, duration_s)?;
        let second = Self::thermal_relaxation(t1_b, t2_b, duration_s)?;
        Ok(first.expand(&second))
    }

    // ========================================================================
    // SPAM
    // ========================================================================

    /// Bit-flip channel for state preparation or measurement
    /// Gantree: spam(p,subject) -> Result<SpamChannel> // SPAM
    ///
    /// With probability `p` apply `X`, otherwise identity.
    pub fn spam(error_probability: f64, subject: SpamSubject) -> UnmResult<SpamChannel> {
        let p = Probability::new(error_probability)?;
        let channel = ErrorChannel::pauli_mixture(&[("X", p.value()), ("I", p.complement())])?;
        Ok(SpamChannel {
            subject,
            probability: p,
            channel,
        })
    }
}

/// All Pauli labels on `n` qubits, identity first
fn pauli_labels(n: usize) -> Vec<String> {
    (0..n).fold(vec![String::new()], |acc, _| {
        acc.iter()
            .flat_map(|prefix| ['I', 'X', 'Y', 'Z'].map(|c| format!("{prefix}{c}")))
            .collect()
    })
}

// ============================================================================
// SPAM Types
// ============================================================================

/// Instruction a SPAM channel is attached to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpamSubject {
    /// Marker gate placed right after state preparation
    ///
    /// The channel flips with probability `p` on its own, so the marker must
    /// act as identity. A marker that itself performs an `x` turns the net
    /// flip probability into `1 - p`.
    StatePreparation {
        /// Label of the marker gate, e.g. `x_StatePreparation`
        label: String,
    },
    /// Readout
    Measurement,
}

impl SpamSubject {
    /// State preparation with the recommended marker label
    pub fn state_preparation() -> Self {
        SpamSubject::StatePreparation {
            label: instructions::STATE_PREPARATION.to_string(),
        }
    }

    /// Instruction label the channel is registered under
    pub fn instruction_label(&self) -> &str {
        match self {
            SpamSubject::StatePreparation { label } => label,
            SpamSubject::Measurement => instructions::MEASURE,
        }
    }
}

impl fmt::Display for SpamSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpamSubject::StatePreparation { label } => write!(f, "state preparation ({label})"),
            SpamSubject::Measurement => write!(f, "measurement"),
        }
    }
}

/// Bit-flip channel bound to its SPAM subject
#[derive(Debug, Clone, PartialEq)]
pub struct SpamChannel {
    /// Where the channel applies
    pub subject: SpamSubject,
    /// Flip probability
    pub probability: Probability,
    /// The channel itself
    pub channel: ErrorChannel,
}

// ============================================================================
// Tests
// ============================================================================
