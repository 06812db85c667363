//! Error types for UNM
//!
//! Gantree: L0_Foundation → Errors
//!
//! Hard failures are `UnmError` variants. Conditions the engine repairs or
//! tolerates (missing calibration values, T2 > 2·T1 at ingestion time) are
//! reported as plain records instead, see [`PhysicalConsistencyWarning`] and
//! [`MissingCalibrationValue`].

// Error variant fields are self-documenting via error messages
#![allow(missing_docs)]

use crate::types::QubitId;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Main error type for UNM
/// Gantree: UnmError // enum
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UnmError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    /// Probability value out of range [0, 1]
    /// Gantree: InvalidProbability(f64) // 확률 범위
    #[error("Invalid probability {0}: must be in range [0, 1]")]
    InvalidProbability(f64),

    /// Mixture probabilities do not add up to one
    #[error("Invalid probability sum {0}: mixture probabilities must sum to 1")]
    InvalidProbabilitySum(f64),

    /// Invalid T2 value (must be <= 2*T1)
    /// Gantree: InvalidT2{{t2,t1}} // T2>2*T1
    #[error("Invalid T2 ({t2_s:e}s): must be <= 2*T1 ({t1_s:e}s)")]
    InvalidT2 { t1_s: f64, t2_s: f64 },

    /// Non-positive or NaN coherence time
    #[error("Invalid coherence time {name}={value}: must be positive")]
    InvalidCoherenceTime { name: &'static str, value: f64 },

    /// Negative or NaN gate duration
    #[error("Invalid gate duration {0}: must be finite and non-negative")]
    InvalidDuration(f64),

    /// Unsupported channel arity
    #[error("Invalid channel arity {0}: only 1- and 2-qubit channels are supported")]
    InvalidArity(usize),

    /// Pauli label with characters outside IXYZ or the wrong length
    #[error("Invalid Pauli label '{0}'")]
    InvalidPauliLabel(String),

    // ========================================================================
    // Channel / Registration Errors
    // ========================================================================
    /// Channel qubit count does not match the operand or target
    /// Gantree: ChannelQubitMismatch{{exp,got}} // 큐비트 수 불일치
    #[error("Channel acts on {found} qubit(s), expected {expected}")]
    ChannelQubitMismatch { expected: usize, found: usize },

    /// Instruction not declared in the noise model
    /// Gantree: UnknownInstruction{{label}} // 미등록 명령
    #[error("Unknown instruction '{label}': not in the declared basis gates")]
    UnknownInstruction { label: String },

    /// Table or list length does not match the qubit or gate count
    /// Gantree: DimensionMismatch{{what,exp,got}} // 차원 불일치
    #[error("Dimension mismatch in {what}: expected {expected}, found {found}")]
    DimensionMismatch {
        what: String,
        expected: usize,
        found: usize,
    },

    /// Assembly phase invoked before its predecessor
    #[error("Assembly phase '{requested}' requested while in phase '{current}'")]
    AssemblyOutOfOrder {
        requested: &'static str,
        current: &'static str,
    },

    // ========================================================================
    // Calibration Errors
    // ========================================================================
    /// Calibration source has no rows
    #[error("Calibration table is empty")]
    EmptyCalibration,

    /// Required column not present in the calibration header
    #[error("Calibration column '{0}' is missing")]
    MissingColumn(String),

    /// Row that cannot be parsed
    #[error("Malformed calibration row {row}: {reason}")]
    MalformedRow { row: usize, reason: String },

    /// Two-qubit error entry not of the form `i_j:rate`
    /// Gantree: MalformedPairRate(String) // i_j:rate 형식
    #[error("Malformed two-qubit error entry '{0}': expected 'i_j:rate'")]
    MalformedPairRate(String),

    /// Qubit id appears more than once
    #[error("Qubit {0} appears more than once in the calibration table")]
    DuplicateQubit(QubitId),

    /// Coherence time missing on the first qubit, which is the fallback source
    #[error("{field} is missing on the first qubit; no fallback value is available")]
    NoCoherenceFallback { field: &'static str },

    // ========================================================================
    // Configuration / I/O Errors
    // ========================================================================
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(String),

    /// File I/O error
    #[error("File error: {0}")]
    FileError(String),
}

/// Result type alias for UNM operations
/// Gantree: UnmResult<T> // type alias
pub type UnmResult<T> = Result<T, UnmError>;

// ============================================================================
// Error Conversion Helpers
// ============================================================================

impl From<serde_json::Error> for UnmError {
    fn from(err: serde_json::Error) -> Self {
        UnmError::JsonError(err.to_string())
    }
}

impl From<std::io::Error> for UnmError {
    fn from(err: std::io::Error) -> Self {
        UnmError::FileError(err.to_string())
    }
}

// ============================================================================
// Error Helpers
// ============================================================================

impl UnmError {
    /// Shorthand for [`UnmError::DimensionMismatch`]
    pub fn dimension(what: impl Into<String>, expected: usize, found: usize) -> Self {
        UnmError::DimensionMismatch {
            what: what.into(),
            expected,
            found,
        }
    }

    /// Check if error is a numeric validation error
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            UnmError::InvalidProbability(_)
                | UnmError::InvalidProbabilitySum(_)
                | UnmError::InvalidT2 { .. }
                | UnmError::InvalidCoherenceTime { .. }
                | UnmError::InvalidDuration(_)
                | UnmError::InvalidArity(_)
                | UnmError::InvalidPauliLabel(_)
        )
    }

    /// Check if error comes from a model configuration problem
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            UnmError::UnknownInstruction { .. }
                | UnmError::DimensionMismatch { .. }
                | UnmError::ChannelQubitMismatch { .. }
                | UnmError::AssemblyOutOfOrder { .. }
                | UnmError::ConfigError(_)
        )
    }

    /// Check if error comes from the calibration source
    pub fn is_calibration_error(&self) -> bool {
        matches!(
            self,
            UnmError::EmptyCalibration
                | UnmError::MissingColumn(_)
                | UnmError::MalformedRow { .. }
                | UnmError::MalformedPairRate(_)
                | UnmError::DuplicateQubit(_)
                | UnmError::NoCoherenceFallback { .. }
        )
    }
}

// ============================================================================
// Non-fatal Diagnostics
// ============================================================================

/// Qubit whose calibrated T2 exceeds 2·T1
/// Gantree: PhysicalConsistencyWarning // T2>2*T1 경고
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicalConsistencyWarning {
    /// Qubit id
    pub qubit: QubitId,
    /// T1 in seconds
    pub t1_s: f64,
    /// T2 in seconds
    pub t2_s: f64,
}

impl fmt::Display for PhysicalConsistencyWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "incompatible decay rates on qubit Q{}: T2={:e}s > 2*T1 (T1={:e}s)",
            self.qubit, self.t2_s, self.t1_s
        )
    }
}

/// Calibration field that was not a number and got substituted
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MissingCalibrationValue {
    /// Qubit id
    pub qubit: QubitId,
    /// Column name
    pub field: &'static str,
    /// Value used instead
    pub substituted: f64,
}

impl fmt::Display for MissingCalibrationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "qubit Q{}: {} missing, using {}",
            self.qubit, self.field, self.substituted
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = UnmError::InvalidProbability(1.5);
        assert!(err.to_string().contains("1.5"));
    }

    #[test]
    fn test_dimension_mismatch_display() {
        let err = UnmError::dimension("single-qubit gate times", 3, 2);
        let msg = err.to_string();
        assert!(msg.contains("single-qubit gate times"));
        assert!(msg.contains('3'));
        assert!(msg.contains('2'));
    }

    #[test]
    fn test_error_classes() {
        assert!(UnmError::InvalidProbability(-0.1).is_validation_error());
        assert!(!UnmError::EmptyCalibration.is_validation_error());
        assert!(UnmError::UnknownInstruction { label: "cz".into() }.is_configuration_error());
        assert!(UnmError::MalformedPairRate("0-1".into()).is_calibration_error());
    }

    #[test]
    fn test_warning_display() {
        let warning = PhysicalConsistencyWarning {
            qubit: 4,
            t1_s: 50e-6,
            t2_s: 150e-6,
        };
        assert!(warning.to_string().contains("Q4"));
    }
}
