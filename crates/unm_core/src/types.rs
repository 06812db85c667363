//! Core types for UNM
//!
//! Gantree: L0_Foundation → CoreTypes
//!
//! Provides fundamental type aliases and validated wrapper types
//! used throughout the UNM system.

use crate::error::{UnmError, UnmResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Type Aliases
// ============================================================================

/// Physical qubit identifier as it appears in calibration data
/// Gantree: QubitId // pub type QubitId = usize
pub type QubitId = usize;

/// Instruction label (gate name, `measure`, or a marker label)
pub type InstructionLabel = String;

// ============================================================================
// Probability (Validated Wrapper)
// ============================================================================

/// Probability value in range [0, 1]
/// Gantree: Probability // 범위 검증 구조체
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Probability(f64);

impl Probability {
    /// Create a new Probability with validation
    /// Gantree: new(f64) -> Result<Self> // 생성+검증
    pub fn new(value: f64) -> UnmResult<Self> {
        if !(0.0..=1.0).contains(&value) {
            return Err(UnmError::InvalidProbability(value));
        }
        Ok(Self(value))
    }

    /// Interpret a user-supplied value where a negative number means "not set"
    ///
    /// Returns `Ok(None)` for any negative value, otherwise validates.
    pub fn optional(value: f64) -> UnmResult<Option<Self>> {
        if value < 0.0 {
            Ok(None)
        } else {
            Self::new(value).map(Some)
        }
    }

    /// Get the probability value
    #[inline]
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Get the complement (1 - p)
    #[inline]
    pub fn complement(&self) -> f64 {
        1.0 - self.0
    }

    /// Zero probability
    pub const ZERO: Self = Self(0.0);

    /// Certainty (p = 1)
    pub const ONE: Self = Self(1.0);
}

impl Default for Probability {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Probability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.0)
    }
}

impl TryFrom<f64> for Probability {
    type Error = UnmError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

// ============================================================================
// QubitPair (Canonical Unordered Pair)
// ============================================================================

/// Unordered pair of qubits, stored with the smaller id first
/// Gantree: QubitPair // 정규화된 큐비트 쌍
///
/// `QubitPair::new(3, 1) == QubitPair::new(1, 3)`, so it can key symmetric
/// tables such as two-qubit error rates or the "seen pairs" set used during
/// model assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QubitPair {
    low: QubitId,
    high: QubitId,
}

impl QubitPair {
    /// Create a canonical pair from either ordering
    pub fn new(a: QubitId, b: QubitId) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    /// Smaller qubit id
    #[inline]
    pub fn low(&self) -> QubitId {
        self.low
    }

    /// Larger qubit id
    #[inline]
    pub fn high(&self) -> QubitId {
        self.high
    }

    /// Whether both ends are the same qubit
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.low == self.high
    }

    /// Whether the pair touches `qubit`
    pub fn contains(&self, qubit: QubitId) -> bool {
        self.low == qubit || self.high == qubit
    }

    /// Pair as an ordered tuple `[low, high]`
    pub fn to_vec(&self) -> Vec<QubitId> {
        vec![self.low, self.high]
    }
}

impl fmt::Display for QubitPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.low, self.high)
    }
}

impl FromStr for QubitPair {
    type Err = UnmError;

    /// Parse the calibration key format `"i_j"` (either order)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (a, b) = s
            .trim()
            .split_once('_')
            .ok_or_else(|| UnmError::MalformedPairRate(s.to_string()))?;
        let a = a
            .trim()
            .parse::<QubitId>()
            .map_err(|_| UnmError::MalformedPairRate(s.to_string()))?;
        let b = b
            .trim()
            .parse::<QubitId>()
            .map_err(|_| UnmError::MalformedPairRate(s.to_string()))?;
        Ok(Self::new(a, b))
    }
}

impl From<(QubitId, QubitId)> for QubitPair {
    fn from((a, b): (QubitId, QubitId)) -> Self {
        Self::new(a, b)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probability_valid() {
        let p = Probability::new(0.5).unwrap();
        assert_eq!(p.value(), 0.5);
        assert_eq!(p.complement(), 0.5);
    }

    #[test]
    fn test_probability_invalid() {
        assert!(Probability::new(-0.1).is_err());
        assert!(Probability::new(1.1).is_err());
        assert!(Probability::new(f64::NAN).is_err());
    }

    #[test]
    fn test_probability_optional_sentinel() {
        assert_eq!(Probability::optional(-1.0).unwrap(), None);
        assert_eq!(
            Probability::optional(0.02).unwrap().map(|p| p.value()),
            Some(0.02)
        );
        assert!(Probability::optional(2.0).is_err());
    }

    #[test]
    fn test_pair_is_canonical() {
        assert_eq!(QubitPair::new(3, 1), QubitPair::new(1, 3));
        assert_eq!(QubitPair::new(3, 1).low(), 1);
        assert_eq!(QubitPair::new(3, 1).to_string(), "1_3");
    }

    #[test]
    fn test_pair_parse() {
        let pair: QubitPair = "7_2".parse().unwrap();
        assert_eq!(pair, QubitPair::new(2, 7));
        assert!("7-2".parse::<QubitPair>().is_err());
        assert!("a_2".parse::<QubitPair>().is_err());
    }
}
