//! Kraus operators
//!
//! Gantree: L1_Channel → KrausOperator
//!
//! Small dense complex matrices (2×2 or 4×4 in practice) used as the
//! building blocks of [`ErrorChannel`](crate::channel::ErrorChannel).
//! Matrices are stored row-major. Multi-qubit operators use the
//! "first qubit most significant" ordering of the Kronecker product.

use num_complex::Complex64;
use unm_core::{UnmError, UnmResult};

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);

/// Square complex matrix acting on one or more qubits
/// Gantree: KrausOperator // 크라우스 연산자
#[derive(Debug, Clone, PartialEq)]
pub struct KrausOperator {
    /// Row-major matrix elements, `dimension * dimension` long
    matrix: Vec<Complex64>,
    /// Matrix side (2^n for n qubits)
    dimension: usize,
}

impl KrausOperator {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create from row-major elements
    pub fn new(matrix: Vec<Complex64>, dimension: usize) -> UnmResult<Self> {
        if dimension == 0 || !dimension.is_power_of_two() {
            return Err(UnmError::dimension("Kraus operator side", 2, dimension));
        }
        if matrix.len() != dimension * dimension {
            return Err(UnmError::dimension(
                "Kraus operator elements",
                dimension * dimension,
                matrix.len(),
            ));
        }
        Ok(Self { matrix, dimension })
    }

    /// 2×2 operator from real entries `[[a, b], [c, d]]`
    pub(crate) fn real_2x2(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self {
            matrix: vec![
                Complex64::new(a, 0.0),
                Complex64::new(b, 0.0),
                Complex64::new(c, 0.0),
                Complex64::new(d, 0.0),
            ],
            dimension: 2,
        }
    }

    /// Identity on `num_qubits` qubits
    pub fn identity(num_qubits: usize) -> Self {
        let dimension = 1 << num_qubits;
        let mut matrix = vec![ZERO; dimension * dimension];
        for i in 0..dimension {
            matrix[i * dimension + i] = ONE;
        }
        Self { matrix, dimension }
    }

    /// Single-qubit Pauli matrix for `I`, `X`, `Y` or `Z`
    pub fn pauli(symbol: char) -> Option<Self> {
        let i = Complex64::new(0.0, 1.0);
        let matrix = match symbol {
            'I' => vec![ONE, ZERO, ZERO, ONE],
            'X' => vec![ZERO, ONE, ONE, ZERO],
            'Y' => vec![ZERO, -i, i, ZERO],
            'Z' => vec![ONE, ZERO, ZERO, -ONE],
            _ => return None,
        };
        Some(Self {
            matrix,
            dimension: 2,
        })
    }

    /// Multi-qubit Pauli string such as `"XZ"` (first character on the first qubit)
    pub fn pauli_string(label: &str) -> UnmResult<Self> {
        let mut symbols = label.chars();
        let first = symbols
            .next()
            .and_then(Self::pauli)
            .ok_or_else(|| UnmError::InvalidPauliLabel(label.to_string()))?;
        symbols.try_fold(first, |acc, c| {
            Self::pauli(c)
                .map(|p| acc.kron(&p))
                .ok_or_else(|| UnmError::InvalidPauliLabel(label.to_string()))
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Matrix side
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of qubits the operator acts on
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.dimension.trailing_zeros() as usize
    }

    /// Element at (row, col)
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Complex64 {
        self.matrix[row * self.dimension + col]
    }

    /// Row-major elements
    pub fn elements(&self) -> &[Complex64] {
        &self.matrix
    }

    /// Whether every element is exactly zero
    pub fn is_zero(&self) -> bool {
        self.matrix.iter().all(|z| *z == ZERO)
    }

    // ========================================================================
    // Algebra
    // ========================================================================

    /// Scalar multiple
    pub fn scale(&self, factor: f64) -> Self {
        Self {
            matrix: self.matrix.iter().map(|z| *z * factor).collect(),
            dimension: self.dimension,
        }
    }

    /// Matrix product `self · other`
    pub fn matmul(&self, other: &Self) -> Self {
        debug_assert_eq!(self.dimension, other.dimension);
        let n = self.dimension;
        let mut matrix = vec![ZERO; n * n];
        for i in 0..n {
            for k in 0..n {
                let a = self.get(i, k);
                if a == ZERO {
                    continue;
                }
                for j in 0..n {
                    matrix[i * n + j] += a * other.get(k, j);
                }
            }
        }
        Self {
            matrix,
            dimension: n,
        }
    }

    /// Kronecker product `self ⊗ other`
    pub fn kron(&self, other: &Self) -> Self {
        let (n, m) = (self.dimension, other.dimension);
        let dimension = n * m;
        let mut matrix = vec![ZERO; dimension * dimension];
        for i in 0..n {
            for j in 0..n {
                let a = self.get(i, j);
                for k in 0..m {
                    for l in 0..m {
                        matrix[(i * m + k) * dimension + (j * m + l)] = a * other.get(k, l);
                    }
                }
            }
        }
        Self { matrix, dimension }
    }

    /// Conjugate transpose
    pub fn adjoint(&self) -> Self {
        let n = self.dimension;
        let mut matrix = vec![ZERO; n * n];
        for i in 0..n {
            for j in 0..n {
                matrix[j * n + i] = self.get(i, j).conj();
            }
        }
        Self {
            matrix,
            dimension: n,
        }
    }

    /// Element-wise complex conjugate
    pub fn conj(&self) -> Self {
        Self {
            matrix: self.matrix.iter().map(|z| z.conj()).collect(),
            dimension: self.dimension,
        }
    }

    /// Element-wise sum
    pub fn add(&self, other: &Self) -> Self {
        debug_assert_eq!(self.dimension, other.dimension);
        Self {
            matrix: self
                .matrix
                .iter()
                .zip(&other.matrix)
                .map(|(a, b)| a + b)
                .collect(),
            dimension: self.dimension,
        }
    }

    /// Largest absolute element-wise difference
    pub fn max_abs_diff(&self, other: &Self) -> f64 {
        if self.dimension != other.dimension {
            return f64::INFINITY;
        }
        self.matrix
            .iter()
            .zip(&other.matrix)
            .map(|(a, b)| (a - b).norm())
            .fold(0.0, f64::max)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_new_rejects_bad_dimension() {
        assert!(KrausOperator::new(vec![ONE; 9], 3).is_err());
        assert!(KrausOperator::new(vec![ONE; 3], 2).is_err());
        assert!(KrausOperator::new(vec![ONE; 4], 2).is_ok());
    }

    #[test]
    fn test_pauli_squares_to_identity() {
        for symbol in ['X', 'Y', 'Z'] {
            let p = KrausOperator::pauli(symbol).unwrap();
            assert_eq!(p.matmul(&p), KrausOperator::identity(1));
        }
        assert!(KrausOperator::pauli('Q').is_none());
    }

    #[test]
    fn test_kron_ordering() {
        // X ⊗ I flips the most significant bit: |00> -> |10>
        let xi = KrausOperator::pauli_string("XI").unwrap();
        assert_eq!(xi.dimension(), 4);
        assert_eq!(xi.get(2, 0), ONE);
        assert_eq!(xi.get(1, 0), ZERO);
    }

    #[test]
    fn test_pauli_string_invalid() {
        assert!(KrausOperator::pauli_string("").is_err());
        assert!(KrausOperator::pauli_string("XA").is_err());
    }

    #[test]
    fn test_adjoint_of_y() {
        let y = KrausOperator::pauli('Y').unwrap();
        assert_eq!(y.adjoint(), y);
        assert_relative_eq!(y.get(0, 1).im, -1.0);
    }
}
