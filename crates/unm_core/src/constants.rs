//! Constants for UNM
//!
//! Gantree: L0_Foundation → Constants
//!
//! Instruction labels, unit conversions, and default device timings.

// ============================================================================
// Instruction Labels
// Gantree: instructions // 명령 레이블
// ============================================================================

pub mod instructions {
    //! Instruction labels with fixed meaning in the noise model

    /// Measurement instruction
    pub const MEASURE: &str = "measure";

    /// Reset instruction
    pub const RESET: &str = "reset";

    /// Bit-flip gate added to the basis when state-preparation noise is installed
    pub const BIT_FLIP: &str = "x";

    /// Recommended label for the state-preparation marker gate
    ///
    /// The marker is an `x`-type gate placed on every qubit right after state
    /// preparation, relabelled so its noise does not leak onto ordinary `x` gates.
    pub const STATE_PREPARATION: &str = "x_StatePreparation";

    /// Instructions that may carry noise without appearing in the basis gates
    pub const ALWAYS_KNOWN: [&str; 2] = [MEASURE, RESET];

    /// Negative value that disables a SPAM channel
    pub const SKIP_SENTINEL: f64 = -1.0;
}

// ============================================================================
// Physics Constants
// Gantree: physics // 물리 상수
// ============================================================================

pub mod physics {
    //! Default device timings and unit conversions
    //! Based on IBM Quantum specifications (2024-2025)

    /// Single-qubit gate time in nanoseconds (IBM SX gate)
    /// Gantree: GATE_TIME_1Q_NS: f64 = 35.0
    pub const GATE_TIME_1Q_NS: f64 = 35.0;

    /// Two-qubit gate time in nanoseconds (IBM CX gate)
    /// Gantree: GATE_TIME_2Q_NS: f64 = 300.0
    pub const GATE_TIME_2Q_NS: f64 = 300.0;

    /// Calibration tables report T1/T2 in microseconds
    pub const CALIBRATION_TIME_SCALE: f64 = 1_000_000.0;

    /// Physical limit on dephasing: T2 <= T2_T1_RATIO_MAX * T1
    pub const T2_T1_RATIO_MAX: f64 = 2.0;

    /// Convert microseconds to seconds
    #[inline]
    pub const fn us_to_s(us: f64) -> f64 {
        us / CALIBRATION_TIME_SCALE
    }

    /// Convert nanoseconds to seconds
    #[inline]
    pub const fn ns_to_s(ns: f64) -> f64 {
        ns * 1e-9
    }

    /// Convert seconds to nanoseconds
    #[inline]
    pub const fn s_to_ns(s: f64) -> f64 {
        s * 1e9
    }
}

// ============================================================================
// Numerics
// ============================================================================

pub mod numerics {
    //! Tolerances used by channel checks

    /// Tolerance for probability sums
    pub const PROBABILITY_TOLERANCE: f64 = 1e-9;

    /// Tolerance for CPTP completeness checks
    pub const CPTP_TOLERANCE: f64 = 1e-9;
}
