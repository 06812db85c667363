//! # UNM Core
//!
//! Foundation types, constants, and errors for the Unified Noise Model.
//!
//! ## Gantree Architecture
//!
//! ```text
//! unm_core // L0: Foundation (완료)
//!     CoreTypes // 핵심 타입 (완료)
//!         QubitId, QubitPair, Probability
//!     Constants // 명령 레이블/단위/기본값 (완료)
//!     Errors // 에러 타입 + 경고 레코드 (완료)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use unm_core::prelude::*;
//!
//! // Two-qubit keys are unordered
//! let pair: QubitPair = "1_0".parse().unwrap();
//! assert_eq!(pair, QubitPair::new(0, 1));
//!
//! // Probabilities are validated, negative values act as "skip"
//! assert!(Probability::new(1.5).is_err());
//! assert!(Probability::optional(-1.0).unwrap().is_none());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Core types (Gantree: L0_Foundation → CoreTypes)
pub mod types;

/// Constants (Gantree: L0_Foundation → Constants)
pub mod constants;

/// Error types (Gantree: L0_Foundation → Errors)
pub mod error;

// ============================================================================
// Re-exports
// ============================================================================

pub use constants::{instructions, numerics, physics};
pub use error::{MissingCalibrationValue, PhysicalConsistencyWarning, UnmError, UnmResult};
pub use types::{InstructionLabel, Probability, QubitId, QubitPair};

// ============================================================================
// Prelude
// ============================================================================

pub mod prelude {
    //! Convenient imports for common use cases
    //!
    //! ```rust
    //! use unm_core::prelude::*;
    //! ```

    pub use crate::constants::{instructions, numerics, physics};
    pub use crate::error::{
        MissingCalibrationValue, PhysicalConsistencyWarning, UnmError, UnmResult,
    };
    pub use crate::types::{InstructionLabel, Probability, QubitId, QubitPair};
}
