//! # UNM Calibration
//!
//! Device calibration ingestion for noise model construction.
//!
//! ## Gantree Architecture
//!
//! ```text
//! unm_calibration // L3: Calibration (완료)
//!     CalibrationTable // 원시 캘리브레이션 표 (완료)
//!         from_csv_str(), from_csv_file(), from_json_str()
//!     CalibrationIngestor // 정제 및 대체값 (완료)
//!         ingest() - NaN 대체, µs→s, T2<=2*T1 검사
//!         parse_pairwise_rates() - "i_j:rate;..."
//!     CalibrationData // 정제된 데이터 (완료)
//!         qubits(), t1s(), t2s(), pairwise()
//!         warnings(), substitutions()
//!         to_coherence_profile()
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use unm_calibration::prelude::*;
//!
//! let csv = "\
//! Qubit,Frequency,T1,T2,ReadoutError,SQError,TQError
//! 0,5.10,120.0,90.0,0.020,0.0010,0_1:0.010
//! 1,5.20,nan,80.0,0.030,nan,
//! ";
//!
//! let data = CalibrationIngestor::ingest_csv(csv).unwrap();
//!
//! // Qubit 1 has no T1: it takes qubit 0's
//! assert_eq!(data.t1s()[1], data.t1s()[0]);
//! // Missing error rates ingest as zero
//! assert_eq!(data.single_qubit_error_rates()[&1], 0.0);
//! // Pairwise rates are symmetric
//! assert_eq!(data.pairwise().get(1, 0), Some(0.01));
//! ```

#![warn(missing_docs)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Raw calibration table (Gantree: L3_Calibration → CalibrationTable)
pub mod table;

/// Ingested calibration data (Gantree: L3_Calibration → CalibrationData)
pub mod calibration_data;

/// Calibration ingestion (Gantree: L3_Calibration → CalibrationIngestor)
pub mod ingest;

// ============================================================================
// Re-exports
// ============================================================================

pub use calibration_data::{CalibrationData, CalibrationRecord, PairwiseErrorRates};
pub use ingest::CalibrationIngestor;
pub use table::{CalibrationTable, RawCalibrationRow};

// ============================================================================
// Prelude
// ============================================================================

/// Convenient imports for common use cases
pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! ```rust
    //! use unm_calibration::prelude::*;
    //! ```

    pub use crate::calibration_data::{CalibrationData, CalibrationRecord, PairwiseErrorRates};
    pub use crate::ingest::CalibrationIngestor;
    pub use crate::table::{CalibrationTable, RawCalibrationRow};
}

// ============================================================================
// Integration Tests
// ============================================================================
