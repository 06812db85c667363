//! # UNM Engine
//!
//! Unified noise model construction from device calibration.
//!
//! ## Gantree Architecture
//!
//! ```text
//! unm_engine // L4: Engine (완료)
//!     NoiseBuildConfig // 모델 생성 설정 (완료)
//!         gate lists, depolarizing/SPAM probs, gate times
//!         superconducting(), ideal(), from_calibration()
//!     ModelAssembler // 3단계 조립 (완료)
//!         install_gate_channels() → install_spam() → finalize()
//!         assemble() - 전체 조립
//!     Pipeline // 수집 → 생성 (완료)
//!         ingest(), build(), build_from_profile()
//!         NoisePipeline::run_csv() / run_file()
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use unm_engine::prelude::*;
//!
//! let csv = "\
//! Qubit,Frequency,T1,T2,ReadoutError,SQError,TQError
//! 0,5.10,120.0,90.0,0.020,0.0010,0_1:0.010
//! 1,5.20,100.0,80.0,0.030,0.0012,
//! ";
//!
//! let data = ingest(csv).unwrap();
//! let config = NoiseBuildConfig::superconducting(data.num_qubits())
//!     .with_gates(&["sx"], &["cx"])
//!     .with_spam(-1.0, 0.02);
//!
//! let built = build(&data, &config).unwrap();
//! assert_eq!(built.model.num_local_errors_for("sx"), 2);
//! assert_eq!(built.model.num_local_errors_for("cx"), 1);
//! assert!(built.model.all_qubit_error("measure").is_some());
//! ```
//!
//! ## Staged Assembly
//!
//! ```rust
//! use unm_engine::prelude::*;
//!
//! let profile = CoherenceProfile::uniform(3, 100e-6, 80e-6);
//! let config = NoiseBuildConfig::superconducting(3);
//!
//! let mut assembler = ModelAssembler::new(&config, &profile).unwrap();
//! assembler.install_gate_channels().unwrap();
//! assembler.install_spam().unwrap();
//! let built = assembler.finalize().unwrap();
//! println!("{}", built.model);
//! ```

#![warn(missing_docs)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Configuration (Gantree: L4_Engine → NoiseBuildConfig)
pub mod config;

/// Model assembly (Gantree: L4_Engine → ModelAssembler)
pub mod assembler;

/// Pipeline (Gantree: L4_Engine → Pipeline)
pub mod pipeline;

// ============================================================================
// Re-exports
// ============================================================================

pub use assembler::{AssembledModel, AssemblyPhase, AssemblyReport, ModelAssembler};
pub use config::NoiseBuildConfig;
pub use pipeline::{build, build_from_profile, ingest, NoisePipeline};

// ============================================================================
// Prelude
// ============================================================================

/// Convenient imports for common use cases
pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! ```rust
    //! use unm_engine::prelude::*;
    //! ```

    pub use crate::assembler::{AssembledModel, AssemblyPhase, AssemblyReport, ModelAssembler};
    pub use crate::config::NoiseBuildConfig;
    pub use crate::pipeline::{build, build_from_profile, ingest, NoisePipeline};
    pub use unm_calibration::{CalibrationData, CalibrationIngestor, CalibrationTable};
    pub use unm_core::{UnmError, UnmResult};
    pub use unm_noise::{CoherenceProfile, ErrorChannel, GateTimeTable, NoiseModel};
}

// ============================================================================
// Integration Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use approx::assert_relative_eq;
    use unm_noise::prelude::*;

    const TWO_QUBIT_CSV: &str = "\
Qubit,Frequency,T1,T2,ReadoutError,SQError,TQError
0,5.10,120.0,90.0,0.020,0.0010,0_1:0.010
1,5.20,100.0,80.0,0.030,0.0010,
";

    fn two_qubit_config(data: &CalibrationData) -> NoiseBuildConfig {
        NoiseBuildConfig::from_calibration(data, &["sx"], &["cx"]).with_spam(-1.0, -1.0)
    }

    #[test]
    fn test_end_to_end_two_qubits() {
        let data = ingest(TWO_QUBIT_CSV).unwrap();
        let config = two_qubit_config(&data);
        assert_relative_eq!(config.depolarizing_prob_1q, 0.001, epsilon = 1e-12);
        assert_relative_eq!(config.depolarizing_prob_2q, 0.01, epsilon = 1e-12);

        let built = build(&data, &config).unwrap();
        let model = &built.model;

        assert_eq!(model.num_local_errors_for("sx"), 2);
        assert!(model.local_error("sx", &[0]).is_some());
        assert!(model.local_error("sx", &[1]).is_some());

        assert_eq!(model.num_local_errors_for("cx"), 1);
        assert!(model.local_error("cx", &[0, 1]).is_some());
        assert!(model.local_error("cx", &[1, 0]).is_none());

        assert_eq!(model.num_all_qubit_errors(), 0);
        assert_eq!(built.report.spam_channels(), 0);
        assert_eq!(model.num_local_errors(), 3);
    }

    #[test]
    fn test_per_qubit_channels_are_distinct() {
        let data = ingest(TWO_QUBIT_CSV).unwrap();
        let built = build(&data, &two_qubit_config(&data)).unwrap();

        let q0 = built.model.local_error("sx", &[0]).unwrap();
        let q1 = built.model.local_error("sx", &[1]).unwrap();
        assert!(!q0.approx_eq(q1, 1e-12));
    }

    #[test]
    fn test_measurement_spam_skip_and_install() {
        let data = ingest(TWO_QUBIT_CSV).unwrap();

        let skipped = two_qubit_config(&data).with_spam(-1.0, -1.0);
        let built = build(&data, &skipped).unwrap();
        assert!(built.model.all_qubit_error("measure").is_none());

        let installed = two_qubit_config(&data).with_spam(-1.0, 0.02);
        let built = build(&data, &installed).unwrap();
        assert_eq!(built.model.num_all_qubit_errors(), 1);
        assert_relative_eq!(built.report.measurement.unwrap().value(), 0.02);

        let expected = ChannelFactory::spam(0.02, SpamSubject::Measurement).unwrap();
        assert_eq!(built.model.all_qubit_error("measure"), Some(&expected.channel));
    }

    #[test]
    fn test_consistency_warning_then_relaxation_failure() {
        let csv = "\
Qubit,T1,T2,ReadoutError,SQError
0,50,150,0.02,0.001
";
        let data = ingest(csv).unwrap();
        assert_eq!(data.warnings().len(), 1);

        let config = NoiseBuildConfig::superconducting(1).with_gates(&["sx"], &[]);
        assert!(matches!(build(&data, &config), Err(UnmError::InvalidT2 { .. })));

        let depolarizing_only = config.with_channels(true, false);
        assert!(build(&data, &depolarizing_only).is_ok());
    }

    #[test]
    fn test_measured_gate_times() {
        let data = ingest(TWO_QUBIT_CSV).unwrap();
        let lengths = GateLengths::new()
            .with("sx", &[0], 35.5e-9)
            .with("sx", &[1], 71.1e-9)
            .with("cx", &[1, 0], 320e-9);
        let times = GateTimeTable::from_gate_lengths(
            &lengths,
            &data.qubits(),
            &["sx".to_string()],
            &["cx".to_string()],
            &data.pairwise().pairs(),
        )
        .unwrap();

        let config = two_qubit_config(&data).with_gate_times(times);
        let built = build(&data, &config).unwrap();

        let depol = ChannelFactory::depolarizing(0.001, 1).unwrap();
        let relax = ChannelFactory::thermal_relaxation(100e-6, 80e-6, 71.1e-9).unwrap();
        let expected = ChannelComposer::combine(&depol, &relax).unwrap();
        assert!(built.model.local_error("sx", &[1]).unwrap().approx_eq(&expected, 1e-12));
    }

    #[test]
    fn test_model_channels_are_cptp() {
        let data = ingest(TWO_QUBIT_CSV).unwrap();
        let built = build(&data, &two_qubit_config(&data).with_spam(0.01, 0.02)).unwrap();

        for (label, qubits) in built.model.local_keys() {
            let channel = built.model.local_error(&label, &qubits).unwrap();
            assert!(channel.is_cptp(1e-9), "{label} on {qubits:?} is not CPTP");
        }
        assert!(built
            .model
            .all_qubit_error("x_StatePreparation")
            .unwrap()
            .is_cptp(1e-12));
    }
}
