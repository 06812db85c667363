//! Build pipeline
//!
//! Gantree: L4_Engine → Pipeline
//!
//! `ingest(calibration) -> CalibrationData`, then
//! `build(CalibrationData, config) -> NoiseModel`. Nothing is partially
//! initialized: a model only comes out once every assembly phase succeeded.

use crate::assembler::{AssembledModel, ModelAssembler};
use crate::config::NoiseBuildConfig;
use std::path::Path;
use unm_calibration::{CalibrationData, CalibrationIngestor, CalibrationTable};
use unm_core::UnmResult;
use unm_noise::CoherenceProfile;

/// Ingest calibration CSV text
/// Gantree: ingest(csv) -> Result<CalibrationData> // 수집
pub fn ingest(csv: &str) -> UnmResult<CalibrationData> {
    CalibrationIngestor::ingest_csv(csv)
}

/// Build a model from ingested calibration
/// Gantree: build(data,config) -> Result<AssembledModel> // 생성
pub fn build(data: &CalibrationData, config: &NoiseBuildConfig) -> UnmResult<AssembledModel> {
    let profile = data.to_coherence_profile()?;
    build_from_profile(&profile, config)
}

/// Build a model from coherence times alone
pub fn build_from_profile(
    profile: &CoherenceProfile,
    config: &NoiseBuildConfig,
) -> UnmResult<AssembledModel> {
    log::debug!(
        "building noise model for {} qubit(s): {}",
        profile.num_qubits(),
        config
    );
    ModelAssembler::assemble(config, profile)
}

/// Configured ingest-and-build runner
/// Gantree: NoisePipeline // 단계별 실행
#[derive(Debug, Clone)]
pub struct NoisePipeline {
    config: NoiseBuildConfig,
}

impl NoisePipeline {
    /// Pipeline with a fixed configuration
    pub fn new(config: NoiseBuildConfig) -> Self {
        Self { config }
    }

    /// Configuration in use
    pub fn config(&self) -> &NoiseBuildConfig {
        &self.config
    }

    /// Build from already ingested calibration
    pub fn build(&self, data: &CalibrationData) -> UnmResult<AssembledModel> {
        build(data, &self.config)
    }

    /// Ingest CSV text and build
    pub fn run_csv(&self, csv: &str) -> UnmResult<(CalibrationData, AssembledModel)> {
        let data = ingest(csv)?;
        let built = self.build(&data)?;
        Ok((data, built))
    }

    /// Ingest a calibration table and build
    pub fn run_table(
        &self,
        table: &CalibrationTable,
    ) -> UnmResult<(CalibrationData, AssembledModel)> {
        let data = CalibrationIngestor::ingest(table)?;
        let built = self.build(&data)?;
        Ok((data, built))
    }

    /// Read a CSV file, ingest and build
    pub fn run_file(
        &self,
        path: impl AsRef<Path>,
    ) -> UnmResult<(CalibrationData, AssembledModel)> {
        self.run_table(&CalibrationTable::from_csv_file(path)?)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use unm_core::UnmError;

    const CSV: &str = "\
Qubit,Frequency,T1,T2,ReadoutError,SQError,TQError
0,5.1,120,90,0.02,0.001,0_1:0.01
1,5.2,100,80,0.03,0.001,
2,5.0,nan,85,0.02,nan,1_2:0.02
";

    #[test]
    fn test_ingest_then_build() {
        let data = ingest(CSV).unwrap();
        let config = NoiseBuildConfig::superconducting(3);
        let built = build(&data, &config).unwrap();

        assert_eq!(built.report.single_qubit_entries, 6);
        assert_eq!(built.report.two_qubit_entries, 3);
        assert_eq!(built.model.num_local_errors(), 9);
    }

    #[test]
    fn test_build_from_profile() {
        let profile = CoherenceProfile::uniform(2, 100e-6, 80e-6);
        let built =
            build_from_profile(&profile, &NoiseBuildConfig::superconducting(2)).unwrap();
        assert_eq!(built.model.num_local_errors_for("cx"), 1);
    }

    #[test]
    fn test_pipeline_runner() {
        let config = NoiseBuildConfig::superconducting(3).with_spam(-1.0, 0.02);
        let pipeline = NoisePipeline::new(config);
        let (data, built) = pipeline.run_csv(CSV).unwrap();
        assert_eq!(data.num_qubits(), 3);
        assert!(built.model.all_qubit_error("measure").is_some());
    }

    #[test]
    fn test_qubit_count_mismatch_halts() {
        let pipeline = NoisePipeline::new(NoiseBuildConfig::superconducting(2));
        assert!(matches!(
            pipeline.run_csv(CSV),
            Err(UnmError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let pipeline = NoisePipeline::new(NoiseBuildConfig::superconducting(1));
        assert!(matches!(
            pipeline.run_file("/nonexistent/calibration.csv"),
            Err(UnmError::FileError(_))
        ));
    }
}
