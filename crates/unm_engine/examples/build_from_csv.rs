//! Build a unified noise model from a calibration CSV
//!
//! Usage:
//! ```bash
//! # Built-in 5-qubit sample
//! cargo run --example build_from_csv
//!
//! # Device export + optional JSON build configuration
//! cargo run --example build_from_csv -- calibration.csv config.json
//! ```

use anyhow::{Context, Result};
use unm_engine::prelude::*;

const SAMPLE_CSV: &str = "\
Qubit,Frequency,T1,T2,ReadoutError,SQError,TQError
0,5.100,121.3,92.1,0.021,0.00031,0_1:0.0092
1,5.212,98.7,77.4,0.034,0.00042,1_2:0.0110;1_0:0.0092
2,5.037,nan,88.0,0.018,nan,2_3:0.0134
3,4.981,110.2,131.9,0.025,0.00028,3_4:0.0121
4,5.143,87.5,60.3,0.029,0.00035,
";

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    // ========================================================================
    // 1. Calibration
    // ========================================================================
    let data = match args.first() {
        Some(path) => {
            let table = CalibrationTable::from_csv_file(path)
                .with_context(|| format!("reading calibration from {path}"))?;
            CalibrationIngestor::ingest(&table)?
        }
        None => ingest(SAMPLE_CSV)?,
    };

    println!("{data}");
    for substitution in data.substitutions() {
        println!("  fallback: {substitution}");
    }
    for warning in data.warnings() {
        println!("  WARNING: {warning}");
    }
    println!();

    // ========================================================================
    // 2. Configuration
    // ========================================================================
    let config = match args.get(1) {
        Some(path) => NoiseBuildConfig::from_json_file(path)
            .with_context(|| format!("loading build configuration from {path}"))?,
        None => NoiseBuildConfig::from_calibration(&data, &["sx", "x"], &["cx"])
            .with_spam(0.005, data.mean_measurement_error().unwrap_or(-1.0)),
    };
    println!("{config}\n");

    // ========================================================================
    // 3. Assembly
    // ========================================================================
    let built = match build(&data, &config) {
        Ok(built) => built,
        Err(UnmError::InvalidT2 { t1_s, t2_s }) => {
            // Relaxation cannot be modelled for inconsistent qubits; keep depolarizing only
            println!("T2={t2_s:e}s exceeds 2*T1={:e}s, dropping relaxation channels\n", 2.0 * t1_s);
            build(&data, &config.clone().with_channels(true, false))?
        }
        Err(err) => return Err(err.into()),
    };

    println!("{}", built.model);
    println!("\nRegistered: {}", built.report);

    Ok(())
}
