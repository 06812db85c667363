//! Calibration ingestion
//!
//! Gantree: L3_Calibration → CalibrationIngestor
//!
//! Turns raw rows into [`CalibrationData`]:
//! - missing error rates become `0`
//! - missing T1/T2 take the first qubit's (converted) value
//! - T1/T2 are converted from microseconds to seconds
//! - `TQError` cells are split into one rate per unordered pair
//! - T2 > 2·T1 is reported, never fatal

use crate::calibration_data::{CalibrationData, CalibrationRecord, PairwiseErrorRates};
use crate::table::{columns, CalibrationTable, RawCalibrationRow};
use std::collections::HashSet;
use unm_core::physics;
use unm_core::{MissingCalibrationValue, Probability, QubitPair, UnmError, UnmResult};
use unm_noise::CoherenceProfile;

/// Calibration table → typed calibration data
/// Gantree: CalibrationIngestor // 캘리브레이션 수집
#[derive(Debug, Clone, Copy, Default)]
pub struct CalibrationIngestor;

impl CalibrationIngestor {
    /// Ingest a parsed table
    /// Gantree: ingest(table) -> Result<CalibrationData> // 정제
    pub fn ingest(table: &CalibrationTable) -> UnmResult<CalibrationData> {
        let rows = table.rows();
        let first = rows.first().ok_or(UnmError::EmptyCalibration)?;

        let mut seen = HashSet::with_capacity(rows.len());
        if let Some(dup) = rows.iter().find(|row| !seen.insert(row.qubit)) {
            return Err(UnmError::DuplicateQubit(dup.qubit));
        }

        // The first qubit is the fallback source, so it must carry its own values
        let fallback_t1 = first
            .t1_us
            .filter(|v| !v.is_nan())
            .map(physics::us_to_s)
            .ok_or(UnmError::NoCoherenceFallback { field: columns::T1 })?;
        let fallback_t2 = first
            .t2_us
            .filter(|v| !v.is_nan())
            .map(physics::us_to_s)
            .ok_or(UnmError::NoCoherenceFallback { field: columns::T2 })?;

        let mut substitutions = Vec::new();
        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let mut resolve = |value: Option<f64>, field: &'static str, fallback: f64| {
                match value.filter(|v| !v.is_nan()) {
                    Some(v) => v,
                    None => {
                        log::debug!("qubit Q{}: {} missing, using {}", row.qubit, field, fallback);
                        substitutions.push(MissingCalibrationValue {
                            qubit: row.qubit,
                            field,
                            substituted: fallback,
                        });
                        fallback
                    }
                }
            };

            let sq = resolve(row.sq_error, columns::SQ_ERROR, 0.0);
            let readout = resolve(row.readout_error, columns::READOUT_ERROR, 0.0);
            let t1_s = match row.t1_us.filter(|v| !v.is_nan()) {
                Some(us) => physics::us_to_s(us),
                None => resolve(None, columns::T1, fallback_t1),
            };
            let t2_s = match row.t2_us.filter(|v| !v.is_nan()) {
                Some(us) => physics::us_to_s(us),
                None => resolve(None, columns::T2, fallback_t2),
            };

            records.push(Self::record(row, t1_s, t2_s, sq, readout)?);
        }

        let pairwise = Self::collect_pairwise(rows)?;

        let warnings = CoherenceProfile::new(
            records.iter().map(|r| r.qubit).collect(),
            records.iter().map(|r| r.t1_s).collect(),
            records.iter().map(|r| r.t2_s).collect(),
        )?
        .consistency_warnings();
        for warning in &warnings {
            log::warn!("{warning}");
        }

        Ok(CalibrationData::new(records, pairwise, warnings, substitutions))
    }

    /// Parse CSV text and ingest it
    pub fn ingest_csv(text: &str) -> UnmResult<CalibrationData> {
        Self::ingest(&CalibrationTable::from_csv_str(text)?)
    }

    /// Split one `TQError` cell into `(pair, rate)` entries
    /// Gantree: parse_pairwise_rates(cell) -> Result<Vec<(Pair,f64)>> // i_j:rate;...
    ///
    /// Entries are `;`-separated; blank entries (e.g. a trailing `;`) are
    /// skipped. Rates are not range-checked here.
    pub fn parse_pairwise_rates(cell: &str) -> UnmResult<Vec<(QubitPair, f64)>> {
        cell.split(';')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| {
                let malformed = || UnmError::MalformedPairRate(entry.to_string());
                let (key, rate) = entry.split_once(':').ok_or_else(malformed)?;
                let pair: QubitPair = key.parse().map_err(|_| malformed())?;
                if pair.is_degenerate() {
                    return Err(malformed());
                }
                let rate = rate.trim().parse::<f64>().map_err(|_| malformed())?;
                Ok((pair, rate))
            })
            .collect()
    }

    // ========================================================================
    // Internal
    // ========================================================================

    fn record(
        row: &RawCalibrationRow,
        t1_s: f64,
        t2_s: f64,
        sq: f64,
        readout: f64,
    ) -> UnmResult<CalibrationRecord> {
        for (name, value) in [("T1", t1_s), ("T2", t2_s)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(UnmError::InvalidCoherenceTime { name, value });
            }
        }
        Ok(CalibrationRecord {
            qubit: row.qubit,
            t1_s,
            t2_s,
            single_qubit_error_rate: Probability::new(sq)?.value(),
            measurement_error_rate: Probability::new(readout)?.value(),
            frequency_ghz: row.frequency_ghz.filter(|v| !v.is_nan()),
        })
    }

    fn collect_pairwise(rows: &[RawCalibrationRow]) -> UnmResult<PairwiseErrorRates> {
        let mut pairwise = PairwiseErrorRates::new();
        for cell in rows.iter().filter_map(|row| row.tq_error.as_deref()) {
            for (pair, rate) in Self::parse_pairwise_rates(cell)? {
                let rate = Probability::new(rate)?.value();
                let kept = pairwise.insert_first(pair, rate);
                if kept != rate {
                    log::warn!(
                        "two-qubit error for {pair} given twice ({kept} and {rate}); keeping {kept}"
                    );
                }
            }
        }
        Ok(pairwise)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn row(qubit: usize, t1_us: f64, t2_us: f64) -> RawCalibrationRow {
        RawCalibrationRow::new(qubit)
            .with_t1_us(t1_us)
            .with_t2_us(t2_us)
            .with_sq_error(0.001)
            .with_readout_error(0.02)
    }

    #[test]
    fn test_units_converted_to_seconds() {
        let table = CalibrationTable::default().with_row(row(0, 120.0, 90.0));
        let data = CalibrationIngestor::ingest(&table).unwrap();
        assert_relative_eq!(data.t1s()[0], 120e-6, max_relative = 1e-12);
        assert_relative_eq!(data.t2s()[0], 90e-6, max_relative = 1e-12);
    }

    #[test]
    fn test_missing_t1_uses_first_qubit() {
        let mut q3 = row(3, 0.0, 70.0);
        q3.t1_us = None;
        let table = CalibrationTable::new(vec![
            row(0, 120.0, 90.0),
            row(1, 100.0, 80.0),
            row(2, 110.0, 85.0),
            q3,
        ]);

        let data = CalibrationIngestor::ingest(&table).unwrap();
        assert_eq!(data.record(3).unwrap().t1_s, data.record(0).unwrap().t1_s);
        assert_relative_eq!(data.record(3).unwrap().t1_s, 120e-6, max_relative = 1e-12);
        assert_eq!(data.substitutions().len(), 1);
        assert_eq!(data.substitutions()[0].field, "T1");
    }

    #[test]
    fn test_nan_counts_as_missing() {
        let table = CalibrationTable::new(vec![row(0, 120.0, 90.0), row(1, f64::NAN, f64::NAN)]);
        let data = CalibrationIngestor::ingest(&table).unwrap();
        assert_eq!(data.t1s()[1], data.t1s()[0]);
        assert_eq!(data.t2s()[1], data.t2s()[0]);
    }

    #[test]
    fn test_missing_error_rate_is_zero() {
        let mut q1 = row(1, 100.0, 80.0);
        q1.sq_error = Some(f64::NAN);
        q1.readout_error = None;
        let table = CalibrationTable::new(vec![row(0, 120.0, 90.0), q1]);

        let data = CalibrationIngestor::ingest(&table).unwrap();
        assert_eq!(data.single_qubit_error_rates()[&1], 0.0);
        assert_eq!(data.measurement_error_rates()[&1], 0.0);
    }

    #[test]
    fn test_short_row_uses_fallbacks() {
        let csv = "\
Qubit,Frequency,T1,T2,ReadoutError,SQError,TQError
0,5.1,120,90,0.02,0.001,0_1:0.01
1,5.2,100,80,0.03
2,5.0
";
        let data = CalibrationIngestor::ingest_csv(csv).unwrap();
        assert_eq!(data.single_qubit_error_rates()[&1], 0.0);
        assert_eq!(data.single_qubit_error_rates()[&2], 0.0);
        assert_eq!(data.measurement_error_rates()[&2], 0.0);
        assert_eq!(data.t1s()[2], data.t1s()[0]);
        assert_eq!(data.t2s()[2], data.t2s()[0]);
        assert_eq!(data.pairwise().len(), 1);
        assert!(!data.substitutions().is_empty());
    }

    #[test]
    fn test_first_qubit_without_t2() {
        let mut q0 = row(0, 120.0, 0.0);
        q0.t2_us = None;
        let table = CalibrationTable::new(vec![q0, row(1, 100.0, 80.0)]);
        assert_eq!(
            CalibrationIngestor::ingest(&table),
            Err(UnmError::NoCoherenceFallback { field: "T2" })
        );
    }

    #[test]
    fn test_consistency_warning_does_not_abort() {
        let table = CalibrationTable::new(vec![row(0, 50.0, 150.0), row(1, 100.0, 80.0)]);
        let data = CalibrationIngestor::ingest(&table).unwrap();
        assert_eq!(data.num_qubits(), 2);
        assert_eq!(data.warnings().len(), 1);
        assert_eq!(data.warnings()[0].qubit, 0);
        assert!(!data.is_physically_consistent());
    }

    #[test]
    fn test_parse_pairwise_rates() {
        let entries = CalibrationIngestor::parse_pairwise_rates("0_1:0.01; 2_1:0.02;").unwrap();
        assert_eq!(
            entries,
            vec![(QubitPair::new(0, 1), 0.01), (QubitPair::new(1, 2), 0.02)]
        );

        for bad in ["0_1", "0-1:0.01", "0_1:abc", "1_1:0.01"] {
            assert!(matches!(
                CalibrationIngestor::parse_pairwise_rates(bad),
                Err(UnmError::MalformedPairRate(_))
            ));
        }
    }

    #[test]
    fn test_pairwise_rates_are_symmetric() {
        let table = CalibrationTable::new(vec![
            row(0, 120.0, 90.0).with_tq_error("0_1:0.01"),
            row(1, 100.0, 80.0).with_tq_error("1_0:0.03"),
        ]);
        let data = CalibrationIngestor::ingest(&table).unwrap();
        assert_eq!(data.pairwise().len(), 1);
        assert_eq!(data.pairwise().get(1, 0), Some(0.01));
    }

    #[test]
    fn test_out_of_range_rates_rejected() {
        let table = CalibrationTable::new(vec![row(0, 120.0, 90.0).with_tq_error("0_1:1.5")]);
        assert_eq!(
            CalibrationIngestor::ingest(&table),
            Err(UnmError::InvalidProbability(1.5))
        );

        let table = CalibrationTable::new(vec![row(0, 120.0, 90.0).with_sq_error(-0.1)]);
        assert!(matches!(
            CalibrationIngestor::ingest(&table),
            Err(UnmError::InvalidProbability(_))
        ));
    }

    #[test]
    fn test_duplicate_and_empty() {
        let table = CalibrationTable::new(vec![row(0, 120.0, 90.0), row(0, 100.0, 80.0)]);
        assert_eq!(CalibrationIngestor::ingest(&table), Err(UnmError::DuplicateQubit(0)));
        assert_eq!(
            CalibrationIngestor::ingest(&CalibrationTable::default()),
            Err(UnmError::EmptyCalibration)
        );
    }

    #[test]
    fn test_ingest_csv() {
        let csv = "\
Qubit,Frequency,T1,T2,ReadoutError,SQError,TQError
0,5.1,120,90,0.02,0.001,0_1:0.01
1,5.2,nan,80,0.03,nan,
";
        let data = CalibrationIngestor::ingest_csv(csv).unwrap();
        assert_eq!(data.qubits(), vec![0, 1]);
        assert_eq!(data.t1s()[1], data.t1s()[0]);
        assert_eq!(data.single_qubit_error_rates()[&1], 0.0);
        assert_eq!(data.pairwise().get(0, 1), Some(0.01));
    }
}
