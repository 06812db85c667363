//! Raw calibration table
//!
//! Gantree: L3_Calibration → CalibrationTable
//!
//! One row per qubit with columns `Qubit, Frequency, T1, T2, ReadoutError,
//! SQError, TQError`, exactly as a device dashboard exports them. Values are
//! kept in source units (T1/T2 in microseconds); an empty or `nan` cell is a
//! missing value and is left for the ingestor to repair.

use serde::{Deserialize, Serialize};
use std::path::Path;
use unm_core::{QubitId, UnmError, UnmResult};

/// Column names of the calibration export
pub mod columns {
    /// Qubit id
    pub const QUBIT: &str = "Qubit";
    /// Qubit frequency (GHz)
    pub const FREQUENCY: &str = "Frequency";
    /// Relaxation time (µs)
    pub const T1: &str = "T1";
    /// Dephasing time (µs)
    pub const T2: &str = "T2";
    /// Readout error probability
    pub const READOUT_ERROR: &str = "ReadoutError";
    /// Single-qubit gate error probability
    pub const SQ_ERROR: &str = "SQError";
    /// Two-qubit gate errors, `i_j:rate[;i_j:rate...]`
    pub const TQ_ERROR: &str = "TQError";
}

// ============================================================================
// Raw Row
// ============================================================================

/// One calibration row, unvalidated
/// Gantree: RawCalibrationRow // 원시 행
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawCalibrationRow {
    /// Qubit id
    pub qubit: QubitId,

    /// Frequency in GHz
    #[serde(default)]
    pub frequency_ghz: Option<f64>,

    /// T1 in microseconds
    #[serde(default)]
    pub t1_us: Option<f64>,

    /// T2 in microseconds
    #[serde(default)]
    pub t2_us: Option<f64>,

    /// Readout error probability
    #[serde(default)]
    pub readout_error: Option<f64>,

    /// Single-qubit gate error probability
    #[serde(default)]
    pub sq_error: Option<f64>,

    /// Raw two-qubit error cell
    #[serde(default)]
    pub tq_error: Option<String>,
}

impl RawCalibrationRow {
    /// Row with only the qubit id set
    pub fn new(qubit: QubitId) -> Self {
        Self {
            qubit,
            ..Self::default()
        }
    }

    /// Set T1 (µs)
    pub fn with_t1_us(mut self, t1_us: f64) -> Self {
        self.t1_us = Some(t1_us);
        self
    }

    /// Set T2 (µs)
    pub fn with_t2_us(mut self, t2_us: f64) -> Self {
        self.t2_us = Some(t2_us);
        self
    }

    /// Set the readout error
    pub fn with_readout_error(mut self, p: f64) -> Self {
        self.readout_error = Some(p);
        self
    }

    /// Set the single-qubit gate error
    pub fn with_sq_error(mut self, p: f64) -> Self {
        self.sq_error = Some(p);
        self
    }

    /// Set the raw two-qubit error cell
    pub fn with_tq_error(mut self, cell: &str) -> Self {
        self.tq_error = Some(cell.to_string());
        self
    }

    /// Set the frequency (GHz)
    pub fn with_frequency_ghz(mut self, ghz: f64) -> Self {
        self.frequency_ghz = Some(ghz);
        self
    }
}

// ============================================================================
// Table
// ============================================================================

/// Calibration rows in source order
/// Gantree: CalibrationTable // 캘리브레이션 표
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalibrationTable {
    rows: Vec<RawCalibrationRow>,
}

impl CalibrationTable {
    /// Table from rows
    pub fn new(rows: Vec<RawCalibrationRow>) -> Self {
        Self { rows }
    }

    /// Builder-style row append
    pub fn with_row(mut self, row: RawCalibrationRow) -> Self {
        self.rows.push(row);
        self
    }

    /// Rows in source order
    pub fn rows(&self) -> &[RawCalibrationRow] {
        &self.rows
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// Parse CSV text with a header row
    /// Gantree: from_csv_str(text) -> Result<Self> // CSV 파싱
    ///
    /// Columns are located by name, so order and extra columns do not
    /// matter. `Frequency` and `TQError` may be absent.
    pub fn from_csv_str(text: &str) -> UnmResult<Self> {
        let mut lines = text
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty());

        let (_, header) = lines.next().ok_or(UnmError::EmptyCalibration)?;
        let header: Vec<String> = split_csv_line(header)
            .into_iter()
            .map(|name| name.trim_start_matches('\u{feff}').to_string())
            .collect();
        let layout = ColumnLayout::from_header(&header)?;

        let rows = lines
            .map(|(index, line)| layout.parse_row(index, &split_csv_line(line)))
            .collect::<UnmResult<Vec<_>>>()?;

        if rows.is_empty() {
            return Err(UnmError::EmptyCalibration);
        }
        Ok(Self { rows })
    }

    /// Read and parse a CSV file
    pub fn from_csv_file(path: impl AsRef<Path>) -> UnmResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_csv_str(&text)
    }

    /// Parse a JSON array of rows
    pub fn from_json_str(json: &str) -> UnmResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to a JSON array of rows
    pub fn to_json(&self) -> UnmResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// ============================================================================
// CSV Helpers
// ============================================================================

/// Column indices resolved from the header
struct ColumnLayout {
    width: usize,
    qubit: usize,
    frequency: Option<usize>,
    t1: usize,
    t2: usize,
    readout: usize,
    sq: usize,
    tq: Option<usize>,
}

impl ColumnLayout {
    fn from_header(header: &[String]) -> UnmResult<Self> {
        let find = |name: &str| header.iter().position(|h| h == name);
        let require =
            |name: &str| find(name).ok_or_else(|| UnmError::MissingColumn(name.to_string()));

        Ok(Self {
            width: header.len(),
            qubit: require(columns::QUBIT)?,
            frequency: find(columns::FREQUENCY),
            t1: require(columns::T1)?,
            t2: require(columns::T2)?,
            readout: require(columns::READOUT_ERROR)?,
            sq: require(columns::SQ_ERROR)?,
            tq: find(columns::TQ_ERROR),
        })
    }

    fn parse_row(&self, row: usize, cells: &[String]) -> UnmResult<RawCalibrationRow> {
        if cells.len() > self.width {
            return Err(UnmError::MalformedRow {
                row,
                reason: format!("expected at most {} cells, found {}", self.width, cells.len()),
            });
        }
        // Absent trailing cells read as missing values
        let cell_at = |index: usize| cells.get(index).map_or("", String::as_str);

        let number = |index: usize, column: &str| -> UnmResult<Option<f64>> {
            let cell = cell_at(index);
            if is_missing(cell) {
                return Ok(None);
            }
            cell.parse::<f64>()
                .map(Some)
                .map_err(|_| UnmError::MalformedRow {
                    row,
                    reason: format!("{column} value '{cell}' is not a number"),
                })
        };

        let qubit_cell = cell_at(self.qubit);
        let qubit = qubit_cell
            .trim_start_matches(&['Q', 'q'][..])
            .parse::<QubitId>()
            .map_err(|_| UnmError::MalformedRow {
                row,
                reason: format!("qubit id '{qubit_cell}' is not an integer"),
            })?;

        Ok(RawCalibrationRow {
            qubit,
            frequency_ghz: match self.frequency {
                Some(i) => number(i, columns::FREQUENCY)?,
                None => None,
            },
            t1_us: number(self.t1, columns::T1)?,
            t2_us: number(self.t2, columns::T2)?,
            readout_error: number(self.readout, columns::READOUT_ERROR)?,
            sq_error: number(self.sq, columns::SQ_ERROR)?,
            tq_error: self
                .tq
                .map(cell_at)
                .filter(|cell| !is_missing(cell))
                .map(str::to_string),
        })
    }
}

/// Empty cells and `nan` in any case mark a missing value
fn is_missing(cell: &str) -> bool {
    cell.is_empty() || cell.eq_ignore_ascii_case("nan")
}

/// Split one CSV line on commas outside double quotes, trimming cells
fn split_csv_line(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => cells.push(std::mem::take(&mut current).trim().to_string()),
            _ => current.push(c),
        }
    }
    cells.push(current.trim().to_string());
    cells
}

// ============================================================================
// Tests
// ============================================================================
