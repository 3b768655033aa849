//! Read avoided-crossing sweeps and write the derived splitting table.
//!
//! Input columns are located by case-insensitive substring, so headers like
//! `Transducer period (nm)` or `Electromechanical mode (GHz)` work as-is.

use std::fs::File;
use std::path::Path;

use csv::StringRecord;
use serde::Serialize;

use crate::crossing::CrossingAnalysis;
use crate::domain::CrossingPoint;
use crate::error::AppError;

#[derive(Debug, Serialize)]
struct SplitRow {
    period_nm: f64,
    em_ghz: f64,
    om_ghz: f64,
    split_mhz: f64,
}

/// Read a sweep CSV, sorted by period.
pub fn read_crossing_csv(path: &Path) -> Result<Vec<CrossingPoint>, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(file);
    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();

    let period = find_column(&headers, "period")?;
    let em = find_column(&headers, "electromechanical")?;
    let om = find_column(&headers, "optomechanical")?;

    let mut points = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // +2: header line plus 1-based numbering.
        let line = idx + 2;
        let record = result.map_err(|e| AppError::new(2, format!("CSV parse error at line {line}: {e}")))?;
        points.push(CrossingPoint {
            period_nm: parse_cell(&record, period, line)?,
            em_ghz: parse_cell(&record, em, line)?,
            om_ghz: parse_cell(&record, om, line)?,
        });
    }

    points.sort_by(|a, b| a.period_nm.total_cmp(&b.period_nm));
    Ok(points)
}

/// Write `period_nm,em_ghz,om_ghz,split_mhz`.
pub fn write_split_csv(path: &Path, analysis: &CrossingAnalysis) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(2, format!("Failed to create CSV '{}': {e}", path.display())))?;
    for (p, split) in analysis.points.iter().zip(&analysis.split_mhz) {
        writer
            .serialize(SplitRow {
                period_nm: p.period_nm,
                em_ghz: p.em_ghz,
                om_ghz: p.om_ghz,
                split_mhz: *split,
            })
            .map_err(|e| AppError::new(2, format!("Failed to write CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to write CSV: {e}")))?;
    Ok(())
}

fn find_column(headers: &StringRecord, keyword: &str) -> Result<usize, AppError> {
    headers
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}').to_lowercase().contains(keyword))
        .ok_or_else(|| {
            let names: Vec<&str> = headers.iter().collect();
            AppError::new(
                2,
                format!("Column containing '{keyword}' not found in CSV headers: {names:?}"),
            )
        })
}

fn parse_cell(record: &StringRecord, idx: usize, line: usize) -> Result<f64, AppError> {
    let raw = record.get(idx).unwrap_or("");
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| AppError::new(2, format!("Invalid number '{raw}' at line {line}")))
}
