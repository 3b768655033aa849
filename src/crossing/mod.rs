//! Avoided-crossing analysis.
//!
//! Given electromechanical and optomechanical mode frequencies swept over the
//! transducer period, find where the two branches come closest. The minimum
//! splitting `Δf_min` estimates the coupling as `g ≈ Δf_min / 2`.

use crate::domain::CrossingPoint;
use crate::error::AppError;

/// Splitting analysis of one sweep.
#[derive(Debug, Clone)]
pub struct CrossingAnalysis {
    /// Input points, sorted by period.
    pub points: Vec<CrossingPoint>,
    /// `|em - om|` per point, in MHz.
    pub split_mhz: Vec<f64>,
    /// Index of the minimum splitting.
    pub min_index: usize,
    pub min_period_nm: f64,
    pub min_split_mhz: f64,
    pub coupling_mhz: f64,
}

/// Analyze a sweep (points need not be sorted).
pub fn analyze_crossing(mut points: Vec<CrossingPoint>) -> Result<CrossingAnalysis, AppError> {
    if points.is_empty() {
        return Err(AppError::new(3, "No crossing data points."));
    }
    points.sort_by(|a, b| a.period_nm.total_cmp(&b.period_nm));

    let split_mhz: Vec<f64> = points
        .iter()
        .map(|p| (p.em_ghz - p.om_ghz).abs() * 1000.0)
        .collect();

    // First minimum wins on ties.
    let mut min_index = 0;
    for (i, &s) in split_mhz.iter().enumerate() {
        if s < split_mhz[min_index] {
            min_index = i;
        }
    }

    let min_split_mhz = split_mhz[min_index];
    Ok(CrossingAnalysis {
        min_period_nm: points[min_index].period_nm,
        min_split_mhz,
        coupling_mhz: min_split_mhz / 2.0,
        min_index,
        points,
        split_mhz,
    })
}
