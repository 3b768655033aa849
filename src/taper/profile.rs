//! Taper profile generation.
//!
//! Resolves the taper inputs from a canonical parameter set and evaluates
//! `d(n)` and `h(n)` for every cell index `n` in `[-N, N]`.
//!
//! Resolution is strict: every input is resolved and parsed before any value is
//! computed, even when `N = 0` and only the center cell is produced. A broken
//! parameter file therefore fails the same way regardless of the half-width.

use crate::domain::{ProfileRow, TaperedQuantity};
use crate::error::ParamError;
use crate::params::{ParameterSet, aliases};
use crate::taper::taper_value;

/// Largest half-width accepted by [`TaperSpec::resolve`].
pub const MAX_HALF_WIDTH: i64 = 10_000;

/// Fully resolved taper inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaperSpec {
    pub half_width: i64,
    pub d: TaperedQuantity,
    pub h: TaperedQuantity,
}

impl TaperSpec {
    /// Resolve all taper inputs from `params`.
    pub fn resolve(params: &ParameterSet) -> Result<Self, ParamError> {
        let half_width = resolve_half_width(params)?;
        let d0 = params.scalar(aliases::D_CENTER)?;
        let h0 = params.scalar(aliases::H_CENTER)?;

        let (d_left, d_right) =
            resolve_boundaries(params, aliases::D_LEFT, aliases::D_RIGHT, aliases::D_BOUNDARY)?;
        let (h_left, h_right) =
            resolve_boundaries(params, aliases::H_LEFT, aliases::H_RIGHT, aliases::H_BOUNDARY)?;

        let decay_length = params.scalar(aliases::DECAY_LENGTH)?;
        let decay_order = params.scalar(aliases::DECAY_ORDER)?;

        Ok(Self {
            half_width,
            d: TaperedQuantity {
                center: d0,
                left: d_left,
                right: d_right,
                decay_length,
                decay_order,
            },
            h: TaperedQuantity {
                center: h0,
                left: h_left,
                right: h_right,
                decay_length,
                decay_order,
            },
        })
    }

    /// Evaluate the profile, ordered by ascending index.
    pub fn evaluate(&self) -> Result<Vec<ProfileRow>, ParamError> {
        let n = self.half_width;
        let mut rows = Vec::with_capacity((2 * n + 1) as usize);
        for index in -n..=n {
            rows.push(ProfileRow {
                index,
                d: quantity_at(&self.d, index)?,
                h: quantity_at(&self.h, index)?,
            });
        }
        Ok(rows)
    }
}

/// Compute the taper profile for a canonical parameter set.
pub fn compute_profile(params: &ParameterSet) -> Result<Vec<ProfileRow>, ParamError> {
    TaperSpec::resolve(params)?.evaluate()
}

/// Value of one tapered quantity at a signed cell index.
pub fn quantity_at(q: &TaperedQuantity, index: i64) -> Result<f64, ParamError> {
    if index == 0 {
        return Ok(q.center);
    }
    let target = if index > 0 { q.right } else { q.left };
    taper_value(q.center, target, index.unsigned_abs() as f64, q.decay_length, q.decay_order)
}

fn resolve_half_width(params: &ParameterSet) -> Result<i64, ParamError> {
    let raw = params.scalar(aliases::HALF_WIDTH)?;
    let n = raw.round();
    if !n.is_finite() || n < 0.0 {
        return Err(ParamError::Domain {
            reason: format!("taper half-width must be a non-negative integer, got {raw}"),
        });
    }
    if n > MAX_HALF_WIDTH as f64 {
        return Err(ParamError::Domain {
            reason: format!("taper half-width {raw} exceeds the maximum of {MAX_HALF_WIDTH}"),
        });
    }
    Ok(n as i64)
}

/// Side-specific targets win; a missing side falls back to the generic target.
fn resolve_boundaries(
    params: &ParameterSet,
    left_aliases: &[&str],
    right_aliases: &[&str],
    generic_aliases: &[&str],
) -> Result<(f64, f64), ParamError> {
    let left = params.scalar_opt(left_aliases)?;
    let right = params.scalar_opt(right_aliases)?;
    match (left, right) {
        (Some(l), Some(r)) => Ok((l, r)),
        (l, r) => {
            let generic = params.scalar(generic_aliases)?;
            Ok((l.unwrap_or(generic), r.unwrap_or(generic)))
        }
    }
}
