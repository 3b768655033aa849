//! Power-law saturation curve used for the geometric taper.
//!
//! For a cell at distance `a = |n|` from the center:
//!
//! `v(a) = target - (target - v0) * 2^(-(a / delx)^M)`
//!
//! - `v(0) = v0`
//! - `v(a) -> target` as `a -> inf`
//! - at `a = delx` the value is exactly halfway between `v0` and `target`
//! - larger `M` gives a sharper knee around `a = delx`

use crate::error::ParamError;

/// Evaluate the taper at distance `a` from the center.
pub fn taper_value(v0: f64, target: f64, a: f64, delx: f64, m: f64) -> Result<f64, ParamError> {
    if a == 0.0 {
        return Ok(v0);
    }
    if !(delx.is_finite() && delx > 0.0) {
        return Err(ParamError::Domain {
            reason: format!("decay length must be positive, got {delx} (index distance {a})"),
        });
    }

    let x = (a / delx).powf(m);
    let value = target - (target - v0) * (-x).exp2();
    if !value.is_finite() {
        return Err(ParamError::Domain {
            reason: format!("non-finite value at index distance {a} (delx={delx}, M={m})"),
        });
    }
    Ok(value)
}
