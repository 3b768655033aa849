//! Unit-aware scalar parsing.
//!
//! Parameter values are stored the way the simulation engine writes them: either
//! a bare number (`"3.5"`) or a number followed by a bracketed unit
//! (`"1241[nm]"`). Units are documentary only; no conversion is performed.

use crate::error::ParamError;

/// Parse a parameter string into a number, ignoring any `[unit]` suffix.
pub fn parse_scalar(s: &str) -> Result<f64, ParamError> {
    let mut t = s.trim();
    if let Some(pos) = t.find('[') {
        t = t[..pos].trim_end();
    }
    t.parse::<f64>().map_err(|_| ParamError::Parse {
        value: s.to_string(),
    })
}
