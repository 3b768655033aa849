//! Write the taper profile table (`index,d,h`) to CSV.

use std::path::Path;

use crate::domain::ProfileRow;
use crate::error::AppError;

/// Write profile rows in the order given (ascending index).
pub fn write_profile_csv(path: &Path, rows: &[ProfileRow]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(2, format!("Failed to create profile CSV '{}': {e}", path.display())))?;
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| AppError::new(2, format!("Failed to write profile CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to write profile CSV: {e}")))?;
    Ok(())
}
