//! Read/write the canonical parameter JSON file.
//!
//! The file is a flat JSON object of `name -> value` where values are strings
//! such as `"1241[nm]"` or `"17"`. Bare JSON numbers and booleans are accepted
//! on read and stored as their text. Writes are key-sorted case-insensitively.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde_json::{Map, Value};

use crate::error::AppError;
use crate::params::ParameterSet;

/// Read a canonical parameter file.
pub fn read_params_json(path: &Path) -> Result<ParameterSet, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open parameter JSON '{}': {e}", path.display())))?;
    let map: Map<String, Value> = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
        AppError::new(2, format!("Invalid parameter JSON '{}': {e}", path.display()))
    })?;
    params_from_map(map).map_err(|msg| AppError::new(2, format!("Invalid parameter JSON '{}': {msg}", path.display())))
}

/// Write a canonical parameter file (pretty, key-sorted).
pub fn write_params_json(path: &Path, params: &ParameterSet) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create parameter JSON '{}': {e}", path.display())))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, params)
        .map_err(|e| AppError::new(2, format!("Failed to write parameter JSON: {e}")))?;
    writeln!(writer).map_err(|e| AppError::new(2, format!("Failed to write parameter JSON: {e}")))?;
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to write parameter JSON: {e}")))?;
    Ok(())
}

fn params_from_map(map: Map<String, Value>) -> Result<ParameterSet, String> {
    let mut pairs = Vec::with_capacity(map.len());
    for (name, value) in map {
        let text = match value {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            other => return Err(format!("value of '{name}' must be a string or number, got {other}")),
        };
        pairs.push((name, text));
    }
    ParameterSet::try_from_pairs(pairs)
        .map_err(|name| format!("parameter '{name}' duplicates another name differing only in case"))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    #[test]
    fn reads_strings_and_numbers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("final_dimensions.json");
        fs::write(&path, r#"{"d0": "250[nm]", "n_ext": 17, "delx": 4.5}"#).unwrap();
        let set = read_params_json(&path).unwrap();
        assert_eq!(set.get("d0"), Some("250[nm]"));
        assert_eq!(set.get("n_ext"), Some("17"));
        assert_eq!(set.get("delx"), Some("4.5"));
    }

    #[test]
    fn rejects_nested_values_and_case_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, r#"{"d0": [1, 2]}"#).unwrap();
        assert_eq!(read_params_json(&path).unwrap_err().exit_code(), 2);

        fs::write(&path, r#"{"M": "2", "m": "3"}"#).unwrap();
        let err = read_params_json(&path).unwrap_err();
        assert!(err.message().contains("differing only in case"), "{err}");
    }

    #[test]
    fn malformed_json_is_an_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{not json").unwrap();
        assert_eq!(read_params_json(&path).unwrap_err().exit_code(), 2);
    }

    #[test]
    fn writes_sorted_case_insensitively() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let set = ParameterSet::try_from_pairs([("h0", "4"), ("M", "2"), ("d0", "10")]).unwrap();
        write_params_json(&path, &set).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "{\n  \"d0\": \"10\",\n  \"h0\": \"4\",\n  \"M\": \"2\"\n}\n");
        assert_eq!(read_params_json(&path).unwrap(), set);
    }
}
