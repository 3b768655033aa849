//! Run configuration resolved from the environment.
//!
//! Values come from process environment variables, with a `.env` file in the
//! working directory loaded first. CLI flags override these values in `app`.
//!
//! | variable            | default                 |
//! |---------------------|-------------------------|
//! | `TAPER_PARAMS_JSON` | `final_dimensions.json` |
//! | `TAPER_MODEL_DIR`   | `.`                     |
//! | `TAPER_ENGINE_URL`  | unset (report-only)     |
//! | `TAPER_STUDY`       | `std1`                  |

use std::path::PathBuf;

use crate::domain::{VariantKind, VariantTarget};

pub const DEFAULT_PARAMS_JSON: &str = "final_dimensions.json";
pub const DEFAULT_STUDY: &str = "std1";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub params_json: PathBuf,
    pub model_dir: PathBuf,
    pub engine_url: Option<String>,
    pub study: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            params_json: PathBuf::from(DEFAULT_PARAMS_JSON),
            model_dir: PathBuf::from("."),
            engine_url: None,
            study: DEFAULT_STUDY.to_string(),
        }
    }
}

impl AppConfig {
    /// Load `.env` (if present) and read the process environment.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();
        Self {
            params_json: get("TAPER_PARAMS_JSON").map(PathBuf::from).unwrap_or(defaults.params_json),
            model_dir: get("TAPER_MODEL_DIR").map(PathBuf::from).unwrap_or(defaults.model_dir),
            engine_url: get("TAPER_ENGINE_URL"),
            study: get("TAPER_STUDY").unwrap_or(defaults.study),
        }
    }

    /// Model file targets for the given variants.
    pub fn targets(&self, kinds: &[VariantKind]) -> Vec<VariantTarget> {
        kinds
            .iter()
            .map(|&kind| VariantTarget {
                kind,
                model_path: self.model_dir.join(kind.default_model_file()),
            })
            .collect()
    }
}
