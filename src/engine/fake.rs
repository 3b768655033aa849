//! In-memory engine for tests.

use std::collections::HashMap;
use std::path::Path;

use crate::engine::{ModelHandle, SimulationEngine};
use crate::error::EngineError;

/// Records every call; each `fail_*` switch makes that step return an error.
#[derive(Debug, Default)]
pub struct FakeEngine {
    pub unavailable: bool,
    pub readable: bool,
    pub live: HashMap<String, String>,
    pub exports: Vec<String>,
    pub fail_load: bool,
    pub fail_list: bool,
    pub fail_set: bool,
    pub fail_build: bool,
    pub fail_mesh: bool,
    pub fail_solve: bool,
    pub fail_export: bool,
    pub fail_save: bool,
    pub fail_clear: bool,
    pub calls: Vec<String>,
}

impl FakeEngine {
    pub fn count(&self, prefix: &str) -> usize {
        self.calls.iter().filter(|c| c.starts_with(prefix)).count()
    }
}

impl SimulationEngine for FakeEngine {
    fn probe(&mut self) -> Result<(), EngineError> {
        if self.unavailable {
            Err(EngineError::Unavailable("offline".into()))
        } else {
            Ok(())
        }
    }

    fn load_model(&mut self, path: &Path) -> Result<ModelHandle, EngineError> {
        self.calls.push("load".into());
        if self.fail_load {
            return Err(EngineError::op("load", "corrupt file"));
        }
        Ok(ModelHandle {
            id: "h".into(),
            path: path.to_path_buf(),
        })
    }

    fn read_parameter(&mut self, _: &ModelHandle, name: &str) -> Result<Option<String>, EngineError> {
        if !self.readable {
            return Err(EngineError::op("read_parameter", "unsupported"));
        }
        Ok(self.live.get(name).cloned())
    }

    fn list_parameters(&mut self, _: &ModelHandle) -> Result<Vec<(String, String)>, EngineError> {
        self.calls.push("list".into());
        if self.fail_list {
            return Err(EngineError::op("list_parameters", "no parameter node"));
        }
        Ok(self.live.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }

    fn set_parameter(&mut self, _: &ModelHandle, name: &str, value: &str) -> Result<(), EngineError> {
        self.calls.push(format!("set {name}={value}"));
        if self.fail_set {
            return Err(EngineError::op("set_parameter", "read-only parameter"));
        }
        self.live.insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn build(&mut self, _: &ModelHandle) -> Result<(), EngineError> {
        self.calls.push("build".into());
        if self.fail_build {
            return Err(EngineError::op("build", "geometry error"));
        }
        Ok(())
    }

    fn mesh(&mut self, _: &ModelHandle) -> Result<(), EngineError> {
        self.calls.push("mesh".into());
        if self.fail_mesh {
            return Err(EngineError::op("mesh", "element too small"));
        }
        Ok(())
    }

    fn solve(&mut self, _: &ModelHandle, study: &str) -> Result<(), EngineError> {
        self.calls.push(format!("solve {study}"));
        if self.fail_solve {
            return Err(EngineError::op("solve", "diverged"));
        }
        Ok(())
    }

    fn list_export_definitions(&mut self, _: &ModelHandle) -> Result<Vec<String>, EngineError> {
        Ok(self.exports.clone())
    }

    fn export_data(&mut self, _: &ModelHandle, definition: &str, _: &Path) -> Result<(), EngineError> {
        self.calls.push(format!("export {definition}"));
        if self.fail_export {
            return Err(EngineError::op("export", "disk full"));
        }
        Ok(())
    }

    fn save_model(&mut self, _: &ModelHandle, _: &Path) -> Result<(), EngineError> {
        self.calls.push("save".into());
        if self.fail_save {
            return Err(EngineError::op("save", "permission denied"));
        }
        Ok(())
    }

    fn clear(&mut self, _: &ModelHandle) -> Result<(), EngineError> {
        self.calls.push("clear".into());
        if self.fail_clear {
            return Err(EngineError::op("clear", "handle already released"));
        }
        Ok(())
    }
}
