//! HTTP/JSON bridge to the simulation engine.
//!
//! The bridge exposes loaded models as resources:
//!
//! | call                | request                                   |
//! |---------------------|-------------------------------------------|
//! | probe               | `GET  /health`                            |
//! | load                | `POST /models {"path"}` -> `{"handle"}`   |
//! | read parameter      | `GET  /models/{h}/parameters/{name}`      |
//! | list parameters     | `GET  /models/{h}/parameters`             |
//! | set parameter       | `PUT  /models/{h}/parameters/{name}`      |
//! | build / mesh        | `POST /models/{h}/build`, `/mesh`         |
//! | solve               | `POST /models/{h}/solve {"study"}`        |
//! | export definitions  | `GET  /models/{h}/exports`                |
//! | export              | `POST /models/{h}/exports/{name} {"path"}`|
//! | save                | `POST /models/{h}/save {"path"}`          |
//! | clear               | `DELETE /models/{h}`                      |
//!
//! A `404`/`501` on a parameter read means the bridge cannot report that value.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::Url;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::{ModelHandle, SimulationEngine};
use crate::error::EngineError;

const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

pub struct HttpEngine {
    client: Client,
    base: Url,
}

#[derive(Debug, Serialize)]
struct PathBody<'a> {
    path: &'a str,
}

#[derive(Debug, Serialize)]
struct ValueBody<'a> {
    value: &'a str,
}

#[derive(Debug, Serialize)]
struct StudyBody<'a> {
    study: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoadResponse {
    handle: String,
}

#[derive(Debug, Deserialize)]
struct ValueResponse {
    value: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ParametersResponse {
    parameters: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct ExportsResponse {
    exports: Vec<String>,
}

impl HttpEngine {
    /// Create a client for the bridge at `base_url`.
    ///
    /// No request timeout is set: solves run as long as the engine needs.
    pub fn new(base_url: &str) -> Result<Self, EngineError> {
        let base = Url::parse(base_url)
            .map_err(|e| EngineError::Unavailable(format!("invalid engine URL '{base_url}': {e}")))?;
        let client = Client::builder()
            .timeout(None::<Duration>)
            .build()
            .map_err(|e| EngineError::Unavailable(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, base })
    }

    fn url(&self, op: &str, segments: &[&str]) -> Result<Url, EngineError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| EngineError::op(op, format!("engine URL '{}' cannot take a path", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn model_url(&self, op: &str, model: &ModelHandle, rest: &[&str]) -> Result<Url, EngineError> {
        let mut segments = vec!["models", model.id.as_str()];
        segments.extend_from_slice(rest);
        self.url(op, &segments)
    }

    fn send(&self, op: &str, req: RequestBuilder) -> Result<Response, EngineError> {
        debug!(op, "engine request");
        let resp = req
            .send()
            .map_err(|e| EngineError::op(op, format!("request failed: {e}")))?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().unwrap_or_default();
            return Err(EngineError::op(op, format!("status {status}: {}", body.trim())));
        }
        Ok(resp)
    }

    fn post_empty(&self, op: &str, model: &ModelHandle) -> Result<(), EngineError> {
        let url = self.model_url(op, model, &[op])?;
        self.send(op, self.client.post(url))?;
        Ok(())
    }
}

fn path_str<'a>(op: &str, path: &'a Path) -> Result<&'a str, EngineError> {
    path.to_str()
        .ok_or_else(|| EngineError::op(op, format!("path is not valid UTF-8: {}", path.display())))
}

impl SimulationEngine for HttpEngine {
    fn probe(&mut self) -> Result<(), EngineError> {
        let url = self.url("probe", &["health"])?;
        let resp = self
            .client
            .get(url)
            .timeout(PROBE_TIMEOUT)
            .send()
            .map_err(|e| EngineError::Unavailable(format!("{} not reachable: {e}", self.base)))?;
        if !resp.status().is_success() {
            return Err(EngineError::Unavailable(format!(
                "{} answered health check with status {}",
                self.base,
                resp.status()
            )));
        }
        Ok(())
    }

    fn load_model(&mut self, path: &Path) -> Result<ModelHandle, EngineError> {
        let url = self.url("load", &["models"])?;
        let body = PathBody { path: path_str("load", path)? };
        let resp = self.send("load", self.client.post(url).json(&body))?;
        let loaded: LoadResponse = resp
            .json()
            .map_err(|e| EngineError::op("load", format!("invalid response: {e}")))?;
        Ok(ModelHandle {
            id: loaded.handle,
            path: path.to_path_buf(),
        })
    }

    fn read_parameter(&mut self, model: &ModelHandle, name: &str) -> Result<Option<String>, EngineError> {
        let url = self.model_url("read_parameter", model, &["parameters", name])?;
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| EngineError::op("read_parameter", format!("request failed: {e}")))?;
        match resp.status() {
            StatusCode::NOT_FOUND | StatusCode::NOT_IMPLEMENTED => Ok(None),
            s if s.is_success() => {
                let body: ValueResponse = resp
                    .json()
                    .map_err(|e| EngineError::op("read_parameter", format!("invalid response: {e}")))?;
                Ok(body.value)
            }
            s => Err(EngineError::op("read_parameter", format!("status {s}"))),
        }
    }

    fn list_parameters(&mut self, model: &ModelHandle) -> Result<Vec<(String, String)>, EngineError> {
        let url = self.model_url("list_parameters", model, &["parameters"])?;
        let resp = self.send("list_parameters", self.client.get(url))?;
        let body: ParametersResponse = resp
            .json()
            .map_err(|e| EngineError::op("list_parameters", format!("invalid response: {e}")))?;
        Ok(body.parameters.into_iter().collect())
    }

    fn set_parameter(&mut self, model: &ModelHandle, name: &str, value: &str) -> Result<(), EngineError> {
        let url = self.model_url("set_parameter", model, &["parameters", name])?;
        self.send("set_parameter", self.client.put(url).json(&ValueBody { value }))?;
        Ok(())
    }

    fn build(&mut self, model: &ModelHandle) -> Result<(), EngineError> {
        self.post_empty("build", model)
    }

    fn mesh(&mut self, model: &ModelHandle) -> Result<(), EngineError> {
        self.post_empty("mesh", model)
    }

    fn solve(&mut self, model: &ModelHandle, study: &str) -> Result<(), EngineError> {
        let url = self.model_url("solve", model, &["solve"])?;
        self.send("solve", self.client.post(url).json(&StudyBody { study }))?;
        Ok(())
    }

    fn list_export_definitions(&mut self, model: &ModelHandle) -> Result<Vec<String>, EngineError> {
        let url = self.model_url("list_exports", model, &["exports"])?;
        let resp = self.send("list_exports", self.client.get(url))?;
        let body: ExportsResponse = resp
            .json()
            .map_err(|e| EngineError::op("list_exports", format!("invalid response: {e}")))?;
        Ok(body.exports)
    }

    fn export_data(&mut self, model: &ModelHandle, definition: &str, out: &Path) -> Result<(), EngineError> {
        let url = self.model_url("export", model, &["exports", definition])?;
        let body = PathBody { path: path_str("export", out)? };
        self.send("export", self.client.post(url).json(&body))?;
        Ok(())
    }

    fn save_model(&mut self, model: &ModelHandle, out: &Path) -> Result<(), EngineError> {
        let url = self.model_url("save", model, &["save"])?;
        let body = PathBody { path: path_str("save", out)? };
        self.send("save", self.client.post(url).json(&body))?;
        Ok(())
    }

    fn clear(&mut self, model: &ModelHandle) -> Result<(), EngineError> {
        let url = self.model_url("clear", model, &[])?;
        self.send("clear", self.client.delete(url))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle() -> ModelHandle {
        ModelHandle {
            id: "m1".to_string(),
            path: "unit.mph".into(),
        }
    }

    #[test]
    fn builds_resource_urls_under_base_path() {
        let engine = HttpEngine::new("http://localhost:8765/bridge/").unwrap();
        let url = engine.model_url("read", &handle(), &["parameters", "d17"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8765/bridge/models/m1/parameters/d17");
    }

    #[test]
    fn escapes_parameter_names() {
        let engine = HttpEngine::new("http://localhost:8765").unwrap();
        let url = engine.model_url("read", &handle(), &["parameters", "a/b c"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8765/models/m1/parameters/a%2Fb%20c");
    }

    #[test]
    fn invalid_url_means_unavailable() {
        assert!(matches!(
            HttpEngine::new("not a url"),
            Err(EngineError::Unavailable(_))
        ));
    }
}
