use std::sync::Arc;
use std::thread::{self, JoinHandle};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::api::ChartConfiguration;
use crate::core::ChartKind;
use crate::error::ChartResult;
use crate::store::ChartId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteMirrorConfig {
    pub endpoint: String,
    /// Bearer credential issued by the host's auth layer.
    #[serde(default)]
    pub bearer_token: Option<String>,
}

/// Body of one mirrored save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteSaveRequest {
    pub chart_type: ChartKind,
    pub from_excel_file: Option<String>,
    pub chart_config: ChartConfiguration,
}

impl RemoteSaveRequest {
    #[must_use]
    pub fn new(chart_type: ChartKind, config: &ChartConfiguration) -> Self {
        Self {
            chart_type,
            from_excel_file: config.file_name.clone(),
            chart_config: config.clone(),
        }
    }
}

/// Remote copy of the chart store.
///
/// Failures are soft: the dispatcher logs them and the local write stands.
pub trait RemoteMirror: Send + Sync {
    fn save(&self, request: &RemoteSaveRequest) -> ChartResult<()>;
}

/// Runs mirror writes off the caller's thread.
pub struct MirrorDispatcher {
    mirror: Arc<dyn RemoteMirror>,
    pending: Vec<JoinHandle<()>>,
}

impl MirrorDispatcher {
    #[must_use]
    pub fn new(mirror: Arc<dyn RemoteMirror>) -> Self {
        Self {
            mirror,
            pending: Vec::new(),
        }
    }

    pub fn dispatch(&mut self, id: &ChartId, request: RemoteSaveRequest) {
        self.pending.retain(|handle| !handle.is_finished());

        let mirror = Arc::clone(&self.mirror);
        let chart_id = id.to_string();
        let spawned = thread::Builder::new()
            .name(format!("chart-mirror-{chart_id}"))
            .spawn(move || match mirror.save(&request) {
                Ok(()) => debug!(chart_id = %chart_id, "mirrored chart to remote store"),
                Err(err) => warn!(
                    chart_id = %chart_id,
                    error = %err,
                    "remote mirror write failed; local copy kept"
                ),
            });

        match spawned {
            Ok(handle) => self.pending.push(handle),
            Err(err) => warn!(
                chart_id = %id,
                error = %err,
                "could not start remote mirror write"
            ),
        }
    }

    /// Blocks until every in-flight mirror write has finished.
    pub fn wait(&mut self) {
        for handle in self.pending.drain(..) {
            if handle.join().is_err() {
                warn!("remote mirror worker panicked");
            }
        }
    }

    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.pending.iter().filter(|h| !h.is_finished()).count()
    }
}

#[cfg(feature = "remote-mirror")]
pub use http::HttpMirror;

#[cfg(feature = "remote-mirror")]
mod http {
    use super::{RemoteMirror, RemoteMirrorConfig, RemoteSaveRequest};
    use crate::error::{ChartError, ChartResult};

    /// Posts saves as JSON to a remote endpoint.
    pub struct HttpMirror {
        client: reqwest::blocking::Client,
        config: RemoteMirrorConfig,
    }

    impl HttpMirror {
        pub fn new(config: RemoteMirrorConfig) -> ChartResult<Self> {
            let client = reqwest::blocking::Client::builder()
                .build()
                .map_err(|e| ChartError::Remote(format!("failed to build http client: {e}")))?;
            Ok(Self { client, config })
        }
    }

    impl RemoteMirror for HttpMirror {
        fn save(&self, request: &RemoteSaveRequest) -> ChartResult<()> {
            let mut builder = self.client.post(&self.config.endpoint).json(request);
            if let Some(token) = &self.config.bearer_token {
                builder = builder.bearer_auth(token);
            }
            let response = builder
                .send()
                .map_err(|e| ChartError::Remote(format!("request failed: {e}")))?;
            let status = response.status();
            if !status.is_success() {
                return Err(ChartError::Remote(format!(
                    "remote store answered {status}"
                )));
            }
            Ok(())
        }
    }
}
