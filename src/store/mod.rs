//! Persistence for finalized chart configurations.
//!
//! Each chart is stored as a JSON blob under its own key, next to a
//! newest-first gallery index of lightweight metadata. Gallery entries are a
//! denormalized snapshot taken at creation; plain updates leave them as they
//! were unless the store is configured with [`MetadataSync::Resync`].

mod remote;
mod storage;

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::api::{ChartConfiguration, ChartConfigurationPatch};
use crate::core::ChartKind;
use crate::error::{ChartError, ChartResult};

#[cfg(feature = "remote-mirror")]
pub use remote::HttpMirror;
pub use remote::{MirrorDispatcher, RemoteMirror, RemoteMirrorConfig, RemoteSaveRequest};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};

pub const GALLERY_KEY: &str = "chart_gallery";
const CONFIG_KEY_PREFIX: &str = "chart_config:";
const MAX_ID_ATTEMPTS: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChartId(String);

impl ChartId {
    /// Millisecond timestamp prefix plus a random suffix.
    #[must_use]
    pub fn generate() -> Self {
        let suffix = Uuid::new_v4().simple().to_string();
        Self(format!(
            "chart_{}_{}",
            Utc::now().timestamp_millis(),
            &suffix[..9]
        ))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChartId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for ChartId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Gallery entry for one stored chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartMetadata {
    pub id: ChartId,
    pub title: String,
    #[serde(rename = "type")]
    pub chart_type: ChartKind,
    pub file: Option<String>,
    pub created: DateTime<Utc>,
    #[serde(rename = "is3D")]
    pub is_3d: bool,
    pub views: u64,
    pub downloads: u64,
}

impl ChartMetadata {
    fn refresh_from(&mut self, kind: ChartKind, config: &ChartConfiguration) {
        self.title = config.title.clone();
        self.chart_type = kind;
        self.is_3d = config.is_3d;
        self.file = config.file_name.clone();
    }
}

/// Whether updates touch the gallery entry of the chart they change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MetadataSync {
    /// Gallery keeps the values captured at creation.
    #[default]
    Stale,
    /// Each update rewrites title, type, file and 3D flag.
    Resync,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct StoredChart {
    revision: u64,
    config: ChartConfiguration,
}

fn config_key(id: &ChartId) -> String {
    format!("{CONFIG_KEY_PREFIX}{id}")
}

fn required_kind(config: &ChartConfiguration) -> ChartResult<ChartKind> {
    config
        .chart_type
        .ok_or_else(|| ChartError::InvalidData("chart config has no chart type".to_owned()))
}

pub struct ConfigurationStore<S: KeyValueStorage> {
    storage: S,
    mirror: Option<MirrorDispatcher>,
    metadata_sync: MetadataSync,
}

impl<S: KeyValueStorage> ConfigurationStore<S> {
    #[must_use]
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            mirror: None,
            metadata_sync: MetadataSync::default(),
        }
    }

    #[must_use]
    pub fn with_mirror(mut self, mirror: Arc<dyn RemoteMirror>) -> Self {
        self.mirror = Some(MirrorDispatcher::new(mirror));
        self
    }

    #[must_use]
    pub fn with_metadata_sync(mut self, sync: MetadataSync) -> Self {
        self.metadata_sync = sync;
        self
    }

    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Stores `config` under a fresh id and prepends its gallery entry.
    ///
    /// The remote mirror is written in the background; its outcome never
    /// affects the returned id.
    pub fn create(&mut self, config: &ChartConfiguration) -> ChartResult<ChartId> {
        let kind = required_kind(config)?;
        let mut config = config.clone();
        config.normalize_dimensions();
        let created = config.created_at.unwrap_or_else(Utc::now);

        let id = self.fresh_id()?;
        self.write_blob(
            &id,
            &StoredChart {
                revision: 1,
                config: config.clone(),
            },
        )?;

        let mut gallery = self.list()?;
        gallery.insert(
            0,
            ChartMetadata {
                id: id.clone(),
                title: config.title.clone(),
                chart_type: kind,
                file: config.file_name.clone(),
                created,
                is_3d: config.is_3d,
                views: 0,
                downloads: 0,
            },
        );
        if let Err(err) = self.write_gallery(&gallery) {
            if let Err(rollback) = self.storage.remove(&config_key(&id)) {
                warn!(chart_id = %id, error = %rollback, "failed to roll back chart blob");
            }
            return Err(err);
        }
        debug!(chart_id = %id, kind = %kind, points = config.data_points, "created chart");

        if let Some(mirror) = &mut self.mirror {
            mirror.dispatch(&id, RemoteSaveRequest::new(kind, &config));
        }
        Ok(id)
    }

    pub fn load(&self, id: &ChartId) -> ChartResult<ChartConfiguration> {
        Ok(self.read_blob(id)?.config)
    }

    pub fn revision(&self, id: &ChartId) -> ChartResult<u64> {
        Ok(self.read_blob(id)?.revision)
    }

    /// Merges `patch` into the stored blob; last writer wins.
    pub fn update(
        &mut self,
        id: &ChartId,
        patch: ChartConfigurationPatch,
    ) -> ChartResult<ChartConfiguration> {
        let stored = self.read_blob(id)?;
        self.apply_update(id, stored, patch)
    }

    /// Like [`Self::update`], but fails when the blob moved past `expected`.
    pub fn update_if_revision(
        &mut self,
        id: &ChartId,
        expected: u64,
        patch: ChartConfigurationPatch,
    ) -> ChartResult<ChartConfiguration> {
        let stored = self.read_blob(id)?;
        if stored.revision != expected {
            return Err(ChartError::RevisionConflict {
                id: id.to_string(),
                expected,
                actual: stored.revision,
            });
        }
        self.apply_update(id, stored, patch)
    }

    /// Newest first.
    pub fn list(&self) -> ChartResult<Vec<ChartMetadata>> {
        match self.storage.get(GALLERY_KEY)? {
            Some(raw) => serde_json::from_str(&raw)
                .map_err(|e| ChartError::Storage(format!("corrupt gallery index: {e}"))),
            None => Ok(Vec::new()),
        }
    }

    pub fn delete(&mut self, id: &ChartId) -> ChartResult<()> {
        let mut gallery = self.list()?;
        let removed_blob = self.storage.remove(&config_key(id))?;
        let before = gallery.len();
        gallery.retain(|entry| &entry.id != id);
        let removed_entry = gallery.len() != before;
        if removed_entry {
            self.write_gallery(&gallery)?;
        }
        if !removed_blob && !removed_entry {
            return Err(ChartError::NotFound { id: id.to_string() });
        }
        debug!(chart_id = %id, "deleted chart");
        Ok(())
    }

    pub fn record_view(&mut self, id: &ChartId) -> ChartResult<u64> {
        self.bump_counter(id, |entry| &mut entry.views)
    }

    pub fn record_download(&mut self, id: &ChartId) -> ChartResult<u64> {
        self.bump_counter(id, |entry| &mut entry.downloads)
    }

    /// Copies the current blob's title, type, file and 3D flag into its
    /// gallery entry.
    pub fn resync_metadata(&mut self, id: &ChartId) -> ChartResult<ChartMetadata> {
        let config = self.load(id)?;
        let kind = required_kind(&config)?;
        let mut gallery = self.list()?;
        let entry = gallery
            .iter_mut()
            .find(|entry| &entry.id == id)
            .ok_or_else(|| ChartError::NotFound { id: id.to_string() })?;
        entry.refresh_from(kind, &config);
        let refreshed = entry.clone();
        self.write_gallery(&gallery)?;
        Ok(refreshed)
    }

    /// Blocks until background mirror writes have finished.
    pub fn wait_for_mirror(&mut self) {
        if let Some(mirror) = &mut self.mirror {
            mirror.wait();
        }
    }

    fn apply_update(
        &mut self,
        id: &ChartId,
        mut stored: StoredChart,
        patch: ChartConfigurationPatch,
    ) -> ChartResult<ChartConfiguration> {
        patch.apply_to(&mut stored.config);
        let kind = required_kind(&stored.config)?;
        // The gallery entry must be readable before the blob changes.
        let resync = match self.metadata_sync {
            MetadataSync::Resync => {
                let gallery = self.list()?;
                let position = gallery
                    .iter()
                    .position(|entry| &entry.id == id)
                    .ok_or_else(|| ChartError::NotFound { id: id.to_string() })?;
                Some((gallery, position))
            }
            MetadataSync::Stale => None,
        };

        stored.revision += 1;
        self.write_blob(id, &stored)?;
        debug!(chart_id = %id, revision = stored.revision, "updated chart");

        if let Some((mut gallery, position)) = resync {
            gallery[position].refresh_from(kind, &stored.config);
            self.write_gallery(&gallery)?;
        }
        Ok(stored.config)
    }

    fn bump_counter(
        &mut self,
        id: &ChartId,
        counter: impl Fn(&mut ChartMetadata) -> &mut u64,
    ) -> ChartResult<u64> {
        let mut gallery = self.list()?;
        let entry = gallery
            .iter_mut()
            .find(|entry| &entry.id == id)
            .ok_or_else(|| ChartError::NotFound { id: id.to_string() })?;
        let value = counter(entry);
        *value += 1;
        let current = *value;
        self.write_gallery(&gallery)?;
        Ok(current)
    }

    fn fresh_id(&self) -> ChartResult<ChartId> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = ChartId::generate();
            if self.storage.get(&config_key(&id))?.is_none() {
                return Ok(id);
            }
        }
        Err(ChartError::Storage(
            "could not generate an unused chart id".to_owned(),
        ))
    }

    fn read_blob(&self, id: &ChartId) -> ChartResult<StoredChart> {
        let raw = self
            .storage
            .get(&config_key(id))?
            .ok_or_else(|| ChartError::NotFound { id: id.to_string() })?;
        serde_json::from_str(&raw)
            .map_err(|e| ChartError::Storage(format!("corrupt chart `{id}`: {e}")))
    }

    fn write_blob(&mut self, id: &ChartId, stored: &StoredChart) -> ChartResult<()> {
        let raw = serde_json::to_string(stored)
            .map_err(|e| ChartError::Storage(format!("failed to serialize chart `{id}`: {e}")))?;
        self.storage.set(&config_key(id), raw)
    }

    fn write_gallery(&mut self, gallery: &[ChartMetadata]) -> ChartResult<()> {
        let raw = serde_json::to_string(gallery)
            .map_err(|e| ChartError::Storage(format!("failed to serialize gallery: {e}")))?;
        self.storage.set(GALLERY_KEY, raw)
    }
}
