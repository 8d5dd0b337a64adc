use std::sync::{Arc, Mutex};

use sheet_charts::api::ChartConfigurationPatch;
use sheet_charts::core::{CellValue, ChartKind};
use sheet_charts::store::{
    ChartId, ConfigurationStore, FileStorage, GALLERY_KEY, KeyValueStorage, MemoryStorage,
    MetadataSync, RemoteMirror, RemoteSaveRequest,
};
use sheet_charts::{ChartConfiguration, ChartError, ChartResult};

fn finalized(kind: ChartKind, title: &str) -> ChartConfiguration {
    let mut config = ChartConfiguration::new(kind)
        .with_axes("Month", "Revenue")
        .with_title(title);
    if kind.is_3d() {
        config = config.with_z_axis("Cost");
        config.z_data = Some(vec![Some(1.0), Some(2.5), None]);
    }
    config.x_data = vec![
        CellValue::text("Jan"),
        CellValue::text("Feb"),
        CellValue::text("Mar"),
    ];
    config.y_data = vec![Some(0.1), Some(1234.5), Some(-7.25)];
    config.data_points = 3;
    config.file_name = Some("sales.xlsx".to_owned());
    config
}

#[test]
fn created_chart_loads_back_unchanged() {
    let mut store = ConfigurationStore::new(MemoryStorage::new());
    for kind in [ChartKind::Bar, ChartKind::Surface3d] {
        let config = finalized(kind, "Round trip");
        let id = store.create(&config).expect("create");
        assert_eq!(store.load(&id).expect("load"), config);
        assert_eq!(store.revision(&id).expect("revision"), 1);
    }
}

#[test]
fn chart_ids_are_prefixed_and_unique() {
    let mut store = ConfigurationStore::new(MemoryStorage::new());
    let a = store.create(&finalized(ChartKind::Bar, "a")).expect("a");
    let b = store.create(&finalized(ChartKind::Bar, "b")).expect("b");
    assert_ne!(a, b);
    assert!(a.as_str().starts_with("chart_"));
    assert_eq!(a.as_str().rsplit('_').next().map(str::len), Some(9));
}

#[test]
fn gallery_lists_newest_first() {
    let mut store = ConfigurationStore::new(MemoryStorage::new());
    let first = store.create(&finalized(ChartKind::Bar, "first")).expect("first");
    let second = store.create(&finalized(ChartKind::Pie, "second")).expect("second");

    let gallery = store.list().expect("list");
    assert_eq!(gallery.len(), 2);
    assert_eq!(gallery[0].id, second);
    assert_eq!(gallery[0].chart_type, ChartKind::Pie);
    assert_eq!(gallery[1].id, first);
    assert_eq!(gallery[1].title, "first");
    assert_eq!(gallery[1].file.as_deref(), Some("sales.xlsx"));
    assert_eq!((gallery[1].views, gallery[1].downloads), (0, 0));
}

#[test]
fn gallery_entries_use_the_wire_field_names() {
    let mut store = ConfigurationStore::new(MemoryStorage::new());
    store
        .create(&finalized(ChartKind::Scatter3d, "cloud"))
        .expect("create");
    let raw = store
        .storage()
        .get(GALLERY_KEY)
        .expect("get")
        .expect("gallery written");
    let json: serde_json::Value = serde_json::from_str(&raw).expect("json");
    assert_eq!(json[0]["type"], "scatter3d");
    assert_eq!(json[0]["is3D"], true);
    assert_eq!(json[0]["views"], 0);
}

#[test]
fn missing_charts_are_not_found() {
    let mut store = ConfigurationStore::new(MemoryStorage::new());
    let id = ChartId::from("chart_0_missing00");
    assert!(matches!(store.load(&id), Err(ChartError::NotFound { .. })));
    assert!(matches!(
        store.update(&id, ChartConfigurationPatch::title("x")),
        Err(ChartError::NotFound { .. })
    ));
    assert!(matches!(store.delete(&id), Err(ChartError::NotFound { .. })));
    assert!(matches!(store.record_view(&id), Err(ChartError::NotFound { .. })));
}

#[test]
fn update_merges_fields_and_leaves_gallery_stale() {
    let mut store = ConfigurationStore::new(MemoryStorage::new());
    let id = store.create(&finalized(ChartKind::Bar, "Q1")).expect("create");

    let updated = store
        .update(&id, ChartConfigurationPatch::title("Q2"))
        .expect("update");
    assert_eq!(updated.title, "Q2");
    assert_eq!(updated.y_data, [Some(0.1), Some(1234.5), Some(-7.25)]);

    assert_eq!(store.load(&id).expect("load").title, "Q2");
    assert_eq!(store.list().expect("list")[0].title, "Q1");
    assert_eq!(store.revision(&id).expect("revision"), 2);

    let refreshed = store.resync_metadata(&id).expect("resync");
    assert_eq!(refreshed.title, "Q2");
    assert_eq!(store.list().expect("list")[0].title, "Q2");
}

#[test]
fn resync_mode_refreshes_gallery_on_every_update() {
    let mut store =
        ConfigurationStore::new(MemoryStorage::new()).with_metadata_sync(MetadataSync::Resync);
    let id = store.create(&finalized(ChartKind::Line, "Q1")).expect("create");

    let patch = ChartConfigurationPatch {
        title: Some("Q2".to_owned()),
        chart_type: Some(ChartKind::Area),
        ..ChartConfigurationPatch::default()
    };
    store.update(&id, patch).expect("update");

    let entry = &store.list().expect("list")[0];
    assert_eq!(entry.title, "Q2");
    assert_eq!(entry.chart_type, ChartKind::Area);
}

#[test]
fn resync_update_with_unreadable_gallery_leaves_the_blob_alone() {
    let mut store =
        ConfigurationStore::new(MemoryStorage::new()).with_metadata_sync(MetadataSync::Resync);
    let id = store.create(&finalized(ChartKind::Line, "Q1")).expect("create");
    store
        .storage_mut()
        .set(GALLERY_KEY, "not json".to_owned())
        .expect("corrupt gallery");

    let err = store
        .update(&id, ChartConfigurationPatch::title("Q2"))
        .expect_err("gallery is unreadable");
    assert!(matches!(err, ChartError::Storage(_)));
    assert_eq!(store.load(&id).expect("load").title, "Q1");
    assert_eq!(store.revision(&id).expect("revision"), 1);
}

#[test]
fn resync_update_without_a_gallery_entry_leaves_the_blob_alone() {
    let mut store =
        ConfigurationStore::new(MemoryStorage::new()).with_metadata_sync(MetadataSync::Resync);
    let id = store.create(&finalized(ChartKind::Line, "Q1")).expect("create");
    store
        .storage_mut()
        .set(GALLERY_KEY, "[]".to_owned())
        .expect("empty gallery");

    let err = store
        .update(&id, ChartConfigurationPatch::title("Q2"))
        .expect_err("entry is gone");
    assert!(matches!(err, ChartError::NotFound { .. }));
    assert_eq!(store.load(&id).expect("load").title, "Q1");
    assert_eq!(store.revision(&id).expect("revision"), 1);
}

#[test]
fn switching_an_update_to_a_flat_kind_drops_z_fields() {
    let mut store = ConfigurationStore::new(MemoryStorage::new());
    let id = store
        .create(&finalized(ChartKind::Scatter3d, "cloud"))
        .expect("create");
    let patch = ChartConfigurationPatch {
        chart_type: Some(ChartKind::Scatter),
        ..ChartConfigurationPatch::default()
    };
    let updated = store.update(&id, patch).expect("update");
    assert!(!updated.is_3d);
    assert_eq!(updated.z_axis, None);
    assert_eq!(updated.z_data, None);
    assert_eq!(updated.z_axis_style, None);
}

#[test]
fn revision_guard_rejects_stale_writers() {
    let mut store = ConfigurationStore::new(MemoryStorage::new());
    let id = store.create(&finalized(ChartKind::Bar, "v1")).expect("create");

    store
        .update_if_revision(&id, 1, ChartConfigurationPatch::title("v2"))
        .expect("first writer");
    let err = store
        .update_if_revision(&id, 1, ChartConfigurationPatch::title("v3"))
        .expect_err("second writer is stale");
    assert!(matches!(
        err,
        ChartError::RevisionConflict {
            expected: 1,
            actual: 2,
            ..
        }
    ));
    assert_eq!(store.load(&id).expect("load").title, "v2");
}

#[test]
fn delete_removes_blob_and_gallery_entry() {
    let mut store = ConfigurationStore::new(MemoryStorage::new());
    let keep = store.create(&finalized(ChartKind::Bar, "keep")).expect("keep");
    let drop = store.create(&finalized(ChartKind::Bar, "drop")).expect("drop");

    store.delete(&drop).expect("delete");
    assert!(matches!(store.load(&drop), Err(ChartError::NotFound { .. })));
    let gallery = store.list().expect("list");
    assert_eq!(gallery.len(), 1);
    assert_eq!(gallery[0].id, keep);
    assert_eq!(store.storage().len(), 2);
}

#[test]
fn delete_with_unreadable_gallery_keeps_the_blob() {
    let mut store = ConfigurationStore::new(MemoryStorage::new());
    let id = store.create(&finalized(ChartKind::Bar, "kept")).expect("create");
    store
        .storage_mut()
        .set(GALLERY_KEY, "not json".to_owned())
        .expect("corrupt gallery");

    let err = store.delete(&id).expect_err("gallery is unreadable");
    assert!(matches!(err, ChartError::Storage(_)));
    assert_eq!(store.load(&id).expect("blob survives").title, "kept");
}

#[test]
fn view_and_download_counters_accumulate() {
    let mut store = ConfigurationStore::new(MemoryStorage::new());
    let id = store.create(&finalized(ChartKind::Pie, "pie")).expect("create");

    assert_eq!(store.record_view(&id).expect("view"), 1);
    assert_eq!(store.record_view(&id).expect("view"), 2);
    assert_eq!(store.record_download(&id).expect("download"), 1);

    let entry = &store.list().expect("list")[0];
    assert_eq!((entry.views, entry.downloads), (2, 1));
}

#[test]
fn configs_without_a_kind_are_rejected() {
    let mut store = ConfigurationStore::new(MemoryStorage::new());
    let result = store.create(&ChartConfiguration::default());
    assert!(matches!(result, Err(ChartError::InvalidData(_))));
    assert!(store.storage().is_empty());
}

#[test]
fn file_storage_survives_reopening() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = finalized(ChartKind::Bar3d, "on disk");

    let id = {
        let mut store =
            ConfigurationStore::new(FileStorage::open(dir.path()).expect("open storage"));
        store.create(&config).expect("create")
    };

    let store = ConfigurationStore::new(FileStorage::open(dir.path()).expect("reopen storage"));
    assert_eq!(store.load(&id).expect("load"), config);
    assert_eq!(store.list().expect("list")[0].id, id);
}

/// Memory storage that refuses writes to one key.
struct RefusingStorage {
    inner: MemoryStorage,
    refused_key: &'static str,
}

impl KeyValueStorage for RefusingStorage {
    fn get(&self, key: &str) -> ChartResult<Option<String>> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: String) -> ChartResult<()> {
        if key == self.refused_key {
            return Err(ChartError::Storage("quota exceeded".to_owned()));
        }
        self.inner.set(key, value)
    }

    fn remove(&mut self, key: &str) -> ChartResult<bool> {
        self.inner.remove(key)
    }
}

#[test]
fn local_write_failure_fails_create_and_rolls_back() {
    let mut store = ConfigurationStore::new(RefusingStorage {
        inner: MemoryStorage::new(),
        refused_key: GALLERY_KEY,
    });
    let result = store.create(&finalized(ChartKind::Bar, "nope"));
    assert!(matches!(result, Err(ChartError::Storage(_))));
    assert!(store.storage().inner.is_empty());
}

#[derive(Default)]
struct RecordingMirror {
    saved: Mutex<Vec<RemoteSaveRequest>>,
}

impl RemoteMirror for RecordingMirror {
    fn save(&self, request: &RemoteSaveRequest) -> ChartResult<()> {
        self.saved
            .lock()
            .expect("mirror lock")
            .push(request.clone());
        Ok(())
    }
}

struct UnreachableMirror;

impl RemoteMirror for UnreachableMirror {
    fn save(&self, _request: &RemoteSaveRequest) -> ChartResult<()> {
        Err(ChartError::Remote("connection refused".to_owned()))
    }
}

#[test]
fn create_mirrors_the_save_request() {
    let mirror = Arc::new(RecordingMirror::default());
    let mut store = ConfigurationStore::new(MemoryStorage::new()).with_mirror(mirror.clone());
    let config = finalized(ChartKind::Line, "mirrored");
    let id = store.create(&config).expect("create");
    store.wait_for_mirror();

    let saved = mirror.saved.lock().expect("mirror lock");
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].chart_type, ChartKind::Line);
    assert_eq!(saved[0].from_excel_file.as_deref(), Some("sales.xlsx"));
    assert_eq!(saved[0].chart_config, config);

    let body = serde_json::to_value(&saved[0]).expect("json");
    assert_eq!(body["chartType"], "line");
    assert_eq!(body["fromExcelFile"], "sales.xlsx");
    assert_eq!(body["chartConfig"]["title"], "mirrored");
    drop(saved);
    assert_eq!(store.load(&id).expect("load").title, "mirrored");
}

#[test]
fn mirror_failure_does_not_affect_local_create() {
    let mut store = ConfigurationStore::new(MemoryStorage::new()).with_mirror(Arc::new(UnreachableMirror));
    let id = store
        .create(&finalized(ChartKind::Bar, "local only"))
        .expect("create succeeds without the remote");
    store.wait_for_mirror();
    assert_eq!(store.load(&id).expect("load").title, "local only");
    assert_eq!(store.list().expect("list").len(), 1);
}

#[test]
fn updates_are_not_mirrored() {
    let mirror = Arc::new(RecordingMirror::default());
    let mut store = ConfigurationStore::new(MemoryStorage::new()).with_mirror(mirror.clone());
    let id = store.create(&finalized(ChartKind::Bar, "v1")).expect("create");
    store
        .update(&id, ChartConfigurationPatch::title("v2"))
        .expect("update");
    store.wait_for_mirror();
    assert_eq!(mirror.saved.lock().expect("mirror lock").len(), 1);
}
