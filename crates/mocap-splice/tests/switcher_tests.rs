use mocap_document::{DocumentError, DocumentStore, FileStore, MemoryStore, MocapSection, StoreError};
use mocap_splice::host::{RecordAccess, SceneHost, SceneSession};
use mocap_splice::{ApplyStrategy, MocapSwitcher, SwitcherConfig, SwitcherError};
use mocap_test_utils::{sample_mocap, sample_scene, SceneBuilder, CORE_CONTROL_ID, PERSON_ID, TIMING_MASTER_ID};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new();
        store
            .save(&dir.path().join("scene.json"), sample_scene().as_value())
            .unwrap();
        store
            .save(&dir.path().join("mocap/wave.json"), &sample_mocap())
            .unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> std::path::PathBuf {
        self.dir.path().join(name)
    }

    fn config(&self) -> SwitcherConfig {
        SwitcherConfig::new()
            .with_tmp_scene_path(self.path("PluginData/MocapSwitcher/tmp.json"))
            .with_mocap_dir(self.path("mocap"))
    }
}

#[test]
fn test_file_load_reloads_spliced_scene() {
    let ws = Workspace::new();
    let mut host = SceneHost::open(&ws.path("scene.json")).unwrap();
    let switcher = MocapSwitcher::bind(ws.config(), &host, FileStore::new()).unwrap();

    let report = switcher
        .load_and_apply(&mut host, &ws.path("mocap/wave.json"))
        .unwrap();
    assert!(report.is_clean());
    assert_eq!(host.reload_count(), 1);
    assert!(ws.path("PluginData/MocapSwitcher/tmp.json").exists());

    let head = host.fetch(PERSON_ID, "headControl").unwrap();
    assert_eq!(head.get("position"), Some(&json!({"x": "mocap", "y": "0", "z": "0"})));
    let master = host.fetch(CORE_CONTROL_ID, TIMING_MASTER_ID).unwrap();
    assert_eq!(master.get("playbackCounter"), Some(&json!("0")));

    // The source scene file is never rewritten by a load.
    let on_disk = FileStore::new().load_scene(&ws.path("scene.json")).unwrap();
    assert_eq!(on_disk, sample_scene());
}

#[test]
fn test_file_save_round_trip() {
    let ws = Workspace::new();
    let mut host = SceneHost::open(&ws.path("scene.json")).unwrap();
    let switcher = MocapSwitcher::bind(ws.config(), &host, FileStore::new()).unwrap();

    let written = switcher
        .save_mocap(&mut host, &ws.config().mocap_path("take1"))
        .unwrap();
    assert_eq!(written, ws.path("mocap/take1.json"));

    let saved = FileStore::new().load_mocap(&written).unwrap();
    assert_eq!(
        saved.person().ids().collect::<Vec<_>>(),
        vec![
            "control",
            "headAnimation",
            "headControl",
            "lHandAnimation",
            "lHandControl",
            "eyeTargetControlAnimation",
            "eyeTargetControl",
        ]
    );
    let master = saved.core_control_record(TIMING_MASTER_ID).unwrap();
    assert_eq!(master.get("triggers"), Some(&json!([])));
    assert_eq!(master.get("playbackCounter"), Some(&json!("0")));

    // Loading what was just saved leaves the person's animation records as they were.
    let before = host.scene().atom(PERSON_ID).unwrap().fields().clone();
    switcher.load_and_apply(&mut host, &written).unwrap();
    assert_eq!(host.scene().atom(PERSON_ID).unwrap().fields(), &before);
}

#[test]
fn test_missing_mocap_file() {
    let ws = Workspace::new();
    let mut host = SceneHost::open(&ws.path("scene.json")).unwrap();
    let switcher = MocapSwitcher::bind(ws.config(), &host, FileStore::new()).unwrap();

    let err = switcher
        .load_and_apply(&mut host, &ws.path("mocap/none.json"))
        .unwrap_err();
    assert!(matches!(err, SwitcherError::Store(StoreError::Read { .. })));
    assert_eq!(host.reload_count(), 0);
}

#[test]
fn test_mocap_without_person_section() {
    let ws = Workspace::new();
    fs::write(ws.path("mocap/odd.json"), r#"{"CoreControl": {"storables": []}}"#).unwrap();
    let mut host = SceneHost::open(&ws.path("scene.json")).unwrap();
    let switcher = MocapSwitcher::bind(ws.config(), &host, FileStore::new()).unwrap();

    let err = switcher
        .load_and_apply(&mut host, &ws.path("mocap/odd.json"))
        .unwrap_err();
    assert!(matches!(
        err,
        SwitcherError::Store(StoreError::Document {
            source: DocumentError::MissingSection(MocapSection::Person),
            ..
        })
    ));
    assert!(!ws.path("PluginData/MocapSwitcher/tmp.json").exists());
}

#[test]
fn test_fatal_load_writes_nothing() {
    let ws = Workspace::new();
    let mut mocap = sample_mocap();
    mocap["Person"]["storables"]
        .as_array_mut()
        .unwrap()
        .retain(|r| r["id"] != "eyeTargetControl");
    FileStore::new().save(&ws.path("mocap/partial.json"), &mocap).unwrap();

    let mut host = SceneHost::open(&ws.path("scene.json")).unwrap();
    let before = host.scene().clone();
    let switcher = MocapSwitcher::bind(ws.config(), &host, FileStore::new()).unwrap();

    let err = switcher
        .load_and_apply(&mut host, &ws.path("mocap/partial.json"))
        .unwrap_err();
    assert!(err.to_string().contains("'eyeTargetControl'"));
    assert!(!ws.path("PluginData/MocapSwitcher/tmp.json").exists());
    assert_eq!(host.reload_count(), 0);
    assert_eq!(host.scene(), &before);
}

#[test]
fn test_strategies_agree() {
    let store = MemoryStore::new();
    store.insert("wave.json", sample_mocap());

    let mut reloaded = SceneHost::new(sample_scene(), &store);
    let switcher = MocapSwitcher::bind(SwitcherConfig::new(), &reloaded, &store).unwrap();
    switcher.load_and_apply(&mut reloaded, Path::new("wave.json")).unwrap();

    let mut live = SceneHost::new(sample_scene(), &store);
    let config = SwitcherConfig::new().with_strategy(ApplyStrategy::LiveRestore);
    let switcher = MocapSwitcher::bind(config, &live, &store).unwrap();
    switcher.load_and_apply(&mut live, Path::new("wave.json")).unwrap();

    // Same records, possibly in a different order within the person.
    for id in ["headControl", "headAnimation", "lHandControl", "lHandAnimation", "eyeTargetControl", "eyeTargetControlAnimation"] {
        assert_eq!(reloaded.fetch(PERSON_ID, id), live.fetch(PERSON_ID, id), "record {id}");
    }
    assert_eq!(
        reloaded.fetch(CORE_CONTROL_ID, TIMING_MASTER_ID),
        live.fetch(CORE_CONTROL_ID, TIMING_MASTER_ID)
    );
    assert_eq!(live.reload_count(), 0);
}

#[test]
fn test_rewind_failure_does_not_block_export() {
    let scene = SceneBuilder::new()
        .atom(json!({"id": CORE_CONTROL_ID, "storables": [{"id": TIMING_MASTER_ID, "playbackCounter": "4"}]}))
        .person(mocap_test_utils::sample_person_records("live", 1))
        .build();
    let store = MemoryStore::new();
    let mut host = SceneHost::new(scene, &store).with_core_control_id("Elsewhere");
    assert!(host.rewind_playback().is_err());

    let switcher = MocapSwitcher::bind(SwitcherConfig::new(), &host, &store).unwrap();
    let written = switcher.save_mocap(&mut host, Path::new("take")).unwrap();
    let saved = store.get(&written).unwrap();
    assert_eq!(saved["CoreControl"]["storables"][0]["playbackCounter"], "4");
}

#[test]
fn test_failed_export_leaves_playback_rewound() {
    let scene = SceneBuilder::new()
        .core_control("12")
        .person(vec![
            mocap_test_utils::control("control", "live"),
            mocap_test_utils::animation("headAnimation", 2, "live"),
        ])
        .build();
    let store = MemoryStore::new();
    let mut host = SceneHost::new(scene, &store);
    let switcher = MocapSwitcher::bind(SwitcherConfig::new(), &host, &store).unwrap();

    let err = switcher.save_mocap(&mut host, Path::new("take")).unwrap_err();
    assert!(err.to_string().contains("'headControl'"));
    assert!(store.is_empty());
    let master = host.fetch(CORE_CONTROL_ID, TIMING_MASTER_ID).unwrap();
    assert_eq!(master.get("playbackCounter"), Some(&json!("0")));
}
