use std::fs;

use chrono::{TimeZone, Utc};
use recruit_core::{
    CoreError, FieldStore, FileExporter, FixedClock, FlowContext, KeyValueStore,
    MemoryFieldStore, ModalHost, QuestionFlow, QuestionSource, RecordingNotifier,
};
use recruit_domain::{AnswerMap, DomainError, FieldKey, PersistedSession};
use recruit_storage_json::{
    read_import_file, DirectoryExporter, FileQuestionSource, JsonKeyValueStore,
};
use tempfile::tempdir;

#[test]
fn key_value_store_round_trips_and_removes_entries() {
    let dir = tempdir().expect("tempdir");
    let mut store = JsonKeyValueStore::new(dir.path().join("kv")).expect("store");

    assert_eq!(store.get("ai-widget-mission").expect("get"), None);
    store
        .set("ai-widget-mission", r#"{"answers":{}}"#)
        .expect("set");
    let path = store.entry_path("ai-widget-mission");
    assert_eq!(
        path.file_name().and_then(|n| n.to_str()),
        Some("ai-widget-mission.json")
    );
    assert!(!path.with_extension("json.tmp").exists());
    assert_eq!(
        store.get("ai-widget-mission").expect("get").as_deref(),
        Some(r#"{"answers":{}}"#)
    );

    store.remove("ai-widget-mission").expect("remove");
    store.remove("ai-widget-mission").expect("remove twice");
    assert_eq!(store.get("ai-widget-mission").expect("get"), None);
}

#[test]
fn keys_cannot_escape_the_store_directory() {
    let dir = tempdir().expect("tempdir");
    let store = JsonKeyValueStore::new(dir.path().join("kv")).expect("store");
    let path = store.entry_path("../../etc/passwd");
    assert!(path.starts_with(dir.path().join("kv")));
}

#[test]
fn flow_sessions_survive_a_new_store_instance() {
    let dir = tempdir().expect("tempdir");
    let questions = dir.path().join("mission.json");
    fs::write(
        &questions,
        r#"{"questions":[{"id":"goal","text":"目標は？","required":true},{"id":"first","text":"最初の一歩は？"}]}"#,
    )
    .expect("write questions");

    let clock = FixedClock(Utc.with_ymd_and_hms(2025, 5, 1, 8, 0, 0).unwrap());
    let mut fields = MemoryFieldStore::new();
    let mut notifier = RecordingNotifier::new();
    let mut host = ModalHost::new();

    {
        let mut storage = JsonKeyValueStore::new(dir.path().join("kv")).expect("store");
        let mut flow = QuestionFlow::new(FieldKey::Mission, "ai-widget-");
        assert!(flow.load(&FileQuestionSource::new(questions.clone()), &mut notifier));
        let mut ctx = FlowContext {
            fields: &mut fields,
            storage: &mut storage,
            notifier: &mut notifier,
            clock: &clock,
        };
        flow.open(&mut host, &mut ctx).expect("open");
        flow.advance("移住者を増やす", &mut ctx).expect("advance");
    }

    let storage = JsonKeyValueStore::new(dir.path().join("kv")).expect("store");
    let raw = storage
        .get("ai-widget-mission")
        .expect("get")
        .expect("session saved");
    let session = PersistedSession::from_json(&raw).expect("valid session");
    let mut expected = AnswerMap::new();
    expected.record("goal", "移住者を増やす");
    assert_eq!(session.answers, expected);
    assert_eq!(session.current_question_index, 0);
    assert_eq!(session.timestamp, Some(clock.0));
    assert_eq!(fields.value(FieldKey::Mission), "");
}

#[test]
fn exporter_writes_into_its_directory_only() {
    let dir = tempdir().expect("tempdir");
    let mut exporter = DirectoryExporter::new(dir.path().join("exports"));

    let path = exporter
        .export("# 見出し", "chiikiokoshi_高山市_1.md", "text/markdown;charset=utf-8")
        .expect("export");
    assert_eq!(fs::read_to_string(&path).expect("read"), "# 見出し");
    assert!(path.starts_with(exporter.dir()));

    assert!(matches!(
        exporter.export("x", "../escape.md", "text/markdown"),
        Err(CoreError::Storage(_))
    ));
}

#[test]
fn question_source_reports_missing_and_invalid_files() {
    let dir = tempdir().expect("tempdir");
    let missing = FileQuestionSource::new(dir.path().join("none.json"));
    assert!(matches!(missing.fetch(), Err(CoreError::Io(_))));

    let empty = dir.path().join("empty.json");
    fs::write(&empty, r#"{"questions":[]}"#).expect("write");
    assert!(matches!(
        FileQuestionSource::new(empty).fetch(),
        Err(CoreError::Domain(DomainError::InvalidQuestionSet(_)))
    ));
}

#[test]
fn import_reader_returns_file_text() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("draft.json");
    fs::write(&path, r#"{"municipality":"高山市"}"#).expect("write");
    assert_eq!(
        read_import_file(&path).expect("read"),
        r#"{"municipality":"高山市"}"#
    );
    assert!(read_import_file(&dir.path().join("missing.json")).is_err());
}
