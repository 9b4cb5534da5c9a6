use opex_client::RefreshEvent;

use super::*;

#[test]
fn write_snapshot_test() {
    let dir = tempfile::tempdir().unwrap();
    let writer = SnapshotWriter::new(&dir.path().join("out")).unwrap();
    let mut state = DashboardState::default();
    state.apply(RefreshEvent::CycleStarted(3));

    writer.write(&state).unwrap();

    let json = serde_json::from_str::<serde_json::Value>(&std::fs::read_to_string(writer.path()).unwrap()).unwrap();
    assert_eq!(3, json["generation"]);
    assert!(!writer.path().with_extension("json.tmp").exists());
}
