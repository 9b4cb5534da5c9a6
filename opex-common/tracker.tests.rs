use super::*;

#[test]
fn changed_test() {
    let mut tracker = StateChangeTracker::new(Some("cpu"));

    assert_eq!(None, tracker.changed("cpu"));
    assert_eq!(Some(&"memory"), tracker.changed("memory"));
    assert_eq!(None, tracker.changed("memory"));
    assert_eq!(Some(&"memory"), tracker.current());
}
