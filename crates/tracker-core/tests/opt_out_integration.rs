//! Integration tests for the opt-out gate in front of a real tracker.

use std::sync::Arc;
use std::thread;

use serde_json::json;
use tracker_core::{EventTracker, OptOutTracker, RecordingTracker, TrackEvent};

#[test]
fn test_only_events_tracked_while_opted_in_are_recorded() {
    let tracker = OptOutTracker::new(RecordingTracker::new());

    tracker.track(TrackEvent::from_value("before", json!({"n": 1})));
    tracker.opt_out();
    tracker.track(TrackEvent::from_value("during", json!({"n": 2})));
    tracker.opt_in();
    tracker.track(TrackEvent::from_value("after", json!({"n": 3})));

    let names: Vec<_> = tracker.inner().events().into_iter().map(|e| e.name).collect();
    assert_eq!(names, vec!["before", "after"]);
}

#[test]
fn test_opt_out_flag_set_from_another_thread_is_observed() {
    let tracker = Arc::new(OptOutTracker::new(RecordingTracker::new()));

    let remote = Arc::clone(&tracker);
    thread::spawn(move || remote.opt_out())
        .join()
        .expect("settings thread must not panic");

    tracker.track(TrackEvent::from_value("ignored", json!({})));
    assert!(tracker.inner().is_empty());
}
