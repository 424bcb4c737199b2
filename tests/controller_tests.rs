use std::io;
use std::sync::{Arc, Mutex};
use std::thread;

use debug_overlay::host::DisplaySurface;
use debug_overlay::overlay::{
    ConfigurationError, Level, ManualClock, OverlayController, Visibility, VisibilityTransition,
    DROPPED_KEY, NO_CONTEXT,
};
use debug_overlay::OverlayConfig;
use serde_json::json;

fn overlay_with_clock(capacity: usize) -> (OverlayController, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::starting_at(0));
    let config = OverlayConfig {
        capacity,
        ..OverlayConfig::default()
    };
    let overlay = OverlayController::with_clock(&config, clock.clone()).expect("valid config");
    (overlay, clock)
}

#[derive(Default)]
struct RecordingSurface {
    frames: Vec<Vec<String>>,
    transitions: Vec<VisibilityTransition>,
}

impl DisplaySurface for RecordingSurface {
    fn draw(&mut self, lines: &[String]) -> io::Result<()> {
        self.frames.push(lines.to_vec());
        Ok(())
    }

    fn visibility_changed(&mut self, transition: VisibilityTransition) -> io::Result<()> {
        self.transitions.push(transition);
        Ok(())
    }
}

#[test]
fn test_sequences_are_monotonic_from_one() {
    let (mut overlay, _) = overlay_with_clock(10);
    let a = overlay.info("a");
    let b = overlay.capture(Level::Warn, "b", NO_CONTEXT);
    let c = overlay.error("c");
    assert_eq!((a, b, c), (1, 2, 3));

    // clearing does not reuse sequence numbers
    overlay.clear();
    assert_eq!(overlay.debug("d"), 4);
}

#[test]
fn test_timestamps_never_go_backwards() {
    let (mut overlay, clock) = overlay_with_clock(10);
    clock.set(500);
    overlay.info("first");
    clock.set(100);
    overlay.info("clock stepped back");
    clock.set(700);
    overlay.info("later");

    let stamps: Vec<u64> = overlay.snapshot().iter().map(|r| r.timestamp().millis).collect();
    assert_eq!(stamps, vec![500, 500, 700]);
}

#[test]
fn test_capture_is_independent_of_visibility() {
    let (mut overlay, _) = overlay_with_clock(10);
    assert_eq!(overlay.visibility(), Visibility::Hidden);
    overlay.info("while hidden");
    overlay.show();
    overlay.info("while visible");
    assert_eq!(overlay.size(), 2);
}

#[test]
fn test_show_is_idempotent_and_hide_logs_once() {
    let (mut overlay, _) = overlay_with_clock(10);

    assert!(overlay.show().is_some());
    assert!(overlay.show().is_none());
    assert_eq!(overlay.visibility(), Visibility::Visible);

    let hidden = overlay.hide().expect("Visible -> Hidden");
    assert_eq!((hidden.from, hidden.to), (Visibility::Visible, Visibility::Hidden));
    assert!(overlay.hide().is_none());

    let log = overlay.transitions();
    let hides = log.iter().filter(|t| t.to == Visibility::Hidden).count();
    assert_eq!(log.len(), 2);
    assert_eq!(hides, 1);
    assert_eq!(log[1].ordinal, 2);
}

#[test]
fn test_toggle_flips() {
    let (mut overlay, _) = overlay_with_clock(10);
    overlay.toggle();
    assert!(overlay.is_visible());
    overlay.toggle();
    assert!(!overlay.is_visible());
    assert_eq!(overlay.transitions().len(), 2);
}

#[test]
fn test_start_visible_from_config() {
    let config = OverlayConfig {
        start_visible: true,
        ..OverlayConfig::default()
    };
    let overlay = OverlayController::new(&config).unwrap();
    assert_eq!(overlay.visibility(), Visibility::Visible);
    assert!(overlay.transitions().is_empty());
}

#[test]
fn test_invalid_context_leaves_a_marker() {
    let (mut overlay, _) = overlay_with_clock(10);
    overlay.capture(
        Level::Error,
        "uncaught TypeError",
        [("file", "app.js"), ("", "no key"), ("file", "dup"), ("_dropped", "spoof")],
    );

    let snap = overlay.snapshot();
    let record = snap.last().unwrap();
    assert_eq!(record.context().get("file").map(String::as_str), Some("app.js"));
    assert_eq!(record.context().get(DROPPED_KEY).map(String::as_str), Some("3"));
    assert_eq!(overlay.summary().records_with_dropped_context, 1);
}

#[test]
fn test_capture_json_context() {
    let (mut overlay, _) = overlay_with_clock(10);
    overlay.capture_json(
        Level::Warn,
        "slow frame",
        json!({ "ms": 48, "route": "/home", "trace": [1, 2] }),
    );
    overlay.capture_json(Level::Info, "no context", serde_json::Value::Null);

    let snap = overlay.snapshot();
    let first = snap.first().unwrap();
    assert_eq!(first.context()["ms"], "48");
    assert_eq!(first.context()["route"], "/home");
    assert_eq!(first.context()[DROPPED_KEY], "1");
    assert!(snap.last().unwrap().context().is_empty());
}

#[test]
fn test_render_is_deterministic() {
    let (mut overlay, clock) = overlay_with_clock(10);
    overlay.info("boot");
    clock.advance(1500);
    overlay.capture(Level::Warn, "low memory", [("free", "12MB")]);
    clock.advance(20);
    overlay.error("crash\nstack");

    let lines = overlay.render();
    assert_eq!(
        lines,
        vec![
            "#000001 +0ms INFO  boot".to_string(),
            "#000002 +1500ms WARN  low memory {free=12MB}".to_string(),
            "#000003 +1520ms ERROR crash\\nstack".to_string(),
        ]
    );
    assert_eq!(overlay.render(), lines);
    assert_eq!(overlay.render_at_least(Level::Warn).len(), 2);
}

#[test]
fn test_set_capacity_keeps_newest() {
    let (mut overlay, _) = overlay_with_clock(3);
    overlay.info("x");
    overlay.info("y");
    overlay.info("z");

    overlay.set_capacity(2).unwrap();
    assert_eq!(overlay.snapshot().messages(), vec!["y", "z"]);
    assert_eq!(overlay.capacity(), 2);

    // then FIFO eviction continues at the new size
    overlay.info("w");
    assert_eq!(overlay.snapshot().messages(), vec!["z", "w"]);
}

#[test]
fn test_set_capacity_zero_fails_and_keeps_state() {
    let (mut overlay, _) = overlay_with_clock(3);
    overlay.info("keep");
    assert_eq!(overlay.set_capacity(0), Err(ConfigurationError::ZeroCapacity));
    assert_eq!(overlay.capacity(), 3);
    assert_eq!(overlay.snapshot().messages(), vec!["keep"]);
}

#[test]
fn test_construct_with_zero_capacity_fails() {
    assert!(matches!(
        OverlayController::with_capacity(0),
        Err(ConfigurationError::ZeroCapacity)
    ));
    assert!(OverlayController::with_capacity(1).is_ok());
}

#[test]
fn test_present_only_draws_when_visible() {
    let (mut overlay, _) = overlay_with_clock(10);
    let mut surface = RecordingSurface::default();
    overlay.debug("noise");
    overlay.error("signal");

    overlay.present(&mut surface).unwrap();
    assert!(surface.frames.is_empty());

    overlay.show();
    overlay.set_min_level(Level::Warn);
    overlay.present(&mut surface).unwrap();
    assert_eq!(surface.frames.len(), 1);
    assert_eq!(surface.frames[0].len(), 1);
    assert!(surface.frames[0][0].ends_with("signal"));
    assert!(surface.transitions.is_empty());
}

#[test]
fn test_summary_counts() {
    let (mut overlay, _) = overlay_with_clock(3);
    overlay.debug("a");
    overlay.info("b");
    overlay.warn("c");
    overlay.error("d");

    let summary = overlay.summary();
    assert_eq!(summary.held, 3);
    assert_eq!(summary.evicted, 1);
    assert_eq!(summary.levels.debug, 0);
    assert_eq!(summary.levels.get(Level::Error), 1);
    assert_eq!(summary.first_sequence, Some(2));
    assert_eq!(summary.last_sequence, Some(4));
}

#[test]
fn test_export_json_lines() {
    let (mut overlay, _) = overlay_with_clock(3);
    overlay.capture(Level::Error, "boom", [("line", "7")]);

    let lines = overlay.export_json_lines().unwrap();
    assert_eq!(lines.len(), 1);
    let doc: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
    assert_eq!(doc["session"], json!(overlay.session_id().to_string()));
    assert_eq!(doc["sequence"], json!(1));
    assert_eq!(doc["level"], json!("error"));
    assert_eq!(doc["message"], json!("boom"));
    assert_eq!(doc["context"]["line"], json!("7"));
    assert_eq!(doc["timestamp"]["millis"], json!(0));
}

#[test]
fn test_shared_across_threads_behind_a_mutex() {
    let overlay = Arc::new(Mutex::new(OverlayController::with_capacity(64).unwrap()));

    let workers: Vec<_> = (0..4)
        .map(|worker| {
            let overlay = Arc::clone(&overlay);
            thread::spawn(move || {
                for i in 0..10 {
                    overlay
                        .lock()
                        .unwrap()
                        .capture(Level::Info, format!("worker {worker} event {i}"), NO_CONTEXT);
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    let overlay = overlay.lock().unwrap();
    assert_eq!(overlay.size(), 40);
    let seqs: Vec<u64> = overlay.snapshot().iter().map(|r| r.sequence()).collect();
    assert_eq!(seqs, (1..=40).collect::<Vec<u64>>());
}

#[test]
fn test_shrinking_counts_as_eviction() {
    let (mut overlay, _) = overlay_with_clock(5);
    for m in ["a", "b", "c", "d", "e", "f"] {
        overlay.info(m);
    }
    assert_eq!(overlay.summary().evicted, 1);

    overlay.set_capacity(2).unwrap();
    let summary = overlay.summary();
    assert_eq!(summary.held, 2);
    assert_eq!(summary.evicted, 4);
}
