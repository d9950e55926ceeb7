// tests/reload_channel.rs

mod common;

use std::collections::BTreeSet;
use std::io;
use std::sync::{Arc, Mutex};

use common::init_tracing;

use stagehand::reload::{client_script, ClientRegistry, ReloadKind, ReloadMessage, ReloadSink};
use stagehand::types::AssetClass;

/// Records every payload it is asked to deliver; optionally fails to
/// simulate a dropped connection.
struct RecordingSink {
    sent: Arc<Mutex<Vec<String>>>,
    broken: bool,
}

impl RecordingSink {
    fn new() -> (Self, Arc<Mutex<Vec<String>>>) {
        let sent = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                sent: Arc::clone(&sent),
                broken: false,
            },
            sent,
        )
    }

    fn broken() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            broken: true,
        }
    }
}

impl ReloadSink for RecordingSink {
    fn send_text(&mut self, payload: &str) -> io::Result<()> {
        if self.broken {
            return Err(io::Error::from(io::ErrorKind::BrokenPipe));
        }
        self.sent.lock().unwrap().push(payload.to_string());
        Ok(())
    }
}

#[test]
fn notify_broadcasts_to_every_session() {
    init_tracing();

    let registry = ClientRegistry::new();
    let (sink_a, sent_a) = RecordingSink::new();
    let (sink_b, sent_b) = RecordingSink::new();
    registry.register(Box::new(sink_a));
    registry.register(Box::new(sink_b));
    assert_eq!(registry.session_count(), 2);

    registry.notify(&ReloadMessage::style_swap(vec!["css/app.css".to_string()]));

    assert_eq!(sent_a.lock().unwrap().len(), 1);
    assert_eq!(sent_b.lock().unwrap().len(), 1);
}

#[test]
fn disconnected_sessions_are_dropped_without_failing_the_notify() {
    init_tracing();

    let registry = ClientRegistry::new();
    let (healthy, sent) = RecordingSink::new();
    registry.register(Box::new(RecordingSink::broken()));
    registry.register(Box::new(healthy));
    assert_eq!(registry.session_count(), 2);

    registry.notify(&ReloadMessage::full_reload(vec!["index.html".to_string()]));

    assert_eq!(registry.session_count(), 1, "the broken session is gone");
    assert_eq!(sent.lock().unwrap().len(), 1, "the healthy one was served");

    // The dropped session stays gone on the next notify.
    registry.notify(&ReloadMessage::full_reload(vec![]));
    assert_eq!(sent.lock().unwrap().len(), 2);
}

#[test]
fn notify_with_no_sessions_is_a_noop() {
    init_tracing();

    let registry = ClientRegistry::new();
    registry.notify(&ReloadMessage::full_reload(vec![]));
    assert_eq!(registry.session_count(), 0);
}

#[test]
fn wire_format_is_kebab_case_json() {
    init_tracing();

    let message = ReloadMessage::style_swap(vec!["css/app.css".to_string()]);
    let payload = serde_json::to_string(&message).unwrap();
    assert_eq!(payload, r#"{"kind":"style-swap","paths":["css/app.css"]}"#);

    let message = ReloadMessage::full_reload(vec!["index.html".to_string()]);
    let payload = serde_json::to_string(&message).unwrap();
    assert_eq!(payload, r#"{"kind":"full-reload","paths":["index.html"]}"#);
}

#[test]
fn style_only_changes_swap_and_everything_else_reloads() {
    init_tracing();

    let style_only = BTreeSet::from([AssetClass::Style]);
    assert_eq!(
        ReloadMessage::for_change(&style_only, vec![]).kind,
        ReloadKind::StyleSwap
    );

    let mixed = BTreeSet::from([AssetClass::Style, AssetClass::Template]);
    assert_eq!(
        ReloadMessage::for_change(&mixed, vec![]).kind,
        ReloadKind::FullReload
    );

    for class in [AssetClass::Static, AssetClass::Template, AssetClass::Script] {
        let classes = BTreeSet::from([class]);
        assert_eq!(
            ReloadMessage::for_change(&classes, vec![]).kind,
            ReloadKind::FullReload
        );
    }

    assert_eq!(
        ReloadMessage::for_change(&BTreeSet::new(), vec![]).kind,
        ReloadKind::FullReload
    );
}

#[test]
fn client_script_targets_the_reserved_port() {
    init_tracing();

    let script = client_script(35729);
    assert!(script.contains("ws://127.0.0.1:35729/"));
    assert!(script.contains("style-swap"));
    assert!(script.contains("location.reload()"));
}
