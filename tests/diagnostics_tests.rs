//! Diagnostics logged when a ping cannot produce a TTL


use log::{Level, LevelFilter, Log, Metadata, Record};
use once_cell::sync::Lazy;
use std::sync::Mutex;
use test_utils::{mock_prober, MockPing, Scripted};

/// Logger that keeps every record so tests can inspect them
struct RecordingLogger {
    records: Mutex<Vec<(Level, String)>>,
}

impl Log for RecordingLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        self.records
            .lock()
            .unwrap()
            .push((record.level(), record.args().to_string()));
    }

    fn flush(&self) {}
}

static LOGGER: Lazy<&'static RecordingLogger> = Lazy::new(|| {
    let logger: &'static RecordingLogger = Box::leak(Box::new(RecordingLogger {
        records: Mutex::new(Vec::new()),
    }));
    log::set_logger(logger).unwrap();
    log::set_max_level(LevelFilter::Trace);
    logger
});

/// Messages logged at `level` that mention `needle`; tests share one logger
/// so each one filters on its own target name
fn logged(level: Level, needle: &str) -> Vec<String> {
    LOGGER
        .records
        .lock()
        .unwrap()
        .iter()
        .filter(|(l, msg)| *l == level && msg.contains(needle))
        .map(|(_, msg)| msg.clone())
        .collect()
}

#[test]
fn test_nonzero_exit_logs_error() {
    Lazy::force(&LOGGER);
    let (prober, _) = mock_prober(MockPing::new().on("10.1.1.1", Scripted::Fail(1, "100% packet loss")));

    assert_eq!(prober.probe("10.1.1.1"), None);

    let errors = logged(Level::Error, "10.1.1.1");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("exit code 1"));
    assert!(errors[0].contains("100% packet loss"));
}

#[test]
fn test_missing_binary_logs_error() {
    Lazy::force(&LOGGER);
    let (prober, _) = mock_prober(MockPing::new().on("10.2.2.2", Scripted::Missing));

    assert_eq!(prober.probe(" 10.2.2.2 "), None);

    let errors = logged(Level::Error, "10.2.2.2");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("10.2.2.2: "));
    assert!(errors[0].contains("Failed to launch ping"));
}

#[test]
fn test_reply_without_ttl_is_not_an_error() {
    Lazy::force(&LOGGER);
    let (prober, _) = mock_prober(
        MockPing::new().on("10.3.3.3", Scripted::Reply("Request timed out.")),
    );

    assert_eq!(prober.probe("10.3.3.3"), None);
    assert!(logged(Level::Error, "10.3.3.3").is_empty());
}
