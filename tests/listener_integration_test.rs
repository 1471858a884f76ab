mod common;

use std::sync::Arc;

use catlog::{LogDispatcher, Severity};
use common::{dispatcher_in, quiet_config, temp_dir};

#[tokio::test]
async fn test_listener_receives_events_in_dispatch_order() {
    let dir = temp_dir();
    let (dispatcher, _console) = dispatcher_in(dir.path(), quiet_config());
    let mut rx = dispatcher.subscribe();

    dispatcher.debug("net", "one").unwrap();
    dispatcher.warning("db", "two").unwrap();
    dispatcher.critical("net", "three").unwrap();

    let first = rx.recv().await.unwrap();
    let second = rx.recv().await.unwrap();
    let third = rx.recv().await.unwrap();

    assert_eq!(first.severity, Severity::Debug);
    assert!(first.line.ends_with("DBG net: one"));
    assert_eq!(second.severity, Severity::Warning);
    assert!(second.line.ends_with("WRN db: two"));
    assert_eq!(third.severity, Severity::Critical);
    assert!(third.line.ends_with("CRI net: three"));
}

#[tokio::test]
async fn test_listener_sees_uncolored_line() {
    let dir = temp_dir();
    let (dispatcher, console) = dispatcher_in(dir.path(), quiet_config());
    let mut rx = dispatcher.subscribe();

    dispatcher.critical("db", "disk full").unwrap();

    let event = rx.recv().await.unwrap();
    assert!(!event.line.contains('\u{1b}'));
    assert!(console.contents().contains('\u{1b}'));
}

#[tokio::test]
async fn test_every_listener_gets_every_event() {
    let dir = temp_dir();
    let (dispatcher, _console) = dispatcher_in(dir.path(), quiet_config());
    let mut first = dispatcher.subscribe();
    let mut second = dispatcher.subscribe();

    dispatcher.info("net", "shared").unwrap();

    assert_eq!(first.recv().await.unwrap().line, second.recv().await.unwrap().line);
}

#[tokio::test]
async fn test_no_events_while_disabled() {
    let dir = temp_dir();
    let (dispatcher, _console) = dispatcher_in(dir.path(), quiet_config());
    let mut rx = dispatcher.subscribe();

    dispatcher.set_use_logs(false);
    dispatcher.info("net", "hidden").unwrap();
    dispatcher.set_use_logs(true);
    dispatcher.info("net", "visible").unwrap();

    assert!(rx.recv().await.unwrap().line.ends_with("INF net: visible"));
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_dropped_listener_does_not_affect_others() {
    let dir = temp_dir();
    let (dispatcher, _console) = dispatcher_in(dir.path(), quiet_config());
    let gone = dispatcher.subscribe();
    let mut kept = dispatcher.subscribe();
    drop(gone);

    dispatcher.info("net", "still delivered").unwrap();

    assert!(kept.recv().await.unwrap().line.ends_with("still delivered"));
}

#[tokio::test]
async fn test_listener_fed_from_worker_threads() {
    let dir = temp_dir();
    let (dispatcher, _console) = dispatcher_in(dir.path(), quiet_config());
    let dispatcher: Arc<LogDispatcher> = Arc::new(dispatcher);
    let mut rx = dispatcher.subscribe();

    let workers: Vec<_> = (0..4)
        .map(|w| {
            let dispatcher = Arc::clone(&dispatcher);
            tokio::task::spawn_blocking(move || {
                for i in 0..25 {
                    dispatcher.info("jobs", &format!("worker {w} item {i}")).unwrap();
                }
            })
        })
        .collect();
    for worker in workers {
        worker.await.unwrap();
    }

    let mut received = 0;
    while let Ok(event) = rx.try_recv() {
        assert!(event.line.contains("INF jobs: worker"));
        received += 1;
    }
    assert_eq!(received, 100);
}
