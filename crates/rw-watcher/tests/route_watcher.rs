//! Route watcher behaviour against a real file system.

use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use rw_core::{RouteDescriptor, WatchConfig};
use rw_scanner::RouteScanner;
use rw_watcher::{RouteWatcher, WatchError};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

const SETTLE: Duration = Duration::from_millis(300);
const EVENT_TIMEOUT: Duration = Duration::from_secs(5);
/// Several debounce windows; long enough for a duplicate callback to show up.
const QUIET: Duration = Duration::from_millis(500);

fn fixture(files: &[&str]) -> (tempfile::TempDir, Utf8PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
    for file in files {
        write(&root, file);
    }
    (dir, root)
}

fn write(root: &Utf8Path, file: &str) {
    let path = root.join(file);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, "<h1>page</h1>").unwrap();
}

fn config() -> WatchConfig {
    WatchConfig {
        debounce_ms: 50,
        recursive: true,
    }
}

fn paths(routes: &[RouteDescriptor]) -> Vec<String> {
    let mut paths: Vec<_> = routes.iter().map(|r| r.path.to_string()).collect();
    paths.sort();
    paths
}

/// Waits for exactly one callback, then checks that no second one follows.
async fn expect_single_change(
    rx: &mut mpsc::UnboundedReceiver<Vec<RouteDescriptor>>,
) -> Vec<String> {
    let routes = tokio::time::timeout(EVENT_TIMEOUT, rx.recv())
        .await
        .expect("no callback before timeout")
        .expect("watcher dropped the callback sender");

    let extra = tokio::time::timeout(QUIET, rx.recv()).await;
    assert!(extra.is_err(), "second callback for one change: {extra:?}");

    paths(&routes)
}

#[tokio::test]
async fn test_add_then_remove_route() {
    let (_dir, root) = fixture(&["index.svelte"]);
    let (tx, mut rx) = mpsc::unbounded_channel();

    let handle = RouteWatcher::new(RouteScanner::new(&root), config()).start(move |routes| {
        let tx = tx.clone();
        async move {
            let _ = tx.send(routes);
        }
    });
    tokio::time::sleep(SETTLE).await;

    write(&root, "about.svelte");
    assert_eq!(expect_single_change(&mut rx).await, ["/", "/about"]);

    std::fs::remove_file(root.join("about.svelte")).unwrap();
    assert_eq!(expect_single_change(&mut rx).await, ["/"]);

    handle.stop().await.unwrap();
}

#[tokio::test]
async fn test_stop_reports_panicking_callback() {
    let (_dir, root) = fixture(&["index.svelte"]);
    let handle = RouteWatcher::new(RouteScanner::new(&root), config())
        .start(|_routes| async { panic!("callback failed") });
    tokio::time::sleep(SETTLE).await;

    write(&root, "about.svelte");
    tokio::time::timeout(EVENT_TIMEOUT, async {
        while handle.is_running() {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .expect("watch task kept running after the callback panicked");

    let err = handle.stop().await.unwrap_err();
    assert!(matches!(err, WatchError::TaskFailed(ref inner) if inner.is_panic()));
}

#[tokio::test]
async fn test_editing_route_does_not_notify() {
    let (_dir, root) = fixture(&["index.svelte", "about.svelte"]);
    let (tx, mut rx) = mpsc::unbounded_channel::<Vec<RouteDescriptor>>();

    let handle = RouteWatcher::new(RouteScanner::new(&root), config()).start(move |routes| {
        let tx = tx.clone();
        async move {
            let _ = tx.send(routes);
        }
    });
    tokio::time::sleep(SETTLE).await;

    std::fs::write(root.join("about.svelte"), "<h1>edited</h1>").unwrap();
    std::fs::write(root.join("notes.txt"), "not a route").unwrap();

    let received = tokio::time::timeout(Duration::from_millis(800), rx.recv()).await;
    assert!(received.is_err(), "unexpected callback: {received:?}");

    handle.stop().await.unwrap();
}

#[tokio::test]
async fn test_run_returns_after_cancel() {
    let (_dir, root) = fixture(&["index.svelte"]);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let mut calls = 0;
    RouteWatcher::new(RouteScanner::new(&root), config())
        .run(
            |_routes| {
                calls += 1;
                async {}
            },
            cancel,
        )
        .await
        .unwrap();
    assert_eq!(calls, 0);
}

#[tokio::test]
async fn test_missing_route_dir() {
    let watcher = RouteWatcher::new(RouteScanner::new(Utf8Path::new("/no/such/routes")), config());
    let err = watcher
        .run(|_routes| async {}, CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, WatchError::PathNotFound(_)));
}

#[tokio::test]
async fn test_handle_stop() {
    let (_dir, root) = fixture(&[]);
    let handle = RouteWatcher::new(RouteScanner::new(&root), config()).start(|_routes| async {});
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(handle.is_running());
    handle.stop().await.unwrap();
}
