use super::*;
use std::sync::mpsc;
use std::time::Duration;

#[test]
fn test_spawned_task_runs_to_completion() {
    let runtime = AsyncRuntime::new().unwrap();
    let (tx, rx) = mpsc::channel();
    runtime.spawn(Box::pin(async move {
        tokio::task::yield_now().await;
        let _ = tx.send(42u32);
    }));
    assert_eq!(rx.recv_timeout(Duration::from_secs(5)), Ok(42));
}

#[test]
fn test_tokio_handle_spawns_on_same_runtime() {
    let runtime = AsyncRuntime::new().unwrap();
    let handle = runtime.tokio_handle();
    let (tx, rx) = mpsc::channel();
    handle.spawn(async move {
        let _ = tx.send("done");
    });
    assert_eq!(rx.recv_timeout(Duration::from_secs(5)), Ok("done"));
}
