//! Tracker runtime on a paused tokio clock

use cursometer::{CommandOutput, ElementId, Invocation, Point, TrackerError, TrackerOptions, TrackerRuntime};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

const ELEMENT: ElementId = ElementId(1);

fn recording_options(poll_interval_ms: u64) -> (TrackerOptions, Arc<Mutex<Vec<f64>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let options = TrackerOptions::new()
        .with_poll_interval_ms(poll_interval_ms)
        .on_speed_update(move |_, speed| sink.lock().push(speed));
    (options, seen)
}

#[tokio::test(start_paused = true)]
async fn test_runtime_reports_speed() {
    let runtime = TrackerRuntime::spawn();
    let handle = runtime.handle();
    let (options, seen) = recording_options(20);

    let elements = handle.init(vec![ELEMENT], options).await.unwrap();
    assert_eq!(elements, vec![ELEMENT]);

    assert!(handle.pointer_move(ELEMENT, Point::new(0.0, 0.0)).await.unwrap().is_some());
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(handle.pointer_move(ELEMENT, Point::new(100.0, 0.0)).await.unwrap().is_some());
    handle.pointer_enter(ELEMENT).await.unwrap();

    let speed = handle.current_speed(ELEMENT).await.unwrap();
    assert!((speed - 5.0).abs() < 1e-6, "speed {} should be 5.0", speed);
    assert_eq!(seen.lock().len(), 1);

    runtime.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_runtime_poll_cadence() {
    let runtime = TrackerRuntime::spawn();
    let handle = runtime.handle();
    let (options, seen) = recording_options(10);
    handle.init(vec![ELEMENT], options).await.unwrap();

    handle.pointer_enter(ELEMENT).await.unwrap();
    tokio::time::sleep(Duration::from_millis(45)).await;

    assert_eq!(seen.lock().len(), 5);
    runtime.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_runtime_leave_stops_polling() {
    let runtime = TrackerRuntime::spawn();
    let handle = runtime.handle();
    let (options, seen) = recording_options(10);
    handle.init(vec![ELEMENT], options).await.unwrap();

    handle.pointer_enter(ELEMENT).await.unwrap();
    tokio::time::sleep(Duration::from_millis(25)).await;
    handle.pointer_leave(ELEMENT).await.unwrap();
    let published = seen.lock().len();

    tokio::time::sleep(Duration::from_millis(100)).await;

    assert_eq!(seen.lock().len(), published);
    assert_eq!(handle.current_speed(ELEMENT).await.unwrap(), 0.0);
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_runtime_dispatch_errors() {
    let runtime = TrackerRuntime::spawn();
    let handle = runtime.handle();

    let err = handle
        .dispatch(vec![ELEMENT], Invocation::method("getCurrentSpeed"))
        .await
        .unwrap_err();
    assert!(matches!(err, TrackerError::NotInitialized(ELEMENT)));

    let err = handle
        .dispatch(vec![ELEMENT], Invocation::method("bogus"))
        .await
        .unwrap_err();
    assert!(matches!(err, TrackerError::UnknownMethod(name) if name == "bogus"));

    let output = handle.dispatch(vec![ELEMENT], Invocation::Default).await.unwrap();
    assert_eq!(output, CommandOutput::Elements(vec![ELEMENT]));

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_requests_after_shutdown_fail() {
    let runtime = TrackerRuntime::spawn();
    let handle = runtime.handle();
    runtime.shutdown().await.unwrap();

    let err = handle.current_speed(ELEMENT).await.unwrap_err();
    assert!(matches!(err, TrackerError::RuntimeClosed));
    assert!(handle.is_closed());
}
