//! Pointer trace replay
//!
//! Feeds a recorded enter/move/leave trace through a manually clocked
//! tracker and collects every speed the poller published.

use crate::capture::types::{ElementId, Point};
use crate::error::{TrackerError, TrackerResult};
use crate::host::Clock;
use crate::tracker::config::TrackerOptions;
use crate::tracker::Cursometer;
use parking_lot::Mutex as ParkingMutex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Element id used for the single element a trace describes
pub const REPLAY_ELEMENT: ElementId = ElementId(0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerEventKind {
    Enter,
    Leave,
    Move,
}

/// One recorded host notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointerEvent {
    pub time_ms: f64,
    pub kind: PointerEventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

impl PointerEvent {
    pub fn new(time_ms: f64, kind: PointerEventKind) -> Self {
        Self {
            time_ms,
            kind,
            x: None,
            y: None,
        }
    }

    pub fn at(time_ms: f64, x: f64, y: f64) -> Self {
        Self {
            time_ms,
            kind: PointerEventKind::Move,
            x: Some(x),
            y: Some(y),
        }
    }

    /// Position carried by the event, if both coordinates were recorded
    pub fn point(&self) -> Option<Point> {
        Some(Point::new(self.x?, self.y?))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointerTrace {
    #[serde(default)]
    pub options: TrackerOptions,
    pub events: Vec<PointerEvent>,
}

/// A speed published by the poller during replay
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeedReport {
    pub time_ms: f64,
    pub speed: f64,
}

pub fn load_trace(path: &Path) -> TrackerResult<PointerTrace> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

pub fn write_reports(path: &Path, reports: &[SpeedReport]) -> TrackerResult<()> {
    let data = serde_json::to_vec_pretty(reports)?;
    std::fs::write(path, data)?;
    Ok(())
}

/// Replay `trace` with `overrides` layered over the trace's own options
///
/// Events are applied in time order. The tracker is initialized at the first
/// event's time, and timers keep firing up to the last event's time. A move
/// event without both coordinates fails the replay before anything runs.
pub fn replay_trace(trace: &PointerTrace, overrides: &TrackerOptions) -> TrackerResult<Vec<SpeedReport>> {
    let mut events = trace.events.clone();
    events.sort_by(|a, b| a.time_ms.total_cmp(&b.time_ms));

    if let Some(event) = events
        .iter()
        .find(|e| e.kind == PointerEventKind::Move && e.point().is_none())
    {
        return Err(TrackerError::MissingCoordinates {
            time_ms: event.time_ms,
        });
    }

    let start_ms = events.first().map(|e| e.time_ms).unwrap_or(0.0);
    let mut cursometer = Cursometer::manual(start_ms);

    let reports = Arc::new(ParkingMutex::new(Vec::new()));
    let sink = reports.clone();
    let clock = cursometer.clock().clone();
    let options = trace
        .options
        .merged_with(overrides)
        .on_speed_update(move |_, speed| {
            sink.lock().push(SpeedReport {
                time_ms: clock.now_ms(),
                speed,
            });
        });

    cursometer.initialize(&[REPLAY_ELEMENT], &options);

    for event in &events {
        cursometer.advance_to(event.time_ms);
        match event.kind {
            PointerEventKind::Enter => cursometer.pointer_enter(REPLAY_ELEMENT)?,
            PointerEventKind::Leave => cursometer.pointer_leave(REPLAY_ELEMENT)?,
            PointerEventKind::Move => {
                if let Some(point) = event.point() {
                    cursometer.pointer_move(REPLAY_ELEMENT, point)?;
                }
            }
        }
    }

    cursometer.teardown(REPLAY_ELEMENT)?;

    let reports = reports.lock().clone();
    tracing::info!(
        "Replayed {} events into {} speed reports",
        events.len(),
        reports.len()
    );
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_trace_parses_from_json() {
        let trace: PointerTrace = serde_json::from_value(json!({
            "options": { "pollIntervalMs": 10 },
            "events": [
                { "timeMs": 0, "kind": "move", "x": 1, "y": 2 },
                { "timeMs": 5, "kind": "enter" }
            ]
        }))
        .unwrap();

        assert_eq!(trace.options.poll_interval_ms, Some(10));
        assert_eq!(trace.events[0], PointerEvent::at(0.0, 1.0, 2.0));
        assert_eq!(trace.events[1], PointerEvent::new(5.0, PointerEventKind::Enter));
    }

    #[test]
    fn test_replay_reports_speed() {
        let trace = PointerTrace {
            options: TrackerOptions::new().with_poll_interval_ms(10),
            events: vec![
                PointerEvent::at(0.0, 0.0, 0.0),
                PointerEvent::at(20.0, 100.0, 0.0),
                PointerEvent::new(20.0, PointerEventKind::Enter),
                PointerEvent::new(30.0, PointerEventKind::Leave),
            ],
        };

        let reports = replay_trace(&trace, &TrackerOptions::new()).unwrap();

        assert_eq!(
            reports,
            vec![
                SpeedReport { time_ms: 20.0, speed: 5.0 },
                SpeedReport { time_ms: 30.0, speed: 5.0 },
            ]
        );
    }

    #[test]
    fn test_overrides_win_over_trace_options() {
        let trace = PointerTrace {
            options: TrackerOptions::new().with_poll_interval_ms(50),
            events: vec![
                PointerEvent::new(0.0, PointerEventKind::Enter),
                PointerEvent::new(40.0, PointerEventKind::Leave),
            ],
        };

        let reports = replay_trace(&trace, &TrackerOptions::new().with_poll_interval_ms(10)).unwrap();
        assert_eq!(reports.len(), 5);
    }

    #[test]
    fn test_move_without_coordinates_is_rejected() {
        let trace = PointerTrace {
            options: TrackerOptions::new(),
            events: vec![
                PointerEvent::new(0.0, PointerEventKind::Enter),
                PointerEvent {
                    x: Some(4.0),
                    ..PointerEvent::new(10.0, PointerEventKind::Move)
                },
            ],
        };

        let err = replay_trace(&trace, &TrackerOptions::new()).unwrap_err();
        assert!(matches!(err, TrackerError::MissingCoordinates { time_ms } if time_ms == 10.0));
    }
}
