//! SSE stream construction with Last-Event-Id replay (spec 4.I, 6.2)

use std::convert::Infallible;
use std::sync::Arc;

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;

use crate::state::RunRecord;

/// Build an SSE response for a run, replaying persisted events after
/// `last_event_id` before switching to the live feed. `id = -1` (or no
/// header) means replay everything from the start.
pub fn run_event_stream(
    record: Arc<RunRecord>,
    last_event_id: Option<u64>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = async_stream::stream! {
        // Subscribe before snapshotting so nothing published in between is lost.
        let mut live = record.events.subscribe();
        let snapshot = record.events.snapshot_since(last_event_id);
        let mut max_replayed = last_event_id;

        for evt in snapshot {
            max_replayed = Some(evt.id);
            yield Ok(to_sse_event(&evt));
        }

        if record.status().is_terminal() {
            return;
        }

        loop {
            match live.recv().await {
                Ok(evt) => {
                    if let Some(max) = max_replayed {
                        if evt.id <= max {
                            continue;
                        }
                    }
                    max_replayed = Some(evt.id);
                    let is_end = evt.event_name == "end" || evt.event_name == "error";
                    yield Ok(to_sse_event(&evt));
                    if is_end {
                        break;
                    }
                }
                Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => {
                    // Fell behind the live channel; re-sync from the persisted log.
                    let rest = record.events.snapshot_since(max_replayed);
                    for evt in rest {
                        max_replayed = Some(evt.id);
                        yield Ok(to_sse_event(&evt));
                    }
                    if record.status().is_terminal() {
                        break;
                    }
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}

fn to_sse_event(evt: &crate::state::PersistedEvent) -> Event {
    Event::default()
        .id(evt.id.to_string())
        .event(evt.event_name.clone())
        .json_data(&evt.data)
        .unwrap_or_else(|_| Event::default().id(evt.id.to_string()).event(evt.event_name.clone()))
}

/// Parse the `Last-Event-Id` header. `"-1"` (the spec's "from the beginning"
/// sentinel) and anything unparseable are treated as "no last id".
pub fn parse_last_event_id(header: Option<&str>) -> Option<u64> {
    header.and_then(|v| v.parse::<i64>().ok()).and_then(|v| if v < 0 { None } else { Some(v as u64) })
}
