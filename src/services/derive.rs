//! Save-time derivations for events
//!
//! Each step is a pure function over the request; [`prepare_event`] runs
//! them in order right before the event is written.

use chrono::{DateTime, Utc};

use crate::models::event::{EventStatus, EventType, SaveEventRequest};
use crate::models::timeline::{NewTimelineEntry, EVENT_NAME_MAX_LENGTH};
use crate::utils::helpers::truncate_chars;

/// Drafts are never shown
pub fn hide_draft(request: &mut SaveEventRequest) {
    if request.status == EventStatus::Draft {
        request.show = false;
    }
}

/// Online events have no venue
pub fn clear_online_venue(request: &mut SaveEventRequest) {
    if request.event_type == EventType::Online {
        request.venue = None;
    }
}

/// Stamp the first time behind-the-scenes content shows up.
///
/// An existing stamp is left alone; the store also keeps the stored value on
/// update.
pub fn stamp_behind_the_scenes(request: &mut SaveEventRequest, now: DateTime<Utc>) {
    if request.bts_uploaded_at.is_none() && request.has_behind_the_scenes() {
        request.bts_uploaded_at = Some(now);
    }
}

/// Timeline entry mirroring the event, if it asked for one
pub fn timeline_entry_for(
    request: &SaveEventRequest,
    now: DateTime<Utc>,
) -> Option<NewTimelineEntry> {
    if !request.add_to_timeline {
        return None;
    }

    let event_time = request.event_timing.unwrap_or(now).date_naive();
    Some(NewTimelineEntry {
        event_name: truncate_chars(&request.title, EVENT_NAME_MAX_LENGTH),
        detail: request.description.clone(),
        event_time,
    })
}

/// Run every derivation and return the request to persist with its timeline entry
pub fn prepare_event(
    mut request: SaveEventRequest,
    now: DateTime<Utc>,
) -> (SaveEventRequest, Option<NewTimelineEntry>) {
    hide_draft(&mut request);
    clear_online_venue(&mut request);
    stamp_behind_the_scenes(&mut request, now);
    let timeline = timeline_entry_for(&request, now);
    (request, timeline)
}
