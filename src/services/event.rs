//! Event service
//!
//! Runs the event save pipeline: field checks, upload checks, file storage,
//! derivations, then one transactional write of the event and its timeline
//! entry.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use super::derive::prepare_event;
use crate::database::repositories::EventRepository;
use crate::models::event::{Event, SaveEventRequest};
use crate::storage::uploads::{BTS_IMAGE, BTS_VIDEO, EVENT_IMAGE};
use crate::storage::{store_upload, MediaStore, Upload, UploadRule};
use crate::utils::errors::{CmsError, Result};
use crate::utils::logging::{log_record_action, log_validation_failure};

/// Files submitted along with an event
#[derive(Debug, Clone, Default)]
pub struct EventUploads {
    pub event_image: Option<Upload>,
    pub bts_image: Option<Upload>,
    pub bts_video: Option<Upload>,
}

impl EventUploads {
    fn with_rules(&self) -> Vec<(&'static UploadRule, &Upload)> {
        [
            (&EVENT_IMAGE, self.event_image.as_ref()),
            (&BTS_IMAGE, self.bts_image.as_ref()),
            (&BTS_VIDEO, self.bts_video.as_ref()),
        ]
        .into_iter()
        .filter_map(|(rule, upload)| upload.map(|u| (rule, u)))
        .collect()
    }
}

#[derive(Clone)]
pub struct EventService {
    events: Arc<dyn EventRepository>,
    media: Arc<dyn MediaStore>,
}

impl EventService {
    pub fn new(events: Arc<dyn EventRepository>, media: Arc<dyn MediaStore>) -> Self {
        Self { events, media }
    }

    /// Validate, derive and persist an event.
    ///
    /// Nothing is stored when a field or upload is rejected. Files stored for
    /// a save that then fails are removed again.
    pub async fn save(&self, mut request: SaveEventRequest, uploads: EventUploads) -> Result<Event> {
        let mut errors = request.validate();
        for (rule, upload) in uploads.with_rules() {
            if let Err(upload_errors) = rule.check(upload) {
                errors.merge(upload_errors);
            }
        }
        if !errors.is_empty() {
            log_validation_failure("Event", &errors);
            return Err(CmsError::Validation(errors));
        }

        let previous = match request.id {
            Some(id) => Some(
                self.events
                    .find_by_id(id)
                    .await?
                    .ok_or_else(|| CmsError::not_found("Event", id.to_string()))?,
            ),
            None => None,
        };

        let mut stored = Vec::new();
        for (rule, upload) in uploads.with_rules() {
            match store_upload(self.media.as_ref(), rule, upload).await {
                Ok(path) => {
                    match rule.field {
                        "event_image" => request.event_image = Some(path.clone()),
                        "bts_image" => request.bts_image = Some(path.clone()),
                        _ => request.bts_video = Some(path.clone()),
                    }
                    stored.push(path);
                }
                Err(e) => {
                    self.discard(&stored).await;
                    return Err(e);
                }
            }
        }

        let (request, timeline) = prepare_event(request, Utc::now());
        let action = if request.id.is_some() { "update" } else { "create" };
        debug!(
            identifier = %request.identifier,
            timeline = timeline.is_some(),
            "Saving event"
        );

        match self.events.save(request, timeline).await {
            Ok(event) => {
                if let Some(previous) = previous {
                    self.discard(&replaced_files(&previous, &event)).await;
                }
                log_record_action("Event", &event.identifier, action, None);
                Ok(event)
            }
            Err(e) => {
                self.discard(&stored).await;
                Err(e)
            }
        }
    }

    pub async fn get(&self, identifier: &str) -> Result<Event> {
        self.events
            .find_by_identifier(identifier)
            .await?
            .ok_or_else(|| CmsError::not_found("Event", identifier))
    }

    pub async fn list(&self) -> Result<Vec<Event>> {
        self.events.list().await
    }

    async fn discard(&self, paths: &[String]) {
        for path in paths {
            if let Err(e) = self.media.delete(path).await {
                warn!(path = %path, error = %e, "Failed to remove orphaned upload");
            }
        }
    }
}

/// Files the previous version of an event linked that the saved one no longer does
fn replaced_files(previous: &Event, saved: &Event) -> Vec<String> {
    [
        (&previous.event_image, &saved.event_image),
        (&previous.bts_image, &saved.bts_image),
        (&previous.bts_video, &saved.bts_video),
    ]
    .into_iter()
    .filter_map(|(old, new)| match old {
        Some(old) if new.as_ref() != Some(old) => Some(old.clone()),
        _ => None,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::repositories::TimelineRepository;
    use crate::database::MemoryStore;
    use crate::models::event::{EventStatus, EventType};
    use crate::storage::LocalMediaStore;

    struct Fixture {
        store: Arc<MemoryStore>,
        service: EventService,
        _media_dir: tempfile::TempDir,
        media_root: std::path::PathBuf,
    }

    fn fixture() -> Fixture {
        let media_dir = tempfile::tempdir().unwrap();
        let media_root = media_dir.path().to_path_buf();
        let store = Arc::new(MemoryStore::new());
        let media = Arc::new(LocalMediaStore::new(&media_root, "/media/"));
        Fixture {
            service: EventService::new(store.clone(), media),
            store,
            _media_dir: media_dir,
            media_root,
        }
    }

    fn request() -> SaveEventRequest {
        SaveEventRequest::new("hacktober", "Hacktoberfest", EventType::Workshop, EventStatus::Final)
    }

    #[tokio::test]
    async fn test_repeated_saves_create_one_timeline_entry() {
        let f = fixture();
        let mut request = request();
        request.add_to_timeline = true;

        let event = f.service.save(request, EventUploads::default()).await.unwrap();
        for _ in 0..3 {
            f.service
                .save(event.to_request(), EventUploads::default())
                .await
                .unwrap();
        }

        let entries = f.store.list_recent_first().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].event_name, "Hacktoberfest");
    }

    #[tokio::test]
    async fn test_bts_timestamp_survives_later_saves() {
        let f = fixture();
        let mut request = request();
        request.bts_description = Some("Crew at work".to_string());

        let first = f.service.save(request, EventUploads::default()).await.unwrap();
        let stamp = first.bts_uploaded_at.unwrap();

        let mut update = first.to_request();
        update.bts_uploaded_at = None;
        update.bts_description = Some("Crew at work, day two".to_string());
        let second = f.service.save(update, EventUploads::default()).await.unwrap();
        assert_eq!(second.bts_uploaded_at, Some(stamp));
    }

    #[tokio::test]
    async fn test_oversized_image_stores_nothing() {
        let f = fixture();
        let uploads = EventUploads {
            event_image: Some(Upload::new("poster.png", vec![0u8; 2 * 1024 * 1024])),
            bts_video: Some(Upload::new("movie.mp4", vec![0u8; 1024])),
            ..EventUploads::default()
        };

        let err = f.service.save(request(), uploads).await.unwrap_err();
        match err {
            CmsError::Validation(errors) => assert!(errors.get("event_image").is_some()),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(f.store.tables().await.events.is_empty());
        assert!(!f.media_root.join("event_bts_videos").exists());
    }

    #[tokio::test]
    async fn test_uploads_are_stored_and_linked() {
        let f = fixture();
        let uploads = EventUploads {
            event_image: Some(Upload::new("poster.png", vec![0u8; 900 * 1024])),
            ..EventUploads::default()
        };

        let event = f.service.save(request(), uploads).await.unwrap();
        let path = event.event_image.unwrap();
        assert!(path.starts_with("event_images/"));
        assert!(f.media_root.join(&path).exists());
    }

    #[tokio::test]
    async fn test_replacing_uploads_removes_previous_files() {
        let f = fixture();
        let uploads = EventUploads {
            event_image: Some(Upload::new("a.png", vec![0u8; 16])),
            bts_image: Some(Upload::new("crew.png", vec![0u8; 16])),
            ..EventUploads::default()
        };
        let first = f.service.save(request(), uploads).await.unwrap();
        let old_image = first.event_image.clone().unwrap();
        let bts_image = first.bts_image.clone().unwrap();

        let uploads = EventUploads {
            event_image: Some(Upload::new("b.png", vec![1u8; 16])),
            ..EventUploads::default()
        };
        let second = f.service.save(first.to_request(), uploads).await.unwrap();
        let new_image = second.event_image.unwrap();

        assert_ne!(new_image, old_image);
        assert!(!f.media_root.join(&old_image).exists());
        assert!(f.media_root.join(&new_image).exists());
        // untouched uploads stay
        assert_eq!(second.bts_image.as_deref(), Some(bts_image.as_str()));
        assert!(f.media_root.join(&bts_image).exists());
    }

    #[tokio::test]
    async fn test_failed_write_removes_stored_files() {
        let f = fixture();
        f.service.save(request(), EventUploads::default()).await.unwrap();

        let uploads = EventUploads {
            event_image: Some(Upload::new("poster.png", vec![1u8; 10])),
            ..EventUploads::default()
        };
        // same identifier as the first event
        let err = f.service.save(request(), uploads).await.unwrap_err();
        assert!(matches!(err, CmsError::Validation(_)));

        let leftovers = std::fs::read_dir(f.media_root.join("event_images"))
            .map(|dir| dir.count())
            .unwrap_or(0);
        assert_eq!(leftovers, 0);
    }

    #[tokio::test]
    async fn test_get_missing_event() {
        let f = fixture();
        assert!(matches!(
            f.service.get("nope").await,
            Err(CmsError::NotFound { entity: "Event", .. })
        ));
    }
}
