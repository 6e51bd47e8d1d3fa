//! In-memory record store
//!
//! Implements every repository trait over plain vectors behind one lock, so
//! each multi-record write is atomic the same way a database transaction
//! is. Uniqueness rules and conflict handling follow the SQL schema. Used by
//! tests and by local runs without a database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, MutexGuard};

use super::repositories::content::group_linit_images;
use super::repositories::{
    event, profile, project, token, AlumniRepository, ContentRepository, EventRepository,
    ProfileRepository, ProjectRepository, TimelineRepository, TokenRepository, UserRepository,
};
use crate::models::content::{
    About, Activity, CarouselImage, Contact, Ctf, DevPost, Facad, Linit, LinitEdition, LinitImage,
    NewContact, SiteConfig, Sponsor, TechBytes,
};
use crate::models::event::{Event, SaveEventRequest};
use crate::models::member::{Alumni, MemberDetails, Profile};
use crate::models::project::{Project, SaveProjectRequest};
use crate::models::timeline::{NewTimelineEntry, Timeline};
use crate::models::token::SpecialToken;
use crate::models::user::User;
use crate::utils::errors::{CmsError, Result, ValidationErrors};

/// Every table, in insertion order
#[derive(Debug, Default)]
pub struct Tables {
    last_id: i64,
    pub users: Vec<User>,
    pub events: Vec<Event>,
    pub timeline: Vec<Timeline>,
    pub profiles: Vec<Profile>,
    pub alumni: Vec<Alumni>,
    pub tokens: Vec<SpecialToken>,
    pub projects: Vec<Project>,
    pub carousel_images: Vec<CarouselImage>,
    pub abouts: Vec<About>,
    pub activities: Vec<Activity>,
    pub linits: Vec<Linit>,
    pub linit_images: Vec<LinitImage>,
    pub techbytes: Vec<TechBytes>,
    pub devposts: Vec<DevPost>,
    pub site_configs: Vec<SiteConfig>,
    pub sponsors: Vec<Sponsor>,
    pub ctfs: Vec<Ctf>,
    pub facads: Vec<Facad>,
    pub contacts: Vec<Contact>,
}

impl Tables {
    /// Next id; shared across tables, strictly increasing
    pub fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn insert_timeline(&mut self, entry: NewTimelineEntry) -> Option<Timeline> {
        if self.timeline.iter().any(|t| t.event_name == entry.event_name) {
            return None;
        }
        let row = Timeline {
            id: self.next_id(),
            event_name: entry.event_name,
            detail: entry.detail,
            event_time: entry.event_time,
        };
        self.timeline.push(row.clone());
        Some(row)
    }

    fn insert_alumni(&mut self, details: MemberDetails) -> Alumni {
        let alumni = Alumni::from_details(self.next_id(), details);
        self.alumni.push(alumni.clone());
        alumni
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Direct access for seeding and inspecting rows
    pub async fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().await
    }

    /// Provision an account, as the hosting platform would
    pub async fn add_user(&self, username: &str, is_staff: bool) -> User {
        let mut tables = self.tables.lock().await;
        let user = User {
            id: tables.next_id(),
            username: username.to_string(),
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            is_staff,
            date_joined: Utc::now(),
        };
        tables.users.push(user.clone());
        user
    }
}

fn duplicate(field: &str, message: &str) -> CmsError {
    CmsError::Validation(ValidationErrors::single(field, message))
}

fn event_from_request(id: i64, request: SaveEventRequest, pub_date: DateTime<Utc>) -> Event {
    Event {
        id,
        identifier: request.identifier,
        title: request.title,
        event_image: request.event_image,
        description: request.description,
        event_type: request.event_type,
        venue: request.venue,
        url: request.url,
        event_timing: request.event_timing,
        facebook_link: request.facebook_link,
        pub_date,
        pub_by: request.pub_by,
        edited_by: request.edited_by,
        status: request.status,
        show: request.show,
        add_to_timeline: request.add_to_timeline,
        featured: request.featured,
        upcoming: request.upcoming,
        bts_description: request.bts_description,
        bts_image: request.bts_image,
        bts_video: request.bts_video,
        bts_uploaded_at: request.bts_uploaded_at,
    }
}

#[async_trait]
impl EventRepository for MemoryStore {
    async fn save(
        &self,
        request: SaveEventRequest,
        timeline: Option<NewTimelineEntry>,
    ) -> Result<Event> {
        let mut tables = self.tables.lock().await;

        let taken = tables
            .events
            .iter()
            .any(|e| e.identifier == request.identifier && Some(e.id) != request.id);
        if taken {
            return Err(duplicate("identifier", event::DUPLICATE_IDENTIFIER));
        }

        let now = Utc::now();
        let event = match request.id {
            None => {
                let id = tables.next_id();
                let event = event_from_request(id, request, now);
                tables.events.push(event.clone());
                event
            }
            Some(id) => {
                let slot = tables
                    .events
                    .iter_mut()
                    .find(|e| e.id == id)
                    .ok_or_else(|| CmsError::not_found("Event", id.to_string()))?;
                let stamped = slot.bts_uploaded_at;
                let mut event = event_from_request(id, request, now);
                event.bts_uploaded_at = stamped.or(event.bts_uploaded_at);
                *slot = event.clone();
                event
            }
        };

        if let Some(entry) = timeline {
            tables.insert_timeline(entry);
        }

        Ok(event)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Event>> {
        let tables = self.tables.lock().await;
        Ok(tables.events.iter().find(|e| e.id == id).cloned())
    }

    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<Event>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .events
            .iter()
            .find(|e| e.identifier == identifier)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Event>> {
        Ok(self.tables.lock().await.events.clone())
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.tables.lock().await.events.len() as i64)
    }
}

#[async_trait]
impl TimelineRepository for MemoryStore {
    async fn create(&self, entry: NewTimelineEntry) -> Result<Option<Timeline>> {
        Ok(self.tables.lock().await.insert_timeline(entry))
    }

    async fn list_recent_first(&self) -> Result<Vec<Timeline>> {
        let mut entries = self.tables.lock().await.timeline.clone();
        entries.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(entries)
    }
}

#[async_trait]
impl ProfileRepository for MemoryStore {
    async fn create(&self, user_id: i64, details: MemberDetails) -> Result<Profile> {
        let mut tables = self.tables.lock().await;
        if tables.profiles.iter().any(|p| p.user_id == user_id) {
            return Err(duplicate("user", profile::DUPLICATE_PROFILE));
        }
        if !tables.users.iter().any(|u| u.id == user_id) {
            return Err(CmsError::not_found("User", user_id.to_string()));
        }

        let profile = Profile::from_details(tables.next_id(), user_id, details, false);
        tables.profiles.push(profile.clone());
        Ok(profile)
    }

    async fn update(
        &self,
        id: i64,
        details: MemberDetails,
        convert_to_alumni: bool,
    ) -> Result<Profile> {
        let mut tables = self.tables.lock().await;
        let slot = tables
            .profiles
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| CmsError::not_found("Profile", id.to_string()))?;

        *slot = Profile::from_details(id, slot.user_id, details, convert_to_alumni);
        Ok(slot.clone())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Profile>> {
        let tables = self.tables.lock().await;
        Ok(tables.profiles.iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_user(&self, user_id: i64) -> Result<Option<Profile>> {
        let tables = self.tables.lock().await;
        Ok(tables.profiles.iter().find(|p| p.user_id == user_id).cloned())
    }

    async fn list(&self) -> Result<Vec<Profile>> {
        Ok(self.tables.lock().await.profiles.clone())
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.tables.lock().await.profiles.len() as i64)
    }

    async fn migrate_to_alumni(&self, profile_id: i64, details: MemberDetails) -> Result<Alumni> {
        let mut tables = self.tables.lock().await;
        let position = tables
            .profiles
            .iter()
            .position(|p| p.id == profile_id)
            .ok_or_else(|| CmsError::not_found("Profile", profile_id.to_string()))?;

        let alumni = tables.insert_alumni(details);
        tables.profiles.remove(position);
        Ok(alumni)
    }
}

#[async_trait]
impl AlumniRepository for MemoryStore {
    async fn create(&self, details: MemberDetails) -> Result<Alumni> {
        Ok(self.tables.lock().await.insert_alumni(details))
    }

    async fn list(&self) -> Result<Vec<Alumni>> {
        let mut alumni = self.tables.lock().await.alumni.clone();
        alumni.sort_by(|a, b| b.passout_year.cmp(&a.passout_year).then(a.id.cmp(&b.id)));
        Ok(alumni)
    }
}

#[async_trait]
impl TokenRepository for MemoryStore {
    async fn create(
        &self,
        name: &str,
        value: &str,
        max_usage: i32,
        valid_till: DateTime<Utc>,
    ) -> Result<SpecialToken> {
        let mut tables = self.tables.lock().await;
        if tables.tokens.iter().any(|t| t.value == value) {
            return Err(duplicate("value", token::DUPLICATE_VALUE));
        }

        let token = SpecialToken {
            id: tables.next_id(),
            name: name.to_string(),
            value: value.to_string(),
            used: 0,
            max_usage,
            valid_till,
        };
        tables.tokens.push(token.clone());
        Ok(token)
    }

    async fn find_by_value(&self, value: &str) -> Result<Option<SpecialToken>> {
        let tables = self.tables.lock().await;
        Ok(tables.tokens.iter().find(|t| t.value == value).cloned())
    }

    async fn redeem(&self, value: &str, now: DateTime<Utc>) -> Result<Option<SpecialToken>> {
        let mut tables = self.tables.lock().await;
        let Some(token) = tables
            .tokens
            .iter_mut()
            .find(|t| t.value == value && t.is_valid_at(now))
        else {
            return Ok(None);
        };
        token.used = token.used.checked_add(1).ok_or_else(|| {
            CmsError::Validation(ValidationErrors::single(
                "used",
                "Token usage counter is exhausted.",
            ))
        })?;
        Ok(Some(token.clone()))
    }
}

#[async_trait]
impl ProjectRepository for MemoryStore {
    async fn save(&self, request: SaveProjectRequest) -> Result<Project> {
        let mut tables = self.tables.lock().await;
        let taken = tables
            .projects
            .iter()
            .any(|p| p.identifier == request.identifier && Some(p.id) != request.id);
        if taken {
            return Err(duplicate("identifier", project::DUPLICATE_IDENTIFIER));
        }

        let id = match request.id {
            Some(id) => id,
            None => tables.next_id(),
        };
        let project = Project {
            id,
            identifier: request.identifier,
            title: request.title,
            description: request.description,
            gitlink: request.gitlink,
            image: request.image,
        };

        match request.id {
            None => tables.projects.push(project.clone()),
            Some(id) => {
                let slot = tables
                    .projects
                    .iter_mut()
                    .find(|p| p.id == id)
                    .ok_or_else(|| CmsError::not_found("Project", id.to_string()))?;
                *slot = project.clone();
            }
        }

        Ok(project)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Project>> {
        let tables = self.tables.lock().await;
        Ok(tables.projects.iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<Project>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .projects
            .iter()
            .find(|p| p.identifier == identifier)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Project>> {
        Ok(self.tables.lock().await.projects.clone())
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let mut tables = self.tables.lock().await;
        let before = tables.projects.len();
        tables.projects.retain(|p| p.id != id);
        Ok(tables.projects.len() < before)
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.tables.lock().await.projects.len() as i64)
    }
}

#[async_trait]
impl ContentRepository for MemoryStore {
    async fn find_about(&self, identifier: &str) -> Result<Option<About>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .abouts
            .iter()
            .find(|a| a.identifier == identifier)
            .cloned())
    }

    async fn list_activities(&self) -> Result<Vec<Activity>> {
        Ok(self.tables.lock().await.activities.clone())
    }

    async fn list_carousel(&self) -> Result<Vec<CarouselImage>> {
        Ok(self.tables.lock().await.carousel_images.clone())
    }

    async fn list_linit_editions(&self) -> Result<Vec<LinitEdition>> {
        let tables = self.tables.lock().await;
        let mut linits = tables.linits.clone();
        linits.sort_by(|a, b| b.year_edition.cmp(&a.year_edition).then(a.id.cmp(&b.id)));
        Ok(group_linit_images(linits, tables.linit_images.clone()))
    }

    async fn list_sponsors(&self) -> Result<Vec<Sponsor>> {
        Ok(self.tables.lock().await.sponsors.clone())
    }

    async fn list_techbytes(&self) -> Result<Vec<TechBytes>> {
        let mut posts = self.tables.lock().await.techbytes.clone();
        posts.sort_by(|a, b| b.pub_date.cmp(&a.pub_date).then(b.id.cmp(&a.id)));
        Ok(posts)
    }

    async fn list_devposts(&self) -> Result<Vec<DevPost>> {
        let mut posts = self.tables.lock().await.devposts.clone();
        posts.sort_by(|a, b| b.pub_date.cmp(&a.pub_date).then(b.id.cmp(&a.id)));
        Ok(posts)
    }

    async fn list_ctfs(&self) -> Result<Vec<Ctf>> {
        Ok(self.tables.lock().await.ctfs.clone())
    }

    async fn list_facads(&self) -> Result<Vec<Facad>> {
        Ok(self.tables.lock().await.facads.clone())
    }

    async fn list_enabled_configs(&self) -> Result<Vec<SiteConfig>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .site_configs
            .iter()
            .filter(|c| c.enable)
            .cloned()
            .collect())
    }

    async fn create_contact(&self, contact: NewContact) -> Result<Contact> {
        let mut tables = self.tables.lock().await;
        let contact = Contact {
            id: tables.next_id(),
            name: contact.name,
            email: contact.email,
            phone_number: contact.phone_number,
            message: contact.message,
        };
        tables.contacts.push(contact.clone());
        Ok(contact)
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }

    async fn list(&self) -> Result<Vec<User>> {
        Ok(self.tables.lock().await.users.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::{EventStatus, EventType};
    use crate::models::member::Degree;
    use chrono::{Duration, NaiveDate};

    fn entry(name: &str) -> NewTimelineEntry {
        NewTimelineEntry {
            event_name: name.to_string(),
            detail: None,
            event_time: NaiveDate::from_ymd_opt(2024, 10, 1).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_timeline_names_are_unique() {
        let store = MemoryStore::new();
        assert!(TimelineRepository::create(&store, entry("Hacktoberfest")).await.unwrap().is_some());
        assert!(TimelineRepository::create(&store, entry("Hacktoberfest")).await.unwrap().is_none());
        assert!(TimelineRepository::create(&store, entry("Codejam")).await.unwrap().is_some());

        let names: Vec<_> = store
            .list_recent_first()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.event_name)
            .collect();
        assert_eq!(names, vec!["Codejam", "Hacktoberfest"]);
    }

    #[tokio::test]
    async fn test_event_identifier_is_unique() {
        let store = MemoryStore::new();
        let request = SaveEventRequest::new("meetup", "Meetup", EventType::Talk, EventStatus::Final);
        EventRepository::save(&store, request.clone(), None).await.unwrap();

        let err = EventRepository::save(&store, request, None).await.unwrap_err();
        assert!(matches!(err, CmsError::Validation(_)));
    }

    #[tokio::test]
    async fn test_event_update_keeps_bts_stamp() {
        let store = MemoryStore::new();
        let stamp = Utc::now() - Duration::days(3);
        let mut request = SaveEventRequest::new("meetup", "Meetup", EventType::Talk, EventStatus::Final);
        request.bts_uploaded_at = Some(stamp);
        let saved = EventRepository::save(&store, request, None).await.unwrap();

        let mut update = saved.to_request();
        update.bts_uploaded_at = Some(Utc::now());
        let updated = EventRepository::save(&store, update, None).await.unwrap();
        assert_eq!(updated.bts_uploaded_at, Some(stamp));
    }

    #[tokio::test]
    async fn test_migrate_missing_profile_changes_nothing() {
        let store = MemoryStore::new();
        let details = MemberDetails::new("Ada", "Lovelace", Degree::Btech);

        let err = store.migrate_to_alumni(42, details).await.unwrap_err();
        assert!(matches!(err, CmsError::NotFound { .. }));
        assert!(store.tables().await.alumni.is_empty());
    }

    #[tokio::test]
    async fn test_redeem_respects_max_usage() {
        let store = MemoryStore::new();
        let now = Utc::now();
        TokenRepository::create(&store, "ctf", "abcdefghijklmnop", 2, now + Duration::hours(1))
            .await
            .unwrap();

        assert_eq!(store.redeem("abcdefghijklmnop", now).await.unwrap().unwrap().used, 1);
        assert_eq!(store.redeem("abcdefghijklmnop", now).await.unwrap().unwrap().used, 2);
        assert!(store.redeem("abcdefghijklmnop", now).await.unwrap().is_none());
        assert!(store.redeem("unknown", now).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_redeem_reports_exhausted_counter() {
        let store = MemoryStore::new();
        let now = Utc::now();
        TokenRepository::create(&store, "bulk", "bulkbulkbulkbulk", i32::MAX, now + Duration::hours(1))
            .await
            .unwrap();
        store.tables().await.tokens[0].used = i16::MAX;

        let err = store.redeem("bulkbulkbulkbulk", now).await.unwrap_err();
        assert!(matches!(err, CmsError::Validation(_)));
        assert_eq!(store.tables().await.tokens[0].used, i16::MAX);
    }
}
