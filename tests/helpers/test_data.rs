//! Test data helpers for seeding the in-memory store

use chrono::{Datelike, Utc};
use reqwest::multipart::Form;

use ClubPortal::models::{
    About, Degree, Event, EventStatus, EventType, Linit, LinitImage, MemberDetails, Profile,
    Project, SaveEventRequest, SaveProfileRequest, SaveProjectRequest, User,
};
use ClubPortal::services::{EventUploads, ProfileOutcome};

use super::TestServer;

pub async fn seed_event(server: &TestServer, identifier: &str, status: EventStatus) -> Event {
    let mut request = SaveEventRequest::new(identifier, identifier.to_uppercase(), EventType::Talk, status);
    request.add_to_timeline = true;
    server
        .state
        .services
        .event_service
        .save(request, EventUploads::default())
        .await
        .expect("Failed to seed event")
}

pub async fn seed_user(server: &TestServer, username: &str) -> User {
    server.store.add_user(username, false).await
}

pub fn member_details(first_name: &str) -> MemberDetails {
    let mut details = MemberDetails::new(first_name, "Tester", Degree::Btech);
    details.passout_year = Utc::now().year() + 1;
    details.email = Some(format!("{}@example.com", first_name.to_lowercase()));
    details.phone_number = Some("9999999999".to_string());
    details
}

/// Create a user and a profile bound to it
pub async fn seed_profile(server: &TestServer, username: &str) -> Profile {
    let user = seed_user(server, username).await;
    let request = SaveProfileRequest {
        id: None,
        user_id: user.id,
        details: member_details(username),
        convert_to_alumni: false,
    };
    match server
        .state
        .services
        .profile_service
        .save(request, None, Utc::now())
        .await
        .expect("Failed to seed profile")
    {
        ProfileOutcome::Persisted(profile) => profile,
        ProfileOutcome::Migrated(_) => panic!("Seeded profile was migrated"),
    }
}

pub async fn seed_project(server: &TestServer, identifier: &str) -> Project {
    server
        .state
        .services
        .project_service
        .save(SaveProjectRequest::new(identifier, identifier.to_uppercase()), None)
        .await
        .expect("Failed to seed project")
}

pub async fn seed_about(server: &TestServer, identifier: &str, heading: &str) {
    let mut tables = server.store.tables().await;
    let id = tables.next_id();
    tables.abouts.push(About {
        id,
        identifier: identifier.to_string(),
        heading: Some(heading.to_string()),
        content: Some("We build things.".to_string()),
    });
}

/// Add a magazine edition with the given page images
pub async fn seed_linit(server: &TestServer, year_edition: i32, pages: &[&str]) {
    let mut tables = server.store.tables().await;
    let linit_id = tables.next_id();
    tables.linits.push(Linit {
        id: linit_id,
        title: format!("Linit {}", year_edition),
        description: None,
        image: None,
        year_edition,
    });
    for page in pages {
        let id = tables.next_id();
        tables.linit_images.push(LinitImage {
            id,
            linit_id,
            image: Some(page.to_string()),
        });
    }
}

/// A valid profile form submission
pub fn profile_form(first_name: &str) -> Form {
    Form::new()
        .text("first_name", first_name.to_string())
        .text("last_name", "Tester")
        .text("degree_name", "BTECH")
        .text("passout_year", (Utc::now().year() + 1).to_string())
        .text("email", format!("{}@example.com", first_name.to_lowercase()))
}
