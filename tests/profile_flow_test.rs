//! Profile form flow integration tests

mod helpers;

use chrono::{Datelike, Utc};
use helpers::*;
use reqwest::multipart::{Form, Part};

#[tokio::test]
async fn test_flows_require_a_known_user() {
    let server = TestServer::start().await;

    let anonymous = server.get("/profile/create/").await;
    assert_eq!(anonymous.status(), 401);

    let unknown = server.get_as("mallory", "/profile/edit/").await;
    assert_eq!(unknown.status(), 401);
    assert!(server.store.tables().await.profiles.is_empty());
}

#[tokio::test]
async fn test_create_form_lists_choices() {
    let server = TestServer::start().await;
    seed_user(&server, "ada").await;

    let response = server.get_as("ada", "/profile/create/").await;
    assert_eq!(response.status(), 200);
    let form: serde_json::Value = response.json().await.unwrap();
    assert!(form["values"].is_null());
    assert_eq!(form["degree_choices"][0][0], "BTECH");

    let year = Utc::now().year();
    let years: Vec<i64> = form["passout_year_choices"]
        .as_array()
        .unwrap()
        .iter()
        .map(|y| y.as_i64().unwrap())
        .collect();
    assert_eq!(years.first().copied(), Some(year as i64));
    assert_eq!(years.len(), 5);
}

#[tokio::test]
async fn test_create_then_create_again() {
    let server = TestServer::start().await;
    let user = seed_user(&server, "ada").await;

    let response = server
        .post_form_as("ada", "/profile/create/", profile_form("Ada"))
        .await;
    assert_eq!(response.status(), 303);
    assert_eq!(location_of(&response).as_deref(), Some("/admin/"));
    assert_eq!(
        flash_of(&response),
        Some((
            "info".to_string(),
            "ada, your Profile has been successfully created.".to_string()
        ))
    );
    {
        let tables = server.store.tables().await;
        assert_eq!(tables.profiles.len(), 1);
        assert_eq!(tables.profiles[0].user_id, user.id);
    }

    let again = server.get_as("ada", "/profile/create/").await;
    assert_eq!(again.status(), 303);
    assert_eq!(
        flash_of(&again).map(|(_, message)| message).as_deref(),
        Some("A Profile already exists for user ada")
    );
    assert_eq!(server.store.tables().await.profiles.len(), 1);
}

#[tokio::test]
async fn test_edit_without_profile_redirects_to_create() {
    let server = TestServer::start().await;
    seed_user(&server, "ada").await;

    let response = server.get_as("ada", "/profile/edit/").await;
    assert_eq!(response.status(), 303);
    assert_eq!(location_of(&response).as_deref(), Some("/profile/create/"));
    assert_eq!(
        flash_of(&response),
        Some((
            "error".to_string(),
            "No Profile Exists for ada, create one first.".to_string()
        ))
    );
}

#[tokio::test]
async fn test_edit_updates_in_place() {
    let server = TestServer::start().await;
    let profile = seed_profile(&server, "ada").await;

    let form = server.get_as("ada", "/profile/edit/").await;
    assert_eq!(form.status(), 200);
    let form: serde_json::Value = form.json().await.unwrap();
    assert_eq!(form["values"]["id"], profile.id);

    let response = server
        .post_form_as(
            "ada",
            "/profile/edit/",
            profile_form("Augusta").text("position", "Secretary"),
        )
        .await;
    assert_eq!(response.status(), 303);
    assert_eq!(
        flash_of(&response).map(|(_, message)| message).as_deref(),
        Some("ada, your Profile has been successfully updated.")
    );

    let tables = server.store.tables().await;
    assert_eq!(tables.profiles.len(), 1);
    assert_eq!(tables.profiles[0].id, profile.id);
    assert_eq!(tables.profiles[0].first_name, "Augusta");
    assert_eq!(tables.profiles[0].position.as_deref(), Some("Secretary"));
}

#[tokio::test]
async fn test_invalid_submission_renders_errors() {
    let server = TestServer::start().await;
    seed_profile(&server, "ada").await;

    let form = Form::new()
        .text("first_name", "Ada")
        .text("last_name", "Tester")
        .text("degree_name", "PHD")
        .text("passout_year", (Utc::now().year() + 1).to_string())
        .text("email", "not-an-email");
    let response = server.post_form_as("ada", "/profile/edit/", form).await;
    assert_eq!(response.status(), 422);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body["errors"]["degree_name"][0],
        "Select a valid choice. PHD is not one of the available choices."
    );
    let tables = server.store.tables().await;
    assert_eq!(tables.profiles[0].first_name, "ada");
}

#[tokio::test]
async fn test_oversized_image_is_rejected() {
    let server = TestServer::start().await;
    seed_user(&server, "ada").await;

    let image = Part::bytes(vec![0u8; 2 * 1024 * 1024]).file_name("me.png");
    let response = server
        .post_form_as("ada", "/profile/create/", profile_form("Ada").part("image", image))
        .await;
    assert_eq!(response.status(), 422);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body["errors"]["image"][0],
        "File too large. Size should not exceed 1 MiB."
    );
    assert!(server.store.tables().await.profiles.is_empty());
    assert!(!server.media_root().join("member_images").exists());
}

#[tokio::test]
async fn test_image_is_stored_and_served_as_url() {
    let server = TestServer::start().await;
    seed_user(&server, "ada").await;

    let image = Part::bytes(vec![7u8; 512 * 1024]).file_name("me.png");
    let response = server
        .post_form_as("ada", "/profile/create/", profile_form("Ada").part("image", image))
        .await;
    assert_eq!(response.status(), 303);

    let stored = server.store.tables().await.profiles[0].image.clone().unwrap();
    assert!(stored.starts_with("member_images/"));
    assert!(server.media_root().join(&stored).exists());

    let profiles = server.get_json("/profiles/").await;
    assert_eq!(profiles[0]["image"], format!("/media/{}", stored));
}

#[tokio::test]
async fn test_convert_moves_profile_to_alumni() {
    let server = TestServer::start().await;
    seed_profile(&server, "ada").await;

    let response = server
        .post_form_as(
            "ada",
            "/profile/edit/",
            profile_form("Ada").text("convert_to_alumni", "on"),
        )
        .await;
    assert_eq!(response.status(), 303);
    assert_eq!(
        flash_of(&response).map(|(_, message)| message).as_deref(),
        Some("ada, your Profile has been moved to Alumni.")
    );

    let profiles = server.get_json("/profiles/").await;
    assert!(profiles.as_array().unwrap().is_empty());
    let alumni = server.get_json("/alumni/").await;
    assert_eq!(alumni.as_array().unwrap().len(), 1);
    assert_eq!(alumni[0]["first_name"], "Ada");

    let count = server.get_json("/count/").await;
    assert_eq!(count["members"], 0);
}
