//! Public shapes of the records served by the read API
//!
//! Stored file paths are turned into absolute media URLs here, and private
//! fields (contact details of members, internal flags) are left out.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::models::content::{
    About, Activity, CarouselImage, Contact, Ctf, DevPost, Facad, LinitEdition, SiteConfig,
    Sponsor, TechBytes,
};
use crate::models::event::{Event, EventStatus, EventType};
use crate::models::member::{Alumni, Degree, Profile};
use crate::models::project::Project;
use crate::models::timeline::Timeline;
use crate::models::user::User;
use crate::storage::MediaStore;

fn media_url(media: &dyn MediaStore, path: Option<&str>) -> Option<String> {
    path.filter(|p| !p.is_empty()).map(|p| media.url(p))
}

#[derive(Debug, Serialize)]
pub struct EventResponse {
    pub id: i64,
    pub identifier: String,
    pub title: String,
    pub event_image: Option<String>,
    pub description: Option<String>,
    pub event_type: EventType,
    pub venue: Option<String>,
    pub url: Option<String>,
    pub event_timing: Option<DateTime<Utc>>,
    pub facebook_link: Option<String>,
    pub pub_date: DateTime<Utc>,
    pub pub_by: Option<String>,
    pub status: EventStatus,
    pub show: bool,
    pub featured: bool,
    pub upcoming: bool,
    pub bts_description: Option<String>,
    pub bts_image: Option<String>,
    pub bts_video: Option<String>,
    pub bts_uploaded_at: Option<DateTime<Utc>>,
}

impl EventResponse {
    pub fn new(event: Event, media: &dyn MediaStore) -> Self {
        Self {
            event_image: media_url(media, event.event_image.as_deref()),
            bts_image: media_url(media, event.bts_image.as_deref()),
            bts_video: media_url(media, event.bts_video.as_deref()),
            id: event.id,
            identifier: event.identifier,
            title: event.title,
            description: event.description,
            event_type: event.event_type,
            venue: event.venue,
            url: event.url,
            event_timing: event.event_timing,
            facebook_link: event.facebook_link,
            pub_date: event.pub_date,
            pub_by: event.pub_by,
            status: event.status,
            show: event.show,
            featured: event.featured,
            upcoming: event.upcoming,
            bts_description: event.bts_description,
            bts_uploaded_at: event.bts_uploaded_at,
        }
    }
}

/// A member as shown on the team page
#[derive(Debug, Serialize)]
pub struct MemberResponse {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub alias: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub degree_name: Degree,
    pub passout_year: i32,
    pub position: Option<String>,
    pub git_link: Option<String>,
    pub facebook_link: Option<String>,
    pub twitter_link: Option<String>,
    pub reddit_link: Option<String>,
    pub linkedin_link: Option<String>,
}

impl MemberResponse {
    pub fn from_profile(profile: Profile, media: &dyn MediaStore) -> Self {
        Self {
            image: media_url(media, profile.image.as_deref()),
            id: profile.id,
            first_name: profile.first_name,
            last_name: profile.last_name,
            alias: profile.alias,
            bio: profile.bio,
            degree_name: profile.degree_name,
            passout_year: profile.passout_year,
            position: profile.position,
            git_link: profile.git_link,
            facebook_link: profile.facebook_link,
            twitter_link: profile.twitter_link,
            reddit_link: profile.reddit_link,
            linkedin_link: profile.linkedin_link,
        }
    }

    pub fn from_alumni(alumni: Alumni, media: &dyn MediaStore) -> Self {
        Self {
            image: media_url(media, alumni.image.as_deref()),
            id: alumni.id,
            first_name: alumni.first_name,
            last_name: alumni.last_name,
            alias: alumni.alias,
            bio: alumni.bio,
            degree_name: alumni.degree_name,
            passout_year: alumni.passout_year,
            position: alumni.position,
            git_link: alumni.git_link,
            facebook_link: alumni.facebook_link,
            twitter_link: alumni.twitter_link,
            reddit_link: alumni.reddit_link,
            linkedin_link: alumni.linkedin_link,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    pub id: i64,
    pub identifier: String,
    pub title: String,
    pub description: Option<String>,
    pub gitlink: Option<String>,
    pub image: Option<String>,
}

impl ProjectResponse {
    pub fn new(project: Project, media: &dyn MediaStore) -> Self {
        Self {
            image: media_url(media, project.image.as_deref()),
            id: project.id,
            identifier: project.identifier,
            title: project.title,
            description: project.description,
            gitlink: project.gitlink,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TimelineResponse {
    pub id: i64,
    pub event_name: String,
    pub detail: Option<String>,
    pub event_time: NaiveDate,
}

impl From<Timeline> for TimelineResponse {
    fn from(entry: Timeline) -> Self {
        Self {
            id: entry.id,
            event_name: entry.event_name,
            detail: entry.detail,
            event_time: entry.event_time,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AboutResponse {
    pub identifier: String,
    pub heading: Option<String>,
    pub content: Option<String>,
}

impl From<About> for AboutResponse {
    fn from(about: About) -> Self {
        Self {
            identifier: about.identifier,
            heading: about.heading,
            content: about.content,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ActivityResponse {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub image: Option<String>,
}

impl ActivityResponse {
    pub fn new(activity: Activity, media: &dyn MediaStore) -> Self {
        Self {
            image: media_url(media, activity.image.as_deref()),
            id: activity.id,
            title: activity.title,
            description: activity.description,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CarouselResponse {
    pub identifier: String,
    pub image: Option<String>,
    pub mobile_image: Option<String>,
    pub heading: Option<String>,
    pub sub_heading: Option<String>,
}

impl CarouselResponse {
    pub fn new(image: CarouselImage, media: &dyn MediaStore) -> Self {
        Self {
            image: media_url(media, Some(image.image.as_str())),
            mobile_image: media_url(media, image.mobile_image.as_deref()),
            identifier: image.identifier,
            heading: image.heading,
            sub_heading: image.sub_heading,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LinitResponse {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub year_edition: i32,
    pub images: Vec<String>,
}

impl LinitResponse {
    pub fn new(edition: LinitEdition, media: &dyn MediaStore) -> Self {
        let LinitEdition { linit, images } = edition;
        Self {
            image: media_url(media, linit.image.as_deref()),
            images: images
                .iter()
                .filter_map(|page| media_url(media, page.image.as_deref()))
                .collect(),
            id: linit.id,
            title: linit.title,
            description: linit.description,
            year_edition: linit.year_edition,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SponsorResponse {
    pub id: i64,
    pub name: String,
    pub logo: Option<String>,
    pub website: Option<String>,
}

impl SponsorResponse {
    pub fn new(sponsor: Sponsor, media: &dyn MediaStore) -> Self {
        Self {
            logo: media_url(media, Some(sponsor.logo.as_str())),
            id: sponsor.id,
            name: sponsor.name,
            website: sponsor.website,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TechBytesResponse {
    pub id: i64,
    pub title: String,
    pub image: Option<String>,
    pub body: Option<String>,
    pub link: Option<String>,
    pub pub_date: DateTime<Utc>,
}

impl TechBytesResponse {
    pub fn new(post: TechBytes, media: &dyn MediaStore) -> Self {
        Self {
            image: media_url(media, post.image.as_deref()),
            id: post.id,
            title: post.title,
            body: post.body,
            link: post.link,
            pub_date: post.pub_date,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DevPostResponse {
    pub id: i64,
    pub title: String,
    pub image: Option<String>,
    pub dev_link: String,
    pub body: Option<String>,
    pub pub_date: DateTime<Utc>,
}

impl DevPostResponse {
    pub fn new(post: DevPost, media: &dyn MediaStore) -> Self {
        Self {
            image: media_url(media, post.image.as_deref()),
            id: post.id,
            title: post.title,
            dev_link: post.dev_link,
            body: post.body,
            pub_date: post.pub_date,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CtfResponse {
    pub id: i64,
    pub name: String,
    pub photo: Option<String>,
    pub link: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl CtfResponse {
    pub fn new(ctf: Ctf, media: &dyn MediaStore) -> Self {
        Self {
            photo: media_url(media, Some(ctf.photo.as_str())),
            id: ctf.id,
            name: ctf.name,
            link: ctf.link,
            description: ctf.description,
            created_at: ctf.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FacadResponse {
    pub id: i64,
    pub post: String,
    pub first_name: String,
    pub last_name: String,
    pub linkedin_link: Option<String>,
    pub email: String,
    pub image: Option<String>,
}

impl FacadResponse {
    pub fn new(facad: Facad, media: &dyn MediaStore) -> Self {
        Self {
            image: media_url(media, facad.image.as_deref()),
            id: facad.id,
            post: facad.post,
            first_name: facad.first_name,
            last_name: facad.last_name,
            linkedin_link: facad.linkedin_link,
            email: facad.email,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    pub key: String,
    pub value: String,
}

impl From<SiteConfig> for ConfigResponse {
    fn from(config: SiteConfig) -> Self {
        Self {
            key: config.key,
            value: config.value,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub id: i64,
    pub name: String,
}

impl From<Contact> for ContactResponse {
    fn from(contact: Contact) -> Self {
        Self {
            id: contact.id,
            name: contact.name,
        }
    }
}
