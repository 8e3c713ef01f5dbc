use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata of the connected instance as reported by `/api/meta`.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceMeta {
    pub name: Option<String>,
    pub version: String,
    pub description: Option<String>,
    pub uri: Option<String>,
    pub maintainer_name: Option<String>,
    pub maintainer_email: Option<String>,
    #[serde(default)]
    pub langs: Vec<String>,
    pub tos_url: Option<String>,
    pub icon_url: Option<String>,
    pub banner_url: Option<String>,
    #[serde(default)]
    pub disable_registration: bool,
    pub max_note_text_length: Option<u64>,
}

/// An administrator announcement from `/api/announcements`.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub id: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub title: String,
    pub text: String,
    pub image_url: Option<String>,
    /// Absent for anonymous requests.
    pub is_read: Option<bool>,
}

/// A remote instance known through federation.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FederatedInstance {
    pub id: String,
    pub host: String,
    pub first_retrieved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub users_count: u64,
    #[serde(default)]
    pub notes_count: u64,
    #[serde(default)]
    pub following_count: u64,
    #[serde(default)]
    pub followers_count: u64,
    #[serde(default)]
    pub is_not_responding: bool,
    #[serde(default)]
    pub is_suspended: bool,
    pub software_name: Option<String>,
    pub software_version: Option<String>,
    pub open_registrations: Option<bool>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub maintainer_name: Option<String>,
}
