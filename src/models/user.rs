use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Entity, Note};
use crate::Result;
use crate::rest::types::request::Page;

/// A local or remote account.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    /// Display name
    pub name: Option<String>,
    /// `None` for local users
    pub host: Option<String>,
    pub avatar_url: Option<String>,
    pub avatar_blurhash: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub is_moderator: bool,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default)]
    pub is_cat: bool,
    #[serde(default)]
    pub is_locked: bool,
    #[serde(default)]
    pub is_silenced: bool,
    #[serde(default)]
    pub is_suspended: bool,
    pub online_status: Option<String>,
    pub url: Option<String>,
    pub uri: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub birthday: Option<String>,
    #[serde(default)]
    pub fields: Vec<ProfileField>,
    pub followers_count: Option<u64>,
    pub following_count: Option<u64>,
    pub notes_count: Option<u64>,
    #[serde(default)]
    pub pinned_note_ids: Vec<String>,
}

impl User {
    /// The fully qualified account name, e.g. `@alice` or `@alice@remote.example`.
    #[must_use]
    pub fn acct(&self) -> String {
        match &self.host {
            Some(host) => format!("@{}@{host}", self.username),
            None => format!("@{}", self.username),
        }
    }
}

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProfileField {
    pub name: String,
    pub value: String,
}

/// An incoming follow request. The payload is the requesting user.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct FollowRequest {
    pub from: User,
}

/// A follow relation as returned by follower listings.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Following {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub followee_id: String,
    pub follower_id: String,
    pub followee: Option<User>,
    pub follower: Option<User>,
}

impl Entity<User> {
    pub async fn follow(&self) -> Result<()> {
        self.client().follow(&self.id).await
    }

    pub async fn unfollow(&self) -> Result<()> {
        self.client().unfollow(&self.id).await
    }

    pub async fn notes(&self, page: &Page) -> Result<Vec<Entity<Note>>> {
        self.client().user_notes(&self.id, page).await
    }

    pub async fn followers(&self, page: &Page) -> Result<Vec<Following>> {
        self.client().followers(&self.id, page).await
    }
}

impl Entity<FollowRequest> {
    pub async fn accept(&self) -> Result<()> {
        self.client().accept_follow_request(&self.from.id).await
    }

    pub async fn reject(&self) -> Result<()> {
        self.client().reject_follow_request(&self.from.id).await
    }

    /// Fetch the full profile of the requesting user.
    pub async fn profile(&self) -> Result<Entity<User>> {
        self.client().show_user(&self.from.id).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn user_acct_includes_remote_host() {
        let user: User = serde_json::from_value(json!({
            "id": "u1",
            "username": "alice",
            "host": "remote.example"
        }))
        .expect("user should decode");

        assert_eq!(user.acct(), "@alice@remote.example");
        assert!(!user.is_bot);
    }

    #[test]
    fn follow_request_decodes_user_payload() {
        let request: FollowRequest = serde_json::from_value(json!({
            "id": "u2",
            "username": "bob",
            "name": "Bob",
            "host": null,
            "avatarUrl": "https://misskey.example/avatar.png",
            "isBot": true
        }))
        .expect("follow request should decode");

        assert_eq!(request.from.id, "u2");
        assert_eq!(request.from.acct(), "@bob");
        assert!(request.from.is_bot);
    }
}
