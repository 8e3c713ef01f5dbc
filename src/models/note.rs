use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::Display;

use super::{DriveFile, Entity, User};
use crate::Result;
use crate::rest::types::request::{NoteRequest, Page};

/// Who can see a note.
#[non_exhaustive]
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Home,
    Followers,
    Specified,
    /// Visibility level not known to this client (captures the raw value)
    #[serde(untagged)]
    Unknown(String),
}

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub user_id: String,
    pub user: Option<User>,
    pub text: Option<String>,
    /// Content warning
    pub cw: Option<String>,
    pub visibility: Option<Visibility>,
    #[serde(default)]
    pub local_only: bool,
    #[serde(default)]
    pub renote_count: u64,
    #[serde(default)]
    pub replies_count: u64,
    /// Reaction counts keyed by reaction (unicode emoji or `:custom:` name)
    #[serde(default)]
    pub reactions: BTreeMap<String, u64>,
    pub my_reaction: Option<String>,
    #[serde(default)]
    pub file_ids: Vec<String>,
    #[serde(default)]
    pub files: Vec<DriveFile>,
    pub reply_id: Option<String>,
    pub renote_id: Option<String>,
    pub reply: Option<Box<Note>>,
    pub renote: Option<Box<Note>>,
    pub poll: Option<Poll>,
    pub channel_id: Option<String>,
    #[serde(default)]
    pub mentions: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub uri: Option<String>,
    pub url: Option<String>,
}

impl Note {
    /// Number of `:custom_emoji:` occurrences in the note text.
    #[must_use]
    pub fn emoji_count(&self) -> usize {
        let Some(text) = &self.text else {
            return 0;
        };

        let mut count = 0;
        let mut rest = text.as_str();
        while let Some((_, after)) = rest.split_once(':') {
            match after.split_once(':') {
                Some((name, tail)) if is_emoji_name(name) => {
                    count += 1;
                    rest = tail;
                }
                Some(_) => rest = after,
                None => break,
            }
        }

        count
    }

    /// Whether this note is a pure renote without its own content.
    #[must_use]
    pub fn is_pure_renote(&self) -> bool {
        self.renote_id.is_some() && self.text.is_none() && self.file_ids.is_empty() && self.poll.is_none()
    }
}

fn is_emoji_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '@' | '.'))
}

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Poll {
    #[serde(default)]
    pub multiple: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub choices: Vec<PollChoice>,
}

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PollChoice {
    pub text: String,
    #[serde(default)]
    pub votes: u64,
    #[serde(default)]
    pub is_voted: bool,
}

/// A reaction notification: someone reacted to one of our notes.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reaction {
    pub id: String,
    pub created_at: DateTime<Utc>,
    /// Notification type, always `reaction` for objects built by the router
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub is_read: bool,
    pub user_id: Option<String>,
    pub user: Option<User>,
    pub note: Option<Note>,
    pub reaction: Option<String>,
}

impl Entity<Note> {
    pub async fn delete(&self) -> Result<()> {
        self.client().delete_note(&self.id).await
    }

    /// Post a reply to this note with the same visibility.
    pub async fn reply(&self, text: &str) -> Result<Entity<Note>> {
        let request = NoteRequest::builder()
            .text(text.to_owned())
            .reply_id(self.id.clone())
            .visibility(self.visibility.clone().unwrap_or_default())
            .build();

        self.client().create_note(&request).await
    }

    pub async fn react(&self, reaction: &str) -> Result<()> {
        self.client().create_reaction(&self.id, reaction).await
    }

    pub async fn unreact(&self) -> Result<()> {
        self.client().delete_reaction(&self.id).await
    }

    pub async fn renote(&self) -> Result<Entity<Note>> {
        self.client().renote(&self.id).await
    }

    /// Quote this note with additional text.
    pub async fn quote(&self, text: &str) -> Result<Entity<Note>> {
        let request = NoteRequest::builder()
            .text(text.to_owned())
            .renote_id(self.id.clone())
            .build();

        self.client().create_note(&request).await
    }

    pub async fn replies(&self, page: &Page) -> Result<Vec<Entity<Note>>> {
        self.client().note_replies(&self.id, page).await
    }

    pub async fn favorite(&self) -> Result<()> {
        self.client().favorite_note(&self.id).await
    }

    pub async fn unfavorite(&self) -> Result<()> {
        self.client().unfavorite_note(&self.id).await
    }

    /// The author, bound to the same client, when the payload embeds it.
    #[must_use]
    pub fn author(&self) -> Option<Entity<User>> {
        self.user.clone().map(|user| self.attach(user))
    }
}

impl Entity<Reaction> {
    /// The note that was reacted to, bound to the same client.
    #[must_use]
    pub fn reacted_note(&self) -> Option<Entity<Note>> {
        self.note.clone().map(|note| self.attach(note))
    }
}
