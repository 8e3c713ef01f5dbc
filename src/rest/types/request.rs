use bon::Builder;
use serde::Serialize;
use serde_with::skip_serializing_none;

use crate::Result;
use crate::error::Error;
use crate::models::Visibility;

const MAX_ANNOUNCEMENTS_LIMIT: u32 = 100;

/// Cursor-based paging shared by most listing endpoints.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Builder, Serialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct Page {
    /// Maximum number of items (server default 10, maximum 100).
    pub limit: Option<u32>,
    /// Return items newer than this id.
    #[builder(into)]
    pub since_id: Option<String>,
    /// Return items older than this id.
    #[builder(into)]
    pub until_id: Option<String>,
}

/// Body of `/api/notes/create`.
///
/// A note needs at least one of `text`, `file_ids`, `renote_id` or `poll`.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Builder, Serialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct NoteRequest {
    #[builder(into)]
    pub text: Option<String>,
    /// Content warning shown in place of the text.
    #[builder(into)]
    pub cw: Option<String>,
    #[builder(default)]
    pub visibility: Visibility,
    /// Recipients when `visibility` is `specified`.
    pub visible_user_ids: Option<Vec<String>>,
    #[builder(default)]
    pub local_only: bool,
    #[builder(into)]
    pub reply_id: Option<String>,
    #[builder(into)]
    pub renote_id: Option<String>,
    #[builder(into)]
    pub channel_id: Option<String>,
    pub file_ids: Option<Vec<String>>,
    pub poll: Option<PollRequest>,
}

impl NoteRequest {
    pub(crate) fn validate(&self) -> Result<()> {
        let has_files = self.file_ids.as_ref().is_some_and(|ids| !ids.is_empty());
        if self.text.is_none() && !has_files && self.renote_id.is_none() && self.poll.is_none() {
            return Err(Error::validation(
                "a note needs text, files, a renote or a poll",
            ));
        }

        if let Some(poll) = &self.poll
            && poll.choices.len() < 2
        {
            return Err(Error::validation("a poll needs at least two choices"));
        }

        Ok(())
    }
}

#[skip_serializing_none]
#[derive(Debug, Clone, Builder, Serialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct PollRequest {
    pub choices: Vec<String>,
    #[builder(default)]
    pub multiple: bool,
    /// Absolute expiry as a unix timestamp in milliseconds.
    pub expires_at: Option<i64>,
    /// Relative expiry in milliseconds.
    pub expired_after: Option<i64>,
}

/// Body of `/api/messaging/messages/create`. Exactly one of `user_id` and `group_id`
/// must be set.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Builder, Serialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct ChatRequest {
    #[builder(into)]
    pub text: Option<String>,
    #[builder(into)]
    pub user_id: Option<String>,
    #[builder(into)]
    pub group_id: Option<String>,
    #[builder(into)]
    pub file_id: Option<String>,
}

impl ChatRequest {
    pub(crate) fn validate(&self) -> Result<()> {
        match (&self.user_id, &self.group_id) {
            (Some(_), Some(_)) => Err(Error::validation(
                "a chat message goes to either a user or a group, not both",
            )),
            (None, None) => Err(Error::validation(
                "a chat message needs a user_id or a group_id",
            )),
            _ if self.text.is_none() && self.file_id.is_none() => {
                Err(Error::validation("a chat message needs text or a file"))
            }
            _ => Ok(()),
        }
    }
}

/// Filters for `/api/drive/files`.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Builder, Serialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct FileQuery {
    pub limit: Option<u32>,
    #[builder(into)]
    pub since_id: Option<String>,
    #[builder(into)]
    pub until_id: Option<String>,
    #[builder(into)]
    pub folder_id: Option<String>,
    /// MIME type filter, `image/*` style wildcards allowed.
    #[serde(rename = "type")]
    #[builder(into)]
    pub content_type: Option<String>,
}

/// Filters for `/api/drive/folders`.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Builder, Serialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct FolderQuery {
    pub limit: Option<u32>,
    #[builder(into)]
    pub since_id: Option<String>,
    #[builder(into)]
    pub until_id: Option<String>,
    #[builder(into)]
    pub folder_id: Option<String>,
}

/// Options for `/api/drive/files/create`. Sent as text parts next to the file.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Builder, Serialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct UploadRequest {
    /// Name stored in the drive, the local file name when unset.
    #[builder(into)]
    pub name: Option<String>,
    #[builder(into)]
    pub folder_id: Option<String>,
    #[builder(default)]
    pub is_sensitive: bool,
    /// Store the file even if an identical one already exists.
    #[builder(default)]
    pub force: bool,
}

/// File contents for a multipart upload.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct FileUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    /// MIME type of the part, e.g. `image/png`.
    pub mime: Option<String>,
}

impl FileUpload {
    #[must_use]
    pub fn new<S: Into<String>>(file_name: S, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
            mime: None,
        }
    }

    #[must_use]
    pub fn with_mime<S: Into<String>>(mut self, mime: S) -> Self {
        self.mime = Some(mime.into());
        self
    }
}

/// Body of `/api/announcements`.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Builder, Serialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct AnnouncementsRequest {
    /// At most 100.
    pub limit: Option<u32>,
    /// Include announcements the account has already read.
    #[builder(default)]
    pub with_unreads: bool,
    #[builder(into)]
    pub since_id: Option<String>,
    #[builder(into)]
    pub until_id: Option<String>,
}

impl AnnouncementsRequest {
    pub(crate) fn validate(&self) -> Result<()> {
        match self.limit {
            Some(limit) if limit > MAX_ANNOUNCEMENTS_LIMIT => Err(Error::validation(format!(
                "announcements limit must be at most {MAX_ANNOUNCEMENTS_LIMIT}, got {limit}"
            ))),
            _ => Ok(()),
        }
    }
}

/// Filters for `/api/admin/show-users`. Paging is offset based.
#[skip_serializing_none]
#[derive(Debug, Clone, Builder, Serialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct AdminUsersRequest {
    #[builder(default = 10)]
    pub limit: u32,
    #[builder(default)]
    pub offset: u32,
    /// e.g. `+createdAt`, `-updatedAt`
    #[builder(into)]
    pub sort: Option<String>,
    /// `all`, `alive`, `available`, `admin`, `moderator`, `adminOrModerator` or `suspended`
    #[builder(into, default = "all".to_owned())]
    pub state: String,
    /// `combined`, `local` or `remote`
    #[builder(into, default = "local".to_owned())]
    pub origin: String,
    #[builder(into)]
    pub username: Option<String>,
    #[builder(into)]
    pub hostname: Option<String>,
}

impl Default for AdminUsersRequest {
    fn default() -> Self {
        Self::builder().build()
    }
}
