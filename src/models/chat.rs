use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{DriveFile, Entity, User};
use crate::Result;
use crate::rest::types::request::ChatRequest;

/// A direct (messaging) message.
///
/// Only `id` is guaranteed; the remaining fields depend on whether the message came from
/// the streaming connection or a REST response.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    pub id: String,
    pub created_at: Option<DateTime<Utc>>,
    pub text: Option<String>,
    pub user_id: Option<String>,
    pub user: Option<User>,
    pub recipient_id: Option<String>,
    pub recipient: Option<User>,
    pub group_id: Option<String>,
    pub file_id: Option<String>,
    pub file: Option<DriveFile>,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub reads: Vec<String>,
}

impl Entity<Chat> {
    pub async fn delete(&self) -> Result<()> {
        self.client().delete_chat(&self.id).await
    }

    /// Answer in the same conversation: the group when the message was sent to one,
    /// otherwise the sender.
    pub async fn reply(&self, text: &str) -> Result<Entity<Chat>> {
        let builder = ChatRequest::builder().text(text.to_owned());
        let request = match (&self.group_id, &self.user_id) {
            (Some(group_id), _) => builder.group_id(group_id.clone()).build(),
            (None, Some(user_id)) => builder.user_id(user_id.clone()).build(),
            (None, None) => builder.build(),
        };

        self.client().send_chat(&request).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn chat_with_only_id_decodes() {
        let chat: Chat = serde_json::from_value(json!({ "id": "m1" })).expect("chat should decode");

        assert_eq!(chat.id, "m1");
        assert!(chat.text.is_none());
        assert!(chat.reads.is_empty());
    }
}
