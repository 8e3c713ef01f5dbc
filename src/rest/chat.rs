use serde_json::json;

use super::Client;
use super::types::request::ChatRequest;
use crate::Result;
use crate::models::{Chat, Entity};

impl Client {
    /// Send a direct message to a user or a group.
    ///
    /// # Errors
    ///
    /// Returns a validation error unless exactly one recipient is set and the message
    /// has text or a file.
    pub async fn send_chat(&self, request: &ChatRequest) -> Result<Entity<Chat>> {
        request.validate()?;

        let chat: Chat = self
            .post("/api/messaging/messages/create", request)
            .await?;
        Ok(self.bind(chat))
    }

    pub async fn delete_chat(&self, message_id: &str) -> Result<()> {
        self.post_unit(
            "/api/messaging/messages/delete",
            &json!({ "messageId": message_id }),
        )
        .await
    }
}
