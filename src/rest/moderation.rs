use async_stream::try_stream;
use futures::Stream;
use serde_json::json;

use super::Client;
use super::types::request::AdminUsersRequest;
use crate::Result;
use crate::models::{Entity, User};

impl Client {
    pub async fn add_moderator(&self, user_id: &str) -> Result<()> {
        self.post_unit("/api/admin/moderators/add", &json!({ "userId": user_id }))
            .await
    }

    pub async fn remove_moderator(&self, user_id: &str) -> Result<()> {
        self.post_unit(
            "/api/admin/moderators/remove",
            &json!({ "userId": user_id }),
        )
        .await
    }

    /// Remove a custom emoji from the instance.
    pub async fn remove_emoji(&self, emoji_id: &str) -> Result<()> {
        self.post_unit("/api/admin/emoji/delete", &json!({ "id": emoji_id }))
            .await
    }

    /// One page of the admin user listing.
    pub async fn admin_users_page(&self, request: &AdminUsersRequest) -> Result<Vec<Entity<User>>> {
        let users: Vec<User> = self.post("/api/admin/show-users", request).await?;
        Ok(self.bind_all(users))
    }

    /// Every user matching `request`, fetched page by page.
    ///
    /// Starts at `request.offset` and advances the offset by the size of each page until
    /// the server returns an empty page. The first error ends the stream.
    pub fn admin_users(
        &self,
        request: AdminUsersRequest,
    ) -> impl Stream<Item = Result<Entity<User>>> + Send + '_ {
        try_stream! {
            let mut request = request;
            loop {
                let page = self.admin_users_page(&request).await?;
                if page.is_empty() {
                    break;
                }

                let fetched = u32::try_from(page.len()).unwrap_or(u32::MAX);
                for user in page {
                    yield user;
                }
                request.offset = request.offset.saturating_add(fetched);
            }
        }
    }
}
