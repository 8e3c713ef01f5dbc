use serde_json::json;

use super::Client;
use super::notes::with_id;
use super::types::request::Page;
use crate::Result;
use crate::models::{Entity, Following, Note, User};

impl Client {
    /// The account the access token belongs to.
    pub async fn me(&self) -> Result<Entity<User>> {
        let user: User = self.post("/api/i", &json!({})).await?;
        Ok(self.bind(user))
    }

    pub async fn show_user(&self, user_id: &str) -> Result<Entity<User>> {
        let user: User = self
            .post("/api/users/show", &json!({ "userId": user_id }))
            .await?;
        Ok(self.bind(user))
    }

    /// Look a user up by `username`, on `host` for remote accounts.
    pub async fn show_user_by_username(
        &self,
        username: &str,
        host: Option<&str>,
    ) -> Result<Entity<User>> {
        let user: User = self
            .post(
                "/api/users/show",
                &json!({ "username": username, "host": host }),
            )
            .await?;
        Ok(self.bind(user))
    }

    pub async fn followers(&self, user_id: &str, page: &Page) -> Result<Vec<Following>> {
        self.post("/api/users/followers", &with_id("userId", user_id, page)?)
            .await
    }

    pub async fn user_notes(&self, user_id: &str, page: &Page) -> Result<Vec<Entity<Note>>> {
        let notes: Vec<Note> = self
            .post("/api/users/notes", &with_id("userId", user_id, page)?)
            .await?;
        Ok(self.bind_all(notes))
    }

    pub async fn follow(&self, user_id: &str) -> Result<()> {
        self.post_unit("/api/following/create", &json!({ "userId": user_id }))
            .await
    }

    pub async fn unfollow(&self, user_id: &str) -> Result<()> {
        self.post_unit("/api/following/delete", &json!({ "userId": user_id }))
            .await
    }

    pub async fn accept_follow_request(&self, user_id: &str) -> Result<()> {
        self.post_unit(
            "/api/following/requests/accept",
            &json!({ "userId": user_id }),
        )
        .await
    }

    pub async fn reject_follow_request(&self, user_id: &str) -> Result<()> {
        self.post_unit(
            "/api/following/requests/reject",
            &json!({ "userId": user_id }),
        )
        .await
    }
}
