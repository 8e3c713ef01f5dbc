use serde_json::json;

use super::Client;
use super::types::request::{NoteRequest, Page};
use super::types::response::CreatedNote;
use crate::Result;
use crate::models::{Entity, Note};

/// Merge `{ key: id }` into a serialized paging object.
pub(super) fn with_id(key: &str, id: &str, page: &Page) -> Result<serde_json::Value> {
    let mut body = serde_json::to_value(page)?;
    if let Some(map) = body.as_object_mut() {
        map.insert(key.to_owned(), json!(id));
    }
    Ok(body)
}

impl Client {
    /// Post a new note.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the request has neither text, files, a renote nor a
    /// poll, otherwise any transport or API error.
    pub async fn create_note(&self, request: &NoteRequest) -> Result<Entity<Note>> {
        request.validate()?;

        let created: CreatedNote = self.post("/api/notes/create", request).await?;
        Ok(self.bind(created.created_note))
    }

    pub async fn show_note(&self, note_id: &str) -> Result<Entity<Note>> {
        let note: Note = self
            .post("/api/notes/show", &json!({ "noteId": note_id }))
            .await?;
        Ok(self.bind(note))
    }

    pub async fn delete_note(&self, note_id: &str) -> Result<()> {
        self.post_unit("/api/notes/delete", &json!({ "noteId": note_id }))
            .await
    }

    pub async fn note_replies(&self, note_id: &str, page: &Page) -> Result<Vec<Entity<Note>>> {
        let notes: Vec<Note> = self
            .post("/api/notes/replies", &with_id("noteId", note_id, page)?)
            .await?;
        Ok(self.bind_all(notes))
    }

    pub async fn renote(&self, note_id: &str) -> Result<Entity<Note>> {
        let request = NoteRequest::builder().renote_id(note_id).build();
        self.create_note(&request).await
    }

    /// React to a note with a unicode emoji or a `:custom:` emoji shortcode.
    pub async fn create_reaction(&self, note_id: &str, reaction: &str) -> Result<()> {
        self.post_unit(
            "/api/notes/reactions/create",
            &json!({ "noteId": note_id, "reaction": reaction }),
        )
        .await
    }

    pub async fn delete_reaction(&self, note_id: &str) -> Result<()> {
        self.post_unit("/api/notes/reactions/delete", &json!({ "noteId": note_id }))
            .await
    }

    pub async fn favorite_note(&self, note_id: &str) -> Result<()> {
        self.post_unit("/api/notes/favorites/create", &json!({ "noteId": note_id }))
            .await
    }

    pub async fn unfavorite_note(&self, note_id: &str) -> Result<()> {
        self.post_unit("/api/notes/favorites/delete", &json!({ "noteId": note_id }))
            .await
    }

    pub async fn add_note_to_clip(&self, clip_id: &str, note_id: &str) -> Result<()> {
        self.post_unit(
            "/api/clips/add-note",
            &json!({ "clipId": clip_id, "noteId": note_id }),
        )
        .await
    }
}
