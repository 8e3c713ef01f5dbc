use serde::Deserialize;

use crate::models::Note;

/// Response of `/api/notes/create`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct CreatedNote {
    pub created_note: Note,
}
