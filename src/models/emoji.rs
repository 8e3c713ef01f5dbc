use serde::{Deserialize, Serialize};

use super::Entity;
use crate::Result;
use crate::error::Error;

/// A custom emoji registered on the instance.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Emoji {
    /// Absent on some server versions, which identify emoji by name only
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    pub category: Option<String>,
    pub host: Option<String>,
    pub url: Option<String>,
}

impl Emoji {
    /// The `:name:` shortcode used in note text.
    #[must_use]
    pub fn shortcode(&self) -> String {
        format!(":{}:", self.name)
    }
}

impl Entity<Emoji> {
    /// Remove this emoji from the instance. Requires moderator rights.
    pub async fn remove(&self) -> Result<()> {
        let id = self
            .id
            .as_deref()
            .ok_or_else(|| Error::validation(format!("emoji {} has no id", self.name)))?;

        self.client().remove_emoji(id).await
    }
}
