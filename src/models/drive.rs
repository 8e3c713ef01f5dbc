use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Entity;
use crate::Result;
use crate::rest::types::request::FileQuery;

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    pub id: String,
    pub created_at: Option<DateTime<Utc>>,
    pub name: String,
    /// MIME type
    #[serde(rename = "type")]
    pub content_type: Option<String>,
    pub md5: Option<String>,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub is_sensitive: bool,
    pub blurhash: Option<String>,
    #[serde(default)]
    pub properties: FileProperties,
    pub url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub comment: Option<String>,
    pub folder_id: Option<String>,
    pub user_id: Option<String>,
}

#[non_exhaustive]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileProperties {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub orientation: Option<u8>,
    pub avg_color: Option<String>,
}

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFolder {
    pub id: String,
    pub created_at: Option<DateTime<Utc>>,
    pub name: String,
    pub folders_count: Option<u64>,
    pub files_count: Option<u64>,
    pub parent_id: Option<String>,
    pub parent: Option<Box<DriveFolder>>,
}

impl Entity<DriveFile> {
    pub async fn delete(&self) -> Result<()> {
        self.client().delete_file(&self.id).await
    }
}

impl Entity<DriveFolder> {
    pub async fn delete(&self) -> Result<()> {
        self.client().delete_folder(&self.id).await
    }

    /// Files stored directly in this folder.
    pub async fn files(&self, limit: Option<u32>) -> Result<Vec<Entity<DriveFile>>> {
        let query = FileQuery::builder()
            .folder_id(self.id.clone())
            .maybe_limit(limit)
            .build();

        self.client().drive_files(&query).await
    }

    pub async fn create_subfolder(&self, name: &str) -> Result<Entity<DriveFolder>> {
        self.client().create_folder(name, Some(&self.id)).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn drive_file_decodes_type_and_properties() {
        let file: DriveFile = serde_json::from_value(json!({
            "id": "f1",
            "createdAt": "2023-01-01T00:00:00.000Z",
            "name": "cat.png",
            "type": "image/png",
            "size": 1024,
            "isSensitive": false,
            "properties": { "width": 640, "height": 480 },
            "url": "https://misskey.example/files/cat.png",
            "folderId": null
        }))
        .expect("file should decode");

        assert_eq!(file.content_type.as_deref(), Some("image/png"));
        assert_eq!(file.properties.width, Some(640));
        assert_eq!(file.size, 1024);
    }
}
