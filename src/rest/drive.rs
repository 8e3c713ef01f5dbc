use std::path::Path;

use serde_json::json;

use super::Client;
use super::types::request::{FileQuery, FileUpload, FolderQuery, UploadRequest};
use crate::Result;
use crate::error::Error;
use crate::models::{DriveFile, DriveFolder, Entity};

impl Client {
    pub async fn drive_files(&self, query: &FileQuery) -> Result<Vec<Entity<DriveFile>>> {
        let files: Vec<DriveFile> = self.post("/api/drive/files", query).await?;
        Ok(self.bind_all(files))
    }

    /// Look up any file on the instance. Requires moderator rights.
    pub async fn show_file(&self, file_id: &str) -> Result<Entity<DriveFile>> {
        let file: DriveFile = self
            .post("/api/admin/drive/show-file", &json!({ "fileId": file_id }))
            .await?;
        Ok(self.bind(file))
    }

    pub async fn delete_file(&self, file_id: &str) -> Result<()> {
        self.post_unit("/api/drive/files/delete", &json!({ "fileId": file_id }))
            .await
    }

    /// Ask the server to fetch `url` into the drive.
    ///
    /// The upload completes asynchronously on the server; a streaming client receives
    /// a `urlUploadFinished` frame when it is done.
    pub async fn upload_from_url(
        &self,
        url: &str,
        folder_id: Option<&str>,
        is_sensitive: bool,
    ) -> Result<()> {
        self.post_unit(
            "/api/drive/files/upload-from-url",
            &json!({ "url": url, "folderId": folder_id, "isSensitive": is_sensitive }),
        )
        .await
    }

    /// Upload a local file to the drive. The file name defaults to the last path segment.
    pub async fn upload_file<P: AsRef<Path>>(
        &self,
        path: P,
        request: &UploadRequest,
    ) -> Result<Entity<DriveFile>> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                Error::validation(format!("{} has no usable file name", path.display()))
            })?;
        let bytes = tokio::fs::read(path).await?;

        self.upload_bytes(FileUpload::new(file_name, bytes), request)
            .await
    }

    pub async fn upload_bytes(
        &self,
        file: FileUpload,
        request: &UploadRequest,
    ) -> Result<Entity<DriveFile>> {
        let file: DriveFile = self
            .post_multipart("/api/drive/files/create", request, file)
            .await?;
        Ok(self.bind(file))
    }

    pub async fn drive_folders(&self, query: &FolderQuery) -> Result<Vec<Entity<DriveFolder>>> {
        let folders: Vec<DriveFolder> = self.post("/api/drive/folders", query).await?;
        Ok(self.bind_all(folders))
    }

    pub async fn create_folder(
        &self,
        name: &str,
        parent_id: Option<&str>,
    ) -> Result<Entity<DriveFolder>> {
        let folder: DriveFolder = self
            .post(
                "/api/drive/folders/create",
                &json!({ "name": name, "parentId": parent_id }),
            )
            .await?;
        Ok(self.bind(folder))
    }

    pub async fn delete_folder(&self, folder_id: &str) -> Result<()> {
        self.post_unit(
            "/api/drive/folders/delete",
            &json!({ "folderId": folder_id }),
        )
        .await
    }
}
