//! REST example: instance metadata, drive folders and files, and a note with an attachment.
//!
//! Run with tracing enabled:
//! ```sh
//! MISSKEY_HOST=https://misskey.example MISSKEY_TOKEN=... RUST_LOG=info,hyper_util=off,hyper=off,reqwest=off,rustls=off cargo run --example drive --features tracing
//! ```

use misskey_client_sdk::Token;
use misskey_client_sdk::models::Visibility;
use misskey_client_sdk::rest::Client;
use misskey_client_sdk::rest::types::request::{
    AnnouncementsRequest, FileQuery, FileUpload, FolderQuery, NoteRequest, UploadRequest,
};
use tracing::{debug, error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let host = std::env::var("MISSKEY_HOST")?;
    let token = Token::new(std::env::var("MISSKEY_TOKEN")?);

    match Client::anonymous(&host)?.meta().await {
        Ok(meta) => info!(
            endpoint = "meta",
            name = ?meta.name,
            version = %meta.version,
            max_note_text_length = ?meta.max_note_text_length
        ),
        Err(e) => error!(endpoint = "meta", error = %e),
    }

    let client = Client::new(&host, token)?;

    let folders = client.drive_folders(&FolderQuery::default()).await?;
    info!(endpoint = "drive_folders", count = folders.len());

    let folder = match folders.into_iter().find(|folder| folder.name == "demo") {
        Some(folder) => folder,
        None => client.create_folder("demo", None).await?,
    };
    info!(folder = %folder.id, "Using folder");

    let announcements = client
        .announcements(&AnnouncementsRequest::builder().limit(5).build())
        .await?;
    for announcement in &announcements {
        info!(announcement = %announcement.id, title = %announcement.title);
    }

    let upload = FileUpload::new("hello.txt", b"hello from Rust".to_vec()).with_mime("text/plain");
    let uploaded = client
        .upload_bytes(upload, &UploadRequest::builder().folder_id(&folder.id).build())
        .await?;
    info!(file = %uploaded.id, size = uploaded.size, "Uploaded");

    let images = client
        .drive_files(
            &FileQuery::builder()
                .content_type("image/*")
                .limit(10)
                .build(),
        )
        .await?;
    for file in &images {
        debug!(
            file = %file.id,
            name = %file.name,
            size = file.size,
            content_type = ?file.content_type
        );
    }

    let Some(image) = images.first() else {
        info!("No images in the drive, nothing to post");
        return Ok(());
    };

    let request = NoteRequest::builder()
        .text(format!("Posting {}", image.name))
        .visibility(Visibility::Home)
        .file_ids(vec![image.id.clone()])
        .build();

    match client.create_note(&request).await {
        Ok(note) => {
            info!(endpoint = "create_note", note = %note.id, files = note.files.len());
            note.delete().await?;
            info!(endpoint = "delete_note", note = %note.id);
        }
        Err(e) => error!(endpoint = "create_note", error = %e, api_error = ?e.api_error()),
    }

    let in_folder = folder.files(Some(5)).await?;
    info!(endpoint = "drive_files", folder = %folder.id, count = in_folder.len());

    Ok(())
}
