#![allow(
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    reason = "Do not need additional syntax for setting up tests, and https://github.com/rust-lang/rust-clippy/issues/13981"
)]
#![allow(
    unused,
    reason = "Not every test binary uses every fixture"
)]

use httpmock::MockServer;
use misskey_client_sdk::Token;
use misskey_client_sdk::rest::Client;
use serde_json::{Value, json};

pub const TOKEN: &str = "0123456789abcdef";
pub const CREATED_AT: &str = "2024-03-01T12:00:00.000Z";

#[must_use]
pub fn client(server: &MockServer) -> Client {
    Client::new(&server.base_url(), Token::new(TOKEN)).unwrap()
}

#[must_use]
pub fn user_json(id: &str, username: &str) -> Value {
    json!({
        "id": id,
        "username": username,
        "name": null,
        "host": null,
        "avatarUrl": format!("https://misskey.example/avatar/{id}"),
        "isBot": false,
        "isCat": true,
        "onlineStatus": "online"
    })
}

#[must_use]
pub fn note_json(id: &str, text: &str) -> Value {
    json!({
        "id": id,
        "createdAt": CREATED_AT,
        "userId": "u1",
        "user": user_json("u1", "alice"),
        "text": text,
        "cw": null,
        "visibility": "home",
        "renoteCount": 0,
        "repliesCount": 1,
        "reactions": { ":blobcat:": 2 },
        "fileIds": [],
        "files": [],
        "replyId": null,
        "renoteId": null
    })
}

#[must_use]
pub fn chat_json(id: &str, text: &str) -> Value {
    json!({
        "id": id,
        "createdAt": CREATED_AT,
        "text": text,
        "userId": "u2",
        "recipientId": "u1",
        "isRead": false
    })
}

/// Body sent by an authenticated call: `body` plus the access token.
#[must_use]
pub fn authorized(mut body: Value) -> Value {
    body.as_object_mut()
        .unwrap()
        .insert("i".to_owned(), json!(TOKEN));
    body
}
