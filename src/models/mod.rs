//! Domain objects returned by the REST API and delivered by the streaming connection.
//!
//! Every object handed to user code is wrapped in an [`Entity`], which pairs the decoded
//! payload with the [`Client`] used for follow-up actions such as deleting a note or
//! accepting a follow request. Entities are created fresh for every response or frame and
//! compare equal when their payloads do, regardless of the attached client.

pub mod chat;
pub mod drive;
pub mod emoji;
pub mod instance;
pub mod note;
pub mod user;

use std::fmt;
use std::ops::Deref;

pub use chat::Chat;
pub use drive::{DriveFile, DriveFolder, FileProperties};
pub use emoji::Emoji;
pub use instance::{Announcement, FederatedInstance, InstanceMeta};
pub use note::{Note, Poll, PollChoice, Reaction, Visibility};
pub use user::{FollowRequest, Following, ProfileField, User};

use crate::rest::Client;

/// A domain object bound to the client that produced it.
#[derive(Clone)]
pub struct Entity<T> {
    value: T,
    client: Client,
}

impl<T> Entity<T> {
    pub(crate) fn new(value: T, client: Client) -> Self {
        Self { value, client }
    }

    /// The client used for follow-up actions on this object.
    #[must_use]
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Detach the payload from its client.
    #[must_use]
    pub fn into_inner(self) -> T {
        self.value
    }

    /// Bind another value to the same client.
    #[must_use]
    pub fn attach<U>(&self, value: U) -> Entity<U> {
        Entity::new(value, self.client.clone())
    }
}

impl<T> Deref for Entity<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T: PartialEq> PartialEq for Entity<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T: fmt::Debug> fmt::Debug for Entity<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.value, f)
    }
}
