use strum_macros::{AsRefStr, Display, IntoStaticStr};

use crate::models::{Chat, Emoji, Entity, FollowRequest, Note, Reaction, User};

/// Key under which callbacks are registered. Several frame tags map to one name.
#[non_exhaustive]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum EventName {
    /// First successful connection
    Ready,
    /// Successful connection after a lost one
    Reconnect,
    /// An established connection was lost
    Disconnect,
    /// A note (new, reply) or a direct message
    Message,
    Mention,
    /// Someone followed the account
    Follow,
    /// The account followed someone
    UserFollow,
    FollowRequest,
    Reaction,
    EmojiAdd,
}

/// A typed event handed to callbacks.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Ready,
    Reconnect,
    Disconnect,
    Note(Entity<Note>),
    Chat(Entity<Chat>),
    User(Entity<User>),
    FollowRequest(Entity<FollowRequest>),
    Reaction(Entity<Reaction>),
    Emoji(Entity<Emoji>),
}

impl Event {
    #[must_use]
    pub fn as_note(&self) -> Option<&Entity<Note>> {
        match self {
            Self::Note(note) => Some(note),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_chat(&self) -> Option<&Entity<Chat>> {
        match self {
            Self::Chat(chat) => Some(chat),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_names_are_snake_case() {
        assert_eq!(EventName::UserFollow.as_ref(), "user_follow");
        assert_eq!(EventName::EmojiAdd.to_string(), "emoji_add");
        assert_eq!(EventName::FollowRequest.as_ref(), "follow_request");
        let name: &'static str = EventName::Ready.into();
        assert_eq!(name, "ready");
    }
}
