//! Frame routing.
//!
//! Every inbound frame carries a type tag. The tag is normalized to
//! `SCREAMING_SNAKE_CASE` and looked up in a static dispatch table, which either names
//! the event to emit and the domain type to decode, marks the tag as a known no-op, or
//! points at one of the two envelope handlers: `CHANNEL`, which unwraps a
//! channel-scoped frame exactly once, and `NOTIFICATION`, which forwards only the
//! notification kinds in the [`NotificationFilter`].

use bitflags::bitflags;
use phf::phf_map;
use serde_json::{Map, Value};

use super::dispatcher::EventDispatcher;
use super::event::{Event, EventName};
use crate::Result;
use crate::error::Error;
use crate::rest::Client;
use crate::serde_helpers::{deserialize_with_warnings, normalize_tag};
use crate::ws::WsError;

/// Domain type a payload is decoded into.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Note,
    Chat,
    User,
    FollowRequest,
    Reaction,
    /// The payload wraps the emoji as `{ "emoji": { ... } }`
    Emoji,
}

/// What the router does with a tag.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    /// Decode the payload and dispatch it under the event name
    Emit(EventName, PayloadKind),
    /// Unwrap `{ id, type, body }` and route `body` under `type`
    Channel,
    /// Route the whole notification under its `type`, if allowed
    Notification,
    /// Known tag without a handler
    Ignore,
}

/// Outcome of routing one frame.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Routed {
    /// Callbacks registered under the event name were invoked
    Dispatched(EventName),
    /// The tag is registered as a no-op
    Ignored(&'static str),
    /// A notification whose kind is not in the filter
    Filtered(String),
    /// A channel frame inside a channel frame
    NestedEnvelope,
    /// The tag is not in the dispatch table
    Unknown(String),
}

pub(crate) static DISPATCH_TABLE: phf::Map<&'static str, Handler> = phf_map! {
    "CHANNEL" => Handler::Channel,
    "NOTIFICATION" => Handler::Notification,
    "NOTE" => Handler::Emit(EventName::Message, PayloadKind::Note),
    "REPLY" => Handler::Emit(EventName::Message, PayloadKind::Note),
    "MENTION" => Handler::Emit(EventName::Mention, PayloadKind::Note),
    "FOLLOW" => Handler::Emit(EventName::UserFollow, PayloadKind::User),
    "FOLLOWED" => Handler::Emit(EventName::Follow, PayloadKind::User),
    "RECEIVE_FOLLOW_REQUEST" => Handler::Emit(EventName::FollowRequest, PayloadKind::FollowRequest),
    "REACTION" => Handler::Emit(EventName::Reaction, PayloadKind::Reaction),
    "MESSAGING_MESSAGE" => Handler::Emit(EventName::Message, PayloadKind::Chat),
    "UNREAD_MESSAGING_MESSAGE" => Handler::Emit(EventName::Message, PayloadKind::Chat),
    "EMOJI_ADDED" => Handler::Emit(EventName::EmojiAdd, PayloadKind::Emoji),
    "RENOTE" => Handler::Ignore,
    "UNFOLLOW" => Handler::Ignore,
    "SIGNIN" => Handler::Ignore,
    "ME_UPDATED" => Handler::Ignore,
    "READ_ALL_ANNOUNCEMENTS" => Handler::Ignore,
    "DRIVE_FILE_CREATED" => Handler::Ignore,
    "READ_ALL_UNREAD_MENTIONS" => Handler::Ignore,
    "READ_ALL_UNREAD_SPECIFIED_NOTES" => Handler::Ignore,
    "READ_ALL_CHANNELS" => Handler::Ignore,
    "READ_ALL_NOTIFICATIONS" => Handler::Ignore,
    "URL_UPLOAD_FINISHED" => Handler::Ignore,
    "UNREAD_MENTION" => Handler::Ignore,
    "UNREAD_SPECIFIED_NOTE" => Handler::Ignore,
    "READ_ALL_MESSAGING_MESSAGES" => Handler::Ignore,
    "FOLLOW_REQUEST_ACCEPTED" => Handler::Ignore,
    "POLL_VOTE" => Handler::Ignore,
    "UNREAD_NOTIFICATION" => Handler::Ignore,
};

/// Tags the router itself relies on.
const REQUIRED_TAGS: [&str; 3] = ["CHANNEL", "NOTIFICATION", "REACTION"];

bitflags! {
    /// Notification kinds forwarded by the `NOTIFICATION` handler.
    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct NotificationFilter: u8 {
        const NONE = 0;

        /// Someone reacted to one of our notes.
        const REACTION = 1;

        /// Someone voted in one of our polls. Routed to a no-op.
        const POLL_VOTE = 1 << 1;

        /// A follow request we sent was accepted. Routed to a no-op.
        const FOLLOW_REQUEST_ACCEPTED = 1 << 2;

        const ALL = Self::REACTION.bits()
            | Self::POLL_VOTE.bits()
            | Self::FOLLOW_REQUEST_ACCEPTED.bits();
    }
}

impl Default for NotificationFilter {
    fn default() -> Self {
        Self::REACTION
    }
}

impl NotificationFilter {
    /// Get the flag for a notification `type` string, in any casing.
    #[must_use]
    pub fn from_type(kind: &str) -> Self {
        match normalize_tag(kind).as_str() {
            "REACTION" => Self::REACTION,
            "POLL_VOTE" => Self::POLL_VOTE,
            "FOLLOW_REQUEST_ACCEPTED" => Self::FOLLOW_REQUEST_ACCEPTED,
            _ => Self::NONE,
        }
    }

    #[must_use]
    pub fn allows(&self, kind: &str) -> bool {
        let flag = Self::from_type(kind);
        !flag.is_empty() && self.contains(flag)
    }
}

/// Routes decoded frames to the [`EventDispatcher`].
#[derive(Clone, Debug)]
pub struct Router {
    client: Client,
    dispatcher: EventDispatcher,
    notifications: NotificationFilter,
}

impl Router {
    /// # Errors
    ///
    /// Returns an error if the dispatch table lacks one of the tags the router needs.
    pub fn new(
        client: Client,
        dispatcher: EventDispatcher,
        notifications: NotificationFilter,
    ) -> Result<Self> {
        validate_table(&DISPATCH_TABLE)?;

        Ok(Self {
            client,
            dispatcher,
            notifications,
        })
    }

    /// Route a raw `{ "type": ..., "body": ... }` frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame has no string `type` or its payload cannot be
    /// decoded into the domain type of the tag.
    pub async fn route_frame(&self, frame: Value) -> Result<Routed> {
        let Value::Object(mut frame) = frame else {
            return Err(WsError::InvalidMessage("frame is not a JSON object".to_owned()).into());
        };
        let tag = take_tag(&mut frame, "frame")?;
        let payload = frame.remove("body").unwrap_or(Value::Null);

        self.route(&tag, payload).await
    }

    /// Route `payload` under `tag`.
    ///
    /// # Errors
    ///
    /// Returns an error if an envelope is malformed or the payload cannot be decoded.
    /// Unknown tags are not errors.
    pub async fn route(&self, tag: &str, payload: Value) -> Result<Routed> {
        let mut tag = normalize_tag(tag);
        let mut payload = payload;
        let mut unwrapped = false;

        loop {
            let Some((&key, handler)) = DISPATCH_TABLE.get_entry(tag.as_str()) else {
                #[cfg(feature = "tracing")]
                tracing::debug!(%tag, "No handler for tag, dropping frame");
                return Ok(Routed::Unknown(tag));
            };

            match *handler {
                Handler::Emit(name, kind) => {
                    let event = self.build(kind, payload)?;
                    self.dispatcher.dispatch(name, event).await;
                    return Ok(Routed::Dispatched(name));
                }
                Handler::Ignore => return Ok(Routed::Ignored(key)),
                Handler::Channel => {
                    if unwrapped {
                        return Ok(Routed::NestedEnvelope);
                    }

                    let Value::Object(mut envelope) = payload else {
                        return Err(WsError::InvalidMessage(
                            "channel body is not a JSON object".to_owned(),
                        )
                        .into());
                    };
                    tag = normalize_tag(&take_tag(&mut envelope, "channel body")?);
                    payload = envelope.remove("body").unwrap_or(Value::Null);
                    unwrapped = true;
                }
                Handler::Notification => {
                    let kind = payload
                        .get("type")
                        .and_then(Value::as_str)
                        .ok_or_else(|| {
                            WsError::InvalidMessage("notification without a type".to_owned())
                        })?
                        .to_owned();

                    if !self.notifications.allows(&kind) {
                        return Ok(Routed::Filtered(kind));
                    }
                    tag = normalize_tag(&kind);
                }
            }
        }
    }

    fn build(&self, kind: PayloadKind, payload: Value) -> Result<Event> {
        let client = &self.client;

        Ok(match kind {
            PayloadKind::Note => Event::Note(client.bind(deserialize_with_warnings(payload)?)),
            PayloadKind::Chat => Event::Chat(client.bind(deserialize_with_warnings(payload)?)),
            PayloadKind::User => Event::User(client.bind(deserialize_with_warnings(payload)?)),
            PayloadKind::FollowRequest => {
                Event::FollowRequest(client.bind(deserialize_with_warnings(payload)?))
            }
            PayloadKind::Reaction => {
                Event::Reaction(client.bind(deserialize_with_warnings(payload)?))
            }
            PayloadKind::Emoji => {
                let emoji = match payload {
                    Value::Object(mut map) => map.remove("emoji"),
                    _ => None,
                }
                .ok_or_else(|| WsError::InvalidMessage("emoji event without emoji".to_owned()))?;

                Event::Emoji(client.bind(deserialize_with_warnings(emoji)?))
            }
        })
    }
}

fn take_tag(object: &mut Map<String, Value>, what: &str) -> Result<String> {
    match object.remove("type") {
        Some(Value::String(tag)) => Ok(tag),
        _ => Err(WsError::InvalidMessage(format!("{what} without a string type")).into()),
    }
}

fn validate_table(table: &phf::Map<&'static str, Handler>) -> Result<()> {
    for tag in REQUIRED_TAGS {
        if !table.contains_key(tag) {
            return Err(Error::validation(format!(
                "dispatch table has no handler for {tag}"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use reqwest::Method;
    use serde_json::json;

    use super::*;
    use crate::error::Kind;
    use crate::rest::Requester;

    type Calls = Arc<Mutex<Vec<(String, Value)>>>;

    #[derive(Default)]
    struct RecordingRequester {
        calls: Calls,
    }

    #[async_trait]
    impl Requester for RecordingRequester {
        async fn request(
            &self,
            _method: Method,
            path: &str,
            body: Value,
            _auth: bool,
        ) -> Result<Value> {
            self.calls
                .lock()
                .expect("lock")
                .push((path.to_owned(), body));
            Ok(Value::Null)
        }
    }

    struct Harness {
        router: Router,
        events: Arc<Mutex<Vec<(EventName, Event)>>>,
        calls: Calls,
    }

    fn harness(notifications: NotificationFilter) -> Harness {
        let requester = RecordingRequester::default();
        let calls = Arc::clone(&requester.calls);
        let client = Client::with_requester(Arc::new(requester));
        let dispatcher = EventDispatcher::new();
        let events = Arc::new(Mutex::new(Vec::new()));

        for name in [
            EventName::Message,
            EventName::Mention,
            EventName::Follow,
            EventName::UserFollow,
            EventName::FollowRequest,
            EventName::Reaction,
            EventName::EmojiAdd,
        ] {
            let events = Arc::clone(&events);
            dispatcher.on(name, move |event| {
                let events = Arc::clone(&events);
                async move {
                    events.lock().expect("lock").push((name, event));
                    Ok::<(), Error>(())
                }
            });
        }

        let router = Router::new(client, dispatcher, notifications).expect("table is valid");
        Harness {
            router,
            events,
            calls,
        }
    }

    fn note(id: &str) -> Value {
        json!({
            "id": id,
            "createdAt": "2023-01-01T00:00:00.000Z",
            "userId": "u1",
            "text": "hi"
        })
    }

    fn user(id: &str) -> Value {
        json!({ "id": id, "username": "alice", "host": null })
    }

    fn reaction_notification(kind: &str) -> Value {
        json!({
            "id": "r1",
            "createdAt": "2023-01-01T00:00:00.000Z",
            "type": kind,
            "userId": "u2",
            "reaction": ":blobcat:",
            "note": note("n1")
        })
    }

    #[tokio::test]
    async fn known_tags_route_to_their_event() -> anyhow::Result<()> {
        let cases = [
            ("note", note("n1"), EventName::Message),
            ("reply", note("n1"), EventName::Message),
            ("mention", note("n1"), EventName::Mention),
            ("follow", user("u1"), EventName::UserFollow),
            ("followed", user("u1"), EventName::Follow),
            ("receiveFollowRequest", user("u1"), EventName::FollowRequest),
            ("messagingMessage", json!({ "id": "c1" }), EventName::Message),
            ("unreadMessagingMessage", json!({ "id": "c1" }), EventName::Message),
            (
                "emojiAdded",
                json!({ "emoji": { "name": "blobcat", "aliases": [] } }),
                EventName::EmojiAdd,
            ),
        ];

        for (tag, payload, expected) in cases {
            let harness = harness(NotificationFilter::default());

            let routed = harness.router.route(tag, payload).await?;

            assert_eq!(routed, Routed::Dispatched(expected), "tag {tag}");
            let events = harness.events.lock().expect("lock");
            assert_eq!(events.len(), 1, "tag {tag}");
            assert_eq!(events[0].0, expected, "tag {tag}");
        }

        Ok(())
    }

    #[tokio::test]
    async fn payload_types_match_the_table() -> anyhow::Result<()> {
        let harness = harness(NotificationFilter::default());

        harness.router.route("note", note("n1")).await?;
        harness
            .router
            .route("messaging_message", json!({ "id": "c1" }))
            .await?;
        harness
            .router
            .route("RECEIVE_FOLLOW_REQUEST", user("u9"))
            .await?;

        let events = harness.events.lock().expect("lock");
        assert_eq!(events[0].1.as_note().map(|n| n.id.as_str()), Some("n1"));
        assert_eq!(events[1].1.as_chat().map(|c| c.id.as_str()), Some("c1"));
        assert!(matches!(&events[2].1, Event::FollowRequest(request) if request.from.id == "u9"));

        Ok(())
    }

    #[tokio::test]
    async fn unknown_tag_is_not_an_error() -> anyhow::Result<()> {
        let harness = harness(NotificationFilter::default());

        let routed = harness.router.route("somethingNew", json!({})).await?;

        assert_eq!(routed, Routed::Unknown("SOMETHING_NEW".to_owned()));
        assert!(harness.events.lock().expect("lock").is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn registered_no_ops_are_ignored() -> anyhow::Result<()> {
        let harness = harness(NotificationFilter::default());

        for tag in ["renote", "readAllNotifications", "urlUploadFinished", "unreadNotification"] {
            let routed = harness.router.route(tag, json!({})).await?;
            assert!(matches!(routed, Routed::Ignored(_)), "tag {tag}");
        }
        assert!(harness.events.lock().expect("lock").is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn channel_unwrap_equals_direct_route() -> anyhow::Result<()> {
        let direct = harness(NotificationFilter::default());
        let wrapped = harness(NotificationFilter::default());

        let direct_routed = direct.router.route("reply", note("n1")).await?;
        let wrapped_routed = wrapped
            .router
            .route_frame(json!({
                "type": "channel",
                "body": { "id": "x", "type": "reply", "body": note("n1") }
            }))
            .await?;

        assert_eq!(direct_routed, wrapped_routed);
        assert_eq!(
            direct.events.lock().expect("lock")[0].1,
            wrapped.events.lock().expect("lock")[0].1
        );
        Ok(())
    }

    #[tokio::test]
    async fn nested_channel_is_dropped() -> anyhow::Result<()> {
        let harness = harness(NotificationFilter::default());

        let routed = harness
            .router
            .route(
                "channel",
                json!({
                    "id": "outer",
                    "type": "channel",
                    "body": { "id": "inner", "type": "note", "body": note("n1") }
                }),
            )
            .await?;

        assert_eq!(routed, Routed::NestedEnvelope);
        assert!(harness.events.lock().expect("lock").is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn notifications_respect_the_filter() -> anyhow::Result<()> {
        let harness = harness(NotificationFilter::default());

        let reaction = harness
            .router
            .route("notification", reaction_notification("reaction"))
            .await?;
        let follow = harness
            .router
            .route("notification", reaction_notification("follow"))
            .await?;
        let poll_vote = harness
            .router
            .route("notification", reaction_notification("pollVote"))
            .await?;

        assert_eq!(reaction, Routed::Dispatched(EventName::Reaction));
        assert_eq!(follow, Routed::Filtered("follow".to_owned()));
        assert_eq!(poll_vote, Routed::Filtered("pollVote".to_owned()));

        let events = harness.events.lock().expect("lock");
        assert_eq!(events.len(), 1);
        let Event::Reaction(reaction) = &events[0].1 else {
            panic!("expected a reaction event");
        };
        assert_eq!(reaction.reaction.as_deref(), Some(":blobcat:"));
        Ok(())
    }

    #[tokio::test]
    async fn main_channel_reaction_notification_is_dispatched() -> anyhow::Result<()> {
        let harness = harness(NotificationFilter::default());
        let frame = json!({
            "type": "channel",
            "body": {
                "id": "main-1",
                "type": "notification",
                "body": reaction_notification("reaction")
            }
        });

        let routed = harness.router.route_frame(frame).await?;

        assert_eq!(routed, Routed::Dispatched(EventName::Reaction));
        let events = harness.events.lock().expect("lock");
        assert_eq!(events.len(), 1);
        let Event::Reaction(reaction) = &events[0].1 else {
            panic!("expected a reaction event");
        };
        assert_eq!(reaction.id, "r1");
        assert_eq!(
            reaction.reacted_note().map(|note| note.id.clone()),
            Some("n1".to_owned())
        );
        Ok(())
    }

    #[tokio::test]
    async fn extended_filter_forwards_more_kinds() -> anyhow::Result<()> {
        let harness = harness(NotificationFilter::REACTION | NotificationFilter::POLL_VOTE);

        let routed = harness
            .router
            .route("notification", reaction_notification("pollVote"))
            .await?;

        assert_eq!(routed, Routed::Ignored("POLL_VOTE"));
        Ok(())
    }

    #[tokio::test]
    async fn malformed_payload_is_an_error() {
        let harness = harness(NotificationFilter::default());

        harness
            .router
            .route("note", json!({ "text": "no id" }))
            .await
            .unwrap_err();
        let missing_type = harness
            .router
            .route_frame(json!({ "body": {} }))
            .await
            .unwrap_err();

        assert_eq!(missing_type.kind(), Kind::WebSocket);
        assert!(harness.events.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn redelivered_frames_produce_equal_independent_objects() -> anyhow::Result<()> {
        let harness = harness(NotificationFilter::default());

        harness.router.route("note", note("n1")).await?;
        harness.router.route("note", note("n1")).await?;

        let events = harness.events.lock().expect("lock");
        let (Some(first), Some(second)) = (events[0].1.as_note(), events[1].1.as_note()) else {
            panic!("expected two notes");
        };
        assert_eq!(first, second);
        assert!(!std::ptr::eq(&**first, &**second));
        Ok(())
    }

    #[tokio::test]
    async fn dispatched_objects_carry_the_rest_handle() -> anyhow::Result<()> {
        let harness = harness(NotificationFilter::default());

        harness.router.route("mention", note("n7")).await?;
        let note = harness.events.lock().expect("lock")[0]
            .1
            .as_note()
            .cloned()
            .expect("a note");
        note.delete().await?;

        let calls = harness.calls.lock().expect("lock");
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "/api/notes/delete");
        assert_eq!(calls[0].1, json!({ "noteId": "n7" }));
        Ok(())
    }

    #[test]
    fn table_missing_required_tag_is_rejected() {
        static INCOMPLETE: phf::Map<&'static str, Handler> = phf_map! {
            "NOTIFICATION" => Handler::Notification,
            "REACTION" => Handler::Emit(EventName::Reaction, PayloadKind::Reaction),
        };

        let err = validate_table(&INCOMPLETE).unwrap_err();
        assert_eq!(err.kind(), Kind::Validation);
        validate_table(&DISPATCH_TABLE).expect("built-in table is complete");
    }

    #[test]
    fn notification_filter_matches_any_casing() {
        assert!(NotificationFilter::default().allows("reaction"));
        assert!(NotificationFilter::ALL.allows("follow_request_accepted"));
        assert!(!NotificationFilter::ALL.allows("follow"));
        assert_eq!(NotificationFilter::from_type("pollVote"), NotificationFilter::POLL_VOTE);
    }
}
