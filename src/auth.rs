//! API token handling.
//!
//! Misskey authenticates REST calls with an `i` field in the JSON request body and the
//! streaming connection with an `i` query parameter on the WebSocket URL. Both use the
//! same access token, held here as a [`SecretString`] so it never shows up in debug
//! output or logs.

/// Secret string types that redact values in debug output for security.
pub use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value};
use url::Url;

/// Name of the body field and query parameter carrying the access token.
pub const TOKEN_FIELD: &str = "i";

/// Access token for a Misskey account.
#[derive(Clone, Debug)]
pub struct Token(SecretString);

impl Token {
    #[must_use]
    pub fn new<S: Into<String>>(token: S) -> Self {
        Self(SecretString::from(token.into()))
    }

    /// Returns the secret token.
    #[must_use]
    pub fn secret(&self) -> &SecretString {
        &self.0
    }

    /// Insert the token into a JSON request body.
    ///
    /// A `null` body becomes an object holding only the token. Non-object bodies are left
    /// untouched, since the API only accepts objects.
    pub(crate) fn authorize_body(&self, body: &mut Value) {
        if body.is_null() {
            *body = Value::Object(Map::new());
        }

        if let Value::Object(map) = body {
            map.insert(
                TOKEN_FIELD.to_owned(),
                Value::String(self.0.expose_secret().to_owned()),
            );
        }
    }

    /// Append the token to a streaming endpoint as `?i=<token>`.
    pub(crate) fn authorize_url(&self, endpoint: &Url) -> Url {
        let mut url = endpoint.clone();
        url.query_pairs_mut()
            .append_pair(TOKEN_FIELD, self.0.expose_secret());
        url
    }
}

impl From<&str> for Token {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<String> for Token {
    fn from(token: String) -> Self {
        Self::new(token)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn token_is_redacted_in_debug_output() {
        let token = Token::new("super-secret");
        assert!(!format!("{token:?}").contains("super-secret"));
    }

    #[test]
    fn authorize_body_inserts_token() {
        let token = Token::new("abc");
        let mut body = json!({ "noteId": "n1" });

        token.authorize_body(&mut body);

        assert_eq!(body, json!({ "noteId": "n1", "i": "abc" }));
    }

    #[test]
    fn authorize_null_body_creates_object() {
        let token = Token::new("abc");
        let mut body = Value::Null;

        token.authorize_body(&mut body);

        assert_eq!(body, json!({ "i": "abc" }));
    }

    #[test]
    fn authorize_url_appends_query() {
        let token = Token::new("abc");
        let endpoint = Url::parse("wss://misskey.example/streaming").expect("valid url");

        let url = token.authorize_url(&endpoint);

        assert_eq!(url.as_str(), "wss://misskey.example/streaming?i=abc");
    }
}
