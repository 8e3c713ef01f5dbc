use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use url::Url;

use super::http::HttpRequester;
use super::types::request::FileUpload;
use crate::Result;
use crate::auth::Token;
use crate::error::Error;
use crate::models::Entity;
use crate::serde_helpers;

/// Transport for REST calls.
///
/// Implementations send `body` to `path` and return the decoded JSON response, `null`
/// for an empty response. When `auth` is set the implementation is responsible for
/// attaching the access token. Failures are returned as [`crate::error::Error`], never
/// panics.
#[async_trait]
pub trait Requester: Send + Sync + 'static {
    async fn request(&self, method: Method, path: &str, body: Value, auth: bool) -> Result<Value>;

    /// Send a `multipart/form-data` upload: every entry of `fields` as a text part and
    /// `file` as the `file` part.
    ///
    /// Transports that cannot upload keep the default, which fails with a validation
    /// error.
    async fn upload(
        &self,
        path: &str,
        _fields: Map<String, Value>,
        _file: FileUpload,
        _auth: bool,
    ) -> Result<Value> {
        Err(Error::validation(format!(
            "{path} needs a transport that supports uploads"
        )))
    }
}

/// Handle to the REST API, shared by every domain object for follow-up actions.
#[derive(Clone)]
pub struct Client {
    requester: Arc<dyn Requester>,
    host: Option<Url>,
}

impl Client {
    /// Creates a client for `host` authenticated with `token`.
    ///
    /// # Errors
    ///
    /// Returns an error if the host URL is invalid or the HTTP client fails to build.
    pub fn new(host: &str, token: Token) -> Result<Self> {
        Ok(Self::from_http(HttpRequester::new(host, Some(token))?))
    }

    /// Creates a client without credentials. Only public endpoints such as
    /// [`Client::meta`] succeed; authenticated calls fail with a validation error.
    ///
    /// # Errors
    ///
    /// Returns an error if the host URL is invalid or the HTTP client fails to build.
    pub fn anonymous(host: &str) -> Result<Self> {
        Ok(Self::from_http(HttpRequester::new(host, None)?))
    }

    fn from_http(requester: HttpRequester) -> Self {
        let host = requester.host().clone();
        Self {
            requester: Arc::new(requester),
            host: Some(host),
        }
    }

    /// Creates a client over a custom transport.
    #[must_use]
    pub fn with_requester(requester: Arc<dyn Requester>) -> Self {
        Self {
            requester,
            host: None,
        }
    }

    /// The REST host, if the client was built from one.
    #[must_use]
    pub fn host(&self) -> Option<&Url> {
        self.host.as_ref()
    }

    /// Call an endpoint that has no typed wrapper.
    ///
    /// # Errors
    ///
    /// Returns the transport error, or a status error for non-2xx responses.
    pub async fn request(&self, path: &str, body: Value, auth: bool) -> Result<Value> {
        self.requester.request(Method::POST, path, body, auth).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let value = self.request(path, serde_json::to_value(body)?, true).await?;
        serde_helpers::deserialize_with_warnings(value)
    }

    /// Same as [`Client::post`] for endpoints whose response carries nothing of interest.
    pub(crate) async fn post_unit<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<()> {
        self.request(path, serde_json::to_value(body)?, true).await?;
        Ok(())
    }

    pub(crate) async fn post_multipart<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        fields: &B,
        file: FileUpload,
    ) -> Result<T> {
        let Value::Object(fields) = serde_json::to_value(fields)? else {
            return Err(Error::validation(format!(
                "{path} form fields must serialize to an object"
            )));
        };

        let value = self.requester.upload(path, fields, file, true).await?;
        serde_helpers::deserialize_with_warnings(value)
    }

    pub(crate) fn bind<T>(&self, value: T) -> Entity<T> {
        Entity::new(value, self.clone())
    }

    pub(crate) fn bind_all<T>(&self, values: Vec<T>) -> Vec<Entity<T>> {
        values.into_iter().map(|value| self.bind(value)).collect()
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("host", &self.host.as_ref().map(Url::as_str))
            .finish_non_exhaustive()
    }
}
