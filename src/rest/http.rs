use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{
    Client as ReqwestClient, Method, Request, StatusCode,
    header::{HeaderMap, HeaderValue},
};
use secrecy::ExposeSecret as _;
use serde_json::{Map, Value};
use url::Url;

use super::client::Requester;
use super::types::request::FileUpload;
use crate::Result;
use crate::auth::{TOKEN_FIELD, Token};
use crate::error::Error;

/// [`Requester`] backed by `reqwest`.
#[derive(Clone, Debug)]
pub struct HttpRequester {
    host: Url,
    client: ReqwestClient,
    token: Option<Token>,
}

impl HttpRequester {
    /// # Errors
    ///
    /// Returns an error if the host URL is invalid or the HTTP client fails to build.
    pub fn new(host: &str, token: Option<Token>) -> Result<Self> {
        let mut headers = HeaderMap::new();

        headers.insert("User-Agent", HeaderValue::from_static("misskey_client_sdk"));
        headers.insert("Accept", HeaderValue::from_static("application/json"));
        headers.insert("Connection", HeaderValue::from_static("keep-alive"));
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = ReqwestClient::builder().default_headers(headers).build()?;

        Ok(Self {
            host: Url::parse(host)?,
            client,
            token,
        })
    }

    #[must_use]
    pub fn host(&self) -> &Url {
        &self.host
    }
}

impl HttpRequester {
    fn token_for(&self, path: &str) -> Result<&Token> {
        self.token
            .as_ref()
            .ok_or_else(|| Error::validation(format!("{path} requires an access token")))
    }

    /// Send `request` and decode the JSON response, `null` for an empty one.
    async fn execute(&self, method: Method, path: &str, request: Request) -> Result<Value> {
        let response = self.client.execute(request).await?;
        let status_code = response.status();

        #[cfg(feature = "tracing")]
        tracing::Span::current().record("status_code", status_code.as_u16());

        if !status_code.is_success() {
            let message = response.text().await.unwrap_or_default();

            #[cfg(feature = "tracing")]
            tracing::warn!(
                status = %status_code,
                method = %method,
                path = %path,
                message = %message,
                "API request failed"
            );

            return Err(Error::status(status_code, method, path.to_owned(), message));
        }

        if status_code == StatusCode::NO_CONTENT {
            return Ok(Value::Null);
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(Value::Null);
        }

        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl Requester for HttpRequester {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            level = "debug",
            skip(self, body),
            fields(status_code)
        )
    )]
    async fn request(&self, method: Method, path: &str, body: Value, auth: bool) -> Result<Value> {
        let mut body = match body {
            Value::Null => Value::Object(Map::new()),
            other => other,
        };

        if auth {
            self.token_for(path)?.authorize_body(&mut body);
        }

        let url = self.host.join(path)?;
        let request = self.client.request(method.clone(), url).json(&body).build()?;

        self.execute(method, path, request).await
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            level = "debug",
            skip(self, fields, file),
            fields(file_name = %file.file_name, size = file.bytes.len(), status_code)
        )
    )]
    async fn upload(
        &self,
        path: &str,
        fields: Map<String, Value>,
        file: FileUpload,
        auth: bool,
    ) -> Result<Value> {
        let mut form = Form::new();
        for (key, value) in fields {
            let text = match value {
                Value::Null => continue,
                Value::String(text) => text,
                other => other.to_string(),
            };
            form = form.text(key, text);
        }

        if auth {
            let token = self.token_for(path)?;
            form = form.text(TOKEN_FIELD, token.secret().expose_secret().to_owned());
        }

        let mut part = Part::bytes(file.bytes).file_name(file.file_name);
        if let Some(mime) = &file.mime {
            part = part.mime_str(mime)?;
        }
        form = form.part("file", part);

        let url = self.host.join(path)?;
        let request = self.client.post(url).multipart(form).build()?;

        self.execute(Method::POST, path, request).await
    }
}
