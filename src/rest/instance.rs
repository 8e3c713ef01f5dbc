use serde_json::json;

use super::Client;
use super::types::request::AnnouncementsRequest;
use crate::Result;
use crate::models::{Announcement, FederatedInstance, InstanceMeta};
use crate::serde_helpers;

impl Client {
    /// Metadata of the instance. Does not require a token.
    pub async fn meta(&self) -> Result<InstanceMeta> {
        let value = self
            .request("/api/meta", json!({ "detail": true }), false)
            .await?;
        serde_helpers::deserialize_with_warnings(value)
    }

    /// A remote instance this server federates with.
    pub async fn federated_instance(&self, host: &str) -> Result<FederatedInstance> {
        self.post("/api/federation/show-instance", &json!({ "host": host }))
            .await
    }

    /// Announcements published by the instance administrators, newest first.
    pub async fn announcements(
        &self,
        request: &AnnouncementsRequest,
    ) -> Result<Vec<Announcement>> {
        request.validate()?;
        self.post("/api/announcements", request).await
    }
}
