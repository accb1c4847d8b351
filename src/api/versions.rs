//! Version ledger endpoints. Versions are append-only; the backend assigns
//! sequence numbers and defines which version is "current".

use async_trait::async_trait;
use serde_json::json;

use super::models::Version;
use super::{ApiClient, ApiError, ApiResult};
use crate::editor::VersionLedger;

impl ApiClient {
    /// The backend's notion of the current version. A 404 means the prompt
    /// has no versions yet and is not an error.
    pub async fn current_version(&self, prompt_id: i64) -> ApiResult<Option<Version>> {
        let resp = self
            .get(&format!("/versions/current/{prompt_id}"))
            .send()
            .await?;
        match Self::check(resp, &format!("current version of prompt {prompt_id}")).await {
            Ok(resp) => Ok(Some(resp.json().await?)),
            Err(ApiError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn list_versions(&self, prompt_id: i64) -> ApiResult<Vec<Version>> {
        let resp = self
            .get(&format!("/versions/prompt/{prompt_id}"))
            .send()
            .await?;
        let resp = Self::check(resp, &format!("versions of prompt {prompt_id}")).await?;
        Ok(resp.json().await?)
    }

    pub async fn create_version(&self, prompt_id: i64, system_prompt: &str) -> ApiResult<Version> {
        let resp = self
            .post("/versions")
            .json(&json!({
                "prompt_id": prompt_id,
                "system_prompt": system_prompt,
            }))
            .send()
            .await?;
        let resp = Self::check(resp, "version").await?;
        Ok(resp.json().await?)
    }
}

#[async_trait]
impl VersionLedger for ApiClient {
    async fn current_version(&self, prompt_id: i64) -> ApiResult<Option<Version>> {
        ApiClient::current_version(self, prompt_id).await
    }

    async fn append_version(&self, prompt_id: i64, system_prompt: &str) -> ApiResult<Version> {
        self.create_version(prompt_id, system_prompt).await
    }

    async fn list_versions(&self, prompt_id: i64) -> ApiResult<Vec<Version>> {
        ApiClient::list_versions(self, prompt_id).await
    }
}
