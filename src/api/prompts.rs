//! Prompt CRUD endpoints.

use serde_json::json;

use super::models::Prompt;
use super::{ApiClient, ApiResult};

impl ApiClient {
    pub async fn list_prompts(&self) -> ApiResult<Vec<Prompt>> {
        let resp = self.get("/prompts").send().await?;
        let resp = Self::check(resp, "prompts").await?;
        Ok(resp.json().await?)
    }

    pub async fn get_prompt(&self, prompt_id: i64) -> ApiResult<Prompt> {
        let resp = self.get(&format!("/prompts/{prompt_id}")).send().await?;
        let resp = Self::check(resp, &format!("prompt {prompt_id}")).await?;
        Ok(resp.json().await?)
    }

    pub async fn create_prompt(&self, name: &str) -> ApiResult<Prompt> {
        let resp = self
            .post("/prompts")
            .json(&json!({ "name": name }))
            .send()
            .await?;
        let resp = Self::check(resp, "prompt").await?;
        Ok(resp.json().await?)
    }

    pub async fn rename_prompt(&self, prompt_id: i64, new_name: &str) -> ApiResult<Prompt> {
        let resp = self
            .patch(&format!("/prompts/{prompt_id}/rename"))
            .json(&json!({ "new_name": new_name }))
            .send()
            .await?;
        let resp = Self::check(resp, &format!("prompt {prompt_id}")).await?;
        Ok(resp.json().await?)
    }

    pub async fn delete_prompt(&self, prompt_id: i64) -> ApiResult<()> {
        let resp = self.delete(&format!("/prompts/{prompt_id}")).send().await?;
        Self::check(resp, &format!("prompt {prompt_id}")).await?;
        Ok(())
    }
}
