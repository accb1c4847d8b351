//! Run endpoint: send a text snapshot (saved or not) to the inference
//! executor and get one output per test case attached to the prompt.

use async_trait::async_trait;
use serde_json::json;

use super::models::{RunResponse, RunResult};
use super::{ApiClient, ApiResult};
use crate::editor::RunExecutor;

impl ApiClient {
    pub async fn run_prompt(&self, prompt_id: i64, system_prompt: &str) -> ApiResult<Vec<RunResult>> {
        let resp = self
            .post(&format!("/run/prompt/{prompt_id}"))
            .json(&json!({ "system_prompt": system_prompt }))
            .send()
            .await?;
        let resp = Self::check(resp, &format!("run for prompt {prompt_id}")).await?;
        let body: RunResponse = resp.json().await?;
        Ok(body.results)
    }
}

#[async_trait]
impl RunExecutor for ApiClient {
    async fn run_prompt(&self, prompt_id: i64, system_prompt: &str) -> ApiResult<Vec<RunResult>> {
        ApiClient::run_prompt(self, prompt_id, system_prompt).await
    }
}
