//! Test-case endpoints. Test cases are not versioned; they are created and
//! deleted, never edited.

use serde_json::json;

use super::models::TestCase;
use super::{ApiClient, ApiResult};

impl ApiClient {
    pub async fn list_test_cases(&self, prompt_id: i64) -> ApiResult<Vec<TestCase>> {
        let resp = self
            .get(&format!("/test-cases/prompt/{prompt_id}"))
            .send()
            .await?;
        let resp = Self::check(resp, &format!("test cases of prompt {prompt_id}")).await?;
        Ok(resp.json().await?)
    }

    pub async fn create_test_case(&self, prompt_id: i64, user_message: &str) -> ApiResult<TestCase> {
        let resp = self
            .post(&format!("/test-cases?prompt_id={prompt_id}"))
            .json(&json!({ "user_message": user_message }))
            .send()
            .await?;
        let resp = Self::check(resp, "test case").await?;
        Ok(resp.json().await?)
    }

    pub async fn delete_test_case(&self, test_case_id: i64) -> ApiResult<()> {
        let resp = self
            .delete(&format!("/test-cases/{test_case_id}"))
            .send()
            .await?;
        Self::check(resp, &format!("test case {test_case_id}")).await?;
        Ok(())
    }
}
