use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named, user-owned container for an instruction text and its version
/// history. Renaming and deletion are the only mutations; identity is the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prompt {
    pub id: i64,
    pub name: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

/// An immutable, sequence-numbered snapshot of a prompt's instruction text.
/// `number` is assigned by the backend and strictly increasing per prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Version {
    pub id: i64,
    pub number: i64,
    pub system_prompt: String,
    pub prompt_id: i64,
    pub created_at: DateTime<Utc>,
}

/// A sample input message used to exercise a prompt during a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    pub id: i64,
    pub prompt_id: i64,
    pub user_message: String,
}

/// One inference output per test case. Ephemeral: never persisted, only held
/// in session state until replaced or discarded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub test_case_id: i64,
    pub user_message: String,
    pub output: String,
}

#[derive(Debug, Deserialize)]
pub struct RunResponse {
    pub results: Vec<RunResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub disabled: Option<bool>,
}

/// Bearer credential returned by the login endpoint.
#[derive(Debug, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub email: String,
    pub password: String,
}
