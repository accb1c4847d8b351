pub mod session;
pub mod tracker;

pub use session::{EditorSession, SessionEvent};
pub use tracker::{DraftTracker, RunResults};

use async_trait::async_trait;

use crate::api::{ApiResult, RunResult, Version};

/// The remote append-only version sequence for a prompt. The editor only
/// reads its head and appends to it; sequence numbers are assigned remotely.
#[async_trait]
pub trait VersionLedger: Send + Sync {
    /// The most recently appended version, or None when the prompt has no
    /// versions yet.
    async fn current_version(&self, prompt_id: i64) -> ApiResult<Option<Version>>;

    /// Append a new version and return the created record, including its
    /// authoritative sequence number.
    async fn append_version(&self, prompt_id: i64, system_prompt: &str) -> ApiResult<Version>;

    /// Full history, most recent first.
    async fn list_versions(&self, prompt_id: i64) -> ApiResult<Vec<Version>>;
}

/// The remote inference executor. Accepts any text snapshot, saved or not,
/// and resolves test-case membership itself at execution time.
#[async_trait]
pub trait RunExecutor: Send + Sync {
    async fn run_prompt(&self, prompt_id: i64, system_prompt: &str) -> ApiResult<Vec<RunResult>>;
}
