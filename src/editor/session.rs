//! Async shell around the tracker: one session per open prompt editor.
//!
//! Saves and runs are spawned tasks reporting back through oneshot channels
//! that the UI loop polls each tick, so the terminal stays responsive while
//! a request is in flight. There is no cancellation: a run started before an
//! edit still lands, attributed to its invocation snapshot, and the
//! staleness rule marks it outdated if the buffer has moved on.

use std::sync::Arc;

use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;

use super::tracker::{DraftTracker, RunResults};
use super::{RunExecutor, VersionLedger};
use crate::api::{ApiError, Prompt, RunResult, Version};

/// Completion notifications surfaced to the UI after [`EditorSession::poll`].
#[derive(Debug)]
pub enum SessionEvent {
    Saved(Version),
    SaveFailed(String),
    RunFinished,
    RunFailed(String),
}

pub struct EditorSession {
    pub prompt: Prompt,
    tracker: DraftTracker,
    ledger: Arc<dyn VersionLedger>,
    runner: Arc<dyn RunExecutor>,
    save_pending: Option<InFlight<Version>>,
    run_pending: Option<InFlight<Vec<RunResult>>>,
}

/// A spawned operation plus the snapshot it was invoked with.
struct InFlight<T> {
    rx: oneshot::Receiver<Result<T, ApiError>>,
    snapshot: String,
}

impl EditorSession {
    /// Fetch the prompt's current version and open a tracker on it. A
    /// missing current version is the normal empty-prompt case.
    pub async fn open(
        prompt: Prompt,
        ledger: Arc<dyn VersionLedger>,
        runner: Arc<dyn RunExecutor>,
    ) -> Result<Self, ApiError> {
        let current = ledger.current_version(prompt.id).await?;
        Ok(Self {
            prompt,
            tracker: DraftTracker::open(current.as_ref()),
            ledger,
            runner,
            save_pending: None,
            run_pending: None,
        })
    }

    pub fn buffer(&self) -> &str {
        self.tracker.buffer()
    }

    pub fn edit(&mut self, new_text: impl Into<String>) {
        self.tracker.edit(new_text);
    }

    pub fn can_save(&self) -> bool {
        self.tracker.can_save()
    }

    pub fn is_outdated(&self) -> bool {
        self.tracker.is_outdated()
    }

    pub fn results(&self) -> &RunResults {
        self.tracker.results()
    }

    pub fn version_number(&self) -> i64 {
        self.tracker.version_number()
    }

    pub fn is_saving(&self) -> bool {
        self.save_pending.is_some()
    }

    pub fn is_running(&self) -> bool {
        self.run_pending.is_some()
    }

    /// Append the buffer as a new version. No-op while a save is already in
    /// flight or when there is nothing to save; the UI disables the control
    /// in both cases, this guard just makes the rule hold regardless.
    pub fn start_save(&mut self) {
        if self.is_saving() || !self.tracker.can_save() {
            return;
        }
        let snapshot = self.tracker.buffer().to_string();
        let (tx, rx) = oneshot::channel();
        let ledger = self.ledger.clone();
        let prompt_id = self.prompt.id;
        let text = snapshot.clone();
        tokio::spawn(async move {
            let _ = tx.send(ledger.append_version(prompt_id, &text).await);
        });
        self.save_pending = Some(InFlight { rx, snapshot });
    }

    /// Run the buffer as-is, saved or not, against the prompt's test cases.
    /// Clears the results pane to pending for the duration.
    pub fn start_run(&mut self) {
        if self.is_running() {
            return;
        }
        let snapshot = self.tracker.begin_run();
        let (tx, rx) = oneshot::channel();
        let runner = self.runner.clone();
        let prompt_id = self.prompt.id;
        let text = snapshot.clone();
        tokio::spawn(async move {
            let _ = tx.send(runner.run_prompt(prompt_id, &text).await);
        });
        self.run_pending = Some(InFlight { rx, snapshot });
    }

    /// Drain any completed operations into tracker state. Called once per
    /// UI tick. Failures leave state untouched beyond clearing the pending
    /// sentinel; retry is manual.
    pub fn poll(&mut self) -> Vec<SessionEvent> {
        let mut events = Vec::new();

        if let Some(mut pending) = self.save_pending.take() {
            match pending.rx.try_recv() {
                Err(TryRecvError::Empty) => self.save_pending = Some(pending),
                Ok(Ok(version)) => {
                    self.tracker.record_saved(pending.snapshot);
                    self.tracker.reconcile_version(version.number);
                    events.push(SessionEvent::Saved(version));
                }
                Ok(Err(e)) => events.push(SessionEvent::SaveFailed(e.to_string())),
                Err(TryRecvError::Closed) => {
                    events.push(SessionEvent::SaveFailed("save task dropped".to_string()));
                }
            }
        }

        if let Some(mut pending) = self.run_pending.take() {
            match pending.rx.try_recv() {
                Err(TryRecvError::Empty) => self.run_pending = Some(pending),
                Ok(Ok(results)) => {
                    self.tracker.complete_run(pending.snapshot, results);
                    events.push(SessionEvent::RunFinished);
                }
                Ok(Err(e)) => {
                    self.tracker.fail_run();
                    events.push(SessionEvent::RunFailed(e.to_string()));
                }
                Err(TryRecvError::Closed) => {
                    self.tracker.fail_run();
                    events.push(SessionEvent::RunFailed("run task dropped".to_string()));
                }
            }
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    fn prompt() -> Prompt {
        Prompt {
            id: 1,
            name: "greeter".to_string(),
            user_id: 1,
            created_at: Utc::now(),
        }
    }

    fn version(number: i64, text: &str) -> Version {
        Version {
            id: number,
            number,
            system_prompt: text.to_string(),
            prompt_id: 1,
            created_at: Utc::now(),
        }
    }

    /// In-memory ledger: append assigns the next sequence number, with a
    /// switch to skip ahead (simulating a racing client) or fail outright.
    struct FakeLedger {
        versions: Mutex<Vec<Version>>,
        fail_append: AtomicBool,
        appends: AtomicUsize,
    }

    impl FakeLedger {
        fn new(existing: Vec<Version>) -> Arc<Self> {
            Arc::new(Self {
                versions: Mutex::new(existing),
                fail_append: AtomicBool::new(false),
                appends: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl VersionLedger for FakeLedger {
        async fn current_version(&self, _prompt_id: i64) -> Result<Option<Version>, ApiError> {
            Ok(self.versions.lock().unwrap().last().cloned())
        }

        async fn append_version(
            &self,
            _prompt_id: i64,
            system_prompt: &str,
        ) -> Result<Version, ApiError> {
            self.appends.fetch_add(1, Ordering::SeqCst);
            if self.fail_append.load(Ordering::SeqCst) {
                return Err(ApiError::Api {
                    status: 500,
                    message: "append failed".to_string(),
                });
            }
            let mut versions = self.versions.lock().unwrap();
            let number = versions.last().map(|v| v.number).unwrap_or(0) + 1;
            let created = version(number, system_prompt);
            versions.push(created.clone());
            Ok(created)
        }

        async fn list_versions(&self, _prompt_id: i64) -> Result<Vec<Version>, ApiError> {
            let mut all = self.versions.lock().unwrap().clone();
            all.reverse();
            Ok(all)
        }
    }

    /// Executor that echoes the snapshot it was called with, optionally
    /// holding the response until the test releases it.
    struct FakeRunner {
        gate: tokio::sync::Semaphore,
        calls: AtomicUsize,
        fail: AtomicBool,
    }

    impl FakeRunner {
        fn new(open: bool) -> Arc<Self> {
            Arc::new(Self {
                gate: tokio::sync::Semaphore::new(if open { 1000 } else { 0 }),
                calls: AtomicUsize::new(0),
                fail: AtomicBool::new(false),
            })
        }

        fn release(&self) {
            self.gate.add_permits(1);
        }
    }

    #[async_trait]
    impl RunExecutor for FakeRunner {
        async fn run_prompt(
            &self,
            _prompt_id: i64,
            system_prompt: &str,
        ) -> Result<Vec<RunResult>, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let _permit = self.gate.acquire().await.expect("gate closed");
            if self.fail.load(Ordering::SeqCst) {
                return Err(ApiError::Api {
                    status: 502,
                    message: "executor down".to_string(),
                });
            }
            Ok(vec![RunResult {
                test_case_id: 1,
                user_message: "hi".to_string(),
                output: format!("ran: {system_prompt}"),
            }])
        }
    }

    async fn wait_events(session: &mut EditorSession) -> Vec<SessionEvent> {
        for _ in 0..200 {
            let events = session.poll();
            if !events.is_empty() {
                return events;
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        panic!("no session event within deadline");
    }

    async fn open_session(
        ledger: Arc<FakeLedger>,
        runner: Arc<FakeRunner>,
    ) -> EditorSession {
        EditorSession::open(prompt(), ledger, runner)
            .await
            .expect("open session")
    }

    #[tokio::test]
    async fn open_seeds_from_current_version() {
        let ledger = FakeLedger::new(vec![version(2, "existing")]);
        let session = open_session(ledger, FakeRunner::new(true)).await;
        assert_eq!(session.buffer(), "existing");
        assert_eq!(session.version_number(), 2);
    }

    #[tokio::test]
    async fn save_appends_and_reconciles_number() {
        let ledger = FakeLedger::new(vec![]);
        let mut session = open_session(ledger.clone(), FakeRunner::new(true)).await;

        session.edit("Be concise.");
        session.start_save();
        assert!(session.is_saving());

        let events = wait_events(&mut session).await;
        match &events[0] {
            SessionEvent::Saved(v) => {
                assert_eq!(v.number, 1);
                assert_eq!(v.system_prompt, "Be concise.");
            }
            other => panic!("expected Saved, got {other:?}"),
        }
        assert!(!session.is_saving());
        assert!(!session.can_save());
        assert_eq!(session.version_number(), 1);
    }

    #[tokio::test]
    async fn save_without_changes_is_a_no_op() {
        let ledger = FakeLedger::new(vec![version(1, "A")]);
        let mut session = open_session(ledger.clone(), FakeRunner::new(true)).await;

        session.start_save();
        assert!(!session.is_saving());
        assert_eq!(ledger.appends.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failed_save_leaves_state_unchanged() {
        let ledger = FakeLedger::new(vec![version(1, "A")]);
        ledger.fail_append.store(true, Ordering::SeqCst);
        let mut session = open_session(ledger.clone(), FakeRunner::new(true)).await;

        session.edit("B");
        session.start_save();
        let events = wait_events(&mut session).await;
        assert!(matches!(events[0], SessionEvent::SaveFailed(_)));

        // Still dirty, still at the old number; the user retries manually.
        assert!(session.can_save());
        assert_eq!(session.version_number(), 1);
    }

    #[tokio::test]
    async fn run_of_unsaved_text_completes_without_touching_save_state() {
        let ledger = FakeLedger::new(vec![version(1, "saved")]);
        let mut session = open_session(ledger.clone(), FakeRunner::new(true)).await;

        session.edit("Z");
        session.start_run();
        assert!(session.is_running());
        assert_eq!(*session.results(), RunResults::Pending);

        let events = wait_events(&mut session).await;
        assert!(matches!(events[0], SessionEvent::RunFinished));
        assert!(!session.is_outdated());
        match session.results() {
            RunResults::Ready(results) => assert_eq!(results[0].output, "ran: Z"),
            other => panic!("expected Ready results, got {other:?}"),
        }

        // Running never saved anything.
        assert!(session.can_save());
        assert_eq!(ledger.appends.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn edit_during_inflight_run_marks_results_outdated() {
        let ledger = FakeLedger::new(vec![]);
        let runner = FakeRunner::new(false);
        let mut session = open_session(ledger, runner.clone()).await;

        session.edit("X");
        session.start_run();
        session.edit("Y");

        runner.release();
        let events = wait_events(&mut session).await;
        assert!(matches!(events[0], SessionEvent::RunFinished));

        // Results landed for "X" while the buffer says "Y".
        match session.results() {
            RunResults::Ready(results) => assert_eq!(results[0].output, "ran: X"),
            other => panic!("expected Ready results, got {other:?}"),
        }
        assert!(session.is_outdated());
    }

    #[tokio::test]
    async fn duplicate_run_trigger_is_ignored_while_in_flight() {
        let ledger = FakeLedger::new(vec![]);
        let runner = FakeRunner::new(false);
        let mut session = open_session(ledger, runner.clone()).await;

        session.edit("X");
        session.start_run();
        session.start_run();
        session.start_run();

        runner.release();
        wait_events(&mut session).await;
        assert_eq!(runner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_run_clears_pending_results() {
        let ledger = FakeLedger::new(vec![]);
        let runner = FakeRunner::new(true);
        runner.fail.store(true, Ordering::SeqCst);
        let mut session = open_session(ledger, runner).await;

        session.edit("X");
        session.start_run();
        let events = wait_events(&mut session).await;
        assert!(matches!(events[0], SessionEvent::RunFailed(_)));
        assert_eq!(*session.results(), RunResults::None);
        assert!(!session.is_running());
    }

    #[tokio::test]
    async fn save_and_run_may_be_in_flight_together() {
        let ledger = FakeLedger::new(vec![]);
        let runner = FakeRunner::new(false);
        let mut session = open_session(ledger, runner.clone()).await;

        session.edit("both");
        session.start_run();
        session.start_save();
        assert!(session.is_running());
        assert!(session.is_saving());

        // Save resolves first; the run is still pending.
        let events = wait_events(&mut session).await;
        assert!(matches!(events[0], SessionEvent::Saved(_)));
        assert!(session.is_running());

        runner.release();
        let events = wait_events(&mut session).await;
        assert!(matches!(events[0], SessionEvent::RunFinished));
        assert!(!session.is_outdated());
    }
}
