//! Draft/run/version consistency tracking for one open prompt editor.
//!
//! Pure state, no I/O: the async half lives in [`super::session`]. The rules
//! here decide when the save control is live, when displayed run results no
//! longer match the text being edited, and which version number the editor
//! claims to be editing.

use crate::api::{RunResult, Version};

/// Lifecycle of the results pane.
///
/// `Pending` exists so an in-flight run can never show the previous result
/// set against the wrong text: starting a run clears the pane rather than
/// leaving stale results up.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RunResults {
    #[default]
    None,
    Pending,
    Ready(Vec<RunResult>),
}

#[derive(Debug)]
pub struct DraftTracker {
    buffer: String,
    last_saved: String,
    last_run: Option<String>,
    results: RunResults,
    version_number: i64,
}

impl DraftTracker {
    /// Open against the fetched current version, or a blank slate when the
    /// prompt has no versions yet (buffer empty, version 0).
    pub fn open(current: Option<&Version>) -> Self {
        let (text, number) = match current {
            Some(v) => (v.system_prompt.clone(), v.number),
            None => (String::new(), 0),
        };
        Self {
            buffer: text.clone(),
            last_saved: text,
            last_run: None,
            results: RunResults::None,
            version_number: number,
        }
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn results(&self) -> &RunResults {
        &self.results
    }

    pub fn version_number(&self) -> i64 {
        self.version_number
    }

    /// Replace the buffer. Any text is accepted, including empty.
    pub fn edit(&mut self, new_text: impl Into<String>) {
        self.buffer = new_text.into();
    }

    /// Saving is permitted only when the buffer differs from the text last
    /// loaded or saved as the current version.
    pub fn can_save(&self) -> bool {
        self.buffer != self.last_saved
    }

    /// Displayed results are outdated when they exist and were produced from
    /// a snapshot that no longer matches the buffer. A pending run is never
    /// outdated since it has nothing on screen to mislabel.
    pub fn is_outdated(&self) -> bool {
        match &self.results {
            RunResults::Ready(_) => self.last_run.as_deref() != Some(self.buffer.as_str()),
            RunResults::None | RunResults::Pending => false,
        }
    }

    /// Start a run: clear the pane to the pending sentinel and hand back the
    /// snapshot the caller must carry through the request. If the buffer
    /// changes while the run is in flight, the results are attributed to
    /// this snapshot rather than the buffer at completion time.
    pub fn begin_run(&mut self) -> String {
        self.results = RunResults::Pending;
        self.buffer.clone()
    }

    pub fn complete_run(&mut self, snapshot: String, results: Vec<RunResult>) {
        self.results = RunResults::Ready(results);
        self.last_run = Some(snapshot);
    }

    /// A failed run leaves no results up; the last successful run's snapshot
    /// is untouched.
    pub fn fail_run(&mut self) {
        self.results = RunResults::None;
    }

    /// A version was appended with `snapshot`. The version number increment
    /// is optimistic display state until [`Self::reconcile_version`] adopts
    /// the ledger's answer.
    pub fn record_saved(&mut self, snapshot: String) {
        self.last_saved = snapshot;
        self.version_number += 1;
    }

    /// Adopt the authoritative sequence number from the append response.
    pub fn reconcile_version(&mut self, number: i64) {
        self.version_number = number;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn version(number: i64, text: &str) -> Version {
        Version {
            id: number,
            number,
            system_prompt: text.to_string(),
            prompt_id: 1,
            created_at: Utc::now(),
        }
    }

    fn result(id: i64, output: &str) -> RunResult {
        RunResult {
            test_case_id: id,
            user_message: "hi".to_string(),
            output: output.to_string(),
        }
    }

    #[test]
    fn open_with_current_version_seeds_buffer_and_number() {
        let v = version(3, "Be helpful.");
        let tracker = DraftTracker::open(Some(&v));
        assert_eq!(tracker.buffer(), "Be helpful.");
        assert_eq!(tracker.version_number(), 3);
        assert!(!tracker.can_save());
    }

    #[test]
    fn open_without_version_starts_empty_at_zero() {
        let tracker = DraftTracker::open(None);
        assert_eq!(tracker.buffer(), "");
        assert_eq!(tracker.version_number(), 0);
        assert!(!tracker.can_save());
        assert!(!tracker.is_outdated());
    }

    #[test]
    fn can_save_iff_buffer_differs_from_last_saved() {
        let v = version(1, "A");
        let mut tracker = DraftTracker::open(Some(&v));
        tracker.edit("B");
        assert!(tracker.can_save());
        tracker.edit("A");
        assert!(!tracker.can_save());
    }

    #[test]
    fn editing_to_empty_is_a_savable_change() {
        let v = version(1, "A");
        let mut tracker = DraftTracker::open(Some(&v));
        tracker.edit("");
        assert!(tracker.can_save());
    }

    #[test]
    fn results_become_outdated_on_edit_without_new_run() {
        let mut tracker = DraftTracker::open(None);
        tracker.edit("X");
        let snapshot = tracker.begin_run();
        tracker.complete_run(snapshot, vec![result(1, "ok")]);
        assert!(!tracker.is_outdated());

        tracker.edit("Y");
        assert!(tracker.is_outdated());

        // Editing back to the run snapshot makes them current again.
        tracker.edit("X");
        assert!(!tracker.is_outdated());
    }

    #[test]
    fn no_results_are_never_outdated() {
        let mut tracker = DraftTracker::open(None);
        tracker.edit("anything");
        assert!(!tracker.is_outdated());
    }

    #[test]
    fn begin_run_clears_previous_results_to_pending() {
        let mut tracker = DraftTracker::open(None);
        tracker.edit("v1 text");
        let snapshot = tracker.begin_run();
        tracker.complete_run(snapshot, vec![result(1, "old")]);

        tracker.edit("v2 text");
        let _ = tracker.begin_run();
        assert_eq!(*tracker.results(), RunResults::Pending);
        // Nothing on screen, so nothing can be mislabeled.
        assert!(!tracker.is_outdated());
    }

    #[test]
    fn results_attributed_to_invocation_snapshot_not_completion_buffer() {
        let mut tracker = DraftTracker::open(None);
        tracker.edit("X");
        let snapshot = tracker.begin_run();

        // Buffer moves on while the request is in flight.
        tracker.edit("Y");
        tracker.complete_run(snapshot, vec![result(1, "answer")]);

        assert!(matches!(tracker.results(), RunResults::Ready(_)));
        assert!(tracker.is_outdated());
    }

    #[test]
    fn failed_run_clears_pending_and_keeps_last_run() {
        let mut tracker = DraftTracker::open(None);
        tracker.edit("X");
        let snapshot = tracker.begin_run();
        tracker.complete_run(snapshot, vec![result(1, "good")]);

        let _ = tracker.begin_run();
        tracker.fail_run();
        assert_eq!(*tracker.results(), RunResults::None);

        // last_run still points at "X": a later successful display of the
        // old snapshot text would not be outdated.
        assert!(!tracker.is_outdated());
    }

    #[test]
    fn run_never_mutates_last_saved() {
        let v = version(2, "saved text");
        let mut tracker = DraftTracker::open(Some(&v));
        tracker.edit("Z");
        let snapshot = tracker.begin_run();
        tracker.complete_run(snapshot, vec![result(1, "out")]);

        // Still a save candidate: only record_saved touches last_saved.
        assert!(tracker.can_save());
        assert_eq!(tracker.version_number(), 2);
    }

    #[test]
    fn first_save_on_fresh_prompt_reaches_version_one() {
        let mut tracker = DraftTracker::open(None);
        tracker.edit("Be concise.");
        assert!(tracker.can_save());

        let snapshot = tracker.buffer().to_string();
        tracker.record_saved(snapshot);
        tracker.reconcile_version(1);

        assert_eq!(tracker.version_number(), 1);
        assert!(!tracker.can_save());
    }

    #[test]
    fn save_is_inert_without_intervening_edit() {
        let v = version(1, "A");
        let mut tracker = DraftTracker::open(Some(&v));
        tracker.edit("B");
        tracker.record_saved("B".to_string());
        // canSave false post-save: a second save has nothing to do.
        assert!(!tracker.can_save());
        assert_eq!(tracker.version_number(), 2);
    }

    #[test]
    fn reconcile_overrides_optimistic_increment() {
        let v = version(4, "A");
        let mut tracker = DraftTracker::open(Some(&v));
        tracker.edit("B");
        tracker.record_saved("B".to_string());
        assert_eq!(tracker.version_number(), 5);

        // Another client appended meanwhile; the ledger says 7.
        tracker.reconcile_version(7);
        assert_eq!(tracker.version_number(), 7);
    }

    #[test]
    fn stale_badge_scenario_from_two_versions() {
        let mut tracker = DraftTracker::open(None);
        tracker.edit("v1 text");
        let snapshot = tracker.begin_run();
        tracker.complete_run(snapshot, vec![result(1, "one")]);
        tracker.edit("v2 text");
        assert!(tracker.is_outdated());
    }
}
