//! Test harness wiring a poller to a scripted status source.
//!
//! The `TestHarness` records every completion callback and every diagnostic
//! event so tests can assert exactly-once delivery and check counts.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use ticketsafi_client::{
    create_event_channel, Completion, ConfirmationPoller, Error, PollConfig, PollEvent,
    PollEventsChannel, PollHandle, RemoteStatus, Result, StatusReport, StatusSource,
};

/// Polling policy used by the scenarios: 3 attempts, 10ms apart.
#[must_use]
pub fn fast_policy() -> PollConfig {
    PollConfig {
        interval_ms: 10,
        max_attempts: 3,
    }
}

/// One scripted answer.
#[derive(Debug, Clone)]
pub enum Scripted {
    /// Remote answered with this report.
    Report(StatusReport),
    /// The request never reached the API.
    TransportError,
}

impl Scripted {
    /// Remote answered `PENDING`.
    #[must_use]
    pub fn pending() -> Self {
        Self::Report(StatusReport::new(RemoteStatus::Pending))
    }

    /// Remote answered `FAILED`.
    #[must_use]
    pub fn failed() -> Self {
        Self::Report(StatusReport::new(RemoteStatus::Failed))
    }
}

/// Status source replaying a fixed script, then `PENDING` forever.
#[derive(Default)]
pub struct ScriptedSource {
    script: Mutex<VecDeque<Scripted>>,
    calls: AtomicU32,
    subjects: Mutex<Vec<String>>,
}

impl ScriptedSource {
    /// Create a source replaying `script`.
    #[must_use]
    pub fn new(script: Vec<Scripted>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            ..Self::default()
        }
    }

    /// Number of checks issued.
    #[must_use]
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Subjects queried, in order.
    #[must_use]
    pub fn subjects(&self) -> Vec<String> {
        self.subjects.lock().clone()
    }
}

#[async_trait]
impl StatusSource for ScriptedSource {
    async fn check_status(&self, subject_id: &str) -> Result<StatusReport> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.subjects.lock().push(subject_id.to_string());

        match self.script.lock().pop_front() {
            Some(Scripted::Report(report)) => Ok(report),
            Some(Scripted::TransportError) => Err(Error::UnexpectedStatus {
                status: 503,
                url: format!("http://localhost:8000/api/pay/verify/{subject_id}/"),
            }),
            None => Ok(StatusReport::new(RemoteStatus::Pending)),
        }
    }
}

/// Poller plus recorders for callbacks and events.
pub struct TestHarness {
    /// Status source shared with the poller.
    pub source: Arc<ScriptedSource>,
    poller: ConfirmationPoller<Arc<ScriptedSource>>,
    completions: Arc<Mutex<Vec<Completion>>>,
    events: PollEventsChannel,
}

impl TestHarness {
    /// Harness over `script` with [`fast_policy`].
    #[must_use]
    pub fn new(script: Vec<Scripted>) -> Self {
        Self::with_policy(script, fast_policy())
    }

    /// Harness over `script` with a custom policy.
    #[must_use]
    pub fn with_policy(script: Vec<Scripted>, policy: PollConfig) -> Self {
        let source = Arc::new(ScriptedSource::new(script));
        let (events_tx, events) = create_event_channel();
        let poller = ConfirmationPoller::new(Arc::clone(&source), policy).with_events(events_tx);

        Self {
            source,
            poller,
            completions: Arc::new(Mutex::new(Vec::new())),
            events,
        }
    }

    /// Start a session whose completion is recorded by the harness.
    pub fn start(&self, subject_id: &str) -> PollHandle {
        let completions = Arc::clone(&self.completions);
        self.poller.start(subject_id, move |completion| {
            completions.lock().push(completion);
        })
    }

    /// Completions delivered so far.
    #[must_use]
    pub fn completions(&self) -> Vec<Completion> {
        self.completions.lock().clone()
    }

    /// Drain all events published so far.
    pub fn drain_events(&mut self) -> Vec<PollEvent> {
        let mut drained = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            drained.push(event);
        }
        drained
    }
}
