//! Async owner of one unlock controller.
//!
//! The controller is synchronous and never performs IO. [`Session`] gives it
//! a clock, executes the effects it queues (grading answers, fetching layer
//! content) on tokio tasks, and feeds results back through a channel. Host
//! effects (haptics, showing controls, scroll restore) are handed to the
//! driver untouched.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use futures_util::future::{AbortHandle, Abortable};
use tokio::sync::mpsc;

use threshold_providers::{
    ContentError, ContentStore, EMPTY_DEPTH_BODY, EMPTY_DEPTH_TITLE, EpigramRecord, Evaluator,
    Judge,
};
use threshold_types::{AttemptId, Evaluation, RevealLayer, Timestamp, UnlockPhase};

use crate::controller::{Controller, Effect, EvaluationRequest};
use crate::picker::{ChallengePicker, RandomPicker};
use crate::presentation::{Scene, present};

pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// Milliseconds since the clock was created.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let ms = u64::try_from(self.start.elapsed().as_millis()).unwrap_or(u64::MAX);
        Timestamp::from_millis(ms)
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: AtomicU64,
}

impl ManualClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, delta: Duration) {
        let ms = u64::try_from(delta.as_millis()).unwrap_or(u64::MAX);
        self.now_ms.fetch_add(ms, Ordering::SeqCst);
    }

    pub fn set(&self, at: Timestamp) {
        self.now_ms.store(at.as_millis(), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_millis(self.now_ms.load(Ordering::SeqCst))
    }
}

impl<T: Clock + ?Sized> Clock for Arc<T> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

#[derive(Debug)]
pub enum SessionEvent {
    Evaluated {
        attempt: AttemptId,
        evaluation: Evaluation,
    },
    Loaded {
        layer: RevealLayer,
        result: Result<Vec<EpigramRecord>, ContentError>,
    },
}

struct InFlight {
    attempt: AttemptId,
    abort_handle: AbortHandle,
}

pub struct Session<J, S, C = SystemClock, P = RandomPicker> {
    controller: Controller<P>,
    evaluator: Arc<Evaluator<J>>,
    store: Arc<S>,
    clock: C,
    tx: mpsc::UnboundedSender<SessionEvent>,
    rx: mpsc::UnboundedReceiver<SessionEvent>,
    in_flight: Option<InFlight>,
    pending_loads: BTreeSet<RevealLayer>,
    content: BTreeMap<RevealLayer, Vec<EpigramRecord>>,
    last_evaluation: Option<Evaluation>,
    host_effects: Vec<Effect>,
}

impl<J, S, C, P> Session<J, S, C, P>
where
    J: Judge + 'static,
    S: ContentStore + 'static,
    C: Clock,
    P: ChallengePicker,
{
    pub fn new(controller: Controller<P>, evaluator: Evaluator<J>, store: S, clock: C) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            controller,
            evaluator: Arc::new(evaluator),
            store: Arc::new(store),
            clock,
            tx,
            rx,
            in_flight: None,
            pending_loads: BTreeSet::new(),
            content: BTreeMap::new(),
            last_evaluation: None,
            host_effects: Vec::new(),
        }
    }

    #[must_use]
    pub fn controller(&self) -> &Controller<P> {
        &self.controller
    }

    #[must_use]
    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Run one controller entry point at the current time, then execute the
    /// effects it queued.
    pub fn input<R>(&mut self, f: impl FnOnce(&mut Controller<P>, Timestamp) -> R) -> R {
        let now = self.clock.now();
        let result = f(&mut self.controller, now);
        self.dispatch();
        result
    }

    pub fn tick(&mut self) {
        self.input(Controller::tick);
    }

    /// Fetch a layer's records in the background.
    pub fn load(&mut self, layer: RevealLayer) {
        if !self.pending_loads.insert(layer) {
            return;
        }
        let store = Arc::clone(&self.store);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = store.list(layer).await;
            let _ = tx.send(SessionEvent::Loaded { layer, result });
        });
    }

    fn dispatch(&mut self) {
        for effect in self.controller.drain_effects() {
            match effect {
                Effect::Evaluate(request) => self.spawn_evaluation(request),
                Effect::LoadContent(layer) => self.load(layer),
                other => self.host_effects.push(other),
            }
        }

        // The verdict is only wanted while the controller still waits for it.
        if self.controller.phase() != UnlockPhase::Evaluating {
            self.abort_in_flight();
        }
    }

    fn spawn_evaluation(&mut self, request: EvaluationRequest) {
        self.abort_in_flight();

        let attempt = request.attempt;
        let judge_request = request.judge_request();
        let evaluator = Arc::clone(&self.evaluator);
        let tx = self.tx.clone();
        let (abort_handle, abort_registration) = AbortHandle::new_pair();

        let task = async move {
            let evaluation = evaluator.evaluate(&judge_request).await;
            let _ = tx.send(SessionEvent::Evaluated {
                attempt,
                evaluation,
            });
        };
        tokio::spawn(async move {
            let _ = Abortable::new(task, abort_registration).await;
        });

        tracing::debug!(%attempt, "Evaluation started");
        self.in_flight = Some(InFlight {
            attempt,
            abort_handle,
        });
    }

    fn abort_in_flight(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.abort_handle.abort();
            tracing::debug!(attempt = %in_flight.attempt, "Evaluation aborted");
        }
    }

    /// Apply every result that has already arrived. Returns how many.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.rx.try_recv() {
            self.apply(event);
            applied += 1;
        }
        applied
    }

    fn apply(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Evaluated {
                attempt,
                evaluation,
            } => {
                if self.in_flight.as_ref().map(|f| f.attempt) == Some(attempt) {
                    self.in_flight = None;
                }
                let applied = self.input(|c, now| {
                    c.complete_evaluation(attempt, evaluation.verdict, now)
                });
                if applied {
                    tracing::info!(
                        %attempt,
                        verdict = evaluation.verdict.as_str(),
                        source = ?evaluation.source,
                        "Verdict applied"
                    );
                    self.last_evaluation = Some(evaluation);
                }
            }
            SessionEvent::Loaded { layer, result } => {
                self.pending_loads.remove(&layer);
                match result {
                    Ok(records) => {
                        self.content.insert(layer, records);
                    }
                    Err(e) => {
                        tracing::warn!(%layer, error = %e, "Failed to load layer content");
                    }
                }
            }
        }
    }

    /// Wait for the in-flight evaluation and apply it.
    ///
    /// Returns `None` when nothing is being graded.
    pub async fn wait_for_evaluation(&mut self) -> Option<Evaluation> {
        let attempt = self.in_flight.as_ref()?.attempt;
        while let Some(event) = self.rx.recv().await {
            let done = matches!(
                &event,
                SessionEvent::Evaluated { attempt: a, .. } if *a == attempt
            );
            self.apply(event);
            if done {
                return self.last_evaluation;
            }
        }
        None
    }

    /// Wait until no evaluation or content fetch is outstanding.
    pub async fn settle(&mut self) {
        while self.in_flight.is_some() || !self.pending_loads.is_empty() {
            match self.rx.recv().await {
                Some(event) => self.apply(event),
                None => break,
            }
        }
    }

    #[must_use]
    pub fn is_evaluating(&self) -> bool {
        self.in_flight.is_some()
    }

    #[must_use]
    pub fn last_evaluation(&self) -> Option<Evaluation> {
        self.last_evaluation
    }

    #[must_use]
    pub fn scene(&self) -> Scene {
        present(&self.controller.snapshot(), self.clock.now())
    }

    /// Loaded records for `layer`. An empty depth layer yields the
    /// placeholder record.
    #[must_use]
    pub fn content(&self, layer: RevealLayer) -> Vec<EpigramRecord> {
        let records = self.content.get(&layer).cloned().unwrap_or_default();
        if layer == RevealLayer::Depth && records.is_empty() && self.content.contains_key(&layer) {
            return vec![EpigramRecord {
                id: 0,
                text: EMPTY_DEPTH_BODY.to_string(),
                title: Some(EMPTY_DEPTH_TITLE.to_string()),
                display_order: 0,
            }];
        }
        records
    }

    pub fn take_host_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.host_effects)
    }

    /// Abort outstanding work and tear the controller down.
    pub fn shutdown(&mut self) {
        self.abort_in_flight();
        self.controller.teardown();
    }
}

impl<J, S, C, P> Drop for Session<J, S, C, P> {
    fn drop(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.abort_handle.abort();
        }
    }
}
