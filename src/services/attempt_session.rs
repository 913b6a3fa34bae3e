use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::time::Instant;
use uuid::Uuid;

use crate::{
    errors::{AttemptError, AttemptResult},
    models::domain::{
        AnswerValue, Assessment, AttemptPhase, Question, Route, SubmissionReceipt,
        SubmitOutcome, SubmitReason, Violation,
    },
    models::dto::AttemptSubmission,
    repositories::AssessmentRepository,
    services::{
        answer_store::AnswerStore,
        countdown_timer::{CountdownTimer, ExpiryHandler, TimerSnapshot},
        question_navigator::{Progress, QuestionNavigator, QuestionStatus},
        submission_formatter::build_submission,
        violation_monitor::{BrowserSignal, MonitorConfig, ViolationCallback, ViolationMonitor},
    },
};

/// One learner's run through an assessment.
///
/// Cloning is cheap and every clone drives the same attempt. The countdown and
/// violation listeners are torn down when the attempt completes, when it is
/// exited, or when the last clone is dropped. A submission that is already in
/// flight is never cancelled.
#[derive(Clone)]
pub struct AttemptSession {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    id: Uuid,
    assessment: Assessment,
    repository: Arc<dyn AssessmentRepository>,
    is_submitting: AtomicBool,
    state: Mutex<SessionState>,
}

enum Prepared {
    Ready(AttemptSubmission),
    Skip(SubmitOutcome),
}

struct SessionState {
    phase: AttemptPhase,
    locked: bool,
    answers: AnswerStore,
    navigator: QuestionNavigator,
    monitor: ViolationMonitor,
    timer: CountdownTimer,
    started_at: Option<DateTime<Utc>>,
    started: Option<Instant>,
    question_entered: Option<Instant>,
    exited: bool,
    route: Option<Route>,
    receipt: Option<SubmissionReceipt>,
}

impl SessionState {
    fn enter_question(&mut self, question_id: &str) {
        if self.answers.mark_visited(question_id) {
            log::debug!("Question {} shown for the first time", question_id);
        }
        self.question_entered = Some(Instant::now());
    }

    fn leave_question(&mut self, question_id: &str) {
        if let Some(entered) = self.question_entered.take() {
            self.answers.record_time(question_id, entered.elapsed());
        }
    }
}

impl AttemptSession {
    pub fn new(
        assessment: Assessment,
        repository: Arc<dyn AssessmentRepository>,
        monitor_config: MonitorConfig,
    ) -> AttemptResult<Self> {
        let navigator = QuestionNavigator::new(assessment.questions.len())?;
        let timer = CountdownTimer::new(assessment.duration_secs);

        let state = SessionState {
            phase: AttemptPhase::NotStarted,
            locked: false,
            answers: AnswerStore::new(),
            navigator,
            monitor: ViolationMonitor::new(monitor_config),
            timer,
            started_at: None,
            started: None,
            question_entered: None,
            exited: false,
            route: None,
            receipt: None,
        };

        Ok(Self {
            inner: Arc::new(SessionInner {
                id: Uuid::new_v4(),
                assessment,
                repository,
                is_submitting: AtomicBool::new(false),
                state: Mutex::new(state),
            }),
        })
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    pub fn assessment(&self) -> &Assessment {
        &self.inner.assessment
    }

    /// Activates the countdown and the violation monitor. Must be called from
    /// within a tokio runtime.
    pub fn start(&self) -> AttemptResult<()> {
        let mut state = self.state();
        if state.phase != AttemptPhase::NotStarted {
            return Err(AttemptError::AttemptClosed(
                "Attempt has already been started".to_string(),
            ));
        }

        state.phase = AttemptPhase::InProgress;
        state.started_at = Some(Utc::now());
        state.started = Some(Instant::now());
        let first_id = self.inner.assessment.questions[0].id.clone();
        state.enter_question(&first_id);
        state.monitor.start();

        let timed = state.timer.start(self.expiry_handler());
        log::info!(
            "Attempt session {} started for assessment {} ({})",
            self.inner.id,
            self.inner.assessment.id,
            if timed {
                format!("{} s limit", self.inner.assessment.duration_secs)
            } else {
                "untimed".to_string()
            }
        );
        Ok(())
    }

    fn expiry_handler(&self) -> ExpiryHandler {
        let weak = Arc::downgrade(&self.inner);
        Box::new(move || {
            Box::pin(async move {
                if let Some(inner) = weak.upgrade() {
                    AttemptSession { inner }.handle_time_up().await;
                }
            })
        })
    }

    async fn handle_time_up(&self) {
        self.state().locked = true;
        log::info!("Time is up for attempt session {}", self.inner.id);

        if let Err(e) = self.submit_with(SubmitReason::TimeUp).await {
            log::error!(
                "Automatic submission failed for attempt session {}: {}",
                self.inner.id,
                e
            );
        }
    }

    pub fn phase(&self) -> AttemptPhase {
        self.state().phase
    }

    /// True once time ran out, the violation limit was hit, the learner exited,
    /// or the attempt completed. Answers can no longer change.
    pub fn is_locked(&self) -> bool {
        self.state().locked
    }

    pub fn is_submitting(&self) -> bool {
        self.inner.is_submitting.load(Ordering::Acquire)
    }

    pub fn set_answer(&self, question_id: &str, value: impl Into<AnswerValue>) -> AttemptResult<()> {
        if self.inner.assessment.question(question_id).is_none() {
            return Err(AttemptError::NotFound(format!(
                "Question '{}' is not part of this assessment",
                question_id
            )));
        }

        let mut state = self.state();
        if state.phase != AttemptPhase::InProgress || state.locked {
            return Err(AttemptError::AttemptClosed(
                "Answers can no longer be changed".to_string(),
            ));
        }

        state.answers.set_answer(question_id, value.into());
        Ok(())
    }

    pub fn answer(&self, question_id: &str) -> Option<AnswerValue> {
        self.state().answers.get_answer(question_id).cloned()
    }

    pub fn current_index(&self) -> usize {
        self.state().navigator.current()
    }

    pub fn current_question(&self) -> Question {
        let index = self.current_index();
        self.inner.assessment.questions[index].clone()
    }

    pub fn next(&self) -> AttemptResult<usize> {
        self.navigate(|nav| {
            nav.next();
            Ok(())
        })
    }

    pub fn previous(&self) -> AttemptResult<usize> {
        self.navigate(|nav| {
            nav.previous();
            Ok(())
        })
    }

    pub fn jump_to(&self, index: usize) -> AttemptResult<usize> {
        self.navigate(|nav| nav.jump_to(index))
    }

    fn navigate(
        &self,
        step: impl FnOnce(&mut QuestionNavigator) -> AttemptResult<()>,
    ) -> AttemptResult<usize> {
        let mut state = self.state();
        if state.phase == AttemptPhase::NotStarted {
            return Err(AttemptError::AttemptClosed(
                "Attempt has not been started".to_string(),
            ));
        }

        let before = state.navigator.current();
        step(&mut state.navigator)?;
        let after = state.navigator.current();

        if before != after {
            let questions = &self.inner.assessment.questions;
            state.leave_question(&questions[before].id);
            state.enter_question(&questions[after].id);
        }
        Ok(after)
    }

    pub fn statuses(&self) -> Vec<QuestionStatus> {
        let state = self.state();
        state
            .navigator
            .statuses(&self.inner.assessment.questions, &state.answers)
    }

    pub fn progress(&self) -> Progress {
        let state = self.state();
        state
            .navigator
            .progress(&self.inner.assessment.questions, &state.answers)
    }

    pub fn timer_snapshot(&self) -> TimerSnapshot {
        self.state().timer.snapshot()
    }

    pub fn subscribe_timer(&self) -> watch::Receiver<TimerSnapshot> {
        self.state().timer.subscribe()
    }

    /// Registers the callback run for every recorded violation. It runs while
    /// the session is locked internally and must not call back into it.
    pub fn on_violation(&self, callback: ViolationCallback) {
        self.state().monitor.set_callback(callback);
    }

    /// Feeds a host signal to the violation monitor. When it pushes the count
    /// to the limit the attempt is locked and force-submitted.
    pub async fn report_signal(&self, signal: BrowserSignal) -> AttemptResult<Option<Violation>> {
        let (violation, limit_reached) = {
            let mut state = self.state();
            if state.phase != AttemptPhase::InProgress {
                return Ok(None);
            }

            let was_exceeded = state.monitor.exceeded();
            let violation = state.monitor.observe(signal);
            let limit_reached = !was_exceeded && state.monitor.exceeded();
            if limit_reached {
                state.locked = true;
            }
            (violation, limit_reached)
        };

        if limit_reached {
            log::warn!(
                "Attempt session {} reached the violation limit; terminating",
                self.inner.id
            );
            self.submit_with(SubmitReason::ViolationLimit).await?;
        }

        Ok(violation)
    }

    pub fn acknowledge_violation(&self) -> Option<Violation> {
        self.state().monitor.acknowledge()
    }

    pub fn pending_violation(&self) -> Option<Violation> {
        self.state().monitor.pending_warning().cloned()
    }

    pub fn fullscreen_request_failed(&self, reason: &str) {
        self.state().monitor.fullscreen_request_failed(reason);
    }

    pub fn violation_count(&self) -> usize {
        self.state().monitor.count()
    }

    pub fn violations_exceeded(&self) -> bool {
        self.state().monitor.exceeded()
    }

    pub fn violations(&self) -> Vec<Violation> {
        self.state().monitor.violations().to_vec()
    }

    /// Manual submit. A no-op while another submission is in flight or after
    /// the attempt has completed.
    pub async fn submit(&self) -> AttemptResult<SubmitOutcome> {
        self.submit_with(SubmitReason::Manual).await
    }

    /// Leaves the attempt: stops the countdown and monitor, then submits what
    /// has been answered so far. When a submission is already in flight it is
    /// left to finish; should it fail, a later retry still routes to exit.
    pub async fn exit(&self) -> AttemptResult<SubmitOutcome> {
        {
            let mut state = self.state();
            if matches!(
                state.phase,
                AttemptPhase::InProgress | AttemptPhase::Submitting
            ) {
                state.locked = true;
                state.exited = true;
                state.timer.stop();
                state.monitor.stop();
                log::info!("Learner is leaving attempt session {}", self.inner.id);
            }
        }
        self.submit_with(SubmitReason::Exit).await
    }

    async fn submit_with(&self, reason: SubmitReason) -> AttemptResult<SubmitOutcome> {
        let submission = match self.prepare_submission(reason)? {
            Prepared::Ready(submission) => submission,
            Prepared::Skip(outcome) => return Ok(outcome),
        };

        log::info!(
            "Submitting attempt session {} ({:?}, {} responses, {} s)",
            self.inner.id,
            reason,
            submission.responses.len(),
            submission.time_spent
        );

        let result = self
            .inner
            .repository
            .submit_attempt(&self.inner.assessment.id, &submission)
            .await;

        let mut state = self.state();
        let outcome = match result {
            Ok(receipt) => {
                state.phase = AttemptPhase::Completed;
                state.locked = true;
                state.timer.stop();
                state.monitor.stop();
                let exited = reason == SubmitReason::Exit || state.exited;
                if state.route.is_none() {
                    state.route = Some(if exited {
                        Route::Exit
                    } else {
                        Route::Results {
                            attempt_id: receipt.attempt_id.clone(),
                        }
                    });
                }
                state.receipt = Some(receipt.clone());
                log::info!(
                    "Attempt session {} submitted as attempt {}",
                    self.inner.id,
                    receipt.attempt_id
                );
                Ok(SubmitOutcome::Submitted(receipt))
            }
            Err(e) => {
                state.phase = AttemptPhase::InProgress;
                log::error!(
                    "Submission failed for attempt session {}: {}",
                    self.inner.id,
                    e
                );
                Err(e)
            }
        };
        self.inner.is_submitting.store(false, Ordering::Release);
        outcome
    }

    /// Claims the in-flight flag and snapshots the payload.
    fn prepare_submission(&self, reason: SubmitReason) -> AttemptResult<Prepared> {
        let mut state = self.state();
        match state.phase {
            AttemptPhase::NotStarted => {
                return Err(AttemptError::AttemptClosed(
                    "Attempt has not been started".to_string(),
                ))
            }
            AttemptPhase::Completed => {
                log::debug!(
                    "Attempt session {} already submitted; ignoring {:?}",
                    self.inner.id,
                    reason
                );
                return Ok(Prepared::Skip(SubmitOutcome::AlreadySubmitted));
            }
            AttemptPhase::InProgress | AttemptPhase::Submitting => {}
        }

        if self
            .inner
            .is_submitting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            log::debug!(
                "Submission already in flight for attempt session {}; ignoring {:?}",
                self.inner.id,
                reason
            );
            return Ok(Prepared::Skip(SubmitOutcome::InFlight));
        }

        state.phase = AttemptPhase::Submitting;
        if reason != SubmitReason::Manual {
            state.locked = true;
        }

        let current_id = self.inner.assessment.questions[state.navigator.current()]
            .id
            .clone();
        state.leave_question(&current_id);
        // Keeps the clock running for this question should the request fail.
        state.question_entered = Some(Instant::now());

        let assessment = &self.inner.assessment;
        let mut elapsed = state
            .started
            .map(|started| started.elapsed().as_secs())
            .unwrap_or(0);
        if assessment.is_timed() {
            elapsed = elapsed.min(assessment.duration_secs);
        }

        let started_at = state.started_at.unwrap_or_else(Utc::now);
        Ok(Prepared::Ready(build_submission(
            assessment,
            &state.answers,
            elapsed,
            started_at,
            Utc::now(),
            reason,
            state.monitor.violations(),
        )))
    }

    /// The navigation the host should perform, handed out once.
    pub fn take_route(&self) -> Option<Route> {
        self.state().route.take()
    }

    pub fn receipt(&self) -> Option<SubmissionReceipt> {
        self.state().receipt.clone()
    }
}
