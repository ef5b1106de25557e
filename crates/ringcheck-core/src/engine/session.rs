//! Lifecycle of one outbound test call.
//!
//! ```text
//! create ──> Pending ──(status ended)──> Ended ──> transcribe ──> judge each criterion
//!              │  ^
//!              │  └─(active | query failed, failures < max)── sleep(interval)
//!              └──(query failed, failures == max)──> Aborted
//! ```

use std::sync::Arc;

use tracing::{debug, info, info_span, warn, Instrument};

use crate::config::RunConfig;
use crate::errors::SessionError;
use crate::judge::JudgeService;
use crate::model::{AbortReason, CallSession, ResultRow, TestRecord, TrialAbort, TrialOutcome};
use crate::providers::{AssistantConfig, CallProvider, Transcriber};
use crate::transcript::Transcript;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Pending,
    Ended,
    Aborted,
}

/// Poll bookkeeping owned by exactly one session.
#[derive(Debug)]
pub(crate) struct PollState {
    state: SessionState,
    failures: u32,
    polls: u32,
}

impl PollState {
    pub(crate) fn new() -> Self {
        Self {
            state: SessionState::Pending,
            failures: 0,
            polls: 0,
        }
    }

    pub(crate) fn on_status(&mut self, call: &CallSession) -> SessionState {
        self.polls += 1;
        if call.status.is_terminal() {
            self.state = SessionState::Ended;
        }
        self.state
    }

    pub(crate) fn on_failure(&mut self, max_failures: u32) -> SessionState {
        self.polls += 1;
        self.failures += 1;
        if self.failures >= max_failures {
            self.state = SessionState::Aborted;
        }
        self.state
    }

    pub(crate) fn failures(&self) -> u32 {
        self.failures
    }
}

#[derive(Debug)]
pub enum PollOutcome {
    Ended(CallSession),
    Aborted { failures: u32 },
}

#[derive(Clone)]
pub struct SessionController {
    calls: Arc<dyn CallProvider>,
    transcriber: Arc<dyn Transcriber>,
    judge: JudgeService,
    config: Arc<RunConfig>,
}

impl SessionController {
    pub fn new(
        calls: Arc<dyn CallProvider>,
        transcriber: Arc<dyn Transcriber>,
        judge: JudgeService,
        config: RunConfig,
    ) -> Self {
        Self {
            calls,
            transcriber,
            judge,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Run one trial end to end. Never fails: every early exit becomes
    /// [`TrialOutcome::Aborted`], which contributes no rows.
    pub async fn run_session(&self, record: &TestRecord, trial: u32) -> TrialOutcome {
        let span = info_span!("session", record_id = %record.id, trial);
        self.run_session_inner(record, trial).instrument(span).await
    }

    async fn run_session_inner(&self, record: &TestRecord, trial: u32) -> TrialOutcome {
        info!(total = record.numtest, "starting trial");

        // Creation failures abort this trial only.
        let call = match self.place_call(record).await {
            Ok(call) => call,
            Err(SessionError::CallCreation(e)) => {
                warn!(error = %e, "call creation rejected; aborting trial");
                return TrialOutcome::Aborted(TrialAbort::new(
                    record,
                    trial,
                    None,
                    AbortReason::CallCreation(e.to_string()),
                ));
            }
        };

        let call = match self.await_completion(&call.id).await {
            PollOutcome::Ended(call) => call,
            PollOutcome::Aborted { failures } => {
                warn!(call_id = %call.id, failures, "max failed status queries reached; aborting trial");
                return TrialOutcome::Aborted(TrialAbort::new(
                    record,
                    trial,
                    Some(call.id),
                    AbortReason::PollFailures { attempts: failures },
                ));
            }
        };

        let transcript = self.transcribe(&call).await;
        let rows = self.judge_criteria(record, trial, &call, &transcript).await;
        info!(
            call_id = %call.id,
            rows = rows.len(),
            passed = rows.iter().filter(|r| r.passed).count(),
            "trial complete"
        );
        TrialOutcome::Completed(rows)
    }

    /// Create the outbound call. Not retried: a rejection means bad configuration.
    pub async fn place_call(&self, record: &TestRecord) -> Result<CallSession, SessionError> {
        let assistant =
            AssistantConfig::for_record(record, self.config.locale, &self.config.tester_model);
        let call = self
            .calls
            .create_call(&self.config.phone_number_id, &record.number, &assistant)
            .await
            .map_err(SessionError::CallCreation)?;
        info!(call_id = %call.id, number = %record.number, "call placed");
        Ok(call)
    }

    /// Poll until the call ends or the failure budget is spent.
    pub async fn await_completion(&self, call_id: &str) -> PollOutcome {
        let policy = self.config.poll;
        let mut poll = PollState::new();

        loop {
            let state = match self.calls.get_call(call_id).await {
                Ok(call) => {
                    if poll.on_status(&call) == SessionState::Ended {
                        info!(
                            call_id,
                            ended_reason = call.ended_reason.as_deref().unwrap_or("unknown"),
                            "call ended"
                        );
                        return PollOutcome::Ended(call);
                    }
                    debug!(call_id, status = %call.status, "call still active");
                    SessionState::Pending
                }
                Err(e) => {
                    let state = poll.on_failure(policy.max_failures);
                    warn!(
                        call_id,
                        error = %e,
                        retryable = e.is_retryable(),
                        failures = poll.failures(),
                        max_failures = policy.max_failures,
                        "call status query failed"
                    );
                    state
                }
            };

            if state == SessionState::Aborted {
                return PollOutcome::Aborted {
                    failures: poll.failures(),
                };
            }
            tokio::time::sleep(policy.interval).await;
        }
    }

    /// Transcribe the stereo recording. Degrades to [`Transcript::Unavailable`].
    pub async fn transcribe(&self, call: &CallSession) -> Transcript {
        let Some(url) = call.stereo_recording_url.as_deref() else {
            warn!(call_id = %call.id, "call has no stereo recording");
            return Transcript::Unavailable;
        };

        match self.transcriber.transcribe_url(url).await {
            Ok(payload) => Transcript::from_stt_payload(&payload),
            Err(e) => {
                warn!(
                    call_id = %call.id,
                    error = %e,
                    provider = self.transcriber.provider_name(),
                    "transcription failed"
                );
                Transcript::Unavailable
            }
        }
    }

    /// Judge every criterion in declaration order, one row each.
    async fn judge_criteria(
        &self,
        record: &TestRecord,
        trial: u32,
        call: &CallSession,
        transcript: &Transcript,
    ) -> Vec<ResultRow> {
        let transcript_text = transcript.to_string();
        let mut rows = Vec::with_capacity(record.criteria.len());

        for criterion in &record.criteria {
            let verdict = self.judge.judge(&criterion.text, &transcript_text).await;
            debug!(criterion = %criterion.key, passed = verdict.passed, "criterion judged");
            rows.push(ResultRow {
                id: record.id.clone(),
                title: record.title.clone(),
                number: record.number.clone(),
                instruction: record.instruction.clone(),
                trial,
                criterion: criterion.key.clone(),
                test: criterion.text.clone(),
                passed: verdict.passed,
                reasoning: verdict.reasoning,
                transcript: transcript_text.clone(),
                call_id: call.id.clone(),
                recording_url: call.recording_url.clone(),
                receiver_call_id: call.provider_call_id.clone(),
            });
        }
        rows
    }
}
