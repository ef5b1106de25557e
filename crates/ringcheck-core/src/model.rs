use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One named pass/fail rule attached to a test record (`test1`, `test2`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criterion {
    /// Column name the criterion was loaded from.
    pub key: String,
    pub text: String,
}

impl Criterion {
    pub fn new(key: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            text: text.into(),
        }
    }
}

/// One input row: who to call, how the tester behaves, how often, and what to judge.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TestRecord {
    pub id: String,
    pub number: String,
    pub title: String,
    pub instruction: String,
    /// Number of independent trials (calls) to place.
    pub numtest: u32,
    /// Criteria in declaration order.
    pub criteria: Vec<Criterion>,
    /// Columns that are neither known fields nor criteria.
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

impl TestRecord {
    /// Look up any input column by (lowercased) name.
    pub fn get(&self, name: &str) -> Option<&str> {
        match name {
            "id" => Some(&self.id),
            "number" => Some(&self.number),
            "title" => Some(&self.title),
            "instruction" => Some(&self.instruction),
            _ => self
                .criteria
                .iter()
                .find(|c| c.key == name)
                .map(|c| c.text.as_str())
                .or_else(|| self.extra.get(name).map(String::as_str)),
        }
    }

    /// Rows a fully successful record contributes.
    pub fn expected_rows(&self) -> usize {
        self.numtest as usize * self.criteria.len()
    }
}

/// Telephony call status as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallStatus {
    Queued,
    Ringing,
    InProgress,
    Forwarding,
    Ended,
    Unknown(String),
}

impl CallStatus {
    pub fn parse(s: &str) -> Self {
        match s {
            "queued" => CallStatus::Queued,
            "ringing" => CallStatus::Ringing,
            "in-progress" => CallStatus::InProgress,
            "forwarding" => CallStatus::Forwarding,
            "ended" => CallStatus::Ended,
            other => CallStatus::Unknown(other.to_string()),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, CallStatus::Ended)
    }
}

impl fmt::Display for CallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CallStatus::Queued => "queued",
            CallStatus::Ringing => "ringing",
            CallStatus::InProgress => "in-progress",
            CallStatus::Forwarding => "forwarding",
            CallStatus::Ended => "ended",
            CallStatus::Unknown(s) => s,
        };
        f.write_str(s)
    }
}

/// Snapshot of one placed call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSession {
    pub id: String,
    pub status: CallStatus,
    pub recording_url: Option<String>,
    /// Two-channel recording (agent left, tester right) used for transcription.
    pub stereo_recording_url: Option<String>,
    /// Call id on the carrier side.
    pub provider_call_id: Option<String>,
    pub ended_reason: Option<String>,
}

impl CallSession {
    pub fn new(id: impl Into<String>, status: CallStatus) -> Self {
        Self {
            id: id.into(),
            status,
            recording_url: None,
            stereo_recording_url: None,
            provider_call_id: None,
            ended_reason: None,
        }
    }
}

/// Judge outcome for one criterion on one trial.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Verdict {
    pub passed: bool,
    #[serde(default)]
    pub reasoning: String,
}

impl Verdict {
    /// Explicit failing verdict used when the judge gave no usable answer.
    pub fn unjudged() -> Self {
        Self::default()
    }
}

/// One output row: record identity x criterion x trial, with the verdict and call data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRow {
    pub id: String,
    pub title: String,
    pub number: String,
    pub instruction: String,
    pub trial: u32,
    pub criterion: String,
    pub test: String,
    pub passed: bool,
    pub reasoning: String,
    pub transcript: String,
    pub call_id: String,
    pub recording_url: Option<String>,
    pub receiver_call_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbortReason {
    CallCreation(String),
    PollFailures { attempts: u32 },
    Panicked(String),
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbortReason::CallCreation(msg) => write!(f, "call creation failed: {}", msg),
            AbortReason::PollFailures { attempts } => {
                write!(f, "poll failures exceeded ({})", attempts)
            }
            AbortReason::Panicked(msg) => write!(f, "trial panicked: {}", msg),
        }
    }
}

/// A trial that ended without any verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialAbort {
    pub record_id: String,
    pub title: String,
    pub number: String,
    pub instruction: String,
    pub trial: u32,
    pub call_id: Option<String>,
    pub reason: AbortReason,
}

impl TrialAbort {
    pub fn new(record: &TestRecord, trial: u32, call_id: Option<String>, reason: AbortReason) -> Self {
        Self {
            record_id: record.id.clone(),
            title: record.title.clone(),
            number: record.number.clone(),
            instruction: record.instruction.clone(),
            trial,
            call_id,
            reason,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrialOutcome {
    Completed(Vec<ResultRow>),
    Aborted(TrialAbort),
}

impl TrialOutcome {
    pub fn rows(&self) -> &[ResultRow] {
        match self {
            TrialOutcome::Completed(rows) => rows,
            TrialOutcome::Aborted(_) => &[],
        }
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, TrialOutcome::Aborted(_))
    }
}

/// Flattened result of a batch, in completion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub rows: Vec<ResultRow>,
    pub aborts: Vec<TrialAbort>,
}

impl BatchReport {
    pub fn push(&mut self, outcome: TrialOutcome) {
        match outcome {
            TrialOutcome::Completed(rows) => self.rows.extend(rows),
            TrialOutcome::Aborted(abort) => self.aborts.push(abort),
        }
    }

    pub fn extend(&mut self, other: BatchReport) {
        self.rows.extend(other.rows);
        self.aborts.extend(other.aborts);
    }

    pub fn passed(&self) -> usize {
        self.rows.iter().filter(|r| r.passed).count()
    }

    pub fn failed(&self) -> usize {
        self.rows.len() - self.passed()
    }
}
