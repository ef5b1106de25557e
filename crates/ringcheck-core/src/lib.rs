//! Call-test orchestration for voice agents.
//!
//! For every test record this crate places outbound calls with a scripted tester
//! persona, waits for each call to end, merges the two-channel recording into a
//! speaker-attributed transcript and asks an LLM judge for one verdict per criterion.
//!
//! - Telephony, speech-to-text and LLM clients behind traits ([`providers`])
//! - Bounded status polling per call ([`engine::session`])
//! - Concurrent trials under a global call limit ([`engine::runner`])
//! - CSV input and report output ([`io`])
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! use ringcheck_core::{
//!     DeepgramClient, JudgeService, OpenAIClient, ProviderConfig, RunConfig, Runner,
//!     SessionController, VapiClient,
//! };
//!
//! # async fn example() -> anyhow::Result<()> {
//! let providers = ProviderConfig::from_env()?;
//! let run = RunConfig::new(&providers.vapi_number_id);
//!
//! let judge = JudgeService::new(Arc::new(OpenAIClient::from_config(&providers, run.judge_model.clone())?));
//! let session = SessionController::new(
//!     Arc::new(VapiClient::from_config(&providers)?),
//!     Arc::new(DeepgramClient::from_config(&providers)?),
//!     judge,
//!     run,
//! );
//!
//! let records = ringcheck_core::io::read_records(Path::new("suite.csv"))?;
//! let report = Runner::new(session).run_batch(records).await;
//! ringcheck_core::io::write_report(Path::new("suite_out.csv"), &report)?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod engine;
pub mod errors;
pub mod io;
pub mod judge;
pub mod locale;
pub mod model;
pub mod prompt;
pub mod providers;
pub mod transcript;

pub use config::{PollPolicy, ProviderConfig, RunConfig};
pub use engine::{Runner, SessionController};
pub use errors::{ConfigError, ProviderError, ProviderResult, SessionError};
pub use io::TabularError;
pub use judge::JudgeService;
pub use locale::Locale;
pub use model::{
    AbortReason, BatchReport, CallSession, CallStatus, Criterion, ResultRow, TestRecord,
    TrialAbort, TrialOutcome, Verdict,
};
pub use providers::{DeepgramClient, OpenAIClient, VapiClient};
pub use transcript::Transcript;
