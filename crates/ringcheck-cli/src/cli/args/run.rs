//! Run command arguments.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use ringcheck_core::config::{
    DEFAULT_MAX_CONCURRENT_CALLS, DEFAULT_MAX_POLL_FAILURES, DEFAULT_MODEL,
};
use ringcheck_core::{Locale, RunConfig};

#[derive(Parser, Clone, Debug)]
pub struct RunArgs {
    /// Input CSV (id, number, title, instruction, numtest, test1..testN)
    pub input: PathBuf,

    /// Call locale: en, es or pt
    #[arg(default_value = "en")]
    pub locale: String,

    /// Output CSV (default: <input stem>_out.csv next to the input)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Upper bound on calls in flight across the whole batch
    #[arg(long, env = "RINGCHECK_MAX_CONCURRENT_CALLS", default_value_t = DEFAULT_MAX_CONCURRENT_CALLS)]
    pub max_concurrent_calls: usize,

    /// Seconds between call status queries
    #[arg(long, env = "RINGCHECK_POLL_INTERVAL_SECS", default_value_t = 5)]
    pub poll_interval_secs: u64,

    /// Failed status queries tolerated per call before the trial is abandoned
    #[arg(long, env = "RINGCHECK_MAX_POLL_FAILURES", default_value_t = DEFAULT_MAX_POLL_FAILURES)]
    pub max_poll_failures: u32,

    /// Model that judges each criterion
    #[arg(long, env = "RINGCHECK_JUDGE_MODEL", default_value = DEFAULT_MODEL)]
    pub judge_model: String,

    /// Model that drives the tester persona during the call
    #[arg(long, env = "RINGCHECK_TESTER_MODEL", default_value = DEFAULT_MODEL)]
    pub tester_model: String,
}

impl RunArgs {
    pub fn run_config(&self, locale: Locale, phone_number_id: &str) -> RunConfig {
        RunConfig::new(phone_number_id)
            .with_locale(locale)
            .with_poll_interval(Duration::from_secs(self.poll_interval_secs))
            .with_max_poll_failures(self.max_poll_failures)
            .with_max_concurrent_calls(self.max_concurrent_calls)
            .with_judge_model(&self.judge_model)
            .with_tester_model(&self.tester_model)
    }
}
