use std::sync::Arc;

use anyhow::Context;
use ringcheck_core::{
    io, DeepgramClient, JudgeService, Locale, OpenAIClient, ProviderConfig, RunConfig, Runner,
    SessionController, VapiClient,
};
use tracing::info;

use crate::cli::args::RunArgs;
use crate::exit_codes::SUCCESS;

pub async fn run(args: RunArgs) -> anyhow::Result<i32> {
    // Checked before touching the input or credentials.
    let locale: Locale = args.locale.parse()?;

    let records = io::read_records(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let providers = ProviderConfig::from_env()?;
    let config = args.run_config(locale, &providers.vapi_number_id);
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| io::default_output_path(&args.input));

    info!(
        records = records.len(),
        locale = %locale,
        max_concurrent_calls = config.max_concurrent_calls,
        output = %output.display(),
        "starting batch"
    );

    let runner = Runner::new(build_session(&providers, config)?);
    let report = runner.run_batch(records).await;

    io::write_report(&output, &report)
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!(
        "{} verdicts ({} passed, {} failed), {} trials aborted",
        report.rows.len(),
        report.passed(),
        report.failed(),
        report.aborts.len()
    );
    println!("Results written to {}", output.display());
    Ok(SUCCESS)
}

fn build_session(providers: &ProviderConfig, config: RunConfig) -> anyhow::Result<SessionController> {
    let calls = VapiClient::from_config(providers).context("failed to build telephony client")?;
    let transcriber =
        DeepgramClient::from_config(providers).context("failed to build transcription client")?;
    let llm = OpenAIClient::from_config(providers, config.judge_model.clone())
        .context("failed to build judge client")?;

    Ok(SessionController::new(
        Arc::new(calls),
        Arc::new(transcriber),
        JudgeService::new(Arc::new(llm)),
        config,
    ))
}
