use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod run;
pub use run::*;

#[derive(Parser)]
#[command(
    name = "ringcheck",
    version,
    about = "Call-test voice agents: place scripted calls, transcribe them and judge each criterion"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Call every record in a CSV suite and write the judged results
    Run(RunArgs),
    /// Parse a CSV suite without placing any calls
    Validate(ValidateArgs),
    /// List supported call locales
    Locales,
}

#[derive(Parser, Clone, Debug)]
pub struct ValidateArgs {
    /// Input CSV (id, number, title, instruction, numtest, test1..testN)
    pub input: PathBuf,
}
