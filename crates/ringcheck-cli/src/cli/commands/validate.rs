use anyhow::Context;
use ringcheck_core::io;

use crate::cli::args::ValidateArgs;
use crate::exit_codes::SUCCESS;

pub fn run(args: ValidateArgs) -> anyhow::Result<i32> {
    let records = io::read_records(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;

    for record in &records {
        println!(
            "{}\t{}\ttrials={}\tcriteria={}",
            record.id,
            record.title,
            record.numtest,
            record.criteria.len()
        );
    }

    let calls: u64 = records.iter().map(|r| u64::from(r.numtest)).sum();
    let rows: usize = records.iter().map(|r| r.expected_rows()).sum();
    println!(
        "{} records, {} calls, up to {} verdict rows",
        records.len(),
        calls,
        rows
    );
    Ok(SUCCESS)
}
