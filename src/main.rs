//! Banking Batch Engine CLI
//!
//! Command-line driver for the batch pipeline.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- operations.csv
//! cargo run -- --preview operations.csv
//! cargo run -- --detailed --json operations.json
//! ```
//!
//! The program starts from an empty ledger for the named owner (accounts
//! are opened by `create_account` operations in the batch), runs the file
//! through the pipeline, and prints the summary to stdout. Ledger
//! persistence is an external concern and is not handled here.
//!
//! # Exit codes
//!
//! - 0: batch ran (individual operations may still have failed; see the
//!   summary)
//! - 1: whole-file failure (missing file, malformed JSON document)

use banking_batch_engine::batch::{detailed_report, BatchRunOptions, BatchRunner};
use banking_batch_engine::cli;
use banking_batch_engine::core::Ledger;
use banking_batch_engine::types::BatchOperation;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = cli::parse_args();
    let mut ledger = Ledger::new(args.owner.clone());
    let mut runner = BatchRunner::new();

    let mut progress = |completed: usize, total: usize, operation: &BatchOperation| {
        tracing::debug!(
            completed,
            total,
            operation = operation.kind.label(),
            status = %operation.status,
            "progress"
        );
    };

    let options = BatchRunOptions {
        preview: args.preview,
        progress: Some(&mut progress),
    };

    let run = match runner.run(&args.input_file, &mut ledger, options) {
        Ok(run) => run,
        Err(error) => {
            eprintln!("Error: {}", error);
            process::exit(1);
        }
    };

    if args.detailed {
        print!("{}", detailed_report(&run.operations));
        println!();
    }

    if args.json {
        match serde_json::to_string_pretty(&run.summary) {
            Ok(json) => println!("{}", json),
            Err(error) => {
                eprintln!("Error: failed to serialize summary: {}", error);
                process::exit(1);
            }
        }
    } else {
        let summary = &run.summary;
        println!(
            "{}: {} operations, {} succeeded, {} failed ({:.1}% success, {:.3}s)",
            if args.preview { "Preview" } else { "Batch" },
            summary.total_operations,
            summary.successful,
            summary.failed,
            summary.success_rate,
            summary.total_execution_time
        );
        for detail in &summary.failed_operations {
            let position = detail
                .line_number
                .map(|line| format!("line {}", line))
                .unwrap_or_else(|| "-".to_string());
            println!(
                "  failed {} [{}]: {}",
                detail.operation_type,
                position,
                detail.error_message.as_deref().unwrap_or("unknown error")
            );
        }
        for account in ledger.accounts() {
            println!(
                "  {} balance {}{}",
                account.account_type,
                account.balance,
                account
                    .nickname
                    .as_deref()
                    .map(|nick| format!(" ({})", nick))
                    .unwrap_or_default()
            );
        }
    }
}
