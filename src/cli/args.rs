use clap::Parser;
use std::path::PathBuf;

/// Process a batch of banking operations against an in-memory ledger
#[derive(Parser, Debug)]
#[command(name = "banking-batch-engine")]
#[command(
    about = "Process a batch of banking operations from a CSV or JSON file",
    long_about = None
)]
pub struct CliArgs {
    /// Input batch file; `.json` is parsed as JSON, anything else as CSV
    #[arg(value_name = "INPUT", help = "Path to the batch file (.csv or .json)")]
    pub input_file: PathBuf,

    /// Validate only: report what would happen without touching the ledger
    #[arg(long, help = "Validate only; do not execute or mutate the ledger")]
    pub preview: bool,

    /// Print the per-operation detailed report after the run
    #[arg(long, help = "Print the per-operation detailed report")]
    pub detailed: bool,

    /// Emit the summary as JSON instead of human-readable text
    #[arg(long, help = "Emit the summary as JSON")]
    pub json: bool,

    /// Name of the ledger owner
    #[arg(
        long,
        value_name = "NAME",
        default_value = "user",
        help = "Ledger owner name"
    )]
    pub owner: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::defaults(&["program", "batch.csv"], false, false, false)]
    #[case::preview(&["program", "--preview", "batch.csv"], true, false, false)]
    #[case::detailed(&["program", "--detailed", "batch.csv"], false, true, false)]
    #[case::all(
        &["program", "--preview", "--detailed", "--json", "batch.json"],
        true,
        true,
        true
    )]
    fn test_flag_parsing(
        #[case] args: &[&str],
        #[case] preview: bool,
        #[case] detailed: bool,
        #[case] json: bool,
    ) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.preview, preview);
        assert_eq!(parsed.detailed, detailed);
        assert_eq!(parsed.json, json);
    }

    #[test]
    fn test_owner_default_and_override() {
        let parsed = CliArgs::try_parse_from(["program", "batch.csv"]).unwrap();
        assert_eq!(parsed.owner, "user");

        let parsed =
            CliArgs::try_parse_from(["program", "--owner", "alice", "batch.csv"]).unwrap();
        assert_eq!(parsed.owner, "alice");
    }

    #[test]
    fn test_input_is_required() {
        assert!(CliArgs::try_parse_from(["program"]).is_err());
    }
}
