// sheetdiff - key-based diff of two CSV files

mod exit_codes;
mod report;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;

use sheetdiff_io::{CsvSink, CsvSource};
use sheetdiff_recon::{Diff, DiffConfig, DiffError, DiffInput, DiffOutput, Outcome, SheetError};

use exit_codes::{diff_exit_code, EXIT_IO, EXIT_SUCCESS, EXIT_USAGE};
use report::StdReporter;

#[derive(Parser)]
#[command(name = "sheetdiff")]
#[command(about = "Diff two CSV files record by record, keyed on an id column")]
#[command(long_version = long_version())]
#[command(version)]
#[command(after_help = "\
Cells that differ are written as `a<<>>b` (value in FILE_A, then value in FILE_B).
With --show-missing, records only present in FILE_B follow a `<<<<<<` row and
records only present in FILE_A follow a `>>>>>>` row.

Examples:
  sheetdiff id old.csv new.csv diff.csv
  sheetdiff -d -m sku stock_mon.csv stock_tue.csv changes.csv
  sheetdiff --delimiter ';' --config run.toml id a.csv b.csv out.csv")]
struct Cli {
    /// Column whose value identifies a record in both files
    id_column: String,

    /// First input (cell values marked with `<<`)
    file_a: PathBuf,

    /// Second input (cell values marked with `>>`)
    file_b: PathBuf,

    /// Diff file to write; left untouched when there is nothing to report
    output: PathBuf,

    /// Blank out cells that are identical in both files
    #[arg(long, short = 'd')]
    diffs_only: bool,

    /// Append the records missing from either file
    #[arg(long, short = 'm')]
    show_missing: bool,

    /// Treat "0" and an empty cell as different
    #[arg(long, short = 'z')]
    zero_not_null: bool,

    /// CSV field delimiter (default: ,)
    #[arg(long)]
    delimiter: Option<char>,

    /// TOML file with default options; flags take precedence
    #[arg(long, value_name = "PATH", env = "SHEETDIFF_CONFIG")]
    config: Option<PathBuf>,

    /// Diff matching records on all cores
    #[arg(long)]
    parallel: bool,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress the report on stdout
    #[arg(long, short = 'q')]
    quiet: bool,
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            "\nengine:  sheetdiff-recon ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   debug",
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            "\nengine:  sheetdiff-recon ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   release",
        )
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match cmd_diff(cli) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

/// `warn` by default, raised by each `-v`; `RUST_LOG` wins when set.
fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_env("RUST_LOG")
        .format_timestamp(None)
        .target(env_logger::Target::Stderr)
        .init();
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<DiffError> for CliError {
    fn from(err: DiffError) -> Self {
        let code = diff_exit_code(&err);
        let hint = match &err {
            DiffError::Parse { source: SheetError::IdColumnNotFound(_), .. } => {
                Some("the id column must appear in the header row of both files".to_string())
            }
            DiffError::Parse { source: SheetError::EmptyInput, .. } => {
                Some("the first line of each file must be a header row".to_string())
            }
            DiffError::Config(_) => Some("check the file passed to --config".to_string()),
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }
}

// ============================================================================
// diff
// ============================================================================

fn cmd_diff(cli: Cli) -> Result<(), CliError> {
    if cli.id_column.is_empty() {
        return Err(CliError::args("id column must not be empty"));
    }

    let mut config = match &cli.config {
        Some(path) => DiffConfig::from_path(path)?,
        None => DiffConfig::default(),
    };
    if cli.diffs_only {
        config.show_identical = false;
    }
    if cli.show_missing {
        config.show_missing = true;
    }
    if cli.zero_not_null {
        config.zero_matches_null = false;
    }
    if cli.parallel {
        config.parallel = true;
    }
    if let Some(delimiter) = cli.delimiter {
        config.csv.delimiter = delimiter;
        config
            .validate()
            .map_err(|e| CliError::args(e.to_string()))?;
    }

    let options = config.options(Some(&cli.id_column))?;
    let delimiter = config.csv.delimiter_byte();
    log::debug!("options: {options:?}, delimiter {:?}", config.csv.delimiter);

    let name_a = cli.file_a.display().to_string();
    let name_b = cli.file_b.display().to_string();
    let name_out = cli.output.display().to_string();

    let source_a = open_input(&cli.file_a, delimiter)?;
    let source_b = open_input(&cli.file_b, delimiter)?;

    let mut reporter = StdReporter::new(cli.quiet);
    let outcome = Diff::new(options).run(
        DiffInput::new(&name_a, source_a),
        DiffInput::new(&name_b, source_b),
        DiffOutput::new(&name_out, || CsvSink::to_path(&cli.output, delimiter)),
        &mut reporter,
    )?;

    match outcome {
        Outcome::Written(summary) => log::info!(
            "{name_out}: {} diff rows ({}), {} missing from {name_a}, {} missing from {name_b}",
            summary.diff_rows,
            if summary.has_diff { "with differences" } else { "no cell differences" },
            summary.missing_from_a.len(),
            summary.missing_from_b.len(),
        ),
        other => log::info!("nothing written: {other:?}"),
    }
    Ok(())
}

fn open_input(
    path: &std::path::Path,
    delimiter: u8,
) -> Result<CsvSource<std::io::Cursor<Vec<u8>>>, CliError> {
    CsvSource::from_path(path, delimiter).map_err(|e| {
        CliError::io(e.to_string()).with_hint("check that the file exists and is readable")
    })
}
