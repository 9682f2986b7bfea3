use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use pedidos_parser::analysis::{Analysis, AnalysisInput, build_analysis};
use pedidos_parser::calendar::{BrazilianNationalHolidays, HolidayCache};
use pedidos_parser::changes::{DEFAULT_UPDATE_DIR, TrackedRecord, diff_records, write_update_file};
use pedidos_parser::deadline::{DeadlinePolicy, EdAssessment, format_deadlines, suggest_deadline};
use pedidos_parser::fees::FeePolicy;
use pedidos_parser::input::decode_pasted_bytes;
use pedidos_parser::{
    DecisionMode, ParseError, ParseOptions, PedidosReport, process_table, write_records_csv,
};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "pedidos",
    version,
    about = "Recover DataJuri pedidos tables from pasted text"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Parse a pasted table and print the report.
    Report(ReportArgs),
    /// Write the update file for records edited since they were loaded.
    Diff(DiffArgs),
    /// Suggest the next procedural deadline.
    Deadline(DeadlineArgs),
    /// Build the internal analysis report, and the client email when a lawyer is named.
    Analysis(AnalysisArgs),
}

#[derive(Debug, Args)]
struct ReportArgs {
    /// Pasted table file, or `-` for stdin.
    #[arg(short, long)]
    input: PathBuf,

    /// Decision type label, e.g. "Acórdão (TRT)".
    #[arg(short, long, default_value = "Sentença (Vara do Trabalho)")]
    decision: DecisionMode,

    /// Also export the sorted records as CSV.
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Output delimiter character for --csv.
    #[arg(long, default_value = ",")]
    delimiter: char,

    /// Keyword hits a line needs to be taken as the header.
    #[arg(long, default_value_t = 2)]
    min_header_keywords: usize,

    /// Enable verbose warning output.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Args)]
struct DiffArgs {
    /// JSON list of records as loaded.
    #[arg(long)]
    before: PathBuf,

    /// JSON list of records after editing.
    #[arg(long)]
    after: PathBuf,

    /// Case folder identifier used in the file name.
    #[arg(long)]
    pasta: String,

    #[arg(long, default_value = DEFAULT_UPDATE_DIR)]
    out_dir: PathBuf,
}

#[derive(Debug, Args)]
struct DeadlineArgs {
    /// Publication date (YYYY-MM-DD).
    #[arg(long)]
    ciencia: NaiveDate,

    /// Embargos de Declaração will be filed.
    #[arg(long, conflicts_with = "appeal")]
    ed: bool,

    /// Appeal to be filed when no ED is.
    #[arg(long, required_unless_present = "ed")]
    appeal: Option<String>,
}

#[derive(Debug, Args)]
struct AnalysisArgs {
    /// JSON file with the case assessment.
    #[arg(long)]
    case: PathBuf,

    /// Pasted table file, or `-` for stdin.
    #[arg(short, long)]
    input: PathBuf,

    /// Keyword hits a line needs to be taken as the header.
    #[arg(long, default_value_t = 2)]
    min_header_keywords: usize,

    /// Enable verbose warning output.
    #[arg(short, long)]
    verbose: bool,
}

fn read_input(path: &Path) -> Result<String> {
    let bytes = if path == Path::new("-") {
        let mut buffer = Vec::new();
        io::stdin()
            .read_to_end(&mut buffer)
            .context("failed to read stdin")?;
        buffer
    } else {
        fs::read(path).with_context(|| format!("failed to read '{}'", path.display()))?
    };
    Ok(decode_pasted_bytes(&bytes))
}

fn log_report(report: &PedidosReport, verbose: bool) {
    if report.warnings.is_empty() {
        return;
    }

    eprintln!("warning: {} issue(s) detected", report.warnings.len());
    if verbose {
        for warning in &report.warnings {
            eprintln!(
                "  - {:?} line={:?}: {}",
                warning.code, warning.line, warning.message
            );
        }
    }
}

fn run_report(args: &ReportArgs) -> Result<PedidosReport> {
    if !args.delimiter.is_ascii() {
        bail!("delimiter must be a single ASCII character");
    }

    if args.min_header_keywords == 0 {
        bail!("--min-header-keywords must be at least 1");
    }

    if !args.decision.is_known_option() {
        warn!(decision = %args.decision, "unrecognised decision type");
    }

    let text = read_input(&args.input)?;
    let options = ParseOptions {
        min_header_keywords: args.min_header_keywords,
        ..ParseOptions::default()
    };
    let report = process_table(&text, &args.decision, &options)
        .with_context(|| format!("failed to parse '{}'", args.input.display()))?;

    if let Some(csv_path) = &args.csv {
        write_records_csv(csv_path, &report.records, args.delimiter as u8)
            .with_context(|| format!("failed to write '{}'", csv_path.display()))?;
    }

    Ok(report)
}

fn load_tracked(path: &Path) -> Result<Vec<TrackedRecord>> {
    let bytes = fs::read(path).with_context(|| format!("failed to read '{}'", path.display()))?;
    serde_json::from_slice(&bytes)
        .with_context(|| format!("'{}' is not a JSON list of records", path.display()))
}

fn run_diff(args: &DiffArgs) -> Result<()> {
    let before = load_tracked(&args.before)?;
    let after = load_tracked(&args.after)?;
    let changes = diff_records(&before, &after);
    if changes.is_empty() {
        println!("Nenhuma alteração encontrada.");
        return Ok(());
    }

    let path = write_update_file(
        &args.out_dir,
        &args.pasta,
        Local::now().naive_local(),
        &changes,
    )
    .with_context(|| format!("failed to write update file in '{}'", args.out_dir.display()))?;
    println!("{}", path.display());
    Ok(())
}

fn run_deadline(args: &DeadlineArgs) -> Result<()> {
    let ed = if args.ed {
        EdAssessment::Cabe
    } else {
        EdAssessment::NaoCabe
    };
    let mut cache = HolidayCache::new(BrazilianNationalHolidays);
    let suggestion = suggest_deadline(
        &mut cache,
        &DeadlinePolicy::default(),
        args.ciencia,
        ed,
        args.appeal.as_deref(),
    )
    .context("failed to compute deadline")?;

    println!("{}", format_deadlines(suggestion.as_slice()));
    Ok(())
}

fn run_analysis(args: &AnalysisArgs) -> Result<Analysis> {
    if args.min_header_keywords == 0 {
        bail!("--min-header-keywords must be at least 1");
    }

    let case_bytes =
        fs::read(&args.case).with_context(|| format!("failed to read '{}'", args.case.display()))?;
    let case: AnalysisInput = serde_json::from_slice(&case_bytes)
        .with_context(|| format!("'{}' is not a valid case assessment", args.case.display()))?;
    if !case.decision.is_known_option() {
        warn!(decision = %case.decision, "unrecognised decision type");
    }

    let text = read_input(&args.input)?;
    let options = ParseOptions {
        min_header_keywords: args.min_header_keywords,
        ..ParseOptions::default()
    };
    let parsed = process_table(&text, &case.decision, &options)
        .with_context(|| format!("failed to parse '{}'", args.input.display()))?;
    log_report(&parsed, args.verbose);

    let mut cache = HolidayCache::new(BrazilianNationalHolidays);
    build_analysis(
        &mut cache,
        &DeadlinePolicy::default(),
        &FeePolicy::default(),
        &case,
        &parsed.records,
    )
    .context("failed to build the analysis")
}

fn print_analysis(analysis: &Analysis) {
    println!("{}", analysis.report);
    if let Some(email) = &analysis.email {
        println!("--------------------");
        println!("Assunto: {}", email.subject);
        println!();
        println!("{}", email.body);
    }
}

fn exit_code_for(error: &anyhow::Error) -> ExitCode {
    match error.downcast_ref::<ParseError>() {
        Some(ParseError::NoRecordsExtracted { .. }) => ExitCode::from(2),
        _ => ExitCode::from(1),
    }
}

fn main() -> ExitCode {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("pedidos=warn,pedidos_parser=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let cli = Cli::parse();
    let outcome = match cli.command {
        Commands::Report(args) => run_report(&args).map(|report| {
            log_report(&report, args.verbose);
            println!("{}", report.report);
        }),
        Commands::Diff(args) => run_diff(&args),
        Commands::Deadline(args) => run_deadline(&args),
        Commands::Analysis(args) => run_analysis(&args).map(|analysis| print_analysis(&analysis)),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            exit_code_for(&error)
        }
    }
}
