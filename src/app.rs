use std::io;
use std::path::{Path, PathBuf};

use chrono::Duration;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::analysis::{AnalysisReport, DataSource, ReportSummary, analyze_batches, write_artifact};
use crate::chat::{
    BackendMode, ChatSession, HistoryStore, LlmResponder, RuleResponder, run_interactive, run_queries,
    select_backend,
};
use crate::check::{CheckContext, CheckItem, failed_count, run_checks};
use crate::cli::{Cli, Commands, ExportKind, GenerateArgs, Mode};
use crate::config::Config;
use crate::consts::{DEFAULT_OLLAMA_URL, HISTORY_DB_FILE};
use crate::error::AppError;
use crate::generator::{GenerationSummary, make_rng, sample_readings};
use crate::output::{
    render_batch_detail, render_checks, render_dashboard, render_overview, render_text_report,
};
use crate::telemetry::{InputSource, load_csv, resolve_input, write_csv};
use crate::utils::now_local;

/// Span covered by the built-in sample, ending now
const SAMPLE_SPAN_MINUTES: i64 = 500 * 10;

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Everything a component needs after input resolution
struct LoadedAnalysis {
    report: AnalysisReport,
    /// Where a fresh analysis was auto-saved; `None` for report inputs
    saved: Option<PathBuf>,
}

/// Resolve, load and (for raw telemetry) analyze the input for `mode`
fn load_analysis(cli: &Cli, mode: Mode) -> Result<LoadedAnalysis, AppError> {
    let data_dir = cli.data_dir();
    let work_dir = std::env::current_dir()?;
    let report_dir = (mode != Mode::Analyzer).then_some(data_dir.as_path());

    let source = match resolve_input(
        cli.input.as_deref(),
        cli.sample,
        &[work_dir.as_path(), data_dir.as_path()],
        report_dir,
    ) {
        Some(source) => source,
        None if mode == Mode::Analyzer => {
            warn!("No telemetry CSV found; analyzing built-in sample data");
            InputSource::Sample
        }
        None => return Err(AppError::NoData),
    };
    info!("Using {}", source.describe());

    let (readings, data_source) = match &source {
        InputSource::Report(path) => {
            return Ok(LoadedAnalysis {
                report: AnalysisReport::load(path)?,
                saved: None,
            });
        }
        InputSource::Sample => {
            let start = now_local() - Duration::minutes(SAMPLE_SPAN_MINUTES);
            (sample_readings(start, &mut make_rng(None)), DataSource::SampleData)
        }
        InputSource::Csv(path) => {
            let loaded = load_csv(path)?;
            if loaded.skipped > 0 {
                warn!(
                    "Skipped {} unparseable row(s) in {}",
                    loaded.skipped,
                    path.display()
                );
            }
            let data_source = if mode == Mode::Analyzer {
                DataSource::WaterPumpTemperatureSensor
            } else {
                DataSource::CsvFile
            };
            (loaded.readings, data_source)
        }
    };

    let window_size = cli.window_size();
    let batches = analyze_batches(&readings, window_size)?;
    let report = AnalysisReport::new(batches, window_size, data_source);
    let prefix = mode.report_prefix(source == InputSource::Sample);
    let saved = report.save(&data_dir, prefix)?;
    debug!(path = %saved.display(), batches = report.analysis_results.len(), "saved analysis");

    Ok(LoadedAnalysis {
        report,
        saved: Some(saved),
    })
}

pub(crate) fn run_generate(args: &GenerateArgs, json: bool) -> Result<(), AppError> {
    let mut rng = make_rng(args.seed);
    let start = args
        .start
        .unwrap_or_else(|| args.scenario.default_start(now_local(), args.duration));
    let readings = args.scenario.generate(start, args.duration, &mut rng);
    write_csv(&args.output, &readings)?;
    info!(
        scenario = ?args.scenario,
        records = readings.len(),
        path = %args.output.display(),
        "generated telemetry"
    );

    let Some(summary) = GenerationSummary::from_readings(&readings) else {
        return Err(AppError::NoReadings {
            input: args.output.display().to_string(),
        });
    };

    if json {
        #[derive(Serialize)]
        struct GenerateOutput<'a> {
            output: &'a Path,
            #[serde(flatten)]
            summary: &'a GenerationSummary,
        }
        return print_json(&GenerateOutput {
            output: &args.output,
            summary: &summary,
        });
    }

    println!("Wrote {} readings to {}", summary.records, args.output.display());
    println!(
        "  Period: {} ~ {}",
        summary.start.format("%Y-%m-%d %H:%M"),
        summary.end.format("%Y-%m-%d %H:%M")
    );
    println!("  Range:  {:.1}°C ~ {:.1}°C", summary.min, summary.max);
    println!("  Mean:   {:.1}°C", summary.mean);
    Ok(())
}

pub(crate) fn run_check(cli: &Cli, config: &Config) -> Result<(), AppError> {
    let ctx = CheckContext {
        work_dir: std::env::current_dir()?,
        data_dir: cli.data_dir(),
        config_source: config.source.clone(),
        api_key_present: cli.api_key_present(),
        ollama_url: cli
            .ollama_url
            .clone()
            .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string()),
    };
    let items = run_checks(&ctx);
    let failed = failed_count(&items);

    if cli.json {
        #[derive(Serialize)]
        struct CheckOutput<'a> {
            ready: bool,
            checks: &'a [CheckItem],
        }
        print_json(&CheckOutput {
            ready: failed == 0,
            checks: &items,
        })?;
    } else {
        print!("{}", render_checks(&items, cli.use_color()));
    }

    if failed > 0 {
        return Err(AppError::CheckFailed { failed });
    }
    Ok(())
}

pub(crate) fn run_analyzer(cli: &Cli) -> Result<(), AppError> {
    let loaded = load_analysis(cli, Mode::Analyzer)?;
    let summary = ReportSummary::from_report(&loaded.report)?;

    if cli.json {
        #[derive(Serialize)]
        struct AnalyzerOutput<'a> {
            report_path: Option<&'a Path>,
            #[serde(flatten)]
            summary: &'a ReportSummary,
        }
        return print_json(&AnalyzerOutput {
            report_path: loaded.saved.as_deref(),
            summary: &summary,
        });
    }

    print!("{}", render_overview(&summary, cli.use_color()));
    println!(
        "\n  Alert levels: {}",
        summary
            .alert_counts
            .iter()
            .map(|(level, count)| format!("{level} {count}"))
            .collect::<Vec<_>>()
            .join(", ")
    );
    if let Some(path) = &loaded.saved {
        println!("  Report written to {}", path.display());
    }
    Ok(())
}

pub(crate) fn run_dashboard(cli: &Cli) -> Result<(), AppError> {
    let loaded = load_analysis(cli, Mode::Dashboard)?;
    if let Some(path) = &loaded.saved {
        eprintln!("Analysis saved to {}", path.display());
    }
    let report = &loaded.report;
    let summary = ReportSummary::from_report(report)?;
    let use_color = cli.use_color();

    match (cli.batch, cli.json) {
        (Some(id), true) => print_json(report.batch(id)?)?,
        (Some(id), false) => print!("{}", render_batch_detail(report.batch(id)?, use_color)),
        (None, true) => print_json(&summary)?,
        (None, false) => print!("{}", render_dashboard(report, &summary, use_color)),
    }

    if let Some(kind) = cli.export {
        let data_dir = cli.data_dir();
        if matches!(kind, ExportKind::Json | ExportKind::All) {
            let path = report.save(&data_dir, "water_pump_analysis")?;
            eprintln!("Exported analysis JSON to {}", path.display());
        }
        if matches!(kind, ExportKind::Report | ExportKind::All) {
            let text = render_text_report(report, &summary);
            let path = write_artifact(&data_dir, "pump_report", "txt", &text)?;
            eprintln!("Exported text report to {}", path.display());
        }
    }
    Ok(())
}

fn open_history(cli: &Cli) -> Result<Option<HistoryStore>, AppError> {
    if !cli.save_history {
        return Ok(None);
    }
    let store = HistoryStore::open(&cli.data_dir().join(HISTORY_DB_FILE))?;
    info!(
        path = %store.path().display(),
        earlier_sessions = store.session_count()?,
        "saving chat history"
    );
    Ok(Some(store))
}

fn converse(cli: &Cli, mut session: ChatSession) -> Result<(), AppError> {
    if let Some(store) = open_history(cli)? {
        session = session.with_history(store);
    }
    let result = if cli.queries.is_empty() {
        run_interactive(&mut session, io::stdin().lock(), io::stdout().lock())
    } else {
        run_queries(&mut session, &cli.queries, io::stdout().lock())
    };
    debug!(messages = session.messages().len(), "chat session ended");
    result
}

pub(crate) fn run_chatbot(cli: &Cli) -> Result<(), AppError> {
    let loaded = load_analysis(cli, Mode::Chatbot)?;
    if let Some(path) = &loaded.saved {
        eprintln!("Analysis saved to {}", path.display());
    }
    let responder = RuleResponder::new(loaded.report)?;
    converse(cli, ChatSession::new(Box::new(responder)))
}

/// Backend is selected and pinged before any telemetry is touched
pub(crate) fn run_llm_chatbot(cli: &Cli, config: &Config) -> Result<(), AppError> {
    let backend_config = cli.backend_config(config)?;
    let backend = select_backend(&backend_config)?;
    if let Err(e) = backend.check_ready() {
        if e.is_connection_failure() && backend_config.mode == BackendMode::Local {
            warn!("Start the server with `ollama serve` or pass --ollama-url");
        }
        return Err(e.into());
    }
    debug!(backend = backend.name(), model = backend.model(), "LLM backend ready");

    let loaded = load_analysis(cli, Mode::LlmChatbot)?;
    if let Some(path) = &loaded.saved {
        eprintln!("Analysis saved to {}", path.display());
    }
    let responder = LlmResponder::new(backend, loaded.report)?;
    converse(cli, ChatSession::new(Box::new(responder)))
}

/// Dispatch to the subcommand or the selected mode
pub(crate) fn run(cli: &Cli, config: &Config) -> Result<(), AppError> {
    if let Some(Commands::Generate(args)) = &cli.command {
        return run_generate(args, cli.json);
    }
    match cli.mode() {
        Mode::Check => run_check(cli, config),
        Mode::Analyzer => run_analyzer(cli),
        Mode::Dashboard => run_dashboard(cli),
        Mode::Chatbot => run_chatbot(cli),
        Mode::LlmChatbot => run_llm_chatbot(cli, config),
    }
}
