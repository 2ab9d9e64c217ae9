//! petcheck CLI - end-to-end contract checks for a pet store API

mod storage;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use petcheck_core::{Config, SchemaName, SchemaSet, SuiteReport, Verdict, VerdictStatus};
use petcheck_runner::SuiteSetup;
use petcheck_runner::scenarios;

#[derive(Parser)]
#[command(name = "petcheck")]
#[command(about = "End-to-end contract checks for a pet store API")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, global = true, default_value = "terminal")]
    output: OutputFormat,

    /// Verbose output (debug logs for every step and exchange)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the scenario suite against the service
    Run {
        /// Config file (default: .petcheck.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Base URL, overriding config and PETCHECK_BASE_URL
        #[arg(long)]
        base_url: Option<String>,

        /// Only run scenarios whose name contains this, or a whole feature (pet, store)
        #[arg(short, long)]
        filter: Option<String>,

        /// Stop on first failed scenario
        #[arg(long)]
        stop_on_failure: bool,

        /// Write summary, results and reproductions to this directory
        #[arg(long)]
        report_dir: Option<PathBuf>,
    },

    /// List the scenario catalogue
    List,

    /// Print the effective JSON Schema contracts
    Contracts {
        /// Contract to print (pet, order, inventory); all when omitted
        name: Option<SchemaName>,

        /// Config file (default: .petcheck.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Initialize config file
    Init,

    /// Export JSON Schema for the report format
    Schema,
}

#[derive(Clone, Copy, ValueEnum, PartialEq, Eq)]
enum OutputFormat {
    Terminal,
    Json,
    Silent,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(3)
        }
    }
}

/// `RUST_LOG` wins; otherwise `petcheck*=info`, or `debug` with `-v`.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("petcheck={level}")));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let cfg = match path {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?,
    };
    Ok(cfg.with_env())
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Run {
            config,
            base_url,
            filter,
            stop_on_failure,
            report_dir,
        } => {
            let cfg = load_config(config.as_deref())?.with_base_url_override(base_url);
            debug!(?cfg, "config loaded");

            let setup = SuiteSetup::from_config(&cfg).context("failed to prepare suite")?;
            let runner = setup
                .runner()
                .with_filter(filter)
                .with_stop_on_failure(stop_on_failure);

            if cli.output == OutputFormat::Terminal {
                eprintln!("Config:");
                eprintln!("  base_url:  {}", cfg.normalized_base_url());
                if !cfg.headers.is_empty() {
                    eprintln!("  headers:   {} configured", cfg.headers.len());
                }
                eprintln!("  ids:       {:?}", cfg.ids);
                eprintln!("  inventory: {:?}", cfg.inventory);
                eprintln!("  scenarios: {}", runner.selected().len());
                eprintln!();
            }

            let start = Instant::now();
            let report = runner.run();
            let duration_secs = start.elapsed().as_secs_f64();
            let verdict = Verdict::from_report(&report);

            match cli.output {
                OutputFormat::Terminal => print_terminal(&report, &verdict),
                OutputFormat::Json => {
                    let json_output = serde_json::json!({
                        "verdict": {
                            "status": verdict.status.to_string(),
                            "exit_code": verdict.exit_code,
                            "reason": verdict.reason,
                        },
                        "report": report,
                    });
                    println!("{}", serde_json::to_string_pretty(&json_output)?);
                }
                OutputFormat::Silent => {}
            }

            if let Some(dir) = report_dir {
                let data = storage::ReportData {
                    config: &cfg,
                    report: &report,
                    verdict: &verdict,
                    duration_secs,
                };
                match storage::save_report(&dir, &data) {
                    Ok(_) => {
                        if cli.output != OutputFormat::Silent {
                            eprintln!("Report saved: {}", dir.display());
                        }
                    }
                    Err(e) => eprintln!("Warning: failed to save report: {e}"),
                }
            }

            Ok(verdict.exit_code)
        }

        Commands::List => {
            let all = scenarios::all();
            match cli.output {
                OutputFormat::Terminal => {
                    for s in &all {
                        println!("{:<6} {:<28} {}", s.feature, s.name, s.title);
                    }
                }
                OutputFormat::Json => {
                    let list: Vec<_> = all
                        .iter()
                        .map(|s| {
                            serde_json::json!({
                                "name": s.name,
                                "feature": s.feature.as_str(),
                                "title": s.title,
                            })
                        })
                        .collect();
                    println!("{}", serde_json::to_string_pretty(&list)?);
                }
                OutputFormat::Silent => {}
            }
            Ok(0)
        }

        Commands::Contracts { name, config } => {
            let cfg = load_config(config.as_deref())?;
            let schemas = SchemaSet::from_config(&cfg)?;

            let output = match name {
                Some(name) => schemas.document(name).cloned().unwrap_or_default(),
                None => {
                    let mut all = serde_json::Map::new();
                    for name in SchemaName::ALL {
                        if let Some(doc) = schemas.document(name) {
                            all.insert(name.to_string(), doc.clone());
                        }
                    }
                    serde_json::Value::Object(all)
                }
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(0)
        }

        Commands::Init => {
            let config_path = ".petcheck.toml";
            if Path::new(config_path).exists() {
                eprintln!("{config_path} already exists");
                return Ok(1);
            }

            std::fs::write(config_path, Config::example())?;
            println!("Created {config_path}");
            println!("\nEdit the file to configure:");
            println!("  - base_url: service to test");
            println!("  - ids: unique or fixed resource ids");
            println!("  - inventory: which inventory contract to enforce");
            println!("  - headers: auth tokens, API keys");
            println!("  - schemas: contract override files");
            Ok(0)
        }

        Commands::Schema => {
            println!("{}", petcheck_core::report::generate_schema());
            Ok(0)
        }
    }
}

fn print_terminal(report: &SuiteReport, verdict: &Verdict) {
    for r in &report.results {
        let icon = if r.passed() { "ok  " } else { "FAIL" };
        println!("{icon} {}/{} ({} ms)", r.feature, r.name, r.elapsed_ms);
    }

    let failures: Vec<_> = report.failures().collect();
    if !failures.is_empty() {
        println!("\nFailures ({}):", failures.len());
        for r in failures {
            println!("  {} - {}", r.name, r.title);
            if let Some(step) = r.steps.last() {
                println!("    step:  {step}");
            }
            if let Some(f) = &r.failure {
                println!("    [{}] {}", f.kind, f.message);
                if let Some(req) = &f.request {
                    println!("    {} {}", req.method, req.url);
                }
            }
        }
    }

    let label = match verdict.status {
        VerdictStatus::Pass => "PASS",
        VerdictStatus::Fail => "FAIL",
    };
    println!("\n{label}: {}", verdict.reason);
    println!(
        "  Scenarios: {} total, {} passed, {} failed, {} skipped",
        report.total, report.passed, report.failed, report.skipped
    );
    println!("  Exit code: {}", verdict.exit_code);
}
