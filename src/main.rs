//! Stackpeek - explain a backend project from its archive.
//!
//! A CLI tool that uploads a project zip to an analyzer service and renders
//! the normalized analysis as a text, Markdown, or JSON report.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (connection, config, unreadable archive, etc.)
//!   2 - Empty result with --fail-on-empty set

use anyhow::{Context, Result};
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

use stackpeek::cli::{Args, OutputFormat};
use stackpeek::client::{AnalyzeClient, ClientConfig};
use stackpeek::config::Config;
use stackpeek::models::{Report, ReportMetadata};
use stackpeek::normalize::normalize;
use stackpeek::report::{
    generate_json_report, generate_markdown_report, generate_text_report, RenderOptions,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("Stackpeek v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    // Run the analysis
    match run(args).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Analysis failed: {}", e);
            eprintln!("\n❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .stackpeek.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(".stackpeek.toml");

    if path.exists() {
        eprintln!("⚠️  .stackpeek.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .stackpeek.toml")?;

    println!("✅ Created .stackpeek.toml with default settings.");
    println!("   Edit it to customize the analyzer URL, timeout, and report limits.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the complete upload-and-display flow. Returns exit code (0 or 2).
async fn run(args: Args) -> Result<i32> {
    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let client = AnalyzeClient::new(ClientConfig {
        base_url: config.api.url.clone(),
        timeout_seconds: config.api.timeout_seconds,
        retries: config.api.retries,
    })
    .context("Failed to create analyzer client")?;

    // Handle --health: probe the analyzer and exit
    if args.health {
        return handle_health(&client, &config.api.url).await;
    }

    let archive = args
        .archive
        .clone()
        .expect("archive presence is validated for non-health runs");
    let archive_name = archive
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| archive.display().to_string());

    // Step 1: Upload and analyze. One request in flight at a time; the
    // spinner doubles as the "don't resubmit" signal.
    let spinner = make_spinner(&args, &archive_name);
    let start_time = Instant::now();

    let raw = client
        .submit(&archive)
        .await
        .context("Analyzer request failed")?;

    let duration = start_time.elapsed().as_secs_f64();
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    // Handle --raw: print the response body untouched and exit
    if args.raw {
        println!("{}", serde_json::to_string_pretty(&raw)?);
        return Ok(0);
    }

    // Step 2: Normalize into the canonical record
    let analysis = normalize(&raw);
    info!(
        "Normalized response: {} languages, {} routes, {} entry points",
        analysis.languages.len(),
        analysis.api_routes.len(),
        analysis.entry_points.len()
    );

    if analysis.is_empty {
        warn!("Analyzer detected nothing identifying in {}", archive_name);
    }

    let was_empty = analysis.is_empty;

    // Step 3: Build and render the report
    let report = Report {
        metadata: ReportMetadata {
            archive_name,
            analyzer_url: config.api.url.clone(),
            analyzed_at: Utc::now(),
            duration_seconds: duration,
        },
        analysis,
    };

    let options = RenderOptions {
        max_items: config.report.max_items,
    };

    let output = match args.format {
        OutputFormat::Text => generate_text_report(&report, &options),
        OutputFormat::Markdown => generate_markdown_report(&report, &options),
        OutputFormat::Json => generate_json_report(&report)?,
    };

    // Step 4: Write the report
    match config.general.output {
        Some(ref path) => {
            std::fs::write(path, &output)
                .with_context(|| format!("Failed to write report to {}", path))?;
            if !args.quiet {
                println!("✅ Analysis complete! Report saved to: {}", path);
            }
        }
        None => {
            println!("{}", output);
        }
    }

    // Check --fail-on-empty threshold
    if was_empty && args.fail_on_empty {
        eprintln!("\n⛔ Analyzer detected nothing. Failing (exit code 2).");
        return Ok(2);
    }

    Ok(0)
}

/// Handle --health: probe the analyzer, print the verdict, exit.
async fn handle_health(client: &AnalyzeClient, url: &str) -> Result<i32> {
    if client.health().await {
        println!("✅ Analyzer at {} is up.", url);
        Ok(0)
    } else {
        eprintln!("❌ Analyzer at {} is unreachable.", url);
        Ok(1)
    }
}

/// Build the upload spinner, unless running quiet.
fn make_spinner(args: &Args, archive_name: &str) -> Option<ProgressBar> {
    if args.quiet {
        return None;
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("static spinner template is valid"),
    );
    spinner.set_message(format!("Analyzing {}...", archive_name));
    spinner.enable_steady_tick(Duration::from_millis(100));
    Some(spinner)
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from .stackpeek.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
