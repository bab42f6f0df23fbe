//! Veriscan CLI
//!
//! Scores a company's public web footprint for due-diligence triage.

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use veriscan_collectors::{
    create_anthropic_interpreter, create_interpreter, AnthropicConfig, InterpreterConfig,
    SharedInterpreter,
};
use veriscan_core::{category_definitions, Category, SIGNAL_DEFINITIONS, TOTAL_SIGNAL_POINTS};
use veriscan_net::{create_web_client, fetch_page, WebConfig};
use veriscan_runtime::{normalize_target, Profile, ScanEngine, ScanStatus, ScanStore};

#[derive(Parser)]
#[command(name = "veriscan")]
#[command(author, version, about = "Veriscan: company web-footprint scoring", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level (0-3)
    #[arg(short, long, default_value = "1")]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan one company and print its coverage score
    Scan {
        /// Target URL or bare domain
        target: String,

        /// Scan profile TOML (default: ./veriscan.toml if present)
        #[arg(short, long)]
        profile: Option<PathBuf>,

        /// Path for the JSON report (default: veriscan_<domain>_<timestamp>.json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip writing the JSON report
        #[arg(long)]
        no_report: bool,

        /// Attach an LLM analyst brief to the result
        #[arg(long)]
        interpret: bool,

        /// LLM model for the brief (overrides the profile)
        #[arg(short, long)]
        model: Option<String>,

        /// OpenAI API key (or set OPENAI_API_KEY env var)
        #[arg(long, env = "OPENAI_API_KEY")]
        openai_key: Option<String>,

        /// Anthropic API key (or set ANTHROPIC_API_KEY env var)
        #[arg(long, env = "ANTHROPIC_API_KEY")]
        anthropic_key: Option<String>,

        /// OpenRouter API key (or set OPENROUTER_API_KEY env var)
        #[arg(long, env = "OPENROUTER_API_KEY")]
        openrouter_key: Option<String>,
    },

    /// Scan every target listed in a file, one per line
    Batch {
        /// File with one URL or domain per line (# comments allowed)
        file: PathBuf,

        /// Scan profile TOML
        #[arg(short, long)]
        profile: Option<PathBuf>,

        /// Directory for the JSON reports
        #[arg(short, long, default_value = "reports")]
        output_dir: PathBuf,
    },

    /// Print the signal catalog and point weights
    Signals,

    /// Probe a target's homepage without scoring it
    Status {
        /// Target URL or bare domain
        target: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = match cli.verbose {
        0 => Level::ERROR,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();

    match cli.command {
        Commands::Scan {
            target,
            profile,
            output,
            no_report,
            interpret,
            model,
            openai_key,
            anthropic_key,
            openrouter_key,
        } => {
            run_scan(
                &target,
                profile,
                output,
                no_report,
                interpret,
                model,
                openai_key,
                anthropic_key,
                openrouter_key,
            )
            .await?;
        }
        Commands::Batch {
            file,
            profile,
            output_dir,
        } => {
            run_batch(file, profile, output_dir).await?;
        }
        Commands::Signals => {
            list_signals();
        }
        Commands::Status { target } => {
            check_status(&target).await?;
        }
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn run_scan(
    target: &str,
    profile_path: Option<PathBuf>,
    output: Option<PathBuf>,
    no_report: bool,
    interpret: bool,
    model: Option<String>,
    openai_key: Option<String>,
    anthropic_key: Option<String>,
    openrouter_key: Option<String>,
) -> Result<()> {
    println!("🔎 Veriscan - company web-footprint scoring\n");

    let mut profile = load_profile(profile_path)?;
    if interpret {
        profile.interpretation.enabled = true;
    }
    if let Some(model) = model {
        profile.interpretation.model = model;
    }

    let interpreter = if profile.interpretation.enabled {
        Some(build_interpreter(
            &profile,
            openai_key,
            anthropic_key,
            openrouter_key,
        )?)
    } else {
        None
    };

    let engine = ScanEngine::new(profile, interpreter)?;
    let result = engine.scan(target).await?;

    println!("\n🏢 {}  ({})", result.company_name, result.domain);
    println!(
        "⭐ Score: {}/100 ({} coverage)",
        result.score,
        result.coverage_level.label()
    );
    println!(
        "🧮 Signals found: {}/{} in {} ms",
        result.found_count(),
        result.signals.len(),
        result.duration_ms
    );

    println!("\n📊 Categories:");
    for category in &result.categories {
        println!(
            "   {:<20} {:>2}/{:<2} ({})",
            category.name,
            category.score,
            category.max_score,
            category.coverage_level.label()
        );
    }

    let applied: Vec<_> = result.penalties.iter().filter(|p| p.applied).collect();
    if !applied.is_empty() {
        println!("\n⚠️  Penalties:");
        for penalty in applied {
            println!("   {} ({})", penalty.name, penalty.points);
            if let Some(reason) = &penalty.reason {
                println!("      {}", reason);
            }
        }
    }

    println!(
        "\n🔧 Verification effort: {}",
        result.effort.level.label()
    );
    for reason in &result.effort.reasons {
        println!("   - {}", reason);
    }

    if let Some(financial) = &result.financial {
        println!(
            "\n🏛️  {}: {} filing(s)",
            financial.registry, financial.total_filings
        );
        if let Some(filing_type) = &financial.latest_filing_type {
            let date = financial.latest_filing_date.as_deref().unwrap_or("unknown date");
            println!("   Latest: {} ({})", filing_type, date);
        }
    }

    if !result.issues.is_empty() {
        println!("\n🛠️  Degraded sources:");
        for issue in &result.issues {
            println!("   {} [{}]: {}", issue.collector, issue.code, issue.message);
        }
    }

    if let Some(interpretation) = &result.interpretation {
        println!("\n📝 Analyst brief:\n");
        println!("{}", interpretation);
    }

    if !no_report {
        let output_path = output.unwrap_or_else(|| default_report_path(&result.domain));
        fs::write(&output_path, result.to_json_pretty()?)?;
        println!("\n📄 Full report saved to: {}", output_path.display());
    }

    Ok(())
}

async fn run_batch(
    file: PathBuf,
    profile_path: Option<PathBuf>,
    output_dir: PathBuf,
) -> Result<()> {
    println!("🔎 Veriscan batch scan\n");

    let profile = load_profile(profile_path)?;
    let engine = ScanEngine::new(profile, None)?;
    let store = ScanStore::new();

    let content = fs::read_to_string(&file)?;
    let targets: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect();

    if targets.is_empty() {
        anyhow::bail!("No targets in {}", file.display());
    }

    fs::create_dir_all(&output_dir)?;
    println!("📋 {} target(s) queued\n", targets.len());

    for target in targets {
        let id = store.submit(target);
        store.mark_processing(id);

        match engine.scan(target).await {
            Ok(result) => {
                let path = output_dir.join(format!("{}.json", result.domain.replace('.', "_")));
                fs::write(&path, result.to_json_pretty()?)?;
                println!(
                    "✅ {:<30} {:>3}/100 ({})",
                    result.domain,
                    result.score,
                    result.coverage_level.label()
                );
                store.complete(id, result);
            }
            Err(e) => {
                println!("❌ {:<30} {}", target, e);
                store.fail(id, e.to_string());
            }
        }
    }

    let records = store.list();
    let completed = records
        .iter()
        .filter(|r| r.status == ScanStatus::Completed)
        .count();
    println!(
        "\n📊 Batch finished: {} completed, {} failed",
        completed,
        records.len() - completed
    );
    println!("📄 Reports in: {}", output_dir.display());

    Ok(())
}

fn list_signals() {
    println!(
        "🧮 Signal catalog: {} signals, {} points before penalties\n",
        SIGNAL_DEFINITIONS.len(),
        TOTAL_SIGNAL_POINTS
    );

    for category in Category::ALL {
        println!("{} ({} points)", category.name(), category.max_score());
        println!("   {}", category.description());
        for def in category_definitions(category) {
            println!("   {:<24} {:>2} pts  via {}", def.id, def.points, def.source);
        }
        println!();
    }
}

async fn check_status(target: &str) -> Result<()> {
    println!("🔌 Probing target...\n");

    let target = normalize_target(target)?;
    let client = create_web_client(&WebConfig::default())?;

    match fetch_page(&client, &target.url).await {
        Ok(page) if page.ok() => {
            println!("✅ {} answered HTTP {}", target.domain, page.status);
            if let Some(title) = &page.title {
                println!("   Title: {}", title);
            }
            println!(
                "   {} chars of text, {} links",
                page.char_count,
                page.links.len()
            );
        }
        Ok(page) => {
            println!("⚠️  {} answered HTTP {}", target.domain, page.status);
            println!("   A scan would record the website as not live.");
        }
        Err(e) => {
            println!("❌ {} is unreachable: {}", target.domain, e);
        }
    }

    Ok(())
}

fn load_profile(path: Option<PathBuf>) -> Result<Profile> {
    match path {
        Some(path) => {
            println!("⚙️  Profile: {}", path.display());
            Ok(Profile::load(path)?)
        }
        None => Ok(Profile::load("veriscan.toml")?),
    }
}

fn build_interpreter(
    profile: &Profile,
    openai_key: Option<String>,
    anthropic_key: Option<String>,
    openrouter_key: Option<String>,
) -> Result<SharedInterpreter> {
    let model = &profile.interpretation.model;

    if let Some(key) = anthropic_key.or_else(|| profile.keys.anthropic()) {
        println!("📡 Interpretation: Anthropic | Model: {}", model);
        return Ok(create_anthropic_interpreter(AnthropicConfig::new(
            &key, model,
        ))?);
    }
    if let Some(key) = openrouter_key {
        println!("📡 Interpretation: OpenRouter | Model: {}", model);
        return Ok(create_interpreter(InterpreterConfig::openrouter(
            &key, model,
        ))?);
    }
    if let Some(key) = openai_key.or_else(|| profile.keys.openai()) {
        println!("📡 Interpretation: OpenAI | Model: {}", model);
        return Ok(create_interpreter(InterpreterConfig::openai(&key, model))?);
    }

    Err(anyhow::anyhow!(
        "Interpretation requires an API key. Set ANTHROPIC_API_KEY, OPENAI_API_KEY, or OPENROUTER_API_KEY"
    ))
}

fn default_report_path(domain: &str) -> PathBuf {
    let timestamp = chrono::Utc::now().format("%Y-%m-%d_%H-%M-%S");
    PathBuf::from(format!(
        "veriscan_{}_{}.json",
        domain.replace('.', "_"),
        timestamp
    ))
}
