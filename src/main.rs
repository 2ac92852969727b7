//! Docpipe - product documentation pipeline.
//!
//! Gathers product information, writes documentation, proofreads it and
//! publishes the approved version.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use docpipe::ai::gateway_from_config;
use docpipe::core::{AiProviderKind, Config, PublishTarget};
use docpipe::workflow::{ConsolePublisher, DocumentationProcess, FilePublisher, Publisher};

/// Product documentation pipeline - gather, generate, proofread and publish with a chat model
#[derive(Parser)]
#[command(name = "docpipe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Dry run mode - show what would run without calling the chat service
    #[arg(long, global = true)]
    dry_run: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate and publish documentation for a product
    Run {
        /// Product name (all arguments are joined)
        #[arg(required = true, num_args = 1..)]
        product: Vec<String>,

        /// Process id to run
        #[arg(short, long)]
        process: Option<String>,

        /// Write the document to this directory instead of stdout
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Give up after this many rejected drafts
        #[arg(short, long)]
        max_revisions: Option<u32>,

        /// Report format
        #[arg(short, long, value_enum, default_value = "text")]
        format: ReportFormat,
    },

    /// Show configuration
    Config {
        /// Show config file path
        #[arg(long)]
        path: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    // A missing .env is fine; credentials may come from the real environment
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only documents and reports
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("docpipe=info,warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Run { product, process, output_dir, max_revisions, format } => {
            cmd_run(&product.join(" "), process, output_dir, max_revisions, format, cli.dry_run)
        }
        Commands::Config { path } => cmd_config(path),
        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "docpipe", &mut io::stdout());
            Ok(())
        }
    }
}

fn cmd_run(
    product: &str,
    process_id: Option<String>,
    output_dir: Option<PathBuf>,
    max_revisions: Option<u32>,
    format: ReportFormat,
    dry_run: bool,
) -> Result<()> {
    let product = product.trim();
    if product.is_empty() {
        anyhow::bail!("Product name cannot be empty");
    }

    let mut config = Config::load()?;
    if let Some(dir) = output_dir {
        config.publish.target = PublishTarget::File;
        config.publish.output_dir = Some(dir.to_string_lossy().into_owned());
    }
    if max_revisions.is_some() {
        config.workflow.max_revisions = max_revisions;
    }

    let process_id = process_id.unwrap_or_else(|| config.workflow.process.clone());
    let process = config.process(&process_id).cloned().ok_or_else(|| {
        let known: Vec<&str> = config.processes.iter().map(|p| p.id.as_str()).collect();
        anyhow::anyhow!("Unknown process '{}'. Known processes: {}", process_id, known.join(", "))
    })?;

    // The JSON report owns stdout; the document is still in `report.document`
    let publisher: Arc<dyn Publisher> = match config.publish.target {
        PublishTarget::Console if matches!(format, ReportFormat::Json) => {
            Arc::new(ConsolePublisher::to_stderr())
        }
        PublishTarget::Console => Arc::new(ConsolePublisher::new()),
        PublishTarget::File => {
            let dir = config
                .output_dir()
                .context("Publish target 'file' needs publish.output_dir or --output-dir")?;
            Arc::new(FilePublisher::new(dir))
        }
    };

    if dry_run {
        let gateway = match config.ai.provider {
            AiProviderKind::Azure => format!(
                "azure (deployment: {})",
                config.ai.deployment.as_deref().unwrap_or("<unset>")
            ),
            AiProviderKind::OpenAI => format!("openai (model: {})", config.ai.model),
        };
        let cap = config
            .workflow
            .max_revisions
            .map_or_else(|| "unlimited".to_string(), |max| max.to_string());

        println!("DRY RUN: would run process '{}' ({})", process.name, process.id);
        println!("  Product:       {}", product);
        println!("  Chat service:  {}", gateway);
        println!("  Timeout:       {}s", config.ai.timeout_secs);
        println!("  Publisher:     {}", publisher.name());
        println!("  Max revisions: {}", cap);
        return Ok(());
    }

    let gateway = gateway_from_config(&config.ai).context("Could not set up the chat service")?;
    let workflow = DocumentationProcess::from_config(process, gateway, publisher)
        .with_max_revisions(config.workflow.max_revisions);

    let rt = tokio::runtime::Runtime::new()?;
    let report = rt
        .block_on(workflow.run(product))
        .with_context(|| format!("Process '{}' failed for '{}'", workflow.name(), product))?;

    match format {
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        ReportFormat::Text => eprintln!(
            "Published documentation for '{}' after {} revision(s) (run {})",
            report.product_name, report.revisions, report.run_id
        ),
    }

    Ok(())
}

fn cmd_config(show_path: bool) -> Result<()> {
    if show_path {
        match Config::locate() {
            Some(path) => println!("{}", path.display()),
            None => {
                if let Some(dir) = Config::config_dir() {
                    println!("{}", dir.join("config.toml").display());
                }
            }
        }
        return Ok(());
    }

    let config = Config::load()?;
    let toml = toml::to_string_pretty(&config)?;
    println!("{toml}");

    Ok(())
}
