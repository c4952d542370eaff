//! Admin Shell CLI
//!
//! Drives the navigation shell against a running admin backend with an
//! in-memory document, for smoke-testing panels from a terminal:
//! - Open a panel URL or click a sidebar entry
//! - Restore the last panel
//! - Inspect or forget the persisted navigation state

use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use admin_shell::*;
use admin_shell::config::generate_default_config;
use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "admin-shell")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Admin dashboard navigation shell")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: platform config dir, then ./admin-shell.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL, overrides the config file
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load a panel fragment
    Open {
        /// Panel URL, e.g. /debtors
        url: String,
        /// Section title; also persists the navigation
        #[arg(short, long, default_value = "")]
        label: String,
    },

    /// Activate the sidebar entry with this label
    Click {
        label: String,
    },

    /// Reopen the last persisted panel (home panel if none)
    Restore,

    /// Show the persisted navigation state
    State,

    /// Clear the persisted navigation state
    Forget,

    /// Print a default config file
    Config {
        /// Write to this path instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Config { output } = &cli.command {
        let content = generate_default_config();
        match output {
            Some(path) => {
                std::fs::write(path, content)
                    .with_context(|| format!("writing {}", path.display()))?;
                println!("Wrote default config to {}", path.display());
            }
            None => print!("{}", content),
        }
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(base_url) = &cli.base_url {
        config.shell.base_url = base_url.clone();
    }

    init_logging(&config.logging);

    let view = Rc::new(HeadlessDocument::new(config.shell.sidebar_entries()));
    let fetcher = Rc::new(HttpFetcher::new(
        &config.shell.base_url,
        Duration::from_secs(config.shell.request_timeout_secs),
    )?);
    let store = NavigationStore::new(
        Rc::new(FileStorage::new(config.storage.state_path())),
        config.shell.home_url.clone(),
    );
    let shell = NavigationShell::new(
        view.clone(),
        fetcher,
        store,
        PanelRegistry::with_defaults(&config.shell),
    );

    let outcome = match cli.command {
        Commands::Open { url, label } => shell.load_content(&url, &label).await,
        Commands::Click { label } => shell
            .select_label(&label)
            .await
            .with_context(|| format!("no sidebar entry labelled {:?}", label))?,
        Commands::Restore => shell.restore().await,
        Commands::State => {
            print_state(shell.store().peek()?, &cli.format)?;
            return Ok(());
        }
        Commands::Forget => {
            shell.store().clear()?;
            println!("Navigation state cleared");
            return Ok(());
        }
        Commands::Config { .. } => unreachable!("handled before the shell is built"),
    };

    print_document(&view, &outcome, &cli.format)?;

    if outcome == NavigationOutcome::FragmentFailed {
        anyhow::bail!("Failed to load content.");
    }
    Ok(())
}

fn init_logging(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("admin_shell={}", logging.level).into());

    // Logs go to stderr so stdout stays parseable
    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn outcome_label(outcome: &NavigationOutcome) -> String {
    match outcome {
        NavigationOutcome::Loaded { panel_error: None } => "loaded".to_string(),
        NavigationOutcome::Loaded {
            panel_error: Some(e),
        } => format!("loaded (panel error: {})", e),
        NavigationOutcome::FragmentFailed => "fragment failed".to_string(),
        NavigationOutcome::Superseded => "superseded".to_string(),
    }
}

fn print_document(
    doc: &HeadlessDocument,
    outcome: &NavigationOutcome,
    format: &str,
) -> anyhow::Result<()> {
    let content = doc.html(CONTENT_AREA).unwrap_or_default();
    let charts = doc.charts();
    let active: Vec<String> = doc
        .active_entries()
        .into_iter()
        .filter_map(|i| doc.sidebar_entries().get(i).map(SidebarEntry::label))
        .collect();

    match format {
        "json" => {
            let charts: serde_json::Map<String, serde_json::Value> = charts
                .iter()
                .map(|(id, spec)| (id.clone(), spec.to_chartjs()))
                .collect();
            let out = serde_json::json!({
                "outcome": outcome_label(outcome),
                "title": doc.title(),
                "active": active,
                "content": content,
                "charts": charts,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        _ => {
            println!("Outcome: {}", outcome_label(outcome));
            println!("Title:   {}", doc.title());
            if !active.is_empty() {
                println!("Active:  {}", active.join(", "));
            }
            println!();
            println!("{}", content);

            if !charts.is_empty() {
                println!();
                println!("Charts:");
                for (id, spec) in &charts {
                    println!(
                        "  {:<20} {:?} {:?} = {:?}",
                        id,
                        spec.kind,
                        spec.labels,
                        spec.values()
                    );
                }
            }
        }
    }

    Ok(())
}

fn print_state(state: Option<NavigationState>, format: &str) -> anyhow::Result<()> {
    match (state, format) {
        (state, "json") => println!("{}", serde_json::to_string_pretty(&state)?),
        (Some(state), _) => {
            println!("Last URL:   {}", state.last_url);
            println!("Last label: {}", state.last_label);
        }
        (None, _) => println!("No navigation state saved"),
    }
    Ok(())
}
