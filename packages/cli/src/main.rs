#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the crash map toolchain.
//!
//! Runs the API server, prints an overview of the loaded data, exports the
//! views of one filter state to files, or explores filters interactively.
//! Without a subcommand, asks which of these to do.
//!
//! Uses `indicatif-log-bridge` (via [`crash_map_cli_utils::init_logger`])
//! to route `log` output through `indicatif::MultiProgress` so that log
//! lines and the loading bar never fight for the terminal.

mod explore;
mod export;
mod filter_args;
mod report;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use crash_map_cli_utils::{IndicatifProgress, MultiProgress};
use crash_map_dashboard::{LoadedData, Settings};
use crash_map_source::CrashMapConfig;
use dialoguer::{Input, Select};

use crate::filter_args::FilterArgs;

#[derive(Parser)]
#[command(name = "crash_map", about = "Traffic crash map toolchain")]
struct Cli {
    /// Configuration file (defaults to `CRASH_MAP_CONFIG`, then the built-in defaults)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server and serve the map page
    Serve {
        /// Address to bind (overrides the config file and `BIND_ADDR`)
        #[arg(long)]
        bind_addr: Option<String>,
        /// Port to listen on (overrides the config file and `PORT`)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Load the data and print what was found
    Summary,
    /// Write the layers and charts for one filter state to a directory
    Export {
        #[command(flatten)]
        filter: FilterArgs,
        /// Output directory
        #[arg(long, default_value = "export")]
        out: PathBuf,
    },
    /// Change filters interactively and watch the views update
    Explore,
}

/// Top-level tool selection when no subcommand is given.
enum Tool {
    Explore,
    Summary,
    Export,
    Server,
}

impl Tool {
    const ALL: &[Self] = &[Self::Explore, Self::Summary, Self::Export, Self::Server];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Explore => "Explore filters",
            Self::Summary => "Summarize data",
            Self::Export => "Export views",
            Self::Server => "Start server",
        }
    }
}

async fn load_data(config: &CrashMapConfig, multi: &MultiProgress) -> LoadedData {
    let progress = IndicatifProgress::rows_bar(multi, "Loading crash data");
    let client = reqwest::Client::new();
    crash_map_dashboard::load(&config.data, &client, &progress).await
}

async fn serve(config: CrashMapConfig, interactive: bool) -> Result<(), Box<dyn std::error::Error>> {
    // The server uses actix-web's runtime, so we need to run it in a
    // blocking task to avoid nesting tokio runtimes.
    tokio::task::spawn_blocking(move || {
        actix_web::rt::System::new().block_on(async move {
            if interactive {
                crash_map_server::interactive::run(config).await
            } else {
                crash_map_server::run_server(config).await
            }
        })
    })
    .await??;

    Ok(())
}

async fn summary(config: &CrashMapConfig, multi: &MultiProgress) {
    let data = load_data(config, multi).await;

    println!();
    for line in report::summary_lines(&data.working_set.summary(), data.boundaries.len()) {
        println!("{line}");
    }
}

async fn export(
    config: &CrashMapConfig,
    multi: &MultiProgress,
    filter: &FilterArgs,
    out: &std::path::Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let data = load_data(config, multi).await;
    let state = filter.to_filter_state(data.working_set.default_year());

    let files = export::export_views(&data, &Settings::from(config), &state, out)?;
    for file in files {
        println!("{}", file.display());
    }

    Ok(())
}

async fn explore(
    config: &CrashMapConfig,
    multi: &MultiProgress,
) -> Result<(), Box<dyn std::error::Error>> {
    let data = load_data(config, multi).await;
    explore::run(Arc::new(data), Settings::from(config))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = crash_map_cli_utils::init_logger();
    let cli = Cli::parse();
    let mut config = CrashMapConfig::load(cli.config.as_deref())?;

    let Some(command) = cli.command else {
        println!("Crash Map Toolchain");
        println!();

        let labels: Vec<&str> = Tool::ALL.iter().map(Tool::label).collect();

        let idx = Select::new()
            .with_prompt("What would you like to do?")
            .items(&labels)
            .default(0)
            .interact()?;

        match Tool::ALL[idx] {
            Tool::Explore => explore(&config, &multi).await?,
            Tool::Summary => summary(&config, &multi).await,
            Tool::Export => {
                let out: String = Input::new()
                    .with_prompt("Output directory")
                    .default("export".to_string())
                    .interact_text()?;
                export(&config, &multi, &FilterArgs::default(), out.as_ref()).await?;
            }
            Tool::Server => serve(config, true).await?,
        }

        return Ok(());
    };

    match command {
        Commands::Serve { bind_addr, port } => {
            if let Some(bind_addr) = bind_addr {
                config.server.bind_addr = bind_addr;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            serve(config, false).await?;
        }
        Commands::Summary => summary(&config, &multi).await,
        Commands::Export { filter, out } => export(&config, &multi, &filter, &out).await?,
        Commands::Explore => explore(&config, &multi).await?,
    }

    Ok(())
}
