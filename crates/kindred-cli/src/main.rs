//! Kindred CLI - Command line interface for the ancestry graph

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::{completions, family, io, parent, person, query};
use config::Config;
use kindred_core::GenealogyEngine;
use kindred_storage::{RedbStorage, StorageBackend};
use output::OutputFormat;

#[derive(Parser)]
#[command(name = "kindred")]
#[command(author, version, about = "Pedigrees, descendants and kinship from a family tree")]
pub struct Cli {
    /// Data directory
    #[arg(short, long, global = true, env = "KINDRED_DATA_DIR")]
    pub data_dir: Option<String>,

    /// Output format: table, json
    #[arg(short, long, global = true)]
    pub format: Option<String>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Get the data directory path: flag, then config, then the platform default
    pub fn data_dir(&self, config: &Config) -> PathBuf {
        self.data_dir
            .as_ref()
            .map(PathBuf::from)
            .or_else(|| config.data_dir.clone())
            .unwrap_or_else(config::default_data_dir)
    }

    pub fn output_format(&self, config: &Config) -> anyhow::Result<OutputFormat> {
        match self.format.as_deref().or(config.format.as_deref()) {
            Some(format) => format.parse(),
            None => Ok(OutputFormat::default()),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage persons
    Person(person::PersonArgs),
    /// Manage families
    Family(family::FamilyArgs),
    /// Manage parent links
    Parent(parent::ParentArgs),
    /// Show a person's ancestor tree
    Pedigree(query::PedigreeArgs),
    /// Show a person's descendant tree
    Descendancy(query::DescendancyArgs),
    /// List a person's ancestors by Ahnentafel number
    Ahnentafel(query::AhnentafelArgs),
    /// Explain how two persons are related
    Relationship(query::RelationshipArgs),
    /// Import a dataset from JSON
    Import(io::ImportArgs),
    /// Export all records as JSON
    Export(io::ExportArgs),
    /// Manage configuration
    Config(commands::config::ConfigArgs),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Application context with storage backend
pub struct AppContext {
    pub storage: Arc<RedbStorage>,
    pub engine: GenealogyEngine<RedbStorage>,
    pub config: Config,
    pub format: OutputFormat,
}

impl AppContext {
    pub async fn new(cli: &Cli, config: Config, cancel: CancellationToken) -> anyhow::Result<Self> {
        let format = cli.output_format(&config)?;
        let data_dir = cli.data_dir(&config);
        std::fs::create_dir_all(&data_dir)?;

        let db_path = data_dir.join("kindred.redb");
        tracing::debug!("Using database at: {:?}", db_path);

        let storage = Arc::new(RedbStorage::open(&db_path)?);
        storage.initialize().await?;
        let engine = GenealogyEngine::new(Arc::clone(&storage)).with_cancellation(cancel);

        Ok(Self {
            storage,
            engine,
            config,
            format,
        })
    }
}

/// Cancel running queries on Ctrl+C
fn cancel_on_interrupt() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, cancelling query...");
            trigger.cancel();
        }
    });
    token
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .init();

    tracing::debug!("Starting kindred CLI");

    // Commands that never touch the database
    match &cli.command {
        Commands::Config(args) => return commands::config::run(args, &cli),
        Commands::Completions(args) => return completions::run(args),
        _ => {}
    }

    let config = Config::load();
    let ctx = AppContext::new(&cli, config, cancel_on_interrupt()).await?;

    match &cli.command {
        Commands::Person(args) => person::run(args, &cli, &ctx).await?,
        Commands::Family(args) => family::run(args, &cli, &ctx).await?,
        Commands::Parent(args) => parent::run(args, &cli, &ctx).await?,
        Commands::Pedigree(args) => query::run_pedigree(args, &cli, &ctx).await?,
        Commands::Descendancy(args) => query::run_descendancy(args, &cli, &ctx).await?,
        Commands::Ahnentafel(args) => query::run_ahnentafel(args, &cli, &ctx).await?,
        Commands::Relationship(args) => query::run_relationship(args, &cli, &ctx).await?,
        Commands::Import(args) => io::run_import(args, &cli, &ctx).await?,
        Commands::Export(args) => io::run_export(args, &cli, &ctx).await?,
        Commands::Config(_) | Commands::Completions(_) => {}
    }

    Ok(())
}
