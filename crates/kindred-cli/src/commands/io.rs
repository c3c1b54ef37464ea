//! Import/Export commands

use std::io::Write;
use std::path::PathBuf;

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

use clap::Args;
use kindred_storage::{Dataset, StorageBackend};

use crate::{AppContext, Cli};

#[derive(Args)]
pub struct ImportArgs {
    /// Input file (JSON dataset)
    pub file: PathBuf,

    /// Merge with existing data (default: error if the store has records)
    #[arg(long)]
    pub merge: bool,

    /// Derive parent links from the imported families as well
    #[arg(long)]
    pub project_families: bool,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Output file (stdout if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub async fn run_import(args: &ImportArgs, cli: &Cli, ctx: &AppContext) -> anyhow::Result<()> {
    tracing::info!("Importing from {:?}", args.file);

    let content = std::fs::read_to_string(&args.file)?;
    let dataset = Dataset::from_json(&content)?;
    tracing::debug!("Import format version: {}", dataset.version);

    if !args.merge {
        let existing = ctx.storage.load_dataset().await?;
        if !existing.is_empty() {
            anyhow::bail!(
                "Store already has {} persons and {} families. Use --merge to add to existing data.",
                existing.persons.len(),
                existing.families.len()
            );
        }
    }

    ctx.storage.save_dataset(&dataset).await?;

    let mut projected = 0;
    if args.project_families {
        for family in &dataset.families {
            projected += ctx.storage.project_family(family).await?.len();
        }
    }

    tracing::info!(
        "Imported {} persons, {} families, {} parent links",
        dataset.persons.len(),
        dataset.families.len(),
        dataset.parent_links.len() + projected
    );
    if !cli.quiet {
        println!(
            "Imported {} persons, {} families and {} parent links from {:?}",
            dataset.persons.len(),
            dataset.families.len(),
            dataset.parent_links.len() + projected,
            args.file
        );
    }

    Ok(())
}

pub async fn run_export(args: &ExportArgs, cli: &Cli, ctx: &AppContext) -> anyhow::Result<()> {
    tracing::info!("Exporting data");

    let dataset = ctx.storage.load_dataset().await?;
    tracing::debug!(
        "Exporting {} persons, {} families, {} parent links",
        dataset.persons.len(),
        dataset.families.len(),
        dataset.parent_links.len()
    );
    let content = dataset.to_json()?;

    if let Some(ref path) = args.output {
        // Family trees hold personal data: owner read/write only
        #[cfg(unix)]
        {
            let mut file = std::fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(path)?;
            file.write_all(content.as_bytes())?;
        }
        #[cfg(not(unix))]
        {
            std::fs::write(path, &content)?;
        }
        if !cli.quiet {
            println!("Exported to {:?}", path);
        }
    } else {
        println!("{}", content);
    }

    Ok(())
}
