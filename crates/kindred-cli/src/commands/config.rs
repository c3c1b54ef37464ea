//! Reading and editing the kindred settings file

use clap::{Args, Subcommand};
use serde::Serialize;

use crate::config::{config_file_path, unknown_key, Config};
use crate::output::emit;
use crate::Cli;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the value in effect for a key
    Get {
        /// Settings key, e.g. pedigree_generations
        key: String,
    },
    /// Store a value in the settings file
    Set {
        /// Settings key
        key: String,
        /// New value; generation counts must be between 1 and 10
        value: String,
    },
    /// Remove a key from the settings file so its default applies
    Unset {
        /// Settings key
        key: String,
    },
    /// Show every key with its value and where the value comes from
    List,
    /// Show the settings file location
    Path,
    /// Write a settings file holding the defaults
    Init {
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}

/// One row of `config list`
#[derive(Debug, Serialize)]
struct Setting {
    key: &'static str,
    value: String,
    source: &'static str,
}

fn settings(config: &Config) -> Vec<Setting> {
    Config::keys()
        .iter()
        .map(|&key| Setting {
            key,
            value: config.get(key).unwrap_or_default(),
            source: if config.is_set(key) { "file" } else { "default" },
        })
        .collect()
}

fn render_settings(settings: &Vec<Setting>) -> String {
    let width = Config::keys().iter().map(|k| k.len()).max().unwrap_or(0);
    let mut out = format!("Config file: {}\n", config_file_path().display());
    for setting in settings {
        out.push_str(&format!(
            "\n{:width$}  {}  ({})",
            setting.key,
            setting.value,
            setting.source,
            width = width
        ));
    }
    out
}

/// Runs before any database is opened, so a broken data dir can still be fixed here
pub fn run(args: &ConfigArgs, cli: &Cli) -> anyhow::Result<()> {
    let mut config = Config::load();

    match &args.command {
        ConfigCommands::Get { key } => {
            let value = config.get(key).ok_or_else(|| unknown_key(key))?;
            println!("{}", value);
        }
        ConfigCommands::Set { key, value } => {
            config.set(key, value)?;
            config.save()?;
            tracing::info!("Set config key {}", key);
            if !cli.quiet {
                println!("Set {} = {}", key, value);
            }
        }
        ConfigCommands::Unset { key } => {
            config.unset(key)?;
            config.save()?;
            tracing::info!("Unset config key {}", key);
            if !cli.quiet {
                println!(
                    "Unset {} (now {})",
                    key,
                    config.get(key).unwrap_or_default()
                );
            }
        }
        ConfigCommands::List => {
            let format = cli.output_format(&config)?;
            emit(&settings(&config), format, render_settings)?;
        }
        ConfigCommands::Path => println!("{}", config_file_path().display()),
        ConfigCommands::Init { force } => {
            let path = config_file_path();
            if path.exists() && !force {
                anyhow::bail!(
                    "{} already exists; pass --force to replace it",
                    path.display()
                );
            }
            Config::defaults().save()?;
            if !cli.quiet {
                println!("Wrote default settings to {}", path.display());
            }
        }
    }
    Ok(())
}
