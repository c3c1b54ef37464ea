//! Shell completions command

use std::io::Write;
use std::path::PathBuf;

use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};

use crate::Cli;

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,

    /// Write the script to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: &CompletionsArgs) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();

    let mut script = Vec::new();
    generate(args.shell, &mut cmd, name, &mut script);

    match &args.output {
        Some(path) => {
            std::fs::write(path, &script)?;
            tracing::info!("Wrote {} completions to {}", args.shell, path.display());
        }
        None => std::io::stdout().write_all(&script)?,
    }
    Ok(())
}
