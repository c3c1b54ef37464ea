//! Parent link commands

use clap::{Args, Subcommand};
use kindred_core::{AncestryReader, ParentLink, PersonId};
use kindred_storage::StorageBackend;

use crate::output::{emit, render_parent_link};
use crate::{AppContext, Cli};

#[derive(Args)]
pub struct ParentArgs {
    #[command(subcommand)]
    pub command: ParentCommands,
}

#[derive(Subcommand)]
pub enum ParentCommands {
    /// Set a person's father and/or mother
    Set {
        /// Person id
        person: String,

        /// Father's person id
        #[arg(long)]
        father: Option<String>,

        /// Mother's person id
        #[arg(long)]
        mother: Option<String>,
    },
    /// Remove a person's parent link
    Clear {
        /// Person id
        person: String,
    },
    /// Show a person's parent link
    Get {
        /// Person id
        person: String,
    },
}

/// Display name of a parent, which must already be recorded
async fn parent_name(ctx: &AppContext, id: &PersonId) -> anyhow::Result<String> {
    let parent = ctx
        .storage
        .get_person(id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Person not found: {}", id))?;
    Ok(parent.display_name())
}

pub async fn run(args: &ParentArgs, cli: &Cli, ctx: &AppContext) -> anyhow::Result<()> {
    match &args.command {
        ParentCommands::Set {
            person,
            father,
            mother,
        } => {
            if father.is_none() && mother.is_none() {
                anyhow::bail!("Give --father, --mother or both");
            }
            let person_id = PersonId::from(person.as_str());
            if ctx.storage.get_person(&person_id).await?.is_none() {
                anyhow::bail!("Person not found: {}", person_id);
            }

            // Keep the parent that is not being replaced
            let mut link = ctx
                .storage
                .get_parent_link(&person_id)
                .await?
                .unwrap_or_else(|| ParentLink::new(person_id.clone()));
            if let Some(father) = father {
                let id = PersonId::from(father.as_str());
                let name = parent_name(ctx, &id).await?;
                link = link.with_father(id, name);
            }
            if let Some(mother) = mother {
                let id = PersonId::from(mother.as_str());
                let name = parent_name(ctx, &id).await?;
                link = link.with_mother(id, name);
            }

            ctx.storage.save_parent_link(&link).await?;
            tracing::info!("Set parents of {}", person_id);
            if !cli.quiet {
                println!("Updated parents of {}", person_id);
            }
        }
        ParentCommands::Clear { person } => {
            let person_id = PersonId::from(person.as_str());
            ctx.storage.delete_parent_link(&person_id).await?;
            if !cli.quiet {
                println!("Cleared parents of {}", person_id);
            }
        }
        ParentCommands::Get { person } => {
            let person_id = PersonId::from(person.as_str());
            match ctx.storage.get_parent_link(&person_id).await? {
                Some(link) => emit(&link, ctx.format, render_parent_link)?,
                None => anyhow::bail!("No parents recorded for {}", person_id),
            }
        }
    }
    Ok(())
}
