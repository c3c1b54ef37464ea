//! Family management commands
//!
//! Adding a family or a child re-projects parent links for the family's
//! children, so the queries see the new parentage straight away.

use clap::{Args, Subcommand};
use kindred_core::{AncestryReader, ChildRelation, Family, FamilyId, GenDate, Person, PersonId};
use kindred_storage::StorageBackend;

use crate::output::{emit, render_family, render_family_list};
use crate::{AppContext, Cli};

#[derive(Args)]
pub struct FamilyArgs {
    #[command(subcommand)]
    pub command: FamilyCommands,
}

#[derive(Subcommand)]
pub enum FamilyCommands {
    /// Add a family of up to two partners
    Add {
        /// First partner's person id
        #[arg(long)]
        partner1: Option<String>,

        /// Second partner's person id
        #[arg(long)]
        partner2: Option<String>,

        /// Record id (a fresh id is generated if omitted)
        #[arg(long)]
        id: Option<String>,

        /// Marriage date
        #[arg(long)]
        married: Option<GenDate>,

        /// Marriage place
        #[arg(long)]
        place: Option<String>,

        /// Child person ids
        #[arg(short, long = "child")]
        children: Vec<String>,
    },
    /// Add a child to a family
    AddChild {
        /// Family id
        family: String,

        /// Child's person id
        child: String,

        /// How the child belongs: biological, adopted, foster, step, unknown
        #[arg(short, long, default_value = "biological")]
        relation: ChildRelation,
    },
    /// List all families
    List,
    /// Show a family
    Get {
        /// Family id
        id: String,
    },
    /// Delete a family (parent links derived from it are kept)
    Delete {
        /// Family id
        id: String,
    },
}

/// Resolve an optional partner id, failing if it names no one
async fn require_partner(ctx: &AppContext, id: &Option<String>) -> anyhow::Result<Option<Person>> {
    let Some(id) = id else {
        return Ok(None);
    };
    let id = PersonId::from(id.as_str());
    let person = ctx
        .storage
        .get_person(&id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Person not found: {}", id))?;
    Ok(Some(person))
}

pub async fn run(args: &FamilyArgs, cli: &Cli, ctx: &AppContext) -> anyhow::Result<()> {
    match &args.command {
        FamilyCommands::Add {
            partner1,
            partner2,
            id,
            married,
            place,
            children,
        } => {
            let p1 = require_partner(ctx, partner1).await?;
            let p2 = require_partner(ctx, partner2).await?;

            let id = id.clone().map(FamilyId::from).unwrap_or_default();
            let mut family = Family::new(id)
                .with_partners(p1.as_ref(), p2.as_ref())
                .married(married.clone(), place.clone());
            for child in children {
                family.add_child(PersonId::from(child.as_str()), ChildRelation::Biological);
            }

            ctx.storage.save_family(&family).await?;
            let links = ctx.storage.project_family(&family).await?;
            tracing::info!("Added family {}", family.id);
            if !cli.quiet {
                println!(
                    "Added family {} ({} parent links updated)",
                    family.id,
                    links.len()
                );
            }
        }
        FamilyCommands::AddChild {
            family,
            child,
            relation,
        } => {
            let family_id = FamilyId::from(family.as_str());
            let mut family = ctx
                .storage
                .get_family(&family_id)
                .await?
                .ok_or_else(|| anyhow::anyhow!("Family not found: {}", family_id))?;

            let child = PersonId::from(child.as_str());
            if !family.add_child(child.clone(), *relation) {
                anyhow::bail!("{} is already a child of family {}", child, family.id);
            }
            ctx.storage.save_family(&family).await?;
            ctx.storage.project_family(&family).await?;
            tracing::info!("Added child {} to family {}", child, family.id);
            if !cli.quiet {
                println!("Added {} to family {} as {} child", child, family.id, relation);
            }
        }
        FamilyCommands::List => {
            let families = ctx.storage.get_all_families().await?;
            emit(&families, ctx.format, |f| render_family_list(f))?;
        }
        FamilyCommands::Get { id } => {
            let id = FamilyId::from(id.as_str());
            let family = ctx
                .storage
                .get_family(&id)
                .await?
                .ok_or_else(|| anyhow::anyhow!("Family not found: {}", id))?;
            emit(&family, ctx.format, render_family)?;
        }
        FamilyCommands::Delete { id } => {
            let id = FamilyId::from(id.as_str());
            ctx.storage.delete_family(&id).await?;
            tracing::info!("Deleted family {}", id);
            if !cli.quiet {
                println!("Deleted family {}", id);
            }
        }
    }
    Ok(())
}
