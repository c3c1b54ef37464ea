//! Person management commands

use clap::{Args, Subcommand};
use kindred_core::{AncestryReader, GenDate, Gender, Person, PersonId};
use kindred_storage::StorageBackend;

use crate::output::{emit, render_person, render_person_list};
use crate::{AppContext, Cli};

#[derive(Args)]
pub struct PersonArgs {
    #[command(subcommand)]
    pub command: PersonCommands,
}

#[derive(Subcommand)]
pub enum PersonCommands {
    /// Add a new person
    Add {
        /// Given name(s)
        given_name: String,

        /// Surname
        #[arg(default_value = "")]
        surname: String,

        /// Record id (a fresh id is generated if omitted)
        #[arg(long)]
        id: Option<String>,

        /// Gender: male, female, unknown
        #[arg(short, long, default_value = "unknown")]
        gender: Gender,

        /// Birth date, e.g. 1850, 1850-03-12, "ABT 1850", "12 MAR 1850"
        #[arg(long)]
        born: Option<GenDate>,

        /// Birth place
        #[arg(long)]
        birth_place: Option<String>,

        /// Death date
        #[arg(long)]
        died: Option<GenDate>,

        /// Death place
        #[arg(long)]
        death_place: Option<String>,
    },
    /// List all persons
    List,
    /// Show a person
    Get {
        /// Person id
        id: String,
    },
    /// Delete a person and their parent link
    Delete {
        /// Person id
        id: String,
    },
}

pub async fn run(args: &PersonArgs, cli: &Cli, ctx: &AppContext) -> anyhow::Result<()> {
    match &args.command {
        PersonCommands::Add {
            given_name,
            surname,
            id,
            gender,
            born,
            birth_place,
            died,
            death_place,
        } => {
            let id = id.clone().map(PersonId::from).unwrap_or_default();
            let person = Person::with_id(id, given_name, surname, *gender)
                .born(born.clone(), birth_place.clone())
                .died(died.clone(), death_place.clone());

            ctx.storage.save_person(&person).await?;
            tracing::info!("Added person {}", person.id);
            if !cli.quiet {
                println!("Added person {} ({})", person.display_name(), person.id);
            }
        }
        PersonCommands::List => {
            let persons = ctx.storage.get_all_persons().await?;
            emit(&persons, ctx.format, |p| render_person_list(p))?;
        }
        PersonCommands::Get { id } => {
            let id = PersonId::from(id.as_str());
            let person = ctx
                .storage
                .get_person(&id)
                .await?
                .ok_or_else(|| anyhow::anyhow!("Person not found: {}", id))?;
            emit(&person, ctx.format, render_person)?;
        }
        PersonCommands::Delete { id } => {
            let id = PersonId::from(id.as_str());
            ctx.storage.delete_person(&id).await?;
            tracing::info!("Deleted person {}", id);
            if !cli.quiet {
                println!("Deleted person {}", id);
            }
        }
    }
    Ok(())
}
