//! Ancestry graph queries

use clap::Args;
use kindred_core::PersonId;

use crate::output::{
    emit, render_ahnentafel, render_descendancy, render_pedigree, render_relationship,
};
use crate::{AppContext, Cli};

#[derive(Args)]
pub struct PedigreeArgs {
    /// Person id
    pub person: String,

    /// Generations to show, at most 10. Without it the pedigree_generations
    /// setting applies; 0 uses the built-in default of 5
    #[arg(short, long, allow_negative_numbers = true)]
    pub generations: Option<i32>,
}

#[derive(Args)]
pub struct DescendancyArgs {
    /// Person id
    pub person: String,

    /// Generations to show, at most 10. Without it the descendancy_generations
    /// setting applies; 0 uses the built-in default of 4
    #[arg(short, long, allow_negative_numbers = true)]
    pub generations: Option<i32>,
}

#[derive(Args)]
pub struct AhnentafelArgs {
    /// Person id
    pub person: String,

    /// Generations to number, at most 10. Without it the ahnentafel_generations
    /// setting applies; 0 uses the built-in default of 5
    #[arg(short, long, allow_negative_numbers = true)]
    pub generations: Option<i32>,
}

#[derive(Args)]
pub struct RelationshipArgs {
    /// Person the relationship is described from
    pub person_a: String,

    /// Person whose relationship to the first is named
    pub person_b: String,
}

pub async fn run_pedigree(args: &PedigreeArgs, _cli: &Cli, ctx: &AppContext) -> anyhow::Result<()> {
    let generations = args
        .generations
        .or(ctx.config.pedigree_generations)
        .unwrap_or(0);
    tracing::info!("Pedigree of {} ({} generations requested)", args.person, generations);

    let result = ctx
        .engine
        .pedigree(&PersonId::from(args.person.as_str()), generations)
        .await?;
    emit(&result, ctx.format, render_pedigree)
}

pub async fn run_descendancy(
    args: &DescendancyArgs,
    _cli: &Cli,
    ctx: &AppContext,
) -> anyhow::Result<()> {
    let generations = args
        .generations
        .or(ctx.config.descendancy_generations)
        .unwrap_or(0);
    tracing::info!("Descendancy of {} ({} generations requested)", args.person, generations);

    let result = ctx
        .engine
        .descendancy(&PersonId::from(args.person.as_str()), generations)
        .await?;
    emit(&result, ctx.format, render_descendancy)
}

pub async fn run_ahnentafel(
    args: &AhnentafelArgs,
    _cli: &Cli,
    ctx: &AppContext,
) -> anyhow::Result<()> {
    let generations = args
        .generations
        .or(ctx.config.ahnentafel_generations)
        .unwrap_or(0);
    tracing::info!("Ahnentafel of {} ({} generations requested)", args.person, generations);

    let result = ctx
        .engine
        .ahnentafel(&PersonId::from(args.person.as_str()), generations)
        .await?;
    emit(&result, ctx.format, render_ahnentafel)
}

pub async fn run_relationship(
    args: &RelationshipArgs,
    _cli: &Cli,
    ctx: &AppContext,
) -> anyhow::Result<()> {
    tracing::info!("Relationship of {} to {}", args.person_b, args.person_a);

    let result = ctx
        .engine
        .relationship(
            &PersonId::from(args.person_a.as_str()),
            &PersonId::from(args.person_b.as_str()),
        )
        .await?;
    emit(&result, ctx.format, render_relationship)
}
