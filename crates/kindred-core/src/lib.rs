//! Kindred Core - Ancestry graph engine
//!
//! This crate provides the genealogy data model, the read-side contract the
//! engine consumes, and the query-time algorithms: pedigrees, descendancy
//! trees, Ahnentafel numbering and kinship resolution.

pub mod ahnentafel;
pub mod date;
pub mod descendancy;
pub mod engine;
pub mod error;
pub mod family;
pub mod kinship;
pub mod limits;
pub mod lookup;
pub mod pedigree;
pub mod person;
pub mod reader;
pub mod relationship;

#[cfg(test)]
mod fixtures;

pub use ahnentafel::{AhnentafelEntry, AhnentafelNumberer, AhnentafelResult};
pub use date::GenDate;
pub use descendancy::{
    DescendancyBuilder, DescendancyFamily, DescendancyNode, DescendancyResult, SpouseInfo,
};
pub use engine::GenealogyEngine;
pub use error::{Error, Result};
pub use family::{ChildRelation, Family, FamilyChild, FamilyId, FamilyPartner, ParentLink};
pub use kinship::Kinship;
pub use lookup::Lookup;
pub use pedigree::{PedigreeBuilder, PedigreeNode, PedigreeResult};
pub use person::{Gender, Person, PersonId, PersonSummary};
pub use reader::AncestryReader;
pub use relationship::{
    AncestorInfo, AncestorMap, RelationshipPath, RelationshipResolver, RelationshipResult,
};
