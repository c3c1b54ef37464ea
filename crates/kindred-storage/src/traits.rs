//! Storage backend trait definitions

use crate::dataset::Dataset;
use crate::error::StorageResult;
use async_trait::async_trait;
use kindred_core::{
    AncestryReader, Family, FamilyId, FamilyPartner, Gender, ParentLink, Person, PersonId,
};

/// Trait for storage backend implementations
///
/// Every backend also serves the engine's read contract, so a store can be
/// handed straight to a [`kindred_core::GenealogyEngine`].
#[async_trait]
pub trait StorageBackend: AncestryReader {
    /// Initialize the storage (create tables, etc.)
    async fn initialize(&self) -> StorageResult<()>;

    /// Health check
    async fn health_check(&self) -> StorageResult<bool>;

    // ─────────────────────────────────────────────────────────────────────────
    // Person Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Save a person, replacing any record with the same id
    async fn save_person(&self, person: &Person) -> StorageResult<()>;

    /// Get all persons, ordered by id
    async fn get_all_persons(&self) -> StorageResult<Vec<Person>>;

    /// Delete a person and their own parent link
    async fn delete_person(&self, id: &PersonId) -> StorageResult<()>;

    // ─────────────────────────────────────────────────────────────────────────
    // Parent Link Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Save a parent link, replacing the person's previous one
    async fn save_parent_link(&self, link: &ParentLink) -> StorageResult<()>;

    /// Get all parent links, ordered by person id
    async fn get_all_parent_links(&self) -> StorageResult<Vec<ParentLink>>;

    /// Delete a person's parent link
    async fn delete_parent_link(&self, person_id: &PersonId) -> StorageResult<()>;

    // ─────────────────────────────────────────────────────────────────────────
    // Family Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Save a family, replacing any record with the same id
    async fn save_family(&self, family: &Family) -> StorageResult<()>;

    /// Get a family by id
    async fn get_family(&self, id: &FamilyId) -> StorageResult<Option<Family>>;

    /// Get all families, ordered by id
    async fn get_all_families(&self) -> StorageResult<Vec<Family>>;

    /// Delete a family. Parent links already projected from it are kept.
    async fn delete_family(&self, id: &FamilyId) -> StorageResult<()>;

    // ─────────────────────────────────────────────────────────────────────────
    // Bulk Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Derive parent links for a family's children from its partners.
    ///
    /// Only children whose relation implies parentage are projected; step
    /// and foster children keep whatever link they already have. A family
    /// only fills the slots its partners cover, so a parent recorded
    /// elsewhere survives a single-partner family. Returns the links written.
    async fn project_family(&self, family: &Family) -> StorageResult<Vec<ParentLink>> {
        let mut partners: Vec<(&FamilyPartner, Gender)> = Vec::new();
        for partner in family.partners() {
            let gender = self
                .get_person(&partner.id)
                .await?
                .map(|p| p.gender)
                .unwrap_or_default();
            partners.push((partner, gender));
        }

        let mut written = Vec::new();
        for child in family.children.iter().filter(|c| c.relation.implies_parentage()) {
            let projected = ParentLink::from_family(child.person_id.clone(), &partners);
            if projected.is_empty() {
                continue;
            }
            let existing = self.get_parent_link(&child.person_id).await?;
            let link = match &existing {
                Some(current) => current.clone().overlay(&projected),
                None => projected,
            };
            if existing.as_ref() == Some(&link) {
                continue;
            }
            self.save_parent_link(&link).await?;
            written.push(link);
        }

        tracing::debug!(
            "Projected {} parent links from family {}",
            written.len(),
            family.id
        );
        Ok(written)
    }

    /// Load every record in the store
    async fn load_dataset(&self) -> StorageResult<Dataset> {
        let persons = self.get_all_persons().await?;
        let families = self.get_all_families().await?;
        let parent_links = self.get_all_parent_links().await?;
        Ok(Dataset::new(persons, families, parent_links))
    }

    /// Save every record of a dataset, replacing records with the same ids
    async fn save_dataset(&self, dataset: &Dataset) -> StorageResult<()> {
        for person in &dataset.persons {
            self.save_person(person).await?;
        }
        for family in &dataset.families {
            self.save_family(family).await?;
        }
        for link in &dataset.parent_links {
            self.save_parent_link(link).await?;
        }
        Ok(())
    }
}
