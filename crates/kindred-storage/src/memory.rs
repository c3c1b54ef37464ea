//! In-memory storage backend for testing

use crate::error::{StorageError, StorageResult};
use crate::traits::StorageBackend;
use async_trait::async_trait;
use kindred_core::{
    AncestryReader, Family, FamilyChild, FamilyId, ParentLink, Person, PersonId,
};
use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

fn lock_error<T>(e: PoisonError<T>) -> StorageError {
    StorageError::Database(format!("Lock error: {}", e))
}

/// In-memory storage backend
///
/// Useful for testing and temporary storage. Records are kept in id order,
/// which is the order list operations return them in.
pub struct MemoryStorage {
    persons: RwLock<BTreeMap<PersonId, Person>>,
    parent_links: RwLock<BTreeMap<PersonId, ParentLink>>,
    families: RwLock<BTreeMap<FamilyId, Family>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            persons: RwLock::new(BTreeMap::new()),
            parent_links: RwLock::new(BTreeMap::new()),
            families: RwLock::new(BTreeMap::new()),
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AncestryReader for MemoryStorage {
    async fn get_person(&self, id: &PersonId) -> kindred_core::Result<Option<Person>> {
        let persons = self.persons.read().map_err(lock_error)?;
        Ok(persons.get(id).cloned())
    }

    async fn get_parent_link(&self, id: &PersonId) -> kindred_core::Result<Option<ParentLink>> {
        let links = self.parent_links.read().map_err(lock_error)?;
        Ok(links.get(id).cloned())
    }

    async fn get_families_for_person(&self, id: &PersonId) -> kindred_core::Result<Vec<Family>> {
        let families = self.families.read().map_err(lock_error)?;
        Ok(families
            .values()
            .filter(|f| f.has_partner(id))
            .cloned()
            .collect())
    }

    async fn get_family_children(&self, id: &FamilyId) -> kindred_core::Result<Vec<FamilyChild>> {
        let families = self.families.read().map_err(lock_error)?;
        Ok(families
            .get(id)
            .map(|f| f.children.clone())
            .unwrap_or_default())
    }
}

#[async_trait]
impl StorageBackend for MemoryStorage {
    async fn initialize(&self) -> StorageResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> StorageResult<bool> {
        Ok(true)
    }

    // Person operations

    async fn save_person(&self, person: &Person) -> StorageResult<()> {
        person.validate()?;
        let mut persons = self.persons.write().map_err(lock_error)?;
        persons.insert(person.id.clone(), person.clone());
        Ok(())
    }

    async fn get_all_persons(&self) -> StorageResult<Vec<Person>> {
        let persons = self.persons.read().map_err(lock_error)?;
        Ok(persons.values().cloned().collect())
    }

    async fn delete_person(&self, id: &PersonId) -> StorageResult<()> {
        {
            let mut persons = self.persons.write().map_err(lock_error)?;
            if persons.remove(id).is_none() {
                return Err(StorageError::PersonNotFound(id.to_string()));
            }
        }
        let mut links = self.parent_links.write().map_err(lock_error)?;
        links.remove(id);
        Ok(())
    }

    // Parent link operations

    async fn save_parent_link(&self, link: &ParentLink) -> StorageResult<()> {
        let mut links = self.parent_links.write().map_err(lock_error)?;
        links.insert(link.person_id.clone(), link.clone());
        Ok(())
    }

    async fn get_all_parent_links(&self) -> StorageResult<Vec<ParentLink>> {
        let links = self.parent_links.read().map_err(lock_error)?;
        Ok(links.values().cloned().collect())
    }

    async fn delete_parent_link(&self, person_id: &PersonId) -> StorageResult<()> {
        let mut links = self.parent_links.write().map_err(lock_error)?;
        links.remove(person_id);
        Ok(())
    }

    // Family operations

    async fn save_family(&self, family: &Family) -> StorageResult<()> {
        family.validate()?;
        let mut families = self.families.write().map_err(lock_error)?;
        families.insert(family.id.clone(), family.clone());
        Ok(())
    }

    async fn get_family(&self, id: &FamilyId) -> StorageResult<Option<Family>> {
        let families = self.families.read().map_err(lock_error)?;
        Ok(families.get(id).cloned())
    }

    async fn get_all_families(&self) -> StorageResult<Vec<Family>> {
        let families = self.families.read().map_err(lock_error)?;
        Ok(families.values().cloned().collect())
    }

    async fn delete_family(&self, id: &FamilyId) -> StorageResult<()> {
        let mut families = self.families.write().map_err(lock_error)?;
        match families.remove(id) {
            Some(_) => Ok(()),
            None => Err(StorageError::FamilyNotFound(id.to_string())),
        }
    }
}
