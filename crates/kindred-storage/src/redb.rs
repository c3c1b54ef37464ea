//! ReDB storage backend

use crate::dataset::Dataset;
use crate::error::{StorageError, StorageResult};
use crate::traits::StorageBackend;
use async_trait::async_trait;
use kindred_core::{
    AncestryReader, Family, FamilyChild, FamilyId, ParentLink, Person, PersonId,
};
use redb::{Database, ReadableTable, TableDefinition};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use std::sync::Mutex;

/// JSON records keyed by id
type RecordTable = TableDefinition<'static, &'static str, &'static [u8]>;

// Table definitions
const PERSONS: RecordTable = TableDefinition::new("persons");
const PARENT_LINKS: RecordTable = TableDefinition::new("parent_links");
const FAMILIES: RecordTable = TableDefinition::new("families");

/// ReDB storage backend
pub struct RedbStorage {
    db: Mutex<Database>,
}

impl RedbStorage {
    /// Open or create a ReDB database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path).map_err(|e| StorageError::Database(e.to_string()))?;

        // Initialize tables
        {
            let write_txn = db
                .begin_write()
                .map_err(|e| StorageError::Database(e.to_string()))?;
            {
                write_txn.open_table(PERSONS)?;
                write_txn.open_table(PARENT_LINKS)?;
                write_txn.open_table(FAMILIES)?;
            }
            write_txn.commit()?;
        }

        Ok(Self { db: Mutex::new(db) })
    }

    fn put<T: Serialize>(
        &self,
        table_def: RecordTable,
        key: &str,
        record: &T,
    ) -> StorageResult<()> {
        let value = serde_json::to_vec(record)?;

        let db = self
            .db
            .lock()
            .map_err(|e| StorageError::Database(e.to_string()))?;
        let write_txn = db.begin_write()?;
        {
            let mut table = write_txn.open_table(table_def)?;
            table.insert(key, value.as_slice())?;
        }
        write_txn.commit()?;

        Ok(())
    }

    fn get<T: DeserializeOwned>(
        &self,
        table_def: RecordTable,
        key: &str,
    ) -> StorageResult<Option<T>> {
        let db = self
            .db
            .lock()
            .map_err(|e| StorageError::Database(e.to_string()))?;
        let read_txn = db.begin_read()?;
        let table = read_txn.open_table(table_def)?;

        if let Some(value) = table.get(key)? {
            Ok(Some(serde_json::from_slice(value.value())?))
        } else {
            Ok(None)
        }
    }

    /// Every record of a table, in key order
    fn scan<T: DeserializeOwned>(&self, table_def: RecordTable) -> StorageResult<Vec<T>> {
        let db = self
            .db
            .lock()
            .map_err(|e| StorageError::Database(e.to_string()))?;
        let read_txn = db.begin_read()?;
        let table = read_txn.open_table(table_def)?;

        let mut records = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            records.push(serde_json::from_slice(value.value())?);
        }

        Ok(records)
    }

    /// Remove a key, reporting whether it was present
    fn remove(&self, table_def: RecordTable, key: &str) -> StorageResult<bool> {
        let db = self
            .db
            .lock()
            .map_err(|e| StorageError::Database(e.to_string()))?;
        let write_txn = db.begin_write()?;
        let existed = {
            let mut table = write_txn.open_table(table_def)?;
            let removed = table.remove(key)?;
            removed.is_some()
        };
        write_txn.commit()?;

        Ok(existed)
    }
}

#[async_trait]
impl AncestryReader for RedbStorage {
    async fn get_person(&self, id: &PersonId) -> kindred_core::Result<Option<Person>> {
        Ok(self.get(PERSONS, id.as_str())?)
    }

    async fn get_parent_link(&self, id: &PersonId) -> kindred_core::Result<Option<ParentLink>> {
        Ok(self.get(PARENT_LINKS, id.as_str())?)
    }

    async fn get_families_for_person(&self, id: &PersonId) -> kindred_core::Result<Vec<Family>> {
        let families: Vec<Family> = self.scan(FAMILIES)?;
        Ok(families.into_iter().filter(|f| f.has_partner(id)).collect())
    }

    async fn get_family_children(&self, id: &FamilyId) -> kindred_core::Result<Vec<FamilyChild>> {
        let family: Option<Family> = self.get(FAMILIES, id.as_str())?;
        Ok(family.map(|f| f.children).unwrap_or_default())
    }
}

#[async_trait]
impl StorageBackend for RedbStorage {
    async fn initialize(&self) -> StorageResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> StorageResult<bool> {
        let db = self
            .db
            .lock()
            .map_err(|e| StorageError::Database(e.to_string()))?;
        let read_txn = db.begin_read()?;
        read_txn.open_table(PERSONS)?;
        Ok(true)
    }

    async fn save_person(&self, person: &Person) -> StorageResult<()> {
        person.validate()?;
        self.put(PERSONS, person.id.as_str(), person)
    }

    async fn get_all_persons(&self) -> StorageResult<Vec<Person>> {
        self.scan(PERSONS)
    }

    async fn delete_person(&self, id: &PersonId) -> StorageResult<()> {
        if !self.remove(PERSONS, id.as_str())? {
            return Err(StorageError::PersonNotFound(id.to_string()));
        }
        self.remove(PARENT_LINKS, id.as_str())?;
        Ok(())
    }

    async fn save_parent_link(&self, link: &ParentLink) -> StorageResult<()> {
        self.put(PARENT_LINKS, link.person_id.as_str(), link)
    }

    async fn get_all_parent_links(&self) -> StorageResult<Vec<ParentLink>> {
        self.scan(PARENT_LINKS)
    }

    async fn delete_parent_link(&self, person_id: &PersonId) -> StorageResult<()> {
        self.remove(PARENT_LINKS, person_id.as_str())?;
        Ok(())
    }

    async fn save_family(&self, family: &Family) -> StorageResult<()> {
        family.validate()?;
        self.put(FAMILIES, family.id.as_str(), family)
    }

    async fn get_family(&self, id: &FamilyId) -> StorageResult<Option<Family>> {
        self.get(FAMILIES, id.as_str())
    }

    async fn get_all_families(&self) -> StorageResult<Vec<Family>> {
        self.scan(FAMILIES)
    }

    async fn delete_family(&self, id: &FamilyId) -> StorageResult<()> {
        if !self.remove(FAMILIES, id.as_str())? {
            return Err(StorageError::FamilyNotFound(id.to_string()));
        }
        Ok(())
    }

    async fn save_dataset(&self, dataset: &Dataset) -> StorageResult<()> {
        if dataset.is_empty() {
            return Ok(());
        }
        for person in &dataset.persons {
            person.validate()?;
        }
        for family in &dataset.families {
            family.validate()?;
        }

        let db = self
            .db
            .lock()
            .map_err(|e| StorageError::Database(e.to_string()))?;
        let write_txn = db.begin_write()?;
        {
            let mut table = write_txn.open_table(PERSONS)?;
            for person in &dataset.persons {
                let value = serde_json::to_vec(person)?;
                table.insert(person.id.as_str(), value.as_slice())?;
            }
        }
        {
            let mut table = write_txn.open_table(FAMILIES)?;
            for family in &dataset.families {
                let value = serde_json::to_vec(family)?;
                table.insert(family.id.as_str(), value.as_slice())?;
            }
        }
        {
            let mut table = write_txn.open_table(PARENT_LINKS)?;
            for link in &dataset.parent_links {
                let value = serde_json::to_vec(link)?;
                table.insert(link.person_id.as_str(), value.as_slice())?;
            }
        }
        write_txn.commit()?;
        tracing::debug!(
            "Batch saved {} persons, {} families, {} parent links in single transaction",
            dataset.persons.len(),
            dataset.families.len(),
            dataset.parent_links.len()
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kindred_core::{ChildRelation, Gender, GenealogyEngine};
    use std::sync::Arc;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_redb_storage() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.redb");

        let storage = RedbStorage::open(&db_path).unwrap();
        storage.initialize().await.unwrap();
        assert!(storage.health_check().await.unwrap());

        let person = Person::with_id("I1", "John", "Smith", Gender::Male)
            .born(Some("ABT 1850".parse().unwrap()), Some("Leeds".into()));
        storage.save_person(&person).await.unwrap();

        let retrieved = storage.get_person(&"I1".into()).await.unwrap().unwrap();
        assert_eq!(retrieved, person);

        storage.delete_person(&"I1".into()).await.unwrap();
        assert!(storage.get_person(&"I1".into()).await.unwrap().is_none());
        assert!(matches!(
            storage.delete_person(&"I1".into()).await.unwrap_err(),
            StorageError::PersonNotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_persists_across_reopen() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("tree.redb");

        {
            let storage = RedbStorage::open(&db_path).unwrap();
            let father = Person::with_id("I1", "John", "Smith", Gender::Male);
            let child = Person::with_id("I2", "Anne", "Smith", Gender::Female);
            storage.save_person(&father).await.unwrap();
            storage.save_person(&child).await.unwrap();

            let mut family = Family::new("F1").with_partners(Some(&father), None);
            family.add_child("I2".into(), ChildRelation::Biological);
            storage.save_family(&family).await.unwrap();
            storage.project_family(&family).await.unwrap();
        }

        let storage = Arc::new(RedbStorage::open(&db_path).unwrap());
        let link = storage.get_parent_link(&"I2".into()).await.unwrap().unwrap();
        assert_eq!(link.father_id, Some(PersonId::from("I1")));
        assert!(link.mother_id.is_none());

        let families = storage.get_families_for_person(&"I1".into()).await.unwrap();
        assert_eq!(families.len(), 1);
        assert_eq!(
            storage.get_family_children(&"F1".into()).await.unwrap().len(),
            1
        );

        let engine = GenealogyEngine::new(storage);
        let result = engine
            .relationship(&"I2".into(), &"I1".into())
            .await
            .unwrap();
        assert_eq!(result.summary, "parent");
    }

    #[tokio::test]
    async fn test_batch_dataset() {
        let dir = tempdir().unwrap();
        let storage = RedbStorage::open(dir.path().join("batch.redb")).unwrap();

        let dataset = Dataset::new(
            vec![
                Person::with_id("I1", "John", "Smith", Gender::Male),
                Person::with_id("I2", "Anne", "Smith", Gender::Female),
            ],
            vec![Family::new("F1").with_child("I2")],
            vec![ParentLink::new("I2").with_father("I1", "John Smith")],
        );
        storage.save_dataset(&dataset).await.unwrap();

        assert_eq!(storage.load_dataset().await.unwrap(), dataset);

        storage.delete_family(&"F1".into()).await.unwrap();
        assert!(storage.get_family(&"F1".into()).await.unwrap().is_none());
        // Links projected earlier survive the family
        assert!(storage.get_parent_link(&"I2".into()).await.unwrap().is_some());
    }
}
