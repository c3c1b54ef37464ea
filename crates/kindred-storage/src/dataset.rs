//! Whole-store snapshot used for import and export

use crate::error::{StorageError, StorageResult};
use kindred_core::{Family, ParentLink, Person};
use serde::{Deserialize, Serialize};

/// Current dataset format version
pub const DATASET_VERSION: &str = "1.0";

/// Every record in a store, in a stable order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub version: String,
    #[serde(default)]
    pub persons: Vec<Person>,
    #[serde(default)]
    pub families: Vec<Family>,
    #[serde(default)]
    pub parent_links: Vec<ParentLink>,
}

impl Default for Dataset {
    fn default() -> Self {
        Self {
            version: DATASET_VERSION.to_string(),
            persons: Vec::new(),
            families: Vec::new(),
            parent_links: Vec::new(),
        }
    }
}

impl Dataset {
    pub fn new(persons: Vec<Person>, families: Vec<Family>, parent_links: Vec<ParentLink>) -> Self {
        let mut dataset = Self {
            version: DATASET_VERSION.to_string(),
            persons,
            families,
            parent_links,
        };
        dataset.sort();
        dataset
    }

    pub fn is_empty(&self) -> bool {
        self.persons.is_empty() && self.families.is_empty() && self.parent_links.is_empty()
    }

    /// Order records by id so exports are reproducible
    pub fn sort(&mut self) {
        self.persons.sort_by(|a, b| a.id.cmp(&b.id));
        self.families.sort_by(|a, b| a.id.cmp(&b.id));
        self.parent_links.sort_by(|a, b| a.person_id.cmp(&b.person_id));
    }

    /// Check the format version and every record's field limits
    pub fn validate(&self) -> StorageResult<()> {
        let major = self.version.split('.').next().unwrap_or_default();
        if major != "1" {
            return Err(StorageError::UnsupportedVersion(self.version.clone()));
        }
        for person in &self.persons {
            person.validate()?;
        }
        for family in &self.families {
            family.validate()?;
        }
        Ok(())
    }

    pub fn to_json(&self) -> StorageResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> StorageResult<Self> {
        let dataset: Self = serde_json::from_str(json)?;
        dataset.validate()?;
        Ok(dataset)
    }
}
