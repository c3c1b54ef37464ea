//! In-memory family tree used by the engine's unit tests

use crate::error::{Error, Result};
use crate::family::{ChildRelation, Family, FamilyChild, FamilyId, ParentLink};
use crate::person::{Gender, Person, PersonId};
use crate::reader::AncestryReader;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};

#[derive(Default)]
pub struct TestTree {
    persons: HashMap<PersonId, Person>,
    links: HashMap<PersonId, ParentLink>,
    families: Vec<Family>,
    broken_links: HashSet<PersonId>,
}

impl TestTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn male(mut self, id: &str) -> Self {
        self.persons
            .insert(id.into(), Person::with_id(id, id, "Test", Gender::Male));
        self
    }

    pub fn female(mut self, id: &str) -> Self {
        self.persons
            .insert(id.into(), Person::with_id(id, id, "Test", Gender::Female));
        self
    }

    /// Record a parent link; ids need not exist as persons
    pub fn parents(mut self, child: &str, father: Option<&str>, mother: Option<&str>) -> Self {
        let mut link = ParentLink::new(child);
        if let Some(f) = father {
            link = link.with_father(f, f);
        }
        if let Some(m) = mother {
            link = link.with_mother(m, m);
        }
        self.links.insert(child.into(), link);
        self
    }

    pub fn family(
        mut self,
        id: &str,
        partner1: Option<&str>,
        partner2: Option<&str>,
        children: &[&str],
    ) -> Self {
        let p1 = partner1.and_then(|p| self.persons.get(&PersonId::from(p)));
        let p2 = partner2.and_then(|p| self.persons.get(&PersonId::from(p)));
        let mut family = Family::new(id).with_partners(p1, p2);
        for child in children {
            family.add_child((*child).into(), ChildRelation::Biological);
        }
        self.families.push(family);
        self
    }

    /// Make parent-link lookups for `id` fail at the backend level
    pub fn break_link(mut self, id: &str) -> Self {
        self.broken_links.insert(id.into());
        self
    }
}

#[async_trait]
impl AncestryReader for TestTree {
    async fn get_person(&self, id: &PersonId) -> Result<Option<Person>> {
        Ok(self.persons.get(id).cloned())
    }

    async fn get_parent_link(&self, id: &PersonId) -> Result<Option<ParentLink>> {
        if self.broken_links.contains(id) {
            return Err(Error::Storage("backend unavailable".to_string()));
        }
        Ok(self.links.get(id).cloned())
    }

    async fn get_families_for_person(&self, id: &PersonId) -> Result<Vec<Family>> {
        Ok(self
            .families
            .iter()
            .filter(|f| f.has_partner(id))
            .cloned()
            .collect())
    }

    async fn get_family_children(&self, id: &FamilyId) -> Result<Vec<FamilyChild>> {
        Ok(self
            .families
            .iter()
            .find(|f| &f.id == id)
            .map(|f| f.children.clone())
            .unwrap_or_default())
    }
}
