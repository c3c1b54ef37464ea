//! Read-side contract consumed by the ancestry engine

use crate::error::Result;
use crate::family::{Family, FamilyChild, FamilyId, ParentLink};
use crate::person::{Person, PersonId};
use async_trait::async_trait;

/// Read-only access to resolved person, parent-link and family records.
///
/// Implemented by every storage backend. Absence is reported as `Ok(None)` or
/// an empty list; errors are reserved for the backend itself failing.
#[async_trait]
pub trait AncestryReader: Send + Sync {
    /// Get a person by id
    async fn get_person(&self, id: &PersonId) -> Result<Option<Person>>;

    /// Get the father/mother link recorded for a person
    async fn get_parent_link(&self, id: &PersonId) -> Result<Option<ParentLink>>;

    /// Families in which the person is a partner
    async fn get_families_for_person(&self, id: &PersonId) -> Result<Vec<Family>>;

    /// Children listed in a family
    async fn get_family_children(&self, id: &FamilyId) -> Result<Vec<FamilyChild>>;
}
