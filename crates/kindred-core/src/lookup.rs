//! Cancellable, degrading lookups shared by the graph builders

use crate::error::{Error, Result};
use crate::family::{Family, FamilyChild, FamilyId, ParentLink};
use crate::person::{Person, PersonId};
use crate::reader::AncestryReader;
use tokio_util::sync::CancellationToken;

/// Per-query view over an [`AncestryReader`].
///
/// Only the subject lookup surfaces reader failures. Every other lookup that
/// fails is logged and treated as absent data. Each lookup first checks the
/// cancellation token, so a cancelled query stops at its next step.
pub struct Lookup<'a, R: AncestryReader + ?Sized> {
    reader: &'a R,
    cancel: Option<&'a CancellationToken>,
}

impl<'a, R: AncestryReader + ?Sized> Lookup<'a, R> {
    pub fn new(reader: &'a R, cancel: Option<&'a CancellationToken>) -> Self {
        Self { reader, cancel }
    }

    fn check_cancelled(&self) -> Result<()> {
        match self.cancel {
            Some(token) if token.is_cancelled() => Err(Error::Cancelled),
            _ => Ok(()),
        }
    }

    /// Resolve the subject of a query, failing if it does not exist
    pub async fn subject(&self, id: &PersonId) -> Result<Person> {
        self.check_cancelled()?;
        self.reader
            .get_person(id)
            .await?
            .ok_or_else(|| Error::PersonNotFound(id.to_string()))
    }

    pub async fn person(&self, id: &PersonId) -> Result<Option<Person>> {
        self.check_cancelled()?;
        match self.reader.get_person(id).await {
            Ok(person) => Ok(person),
            Err(e) => {
                tracing::warn!("Treating person {} as absent: {}", id, e);
                Ok(None)
            }
        }
    }

    pub async fn parent_link(&self, id: &PersonId) -> Result<Option<ParentLink>> {
        self.check_cancelled()?;
        match self.reader.get_parent_link(id).await {
            Ok(link) => Ok(link),
            Err(e) => {
                tracing::warn!("Treating parent link of {} as absent: {}", id, e);
                Ok(None)
            }
        }
    }

    pub async fn families_for(&self, id: &PersonId) -> Result<Vec<Family>> {
        self.check_cancelled()?;
        match self.reader.get_families_for_person(id).await {
            Ok(families) => Ok(families),
            Err(e) => {
                tracing::warn!("Treating families of {} as absent: {}", id, e);
                Ok(Vec::new())
            }
        }
    }

    pub async fn family_children(&self, id: &FamilyId) -> Result<Vec<FamilyChild>> {
        self.check_cancelled()?;
        match self.reader.get_family_children(id).await {
            Ok(children) => Ok(children),
            Err(e) => {
                tracing::warn!("Treating children of family {} as absent: {}", id, e);
                Ok(Vec::new())
            }
        }
    }
}
