//! Family and parent-link records

use crate::date::GenDate;
use crate::limits::{validate_id, ValidationError};
use crate::person::{Gender, Person, PersonId};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Opaque identifier for a family
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FamilyId(pub String);

impl FamilyId {
    pub fn new() -> Self {
        Self(Ulid::new().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for FamilyId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for FamilyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for FamilyId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for FamilyId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// How a child belongs to a family
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChildRelation {
    #[default]
    Biological,
    Adopted,
    Foster,
    Step,
    Unknown,
}

impl std::str::FromStr for ChildRelation {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "biological" | "birth" => Ok(Self::Biological),
            "adopted" => Ok(Self::Adopted),
            "foster" => Ok(Self::Foster),
            "step" => Ok(Self::Step),
            "unknown" => Ok(Self::Unknown),
            other => Err(crate::error::Error::Validation(format!(
                "Unknown child relation: '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for ChildRelation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Biological => "biological",
            Self::Adopted => "adopted",
            Self::Foster => "foster",
            Self::Step => "step",
            Self::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

impl ChildRelation {
    /// Whether the family's partners count as this child's parents
    pub fn implies_parentage(self) -> bool {
        matches!(self, Self::Biological | Self::Adopted | Self::Unknown)
    }
}

/// A partner in a family, with a denormalized display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyPartner {
    pub id: PersonId,
    pub name: String,
}

impl From<&Person> for FamilyPartner {
    fn from(person: &Person) -> Self {
        Self {
            id: person.id.clone(),
            name: person.display_name(),
        }
    }
}

/// A child listed in a family
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyChild {
    pub person_id: PersonId,
    #[serde(default)]
    pub relation: ChildRelation,
}

/// A family: up to two partners and their children
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Family {
    pub id: FamilyId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner1: Option<FamilyPartner>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner2: Option<FamilyPartner>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marriage_date: Option<GenDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marriage_place: Option<String>,

    #[serde(default)]
    pub children: Vec<FamilyChild>,
}

impl Family {
    pub fn new(id: impl Into<FamilyId>) -> Self {
        Self {
            id: id.into(),
            partner1: None,
            partner2: None,
            marriage_date: None,
            marriage_place: None,
            children: Vec::new(),
        }
    }

    pub fn with_partners(mut self, partner1: Option<&Person>, partner2: Option<&Person>) -> Self {
        self.partner1 = partner1.map(FamilyPartner::from);
        self.partner2 = partner2.map(FamilyPartner::from);
        self
    }

    pub fn married(mut self, date: Option<GenDate>, place: Option<String>) -> Self {
        self.marriage_date = date;
        self.marriage_place = place;
        self
    }

    /// Add a child, ignoring a repeated person id
    pub fn add_child(&mut self, person_id: PersonId, relation: ChildRelation) -> bool {
        if self.children.iter().any(|c| c.person_id == person_id) {
            return false;
        }
        self.children.push(FamilyChild {
            person_id,
            relation,
        });
        true
    }

    pub fn with_child(mut self, person_id: impl Into<PersonId>) -> Self {
        self.add_child(person_id.into(), ChildRelation::Biological);
        self
    }

    pub fn partners(&self) -> impl Iterator<Item = &FamilyPartner> {
        self.partner1.iter().chain(self.partner2.iter())
    }

    pub fn has_partner(&self, person_id: &PersonId) -> bool {
        self.partners().any(|p| &p.id == person_id)
    }

    /// The partner who is not `person_id`, if recorded
    pub fn spouse_of(&self, person_id: &PersonId) -> Option<&FamilyPartner> {
        self.partners().find(|p| &p.id != person_id)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_id(self.id.as_str())?;
        for partner in self.partners() {
            validate_id(partner.id.as_str())?;
        }
        for child in &self.children {
            validate_id(child.person_id.as_str())?;
        }
        Ok(())
    }
}

/// Resolved parentage of one person: at most one father and one mother
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentLink {
    pub person_id: PersonId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub father_id: Option<PersonId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub father_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mother_id: Option<PersonId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mother_name: Option<String>,
}

impl ParentLink {
    pub fn new(person_id: impl Into<PersonId>) -> Self {
        Self {
            person_id: person_id.into(),
            father_id: None,
            father_name: None,
            mother_id: None,
            mother_name: None,
        }
    }

    pub fn with_father(mut self, id: impl Into<PersonId>, name: impl Into<String>) -> Self {
        self.father_id = Some(id.into());
        self.father_name = Some(name.into());
        self
    }

    pub fn with_mother(mut self, id: impl Into<PersonId>, name: impl Into<String>) -> Self {
        self.mother_id = Some(id.into());
        self.mother_name = Some(name.into());
        self
    }

    /// Derive a child's parent link from the partners of its family.
    ///
    /// A partner recorded as male becomes the father and a female partner the
    /// mother. Partners of unknown gender fill whichever slot is still free,
    /// first partner first.
    pub fn from_family(
        person_id: PersonId,
        partners: &[(&FamilyPartner, Gender)],
    ) -> Self {
        let mut link = Self::new(person_id);
        let mut undecided = Vec::new();

        for (partner, gender) in partners {
            match gender {
                Gender::Male if link.father_id.is_none() => {
                    link = link.with_father(partner.id.clone(), partner.name.clone());
                }
                Gender::Female if link.mother_id.is_none() => {
                    link = link.with_mother(partner.id.clone(), partner.name.clone());
                }
                _ => undecided.push(*partner),
            }
        }
        for partner in undecided {
            if link.father_id.is_none() {
                link = link.with_father(partner.id.clone(), partner.name.clone());
            } else if link.mother_id.is_none() {
                link = link.with_mother(partner.id.clone(), partner.name.clone());
            }
        }
        link
    }

    /// Take the parents `other` names, keeping the ones it leaves unknown
    pub fn overlay(mut self, other: &ParentLink) -> Self {
        if let (Some(id), Some(name)) = (&other.father_id, &other.father_name) {
            self = self.with_father(id.clone(), name.clone());
        }
        if let (Some(id), Some(name)) = (&other.mother_id, &other.mother_name) {
            self = self.with_mother(id.clone(), name.clone());
        }
        self
    }

    /// Father then mother, skipping unknown parents
    pub fn parent_ids(&self) -> impl Iterator<Item = &PersonId> {
        self.father_id.iter().chain(self.mother_id.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.father_id.is_none() && self.mother_id.is_none()
    }
}
