//! Person (node) types

use crate::date::GenDate;
use crate::error::Error;
use crate::limits::{validate_id, validate_name, validate_place, ValidationError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use ulid::Ulid;

/// Opaque identifier for a person
///
/// Freshly minted ids are ULIDs, but any caller-supplied string (a GEDCOM
/// xref such as `I12`, a row key) is accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(pub String);

impl PersonId {
    pub fn new() -> Self {
        Self(Ulid::new().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for PersonId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PersonId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PersonId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for PersonId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Recorded gender of a person
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Unknown,
}

impl FromStr for Gender {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "m" | "male" => Ok(Self::Male),
            "f" | "female" => Ok(Self::Female),
            "u" | "unknown" | "" => Ok(Self::Unknown),
            other => Err(Error::Validation(format!("Unknown gender: '{}'", other))),
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

/// A person record, as resolved by the projection store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,

    #[serde(default)]
    pub given_name: String,

    #[serde(default)]
    pub surname: String,

    #[serde(default)]
    pub gender: Gender,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<GenDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_place: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub death_date: Option<GenDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub death_place: Option<String>,
}

impl Person {
    /// Create a new person with a fresh id
    pub fn new(given_name: impl Into<String>, surname: impl Into<String>, gender: Gender) -> Self {
        Self::with_id(PersonId::new(), given_name, surname, gender)
    }

    /// Create a new person with a caller-supplied id
    pub fn with_id(
        id: impl Into<PersonId>,
        given_name: impl Into<String>,
        surname: impl Into<String>,
        gender: Gender,
    ) -> Self {
        Self {
            id: id.into(),
            given_name: given_name.into(),
            surname: surname.into(),
            gender,
            birth_date: None,
            birth_place: None,
            death_date: None,
            death_place: None,
        }
    }

    pub fn born(mut self, date: Option<GenDate>, place: Option<String>) -> Self {
        self.birth_date = date;
        self.birth_place = place;
        self
    }

    pub fn died(mut self, date: Option<GenDate>, place: Option<String>) -> Self {
        self.death_date = date;
        self.death_place = place;
        self
    }

    /// "Given Surname", tolerating either part being blank
    pub fn display_name(&self) -> String {
        format!("{} {}", self.given_name, self.surname)
            .trim()
            .to_string()
    }

    /// Check field lengths before the record is stored
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_id(self.id.as_str())?;
        validate_name(&self.given_name)?;
        validate_name(&self.surname)?;
        for place in [&self.birth_place, &self.death_place].into_iter().flatten() {
            validate_place(place)?;
        }
        Ok(())
    }
}

/// Snapshot of a person carried inside query results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonSummary {
    pub id: PersonId,
    pub name: String,
    pub gender: Gender,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<GenDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_place: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub death_date: Option<GenDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub death_place: Option<String>,
}

impl From<&Person> for PersonSummary {
    fn from(person: &Person) -> Self {
        Self {
            id: person.id.clone(),
            name: person.display_name(),
            gender: person.gender,
            birth_date: person.birth_date.clone(),
            birth_place: person.birth_place.clone(),
            death_date: person.death_date.clone(),
            death_place: person.death_place.clone(),
        }
    }
}

impl From<Person> for PersonSummary {
    fn from(person: Person) -> Self {
        Self {
            name: person.display_name(),
            id: person.id,
            gender: person.gender,
            birth_date: person.birth_date,
            birth_place: person.birth_place,
            death_date: person.death_date,
            death_place: person.death_place,
        }
    }
}

impl PersonSummary {
    /// "Name (1850 - 1921)" style label for text output
    pub fn label(&self) -> String {
        let years = match (&self.birth_date, &self.death_date) {
            (None, None) => return self.name.clone(),
            (Some(b), None) => format!("b. {}", b),
            (None, Some(d)) => format!("d. {}", d),
            (Some(b), Some(d)) => format!("{} - {}", b, d),
        };
        format!("{} ({})", self.name, years)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_creation() {
        let person = Person::with_id("I1", "Ada", "Lovelace", Gender::Female);

        assert_eq!(person.id, PersonId::from("I1"));
        assert_eq!(person.display_name(), "Ada Lovelace");
        assert!(person.birth_date.is_none());
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = Person::new("A", "", Gender::Unknown);
        let b = Person::new("B", "", Gender::Unknown);
        assert_ne!(a.id, b.id);
        assert_eq!(a.display_name(), "A");
    }

    #[test]
    fn test_gender_parsing() {
        assert_eq!("M".parse::<Gender>().unwrap(), Gender::Male);
        assert_eq!("female".parse::<Gender>().unwrap(), Gender::Female);
        assert_eq!("".parse::<Gender>().unwrap(), Gender::Unknown);
        assert!("x".parse::<Gender>().is_err());
    }

    #[test]
    fn test_summary_label() {
        let person = Person::with_id("I1", "Ada", "Lovelace", Gender::Female)
            .born(Some(GenDate::Year(1815)), Some("London".to_string()))
            .died(Some(GenDate::Year(1852)), None);
        let summary = PersonSummary::from(&person);

        assert_eq!(summary.label(), "Ada Lovelace (1815 - 1852)");
        assert_eq!(summary.birth_place.as_deref(), Some("London"));
    }

    #[test]
    fn test_validate() {
        let ok = Person::with_id("I1", "Ada", "Lovelace", Gender::Female);
        assert!(ok.validate().is_ok());

        let bad = Person::with_id("", "Ada", "Lovelace", Gender::Female);
        assert_eq!(bad.validate(), Err(ValidationError::EmptyId));
    }
}
