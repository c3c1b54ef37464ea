//! Ahnentafel numbering
//!
//! The subject is 1. For any person numbered N, the father is 2N and the
//! mother 2N+1, so generation = floor(log2 N). Unknown ancestors leave gaps:
//! their numbers are simply absent from the result.

use crate::error::Result;
use crate::lookup::Lookup;
use crate::person::{PersonId, PersonSummary};
use crate::reader::AncestryReader;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A numbered ancestor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AhnentafelEntry {
    pub number: u64,
    pub generation: u32,
    pub person: PersonSummary,
}

/// Result of an Ahnentafel query, ascending by number
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AhnentafelResult {
    pub entries: Vec<AhnentafelEntry>,
    pub total_entries: usize,
    pub max_generation: u32,
}

impl AhnentafelResult {
    pub fn get(&self, number: u64) -> Option<&AhnentafelEntry> {
        self.entries
            .binary_search_by_key(&number, |e| e.number)
            .ok()
            .map(|i| &self.entries[i])
    }

    pub fn numbers(&self) -> Vec<u64> {
        self.entries.iter().map(|e| e.number).collect()
    }
}

/// Generation of an Ahnentafel number: floor(log2 n)
pub fn generation_of(number: u64) -> u32 {
    debug_assert!(number > 0);
    u64::BITS - 1 - number.leading_zeros()
}

/// Numbers a person's ancestors
pub struct AhnentafelNumberer;

impl AhnentafelNumberer {
    /// Number the ancestors of `person_id` up to `max_generations` hops.
    ///
    /// Walks like the pedigree builder: depth-first, father first, each person
    /// numbered at its first occurrence only.
    pub async fn number<R: AncestryReader + ?Sized>(
        lookup: &Lookup<'_, R>,
        person_id: &PersonId,
        max_generations: u32,
    ) -> Result<AhnentafelResult> {
        tracing::debug!(
            "Numbering ancestors: person={}, generations={}",
            person_id,
            max_generations
        );

        let subject = lookup.subject(person_id).await?;
        let mut visited: HashSet<PersonId> = HashSet::new();
        let mut entries = Vec::new();
        let mut stack: Vec<(PersonId, u64)> = Vec::new();

        visited.insert(subject.id.clone());
        entries.push(AhnentafelEntry {
            number: 1,
            generation: 0,
            person: PersonSummary::from(subject),
        });
        Self::push_parents(lookup, &mut stack, person_id, 1, max_generations).await?;

        while let Some((id, number)) = stack.pop() {
            if visited.contains(&id) {
                continue;
            }
            let Some(person) = lookup.person(&id).await? else {
                continue;
            };
            visited.insert(id.clone());

            entries.push(AhnentafelEntry {
                number,
                generation: generation_of(number),
                person: PersonSummary::from(person),
            });
            Self::push_parents(lookup, &mut stack, &id, number, max_generations).await?;
        }

        entries.sort_by_key(|e| e.number);
        let max_generation = entries.iter().map(|e| e.generation).max().unwrap_or(0);

        tracing::debug!(
            "Ahnentafel of {} has {} entries",
            person_id,
            entries.len()
        );

        Ok(AhnentafelResult {
            total_entries: entries.len(),
            max_generation,
            entries,
        })
    }

    async fn push_parents<R: AncestryReader + ?Sized>(
        lookup: &Lookup<'_, R>,
        stack: &mut Vec<(PersonId, u64)>,
        person_id: &PersonId,
        number: u64,
        max_generations: u32,
    ) -> Result<()> {
        if generation_of(number) >= max_generations {
            return Ok(());
        }
        let Some(link) = lookup.parent_link(person_id).await? else {
            return Ok(());
        };
        if let Some(mother) = link.mother_id {
            stack.push((mother, number * 2 + 1));
        }
        if let Some(father) = link.father_id {
            stack.push((father, number * 2));
        }
        Ok(())
    }
}
