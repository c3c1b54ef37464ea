//! Descendancy (descendant tree) construction
//!
//! Unlike the pedigree, descendants are found through family membership: a
//! person's families give their spouses and, through the family's child list,
//! their children.

use crate::date::GenDate;
use crate::error::{Error, Result};
use crate::family::{ChildRelation, FamilyId};
use crate::lookup::Lookup;
use crate::person::{PersonId, PersonSummary};
use crate::reader::AncestryReader;
use serde::{Deserialize, Serialize};

/// The other partner of a family
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpouseInfo {
    pub id: PersonId,
    pub name: String,
}

/// One family of a descendancy node, with the children expanded under it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescendancyFamily {
    pub family_id: FamilyId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spouse: Option<SpouseInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marriage_date: Option<GenDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marriage_place: Option<String>,
    pub children: Vec<DescendancyNode>,
}

/// One person in a descendancy tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescendancyNode {
    pub person: PersonSummary,
    pub generation: u32,
    /// How this person is a child of the family above (none for the subject)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relation: Option<ChildRelation>,
    pub families: Vec<DescendancyFamily>,
}

impl DescendancyNode {
    pub fn children(&self) -> impl Iterator<Item = &DescendancyNode> {
        self.families.iter().flat_map(|f| f.children.iter())
    }

    pub fn spouses(&self) -> impl Iterator<Item = &SpouseInfo> {
        self.families.iter().filter_map(|f| f.spouse.as_ref())
    }

    /// Number of descendant nodes below this one
    pub fn count_descendants(&self) -> usize {
        let mut count = 0;
        let mut stack: Vec<&DescendancyNode> = vec![self];
        while let Some(node) = stack.pop() {
            for child in node.children() {
                count += 1;
                stack.push(child);
            }
        }
        count
    }

    pub fn deepest_generation(&self) -> u32 {
        let mut deepest = self.generation;
        let mut stack: Vec<&DescendancyNode> = vec![self];
        while let Some(node) = stack.pop() {
            deepest = deepest.max(node.generation);
            stack.extend(node.children());
        }
        deepest
    }
}

/// Result of a descendancy query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescendancyResult {
    pub root: DescendancyNode,
    pub total_descendants: usize,
    pub max_generation_reached: u32,
    pub generations_requested: u32,
}

struct FamilySlot {
    family_id: FamilyId,
    spouse: Option<SpouseInfo>,
    marriage_date: Option<GenDate>,
    marriage_place: Option<String>,
    children: Vec<usize>,
}

struct Slot {
    person: PersonSummary,
    generation: u32,
    relation: Option<ChildRelation>,
    /// Slot of the node this one was reached from
    parent: Option<usize>,
    families: Vec<FamilySlot>,
}

/// Builds bounded descendant trees
pub struct DescendancyBuilder;

impl DescendancyBuilder {
    /// Build the descendancy of `person_id` down to `max_generations`.
    ///
    /// The cycle guard is scoped to each node's own line: a child already
    /// present among that node's ancestors in the tree is skipped. A person
    /// who is a child in several families appears once under each of them.
    pub async fn build<R: AncestryReader + ?Sized>(
        lookup: &Lookup<'_, R>,
        person_id: &PersonId,
        max_generations: u32,
    ) -> Result<DescendancyResult> {
        tracing::debug!(
            "Building descendancy: person={}, generations={}",
            person_id,
            max_generations
        );

        let subject = lookup.subject(person_id).await?;
        let mut slots = vec![Slot {
            person: PersonSummary::from(subject),
            generation: 0,
            relation: None,
            parent: None,
            families: Vec::new(),
        }];
        let mut stack: Vec<usize> = vec![0];

        while let Some(index) = stack.pop() {
            let id = slots[index].person.id.clone();
            let generation = slots[index].generation;
            let mut expanded = Vec::new();

            for family in lookup.families_for(&id).await? {
                let mut family_slot = FamilySlot {
                    spouse: family.spouse_of(&id).map(|p| SpouseInfo {
                        id: p.id.clone(),
                        name: p.name.clone(),
                    }),
                    family_id: family.id,
                    marriage_date: family.marriage_date,
                    marriage_place: family.marriage_place,
                    children: Vec::new(),
                };

                if generation < max_generations {
                    for child in lookup.family_children(&family_slot.family_id).await? {
                        if Self::in_lineage(&slots, index, &child.person_id) {
                            tracing::debug!(
                                "Descendancy cut at {} (already an ancestor in this line)",
                                child.person_id
                            );
                            continue;
                        }
                        let Some(person) = lookup.person(&child.person_id).await? else {
                            continue;
                        };
                        let child_index = slots.len();
                        slots.push(Slot {
                            person: PersonSummary::from(person),
                            generation: generation + 1,
                            relation: Some(child.relation),
                            parent: Some(index),
                            families: Vec::new(),
                        });
                        family_slot.children.push(child_index);
                        expanded.push(child_index);
                    }
                }
                slots[index].families.push(family_slot);
            }

            // Reverse so the first child is expanded first
            stack.extend(expanded.into_iter().rev());
        }

        let root = Self::assemble(slots)
            .ok_or_else(|| Error::Internal("descendancy arena lost its subject".to_string()))?;
        let total_descendants = root.count_descendants();
        let max_generation_reached = root.deepest_generation();

        tracing::debug!(
            "Descendancy of {} has {} descendants over {} generations",
            person_id,
            total_descendants,
            max_generation_reached
        );

        Ok(DescendancyResult {
            root,
            total_descendants,
            max_generation_reached,
            generations_requested: max_generations,
        })
    }

    /// Whether `id` is the node at `index` or one of its ancestors in the tree
    fn in_lineage(slots: &[Slot], index: usize, id: &PersonId) -> bool {
        let mut current = Some(index);
        while let Some(i) = current {
            if &slots[i].person.id == id {
                return true;
            }
            current = slots[i].parent;
        }
        false
    }

    /// Children always sit at higher indices than their parent node
    fn assemble(slots: Vec<Slot>) -> Option<DescendancyNode> {
        let mut built: Vec<Option<DescendancyNode>> = Vec::with_capacity(slots.len());
        built.resize_with(slots.len(), || None);

        for (index, slot) in slots.into_iter().enumerate().rev() {
            let families = slot
                .families
                .into_iter()
                .map(|f| DescendancyFamily {
                    family_id: f.family_id,
                    spouse: f.spouse,
                    marriage_date: f.marriage_date,
                    marriage_place: f.marriage_place,
                    children: f
                        .children
                        .into_iter()
                        .filter_map(|i| built[i].take())
                        .collect(),
                })
                .collect();
            built[index] = Some(DescendancyNode {
                person: slot.person,
                generation: slot.generation,
                relation: slot.relation,
                families,
            });
        }
        built.into_iter().next().flatten()
    }
}
