//! Pedigree (ancestor tree) construction

use crate::error::{Error, Result};
use crate::lookup::Lookup;
use crate::person::{PersonId, PersonSummary};
use crate::reader::AncestryReader;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One person in a pedigree, with their parents' subtrees
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PedigreeNode {
    pub person: PersonSummary,

    /// Hops from the pedigree's subject (0 for the subject)
    pub generation: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub father: Option<Box<PedigreeNode>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mother: Option<Box<PedigreeNode>>,
}

impl PedigreeNode {
    /// Number of ancestors below this node (the node itself excluded)
    pub fn count_ancestors(&self) -> usize {
        let mut count = 0;
        let mut stack: Vec<&PedigreeNode> = vec![self];
        while let Some(node) = stack.pop() {
            for parent in [&node.father, &node.mother].into_iter().flatten() {
                count += 1;
                stack.push(parent);
            }
        }
        count
    }

    /// Deepest generation found below (or at) this node
    pub fn deepest_generation(&self) -> u32 {
        let mut deepest = self.generation;
        let mut stack: Vec<&PedigreeNode> = vec![self];
        while let Some(node) = stack.pop() {
            deepest = deepest.max(node.generation);
            stack.extend([&node.father, &node.mother].into_iter().flatten().map(|b| &**b));
        }
        deepest
    }
}

/// Result of a pedigree query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PedigreeResult {
    pub root: PedigreeNode,
    pub total_ancestors: usize,
    pub max_generation_reached: u32,
    pub generations_requested: u32,
}

#[derive(Clone, Copy)]
enum Side {
    Father,
    Mother,
}

/// Node under construction; parents point at later arena slots
struct Slot {
    person: PersonSummary,
    generation: u32,
    father: Option<usize>,
    mother: Option<usize>,
}

/// Pending visit on the work stack
struct Visit {
    person_id: PersonId,
    generation: u32,
    child_slot: usize,
    side: Side,
}

/// Builds bounded ancestor trees
pub struct PedigreeBuilder;

impl PedigreeBuilder {
    /// Build the pedigree of `person_id`, walking at most `max_generations`
    /// parent hops.
    ///
    /// Depth-first, father before mother. A person reached a second time
    /// (pedigree collapse or cyclic data) is left out, so cycles terminate.
    pub async fn build<R: AncestryReader + ?Sized>(
        lookup: &Lookup<'_, R>,
        person_id: &PersonId,
        max_generations: u32,
    ) -> Result<PedigreeResult> {
        tracing::debug!(
            "Building pedigree: person={}, generations={}",
            person_id,
            max_generations
        );

        let subject = lookup.subject(person_id).await?;
        let mut visited: HashSet<PersonId> = HashSet::new();
        visited.insert(subject.id.clone());

        let mut slots = vec![Slot {
            person: PersonSummary::from(subject),
            generation: 0,
            father: None,
            mother: None,
        }];
        let mut stack: Vec<Visit> = Vec::new();
        Self::push_parents(lookup, &mut stack, person_id, 0, 0, max_generations).await?;

        while let Some(visit) = stack.pop() {
            if visited.contains(&visit.person_id) {
                tracing::debug!("Pedigree cut at repeated person {}", visit.person_id);
                continue;
            }
            let Some(person) = lookup.person(&visit.person_id).await? else {
                continue;
            };
            visited.insert(visit.person_id.clone());

            let index = slots.len();
            slots.push(Slot {
                person: PersonSummary::from(person),
                generation: visit.generation,
                father: None,
                mother: None,
            });
            match visit.side {
                Side::Father => slots[visit.child_slot].father = Some(index),
                Side::Mother => slots[visit.child_slot].mother = Some(index),
            }

            Self::push_parents(
                lookup,
                &mut stack,
                &visit.person_id,
                visit.generation,
                index,
                max_generations,
            )
            .await?;
        }

        let root = Self::assemble(slots)
            .ok_or_else(|| Error::Internal("pedigree arena lost its subject".to_string()))?;
        let total_ancestors = root.count_ancestors();
        let max_generation_reached = root.deepest_generation();

        tracing::debug!(
            "Pedigree of {} has {} ancestors over {} generations",
            person_id,
            total_ancestors,
            max_generation_reached
        );

        Ok(PedigreeResult {
            root,
            total_ancestors,
            max_generation_reached,
            generations_requested: max_generations,
        })
    }

    async fn push_parents<R: AncestryReader + ?Sized>(
        lookup: &Lookup<'_, R>,
        stack: &mut Vec<Visit>,
        person_id: &PersonId,
        generation: u32,
        slot: usize,
        max_generations: u32,
    ) -> Result<()> {
        if generation >= max_generations {
            return Ok(());
        }
        let Some(link) = lookup.parent_link(person_id).await? else {
            return Ok(());
        };

        // Mother first so the father's line is popped and walked first
        let parents = [(link.mother_id, Side::Mother), (link.father_id, Side::Father)];
        for (parent_id, side) in parents {
            if let Some(parent_id) = parent_id {
                stack.push(Visit {
                    person_id: parent_id,
                    generation: generation + 1,
                    child_slot: slot,
                    side,
                });
            }
        }
        Ok(())
    }

    /// Fold the arena into a nested tree. Parents always sit at higher
    /// indices than their child, so a reverse sweep sees them first.
    fn assemble(slots: Vec<Slot>) -> Option<PedigreeNode> {
        let mut built: Vec<Option<PedigreeNode>> = Vec::with_capacity(slots.len());
        built.resize_with(slots.len(), || None);

        for (index, slot) in slots.into_iter().enumerate().rev() {
            let node = PedigreeNode {
                person: slot.person,
                generation: slot.generation,
                father: slot.father.and_then(|i| built[i].take()).map(Box::new),
                mother: slot.mother.and_then(|i| built[i].take()).map(Box::new),
            };
            built[index] = Some(node);
        }
        built.into_iter().next().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::TestTree;

    async fn pedigree(tree: &TestTree, id: &str, generations: u32) -> Result<PedigreeResult> {
        let lookup = Lookup::new(tree, None);
        PedigreeBuilder::build(&lookup, &PersonId::from(id), generations).await
    }

    #[tokio::test]
    async fn test_three_generation_chain() {
        let tree = TestTree::new()
            .male("child")
            .male("father")
            .male("grandfather")
            .parents("child", Some("father"), None)
            .parents("father", Some("grandfather"), None);

        let result = pedigree(&tree, "child", 5).await.unwrap();

        assert_eq!(result.total_ancestors, 2);
        assert_eq!(result.max_generation_reached, 2);
        let father = result.root.father.as_ref().unwrap();
        assert_eq!(father.person.id, PersonId::from("father"));
        assert_eq!(father.generation, 1);
        assert_eq!(
            father.father.as_ref().unwrap().person.id,
            PersonId::from("grandfather")
        );
        assert!(result.root.mother.is_none());
        assert_eq!(result.root.count_ancestors(), 2);
        assert_eq!(result.root.deepest_generation(), 2);
    }

    #[tokio::test]
    async fn test_no_parent_links() {
        let tree = TestTree::new().female("alone");

        let result = pedigree(&tree, "alone", 5).await.unwrap();

        assert_eq!(result.total_ancestors, 0);
        assert_eq!(result.max_generation_reached, 0);
        assert!(result.root.father.is_none());
        assert!(result.root.mother.is_none());
    }

    #[tokio::test]
    async fn test_missing_subject() {
        let tree = TestTree::new();
        let err = pedigree(&tree, "ghost", 5).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_two_cycle_terminates() {
        let tree = TestTree::new()
            .male("a")
            .male("b")
            .parents("a", Some("b"), None)
            .parents("b", Some("a"), None);

        let result = pedigree(&tree, "a", 10).await.unwrap();

        assert_eq!(result.total_ancestors, 1);
        let b = result.root.father.as_ref().unwrap();
        assert_eq!(b.person.id, PersonId::from("b"));
        assert!(b.father.is_none());
        assert!(b.mother.is_none());
    }

    #[tokio::test]
    async fn test_generation_limit() {
        let tree = TestTree::new()
            .male("g0")
            .male("g1")
            .male("g2")
            .male("g3")
            .parents("g0", Some("g1"), None)
            .parents("g1", Some("g2"), None)
            .parents("g2", Some("g3"), None);

        let result = pedigree(&tree, "g0", 2).await.unwrap();

        assert_eq!(result.total_ancestors, 2);
        assert_eq!(result.max_generation_reached, 2);
        assert_eq!(result.generations_requested, 2);
    }

    #[tokio::test]
    async fn test_gaps_and_unknown_records() {
        // Mother's id is recorded but no person exists for it
        let tree = TestTree::new()
            .female("child")
            .male("dad")
            .female("grandma")
            .parents("child", Some("dad"), Some("missing"))
            .parents("dad", None, Some("grandma"));

        let result = pedigree(&tree, "child", 5).await.unwrap();

        assert_eq!(result.total_ancestors, 2);
        assert!(result.root.mother.is_none());
        let dad = result.root.father.as_ref().unwrap();
        assert!(dad.father.is_none());
        assert_eq!(
            dad.mother.as_ref().unwrap().person.id,
            PersonId::from("grandma")
        );
    }

    #[tokio::test]
    async fn test_pedigree_collapse_keeps_first_occurrence() {
        // Parents are first cousins sharing grandfather "gp"
        let tree = TestTree::new()
            .male("child")
            .male("dad")
            .female("mum")
            .male("gp")
            .male("dads_father")
            .female("mums_mother")
            .parents("child", Some("dad"), Some("mum"))
            .parents("dad", Some("dads_father"), None)
            .parents("mum", None, Some("mums_mother"))
            .parents("dads_father", Some("gp"), None)
            .parents("mums_mother", Some("gp"), None);

        let result = pedigree(&tree, "child", 5).await.unwrap();

        // gp appears once, under the father's line walked first
        assert_eq!(result.total_ancestors, 5);
        let dads_father = result.root.father.as_ref().unwrap().father.as_ref().unwrap();
        assert!(dads_father.father.is_some());
        let mums_mother = result.root.mother.as_ref().unwrap().mother.as_ref().unwrap();
        assert!(mums_mother.father.is_none());
    }

    #[tokio::test]
    async fn test_failed_link_lookup_degrades() {
        let tree = TestTree::new()
            .male("child")
            .male("dad")
            .parents("child", Some("dad"), None)
            .break_link("dad");

        let result = pedigree(&tree, "child", 5).await.unwrap();
        assert_eq!(result.total_ancestors, 1);
    }
}
