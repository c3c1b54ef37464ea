//! Relationship resolution between two persons
//!
//! Each person's ancestors are collected into an [`AncestorMap`]. Ids present
//! in both maps are candidate common ancestors; candidates that another
//! candidate beats on both sides are dropped, and every survivor becomes one
//! named [`RelationshipPath`].

use crate::error::Result;
use crate::kinship::Kinship;
use crate::lookup::Lookup;
use crate::person::{Person, PersonId, PersonSummary};
use crate::reader::AncestryReader;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

/// Ancestor reached from the map's start person
#[derive(Debug, Clone)]
pub struct AncestorInfo {
    pub person: Person,
    /// Parent-link hops from the start person
    pub generation: u32,
    /// The child through which this ancestor was first reached
    pub via: Option<PersonId>,
}

/// Every ancestor reachable from one person, including that person at
/// generation 0.
///
/// Entries keep only a pointer to the child they were reached through; the
/// full path is rebuilt on demand.
#[derive(Debug, Clone)]
pub struct AncestorMap {
    start: PersonId,
    entries: HashMap<PersonId, AncestorInfo>,
}

impl AncestorMap {
    /// Breadth-first walk over parent links, at most `max_generations` hops.
    ///
    /// Breadth-first order means the first route to reach an ancestor is a
    /// shortest one; later, longer routes are ignored.
    pub async fn build<R: AncestryReader + ?Sized>(
        lookup: &Lookup<'_, R>,
        start: &Person,
        max_generations: u32,
    ) -> Result<Self> {
        let mut entries: HashMap<PersonId, AncestorInfo> = HashMap::new();
        let mut queue: VecDeque<(PersonId, u32)> = VecDeque::new();

        entries.insert(
            start.id.clone(),
            AncestorInfo {
                person: start.clone(),
                generation: 0,
                via: None,
            },
        );
        queue.push_back((start.id.clone(), 0));

        while let Some((current, generation)) = queue.pop_front() {
            if generation >= max_generations {
                continue;
            }
            let Some(link) = lookup.parent_link(&current).await? else {
                continue;
            };

            for parent_id in link.parent_ids() {
                let next_generation = generation + 1;
                match entries.get(parent_id) {
                    Some(existing) if existing.generation <= next_generation => continue,
                    _ => {}
                }
                let Some(person) = lookup.person(parent_id).await? else {
                    continue;
                };
                entries.insert(
                    parent_id.clone(),
                    AncestorInfo {
                        person,
                        generation: next_generation,
                        via: Some(current.clone()),
                    },
                );
                queue.push_back((parent_id.clone(), next_generation));
            }
        }

        tracing::debug!(
            "Ancestor map of {} holds {} persons",
            start.id,
            entries.len()
        );

        Ok(Self {
            start: start.id.clone(),
            entries,
        })
    }

    pub fn start(&self) -> &PersonId {
        &self.start
    }

    pub fn get(&self, id: &PersonId) -> Option<&AncestorInfo> {
        self.entries.get(id)
    }

    /// Number of entries, the start person included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PersonId, &AncestorInfo)> {
        self.entries.iter()
    }

    /// Ids from the start person up to `ancestor`, both inclusive
    pub fn path_to(&self, ancestor: &PersonId) -> Vec<PersonId> {
        let mut path = Vec::new();
        let mut current = Some(ancestor.clone());

        while let Some(id) = current {
            // Bounded: via pointers form a tree rooted at the start person
            if path.len() > self.entries.len() {
                break;
            }
            current = self.entries.get(&id).and_then(|info| info.via.clone());
            path.push(id);
        }

        path.reverse();
        path
    }
}

/// One route connecting two persons through a common ancestor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationshipPath {
    pub common_ancestor: PersonSummary,
    /// Ids from person A up to the common ancestor
    pub path_from_a: Vec<PersonId>,
    /// Ids from person B up to the common ancestor
    pub path_from_b: Vec<PersonId>,
    pub generations_a: u32,
    pub generations_b: u32,
    pub kinship: Kinship,
    /// What B is to A, e.g. "1st cousin once removed"
    pub name: String,
}

/// Result of a relationship query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationshipResult {
    pub person_a: PersonSummary,
    pub person_b: PersonSummary,
    pub paths: Vec<RelationshipPath>,
    pub is_related: bool,
    pub summary: String,
}

#[derive(Debug, Clone, Copy)]
struct Candidate<'m> {
    id: &'m PersonId,
    gen_a: u32,
    gen_b: u32,
}

/// Finds how two persons are related
pub struct RelationshipResolver;

impl RelationshipResolver {
    pub async fn resolve<R: AncestryReader + ?Sized>(
        lookup: &Lookup<'_, R>,
        person_a: &PersonId,
        person_b: &PersonId,
        max_generations: u32,
    ) -> Result<RelationshipResult> {
        tracing::debug!("Resolving relationship: a={}, b={}", person_a, person_b);

        let a = lookup.subject(person_a).await?;
        let b = lookup.subject(person_b).await?;

        if a.id == b.id {
            let summary = PersonSummary::from(&a);
            let path = RelationshipPath {
                common_ancestor: summary.clone(),
                path_from_a: vec![a.id.clone()],
                path_from_b: vec![b.id.clone()],
                generations_a: 0,
                generations_b: 0,
                kinship: Kinship::SelfPerson,
                name: Kinship::SelfPerson.to_string(),
            };
            return Ok(Self::finish(summary.clone(), summary, vec![path]));
        }

        let map_a = AncestorMap::build(lookup, &a, max_generations).await?;
        let map_b = AncestorMap::build(lookup, &b, max_generations).await?;

        let candidates = Self::common_ancestors(&map_a, &map_b);
        let mut lowest = Self::lowest(&candidates);
        lowest.sort_by(|x, y| {
            (x.gen_a + x.gen_b, x.gen_a, x.id).cmp(&(y.gen_a + y.gen_b, y.gen_a, y.id))
        });

        tracing::debug!(
            "{} common ancestors of {} and {}, {} lowest",
            candidates.len(),
            a.id,
            b.id,
            lowest.len()
        );

        let paths: Vec<RelationshipPath> = lowest
            .iter()
            .filter_map(|c| {
                let info = map_a.get(c.id)?;
                let kinship = Kinship::classify(c.gen_a, c.gen_b);
                Some(RelationshipPath {
                    common_ancestor: PersonSummary::from(&info.person),
                    path_from_a: map_a.path_to(c.id),
                    path_from_b: map_b.path_to(c.id),
                    generations_a: c.gen_a,
                    generations_b: c.gen_b,
                    name: kinship.to_string(),
                    kinship,
                })
            })
            .collect();

        Ok(Self::finish(
            PersonSummary::from(a),
            PersonSummary::from(b),
            paths,
        ))
    }

    /// Ids present in both maps. A start person found in the other map is a
    /// direct-line candidate with distance 0 on its own side.
    fn common_ancestors<'m>(
        map_a: &'m AncestorMap,
        map_b: &'m AncestorMap,
    ) -> Vec<Candidate<'m>> {
        map_a
            .iter()
            .filter_map(|(id, info_a)| {
                map_b.get(id).map(|info_b| Candidate {
                    id,
                    gen_a: info_a.generation,
                    gen_b: info_b.generation,
                })
            })
            .collect()
    }

    /// Drop every candidate some other candidate is strictly closer than on
    /// both sides. Ties and one-sided advantages are kept.
    fn lowest<'m>(candidates: &[Candidate<'m>]) -> Vec<Candidate<'m>> {
        candidates
            .iter()
            .filter(|c| {
                !candidates
                    .iter()
                    .any(|o| o.gen_a < c.gen_a && o.gen_b < c.gen_b)
            })
            .copied()
            .collect()
    }

    fn finish(
        person_a: PersonSummary,
        person_b: PersonSummary,
        paths: Vec<RelationshipPath>,
    ) -> RelationshipResult {
        let summary = summarize(&paths);
        RelationshipResult {
            person_a,
            person_b,
            is_related: !paths.is_empty(),
            paths,
            summary,
        }
    }
}

/// One-line summary of a set of paths.
///
/// Names are grouped in order of first appearance; a name shared by several
/// paths reads "<name> (via N paths)". Groups are joined with "; ".
pub fn summarize(paths: &[RelationshipPath]) -> String {
    if paths.is_empty() {
        return "not related".to_string();
    }

    let mut groups: Vec<(&str, usize)> = Vec::new();
    for path in paths {
        match groups.iter_mut().find(|(name, _)| *name == path.name) {
            Some((_, count)) => *count += 1,
            None => groups.push((path.name.as_str(), 1)),
        }
    }

    groups
        .into_iter()
        .map(|(name, count)| match count {
            1 => name.to_string(),
            n => format!("{} (via {} paths)", name, n),
        })
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::TestTree;
    use crate::limits::MAX_RELATIONSHIP_GENERATIONS;

    async fn relate(tree: &TestTree, a: &str, b: &str) -> Result<RelationshipResult> {
        let lookup = Lookup::new(tree, None);
        RelationshipResolver::resolve(
            &lookup,
            &PersonId::from(a),
            &PersonId::from(b),
            MAX_RELATIONSHIP_GENERATIONS,
        )
        .await
    }

    fn ids(path: &[PersonId]) -> Vec<&str> {
        path.iter().map(|p| p.as_str()).collect()
    }

    /// gp has two sons, each with one child
    fn cousins() -> TestTree {
        TestTree::new()
            .male("gp")
            .male("son1")
            .male("son2")
            .female("c1")
            .male("c2")
            .male("c2_child")
            .parents("son1", Some("gp"), None)
            .parents("son2", Some("gp"), None)
            .parents("c1", Some("son1"), None)
            .parents("c2", Some("son2"), None)
            .parents("c2_child", Some("c2"), None)
    }

    #[tokio::test]
    async fn test_ancestor_map_paths() {
        let tree = cousins();
        let lookup = Lookup::new(&tree, None);
        let c1 = lookup.subject(&"c1".into()).await.unwrap();
        let map = AncestorMap::build(&lookup, &c1, 15).await.unwrap();

        assert_eq!(map.len(), 3);
        assert_eq!(map.get(&"gp".into()).unwrap().generation, 2);
        assert_eq!(ids(&map.path_to(&"gp".into())), vec!["c1", "son1", "gp"]);
        assert_eq!(ids(&map.path_to(map.start())), vec!["c1"]);
    }

    #[tokio::test]
    async fn test_shorter_route_wins() {
        // "x" is both a parent and a great-grandparent of "me"
        let tree = TestTree::new()
            .male("me")
            .male("x")
            .female("mum")
            .female("gm")
            .parents("me", Some("x"), Some("mum"))
            .parents("mum", None, Some("gm"))
            .parents("gm", Some("x"), None);

        let lookup = Lookup::new(&tree, None);
        let me = lookup.subject(&"me".into()).await.unwrap();
        let map = AncestorMap::build(&lookup, &me, 15).await.unwrap();

        assert_eq!(map.get(&"x".into()).unwrap().generation, 1);
        assert_eq!(ids(&map.path_to(&"x".into())), vec!["me", "x"]);
    }

    #[tokio::test]
    async fn test_first_cousins() {
        let result = relate(&cousins(), "c1", "c2").await.unwrap();

        assert!(result.is_related);
        assert_eq!(result.paths.len(), 1);
        let path = &result.paths[0];
        assert_eq!(path.name, "1st cousin");
        assert_eq!((path.generations_a, path.generations_b), (2, 2));
        assert_eq!(path.common_ancestor.id, PersonId::from("gp"));
        assert_eq!(ids(&path.path_from_a), vec!["c1", "son1", "gp"]);
        assert_eq!(ids(&path.path_from_b), vec!["c2", "son2", "gp"]);
        assert_eq!(result.summary, "1st cousin");
    }

    #[tokio::test]
    async fn test_cousin_once_removed_both_ways() {
        let tree = cousins();

        let down = relate(&tree, "c1", "c2_child").await.unwrap();
        assert_eq!(down.summary, "1st cousin once removed");
        assert_eq!(
            (down.paths[0].generations_a, down.paths[0].generations_b),
            (2, 3)
        );

        let up = relate(&tree, "c2_child", "c1").await.unwrap();
        assert_eq!(up.summary, "1st cousin once removed");
    }

    #[tokio::test]
    async fn test_uncle_and_nephew() {
        let tree = cousins();

        let uncle = relate(&tree, "c1", "son2").await.unwrap();
        assert_eq!(uncle.summary, "uncle/aunt");

        let nephew = relate(&tree, "son2", "c1").await.unwrap();
        assert_eq!(nephew.summary, "nephew/niece");
    }

    #[tokio::test]
    async fn test_direct_line_symmetry() {
        let tree = cousins();

        let up = relate(&tree, "c1", "son1").await.unwrap();
        assert_eq!(up.paths.len(), 1);
        assert_eq!(up.paths[0].name, "parent");
        assert_eq!((up.paths[0].generations_a, up.paths[0].generations_b), (1, 0));
        assert_eq!(up.paths[0].common_ancestor.id, PersonId::from("son1"));

        let down = relate(&tree, "son1", "c1").await.unwrap();
        assert_eq!(down.paths.len(), 1);
        assert_eq!(down.paths[0].name, "child");
        assert_eq!(
            (down.paths[0].generations_a, down.paths[0].generations_b),
            (0, 1)
        );

        let far = relate(&tree, "c2_child", "gp").await.unwrap();
        assert_eq!(far.summary, "great-grandparent");
    }

    #[tokio::test]
    async fn test_full_siblings_have_two_paths() {
        let tree = TestTree::new()
            .male("dad")
            .female("mum")
            .male("gpa")
            .male("s1")
            .female("s2")
            .parents("s1", Some("dad"), Some("mum"))
            .parents("s2", Some("dad"), Some("mum"))
            .parents("dad", Some("gpa"), None);

        let result = relate(&tree, "s1", "s2").await.unwrap();

        assert_eq!(result.paths.len(), 2);
        assert!(result.paths.iter().all(|p| p.name == "sibling"));
        let ancestors: Vec<_> = result
            .paths
            .iter()
            .map(|p| p.common_ancestor.id.as_str())
            .collect();
        assert_eq!(ancestors, vec!["dad", "mum"]);
        assert_eq!(result.summary, "sibling (via 2 paths)");
    }

    #[tokio::test]
    async fn test_cross_dominance_keeps_both_ancestors() {
        // x is closer on A's side (1, 3); y is closer on B's side (2, 2)
        let tree = TestTree::new()
            .male("a")
            .male("b")
            .male("x")
            .male("y")
            .female("m")
            .male("p")
            .female("q")
            .female("r")
            .parents("a", Some("x"), Some("m"))
            .parents("m", Some("y"), None)
            .parents("b", Some("p"), Some("q"))
            .parents("p", Some("y"), None)
            .parents("q", None, Some("r"))
            .parents("r", Some("x"), None);

        let result = relate(&tree, "a", "b").await.unwrap();

        assert_eq!(result.paths.len(), 2);
        assert_eq!(result.paths[0].common_ancestor.id, PersonId::from("x"));
        assert_eq!(result.paths[0].name, "grand-nephew/niece");
        assert_eq!(result.paths[1].common_ancestor.id, PersonId::from("y"));
        assert_eq!(result.paths[1].name, "1st cousin");
        assert_eq!(result.summary, "grand-nephew/niece; 1st cousin");
    }

    #[tokio::test]
    async fn test_identity() {
        let result = relate(&cousins(), "c1", "c1").await.unwrap();

        assert!(result.is_related);
        assert_eq!(result.paths.len(), 1);
        assert_eq!(result.paths[0].name, "self");
        assert_eq!(result.paths[0].kinship, Kinship::SelfPerson);
        assert_eq!(result.summary, "self");
    }

    #[tokio::test]
    async fn test_unrelated() {
        let tree = cousins().male("stranger");
        let result = relate(&tree, "c1", "stranger").await.unwrap();

        assert!(!result.is_related);
        assert!(result.paths.is_empty());
        assert_eq!(result.summary, "not related");
    }

    #[tokio::test]
    async fn test_missing_person() {
        let tree = cousins();
        assert!(relate(&tree, "c1", "ghost").await.unwrap_err().is_not_found());
        assert!(relate(&tree, "ghost", "c1").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_cycle_terminates() {
        let tree = TestTree::new()
            .male("a")
            .male("b")
            .male("c")
            .parents("a", Some("b"), None)
            .parents("b", Some("a"), None)
            .parents("c", Some("b"), None);

        let ab = relate(&tree, "a", "b").await.unwrap();
        // Each is the other's parent in cyclic data; both routes survive
        let mut names: Vec<_> = ab.paths.iter().map(|p| p.name.as_str()).collect();
        names.sort();
        assert_eq!(names, vec!["child", "parent"]);

        let ac = relate(&tree, "a", "c").await.unwrap();
        assert!(ac.is_related);
    }

    #[test]
    fn test_summarize_mixed_names() {
        let person = PersonSummary::from(&Person::with_id(
            "p",
            "P",
            "",
            crate::person::Gender::Unknown,
        ));
        let path = |name: &str| RelationshipPath {
            common_ancestor: person.clone(),
            path_from_a: vec![],
            path_from_b: vec![],
            generations_a: 1,
            generations_b: 1,
            kinship: Kinship::Sibling,
            name: name.to_string(),
        };

        assert_eq!(summarize(&[]), "not related");
        assert_eq!(summarize(&[path("sibling")]), "sibling");
        assert_eq!(
            summarize(&[path("sibling"), path("1st cousin"), path("sibling")]),
            "sibling (via 2 paths); 1st cousin"
        );
    }
}
