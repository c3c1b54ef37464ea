//! Query facade over the ancestry graph builders

use crate::ahnentafel::{AhnentafelNumberer, AhnentafelResult};
use crate::descendancy::{DescendancyBuilder, DescendancyResult};
use crate::error::Result;
use crate::limits::{
    clamp_generations, DEFAULT_AHNENTAFEL_GENERATIONS, DEFAULT_DESCENDANCY_GENERATIONS,
    DEFAULT_PEDIGREE_GENERATIONS, MAX_RELATIONSHIP_GENERATIONS,
};
use crate::lookup::Lookup;
use crate::pedigree::{PedigreeBuilder, PedigreeResult};
use crate::person::PersonId;
use crate::reader::AncestryReader;
use crate::relationship::{RelationshipResolver, RelationshipResult};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Read-only genealogy queries over an [`AncestryReader`].
///
/// Every call allocates its own traversal state, so one engine can serve
/// concurrent queries. Generation counts are clamped, never rejected.
pub struct GenealogyEngine<R: AncestryReader + ?Sized> {
    reader: Arc<R>,
    cancel: Option<CancellationToken>,
}

impl<R: AncestryReader + ?Sized> Clone for GenealogyEngine<R> {
    fn clone(&self) -> Self {
        Self {
            reader: Arc::clone(&self.reader),
            cancel: self.cancel.clone(),
        }
    }
}

impl<R: AncestryReader + ?Sized> GenealogyEngine<R> {
    pub fn new(reader: Arc<R>) -> Self {
        Self {
            reader,
            cancel: None,
        }
    }

    /// Stop queries at their next lookup once `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    fn lookup(&self) -> Lookup<'_, R> {
        Lookup::new(self.reader.as_ref(), self.cancel.as_ref())
    }

    /// Ancestor tree; defaults to 5 generations, capped at 10
    pub async fn pedigree(
        &self,
        person_id: &PersonId,
        max_generations: i32,
    ) -> Result<PedigreeResult> {
        let generations = clamp_generations(max_generations, DEFAULT_PEDIGREE_GENERATIONS);
        PedigreeBuilder::build(&self.lookup(), person_id, generations).await
    }

    /// Descendant tree; defaults to 4 generations, capped at 10
    pub async fn descendancy(
        &self,
        person_id: &PersonId,
        max_generations: i32,
    ) -> Result<DescendancyResult> {
        let generations = clamp_generations(max_generations, DEFAULT_DESCENDANCY_GENERATIONS);
        DescendancyBuilder::build(&self.lookup(), person_id, generations).await
    }

    /// Ahnentafel list; defaults to 5 generations, capped at 10
    pub async fn ahnentafel(
        &self,
        person_id: &PersonId,
        max_generations: i32,
    ) -> Result<AhnentafelResult> {
        let generations = clamp_generations(max_generations, DEFAULT_AHNENTAFEL_GENERATIONS);
        AhnentafelNumberer::number(&self.lookup(), person_id, generations).await
    }

    /// How `person_b` is related to `person_a`
    pub async fn relationship(
        &self,
        person_a: &PersonId,
        person_b: &PersonId,
    ) -> Result<RelationshipResult> {
        RelationshipResolver::resolve(
            &self.lookup(),
            person_a,
            person_b,
            MAX_RELATIONSHIP_GENERATIONS,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::fixtures::TestTree;

    /// Straight paternal line of twelve hops: p0 <- p1 <- ... <- p12
    fn long_line() -> Arc<TestTree> {
        let mut tree = TestTree::new();
        for i in 0..=12 {
            tree = tree.male(&format!("p{}", i));
        }
        for i in 0..12 {
            let father = format!("p{}", i + 1);
            tree = tree.parents(&format!("p{}", i), Some(father.as_str()), None);
        }
        Arc::new(tree)
    }

    #[tokio::test]
    async fn test_generation_defaults_and_caps() {
        let engine = GenealogyEngine::new(long_line());
        let root = PersonId::from("p0");

        let default = engine.pedigree(&root, 0).await.unwrap();
        assert_eq!(default.generations_requested, 5);
        assert_eq!(default.total_ancestors, 5);

        let negative = engine.pedigree(&root, -7).await.unwrap();
        assert_eq!(negative.total_ancestors, 5);

        let capped = engine.pedigree(&root, 50).await.unwrap();
        assert_eq!(capped.generations_requested, 10);
        assert_eq!(capped.max_generation_reached, 10);

        let numbered = engine.ahnentafel(&root, 0).await.unwrap();
        assert_eq!(numbered.max_generation, 5);
        assert_eq!(numbered.numbers(), vec![1, 2, 4, 8, 16, 32]);

        let capped = engine.ahnentafel(&root, 99).await.unwrap();
        assert_eq!(capped.max_generation, 10);
    }

    #[tokio::test]
    async fn test_descendancy_default() {
        let mut tree = TestTree::new();
        for i in 0..=6 {
            tree = tree.male(&format!("d{}", i));
        }
        for i in 0..6 {
            let parent = format!("d{}", i);
            let child = format!("d{}", i + 1);
            tree = tree.family(&format!("F{}", i), Some(parent.as_str()), None, &[child.as_str()]);
        }
        let engine = GenealogyEngine::new(Arc::new(tree));

        let result = engine.descendancy(&"d0".into(), 0).await.unwrap();
        assert_eq!(result.generations_requested, 4);
        assert_eq!(result.total_descendants, 4);
    }

    #[tokio::test]
    async fn test_relationship_beyond_tree_cap() {
        // Fourteen generations apart is still found by the ancestor maps
        let mut tree = TestTree::new();
        for i in 0..=14 {
            tree = tree.male(&format!("q{}", i));
        }
        for i in 0..14 {
            let father = format!("q{}", i + 1);
            tree = tree.parents(&format!("q{}", i), Some(father.as_str()), None);
        }
        let engine = GenealogyEngine::new(Arc::new(tree));

        let result = engine
            .relationship(&"q0".into(), &"q14".into())
            .await
            .unwrap();
        assert_eq!(result.summary, "12th great-grandparent");
    }

    #[tokio::test]
    async fn test_cancelled_query() {
        let token = CancellationToken::new();
        let engine = GenealogyEngine::new(long_line()).with_cancellation(token.clone());
        token.cancel();

        let err = engine.pedigree(&"p0".into(), 5).await.unwrap_err();
        assert!(matches!(err, Error::Cancelled));
    }

    #[tokio::test]
    async fn test_concurrent_queries() {
        let engine = GenealogyEngine::new(long_line());

        let mut handles = Vec::new();
        for _ in 0..4 {
            let engine = engine.clone();
            handles.push(tokio::spawn(async move {
                engine.ahnentafel(&"p0".into(), 10).await.map(|r| r.total_entries)
            }));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), 11);
        }
    }
}
