//! Analysis stage seam

use async_trait::async_trait;
use autobench_analysis::{AnalysisResult, Extractor, SourceModelProvider};
use autobench_model::ProjectModel;
use std::path::Path;

/// Produces the project model of a solution
#[async_trait]
pub trait SolutionAnalyzer: Send + Sync {
    /// Load and extract every qualifying project
    async fn analyze(&self, solution: &Path) -> AnalysisResult<Vec<ProjectModel>>;
}

/// Analyzer over a source-model provider and the extractor
#[derive(Debug)]
pub struct SourceAnalyzer<P> {
    provider: P,
    extractor: Extractor,
}

impl<P: SourceModelProvider> SourceAnalyzer<P> {
    /// Create analyzer
    #[must_use]
    pub fn new(provider: P, extractor: Extractor) -> Self {
        Self { provider, extractor }
    }
}

#[async_trait]
impl<P: SourceModelProvider> SolutionAnalyzer for SourceAnalyzer<P> {
    async fn analyze(&self, solution: &Path) -> AnalysisResult<Vec<ProjectModel>> {
        let source = self.provider.load_solution(solution).await?;
        Ok(self.extractor.extract(&source))
    }
}
