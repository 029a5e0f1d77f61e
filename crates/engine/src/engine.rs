use crate::config::IntelConfig;
use crate::error::Result;
use codeintel_extract::{
    compute_complexity, extract_file_exports, read_source, ComplexityReport, ErrorTag,
    ExportReport, FsReader, RepoMap, RepoMapper, SignatureCache, SignatureReport, SourceFile,
    SourceReader,
};
use codeintel_graph::{
    find_cycles, impact_many, top_dependents, transitive_dependents, CycleReport, DependencyGraph,
    FanIn, GraphDigest, GraphHandle, ImpactReport,
};
use codeintel_planner::{
    route_task_with, select_execution_mode, ExecutionModeDecision, PlanClassification,
    RouteDecision, Task, TaskClassifier, TaskComplexityScore,
};
use std::path::PathBuf;
use std::sync::Arc;

/// One project's view of the pipeline.
///
/// Owns the source reader, the signature cache and the current dependency
/// graph. All methods take `&self`; the graph is swapped atomically on
/// rebuild and every query works on a snapshot.
pub struct Engine {
    config: IntelConfig,
    reader: Box<dyn SourceReader + Send>,
    cache: SignatureCache,
    graph: GraphHandle,
    classifier: TaskClassifier,
}

impl Engine {
    pub fn new(config: IntelConfig, reader: Box<dyn SourceReader + Send>) -> Result<Self> {
        let config = config.validated()?;
        let classifier = TaskClassifier::new(config.classifier.clone())?;
        Ok(Self {
            cache: SignatureCache::new(config.extract.cache_capacity),
            graph: GraphHandle::default(),
            classifier,
            reader,
            config,
        })
    }

    /// Engine reading files below `root`
    pub fn open(root: impl Into<PathBuf>, config: IntelConfig) -> Result<Self> {
        let root = root.into();
        log::info!("Opening project at {}", root.display());
        Self::new(config, Box::new(FsReader::new(root)))
    }

    pub fn config(&self) -> &IntelConfig {
        &self.config
    }

    pub fn cache(&self) -> &SignatureCache {
        &self.cache
    }

    /// Signatures and export surface of one file, served from the cache
    /// when its content is unchanged
    pub fn signatures(&self, file: &SourceFile) -> Arc<SignatureReport> {
        match read_source(self.reader.as_ref(), &file.path) {
            Ok(content) => self.cache.get_or_extract(&file.path, file.language, &content),
            Err(e) => Arc::new(SignatureReport::failed(
                file.language,
                e.tag().unwrap_or(ErrorTag::FileNotFound),
            )),
        }
    }

    pub fn exports(&self, file: &SourceFile) -> ExportReport {
        extract_file_exports(self.reader.as_ref(), file)
    }

    pub fn complexity(&self, file: &SourceFile) -> ComplexityReport {
        match read_source(self.reader.as_ref(), &file.path) {
            Ok(content) => compute_complexity(&file.path, file.language, &content),
            Err(e) => ComplexityReport::failed(&file.path, e.tag().unwrap_or(ErrorTag::FileNotFound)),
        }
    }

    /// Repo map over `files`; `None` uses the configured default budget
    pub fn repo_map(&self, files: &[SourceFile], token_budget: Option<usize>) -> RepoMap {
        let budget = token_budget.unwrap_or(self.config.extract.default_token_budget);
        RepoMapper::new(&self.config.extract)
            .with_cache(&self.cache)
            .generate(files, self.reader.as_ref(), budget)
    }

    /// Rebuild the dependency graph over `files` and make it current
    pub fn build_graph(&self, files: &[SourceFile]) -> Arc<DependencyGraph> {
        self.graph.rebuild(files, self.reader.as_ref())
    }

    /// Current graph snapshot (empty until [`Engine::build_graph`] runs)
    pub fn graph(&self) -> Arc<DependencyGraph> {
        self.graph.snapshot()
    }

    pub fn cycles(&self) -> CycleReport {
        find_cycles(&self.graph())
    }

    /// Dependents of `path`; `None` uses the configured depth cap
    pub fn impact(&self, path: &str, max_depth: Option<usize>) -> ImpactReport {
        let depth = max_depth.unwrap_or(self.config.graph.max_impact_depth);
        transitive_dependents(&self.graph(), path, depth)
    }

    pub fn impact_many(&self, paths: &[String], max_depth: Option<usize>) -> Vec<ImpactReport> {
        let depth = max_depth.unwrap_or(self.config.graph.max_impact_depth);
        impact_many(&self.graph(), paths, depth)
    }

    pub fn top_dependents(&self) -> Vec<FanIn> {
        top_dependents(&self.graph(), self.config.graph.top_dependents_limit)
    }

    pub fn digest(&self) -> GraphDigest {
        GraphDigest::from_graph(&self.graph(), self.config.graph.top_dependents_limit)
    }

    fn graph_for_classification(&self) -> Option<Arc<DependencyGraph>> {
        let graph = self.graph();
        (!graph.is_empty()).then_some(graph)
    }

    /// Score a task against the current graph, if one has been built
    pub fn classify_task(&self, task: &Task) -> TaskComplexityScore {
        let graph = self.graph_for_classification();
        self.classifier.classify(task, graph.as_deref())
    }

    /// Parse and classify one plan document
    pub fn classify_plan(&self, plan: &str, content: &str) -> PlanClassification {
        let graph = self.graph_for_classification();
        PlanClassification::from_plan(plan, content, &self.classifier, graph.as_deref())
    }

    pub fn execution_mode(&self, plans: &[PlanClassification]) -> ExecutionModeDecision {
        select_execution_mode(plans)
    }

    pub fn route(&self, score: &TaskComplexityScore, profile: Option<&str>) -> RouteDecision {
        route_task_with(&self.config.classifier, score, profile)
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("cache", &self.cache)
            .field("graph", &self.graph)
            .finish_non_exhaustive()
    }
}
