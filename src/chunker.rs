//! The chunking orchestrator: decides whether a task needs splitting,
//! runs the strategy pipeline, and assembles the final plan.

use crate::analyzer::ComplexityAnalyzer;
use crate::core::chunk::{ChunkContext, ChunkId, ChunkingResult, TaskChunk};
use crate::core::complexity::{ComplexityAnalysis, ComplexityLevel};
use crate::error::Result;
use crate::lexicon::{CompiledLexicon, Lexicon};
use crate::scheduler::calculate_execution_order;
use crate::splitter::TaskSplitter;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

pub const DEFAULT_COMPLEXITY_THRESHOLD: u8 = 50;
pub const DEFAULT_MAX_CHUNK_DURATION_MS: u64 = 30 * 60 * 1000;
pub const DEFAULT_MIN_CHUNKS: usize = 2;
pub const DEFAULT_MAX_CHUNKS: usize = 8;

/// Sentence fragments shorter than this are discarded as noise.
const MIN_SENTENCE_FRAGMENT_LEN: usize = 10;

/// Per-call tuning for [`TaskChunker::chunk_task`].
///
/// Out-of-range values are clamped by [`normalized`](Self::normalized),
/// never rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkerConfig {
    /// Score at or above which a task is chunked.
    pub complexity_threshold: u8,
    /// Estimated duration above which a task is chunked, and the unit
    /// size the sentence fallback aims for.
    pub max_chunk_duration_ms: u64,
    /// Fewest chunks a decomposition should produce.
    pub min_chunks: usize,
    /// Hard cap on produced chunks; excess subtasks are dropped.
    pub max_chunks: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            complexity_threshold: DEFAULT_COMPLEXITY_THRESHOLD,
            max_chunk_duration_ms: DEFAULT_MAX_CHUNK_DURATION_MS,
            min_chunks: DEFAULT_MIN_CHUNKS,
            max_chunks: DEFAULT_MAX_CHUNKS,
        }
    }
}

impl ChunkerConfig {
    /// Clamp the config into a usable shape: both chunk bounds at least
    /// one, `min_chunks` no greater than `max_chunks`, a nonzero
    /// duration limit.
    pub fn normalized(mut self) -> Self {
        self.max_chunks = self.max_chunks.max(1);
        self.min_chunks = self.min_chunks.clamp(1, self.max_chunks);
        self.max_chunk_duration_ms = self.max_chunk_duration_ms.max(1);
        self
    }
}

/// Turns a free-text task into chunks plus a parallel execution schedule.
/// Planning is synchronous and side-effect free; results are returned,
/// never stored.
#[derive(Debug, Clone)]
pub struct TaskChunker {
    lexicon: Arc<CompiledLexicon>,
    analyzer: ComplexityAnalyzer,
    splitter: TaskSplitter,
}

impl TaskChunker {
    /// Build a chunker over the built-in lexicon.
    pub fn new() -> Self {
        // The built-in tables are validated by the lexicon unit tests.
        let lexicon = Lexicon::default()
            .compile()
            .expect("built-in lexicon compiles");
        Self::from_compiled(Arc::new(lexicon))
    }

    /// Build a chunker over custom lexical tables.
    pub fn with_lexicon(lexicon: Lexicon) -> Result<Self> {
        Ok(Self::from_compiled(Arc::new(lexicon.compile()?)))
    }

    fn from_compiled(lexicon: Arc<CompiledLexicon>) -> Self {
        Self {
            analyzer: ComplexityAnalyzer::new(Arc::clone(&lexicon)),
            splitter: TaskSplitter::new(Arc::clone(&lexicon)),
            lexicon,
        }
    }

    /// The compiled lexicon in use.
    pub fn lexicon(&self) -> &CompiledLexicon {
        &self.lexicon
    }

    /// Analyze a task and, when warranted, decompose it into dependent
    /// chunks with an execution schedule. Total over arbitrary text.
    pub fn chunk_task(&self, task: &str, config: Option<ChunkerConfig>) -> ChunkingResult {
        let cfg = config.unwrap_or_default().normalized();
        let analysis = self.analyzer.analyze(task);
        let duration_ms = analysis.estimated_duration_ms();

        let over_score = analysis.score >= cfg.complexity_threshold;
        let over_duration = duration_ms > cfg.max_chunk_duration_ms;

        if !over_score && !over_duration {
            let reason = format!(
                "Complexity score {} below threshold {} and estimated duration within limits",
                analysis.score, cfg.complexity_threshold
            );
            return self.single_chunk_result(task, false, reason, analysis);
        }

        let subtasks = self.decompose(task, &cfg, duration_ms);
        if subtasks.is_empty() {
            // Only reachable for wordless text; the flag stays true
            // because the step-3 decision held, the pipeline just had
            // nothing to carve.
            let reason =
                "Task exceeds limits but yields no subtasks, executing whole".to_string();
            return self.single_chunk_result(task, true, reason, analysis);
        }

        // Dependencies come from the full subtask list; capping happens
        // afterwards and drops edges into the removed tail.
        let graph = self
            .splitter
            .build_dependency_graph(&subtasks, &analysis.factors);
        let kept = subtasks.len().min(cfg.max_chunks);

        let mut chunks = Vec::with_capacity(kept);
        for (i, description) in subtasks.into_iter().take(kept).enumerate() {
            let chunk_analysis = self.analyzer.analyze(&description);
            let dependencies = graph
                .get(&i)
                .into_iter()
                .flatten()
                .filter(|&&d| d < kept)
                .map(|&d| ChunkId::from_index(d))
                .collect();
            chunks.push(TaskChunk {
                id: ChunkId::from_index(i),
                index: i,
                estimated_complexity: chunk_analysis.level,
                estimated_duration_ms: chunk_analysis.estimated_duration_ms(),
                dependencies,
                context: ChunkContext {
                    file_references: self.analyzer.extract_file_references(&description),
                    original_task: task.to_string(),
                },
                description,
            });
        }

        let execution_order = calculate_execution_order(&chunks);
        let total_estimated_duration_ms =
            chunks.iter().map(|c| c.estimated_duration_ms).sum();

        let mut triggers = Vec::new();
        if over_score {
            triggers.push(format!(
                "complexity score {} at or above threshold {}",
                analysis.score, cfg.complexity_threshold
            ));
        }
        if over_duration {
            triggers.push(format!(
                "estimated duration {}ms exceeds {}ms",
                duration_ms, cfg.max_chunk_duration_ms
            ));
        }
        let reason = format!("Task requires chunking: {}", triggers.join("; "));

        debug!(
            chunks = chunks.len(),
            groups = execution_order.len(),
            "task chunked"
        );

        ChunkingResult {
            original_task: task.to_string(),
            requires_chunking: true,
            reason,
            chunks,
            execution_order,
            total_estimated_duration_ms,
            complexity: analysis,
        }
    }

    /// Estimated duration of the whole task in milliseconds.
    pub fn estimate_task_duration(&self, task: &str) -> u64 {
        self.analyzer.analyze(task).estimated_duration_ms()
    }

    /// Run the strategy pipeline without building chunk records. The
    /// list is uncapped; `chunk_task` applies `max_chunks` on top.
    pub fn identify_subtasks(&self, task: &str) -> Vec<String> {
        let cfg = ChunkerConfig::default();
        let duration_ms = self.estimate_task_duration(task);
        self.decompose(task, &cfg, duration_ms)
    }

    /// Cheap pre-check: estimated duration over 80% of `timeout_ms`, or
    /// very high complexity.
    pub fn needs_chunking(&self, task: &str, timeout_ms: u64) -> bool {
        let analysis = self.analyzer.analyze(task);
        let duration_ms = analysis.estimated_duration_ms();
        (duration_ms as f64) > (timeout_ms as f64) * 0.8
            || analysis.level == ComplexityLevel::VeryHigh
    }

    /// Strategy pipeline: verb anchors, then file anchors, then the
    /// sentence fallback, keeping the most productive outcome.
    fn decompose(&self, task: &str, cfg: &ChunkerConfig, duration_ms: u64) -> Vec<String> {
        let by_verbs = self.splitter.split_by_action_verbs(task);
        if by_verbs.len() >= cfg.min_chunks {
            return by_verbs;
        }

        let by_files = self.splitter.split_by_files(task);
        let best = if by_files.len() > by_verbs.len() {
            by_files
        } else {
            by_verbs
        };
        if best.len() >= cfg.min_chunks {
            return best;
        }

        let target = duration_ms
            .div_ceil(cfg.max_chunk_duration_ms)
            .clamp(cfg.min_chunks as u64, cfg.max_chunks as u64)
            as usize;
        let by_sentences = self.split_by_sentences(task, target);
        if by_sentences.len() > best.len() {
            by_sentences
        } else {
            best
        }
    }

    /// Split on sentence boundaries; when that cannot reach `target`,
    /// fall back to roughly equal word spans.
    fn split_by_sentences(&self, task: &str, target: usize) -> Vec<String> {
        let sentences: Vec<String> = task
            .split(['.', ';'])
            .map(str::trim)
            .filter(|s| s.len() >= MIN_SENTENCE_FRAGMENT_LEN)
            .map(ToString::to_string)
            .collect();
        if sentences.len() >= target {
            return sentences;
        }

        let words: Vec<&str> = task.split_whitespace().collect();
        if words.is_empty() {
            return sentences;
        }
        let per = (words.len() / target).max(1);
        let spans: Vec<String> = words.chunks(per).map(|w| w.join(" ")).collect();
        if spans.len() > sentences.len() {
            spans
        } else {
            sentences
        }
    }

    fn single_chunk_result(
        &self,
        task: &str,
        requires_chunking: bool,
        reason: String,
        analysis: ComplexityAnalysis,
    ) -> ChunkingResult {
        let id = ChunkId::from_index(0);
        let duration_ms = analysis.estimated_duration_ms();
        let chunk = TaskChunk {
            id: id.clone(),
            index: 0,
            description: task.to_string(),
            estimated_complexity: analysis.level,
            estimated_duration_ms: duration_ms,
            dependencies: vec![],
            context: ChunkContext {
                file_references: self.analyzer.extract_file_references(task),
                original_task: task.to_string(),
            },
        };
        ChunkingResult {
            original_task: task.to_string(),
            requires_chunking,
            reason,
            chunks: vec![chunk],
            execution_order: vec![vec![id]],
            total_estimated_duration_ms: duration_ms,
            complexity: analysis,
        }
    }
}

impl Default for TaskChunker {
    fn default() -> Self {
        Self::new()
    }
}
