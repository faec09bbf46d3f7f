//! Chunk records produced by the decomposition pipeline.

use crate::core::complexity::{ComplexityAnalysis, ComplexityLevel};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a chunk, unique within one [`ChunkingResult`].
///
/// Ids are deterministic (`chunk_<index>`), never random: a caller that
/// replans the same task gets the same ids back.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChunkId(String);

impl ChunkId {
    /// Build the id for the chunk at position `index`.
    pub fn from_index(index: usize) -> Self {
        Self(format!("chunk_{index}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Recover the position encoded in the id, if it follows the
    /// `chunk_<index>` form.
    pub fn index(&self) -> Option<usize> {
        self.0.strip_prefix("chunk_")?.parse().ok()
    }
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Context carried alongside a chunk for the eventual executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkContext {
    /// File references found in the chunk's own text.
    pub file_references: Vec<String>,
    /// The full task the chunk was carved from.
    pub original_task: String,
}

/// One executable piece of a decomposed task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskChunk {
    pub id: ChunkId,
    /// Position in the original decomposition order.
    pub index: usize,
    /// Non-empty subtask text.
    pub description: String,
    /// Level from re-analyzing the chunk text alone.
    pub estimated_complexity: ComplexityLevel,
    pub estimated_duration_ms: u64,
    /// Ids of chunks that must complete first. Always earlier chunks.
    pub dependencies: Vec<ChunkId>,
    pub context: ChunkContext,
}

/// Complete outcome of one `chunk_task` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkingResult {
    pub original_task: String,
    /// Whether the decomposition pipeline actually ran.
    pub requires_chunking: bool,
    /// Human-readable explanation of the chunking decision.
    pub reason: String,
    pub chunks: Vec<TaskChunk>,
    /// Groups of chunk ids safe to run concurrently, in execution order.
    /// An exact partition of the chunk ids.
    pub execution_order: Vec<Vec<ChunkId>>,
    pub total_estimated_duration_ms: u64,
    /// Analysis of the original, undivided task.
    pub complexity: ComplexityAnalysis,
}

impl ChunkingResult {
    /// Look up a chunk by id.
    pub fn get_chunk(&self, id: &ChunkId) -> Option<&TaskChunk> {
        self.chunks.iter().find(|c| &c.id == id)
    }

    /// Index of the execution group containing `id`.
    pub fn group_of(&self, id: &ChunkId) -> Option<usize> {
        self.execution_order
            .iter()
            .position(|group| group.contains(id))
    }
}
