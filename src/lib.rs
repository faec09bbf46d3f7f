//! taskweave: task decomposition and dependency scheduling.
//!
//! Given a free-text task description, the engine scores its complexity
//! from lexical signals, decides whether it should be split, decomposes
//! it through a pipeline of strategies (action verbs, file references,
//! sentence spans), infers ordering dependencies between the pieces, and
//! computes a safe parallel execution schedule. Planning only: nothing
//! is executed, persisted, or run concurrently here.
//!
//! ```
//! use taskweave::TaskChunker;
//!
//! let chunker = TaskChunker::new();
//! let result = chunker.chunk_task("fix the login bug", None);
//! assert!(!result.requires_chunking);
//! assert_eq!(result.chunks.len(), 1);
//!
//! let result = chunker.chunk_task(
//!     "refactor database.ts, update api.ts, and write tests for both",
//!     None,
//! );
//! assert!(result.requires_chunking);
//! assert!(result.chunks.len() >= 3);
//! ```

pub mod analyzer;
pub mod chunker;
pub mod core;
pub mod error;
pub mod lexicon;
pub mod scheduler;
pub mod splitter;

pub use analyzer::ComplexityAnalyzer;
pub use chunker::{ChunkerConfig, TaskChunker};
pub use crate::core::chunk::{ChunkContext, ChunkId, ChunkingResult, TaskChunk};
pub use crate::core::complexity::{ComplexityAnalysis, ComplexityFactors, ComplexityLevel};
pub use error::{Error, Result};
pub use lexicon::{CompiledLexicon, Lexicon};
pub use scheduler::calculate_execution_order;
pub use splitter::TaskSplitter;
