//! Core data model: complexity analysis results and chunk records.

pub mod chunk;
pub mod complexity;

pub use chunk::{ChunkContext, ChunkId, ChunkingResult, TaskChunk};
pub use complexity::{ComplexityAnalysis, ComplexityFactors, ComplexityLevel};
