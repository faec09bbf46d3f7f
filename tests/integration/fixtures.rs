//! Shared helpers for the integration tests.

use std::sync::Once;
use taskweave::{ChunkContext, ChunkId, ComplexityLevel, TaskChunk, TaskChunker};
use tracing_subscriber::EnvFilter;

static TRACING: Once = Once::new();

/// Route engine diagnostics through an env-filtered subscriber, so
/// `RUST_LOG=taskweave=debug` makes pipeline steps and the scheduler's
/// fallback warnings visible in test output.
pub fn init_tracing() {
    TRACING.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub fn chunker() -> TaskChunker {
    init_tracing();
    TaskChunker::new()
}

/// Hand-built chunk for driving the scheduler directly.
pub fn chunk(index: usize, deps: &[usize]) -> TaskChunk {
    TaskChunk {
        id: ChunkId::from_index(index),
        index,
        description: format!("step {index}"),
        estimated_complexity: ComplexityLevel::Low,
        estimated_duration_ms: 300_000,
        dependencies: deps.iter().map(|&d| ChunkId::from_index(d)).collect(),
        context: ChunkContext {
            file_references: vec![],
            original_task: "scheduled task".to_string(),
        },
    }
}

pub fn ids(indices: &[usize]) -> Vec<ChunkId> {
    indices.iter().map(|&i| ChunkId::from_index(i)).collect()
}
