//! End-to-end chunking scenarios.

use crate::fixtures::{chunk, chunker, ids, init_tracing};
use taskweave::{calculate_execution_order, ChunkerConfig, ComplexityLevel};

#[test]
fn test_simple_task_stays_whole() {
    let result = chunker().chunk_task("fix the login bug", None);

    assert!(!result.requires_chunking);
    assert_eq!(result.chunks.len(), 1);
    assert_eq!(result.chunks[0].description, "fix the login bug");
    assert_eq!(result.chunks[0].dependencies.len(), 0);
    assert_eq!(result.execution_order.len(), 1);
    assert_eq!(result.complexity.level, ComplexityLevel::Low);
    assert_eq!(result.complexity.factors.verb_count, 1);
    assert_eq!(result.complexity.factors.file_count, 0);
    assert_eq!(
        result.total_estimated_duration_ms,
        result.chunks[0].estimated_duration_ms
    );
}

#[test]
fn test_multi_verb_task_splits_and_orders() {
    let result = chunker().chunk_task(
        "refactor database.ts, update api.ts, and write tests for both",
        None,
    );

    assert!(result.requires_chunking);
    assert_eq!(result.complexity.factors.verb_count, 3);
    assert_eq!(result.complexity.factors.file_count, 2);
    assert!(result.complexity.factors.has_multiple_steps);
    assert!(result.complexity.score >= 50);

    // One chunk per action verb.
    assert_eq!(result.chunks.len(), 3);
    assert!(result.chunks[0].description.starts_with("refactor"));
    assert!(result.chunks[1].description.starts_with("update"));
    assert!(result.chunks[2].description.starts_with("write"));

    // Step separators imply ordering, so execution cannot be one flat
    // group.
    assert!(result.execution_order.len() >= 2);

    // Each chunk carries its own file context.
    assert!(result.chunks[0]
        .context
        .file_references
        .contains(&"database.ts".to_string()));
    assert!(result.chunks[1]
        .context
        .file_references
        .contains(&"api.ts".to_string()));
    assert_eq!(
        result.chunks[0].context.original_task,
        result.original_task
    );

    let total: u64 = result.chunks.iter().map(|c| c.estimated_duration_ms).sum();
    assert_eq!(result.total_estimated_duration_ms, total);
}

#[test]
fn test_linear_chain_schedules_sequentially() {
    init_tracing();
    let chunks = vec![chunk(0, &[]), chunk(1, &[0]), chunk(2, &[1])];
    let order = calculate_execution_order(&chunks);
    assert_eq!(order, vec![ids(&[0]), ids(&[1]), ids(&[2])]);
}

#[test]
fn test_cyclic_dependencies_degrade_to_sequential() {
    // Mutually dependent chunks cannot be leveled; the scheduler must
    // still terminate with a complete sequential schedule rather than
    // fail the plan. The subscriber from `init_tracing` surfaces the
    // cycle warning when logging is enabled.
    init_tracing();
    let chunks = vec![chunk(0, &[1]), chunk(1, &[0])];
    let order = calculate_execution_order(&chunks);
    assert_eq!(order, vec![ids(&[0]), ids(&[1])]);
}

#[test]
fn test_threshold_boundary() {
    // "fix the login bug" scores just under the midpoint; pin the
    // threshold on either side of its score.
    let c = chunker();
    let score = c.chunk_task("fix the login bug", None).complexity.score;

    let below = ChunkerConfig {
        complexity_threshold: score + 1,
        ..ChunkerConfig::default()
    };
    assert!(!c.chunk_task("fix the login bug", Some(below)).requires_chunking);

    let at = ChunkerConfig {
        complexity_threshold: score,
        ..ChunkerConfig::default()
    };
    let result = c.chunk_task("fix the login bug", Some(at));
    assert!(result.requires_chunking);
    assert!(result.chunks.len() >= 2);
}

#[test]
fn test_max_chunks_caps_output() {
    let cfg = ChunkerConfig {
        max_chunks: 2,
        ..ChunkerConfig::default()
    };
    let result = chunker().chunk_task(
        "refactor database.ts, update api.ts, and write tests for both",
        Some(cfg),
    );

    assert_eq!(result.chunks.len(), 2);
    // No dependency may point at a dropped chunk.
    for c in &result.chunks {
        for dep in &c.dependencies {
            assert!(result.get_chunk(dep).is_some(), "dangling dependency {dep}");
        }
    }
    // The partition covers exactly the surviving chunks.
    let scheduled: usize = result.execution_order.iter().map(Vec::len).sum();
    assert_eq!(scheduled, 2);
}

#[test]
fn test_duration_trigger_without_high_score() {
    // A low-scoring task still chunks when its estimate exceeds the
    // duration limit.
    let cfg = ChunkerConfig {
        complexity_threshold: 100,
        max_chunk_duration_ms: 60_000,
        ..ChunkerConfig::default()
    };
    let result = chunker().chunk_task("fix the login bug", Some(cfg));
    assert!(result.requires_chunking);
    assert!(result.reason.contains("duration"));
    assert!(result.chunks.len() >= 2);
}

#[test]
fn test_dependency_phrase_links_backward() {
    let result = chunker().chunk_task(
        "create the user migration, update the api handlers, and deploy after the migration completes",
        None,
    );
    assert!(result.requires_chunking);
    assert_eq!(result.chunks.len(), 3);

    // The deploy chunk names the migration; it must depend on the chunk
    // that created it, and run in a strictly later group.
    let deploy = &result.chunks[2];
    assert!(deploy.dependencies.contains(&result.chunks[0].id));
    assert!(result.group_of(&deploy.id) > result.group_of(&result.chunks[0].id));
}

#[test]
fn test_result_serializes() {
    let result = chunker().chunk_task(
        "refactor database.ts, update api.ts, and write tests for both",
        None,
    );
    let json = serde_json::to_string(&result).unwrap();
    let parsed: taskweave::ChunkingResult = serde_json::from_str(&json).unwrap();
    assert_eq!(result, parsed);
}

#[test]
fn test_custom_lexicon_changes_vocabulary() {
    let mut lexicon = taskweave::Lexicon::default();
    lexicon.action_verbs.push("grok".to_string());
    let c = taskweave::TaskChunker::with_lexicon(lexicon).unwrap();
    let subtasks = c.identify_subtasks("grok the parser and then fix the lexer");
    assert_eq!(subtasks.len(), 2);
}
