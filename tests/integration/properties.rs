//! Property tests over generated task text and factor combinations.

use crate::fixtures::chunker;
use proptest::prelude::*;
use std::sync::Arc;
use taskweave::{ComplexityAnalyzer, ComplexityFactors, Lexicon};

fn analyzer() -> ComplexityAnalyzer {
    ComplexityAnalyzer::new(Arc::new(
        Lexicon::default().compile().expect("built-in lexicon compiles"),
    ))
}

/// Task text assembled from words the lexicon reacts to, plus filler.
fn task_text() -> impl Strategy<Value = String> {
    let word = prop::sample::select(vec![
        "fix", "refactor", "update", "write", "deploy", "test", "migrate", "the", "a",
        "parser", "api.ts", "database.rs", "src/lib.rs", "database", "auth", "login",
        "service", "and", "then", "finally", "after", "migration", "tests", "carefully",
        "quickly", "everything", "once", "done.", "it;",
    ]);
    prop::collection::vec(word, 0..40).prop_map(|words| words.join(" "))
}

fn factors() -> impl Strategy<Value = ComplexityFactors> {
    (
        0usize..50,
        0usize..50,
        0usize..50,
        any::<bool>(),
        any::<bool>(),
        0u64..1_000,
    )
        .prop_map(
            |(verb_count, file_count, concept_count, steps, deps, estimated_minutes)| {
                ComplexityFactors {
                    verb_count,
                    file_count,
                    concept_count,
                    has_multiple_steps: steps,
                    has_dependencies: deps,
                    estimated_minutes,
                }
            },
        )
}

proptest! {
    #[test]
    fn score_stays_within_bounds(task in task_text()) {
        let analysis = analyzer().analyze(&task);
        prop_assert!(analysis.score <= 100);
    }

    #[test]
    fn minutes_stay_within_lexicon_bounds(task in task_text()) {
        let analysis = analyzer().analyze(&task);
        let d = Lexicon::default().duration;
        prop_assert!(analysis.factors.estimated_minutes >= d.min_minutes);
        prop_assert!(analysis.factors.estimated_minutes <= d.max_minutes);
    }

    #[test]
    fn score_is_monotone_in_each_factor(f in factors()) {
        let a = analyzer();
        let base = a.calculate_score(&f);

        let mut more_verbs = f.clone();
        more_verbs.verb_count += 1;
        prop_assert!(a.calculate_score(&more_verbs) >= base);

        let mut more_files = f.clone();
        more_files.file_count += 1;
        prop_assert!(a.calculate_score(&more_files) >= base);

        let mut more_concepts = f.clone();
        more_concepts.concept_count += 1;
        prop_assert!(a.calculate_score(&more_concepts) >= base);

        let mut with_steps = f.clone();
        with_steps.has_multiple_steps = true;
        prop_assert!(a.calculate_score(&with_steps) >= base);

        let mut longer = f.clone();
        longer.estimated_minutes += 10;
        prop_assert!(a.calculate_score(&longer) >= base);
    }

    #[test]
    fn execution_order_is_exact_partition(task in task_text()) {
        let result = chunker().chunk_task(&task, None);

        let mut scheduled: Vec<_> = result
            .execution_order
            .iter()
            .flatten()
            .cloned()
            .collect();
        scheduled.sort();
        scheduled.dedup();

        let mut chunk_ids: Vec<_> = result.chunks.iter().map(|c| c.id.clone()).collect();
        chunk_ids.sort();

        prop_assert_eq!(scheduled, chunk_ids);
    }

    #[test]
    fn dependencies_run_in_earlier_groups(task in task_text()) {
        // Pipeline-built graphs are backward-only, so the fallback never
        // engages and every dependency must sit strictly earlier.
        let result = chunker().chunk_task(&task, None);
        for chunk in &result.chunks {
            let own_group = result.group_of(&chunk.id);
            prop_assert!(own_group.is_some());
            for dep in &chunk.dependencies {
                prop_assert!(result.group_of(dep) < own_group);
            }
        }
    }

    #[test]
    fn chunk_ids_are_unique_and_indexed(task in task_text()) {
        let result = chunker().chunk_task(&task, None);
        for (i, chunk) in result.chunks.iter().enumerate() {
            prop_assert_eq!(chunk.index, i);
            prop_assert_eq!(chunk.id.index(), Some(i));
            prop_assert!(!chunk.description.is_empty() || !result.requires_chunking);
        }
    }

    #[test]
    fn chunking_is_deterministic(task in task_text()) {
        let c = chunker();
        prop_assert_eq!(c.chunk_task(&task, None), c.chunk_task(&task, None));
    }

    #[test]
    fn total_duration_is_sum_of_chunks(task in task_text()) {
        let result = chunker().chunk_task(&task, None);
        let total: u64 = result.chunks.iter().map(|c| c.estimated_duration_ms).sum();
        prop_assert_eq!(result.total_estimated_duration_ms, total);
    }
}
