//! Execution-order computation over a fixed set of chunks.
//!
//! Topological leveling: each round gathers every pending chunk whose
//! dependencies are already scheduled into one can-run-together group.
//! The function is total. Cyclic or unresolvable input degrades to
//! sequential singleton groups instead of failing, trading schedule
//! quality for availability.

use crate::core::chunk::{ChunkId, TaskChunk};
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::DiGraph;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Group chunks into a sequence of parallel-safe batches.
///
/// The result is always an exact partition of the input ids. A chunk
/// whose dependency id does not belong to the set can never become
/// eligible, so it falls into the sequential-fallback region along with
/// any cycle members.
pub fn calculate_execution_order(chunks: &[TaskChunk]) -> Vec<Vec<ChunkId>> {
    if chunks.is_empty() {
        return Vec::new();
    }

    let index_of: HashMap<&ChunkId, usize> = chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| (&chunk.id, i))
        .collect();

    if has_cycle(chunks, &index_of) {
        warn!("dependency cycle detected, affected chunks will run sequentially");
    }

    let mut scheduled: HashSet<usize> = HashSet::new();
    let mut pending: Vec<usize> = (0..chunks.len()).collect();
    let mut order: Vec<Vec<ChunkId>> = Vec::new();

    while !pending.is_empty() {
        let eligible: Vec<usize> = pending
            .iter()
            .copied()
            .filter(|&i| {
                chunks[i].dependencies.iter().all(|dep| {
                    index_of
                        .get(dep)
                        .is_some_and(|&j| scheduled.contains(&j))
                })
            })
            .collect();

        if eligible.is_empty() {
            warn!(
                remaining = pending.len(),
                "no schedulable chunks remain, falling back to sequential order"
            );
            for i in pending {
                order.push(vec![chunks[i].id.clone()]);
            }
            break;
        }

        scheduled.extend(eligible.iter().copied());
        pending.retain(|i| !scheduled.contains(i));
        order.push(eligible.into_iter().map(|i| chunks[i].id.clone()).collect());
    }

    debug!(groups = order.len(), chunks = chunks.len(), "execution order computed");
    order
}

/// Upfront cycle diagnostic over the known dependency edges.
fn has_cycle(chunks: &[TaskChunk], index_of: &HashMap<&ChunkId, usize>) -> bool {
    let mut graph = DiGraph::<usize, ()>::new();
    let nodes: Vec<_> = (0..chunks.len()).map(|i| graph.add_node(i)).collect();
    for (i, chunk) in chunks.iter().enumerate() {
        for dep in &chunk.dependencies {
            if let Some(&j) = index_of.get(dep) {
                graph.add_edge(nodes[j], nodes[i], ());
            }
        }
    }
    is_cyclic_directed(&graph)
}
