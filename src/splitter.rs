//! Decomposition strategies and heuristic dependency inference.
//!
//! The splitter carves a task description into subtask spans, anchored
//! either on action verbs or on file references, and infers a
//! backward-only dependency graph over the resulting list. Inference is
//! heuristic: it reads phrases, not meaning.

use crate::core::complexity::ComplexityFactors;
use crate::lexicon::CompiledLexicon;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Dependency-phrase captures shorter than this are too generic to match
/// against earlier subtasks ("it", "an").
const MIN_KEYWORD_LEN: usize = 3;

/// Splits task text into subtask spans and infers ordering between them.
#[derive(Debug, Clone)]
pub struct TaskSplitter {
    lexicon: Arc<CompiledLexicon>,
}

impl TaskSplitter {
    pub fn new(lexicon: Arc<CompiledLexicon>) -> Self {
        Self { lexicon }
    }

    /// One subtask per recognized action-verb occurrence: each span runs
    /// from its verb to just before the next verb (or end of text). A
    /// span that contains nothing but the verb itself merges into the
    /// following span.
    pub fn split_by_action_verbs(&self, task: &str) -> Vec<String> {
        let mut anchors = Vec::new();
        for (start, token) in tokens_with_offsets(task) {
            let word: String = token
                .chars()
                .filter(|c| c.is_alphabetic())
                .collect::<String>()
                .to_lowercase();
            if self.lexicon.is_action_verb(&word) {
                anchors.push(start);
            }
        }

        let mut spans: Vec<&str> = Vec::with_capacity(anchors.len());
        for (i, &start) in anchors.iter().enumerate() {
            let end = anchors.get(i + 1).copied().unwrap_or(task.len());
            spans.push(&task[start..end]);
        }

        // Merge bare-verb spans ("refactor and update x" anchors both
        // verbs but the first span is just "refactor and").
        let mut merged: Vec<String> = Vec::with_capacity(spans.len());
        let mut carry = String::new();
        for span in spans {
            let cleaned = clean_span(span);
            let combined = if carry.is_empty() {
                cleaned
            } else {
                format!("{carry} {cleaned}")
            };
            if combined.split_whitespace().count() <= 1 {
                carry = combined;
            } else {
                merged.push(combined);
                carry.clear();
            }
        }
        if !carry.is_empty() {
            match merged.last_mut() {
                Some(last) => {
                    last.push(' ');
                    last.push_str(&carry);
                }
                None => merged.push(carry),
            }
        }

        debug!(subtasks = merged.len(), "verb split");
        merged
    }

    /// One subtask per file reference: the text is cut just after each
    /// reference, and trailing text folds into the final span.
    pub fn split_by_files(&self, task: &str) -> Vec<String> {
        let mut ends: Vec<usize> = self
            .lexicon
            .file_patterns()
            .iter()
            .flat_map(|pattern| pattern.find_iter(task).map(|m| m.end()))
            .collect();
        ends.sort_unstable();
        ends.dedup();

        if ends.is_empty() {
            return Vec::new();
        }

        // Cut after every reference but the last, so trailing text stays
        // attached to the span that owns the final reference.
        let mut spans = Vec::with_capacity(ends.len());
        let mut start = 0;
        for &end in &ends[..ends.len() - 1] {
            spans.push(clean_span(&task[start..end]));
            start = end;
        }
        spans.push(clean_span(&task[start..]));
        spans.retain(|s| !s.is_empty());

        debug!(subtasks = spans.len(), "file split");
        spans
    }

    /// Backward-only dependency graph over the subtask list.
    ///
    /// Explicit references win: a dependency-phrase capture whose keyword
    /// appears in an earlier subtask makes this subtask depend on the
    /// earliest such subtask. Otherwise, when the overall task reads as
    /// ordered (dependency phrases or step separators present), each
    /// subtask depends on its immediate predecessor. Indices in the edge
    /// lists are always strictly less than the keyed index.
    pub fn build_dependency_graph(
        &self,
        subtasks: &[String],
        factors: &ComplexityFactors,
    ) -> BTreeMap<usize, Vec<usize>> {
        let lowered: Vec<String> = subtasks.iter().map(|s| s.to_lowercase()).collect();
        let chain = factors.has_dependencies || factors.has_multiple_steps;

        let mut graph = BTreeMap::new();
        for (i, subtask) in subtasks.iter().enumerate() {
            let mut deps = Vec::new();
            for pattern in self.lexicon.dependency_phrases() {
                for caps in pattern.captures_iter(subtask) {
                    let Some(keyword) = caps.get(1) else { continue };
                    let keyword = keyword.as_str().to_lowercase();
                    if keyword.len() < MIN_KEYWORD_LEN {
                        continue;
                    }
                    if let Some(j) = lowered[..i].iter().position(|s| s.contains(&keyword)) {
                        if !deps.contains(&j) {
                            deps.push(j);
                        }
                    }
                }
            }
            if deps.is_empty() && chain && i > 0 {
                deps.push(i - 1);
            }
            deps.sort_unstable();
            graph.insert(i, deps);
        }
        graph
    }
}

/// Byte offsets of whitespace-separated tokens.
fn tokens_with_offsets(text: &str) -> impl Iterator<Item = (usize, &str)> + '_ {
    text.split_whitespace()
        .map(move |token| (token.as_ptr() as usize - text.as_ptr() as usize, token))
}

/// Trim a raw span down to readable subtask text.
fn clean_span(span: &str) -> String {
    let mut s = span.trim();
    loop {
        let t = s.trim_end_matches([',', ';', '.', ':']).trim_end();
        let t = t
            .strip_suffix(" and")
            .or_else(|| t.strip_suffix(" then"))
            .unwrap_or(t);
        if t == s {
            break;
        }
        s = t;
    }
    s.trim_start_matches([',', ';', '.', ':']).trim().to_string()
}
