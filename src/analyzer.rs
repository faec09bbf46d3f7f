//! Lexical complexity analysis. Counts lexicon signals in the task text
//! and folds them into a weighted 0-100 score; every operation is total
//! over arbitrary text.

use crate::core::complexity::{ComplexityAnalysis, ComplexityFactors, ComplexityLevel};
use crate::lexicon::CompiledLexicon;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Scores a task description from lexical signals.
#[derive(Debug, Clone)]
pub struct ComplexityAnalyzer {
    lexicon: Arc<CompiledLexicon>,
}

impl ComplexityAnalyzer {
    pub fn new(lexicon: Arc<CompiledLexicon>) -> Self {
        Self { lexicon }
    }

    /// Full analysis of one task description.
    pub fn analyze(&self, task: &str) -> ComplexityAnalysis {
        let verbs = self.extract_action_verbs(task);
        let files = self.extract_file_references(task);

        let mut factors = ComplexityFactors {
            verb_count: verbs.len(),
            file_count: files.len(),
            concept_count: self.count_concepts(task),
            has_multiple_steps: self.has_multiple_steps(task),
            has_dependencies: self.has_dependencies(task),
            estimated_minutes: 0,
        };
        factors.estimated_minutes = self.estimate_minutes(&factors);

        let score = self.calculate_score(&factors);
        let level = self.level_for_score(score);
        let recommendations = self.recommendations(&factors, level);

        debug!(
            score,
            %level,
            verbs = factors.verb_count,
            files = factors.file_count,
            concepts = factors.concept_count,
            minutes = factors.estimated_minutes,
            "analyzed task"
        );

        ComplexityAnalysis {
            level,
            score,
            factors,
            recommendations,
        }
    }

    /// Distinct recognized action verbs, lowercased, first-occurrence order.
    pub fn extract_action_verbs(&self, task: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut verbs = Vec::new();
        for token in task.split_whitespace() {
            let word: String = token
                .chars()
                .filter(|c| c.is_alphabetic())
                .collect::<String>()
                .to_lowercase();
            if self.lexicon.is_action_verb(&word) && seen.insert(word.clone()) {
                verbs.push(word);
            }
        }
        verbs
    }

    /// Distinct file references as they appear in the text.
    pub fn extract_file_references(&self, task: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut refs = Vec::new();
        for pattern in self.lexicon.file_patterns() {
            for m in pattern.find_iter(task) {
                let reference = m.as_str().trim().to_string();
                if !reference.is_empty() && seen.insert(reference.clone()) {
                    refs.push(reference);
                }
            }
        }
        refs
    }

    /// Concept matches summed across patterns. Within one pattern a term
    /// counts once regardless of repetition; across patterns the same
    /// term may count again.
    pub fn count_concepts(&self, task: &str) -> usize {
        self.lexicon
            .concept_patterns()
            .iter()
            .map(|pattern| {
                pattern
                    .find_iter(task)
                    .map(|m| m.as_str().to_lowercase())
                    .collect::<HashSet<_>>()
                    .len()
            })
            .sum()
    }

    pub fn has_multiple_steps(&self, task: &str) -> bool {
        let lower = task.to_lowercase();
        self.lexicon
            .step_separators()
            .iter()
            .any(|sep| lower.contains(sep))
    }

    pub fn has_dependencies(&self, task: &str) -> bool {
        self.lexicon
            .dependency_phrases()
            .iter()
            .any(|pattern| pattern.is_match(task))
    }

    /// Estimated effort in minutes, clamped to the lexicon's bounds.
    pub fn estimate_minutes(&self, factors: &ComplexityFactors) -> u64 {
        let w = self.lexicon.duration();
        let base = (factors.verb_count as u64 * w.verb_minutes
            + factors.file_count as u64 * w.file_minutes
            + factors.concept_count as u64 * w.concept_minutes) as f64;
        let scaled = if factors.has_multiple_steps {
            base * w.multi_step_multiplier
        } else {
            base
        };
        (scaled.round() as u64).min(w.max_minutes).max(w.min_minutes)
    }

    /// Weighted score in `0..=100`: capped per-factor contributions plus
    /// flat bonuses.
    pub fn calculate_score(&self, factors: &ComplexityFactors) -> u8 {
        let w = self.lexicon.scoring();
        let verbs = (factors.verb_count as u32 * w.verb_weight).min(w.verb_cap);
        let files = (factors.file_count as u32 * w.file_weight).min(w.file_cap);
        let concepts = (factors.concept_count as u32 * w.concept_weight).min(w.concept_cap);
        let steps = if factors.has_multiple_steps {
            w.multi_step_bonus
        } else {
            0
        };
        let deps = if factors.has_dependencies {
            w.dependency_bonus
        } else {
            0
        };
        let minutes = ((factors.estimated_minutes / w.minutes_divisor.max(1)) as u32)
            .min(w.minutes_cap);

        (verbs + files + concepts + steps + deps + minutes).min(100) as u8
    }

    /// Map a score onto a level through the lexicon's thresholds.
    pub fn level_for_score(&self, score: u8) -> ComplexityLevel {
        let t = self.lexicon.levels();
        if score >= t.very_high {
            ComplexityLevel::VeryHigh
        } else if score >= t.high {
            ComplexityLevel::High
        } else if score >= t.medium {
            ComplexityLevel::Medium
        } else {
            ComplexityLevel::Low
        }
    }

    /// Notes on what drove the score, one line per triggered condition.
    pub fn recommendations(
        &self,
        factors: &ComplexityFactors,
        level: ComplexityLevel,
    ) -> Vec<String> {
        if level == ComplexityLevel::Low {
            return vec!["Task appears simple, execute directly".to_string()];
        }

        let mut notes = Vec::new();
        if factors.verb_count > 3 {
            notes.push(format!(
                "Task involves {} distinct actions, consider splitting by action",
                factors.verb_count
            ));
        }
        if factors.file_count > 2 {
            notes.push(format!(
                "Task touches {} files, consider splitting by file",
                factors.file_count
            ));
        }
        if factors.has_multiple_steps {
            notes.push("Task describes multiple steps, execute sequentially".to_string());
        }
        if factors.has_dependencies {
            notes.push("Task mentions dependencies, order subtasks carefully".to_string());
        }
        if factors.estimated_minutes > 60 {
            notes.push(format!(
                "Estimated effort is {} minutes, consider smaller chunks",
                factors.estimated_minutes
            ));
        }
        notes
    }
}
