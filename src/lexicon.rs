//! Lexical configuration for the analysis and splitting heuristics.
//!
//! Every tunable table lives here rather than inline in the algorithms:
//! the action-verb vocabulary, file and concept patterns, step separators,
//! dependency phrases, and the weights/thresholds used for scoring. The
//! whole document is serde-backed and round-trips through TOML, so the
//! tables can be versioned and swapped without touching control flow.

use crate::error::{Error, Result};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Current version of the built-in lexicon document.
pub const LEXICON_VERSION: u32 = 1;

/// Weights for estimating task duration in minutes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DurationWeights {
    /// Minutes contributed per recognized action verb.
    pub verb_minutes: u64,
    /// Minutes contributed per file reference.
    pub file_minutes: u64,
    /// Minutes contributed per concept match.
    pub concept_minutes: u64,
    /// Multiplier applied when the task describes multiple steps.
    pub multi_step_multiplier: f64,
    /// Lower clamp for the estimate.
    pub min_minutes: u64,
    /// Upper clamp for the estimate.
    pub max_minutes: u64,
}

impl Default for DurationWeights {
    fn default() -> Self {
        Self {
            verb_minutes: 5,
            file_minutes: 3,
            concept_minutes: 4,
            multi_step_multiplier: 1.5,
            min_minutes: 5,
            max_minutes: 480,
        }
    }
}

/// Weights for the 0-100 complexity score.
///
/// Each factor contributes `count * weight` capped at its `cap`; the caps
/// plus the flat bonuses sum to 100 so the final `.min(100)` is a guard,
/// not the usual path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreWeights {
    /// Points per recognized action verb.
    pub verb_weight: u32,
    /// Cap on the verb contribution.
    pub verb_cap: u32,
    /// Points per file reference.
    pub file_weight: u32,
    /// Cap on the file contribution.
    pub file_cap: u32,
    /// Points per concept match.
    pub concept_weight: u32,
    /// Cap on the concept contribution.
    pub concept_cap: u32,
    /// Flat bonus when the task describes multiple steps.
    pub multi_step_bonus: u32,
    /// Flat bonus when the task mentions dependencies.
    pub dependency_bonus: u32,
    /// Estimated minutes are divided by this before contributing.
    pub minutes_divisor: u64,
    /// Cap on the minutes contribution.
    pub minutes_cap: u32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            verb_weight: 8,
            verb_cap: 24,
            file_weight: 6,
            file_cap: 18,
            concept_weight: 5,
            concept_cap: 20,
            multi_step_bonus: 15,
            dependency_bonus: 10,
            minutes_divisor: 10,
            minutes_cap: 13,
        }
    }
}

/// Ascending score thresholds for the complexity levels.
///
/// Scores below `medium` map to Low; the mapping is monotone by
/// construction and `compile` rejects descending thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelThresholds {
    /// Minimum score for Medium.
    pub medium: u8,
    /// Minimum score for High.
    pub high: u8,
    /// Minimum score for VeryHigh.
    pub very_high: u8,
}

impl Default for LevelThresholds {
    fn default() -> Self {
        Self {
            medium: 25,
            high: 50,
            very_high: 75,
        }
    }
}

/// The full lexical configuration document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lexicon {
    /// Document version, bumped when the built-in tables change shape.
    pub version: u32,
    /// Recognized action verbs (matched case-insensitively per token).
    pub action_verbs: Vec<String>,
    /// Regex sources matching file-like references.
    pub file_patterns: Vec<String>,
    /// Regex sources matching architectural concept vocabulary.
    ///
    /// A term matched by two different patterns counts twice; that is
    /// intentional, overlapping concerns compound.
    pub concept_patterns: Vec<String>,
    /// Phrases indicating a multi-step task (substring containment).
    pub step_separators: Vec<String>,
    /// Regex sources indicating an ordering dependency. Where a pattern
    /// has a capture group, the capture names the thing depended on.
    pub dependency_phrases: Vec<String>,
    /// Duration estimation weights.
    #[serde(default)]
    pub duration: DurationWeights,
    /// Complexity score weights.
    #[serde(default)]
    pub scoring: ScoreWeights,
    /// Level thresholds.
    #[serde(default)]
    pub levels: LevelThresholds,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            version: LEXICON_VERSION,
            action_verbs: [
                "add", "analyze", "build", "check", "clean", "configure", "create", "debug",
                "delete", "deploy", "design", "document", "fix", "implement", "improve",
                "install", "integrate", "migrate", "optimize", "refactor", "remove", "rename",
                "replace", "review", "rewrite", "test", "update", "upgrade", "validate",
                "verify", "write",
            ]
            .iter()
            .map(ToString::to_string)
            .collect(),
            file_patterns: vec![
                // Tokens with a known source/config extension.
                r"[\w./\\-]+\.(?:rs|ts|tsx|js|jsx|py|go|java|rb|c|h|cpp|json|toml|yaml|yml|md|txt|sql|html|css|sh)\b"
                    .to_string(),
                // Path-like tokens with directory separators.
                r"(?:\./|/)?(?:[\w-]+/)+[\w.-]+".to_string(),
            ],
            concept_patterns: vec![
                r"\b(?:api|endpoint|route|rest|graphql)s?\b".to_string(),
                r"\b(?:database|schema|migration|query|table)s?\b".to_string(),
                r"\b(?:auth|authentication|authorization|login|session|token)s?\b".to_string(),
                r"\b(?:cache|queue|worker|job|pipeline)s?\b".to_string(),
                r"\b(?:test|spec|coverage|benchmark)s?\b".to_string(),
                r"\b(?:deploy|deployment|docker|container|infrastructure|ci)\b".to_string(),
                r"\b(?:ui|frontend|backend|component|service|module)s?\b".to_string(),
                r"\b(?:architecture|design|refactor|performance|security)\b".to_string(),
            ],
            step_separators: [
                "and then",
                "after that",
                "followed by",
                " then ",
                "next,",
                "next step",
                "first,",
                "second,",
                "finally",
                " and ",
            ]
            .iter()
            .map(ToString::to_string)
            .collect(),
            dependency_phrases: vec![
                r"depends\s+on\s+(\w+)".to_string(),
                r"requires\s+(?:the\s+)?(\w+)".to_string(),
                r"\bafter\s+(?:the\s+)?(\w+)".to_string(),
                r"\bbefore\s+(?:the\s+)?(\w+)".to_string(),
                r"\bonce\s+(?:the\s+)?(\w+)".to_string(),
                r"based\s+on\s+(?:the\s+)?(\w+)".to_string(),
                r"blocked\s+by\s+(?:the\s+)?(\w+)".to_string(),
                r"using\s+the\s+(\w+)".to_string(),
            ],
            duration: DurationWeights::default(),
            scoring: ScoreWeights::default(),
            levels: LevelThresholds::default(),
        }
    }
}

impl Lexicon {
    /// Load a lexicon document from a TOML file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let lexicon: Self = toml::from_str(&fs::read_to_string(path)?)?;
        Ok(lexicon)
    }

    /// Write the lexicon document to a TOML file.
    pub fn to_path(&self, path: &Path) -> Result<()> {
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Compile the pattern sources into a [`CompiledLexicon`].
    ///
    /// Fails if any regex source is invalid or the level thresholds are
    /// not ascending.
    pub fn compile(self) -> Result<CompiledLexicon> {
        if self.levels.medium > self.levels.high || self.levels.high > self.levels.very_high {
            return Err(Error::Validation(format!(
                "level thresholds must be ascending: {} <= {} <= {}",
                self.levels.medium, self.levels.high, self.levels.very_high
            )));
        }

        let verbs = self
            .action_verbs
            .iter()
            .map(|v| v.to_lowercase())
            .collect();
        let file_patterns = compile_all(&self.file_patterns)?;
        let concept_patterns = compile_all(&self.concept_patterns)?;
        let dependency_phrases = compile_all(&self.dependency_phrases)?;
        let step_separators = self
            .step_separators
            .iter()
            .map(|s| s.to_lowercase())
            .collect();

        Ok(CompiledLexicon {
            verbs,
            file_patterns,
            concept_patterns,
            step_separators,
            dependency_phrases,
            source: self,
        })
    }
}

/// Compile a list of regex sources, all case-insensitive.
fn compile_all(sources: &[String]) -> Result<Vec<Regex>> {
    sources
        .iter()
        .map(|src| {
            RegexBuilder::new(src)
                .case_insensitive(true)
                .build()
                .map_err(|e| Error::Pattern {
                    pattern: src.clone(),
                    message: e.to_string(),
                })
        })
        .collect()
}

/// A lexicon with all regex sources compiled once.
///
/// Built once per engine and shared by the analyzer and splitter; the
/// algorithms never re-parse patterns on the hot path.
#[derive(Debug)]
pub struct CompiledLexicon {
    source: Lexicon,
    verbs: HashSet<String>,
    file_patterns: Vec<Regex>,
    concept_patterns: Vec<Regex>,
    step_separators: Vec<String>,
    dependency_phrases: Vec<Regex>,
}

impl CompiledLexicon {
    /// The document this lexicon was compiled from.
    pub fn source(&self) -> &Lexicon {
        &self.source
    }

    /// Document version.
    pub fn version(&self) -> u32 {
        self.source.version
    }

    /// Check whether a lowercase token is a recognized action verb.
    pub fn is_action_verb(&self, token: &str) -> bool {
        self.verbs.contains(token)
    }

    /// Compiled file-reference patterns.
    pub fn file_patterns(&self) -> &[Regex] {
        &self.file_patterns
    }

    /// Compiled concept patterns.
    pub fn concept_patterns(&self) -> &[Regex] {
        &self.concept_patterns
    }

    /// Lowercased step-separator phrases.
    pub fn step_separators(&self) -> &[String] {
        &self.step_separators
    }

    /// Compiled dependency phrases.
    pub fn dependency_phrases(&self) -> &[Regex] {
        &self.dependency_phrases
    }

    /// Duration estimation weights.
    pub fn duration(&self) -> &DurationWeights {
        &self.source.duration
    }

    /// Complexity score weights.
    pub fn scoring(&self) -> &ScoreWeights {
        &self.source.scoring
    }

    /// Level thresholds.
    pub fn levels(&self) -> &LevelThresholds {
        &self.source.levels
    }
}
