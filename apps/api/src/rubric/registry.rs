//! Mode registry — the immutable set of evaluation modes and their scoring categories.
//!
//! Built once at startup (`ModeRegistry::builtin()`), validated, then shared read-only
//! through `AppState`. Tests construct alternate registries with `ModeRegistry::new`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rubric::EvaluationError;

/// Category-sum modes must have maxima adding up to this, so the raw sum is already a 0–100 total.
pub const TOTAL_SCALE: f64 = 100.0;

#[derive(Debug, Error, PartialEq)]
pub enum RegistryError {
    #[error("Duplicate mode key: {0}")]
    DuplicateMode(String),

    #[error("Mode '{mode}' declares category '{category}' more than once")]
    DuplicateCategory { mode: String, category: String },

    #[error("Mode '{mode}' category '{category}' must have a positive max score")]
    NonPositiveMax { mode: String, category: String },

    #[error("Mode '{0}' has no categories")]
    NoCategories(String),

    #[error("Mode '{mode}' sums category maxima to {sum}, expected 100")]
    TotalMismatch { mode: String, sum: f64 },
}

/// Where the 0–100 total of an evaluation comes from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TotalSource {
    /// Sum of category scores (maxima sum to 100).
    CategorySum,
    /// The provider reports its own `overall_score`; the scaled category sum is the fallback.
    ProviderOverall,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryConfig {
    pub key: String,
    pub name: String,
    pub max_score: f64,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DifficultyLevel {
    pub id: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModeOptions {
    pub difficulty_levels: Vec<DifficultyLevel>,
    pub question_counts: Vec<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModeConfig {
    pub key: String,
    pub name: String,
    pub description: String,
    pub categories: Vec<CategoryConfig>,
    pub total_max: f64,
    pub total_source: TotalSource,
    pub input_fields: Vec<String>,
    pub accepts_file_upload: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_extensions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<ModeOptions>,
}

impl ModeConfig {
    /// Builds a mode with `total_max` derived from its categories.
    pub fn new(
        key: &str,
        name: &str,
        description: &str,
        total_source: TotalSource,
        categories: Vec<CategoryConfig>,
    ) -> Self {
        let total_max = categories.iter().map(|c| c.max_score).sum();
        Self {
            key: key.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            categories,
            total_max,
            total_source,
            input_fields: Vec::new(),
            accepts_file_upload: false,
            allowed_extensions: Vec::new(),
            options: None,
        }
    }

    fn validate(&self) -> Result<(), RegistryError> {
        if self.categories.is_empty() {
            return Err(RegistryError::NoCategories(self.key.clone()));
        }
        for (i, cat) in self.categories.iter().enumerate() {
            if self.categories[..i].iter().any(|c| c.key == cat.key) {
                return Err(RegistryError::DuplicateCategory {
                    mode: self.key.clone(),
                    category: cat.key.clone(),
                });
            }
            if cat.max_score <= 0.0 || !cat.max_score.is_finite() {
                return Err(RegistryError::NonPositiveMax {
                    mode: self.key.clone(),
                    category: cat.key.clone(),
                });
            }
        }
        let sum: f64 = self.categories.iter().map(|c| c.max_score).sum();
        if self.total_source == TotalSource::CategorySum && (sum - TOTAL_SCALE).abs() > 1e-9 {
            return Err(RegistryError::TotalMismatch {
                mode: self.key.clone(),
                sum,
            });
        }
        Ok(())
    }
}

fn category(key: &str, name: &str, max_score: f64, description: &str) -> CategoryConfig {
    CategoryConfig {
        key: key.to_string(),
        name: name.to_string(),
        max_score,
        description: description.to_string(),
    }
}

/// Read-only lookup of all registered modes, in registration order.
#[derive(Debug, Clone)]
pub struct ModeRegistry {
    modes: Vec<ModeConfig>,
}

impl ModeRegistry {
    pub fn new(mut modes: Vec<ModeConfig>) -> Result<Self, RegistryError> {
        for (i, mode) in modes.iter().enumerate() {
            if modes[..i].iter().any(|m| m.key == mode.key) {
                return Err(RegistryError::DuplicateMode(mode.key.clone()));
            }
            mode.validate()?;
        }
        for mode in &mut modes {
            mode.total_max = mode.categories.iter().map(|c| c.max_score).sum();
        }
        Ok(Self { modes })
    }

    /// The resume and interview evaluators served by default.
    pub fn builtin() -> Result<Self, RegistryError> {
        Self::new(vec![resume_mode(), interview_mode()])
    }

    pub fn get(&self, mode_key: &str) -> Result<&ModeConfig, EvaluationError> {
        self.modes
            .iter()
            .find(|m| m.key == mode_key)
            .ok_or_else(|| EvaluationError::UnknownMode(mode_key.to_string()))
    }

    pub fn list(&self) -> &[ModeConfig] {
        &self.modes
    }
}

fn resume_mode() -> ModeConfig {
    let mut mode = ModeConfig::new(
        "resume",
        "Resume/CV Evaluator",
        "Evaluate resumes for job applications with detailed scoring",
        TotalSource::CategorySum,
        vec![
            category(
                "formatting",
                "Formatting & Presentation",
                25.0,
                "Layout, readability, visual appeal",
            ),
            category(
                "content",
                "Content Relevance",
                30.0,
                "Experience, qualifications, achievements",
            ),
            category(
                "keywords",
                "Keywords & Skills Match",
                25.0,
                "Industry terms, technical skills, ATS optimization",
            ),
            category(
                "tone",
                "Professional Tone",
                20.0,
                "Language, clarity, professionalism",
            ),
        ],
    );
    mode.input_fields = vec!["job_description".to_string(), "resume_file".to_string()];
    mode.accepts_file_upload = true;
    mode.allowed_extensions = vec![".pdf".to_string(), ".txt".to_string()];
    mode
}

fn interview_mode() -> ModeConfig {
    let mut mode = ModeConfig::new(
        "interview",
        "Interview Answer Evaluator",
        "Grade interview responses for job preparation",
        TotalSource::ProviderOverall,
        vec![
            category(
                "clarity",
                "Clarity & Communication",
                10.0,
                "Clear expression, articulation, coherence",
            ),
            category(
                "relevance",
                "Relevance to Question",
                10.0,
                "Addresses the question, stays on topic",
            ),
            category(
                "accuracy",
                "Technical Accuracy",
                10.0,
                "Correct information, domain knowledge",
            ),
            category(
                "confidence",
                "Confidence & Delivery",
                10.0,
                "Assertiveness, conviction, professional tone",
            ),
        ],
    );
    mode.input_fields = ["job_description", "job_role", "question", "answer"]
        .iter()
        .map(|f| f.to_string())
        .collect();
    mode.options = Some(ModeOptions {
        difficulty_levels: vec![
            DifficultyLevel {
                id: "easy".to_string(),
                name: "Easy".to_string(),
                description: "General behavioral and basic role-specific questions".to_string(),
            },
            DifficultyLevel {
                id: "medium".to_string(),
                name: "Medium".to_string(),
                description: "Scenario-based and intermediate technical questions".to_string(),
            },
            DifficultyLevel {
                id: "hard".to_string(),
                name: "Hard".to_string(),
                description: "Complex problem solving and advanced technical concepts".to_string(),
            },
        ],
        question_counts: vec![1, 3, 5, 10],
    });
    mode
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registers_resume_and_interview() {
        let registry = ModeRegistry::builtin().unwrap();
        let keys: Vec<&str> = registry.list().iter().map(|m| m.key.as_str()).collect();
        assert_eq!(keys, vec!["resume", "interview"]);
    }

    #[test]
    fn test_total_max_equals_sum_of_maxima() {
        let registry = ModeRegistry::builtin().unwrap();
        for mode in registry.list() {
            let sum: f64 = mode.categories.iter().map(|c| c.max_score).sum();
            assert_eq!(mode.total_max, sum, "mode {}", mode.key);
        }
        assert_eq!(registry.get("resume").unwrap().total_max, 100.0);
        assert_eq!(registry.get("interview").unwrap().total_max, 40.0);
    }

    #[test]
    fn test_category_sum_modes_total_100() {
        let registry = ModeRegistry::builtin().unwrap();
        for mode in registry.list() {
            if mode.total_source == TotalSource::CategorySum {
                assert_eq!(mode.total_max, TOTAL_SCALE);
            }
        }
    }

    #[test]
    fn test_unknown_mode_lookup_fails() {
        let registry = ModeRegistry::builtin().unwrap();
        let err = registry.get("essay").unwrap_err();
        assert!(matches!(err, EvaluationError::UnknownMode(ref k) if k == "essay"));
    }

    #[test]
    fn test_categories_keep_declaration_order() {
        let registry = ModeRegistry::builtin().unwrap();
        let keys: Vec<&str> = registry
            .get("resume")
            .unwrap()
            .categories
            .iter()
            .map(|c| c.key.as_str())
            .collect();
        assert_eq!(keys, vec!["formatting", "content", "keywords", "tone"]);
    }

    #[test]
    fn test_rejects_zero_max() {
        let mode = ModeConfig::new(
            "broken",
            "Broken",
            "",
            TotalSource::ProviderOverall,
            vec![category("a", "A", 0.0, "")],
        );
        assert_eq!(
            ModeRegistry::new(vec![mode]).unwrap_err(),
            RegistryError::NonPositiveMax {
                mode: "broken".to_string(),
                category: "a".to_string()
            }
        );
    }

    #[test]
    fn test_rejects_category_sum_not_100() {
        let mode = ModeConfig::new(
            "short",
            "Short",
            "",
            TotalSource::CategorySum,
            vec![category("a", "A", 40.0, ""), category("b", "B", 50.0, "")],
        );
        assert!(matches!(
            ModeRegistry::new(vec![mode]),
            Err(RegistryError::TotalMismatch { .. })
        ));
    }

    #[test]
    fn test_rejects_duplicate_mode_and_category() {
        let dup_cat = ModeConfig::new(
            "dup",
            "Dup",
            "",
            TotalSource::ProviderOverall,
            vec![category("a", "A", 5.0, ""), category("a", "A2", 5.0, "")],
        );
        assert!(matches!(
            ModeRegistry::new(vec![dup_cat]),
            Err(RegistryError::DuplicateCategory { .. })
        ));

        let err = ModeRegistry::new(vec![resume_mode(), resume_mode()]).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateMode("resume".to_string()));
    }
}
