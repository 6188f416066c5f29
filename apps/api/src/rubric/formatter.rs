//! Rubric formatter — turns raw provider scores into a display-ready evaluation.
//!
//! Pure and synchronous: the same `RawEvaluation` and mode always produce the same
//! `FormattedEvaluation`. Structural problems (unknown mode, no scores at all) are errors;
//! everything else (missing categories, out-of-range scores, absent feedback) is defaulted
//! so a partially broken provider still yields a renderable result.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::rubric::bands::{letter_grade, round1, Band};
use crate::rubric::models::{
    CategoryFeedback, FormattedEvaluation, FormattedValue, RawEvaluation, TOTAL_KEY,
};
use crate::rubric::phrases::PhraseBook;
use crate::rubric::registry::{CategoryConfig, ModeConfig, ModeRegistry, TotalSource, TOTAL_SCALE};
use crate::rubric::EvaluationError;

/// Per-category numbers after clamping, kept for the summary pass.
#[derive(Debug, Clone)]
struct CategoryOutcome<'a> {
    config: &'a CategoryConfig,
    score: f64,
    pct: f64,
    reported: bool,
}

#[derive(Debug, Clone)]
pub struct RubricFormatter {
    registry: Arc<ModeRegistry>,
    phrases: PhraseBook,
}

impl RubricFormatter {
    pub fn new(registry: Arc<ModeRegistry>) -> Self {
        Self {
            registry,
            phrases: PhraseBook::builtin(),
        }
    }

    pub fn registry(&self) -> &ModeRegistry {
        &self.registry
    }

    pub fn format(
        &self,
        raw: &RawEvaluation,
        mode_key: &str,
    ) -> Result<FormattedEvaluation, EvaluationError> {
        let mode = self.registry.get(mode_key)?;
        self.format_for_mode(raw, mode)
    }

    pub(crate) fn format_for_mode(
        &self,
        raw: &RawEvaluation,
        mode: &ModeConfig,
    ) -> Result<FormattedEvaluation, EvaluationError> {
        let raw_scores = match raw.scores.as_ref() {
            Some(scores) if !scores.is_empty() => scores,
            _ => {
                return Err(EvaluationError::InvalidEvaluation(
                    "missing scores".to_string(),
                ))
            }
        };

        let outcomes: Vec<CategoryOutcome> = mode
            .categories
            .iter()
            .map(|config| {
                let reported = raw_scores.contains_key(&config.key);
                let score = finite_or_zero(raw_scores.get(&config.key).copied().unwrap_or(0.0));
                let (score, pct) = if config.max_score > 0.0 {
                    // `+ 0.0` folds a provider's -0.0 into 0.0.
                    let clamped = score.clamp(0.0, config.max_score) + 0.0;
                    (clamped, round1(clamped / config.max_score * 100.0))
                } else {
                    (0.0, 0.0)
                };
                CategoryOutcome {
                    config,
                    score,
                    pct,
                    reported,
                }
            })
            .collect();

        // Grade and summary band use the exact total; only the reported figure is rounded.
        let exact_total = finite_or_zero(compute_total(raw, mode, &outcomes)).clamp(0.0, 100.0);
        let total = round1(exact_total);
        let grade = letter_grade(exact_total);

        let mut scores = BTreeMap::new();
        let mut formatted = BTreeMap::new();
        let mut feedback = BTreeMap::new();

        for outcome in &outcomes {
            let key = &outcome.config.key;
            let category_feedback = self.category_feedback(raw, &mode.key, outcome);

            scores.insert(key.clone(), outcome.score);
            formatted.insert(format!("{key}_pct"), FormattedValue::Number(outcome.pct));
            formatted.insert(
                format!("{key}_assessment"),
                FormattedValue::Text(assessment(outcome)),
            );
            formatted.insert(
                format!("{key}_strengths"),
                FormattedValue::List(category_feedback.strengths.clone()),
            );
            formatted.insert(
                format!("{key}_improvements"),
                FormattedValue::List(category_feedback.improvements.clone()),
            );
            feedback.insert(key.clone(), category_feedback);
        }

        scores.insert(TOTAL_KEY.to_string(), total);
        formatted.insert("total_pct".to_string(), FormattedValue::Number(total));
        formatted.insert(
            "letter_grade".to_string(),
            FormattedValue::Text(grade.to_string()),
        );

        let summary = match raw.summary.as_deref() {
            Some(s) if !s.trim().is_empty() => s.to_string(),
            _ => overall_summary(mode, exact_total, &outcomes),
        };

        Ok(FormattedEvaluation {
            scores,
            formatted,
            feedback,
            summary,
            mode: mode.key.clone(),
            mode_display_name: mode.name.clone(),
            timestamp: raw.timestamp,
            overall_score: raw.overall_score,
            strengths: raw.strengths.clone(),
            improvements: raw.improvements.clone(),
            sample_improved_answer: raw.sample_improved_answer.clone(),
            metadata: raw.metadata.clone(),
        })
    }

    /// Provider feedback wins when it carries a strengths list; otherwise it is synthesized.
    fn category_feedback(
        &self,
        raw: &RawEvaluation,
        mode_key: &str,
        outcome: &CategoryOutcome,
    ) -> CategoryFeedback {
        let provided = raw
            .feedback
            .get(&outcome.config.key)
            .and_then(|fb| fb.strengths.as_ref().map(|s| (s, &fb.improvements)));

        match provided {
            Some((strengths, improvements)) => CategoryFeedback {
                strengths: strengths.clone(),
                improvements: improvements.clone().unwrap_or_default(),
            },
            None => self
                .phrases
                .synthesize(mode_key, &outcome.config.key, outcome.pct),
        }
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

fn compute_total(raw: &RawEvaluation, mode: &ModeConfig, outcomes: &[CategoryOutcome]) -> f64 {
    if mode.total_source == TotalSource::ProviderOverall {
        if let Some(overall) = raw.overall_score.filter(|v| v.is_finite()) {
            return overall;
        }
    }
    let sum: f64 = outcomes.iter().map(|o| o.score).sum();
    if mode.total_max > 0.0 {
        sum / mode.total_max * TOTAL_SCALE
    } else {
        0.0
    }
}

fn assessment(outcome: &CategoryOutcome) -> String {
    let name = &outcome.config.name;
    if outcome.config.max_score <= 0.0 {
        return format!("N/A {name}");
    }
    format!(
        "{} {name} (Score: {}/{}, {:.1}%)",
        Band::from_percentage(outcome.pct).descriptor(),
        outcome.score,
        outcome.config.max_score,
        outcome.pct
    )
}

fn overall_summary(mode: &ModeConfig, total: f64, outcomes: &[CategoryOutcome]) -> String {
    let band = Band::from_percentage(total);
    let grade = band.letter_grade();
    let name = mode.name.to_lowercase();

    let opening = match band {
        Band::Excellent => format!("This is an excellent {name} performance ({grade})."),
        Band::Good => format!("This is a good {name} performance ({grade})."),
        Band::Satisfactory => format!("This is a satisfactory {name} performance ({grade})."),
        Band::NeedsImprovement => format!("This {name} needs improvement ({grade})."),
        Band::Unsatisfactory => {
            format!("This {name} has significant issues that need addressing ({grade}).")
        }
    };

    let mut strongest: Option<&CategoryOutcome> = None;
    let mut weakest: Option<&CategoryOutcome> = None;
    for outcome in outcomes.iter().filter(|o| o.reported) {
        if strongest.map_or(true, |s| outcome.pct > s.pct) {
            strongest = Some(outcome);
        }
        if weakest.map_or(true, |w| outcome.pct < w.pct) {
            weakest = Some(outcome);
        }
    }

    match (strongest, weakest) {
        (Some(strong), Some(weak)) => format!(
            "{opening} The strongest aspect is {} while {} needs the most attention.",
            strong.config.name, weak.config.name
        ),
        _ => opening,
    }
}
