use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Key under which the 0–100 total is stored alongside category scores.
pub const TOTAL_KEY: &str = "total";

/// Per-category feedback as supplied by a provider. Either list may be absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawFeedback {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strengths: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub improvements: Option<Vec<String>>,
}

/// Unformatted provider output. `scores: None` means the provider returned no data at all,
/// which is distinct from every category scoring zero.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawEvaluation {
    #[serde(default)]
    pub scores: Option<BTreeMap<String, f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_score: Option<f64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub feedback: BTreeMap<String, RawFeedback>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strengths: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub improvements: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_improved_answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl RawEvaluation {
    pub fn from_scores<I, K>(scores: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        Self {
            scores: Some(scores.into_iter().map(|(k, v)| (k.into(), v)).collect()),
            overall_score: None,
            feedback: BTreeMap::new(),
            summary: None,
            strengths: None,
            improvements: None,
            sample_improved_answer: None,
            metadata: None,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CategoryFeedback {
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
}

/// A value in the flat `formatted` map (`<cat>_pct`, `<cat>_assessment`, `<cat>_strengths`, ...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FormattedValue {
    Number(f64),
    Text(String),
    List(Vec<String>),
}

/// Display-ready evaluation. Created once by the formatter and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FormattedEvaluation {
    pub scores: BTreeMap<String, f64>,
    pub formatted: BTreeMap<String, FormattedValue>,
    pub feedback: BTreeMap<String, CategoryFeedback>,
    pub summary: String,
    pub mode: String,
    pub mode_display_name: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strengths: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub improvements: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_improved_answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl FormattedEvaluation {
    pub fn total(&self) -> f64 {
        self.scores.get(TOTAL_KEY).copied().unwrap_or_default()
    }

    pub fn letter_grade(&self) -> Option<&str> {
        match self.formatted.get("letter_grade") {
            Some(FormattedValue::Text(s)) => Some(s),
            _ => None,
        }
    }
}

#[cfg(test)]
impl FormattedEvaluation {
    pub fn pct(&self, category: &str) -> Option<f64> {
        match self.formatted.get(&format!("{category}_pct")) {
            Some(FormattedValue::Number(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn assessment(&self, category: &str) -> Option<&str> {
        match self.formatted.get(&format!("{category}_assessment")) {
            Some(FormattedValue::Text(s)) => Some(s),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_raw_evaluation_missing_scores_field() {
        let raw: RawEvaluation = serde_json::from_value(json!({ "overall_score": 80 })).unwrap();
        assert!(raw.scores.is_none());
        assert_eq!(raw.overall_score, Some(80.0));
    }

    #[test]
    fn test_raw_feedback_without_strengths() {
        let raw: RawEvaluation = serde_json::from_value(json!({
            "scores": { "tone": 12 },
            "feedback": { "tone": { "improvements": ["be bolder"] } }
        }))
        .unwrap();
        let fb = &raw.feedback["tone"];
        assert!(fb.strengths.is_none());
        assert_eq!(fb.improvements.as_deref(), Some(&["be bolder".to_string()][..]));
    }

    #[test]
    fn test_formatted_value_untagged_shapes() {
        let values: BTreeMap<String, FormattedValue> = serde_json::from_value(json!({
            "tone_pct": 62.5,
            "tone_assessment": "Needs improvement in Professional Tone",
            "tone_strengths": ["a", "b"]
        }))
        .unwrap();
        assert_eq!(values["tone_pct"], FormattedValue::Number(62.5));
        assert!(matches!(values["tone_assessment"], FormattedValue::Text(_)));
        assert!(matches!(values["tone_strengths"], FormattedValue::List(ref l) if l.len() == 2));
    }
}
