//! Percentage bands shared by letter grades, category descriptors and summaries.
//! Every band is inclusive on its lower bound.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    Excellent,
    Good,
    Satisfactory,
    NeedsImprovement,
    Unsatisfactory,
}

impl Band {
    pub fn from_percentage(pct: f64) -> Self {
        match pct {
            p if p >= 90.0 => Band::Excellent,
            p if p >= 80.0 => Band::Good,
            p if p >= 70.0 => Band::Satisfactory,
            p if p >= 60.0 => Band::NeedsImprovement,
            _ => Band::Unsatisfactory,
        }
    }

    pub fn letter_grade(self) -> &'static str {
        match self {
            Band::Excellent => "A - Excellent",
            Band::Good => "B - Good",
            Band::Satisfactory => "C - Satisfactory",
            Band::NeedsImprovement => "D - Needs Improvement",
            Band::Unsatisfactory => "F - Unsatisfactory",
        }
    }

    /// Prefix used in per-category assessment strings.
    pub fn descriptor(self) -> &'static str {
        match self {
            Band::Excellent => "Excellent",
            Band::Good => "Good",
            Band::Satisfactory => "Satisfactory",
            Band::NeedsImprovement => "Needs improvement in",
            Band::Unsatisfactory => "Unsatisfactory",
        }
    }
}

/// Letter grade for a 0–100 total. Out-of-range totals are clamped first.
pub fn letter_grade(total: f64) -> &'static str {
    Band::from_percentage(total.clamp(0.0, 100.0)).letter_grade()
}

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
