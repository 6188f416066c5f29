//! Canned strengths/improvements, keyed by (mode, category).
//!
//! Three tiers per category: excellent (≥90%), satisfactory (≥70%) and weak.
//! Pairs with no entry fall back to a generic phrase keyed only on percentage.

use crate::rubric::models::CategoryFeedback;

/// One strength and one improvement.
#[derive(Debug, Clone, Copy)]
pub struct Tier {
    pub strength: &'static str,
    pub improvement: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct CategoryPhrases {
    pub mode: &'static str,
    pub category: &'static str,
    pub excellent: [&'static str; 2],
    pub satisfactory: Tier,
    pub weak: Tier,
}

const fn tier(strength: &'static str, improvement: &'static str) -> Tier {
    Tier {
        strength,
        improvement,
    }
}

const BUILTIN_PHRASES: &[CategoryPhrases] = &[
    // ── essay ───────────────────────────────────────────────────────────────
    CategoryPhrases {
        mode: "essay",
        category: "grammar",
        excellent: [
            "Excellent grammar demonstrated.",
            "Consistently correct use of punctuation and sentence structure.",
        ],
        satisfactory: tier(
            "Satisfactory grammar with some errors.",
            "Address grammatical inconsistencies throughout the essay.",
        ),
        weak: tier(
            "Some correctly structured sentences present.",
            "Significant grammar issues need addressing throughout.",
        ),
    },
    CategoryPhrases {
        mode: "essay",
        category: "structure",
        excellent: [
            "Excellent structural organization demonstrated.",
            "Clear introduction, well-developed body paragraphs, and strong conclusion.",
        ],
        satisfactory: tier(
            "Satisfactory structure with clear sections.",
            "Focus on developing a stronger thesis and supporting arguments.",
        ),
        weak: tier(
            "Attempt at essay structure is evident.",
            "Significant issues in structure need addressing.",
        ),
    },
    CategoryPhrases {
        mode: "essay",
        category: "content",
        excellent: [
            "Excellent content with insightful analysis.",
            "Strong evidence and examples support all major points.",
        ],
        satisfactory: tier(
            "Satisfactory content addressing the main topic.",
            "Deepen analysis and expand on key points.",
        ),
        weak: tier(
            "Some relevant points are addressed.",
            "Significant content development needed throughout.",
        ),
    },
    CategoryPhrases {
        mode: "essay",
        category: "style",
        excellent: [
            "Excellent writing style with engaging tone.",
            "Varied sentence structure and precise word choice.",
        ],
        satisfactory: tier(
            "Satisfactory style appropriate for academic writing.",
            "Vary sentence structure for a more engaging flow.",
        ),
        weak: tier(
            "Some appropriate word choices present.",
            "Significant stylistic improvements needed throughout.",
        ),
    },
    // ── resume ──────────────────────────────────────────────────────────────
    CategoryPhrases {
        mode: "resume",
        category: "formatting",
        excellent: [
            "Clean and professional layout.",
            "Excellent use of white space and consistent formatting.",
        ],
        satisfactory: tier(
            "Overall readable layout.",
            "Improve consistency in font sizes and bullet points.",
        ),
        weak: tier(
            "Basic contact info present.",
            "Format is cluttered or unprofessional; consider using a template.",
        ),
    },
    CategoryPhrases {
        mode: "resume",
        category: "content",
        excellent: [
            "Highly relevant experience demonstrated.",
            "Strong focus on achievements and quantifiable results.",
        ],
        satisfactory: tier(
            "Relevant skills and experience listed.",
            "Use more action verbs and quantify your achievements (e.g., %, $).",
        ),
        weak: tier(
            "Some work history included.",
            "Content lacks focus or relevance to the target job description.",
        ),
    },
    CategoryPhrases {
        mode: "resume",
        category: "keywords",
        excellent: [
            "Excellent alignment with industry keywords.",
            "Strong match for the target job requirements.",
        ],
        satisfactory: tier(
            "Most relevant technical skills included.",
            "Add more specific keywords from the job description for better ATS scoring.",
        ),
        weak: tier(
            "Some industry terms present.",
            "Missing critical skills or keywords requested in the JD.",
        ),
    },
    CategoryPhrases {
        mode: "resume",
        category: "tone",
        excellent: [
            "Perfectly professional and confident tone.",
            "Clear and concise language used throughout.",
        ],
        satisfactory: tier(
            "Generally professional tone.",
            "Avoid passive voice and make descriptions more direct and punchy.",
        ),
        weak: tier(
            "Appropriate contact info tone.",
            "Tone is either too casual or overly wordy.",
        ),
    },
    // ── interview ───────────────────────────────────────────────────────────
    CategoryPhrases {
        mode: "interview",
        category: "clarity",
        excellent: [
            "Highly articulate and easy to follow.",
            "Logical structure and clear main points.",
        ],
        satisfactory: tier(
            "Generally clear communication.",
            "Try to use fewer filler words (um, like) and speak more concisely.",
        ),
        weak: tier(
            "Main idea is understandable.",
            "Response is rambling or difficult to follow.",
        ),
    },
    CategoryPhrases {
        mode: "interview",
        category: "relevance",
        excellent: [
            "Directly addresses the question asked.",
            "Provides specific and relevant examples (STAR method).",
        ],
        satisfactory: tier(
            "Response is mostly on-topic.",
            "Ensure every part of your answer directly ties back to the original question.",
        ),
        weak: tier(
            "Answer touches on relevant topics.",
            "Answer is too generic or misses the core of the question.",
        ),
    },
    CategoryPhrases {
        mode: "interview",
        category: "accuracy",
        excellent: [
            "Demonstrates deep technical knowledge.",
            "Accurate information and industry-standard terminology.",
        ],
        satisfactory: tier(
            "Generally accurate technical info.",
            "Be more specific with technical details or double-check specific facts.",
        ),
        weak: tier(
            "Shows basic understanding.",
            "Technical errors or lack of depth in the explanation.",
        ),
    },
    CategoryPhrases {
        mode: "interview",
        category: "confidence",
        excellent: [
            "Strong, assertive, and professional delivery.",
            "Shows enthusiasm and professional presence.",
        ],
        satisfactory: tier(
            "Generally confident delivery.",
            "Work on ending your sentences with authority (avoiding 'upspeak').",
        ),
        weak: tier(
            "Keeps appropriate professional tone.",
            "Appears hesitant or lacks conviction in the answer.",
        ),
    },
];

/// Lookup table plus the generic fallback rule.
#[derive(Debug, Clone, Copy)]
pub struct PhraseBook {
    entries: &'static [CategoryPhrases],
}

impl Default for PhraseBook {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PhraseBook {
    pub const fn builtin() -> Self {
        Self {
            entries: BUILTIN_PHRASES,
        }
    }

    #[cfg(test)]
    pub const fn with_entries(entries: &'static [CategoryPhrases]) -> Self {
        Self { entries }
    }

    pub fn lookup(&self, mode: &str, category: &str) -> Option<&CategoryPhrases> {
        self.entries
            .iter()
            .find(|p| p.mode == mode && p.category == category)
    }

    /// Strengths/improvements for a category at `pct` (0–100, already clamped).
    pub fn synthesize(&self, mode: &str, category: &str, pct: f64) -> CategoryFeedback {
        let mut strengths = Vec::new();
        let mut improvements = Vec::new();

        if let Some(phrases) = self.lookup(mode, category) {
            if pct >= 90.0 {
                strengths.extend(phrases.excellent.iter().map(|s| s.to_string()));
            } else {
                let tier = if pct >= 70.0 {
                    phrases.satisfactory
                } else {
                    phrases.weak
                };
                strengths.push(tier.strength.to_string());
                improvements.push(tier.improvement.to_string());
            }
        }

        if strengths.is_empty() {
            strengths.push(if pct >= 70.0 {
                format!("Satisfactory performance in {category}.")
            } else {
                format!("Attempted to address {category}.")
            });
        }
        if improvements.is_empty() && pct < 90.0 {
            improvements.push(format!("Continue refining {category} for better results."));
        }

        CategoryFeedback {
            strengths,
            improvements,
        }
    }
}
