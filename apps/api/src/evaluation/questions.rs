//! Interview question generation from fixed, difficulty-specific pools.
//!
//! Selection is deterministic: the pool is rotated by a seed derived from the role, so the
//! same role and level always yield the same questions while different roles vary.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Unknown levels fall back to medium.
    pub fn parse(level: &str) -> Self {
        match level.trim().to_lowercase().as_str() {
            "easy" => Difficulty::Easy,
            "hard" => Difficulty::Hard,
            _ => Difficulty::Medium,
        }
    }

    fn pool(self) -> &'static [&'static str] {
        match self {
            Difficulty::Easy => EASY,
            Difficulty::Medium => MEDIUM,
            Difficulty::Hard => HARD,
        }
    }
}

const EASY: &[&str] = &[
    "Tell me about yourself and your interest in the {role} role.",
    "What are your greatest strengths as a {role}?",
    "Why do you want to work at this company?",
    "Describe a time you worked well in a team.",
    "How do you handle deadlines and pressure?",
    "What motivates you in your work as a {role}?",
    "Where do you see yourself in 5 years in the {role} field?",
    "What do you know about our company and why do you want to join us?",
];

const MEDIUM: &[&str] = &[
    "Tell me about a time you had to solve a difficult problem as a {role}.",
    "How do you stay updated with the latest trends in {role} field?",
    "Describe a situation where you had to deal with a difficult colleague/client.",
    "What is your approach to learning new tools or technologies for {role}?",
    "Explain a complex project you worked on recently.",
    "How do you prioritize tasks when you have multiple deadlines?",
    "Describe a time when you had to adapt to a significant change at work.",
    "What strategies do you use to ensure quality in your work as a {role}?",
];

const HARD: &[&str] = &[
    "Describe a time you failed and how you handled the fallout.",
    "How would you handle a situation where your project is significantly behind schedule?",
    "What is the most challenging technical problem you've faced as a {role} and how did you resolve it?",
    "Tell me about a time you had to make an unpopular decision for the sake of the project.",
    "How do you approach strategic planning for a {role} function?",
    "Describe a situation where you had to influence stakeholders without direct authority.",
    "How would you handle a conflict between team members with different technical opinions?",
    "What would you do if you discovered a critical flaw in a product just before launch?",
];

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GeneratedQuestions {
    pub mode: &'static str,
    pub difficulty: Difficulty,
    pub questions: Vec<String>,
}

/// Returns `count` questions (at least one, at most the pool size) for `role` at `level`.
pub fn generate_questions(role: &str, level: &str, count: usize) -> GeneratedQuestions {
    let difficulty = Difficulty::parse(level);
    let pool = difficulty.pool();
    let count = count.clamp(1, pool.len());
    let role = role.trim();
    let seed = role
        .to_lowercase()
        .bytes()
        .fold(0usize, |acc, b| acc.wrapping_mul(31).wrapping_add(b as usize));
    let offset = seed % pool.len();

    let questions = (0..count)
        .map(|i| pool[(offset + i) % pool.len()].replace("{role}", role))
        .collect();

    GeneratedQuestions {
        mode: "question_generation",
        difficulty,
        questions,
    }
}
