//! Heuristic provider — deterministic, offline scoring from surface features of the text.
//!
//! Each category is scored from a 0–1 signal mapped onto `[FLOOR, FLOOR + SPAN]` of the
//! category max, so an honest attempt never lands at zero and nothing reaches a perfect score
//! on heuristics alone.
//!
//! Resume signals:
//! - formatting: bullet share, recognisable section headings, overall length
//! - content: quantified lines, distinct action verbs, length
//! - keywords: coverage of job-description keywords
//! - tone: first-person / casual vocabulary and "responsible for" phrasing
//!
//! Interview signals:
//! - clarity: sentence length, filler words
//! - relevance: coverage of question keywords, STAR markers
//! - accuracy: coverage of role/JD keywords, concrete numbers, depth
//! - confidence: hedging phrases per 100 words

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;

use crate::evaluation::text::{
    count_phrases, coverage, has_number, keywords, sentences, within, words,
};
use crate::evaluation::{EvaluationInputs, EvaluationProvider, ProviderError};
use crate::rubric::bands::round1;
use crate::rubric::models::RawEvaluation;
use crate::rubric::registry::ModeConfig;

const FLOOR: f64 = 0.5;
const SPAN: f64 = 0.45;
/// Used when there is nothing to compare against (e.g. empty job description).
const NEUTRAL: f64 = 0.5;

const SECTION_HEADINGS: &[&str] = &[
    "summary",
    "profile",
    "experience",
    "employment",
    "education",
    "skills",
    "projects",
    "certifications",
    "awards",
    "publications",
];

const ACTION_VERBS: &[&str] = &[
    "led", "built", "designed", "developed", "implemented", "managed", "improved", "reduced",
    "increased", "launched", "delivered", "created", "optimized", "automated", "architected",
    "mentored", "shipped", "migrated",
];

const CASUAL_WORDS: &[&str] = &[
    "i", "me", "my", "lol", "stuff", "things", "awesome", "kinda", "gonna", "wanna", "cool",
];

const FILLER_WORDS: &[&str] = &["um", "uh", "like", "basically", "actually", "you know"];

const STAR_MARKERS: &[&str] = &[
    "situation",
    "task",
    "action",
    "result",
    "resulted",
    "outcome",
    "impact",
    "learned",
];

const HEDGES: &[&str] = &[
    "maybe",
    "perhaps",
    "probably",
    "i think",
    "i guess",
    "sort of",
    "kind of",
    "not sure",
    "i believe",
    "hopefully",
];

#[derive(Debug, Clone, Default)]
pub struct HeuristicProvider {
    /// Artificial latency before answering, to exercise the async path like a remote scorer.
    delay: Duration,
}

impl HeuristicProvider {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl EvaluationProvider for HeuristicProvider {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    async fn evaluate(
        &self,
        mode: &ModeConfig,
        inputs: &EvaluationInputs,
    ) -> Result<RawEvaluation, ProviderError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let signals = match (mode.key.as_str(), inputs) {
            (
                "resume",
                EvaluationInputs::Resume {
                    job_description,
                    resume_text,
                    ..
                },
            ) => resume_signals(resume_text, job_description),
            (
                "interview",
                EvaluationInputs::Interview {
                    question,
                    answer,
                    job_role,
                    job_description,
                },
            ) => interview_signals(question, answer, job_role, job_description),
            _ => return Err(ProviderError::UnsupportedMode(mode.key.clone())),
        };

        let scores: BTreeMap<String, f64> = mode
            .categories
            .iter()
            .map(|cat| {
                let signal = signals.get(cat.key.as_str()).copied().unwrap_or(NEUTRAL);
                (cat.key.clone(), scale(signal, cat.max_score))
            })
            .collect();

        let mut raw = RawEvaluation::from_scores(scores);
        raw.timestamp = Utc::now();
        raw.metadata = Some(json!({
            "mode": mode.key,
            "provider": self.name(),
            "input_length": inputs.input_length(),
        }));

        if let EvaluationInputs::Interview {
            answer, job_role, ..
        } = inputs
        {
            decorate_interview(&mut raw, mode, answer, job_role);
        }

        Ok(raw)
    }
}

fn scale(signal: f64, max: f64) -> f64 {
    round1(max * (FLOOR + SPAN * signal.clamp(0.0, 1.0)))
}

fn resume_signals(resume: &str, job_description: &str) -> BTreeMap<&'static str, f64> {
    let lines: Vec<&str> = resume
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    let word_count = words(resume).len() as f64;
    let length = within(word_count, 200.0, 900.0);

    let bullets: Vec<&str> = lines
        .iter()
        .copied()
        .filter(|l| l.starts_with(['-', '*', '•', '·']))
        .collect();
    let bullet_share = if lines.is_empty() {
        0.0
    } else {
        bullets.len() as f64 / lines.len() as f64
    };
    let headings = lines
        .iter()
        .filter(|l| {
            let lw = words(l);
            lw.len() <= 4 && lw.iter().any(|w| SECTION_HEADINGS.contains(&w.as_str()))
        })
        .count() as f64;
    let formatting =
        0.4 * (bullet_share / 0.4).min(1.0) + 0.4 * (headings / 3.0).min(1.0) + 0.2 * length;

    let claim_lines = if bullets.is_empty() { &lines } else { &bullets };
    let quantified = if claim_lines.is_empty() {
        0.0
    } else {
        claim_lines.iter().filter(|l| has_number(l)).count() as f64 / claim_lines.len() as f64
    };
    let resume_words = words(resume);
    let verbs = ACTION_VERBS
        .iter()
        .filter(|v| resume_words.iter().any(|w| w == *v))
        .count() as f64;
    let content = 0.5 * (quantified / 0.5).min(1.0) + 0.3 * (verbs / 6.0).min(1.0) + 0.2 * length;

    let keyword_match = coverage(&keywords(job_description), &keywords(resume))
        .map(|c| (c / 0.6).min(1.0))
        .unwrap_or(NEUTRAL);

    let casual_rate = if word_count > 0.0 {
        count_phrases(resume, CASUAL_WORDS) as f64 / word_count
    } else {
        1.0
    };
    let passive = count_phrases(resume, &["responsible for"]) as f64;
    let tone = (1.0 - (casual_rate * 20.0).min(1.0) - (passive * 0.1).min(0.3)).max(0.0);

    BTreeMap::from([
        ("formatting", formatting),
        ("content", content),
        ("keywords", keyword_match),
        ("tone", tone),
    ])
}

fn interview_signals(
    question: &str,
    answer: &str,
    job_role: &str,
    job_description: &str,
) -> BTreeMap<&'static str, f64> {
    let word_count = words(answer).len() as f64;
    let answer_keywords = keywords(answer);

    let sentence_list = sentences(answer);
    let avg_sentence = if sentence_list.is_empty() {
        0.0
    } else {
        sentence_list.iter().map(|s| words(s).len()).sum::<usize>() as f64
            / sentence_list.len() as f64
    };
    let filler_rate = if word_count > 0.0 {
        count_phrases(answer, FILLER_WORDS) as f64 / word_count
    } else {
        1.0
    };
    let clarity = 0.7 * within(avg_sentence, 10.0, 25.0) + 0.3 * (1.0 - (filler_rate * 10.0).min(1.0));

    let on_topic = coverage(&keywords(question), &answer_keywords)
        .map(|c| (c / 0.5).min(1.0))
        .unwrap_or(NEUTRAL);
    let star = STAR_MARKERS
        .iter()
        .filter(|m| answer_keywords.contains(**m))
        .count() as f64;
    let relevance = 0.7 * on_topic + 0.3 * (star / 3.0).min(1.0);

    let domain = coverage(
        &keywords(&format!("{job_role} {job_description}")),
        &answer_keywords,
    )
    .map(|c| (c / 0.3).min(1.0))
    .unwrap_or(NEUTRAL);
    let concrete = if has_number(answer) { 1.0 } else { 0.0 };
    let depth = (word_count / 80.0).min(1.0);
    let accuracy = 0.6 * domain + 0.2 * concrete + 0.2 * depth;

    let hedges_per_100 = if word_count > 0.0 {
        count_phrases(answer, HEDGES) as f64 * 100.0 / word_count
    } else {
        100.0
    };
    let confidence = 1.0 - (hedges_per_100 / 5.0).min(1.0);

    BTreeMap::from([
        ("clarity", clarity),
        ("relevance", relevance),
        ("accuracy", accuracy),
        ("confidence", confidence),
    ])
}

/// Interview answers carry their own 0–100 total plus top-level bullets and a sample answer.
fn decorate_interview(raw: &mut RawEvaluation, mode: &ModeConfig, answer: &str, job_role: &str) {
    let scores = raw.scores.clone().unwrap_or_default();
    let get = |key: &str| scores.get(key).copied().unwrap_or(0.0);

    let sum: f64 = mode.categories.iter().map(|c| get(&c.key)).sum();
    let overall = if mode.total_max > 0.0 {
        round1(sum / mode.total_max * 100.0)
    } else {
        0.0
    };

    let mut strengths = Vec::new();
    let mut improvements = Vec::new();
    let rules: [(&str, &str, &str, &str); 4] = [
        (
            "clarity",
            "Clear and well-structured response",
            "Generally clear communication",
            "Work on structuring your response more clearly",
        ),
        (
            "relevance",
            "Directly addresses the question with relevant examples",
            "Response is mostly on-topic",
            "Ensure your answer directly addresses all parts of the question",
        ),
        (
            "accuracy",
            "Demonstrates strong technical knowledge",
            "Shows good understanding of the topic",
            "Add more specific technical details or examples",
        ),
        (
            "confidence",
            "Professional and confident delivery",
            "Maintains professional tone",
            "Use more assertive language to convey confidence",
        ),
    ];
    for (key, strong, fair, weak) in rules {
        let score = get(key);
        if score >= 8.0 {
            strengths.push(strong.to_string());
        } else if score >= 7.0 {
            strengths.push(fair.to_string());
        } else {
            improvements.push(weak.to_string());
        }
    }
    if overall < 80.0 {
        if words(answer).len() < 50 {
            improvements.push("Provide more detailed examples using the STAR method".to_string());
        }
        improvements.push("Consider adding quantifiable achievements or results".to_string());
    }

    let role = if job_role.trim().is_empty() {
        "professional"
    } else {
        job_role.trim()
    };
    raw.overall_score = Some(overall);
    raw.strengths = Some(strengths);
    raw.improvements = Some(improvements);
    raw.sample_improved_answer = Some(format!(
        "In my role as a {role}, I encountered a similar situation. \
         I approached it by [specific action], which resulted in [measurable outcome]. \
         This experience taught me [key learning], which I would apply in this role."
    ));
    if let Some(meta) = raw.metadata.as_mut() {
        meta["job_role"] = json!(job_role);
        meta["answer_length"] = json!(answer.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rubric::registry::ModeRegistry;

    const STRONG_RESUME: &str = "\
Jane Doe
Summary
Senior Rust engineer focused on distributed systems.
Experience
- Led migration of payment services to Rust, cutting p99 latency by 40%
- Built Kubernetes operators managing 300 clusters
- Designed event pipeline processing $2M daily in transactions
- Mentored 5 engineers and improved onboarding time by 30%
- Automated release tooling, reducing deploy time from 2h to 10m
Skills
- Rust, Kubernetes, PostgreSQL, Kafka, gRPC
Education
- BSc Computer Science, 2015";

    const WEAK_RESUME: &str = "i did lots of stuff at my job and it was awesome. \
        i was responsible for things. i was responsible for other things too lol";

    const JD: &str = "We need a Rust engineer with Kubernetes, PostgreSQL and Kafka experience \
        to build distributed payment systems.";

    fn registry() -> ModeRegistry {
        ModeRegistry::builtin().unwrap()
    }

    fn resume(text: &str, jd: &str) -> EvaluationInputs {
        EvaluationInputs::Resume {
            job_description: jd.to_string(),
            resume_text: text.to_string(),
            filename: None,
        }
    }

    fn interview(answer: &str) -> EvaluationInputs {
        EvaluationInputs::Interview {
            question: "Tell me about a time you improved system performance.".to_string(),
            answer: answer.to_string(),
            job_role: "Backend Engineer".to_string(),
            job_description: "Backend services in Rust with PostgreSQL".to_string(),
        }
    }

    #[tokio::test]
    async fn test_resume_scores_every_category_within_range() {
        let registry = registry();
        let mode = registry.get("resume").unwrap();
        let raw = HeuristicProvider::default()
            .evaluate(mode, &resume(STRONG_RESUME, JD))
            .await
            .unwrap();
        let scores = raw.scores.unwrap();
        for cat in &mode.categories {
            let s = scores[&cat.key];
            assert!(s >= cat.max_score * FLOOR && s <= cat.max_score, "{} = {s}", cat.key);
        }
        assert!(raw.overall_score.is_none());
    }

    #[tokio::test]
    async fn test_strong_resume_beats_weak_resume() {
        let registry = registry();
        let mode = registry.get("resume").unwrap();
        let provider = HeuristicProvider::default();
        let strong = provider.evaluate(mode, &resume(STRONG_RESUME, JD)).await.unwrap();
        let weak = provider.evaluate(mode, &resume(WEAK_RESUME, JD)).await.unwrap();
        let (strong, weak) = (strong.scores.unwrap(), weak.scores.unwrap());
        for key in ["formatting", "content", "keywords", "tone"] {
            assert!(strong[key] > weak[key], "{key}: {} vs {}", strong[key], weak[key]);
        }
    }

    #[tokio::test]
    async fn test_empty_job_description_gives_neutral_keywords() {
        let registry = registry();
        let mode = registry.get("resume").unwrap();
        let raw = HeuristicProvider::default()
            .evaluate(mode, &resume(STRONG_RESUME, ""))
            .await
            .unwrap();
        assert_eq!(raw.scores.unwrap()["keywords"], scale(NEUTRAL, 25.0));
    }

    #[tokio::test]
    async fn test_same_input_same_scores() {
        let registry = registry();
        let mode = registry.get("interview").unwrap();
        let provider = HeuristicProvider::default();
        let inputs = interview("I reduced query latency by 60% by adding PostgreSQL indexes.");
        let a = provider.evaluate(mode, &inputs).await.unwrap();
        let b = provider.evaluate(mode, &inputs).await.unwrap();
        assert_eq!(a.scores, b.scores);
        assert_eq!(a.overall_score, b.overall_score);
    }

    #[tokio::test]
    async fn test_interview_overall_is_scaled_category_sum() {
        let registry = registry();
        let mode = registry.get("interview").unwrap();
        let raw = HeuristicProvider::default()
            .evaluate(
                mode,
                &interview(
                    "In my last backend role the situation was a slow checkout service. \
                     I profiled the Rust code and found an unindexed PostgreSQL query. \
                     I added an index and a cache layer. The result was a 60% drop in latency.",
                ),
            )
            .await
            .unwrap();
        let scores = raw.scores.as_ref().unwrap();
        let sum: f64 = mode.categories.iter().map(|c| scores[&c.key]).sum();
        assert_eq!(raw.overall_score, Some(round1(sum / 40.0 * 100.0)));
        assert!(raw.sample_improved_answer.unwrap().contains("Backend Engineer"));
        assert_eq!(raw.metadata.unwrap()["job_role"], "Backend Engineer");
    }

    #[tokio::test]
    async fn test_hedging_lowers_confidence() {
        let registry = registry();
        let mode = registry.get("interview").unwrap();
        let provider = HeuristicProvider::default();
        let assertive = provider
            .evaluate(mode, &interview("I improved performance by rewriting the hot path in Rust."))
            .await
            .unwrap();
        let hedging = provider
            .evaluate(
                mode,
                &interview("Maybe I improved performance, I think, probably by rewriting stuff."),
            )
            .await
            .unwrap();
        assert!(
            assertive.scores.unwrap()["confidence"] > hedging.scores.unwrap()["confidence"]
        );
    }

    #[tokio::test]
    async fn test_short_weak_answer_gets_star_improvement() {
        let registry = registry();
        let mode = registry.get("interview").unwrap();
        let raw = HeuristicProvider::default()
            .evaluate(mode, &interview("um maybe"))
            .await
            .unwrap();
        let improvements = raw.improvements.unwrap();
        assert!(improvements
            .iter()
            .any(|i| i.contains("STAR method")));
        assert!(raw.overall_score.unwrap() < 80.0);
    }

    #[tokio::test]
    async fn test_mismatched_inputs_are_unsupported() {
        let registry = registry();
        let mode = registry.get("resume").unwrap();
        let err = HeuristicProvider::default()
            .evaluate(mode, &interview("answer"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::UnsupportedMode(ref m) if m == "resume"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulated_delay_is_respected() {
        let registry = registry();
        let mode = registry.get("resume").unwrap();
        let provider = HeuristicProvider::new(Duration::from_secs(2));
        let started = tokio::time::Instant::now();
        provider
            .evaluate(mode, &resume(STRONG_RESUME, JD))
            .await
            .unwrap();
        assert!(started.elapsed() >= Duration::from_secs(2));
    }
}
