// Evaluation prompt templates. `{name}` placeholders are filled by `llm::fill_template`.

pub const EVALUATION_SYSTEM: &str = "\
You are an experienced hiring manager and career coach. \
You grade submissions strictly against the rubric you are given. \
You MUST respond with valid JSON only — no markdown fences, no explanations. \
Be specific and actionable in feedback; never invent facts about the candidate.";

pub const RESUME_EVALUATION_PROMPT: &str = r#"Evaluate the following resume against the job description using the rubric.

RUBRIC ({mode_name}):
{rubric}

JOB DESCRIPTION:
{job_description}

RESUME:
{resume_text}

OUTPUT SCHEMA (return exactly this structure):
{
  "scores": { "<category_key>": number },
  "feedback": {
    "<category_key>": { "strengths": ["string"], "improvements": ["string"] }
  },
  "summary": "string (2-3 sentences)"
}"#;

pub const INTERVIEW_EVALUATION_PROMPT: &str = r#"Evaluate the following interview answer using the rubric.

RUBRIC ({mode_name}):
{rubric}

JOB ROLE: {job_role}

JOB DESCRIPTION:
{job_description}

QUESTION:
{question}

ANSWER:
{answer}

OUTPUT SCHEMA (return exactly this structure):
{
  "scores": { "<category_key>": number },
  "overall_score": number (0-100),
  "strengths": ["string"],
  "improvements": ["string"],
  "sample_improved_answer": "string"
}"#;
