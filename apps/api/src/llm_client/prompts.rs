// Cross-cutting prompt fragments. Mode-specific prompts live in evaluation/prompts.rs.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Keeps scores inside each category's declared range.
pub const SCORE_RANGE_INSTRUCTION: &str = "\
    CRITICAL: Score every listed category, and keep each score between 0 and that \
    category's max_score. Use one decimal place at most. Never omit a category.";
