// Shared prompt fragments.
// Each feature that calls the model defines its own prompts.rs alongside it.
// This file contains cross-cutting instructions appended to those prompts.

/// Appended to every structured-output system instruction.
pub const STRICT_JSON_INSTRUCTION: &str = "\
    Output the result as a single strict JSON object adhering to the provided schema. \
    Do NOT wrap the JSON in markdown code fences. \
    Do NOT add any text before or after the JSON object. \
    Do NOT truncate the JSON structure: close every string, array and object.";

/// Instruction that keeps long structured answers inside the output token budget.
pub const CONCISENESS_INSTRUCTION: &str = "\
    CRITICAL: Be CONCISE. Keep descriptions short and to the point. \
    Prefer short bullet-style list items over paragraphs so the full answer \
    fits within the response token limit.";
