//! System prompts for the three conversation stages.
//!
//! Every stage prompt is assembled by [`build_system_prompt`] from a
//! role, a task, and an output-format instruction, so the instruction
//! shape stays uniform across stages.

use crate::ports::ChatMessage;

/// Assembles a system message from role/task/format parts.
pub fn build_system_prompt(role: &str, task: &str, format: &str) -> ChatMessage {
    ChatMessage::system(format!(
        "You are {role}.\n\nTask: {task}\n\nOutput format: {format}\n\nFollow the requirements exactly."
    ))
}

/// System prompt for the framework-matching stage.
pub fn framework_matching_system_prompt() -> ChatMessage {
    build_system_prompt(
        "a prompt engineering expert",
        "Analyze the user's request and recommend the 2 best-suited prompt \
         frameworks from the provided list",
        "Return the recommendations as JSON with each framework's name, the \
         reason it fits, its complexity, and its element count. Ordering rule: \
         put the more recommended or more demanding framework first. Shape:\n\
         ```json\n\
         {\n\
         \x20 \"frameworks\": [\n\
         \x20   {\n\
         \x20     \"name\": \"Framework name\",\n\
         \x20     \"nameEn\": \"Framework Name\",\n\
         \x20     \"reason\": \"Why it fits this request\",\n\
         \x20     \"complexity\": \"Simple/Medium/Complex\",\n\
         \x20     \"elements\": 5\n\
         \x20   }\n\
         \x20 ]\n\
         }\n\
         ```",
    )
}

/// System prompt for one clarification round.
///
/// On the final allowed round the model is ordered to report completion
/// unconditionally; the round ceiling is a hard limit, not a heuristic.
pub fn clarification_system_prompt(current_round: u32, max_rounds: u32) -> ChatMessage {
    let remaining = max_rounds.saturating_sub(current_round);
    let is_last_round = remaining == 0;

    let mut task = "Ask clarification questions that help the user refine their request \
                    for the selected prompt framework"
        .to_string();

    let format = if is_last_round {
        "This is the final confirmation round, so set isComplete to true. Return JSON:\n\
         ```json\n\
         {\n\
         \x20 \"questions\": [],\n\
         \x20 \"isComplete\": true\n\
         }\n\
         ```"
            .to_string()
    } else {
        task.push_str(&format!(
            ". This is round {current_round}; {remaining} confirmation round(s) remain"
        ));
        format!(
            "Ask the 1-3 most critical, concise questions, most important first. Return JSON:\n\
             ```json\n\
             {{\n\
             \x20 \"questions\": [\n\
             \x20   {{\n\
             \x20     \"dimension\": \"goal clarity/target audience/context completeness/format requirements/constraints\",\n\
             \x20     \"question\": \"The question itself\",\n\
             \x20     \"hint\": \"Why this question matters\"\n\
             \x20   }}\n\
             \x20 ],\n\
             \x20 \"isComplete\": false\n\
             }}\n\
             ```\n\
             Set isComplete to true once the information is fully sufficient. Note: at most \
             {max_rounds} confirmation round(s) are available in total; use them efficiently."
        )
    };

    build_system_prompt("a friendly requirements analyst", &task, &format)
}

/// System prompt for the final generation stage.
pub fn generation_system_prompt() -> ChatMessage {
    build_system_prompt(
        "a prompt optimization expert",
        "Generate an optimized prompt that follows the specified prompt \
         framework structure exactly",
        "Organize the prompt around each element of the framework, keeping the \
         structure clear and the content complete. Output the final prompt as \
         markdown.",
    )
}

/// Rough token estimate for prompt budgeting.
///
/// CJK text runs about 1.5 characters per token, everything else about
/// 4 characters per token.
pub fn estimate_tokens(text: &str) -> u32 {
    let cjk = text
        .chars()
        .filter(|c| ('\u{4e00}'..='\u{9fa5}').contains(c))
        .count();
    let other = text.chars().count() - cjk;
    (cjk as f64 / 1.5 + other as f64 / 4.0).ceil() as u32
}
