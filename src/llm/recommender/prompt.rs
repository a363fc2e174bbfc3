

use super::models::{CandidateVenue, RecommendationContext};


pub const SYSTEM_PROMPT: &str = "You pick date venues. Always respond with valid JSON.";


pub fn build_selection_prompt(candidates: &[CandidateVenue], context: &RecommendationContext) -> String {
    let candidate_lines = candidates
        .iter()
        .map(|c| {
            format!(
                "- name: {}, total score: {:.2}, similarity: {:.2}, description: {}",
                c.store_name, c.score, c.similarity, c.description
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"[Meeting]
- purpose: {purpose}
- weather: {weather}
- time: {time_range}

[Candidates]
{candidate_lines}

[Task]
Choose exactly one venue from the candidates above, using its name verbatim, and explain why.
Respond as JSON: {{"selected": "venue name", "reason": "why"}}"#,
        purpose = context.purpose,
        weather = context.weather,
        time_range = context.time_range,
    )
}
