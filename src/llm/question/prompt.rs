

pub const SYSTEM_PROMPT: &str = "You are a helpful assistant that always responds in JSON format.";


pub fn build_question_prompt() -> String {
    format!(
        r#"You write binary survey questions that reveal a couple's date preferences.

Rules:
1. Write exactly ONE question with two clearly contrasting choices (A and B).
2. Each choice affects between 2 and 4 preference dimensions.
3. Every change is between -0.01 and +0.01.
4. Each choice must contain at least one negative change.
5. Dimensions are named vec_1, vec_2, ..., vec_{dims}.
6. Vary the dimensions you combine so questions do not repeat.

Respond with JSON only:
{{
  "question": "...",
  "choice_a": "...",
  "vectors_a": [{{"dimension": "vec_1", "change": 0.007}}, {{"dimension": "vec_2", "change": -0.004}}],
  "choice_b": "...",
  "vectors_b": [{{"dimension": "vec_1", "change": -0.007}}, {{"dimension": "vec_4", "change": -0.006}}]
}}"#,
        dims = crate::PREFERENCE_DIMS
    )
}
