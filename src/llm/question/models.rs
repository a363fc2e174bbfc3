

use serde::{Deserialize, Serialize};

use crate::core::error::{PlannerError, Result};
use crate::planner::vector::parse_dimension;

pub const MAX_CHANGE: f32 = 0.01;
pub const MIN_CHANGES_PER_CHOICE: usize = 2;
pub const MAX_CHANGES_PER_CHOICE: usize = 4;


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorChange {

    pub dimension: String,

    pub change: f32,
}


/// A binary preference-survey question; each answer nudges a few dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyQuestion {
    pub question: String,
    pub choice_a: String,
    pub vectors_a: Vec<VectorChange>,
    pub choice_b: String,
    pub vectors_b: Vec<VectorChange>,
}

impl SurveyQuestion {
    pub fn validate(&self) -> Result<()> {
        if self.question.trim().is_empty() {
            return Err(PlannerError::Validation("question text is empty".into()));
        }
        for (label, text, changes) in [
            ("choice_a", &self.choice_a, &self.vectors_a),
            ("choice_b", &self.choice_b, &self.vectors_b),
        ] {
            if text.trim().is_empty() {
                return Err(PlannerError::Validation(format!("{label} is empty")));
            }
            validate_changes(label, changes)?;
        }
        Ok(())
    }

    /// Deltas for the chosen answer (`'a'` or `'b'`, case-insensitive).
    pub fn changes_for(&self, choice: char) -> Result<&[VectorChange]> {
        match choice.to_ascii_lowercase() {
            'a' => Ok(&self.vectors_a),
            'b' => Ok(&self.vectors_b),
            other => Err(PlannerError::Validation(format!("unknown choice '{other}'"))),
        }
    }
}

fn validate_changes(label: &str, changes: &[VectorChange]) -> Result<()> {
    if !(MIN_CHANGES_PER_CHOICE..=MAX_CHANGES_PER_CHOICE).contains(&changes.len()) {
        return Err(PlannerError::Validation(format!(
            "{label} must change {MIN_CHANGES_PER_CHOICE}-{MAX_CHANGES_PER_CHOICE} dimensions, got {}",
            changes.len()
        )));
    }

    for change in changes {
        if parse_dimension(&change.dimension).is_none() {
            return Err(PlannerError::Validation(format!(
                "{label} uses unknown dimension '{}'",
                change.dimension
            )));
        }
        if !change.change.is_finite() || change.change.abs() > MAX_CHANGE {
            return Err(PlannerError::Validation(format!(
                "{label} change {} for {} is outside [-{MAX_CHANGE}, {MAX_CHANGE}]",
                change.change, change.dimension
            )));
        }
    }

    if !changes.iter().any(|c| c.change < 0.0) {
        return Err(PlannerError::Validation(format!(
            "{label} has no negative change"
        )));
    }
    Ok(())
}
