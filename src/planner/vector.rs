

use std::collections::{BTreeMap, HashMap};

use lazy_static::lazy_static;
use regex::Regex;

use crate::core::error::{PlannerError, Result};
use crate::llm::question::VectorChange;
use crate::PREFERENCE_DIMS;

lazy_static! {
    static ref DIMENSION_KEY: Regex = Regex::new(r"^vec_([1-9][0-9]*)$").expect("valid regex");
}


/// Zero-based index for a `vec_N` key, when N is within 1..=50.
pub fn parse_dimension(key: &str) -> Option<usize> {
    let caps = DIMENSION_KEY.captures(key.trim())?;
    let n: usize = caps[1].parse().ok()?;
    (1..=PREFERENCE_DIMS).contains(&n).then(|| n - 1)
}

pub fn dimension_key(index: usize) -> String {
    format!("vec_{}", index + 1)
}


#[derive(Debug, Clone, PartialEq)]
pub struct PreferenceVector(Vec<f32>);

impl PreferenceVector {
    pub fn new(values: Vec<f32>) -> Result<Self> {
        if values.len() != PREFERENCE_DIMS {
            return Err(PlannerError::dimension_mismatch(values.len()));
        }
        if let Some(i) = values.iter().position(|v| !v.is_finite()) {
            return Err(PlannerError::Validation(format!(
                "{} is not a finite number",
                dimension_key(i)
            )));
        }
        Ok(Self(values))
    }

    /// Builds the vector from `vec_1`..`vec_50` keys, ordered by dimension.
    pub fn from_named(named: &HashMap<String, f32>) -> Result<Self> {
        let mut values = vec![None; PREFERENCE_DIMS];
        for (key, value) in named {
            let index = parse_dimension(key)
                .ok_or_else(|| PlannerError::dimension_mismatch(named.len()))?;
            values[index] = Some(*value);
        }

        let present = values.iter().filter(|v| v.is_some()).count();
        if present != PREFERENCE_DIMS {
            return Err(PlannerError::dimension_mismatch(present));
        }
        Self::new(values.into_iter().flatten().collect())
    }

    pub fn to_named(&self) -> BTreeMap<String, f32> {
        self.0
            .iter()
            .enumerate()
            .map(|(i, v)| (dimension_key(i), *v))
            .collect()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Applies survey answer deltas, keeping every element inside [0, 1].
    pub fn apply_deltas(&self, changes: &[VectorChange]) -> Result<Self> {
        let mut values = self.0.clone();
        for change in changes {
            let index = parse_dimension(&change.dimension).ok_or_else(|| {
                PlannerError::Validation(format!("unknown preference dimension '{}'", change.dimension))
            })?;
            values[index] = (values[index] + change.change).clamp(0.0, 1.0);
        }
        Ok(Self(values))
    }
}


/// Element-wise mean of two preference vectors for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupVector(Vec<f32>);

impl GroupVector {
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }
}


pub fn aggregate(v1: &[f32], v2: &[f32]) -> Result<GroupVector> {
    for v in [v1, v2] {
        if v.len() != PREFERENCE_DIMS {
            return Err(PlannerError::dimension_mismatch(v.len()));
        }
    }

    Ok(GroupVector(
        v1.iter().zip(v2.iter()).map(|(a, b)| (a + b) / 2.0).collect(),
    ))
}
