

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::llm::recommender::{CandidateVenue, VenueSelection};


#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub gender: String,
    pub age: u32,

    /// `vec_1`..`vec_50` preference values.
    pub preferences: HashMap<String, f32>,
}


#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    pub user1: UserProfile,
    pub user2: UserProfile,
    pub date: NaiveDate,
    pub weather: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSlotResult {
    pub slot: String,
    pub top_candidates: Vec<CandidateVenue>,
    pub llm_recommendation: VenueSelection,
    #[serde(skip)]
    pub start_minute: u32,
}


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanResponse {
    pub time_slots: Vec<TimeSlotResult>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_format() {
        let prefs: Vec<String> = (1..=50).map(|i| format!("\"vec_{i}\": 0.5")).collect();
        let prefs = prefs.join(",");
        let raw = format!(
            r#"{{
                "user1": {{"gender": "M", "age": 26, "preferences": {{{prefs}}}}},
                "user2": {{"gender": "F", "age": 25, "preferences": {{{prefs}}}}},
                "date": "2025-07-03",
                "weather": "맑음",
                "startTime": "13:00",
                "endTime": "19:00",
                "keywords": ["기념일", "로맨틱"]
            }}"#
        );

        let request: PlanRequest = serde_json::from_str(&raw).unwrap();
        assert_eq!(request.start_time, "13:00");
        assert_eq!(request.user2.age, 25);
        assert_eq!(request.user1.preferences.len(), 50);
        assert_eq!(request.date, NaiveDate::from_ymd_opt(2025, 7, 3).unwrap());
        assert_eq!(request.keywords, vec!["기념일", "로맨틱"]);
    }

    #[test]
    fn test_response_omits_sort_key() {
        let response = PlanResponse {
            time_slots: vec![TimeSlotResult {
                slot: "13:00 ~ 14:59".into(),
                top_candidates: vec![],
                llm_recommendation: VenueSelection::failed("x"),
                start_minute: 780,
            }],
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["time_slots"][0]["slot"], "13:00 ~ 14:59");
        assert!(json["time_slots"][0].get("start_minute").is_none());
    }
}
