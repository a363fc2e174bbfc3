

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{NaiveTime, Timelike};
use serde::Serialize;
use tracing::{debug, warn};

use super::category::ActivityType;
use super::similarity::cosine_similarity;
use super::vector::GroupVector;
use crate::core::config::SequencerConfig;
use crate::core::error::{PlannerError, Result};
use crate::data::embeddings::CategoryEmbeddings;
use crate::utils::format_minutes;

/// Fixed partition of the day: (code, first minute, labelled last minute).
/// The labelled end is the exclusive bound when matching a request range.
const DAY_SLOTS: [(&str, u32, u32); 10] = [
    ("01", 0, 6 * 60 + 59),
    ("02", 7 * 60, 8 * 60 + 59),
    ("03", 9 * 60, 10 * 60 + 59),
    ("04", 11 * 60, 12 * 60 + 59),
    ("05", 13 * 60, 14 * 60 + 59),
    ("06", 15 * 60, 16 * 60 + 59),
    ("07", 17 * 60, 18 * 60 + 59),
    ("08", 19 * 60, 20 * 60 + 59),
    ("09", 21 * 60, 22 * 60 + 59),
    ("10", 23 * 60, 23 * 60 + 59),
];

/// Static per-slot defaults, used when the embedding model has nothing to say.
pub fn time_of_day_categories(code: &str) -> &'static [&'static str] {
    match code {
        "01" | "10" => &["호텔"],
        "02" | "03" => &["커피/음료", "제과/제빵/떡/케익"],
        "04" => &["한식", "중식", "일식/수산물", "양식"],
        "05" => &["커피/음료", "취미/오락"],
        "06" => &["취미/오락", "커피/음료"],
        "07" => &["한식", "고기요리", "양식"],
        "08" => &["고기요리", "한식"],
        "09" => &["고기요리"],
        _ => &[],
    }
}


pub fn parse_clock(value: &str) -> Result<u32> {
    let time = NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|_| PlannerError::InvalidTime(value.to_string()))?;
    Ok(time.hour() * 60 + time.minute())
}


/// A clock interval selected for the request, before categories are chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotWindow {
    /// Two-digit day-partition code; `None` for the catch-all fallback window.
    pub code: Option<&'static str>,
    pub start_minute: u32,
    pub end_minute: u32,
    pub time_range: String,
}

impl SlotWindow {
    /// Windows overlapping `[start, end)`, or one catch-all window when nothing overlaps.
    pub fn for_range(start: &str, end: &str) -> Result<Vec<Self>> {
        let start_minute = parse_clock(start)?;
        let end_minute = parse_clock(end)?;

        let windows: Vec<Self> = DAY_SLOTS
            .iter()
            .filter(|(_, s, e)| end_minute > start_minute && start_minute < *e && end_minute > *s)
            .map(|&(code, s, e)| Self {
                code: Some(code),
                start_minute: s,
                end_minute: e,
                time_range: format!("{} ~ {}", format_minutes(s), format_minutes(e)),
            })
            .collect();

        if windows.is_empty() {
            debug!("No day slot overlaps {} ~ {}, using one catch-all slot", start, end);
            return Ok(vec![Self {
                code: None,
                start_minute,
                end_minute,
                time_range: format!("{} ~ {}", format_minutes(start_minute), format_minutes(end_minute)),
            }]);
        }
        Ok(windows)
    }

    pub fn is_fallback(&self) -> bool {
        self.code.is_none()
    }
}


#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSlot {
    pub index: usize,
    pub time_range: String,
    pub start_minute: u32,
    pub end_minute: u32,
    pub categories: Vec<String>,
    pub is_first: bool,
}


/// Categories and venues already picked, plus the category the previous slot settled on.
#[derive(Debug, Clone, Default)]
pub struct SequenceState {
    used: BTreeSet<String>,
    venues: BTreeSet<String>,
    chosen: Option<String>,
}

impl SequenceState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_used(&self, category: &str) -> bool {
        self.used.contains(category)
    }

    pub fn chosen(&self) -> Option<&str> {
        self.chosen.as_deref()
    }

    pub fn is_picked(&self, venue: &str) -> bool {
        self.venues.contains(venue)
    }

    /// Settles a slot on `category`; later slots neither repeat it nor share its activity type.
    pub fn choose(&mut self, category: &str) {
        self.used.insert(category.to_string());
        self.chosen = Some(category.to_string());
    }

    /// Settles a slot on a concrete venue, excluding it from later candidate pools.
    pub fn pick_venue(&mut self, venue: &str, category: &str) {
        self.venues.insert(venue.to_string());
        self.choose(category);
    }
}


pub struct TimeSlotSequencer {
    embeddings: Arc<dyn CategoryEmbeddings>,
    config: SequencerConfig,
}

impl TimeSlotSequencer {
    pub fn new(embeddings: Arc<dyn CategoryEmbeddings>, config: SequencerConfig) -> Self {
        Self { embeddings, config }
    }

    /// Full sequence with each slot's first category as the chosen one.
    pub fn sequence(
        &self,
        start: &str,
        end: &str,
        group: &GroupVector,
        available: &[String],
    ) -> Result<Vec<TimeSlot>> {
        let windows = SlotWindow::for_range(start, end)?;
        let mut state = SequenceState::new();
        let mut slots = Vec::with_capacity(windows.len());

        for (index, window) in windows.iter().enumerate() {
            let slot = self.next_slot(index, window, group, available, &state);
            if let Some(first) = slot.categories.first() {
                state.choose(first);
            }
            slots.push(slot);
        }
        Ok(slots)
    }

    /// Picks categories for one window. `state` is only read; the caller
    /// records whichever category the slot settles on.
    pub fn next_slot(
        &self,
        index: usize,
        window: &SlotWindow,
        group: &GroupVector,
        available: &[String],
        state: &SequenceState,
    ) -> TimeSlot {
        let available: Vec<String> = available
            .iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let categories = match window.code {
            None => available
                .iter()
                .take(self.config.fallback_categories)
                .cloned()
                .collect(),
            Some(code) => match state.chosen() {
                Some(previous) if index > 0 => {
                    let previous = previous.to_string();
                    self.follow_up_categories(code, &previous, &available, state)
                }
                _ => self.opening_categories(code, group, &available, state),
            },
        };

        if categories.is_empty() {
            warn!("Slot {} ({}) has no categories", index, window.time_range);
        }
        debug!("Slot {} ({}): categories={:?}", index, window.time_range, categories);

        TimeSlot {
            index,
            time_range: window.time_range.clone(),
            start_minute: window.start_minute,
            end_minute: window.end_minute,
            categories,
            is_first: index == 0,
        }
    }

    fn opening_categories(
        &self,
        code: &str,
        group: &GroupVector,
        available: &[String],
        state: &SequenceState,
    ) -> Vec<String> {
        let limit = self.config.categories_per_slot;

        let mut scored: Vec<(&String, f64)> = available
            .iter()
            .filter(|c| !state.is_used(c))
            .filter_map(|c| {
                let vector = self.embeddings.vector(c)?;
                (vector.len() == group.as_slice().len())
                    .then(|| (c, cosine_similarity(group.as_slice(), vector)))
            })
            .collect();

        if !scored.is_empty() {
            scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
            return scored.into_iter().take(limit).map(|(c, _)| c.clone()).collect();
        }

        let from_table = Self::from_time_table(code, available, |c| !state.is_used(c), limit);
        if !from_table.is_empty() {
            return from_table;
        }
        let unused: Vec<String> = available
            .iter()
            .filter(|c| !state.is_used(c))
            .take(limit)
            .cloned()
            .collect();
        if unused.is_empty() {
            return available.iter().take(limit).cloned().collect();
        }
        unused
    }

    fn follow_up_categories(
        &self,
        code: &str,
        previous: &str,
        available: &[String],
        state: &SequenceState,
    ) -> Vec<String> {
        let limit = self.config.categories_per_slot;
        let wanted = ActivityType::of(previous).opposite();
        let alternates = |c: &str| !state.is_used(c) && ActivityType::of(c) == wanted;

        let mut picked: Vec<String> = self
            .embeddings
            .most_similar(previous, self.config.similar_top_n)
            .into_iter()
            .map(|(c, _)| c)
            .filter(|c| available.contains(c) && alternates(c))
            .take(limit)
            .collect();

        let table = Self::from_time_table(code, available, alternates, limit);
        Self::backfill(&mut picked, table, limit);
        let rest: Vec<String> = available.iter().filter(|c| alternates(c)).cloned().collect();
        Self::backfill(&mut picked, rest, limit);

        if picked.is_empty() {
            debug!("No {} category left after '{}', relaxing alternation", wanted, previous);
            let unused = |c: &str| !state.is_used(c);
            let table = Self::from_time_table(code, available, unused, limit);
            Self::backfill(&mut picked, table, limit);
            let rest: Vec<String> = available.iter().filter(|c| unused(c)).cloned().collect();
            Self::backfill(&mut picked, rest, limit);
        }
        if picked.is_empty() {
            debug!("Every category after '{}' is used, repeating one", previous);
            let opposite: Vec<String> = available
                .iter()
                .filter(|c| ActivityType::of(c) == wanted)
                .cloned()
                .collect();
            Self::backfill(&mut picked, opposite, limit);
            let others: Vec<String> = available
                .iter()
                .filter(|c| c.as_str() != previous)
                .cloned()
                .collect();
            Self::backfill(&mut picked, others, limit);
        }
        if picked.is_empty() {
            picked = available.iter().take(limit).cloned().collect();
        }
        picked
    }

    fn from_time_table(
        code: &str,
        available: &[String],
        keep: impl Fn(&str) -> bool,
        limit: usize,
    ) -> Vec<String> {
        time_of_day_categories(code)
            .iter()
            .filter(|c| available.iter().any(|a| a == *c) && keep(c))
            .take(limit)
            .map(|c| c.to_string())
            .collect()
    }

    fn backfill(picked: &mut Vec<String>, source: Vec<String>, limit: usize) {
        for category in source {
            if picked.len() >= limit {
                break;
            }
            if !picked.contains(&category) {
                picked.push(category);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::embeddings::Word2VecModel;
    use crate::planner::vector::aggregate;
    use crate::PREFERENCE_DIMS;

    const FOOD: [&str; 4] = ["한식", "고기요리", "커피/음료", "양식"];
    const NON_FOOD: [&str; 4] = ["전시장", "취미/오락", "스포츠/레저", "서점"];

    fn one_hot(index: usize, weight: f32) -> Vec<f32> {
        let mut v = vec![0.05; PREFERENCE_DIMS];
        v[index] = weight;
        v
    }

    fn embeddings() -> Arc<dyn CategoryEmbeddings> {
        let entries = FOOD
            .iter()
            .chain(NON_FOOD.iter())
            .enumerate()
            .map(|(i, c)| (c.to_string(), one_hot(i, 1.0)))
            .collect();
        Arc::new(Word2VecModel::from_entries(entries).unwrap())
    }

    fn available() -> Vec<String> {
        FOOD.iter().chain(NON_FOOD.iter()).map(|c| c.to_string()).collect()
    }

    fn food_group() -> GroupVector {
        let mut v = vec![0.0; PREFERENCE_DIMS];
        v[0] = 0.9;
        v[1] = 0.8;
        v[2] = 0.7;
        v[3] = 0.1;
        aggregate(&v, &v).unwrap()
    }

    fn sequencer(embeddings: Arc<dyn CategoryEmbeddings>) -> TimeSlotSequencer {
        TimeSlotSequencer::new(embeddings, SequencerConfig::default())
    }

    #[test]
    fn test_windows_afternoon() {
        let windows = SlotWindow::for_range("13:00", "19:00").unwrap();
        let ranges: Vec<&str> = windows.iter().map(|w| w.time_range.as_str()).collect();
        assert_eq!(ranges, vec!["13:00 ~ 14:59", "15:00 ~ 16:59", "17:00 ~ 18:59"]);
    }

    #[test]
    fn test_windows_partial_overlap_and_last_slot() {
        let windows = SlotWindow::for_range("08:30", "09:01").unwrap();
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].code, Some("02"));

        let windows = SlotWindow::for_range("23:10", "23:59").unwrap();
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].time_range, "23:00 ~ 23:59");
    }

    #[test]
    fn test_windows_exclude_labelled_end_minute() {
        let windows = SlotWindow::for_range("14:59", "16:00").unwrap();
        let codes: Vec<_> = windows.iter().map(|w| w.code).collect();
        assert_eq!(codes, vec![Some("06")]);
        assert_eq!(windows[0].end_minute, 16 * 60 + 59);

        let windows = SlotWindow::for_range("12:00", "13:00").unwrap();
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].code, Some("04"));
    }

    #[test]
    fn test_windows_fallback_when_end_not_after_start() {
        let windows = SlotWindow::for_range("20:00", "18:00").unwrap();
        assert_eq!(windows.len(), 1);
        assert!(windows[0].is_fallback());
        assert_eq!(windows[0].time_range, "20:00 ~ 18:00");
    }

    #[test]
    fn test_invalid_time_is_client_error() {
        let err = SlotWindow::for_range("25:00", "26:00").unwrap_err();
        assert!(matches!(err, PlannerError::InvalidTime(_)));
        assert!(err.is_client_error());
        assert!(parse_clock("noon").is_err());
    }

    #[test]
    fn test_first_slot_uses_group_similarity() {
        let slots = sequencer(embeddings())
            .sequence("13:00", "15:00", &food_group(), &available())
            .unwrap();
        assert_eq!(slots.len(), 1);
        assert!(slots[0].is_first);
        assert_eq!(slots[0].categories, vec!["한식", "고기요리", "커피/음료"]);
    }

    fn assert_no_chosen_repeats(slots: &[TimeSlot]) {
        let mut chosen = BTreeSet::new();
        for slot in slots {
            assert!(!slot.categories.is_empty() && slot.categories.len() <= 5);
            assert!(slot.categories.iter().all(|c| !chosen.contains(c)), "{:?} repeats {:?}", slot.categories, chosen);
            chosen.insert(slot.categories[0].clone());
        }
    }

    #[test]
    fn test_sequence_alternates_without_repeats() {
        let slots = sequencer(embeddings())
            .sequence("13:00", "19:00", &food_group(), &available())
            .unwrap();
        assert_eq!(slots.len(), 3);
        assert!(!slots[1].is_first);
        assert_no_chosen_repeats(&slots);

        for pair in slots.windows(2) {
            let previous = ActivityType::of(&pair[0].categories[0]);
            assert!(pair[1].categories.iter().all(|c| ActivityType::of(c) != previous));
        }
        assert_eq!(slots[1].categories, vec!["서점", "스포츠/레저", "전시장"]);
        assert_eq!(slots[2].categories, vec!["고기요리", "양식", "커피/음료"]);
    }

    #[test]
    fn test_small_category_set_does_not_repeat() {
        let available: Vec<String> = ["한식", "전시장", "양식", "취미/오락"]
            .iter()
            .map(|c| c.to_string())
            .collect();
        let slots = sequencer(embeddings())
            .sequence("13:00", "19:00", &food_group(), &available)
            .unwrap();

        assert_eq!(slots.len(), 3);
        assert_eq!(slots[0].categories, vec!["한식", "양식", "전시장"]);
        assert_eq!(slots[1].categories, vec!["전시장", "취미/오락"]);
        assert_eq!(slots[2].categories, vec!["양식"]);
        assert_no_chosen_repeats(&slots);
    }

    #[test]
    fn test_exhausted_categories_repeat_opposite_type_first() {
        let available = vec!["한식".to_string(), "전시장".to_string()];
        let slots = sequencer(embeddings())
            .sequence("13:00", "19:00", &food_group(), &available)
            .unwrap();

        assert_eq!(slots[0].categories, vec!["한식", "전시장"]);
        assert_eq!(slots[1].categories, vec!["전시장"]);
        assert_eq!(slots[2].categories, vec!["한식"]);
    }

    #[test]
    fn test_first_slot_falls_back_to_time_table() {
        let empty: Arc<dyn CategoryEmbeddings> = Arc::new(Word2VecModel::default());
        let slots = sequencer(empty)
            .sequence("13:00", "14:00", &food_group(), &available())
            .unwrap();
        assert_eq!(slots[0].categories, vec!["커피/음료", "취미/오락"]);

        let slots = sequencer(Arc::new(Word2VecModel::default()))
            .sequence("13:00", "14:00", &food_group(), &["서점".to_string(), "전시장".to_string()])
            .unwrap();
        assert_eq!(slots[0].categories, vec!["서점", "전시장"]);
    }

    #[test]
    fn test_alternation_relaxed_only_when_no_opposite_left() {
        let only_food: Vec<String> = FOOD.iter().map(|c| c.to_string()).collect();
        let slots = sequencer(embeddings())
            .sequence("13:00", "17:00", &food_group(), &only_food)
            .unwrap();
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[1].categories, vec!["커피/음료", "고기요리", "양식"]);
    }

    #[test]
    fn test_chosen_category_override() {
        let sequencer = sequencer(embeddings());
        let windows = SlotWindow::for_range("13:00", "17:00").unwrap();
        let mut state = SequenceState::new();

        let first = sequencer.next_slot(0, &windows[0], &food_group(), &available(), &state);
        assert_eq!(first.categories[0], "한식");
        assert_eq!(state.chosen(), None);

        // the picked venue belonged to a non-food category
        state.pick_venue("갤러리 A", "전시장");
        assert!(state.is_picked("갤러리 A"));
        let second = sequencer.next_slot(1, &windows[1], &food_group(), &available(), &state);
        assert_eq!(second.categories, vec!["고기요리", "양식", "커피/음료"]);
    }

    #[test]
    fn test_unsettled_slot_leaves_alternation_unchanged() {
        let sequencer = sequencer(embeddings());
        let windows = SlotWindow::for_range("13:00", "19:00").unwrap();
        let mut state = SequenceState::new();
        state.choose("한식");

        let skipped = sequencer.next_slot(1, &windows[1], &food_group(), &available(), &state);
        let next = sequencer.next_slot(2, &windows[2], &food_group(), &available(), &state);
        assert_eq!(state.chosen(), Some("한식"));
        assert_eq!(skipped.categories, next.categories);
        assert!(next.categories.iter().all(|c| ActivityType::of(c) == ActivityType::NonFood));
    }

    #[test]
    fn test_fallback_slot_takes_first_five_sorted() {
        let slots = sequencer(embeddings())
            .sequence("22:00", "21:00", &food_group(), &available())
            .unwrap();
        assert_eq!(slots.len(), 1);
        let mut expected = available();
        expected.sort();
        expected.truncate(5);
        assert_eq!(slots[0].categories, expected);
    }
}
