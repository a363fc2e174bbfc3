

use std::sync::Arc;

use tracing::{info, warn};

use super::models::{PlanRequest, PlanResponse, TimeSlotResult};
use super::scoring::VenueScorer;
use super::sequencer::{SequenceState, SlotWindow, TimeSlot, TimeSlotSequencer};
use super::similarity::GeoPoint;
use super::vector::{aggregate, GroupVector, PreferenceVector};
use crate::core::config::PlannerConfig;
use crate::core::error::{PlannerError, Result};
use crate::data::embeddings::{CategoryEmbeddings, Word2VecModel};
use crate::data::venues::{Venue, VenueTable};
use crate::llm::factory::LlmProviderFactory;
use crate::llm::recommender::{
    CandidateVenue, LlmVenueRecommender, RecommendationContext, VenueRecommender,
};


/// Assets loaded once per process and shared read-only between requests.
pub struct PlannerContext {
    pub venues: Arc<VenueTable>,
    pub embeddings: Arc<dyn CategoryEmbeddings>,
    pub recommender: Arc<dyn VenueRecommender>,
    pub config: PlannerConfig,
}

impl PlannerContext {
    pub fn new(
        venues: Arc<VenueTable>,
        embeddings: Arc<dyn CategoryEmbeddings>,
        recommender: Arc<dyn VenueRecommender>,
        config: PlannerConfig,
    ) -> Self {
        Self {
            venues,
            embeddings,
            recommender,
            config,
        }
    }

    pub fn load(config: PlannerConfig) -> Result<Self> {
        let venues = VenueTable::load(&config.venue_table_path)?;
        if venues.is_empty() {
            warn!("Venue table {} has no usable rows", config.venue_table_path.display());
        }
        let embeddings = Word2VecModel::load(&config.embedding_model_path)?;

        let llm = LlmProviderFactory::from_config(&config.llm)?;
        let recommender = LlmVenueRecommender::from_config(llm, &config.llm);

        Ok(Self::new(
            Arc::new(venues),
            Arc::new(embeddings),
            Arc::new(recommender),
            config,
        ))
    }
}


pub struct PlannerService {
    context: Arc<PlannerContext>,
    scorer: VenueScorer,
    sequencer: TimeSlotSequencer,
}

impl PlannerService {
    pub fn new(context: Arc<PlannerContext>) -> Self {
        let scorer = VenueScorer::new(context.config.scoring.clone());
        let sequencer = TimeSlotSequencer::new(
            context.embeddings.clone(),
            context.config.sequencer.clone(),
        );
        Self {
            context,
            scorer,
            sequencer,
        }
    }

    pub fn context(&self) -> &PlannerContext {
        &self.context
    }

    fn available_categories(&self) -> Vec<String> {
        self.context.venues.categories().into_iter().collect()
    }

    /// Slot sequence without scoring or external calls.
    pub fn slots(&self, start: &str, end: &str, group: &GroupVector) -> Result<Vec<TimeSlot>> {
        self.sequencer
            .sequence(start, end, group, &self.available_categories())
    }

    pub async fn plan(&self, request: &PlanRequest) -> Result<PlanResponse> {
        info!(
            "Planning {} ~ {} on {}, keywords={:?}",
            request.start_time, request.end_time, request.date, request.keywords
        );

        let user1 = PreferenceVector::from_named(&request.user1.preferences)?;
        let user2 = PreferenceVector::from_named(&request.user2.preferences)?;
        let group = aggregate(user1.as_slice(), user2.as_slice())?;

        let windows = SlotWindow::for_range(&request.start_time, &request.end_time)?;
        let available = self.available_categories();
        let purpose = request.keywords.join(" ");

        let mut state = SequenceState::new();
        let mut center: Option<GeoPoint> = None;
        let mut results = Vec::with_capacity(windows.len());

        for (index, window) in windows.iter().enumerate() {
            let slot = self
                .sequencer
                .next_slot(index, window, &group, &available, &state);

            let pool: Vec<&Venue> = self
                .context
                .venues
                .in_categories(&slot.categories)
                .into_iter()
                .filter(|v| !state.is_picked(&v.name))
                .collect();
            let ranked = self
                .scorer
                .score(&group, &pool, &request.keywords, center, None);
            // a dropped slot leaves `state` as the previous slot settled it
            if ranked.is_empty() {
                warn!(
                    "No candidates for slot {} (categories={:?})",
                    slot.time_range, slot.categories
                );
                continue;
            }

            let candidates: Vec<CandidateVenue> = ranked.iter().map(CandidateVenue::from).collect();
            let context = RecommendationContext {
                purpose: purpose.clone(),
                weather: request.weather.clone(),
                time_range: slot.time_range.clone(),
            };
            let selection = self
                .context
                .recommender
                .recommend(&candidates, &context)
                .await;

            let chosen = ranked
                .iter()
                .find(|c| c.name == selection.selected)
                .unwrap_or(&ranked[0]);
            state.pick_venue(&chosen.name, &chosen.category);
            if center.is_none() {
                center = chosen.location;
            }

            info!(
                "Slot {} -> '{}' ({} candidates)",
                slot.time_range,
                selection.selected,
                candidates.len()
            );
            results.push(TimeSlotResult {
                slot: slot.time_range,
                top_candidates: candidates,
                llm_recommendation: selection,
                start_minute: slot.start_minute,
            });
        }

        if results.is_empty() {
            return Err(PlannerError::NoRecommendations);
        }
        results.sort_by_key(|r| r.start_minute);

        Ok(PlanResponse {
            time_slots: results,
        })
    }
}
