

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::similarity::{cosine_similarity, GeoPoint};
use super::vector::GroupVector;
use crate::core::config::ScoringConfig;
use crate::data::venues::Venue;


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub name: String,
    pub category: String,
    pub raw_category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    pub quality: f64,
    pub similarity: f64,
    pub keyword_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    pub distance_score: f64,
    pub total_score: f64,
}

impl RankedCandidate {
    fn ranking_order(a: &Self, b: &Self) -> Ordering {
        b.total_score
            .total_cmp(&a.total_score)
            .then_with(|| b.quality.total_cmp(&a.quality))
            .then_with(|| a.name.cmp(&b.name))
    }
}


fn normalize_keywords(keywords: &[String]) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::new();
    for keyword in keywords {
        let keyword = keyword.trim().to_lowercase();
        if !keyword.is_empty() && !normalized.contains(&keyword) {
            normalized.push(keyword);
        }
    }
    normalized
}


pub struct VenueScorer {
    config: ScoringConfig,
}

impl VenueScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Ranks pre-filtered candidates for one slot.
    ///
    /// Distance filtering runs only when a center point is given (every slot
    /// after the first). An empty result means the slot has nothing to offer,
    /// even after widening the radius once.
    pub fn score(
        &self,
        group: &GroupVector,
        candidates: &[&Venue],
        keywords: &[String],
        center: Option<GeoPoint>,
        max_distance_km: Option<f64>,
    ) -> Vec<RankedCandidate> {
        if candidates.is_empty() {
            return Vec::new();
        }

        let center = center.filter(|_| self.config.distance_filtering);
        let surviving: Vec<(&Venue, Option<f64>)> = match center {
            Some(center) => {
                let radius = max_distance_km.unwrap_or(self.config.max_distance_km);
                let mut within = Self::within_radius(candidates, center, radius);
                if within.is_empty() {
                    debug!("No venues within {:.1}km, retrying with {:.1}km", radius, radius * 2.0);
                    within = Self::within_radius(candidates, center, radius * 2.0);
                }
                within
            }
            None => candidates.iter().map(|v| (*v, None)).collect(),
        };

        if surviving.is_empty() {
            return Vec::new();
        }

        let keywords = if self.config.keyword_scoring {
            normalize_keywords(keywords)
        } else {
            Vec::new()
        };

        let (min_distance, max_distance) = surviving
            .iter()
            .filter_map(|(_, d)| *d)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), d| (lo.min(d), hi.max(d)));
        let distance_span = max_distance - min_distance;

        let mut ranked: Vec<RankedCandidate> = surviving
            .into_iter()
            .map(|(venue, distance_km)| {
                let similarity = cosine_similarity(group.as_slice(), &venue.vector);
                let keyword_score = self.keyword_score(venue, &keywords);
                let distance_score = match distance_km {
                    Some(d) if distance_span > f64::EPSILON => {
                        self.config.distance_bonus_cap * (max_distance - d) / distance_span
                    }
                    _ => 0.0,
                };

                RankedCandidate {
                    name: venue.name.clone(),
                    category: venue.category.clone(),
                    raw_category: venue.raw_category.clone(),
                    location: venue.location,
                    quality: venue.quality,
                    similarity,
                    keyword_score,
                    distance_km,
                    distance_score,
                    total_score: similarity + keyword_score + distance_score,
                }
            })
            .collect();

        ranked.sort_by(RankedCandidate::ranking_order);
        ranked.truncate(self.config.top_k);
        ranked
    }

    fn within_radius<'a>(
        candidates: &[&'a Venue],
        center: GeoPoint,
        radius_km: f64,
    ) -> Vec<(&'a Venue, Option<f64>)> {
        candidates
            .iter()
            .filter_map(|venue| {
                let distance = venue.location?.distance_km(&center);
                (distance <= radius_km).then_some((*venue, Some(distance)))
            })
            .collect()
    }

    fn keyword_score(&self, venue: &Venue, keywords: &[String]) -> f64 {
        if keywords.is_empty() {
            return 0.0;
        }
        let name = venue.name.to_lowercase();
        let raw_category = venue.raw_category.to_lowercase();

        let matches = keywords
            .iter()
            .filter(|kw| name.contains(kw.as_str()) || raw_category.contains(kw.as_str()))
            .count();
        matches as f64 * self.config.keyword_weight
    }
}
