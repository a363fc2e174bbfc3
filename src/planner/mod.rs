

pub mod category;
pub mod models;
pub mod scoring;
pub mod sequencer;
pub mod service;
pub mod similarity;
pub mod vector;

pub use category::{normalize, ActivityType};
pub use models::{PlanRequest, PlanResponse, TimeSlotResult, UserProfile};
pub use scoring::{RankedCandidate, VenueScorer};
pub use sequencer::{SequenceState, SlotWindow, TimeSlot, TimeSlotSequencer};
pub use service::{PlannerContext, PlannerService};
pub use similarity::{cosine_similarity, GeoPoint};
pub use vector::{aggregate, GroupVector, PreferenceVector};
