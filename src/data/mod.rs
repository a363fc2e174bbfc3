

pub mod embeddings;
pub mod venues;

pub use embeddings::{CategoryEmbeddings, Word2VecModel};
pub use venues::{Venue, VenueTable};
