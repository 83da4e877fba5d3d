pub mod hashed_term;

pub use hashed_term::{cosine_similarity, HashedTermEmbedder};
