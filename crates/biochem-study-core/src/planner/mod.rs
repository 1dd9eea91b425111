//! Adaptive question planning: topic selection, difficulty weighting and
//! seeded shuffling. All functions are pure and reentrant.

pub mod difficulty;
pub mod shuffle;
pub mod topics;

pub use difficulty::{
    apply_confidence_bias, apply_performance_bias, derive_weights, distribute_counts,
    flatten_counts, plan_slots, scale_difficulty, BandMap, BandOverrides, DifficultyBand,
    DifficultyCounts, DifficultyScaling, DifficultyWeights, DEFAULT_CONFIDENCE, DEFAULT_WEIGHTS,
};
pub use shuffle::{hash_seed, randomize_questions, time_seed, SeedRng, FALLBACK_SEED};
pub use topics::{select_topics, TopicSelection, DEFAULT_TOPIC_LIMIT};
