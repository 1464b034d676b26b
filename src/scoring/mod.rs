pub mod confidence;

pub use confidence::{
    display_composite, score, ComponentScores, ConfidenceBreakdown, Rating, Weights,
};
