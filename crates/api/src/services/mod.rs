//! Engine services orchestrating repositories.

pub mod scoring;
pub mod stars;

pub use scoring::ScoringService;
pub use stars::StarService;
