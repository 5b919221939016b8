//! Business logic services.

pub mod activation;
pub mod scoring;
pub mod selection;
pub mod stars;
