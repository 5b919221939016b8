//! Domain layer for the Activity Board backend.
//!
//! This crate contains:
//! - Domain models (SpecialEvent, UserProfile, ContentItem)
//! - Business logic services (event activation, selection, star planning)
//! - Domain error types

pub mod models;
pub mod services;
