//! Shared utilities and common types for the Activity Board backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Validation of event time-of-day bounds and recurrence intervals
//! - IANA timezone identifier parsing

pub mod validation;
