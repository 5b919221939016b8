//! HTTP route handlers.

pub mod content;
pub mod events;
pub mod health;
pub mod notifications;
pub mod profiles;
pub mod stars;
