//! Domain model definitions.

pub mod content;
pub mod event;
pub mod profile;

pub use content::{ContentItem, ContentKind};
pub use event::{SpecialEvent, TimeOfDay};
pub use profile::UserProfile;
