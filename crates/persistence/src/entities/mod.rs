//! Entity definitions (database row mappings).

mod content_item;
mod event;
mod profile;

pub use content_item::ContentItemEntity;
pub use event::EventEntity;
pub use profile::ProfileEntity;
