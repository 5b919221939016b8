//! Repository implementations.

mod content;
mod event;
mod profile;

pub use content::ContentRepository;
pub use event::{EventRepository, NewEvent, UpdateEvent};
pub use profile::ProfileRepository;
