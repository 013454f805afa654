pub mod actions;
pub mod attachments;
pub mod filter;
pub mod lifecycle;
pub mod queries;
pub mod store;
pub mod types;

pub use queries::PgAgendaStore;
pub use store::{AgendaStore, MemoryAgendaStore};
pub use types::*;
