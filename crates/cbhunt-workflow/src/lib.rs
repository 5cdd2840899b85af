//! Mission workflow: sequences fetch, review and commit over the extraction
//! pipeline and the collection store.

pub mod error;
pub mod orchestrator;
pub mod phase;
mod session;

pub use error::WorkflowError;
pub use orchestrator::{Completion, MissionTicket, Orchestrator};
pub use phase::{permits, Action, Phase};
