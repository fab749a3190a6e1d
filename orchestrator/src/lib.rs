// orchestrator/src/lib.rs

pub mod cache;
pub mod experts;
pub mod orchestrator;
pub mod prompts;
pub mod submission;

// Re-exported so callers can write `use orchestrator::ResponseService`.
pub use crate::experts::PersonaRegistry;
pub use crate::orchestrator::ResponseService;
pub use crate::submission::Outcome;
