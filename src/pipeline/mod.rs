// Card sync pipeline: normalization core, image handling, and the run driver

pub mod images;
pub mod orchestrator;
pub mod processing;

pub use orchestrator::{LanguageSummary, Orchestrator};
