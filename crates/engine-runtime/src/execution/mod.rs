pub mod executor;
pub mod inspect;
pub mod orchestrator;
