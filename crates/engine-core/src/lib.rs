pub mod events;
pub mod progress;
pub mod report;
pub mod sink;
pub mod state;
