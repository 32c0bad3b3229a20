pub mod destination;
pub mod error;
pub mod metadata;
pub mod options;
pub mod params;
pub mod provider;
pub mod source;
pub mod utils;
