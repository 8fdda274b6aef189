pub mod analyzers;
pub mod config;
pub mod error;
pub mod fetch;
pub mod language;
pub mod lighthouse;
pub mod output;
pub mod sites;
pub mod timelapse;

pub use error::RaterError;
