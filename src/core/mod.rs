pub mod analytics;
pub mod backup;
pub mod clock;
pub mod config;
pub mod gate;
pub mod log;
pub mod store;
