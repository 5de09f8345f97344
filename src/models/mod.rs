pub mod analytics;
pub mod daily_count;
pub mod event;
