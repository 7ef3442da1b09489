pub mod auth;
pub mod dashboard;
pub mod progress;
pub mod quiz;
