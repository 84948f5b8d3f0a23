pub mod agent;
pub mod configuration;
pub mod dispatch;
pub mod errors;
pub mod models;
pub mod providers;
pub mod runner;
pub mod tool;
