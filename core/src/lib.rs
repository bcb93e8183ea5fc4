pub mod alerting;
pub mod clock;
pub mod config;
pub mod dashboard;
pub mod demo_seed;
pub mod engine;
pub mod error;
pub mod intake;
pub mod name_generator;
pub mod notification;
pub mod repository;
pub mod risk_ledger;
pub mod risk_scoring;
pub mod rng;
pub mod roster;
pub mod store;
pub mod time_window;
pub mod types;
pub mod work_history;
