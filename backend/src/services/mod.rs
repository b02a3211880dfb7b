pub mod aggregation;
pub mod dashboard;
pub mod probe;
pub mod sentinel;
pub mod setup_service;
pub mod store;
