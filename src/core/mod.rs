pub mod attraction;
pub mod config;
pub mod errors;
pub mod event;
pub mod event_scheduler;
pub mod execution;
pub mod statistics;
pub mod types;
pub mod variates;

#[cfg(test)]
mod tests;
