pub mod api;
pub mod assist;
pub mod config;
pub mod error;
pub mod messages;
pub mod model;
pub mod notice;
pub mod reconciler;
pub mod stories;
pub mod timer;

#[cfg(test)]
mod fixtures;
