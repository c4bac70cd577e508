//! Shared building blocks for `snapr`: run configuration, error taxonomy,
//! candidate input and the network data model.

pub mod config;
pub mod error;
pub mod input;
pub mod network;
