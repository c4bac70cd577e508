pub mod baseline;
pub mod candidate;
pub mod server;
