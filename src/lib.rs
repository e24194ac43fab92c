//! Client for a file drop server: upload a file, fetch it back by ID, delete it.

pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod ip_lookup;
pub mod render;
pub mod save;
pub mod transport;
pub mod utils;
