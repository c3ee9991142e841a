//! API client module for the question bank backend

pub mod client;
mod me;

pub use client::ApiClient;
pub use me::whoami;
