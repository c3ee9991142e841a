//! Data models for question bank entities

mod user;

pub use user::*;
