//! Client library for the AP CS Question Bank API
//!
//! Token caching, login completion and an authenticated HTTP client. The
//! `qbank-cli` binary is a thin shell over these modules.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod storage;
