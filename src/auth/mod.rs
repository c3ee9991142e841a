//! Authentication for the question bank API
//!
//! Holds the cached access/refresh tokens and completes the login handshake
//! that ends in a redirect carrying a token.

pub mod callback;
pub mod session;
pub mod tokens;

pub use callback::{complete_login, LoginOutcome, LoginRoutes};
pub use session::{login, logout, refresh, status};
pub use tokens::TokenCache;
