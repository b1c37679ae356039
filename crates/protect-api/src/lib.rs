// protect-api: Async Rust client for the Somfy Protect (Myfox) cloud API

pub mod auth;
pub mod client;
pub mod error;
pub mod history;
pub mod models;
pub mod security;
pub mod sites;
pub mod token;
pub mod transport;

pub use auth::{Authenticator, DEFAULT_CLIENT_ID, DEFAULT_TOKEN_URL};
pub use client::{DEFAULT_API_URL, ProtectClient};
pub use error::Error;
pub use token::{CredentialStore, TokenSet};
pub use transport::TransportConfig;
