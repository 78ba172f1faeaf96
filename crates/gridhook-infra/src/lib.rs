//! Infrastructure implementations for gridhook.
//!
//! Concrete adapters behind the core ports: the reqwest-based directory
//! client with its OAuth2 client-credentials token provider, and the TOML
//! settings loader.

pub mod graph;
pub mod settings;
