//! Microsoft-Graph-style directory service adapter.
//!
//! [`client::GraphDirectoryClient`] implements the core
//! [`DirectoryService`](gridhook_core::directory::DirectoryService) port
//! over HTTPS; [`token::TokenProvider`] supplies bearer tokens via the
//! OAuth2 client-credentials flow.

pub mod client;
pub mod token;
pub mod types;

pub use client::GraphDirectoryClient;
