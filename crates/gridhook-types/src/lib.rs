//! Shared domain types for gridhook.
//!
//! Wire models for inbound notifications, the directory-service
//! subscription entity, application settings, and the error taxonomy.
//! This crate has no I/O; everything here is plain data.

pub mod config;
pub mod error;
pub mod notification;
pub mod subscription;
