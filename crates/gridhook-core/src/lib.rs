//! Core logic for gridhook: the directory-service port, the subscription
//! lifecycle state machine, and the notification dispatcher.
//!
//! This crate never performs I/O itself; the directory service is reached
//! through the [`directory::DirectoryService`] trait, implemented in
//! gridhook-infra.

pub mod directory;
pub mod dispatch;
pub mod lifecycle;
