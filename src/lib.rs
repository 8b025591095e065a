//! Library crate for draftroom-back, exposing modules for binaries and integration tests.

pub mod config;
pub mod directory;
mod dto;
mod error;
pub mod routes;
pub mod services;
pub mod state;
