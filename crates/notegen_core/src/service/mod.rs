//! Note creation use-cases.
//!
//! # Responsibility
//! - Orchestrate context building, path resolution and body rendering.
//! - Keep CLI layers decoupled from template and filesystem details.

pub mod note_service;
pub mod resolver;
