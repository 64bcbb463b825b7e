//! Domain values of the note creation pipeline.
//!
//! # Responsibility
//! - Define the inputs (`CreateOptions`, `Directory`) and output
//!   (`CreatedNote`) of one create call.
//! - Define the `RenderContext` templates are rendered against.
//!
//! # Invariants
//! - Inputs are read-only for the duration of one create call.
//! - `CreatedNote` is never partially populated.

pub mod context;
pub mod dir;
pub mod note;
