//! Factsift Domain Layer
//!
//! Core data model shared by every factsift crate. Like the rest of the
//! domain layer it depends on nothing but `uuid`, and it defines the trait
//! boundaries to the collaborators that live outside the reduction engine.
//!
//! ## Key Concepts
//!
//! - **Fact**: a short textual statement plus provenance metadata
//! - **Reliability**: ordered classification (unverified → verified)
//! - **EntitySpan**: a `(text, category)` annotation attached to a fact
//! - **EmbeddingProvider**: dense vectors for statements, supplied by the caller
//! - **Annotator**: entity extraction, supplied by the caller
//!
//! Facts are created by an extraction step outside this workspace, flow once
//! through a reduction pipeline, and are either retained or dropped.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod entity;
pub mod fact;
pub mod reliability;
pub mod traits;

// Re-exports for convenience
pub use entity::EntitySpan;
pub use fact::{Fact, FactId};
pub use reliability::Reliability;
pub use traits::{Annotator, EmbeddingProvider};
