//! Service layer for vepanno business logic.
//!
//! This module contains domain logic separated from UI concerns.
//! Services emit events over channels; the CLI renders them.

pub mod annotate;

pub use annotate::{AnnotationEvent, AnnotationResult, AnnotationService};
