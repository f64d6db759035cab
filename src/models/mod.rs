//! Data models for vepanno.

mod variant;

pub use variant::{Variant, VepAnnotation};
