//! Metadata model: declaration shapes, runtime descriptors, and the
//! two-pass builder that turns one into the other.
//!
//! In general:
//! - `def` declares *what exists* (the annotation analogue)
//! - `entity`/`field` describe *what runs* (validated descriptors)
//! - `build` is the only path from one to the other
//! - `registry` is the immutable committed set shared by the engine

pub mod build;
pub mod def;
pub mod entity;
pub mod field;
pub mod registry;
