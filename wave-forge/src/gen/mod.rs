//! Procedural generation algorithms.
//!
//! Currently home to the [`collapse`] engine; the module level exists so that
//! further generators can slot in next to it without touching the crate root.

pub mod collapse;
