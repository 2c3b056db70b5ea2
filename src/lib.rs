//! Capsule pipeline utilities.
//!
//! Two small tools share this crate: the capsule rehydrator
//! ([`rehydrate_capsule`]), which stamps a capsule manifest with a fresh
//! payload digest and emits a merged hydrated artifact, and the static
//! [`cartesian`] map describing how the sealed capsules relate to one
//! another. Both are also exposed as binaries (`rehydrate`,
//! `cartesian-map`).

pub mod cartesian;
pub mod digest;
pub mod hydrate;

pub use cartesian::{
    CapsuleEdge, CapsuleNode, CartesianMap, build_default_map, emit_json, emit_markdown,
};
pub use digest::sha256_file;
pub use hydrate::{HydrateOptions, NotFound, rehydrate_capsule, sanitize_capsule_id, utc_timestamp};
