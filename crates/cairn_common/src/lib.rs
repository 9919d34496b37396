//! Shared foundational types used across the Cairn crates.
//!
//! This crate provides content hashing used to fingerprint snapshot nodes.

#![warn(missing_docs)]

pub mod hash;

pub use hash::{ContentHash, ContentHasher};
