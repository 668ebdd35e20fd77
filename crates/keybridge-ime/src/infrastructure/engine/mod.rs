//! Transliteration engine adapters.
//!
//! The production engine is linked by the embedding input-method framework
//! and implements the traits in [`crate::application::engine`] directly.
//! This crate only ships the scripted engine used by its tests and by hosts
//! that want a deterministic stand-in.

pub mod mock;
