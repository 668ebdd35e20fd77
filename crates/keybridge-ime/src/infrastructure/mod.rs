//! Infrastructure layer for the bridge.
//!
//! Contains the file-system adapters (package catalog, option files,
//! configuration) and the test doubles for the engine and host editor.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `keybridge_core`, but MUST NOT be imported by the `application` layer
//! outside of its tests.

pub mod catalog;
pub mod config;
pub mod engine;
pub mod host;
pub mod option_store;
