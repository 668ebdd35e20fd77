//! Application layer: use cases that orchestrate domain and infrastructure.
//!
//! Traits for the engine, the host editor and the option store live here;
//! their implementations live in `infrastructure`.

pub mod apply_actions;
pub mod context_sync;
pub mod engine;
pub mod host;
pub mod input_methods;
pub mod options;
pub mod session_manager;
pub mod translate_key;
