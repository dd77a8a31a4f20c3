//! Platform abstraction layer
//!
//! The host page owns rendering and DOM buttons; it drives the engine
//! through the bridge below and draws whatever the drained events describe.

#[cfg(target_arch = "wasm32")]
pub mod web;
