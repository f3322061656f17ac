//! # opal-call-cleared
//!
//! Backend-agnostic safe wrapper for the engine's "call cleared" event
//! parameter block.
//!
//! The native glue library exposes the block through an opaque handle plus
//! entry points to allocate, free, and read/write its two fields (a call
//! token and an integer-coded call-end reason). This crate turns that into
//! an RAII guard with typed accessors and an idempotent [`CallClearedParam::release`].
//!
//! ## Features
//! - `opal-backend`: links the engine glue library and provides `FfiApi`
//! - `test-support`: enables `MockCallClearedApi` via `mockall`, plus the
//!   registry-backed `FakeEngine`

mod errors;
mod param;
mod provider;
mod reason;

#[cfg(feature = "opal-backend")]
mod backend;

#[cfg(any(test, feature = "test-support"))]
mod testing;

// Stable public API
pub use errors::{CallClearedError, CallClearedResult};
pub use param::{CallClearedParam, Ownership};
pub use provider::{CallClearedApi, RawParam};
pub use reason::CallEndReason;

// Backend re-exports (conditional)
#[cfg(feature = "opal-backend")]
pub use backend::ffi::FfiApi;

// Test support re-exports
#[cfg(feature = "test-support")]
pub use provider::MockCallClearedApi;
#[cfg(any(test, feature = "test-support"))]
pub use testing::FakeEngine;
