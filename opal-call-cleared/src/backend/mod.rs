//! Backend implementations for the native call-control boundary.
//!
//! Each backend is gated behind a feature flag.

#[cfg(feature = "opal-backend")]
pub mod ffi;
