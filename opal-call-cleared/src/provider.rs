use std::os::raw::c_void;

use crate::errors::CallClearedResult;

#[cfg(any(test, feature = "test-support"))]
use mockall::automock;

/// Opaque handle to a native call-cleared parameter block.
///
/// A `RawParam` is nothing but the address of the native structure. It does
/// not track liveness or ownership; [`crate::CallClearedParam`] layers both
/// on top. The inner pointer is never readable outside this crate.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawParam(*mut c_void);

impl RawParam {
    /// Creates a handle from a raw pointer handed back by a native call.
    ///
    /// Bridge-layer use. Passing a stale or foreign pointer does not cause
    /// trouble here, but will once the handle reaches a backend.
    #[inline(always)]
    pub fn from_raw(pointer: *mut c_void) -> Self {
        Self(pointer)
    }

    /// The null sentinel.
    #[inline(always)]
    pub fn null() -> Self {
        Self(std::ptr::null_mut())
    }

    /// Checks if the handle is the null sentinel.
    #[inline(always)]
    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }

    #[inline(always)]
    pub(crate) fn as_ptr(&self) -> *mut c_void {
        self.0
    }
}

impl Default for RawParam {
    /// Creates the null sentinel by default.
    #[inline(always)]
    fn default() -> Self {
        Self::null()
    }
}

// SAFETY: a RawParam is a plain address with no interior state; moving or
// sharing it across threads is no different from sharing an integer. Whether
// the pointee may be touched from another thread is the backend's contract,
// not the handle's.
unsafe impl Send for RawParam {}
// SAFETY: see the Send impl above; &RawParam only exposes the address value.
unsafe impl Sync for RawParam {}

/// Trait for the native entry points of the call-cleared parameter block.
///
/// This is the stable seam between the safe wrapper and the engine. Backend
/// implementations provide the actual native interaction; the wrapper never
/// interprets reason codes or token bytes itself, and decoding to
/// [`crate::CallEndReason`] happens above this trait.
///
/// Handles passed to any method other than [`free`](Self::free) must refer
/// to a live block previously returned by [`alloc`](Self::alloc) (or handed
/// over by the engine). The wrapper guarantees this for its own calls, but
/// cannot defend against an accessor racing a concurrent release; callers
/// sharing a handle across threads need their own synchronization.
#[cfg_attr(any(test, feature = "test-support"), automock)]
pub trait CallClearedApi: Send + Sync {
    /// Allocates a new native parameter block.
    ///
    /// # Errors
    /// Returns `Err` if the engine cannot provide a block.
    fn alloc(&self) -> CallClearedResult<RawParam>;

    /// Frees a block previously returned by [`alloc`](Self::alloc).
    ///
    /// Freeing the null sentinel is a no-op. Freeing the same live handle
    /// twice is a fault in the caller; the wrapper's release path makes sure
    /// it never does.
    fn free(&self, handle: RawParam);

    /// Reads the call token field.
    ///
    /// # Errors
    /// Returns `Err` if the native bytes cannot be represented as a `String`.
    fn call_token(&self, handle: RawParam) -> CallClearedResult<String>;

    /// Writes the call token field. The backend copies the string; the
    /// borrow ends when the call returns.
    ///
    /// # Errors
    /// Returns `Err` if the token cannot cross the boundary (embedded NUL).
    fn set_call_token(&self, handle: RawParam, token: &str) -> CallClearedResult<()>;

    /// Reads the raw reason code field.
    ///
    /// # Errors
    /// Returns `Err` if the backend cannot reach the field.
    fn reason_code(&self, handle: RawParam) -> CallClearedResult<i32>;

    /// Writes the raw reason code field.
    ///
    /// # Errors
    /// Returns `Err` if the backend cannot reach the field.
    fn set_reason_code(&self, handle: RawParam, code: i32) -> CallClearedResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_sentinel_round_trip() {
        let handle = RawParam::default();
        assert!(handle.is_null());
        assert_eq!(handle, RawParam::null());
        assert!(handle.as_ptr().is_null());
    }

    #[test]
    fn from_raw_preserves_the_address() {
        let mut probe = 0u8;
        let ptr = std::ptr::from_mut(&mut probe).cast::<c_void>();
        let handle = RawParam::from_raw(ptr);
        assert!(!handle.is_null());
        assert_eq!(handle.as_ptr(), ptr);
    }
}
