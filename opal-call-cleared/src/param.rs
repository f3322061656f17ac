//! Safe wrapper around the native call-cleared parameter block.

use std::fmt;
use std::os::raw::c_void;
use std::sync::Arc;
use std::sync::atomic::{AtomicPtr, Ordering};

use crate::errors::{CallClearedError, CallClearedResult};
use crate::provider::{CallClearedApi, RawParam};
use crate::reason::CallEndReason;

/// Who is responsible for freeing the native block.
///
/// Captured in the type rather than a mutable flag: a `Borrowed` wrapper can
/// never be promoted to owning, and release on it only clears the handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// The wrapper frees the block on release or drop.
    Owned,
    /// Another owner (typically the engine, after a callback) frees it.
    Borrowed,
}

/// RAII guard for one native call-cleared parameter block.
///
/// Exposes typed accessors for the block's two fields and an explicit,
/// idempotent [`release`](Self::release); dropping the wrapper takes the same
/// release path. All methods take `&self`, so an instance can be shared
/// through an [`Arc`] and released from any holder.
///
/// Accessors are not guaranteed safe to call concurrently with `release` on
/// the same instance; the read may reach the native block while another
/// thread frees it. Callers that share an instance across threads and
/// release it early need their own synchronization; release racing release
/// (or drop) is always safe.
pub struct CallClearedParam {
    api: Arc<dyn CallClearedApi>,
    /// Null is the released sentinel; never reused once cleared.
    handle: AtomicPtr<c_void>,
    ownership: Ownership,
}

impl CallClearedParam {
    /// Allocates a new native block; the wrapper owns it.
    ///
    /// # Errors
    /// Returns [`CallClearedError::Allocation`] if the engine cannot provide
    /// a block.
    pub fn create(api: Arc<dyn CallClearedApi>) -> CallClearedResult<Self> {
        let raw = api.alloc()?;
        if raw.is_null() {
            return Err(CallClearedError::Allocation(
                "engine returned a null handle".into(),
            ));
        }
        tracing::debug!(handle = ?raw, "allocated call-cleared parameter block");
        Ok(Self {
            api,
            handle: AtomicPtr::new(raw.as_ptr()),
            ownership: Ownership::Owned,
        })
    }

    /// Wraps an existing handle with explicit ownership transfer.
    ///
    /// Bridge-layer use, for blocks handed back from native calls. The
    /// handle is not validated beyond the caller's own non-null checks.
    pub fn wrap(api: Arc<dyn CallClearedApi>, handle: RawParam, ownership: Ownership) -> Self {
        Self {
            api,
            handle: AtomicPtr::new(handle.as_ptr()),
            ownership,
        }
    }

    /// Reads the call token.
    ///
    /// # Errors
    /// Returns [`CallClearedError::InvalidHandle`] after release, or
    /// [`CallClearedError::Conversion`] if the native bytes are not UTF-8.
    pub fn call_token(&self) -> CallClearedResult<String> {
        self.api.call_token(self.live_handle()?)
    }

    /// Writes the call token.
    ///
    /// # Errors
    /// Returns [`CallClearedError::InvalidHandle`] after release, or
    /// [`CallClearedError::Conversion`] for tokens with an embedded NUL; a
    /// failed write leaves the previous value in place.
    pub fn set_call_token(&self, token: &str) -> CallClearedResult<()> {
        self.api.set_call_token(self.live_handle()?, token)
    }

    /// Reads and decodes the call-end reason.
    ///
    /// # Errors
    /// Returns [`CallClearedError::InvalidHandle`] after release, or
    /// [`CallClearedError::UnknownReasonCode`] if the native value is
    /// outside the taxonomy.
    pub fn reason(&self) -> CallClearedResult<CallEndReason> {
        let code = self.api.reason_code(self.live_handle()?)?;
        CallEndReason::from_code(code)
    }

    /// Writes the call-end reason.
    ///
    /// # Errors
    /// Returns [`CallClearedError::InvalidHandle`] after release.
    pub fn set_reason(&self, reason: CallEndReason) -> CallClearedResult<()> {
        self.api.set_reason_code(self.live_handle()?, reason.code())
    }

    /// Releases the native block.
    ///
    /// The handle is atomically swapped to the null sentinel, so of any
    /// number of concurrent callers (including drop) exactly one observes
    /// the live handle and performs the native free; the rest are no-ops.
    /// A `Borrowed` wrapper clears its handle without freeing.
    pub fn release(&self) {
        let previous = self.handle.swap(std::ptr::null_mut(), Ordering::AcqRel);
        if previous.is_null() {
            tracing::trace!("release on an already cleared parameter block");
            return;
        }
        match self.ownership {
            Ownership::Owned => {
                tracing::debug!(handle = ?previous, "freeing call-cleared parameter block");
                self.api.free(RawParam::from_raw(previous));
            }
            Ownership::Borrowed => {
                tracing::trace!(handle = ?previous, "detached borrowed handle, block left to its owner");
            }
        }
    }

    /// Whether the handle has been cleared.
    pub fn is_released(&self) -> bool {
        self.handle.load(Ordering::Acquire).is_null()
    }

    fn live_handle(&self) -> CallClearedResult<RawParam> {
        let pointer = self.handle.load(Ordering::Acquire);
        if pointer.is_null() {
            tracing::warn!("accessor called on a released parameter block");
            return Err(CallClearedError::InvalidHandle);
        }
        Ok(RawParam::from_raw(pointer))
    }
}

impl Drop for CallClearedParam {
    /// Automatic path of [`release`](Self::release); idempotent with it.
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for CallClearedParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallClearedParam")
            .field("released", &self.is_released())
            .field("ownership", &self.ownership)
            .finish_non_exhaustive()
    }
}
