//! FFI backend over the engine's generated C glue.
//!
//! The glue library exports one allocator, one destructor, and per-field
//! get/set entry points for the call-cleared parameter block, all keyed by
//! the block's address. All unsafety of the crate lives in this module.

use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int, c_void};

use crate::errors::{CallClearedError, CallClearedResult};
use crate::provider::{CallClearedApi, RawParam};

// Generated wrapper symbols, hence the C++ flavored names.
#[allow(non_snake_case)]
#[link(name = "opal")]
unsafe extern "C" {
    fn new_OpalParamCallCleared() -> *mut c_void;
    fn delete_OpalParamCallCleared(param: *mut c_void);
    fn OpalParamCallCleared_m_callToken_set(param: *mut c_void, value: *const c_char);
    fn OpalParamCallCleared_m_callToken_get(param: *mut c_void) -> *const c_char;
    fn OpalParamCallCleared_m_reason_set(param: *mut c_void, value: c_int);
    fn OpalParamCallCleared_m_reason_get(param: *mut c_void) -> c_int;
}

/// [`CallClearedApi`] backed by the engine glue library.
#[derive(Debug, Default, Clone, Copy)]
pub struct FfiApi;

impl FfiApi {
    pub fn new() -> Self {
        Self
    }
}

impl CallClearedApi for FfiApi {
    fn alloc(&self) -> CallClearedResult<RawParam> {
        // SAFETY: no preconditions; the glue returns null when the engine
        // cannot allocate.
        let pointer = unsafe { new_OpalParamCallCleared() };
        if pointer.is_null() {
            return Err(CallClearedError::Allocation(
                "new_OpalParamCallCleared returned null".into(),
            ));
        }
        Ok(RawParam::from_raw(pointer))
    }

    fn free(&self, handle: RawParam) {
        if handle.is_null() {
            return;
        }
        // SAFETY: per the trait contract the handle came from alloc and has
        // not been freed; the wrapper's swap-to-null guarantees this path
        // runs at most once per block.
        unsafe { delete_OpalParamCallCleared(handle.as_ptr()) }
    }

    fn call_token(&self, handle: RawParam) -> CallClearedResult<String> {
        // SAFETY: the handle refers to a live block per the trait contract.
        let value = unsafe { OpalParamCallCleared_m_callToken_get(handle.as_ptr()) };
        if value.is_null() {
            // An unset native string field reads back as the empty token.
            return Ok(String::new());
        }
        // SAFETY: the glue returns a NUL-terminated string owned by the
        // block; it stays valid until the next set on the same block, and we
        // copy it out before returning.
        let bytes = unsafe { CStr::from_ptr(value) };
        Ok(bytes.to_str().map(str::to_owned)?)
    }

    fn set_call_token(&self, handle: RawParam, token: &str) -> CallClearedResult<()> {
        let token = CString::new(token)?;
        // SAFETY: the handle refers to a live block and the glue copies the
        // string before returning, so the borrow of `token` is long enough.
        unsafe { OpalParamCallCleared_m_callToken_set(handle.as_ptr(), token.as_ptr()) }
        Ok(())
    }

    fn reason_code(&self, handle: RawParam) -> CallClearedResult<i32> {
        // SAFETY: the handle refers to a live block per the trait contract.
        Ok(unsafe { OpalParamCallCleared_m_reason_get(handle.as_ptr()) })
    }

    fn set_reason_code(&self, handle: RawParam, code: i32) -> CallClearedResult<()> {
        // SAFETY: the handle refers to a live block per the trait contract.
        unsafe { OpalParamCallCleared_m_reason_set(handle.as_ptr(), code) }
        Ok(())
    }
}
