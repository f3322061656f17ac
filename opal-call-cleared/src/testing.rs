//! In-process fake of the engine's parameter-block entry points.
//!
//! [`FakeEngine`] backs handles with a registry of real blocks so lifecycle
//! tests can observe allocation and free counts, and it panics on a double
//! free or a dangling handle instead of corrupting memory the way the real
//! engine would. [`crate::provider::MockCallClearedApi`] covers
//! expectation-style tests; this type covers functional ones.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::errors::{CallClearedError, CallClearedResult};
use crate::provider::{CallClearedApi, RawParam};

#[derive(Debug, Default)]
struct FakeBlock {
    token: String,
    reason_code: i32,
}

/// Registry-backed stand-in for the native engine.
#[derive(Debug)]
pub struct FakeEngine {
    blocks: Mutex<HashMap<usize, FakeBlock>>,
    next_handle: AtomicUsize,
    freed: AtomicUsize,
    fail_next_alloc: AtomicBool,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self {
            blocks: Mutex::new(HashMap::new()),
            // Handle values are synthetic non-zero addresses.
            next_handle: AtomicUsize::new(0x1000),
            freed: AtomicUsize::new(0),
            fail_next_alloc: AtomicBool::new(false),
        }
    }

    /// Makes the next [`CallClearedApi::alloc`] fail once.
    pub fn fail_next_alloc(&self) {
        self.fail_next_alloc.store(true, Ordering::SeqCst);
    }

    /// Number of blocks freed so far.
    pub fn freed_count(&self) -> usize {
        self.freed.load(Ordering::SeqCst)
    }

    /// Number of blocks currently allocated.
    pub fn live_count(&self) -> usize {
        self.blocks.lock().expect("fake engine lock poisoned").len()
    }

    fn key(handle: RawParam) -> usize {
        handle.as_ptr().addr()
    }
}

impl Default for FakeEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl CallClearedApi for FakeEngine {
    fn alloc(&self) -> CallClearedResult<RawParam> {
        if self.fail_next_alloc.swap(false, Ordering::SeqCst) {
            return Err(CallClearedError::Allocation(
                "injected allocation failure".into(),
            ));
        }
        let id = self.next_handle.fetch_add(1, Ordering::SeqCst);
        self.blocks
            .lock()
            .expect("fake engine lock poisoned")
            .insert(id, FakeBlock::default());
        Ok(RawParam::from_raw(std::ptr::without_provenance_mut(id)))
    }

    fn free(&self, handle: RawParam) {
        if handle.is_null() {
            return;
        }
        let id = Self::key(handle);
        let removed = self
            .blocks
            .lock()
            .expect("fake engine lock poisoned")
            .remove(&id);
        assert!(removed.is_some(), "double free of handle {id:#x}");
        self.freed.fetch_add(1, Ordering::SeqCst);
    }

    fn call_token(&self, handle: RawParam) -> CallClearedResult<String> {
        let id = Self::key(handle);
        let blocks = self.blocks.lock().expect("fake engine lock poisoned");
        let block = blocks
            .get(&id)
            .unwrap_or_else(|| panic!("read through dangling handle {id:#x}"));
        Ok(block.token.clone())
    }

    fn set_call_token(&self, handle: RawParam, token: &str) -> CallClearedResult<()> {
        // The real boundary carries NUL-terminated strings.
        if token.contains('\0') {
            return Err(CallClearedError::Conversion(
                "token contains an embedded NUL byte".into(),
            ));
        }
        let id = Self::key(handle);
        let mut blocks = self.blocks.lock().expect("fake engine lock poisoned");
        let block = blocks
            .get_mut(&id)
            .unwrap_or_else(|| panic!("write through dangling handle {id:#x}"));
        block.token = token.to_owned();
        Ok(())
    }

    fn reason_code(&self, handle: RawParam) -> CallClearedResult<i32> {
        let id = Self::key(handle);
        let blocks = self.blocks.lock().expect("fake engine lock poisoned");
        let block = blocks
            .get(&id)
            .unwrap_or_else(|| panic!("read through dangling handle {id:#x}"));
        Ok(block.reason_code)
    }

    fn set_reason_code(&self, handle: RawParam, code: i32) -> CallClearedResult<()> {
        // The native field is a plain integer; any value is storable and
        // validation happens on decode.
        let id = Self::key(handle);
        let mut blocks = self.blocks.lock().expect("fake engine lock poisoned");
        let block = blocks
            .get_mut(&id)
            .unwrap_or_else(|| panic!("write through dangling handle {id:#x}"));
        block.reason_code = code;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_free_accounting() {
        let engine = FakeEngine::new();
        let a = engine.alloc().unwrap();
        let b = engine.alloc().unwrap();
        assert_ne!(a, b);
        assert_eq!(engine.live_count(), 2);

        engine.free(a);
        assert_eq!(engine.freed_count(), 1);
        assert_eq!(engine.live_count(), 1);
        engine.free(b);
        assert_eq!(engine.freed_count(), 2);
        assert_eq!(engine.live_count(), 0);
    }

    #[test]
    #[should_panic(expected = "double free")]
    fn double_free_is_detected() {
        let engine = FakeEngine::new();
        let handle = engine.alloc().unwrap();
        engine.free(handle);
        engine.free(handle);
    }

    #[test]
    fn freeing_the_null_sentinel_is_a_no_op() {
        let engine = FakeEngine::new();
        engine.free(RawParam::null());
        assert_eq!(engine.freed_count(), 0);
    }

    #[test]
    fn fail_next_alloc_is_one_shot() {
        let engine = FakeEngine::new();
        engine.fail_next_alloc();
        assert!(engine.alloc().is_err());
        assert!(engine.alloc().is_ok());
    }

    #[test]
    fn blocks_are_independent() {
        let engine = FakeEngine::new();
        let a = engine.alloc().unwrap();
        let b = engine.alloc().unwrap();

        engine.set_call_token(a, "alpha").unwrap();
        engine.set_reason_code(b, 7).unwrap();

        assert_eq!(engine.call_token(a).unwrap(), "alpha");
        assert_eq!(engine.call_token(b).unwrap(), "");
        assert_eq!(engine.reason_code(a).unwrap(), 0);
        assert_eq!(engine.reason_code(b).unwrap(), 7);
    }
}
