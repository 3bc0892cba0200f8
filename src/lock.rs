//! Clipboard lock — scoped, exclusive access to the system clipboard.
//!
//! Construction makes a single acquisition attempt through the binding;
//! dropping the lock drops the binding, which releases the clipboard on
//! every exit path. The acquisition result is fixed at construction:
//! a lock that failed to acquire answers `false` / `0` to everything
//! without contacting the binding.
//!
//! A lock that *did* acquire but whose binding later reports the
//! clipboard lost cannot honor its contract. That is the one case
//! routed through the error hook ([`ErrorCode::CannotLock`]).

use crate::binding::{Binding, NativeHandle, PlatformBinding};
use crate::error::{self, ErrorCode};
use crate::format::Format;

/// Exclusive handle on the clipboard.
///
/// Not `Clone`: exactly one owner controls the binding and releases it,
/// once, when dropped.
#[derive(Debug)]
pub struct Lock<B: Binding = PlatformBinding> {
    binding: B,
    locked: bool,
}

impl Lock {
    /// Acquire the clipboard through the platform binding.
    pub fn new(handle: Option<NativeHandle>) -> Self {
        Self::with_binding(handle)
    }
}

impl<B: Binding> Lock<B> {
    /// Acquire the clipboard through binding `B`.
    pub fn with_binding(handle: Option<NativeHandle>) -> Self {
        let binding = B::open(handle);
        let locked = binding.locked();
        tracing::debug!(locked, ?handle, "clipboard lock constructed");
        Self { binding, locked }
    }

    /// Whether acquisition succeeded at construction.
    pub fn locked(&self) -> bool {
        self.locked
    }

    /// Empty the clipboard.
    pub fn clear(&mut self) -> bool {
        self.held() && self.binding.clear()
    }

    /// Whether the current contents can be produced as `format`.
    pub fn is_convertible(&self, format: Format) -> bool {
        self.held() && self.binding.is_convertible(format)
    }

    /// Publish `data` tagged with `format`.
    pub fn set_data(&mut self, format: Format, data: &[u8]) -> bool {
        self.held() && self.binding.set_data(format, data)
    }

    /// Bytes needed to receive the contents as `format`; 0 if none.
    ///
    /// Call before [`get_data`](Self::get_data) to size the buffer.
    pub fn get_data_length(&mut self, format: Format) -> usize {
        if !self.held() {
            return 0;
        }
        self.binding.get_data_length(format)
    }

    /// Copy the contents as `format` into `buf`.
    ///
    /// `buf` must be at least as long as the last
    /// [`get_data_length`](Self::get_data_length) result; a shorter
    /// buffer fails without being written past its end.
    pub fn get_data(&mut self, format: Format, buf: &mut [u8]) -> bool {
        self.held() && self.binding.get_data(format, buf)
    }

    /// Gate for every data operation.
    fn held(&self) -> bool {
        if !self.locked {
            return false;
        }
        if !self.binding.locked() {
            error::report(ErrorCode::CannotLock);
            return false;
        }
        true
    }
}
