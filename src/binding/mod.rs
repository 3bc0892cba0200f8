//! Binding abstraction — the platform half of a clipboard lock.
//!
//! A binding performs the actual acquire/release/query/transfer against
//! the host environment. Exactly one implementation is compiled in as
//! [`PlatformBinding`]; the lock and the convenience API only ever see
//! the [`Binding`] trait.

pub mod memory;
#[cfg(all(unix, not(target_os = "macos"), feature = "x11"))]
pub mod x11;

#[cfg(test)]
pub(crate) mod fake;

use std::sync::atomic::{AtomicBool, Ordering};

use crate::format::Format;

pub use memory::MemoryBinding;
#[cfg(all(unix, not(target_os = "macos"), feature = "x11"))]
pub use x11::X11Binding;

/// Binding compiled in for this target.
#[cfg(all(unix, not(target_os = "macos"), feature = "x11"))]
pub type PlatformBinding = X11Binding;

/// Binding compiled in for this target.
#[cfg(not(all(unix, not(target_os = "macos"), feature = "x11")))]
pub type PlatformBinding = MemoryBinding;

/// Opaque native window/display handle passed through to the binding.
///
/// On X11 this is a window id; the lock never looks inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeHandle(pub usize);

/// Platform clipboard operations.
///
/// `open` makes one acquisition attempt; `Drop` releases. Every other
/// method reports ordinary failure as `false` / `0` and never panics.
/// Implementations must not write past the end of the slice given to
/// [`get_data`](Binding::get_data).
pub trait Binding: Sized {
    /// Attempt to acquire the clipboard, optionally scoped to `handle`.
    fn open(handle: Option<NativeHandle>) -> Self;

    /// Whether the clipboard is currently held by this instance.
    fn locked(&self) -> bool;

    /// Empty the clipboard.
    fn clear(&mut self) -> bool;

    /// Whether the current contents can be produced as `format`.
    fn is_convertible(&self, format: Format) -> bool;

    /// Publish `data` tagged with `format`.
    fn set_data(&mut self, format: Format, data: &[u8]) -> bool;

    /// Bytes needed to hold the contents converted to `format`.
    fn get_data_length(&mut self, format: Format) -> usize;

    /// Copy the contents converted to `format` into `buf`.
    fn get_data(&mut self, format: Format, buf: &mut [u8]) -> bool;
}

/// Errors raised inside a binding.
///
/// These never cross the public API: bindings log them and answer
/// `false` / `0`.
#[derive(Debug, thiserror::Error)]
pub enum BindingError {
    /// No display or display connection lost.
    #[error("display: {0}")]
    Display(String),

    /// X11 request or reply failed.
    #[error("protocol: {0}")]
    Protocol(String),

    /// Helper program could not be started.
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: &'static str,
        source: std::io::Error,
    },

    /// Pipe to or from the helper program failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Helper program exited unsuccessfully.
    #[error("{program} exited with status {status}")]
    Exit {
        program: &'static str,
        status: std::process::ExitStatus,
    },

    /// Format has no native representation in this binding.
    #[error("unsupported format {0}")]
    Unsupported(Format),
}

/// Process-wide flag marking the clipboard as held by some lock.
static CLIPBOARD_HELD: AtomicBool = AtomicBool::new(false);

/// In-process claim on the clipboard. Released on drop, only if this
/// instance won the claim.
#[derive(Debug)]
pub(crate) struct Claim {
    held: bool,
}

impl Claim {
    /// Single attempt; no waiting.
    pub(crate) fn try_acquire() -> Self {
        let held = CLIPBOARD_HELD
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if !held {
            tracing::debug!("clipboard already held in this process");
        }
        Self { held }
    }

    pub(crate) fn held(&self) -> bool {
        self.held
    }

    /// Give the claim back early (acquisition failed past this point).
    pub(crate) fn release(&mut self) {
        if self.held {
            CLIPBOARD_HELD.store(false, Ordering::Release);
            self.held = false;
        }
    }
}

impl Drop for Claim {
    fn drop(&mut self) {
        self.release();
    }
}

/// Serializes tests that take the process-wide claim.
#[cfg(test)]
pub(crate) static TEST_CLAIM_GUARD: parking_lot::Mutex<()> = parking_lot::const_mutex(());
