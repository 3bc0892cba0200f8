//! Error hook — process-wide policy for contract-level failures.
//!
//! Ordinary outcomes (clipboard busy, format missing, nothing to read)
//! are booleans. The hook is reserved for conditions where a [`Lock`]
//! can no longer honor its contract, currently only losing the
//! clipboard after a successful acquisition.
//!
//! [`Lock`]: crate::Lock

use parking_lot::RwLock;

/// Message table indexed by [`ErrorCode`]. One entry per variant.
const ERROR_MESSAGES: [&str; 1] = ["Cannot lock clipboard"];

/// Contract-level failure kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[repr(usize)]
pub enum ErrorCode {
    #[error("{}", self.message())]
    CannotLock = 0,
}

impl ErrorCode {
    /// Human-readable message from the fixed table.
    pub fn message(self) -> &'static str {
        ERROR_MESSAGES[self as usize]
    }
}

/// Hook invoked for contract-level failures. Expected not to return
/// normally.
pub type ErrorHandler = fn(ErrorCode);

static ERROR_HANDLER: RwLock<ErrorHandler> =
    parking_lot::const_rwlock(default_error_handler as ErrorHandler);

/// Handler installed at process start. Panics with the table message.
pub fn default_error_handler(code: ErrorCode) {
    panic!("{}", code.message());
}

/// Install `handler` as the process-wide hook, replacing the previous one.
pub fn set_error_handler(handler: ErrorHandler) {
    *ERROR_HANDLER.write() = handler;
}

/// Currently installed hook.
pub fn get_error_handler() -> ErrorHandler {
    *ERROR_HANDLER.read()
}

/// Route `code` through the installed hook.
///
/// The read guard is dropped before the call so a handler may replace
/// itself.
pub(crate) fn report(code: ErrorCode) {
    let handler = get_error_handler();
    tracing::error!(code = ?code, message = code.message(), "clipboard contract failure");
    handler(code);
}

/// Serializes tests that install handlers.
#[cfg(test)]
pub(crate) static TEST_HOOK_GUARD: parking_lot::Mutex<()> = parking_lot::const_mutex(());

/// Puts the default handler back on drop, including on a failed assert.
#[cfg(test)]
pub(crate) struct RestoreDefaultHandler;

#[cfg(test)]
impl Drop for RestoreDefaultHandler {
    fn drop(&mut self) {
        set_error_handler(default_error_handler);
    }
}
