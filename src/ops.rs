//! One-shot clipboard operations.
//!
//! Each call takes its own [`Lock`] with no native handle, performs one
//! operation and lets the lock release on return. Nothing is held
//! between calls. The `*_with` forms run the same sequence against an
//! explicit binding type.

use crate::binding::{Binding, PlatformBinding};
use crate::format::{Format, text_format};
use crate::lock::Lock;

/// Whether the clipboard holds data convertible to `format`.
pub fn has(format: Format) -> bool {
    has_with::<PlatformBinding>(format)
}

/// Empty the clipboard.
pub fn clear() -> bool {
    clear_with::<PlatformBinding>()
}

/// Replace the clipboard text.
pub fn set_text(value: &str) -> bool {
    set_text_with::<PlatformBinding>(value)
}

/// Read the clipboard text. `None` if the clipboard could not be locked
/// or holds no text.
pub fn get_text() -> Option<String> {
    get_text_with::<PlatformBinding>()
}

/// [`has`] through binding `B`.
pub fn has_with<B: Binding>(format: Format) -> bool {
    let l = Lock::<B>::with_binding(None);
    if !l.locked() {
        return false;
    }
    l.is_convertible(format)
}

/// [`clear`] through binding `B`.
pub fn clear_with<B: Binding>() -> bool {
    let mut l = Lock::<B>::with_binding(None);
    if !l.locked() {
        return false;
    }
    l.clear()
}

/// Publishes `value` plus a trailing NUL terminator.
pub fn set_text_with<B: Binding>(value: &str) -> bool {
    let mut l = Lock::<B>::with_binding(None);
    if !l.locked() {
        return false;
    }

    let mut data = Vec::with_capacity(value.len() + 1);
    data.extend_from_slice(value.as_bytes());
    data.push(0);
    l.set_data(text_format(), &data)
}

/// Sizes first, then fetches into a buffer of exactly that length.
/// The result stops at the first NUL.
pub fn get_text_with<B: Binding>() -> Option<String> {
    let mut l = Lock::<B>::with_binding(None);
    if !l.locked() {
        return None;
    }

    let format = text_format();
    if !l.is_convertible(format) {
        return None;
    }

    let len = l.get_data_length(format);
    if len == 0 {
        return Some(String::new());
    }

    let mut buf = vec![0u8; len];
    if !l.get_data(format, &mut buf) {
        tracing::warn!(len, "clipboard text transfer failed");
    }
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    buf.truncate(end);
    Some(String::from_utf8_lossy(&buf).into_owned())
}
