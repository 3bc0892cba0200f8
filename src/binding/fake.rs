//! Scriptable binding for tests.
//!
//! State is thread-local so each test thread drives its own clipboard.
//! Every trait call is recorded, which lets tests assert that the lock
//! never contacted the binding.

use std::cell::RefCell;
use std::collections::HashMap;

use super::{Binding, NativeHandle};
use crate::format::Format;

/// Recorded binding call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Open(Option<NativeHandle>),
    Clear,
    IsConvertible(Format),
    SetData(Format, usize),
    GetDataLength(Format),
    GetData(Format, usize),
    Release,
}

#[derive(Debug, Default)]
pub(crate) struct FakeState {
    /// Whether the next `open` succeeds.
    pub(crate) refuse_lock: bool,
    /// Binding reports the lock lost after this many `locked()` queries.
    pub(crate) lose_lock_after: Option<usize>,
    /// Formats reported convertible with zero-length data.
    pub(crate) empty_convertible: Vec<Format>,
    pub(crate) contents: HashMap<Format, Vec<u8>>,
    pub(crate) calls: Vec<Call>,
    locked_queries: usize,
}

thread_local! {
    static STATE: RefCell<FakeState> = RefCell::new(FakeState::default());
}

/// Reset this thread's fake clipboard. Also routes logs to the test
/// writer (`RUST_LOG=debug cargo test` to see them).
pub(crate) fn reset() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
    STATE.with(|s| *s.borrow_mut() = FakeState::default());
}

/// Mutate this thread's fake clipboard.
pub(crate) fn with_state<R>(f: impl FnOnce(&mut FakeState) -> R) -> R {
    STATE.with(|s| f(&mut s.borrow_mut()))
}

/// Calls recorded since the last reset, excluding open/release.
pub(crate) fn data_calls() -> Vec<Call> {
    with_state(|s| {
        s.calls
            .iter()
            .filter(|c| !matches!(c, Call::Open(_) | Call::Release))
            .cloned()
            .collect()
    })
}

#[derive(Debug)]
pub(crate) struct FakeBinding {
    locked: bool,
}

impl Binding for FakeBinding {
    fn open(handle: Option<NativeHandle>) -> Self {
        with_state(|s| {
            s.calls.push(Call::Open(handle));
            Self {
                locked: !s.refuse_lock,
            }
        })
    }

    fn locked(&self) -> bool {
        with_state(|s| {
            s.locked_queries += 1;
            match s.lose_lock_after {
                Some(n) if s.locked_queries > n => false,
                _ => self.locked,
            }
        })
    }

    fn clear(&mut self) -> bool {
        with_state(|s| {
            s.calls.push(Call::Clear);
            s.contents.clear();
            s.empty_convertible.clear();
        });
        true
    }

    fn is_convertible(&self, format: Format) -> bool {
        with_state(|s| {
            s.calls.push(Call::IsConvertible(format));
            s.contents.contains_key(&format) || s.empty_convertible.contains(&format)
        })
    }

    fn set_data(&mut self, format: Format, data: &[u8]) -> bool {
        with_state(|s| {
            s.calls.push(Call::SetData(format, data.len()));
            s.contents.insert(format, data.to_vec());
        });
        true
    }

    fn get_data_length(&mut self, format: Format) -> usize {
        with_state(|s| {
            s.calls.push(Call::GetDataLength(format));
            s.contents.get(&format).map_or(0, Vec::len)
        })
    }

    fn get_data(&mut self, format: Format, buf: &mut [u8]) -> bool {
        with_state(|s| {
            s.calls.push(Call::GetData(format, buf.len()));
            match s.contents.get(&format) {
                Some(data) if data.len() <= buf.len() => {
                    buf[..data.len()].copy_from_slice(data);
                    true
                }
                _ => false,
            }
        })
    }
}

impl Drop for FakeBinding {
    fn drop(&mut self) {
        with_state(|s| s.calls.push(Call::Release));
    }
}
