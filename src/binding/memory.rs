//! In-process binding — used where no platform clipboard is compiled in.
//!
//! Contents live in a process-wide table keyed by format, so data set
//! through one lock is visible to the next. Several formats may be held
//! at once; `clear` drops them all.

use std::collections::HashMap;

use parking_lot::Mutex;

use super::{Binding, Claim, NativeHandle};
use crate::format::Format;

static STORE: Mutex<Option<HashMap<Format, Vec<u8>>>> = parking_lot::const_mutex(None);

/// In-process clipboard binding.
#[derive(Debug)]
pub struct MemoryBinding {
    claim: Claim,
}

impl MemoryBinding {
    fn with_store<R>(f: impl FnOnce(&mut HashMap<Format, Vec<u8>>) -> R) -> R {
        let mut guard = STORE.lock();
        f(guard.get_or_insert_with(HashMap::new))
    }
}

impl Binding for MemoryBinding {
    fn open(_handle: Option<NativeHandle>) -> Self {
        let claim = Claim::try_acquire();
        tracing::debug!(locked = claim.held(), "memory clipboard opened");
        Self { claim }
    }

    fn locked(&self) -> bool {
        self.claim.held()
    }

    fn clear(&mut self) -> bool {
        if !self.locked() {
            return false;
        }
        Self::with_store(HashMap::clear);
        true
    }

    fn is_convertible(&self, format: Format) -> bool {
        self.locked() && Self::with_store(|store| store.contains_key(&format))
    }

    fn set_data(&mut self, format: Format, data: &[u8]) -> bool {
        if !self.locked() {
            return false;
        }
        Self::with_store(|store| store.insert(format, data.to_vec()));
        true
    }

    fn get_data_length(&mut self, format: Format) -> usize {
        if !self.locked() {
            return 0;
        }
        Self::with_store(|store| store.get(&format).map_or(0, Vec::len))
    }

    fn get_data(&mut self, format: Format, buf: &mut [u8]) -> bool {
        if !self.locked() {
            return false;
        }
        Self::with_store(|store| match store.get(&format) {
            Some(data) if data.len() <= buf.len() => {
                buf[..data.len()].copy_from_slice(data);
                true
            }
            Some(data) => {
                tracing::warn!(
                    format = %format,
                    needed = data.len(),
                    given = buf.len(),
                    "buffer too small for clipboard data"
                );
                false
            }
            None => false,
        })
    }
}

impl Drop for MemoryBinding {
    fn drop(&mut self) {
        tracing::debug!(locked = self.claim.held(), "memory clipboard released");
    }
}
