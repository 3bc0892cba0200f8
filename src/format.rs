//! Format identifiers — opaque tokens naming a clipboard data kind.
//!
//! Two values are reserved: [`Format::EMPTY`] (0) and [`Format::TEXT`] (1).
//! Everything else is handed out by [`register_format`], one id per
//! distinct name, stable for the lifetime of the process.
//!
//! The lock never interprets a format; bindings that need a native name
//! for it (X11 selection targets) resolve it through [`format_name`].

use std::collections::HashMap;
use std::fmt;

use parking_lot::Mutex;

/// Opaque identifier for a clipboard data representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Format(u32);

impl Format {
    /// "No data" placeholder.
    pub const EMPTY: Format = Format(0);
    /// Null-terminated plain text.
    pub const TEXT: Format = Format(1);

    /// Wrap a raw value. Callers are responsible for not colliding with
    /// ids handed out by [`register_format`].
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Underlying numeric value.
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Format::EMPTY => f.write_str("empty"),
            Format::TEXT => f.write_str("text"),
            Format(raw) => write!(f, "format#{raw}"),
        }
    }
}

/// Reserved value for "no data".
pub const fn empty_format() -> Format {
    Format::EMPTY
}

/// Reserved value for plain text.
pub const fn text_format() -> Format {
    Format::TEXT
}

/// First id available to registered formats.
const FIRST_CUSTOM: u32 = 2;

/// Name ↔ id table for registered formats.
struct Registry {
    by_name: HashMap<String, Format>,
    names: Vec<String>,
}

static REGISTRY: Mutex<Option<Registry>> = parking_lot::const_mutex(None);

/// Register a caller-defined format by name.
///
/// Idempotent: registering the same name again returns the same id.
/// Returns `None` only for an empty name.
pub fn register_format(name: &str) -> Option<Format> {
    if name.is_empty() {
        return None;
    }

    let mut guard = REGISTRY.lock();
    let registry = guard.get_or_insert_with(|| Registry {
        by_name: HashMap::new(),
        names: Vec::new(),
    });

    if let Some(&format) = registry.by_name.get(name) {
        return Some(format);
    }

    let format = Format(FIRST_CUSTOM + registry.names.len() as u32);
    registry.names.push(name.to_owned());
    registry.by_name.insert(name.to_owned(), format);
    tracing::debug!(registered = name, id = format.raw(), "registered clipboard format");
    Some(format)
}

/// Name a format was registered under. Reserved formats have no name.
pub fn format_name(format: Format) -> Option<String> {
    let index = format.raw().checked_sub(FIRST_CUSTOM)? as usize;
    let guard = REGISTRY.lock();
    guard.as_ref()?.names.get(index).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_values() {
        assert_eq!(empty_format().raw(), 0);
        assert_eq!(text_format().raw(), 1);
        assert_ne!(empty_format(), text_format());
    }

    #[test]
    fn display_names() {
        assert_eq!(Format::EMPTY.to_string(), "empty");
        assert_eq!(Format::TEXT.to_string(), "text");
        assert_eq!(Format::from_raw(42).to_string(), "format#42");
    }

    // -- Registry --

    #[test]
    fn register_is_idempotent() {
        let a = register_format("application/x-cliplock-idem").unwrap();
        let b = register_format("application/x-cliplock-idem").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn registered_ids_skip_reserved_values() {
        let f = register_format("application/x-cliplock-reserved").unwrap();
        assert!(f.raw() >= 2);
    }

    #[test]
    fn distinct_names_get_distinct_ids() {
        let a = register_format("application/x-cliplock-a").unwrap();
        let b = register_format("application/x-cliplock-b").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn name_round_trips() {
        let f = register_format("image/x-cliplock-name").unwrap();
        assert_eq!(format_name(f).as_deref(), Some("image/x-cliplock-name"));
    }

    #[test]
    fn reserved_and_unknown_have_no_name() {
        assert_eq!(format_name(Format::EMPTY), None);
        assert_eq!(format_name(Format::TEXT), None);
        assert_eq!(format_name(Format::from_raw(u32::MAX)), None);
    }

    #[test]
    fn empty_name_rejected() {
        assert_eq!(register_format(""), None);
    }
}
