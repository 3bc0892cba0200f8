//! Scoped, format-negotiated access to the system clipboard.
//!
//! A [`Lock`] acquires the clipboard for the duration of a scope and
//! releases it on drop. Data is exchanged as raw bytes tagged with a
//! [`Format`]; sizing ([`Lock::get_data_length`]) always precedes
//! fetching ([`Lock::get_data`]). The free functions [`has`], [`clear`],
//! [`set_text`] and [`get_text`] each take and release their own lock.
//!
//! ```no_run
//! if cliplock::set_text("hello") {
//!     assert_eq!(cliplock::get_text().as_deref(), Some("hello"));
//! }
//! ```
//!
//! Ordinary failure (clipboard busy, format missing) is a `false` /
//! `None` result. Losing the clipboard mid-lock is a contract failure
//! and goes through the process-wide error hook instead; see
//! [`set_error_handler`].
//!
//! The platform binding is chosen at build time: X11 on unix with the
//! `x11` feature (default), an in-process clipboard otherwise.

pub mod binding;
mod error;
mod format;
mod lock;
mod ops;

pub use binding::{Binding, NativeHandle, PlatformBinding};
pub use error::{
    ErrorCode, ErrorHandler, default_error_handler, get_error_handler, set_error_handler,
};
pub use format::{Format, empty_format, format_name, register_format, text_format};
pub use lock::Lock;
pub use ops::{
    clear, clear_with, get_text, get_text_with, has, has_with, set_text, set_text_with,
};
