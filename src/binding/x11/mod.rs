//! X11 binding — clipboard access on X11 desktops.
//!
//! Acquisition takes the in-process claim and opens a display
//! connection with an unmapped helper window (or the caller's window,
//! if a native handle is given). Selection ownership queries and
//! `clear` go through x11rb directly; data transfer is delegated to
//! `xclip` (see [`xclip`]).
//!
//! Text is exchanged NUL-terminated at the binding boundary: the
//! terminator is stripped before publishing and appended on read.

mod xclip;

use x11rb::connection::Connection;
use x11rb::protocol::xproto::{self, Atom, CreateWindowAux, Window, WindowClass};
use x11rb::rust_connection::RustConnection;
use x11rb::{COPY_DEPTH_FROM_PARENT, COPY_FROM_PARENT, CURRENT_TIME, NONE};

use super::{Binding, BindingError, Claim, NativeHandle};
use crate::format::{self, Format};

/// Selection the binding operates on.
const CLIPBOARD_SELECTION: &[u8] = b"CLIPBOARD";

/// Targets accepted for [`Format::TEXT`], most preferred first.
const TEXT_TARGETS: [&str; 5] = [
    "UTF8_STRING",
    "text/plain;charset=utf-8",
    "STRING",
    "TEXT",
    "text/plain",
];

/// Display connection held for the lifetime of one lock.
struct Session {
    conn: RustConnection,
    window: Window,
    /// Whether `window` was created here and must be destroyed.
    owns_window: bool,
    clipboard: Atom,
}

impl Session {
    fn connect(handle: Option<NativeHandle>) -> Result<Self, BindingError> {
        let (conn, screen_num) = RustConnection::connect(None)
            .map_err(|e| BindingError::Display(format!("connect failed: {e}")))?;

        let clipboard = xproto::intern_atom(&conn, false, CLIPBOARD_SELECTION)
            .map_err(|e| BindingError::Protocol(format!("intern_atom: {e}")))?
            .reply()
            .map_err(|e| BindingError::Protocol(format!("intern_atom reply: {e}")))?
            .atom;

        let (window, owns_window) = match handle {
            Some(NativeHandle(raw)) => (raw as Window, false),
            None => (create_helper_window(&conn, screen_num)?, true),
        };

        Ok(Self {
            conn,
            window,
            owns_window,
            clipboard,
        })
    }

    /// Current owner of `CLIPBOARD`, `NONE` if unowned.
    fn selection_owner(&self) -> Result<Window, BindingError> {
        Ok(xproto::get_selection_owner(&self.conn, self.clipboard)
            .map_err(|e| BindingError::Protocol(format!("get_selection_owner: {e}")))?
            .reply()
            .map_err(|e| BindingError::Protocol(format!("get_selection_owner reply: {e}")))?
            .owner)
    }

    /// Take the selection, then give it up, leaving it unowned.
    fn disown_selection(&self) -> Result<(), BindingError> {
        for owner in [self.window, NONE] {
            xproto::set_selection_owner(&self.conn, owner, self.clipboard, CURRENT_TIME)
                .map_err(|e| BindingError::Protocol(format!("set_selection_owner: {e}")))?
                .check()
                .map_err(|e| BindingError::Protocol(format!("set_selection_owner reply: {e}")))?;
        }
        Ok(())
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if !self.owns_window {
            return;
        }
        if let Err(e) = xproto::destroy_window(&self.conn, self.window) {
            tracing::debug!(error = %e, "destroy helper window failed");
        }
        if let Err(e) = self.conn.flush() {
            tracing::debug!(error = %e, "flush after destroy failed");
        }
    }
}

fn create_helper_window(conn: &RustConnection, screen_num: usize) -> Result<Window, BindingError> {
    let root = conn.setup().roots[screen_num].root;
    let window = conn
        .generate_id()
        .map_err(|e| BindingError::Protocol(format!("generate_id: {e}")))?;

    xproto::create_window(
        conn,
        COPY_DEPTH_FROM_PARENT,
        window,
        root,
        0,
        0,
        1,
        1,
        0,
        WindowClass::INPUT_OUTPUT,
        COPY_FROM_PARENT,
        &CreateWindowAux::new(),
    )
    .map_err(|e| BindingError::Protocol(format!("create_window: {e}")))?
    .check()
    .map_err(|e| BindingError::Protocol(format!("create_window reply: {e}")))?;

    Ok(window)
}

/// X11 implementation of [`Binding`].
pub struct X11Binding {
    // Dropped before the claim so the window is gone when the next
    // lock can be taken.
    session: Option<Session>,
    claim: Claim,
    /// Payload fetched by the last sizing query.
    cache: Option<(Format, Vec<u8>)>,
}

impl std::fmt::Debug for X11Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("X11Binding")
            .field("locked", &self.locked())
            .field("window", &self.session.as_ref().map(|s| s.window))
            .finish_non_exhaustive()
    }
}

impl X11Binding {
    /// Pull the payload for `format` from the selection owner.
    fn fetch(&self, format: Format) -> Result<Vec<u8>, BindingError> {
        let candidates = targets_for(format);
        let mut last_err = BindingError::Unsupported(format);
        for target in &candidates {
            match xclip::read(target) {
                Ok(data) => return Ok(data),
                Err(e) => last_err = e,
            }
        }
        Err(last_err)
    }

    /// Cached payload for `format`, fetching on a miss.
    fn payload(&mut self, format: Format) -> Result<&[u8], BindingError> {
        let hit = matches!(&self.cache, Some((cached, _)) if *cached == format);
        if !hit {
            let data = self.fetch(format)?;
            self.cache = Some((format, data));
        }
        Ok(self.cache.as_ref().map_or(&[][..], |(_, data)| data.as_slice()))
    }

    fn try_is_convertible(&self, format: Format) -> Result<bool, BindingError> {
        let session = self
            .session
            .as_ref()
            .ok_or_else(|| BindingError::Display("not connected".into()))?;
        if session.selection_owner()? == NONE {
            return Ok(false);
        }
        let wanted = targets_for(format);
        if wanted.is_empty() {
            return Ok(false);
        }
        let offered = xclip::targets()?;
        Ok(wanted.iter().any(|t| offered.contains(t)))
    }
}

impl Binding for X11Binding {
    fn open(handle: Option<NativeHandle>) -> Self {
        let mut claim = Claim::try_acquire();
        let session = if claim.held() {
            match Session::connect(handle) {
                Ok(session) => Some(session),
                Err(e) => {
                    tracing::debug!(error = %e, "X11 clipboard unavailable");
                    claim.release();
                    None
                }
            }
        } else {
            None
        };

        tracing::debug!(
            locked = session.is_some(),
            window = session.as_ref().map(|s| s.window),
            "X11 clipboard opened"
        );

        Self {
            session,
            claim,
            cache: None,
        }
    }

    fn locked(&self) -> bool {
        self.claim.held() && self.session.is_some()
    }

    fn clear(&mut self) -> bool {
        if !self.locked() {
            return false;
        }
        self.cache = None;
        let Some(session) = &self.session else {
            return false;
        };
        match session.disown_selection() {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "clipboard clear failed");
                false
            }
        }
    }

    fn is_convertible(&self, format: Format) -> bool {
        if !self.locked() {
            return false;
        }
        match self.try_is_convertible(format) {
            Ok(convertible) => convertible,
            Err(e) => {
                tracing::warn!(format = %format, error = %e, "clipboard target query failed");
                false
            }
        }
    }

    fn set_data(&mut self, format: Format, data: &[u8]) -> bool {
        if !self.locked() {
            return false;
        }
        self.cache = None;
        let Some(target) = targets_for(format).into_iter().next() else {
            tracing::warn!(error = %BindingError::Unsupported(format), "clipboard write skipped");
            return false;
        };
        let payload = if format == Format::TEXT {
            strip_terminator(data)
        } else {
            data
        };

        match xclip::write(&target, payload) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(format = %format, selection_target = %target, error = %e, "clipboard write failed");
                false
            }
        }
    }

    fn get_data_length(&mut self, format: Format) -> usize {
        if !self.locked() {
            return 0;
        }
        match self.payload(format) {
            Ok(data) if format == Format::TEXT => terminated_len(strip_terminator(data)),
            Ok(data) => data.len(),
            Err(e) => {
                tracing::warn!(format = %format, error = %e, "clipboard read failed");
                0
            }
        }
    }

    fn get_data(&mut self, format: Format, buf: &mut [u8]) -> bool {
        if !self.locked() {
            return false;
        }
        let data = match self.payload(format) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!(format = %format, error = %e, "clipboard read failed");
                return false;
            }
        };

        if format == Format::TEXT {
            let text = strip_terminator(data);
            if text.len() + 1 > buf.len() {
                return false;
            }
            buf[..text.len()].copy_from_slice(text);
            buf[text.len()] = 0;
        } else {
            if data.len() > buf.len() {
                return false;
            }
            buf[..data.len()].copy_from_slice(data);
        }
        true
    }
}

impl Drop for X11Binding {
    fn drop(&mut self) {
        tracing::debug!(locked = self.locked(), "X11 clipboard released");
    }
}

/// Selection targets that can carry `format`. Empty if it has none.
fn targets_for(format: Format) -> Vec<String> {
    match format {
        Format::EMPTY => Vec::new(),
        Format::TEXT => TEXT_TARGETS.iter().map(|t| (*t).to_owned()).collect(),
        custom => format::format_name(custom).into_iter().collect(),
    }
}

/// `data` without one trailing NUL, if present.
fn strip_terminator(data: &[u8]) -> &[u8] {
    data.strip_suffix(b"\0").unwrap_or(data)
}

/// Buffer size for `text` plus terminator; 0 for no text.
fn terminated_len(text: &[u8]) -> usize {
    if text.is_empty() { 0 } else { text.len() + 1 }
}
