//! Clipboard transfer via `xclip`.
//!
//! Serving an X11 selection needs a process that stays alive to answer
//! `SelectionRequest`s; `xclip` forks into the background and does that
//! for us. Reads go through `xclip -o`.

use std::io::Write;
use std::process::{Command, Stdio};

use crate::binding::BindingError;

const PROGRAM: &str = "xclip";

/// Selection name as `xclip` spells it.
const SELECTION: &str = "clipboard";

/// Publish `content` on the clipboard as `target`.
pub(super) fn write(target: &str, content: &[u8]) -> Result<(), BindingError> {
    let mut child = Command::new(PROGRAM)
        .args(["-selection", SELECTION, "-t", target])
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|source| BindingError::Spawn {
            program: PROGRAM,
            source,
        })?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(content)?;
        // Drop stdin to close the pipe so xclip can finish.
    }

    let status = child.wait()?;
    if status.success() {
        Ok(())
    } else {
        Err(BindingError::Exit {
            program: PROGRAM,
            status,
        })
    }
}

/// Read the clipboard converted to `target`.
pub(super) fn read(target: &str) -> Result<Vec<u8>, BindingError> {
    let output = Command::new(PROGRAM)
        .args(["-selection", SELECTION, "-t", target, "-o"])
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .map_err(|source| BindingError::Spawn {
            program: PROGRAM,
            source,
        })?;

    if output.status.success() {
        Ok(output.stdout)
    } else {
        Err(BindingError::Exit {
            program: PROGRAM,
            status: output.status,
        })
    }
}

/// Target names the current selection owner can convert to.
pub(super) fn targets() -> Result<Vec<String>, BindingError> {
    read("TARGETS").map(|raw| parse_targets(&raw))
}

/// One atom name per line, blank lines ignored.
fn parse_targets(raw: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(raw)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}
