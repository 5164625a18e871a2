//! System clipboard backed by arboard.

use crate::errors::{CerberoError, Result};
use crate::vault::Clipboard;

/// Whether text copied by a process stays on the clipboard after it exits.
///
/// On X11 and Wayland the owning process serves the selection itself, so a
/// copy made by a one-shot command vanishes as soon as Cerbero returns.
pub const OUTLIVES_PROCESS: bool = cfg!(any(target_os = "macos", target_os = "windows"));

/// The desktop clipboard.
///
/// Where `OUTLIVES_PROCESS` is false the copied text is only available
/// while Cerbero runs (the interactive shell keeps it).
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

impl SystemClipboard {
    pub fn new() -> Result<Self> {
        let inner =
            arboard::Clipboard::new().map_err(|e| CerberoError::Clipboard(e.to_string()))?;
        Ok(Self { inner })
    }
}

impl Clipboard for SystemClipboard {
    fn copy(&mut self, text: &str) -> Result<()> {
        self.inner
            .set_text(text)
            .map_err(|e| CerberoError::Clipboard(e.to_string()))
    }
}
