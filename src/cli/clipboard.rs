//! Clipboard backends for `copy-md`.

use std::io::{self, Write};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use crossterm::{execute, style::Print};
use recruit_core::{Clipboard, CoreError, FallbackClipboard};

/// The desktop clipboard. The handle is opened on first use and kept, since
/// some platforms drop the contents together with it.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clipboard for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), CoreError> {
        if self.inner.is_none() {
            self.inner = Some(arboard::Clipboard::new().map_err(clipboard_error)?);
        }
        if let Some(clipboard) = self.inner.as_mut() {
            clipboard.set_text(text.to_owned()).map_err(clipboard_error)?;
        }
        Ok(())
    }
}

/// Asks the terminal to set the clipboard through an OSC 52 escape sequence.
pub struct Osc52Clipboard<W: Write = io::Stdout> {
    out: W,
}

impl Osc52Clipboard {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> Osc52Clipboard<W> {
    pub fn with_writer(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Clipboard for Osc52Clipboard<W> {
    fn write_text(&mut self, text: &str) -> Result<(), CoreError> {
        execute!(self.out, Print(osc52_sequence(text))).map_err(clipboard_error)
    }
}

pub fn osc52_sequence(text: &str) -> String {
    let encoded = STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{encoded}\x1b\\")
}

/// Desktop clipboard first, terminal escape when that is unavailable.
pub fn terminal_clipboard() -> Box<dyn Clipboard> {
    Box::new(FallbackClipboard::new(
        SystemClipboard::new(),
        Osc52Clipboard::stdout(),
    ))
}

fn clipboard_error(err: impl std::fmt::Display) -> CoreError {
    CoreError::Clipboard(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn osc52_sequence_wraps_base64_payload() {
        assert_eq!(osc52_sequence("hi"), "\x1b]52;c;aGk=\x1b\\");
    }

    #[test]
    fn osc52_clipboard_writes_the_sequence() {
        let mut clipboard = Osc52Clipboard::with_writer(Vec::new());
        clipboard.write_text("募集").expect("write");
        let written = String::from_utf8(clipboard.into_inner()).expect("utf8");
        assert_eq!(written, osc52_sequence("募集"));
    }
}
