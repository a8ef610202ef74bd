//! Clipboard access through the terminal (OSC 52), which also works over SSH.

use std::io::{self, Write};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Build the OSC 52 "set clipboard" escape sequence for `text`.
pub fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", STANDARD.encode(text))
}

pub fn copy_to_clipboard(text: &str) -> io::Result<()> {
    let mut out = io::stdout();
    out.write_all(osc52_sequence(text).as_bytes())?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_wraps_base64_payload() {
        assert_eq!(osc52_sequence("hello"), "\x1b]52;c;aGVsbG8=\x07");
    }

    #[test]
    fn sequence_handles_unicode() {
        let seq = osc52_sequence("✦ answer");
        assert!(seq.starts_with("\x1b]52;c;"));
        assert!(seq.ends_with('\x07'));
        assert!(seq.is_ascii());
    }
}
