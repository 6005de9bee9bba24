//! Character-by-character output.

use std::io::{self, Write};
use std::thread;
use std::time::Duration;

/// Prints text one character at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Typewriter {
    delay: Duration,
}

impl Typewriter {
    /// Typewriter pausing `delay` after each visible character.
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Typewriter that writes text in one go.
    pub fn instant() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Whether text is written without pauses.
    pub fn is_instant(&self) -> bool {
        self.delay.is_zero()
    }

    /// Writes `text`, flushing after every character unless instant.
    pub fn type_out<W: Write + ?Sized>(&self, out: &mut W, text: &str) -> io::Result<()> {
        if self.is_instant() {
            return out.write_all(text.as_bytes());
        }

        let mut buf = [0u8; 4];
        for ch in text.chars() {
            out.write_all(ch.encode_utf8(&mut buf).as_bytes())?;
            out.flush()?;
            if !ch.is_whitespace() {
                thread::sleep(self.delay);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn instant_writes_everything() {
        let mut out = Vec::new();
        Typewriter::instant().type_out(&mut out, "Act I").unwrap();
        assert_eq!(out, b"Act I");
    }

    #[test]
    fn delayed_output_is_identical() {
        let mut out = Vec::new();
        let typewriter = Typewriter::new(Duration::from_micros(1));
        assert!(!typewriter.is_instant());
        typewriter.type_out(&mut out, "caf\u{e9}").unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "caf\u{e9}");
    }
}
