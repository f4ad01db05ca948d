/// Keyboard input from the console tty in raw, non-blocking mode.

use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read};

use anyhow::{Context, Result};
use nix::sys::termios::{self, InputFlags, LocalFlags, OutputFlags, SetArg, SpecialCharacterIndices, Termios};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Backspace,
    Enter,
    Escape,
}

pub struct KeyReader {
    tty: File,
    saved: Option<Termios>,
}

impl KeyReader {
    pub fn open() -> Result<Self> {
        let tty = ["/dev/tty", "/dev/tty0", "/dev/console"]
            .iter()
            .find_map(|path| OpenOptions::new().read(true).write(true).open(path).ok())
            .context("no console tty to read keys from")?;

        let saved = match termios::tcgetattr(&tty) {
            Ok(saved) => {
                let mut raw = saved.clone();
                raw.local_flags &= !(LocalFlags::ECHO | LocalFlags::ICANON | LocalFlags::ISIG | LocalFlags::IEXTEN);
                raw.input_flags &= !(InputFlags::IXON | InputFlags::ICRNL | InputFlags::BRKINT | InputFlags::ISTRIP);
                raw.output_flags &= !OutputFlags::OPOST;
                raw.control_chars[SpecialCharacterIndices::VMIN as usize] = 0;
                raw.control_chars[SpecialCharacterIndices::VTIME as usize] = 0;
                termios::tcsetattr(&tty, SetArg::TCSANOW, &raw).context("set raw tty mode")?;
                Some(saved)
            }
            Err(err) => {
                tracing::warn!(%err, "tty is not a terminal, keys may be line buffered");
                None
            }
        };

        Ok(Self { tty, saved })
    }

    /// All keys typed since the last call.
    pub fn poll(&mut self) -> Vec<Key> {
        let mut buf = [0u8; 32];
        let n = match self.tty.read(&mut buf) {
            Ok(n) => n,
            Err(err) if err.kind() == ErrorKind::WouldBlock || err.kind() == ErrorKind::Interrupted => 0,
            Err(err) => {
                tracing::warn!(%err, "tty read failed");
                0
            }
        };
        decode(&buf[..n])
    }
}

impl Drop for KeyReader {
    fn drop(&mut self) {
        if let Some(saved) = &self.saved {
            if let Err(err) = termios::tcsetattr(&self.tty, SetArg::TCSANOW, saved) {
                tracing::warn!(%err, "restore tty mode");
            }
        }
    }
}

/// Decode raw tty bytes. Escape sequences (arrows and the like) are skipped whole.
fn decode(bytes: &[u8]) -> Vec<Key> {
    let mut keys = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            0x1b if bytes.get(i + 1) == Some(&b'[') => {
                i += 2;
                while i < bytes.len() && !bytes[i].is_ascii_alphabetic() && bytes[i] != b'~' {
                    i += 1;
                }
            }
            0x1b => keys.push(Key::Escape),
            b'\r' | b'\n' => keys.push(Key::Enter),
            0x7f | 0x08 => keys.push(Key::Backspace),
            b if b.is_ascii_graphic() || b == b' ' => keys.push(Key::Char(b as char)),
            _ => {}
        }
        i += 1;
    }
    keys
}
