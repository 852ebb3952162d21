// SPDX-License-Identifier: MIT
//
// Keyboard input parser.
//
// Turns raw stdin bytes into structured key events:
//
// - Legacy CSI sequences (arrows, editing and navigation keys, with
//   `1;<mod>` modifier parameters)
// - Alt+key (ESC followed by a printable character)
// - Control characters (Ctrl+letter, Enter, Tab, Backspace)
// - UTF-8 multi-byte characters
//
// Number parsing works directly on `&[u8]`; there is no intermediate
// `String` allocation for CSI parameter decoding.

use std::io;

use bitflags::bitflags;

// ─── Event Types ─────────────────────────────────────────────────────────────

/// Identity of a key.
///
/// Named keys have dedicated variants; printable characters use
/// [`Char`](Key::Char).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// A Unicode character (printable).
    Char(char),
    Enter,
    Tab,
    Backspace,
    Escape,
    Delete,
    Insert,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
}

bitflags! {
    /// Keyboard modifier flags, matching the xterm CSI modifier
    /// parameter encoding (`param - 1`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b001;
        const ALT   = 0b010;
        const CTRL  = 0b100;
    }
}

/// A key with its active modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    #[must_use]
    pub const fn plain(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::empty(),
        }
    }

    #[must_use]
    pub const fn with(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }
}

// ─── Parsing ─────────────────────────────────────────────────────────────────

/// Parse one key event from the front of `bytes`.
///
/// Returns the event and how many bytes it consumed, or `None` when
/// the buffer is empty, starts with an incomplete escape sequence
/// (more bytes are needed), or holds a sequence with no key mapping.
#[must_use]
pub fn parse_key(bytes: &[u8]) -> Option<(KeyEvent, usize)> {
    match *bytes.first()? {
        0x1b => parse_escape(bytes),
        b'\r' | b'\n' => Some((KeyEvent::plain(Key::Enter), 1)),
        b'\t' => Some((KeyEvent::plain(Key::Tab), 1)),
        0x7f | 0x08 => Some((KeyEvent::plain(Key::Backspace), 1)),
        // Ctrl+letter maps to 0x01..=0x1a.
        b @ 0x01..=0x1a => Some((
            KeyEvent::with(Key::Char((b + 0x60) as char), Modifiers::CTRL),
            1,
        )),
        b if b < 0x20 => Some((KeyEvent::plain(Key::Char(b as char)), 1)),
        _ => parse_utf8(bytes),
    }
}

fn parse_escape(bytes: &[u8]) -> Option<(KeyEvent, usize)> {
    match bytes.get(1) {
        // Lone ESC: the caller hands us whole read()s, so no trailing
        // bytes means the user pressed Escape itself.
        None => Some((KeyEvent::plain(Key::Escape), 1)),
        Some(b'[') => parse_csi(bytes),
        // Alt+key: ESC prefixing an ordinary character.
        Some(_) => {
            let (mut ev, used) = parse_key(&bytes[1..])?;
            ev.modifiers |= Modifiers::ALT;
            Some((ev, used + 1))
        }
    }
}

/// Parse a `CSI <params> <final>` sequence starting at `ESC [`.
fn parse_csi(bytes: &[u8]) -> Option<(KeyEvent, usize)> {
    // Find the final byte (0x40..=0x7e); everything before it is
    // parameter bytes.
    let mut end = 2;
    loop {
        match bytes.get(end) {
            None => return None,
            Some(&b) if (0x40..=0x7e).contains(&b) => break,
            Some(_) => end += 1,
        }
    }
    let params = &bytes[2..end];
    let final_byte = bytes[end];
    let used = end + 1;

    let (first, modifiers) = split_params(params);
    let key = match final_byte {
        b'A' => Key::Up,
        b'B' => Key::Down,
        b'C' => Key::Right,
        b'D' => Key::Left,
        b'H' => Key::Home,
        b'F' => Key::End,
        b'~' => match first {
            1 | 7 => Key::Home,
            2 => Key::Insert,
            3 => Key::Delete,
            4 | 8 => Key::End,
            5 => Key::PageUp,
            6 => Key::PageDown,
            _ => return None,
        },
        _ => return None,
    };
    Some((KeyEvent::with(key, modifiers), used))
}

/// Split CSI parameter bytes into the first numeric parameter and the
/// decoded modifier flags from a `;<mod>` suffix.
fn split_params(params: &[u8]) -> (u32, Modifiers) {
    let mut iter = params.split(|&b| b == b';');
    let first = iter.next().map_or(0, parse_num);
    let modifiers = iter.next().map_or(Modifiers::empty(), |p| {
        let m = parse_num(p);
        Modifiers::from_bits_truncate((m.saturating_sub(1)) as u8)
    });
    (first, modifiers)
}

fn parse_num(digits: &[u8]) -> u32 {
    digits
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .fold(0, |acc, &b| acc * 10 + u32::from(b - b'0'))
}

fn parse_utf8(bytes: &[u8]) -> Option<(KeyEvent, usize)> {
    let len = utf8_len(bytes[0]);
    if bytes.len() < len {
        return None;
    }
    let ch = std::str::from_utf8(&bytes[..len])
        .ok()
        .and_then(|s| s.chars().next())
        .unwrap_or('?');
    Some((KeyEvent::plain(Key::Char(ch)), len))
}

const fn utf8_len(first: u8) -> usize {
    match first {
        0xf0..=0xf7 => 4,
        0xe0..=0xef => 3,
        0xc0..=0xdf => 2,
        _ => 1,
    }
}

// ─── Polling Reader ──────────────────────────────────────────────────────────

/// Wait up to `timeout_ms` for a key on stdin.
///
/// Polls stdin with `poll()`, then reads and parses one event.
/// Returns `Ok(None)` on timeout or when the bytes read didn't form a
/// recognizable key. Intended for raw-mode animation loops that render
/// a frame per timeout tick.
///
/// # Errors
///
/// Returns an error if `poll()` or the stdin read fails.
#[cfg(unix)]
pub fn poll_key(timeout_ms: i32) -> io::Result<Option<KeyEvent>> {
    use std::io::Read;
    use std::os::unix::io::AsRawFd;

    let fd = io::stdin().as_raw_fd();
    let mut pfd = libc::pollfd {
        fd,
        events: libc::POLLIN,
        revents: 0,
    };
    // SAFETY: pfd is a valid, initialized pollfd for the poll call.
    let ready = unsafe { libc::poll(&raw mut pfd, 1, timeout_ms) };
    if ready < 0 {
        return Err(io::Error::last_os_error());
    }
    if ready == 0 || pfd.revents & libc::POLLIN == 0 {
        return Ok(None);
    }

    let mut buf = [0u8; 64];
    let n = io::stdin().read(&mut buf)?;
    Ok(parse_key(&buf[..n]).map(|(ev, _)| ev))
}

#[cfg(not(unix))]
pub fn poll_key(_timeout_ms: i32) -> io::Result<Option<KeyEvent>> {
    Ok(None)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn key(bytes: &[u8]) -> KeyEvent {
        parse_key(bytes).expect("should parse").0
    }

    // ── Plain characters ──

    #[test]
    fn ascii_character() {
        assert_eq!(key(b"a"), KeyEvent::plain(Key::Char('a')));
    }

    #[test]
    fn multibyte_utf8_character() {
        let (ev, used) = parse_key("é".as_bytes()).unwrap();
        assert_eq!(ev, KeyEvent::plain(Key::Char('é')));
        assert_eq!(used, 2);
    }

    #[test]
    fn truncated_utf8_waits_for_more() {
        assert_eq!(parse_key(&[0xe2]), None);
    }

    #[test]
    fn empty_buffer_parses_nothing() {
        assert_eq!(parse_key(b""), None);
    }

    // ── Control characters ──

    #[test]
    fn enter_tab_backspace() {
        assert_eq!(key(b"\r").key, Key::Enter);
        assert_eq!(key(b"\n").key, Key::Enter);
        assert_eq!(key(b"\t").key, Key::Tab);
        assert_eq!(key(b"\x7f").key, Key::Backspace);
    }

    #[test]
    fn ctrl_letter() {
        assert_eq!(key(b"\x03"), KeyEvent::with(Key::Char('c'), Modifiers::CTRL));
        assert_eq!(key(b"\x11"), KeyEvent::with(Key::Char('q'), Modifiers::CTRL));
    }

    // ── Escape sequences ──

    #[test]
    fn lone_escape_is_the_escape_key() {
        assert_eq!(key(b"\x1b"), KeyEvent::plain(Key::Escape));
    }

    #[test]
    fn alt_prefixed_character() {
        assert_eq!(key(b"\x1bx"), KeyEvent::with(Key::Char('x'), Modifiers::ALT));
    }

    #[test]
    fn arrow_keys() {
        assert_eq!(key(b"\x1b[A").key, Key::Up);
        assert_eq!(key(b"\x1b[B").key, Key::Down);
        assert_eq!(key(b"\x1b[C").key, Key::Right);
        assert_eq!(key(b"\x1b[D").key, Key::Left);
    }

    #[test]
    fn navigation_tilde_sequences() {
        assert_eq!(key(b"\x1b[3~").key, Key::Delete);
        assert_eq!(key(b"\x1b[5~").key, Key::PageUp);
        assert_eq!(key(b"\x1b[6~").key, Key::PageDown);
        assert_eq!(key(b"\x1b[1~").key, Key::Home);
        assert_eq!(key(b"\x1b[4~").key, Key::End);
    }

    #[test]
    fn csi_modifier_parameter() {
        assert_eq!(
            key(b"\x1b[1;5A"),
            KeyEvent::with(Key::Up, Modifiers::CTRL)
        );
        assert_eq!(
            key(b"\x1b[1;2D"),
            KeyEvent::with(Key::Left, Modifiers::SHIFT)
        );
    }

    #[test]
    fn incomplete_csi_waits_for_more() {
        assert_eq!(parse_key(b"\x1b[1;5"), None);
    }

    #[test]
    fn consumed_length_covers_whole_sequence() {
        let (_, used) = parse_key(b"\x1b[1;5Axyz").unwrap();
        assert_eq!(used, 6);
    }

    #[test]
    fn unmapped_sequence_is_dropped() {
        assert_eq!(parse_key(b"\x1b[99~"), None);
    }
}
