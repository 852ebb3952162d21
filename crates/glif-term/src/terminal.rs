// SPDX-License-Identifier: MIT
//
// Terminal control — size queries, raw mode, and RAII cleanup.
//
// Safety: this module necessarily uses `unsafe` for termios
// (tcgetattr, tcsetattr), ioctl (TIOCGWINSZ), isatty, and a raw fd
// write in the panic hook. These are the standard POSIX interfaces for
// terminal control; there is no safe alternative. Each unsafe block is
// minimal.
#![allow(unsafe_code)]

use std::io::{self, Write};
use std::sync::{Mutex, Once};

use glif_geom::Size;

use crate::ansi;

// ─── Queries ─────────────────────────────────────────────────────────────────

/// Query the current terminal size via `ioctl(TIOCGWINSZ)`.
///
/// Unlike a cached size, this reflects resizes immediately, which is
/// why view computation re-queries on every call.
///
/// # Errors
///
/// Fails when stdout is not a terminal or the ioctl itself fails; a
/// screen cannot be aligned against an unknown size, so there is no
/// fallback.
#[cfg(unix)]
pub fn size() -> io::Result<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) };

    if result == 0 && ws.ws_col > 0 && ws.ws_row > 0 {
        Ok(Size::new(ws.ws_col, ws.ws_row))
    } else {
        Err(io::Error::last_os_error())
    }
}

#[cfg(not(unix))]
pub fn size() -> io::Result<Size> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "terminal size query requires a unix terminal",
    ))
}

/// Check whether stdin is connected to a terminal (TTY).
#[cfg(unix)]
#[must_use]
pub fn is_tty() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) != 0 }
}

#[cfg(not(unix))]
#[must_use]
pub fn is_tty() -> bool {
    false
}

// ─── Panic-Safe Restore ──────────────────────────────────────────────────────

/// Global backup of original termios for panic recovery.
///
/// The [`Terminal`] struct owns its own copy, but the panic hook can't
/// access it.
#[cfg(unix)]
static TERMIOS_BACKUP: Mutex<Option<libc::termios>> = Mutex::new(None);

#[cfg(unix)]
fn restore_termios_from_backup() {
    if let Ok(guard) = TERMIOS_BACKUP.lock() {
        if let Some(ref original) = *guard {
            unsafe {
                let _ = libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, original);
            }
        }
    }
}

/// Restore sequence for emergency use: reset SGR attributes, show the
/// cursor.
const EMERGENCY_RESTORE: &[u8] = b"\x1b[00m\x1b[?25h";

static PANIC_HOOK_INSTALLED: Once = Once::new();

/// Install a panic hook that restores the terminal before printing the
/// error.
///
/// Without this, a panic in raw mode leaves the terminal with no echo
/// and a hidden cursor. The hook writes [`EMERGENCY_RESTORE`] directly
/// to fd 1, bypassing Rust's stdout lock in case the panic happened
/// while it was held, restores termios, then delegates to the original
/// panic handler.
fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let original = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            emergency_restore();

            #[cfg(unix)]
            restore_termios_from_backup();

            original(info);
        }));
    });
}

fn emergency_restore() {
    #[cfg(unix)]
    unsafe {
        let _ = libc::write(
            libc::STDOUT_FILENO,
            EMERGENCY_RESTORE.as_ptr().cast::<libc::c_void>(),
            EMERGENCY_RESTORE.len(),
        );
    }

    #[cfg(not(unix))]
    {
        let _ = io::stdout().write_all(EMERGENCY_RESTORE);
        let _ = io::stdout().flush();
    }
}

// ─── Terminal ────────────────────────────────────────────────────────────────

/// Terminal handle with RAII cleanup.
///
/// [`enter`](Self::enter) switches to interactive mode: raw termios
/// (no echo, no line buffering) with the cursor hidden. The original
/// state is restored when the handle is dropped — even on panic.
///
/// # Example
///
/// ```no_run
/// use glif_term::terminal::Terminal;
///
/// let mut term = Terminal::new();
/// term.enter()?;
/// // ... render frames, poll keys ...
/// // Restored automatically on drop.
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct Terminal {
    /// Original termios saved before entering raw mode.
    #[cfg(unix)]
    original_termios: Option<libc::termios>,

    /// Whether we're in interactive mode.
    active: bool,
}

impl Terminal {
    /// Create an inactive terminal handle.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            #[cfg(unix)]
            original_termios: None,
            active: false,
        }
    }

    /// Whether interactive mode is currently active.
    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Enter interactive mode: raw termios, cursor hidden.
    ///
    /// Idempotent: calling `enter()` while already active is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if raw mode or terminal output fails.
    pub fn enter(&mut self) -> io::Result<()> {
        if self.active {
            return Ok(());
        }

        install_panic_hook();
        self.enable_raw_mode()?;

        let stdout = io::stdout();
        let mut lock = stdout.lock();
        ansi::cursor_hide(&mut lock)?;
        lock.flush()?;

        self.active = true;
        Ok(())
    }

    /// Leave interactive mode and restore the terminal.
    ///
    /// Idempotent: calling `leave()` while inactive is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal output or termios restore fails.
    pub fn leave(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }

        let stdout = io::stdout();
        let mut lock = stdout.lock();
        ansi::reset(&mut lock)?;
        ansi::cursor_show(&mut lock)?;
        lock.flush()?;
        drop(lock);

        self.disable_raw_mode()?;
        self.active = false;
        Ok(())
    }

    // ── Raw Mode (termios) ──────────────────────────────────────────

    #[cfg(unix)]
    fn enable_raw_mode(&mut self) -> io::Result<()> {
        use std::os::unix::io::AsRawFd;

        if !is_tty() {
            return Ok(());
        }

        let fd = io::stdin().as_raw_fd();

        unsafe {
            let mut termios: libc::termios = std::mem::zeroed();
            if libc::tcgetattr(fd, &raw mut termios) != 0 {
                return Err(io::Error::last_os_error());
            }

            // Save original for restore.
            self.original_termios = Some(termios);

            // Also save to the global backup for the panic hook.
            if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
                *guard = Some(termios);
            }

            // cfmakeraw equivalent: disable all line processing.
            termios.c_iflag &= !(libc::IGNBRK
                | libc::BRKINT
                | libc::PARMRK
                | libc::ISTRIP
                | libc::INLCR
                | libc::IGNCR
                | libc::ICRNL
                | libc::IXON);
            termios.c_oflag &= !libc::OPOST;
            termios.c_lflag &=
                !(libc::ECHO | libc::ECHONL | libc::ICANON | libc::ISIG | libc::IEXTEN);
            termios.c_cflag &= !(libc::CSIZE | libc::PARENB);
            termios.c_cflag |= libc::CS8;

            // VMIN=1, VTIME=0: read() blocks until at least 1 byte.
            // Non-blocking behavior comes from poll()ing first.
            termios.c_cc[libc::VMIN] = 1;
            termios.c_cc[libc::VTIME] = 0;

            if libc::tcsetattr(fd, libc::TCSAFLUSH, &raw const termios) != 0 {
                return Err(io::Error::last_os_error());
            }
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn enable_raw_mode(&mut self) -> io::Result<()> {
        Ok(())
    }

    #[cfg(unix)]
    fn disable_raw_mode(&mut self) -> io::Result<()> {
        if let Some(ref original) = self.original_termios {
            use std::os::unix::io::AsRawFd;
            let fd = io::stdin().as_raw_fd();

            unsafe {
                if libc::tcsetattr(fd, libc::TCSAFLUSH, original) != 0 {
                    return Err(io::Error::last_os_error());
                }
            }

            if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
                *guard = None;
            }

            self.original_termios = None;
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn disable_raw_mode(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if self.active {
            let _ = self.leave();
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── Queries ──

    #[test]
    fn size_query_does_not_panic() {
        // CI has no TTY; either outcome is fine, it just must not
        // panic or hang.
        let _ = size();
    }

    #[test]
    fn is_tty_does_not_panic() {
        let _ = is_tty();
    }

    // ── Restore sequence ──

    #[test]
    fn emergency_restore_resets_then_shows_cursor() {
        let s = std::str::from_utf8(EMERGENCY_RESTORE).unwrap();
        assert!(s.starts_with("\x1b[00m"));
        assert!(s.ends_with("\x1b[?25h"));
    }

    // ── Terminal struct ──

    #[test]
    fn new_terminal_is_inactive() {
        let term = Terminal::new();
        assert!(!term.is_active());
    }

    #[test]
    fn leave_without_enter_is_noop() {
        let mut term = Terminal::new();
        term.leave().unwrap();
        assert!(!term.is_active());
    }

    #[test]
    fn drop_without_enter_is_harmless() {
        let term = Terminal::new();
        drop(term);
    }
}
