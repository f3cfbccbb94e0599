//! Process stdin/stdout terminal backed by termios.

use std::io;
use std::time::Duration;

use crate::core::terminal::Terminal;

#[cfg(unix)]
use libc::{self, c_int};

#[cfg(unix)]
fn wait_writable(fd: c_int) -> io::Result<()> {
    let mut fds = libc::pollfd {
        fd,
        events: libc::POLLOUT,
        revents: 0,
    };
    loop {
        let result = unsafe { libc::poll(&mut fds, 1, -1) };
        if result < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                continue;
            }
            return Err(err);
        }
        if result == 0 {
            // Infinite timeout should not return 0, but avoid a tight loop if it does.
            continue;
        }
        if (fds.revents & libc::POLLOUT) != 0 {
            return Ok(());
        }

        return Err(io::Error::other(format!(
            "poll(POLLOUT) returned revents=0x{:x}",
            fds.revents
        )));
    }
}

#[cfg(unix)]
fn write_all_fd_with<FWrite, FWait>(
    fd: c_int,
    bytes: &[u8],
    mut write_once: FWrite,
    mut wait_writable: FWait,
) -> io::Result<()>
where
    FWrite: FnMut(c_int, &[u8]) -> io::Result<usize>,
    FWait: FnMut(c_int) -> io::Result<()>,
{
    let mut written = 0;
    while written < bytes.len() {
        match write_once(fd, &bytes[written..]) {
            Ok(0) => {
                return Err(io::Error::new(io::ErrorKind::WriteZero, "write returned 0"));
            }
            Ok(count) => {
                let remaining = bytes.len() - written;
                if count > remaining {
                    return Err(io::Error::other("write returned more bytes than requested"));
                }
                written += count;
            }
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {
                continue;
            }
            Err(err) if err.kind() == io::ErrorKind::WouldBlock => {
                wait_writable(fd)?;
            }
            Err(err) => return Err(err),
        }
    }
    Ok(())
}

#[cfg(unix)]
fn write_fd(fd: c_int, bytes: &[u8]) -> io::Result<()> {
    if bytes.is_empty() {
        return Ok(());
    }
    write_all_fd_with(
        fd,
        bytes,
        |fd, buf| {
            let result = unsafe { libc::write(fd, buf.as_ptr() as *const libc::c_void, buf.len()) };
            if result < 0 {
                Err(io::Error::last_os_error())
            } else {
                Ok(result as usize)
            }
        },
        wait_writable,
    )
}

#[cfg(unix)]
fn read_fd(fd: c_int, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        let result = unsafe { libc::read(fd, buf.as_mut_ptr() as *mut libc::c_void, buf.len()) };
        if result >= 0 {
            return Ok(result as usize);
        }
        let err = io::Error::last_os_error();
        if err.kind() != io::ErrorKind::Interrupted {
            return Err(err);
        }
    }
}

#[cfg(unix)]
fn poll_readable(fd: c_int, timeout_ms: i32) -> io::Result<bool> {
    let mut fds = libc::pollfd {
        fd,
        events: libc::POLLIN,
        revents: 0,
    };
    loop {
        let result = unsafe { libc::poll(&mut fds, 1, timeout_ms) };
        if result < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                continue;
            }
            return Err(err);
        }
        if result == 0 {
            return Ok(false);
        }
        if (fds.revents & (libc::POLLERR | libc::POLLNVAL)) != 0 {
            return Err(io::Error::other(format!(
                "poll(POLLIN) returned revents=0x{:x}",
                fds.revents
            )));
        }
        return Ok((fds.revents & (libc::POLLIN | libc::POLLHUP)) != 0);
    }
}

#[cfg(unix)]
fn get_termios(fd: c_int) -> io::Result<libc::termios> {
    let mut termios = unsafe { std::mem::zeroed::<libc::termios>() };
    let result = unsafe { libc::tcgetattr(fd, &mut termios) };
    if result != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(termios)
}

#[cfg(unix)]
fn set_termios(fd: c_int, termios: &libc::termios) -> io::Result<()> {
    let result = unsafe { libc::tcsetattr(fd, libc::TCSANOW, termios) };
    if result != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// Terminal attributes captured before raw mode was applied.
#[cfg(unix)]
pub struct SavedTermios(libc::termios);

#[cfg(unix)]
impl std::fmt::Debug for SavedTermios {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SavedTermios")
            .field("c_lflag", &self.0.c_lflag)
            .finish_non_exhaustive()
    }
}

/// Size of the read-ahead window; bytes are still handed out one at a time.
#[cfg(unix)]
const READ_CHUNK: usize = 64;

#[cfg(unix)]
pub struct ProcessTerminal {
    stdin_fd: c_int,
    stdout_fd: c_int,
    read_buf: [u8; READ_CHUNK],
    read_pos: usize,
    read_len: usize,
}

#[cfg(unix)]
impl ProcessTerminal {
    pub fn new() -> Self {
        Self::with_fds(libc::STDIN_FILENO, libc::STDOUT_FILENO)
    }

    /// Use explicit descriptors, e.g. both ends on `/dev/tty` or a pty slave.
    pub fn with_fds(stdin_fd: c_int, stdout_fd: c_int) -> Self {
        Self {
            stdin_fd,
            stdout_fd,
            read_buf: [0; READ_CHUNK],
            read_pos: 0,
            read_len: 0,
        }
    }

    fn has_buffered_input(&self) -> bool {
        self.read_pos < self.read_len
    }

    fn discard_buffered_input(&mut self) {
        self.read_buf.fill(0);
        self.read_pos = 0;
        self.read_len = 0;
    }
}

#[cfg(unix)]
impl Default for ProcessTerminal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(unix)]
impl Terminal for ProcessTerminal {
    type Mode = SavedTermios;

    fn is_terminal(&self) -> bool {
        unsafe { libc::isatty(self.stdin_fd) == 1 }
    }

    fn enter_raw_mode(&mut self) -> io::Result<SavedTermios> {
        let original = get_termios(self.stdin_fd)?;
        let mut raw = original;
        unsafe {
            libc::cfmakeraw(&mut raw);
        }
        if let Err(err) = set_termios(self.stdin_fd, &raw) {
            // tcsetattr may apply a subset of the attributes before failing.
            let _ = set_termios(self.stdin_fd, &original);
            return Err(err);
        }
        Ok(SavedTermios(original))
    }

    fn restore_mode(&mut self, mode: SavedTermios) -> io::Result<()> {
        self.discard_buffered_input();
        // Flush input before leaving raw mode to avoid buffered bytes leaking to the shell.
        let _ = unsafe { libc::tcflush(self.stdin_fd, libc::TCIFLUSH) };
        set_termios(self.stdin_fd, &mode.0)
    }

    fn read_byte(&mut self) -> io::Result<u8> {
        if !self.has_buffered_input() {
            let read_len = read_fd(self.stdin_fd, &mut self.read_buf)?;
            if read_len == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "input closed before the prompt finished",
                ));
            }
            self.read_pos = 0;
            self.read_len = read_len;
        }
        let byte = self.read_buf[self.read_pos];
        self.read_buf[self.read_pos] = 0;
        self.read_pos += 1;
        Ok(byte)
    }

    fn poll_input(&mut self, timeout: Duration) -> io::Result<bool> {
        if self.has_buffered_input() {
            return Ok(true);
        }
        let timeout_ms = timeout.as_millis().min(i32::MAX as u128) as i32;
        poll_readable(self.stdin_fd, timeout_ms)
    }

    fn write(&mut self, data: &[u8]) -> io::Result<()> {
        write_fd(self.stdout_fd, data)
    }
}

#[cfg(not(unix))]
pub struct ProcessTerminal;

#[cfg(not(unix))]
impl ProcessTerminal {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(not(unix))]
impl Default for ProcessTerminal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(unix))]
impl Terminal for ProcessTerminal {
    type Mode = ();

    fn is_terminal(&self) -> bool {
        false
    }

    fn enter_raw_mode(&mut self) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "ProcessTerminal is only supported on Unix platforms",
        ))
    }

    fn restore_mode(&mut self, _mode: ()) -> io::Result<()> {
        Ok(())
    }

    fn read_byte(&mut self) -> io::Result<u8> {
        Err(io::Error::from(io::ErrorKind::Unsupported))
    }

    fn poll_input(&mut self, _timeout: Duration) -> io::Result<bool> {
        Ok(false)
    }

    fn write(&mut self, _data: &[u8]) -> io::Result<()> {
        Err(io::Error::from(io::ErrorKind::Unsupported))
    }
}
