#![cfg(unix)]

use std::thread;
use std::time::Duration;

use libc::c_int;
use secret_prompt::{PasswordPrompt, ProcessTerminal, PromptError};

struct Pty {
    master: c_int,
    slave: c_int,
}

impl Drop for Pty {
    fn drop(&mut self) {
        unsafe {
            libc::close(self.master);
            libc::close(self.slave);
        }
    }
}

fn open_pty() -> Pty {
    let mut master: c_int = 0;
    let mut slave: c_int = 0;
    let result = unsafe {
        libc::openpty(
            &mut master,
            &mut slave,
            std::ptr::null_mut(),
            std::ptr::null_mut(),
            std::ptr::null_mut(),
        )
    };
    assert_eq!(result, 0, "openpty failed");
    Pty { master, slave }
}

fn lflag(fd: c_int) -> libc::tcflag_t {
    let mut termios = unsafe { std::mem::zeroed::<libc::termios>() };
    assert_eq!(unsafe { libc::tcgetattr(fd, &mut termios) }, 0, "tcgetattr");
    termios.c_lflag
}

/// Feed `input` from the master side once the prompt had time to enter raw mode.
fn type_later(master: c_int, input: &'static [u8]) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        thread::sleep(Duration::from_millis(100));
        let written =
            unsafe { libc::write(master, input.as_ptr() as *const libc::c_void, input.len()) };
        assert_eq!(written, input.len() as isize, "short write to pty master");
    })
}

#[test]
fn prompt_over_pty_returns_typed_secret_and_restores_mode() {
    let pty = open_pty();
    let before = lflag(pty.slave);
    let typist = type_later(pty.master, b"s3cr\x7fet\r");

    let mut terminal = ProcessTerminal::with_fds(pty.slave, pty.slave);
    let secret = PasswordPrompt::new("Password: ")
        .prompt_with(&mut terminal)
        .expect("prompt failed")
        .expect("prompt skipped");
    typist.join().expect("typist panicked");

    assert_eq!(secret.as_slice(), b"s3cet");
    assert_eq!(lflag(pty.slave), before, "terminal mode not restored");
}

#[test]
fn escape_over_pty_cancels_after_timeout() {
    let pty = open_pty();
    let before = lflag(pty.slave);
    let typist = type_later(pty.master, b"\x1b");

    let mut terminal = ProcessTerminal::with_fds(pty.slave, pty.slave);
    let err = PasswordPrompt::default()
        .prompt_with(&mut terminal)
        .expect_err("expected cancel");
    typist.join().expect("typist panicked");

    assert!(matches!(err, PromptError::Canceled), "got {err:?}");
    assert_eq!(lflag(pty.slave), before, "terminal mode not restored");
}
