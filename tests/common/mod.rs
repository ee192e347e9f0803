//! Shared helpers for integration tests: a real, non-blocking OS pipe and a couple of small
//! `Task` adapters used to drive and observe composite futures end to end.

use std::cell::RefCell;
use std::io;
use std::os::fd::RawFd;
use std::rc::Rc;

use mio::unix::SourceFd;
use mio::{Interest, Token};

use mini_rt::{Progress, Reactor, Task, Waker};

/// Creates a non-blocking pipe, returning `(read_fd, write_fd)`.
pub fn pipe_pair() -> (RawFd, RawFd) {
    let mut fds = [0i32; 2];
    let res = unsafe { libc::pipe(fds.as_mut_ptr()) };
    assert_eq!(res, 0, "pipe() failed: {}", io::Error::last_os_error());
    for &fd in &fds {
        let flags = unsafe { libc::fcntl(fd, libc::F_GETFL) };
        let res = unsafe { libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK) };
        assert_eq!(res, 0, "fcntl(O_NONBLOCK) failed: {}", io::Error::last_os_error());
    }
    (fds[0], fds[1])
}

pub fn close(fd: RawFd) {
    unsafe {
        libc::close(fd);
    }
}

/// A leaf task that reads exactly one byte from `fd`, suspending via the reactor until the
/// descriptor is readable.
pub struct ReadOneByte {
    fd: RawFd,
    token: Option<Token>,
}

impl ReadOneByte {
    pub fn new(fd: RawFd) -> Self {
        Self { fd, token: None }
    }
}

impl Task for ReadOneByte {
    type Arg = ();
    type Ok = u8;
    type Err = io::Error;

    fn progress(&mut self, reactor: &Reactor, waker: Waker) -> Progress<u8, io::Error> {
        if self.token.is_none() {
            let token = reactor.next_token();
            if let Err(err) = reactor.register(
                &mut SourceFd(&self.fd),
                token,
                Interest::READABLE,
                waker,
            ) {
                return Progress::Failure(io::Error::new(io::ErrorKind::Other, err));
            }
            self.token = Some(token);
        }

        let mut buf = [0u8; 1];
        let n = unsafe { libc::read(self.fd, buf.as_mut_ptr() as *mut libc::c_void, 1) };

        if n > 0 {
            let token = self.token.take().expect("registered above");
            let _ = reactor.unregister(&mut SourceFd(&self.fd), token);
            Progress::Completed(buf[0])
        } else if n == 0 {
            let token = self.token.take().expect("registered above");
            let _ = reactor.unregister(&mut SourceFd(&self.fd), token);
            Progress::Failure(io::Error::new(io::ErrorKind::UnexpectedEof, "pipe closed"))
        } else {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::WouldBlock {
                Progress::Pending
            } else {
                Progress::Failure(err)
            }
        }
    }
}

/// A leaf task that always completes immediately with a fixed value.
pub struct Immediate<T>(Option<T>);

impl<T> Immediate<T> {
    pub fn new(value: T) -> Self {
        Self(Some(value))
    }
}

impl<T> Task for Immediate<T> {
    type Arg = ();
    type Ok = T;
    type Err = std::convert::Infallible;

    fn progress(&mut self, _reactor: &Reactor, _waker: Waker) -> Progress<T, std::convert::Infallible> {
        Progress::Completed(self.0.take().expect("polled after completion"))
    }
}

/// Wraps an inner task so its settlement can be observed from outside the executor, which
/// otherwise only tracks whether a top-level task is pending or settled.
pub struct Capture<T: Task> {
    inner: T,
    slot: Rc<RefCell<Option<Result<T::Ok, T::Err>>>>,
}

impl<T: Task> Capture<T> {
    pub fn new(inner: T) -> (Self, Rc<RefCell<Option<Result<T::Ok, T::Err>>>>) {
        let slot = Rc::new(RefCell::new(None));
        (
            Self {
                inner,
                slot: Rc::clone(&slot),
            },
            slot,
        )
    }
}

impl<T: Task> Task for Capture<T> {
    type Arg = ();
    type Ok = ();
    type Err = std::convert::Infallible;

    fn progress(&mut self, reactor: &Reactor, waker: Waker) -> Progress<(), std::convert::Infallible> {
        match self.inner.progress(reactor, waker) {
            Progress::Pending => Progress::Pending,
            Progress::Completed(ok) => {
                *self.slot.borrow_mut() = Some(Ok(ok));
                Progress::Completed(())
            }
            Progress::Failure(err) => {
                *self.slot.borrow_mut() = Some(Err(err));
                Progress::Completed(())
            }
        }
    }
}
