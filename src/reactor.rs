//! A thin abstraction over a level-triggered readiness multiplexer.
//!
//! Built directly on `mio`, mirroring this corpus's own `reactor-executor` example rather than
//! a hand-rolled epoll FFI layer (available elsewhere in the corpus as `mini-mio`, but not the
//! shape this crate's closest relative ships).

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use mio::event::Source;
use mio::{Events, Interest, Poll, Registry, Token};

use crate::error::ReactorError;
use crate::waker::Waker;

const EVENTS_CAPACITY: usize = 128;

/// Owns the OS multiplexer handle and the table of interests currently registered against it.
///
/// Readiness is level-triggered: a task woken by `poll` must be prepared for a spurious wake
/// and must re-register if it is not yet satisfied. The reactor never auto-unregisters on wake
/// — the task that registered an interest is responsible for unregistering it, whether on
/// completion or ahead of a fresh registration for partial progress.
pub struct Reactor {
    poll: Poll,
    registry: Registry,
    registrations: RefCell<HashMap<Token, Waker>>,
    next_token: Cell<usize>,
}

impl Reactor {
    pub(crate) fn new() -> Result<Self, ReactorError> {
        let poll = Poll::new().map_err(ReactorError::Create)?;
        let registry = poll.registry().try_clone().map_err(ReactorError::Create)?;
        Ok(Self {
            poll,
            registry,
            registrations: RefCell::new(HashMap::new()),
            next_token: Cell::new(0),
        })
    }

    /// Allocates a fresh, reactor-unique token for use with [`register`](Self::register).
    ///
    /// A leaf future calls this once, at construction, to give itself an identity the reactor
    /// can route readiness events back to.
    pub fn next_token(&self) -> Token {
        let id = self.next_token.get();
        self.next_token.set(id + 1);
        Token(id)
    }

    /// Registers interest in `interest` events on `source`, routing future readiness to `waker`.
    ///
    /// By contract this replaces any prior registration under the same token. Returns an error
    /// without mutating reactor state if the underlying OS call fails.
    pub fn register<S>(
        &self,
        source: &mut S,
        token: Token,
        interest: Interest,
        waker: Waker,
    ) -> Result<(), ReactorError>
    where
        S: Source + ?Sized,
    {
        self.registry
            .register(source, token, interest)
            .map_err(ReactorError::Register)?;
        self.registrations.borrow_mut().insert(token, waker);
        log::trace!("registered {token:?} for {interest:?}");
        Ok(())
    }

    /// Removes the interest registered under `token`.
    pub fn unregister<S>(&self, source: &mut S, token: Token) -> Result<(), ReactorError>
    where
        S: Source + ?Sized,
    {
        self.registry
            .deregister(source)
            .map_err(ReactorError::Unregister)?;
        self.registrations.borrow_mut().remove(&token);
        log::trace!("unregistered {token:?}");
        Ok(())
    }

    /// Whether any interest is currently registered. Used by the executor to decide whether it
    /// must still block in [`poll`](Self::poll) once its run queue has drained.
    pub(crate) fn has_registrations(&self) -> bool {
        !self.registrations.borrow().is_empty()
    }

    /// Blocks with an infinite timeout until at least one registered event fires, then
    /// synchronously wakes every corresponding wake-token. Returns immediately, without
    /// blocking, if no interests are registered.
    ///
    /// A failure here is fatal: there is no way to recover a broken OS multiplexer, so the
    /// executor propagates it by panicking rather than trying to continue in an unknown state.
    pub(crate) fn poll(&mut self) -> Result<(), ReactorError> {
        if self.registrations.borrow().is_empty() {
            return Ok(());
        }

        let mut events = Events::with_capacity(EVENTS_CAPACITY);
        self.poll.poll(&mut events, None).map_err(ReactorError::Poll)?;

        let mut woken = 0usize;
        for event in events.iter() {
            let waker = self.registrations.borrow().get(&event.token()).cloned();
            if let Some(waker) = waker {
                waker.wake();
                woken += 1;
            }
        }
        log::debug!("reactor poll woke {woken} waker(s)");
        Ok(())
    }
}
