use thiserror::Error;

use crate::reactor::Reactor;
use crate::task::{Progress, Task};
use crate::waker::Waker;

/// Concurrent conjunction: runs `fut1` and `fut2` side by side, completing once both have
/// settled.
///
/// Each inner future is progressed at most once per outer `progress` call, and never again
/// after it settles — enforced structurally: a settled side becomes [`Slot::Completed`] or
/// [`Slot::Failed`], and [`step`] only touches a [`Slot::Pending`] slot.
pub struct Join<F1: Task, F2: Task> {
    fut1: Slot<F1>,
    fut2: Slot<F2>,
}

enum Slot<F: Task> {
    Pending(F),
    Completed(F::Ok),
    Failed(F::Err),
    /// Transient: only occupies the slot between settlement being observed and the outer
    /// `Join` itself returning. A `Join` that settles is never polled again by a compliant
    /// owner, so this is never witnessed from outside.
    Taken,
}

/// Distinguishes which side(s) of a [`Join`] failed.
#[derive(Debug, Error)]
pub enum JoinError<E1, E2> {
    #[error("first future failed: {0:?}")]
    Fut1(E1),
    #[error("second future failed: {0:?}")]
    Fut2(E2),
    #[error("both futures failed: {0:?}, {1:?}")]
    Both(E1, E2),
}

fn step<F: Task>(slot: &mut Slot<F>, reactor: &Reactor, waker: Waker) {
    if let Slot::Pending(fut) = slot {
        match fut.progress(reactor, waker) {
            Progress::Pending => {}
            Progress::Completed(ok) => *slot = Slot::Completed(ok),
            Progress::Failure(err) => *slot = Slot::Failed(err),
        }
    }
}

impl<F1: Task, F2: Task> Join<F1, F2> {
    pub(crate) fn new(fut1: F1, fut2: F2) -> Self {
        Self {
            fut1: Slot::Pending(fut1),
            fut2: Slot::Pending(fut2),
        }
    }
}

impl<F1: Task, F2: Task> Task for Join<F1, F2> {
    type Arg = ();
    // The combination rule is left open by the data model ("implementer may choose any
    // deterministic combination"); this crate keeps both sides' output rather than discarding
    // one, which is strictly more useful while remaining fully deterministic.
    type Ok = (F1::Ok, F2::Ok);
    type Err = JoinError<F1::Err, F2::Err>;

    fn progress(&mut self, reactor: &Reactor, waker: Waker) -> Progress<Self::Ok, Self::Err> {
        step(&mut self.fut1, reactor, waker.clone());
        step(&mut self.fut2, reactor, waker);

        if matches!(self.fut1, Slot::Pending(_)) || matches!(self.fut2, Slot::Pending(_)) {
            return Progress::Pending;
        }

        match (
            std::mem::replace(&mut self.fut1, Slot::Taken),
            std::mem::replace(&mut self.fut2, Slot::Taken),
        ) {
            (Slot::Completed(a), Slot::Completed(b)) => Progress::Completed((a, b)),
            (Slot::Failed(e1), Slot::Failed(e2)) => Progress::Failure(JoinError::Both(e1, e2)),
            (Slot::Failed(e1), _) => Progress::Failure(JoinError::Fut1(e1)),
            (_, Slot::Failed(e2)) => Progress::Failure(JoinError::Fut2(e2)),
            (fut1, fut2) => unreachable!(
                "both sides settled but neither matched a failure/success combination: {}/{}",
                slot_kind(&fut1),
                slot_kind(&fut2)
            ),
        }
    }
}

fn slot_kind<F: Task>(slot: &Slot<F>) -> &'static str {
    match slot {
        Slot::Pending(_) => "pending",
        Slot::Completed(_) => "completed",
        Slot::Failed(_) => "failed",
        Slot::Taken => "taken",
    }
}
