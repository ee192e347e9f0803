use thiserror::Error;

use crate::reactor::Reactor;
use crate::task::{Progress, Task};
use crate::waker::Waker;

/// Sequential composition: `fut1`, then `fut2` seeded with `fut1`'s output.
///
/// `fut1` is never progressed again once it has settled, and `fut2` is never progressed before
/// `fut1` completes successfully — both guarded structurally: `fut1` only exists in the
/// [`ThenState::Fut1`] phase, and the transition to [`ThenState::Fut2`] drops it.
pub struct Then<F1, F2> {
    phase: Phase<F1>,
    fut2: F2,
}

enum Phase<F1> {
    Fut1(F1),
    Fut2,
}

/// Distinguishes which side of a [`Then`] failed.
#[derive(Debug, Error)]
pub enum ThenError<E1, E2> {
    #[error("first future failed: {0:?}")]
    Fut1(E1),
    #[error("second future failed: {0:?}")]
    Fut2(E2),
}

impl<F1, F2> Then<F1, F2>
where
    F1: Task,
    F2: Task<Arg = F1::Ok>,
{
    pub(crate) fn new(fut1: F1, fut2: F2) -> Self {
        Self {
            phase: Phase::Fut1(fut1),
            fut2,
        }
    }
}

impl<F1, F2> Task for Then<F1, F2>
where
    F1: Task,
    F2: Task<Arg = F1::Ok>,
{
    type Arg = ();
    type Ok = F2::Ok;
    type Err = ThenError<F1::Err, F2::Err>;

    fn progress(&mut self, reactor: &Reactor, waker: Waker) -> Progress<Self::Ok, Self::Err> {
        if let Phase::Fut1(fut1) = &mut self.phase {
            match fut1.progress(reactor, waker.clone()) {
                Progress::Pending => return Progress::Pending,
                Progress::Failure(err) => {
                    self.phase = Phase::Fut2;
                    return Progress::Failure(ThenError::Fut1(err));
                }
                Progress::Completed(ok) => {
                    self.phase = Phase::Fut2;
                    self.fut2.set_arg(ok);
                }
            }
        }

        match self.fut2.progress(reactor, waker) {
            Progress::Pending => Progress::Pending,
            Progress::Completed(ok) => Progress::Completed(ok),
            Progress::Failure(err) => Progress::Failure(ThenError::Fut2(err)),
        }
    }
}
