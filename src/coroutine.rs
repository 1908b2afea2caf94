//! The bridge between the stack's callbacks and the connection tasks.
//!
//! A connection task is an ordinary future.  It is only ever polled from a transport
//! callback (via `resume`), using a waker that does nothing: there is no executor that could
//! be woken, the next callback for the connection is the wake up.  The task suspends by
//! awaiting `yield_now`, which returns `Pending` exactly once.

use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll, Waker};

/// Future returned by `yield_now`.
pub(crate) struct Yield {
    yielded: bool,
}

impl Future for Yield {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            return Poll::Ready(());
        }

        self.yielded = true;
        Poll::Pending
    }
}

/// Suspend the current task until its connection's next transport event.
pub(crate) fn yield_now() -> Yield {
    Yield { yielded: false }
}

/// Outcome of a single resumption.
#[derive(Debug, PartialEq)]
pub(crate) enum Resumed {
    /// The task yielded and waits for another event
    Suspended,
    /// The task ran to completion and was dropped
    Finished,
    /// There was no task to run
    Idle,
}

/// Run the task in `slot` until it yields or finishes.  A finished task is dropped in place
/// so the slot's storage can be reused by the next connection without allocating.
pub(crate) fn resume<F>(mut slot: Pin<&mut Option<F>>) -> Resumed
where
    F: Future<Output = ()>,
{
    let mut cx = Context::from_waker(Waker::noop());

    let poll = match slot.as_mut().as_pin_mut() {
        Some(task) => task.poll(&mut cx),
        None => return Resumed::Idle,
    };

    match poll {
        Poll::Ready(()) => {
            slot.set(None);
            Resumed::Finished
        }
        Poll::Pending => Resumed::Suspended,
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use core::cell::Cell;

    use std::boxed::Box;

    use super::*;

    #[test]
    fn test_yield_suspends_once() {
        let steps = Cell::new(0);
        let task = async {
            steps.set(1);
            yield_now().await;
            steps.set(2);
            yield_now().await;
            steps.set(3);
        };

        let mut slot = Box::pin(Some(task));

        assert_eq!(resume(slot.as_mut()), Resumed::Suspended);
        assert_eq!(steps.get(), 1);
        assert_eq!(resume(slot.as_mut()), Resumed::Suspended);
        assert_eq!(steps.get(), 2);
        assert_eq!(resume(slot.as_mut()), Resumed::Finished);
        assert_eq!(steps.get(), 3);
        assert!(slot.is_none());
        assert_eq!(resume(slot.as_mut()), Resumed::Idle);
    }

    #[test]
    fn test_task_replaced_in_place() {
        let runs = Cell::new(0);
        let counter = &runs;
        let make = move || async move {
            yield_now().await;
            counter.set(counter.get() + 1);
        };

        let mut slot = Box::pin(Some(make()));
        assert_eq!(resume(slot.as_mut()), Resumed::Suspended);

        // dropping a suspended task never runs its remainder
        slot.as_mut().set(Some(make()));
        assert_eq!(resume(slot.as_mut()), Resumed::Suspended);
        assert_eq!(resume(slot.as_mut()), Resumed::Finished);
        assert_eq!(runs.get(), 1);
    }
}
