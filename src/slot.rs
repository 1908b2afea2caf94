use core::cell::RefCell;

use crate::transport::{RecvChain, Socket};

/// One record of the server's fixed connection pool.
///
/// The state sits behind a `RefCell` because it is shared between the dispatcher, which
/// records transport events, and the connection task, which consumes them.  Both run on the
/// same thread and neither holds a borrow across a suspension point.
pub(crate) struct Slot<S: Socket> {
    index: u16,
    state: RefCell<SlotState<S>>,
}

pub(crate) struct SlotState<S: Socket> {
    pub(crate) used: bool,
    pub(crate) generation: u32,
    pub(crate) socket: Option<S>,
    pub(crate) eof: bool,
    /// bytes not yet handed to the line reader
    pub(crate) recv: Option<S::Chain>,
    pub(crate) recv_off: usize,
    /// the connection task is gone and must not be resumed
    pub(crate) exited: bool,
}

impl<S: Socket> SlotState<S> {
    fn empty(generation: u32) -> Self {
        Self {
            used: false,
            generation,
            socket: None,
            eof: false,
            recv: None,
            recv_off: 0,
            exited: false,
        }
    }
}

impl<S: Socket> Slot<S> {
    pub(crate) fn new(index: u16) -> Self {
        Self {
            index,
            state: RefCell::new(SlotState::empty(0)),
        }
    }

    pub(crate) fn index(&self) -> u16 {
        self.index
    }

    pub(crate) fn state(&self) -> &RefCell<SlotState<S>> {
        &self.state
    }

    pub(crate) fn is_free(&self) -> bool {
        !self.state.borrow().used
    }

    /// True while the slot serves the connection identified by `generation`.
    pub(crate) fn is_current(&self, generation: u32) -> bool {
        let state = self.state.borrow();
        state.used && state.generation == generation
    }

    pub(crate) fn is_exited(&self) -> bool {
        self.state.borrow().exited
    }

    /// Reset the slot for a newly accepted connection and return its generation.
    pub(crate) fn claim(&self, socket: S) -> u32 {
        let mut state = self.state.borrow_mut();
        let generation = state.generation.wrapping_add(1);

        *state = SlotState::empty(generation);
        state.used = true;
        state.socket = Some(socket);

        generation
    }

    pub(crate) fn mark_eof(&self) {
        self.state.borrow_mut().eof = true;
    }

    /// Hold on to a received chain.  Only one chain may be pending at a time, a second one is
    /// handed back so the transport can redeliver it later.
    pub(crate) fn store(&self, chain: S::Chain) -> Result<(), S::Chain> {
        let mut state = self.state.borrow_mut();
        if state.recv.is_some() {
            return Err(chain);
        }

        state.recv = Some(chain);
        state.recv_off = 0;
        Ok(())
    }

    /// Bytes received but not yet consumed
    pub(crate) fn pending(&self) -> usize {
        let state = self.state.borrow();
        state
            .recv
            .as_ref()
            .map_or(0, |chain| chain.len().saturating_sub(state.recv_off))
    }

    /// Tear the slot down after a transport error.  The stack has already released the
    /// connection so the socket is detached without being closed.
    pub(crate) fn abort(&self) {
        let mut state = self.state.borrow_mut();
        state.exited = true;
        state.used = false;
        state.socket = None;
        state.recv = None;
        state.recv_off = 0;
    }

    /// Flush and close the connection, then free the slot for reuse.
    pub(crate) fn finish(&self) {
        let mut state = self.state.borrow_mut();

        if let Some(mut socket) = state.socket.take() {
            if let Err(e) = socket.output() {
                debug!("connection {}: output before close failed: {:?}", self.index, e);
            }
            if let Err(e) = socket.close() {
                warn!("connection {}: close failed: {:?}", self.index, e);
            }
        }

        state.exited = true;
        state.used = false;
        state.recv = None;
        state.recv_off = 0;
    }
}
