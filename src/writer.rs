use crate::coroutine::yield_now;
use crate::slot::Slot;
use crate::transport::{Socket, TransportError};

impl<S: Socket> Slot<S> {
    /// Offer as much of `data` as the send buffer has room for.  `Ok(0)` means no room.
    fn try_write(&self, data: &[u8]) -> Result<usize, TransportError> {
        let mut state = self.state().borrow_mut();
        let socket = state
            .socket
            .as_mut()
            .ok_or(TransportError::NotConnected)?;

        let block = data.len().min(socket.send_buffer());
        if block == 0 {
            return Ok(0);
        }

        match socket.write(&data[..block]) {
            Ok(n) => Ok(n.min(block)),
            Err(TransportError::WouldBlock) => Ok(0),
            Err(e) => Err(e),
        }
    }

    /// Push queued data onto the wire.
    pub(crate) fn flush(&self) -> Result<(), TransportError> {
        match self.state().borrow_mut().socket.as_mut() {
            Some(socket) => socket.output(),
            None => Err(TransportError::NotConnected),
        }
    }

    /// Write all of `data`, suspending while the send buffer is full.  Returns the number of
    /// bytes the transport accepted, which is less than `data.len()` only after a transport
    /// error.
    pub(crate) async fn write(&self, data: &[u8]) -> usize {
        let mut written = 0;

        while written < data.len() {
            match self.try_write(&data[written..]) {
                Ok(0) => {
                    if let Err(e) = self.flush() {
                        debug!("connection {}: output failed: {:?}", self.index(), e);
                    }
                    trace!("connection {}: waiting for send buffer", self.index());
                    yield_now().await;
                }
                Ok(n) => written += n,
                Err(e) => {
                    warn!(
                        "connection {}: write failed after {} of {} bytes: {:?}",
                        self.index(),
                        written,
                        data.len(),
                        e
                    );
                    break;
                }
            }
        }

        written
    }
}
