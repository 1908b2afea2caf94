//! The interface of the callback driven TCP/IP stack the server runs on (lwIP's raw API or
//! anything shaped like it).
//!
//! The stack is consumed through two traits.  A `Listener` is bound and put into the
//! listening state by the `Server`.  Every accepted connection is represented by a `Socket`
//! that is handed to `Server::on_accept`, after which the embedding glue forwards the stack's
//! per connection callbacks (data arrived, data sent, error) to the matching `Server::on_*`
//! method using the returned `ConnId` as the callback argument.

/// Errors reported by the transport.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// Not enough send buffer space to accept the data, try again after a send completes
    WouldBlock,
    /// The peer reset the connection
    ConnectionReset,
    /// The connection was aborted by the local stack
    ConnectionAborted,
    /// The operation requires an open connection
    NotConnected,
    /// Address or port already in use
    AddrInUse,
    /// Any other stack specific error code
    Other(i32),
}

/// A chain of received bytes owned by the connection until fully consumed.  Dropping the
/// chain releases it back to the stack.
pub trait RecvChain {
    /// Total number of bytes in the chain
    fn len(&self) -> usize;

    /// True when the chain carries no bytes
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy bytes starting `offset` bytes into the chain into `dst`, returning the number of
    /// bytes copied.  Copies fewer than `dst.len()` bytes only when the chain runs out.
    fn copy_to(&self, dst: &mut [u8], offset: usize) -> usize;
}

impl RecvChain for &[u8] {
    fn len(&self) -> usize {
        <[u8]>::len(self)
    }

    fn copy_to(&self, dst: &mut [u8], offset: usize) -> usize {
        let src = self.get(offset..).unwrap_or_default();
        let n = src.len().min(dst.len());
        dst[..n].copy_from_slice(&src[..n]);
        n
    }
}

impl<const N: usize> RecvChain for heapless::Vec<u8, N> {
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn copy_to(&self, dst: &mut [u8], offset: usize) -> usize {
        self.as_slice().copy_to(dst, offset)
    }
}

/// One accepted TCP connection.
pub trait Socket {
    /// Type of the receive buffer chains delivered for this socket
    type Chain: RecvChain;

    /// Acknowledge `len` consumed bytes, opening the receive window by that amount
    fn recved(&mut self, len: usize);

    /// Free space in the send buffer
    fn send_buffer(&self) -> usize;

    /// Queue `data` for transmission.  Returns the number of bytes accepted, or
    /// `TransportError::WouldBlock` when nothing can be queued right now.
    fn write(&mut self, data: &[u8]) -> Result<usize, TransportError>;

    /// Push queued data onto the wire
    fn output(&mut self) -> Result<(), TransportError>;

    /// Close the connection gracefully
    fn close(&mut self) -> Result<(), TransportError>;
}

/// The listening endpoint.
pub trait Listener {
    /// Connection type produced by this listener
    type Socket: Socket;

    /// Bind to `port` on all local addresses
    fn bind(&mut self, port: u16) -> Result<(), TransportError>;

    /// Start accepting connections.  Accepted sockets are passed to `Server::on_accept`.
    fn listen(&mut self) -> Result<(), TransportError>;
}
