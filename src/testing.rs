//! In memory transport and handlers shared by the unit tests.
extern crate std;

use std::rc::Rc;
use std::string::String;
use std::vec::Vec;

use core::cell::RefCell;

use crate::connection::Connection;
use crate::response::StatusCode;
use crate::router::{Handler, HandlerError};
use crate::transport::{Listener, Socket, TransportError};

/// What the stack saw of one connection.
pub(crate) struct Wire {
    pub(crate) sent: Vec<u8>,
    pub(crate) acked: usize,
    /// free send buffer space
    pub(crate) capacity: usize,
    /// accept at most this many bytes per write
    pub(crate) max_accept: Option<usize>,
    pub(crate) fail_writes: Option<TransportError>,
    pub(crate) outputs: usize,
    pub(crate) closed: bool,
}

impl Wire {
    /// Pretend the peer acknowledged `n` bytes, freeing send buffer space.
    pub(crate) fn free(&mut self, n: usize) {
        self.capacity += n;
    }

    pub(crate) fn sent_str(&self) -> String {
        String::from_utf8_lossy(&self.sent).into_owned()
    }
}

pub(crate) struct MockSocket {
    wire: Rc<RefCell<Wire>>,
}

pub(crate) fn mock_socket(capacity: usize) -> (MockSocket, Rc<RefCell<Wire>>) {
    let wire = Rc::new(RefCell::new(Wire {
        sent: Vec::new(),
        acked: 0,
        capacity,
        max_accept: None,
        fail_writes: None,
        outputs: 0,
        closed: false,
    }));

    (
        MockSocket {
            wire: Rc::clone(&wire),
        },
        wire,
    )
}

impl Socket for MockSocket {
    type Chain = &'static [u8];

    fn recved(&mut self, len: usize) {
        self.wire.borrow_mut().acked += len;
    }

    fn send_buffer(&self) -> usize {
        self.wire.borrow().capacity
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, TransportError> {
        let mut wire = self.wire.borrow_mut();
        if let Some(e) = wire.fail_writes {
            return Err(e);
        }
        if wire.closed {
            return Err(TransportError::NotConnected);
        }

        let limit = wire.max_accept.unwrap_or(usize::MAX);
        let n = data.len().min(wire.capacity).min(limit);
        if n == 0 {
            return Err(TransportError::WouldBlock);
        }

        wire.capacity -= n;
        wire.sent.extend_from_slice(&data[..n]);
        Ok(n)
    }

    fn output(&mut self) -> Result<(), TransportError> {
        self.wire.borrow_mut().outputs += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<(), TransportError> {
        self.wire.borrow_mut().closed = true;
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct MockListener {
    pub(crate) bound: Option<u16>,
    pub(crate) listening: bool,
    pub(crate) fail_bind: bool,
}

impl Listener for MockListener {
    type Socket = MockSocket;

    fn bind(&mut self, port: u16) -> Result<(), TransportError> {
        if self.fail_bind {
            return Err(TransportError::AddrInUse);
        }
        self.bound = Some(port);
        Ok(())
    }

    fn listen(&mut self) -> Result<(), TransportError> {
        self.listening = true;
        Ok(())
    }
}

/// Handlers used to observe what the engine dispatched.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum TestHandler {
    /// drains the headers and answers with its name
    Named(&'static str),
    /// echoes path, query and every header as the body
    Echo,
    /// reads a single header, then drains the rest
    FirstHeader,
    /// writes `n` bytes of body in one call
    Large(usize),
    /// fails after starting the response
    Failing,
}

impl Handler for TestHandler {
    async fn handle<S: Socket>(
        &self,
        conn: &mut Connection<'_, S>,
        path: &str,
        query: Option<&str>,
    ) -> Result<(), HandlerError> {
        match *self {
            Self::Named(name) => {
                conn.end_request().await;
                conn.start_response(StatusCode::OK).await?;
                conn.send_header("Content-Type", "text/plain").await?;
                conn.end_headers().await?;
                conn.write_string(name).await;
            }
            Self::Echo => {
                let mut body = String::new();
                body.push_str(path);
                body.push('|');
                body.push_str(query.unwrap_or("-"));
                while let Some(header) = conn.read_header().await {
                    body.push('|');
                    body.push_str(header.name);
                    body.push('=');
                    body.push_str(header.value.unwrap_or("-"));
                }
                conn.start_response(StatusCode::OK).await?;
                conn.end_headers().await?;
                conn.write_string(&body).await;
            }
            Self::FirstHeader => {
                let mut first = String::new();
                if let Some(header) = conn.read_header().await {
                    first.push_str(header.name);
                }
                conn.end_request().await;
                conn.start_response(StatusCode::OK).await?;
                conn.end_headers().await?;
                conn.write_string(&first).await;
            }
            Self::Large(n) => {
                conn.end_request().await;
                conn.start_response(StatusCode::OK).await?;
                conn.end_headers().await?;
                let body: Vec<u8> = (0..n).map(|i| b'a' + (i % 26) as u8).collect();
                if conn.write_data(&body).await != n {
                    return Err(HandlerError::CustomError("short write"));
                }
            }
            Self::Failing => {
                conn.end_request().await;
                conn.start_response(StatusCode::InternalServerError).await?;
                return Err(HandlerError::CustomError("handler failed"));
            }
        }

        Ok(())
    }
}
