use embedded_io_async::{ErrorKind, ErrorType, Write};

use crate::ascii::{CR, LF};
use crate::config::MAX_LINE_SIZE;
use crate::header::{Header, ResponseHeader};
use crate::response::{ResponseError, StatusCode};
use crate::server::ConnId;
use crate::slot::Slot;
use crate::transport::Socket;
use crate::HttpWrite;

/// The handler's view of one client connection.
///
/// Headers are pulled one at a time with `read_header`, the response is produced with
/// `start_response`, `send_header`, `end_headers` and then `write_data` / `write_string` for
/// the body.  Every method that needs data the client has not sent yet, or send buffer space
/// the stack does not have yet, suspends the handler until the connection's next event.
///
/// `Connection` also implements `embedded_io_async::Write`, so it can be handed to encoders
/// written against that trait.
pub struct Connection<'s, S: Socket> {
    slot: &'s Slot<S>,
    line: [u8; MAX_LINE_SIZE],
    headers_done: bool,
}

impl<'s, S: Socket> Connection<'s, S> {
    pub(crate) fn new(slot: &'s Slot<S>) -> Self {
        Self {
            slot,
            line: [0; MAX_LINE_SIZE],
            headers_done: false,
        }
    }

    /// Identifies the connection in diagnostics
    pub fn id(&self) -> ConnId {
        ConnId::new(self.slot.index(), self.slot.state().borrow().generation)
    }

    /// Read one line into `buf`, without its CR LF terminator, and return its length.  A NUL
    /// is stored after the line so `buf` holds at most `buf.len() - 1` bytes of it, anything
    /// beyond that is returned by the next call.  At end of stream the partial line read so
    /// far is returned, `0` once nothing is left.
    pub async fn read_line(&mut self, buf: &mut [u8]) -> usize {
        self.slot.read_line(buf).await
    }

    /// Next request header, or `None` once the empty line ending the headers was read.
    /// Lines that are not valid UTF-8 are skipped.
    pub async fn read_header(&mut self) -> Option<Header<'_>> {
        let len = loop {
            if self.headers_done {
                return None;
            }

            let len = self.slot.read_line(&mut self.line).await;
            if len == 0 {
                self.headers_done = true;
                return None;
            }

            if core::str::from_utf8(&self.line[..len]).is_ok() {
                break len;
            }
            debug!(
                "connection {}: skipping header line that is not utf8",
                self.slot.index()
            );
        };

        let line = core::str::from_utf8(&self.line[..len]).ok()?;
        Some(Header::parse(line))
    }

    /// Discard any headers not read yet
    pub async fn end_request(&mut self) {
        while self.read_header().await.is_some() {}
    }

    /// True once all request headers have been read
    pub fn headers_done(&self) -> bool {
        self.headers_done
    }

    /// Send the status line.  Connections are closed after every response, so this is followed
    /// by a `Connection: close` header.
    pub async fn start_response(&mut self, status: StatusCode) -> Result<(), ResponseError> {
        status.write(self).await?;
        self.send(ResponseHeader::Connection("close")).await
    }

    /// Send a header line
    pub async fn send_header(&mut self, name: &str, value: &str) -> Result<(), ResponseError> {
        self.send(ResponseHeader::Other(name, value)).await
    }

    /// Send one of the well known headers
    pub async fn send(&mut self, header: ResponseHeader<'_>) -> Result<(), ResponseError> {
        header.write(self).await?;

        Ok(())
    }

    /// Terminate the headers, whatever is written afterwards is the body
    pub async fn end_headers(&mut self) -> Result<(), ResponseError> {
        self.write_all(&[CR, LF])
            .await
            .or(Err(ResponseError::NetworkError))
    }

    /// Write `data`, waiting for send buffer space as needed.  Returns the number of bytes
    /// handed to the stack, which is short of `data.len()` only if the connection failed.
    pub async fn write_data(&mut self, data: &[u8]) -> usize {
        self.slot.write(data).await
    }

    /// Write `s`, see `write_data`
    pub async fn write_string(&mut self, s: &str) -> usize {
        self.write_data(s.as_bytes()).await
    }
}

impl<S: Socket> ErrorType for Connection<'_, S> {
    type Error = ErrorKind;
}

impl<S: Socket> Write for Connection<'_, S> {
    async fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        if buf.is_empty() {
            return Ok(0);
        }

        match self.slot.write(buf).await {
            0 => Err(ErrorKind::ConnectionReset),
            n => Ok(n),
        }
    }

    async fn write_all(&mut self, buf: &[u8]) -> Result<(), Self::Error> {
        if self.slot.write(buf).await < buf.len() {
            return Err(ErrorKind::ConnectionReset);
        }

        Ok(())
    }

    async fn flush(&mut self) -> Result<(), Self::Error> {
        self.slot.flush().or(Err(ErrorKind::NotConnected))
    }
}
