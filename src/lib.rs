//! # Contlite
//!
//! `contlite` is a small implementation of HTTP/1.1 request handling aimed at `no_std`
//! devices whose TCP/IP stack reports everything through callbacks (lwIP's raw API and
//! friends).
//!
//! Each accepted connection gets its own lightweight task.  The transport glue forwards
//! stack events to the `server::Server`, which resumes the task of that connection.  The task
//! runs until it needs more data or more send buffer space, then hands control back.  This
//! lets request handlers be written as plain async code: read a header, write a buffer.
//!
//! This crate provides:
//!
//! * a fixed pool of connection slots, sized at construction.
//! * a line reader that is tolerant of arbitrarily fragmented input.
//! * a writer that waits for send buffer space instead of failing.
//! * a small router matching request paths to handlers.
//!
//! This crate does **not** provide:
//!
//! * the TCP/IP stack, which is consumed through the `transport` traits.
//! * request bodies, keep-alive, chunked encoding or TLS.  Every response is sent with
//!   `Connection: close`.
//!
//! ## Basic Use
//!
//! Implement `transport::Listener` and `transport::Socket` for the stack in use, and
//! `router::Handler` for the application.  Create the server with `server::init`, register
//! routes, then `start` it.  From the stack callbacks call `on_accept`, `on_recv`, `on_sent`
//! and `on_error`, passing back the `server::ConnId` handed out by `on_accept`.
//!
//! Nothing is allocated after `init` returns.
//!
//! ## Example
//!
//! ```
//! use contlite::config::Config;
//! use contlite::connection::Connection;
//! use contlite::response::StatusCode;
//! use contlite::router::{Handler, HandlerError};
//! use contlite::server;
//! use contlite::transport::{Listener, Socket, TransportError};
//!
//! const HTML_INDEX: &str = "<html>...</html>";
//!
//! enum Pages {
//!     Index,
//! }
//!
//! impl Handler for Pages {
//!     async fn handle<S: Socket>(
//!         &self,
//!         conn: &mut Connection<'_, S>,
//!         _path: &str,
//!         _query: Option<&str>,
//!     ) -> Result<(), HandlerError> {
//!         match self {
//!             Pages::Index => {
//!                 conn.end_request().await;
//!                 conn.start_response(StatusCode::OK).await?;
//!                 conn.send_header("Content-Type", "text/html").await?;
//!                 conn.end_headers().await?;
//!                 conn.write_string(HTML_INDEX).await;
//!             }
//!         }
//!
//!         Ok(())
//!     }
//! }
//!
//! # struct Pcb;
//! #
//! # impl Socket for Pcb {
//! #     type Chain = &'static [u8];
//! #     fn recved(&mut self, _len: usize) {}
//! #     fn send_buffer(&self) -> usize { 1024 }
//! #     fn write(&mut self, data: &[u8]) -> Result<usize, TransportError> { Ok(data.len()) }
//! #     fn output(&mut self) -> Result<(), TransportError> { Ok(()) }
//! #     fn close(&mut self) -> Result<(), TransportError> { Ok(()) }
//! # }
//! #
//! # struct ListenPcb;
//! #
//! # impl Listener for ListenPcb {
//! #     type Socket = Pcb;
//! #     fn bind(&mut self, _port: u16) -> Result<(), TransportError> { Ok(()) }
//! #     fn listen(&mut self) -> Result<(), TransportError> { Ok(()) }
//! # }
//! #
//! // ListenPcb implements contlite::transport::Listener (not shown), this would typically
//! // wrap a listening lwIP pcb.
//! let mut server = server::init(ListenPcb, Config::default().with_max_connections(2)).unwrap();
//! server.route("/", Pages::Index).unwrap();
//! server.start().unwrap();
//!
//! // from the stack's accept callback
//! let id = server.on_accept(Pcb).ok().unwrap();
//! // from the stack's receive callback
//! server.on_recv(id, Some(b"GET / HTTP/1.1\r\n\r\n".as_slice())).ok().unwrap();
//!
//! assert_eq!(server.active_connections(), 0);
//! ```

#![no_std]
#![warn(missing_docs)]

extern crate alloc;

// must come first so the logging macros are visible to every other module
mod fmt;

mod ascii;
/// Construction time settings
pub mod config;
/// The per request API handed to handlers
pub mod connection;
mod coroutine;
mod engine;
/// HTTP Headers
pub mod header;
mod reader;
/// HTTP Requests
pub mod request;
/// HTTP responses
pub mod response;
/// Path based dispatch to handlers
pub mod router;
/// Connection pool and event dispatch
pub mod server;
mod slot;
/// What the crate needs from the TCP/IP stack
pub mod transport;
mod writer;

#[cfg(test)]
mod testing;

use embedded_io_async::Write;

#[derive(Debug)]
pub(crate) enum WriteError {
    NetworkError,
}

pub(crate) trait HttpWrite {
    async fn write<T: Write>(self, writer: &mut T) -> Result<(), WriteError>;
}
